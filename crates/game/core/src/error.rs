//! Common error infrastructure for game-core.
//!
//! Shared severity classification plus the battle-level [`CombatError`].
//! Errors that belong to a single concern (`SectionError`, `InputError`,
//! `RosterError`) live beside the code that raises them.
//!
//! Recoverable player mistakes (bad menu input, unaffordable skills, empty
//! hand) are never errors: the controller re-prompts or reports them as
//! narration. Only conditions the battle cannot continue past surface here.

use crate::combat::{CombatantId, InputError};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the caller may retry or pick another action
/// - **Validation**: malformed data that should be rejected without retry
/// - **Internal**: state inconsistency that indicates a bug
/// - **Fatal**: the battle cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all game-core errors.
///
/// Implementors derive `thiserror::Error` for Display and classify severity
/// by recoverability, not by impact.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for metrics, logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors that abort a battle.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    /// An enemy reached its turn without any skill to use.
    #[error("enemy `{actor}` has no skills to use")]
    EmptySkillDeck { actor: String },

    /// The input source stopped producing lines mid-battle.
    #[error("combat input failed: {0}")]
    Input(#[from] InputError),

    /// A skill referenced an actor that is not part of the battle.
    #[error("combatant {0} is not in the battle")]
    UnknownCombatant(CombatantId),

    /// The battle was started with no enemies.
    #[error("battle started without any enemies")]
    NoEnemies,
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::EmptySkillDeck { .. } | Self::NoEnemies => ErrorSeverity::Validation,
            Self::Input(_) => ErrorSeverity::Fatal,
            Self::UnknownCombatant(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptySkillDeck { .. } => "COMBAT_EMPTY_SKILL_DECK",
            Self::Input(_) => "COMBAT_INPUT",
            Self::UnknownCombatant(_) => "COMBAT_UNKNOWN_COMBATANT",
            Self::NoEnemies => "COMBAT_NO_ENEMIES",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_problems_are_validation_errors() {
        let err = CombatError::EmptySkillDeck {
            actor: "Goblin".into(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert!(!err.severity().is_recoverable());
        assert_eq!(err.to_string(), "enemy `Goblin` has no skills to use");
    }

    #[test]
    fn closed_input_is_fatal() {
        let err = CombatError::from(InputError::Closed);
        assert!(err.severity().is_internal());
        assert_eq!(err.error_code(), "COMBAT_INPUT");
    }
}
