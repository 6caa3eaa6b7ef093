/// Probability expressed as an integer fraction so rolls stay exact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chance {
    pub numerator: u32,
    pub denominator: u32,
}

impl Chance {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Returns the chance as a float in `[0, 1]`.
    pub fn as_f64(&self) -> f64 {
        if self.denominator == 0 {
            return 0.0;
        }
        (self.numerator.min(self.denominator) as f64) / self.denominator as f64
    }
}

/// Raw damage formula shared by skill resolution and the enemy lethal estimate.
///
/// Both call sites go through [`DamageFormula::raw_damage`], so tuning the
/// formula changes hits and the enemy AI's kill prediction together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum DamageFormula {
    /// `max(1, attack + power)`
    #[default]
    Additive,
    /// `max(1, attack / divisor) * power`
    Scaled { divisor: u32 },
}

impl DamageFormula {
    /// Computes pre-defense damage for a caster's attack and a skill's power.
    ///
    /// The result is never below 1. Defense is applied afterwards by
    /// [`crate::Actor::take_damage`].
    pub fn raw_damage(&self, attack: i32, power: i32) -> i32 {
        match *self {
            DamageFormula::Additive => attack.saturating_add(power).max(1),
            DamageFormula::Scaled { divisor } => {
                let divisor = i32::try_from(divisor.max(1)).unwrap_or(i32::MAX);
                (attack / divisor)
                    .max(1)
                    .saturating_mul(power)
                    .max(1)
            }
        }
    }
}

/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Experience needed per level: a level-up happens at `level * level_threshold`.
    pub level_threshold: u32,

    /// Probability that a retreat succeeds.
    pub retreat_chance: Chance,

    /// Percentage of current health lost when a retreat fails (rounded down).
    pub retreat_penalty_percent: u32,

    /// Percentage of max mana restored by resting (rounded up).
    pub rest_mana_percent: u32,

    /// Percentage of max health restored by resting (rounded down).
    pub rest_health_percent: u32,

    /// Skills drawn into the player's hand at the start of each player turn.
    pub skills_drawn_per_turn: usize,

    /// Inclusive range of skills an ally learns when recruited.
    pub ally_skill_count: (usize, usize),

    pub damage_formula: DamageFormula,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of allies travelling with the player.
    pub const MAX_ALLIES: usize = 2;
    /// Highest section (difficulty tier) content is authored for.
    pub const MAX_SECTION: u8 = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_LEVEL_THRESHOLD: u32 = 50;
    pub const DEFAULT_RETREAT_CHANCE: Chance = Chance::new(1, 3);
    pub const DEFAULT_RETREAT_PENALTY_PERCENT: u32 = 10;
    pub const DEFAULT_REST_MANA_PERCENT: u32 = 20;
    pub const DEFAULT_REST_HEALTH_PERCENT: u32 = 10;

    pub fn new() -> Self {
        Self {
            level_threshold: Self::DEFAULT_LEVEL_THRESHOLD,
            retreat_chance: Self::DEFAULT_RETREAT_CHANCE,
            retreat_penalty_percent: Self::DEFAULT_RETREAT_PENALTY_PERCENT,
            rest_mana_percent: Self::DEFAULT_REST_MANA_PERCENT,
            rest_health_percent: Self::DEFAULT_REST_HEALTH_PERCENT,
            skills_drawn_per_turn: 1,
            ally_skill_count: (1, 3),
            damage_formula: DamageFormula::Additive,
        }
    }

    pub fn with_damage_formula(mut self, damage_formula: DamageFormula) -> Self {
        self.damage_formula = damage_formula;
        self
    }

    /// Experience required to leave `level`.
    pub fn experience_for_level(&self, level: u32) -> u32 {
        level.saturating_mul(self.level_threshold)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
