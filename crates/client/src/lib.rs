//! Terminal client for the combat engine.
//!
//! # Architecture
//!
//! ```text
//! main (composition root)
//!   ├─→ ClientConfig   (environment, .env)
//!   ├─→ logging        (file-only tracing)
//!   ├─→ ContentBundle  (embedded or data-dir catalogs)
//!   └─→ run_session    (rooms → run_combat)
//!         ├─→ StdinInput        (CombatInput)
//!         └─→ TerminalPresenter (EventSink + Narrator)
//! ```

pub mod config;
pub mod logging;
pub mod session;
pub mod terminal;

pub use config::ClientConfig;
pub use session::{SessionReport, plan_rooms, run_session, save_snapshot};
pub use terminal::{Narrator, StdinInput, TerminalPresenter};
