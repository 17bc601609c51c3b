//! Per-side state and the transitions that drive it.
//!
//! ## Key Types
//!
//! - `Transition`: Every zone move kind the log reports
//! - `PlayerState`: Zones, identity and fatigue of one side
//! - `Applied` / `IgnoreReason`: What applying an event did

pub mod transition;
pub mod state;

pub use transition::Transition;
pub use state::{Applied, IgnoreReason, PlayerState};
