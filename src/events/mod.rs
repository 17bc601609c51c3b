//! Inbound events.
//!
//! ## Key Types
//!
//! - `GameEvent`: One record from the log parser (or a detection loop)
//! - `ZoneEvent`: A zone transition for one side

pub mod event;

pub use event::{GameEvent, ZoneEvent};
