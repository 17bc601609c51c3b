//! # hs-match-tracker
//!
//! Reconstructs the state of a two-sided card game match from the event
//! stream a log parser extracts from the game client.
//!
//! ## Design Principles
//!
//! 1. **Single Writer**: All match state is mutated on one serialized
//!    context (`MatchEngine`). Nothing else holds a mutable reference.
//!
//! 2. **Exclusive Zones**: An entity sits in at most one zone container
//!    across both sides at any instant.
//!
//! 3. **Lossy Input, No Failures**: Malformed or incomplete events are
//!    dropped with a debug log line, never surfaced as errors.
//!
//! ## Architecture
//!
//! - **Event Queue**: The parser and the detection loops post `GameEvent`s
//!   into one unbounded queue drained by the engine.
//!
//! - **Detection Loops**: After a match ends, mode and rank arrive late
//!   through side signals. `ModeDetector` polls for them on a tokio task
//!   and reports back through the queue; it never touches match state.
//!
//! - **Placeholders**: A known deck list is seeded as placeholder entities
//!   that real entities retire as they are revealed.
//!
//! ## Modules
//!
//! - `core`: Entity ids, tags, sides, the entity store, configuration
//! - `zones`: Zone kinds and per-side containers
//! - `cards`: Card ids, card metadata and deck collaborators
//! - `player`: Per-side state and zone transitions
//! - `tracker`: Outbound push sinks
//! - `game`: The match state machine
//! - `detection`: Post-match mode and rank detection
//! - `events`: Inbound event records
//! - `engine`: The serialized execution context

pub mod core;
pub mod zones;
pub mod cards;
pub mod player;
pub mod tracker;
pub mod game;
pub mod detection;
pub mod events;
pub mod engine;
pub mod error;

// Re-export commonly used types
pub use crate::core::{
    Entity, EntityId, EntityStore,
    GameTag, Mulligan, TagMap,
    Side, SideMap,
    TrackerConfig,
};

pub use crate::zones::{Zone, ZoneSet};

pub use crate::cards::{CardCatalog, CardId, CardMetadata, Deck, DeckEntry, StaticCatalog};

pub use crate::player::{Applied, IgnoreReason, PlayerState, Transition};

pub use crate::tracker::{MatchTracker, PlayerView, SideTracker};

pub use crate::game::{Game, GameMode, GameResult, MatchSummary, Phase};

pub use crate::detection::{
    DetectionOutcome, DetectionReport, DetectionSignals, DetectionStage, ModeDetector,
};

pub use crate::events::{GameEvent, ZoneEvent};

pub use crate::engine::{EngineHandle, MatchEngine};

pub use crate::error::TrackerError;
