//! Match state machine.
//!
//! `Game` owns both `PlayerState`s and the `EntityStore`, dispatches every
//! inbound event, and derives turn number, mulligan completion and the
//! match outcome.
//!
//! ## Phases
//!
//! `NotStarted -> InMulligan -> InTurns -> Ended`, with `start` allowed
//! again from `Ended` (the instance is reused across matches).

mod state;

pub use state::Game;

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Where the match is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    NotStarted,
    InMulligan,
    InTurns,
    Ended,
}

/// Match mode as reported by the client.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    Unknown,
    Casual,
    Ranked,
    Arena,
    Brawl,
    Friendly,
    Practice,
}

/// Outcome of a match from the local player's seat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    #[default]
    Unknown,
    Win,
    Loss,
    Tied,
}

/// Match-level facts handed to the match tracker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub phase: Phase,
    pub mode: GameMode,
    pub rank: Option<i64>,
    pub result: GameResult,
    pub turn: i64,
    pub started_at: Option<SystemTime>,
    pub ended_at: Option<SystemTime>,
}

impl MatchSummary {
    /// Match length, when both ends are known.
    #[must_use]
    pub fn duration(&self) -> Option<std::time::Duration> {
        let start = self.started_at?;
        self.ended_at?.duration_since(start).ok()
    }
}
