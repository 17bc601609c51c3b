//! Values exchanged between the match state and detection loops.
//!
//! `Game` is the only writer of `DetectionSignals`; it publishes them
//! through a `tokio::sync::watch` channel and detection loops read the
//! latest copy on every tick. Loops report back with a `DetectionReport`
//! that travels through the same event queue as log events.

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Side-channel state a detection loop waits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetectionSignals {
    /// A rank has been reported for the finished match.
    pub rank_found: bool,

    /// When the client last unloaded assets (or the detection baseline).
    pub last_asset_unload: Option<Instant>,

    /// No asset unload has been observed since detection began.
    pub awaiting_first_unload: bool,
}

impl Default for DetectionSignals {
    fn default() -> Self {
        Self {
            rank_found: false,
            last_asset_unload: None,
            awaiting_first_unload: true,
        }
    }
}

/// Which detection loop produced a report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStage {
    /// Waiting for the match mode.
    Mode,
    /// Waiting for the rank of a ranked match.
    Rank,
}

/// How a detection loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionOutcome {
    /// The rank-found signal was raised.
    RankFound,
    /// The timeout elapsed; whatever is unknown stays unknown.
    TimedOut,
}

/// Completion of one detection loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionReport {
    /// Generation of the loop; stale generations are discarded.
    pub generation: u64,
    pub stage: DetectionStage,
    pub outcome: DetectionOutcome,
}
