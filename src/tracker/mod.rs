//! Outbound notification sinks.
//!
//! Trackers are the presentation side of the system. They are pushed to,
//! never polled: one `SideTracker` per side receives a `PlayerView` after
//! every applied change to that side, and one `MatchTracker` receives the
//! `MatchSummary` at match boundaries and whenever the outcome changes.
//!
//! Trackers are attached once and survive match resets.

use std::sync::Arc;

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::{EntityId, Side};
use crate::game::MatchSummary;

/// Snapshot of one side, cheap to clone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub side: Side,
    pub name: Option<String>,
    pub hero: Option<CardId>,
    pub fatigue: i64,
    pub hand: Vector<EntityId>,
    pub deck: Vector<EntityId>,
    pub board: Vector<EntityId>,
    pub graveyard: Vector<EntityId>,
    pub secret: Vector<EntityId>,
}

/// Per-side push sink.
pub trait SideTracker: Send + Sync {
    /// The side's zones, fatigue or identity changed.
    fn update(&self, view: &PlayerView);

    fn game_start(&self) {}

    fn game_end(&self) {}
}

/// Match-level push sink.
pub trait MatchTracker: Send + Sync {
    fn game_start(&self, _summary: &MatchSummary) {}

    /// Result, mode or rank changed.
    fn update(&self, _summary: &MatchSummary) {}

    fn game_end(&self, _summary: &MatchSummary) {}
}

impl<T: SideTracker + ?Sized> SideTracker for Arc<T> {
    fn update(&self, view: &PlayerView) {
        (**self).update(view);
    }

    fn game_start(&self) {
        (**self).game_start();
    }

    fn game_end(&self) {
        (**self).game_end();
    }
}

impl<T: MatchTracker + ?Sized> MatchTracker for Arc<T> {
    fn game_start(&self, summary: &MatchSummary) {
        (**self).game_start(summary);
    }

    fn update(&self, summary: &MatchSummary) {
        (**self).update(summary);
    }

    fn game_end(&self, summary: &MatchSummary) {
        (**self).game_end(summary);
    }
}
