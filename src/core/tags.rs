//! Tag kinds and per-entity tag storage.
//!
//! The client log describes entity state as `TAG=value` pairs. Only the tags
//! the tracker reasons about are modelled; anything else is ignored by the
//! log parser before it reaches this crate.
//!
//! Reads never fail: an absent tag reads as 0 and `contains` reports
//! presence explicitly.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Tag kinds, numbered as the game client numbers them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameTag {
    PlayState = 17,
    Step = 19,
    Turn = 20,
    Fatigue = 22,
    CurrentPlayer = 23,
    FirstPlayer = 24,
    HeroEntity = 27,
    PlayerId = 30,
    Zone = 49,
    Controller = 50,
    EntityId = 53,
    NextStep = 198,
    CardType = 202,
    Secret = 219,
    ZonePosition = 263,
    MulliganState = 305,
}

impl GameTag {
    /// Numeric tag id as printed in the client log.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self as u16
    }
}

/// Values of the `MULLIGAN_STATE` tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mulligan {
    Invalid = 0,
    Input = 1,
    Dealing = 2,
    Waiting = 3,
    Done = 4,
}

impl Mulligan {
    #[must_use]
    pub const fn value(self) -> i64 {
        self as i64
    }
}

/// Tag storage for a single entity.
///
/// Entities rarely carry more than a handful of the tracked tags, so the
/// map is an inline vector with linear lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMap {
    entries: SmallVec<[(GameTag, i64); 8]>,
}

impl TagMap {
    /// Get a tag value, 0 if absent.
    #[must_use]
    pub fn get(&self, tag: GameTag) -> i64 {
        self.try_get(tag).unwrap_or(0)
    }

    /// Get a tag value if present.
    #[must_use]
    pub fn try_get(&self, tag: GameTag) -> Option<i64> {
        self.entries
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|&(_, v)| v)
    }

    #[must_use]
    pub fn contains(&self, tag: GameTag) -> bool {
        self.entries.iter().any(|(t, _)| *t == tag)
    }

    /// Insert or overwrite a tag value.
    pub fn set(&mut self, tag: GameTag, value: i64) {
        match self.entries.iter_mut().find(|(t, _)| *t == tag) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((tag, value)),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GameTag, i64)> + '_ {
        self.entries.iter().copied()
    }
}
