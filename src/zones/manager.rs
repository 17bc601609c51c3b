//! Per-side zone containers.
//!
//! A `ZoneSet` holds one ordered container per `Zone` for one side of the
//! match, plus a reverse index from entity to zone. Every entity is in at
//! most one container of the set; `place` removes it from wherever it was
//! before appending it to the destination.
//!
//! Containers are `im::Vector`s so a tracker can take a snapshot of a zone
//! without copying it.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::entity::EntityId;

/// Where an entity can sit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Hand,
    Deck,
    Board,
    Graveyard,
    Secret,
}

impl Zone {
    pub const ALL: [Zone; 5] = [Zone::Hand, Zone::Deck, Zone::Board, Zone::Graveyard, Zone::Secret];

    const fn index(self) -> usize {
        match self {
            Zone::Hand => 0,
            Zone::Deck => 1,
            Zone::Board => 2,
            Zone::Graveyard => 3,
            Zone::Secret => 4,
        }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Zone::Hand => "hand",
            Zone::Deck => "deck",
            Zone::Board => "board",
            Zone::Graveyard => "graveyard",
            Zone::Secret => "secret",
        };
        f.write_str(name)
    }
}

/// The five zone containers of one side.
///
/// ```
/// use hs_match_tracker::core::EntityId;
/// use hs_match_tracker::zones::{Zone, ZoneSet};
///
/// let mut zones = ZoneSet::new();
/// zones.place(EntityId(10), Zone::Deck);
/// zones.place(EntityId(11), Zone::Deck);
///
/// // Drawing moves the entity; it is never in two containers.
/// assert_eq!(zones.place(EntityId(10), Zone::Hand), Some(Zone::Deck));
/// assert_eq!(zones.entities(Zone::Deck).len(), 1);
/// assert_eq!(zones.locate(EntityId(10)), Some(Zone::Hand));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZoneSet {
    /// Entity locations: entity_id -> zone
    locations: FxHashMap<EntityId, Zone>,

    /// Ordered contents, indexed by `Zone::index`.
    containers: [Vector<EntityId>; 5],
}

impl ZoneSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity to `zone`, removing it from its previous container.
    ///
    /// Returns the previous zone, or `None` if the entity was not held here.
    pub fn place(&mut self, entity: EntityId, zone: Zone) -> Option<Zone> {
        let old = self.remove(entity);
        self.locations.insert(entity, zone);
        self.containers[zone.index()].push_back(entity);
        old
    }

    /// Remove an entity from whichever container holds it.
    ///
    /// Returns the zone it was in, or `None` if not found.
    pub fn remove(&mut self, entity: EntityId) -> Option<Zone> {
        let zone = self.locations.remove(&entity)?;
        self.containers[zone.index()].retain(|&e| e != entity);
        Some(zone)
    }

    /// Remove the first entity in `zone` matching a predicate.
    pub fn remove_first<F>(&mut self, zone: Zone, predicate: F) -> Option<EntityId>
    where
        F: Fn(EntityId) -> bool,
    {
        let container = &mut self.containers[zone.index()];
        let index = container.iter().position(|&e| predicate(e))?;
        let entity = container.remove(index);
        self.locations.remove(&entity);
        Some(entity)
    }

    /// Get the zone an entity is in.
    #[must_use]
    pub fn locate(&self, entity: EntityId) -> Option<Zone> {
        self.locations.get(&entity).copied()
    }

    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.locations.contains_key(&entity)
    }

    /// Ordered contents of a zone.
    #[must_use]
    pub fn entities(&self, zone: Zone) -> &Vector<EntityId> {
        &self.containers[zone.index()]
    }

    /// Get the number of entities in a zone.
    #[must_use]
    pub fn zone_size(&self, zone: Zone) -> usize {
        self.containers[zone.index()].len()
    }

    /// Total number of entities held.
    #[must_use]
    pub fn total(&self) -> usize {
        self.locations.len()
    }

    pub fn clear(&mut self) {
        self.locations.clear();
        for container in &mut self.containers {
            container.clear();
        }
    }
}
