//! Entity identification and the per-entity record.
//!
//! Every game object the client log mentions (heroes, cards, the match root,
//! player entities) has a unique `EntityId` assigned by the event stream.
//!
//! ## ID Layout
//!
//! - `0..PLACEHOLDER_BASE`: ids taken verbatim from the log stream
//! - `PLACEHOLDER_BASE..`: placeholders minted locally for deck cards that
//!   are known from the active deck list but have no stream entity yet
//!
//! ```
//! use hs_match_tracker::core::EntityId;
//!
//! let streamed = EntityId(68);
//! assert!(!streamed.is_placeholder());
//!
//! let seeded = EntityId::placeholder(0);
//! assert!(seeded.is_placeholder());
//! ```

use serde::{Deserialize, Serialize};

use super::side::Side;
use super::tags::{GameTag, TagMap};
use crate::cards::CardId;
use crate::zones::Zone;

/// Unique identifier for any tracked entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// First id of the locally allocated placeholder range.
    pub const PLACEHOLDER_BASE: u32 = 0x4000_0000;

    /// Create the `n`-th placeholder id.
    #[must_use]
    pub const fn placeholder(n: u32) -> Self {
        Self(Self::PLACEHOLDER_BASE + n)
    }

    /// Check if this id was minted locally rather than read from the log.
    #[must_use]
    pub const fn is_placeholder(self) -> bool {
        self.0 >= Self::PLACEHOLDER_BASE
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// A tracked game object.
///
/// The id never changes once created. Tags only grow or update; they are
/// dropped only when the whole store is reset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Stable identifier for the match lifetime.
    pub id: EntityId,

    /// Log name, e.g. `"GameEntity"` for the match root or a battletag.
    pub name: Option<String>,

    /// Revealed card identifier. `None` while the card is hidden.
    pub card_id: Option<CardId>,

    /// Ownership flag: true when the entity belongs to the local player.
    pub is_player: bool,

    /// Secrecy flag.
    pub is_secret: bool,

    /// Zone container currently holding this entity, if any.
    pub zone: Option<Zone>,

    /// Placeholder seeded from the active deck list.
    pub placeholder: bool,

    #[serde(default)]
    tags: TagMap,
}

impl Entity {
    /// Create an empty entity.
    #[must_use]
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            name: None,
            card_id: None,
            is_player: false,
            is_secret: false,
            zone: None,
            placeholder: id.is_placeholder(),
            tags: TagMap::default(),
        }
    }

    /// Side this entity belongs to, by its ownership flag.
    #[must_use]
    pub fn side(&self) -> Side {
        if self.is_player {
            Side::Player
        } else {
            Side::Opponent
        }
    }

    /// Side currently holding this entity in one of its zones.
    #[must_use]
    pub fn held_by(&self) -> Option<Side> {
        self.zone.map(|_| self.side())
    }

    /// Check if a card identifier has been revealed.
    #[must_use]
    pub fn has_card_id(&self) -> bool {
        self.card_id.as_ref().is_some_and(|c| !c.is_empty())
    }

    /// Get a tag value, 0 if never set.
    #[must_use]
    pub fn get_tag(&self, tag: GameTag) -> i64 {
        self.tags.get(tag)
    }

    /// Check whether a tag has ever been set.
    #[must_use]
    pub fn has_tag(&self, tag: GameTag) -> bool {
        self.tags.contains(tag)
    }

    /// Set a tag value.
    pub fn set_tag(&mut self, tag: GameTag, value: i64) {
        self.tags.set(tag, value);
    }

    /// All tags set on this entity.
    #[must_use]
    pub fn tags(&self) -> &TagMap {
        &self.tags
    }

    /// True for a player entity (carries `PLAYER_ID`).
    #[must_use]
    pub fn is_player_entity(&self) -> bool {
        self.has_tag(GameTag::PlayerId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_range() {
        assert!(!EntityId(0).is_placeholder());
        assert!(!EntityId(EntityId::PLACEHOLDER_BASE - 1).is_placeholder());
        assert!(EntityId::placeholder(0).is_placeholder());
        assert_eq!(EntityId::placeholder(3).raw(), EntityId::PLACEHOLDER_BASE + 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", EntityId(42)), "Entity(42)");
    }

    #[test]
    fn test_new_entity_is_empty() {
        let entity = Entity::new(EntityId(7));
        assert_eq!(entity.card_id, None);
        assert_eq!(entity.zone, None);
        assert_eq!(entity.held_by(), None);
        assert!(!entity.placeholder);
        assert_eq!(entity.get_tag(GameTag::Turn), 0);
        assert!(!entity.has_tag(GameTag::Turn));
    }

    #[test]
    fn test_tag_update() {
        let mut entity = Entity::new(EntityId(1));
        entity.set_tag(GameTag::Turn, 3);
        entity.set_tag(GameTag::Turn, 4);
        assert_eq!(entity.get_tag(GameTag::Turn), 4);
        assert_eq!(entity.tags().len(), 1);
    }

    #[test]
    fn test_empty_card_id_is_not_revealed() {
        let mut entity = Entity::new(EntityId(1));
        entity.card_id = Some(CardId::new(""));
        assert!(!entity.has_card_id());
        entity.card_id = Some(CardId::new("EX1_001"));
        assert!(entity.has_card_id());
    }

    #[test]
    fn test_serialization() {
        let mut entity = Entity::new(EntityId(123));
        entity.set_tag(GameTag::Controller, 1);
        let json = serde_json::to_string(&entity).unwrap();
        let deserialized: Entity = serde_json::from_str(&json).unwrap();
        assert_eq!(entity, deserialized);
    }
}
