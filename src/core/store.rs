//! Entity storage for the current match.
//!
//! The `EntityStore` owns every entity the log has mentioned since the last
//! reset. Stream ids are caller-supplied and tracked with a watermark;
//! placeholder ids come from a separate counter in the reserved range.
//!
//! Lookups against unknown ids never fail: tag reads default to 0, presence
//! queries to false, and entity reads to `None`.

use rustc_hash::FxHashMap;

use super::entity::{Entity, EntityId};
use super::tags::GameTag;

/// All known entities, indexed by id.
#[derive(Clone, Debug, Default)]
pub struct EntityStore {
    entities: FxHashMap<EntityId, Entity>,

    /// Highest stream id seen.
    max_id: u32,

    /// Next placeholder offset.
    next_placeholder: u32,
}

impl EntityStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the entity for `id`, creating an empty one if absent.
    pub fn get_or_create(&mut self, id: EntityId) -> &mut Entity {
        if !id.is_placeholder() {
            self.max_id = self.max_id.max(id.raw());
        }
        self.entities.entry(id).or_insert_with(|| Entity::new(id))
    }

    /// Mint a fresh placeholder entity.
    pub fn alloc_placeholder(&mut self) -> &mut Entity {
        let id = EntityId::placeholder(self.next_placeholder);
        self.next_placeholder += 1;
        self.entities.entry(id).or_insert_with(|| Entity::new(id))
    }

    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Set a tag value, creating the entity if needed.
    pub fn set_tag(&mut self, id: EntityId, tag: GameTag, value: i64) {
        self.get_or_create(id).set_tag(tag, value);
    }

    /// Tag value for an entity, 0 if the entity or tag is absent.
    #[must_use]
    pub fn get_tag(&self, id: EntityId, tag: GameTag) -> i64 {
        self.get(id).map_or(0, |e| e.get_tag(tag))
    }

    #[must_use]
    pub fn has_tag(&self, id: EntityId, tag: GameTag) -> bool {
        self.get(id).is_some_and(|e| e.has_tag(tag))
    }

    /// Find the lowest-id entity matching a predicate.
    ///
    /// Linear scan. The lowest id wins so results do not depend on map
    /// iteration order.
    pub fn find<F>(&self, predicate: F) -> Option<&Entity>
    where
        F: Fn(&Entity) -> bool,
    {
        self.entities
            .values()
            .filter(|e| predicate(e))
            .min_by_key(|e| e.id)
    }

    /// Iterate over all entities (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Highest stream id seen since the last reset.
    #[must_use]
    pub fn max_id(&self) -> u32 {
        self.max_id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Drop every entity and both id counters.
    pub fn reset(&mut self) {
        self.entities.clear();
        self.max_id = 0;
        self.next_placeholder = 0;
    }
}
