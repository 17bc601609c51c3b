//! Core tracker types: entities, tags, sides, the entity store, configuration.
//!
//! These are the leaves every other module builds on. Nothing here knows
//! about zones transitions or match flow.

pub mod entity;
pub mod tags;
pub mod side;
pub mod store;
pub mod config;

pub use entity::{Entity, EntityId};
pub use tags::{GameTag, Mulligan, TagMap};
pub use side::{Side, SideMap};
pub use store::EntityStore;
pub use config::TrackerConfig;
