//! Zone containers.
//!
//! Each side of the match owns one `ZoneSet`: hand, deck, board, graveyard
//! and secret containers, each an ordered sequence of entity ids.
//!
//! ## Key Types
//!
//! - `Zone`: Which container
//! - `ZoneSet`: The five containers of one side, with exclusive membership

pub mod manager;

pub use manager::{Zone, ZoneSet};
