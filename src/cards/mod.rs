//! Card identity and the two card-related collaborators.
//!
//! ## Key Types
//!
//! - `CardId`: Client identifier for a card design
//! - `CardMetadata`: Display data (name, cost, rarity)
//! - `CardCatalog`: Metadata lookup seam, used only for log output
//! - `Deck`: Active deck list, read once to seed the player's deck zone

pub mod definition;
pub mod registry;
pub mod deck;

pub use definition::{CardId, CardMetadata};
pub use registry::{CardCatalog, StaticCatalog};
pub use deck::{Deck, DeckEntry};
