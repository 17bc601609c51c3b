//! Card-metadata collaborator.
//!
//! The tracker never decides anything from card metadata; it looks names up
//! only to make log lines readable. `CardCatalog` is the seam an
//! application plugs its card database into. `StaticCatalog` is an
//! in-memory implementation for tests and small tools.

use rustc_hash::FxHashMap;

use super::definition::{CardId, CardMetadata};

/// Card id to display metadata lookup.
pub trait CardCatalog: Send + Sync {
    fn get(&self, id: &CardId) -> Option<&CardMetadata>;

    /// Display name, if the card is known.
    fn name(&self, id: &CardId) -> Option<&str> {
        self.get(id).map(|c| c.name.as_str())
    }
}

/// In-memory catalog.
///
/// ```
/// use hs_match_tracker::cards::{CardCatalog, CardId, CardMetadata, StaticCatalog};
///
/// let mut catalog = StaticCatalog::new();
/// catalog.register(CardMetadata::new("HERO_08", "Jaina Proudmoore"));
///
/// assert_eq!(catalog.name(&CardId::new("HERO_08")), Some("Jaina Proudmoore"));
/// assert_eq!(catalog.name(&CardId::new("HERO_01")), None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    cards: FxHashMap<CardId, CardMetadata>,
}

impl StaticCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card, replacing any previous entry with the same id.
    pub fn register(&mut self, card: CardMetadata) {
        self.cards.insert(card.id.clone(), card);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl FromIterator<CardMetadata> for StaticCatalog {
    fn from_iter<I: IntoIterator<Item = CardMetadata>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for card in iter {
            catalog.register(card);
        }
        catalog
    }
}

impl CardCatalog for StaticCatalog {
    fn get(&self, id: &CardId) -> Option<&CardMetadata> {
        self.cards.get(id)
    }
}
