//! Deck collaborator: the active deck list.
//!
//! A deck is an ordered list of `(card id, copy count)` entries owned by
//! whatever manages decks. The tracker reads it once when it is assigned
//! and never mutates it.

use serde::{Deserialize, Serialize};

use super::definition::CardId;

/// One deck-list line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckEntry {
    pub card_id: CardId,
    pub count: u32,
}

/// A deck list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub name: String,
    pub cards: Vec<DeckEntry>,
}

impl Deck {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cards: Vec::new(),
        }
    }

    /// Add `count` copies of a card (builder pattern).
    #[must_use]
    pub fn with_card(mut self, card_id: impl Into<CardId>, count: u32) -> Self {
        self.cards.push(DeckEntry {
            card_id: card_id.into(),
            count,
        });
        self
    }

    /// Card ids expanded per copy, in list order.
    pub fn expanded(&self) -> impl Iterator<Item = &CardId> {
        self.cards
            .iter()
            .flat_map(|entry| std::iter::repeat(&entry.card_id).take(entry.count as usize))
    }

    /// Total number of cards.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.cards.iter().map(|e| e.count as usize).sum()
    }
}
