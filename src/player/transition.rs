//! Zone transitions observed in the client log.
//!
//! Each variant names one kind of move the log reports for one side. The
//! destination and source rules live here so `PlayerState` can apply every
//! transition through a single path.

use serde::{Deserialize, Serialize};

use crate::core::Side;
use crate::zones::Zone;

/// A zone transition kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    CreateInHand,
    CreateInDeck,
    CreateInPlay,
    BoardToHand,
    BoardToDeck,
    HandDiscard,
    DeckDiscard,
    DeckToPlay,
    Play,
    Draw,
    Mulligan,
    SecretPlayedFromHand,
    SecretPlayedFromDeck,
    SecretTriggered,
    JoustReveal,
    RemoveFromDeck,
    PlayToGraveyard,
    StolenByOpponent,
    StolenFromOpponent,
}

impl Transition {
    pub const ALL: [Transition; 19] = [
        Transition::CreateInHand,
        Transition::CreateInDeck,
        Transition::CreateInPlay,
        Transition::BoardToHand,
        Transition::BoardToDeck,
        Transition::HandDiscard,
        Transition::DeckDiscard,
        Transition::DeckToPlay,
        Transition::Play,
        Transition::Draw,
        Transition::Mulligan,
        Transition::SecretPlayedFromHand,
        Transition::SecretPlayedFromDeck,
        Transition::SecretTriggered,
        Transition::JoustReveal,
        Transition::RemoveFromDeck,
        Transition::PlayToGraveyard,
        Transition::StolenByOpponent,
        Transition::StolenFromOpponent,
    ];

    /// Zone the entity ends up in on this side.
    ///
    /// `None` for transitions that leave the entity untracked here
    /// (removals, the losing end of a steal) or do not move it at all.
    #[must_use]
    pub const fn destination(self) -> Option<Zone> {
        match self {
            Transition::CreateInHand | Transition::BoardToHand | Transition::Draw => {
                Some(Zone::Hand)
            }
            Transition::CreateInDeck | Transition::BoardToDeck | Transition::Mulligan => {
                Some(Zone::Deck)
            }
            Transition::CreateInPlay
            | Transition::DeckToPlay
            | Transition::Play
            | Transition::StolenFromOpponent => Some(Zone::Board),
            Transition::HandDiscard
            | Transition::DeckDiscard
            | Transition::SecretTriggered
            | Transition::PlayToGraveyard => Some(Zone::Graveyard),
            Transition::SecretPlayedFromHand | Transition::SecretPlayedFromDeck => {
                Some(Zone::Secret)
            }
            Transition::JoustReveal
            | Transition::RemoveFromDeck
            | Transition::StolenByOpponent => None,
        }
    }

    /// True when the entity leaves this side's deck.
    #[must_use]
    pub const fn leaves_deck(self) -> bool {
        matches!(
            self,
            Transition::Draw
                | Transition::DeckDiscard
                | Transition::DeckToPlay
                | Transition::SecretPlayedFromDeck
                | Transition::RemoveFromDeck
        )
    }

    /// True when the entity stops being tracked by this side.
    #[must_use]
    pub const fn detaches(self) -> bool {
        matches!(self, Transition::RemoveFromDeck | Transition::StolenByOpponent)
    }

    #[must_use]
    pub const fn is_steal(self) -> bool {
        matches!(self, Transition::StolenByOpponent | Transition::StolenFromOpponent)
    }

    /// Whether an event of this kind is dropped without a card id.
    ///
    /// Only the local player's hidden-information moves need one; opponent
    /// cards are routinely unrevealed.
    #[must_use]
    pub const fn requires_card_id(self, side: Side) -> bool {
        if !side.is_player() {
            return matches!(self, Transition::JoustReveal);
        }
        matches!(
            self,
            Transition::CreateInHand
                | Transition::CreateInDeck
                | Transition::BoardToHand
                | Transition::BoardToDeck
                | Transition::Play
                | Transition::HandDiscard
                | Transition::SecretPlayedFromHand
                | Transition::SecretPlayedFromDeck
                | Transition::Mulligan
                | Transition::Draw
                | Transition::JoustReveal
        )
    }
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destinations() {
        assert_eq!(Transition::Draw.destination(), Some(Zone::Hand));
        assert_eq!(Transition::Mulligan.destination(), Some(Zone::Deck));
        assert_eq!(Transition::Play.destination(), Some(Zone::Board));
        assert_eq!(Transition::SecretTriggered.destination(), Some(Zone::Graveyard));
        assert_eq!(Transition::SecretPlayedFromDeck.destination(), Some(Zone::Secret));
        assert_eq!(Transition::JoustReveal.destination(), None);
        assert_eq!(Transition::RemoveFromDeck.destination(), None);
    }

    #[test]
    fn test_every_transition_moves_detaches_or_reveals() {
        for t in Transition::ALL {
            let moves = t.destination().is_some();
            assert!(
                moves || t.detaches() || t == Transition::JoustReveal,
                "{} has no effect",
                t
            );
            assert!(!(moves && t.detaches()), "{} both moves and detaches", t);
        }
    }

    #[test]
    fn test_opponent_never_needs_card_ids_for_moves() {
        for t in Transition::ALL {
            if t != Transition::JoustReveal {
                assert!(!t.requires_card_id(Side::Opponent), "{}", t);
            }
        }
    }

    #[test]
    fn test_player_card_id_requirements() {
        assert!(Transition::Draw.requires_card_id(Side::Player));
        assert!(Transition::CreateInDeck.requires_card_id(Side::Player));
        assert!(!Transition::DeckDiscard.requires_card_id(Side::Player));
        assert!(!Transition::StolenByOpponent.requires_card_id(Side::Player));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Transition::SecretPlayedFromHand).unwrap();
        assert_eq!(json, "\"secret_played_from_hand\"");
    }
}
