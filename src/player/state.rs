//! One side's view of the match.
//!
//! `PlayerState` owns the side's zone containers and applies every
//! transition the log reports for that side:
//!
//! 1. drop the event if it lacks a card id the transition needs,
//! 2. reveal the card id on the entity and count it,
//! 3. move the entity (removing it from its current container first),
//! 4. notify the side's tracker.
//!
//! Entities live in the `EntityStore`; zones hold ids only. The caller is
//! responsible for releasing an entity from the *other* side first when an
//! event moves it across sides (see `Game`).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::transition::Transition;
use crate::cards::CardId;
use crate::core::{EntityId, EntityStore, Side};
use crate::tracker::{PlayerView, SideTracker};
use crate::zones::{Zone, ZoneSet};

/// Why an event was dropped without touching state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// The transition needs a card id and the event had none.
    MissingCardId,
    /// A detection result from a loop that was cancelled or superseded.
    StaleDetection,
    /// The event targets state that does not exist yet.
    UnknownEntity,
    /// A stream id inside the locally reserved placeholder range.
    ReservedEntityId,
}

/// Outcome of applying one event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Applied {
    /// The entity changed containers (`None` = not held by this side).
    Moved { from: Option<Zone>, to: Option<Zone> },
    /// Only the card id changed.
    Revealed,
    /// Non-zone state changed (tags, names, results, ...).
    Updated,
    Ignored(IgnoreReason),
}

impl Applied {
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self, Applied::Ignored(_))
    }
}

/// Zone contents and identity of one side.
pub struct PlayerState {
    side: Side,

    /// Value of the side's `PLAYER_ID` tag, once seen.
    pub id: Option<i64>,

    pub name: Option<String>,

    /// Hero card id; the class comes from the card-metadata collaborator.
    pub hero: Option<CardId>,

    zones: ZoneSet,
    fatigue: i64,

    /// How many entities of each card id this side has revealed.
    revealed: FxHashMap<CardId, u32>,

    coin_card_id: CardId,
    tracker: Option<Box<dyn SideTracker>>,
}

impl std::fmt::Debug for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerState")
            .field("side", &self.side)
            .field("id", &self.id)
            .field("name", &self.name)
            .field("hero", &self.hero)
            .field("zones", &self.zones)
            .field("fatigue", &self.fatigue)
            .field("tracker", &self.tracker.is_some())
            .finish()
    }
}

impl PlayerState {
    #[must_use]
    pub fn new(side: Side, coin_card_id: CardId) -> Self {
        Self {
            side,
            id: None,
            name: None,
            hero: None,
            zones: ZoneSet::new(),
            fatigue: 0,
            revealed: FxHashMap::default(),
            coin_card_id,
            tracker: None,
        }
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Attach the push sink for this side. Survives `reset`.
    pub fn attach_tracker(&mut self, tracker: Box<dyn SideTracker>) {
        self.tracker = Some(tracker);
    }

    #[must_use]
    pub fn has_tracker(&self) -> bool {
        self.tracker.is_some()
    }

    #[must_use]
    pub fn zones(&self) -> &ZoneSet {
        &self.zones
    }

    #[must_use]
    pub fn fatigue(&self) -> i64 {
        self.fatigue
    }

    /// Number of entities revealed with `card_id` on this side.
    #[must_use]
    pub fn revealed_count(&self, card_id: &CardId) -> u32 {
        self.revealed.get(card_id).copied().unwrap_or(0)
    }

    /// Clear everything match-scoped. The tracker stays attached.
    pub fn reset(&mut self) {
        self.id = None;
        self.name = None;
        self.hero = None;
        self.zones.clear();
        self.fatigue = 0;
        self.revealed.clear();
    }

    pub fn game_start(&self) {
        if let Some(tracker) = &self.tracker {
            tracker.game_start();
        }
    }

    pub fn game_end(&self) {
        if let Some(tracker) = &self.tracker {
            tracker.game_end();
        }
    }

    /// Snapshot for trackers.
    #[must_use]
    pub fn view(&self) -> PlayerView {
        PlayerView {
            side: self.side,
            name: self.name.clone(),
            hero: self.hero.clone(),
            fatigue: self.fatigue,
            hand: self.zones.entities(Zone::Hand).clone(),
            deck: self.zones.entities(Zone::Deck).clone(),
            board: self.zones.entities(Zone::Board).clone(),
            graveyard: self.zones.entities(Zone::Graveyard).clone(),
            secret: self.zones.entities(Zone::Secret).clone(),
        }
    }

    fn notify(&self) {
        if let Some(tracker) = &self.tracker {
            tracker.update(&self.view());
        }
    }

    /// Apply a transition to entity `id`.
    ///
    /// An empty card id counts as missing.
    pub fn apply(
        &mut self,
        store: &mut EntityStore,
        transition: Transition,
        id: EntityId,
        card_id: Option<&CardId>,
        turn: u32,
    ) -> Applied {
        let card_id = card_id.filter(|c| !c.is_empty());

        if card_id.is_none() && transition.requires_card_id(self.side) {
            debug!(side = %self.side, %transition, entity = %id, turn, "dropped: no card id");
            return Applied::Ignored(IgnoreReason::MissingCardId);
        }

        // The coin is created by the game, not drawn from the deck.
        let transition = match (transition, card_id) {
            (Transition::Draw, Some(c)) if self.side.is_player() && *c == self.coin_card_id => {
                Transition::CreateInHand
            }
            _ => transition,
        };

        if let Some(card_id) = card_id {
            self.reveal(store, id, card_id);
        }

        if transition == Transition::JoustReveal {
            self.notify();
            return Applied::Revealed;
        }

        if transition.leaves_deck() && self.zones.locate(id) != Some(Zone::Deck) {
            if let Some(card_id) = card_id {
                self.consume_placeholder(store, card_id);
            }
        }

        if transition == Transition::StolenByOpponent && self.zones.locate(id) != Some(Zone::Board) {
            warn!(side = %self.side, entity = %id, turn, "stolen entity was not on the board");
        }

        let (from, to) = match transition.destination() {
            Some(zone) => (self.zones.place(id, zone), Some(zone)),
            None => (self.zones.remove(id), None),
        };

        let entity = store.get_or_create(id);
        entity.zone = to;
        entity.is_secret = to == Some(Zone::Secret);
        if to.is_some() {
            entity.is_player = self.side.is_player();
        }

        debug!(side = %self.side, %transition, entity = %id, ?from, ?to, turn, "zone transition");
        self.notify();
        Applied::Moved { from, to }
    }

    /// Drop an entity from this side without a transition.
    ///
    /// Used when another side takes over an entity this side still holds.
    pub fn release(&mut self, store: &mut EntityStore, id: EntityId) -> Option<Zone> {
        let zone = self.zones.remove(id)?;
        if let Some(entity) = store.get_mut(id) {
            entity.zone = None;
        }
        self.notify();
        Some(zone)
    }

    /// Seed one known deck card as a placeholder entity.
    pub fn reveal_deck_card(&mut self, store: &mut EntityStore, card_id: &CardId) -> EntityId {
        let placeholder = store.alloc_placeholder();
        placeholder.card_id = Some(card_id.clone());
        placeholder.is_player = self.side.is_player();
        placeholder.zone = Some(Zone::Deck);
        let id = placeholder.id;
        self.zones.place(id, Zone::Deck);
        self.notify();
        id
    }

    /// Remove every placeholder from the deck.
    pub fn clear_placeholders(&mut self, store: &mut EntityStore) -> usize {
        let mut removed = 0;
        while let Some(id) = self.zones.remove_first(Zone::Deck, |e| e.is_placeholder()) {
            if let Some(entity) = store.get_mut(id) {
                entity.zone = None;
            }
            removed += 1;
        }
        removed
    }

    pub fn set_name(&mut self, name: String) {
        self.name = Some(name);
        self.notify();
    }

    pub fn set_hero(&mut self, hero: CardId) {
        self.hero = Some(hero);
        self.notify();
    }

    pub fn set_fatigue(&mut self, value: i64) {
        self.fatigue = value;
        self.notify();
    }

    fn reveal(&mut self, store: &mut EntityStore, id: EntityId, card_id: &CardId) {
        let entity = store.get_or_create(id);
        if entity.card_id.as_ref() == Some(card_id) {
            return;
        }
        if !entity.has_card_id() {
            *self.revealed.entry(card_id.clone()).or_insert(0) += 1;
        }
        entity.card_id = Some(card_id.clone());
    }

    /// A revealed entity left the deck without being tracked there: the
    /// deck list predicted it, so retire one matching placeholder.
    fn consume_placeholder(&mut self, store: &mut EntityStore, card_id: &CardId) {
        let is_match = |e: EntityId| {
            e.is_placeholder() && store.get(e).is_some_and(|p| p.card_id.as_ref() == Some(card_id))
        };
        if let Some(placeholder) = self.zones.remove_first(Zone::Deck, is_match) {
            if let Some(entity) = store.get_mut(placeholder) {
                entity.zone = None;
            }
        }
    }

    // === Named transitions ===

    pub fn create_in_hand(&mut self, store: &mut EntityStore, id: EntityId, card_id: Option<&CardId>, turn: u32) -> Applied {
        self.apply(store, Transition::CreateInHand, id, card_id, turn)
    }

    pub fn create_in_deck(&mut self, store: &mut EntityStore, id: EntityId, card_id: Option<&CardId>, turn: u32) -> Applied {
        self.apply(store, Transition::CreateInDeck, id, card_id, turn)
    }

    pub fn create_in_play(&mut self, store: &mut EntityStore, id: EntityId, card_id: Option<&CardId>, turn: u32) -> Applied {
        self.apply(store, Transition::CreateInPlay, id, card_id, turn)
    }

    pub fn board_to_hand(&mut self, store: &mut EntityStore, id: EntityId, card_id: Option<&CardId>, turn: u32) -> Applied {
        self.apply(store, Transition::BoardToHand, id, card_id, turn)
    }

    pub fn board_to_deck(&mut self, store: &mut EntityStore, id: EntityId, card_id: Option<&CardId>, turn: u32) -> Applied {
        self.apply(store, Transition::BoardToDeck, id, card_id, turn)
    }

    pub fn hand_discard(&mut self, store: &mut EntityStore, id: EntityId, card_id: Option<&CardId>, turn: u32) -> Applied {
        self.apply(store, Transition::HandDiscard, id, card_id, turn)
    }

    pub fn deck_discard(&mut self, store: &mut EntityStore, id: EntityId, card_id: Option<&CardId>, turn: u32) -> Applied {
        self.apply(store, Transition::DeckDiscard, id, card_id, turn)
    }

    pub fn deck_to_play(&mut self, store: &mut EntityStore, id: EntityId, card_id: Option<&CardId>, turn: u32) -> Applied {
        self.apply(store, Transition::DeckToPlay, id, card_id, turn)
    }

    pub fn play(&mut self, store: &mut EntityStore, id: EntityId, card_id: Option<&CardId>, turn: u32) -> Applied {
        self.apply(store, Transition::Play, id, card_id, turn)
    }

    pub fn draw(&mut self, store: &mut EntityStore, id: EntityId, card_id: Option<&CardId>, turn: u32) -> Applied {
        self.apply(store, Transition::Draw, id, card_id, turn)
    }

    pub fn mulligan(&mut self, store: &mut EntityStore, id: EntityId, card_id: Option<&CardId>, turn: u32) -> Applied {
        self.apply(store, Transition::Mulligan, id, card_id, turn)
    }

    pub fn secret_played(&mut self, store: &mut EntityStore, id: EntityId, card_id: Option<&CardId>, turn: u32, from_deck: bool) -> Applied {
        let transition = if from_deck {
            Transition::SecretPlayedFromDeck
        } else {
            Transition::SecretPlayedFromHand
        };
        self.apply(store, transition, id, card_id, turn)
    }

    pub fn secret_triggered(&mut self, store: &mut EntityStore, id: EntityId, card_id: Option<&CardId>, turn: u32) -> Applied {
        self.apply(store, Transition::SecretTriggered, id, card_id, turn)
    }

    pub fn joust_reveal(&mut self, store: &mut EntityStore, id: EntityId, card_id: Option<&CardId>, turn: u32) -> Applied {
        self.apply(store, Transition::JoustReveal, id, card_id, turn)
    }

    pub fn remove_from_deck(&mut self, store: &mut EntityStore, id: EntityId, card_id: Option<&CardId>, turn: u32) -> Applied {
        self.apply(store, Transition::RemoveFromDeck, id, card_id, turn)
    }

    pub fn play_to_graveyard(&mut self, store: &mut EntityStore, id: EntityId, card_id: Option<&CardId>, turn: u32) -> Applied {
        self.apply(store, Transition::PlayToGraveyard, id, card_id, turn)
    }

    pub fn stolen_by_opponent(&mut self, store: &mut EntityStore, id: EntityId, turn: u32) -> Applied {
        self.apply(store, Transition::StolenByOpponent, id, None, turn)
    }

    pub fn stolen_from_opponent(&mut self, store: &mut EntityStore, id: EntityId, turn: u32) -> Applied {
        self.apply(store, Transition::StolenFromOpponent, id, None, turn)
    }
}
