//! Inbound event records.
//!
//! The log parser turns client log lines into `GameEvent`s and posts them,
//! in observed order, to the match engine. Detection loops post their
//! completion through the same queue as `DetectionFinished`.
//!
//! Events are plain data with a serde representation tagged by `kind`, so
//! a parser running elsewhere can ship them as JSON lines.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::{EntityId, GameTag, Side};
use crate::detection::DetectionReport;
use crate::game::GameMode;
use crate::player::Transition;

/// A zone transition for one side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneEvent {
    pub side: Side,
    pub transition: Transition,
    pub entity: EntityId,
    #[serde(default)]
    pub card_id: Option<CardId>,
    #[serde(default)]
    pub turn: u32,
}

impl ZoneEvent {
    pub fn new(side: Side, transition: Transition, entity: impl Into<EntityId>) -> Self {
        Self {
            side,
            transition,
            entity: entity.into(),
            card_id: None,
            turn: 0,
        }
    }

    /// Set the revealed card id (builder pattern).
    #[must_use]
    pub fn with_card(mut self, card_id: impl Into<CardId>) -> Self {
        self.card_id = Some(card_id.into());
        self
    }

    /// Set the turn the move happened on (builder pattern).
    #[must_use]
    pub fn on_turn(mut self, turn: u32) -> Self {
        self.turn = turn;
        self
    }
}

/// Everything the match state machine consumes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEvent {
    Start,
    End,

    /// An entity appeared in the log.
    EntityCreated {
        entity: EntityId,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        card_id: Option<CardId>,
        #[serde(default)]
        side: Option<Side>,
    },

    TagChange {
        entity: EntityId,
        tag: GameTag,
        value: i64,
    },

    Zone(ZoneEvent),

    Fatigue {
        side: Side,
        value: i64,
    },

    SetHero {
        side: Side,
        card_id: CardId,
    },

    SetName {
        side: Side,
        name: String,
    },

    SetRank {
        rank: i64,
    },

    SetGameMode {
        mode: GameMode,
    },

    /// The client unloaded assets (it does this around menu changes).
    AssetUnload,

    /// A side announced its mulligan choice.
    MulliganDeclare {
        side: Side,
    },

    TurnStart {
        side: Side,
        turn: u32,
    },

    Win,
    Loss,
    Tied,
    Concede,

    DetectionFinished {
        report: DetectionReport,
    },
}

impl GameEvent {
    /// Shorthand for a zone transition event.
    pub fn zone(side: Side, transition: Transition, entity: impl Into<EntityId>) -> ZoneEvent {
        ZoneEvent::new(side, transition, entity)
    }

    pub fn tag(entity: impl Into<EntityId>, tag: GameTag, value: i64) -> Self {
        GameEvent::TagChange {
            entity: entity.into(),
            tag,
            value,
        }
    }

    /// Stream entity the event refers to, if any.
    #[must_use]
    pub fn entity(&self) -> Option<EntityId> {
        match self {
            GameEvent::EntityCreated { entity, .. } | GameEvent::TagChange { entity, .. } => Some(*entity),
            GameEvent::Zone(event) => Some(event.entity),
            _ => None,
        }
    }

    /// Parse one JSON-encoded event.
    pub fn from_json_str(json: &str) -> Result<Self, crate::error::TrackerError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<ZoneEvent> for GameEvent {
    fn from(event: ZoneEvent) -> Self {
        GameEvent::Zone(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_builder() {
        let event = GameEvent::zone(Side::Player, Transition::Draw, 12u32)
            .with_card("CS2_029")
            .on_turn(3);
        assert_eq!(event.entity, EntityId(12));
        assert_eq!(event.card_id, Some(CardId::new("CS2_029")));
        assert_eq!(event.turn, 3);
    }

    #[test]
    fn test_zone_event_json() {
        let json = r#"{"kind":"zone","side":"opponent","transition":"play","entity":40,"turn":5}"#;
        let event = GameEvent::from_json_str(json).unwrap();
        let expected: GameEvent = ZoneEvent::new(Side::Opponent, Transition::Play, 40u32)
            .on_turn(5)
            .into();
        assert_eq!(event, expected);
    }

    #[test]
    fn test_tag_change_json() {
        let json = r#"{"kind":"tag_change","entity":1,"tag":"TURN","value":3}"#;
        let event = GameEvent::from_json_str(json).unwrap();
        assert_eq!(event, GameEvent::tag(1u32, GameTag::Turn, 3));
    }

    #[test]
    fn test_unit_events_json() {
        assert_eq!(GameEvent::from_json_str(r#"{"kind":"start"}"#).unwrap(), GameEvent::Start);
        assert_eq!(
            GameEvent::from_json_str(r#"{"kind":"set_game_mode","mode":"arena"}"#).unwrap(),
            GameEvent::SetGameMode { mode: GameMode::Arena }
        );
    }

    #[test]
    fn test_unknown_kind_is_decode_error() {
        assert!(GameEvent::from_json_str(r#"{"kind":"teleport"}"#).is_err());
    }

    #[test]
    fn test_entity_of_event() {
        assert_eq!(GameEvent::tag(7u32, GameTag::Zone, 1).entity(), Some(EntityId(7)));
        let zone: GameEvent = GameEvent::zone(Side::Player, Transition::Play, 9u32).into();
        assert_eq!(zone.entity(), Some(EntityId(9)));
        assert_eq!(GameEvent::Win.entity(), None);
    }

    #[test]
    fn test_round_trip() {
        let event = GameEvent::EntityCreated {
            entity: EntityId(2),
            name: Some("BehEh#1355".into()),
            card_id: None,
            side: Some(Side::Player),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(GameEvent::from_json_str(&json).unwrap(), event);
    }
}
