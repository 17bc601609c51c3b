//! Card identifiers and display metadata.
//!
//! A `CardId` is the client's string identifier for a card design
//! (`"EX1_066"`, `"GAME_005"`). Entities reveal one when the card becomes
//! visible. `CardMetadata` is what a catalog knows about the design; the
//! tracker only ever prints it.

use serde::{Deserialize, Serialize};

/// Identifier of a card design, as printed by the game client.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for CardId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CardId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display data for a card design.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardMetadata {
    pub id: CardId,
    pub name: String,
    #[serde(default)]
    pub cost: i32,
    #[serde(default)]
    pub rarity: Option<String>,
}

impl CardMetadata {
    pub fn new(id: impl Into<CardId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cost: 0,
            rarity: None,
        }
    }

    #[must_use]
    pub fn with_cost(mut self, cost: i32) -> Self {
        self.cost = cost;
        self
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: impl Into<String>) -> Self {
        self.rarity = Some(rarity.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id_from_str() {
        let id: CardId = "EX1_066".into();
        assert_eq!(id.as_str(), "EX1_066");
        assert_eq!(format!("{}", id), "EX1_066");
        assert!(!id.is_empty());
        assert!(CardId::new("").is_empty());
    }

    #[test]
    fn test_card_id_is_a_plain_json_string() {
        let id = CardId::new("GAME_005");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"GAME_005\"");
    }

    #[test]
    fn test_metadata_builder() {
        let card = CardMetadata::new("CS2_029", "Fireball")
            .with_cost(4)
            .with_rarity("FREE");
        assert_eq!(card.cost, 4);
        assert_eq!(card.rarity.as_deref(), Some("FREE"));
    }
}
