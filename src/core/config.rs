//! Tracker configuration.
//!
//! Timing bounds for post-match mode detection and the few card/entity
//! names the tracker keys off. Every field has a default, so a partial
//! JSON document is a valid configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::error::TrackerError;

/// Tracker configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// How long after the last asset unload mode detection keeps waiting.
    #[serde(with = "millis")]
    pub mode_timeout: Duration,

    /// How long after the last asset unload a ranked match waits for its rank.
    #[serde(with = "millis")]
    pub rank_timeout: Duration,

    /// Detection loop tick.
    #[serde(with = "millis")]
    pub poll_interval: Duration,

    /// Hard ceiling for any single detection loop.
    /// Bounds mode detection when no asset unload is ever observed.
    #[serde(with = "millis")]
    pub max_detection_wait: Duration,

    /// Card id of the coin handed to the second player.
    pub coin_card_id: CardId,

    /// Log name of the match root entity.
    pub match_root_name: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            mode_timeout: Duration::from_secs(3),
            rank_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(100),
            max_detection_wait: Duration::from_secs(60),
            coin_card_id: CardId::new("GAME_005"),
            match_root_name: "GameEntity".to_string(),
        }
    }
}

impl TrackerConfig {
    pub fn with_mode_timeout(mut self, timeout: Duration) -> Self {
        self.mode_timeout = timeout;
        self
    }

    pub fn with_rank_timeout(mut self, timeout: Duration) -> Self {
        self.rank_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_detection_wait(mut self, ceiling: Duration) -> Self {
        self.max_detection_wait = ceiling;
        self
    }

    /// Reject settings that would spin or never poll.
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.poll_interval.is_zero() {
            return Err(TrackerError::Config {
                message: "poll_interval must be greater than zero".to_string(),
            });
        }
        if self.max_detection_wait.is_zero() {
            return Err(TrackerError::Config {
                message: "max_detection_wait must be greater than zero".to_string(),
            });
        }
        if self.coin_card_id.is_empty() {
            return Err(TrackerError::Config {
                message: "coin_card_id must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, TrackerError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TrackerConfig::default();
        assert_eq!(config.mode_timeout, Duration::from_secs(3));
        assert_eq!(config.rank_timeout, Duration::from_secs(5));
        assert_eq!(config.poll_interval, Duration::from_millis(100));
        assert_eq!(config.coin_card_id, CardId::new("GAME_005"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = TrackerConfig::default()
            .with_mode_timeout(Duration::from_secs(1))
            .with_rank_timeout(Duration::from_secs(2))
            .with_poll_interval(Duration::from_millis(10));

        assert_eq!(config.mode_timeout, Duration::from_secs(1));
        assert_eq!(config.rank_timeout, Duration::from_secs(2));
        assert_eq!(config.poll_interval, Duration::from_millis(10));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = TrackerConfig::from_json_str(r#"{"rank_timeout": 750}"#).unwrap();
        assert_eq!(config.rank_timeout, Duration::from_millis(750));
        assert_eq!(config.mode_timeout, Duration::from_secs(3));
        assert_eq!(config.match_root_name, "GameEntity");
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let err = TrackerConfig::from_json_str(r#"{"poll_interval": 0}"#).unwrap_err();
        assert!(matches!(err, TrackerError::Config { .. }));
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        let err = TrackerConfig::from_json_str("{").unwrap_err();
        assert!(matches!(err, TrackerError::Decode(_)));
    }

    #[test]
    fn test_serialization() {
        let config = TrackerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: TrackerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
