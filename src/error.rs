use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Match engine is no longer accepting events")]
    EngineClosed,

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
