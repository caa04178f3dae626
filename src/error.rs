use thiserror::Error;

#[derive(Debug, Error)]
pub enum SlackRecordError {
    #[error("Message formatter error: {0}")]
    Formatter(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SlackRecordError>;
