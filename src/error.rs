//! Error types for Velg.

use thiserror::Error;

/// Library-level error type for Velg operations.
#[derive(Error, Debug)]
pub enum VelgError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Audio capture error: {0}")]
    Audio(String),

    #[error("Voice recognition failed: {0}")]
    Voice(String),

    #[error("Video search failed: {0}")]
    Search(String),

    #[error("Recommendation failed: {0}")]
    Recommend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),
}

/// Result type alias for Velg operations.
pub type Result<T> = std::result::Result<T, VelgError>;
