//! Error types for vidtutor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TutorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Text generation error: {0}")]
    Provider(String),

    #[error("Video search error: {0}")]
    Search(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Config write error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("No API key configured for {0}")]
    MissingApiKey(String),

    #[error("Message cannot be empty")]
    EmptyMessage,
}

pub type Result<T> = std::result::Result<T, TutorError>;
