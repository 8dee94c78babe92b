//! Configuration management for vidtutor

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, TutorError};
use crate::video::SearchCandidate;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listener settings
    pub server: ServerConfig,

    /// Text generation provider
    pub llm: ProviderConfig,

    /// Video search API settings
    pub search: SearchConfig,

    /// Tutoring behaviour
    pub tutor: TutorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Origins allowed by CORS. Empty or "*" allows any origin.
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Ollama,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Which API dialect the endpoint speaks
    pub kind: ProviderKind,

    /// API endpoint URL
    pub endpoint: String,

    /// API key (can be env var reference like $OPENAI_API_KEY)
    pub api_key: String,

    /// Model to use
    pub model: String,

    /// Max tokens for responses
    pub max_tokens: Option<u32>,

    /// Temperature setting
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Base URL of the YouTube Data API
    pub endpoint: String,

    /// API key (can be env var reference like $YOUTUBE_API_KEY)
    pub api_key: String,

    /// Results requested for a chat message
    pub max_results: u32,

    /// Results requested for the random video endpoint
    pub trending_max_results: u32,

    /// Queries the random video endpoint picks from
    pub trending_queries: Vec<String>,
}

/// Prompt tuning profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Math,
    General,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorConfig {
    pub subject: Subject,

    /// Video returned when the search yields nothing usable
    pub fallback_video: FallbackVideo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackVideo {
    pub id: String,
    pub title: String,
    pub views: u64,
}

impl FallbackVideo {
    pub fn to_candidate(&self) -> SearchCandidate {
        SearchCandidate {
            id: self.id.clone(),
            title: self.title.clone(),
            description: String::new(),
            view_count: self.views,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::OpenAi,
            endpoint: "https://api.openai.com/v1".to_string(),
            api_key: "$OPENAI_API_KEY".to_string(),
            model: "gpt-4".to_string(),
            max_tokens: Some(500),
            temperature: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www.googleapis.com/youtube/v3".to_string(),
            api_key: "$YOUTUBE_API_KEY".to_string(),
            max_results: 5,
            trending_max_results: 10,
            trending_queries: ["trending", "popular", "viral", "music", "entertainment"]
                .iter()
                .map(|q| q.to_string())
                .collect(),
        }
    }
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            subject: Subject::Math,
            fallback_video: FallbackVideo::default(),
        }
    }
}

impl Default for FallbackVideo {
    fn default() -> Self {
        Self {
            id: "dQw4w9WgXcQ".to_string(),
            title: "Rick Astley - Never Gonna Give You Up".to_string(),
            views: 1_000_000_000,
        }
    }
}

impl Config {
    /// Load config from file, or defaults when the file does not exist
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vidtutor")
            .join("config.toml")
    }

    /// Key for the text generation provider. Ollama runs without one.
    pub fn llm_api_key(&self) -> Result<Option<String>> {
        match (resolve_api_key(&self.llm.api_key), self.llm.kind) {
            (Some(key), _) => Ok(Some(key)),
            (None, ProviderKind::Ollama) => Ok(None),
            (None, ProviderKind::OpenAi) => {
                Err(TutorError::MissingApiKey(key_label(&self.llm.api_key, "OpenAI")))
            }
        }
    }

    pub fn search_api_key(&self) -> Result<String> {
        resolve_api_key(&self.search.api_key)
            .ok_or_else(|| TutorError::MissingApiKey(key_label(&self.search.api_key, "YouTube")))
    }

    pub fn validate(&self) -> Result<()> {
        if self.search.max_results == 0 || self.search.trending_max_results == 0 {
            return Err(TutorError::Config(
                "search result counts must be at least 1".to_string(),
            ));
        }
        if self.search.trending_queries.is_empty() {
            return Err(TutorError::Config(
                "search.trending_queries cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Resolve an API key (handles env var references)
pub fn resolve_api_key(raw: &str) -> Option<String> {
    if let Some(var) = raw.strip_prefix('$') {
        std::env::var(var).ok().filter(|v| !v.is_empty())
    } else if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

fn key_label(raw: &str, service: &str) -> String {
    match raw.strip_prefix('$') {
        Some(var) => format!("{} (set {})", service, var),
        None => service.to_string(),
    }
}
