//! Configuration settings for Velg.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub voice: VoiceSettings,
    pub search: SearchSettings,
    pub recommend: RecommendSettings,
    pub prompts: PromptSettings,
}


/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Voice capture and speech recognition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    /// Transcription model for speech recognition.
    pub model: String,
    /// Language hint for the recognizer (ISO-639-1 code).
    pub language: String,
    /// Seconds to wait for speech to start before giving up.
    pub listen_timeout_seconds: u64,
    /// Maximum length of a captured phrase, in seconds.
    pub phrase_limit_seconds: u64,
    /// Milliseconds of ambient audio sampled to calibrate the noise floor.
    pub calibration_ms: u64,
    /// Milliseconds of trailing silence that end a phrase early.
    pub silence_tail_ms: u64,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            model: "whisper-1".to_string(),
            language: "en".to_string(),
            listen_timeout_seconds: 8,
            phrase_limit_seconds: 7,
            calibration_ms: 500,
            silence_tail_ms: 900,
        }
    }
}

/// YouTube search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// YouTube Data API key. The YOUTUBE_API_KEY environment variable
    /// takes precedence.
    pub api_key: Option<String>,
    /// Only consider videos published within this many days.
    pub published_within_days: i64,
    /// Maximum number of search results to request from the API.
    pub max_results: u32,
    /// Minimum video duration in minutes (inclusive).
    pub min_minutes: f64,
    /// Maximum video duration in minutes (inclusive).
    pub max_minutes: f64,
    /// Maximum number of candidates kept after filtering.
    pub max_candidates: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            published_within_days: 20,
            max_results: 50,
            min_minutes: 4.0,
            max_minutes: 25.0,
            max_candidates: 20,
        }
    }
}

impl SearchSettings {
    /// Resolve the YouTube API key from the environment or the config file.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var("YOUTUBE_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.is_empty()))
    }
}

/// Recommendation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendSettings {
    /// LLM model for picking the best title.
    pub model: String,
    /// Sampling temperature for the recommendation request.
    pub temperature: f32,
}

impl Default for RecommendSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}


impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::VelgError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("velg")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_pipeline_contract() {
        let settings = Settings::default();
        assert_eq!(settings.search.published_within_days, 20);
        assert_eq!(settings.search.max_results, 50);
        assert_eq!(settings.search.min_minutes, 4.0);
        assert_eq!(settings.search.max_minutes, 25.0);
        assert_eq!(settings.search.max_candidates, 20);
        assert_eq!(settings.voice.listen_timeout_seconds, 8);
        assert_eq!(settings.voice.phrase_limit_seconds, 7);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [search]
            published_within_days = 7
            "#,
        )
        .unwrap();
        assert_eq!(settings.search.published_within_days, 7);
        assert_eq!(settings.search.max_candidates, 20);
        assert_eq!(settings.recommend.model, "gpt-4o-mini");
    }
}
