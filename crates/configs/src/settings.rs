//! Settings are resolved in this order, later sources winning:
//! 1. built-in defaults
//! 2. `config/forum.toml` (optional)
//! 3. environment, e.g. `FORUM_ENGINE__SEARCH_LIMIT=25`
//!
//! A `.env` file in the working directory is loaded into the environment first.

use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

/// Search never returns more than this many threads.
pub const MAX_SEARCH_LIMIT: usize = 50;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub default_page_size: usize,
    pub max_page_size: usize,
    pub search_limit: usize,
    pub trending_window_hours: i64,
    pub online_window_minutes: i64,
    /// Reject registrations whose username is already taken (case-insensitive).
    pub unique_usernames: bool,
    pub max_title_len: usize,
    pub max_content_len: usize,
    pub max_tags: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
            search_limit: 50,
            trending_window_hours: 24,
            online_window_minutes: 15,
            unique_usernames: true,
            max_title_len: 200,
            max_content_len: 100 * 1024,
            max_tags: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReputationSettings {
    pub thread_created: u64,
    pub reply_created: u64,
    pub engagement: u64,
}

impl Default for ReputationSettings {
    fn default() -> Self {
        Self {
            thread_created: 5,
            reply_created: 1,
            engagement: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Used when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub snapshot_path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("./data/forum.json"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub engine: EngineSettings,
    pub reputation: ReputationSettings,
    pub logging: LoggingSettings,
    pub storage: StorageSettings,
}

impl Settings {
    /// Loads `.env`, then `config/forum.toml`, then `FORUM_*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_sources("config/forum", Environment::with_prefix("FORUM"))
    }

    /// `file` is a path without extension; a missing file is not an error.
    pub fn from_sources(file: &str, env: Environment) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::with_name(file).required(false))
            .add_source(env.prefix_separator("_").separator("__").try_parsing(true))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let engine = &self.engine;
        if engine.default_page_size == 0 || engine.max_page_size == 0 {
            return Err(ConfigError::Invalid("page sizes must be positive".into()));
        }
        if engine.default_page_size > engine.max_page_size {
            return Err(ConfigError::Invalid(
                "default_page_size cannot exceed max_page_size".into(),
            ));
        }
        if engine.search_limit == 0 || engine.search_limit > MAX_SEARCH_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "search_limit must be between 1 and {MAX_SEARCH_LIMIT}"
            )));
        }
        if engine.trending_window_hours <= 0 || engine.online_window_minutes <= 0 {
            return Err(ConfigError::Invalid("time windows must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("FORUM").source(Some(map))
    }

    #[test]
    fn defaults_apply_without_sources() {
        let settings = Settings::from_sources("does/not/exist", env(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.engine.search_limit, 50);
        assert!(settings.engine.unique_usernames);
    }

    #[test]
    fn environment_overrides_defaults() {
        let settings = Settings::from_sources(
            "does/not/exist",
            env(&[
                ("FORUM_ENGINE__SEARCH_LIMIT", "25"),
                ("FORUM_ENGINE__UNIQUE_USERNAMES", "false"),
                ("FORUM_LOGGING__JSON", "true"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.engine.search_limit, 25);
        assert!(!settings.engine.unique_usernames);
        assert!(settings.logging.json);
        assert_eq!(settings.engine.default_page_size, 20);
    }

    #[test]
    fn rejects_inconsistent_page_sizes() {
        let err = Settings::from_sources(
            "does/not/exist",
            env(&[("FORUM_ENGINE__DEFAULT_PAGE_SIZE", "500")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_search_limit_above_cap() {
        let err = Settings::from_sources(
            "does/not/exist",
            env(&[("FORUM_ENGINE__SEARCH_LIMIT", "100")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let zero = Settings::from_sources(
            "does/not/exist",
            env(&[("FORUM_ENGINE__SEARCH_LIMIT", "0")]),
        );
        assert!(zero.is_err());
    }
}
