use crate::error::{Result, StorylineError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for the viewer
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// Base URL of the story API / CDN
    pub api_url: ConfigValue<Option<String>>,
    /// Append `?v={lastUpdate}` to asset URLs
    pub cache_busting: ConfigValue<bool>,
    /// Fetch GPS tracks; off for compact presentations that never show a map
    pub map_features: ConfigValue<bool>,
    pub http_timeout_secs: ConfigValue<u64>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            api_url: ConfigValue::new(None, ConfigSource::Default),
            cache_busting: ConfigValue::new(true, ConfigSource::Default),
            map_features: ConfigValue::new(true, ConfigSource::Default),
            http_timeout_secs: ConfigValue::new(30, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| StorylineError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| StorylineError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(api_url) = file_config.api_url {
            self.api_url.update(Some(normalize_api_url(&api_url)?), ConfigSource::File);
        }

        if let Some(cache_busting) = file_config.cache_busting {
            self.cache_busting.update(cache_busting, ConfigSource::File);
        }

        if let Some(map_features) = file_config.map_features {
            self.map_features.update(map_features, ConfigSource::File);
        }

        if let Some(timeout) = file_config.http_timeout_secs {
            self.http_timeout_secs.update(validate_timeout(timeout)?, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // STORYLINE_API_URL
        if let Ok(url) = env::var("STORYLINE_API_URL") {
            match normalize_api_url(&url) {
                Ok(url) => self.api_url.update(Some(url), ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid STORYLINE_API_URL value '{}': expected an http(s) URL",
                    url
                ),
            }
        }

        // STORYLINE_CACHE_BUSTING
        if let Ok(value) = env::var("STORYLINE_CACHE_BUSTING") {
            match parse_bool("cache_busting", &value) {
                Ok(flag) => self.cache_busting.update(flag, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid STORYLINE_CACHE_BUSTING value '{}': expected true or false",
                    value
                ),
            }
        }

        // STORYLINE_MAP_FEATURES
        if let Ok(value) = env::var("STORYLINE_MAP_FEATURES") {
            match parse_bool("map_features", &value) {
                Ok(flag) => self.map_features.update(flag, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid STORYLINE_MAP_FEATURES value '{}': expected true or false",
                    value
                ),
            }
        }

        // STORYLINE_HTTP_TIMEOUT
        if let Ok(value) = env::var("STORYLINE_HTTP_TIMEOUT") {
            match value.parse::<u64>() {
                Ok(secs) if validate_timeout(secs).is_ok() => {
                    self.http_timeout_secs.update(secs, ConfigSource::Environment)
                }
                _ => tracing::warn!(
                    "Invalid STORYLINE_HTTP_TIMEOUT value '{}': expected a positive number of seconds",
                    value
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) -> Result<()> {
        if let Some(api_url) = overrides.api_url {
            self.api_url.update(Some(normalize_api_url(&api_url)?), ConfigSource::Cli);
        }

        if let Some(cache_busting) = overrides.cache_busting {
            self.cache_busting.update(cache_busting, ConfigSource::Cli);
        }

        if let Some(map_features) = overrides.map_features {
            self.map_features.update(map_features, ConfigSource::Cli);
        }

        if let Some(timeout) = overrides.http_timeout_secs {
            self.http_timeout_secs.update(validate_timeout(timeout)?, ConfigSource::Cli);
        }

        Ok(())
    }

    /// The API base URL, which has no default
    pub fn require_api_url(&self) -> Result<&str> {
        self.api_url
            .value
            .as_deref()
            .ok_or_else(|| StorylineError::ConfigMissing {
                key: "api_url".to_string(),
            })
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "api_url".to_string(),
            (
                self.api_url.value.clone().unwrap_or_else(|| "(unset)".to_string()),
                self.api_url.source,
            ),
        );

        map.insert(
            "cache_busting".to_string(),
            (self.cache_busting.value.to_string(), self.cache_busting.source),
        );

        map.insert(
            "map_features".to_string(),
            (self.map_features.value.to_string(), self.map_features.source),
        );

        map.insert(
            "http_timeout_secs".to_string(),
            (self.http_timeout_secs.value.to_string(), self.http_timeout_secs.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    api_url: Option<String>,
    cache_busting: Option<bool>,
    map_features: Option<bool>,
    http_timeout_secs: Option<u64>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub api_url: Option<String>,
    pub cache_busting: Option<bool>,
    pub map_features: Option<bool>,
    pub http_timeout_secs: Option<u64>,
}

/// Validate an API base URL and strip trailing slashes
pub fn normalize_api_url(s: &str) -> Result<String> {
    let trimmed = s.trim().trim_end_matches('/');
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let has_host = trimmed.splitn(2, "://").nth(1).is_some_and(|rest| !rest.is_empty());

    if has_scheme && has_host {
        Ok(trimmed.to_string())
    } else {
        Err(StorylineError::ConfigInvalid {
            key: "api_url".to_string(),
            reason: format!("Invalid API URL: {}. Use an http:// or https:// URL", s),
        })
    }
}

/// Request timeouts must be at least one second
pub fn validate_timeout(secs: u64) -> Result<u64> {
    if secs == 0 {
        return Err(StorylineError::ConfigInvalid {
            key: "http_timeout_secs".to_string(),
            reason: "Timeout must be a positive number of seconds".to_string(),
        });
    }
    Ok(secs)
}

/// Parse a boolean flag from string
pub fn parse_bool(key: &str, s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(StorylineError::ConfigInvalid {
            key: key.to_string(),
            reason: format!("Invalid boolean: {}. Use true or false", s),
        }),
    }
}
