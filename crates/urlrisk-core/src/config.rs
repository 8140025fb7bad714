//! Configuration management for the URL risk pipeline.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use crate::types::FEATURE_COUNT;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This is loaded from `~/.config/urlrisk/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Domain registration lookup settings
    pub registry: RegistryConfig,
    /// Traffic rank lookup settings
    pub traffic: TrafficConfig,
    /// Page fetch settings
    pub content: ContentConfig,
    /// Safe-point heuristic settings
    pub scoring: ScoringConfig,
    /// Linear classifier parameters
    pub classifier: ClassifierConfig,
}

impl AppConfig {
    /// Load configuration from the default location, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path.
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `URLRISK_SAFE_THRESHOLD`: Override the safe-point threshold
    /// - `URLRISK_FETCH_TIMEOUT_SECS`: Override the page fetch timeout
    /// - `URLRISK_WHOIS_SERVER`: Override the root WHOIS server
    pub fn apply_env(mut self) -> ConfigResult<Self> {
        if let Ok(val) = std::env::var("URLRISK_SAFE_THRESHOLD") {
            if let Ok(threshold) = val.parse() {
                self.scoring.safe_threshold = threshold;
                tracing::debug!("Override scoring.safe_threshold from env: {}", threshold);
            }
        }

        if let Ok(val) = std::env::var("URLRISK_FETCH_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.content.timeout_secs = secs;
                tracing::debug!("Override content.timeout_secs from env: {}", secs);
            }
        }

        if let Ok(val) = std::env::var("URLRISK_WHOIS_SERVER") {
            if !val.trim().is_empty() {
                tracing::debug!("Override registry.whois_server from env: {}", val);
                self.registry.whois_server = val;
            }
        }

        self.validate()?;
        Ok(self)
    }

    /// Load from the default location with environment overrides.
    pub fn load_with_env() -> ConfigResult<Self> {
        Self::load()?.apply_env()
    }

    /// Check value constraints that serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.registry.timeout_secs == 0 {
            return Err(invalid("registry.timeout_secs", "must be greater than zero"));
        }
        if self.traffic.timeout_secs == 0 {
            return Err(invalid("traffic.timeout_secs", "must be greater than zero"));
        }
        if self.content.timeout_secs == 0 {
            return Err(invalid("content.timeout_secs", "must be greater than zero"));
        }
        if self.scoring.safe_threshold > FEATURE_COUNT {
            return Err(invalid(
                "scoring.safe_threshold",
                &format!("must be at most {FEATURE_COUNT}"),
            ));
        }
        if let Some(weights) = &self.classifier.weights {
            if weights.len() != FEATURE_COUNT {
                return Err(invalid(
                    "classifier.weights",
                    &format!("expected {FEATURE_COUNT} weights, got {}", weights.len()),
                ));
            }
        }
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/urlrisk/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("org", "urlrisk", "urlrisk").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Domain registration (WHOIS) lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Root WHOIS server queried first
    pub whois_server: String,
    /// WHOIS TCP port
    pub port: u16,
    /// Timeout for the whole lookup, including referrals
    pub timeout_secs: u64,
    /// Maximum referral hops followed from the root server
    pub max_referrals: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            whois_server: "whois.iana.org".to_string(),
            port: 43,
            timeout_secs: 10,
            max_referrals: 2,
        }
    }
}

/// Traffic rank lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficConfig {
    /// Whether the rank lookup is attempted at all
    pub enabled: bool,
    /// Rank service endpoint
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Ranks strictly below this value set the traffic flag
    pub popular_rank_cutoff: u64,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "http://data.alexa.com/data".to_string(),
            timeout_secs: 5,
            popular_rank_cutoff: 100_000,
        }
    }
}

/// Page fetch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Redirect hops followed before the fetch is treated as failed
    pub max_redirects: usize,
    /// User agent string
    pub user_agent: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            max_redirects: 30,
            user_agent: concat!("urlrisk/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Safe-point heuristic settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Minimum safe points for a "likely safe" heuristic verdict
    pub safe_threshold: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self { safe_threshold: 11 }
    }
}

/// Parameters for the built-in linear classifier.
///
/// No classifier is configured by default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// One weight per feature, in layout order
    pub weights: Option<Vec<f32>>,
    /// Intercept term
    pub bias: f32,
}
