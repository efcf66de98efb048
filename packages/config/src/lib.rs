#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Runtime configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) is a
//! valid configuration:
//!
//! ```toml
//! [listing]
//! expiry_days = 30
//! refresh_expiry_on_update = true
//!
//! [search]
//! default_radius_meters = 1000.0
//!
//! [matching]
//! overlap_buffer_meters = 100.0
//! min_similarity = 0.1
//! max_results = 10
//! ```

use std::path::{Path, PathBuf};

use lost_found_listing_models::{DEFAULT_EXPIRY_DAYS, ExpiryPolicy};
use lost_found_matching::MatchOptions;
use serde::Deserialize;

/// Environment variable naming the config file to load.
pub const CONFIG_ENV_VAR: &str = "LOST_FOUND_CONFIG";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has the wrong shape.
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Listing lifecycle settings.
    pub listing: ListingConfig,
    /// Search defaults.
    pub search: SearchConfig,
    /// Match suggestion tuning.
    pub matching: MatchingConfig,
}

/// `[listing]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListingConfig {
    /// Days a listing stays live.
    pub expiry_days: u32,
    /// Whether editing a listing restarts its expiry clock.
    pub refresh_expiry_on_update: bool,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            expiry_days: DEFAULT_EXPIRY_DAYS,
            refresh_expiry_on_update: true,
        }
    }
}

/// `[search]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Radius used when a location search gives no explicit radius.
    pub default_radius_meters: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_radius_meters: 1_000.0,
        }
    }
}

/// `[matching]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchingConfig {
    /// Buffer added around each geofence when testing overlap.
    pub overlap_buffer_meters: f64,
    /// Minimum text similarity for a suggestion.
    pub min_similarity: f64,
    /// Maximum suggestions per listing.
    pub max_results: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        let defaults = MatchOptions::default();
        Self {
            overlap_buffer_meters: defaults.overlap_buffer_meters,
            min_similarity: defaults.min_similarity,
            max_results: defaults.max_results,
        }
    }
}

impl Config {
    /// Parses a config from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the TOML is malformed or contains
    /// unknown keys.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Reads and parses the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads the file named by [`CONFIG_ENV_VAR`], or the defaults if the
    /// variable is unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the variable is set but the file cannot be
    /// read or parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => {
                log::debug!("{CONFIG_ENV_VAR} not set, using default config");
                Ok(Self::default())
            }
        }
    }

    /// Expiry policy for created and edited listings.
    #[must_use]
    pub const fn expiry_policy(&self) -> ExpiryPolicy {
        ExpiryPolicy {
            days: self.listing.expiry_days,
            refresh_on_update: self.listing.refresh_expiry_on_update,
        }
    }

    /// Options for [`lost_found_matching::suggest_matches`].
    #[must_use]
    pub const fn match_options(&self) -> MatchOptions {
        MatchOptions {
            overlap_buffer_meters: self.matching.overlap_buffer_meters,
            min_similarity: self.matching.min_similarity,
            max_results: self.matching.max_results,
        }
    }
}
