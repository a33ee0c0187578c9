//! Layered configuration.
//!
//! Settings are merged from, lowest to highest priority:
//!
//! 1. built-in defaults
//! 2. a TOML file (by default `config.toml` in the platform config directory)
//! 3. `NODUPS_*` environment variables (`NODUPS_STRICT=false`, `NODUPS_BY=id`)
//!
//! A config only carries data; [`Config::to_options`] validates it and turns
//! it into [`DedupOptions`]. Custom comparators cannot be configured.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::compare::{Compare, PathSpecInput};
use crate::duplicates::DedupOptions;
use crate::error::DedupError;

/// Prefix of environment variables read by [`Config::load_from_path`].
pub const ENV_PREFIX: &str = "NODUPS_";

/// Deduplication settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Strict primitive leaves (`false` coerces across kinds)
    pub strict: bool,
    /// Compare only adjacent values
    pub sorted: bool,
    /// Operator token: `"strict"`, `"==="`, `"loose"` or `"=="`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare: Option<String>,
    /// Fields to compare
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by: Option<PathSpecInput>,
    /// Fields to ignore
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<PathSpecInput>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strict: true,
            sorted: false,
            compare: None,
            by: None,
            skip: None,
        }
    }
}

impl Config {
    /// Load from the platform config file and the environment.
    ///
    /// Falls back to defaults, with a warning, if loading fails.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            log::debug!("No config directory, using defaults");
            return Self::default();
        };
        match Self::load_from_path(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config from {}, using defaults: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load from `path` and the environment.
    ///
    /// A missing file is not an error; defaults and the environment still apply.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::Config`] if the file is malformed or a value has
    /// the wrong type.
    pub fn load_from_path(path: &Path) -> Result<Self, DedupError> {
        let config = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;
        log::debug!("Loaded config: {:?}", config);
        Ok(config)
    }

    /// Save to the platform config file, returning its path.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::NoConfigDir`] if no config directory exists for
    /// this platform, or any error from [`Config::save_to_path`].
    pub fn save(&self) -> Result<PathBuf, DedupError> {
        let path = Self::config_path().ok_or(DedupError::NoConfigDir)?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    /// Save as TOML to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::ConfigEncode`] or [`DedupError::ConfigWrite`].
    pub fn save_to_path(&self, path: &Path) -> Result<(), DedupError> {
        let content = toml::to_string_pretty(self)?;
        let write_err = |source| DedupError::ConfigWrite {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, content).map_err(write_err)?;
        log::debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Default platform-specific config file path.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "nodups").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Validate and convert into deduplication options.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::UnknownCompareToken`] for an unknown `compare`
    /// token, and any error [`crate::compare::EqualOptions::resolve`] reports.
    pub fn to_options(&self) -> Result<DedupOptions, DedupError> {
        let mut options = DedupOptions::new()
            .with_sorted(self.sorted)
            .with_strict(self.strict);
        if let Some(token) = &self.compare {
            options = options.with_compare(token.parse::<Compare>()?);
        }
        if let Some(by) = &self.by {
            options = options.with_by(by.clone());
        }
        if let Some(skip) = &self.skip {
            options = options.with_skip(skip.clone());
        }

        options.equality.resolve()?;
        Ok(options)
    }
}
