//! # Ingestion configuration
//!
//! [`IllustrisConfig`] groups every setting of the Illustris download path: API key,
//! Hubble parameter used for the physical-unit conversion, API root, HTTP timeout and
//! subhalo mass cut. It is passed explicitly to [`crate::illustris::IllustrisClient::new`] and
//! [`crate::ingest::save_halos`]; nothing is read from process-wide state.
//!
//! Three ways to obtain one:
//!
//! * [`IllustrisConfig::default`] – public API root, `h = 0.704`, empty API key (not usable for
//!   requests until a key is set),
//! * [`IllustrisConfig::builder`] – fluent overrides, validated by [`IllustrisConfigBuilder::build`],
//! * [`IllustrisConfig::from_toml_file`] – a TOML file whose missing keys take the defaults.
//!
//! ```toml
//! api_key = "0123456789abcdef"
//! hubble_param = 0.704
//! base_url = "http://www.illustris-project.org/api/"
//! timeout_secs = 60
//! mass_cut = 1e-5
//! ```
use std::time::Duration;

use camino::Utf8Path;
use serde::Deserialize;

use crate::{
    constants::{DEFAULT_HUBBLE_PARAM, DEFAULT_MASS_CUT, ILLUSTRIS_API_URL},
    mond_errors::MondError,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IllustrisConfig {
    /// Personal Illustris API key, sent as the `api-key` header.
    pub api_key: String,
    /// Dimensionless Hubble parameter `h`.
    pub hubble_param: f64,
    /// API root, with a trailing `/`.
    pub base_url: String,
    /// Global per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Subhalo mass cut in code units; the effective threshold is `hubble_param · mass_cut`.
    pub mass_cut: f64,
}

impl Default for IllustrisConfig {
    fn default() -> Self {
        IllustrisConfig {
            api_key: String::new(),
            hubble_param: DEFAULT_HUBBLE_PARAM,
            base_url: ILLUSTRIS_API_URL.to_string(),
            timeout_secs: 60,
            mass_cut: DEFAULT_MASS_CUT,
        }
    }
}

impl IllustrisConfig {
    pub fn builder() -> IllustrisConfigBuilder {
        IllustrisConfigBuilder::new()
    }

    /// Load and validate a TOML configuration file.
    ///
    /// Arguments
    /// -----------------
    /// * `path` – TOML file; keys absent from the file keep their default value.
    ///
    /// Return
    /// ----------
    /// * The validated configuration, [`MondError::TomlError`] on malformed TOML, or
    ///   [`MondError::InvalidConfig`] if a value is out of range.
    pub fn from_toml_file(path: &Utf8Path) -> Result<Self, MondError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Same as [`IllustrisConfig::from_toml_file`] for in-memory TOML.
    pub fn from_toml_str(text: &str) -> Result<Self, MondError> {
        let config: IllustrisConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges: non-empty key, `h > 0`, `timeout_secs >= 1`, `mass_cut >= 0`,
    /// base URL ending with `/`.
    pub fn validate(&self) -> Result<(), MondError> {
        if self.api_key.trim().is_empty() {
            return Err(MondError::InvalidConfig("api_key must not be empty".into()));
        }
        if !(self.hubble_param.is_finite() && self.hubble_param > 0.0) {
            return Err(MondError::InvalidConfig(
                "hubble_param must be > 0".into(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(MondError::InvalidConfig(
                "timeout_secs must be >= 1".into(),
            ));
        }
        if !(self.mass_cut.is_finite() && self.mass_cut >= 0.0) {
            return Err(MondError::InvalidConfig("mass_cut must be >= 0".into()));
        }
        if !self.base_url.ends_with('/') {
            return Err(MondError::InvalidConfig(format!(
                "base_url must end with '/': {}",
                self.base_url
            )));
        }
        Ok(())
    }

    /// Global request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Subhalos at or below this mass (code units) are not ingested.
    pub fn mass_threshold(&self) -> f64 {
        self.hubble_param * self.mass_cut
    }
}

/// Builder for [`IllustrisConfig`], with validation.
#[derive(Debug, Clone, Default)]
pub struct IllustrisConfigBuilder {
    config: IllustrisConfig,
}

impl IllustrisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(mut self, v: impl Into<String>) -> Self {
        self.config.api_key = v.into();
        self
    }

    pub fn hubble_param(mut self, v: f64) -> Self {
        self.config.hubble_param = v;
        self
    }

    pub fn base_url(mut self, v: impl Into<String>) -> Self {
        self.config.base_url = v.into();
        self
    }

    pub fn timeout_secs(mut self, v: u64) -> Self {
        self.config.timeout_secs = v;
        self
    }

    pub fn mass_cut(mut self, v: f64) -> Self {
        self.config.mass_cut = v;
        self
    }

    /// Finalize the configuration (see [`IllustrisConfig::validate`]).
    pub fn build(self) -> Result<IllustrisConfig, MondError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
