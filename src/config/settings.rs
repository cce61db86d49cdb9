//! Business settings loading from config.toml
//!
//! The operator describes the studio and its service catalog in a TOML file.
//! Service labels feed the autocomplete of the booking commands and the
//! default price offered when an appointment is booked without one.
//! A missing file is not an error: the built-in defaults are used instead.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// Service label used when the operator does not pick one.
pub const DEFAULT_SERVICE: &str = "Volume Russo";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Studio-wide settings
    #[serde(default)]
    pub business: BusinessConfig,
    /// Services offered by the studio
    #[serde(default = "default_services")]
    pub services: Vec<ServiceConfig>,
}

/// Studio-wide settings
#[derive(Debug, Deserialize, Clone)]
pub struct BusinessConfig {
    /// Display name of the studio
    #[serde(default = "default_business_name")]
    pub name: String,
    /// Currency symbol used in replies
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Country calling code prepended to client phones in WhatsApp links
    #[serde(default = "default_country_code")]
    pub country_code: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            business: BusinessConfig::default(),
            services: default_services(),
        }
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            name: default_business_name(),
            currency: default_currency(),
            country_code: default_country_code(),
        }
    }
}

/// One entry in the service catalog
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Service label as stored on appointments
    pub label: String,
    /// Suggested price, used when a booking carries no price
    #[serde(default)]
    pub price: f64,
}

fn default_business_name() -> String {
    "Studio".to_string()
}

fn default_currency() -> String {
    "R$".to_string()
}

fn default_country_code() -> String {
    "55".to_string()
}

fn default_services() -> Vec<ServiceConfig> {
    vec![ServiceConfig {
        label: DEFAULT_SERVICE.to_string(),
        price: 0.0,
    }]
}

impl Settings {
    /// Looks up a service by label, ignoring case.
    #[must_use]
    pub fn service(&self, label: &str) -> Option<&ServiceConfig> {
        self.services
            .iter()
            .find(|s| s.label.eq_ignore_ascii_case(label))
    }

    /// All service labels in catalog order.
    #[must_use]
    pub fn service_labels(&self) -> Vec<String> {
        self.services.iter().map(|s| s.label.clone()).collect()
    }
}

/// Parses settings from a TOML string.
pub fn parse_settings(contents: &str) -> Result<Settings> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
/// A missing file yields [`Settings::default`] with the built-in catalog.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    debug!("Loading settings from {:?}", path_ref);
    if !path_ref.exists() {
        warn!("{:?} not found, using built-in settings", path_ref);
        return Ok(Settings::default());
    }

    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;
    parse_settings(&contents)
}

/// Loads settings from `AGENDA_CONFIG`, or `./config.toml` when unset.
pub fn load_default_settings() -> Result<Settings> {
    let path = std::env::var("AGENDA_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    load_settings(path)
}
