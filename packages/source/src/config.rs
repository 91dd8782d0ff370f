//! Feed configuration loaded from a TOML file.
//!
//! Only the Socrata app token is secret; everything else has defaults
//! pointing at the NYC film-permit dataset, so a config file is optional
//! for anonymous (rate-limited) access.

use serde::Deserialize;
use std::path::Path;

use crate::SourceError;

/// Default API endpoint for the NYC Film Permits dataset.
pub const DEFAULT_API_URL: &str = "https://data.cityofnewyork.us/resource/tg4x-b46p.json";

/// Only shooting permits hold parking; other event types (rigging,
/// load-in/load-out) are not street closures.
pub const DEFAULT_EVENT_TYPE: &str = "Shooting Permit";

/// Feed configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FeedConfig {
    /// Socrata API endpoint.
    pub api_url: String,
    /// Socrata app token. Anonymous access works but is throttled.
    pub app_token: Option<String>,
    /// Event type filter applied server-side.
    pub event_type: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            app_token: None,
            event_type: DEFAULT_EVENT_TYPE.to_string(),
        }
    }
}

impl FeedConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, SourceError> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| SourceError::Config {
            message: format!("{}: {e}", path.display()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_film_permit_dataset() {
        let config = FeedConfig::default();
        assert!(config.api_url.contains("tg4x-b46p"));
        assert_eq!(config.event_type, "Shooting Permit");
        assert!(config.app_token.is_none());
    }

    #[test]
    fn parses_partial_toml() {
        let config: FeedConfig = toml::from_str("app-token = \"abc123\"").unwrap();
        assert_eq!(config.app_token.as_deref(), Some("abc123"));
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }
}
