//! NYC film-permit feed.
//!
//! Uses NYC's Socrata Open Data API (Film Permits).
//! Dataset: <https://data.cityofnewyork.us/resource/tg4x-b46p>

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::config::FeedConfig;
use crate::record::RawPermitRecord;
use crate::socrata::{SocrataConfig, fetch_socrata};
use crate::{FetchOptions, PermitFeed, SourceError};

/// NYC film-permit data feed.
pub struct FilmPermitFeed {
    config: FeedConfig,
}

impl FilmPermitFeed {
    /// Creates a feed from the given configuration.
    #[must_use]
    pub const fn new(config: FeedConfig) -> Self {
        Self { config }
    }
}

impl Default for FilmPermitFeed {
    fn default() -> Self {
        Self::new(FeedConfig::default())
    }
}

#[async_trait]
impl PermitFeed for FilmPermitFeed {
    fn id(&self) -> &'static str {
        "nyc_film"
    }

    fn name(&self) -> &'static str {
        "NYC Film Permits"
    }

    async fn fetch(&self, options: &FetchOptions) -> Result<PathBuf, SourceError> {
        fetch_socrata(
            &SocrataConfig {
                api_url: &self.config.api_url,
                date_column: "startdatetime",
                event_type: Some(&self.config.event_type),
                app_token: self.config.app_token.as_deref(),
                output_filename: "film_permits.json",
                label: "NYC film permits",
                page_size: 50_000,
            },
            options,
        )
        .await
    }

    fn load(&self, raw_path: &Path) -> Result<Vec<RawPermitRecord>, SourceError> {
        let data = std::fs::read_to_string(raw_path)?;
        let records: Vec<RawPermitRecord> = serde_json::from_str(&data)?;
        log::info!("Loaded {} raw permit rows from disk", records.len());
        Ok(records)
    }
}
