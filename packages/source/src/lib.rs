#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Film permit feed client and raw-record normalization.
//!
//! The upstream feed is NYC's Socrata Open Data API (Film Permits dataset).
//! [`PermitFeed`] defines how raw rows are fetched and loaded;
//! [`record::build_permit`] converts one raw row into the canonical
//! [`Permit`](permit_map_permit_models::Permit) entity.

pub mod config;
pub mod film_permits;
pub mod record;
pub mod socrata;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::record::RawPermitRecord;

/// Errors that can occur during feed operations.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("Config error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },
}

/// Configuration for fetching data from the feed.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Only fetch permits whose shoot starts on or after this date.
    pub since: Option<chrono::NaiveDate>,
    /// Maximum number of records to fetch.
    pub limit: Option<u64>,
    /// Directory to store downloaded files.
    pub output_dir: PathBuf,
}

/// Trait for a film-permit data feed.
///
/// The feed knows how to fetch its raw rows and load them from disk; it
/// does not normalize them (that is [`record::build_permit`]'s job, and a
/// single unbuildable record must not poison a whole download).
#[async_trait]
pub trait PermitFeed: Send + Sync {
    /// Returns a unique identifier for this feed (e.g., `"nyc_film"`).
    fn id(&self) -> &'static str;

    /// Returns the human-readable name of this feed.
    fn name(&self) -> &'static str;

    /// Downloads raw rows from the feed, returning the path to the
    /// downloaded file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the download fails.
    async fn fetch(&self, options: &FetchOptions) -> Result<PathBuf, SourceError>;

    /// Loads previously downloaded raw rows from disk.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file cannot be read or parsed.
    fn load(&self, raw_path: &Path) -> Result<Vec<RawPermitRecord>, SourceError>;
}
