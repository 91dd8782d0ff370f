//! Shared Socrata SODA API fetcher.
//!
//! Handles paginated fetching from a Socrata dataset using the `$limit`,
//! `$offset`, `$order`, and `$where` query parameters, optionally
//! authenticated with an app token.

use std::fmt::Write as _;
use std::path::PathBuf;

use crate::{FetchOptions, SourceError};

/// Header Socrata uses for app-token authentication.
const APP_TOKEN_HEADER: &str = "X-App-Token";

/// Configuration for a Socrata fetch operation.
pub struct SocrataConfig<'a> {
    /// Base API URL (e.g., `"https://data.cityofnewyork.us/resource/tg4x-b46p.json"`).
    pub api_url: &'a str,
    /// The date column name for ordering and `$where` filtering.
    pub date_column: &'a str,
    /// Server-side `eventtype` filter, if any.
    pub event_type: Option<&'a str>,
    /// App token for authenticated (unthrottled) access.
    pub app_token: Option<&'a str>,
    /// Output filename (e.g., `"film_permits.json"`).
    pub output_filename: &'a str,
    /// Label for log messages.
    pub label: &'a str,
    /// Page size for pagination.
    pub page_size: u64,
}

/// Fetches all records from a Socrata dataset with pagination, writes them
/// to a JSON file, and returns the output path.
///
/// # Errors
///
/// Returns [`SourceError`] if HTTP requests or file I/O fail.
pub async fn fetch_socrata(
    config: &SocrataConfig<'_>,
    options: &FetchOptions,
) -> Result<PathBuf, SourceError> {
    let output_path = options.output_dir.join(config.output_filename);
    std::fs::create_dir_all(&options.output_dir)?;

    let client = reqwest::Client::new();
    let mut all_records: Vec<serde_json::Value> = Vec::new();
    let mut offset: u64 = 0;
    let fetch_limit = options.limit.unwrap_or(u64::MAX);

    loop {
        let remaining = fetch_limit.saturating_sub(offset);
        if remaining == 0 {
            break;
        }
        let page_limit = remaining.min(config.page_size);

        let mut url = format!(
            "{}?$limit={}&$offset={}&$order={} DESC",
            config.api_url, page_limit, offset, config.date_column
        );

        if let Some(clause) = where_clause(config.event_type, options.since.as_ref()) {
            write!(url, "&$where={clause}").unwrap();
        }

        log::info!(
            "Fetching {} data: offset={offset}, limit={page_limit}",
            config.label
        );
        let mut request = client.get(&url);
        if let Some(token) = config.app_token {
            request = request.header(APP_TOKEN_HEADER, token);
        }
        let response = request.send().await?;
        let records: Vec<serde_json::Value> = response.json().await?;

        let count = records.len() as u64;
        if count == 0 {
            break;
        }

        all_records.extend(records);
        offset += count;

        if count < page_limit {
            break;
        }
    }

    log::info!(
        "Downloaded {} {} records total",
        all_records.len(),
        config.label
    );
    let json = serde_json::to_string(&all_records)?;
    std::fs::write(&output_path, json)?;

    Ok(output_path)
}

/// Builds the `$where` clause from the event-type filter and the optional
/// start-date lower bound.
fn where_clause(event_type: Option<&str>, since: Option<&chrono::NaiveDate>) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(event_type) = event_type {
        parts.push(format!("eventtype = '{event_type}'"));
    }
    if let Some(since) = since {
        parts.push(format!("startdatetime >= '{}'", since.format("%Y-%m-%d")));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" and "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn where_clause_combines_filters() {
        let since = NaiveDate::from_ymd_opt(2020, 5, 1).unwrap();
        assert_eq!(
            where_clause(Some("Shooting Permit"), Some(&since)).unwrap(),
            "eventtype = 'Shooting Permit' and startdatetime >= '2020-05-01'"
        );
        assert_eq!(
            where_clause(None, Some(&since)).unwrap(),
            "startdatetime >= '2020-05-01'"
        );
        assert_eq!(
            where_clause(Some("Shooting Permit"), None).unwrap(),
            "eventtype = 'Shooting Permit'"
        );
        assert!(where_clause(None, None).is_none());
    }
}
