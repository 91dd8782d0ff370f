//! ZIP-code fan-out.

use serde::{Deserialize, Serialize};

use permit_map_permit_models::Permit;

/// One (permit, zip code) pair from the fan-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitZip {
    /// The permit's id.
    pub permit_id: String,
    /// One zip code from the permit's list, possibly a sentinel.
    pub zip_code: String,
}

/// Fans each permit's zip-code list out to one row per (permit, zip code)
/// pair, preserving permit order and zip order within each permit.
///
/// This is a pure fan-out: sentinel zip codes (`"0"`, `"N/A"`) pass
/// through untouched, and permits with no zip codes contribute no rows.
/// Filtering is the aggregating caller's job.
#[must_use]
pub fn explode_zip_codes(permits: &[Permit]) -> Vec<PermitZip> {
    permits
        .iter()
        .flat_map(|permit| {
            permit.zip_codes.iter().map(|zip| PermitZip {
                permit_id: permit.id.clone(),
                zip_code: zip.clone(),
            })
        })
        .collect()
}
