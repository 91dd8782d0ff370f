#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Wide-to-long permit dataset assembly.
//!
//! Permits carry multi-valued fields (blocks, zip codes). Aggregation and
//! rendering want flat rows, so this crate materializes one row per
//! permit × block and one row per permit × zip code. All fan-outs preserve
//! input order, keeping joins on (permit id, sequence position) stable
//! across runs.

pub mod assemble;
pub mod explode;

pub use assemble::{PermitBlockRow, ZipPermitCount, block_rows, permit_counts_by_zip};
pub use explode::{PermitZip, explode_zip_codes};
