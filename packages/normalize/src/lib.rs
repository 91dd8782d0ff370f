#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Street name normalization and parking-held address parsing.
//!
//! The film-permit feed describes closures as free text like
//! `"W 48 St between 6 Ave and 7 Ave"`. This crate turns such text into
//! canonical street names and [`BlockDescriptor`] triplets usable as join
//! keys into a street geometry index. The normalization pipeline is applied
//! identically everywhere a street name enters the system, so the same
//! street always produces the same key.
//!
//! [`BlockDescriptor`]: permit_map_permit_models::BlockDescriptor

pub mod parser;
pub mod street;
pub mod tables;

pub use parser::parse_parking_held;
pub use street::normalize;
