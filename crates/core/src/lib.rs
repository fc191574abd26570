//! Domain types shared by the Verdant admin client crates.
//!
//! This crate has zero internal dependencies: remote records, submission
//! payloads, status enums, input-boundary parsing and save-time validation
//! all live here so both the HTTP client and the form controllers can use
//! them.

pub mod error;
pub mod farm;
pub mod numeric;
pub mod project;
pub mod tree_species;
pub mod types;
pub mod validation;
pub mod wire;
