//! Presentation of stored articles.
//!
//! # Submodules
//!
//! - [`console`]: text views for the listing, search and single-URL commands
//! - [`json`]: full-database JSON export
//! - [`report`]: aggregate statistics report

pub mod console;
pub mod json;
pub mod report;
