//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the raw vendor grid (`RawTable`, `Cell`)
//! - keyed quantity rows and lookup maps (`KeyedRow`, `ValidationMap`, ...)
//! - the schedule artifact (`Schedule`, `DateAxis`)
//! - catalog and report rows (`PartCatalogRow`, `ReportRow`)

pub mod constants;
pub mod types;

pub use types::*;
