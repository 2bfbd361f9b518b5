//! Input/output helpers.
//!
//! - lookup CSV ingest (`lookup`)
//! - JSON artifacts between steps (`artifacts`)
//! - CSV exports (`export`)

pub mod artifacts;
pub mod export;
pub mod lookup;

pub use artifacts::*;
pub use export::*;
pub use lookup::*;
