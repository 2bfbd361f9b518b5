//! `materials` library crate.
//!
//! The binary (`materials`) is a thin wrapper around this library so that:
//!
//! - the reconciliation core is testable without spawning processes or touching the network
//! - fetching, file I/O and CSV/JSON formats stay at the edges (`data`, `io`)
//! - each pipeline step can be run on its own (`prep`, `schedule`, `report`)

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
pub mod schedule;
