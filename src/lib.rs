//! `census-trends` library crate.
//!
//! The binary (`census-trends`) is a thin wrapper around this library so that:
//!
//! - the county fold and the trend math are testable without the network
//! - presentation (TUI, plain text, CSV) stays separate from aggregation

pub mod aggregate;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod trend;
pub mod tui;
