//! Output helpers.
//!
//! - state table CSV export (`export`)

pub mod export;

pub use export::*;
