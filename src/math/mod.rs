//! Mathematical utilities: least squares and correlation.

pub mod ols;
pub mod pearson;

pub use ols::*;
pub use pearson::*;
