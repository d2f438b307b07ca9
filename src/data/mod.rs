//! Data inputs: the census API client and the FIPS reference lookup.

pub mod census;
pub mod fips;

pub use census::{CensusClient, RawTable, TableSource};
pub use fips::FipsLookup;
