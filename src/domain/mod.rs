//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - dataset and feed configuration (`Dataset`, `FeedConfig`, `FeedLayout`)
//! - the positional abbreviation list (`StateCatalog`)
//! - the tile-grid layout used by the choropleth renderers (`tiles`)

pub mod tiles;
pub mod types;

pub use types::*;
