//! FIPS code → state name lookup.
//!
//! The reference text is the classic fixed-layout FIPS listing: a title block,
//! a dashed separator line, the state rows, then a `county-level` block that we
//! never read. Only the region between the separator and the `county-level`
//! line is parsed.

use std::path::Path;

use tracing::debug;

use crate::domain::FipsSource;
use crate::error::AppError;

/// First token of the line after which state rows begin.
pub const START_MARKER: &str = "-----------";
/// First token of the line at which parsing stops.
pub const STOP_MARKER: &str = "county-level";

const EMBEDDED_FIPS: &str = include_str!("../../data/fips.txt");

/// Ordered FIPS code → state name mapping, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FipsLookup {
    entries: Vec<(String, String)>,
}

impl FipsLookup {
    /// Parse the reference text.
    pub fn parse(text: &str) -> Self {
        let mut entries: Vec<(String, String)> = Vec::new();
        let mut in_block = false;

        for line in text.lines() {
            let columns: Vec<&str> = line.split_whitespace().collect();
            let Some(&first) = columns.first() else {
                continue;
            };

            if first == START_MARKER {
                in_block = true;
                continue;
            }
            if first == STOP_MARKER {
                break;
            }
            if !in_block || columns.len() < 2 {
                continue;
            }

            // Multi-word names ("NEW YORK") arrive as several columns.
            let name = columns[1..].join(" ");
            match entries.iter_mut().find(|(code, _)| code == first) {
                Some(entry) => entry.1 = name,
                None => entries.push((first.to_string(), name)),
            }
        }

        debug!(states = entries.len(), "parsed FIPS reference");
        Self { entries }
    }

    /// Read and parse a reference file.
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AppError::usage(format!("Failed to read FIPS file '{}': {e}", path.display()))
        })?;
        Ok(Self::parse(&text))
    }

    /// The listing compiled into the binary.
    pub fn embedded() -> Self {
        Self::parse(EMBEDDED_FIPS)
    }

    pub fn load(source: &FipsSource) -> Result<Self, AppError> {
        match source {
            FipsSource::Embedded => Ok(Self::embedded()),
            FipsSource::File(path) => Self::from_path(path),
        }
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// State names in file order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(_, name)| name.as_str()).collect()
    }

    /// FIPS codes in file order.
    pub fn codes(&self) -> Vec<&str> {
        self.entries.iter().map(|(code, _)| code.as_str()).collect()
    }

    pub fn name_for(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, name)| name.as_str())
    }

    /// Name for a numeric state code (zero-padded to two digits).
    pub fn name_for_state(&self, state_code: u32) -> Option<&str> {
        self.name_for(&format!("{state_code:02}"))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `"NORTH CAROLINA"` → `"North Carolina"`; `"DISTRICT OF COLUMBIA"` keeps `of` lowercase.
pub fn display_name(raw: &str) -> String {
    raw.split_whitespace()
        .enumerate()
        .map(|(idx, word)| {
            let lower = word.to_lowercase();
            if idx > 0 && matches!(lower.as_str(), "of" | "and" | "the") {
                return lower;
            }
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
