//! Census Bureau data API integration (SAHIE / SAIPE timeseries).
//!
//! The API answers a county query with a JSON array of rows; the first row is
//! the header and every cell is either a string or `null`.

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::FeedConfig;
use crate::error::AppError;

/// Decoded census response: header + rows of optional string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<Vec<Option<String>>>")]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Split the first row off as the header.
    pub fn from_rows(mut rows: Vec<Vec<Option<String>>>) -> Result<Self, AppError> {
        if rows.is_empty() {
            return Err(AppError::data("Census response contained no rows."));
        }
        let header = rows
            .remove(0)
            .into_iter()
            .map(|cell| cell.unwrap_or_default())
            .collect();
        Ok(Self { header, rows })
    }

    /// Decode the JSON body of a census response.
    pub fn from_json(body: &str) -> Result<Self, AppError> {
        serde_json::from_str(body)
            .map_err(|e| AppError::data(format!("Failed to parse census response: {e}")))
    }

    /// Position of a header column.
    pub fn column(&self, name: &str) -> Result<usize, AppError> {
        self.header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| {
                AppError::data(format!(
                    "Census response has no '{name}' column (header: {}).",
                    self.header.join(",")
                ))
            })
    }
}

impl TryFrom<Vec<Vec<Option<String>>>> for RawTable {
    type Error = AppError;

    fn try_from(rows: Vec<Vec<Option<String>>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

/// Anything that can produce a raw county table for a feed.
pub trait TableSource {
    fn fetch_table(&self, feed: &FeedConfig) -> Result<RawTable, AppError>;
}

pub struct CensusClient {
    client: Client,
    api_key: Option<String>,
}

impl CensusClient {
    /// Build a client, picking up `CENSUS_API_KEY` from the environment (or `.env`).
    ///
    /// The key is optional; anonymous requests are rate limited but work.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("CENSUS_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        Self {
            client: Client::new(),
            api_key,
        }
    }

    fn query_pairs(&self, feed: &FeedConfig) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("get".to_string(), feed.measures.join(",")),
            ("for".to_string(), "county:*".to_string()),
            ("in".to_string(), "state:*".to_string()),
            ("time".to_string(), feed.year.to_string()),
        ];
        pairs.extend(feed.predicates.iter().cloned());
        if let Some(key) = &self.api_key {
            pairs.push(("key".to_string(), key.clone()));
        }
        pairs
    }
}

impl TableSource for CensusClient {
    fn fetch_table(&self, feed: &FeedConfig) -> Result<RawTable, AppError> {
        info!(
            dataset = ?feed.dataset,
            year = feed.year,
            endpoint = %feed.endpoint,
            "requesting county table"
        );

        let resp = self
            .client
            .get(&feed.endpoint)
            .query(&self.query_pairs(feed))
            .send()
            .map_err(|e| AppError::data(format!("Census request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::data(format!(
                "Census request failed with status {}.",
                resp.status()
            )));
        }

        // The API reports bad parameters as a 200 with a plain-text body, so
        // decode from text to keep the message useful.
        let body = resp
            .text()
            .map_err(|e| AppError::data(format!("Failed to read census response: {e}")))?;
        let table = RawTable::from_json(&body)?;

        debug!(rows = table.rows.len(), header = ?table.header, "decoded county table");
        Ok(table)
    }
}
