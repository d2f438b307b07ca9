//! Shared analysis pipeline used by both the plain-text and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! census fetch -> county fold -> state table (-> join -> correlation/trend)
//!
//! The front-ends can then focus on presentation (printing vs widgets).

use crate::aggregate::{StateAggregator, StateTable};
use crate::data::TableSource;
use crate::domain::{AnalysisConfig, Dataset, FeedConfig};
use crate::error::AppError;
use crate::trend::TrendResult;

/// Output of one dataset run (choropleth views and CSV export).
#[derive(Debug, Clone)]
pub struct DatasetRun {
    pub dataset: Dataset,
    pub year: u16,
    pub table: StateTable,
    pub total_population: u64,
}

/// Output of the poverty/uninsured comparison.
#[derive(Debug, Clone)]
pub struct TrendRun {
    pub year: u16,
    pub insurance: StateTable,
    pub poverty: StateTable,
    pub trend: TrendResult,
}

/// Build one aggregator (one fetch) and derive its state table.
pub fn run_dataset<S: TableSource + ?Sized>(
    source: &S,
    dataset: Dataset,
    config: &AnalysisConfig,
) -> Result<DatasetRun, AppError> {
    let aggregator = StateAggregator::fetch(
        source,
        FeedConfig::for_dataset(dataset, config.year),
        config.first_row,
        config.catalog.clone(),
    )?;
    let table = aggregator.table()?;
    let total_population = table.total_population();

    Ok(DatasetRun {
        dataset,
        year: config.year,
        table,
        total_population,
    })
}

/// Fetch both datasets, join them on state code and fit the trend.
pub fn run_trend<S: TableSource + ?Sized>(source: &S, config: &AnalysisConfig) -> Result<TrendRun, AppError> {
    let insurance = run_dataset(source, Dataset::Insurance, config)?.table;
    let poverty = run_dataset(source, Dataset::Poverty, config)?.table;
    let trend = crate::trend::analyze(&insurance, &poverty)?;

    Ok(TrendRun {
        year: config.year,
        insurance,
        poverty,
        trend,
    })
}
