//! State aggregators for the insurance and poverty feeds.
//!
//! Constructing an aggregator performs the fetch. Every derived operation
//! re-runs the full fold over the held raw table; nothing is cached.

pub mod fold;
pub mod record;
pub mod table;

pub use fold::{StateAggregate, StateAggregates, fold_states};
pub use record::{RawRecord, RecordReader};
pub use table::{StateRow, StateTable, subject_ratios, total_population};

use tracing::info;

use crate::data::{RawTable, TableSource};
use crate::domain::{Dataset, FeedConfig, FirstRowPolicy, StateCatalog};
use crate::error::AppError;

pub struct StateAggregator {
    feed: FeedConfig,
    raw: RawTable,
    policy: FirstRowPolicy,
    catalog: StateCatalog,
}

impl StateAggregator {
    /// Fetch the county table for `feed` and keep it for folding.
    pub fn fetch<S: TableSource + ?Sized>(
        source: &S,
        feed: FeedConfig,
        policy: FirstRowPolicy,
        catalog: StateCatalog,
    ) -> Result<Self, AppError> {
        let raw = source.fetch_table(&feed)?;
        Ok(Self::from_table(feed, raw, policy, catalog))
    }

    pub fn from_table(
        feed: FeedConfig,
        raw: RawTable,
        policy: FirstRowPolicy,
        catalog: StateCatalog,
    ) -> Self {
        Self {
            feed,
            raw,
            policy,
            catalog,
        }
    }

    pub fn dataset(&self) -> Dataset {
        self.feed.dataset
    }

    pub fn year(&self) -> u16 {
        self.feed.year
    }

    /// Resolve every data row and fold into per-state totals.
    pub fn aggregate(&self) -> Result<StateAggregates, AppError> {
        let reader = RecordReader::resolve(&self.feed.layout, &self.raw)?;
        let mut records = Vec::with_capacity(self.raw.rows.len());
        for row in &self.raw.rows {
            if let Some(rec) = reader.read(row)? {
                records.push(rec);
            }
        }
        let dropped = self.raw.rows.len() - records.len();
        let aggregates = fold_states(records, self.policy);
        info!(
            dataset = ?self.feed.dataset,
            rows = self.raw.rows.len(),
            dropped,
            states = aggregates.len(),
            "aggregated county rows"
        );
        Ok(aggregates)
    }

    pub fn total_population(&self) -> Result<u64, AppError> {
        Ok(total_population(&self.aggregate()?))
    }

    /// Subject share per state (percent uninsured / in poverty).
    pub fn ratios(&self) -> Result<Vec<f64>, AppError> {
        subject_ratios(&self.aggregate()?)
    }

    pub fn table(&self) -> Result<StateTable, AppError> {
        StateTable::build(&self.aggregate()?, &self.catalog)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn raw(rows: &[[&str; 6]]) -> RawTable {
        let mut all = vec![
            ["NIC_PT", "NUI_PT", "NAME", "time", "state", "county"]
                .map(|c| Some(c.to_string()))
                .to_vec(),
        ];
        for r in rows {
            all.push(
                r.iter()
                    .map(|c| if *c == "null" { None } else { Some(c.to_string()) })
                    .collect(),
            );
        }
        RawTable::from_rows(all).unwrap()
    }

    struct CountingSource {
        table: RawTable,
        calls: Cell<usize>,
    }

    impl TableSource for CountingSource {
        fn fetch_table(&self, _feed: &FeedConfig) -> Result<RawTable, AppError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.table.clone())
        }
    }

    #[test]
    fn end_to_end_scenario() {
        let aggregator = StateAggregator::from_table(
            FeedConfig::sahie(2020),
            raw(&[
                ["80", "20", "A", "2020", "01", "001"],
                ["70", "10", "B", "2020", "01", "002"],
                ["50", "50", "C", "2020", "02", "001"],
            ]),
            FirstRowPolicy::Skip,
            StateCatalog::new(["AL", "AK"]),
        );

        let agg = aggregator.aggregate().unwrap();
        let al = agg.get(1).unwrap();
        assert_eq!(
            (al.complement_total, al.subject_total, al.population_total),
            (70, 10, 80)
        );
        assert_eq!(agg.get(2), Some(&StateAggregate::empty(2)));
        assert_eq!(aggregator.total_population().unwrap(), 80);

        let err = aggregator.ratios().unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_COMPUTE);
        assert!(aggregator.table().is_err());
    }

    #[test]
    fn null_rows_are_ignored_and_ratio_computed() {
        let aggregator = StateAggregator::from_table(
            FeedConfig::sahie(2020),
            raw(&[
                ["80", "20", "A", "2020", "01", "001"],
                ["null", "5", "B", "2020", "01", "003"],
                ["70", "10", "C", "2020", "01", "005"],
            ]),
            FirstRowPolicy::Skip,
            StateCatalog::new(["AL"]),
        );
        assert_eq!(aggregator.ratios().unwrap(), vec![12.5]);
        let table = aggregator.table().unwrap();
        assert_eq!(table.rows[0].abbreviation, "AL");
        assert_eq!(table.rows[0].population_total, 80);
    }

    #[test]
    fn fetch_happens_once_per_construction() {
        let source = CountingSource {
            table: raw(&[
                ["10", "1", "A", "2020", "01", "001"],
                ["10", "1", "B", "2020", "01", "003"],
            ]),
            calls: Cell::new(0),
        };
        let first = StateAggregator::fetch(
            &source,
            FeedConfig::sahie(2020),
            FirstRowPolicy::Skip,
            StateCatalog::new(["AL"]),
        )
        .unwrap();
        first.aggregate().unwrap();
        first.table().unwrap();
        assert_eq!(source.calls.get(), 1);

        let second = StateAggregator::fetch(
            &source,
            FeedConfig::sahie(2020),
            FirstRowPolicy::Count,
            StateCatalog::new(["AL"]),
        )
        .unwrap();
        assert_eq!(source.calls.get(), 2);
        assert_eq!(second.total_population().unwrap(), 22);
    }
}
