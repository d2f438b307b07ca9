//! Derived per-state values and the labeled state table.

use crate::aggregate::StateAggregates;
use crate::domain::StateCatalog;
use crate::error::AppError;

/// Σ population over all states.
pub fn total_population(aggregates: &StateAggregates) -> u64 {
    aggregates.iter().map(|s| s.population_total).sum()
}

/// `subject / population × 100` per state, in encounter order.
///
/// A state with zero population makes the whole computation fail.
pub fn subject_ratios(aggregates: &StateAggregates) -> Result<Vec<f64>, AppError> {
    aggregates
        .iter()
        .map(|s| {
            if s.population_total == 0 {
                return Err(AppError::compute(format!(
                    "Division by zero: state {:02} has zero population \
                     (under `--first-county skip` a single-county state contributes nothing).",
                    s.state_code
                )));
            }
            Ok(s.subject_total as f64 / s.population_total as f64 * 100.0)
        })
        .collect()
}

/// One row of the labeled state table.
#[derive(Debug, Clone, PartialEq)]
pub struct StateRow {
    pub state_code: u32,
    /// Two-digit, zero-padded.
    pub fips_code: String,
    pub abbreviation: String,
    pub ratio: f64,
    pub complement_total: u64,
    pub subject_total: u64,
    pub population_total: u64,
}

/// State rows in encounter order with positionally-zipped abbreviations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateTable {
    pub rows: Vec<StateRow>,
}

impl StateTable {
    /// Label aggregates with the catalog's abbreviations.
    ///
    /// Abbreviations are zipped by position, not looked up by code; the
    /// catalog must list exactly one entry per aggregated state.
    pub fn build(aggregates: &StateAggregates, catalog: &StateCatalog) -> Result<Self, AppError> {
        if catalog.len() != aggregates.len() {
            return Err(AppError::data(format!(
                "Abbreviation list has {} entries but the feed produced {} states.",
                catalog.len(),
                aggregates.len()
            )));
        }

        let ratios = subject_ratios(aggregates)?;
        let rows = aggregates
            .iter()
            .zip(&catalog.abbreviations)
            .zip(ratios)
            .map(|((s, abbr), ratio)| StateRow {
                state_code: s.state_code,
                fips_code: format!("{:02}", s.state_code),
                abbreviation: abbr.clone(),
                ratio,
                complement_total: s.complement_total,
                subject_total: s.subject_total,
                population_total: s.population_total,
            })
            .collect();

        Ok(Self { rows })
    }

    pub fn get(&self, state_code: u32) -> Option<&StateRow> {
        self.rows.iter().find(|r| r.state_code == state_code)
    }

    pub fn by_abbreviation(&self, abbreviation: &str) -> Option<&StateRow> {
        self.rows
            .iter()
            .find(|r| r.abbreviation.eq_ignore_ascii_case(abbreviation))
    }

    pub fn ratios(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.ratio).collect()
    }

    /// `(min, max)` of the ratio column.
    pub fn ratio_range(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for r in &self.rows {
            lo = lo.min(r.ratio);
            hi = hi.max(r.ratio);
        }
        if lo.is_finite() && hi.is_finite() {
            Some((lo, hi))
        } else {
            None
        }
    }

    pub fn total_population(&self) -> u64 {
        self.rows.iter().map(|r| r.population_total).sum()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{RawRecord, fold_states};
    use crate::domain::FirstRowPolicy;

    fn two_states() -> StateAggregates {
        fold_states(
            vec![
                RawRecord::new(1, 1, 80, 20),
                RawRecord::new(1, 2, 70, 10),
                RawRecord::new(2, 1, 50, 50),
                RawRecord::new(2, 3, 30, 10),
                RawRecord::new(2, 5, 45, 15),
            ],
            FirstRowPolicy::Skip,
        )
    }

    #[test]
    fn ratio_is_exact_percentage() {
        let ratios = subject_ratios(&two_states()).unwrap();
        assert_eq!(ratios, vec![10.0 / 80.0 * 100.0, 25.0 / 100.0 * 100.0]);
        assert_eq!(ratios[0], 12.5);
    }

    #[test]
    fn zero_population_is_a_division_error() {
        let agg = fold_states(vec![RawRecord::new(1, 1, 9, 1)], FirstRowPolicy::Skip);
        let err = subject_ratios(&agg).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_COMPUTE);
        assert!(err.message().contains("state 01"));
    }

    #[test]
    fn total_population_sums_states() {
        let agg = two_states();
        assert_eq!(total_population(&agg), 80 + 100);
        assert_eq!(total_population(&StateAggregates::default()), 0);
    }

    #[test]
    fn table_zips_abbreviations_by_position() {
        let table = StateTable::build(&two_states(), &StateCatalog::new(["AL", "AK"])).unwrap();
        assert_eq!(table.rows[0].fips_code, "01");
        assert_eq!(table.rows[1].abbreviation, "AK");
        assert_eq!(table.by_abbreviation("al").map(|r| r.population_total), Some(80));
        assert_eq!(table.get(2).map(|r| r.ratio), Some(25.0));
        assert_eq!(table.ratio_range(), Some((12.5, 25.0)));
        assert_eq!(table.total_population(), 180);
    }

    #[test]
    fn table_rejects_catalog_length_mismatch() {
        let err = StateTable::build(&two_states(), &StateCatalog::new(["AL"])).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_DATA);
    }
}
