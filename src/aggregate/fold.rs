//! County → state fold.
//!
//! The feed is expected sorted by state then county. A new state starts
//! whenever the state code changes from the previous kept row. Within a state
//! a row is accumulated only when its county differs from the last tracked
//! county, which drops repeated rows for the same county.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::aggregate::RawRecord;
use crate::domain::FirstRowPolicy;

/// Per-state totals.
///
/// `population_total` is always `complement_total + subject_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateAggregate {
    pub state_code: u32,
    pub complement_total: u64,
    pub subject_total: u64,
    pub population_total: u64,
}

impl StateAggregate {
    pub fn empty(state_code: u32) -> Self {
        Self {
            state_code,
            complement_total: 0,
            subject_total: 0,
            population_total: 0,
        }
    }

    fn add(&mut self, complement: u64, subject: u64) {
        self.complement_total += complement;
        self.subject_total += subject;
        self.population_total += complement + subject;
    }
}

/// State aggregates in encounter order, addressable by state code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateAggregates {
    states: Vec<StateAggregate>,
    index: HashMap<u32, usize>,
}

impl StateAggregates {
    pub fn iter(&self) -> impl Iterator<Item = &StateAggregate> {
        self.states.iter()
    }

    pub fn as_slice(&self) -> &[StateAggregate] {
        &self.states
    }

    pub fn get(&self, state_code: u32) -> Option<&StateAggregate> {
        self.index.get(&state_code).map(|&idx| &self.states[idx])
    }

    pub fn codes(&self) -> Vec<u32> {
        self.states.iter().map(|s| s.state_code).collect()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Open a zeroed entry for `state_code`.
    ///
    /// A code seen before keeps its position but loses its totals.
    fn start(&mut self, state_code: u32) -> usize {
        if let Some(&idx) = self.index.get(&state_code) {
            warn!(state_code, "state reappeared out of order; restarting its totals");
            self.states[idx] = StateAggregate::empty(state_code);
            return idx;
        }
        let idx = self.states.len();
        self.states.push(StateAggregate::empty(state_code));
        self.index.insert(state_code, idx);
        idx
    }
}

impl<'a> IntoIterator for &'a StateAggregates {
    type Item = &'a StateAggregate;
    type IntoIter = std::slice::Iter<'a, StateAggregate>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}

/// Fold county records into state totals.
///
/// Records with an absent measure are ignored outright. The first kept row
/// of each state is handled by `policy`; see [`FirstRowPolicy`].
pub fn fold_states<I>(records: I, policy: FirstRowPolicy) -> StateAggregates
where
    I: IntoIterator<Item = RawRecord>,
{
    let mut out = StateAggregates::default();

    let mut current: Option<(u32, usize)> = None;
    let mut tracked_county: Option<u32> = None;
    let mut first_row_for_state = false;
    let mut skipped_absent = 0usize;

    for rec in records {
        let (Some(complement), Some(subject)) = (rec.complement, rec.subject) else {
            skipped_absent += 1;
            continue;
        };

        let idx = match current {
            Some((code, idx)) if code == rec.state_code => idx,
            _ => {
                let idx = out.start(rec.state_code);
                current = Some((rec.state_code, idx));
                first_row_for_state = true;
                idx
            }
        };

        if first_row_for_state {
            first_row_for_state = false;
            match policy {
                FirstRowPolicy::SeedStateCode => tracked_county = Some(rec.state_code),
                FirstRowPolicy::Count => tracked_county = None,
                FirstRowPolicy::Skip => {
                    tracked_county = Some(rec.county_code);
                    continue;
                }
            }
        }

        if tracked_county != Some(rec.county_code) {
            out.states[idx].add(complement, subject);
            tracked_county = Some(rec.county_code);
        }
    }

    debug!(states = out.len(), skipped_absent, ?policy, "folded county records");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn absent(state_code: u32, county_code: u32) -> RawRecord {
        RawRecord {
            state_code,
            county_code,
            complement: None,
            subject: Some(5),
        }
    }

    fn subject_absent(state_code: u32, county_code: u32) -> RawRecord {
        RawRecord {
            state_code,
            county_code,
            complement: Some(80),
            subject: None,
        }
    }

    #[test]
    fn first_row_seeds_and_later_counties_accumulate() {
        let rows = vec![
            RawRecord::new(1, 1, 80, 20),
            RawRecord::new(1, 2, 70, 10),
            RawRecord::new(1, 3, 30, 5),
        ];
        let agg = fold_states(rows, FirstRowPolicy::Skip);
        let al = agg.get(1).unwrap();
        assert_eq!(al.complement_total, 100);
        assert_eq!(al.subject_total, 15);
        assert_eq!(al.population_total, al.complement_total + al.subject_total);
    }

    #[test]
    fn single_county_state_has_zero_totals() {
        let agg = fold_states(vec![RawRecord::new(11, 1, 600, 20)], FirstRowPolicy::Skip);
        assert_eq!(agg.get(11), Some(&StateAggregate::empty(11)));
    }

    #[test]
    fn repeated_county_rows_are_dropped() {
        let rows = vec![
            RawRecord::new(5, 1, 1, 1),
            RawRecord::new(5, 3, 10, 2),
            RawRecord::new(5, 3, 10, 2),
            RawRecord::new(5, 5, 4, 4),
        ];
        let agg = fold_states(rows, FirstRowPolicy::Skip);
        assert_eq!(agg.get(5).unwrap().population_total, 20);
    }

    #[test]
    fn absent_rows_never_change_totals() {
        let clean = vec![
            RawRecord::new(1, 1, 80, 20),
            RawRecord::new(1, 2, 70, 10),
            RawRecord::new(2, 1, 50, 50),
            RawRecord::new(2, 3, 40, 60),
        ];
        let mut noisy = Vec::new();
        noisy.push(absent(1, 9));
        for (i, rec) in clean.iter().enumerate() {
            noisy.push(subject_absent(rec.state_code, 200 + i as u32));
            noisy.push(*rec);
            noisy.push(absent(rec.state_code, 100 + i as u32));
        }
        noisy.push(absent(3, 1));
        noisy.push(subject_absent(4, 1));

        for policy in [
            FirstRowPolicy::SeedStateCode,
            FirstRowPolicy::Skip,
            FirstRowPolicy::Count,
        ] {
            assert_eq!(fold_states(clean.clone(), policy), fold_states(noisy.clone(), policy));
        }
    }

    #[test]
    fn seeded_tracker_keeps_first_county_unless_it_matches_state_code() {
        let rows = vec![
            RawRecord::new(6, 1, 900, 100),
            RawRecord::new(6, 3, 800, 200),
            RawRecord::new(11, 1, 600, 40),
        ];
        let agg = fold_states(rows, FirstRowPolicy::SeedStateCode);
        assert_eq!(agg.get(6).unwrap().population_total, 2000);
        assert_eq!(agg.get(11).unwrap().population_total, 640);

        // County 001 of state 01 equals the seed and is dropped.
        let rows = vec![
            RawRecord::new(1, 1, 80, 20),
            RawRecord::new(1, 2, 70, 10),
            RawRecord::new(1, 2, 70, 10),
        ];
        let al = fold_states(rows, FirstRowPolicy::SeedStateCode);
        assert_eq!(al.get(1).unwrap().population_total, 80);
    }

    #[test]
    fn count_policy_includes_first_row() {
        let rows = vec![
            RawRecord::new(1, 1, 80, 20),
            RawRecord::new(1, 1, 80, 20),
            RawRecord::new(1, 2, 70, 10),
            RawRecord::new(2, 1, 50, 50),
        ];
        let agg = fold_states(rows, FirstRowPolicy::Count);
        assert_eq!(agg.get(1).unwrap().complement_total, 150);
        assert_eq!(agg.get(1).unwrap().subject_total, 30);
        assert_eq!(agg.get(2).unwrap().population_total, 100);
    }

    #[test]
    fn preserves_encounter_order_without_sorting() {
        let rows = vec![
            RawRecord::new(6, 1, 1, 1),
            RawRecord::new(2, 1, 1, 1),
            RawRecord::new(4, 1, 1, 1),
        ];
        let agg = fold_states(rows, FirstRowPolicy::Skip);
        assert_eq!(agg.codes(), vec![6, 2, 4]);
    }

    #[test]
    fn reappearing_state_restarts_in_place() {
        let rows = vec![
            RawRecord::new(1, 1, 1, 1),
            RawRecord::new(1, 3, 9, 1),
            RawRecord::new(2, 1, 1, 1),
            RawRecord::new(1, 5, 7, 3),
            RawRecord::new(1, 7, 2, 2),
        ];
        let agg = fold_states(rows, FirstRowPolicy::Skip);
        assert_eq!(agg.codes(), vec![1, 2]);
        // Row (1,5) seeds the restarted entry; only (1,7) is counted.
        assert_eq!(agg.get(1).unwrap().population_total, 4);
    }
}
