//! Formatted terminal output: state tables, population summary, trend summary.
//!
//! We keep formatting code in one place so output changes stay localized and
//! the aggregation code never touches presentation.

use crate::aggregate::StateTable;
use crate::data::FipsLookup;
use crate::data::fips::display_name;
use crate::domain::Dataset;
use crate::trend::TrendResult;

/// Full state table with names resolved through the FIPS lookup.
pub fn format_state_table(table: &StateTable, dataset: Dataset, lookup: &FipsLookup) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<4} {:<4} {:<22} {:>12} {:>14} {:>14} {:>14}\n",
        "fips",
        "abbr",
        "state",
        dataset.ratio_label(),
        dataset.complement_label(),
        dataset.subject_label(),
        "population",
    ));
    for r in &table.rows {
        let name = lookup
            .name_for(&r.fips_code)
            .map(display_name)
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<4} {:<4} {:<22} {:>12.2} {:>14} {:>14} {:>14}\n",
            r.fips_code,
            r.abbreviation,
            truncate(&name, 22),
            r.ratio,
            r.complement_total,
            r.subject_total,
            r.population_total,
        ));
    }
    out
}

/// One-paragraph header for a dataset run.
pub fn format_summary(table: &StateTable, dataset: Dataset, year: u16) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {} - {year} ===\n", dataset.display_name()));
    out.push_str(&format!(
        "States: {} | population covered: {}\n",
        table.len(),
        table.total_population()
    ));
    if let Some((lo, hi)) = table.ratio_range() {
        let low = table.rows.iter().find(|r| r.ratio == lo);
        let high = table.rows.iter().find(|r| r.ratio == hi);
        out.push_str(&format!(
            "{}: min {lo:.2} ({}) | max {hi:.2} ({})\n",
            dataset.ratio_label(),
            low.map(|r| r.abbreviation.as_str()).unwrap_or("-"),
            high.map(|r| r.abbreviation.as_str()).unwrap_or("-"),
        ));
    }
    out
}

pub fn format_trend(result: &TrendResult, year: u16) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== Trend between Poverty and Uninsured People by State - {year} ===\n"
    ));
    out.push_str(&format!(
        "States joined: {} | Pearson r = {:.4} | r² = {:.4}\n",
        result.points.len(),
        result.pearson_r,
        result.r_squared
    ));
    out.push_str(&format!(
        "OLS: uninsured% = {:.4} + {:.4} × poverty%\n",
        result.line.intercept, result.line.slope
    ));
    if !result.unmatched.is_empty() {
        let codes: Vec<String> = result.unmatched.iter().map(|c| format!("{c:02}")).collect();
        out.push_str(&format!("Left out (in one table only): {}\n", codes.join(", ")));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut t: String = s.chars().take(max.saturating_sub(1)).collect();
    t.push('…');
    t
}
