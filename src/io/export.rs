//! Export the labeled state table to CSV.
//!
//! Column order: fips, state abbreviation, ratio, complement, subject,
//! population. Header names follow the dataset (`insured`/`uninsured`, …).

use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::aggregate::StateTable;
use crate::domain::Dataset;
use crate::error::AppError;

pub fn header(dataset: Dataset) -> [String; 6] {
    let slug = |s: &str| s.replace(' ', "_");
    [
        "fips".to_string(),
        "state_abbreviation".to_string(),
        format!("{}_ratio", slug(dataset.subject_label())),
        format!("{}_total", slug(dataset.complement_label())),
        format!("{}_total", slug(dataset.subject_label())),
        "population_total".to_string(),
    ]
}

/// Write the table as CSV to any writer.
pub fn write_state_table<W: Write>(writer: W, table: &StateTable, dataset: Dataset) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(header(dataset))
        .map_err(|e| AppError::usage(format!("Failed to write export CSV header: {e}")))?;

    for r in &table.rows {
        wtr.write_record([
            r.fips_code.clone(),
            r.abbreviation.clone(),
            format!("{:.6}", r.ratio),
            r.complement_total.to_string(),
            r.subject_total.to_string(),
            r.population_total.to_string(),
        ])
        .map_err(|e| AppError::usage(format!("Failed to write export CSV row: {e}")))?;
    }

    wtr.flush()
        .map_err(|e| AppError::usage(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Write the table to a CSV file.
pub fn write_state_table_csv(path: &Path, table: &StateTable, dataset: Dataset) -> Result<(), AppError> {
    let file = std::fs::File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_state_table(file, table, dataset)?;
    info!(path = %path.display(), rows = table.len(), "wrote state table");
    Ok(())
}
