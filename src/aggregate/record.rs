//! Resolve raw census rows into county records.

use crate::data::RawTable;
use crate::domain::FeedLayout;
use crate::error::AppError;

/// One county-level row.
///
/// `complement` is everyone outside the subject group (insured people, people
/// not in poverty); `subject` is the group the ratio is about. `None` means the
/// source suppressed the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord {
    pub state_code: u32,
    pub county_code: u32,
    pub complement: Option<u64>,
    pub subject: Option<u64>,
}

impl RawRecord {
    pub fn new(state_code: u32, county_code: u32, complement: u64, subject: u64) -> Self {
        Self {
            state_code,
            county_code,
            complement: Some(complement),
            subject: Some(subject),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Measures {
    Counts { complement: usize, subject: usize },
    CountAndRate { count: usize, rate: usize },
}

/// A `FeedLayout` bound to the column positions of one table.
#[derive(Debug, Clone, Copy)]
pub struct RecordReader {
    state: usize,
    county: usize,
    measures: Measures,
}

impl RecordReader {
    pub fn resolve(layout: &FeedLayout, table: &RawTable) -> Result<Self, AppError> {
        let state = table.column(layout.state_column())?;
        let county = table.column(layout.county_column())?;
        let measures = match layout {
            FeedLayout::Counts {
                complement,
                subject,
                ..
            } => Measures::Counts {
                complement: table.column(complement)?,
                subject: table.column(subject)?,
            },
            FeedLayout::CountAndRate { count, rate, .. } => Measures::CountAndRate {
                count: table.column(count)?,
                rate: table.column(rate)?,
            },
        };
        Ok(Self {
            state,
            county,
            measures,
        })
    }

    /// Read one data row.
    ///
    /// Returns `Ok(None)` when a measure is absent; such rows are dropped
    /// before their geographic codes are even looked at.
    pub fn read(&self, row: &[Option<String>]) -> Result<Option<RawRecord>, AppError> {
        let (complement, subject) = match self.measures {
            Measures::Counts {
                complement,
                subject,
            } => {
                let (Some(c), Some(s)) = (cell(row, complement), cell(row, subject)) else {
                    return Ok(None);
                };
                (parse_count(c)?, parse_count(s)?)
            }
            Measures::CountAndRate { count, rate } => {
                let (Some(c), Some(r)) = (cell(row, count), cell(row, rate)) else {
                    return Ok(None);
                };
                let count = parse_count(c)?;
                let rate = parse_rate(r)?;
                // The universe cannot be recovered from a zero rate, so even a
                // genuine zero-poverty county drops out of the totals.
                if rate <= 0.0 {
                    return Ok(None);
                }
                let universe = ((count as f64) * 100.0 / rate).round() as u64;
                (universe.saturating_sub(count), count)
            }
        };

        let state_code = parse_code(row, self.state, "state")?;
        let county_code = parse_code(row, self.county, "county")?;

        Ok(Some(RawRecord {
            state_code,
            county_code,
            complement: Some(complement),
            subject: Some(subject),
        }))
    }
}

fn cell(row: &[Option<String>], idx: usize) -> Option<&str> {
    row.get(idx).and_then(|c| c.as_deref())
}

fn parse_code(row: &[Option<String>], idx: usize, what: &str) -> Result<u32, AppError> {
    let raw = cell(row, idx).ok_or_else(|| AppError::data(format!("Row is missing its {what} code.")))?;
    raw.trim()
        .parse::<u32>()
        .map_err(|e| AppError::data(format!("Invalid {what} code '{raw}': {e}")))
}

fn parse_count(raw: &str) -> Result<u64, AppError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| AppError::data(format!("Invalid count '{raw}': {e}")))
}

fn parse_rate(raw: &str) -> Result<f64, AppError> {
    let v = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| AppError::data(format!("Invalid rate '{raw}': {e}")))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(AppError::data(format!("Invalid rate '{raw}'.")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeedConfig;

    fn row(cells: &[Option<&str>]) -> Vec<Option<String>> {
        cells.iter().map(|c| c.map(str::to_string)).collect()
    }

    fn sahie_table() -> RawTable {
        RawTable {
            header: ["NIC_PT", "NUI_PT", "NAME", "time", "state", "county"]
                .map(String::from)
                .to_vec(),
            rows: Vec::new(),
        }
    }

    #[test]
    fn reads_counts_by_header_name() {
        let table = sahie_table();
        let reader = RecordReader::resolve(&FeedConfig::sahie(2020).layout, &table).unwrap();
        let rec = reader
            .read(&row(&[Some("80"), Some("20"), Some("X"), Some("2020"), Some("01"), Some("003")]))
            .unwrap();
        assert_eq!(rec, Some(RawRecord::new(1, 3, 80, 20)));
    }

    #[test]
    fn absent_measure_skips_before_code_parsing() {
        let table = sahie_table();
        let reader = RecordReader::resolve(&FeedConfig::sahie(2020).layout, &table).unwrap();
        let rec = reader
            .read(&row(&[None, Some("20"), None, None, Some("not-a-code"), None]))
            .unwrap();
        assert_eq!(rec, None);
    }

    #[test]
    fn absent_subject_is_skipped_like_absent_complement() {
        let table = sahie_table();
        let reader = RecordReader::resolve(&FeedConfig::sahie(2020).layout, &table).unwrap();
        let rec = reader
            .read(&row(&[Some("80"), None, Some("X"), Some("2020"), Some("01"), Some("003")]))
            .unwrap();
        assert_eq!(rec, None);

        let short_row = reader.read(&row(&[Some("80")])).unwrap();
        assert_eq!(short_row, None);
    }

    #[test]
    fn bad_codes_and_counts_are_data_errors() {
        let table = sahie_table();
        let reader = RecordReader::resolve(&FeedConfig::sahie(2020).layout, &table).unwrap();
        let err = reader
            .read(&row(&[Some("1"), Some("2"), None, None, Some("AL"), Some("001")]))
            .unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_DATA);

        let err = reader
            .read(&row(&[Some("1.5"), Some("2"), None, None, Some("01"), Some("001")]))
            .unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_DATA);
    }

    #[test]
    fn count_and_rate_recovers_universe() {
        let table = RawTable {
            header: ["SAEPOVALL_PT", "SAEPOVRTALL_PT", "NAME", "time", "state", "county"]
                .map(String::from)
                .to_vec(),
            rows: Vec::new(),
        };
        let reader = RecordReader::resolve(&FeedConfig::saipe(2020).layout, &table).unwrap();

        let rec = reader
            .read(&row(&[Some("250"), Some("12.5"), None, None, Some("06"), Some("001")]))
            .unwrap()
            .unwrap();
        assert_eq!(rec.subject, Some(250));
        assert_eq!(rec.complement, Some(1750));

        let missing_rate = reader
            .read(&row(&[Some("250"), None, None, None, Some("06"), Some("005")]))
            .unwrap();
        assert_eq!(missing_rate, None);
    }

    #[test]
    fn zero_poverty_rate_drops_the_county() {
        let table = RawTable {
            header: ["SAEPOVALL_PT", "SAEPOVRTALL_PT", "NAME", "time", "state", "county"]
                .map(String::from)
                .to_vec(),
            rows: Vec::new(),
        };
        let reader = RecordReader::resolve(&FeedConfig::saipe(2020).layout, &table).unwrap();

        for rate in ["0.0", "0", "-1.5"] {
            let rec = reader
                .read(&row(&[Some("0"), Some(rate), None, None, Some("06"), Some("003")]))
                .unwrap();
            assert_eq!(rec, None, "rate {rate}");
        }
    }

    #[test]
    fn unresolvable_layout_is_reported() {
        let table = RawTable {
            header: vec!["state".into(), "county".into()],
            rows: Vec::new(),
        };
        let err = RecordReader::resolve(&FeedConfig::sahie(2020).layout, &table).unwrap_err();
        assert!(err.message().contains("NIC_PT"));
    }
}
