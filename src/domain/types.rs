//! Shared domain types.
//!
//! Everything that used to be a module-wide constant (column names, the
//! abbreviation order, endpoint URLs) lives in a plain value here so that the
//! aggregators can be driven by small synthetic configurations in tests.

use std::path::PathBuf;

use clap::ValueEnum;

const SAHIE_URL: &str = "https://api.census.gov/data/timeseries/healthins/sahie";
const SAIPE_URL: &str = "https://api.census.gov/data/timeseries/poverty/saipe";

/// Default year of the published estimates.
pub const DEFAULT_YEAR: u16 = 2020;

/// State + DC abbreviations in ascending FIPS order (01 AL … 56 WY).
pub const FIPS_ORDER_ABBREVIATIONS: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM",
    "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA",
    "WV", "WI", "WY",
];

/// Which small-area dataset an aggregator works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Dataset {
    /// SAHIE: insured / uninsured counts.
    Insurance,
    /// SAIPE: people in poverty.
    Poverty,
}

impl Dataset {
    pub fn display_name(self) -> &'static str {
        match self {
            Dataset::Insurance => "Health insurance (SAHIE)",
            Dataset::Poverty => "Poverty (SAIPE)",
        }
    }

    /// Label for the quantity the ratio is about.
    pub fn subject_label(self) -> &'static str {
        match self {
            Dataset::Insurance => "uninsured",
            Dataset::Poverty => "in poverty",
        }
    }

    /// Label for everyone else in the population.
    pub fn complement_label(self) -> &'static str {
        match self {
            Dataset::Insurance => "insured",
            Dataset::Poverty => "not in poverty",
        }
    }

    pub fn ratio_label(self) -> &'static str {
        match self {
            Dataset::Insurance => "% uninsured",
            Dataset::Poverty => "% in poverty",
        }
    }

    pub fn map_title(self, year: u16) -> String {
        match self {
            Dataset::Insurance => format!("Percentage of Uninsured Population by State - {year}"),
            Dataset::Poverty => format!("Percentage of People in Poverty by State - {year}"),
        }
    }

    pub fn color_scale(self) -> ColorScale {
        match self {
            Dataset::Insurance => ColorScale::RdBu,
            Dataset::Poverty => ColorScale::Viridis,
        }
    }
}

/// Continuous color scales used by the choropleth views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScale {
    RdBu,
    Viridis,
}

/// What to do with the first kept row of every state.
///
/// `SeedStateCode` starts the county tracker at the state's own code, so the
/// first row is dropped only when its county code equals the state code
/// (county 006 of state 06, say). `Skip` always drops the first row, which
/// leaves a single-county state with zero totals. `Count` keeps every first row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FirstRowPolicy {
    #[default]
    SeedStateCode,
    Skip,
    Count,
}

/// Ordered list of state abbreviations zipped positionally onto a state table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateCatalog {
    pub abbreviations: Vec<String>,
}

impl StateCatalog {
    pub fn new<I, S>(abbreviations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            abbreviations: abbreviations.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.abbreviations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abbreviations.is_empty()
    }
}

impl Default for StateCatalog {
    fn default() -> Self {
        Self::new(FIPS_ORDER_ABBREVIATIONS)
    }
}

/// How the columns of a raw census table map onto a county record.
///
/// Column names are resolved against the header row at fold time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedLayout {
    /// Two count columns: everyone else and the subject group.
    Counts {
        state: String,
        county: String,
        complement: String,
        subject: String,
    },
    /// A subject count and the subject's share of the county in percent.
    ///
    /// The county universe is recovered as `round(count * 100 / rate)`. A rate
    /// of zero or below leaves the universe unknown and the row counts as absent.
    CountAndRate {
        state: String,
        county: String,
        count: String,
        rate: String,
    },
}

impl FeedLayout {
    pub fn state_column(&self) -> &str {
        match self {
            FeedLayout::Counts { state, .. } | FeedLayout::CountAndRate { state, .. } => state,
        }
    }

    pub fn county_column(&self) -> &str {
        match self {
            FeedLayout::Counts { county, .. } | FeedLayout::CountAndRate { county, .. } => county,
        }
    }
}

/// Everything needed to request one county-level table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub dataset: Dataset,
    pub endpoint: String,
    pub year: u16,
    /// Variables listed in `get=`.
    pub measures: Vec<String>,
    /// Extra predicate filters (`AGECAT=0`, …).
    pub predicates: Vec<(String, String)>,
    pub layout: FeedLayout,
}

impl FeedConfig {
    /// SAHIE county totals: all ages, all incomes, both sexes, all races.
    pub fn sahie(year: u16) -> Self {
        Self {
            dataset: Dataset::Insurance,
            endpoint: SAHIE_URL.to_string(),
            year,
            measures: vec!["NIC_PT".into(), "NUI_PT".into(), "NAME".into()],
            predicates: vec![
                ("AGECAT".into(), "0".into()),
                ("IPRCAT".into(), "0".into()),
                ("SEXCAT".into(), "0".into()),
                ("RACECAT".into(), "0".into()),
            ],
            layout: FeedLayout::Counts {
                state: "state".into(),
                county: "county".into(),
                complement: "NIC_PT".into(),
                subject: "NUI_PT".into(),
            },
        }
    }

    /// SAIPE county estimates of people of all ages in poverty.
    pub fn saipe(year: u16) -> Self {
        Self {
            dataset: Dataset::Poverty,
            endpoint: SAIPE_URL.to_string(),
            year,
            measures: vec!["SAEPOVALL_PT".into(), "SAEPOVRTALL_PT".into(), "NAME".into()],
            predicates: Vec::new(),
            layout: FeedLayout::CountAndRate {
                state: "state".into(),
                county: "county".into(),
                count: "SAEPOVALL_PT".into(),
                rate: "SAEPOVRTALL_PT".into(),
            },
        }
    }

    pub fn for_dataset(dataset: Dataset, year: u16) -> Self {
        match dataset {
            Dataset::Insurance => Self::sahie(year),
            Dataset::Poverty => Self::saipe(year),
        }
    }
}

/// Where the FIPS reference text comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FipsSource {
    /// The copy compiled into the binary.
    #[default]
    Embedded,
    File(PathBuf),
}

/// Run-wide settings assembled from CLI flags.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub year: u16,
    pub first_row: FirstRowPolicy,
    pub fips: FipsSource,
    pub catalog: StateCatalog,
    /// Print text renderings instead of launching the terminal UI.
    pub plain: bool,
    pub plot_width: usize,
    pub plot_height: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            year: DEFAULT_YEAR,
            first_row: FirstRowPolicy::default(),
            fips: FipsSource::default(),
            catalog: StateCatalog::default(),
            plain: false,
            plot_width: 80,
            plot_height: 24,
        }
    }
}
