//! Command-line parsing.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the aggregation/math code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{AnalysisConfig, DEFAULT_YEAR, Dataset, FipsSource, FirstRowPolicy, StateCatalog};

pub mod menu;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "census-trends",
    version,
    about = "State-level uninsured and poverty rates from Census small-area estimates"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive numeric menu (the default when no subcommand is given).
    Menu(AnalysisArgs),
    /// Choropleth of the uninsured percentage by state.
    Insurance(AnalysisArgs),
    /// Choropleth of the in-poverty percentage by state.
    Poverty(AnalysisArgs),
    /// Scatter of poverty % vs uninsured % with correlation and OLS trend.
    Trend(AnalysisArgs),
    /// Write one dataset's state table to CSV.
    Export(ExportArgs),
}

/// Options shared by every analysis.
#[derive(Debug, Args, Clone)]
pub struct AnalysisArgs {
    /// Estimate year.
    #[arg(long, default_value_t = DEFAULT_YEAR)]
    pub year: u16,

    /// How the first county row of each state is treated by the duplicate check.
    #[arg(long = "first-county", value_enum, default_value_t = FirstRowPolicy::SeedStateCode)]
    pub first_county: FirstRowPolicy,

    /// FIPS reference file (defaults to the built-in copy).
    #[arg(long = "fips-file", value_name = "PATH")]
    pub fips_file: Option<PathBuf>,

    /// Print text renderings instead of launching the terminal UI.
    #[arg(long)]
    pub plain: bool,

    /// Plain plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plain plot height (rows).
    #[arg(long, default_value_t = 24)]
    pub height: usize,
}

/// Options for `export`.
#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    /// Which dataset to export.
    #[arg(long, value_enum, default_value_t = Dataset::Insurance)]
    pub dataset: Dataset,

    /// Output CSV path.
    #[arg(long, value_name = "CSV")]
    pub out: PathBuf,

    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

impl AnalysisArgs {
    pub fn to_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            year: self.year,
            first_row: self.first_county,
            fips: self
                .fips_file
                .clone()
                .map(FipsSource::File)
                .unwrap_or_default(),
            catalog: StateCatalog::default(),
            plain: self.plain,
            plot_width: self.width,
            plot_height: self.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_analysis_flags() {
        let cli = Cli::parse_from([
            "census-trends",
            "-vv",
            "insurance",
            "--year",
            "2019",
            "--first-county",
            "count",
            "--plain",
        ]);
        assert_eq!(cli.verbose, 2);
        let Command::Insurance(args) = cli.command else {
            panic!("expected insurance");
        };
        let config = args.to_config();
        assert_eq!(config.year, 2019);
        assert_eq!(config.first_row, FirstRowPolicy::Count);
        assert!(config.plain);
        assert_eq!(config.fips, FipsSource::Embedded);
    }

    #[test]
    fn first_county_defaults_to_seeded_tracker() {
        let cli = Cli::parse_from(["census-trends", "poverty"]);
        let Command::Poverty(args) = cli.command else {
            panic!("expected poverty");
        };
        assert_eq!(args.to_config().first_row, FirstRowPolicy::SeedStateCode);

        let cli = Cli::parse_from(["census-trends", "trend", "--first-county", "seed-state-code"]);
        let Command::Trend(args) = cli.command else {
            panic!("expected trend");
        };
        assert_eq!(args.first_county, FirstRowPolicy::SeedStateCode);
    }

    #[test]
    fn parses_export() {
        let cli = Cli::parse_from([
            "census-trends",
            "export",
            "--dataset",
            "poverty",
            "--out",
            "pov.csv",
            "--fips-file",
            "fips.txt",
        ]);
        let Command::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.dataset, Dataset::Poverty);
        assert_eq!(args.out, PathBuf::from("pov.csv"));
        assert_eq!(
            args.analysis.to_config().fips,
            FipsSource::File(PathBuf::from("fips.txt"))
        );
    }
}
