//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - fetches and aggregates the census feeds
//! - prints text output or launches the terminal UI
//! - writes optional exports

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::menu::MenuChoice;
use crate::cli::{AnalysisArgs, Command, ExportArgs};
use crate::data::{CensusClient, FipsLookup};
use crate::domain::{AnalysisConfig, Dataset};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `census-trends` binary.
pub fn run() -> Result<(), AppError> {
    // Running with no subcommand (or only flags) opens the menu.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    init_logging(cli.verbose);

    match cli.command {
        Command::Menu(args) => {
            let choice = crate::cli::menu::prompt_stdin()?;
            debug!(?choice, "menu selection");
            match choice {
                MenuChoice::Insurance => handle_dataset(Dataset::Insurance, &args),
                MenuChoice::Poverty => handle_dataset(Dataset::Poverty, &args),
                MenuChoice::Trend => handle_trend(&args),
            }
        }
        Command::Insurance(args) => handle_dataset(Dataset::Insurance, &args),
        Command::Poverty(args) => handle_dataset(Dataset::Poverty, &args),
        Command::Trend(args) => handle_trend(&args),
        Command::Export(args) => handle_export(&args),
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

fn load_lookup(config: &AnalysisConfig) -> Result<FipsLookup, AppError> {
    FipsLookup::load(&config.fips)
}

fn handle_dataset(dataset: Dataset, args: &AnalysisArgs) -> Result<(), AppError> {
    let config = args.to_config();
    let lookup = load_lookup(&config)?;
    let client = CensusClient::from_env();
    let run = pipeline::run_dataset(&client, dataset, &config)?;

    if config.plain {
        println!("{}", crate::report::format_summary(&run.table, dataset, run.year));
        println!(
            "{}",
            crate::plot::render_tile_map(&run.table, dataset, &dataset.map_title(run.year))
        );
        println!("{}", crate::report::format_state_table(&run.table, dataset, &lookup));
        return Ok(());
    }

    crate::tui::run_map(run, lookup)
}

fn handle_trend(args: &AnalysisArgs) -> Result<(), AppError> {
    let config = args.to_config();
    let lookup = load_lookup(&config)?;
    let client = CensusClient::from_env();
    let run = pipeline::run_trend(&client, &config)?;

    if config.plain {
        println!("{}", crate::report::format_trend(&run.trend, run.year));
        println!(
            "{}",
            crate::plot::render_scatter(&run.trend, config.plot_width, config.plot_height)
        );
        return Ok(());
    }

    crate::tui::run_trend(run, lookup)
}

fn handle_export(args: &ExportArgs) -> Result<(), AppError> {
    let config = args.analysis.to_config();
    let client = CensusClient::from_env();
    let run = pipeline::run_dataset(&client, args.dataset, &config)?;
    crate::io::write_state_table_csv(&args.out, &run.table, args.dataset)?;
    println!(
        "Wrote {} states ({}) to {}",
        run.table.len(),
        args.dataset.display_name(),
        args.out.display()
    );
    Ok(())
}

/// Rewrite argv so a bare invocation opens the menu.
///
/// Rules:
/// - `census-trends`                     -> `census-trends menu`
/// - `census-trends --year 2019 ...`     -> `census-trends menu --year 2019 ...`
/// - `census-trends --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("menu".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "menu" | "insurance" | "poverty" | "trend" | "export"
    );
    if is_subcommand {
        return argv;
    }

    // A leading flag belongs to the menu.
    if arg1.starts_with('-') {
        argv.insert(1, "menu".to_string());
        return argv;
    }

    argv
}
