mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::catalog::{SearchArgs, ShowArgs};
use commands::consultation::ConsultArgs;
use commands::emi::EmiArgs;
use commands::listing::ListingArgs;
use realty_core::catalog::ListingStatus;

/// EMI calculator and property catalog search
#[derive(Parser)]
#[command(
    name = "realty",
    version,
    about = "EMI calculator and property catalog search",
    long_about = "Loan EMI and amortization schedules, property catalog search with \
                  filters and sorting, sell-listing and consultation request validation for the Raarya \
                  brokerage listings."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log debug detail to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the monthly EMI, totals and optional amortization schedule
    Emi(EmiArgs),
    /// Search the property catalog with filters and sorting
    Search(SearchArgs),
    /// Search listings that are for sale
    Buy(SearchArgs),
    /// Search listings that are for rent
    Rent(SearchArgs),
    /// Show a single listing by id
    Show(ShowArgs),
    /// Validate a sell-property listing through the wizard steps
    ListDraft(ListingArgs),
    /// Validate an expert or legal consultation request
    Consult(ConsultArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "realty=debug" } else { "realty=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::emi::run_emi(args),
        Commands::Search(args) => commands::catalog::run_search(args, None),
        Commands::Buy(args) => commands::catalog::run_search(args, Some(ListingStatus::ForSale)),
        Commands::Rent(args) => commands::catalog::run_search(args, Some(ListingStatus::ForRent)),
        Commands::Show(args) => commands::catalog::run_show(args),
        Commands::ListDraft(args) => commands::listing::run_list_draft(args),
        Commands::Consult(args) => commands::consultation::run_consult(args),
        Commands::Version => {
            println!("realty {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
