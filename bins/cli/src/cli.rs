//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use finstat_core::tax::SupplyType;

/// Finstat - balance sheet aggregation, comparison, aging, tax and ratios
#[derive(Debug, Parser)]
#[command(name = "finstat")]
#[command(version, about = "Financial statement aggregation engine", long_about = None)]
pub struct Cli {
    /// Explicit configuration file, layered over `config/default` and `config/{RUN_MODE}`
    #[arg(short = 'c', long = "config", global = true, env = "FINSTAT_CONFIG")]
    pub config: Option<String>,

    /// Print single-line JSON instead of pretty JSON
    #[arg(long = "compact", global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Assemble statements from a request document (or an array of them)
    #[command(name = "statement", aliases = &["stmt"])]
    Statement(StatementArgs),

    /// Assemble one period of a period set, optionally against another
    #[command(name = "period")]
    Period(PeriodArgs),

    /// Summarize invoice tax by rate
    #[command(name = "tax")]
    Tax(TaxArgs),

    /// Classify a due date into an aging bucket
    #[command(name = "aging-bucket")]
    AgingBucket(AgingBucketArgs),

    /// Compute ratios for a balance sheet snapshot
    #[command(name = "ratios")]
    Ratios(InputArgs),
}

/// A single JSON input document. `-` reads standard input.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// Input JSON file
    pub input: PathBuf,
}

/// Arguments for `statement`.
#[derive(Debug, Args)]
pub struct StatementArgs {
    /// Request JSON file: one request object or an array of requests
    pub input: PathBuf,
}

/// Arguments for `period`.
#[derive(Debug, Args)]
pub struct PeriodArgs {
    /// Period set JSON file
    pub input: PathBuf,

    /// Id of the period to report on
    #[arg(short = 'b', long = "base")]
    pub base: String,

    /// Id of the period to compare against
    #[arg(short = 'p', long = "compare")]
    pub compare: Option<String>,
}

/// Arguments for `tax`.
#[derive(Debug, Args)]
pub struct TaxArgs {
    /// Invoice JSON file with `items` and optional `additional_charges`
    pub input: PathBuf,

    /// Also split the tax between authorities for this supply type
    #[arg(short = 's', long = "supply", value_enum)]
    pub supply: Option<SupplyArg>,
}

/// Arguments for `aging-bucket`.
#[derive(Debug, Args)]
pub struct AgingBucketArgs {
    /// Due date (YYYY-MM-DD)
    pub due_date: String,

    /// Date the age is measured at (YYYY-MM-DD)
    pub as_of: String,
}

/// Supply type as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SupplyArg {
    /// Seller and buyer in the same state
    IntraState,
    /// Seller and buyer in different states
    InterState,
}

impl From<SupplyArg> for SupplyType {
    fn from(arg: SupplyArg) -> Self {
        match arg {
            SupplyArg::IntraState => Self::IntraState,
            SupplyArg::InterState => Self::InterState,
        }
    }
}
