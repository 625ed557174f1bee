//! Command-line argument definitions

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    bin::BinCommands, completions::CompletionsArgs, freq::FreqCommands, reference::RefCommands,
    spec::SpecCommands, stats::StatsCommands, testtime::TestTimeCommands, wafer::WaferCommands,
    yld::YieldCommands,
};
use crate::core::config::DATA_DIR_ENV;

/// Calculators for semiconductor test engineering
#[derive(Parser, Debug)]
#[command(name = "semitools", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted by every subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Directory holding the stored collections
    #[arg(long, global = true, env = DATA_DIR_ENV, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub format: OutputFormat,

    /// More log output (-v info, -vv debug)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table on a terminal
    #[default]
    Auto,
    /// Human-readable tables
    Table,
    /// Pretty-printed JSON
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bin definitions used by yield records
    #[command(subcommand)]
    Bin(BinCommands),

    /// Per-wafer yield records broken down by bin
    #[command(subcommand)]
    Yield(YieldCommands),

    /// Good/defective die calculations
    #[command(subcommand)]
    Wafer(WaferCommands),

    /// Parametric specs and measurements
    #[command(subcommand)]
    Spec(SpecCommands),

    /// Data sets, descriptive statistics and Cpk/Ppk
    #[command(subcommand)]
    Stats(StatsCommands),

    /// Test-time profiles and throughput estimates
    #[command(subcommand, name = "testtime")]
    TestTime(TestTimeCommands),

    /// Period/frequency conversion
    #[command(subcommand)]
    Freq(FreqCommands),

    /// Reference tables
    #[command(subcommand, name = "ref")]
    Ref(RefCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
