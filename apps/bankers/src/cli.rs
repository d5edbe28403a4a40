//! Command line interface definition

use bankers_types::{ColorChoice, RoundPolicy};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// bankers - deadlock-avoidance safety checker
#[derive(Parser)]
#[command(name = "bankers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check resource-allocation snapshots for a safe completion order")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging to the log directory
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Where the snapshot to evaluate comes from
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Named dataset from the dataset file
    #[arg(long, short = 'd', value_name = "NAME", conflicts_with = "file")]
    pub dataset: Option<String>,

    /// JSON file holding a single dataset
    #[arg(long, short = 'f', value_name = "PATH")]
    pub file: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Decide whether a snapshot is safe and print one safe sequence
    ///
    /// Without --dataset or --file the built-in five-process example is used.
    Check {
        #[command(flatten)]
        source: SourceArgs,

        /// Round policy for the scan
        #[arg(long, value_enum)]
        policy: Option<RoundPolicy>,

        /// Replay this completion order instead, e.g. "1,3,4,0,2" or "P1 P3 P4 P0 P2"
        #[arg(long, value_name = "ORDER")]
        verify: Option<String>,
    },

    /// Step through the safety scan one admission at a time
    Play {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(long, value_enum)]
        policy: Option<RoundPolicy>,

        /// Pause between steps in milliseconds
        #[arg(long, value_name = "MS")]
        delay_ms: Option<u64>,

        /// Render every step without pausing
        #[arg(long)]
        no_animate: bool,
    },

    /// Type in a snapshot interactively, then check it
    Enter {
        /// Save the entered snapshot under this name
        #[arg(long, value_name = "NAME")]
        save: Option<String>,

        #[arg(long, value_enum)]
        policy: Option<RoundPolicy>,
    },

    /// Manage named datasets
    #[command(subcommand)]
    Dataset(DatasetCommands),
}

#[derive(Subcommand)]
pub enum DatasetCommands {
    /// List saved datasets
    #[command(alias = "ls")]
    List,

    /// Show a dataset's matrices
    Show {
        name: String,
    },

    /// Delete a dataset
    #[command(alias = "rm")]
    Remove {
        name: String,
    },

    /// Validate a dataset JSON file and save it under a name
    Import {
        name: String,
        path: PathBuf,
    },
}

impl Commands {
    /// Name reported in operation lifecycle events
    pub fn operation(&self) -> &'static str {
        match self {
            Commands::Check { verify: Some(_), .. } => "verify",
            Commands::Check { .. } => "check",
            Commands::Play { .. } => "play",
            Commands::Enter { .. } => "enter",
            Commands::Dataset(DatasetCommands::List) => "dataset list",
            Commands::Dataset(DatasetCommands::Show { .. }) => "dataset show",
            Commands::Dataset(DatasetCommands::Remove { .. }) => "dataset remove",
            Commands::Dataset(DatasetCommands::Import { .. }) => "dataset import",
        }
    }
}
