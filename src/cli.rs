use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::tasks::TaskCategory;

/// debtune - apply performance optimizations to a Debian system
#[derive(Parser)]
#[command(name = "debtune")]
#[command(about = "Select and apply performance optimizations on Debian systems")]
#[command(version)]
pub struct Cli {
    /// Runner configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Dry-run mode: log every command instead of executing it.
    ///
    /// The full run still happens, including progress and status updates,
    /// so a selection can be previewed without elevation.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Write log output to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive terminal UI (default)
    Tui {
        /// Start with the selection saved in a profile file
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Save the selection to this profile file whenever a run starts
        #[arg(long)]
        save_profile: Option<PathBuf>,
    },
    /// List available optimizations
    List {
        /// Only show one category
        #[arg(long)]
        category: Option<TaskCategory>,
    },
    /// Apply optimizations without the UI
    Apply {
        /// Optimization ids, applied in the order given
        #[arg(required_unless_present = "profile", conflicts_with = "profile")]
        ids: Vec<String>,

        /// Apply the selection saved in a profile file
        #[arg(short, long)]
        profile: Option<PathBuf>,
    },
    /// Validate a profile file
    Validate {
        /// Path to profile file to validate
        profile: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }

    /// Headless and list modes log to stderr; only the UI needs a file
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Commands::Tui { .. }))
    }
}
