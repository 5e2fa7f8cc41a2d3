//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Multi-reviewer systematic-review screening workflow
#[derive(Parser, Debug)]
#[command(name = "screening-quorum")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v info, -vv debug, -vvv trace); overrides logging.level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to a configuration file, layered over the global and project files
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Ignore all configuration files and use built-in defaults
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Print the configuration sources and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the first stage of the configured project with generated reviewers
    Demo {
        /// Make the last reviewer exclude the record instead of including it
        #[arg(long)]
        disagree: bool,
    },
    /// Validate the configuration and report every issue found
    CheckConfig,
}
