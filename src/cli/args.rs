//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Build forests from flat parent-pointer records and query them
#[derive(Parser, Debug)]
#[command(name = "hierarchy")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Populate parent links regardless of config (needed for ancestors and selection)
    #[arg(long, global = true)]
    pub parent_links: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the forest of a record file
    Tree {
        /// Record file (TOML, [[records]] rows)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Mark this node and its ancestors
        #[arg(short, long)]
        select: Option<String>,
    },

    /// Show one node of the forest
    Find {
        /// Record file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node id
        id: String,
    },

    /// List ancestors of a node, root first
    Ancestors {
        /// Record file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node id
        id: String,
    },

    /// List all descendants of a node
    Descendants {
        /// Record file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node id
        id: String,
    },

    /// Summarize roots, depth, leaves and orphans
    Stats {
        /// Record file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print a commented config template
    Template,

    /// Show config paths
    Path,
}
