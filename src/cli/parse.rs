//! CLI parse: clap types for direct-store. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// direct-store CLI - inspect the facade layout of a module shape file
#[derive(Parser)]
#[command(name = "direct-store")]
#[command(about = "Inspect namespace-resolved facade layouts of dispatch store option trees")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every facade member with its dispatch key
    Keys {
        /// Module shape file (.toml or .json)
        shape: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
        /// Only list one kind (getter, mutation, action)
        #[arg(long)]
        kind: Option<String>,
    },
    /// Print the nested facade layout
    Tree {
        /// Module shape file (.toml or .json)
        shape: PathBuf,
    },
    /// Print the dispatch-key prefix of a module
    Prefix {
        /// Module shape file (.toml or .json)
        shape: PathBuf,
        /// Module path, e.g. `cart/items`; empty for the root
        #[arg(default_value = "")]
        module: String,
    },
}
