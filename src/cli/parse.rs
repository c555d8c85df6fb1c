//! CLI parse: clap types for mcpmerge. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// mcpmerge - manage JSON config snippets and merge the active ones
#[derive(Parser, Debug)]
#[command(name = "mcpmerge", version)]
#[command(about = "Manage JSON config snippets and deep-merge the active ones into one file")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base directory of the store (overrides config)
    #[arg(long, short = 'd', global = true)]
    pub dir: Option<PathBuf>,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stderr, stdout, file, file+stderr)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Add a JSON file to the available documents
    Add {
        /// Path to the JSON file
        file: PathBuf,
        /// Store under this name instead of the file name
        #[arg(long)]
        name: Option<String>,
    },
    /// Enable an available document
    Enable {
        /// Document name (with or without .json)
        name: String,
    },
    /// Disable an active document
    Disable {
        /// Document name (with or without .json)
        name: String,
    },
    /// Remove a document from the available documents
    Remove {
        /// Document name (with or without .json)
        name: String,
    },
    /// List available and active documents
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Merge active documents into the combined file
    Combine {
        /// Output format: text prints a summary, json prints the merged document
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the combined file
    Show,
    /// Back up the current combined file
    Backup,
    /// List backups
    Backups {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
