//! decitab CLI
//!
//! Command-line tools for decitab lookup tables.
//!
//! # Commands
//!
//! - `inspect` - Build a table file and display its structure
//! - `verify` - Check a table file for uniqueness and overlap violations
//! - `query` - Look up the payload for a key tuple

mod commands;
mod table_file;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// decitab command-line table tools.
#[derive(Parser)]
#[command(name = "decitab")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a table file and display its structure
    Inspect {
        /// Path to the table file
        file: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Check a table file for build violations
    Verify {
        /// Path to the table file
        file: PathBuf,
    },

    /// Look up the payload for a key tuple
    Query {
        /// Path to the table file
        file: PathBuf,

        /// Key value, one per column in schema order
        #[arg(short, long = "key", required = true)]
        keys: Vec<String>,

        /// Print every matching payload
        #[arg(short, long)]
        all: bool,

        /// Print this value when nothing matches
        #[arg(short, long, conflicts_with = "all")]
        default: Option<String>,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Inspect { file, format } => {
            commands::inspect::run(&file, &format)?;
        }
        Commands::Verify { file } => {
            commands::verify::run(&file)?;
        }
        Commands::Query {
            file,
            keys,
            all,
            default,
        } => {
            commands::query::run(&file, &keys, all, default.as_deref())?;
        }
        Commands::Version => {
            println!("decitab CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("decitab Core v{}", decitab_core::VERSION);
        }
    }

    Ok(())
}
