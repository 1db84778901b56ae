//! Command-line argument parsing for medtechone
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// medtechone - Query the MedTechONE knowledge base from the terminal
#[derive(Parser, Debug)]
#[command(name = "medtechone")]
#[command(version)]
#[command(about = "Hybrid retrieval over MedTechONE regulatory documents and resources", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress everything but results)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Retrieve passages relevant to a question
    Search {
        /// Question to search for
        #[arg(value_name = "QUERY")]
        query: String,

        /// Stop after this many milliseconds and return what was found
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Print the passages as JSON
        #[arg(long)]
        json: bool,
    },

    /// List ranked resources from the catalog
    Resources {
        /// Keep resources whose title, description, topics or theme contain this text
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// List crawled documentation pages
    Pages,

    /// Print the full content of a documentation page
    Page {
        /// Page URL
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Display current configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Default log directive for this level
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "info",
            Verbosity::VeryVerbose => "debug",
        }
    }

    /// Check if should show stage outcomes
    pub fn show_stages(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }
}
