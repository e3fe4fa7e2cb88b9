//! Command-line argument definitions for the partner normalizer
//!
//! Defines the CLI interface using the clap derive API and converts parsed
//! arguments into [`PipelineOptions`].

use crate::config::{ErrorPolicy, PipelineOptions};
use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the partner normalizer
///
/// Reads every partner extract declared in the configuration file, maps it
/// onto the standard eligibility schema and writes one unified CSV file.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "partner-normalizer",
    version,
    about = "Merge partner eligibility extracts into one standard CSV schema",
    long_about = "Reads delimited eligibility extracts from several partners, each with its own \
                  column names and value formats, maps them onto a standard schema \
                  (external_id, first_name, last_name, dob, email, phone, partner_code) and \
                  writes a single unified CSV file in partner declaration order."
)]
pub struct Args {
    /// Partner configuration file (YAML)
    #[arg(
        short = 'c',
        long = "config",
        value_name = "PATH",
        help = "Partner configuration file (YAML)"
    )]
    pub config: PathBuf,

    /// Directory containing the partner source files
    ///
    /// Each partner's `file_name` is resolved relative to this directory.
    #[arg(
        short = 'i',
        long = "input-dir",
        alias = "input_dir",
        value_name = "DIR",
        help = "Directory containing the partner source files"
    )]
    pub input_dir: PathBuf,

    /// Path of the unified CSV file
    ///
    /// Parent directories are created if they don't exist.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        help = "Path of the unified CSV file"
    )]
    pub output: PathBuf,

    /// Drop records whose external_id is missing or blank
    #[arg(long = "drop-missing-external-id", alias = "drop_missing_external_id")]
    pub drop_missing_external_id: bool,

    /// What to do when a partner cannot be processed
    #[arg(
        long = "on-partner-error",
        value_enum,
        default_value_t = ErrorPolicy::Abort,
        help = "What to do when a partner cannot be processed"
    )]
    pub on_partner_error: ErrorPolicy,

    /// Number of partners processed at the same time
    ///
    /// Defaults to the number of CPU cores, up to a small cap.
    #[arg(
        long = "max-concurrent-partners",
        value_name = "N",
        value_parser = clap::value_parser!(u16).range(1..),
        help = "Number of partners processed at the same time"
    )]
    pub max_concurrent_partners: Option<u16>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl Args {
    /// Get the log level based on verbosity settings
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Pipeline options selected on the command line
    pub fn pipeline_options(&self) -> PipelineOptions {
        let mut options = PipelineOptions::new(&self.input_dir)
            .with_drop_missing_external_id(self.drop_missing_external_id)
            .with_error_policy(self.on_partner_error)
            .with_progress(self.show_progress());

        if let Some(max_partners) = self.max_concurrent_partners {
            options = options.with_max_concurrent_partners(max_partners as usize);
        }

        options
    }
}
