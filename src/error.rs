//! Error handling for partner normalization.
//!
//! Configuration and source errors carry the partner identifier so they can
//! be acted on; value-level normalization failures are never errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Configuration error for partner '{partner}': {message}")]
    Configuration { partner: String, message: String },

    #[error("Failed to load configuration file {path}: {reason}")]
    ConfigFile { path: PathBuf, reason: String },

    #[error("Source file for partner '{partner}' not found: {path}")]
    SourceNotFound { partner: String, path: PathBuf },

    #[error("Failed to read source file for partner '{partner}' ({path}): {reason}")]
    SourceRead {
        partner: String,
        path: PathBuf,
        reason: String,
    },

    #[error("Failed to write output file {path}: {reason}")]
    OutputWrite { path: PathBuf, reason: String },

    #[error("Processing task for partner '{partner}' failed: {reason}")]
    TaskFailed { partner: String, reason: String },
}

impl PipelineError {
    /// Create a configuration error attributed to a partner
    pub fn configuration(partner: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            partner: partner.into(),
            message: message.into(),
        }
    }

    /// Partner the error is attributed to, if it is partner-scoped
    pub fn partner(&self) -> Option<&str> {
        match self {
            Self::Configuration { partner, .. }
            | Self::SourceNotFound { partner, .. }
            | Self::SourceRead { partner, .. }
            | Self::TaskFailed { partner, .. } => Some(partner),
            _ => None,
        }
    }

    /// Whether the skip policy may continue past this error
    ///
    /// Only failures confined to one partner's configuration or source file
    /// qualify; everything else aborts the run.
    pub fn is_partner_scoped(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::SourceNotFound { .. } | Self::SourceRead { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
