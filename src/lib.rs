//! Partner Normalizer Library
//!
//! Merges eligibility extracts from several partners into one dataset with a
//! standard schema. Each partner delivers a delimited file with its own column
//! names and value formats; a YAML configuration maps those columns onto the
//! standard fields.
//!
//! This library provides tools for:
//! - Loading and validating per-partner column mappings
//! - Normalizing names, emails, dates of birth and phone numbers
//! - Concatenating partners in declaration order with an optional
//!   external_id presence filter
//! - Writing the unified dataset as CSV

pub mod aggregator;
pub mod config;
pub mod constants;
pub mod error;
pub mod mapping;
pub mod models;
pub mod normalizer;
pub mod processor;
pub mod transform;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use aggregator::{Aggregator, ExternalIdPresent, RecordFilter};
pub use config::{ErrorPolicy, PartnersConfig, PipelineOptions};
pub use error::{PipelineError, Result};
pub use models::{NormalizedRecord, RunReport, StandardField, UnifiedDataset};
pub use processor::NormalizationPipeline;
