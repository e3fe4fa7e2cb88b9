//! Configuration management and validation.
//!
//! Loads partner declarations from the YAML configuration file, resolves each
//! declaration into a validated [`PartnerConfig`], and holds the run-level
//! [`PipelineOptions`].

use crate::constants::MAX_DEFAULT_CONCURRENT_PARTNERS;
use crate::error::{PipelineError, Result};
use crate::mapping::FieldMapping;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What to do when a single partner cannot be processed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ErrorPolicy {
    /// Stop the run on the first failing partner and write nothing
    #[default]
    Abort,
    /// Report the failing partner and continue with the rest
    Skip,
}

/// Run-level options for the normalization pipeline
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Directory partner `file_name`s are resolved against
    pub input_dir: PathBuf,

    /// Drop records whose external_id is missing or blank
    pub drop_missing_external_id: bool,

    /// Handling of partner-scoped failures
    pub error_policy: ErrorPolicy,

    /// Number of partners read and normalized at the same time
    pub max_concurrent_partners: usize,

    /// Display a progress bar while partners are processed
    pub show_progress: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            drop_missing_external_id: false,
            error_policy: ErrorPolicy::Abort,
            max_concurrent_partners: num_cpus::get().clamp(1, MAX_DEFAULT_CONCURRENT_PARTNERS),
            show_progress: false,
        }
    }
}

impl PipelineOptions {
    /// Create options reading partner files from `input_dir`
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            ..Default::default()
        }
    }

    /// Enable or disable the external_id presence filter
    pub fn with_drop_missing_external_id(mut self, enabled: bool) -> Self {
        self.drop_missing_external_id = enabled;
        self
    }

    /// Set the partner error policy
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Set the partner concurrency bound (at least one)
    pub fn with_max_concurrent_partners(mut self, max_partners: usize) -> Self {
        self.max_concurrent_partners = max_partners.max(1);
        self
    }

    /// Show a progress bar
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }
}

/// Partner entry as written in the configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct PartnerSettings {
    pub partner_code: String,
    pub file_name: String,
    pub delimiter: String,
    pub mappings: BTreeMap<String, String>,
}

/// Validated configuration for one partner
#[derive(Debug, Clone)]
pub struct PartnerConfig {
    /// Identifier the partner is declared under
    pub id: String,

    /// Position in declaration order
    pub position: usize,

    /// Code attached to every output record of this partner
    pub partner_code: String,

    /// Source file name, relative to the input directory
    pub file_name: PathBuf,

    /// Single-byte field delimiter of the source file
    pub delimiter: u8,

    pub mapping: FieldMapping,
}

impl PartnerConfig {
    /// Validate settings read from configuration
    pub fn from_settings(id: &str, position: usize, settings: PartnerSettings) -> Result<Self> {
        let delimiter = parse_delimiter(id, &settings.delimiter)?;
        if settings.file_name.trim().is_empty() {
            return Err(PipelineError::configuration(id, "file_name is empty"));
        }
        let mapping = FieldMapping::from_entries(id, &settings.mappings)?;

        Ok(Self {
            id: id.to_string(),
            position,
            partner_code: settings.partner_code,
            file_name: PathBuf::from(settings.file_name),
            delimiter,
            mapping,
        })
    }

    /// Path of the partner's source file under `input_dir`
    pub fn source_path(&self, input_dir: &Path) -> PathBuf {
        input_dir.join(&self.file_name)
    }
}

/// Accept exactly one ASCII character that can separate fields
fn parse_delimiter(partner: &str, raw: &str) -> Result<u8> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii() && !matches!(ch, '"' | '\n' | '\r') => Ok(ch as u8),
        _ => Err(PipelineError::configuration(
            partner,
            format!(
                "delimiter must be a single ASCII character other than a quote or line break, got {:?}",
                raw
            ),
        )),
    }
}

/// One partner as declared, not yet validated
#[derive(Debug, Clone)]
pub struct PartnerDeclaration {
    pub id: String,
    pub position: usize,
    raw: serde_yaml::Value,
}

impl PartnerDeclaration {
    /// Validate this declaration into a usable partner configuration
    pub fn resolve(&self) -> Result<PartnerConfig> {
        let settings: PartnerSettings = serde_yaml::from_value(self.raw.clone())
            .map_err(|e| PipelineError::configuration(&self.id, e.to_string()))?;
        PartnerConfig::from_settings(&self.id, self.position, settings)
    }
}

/// All partner declarations, in configuration order
#[derive(Debug, Clone)]
pub struct PartnersConfig {
    pub declarations: Vec<PartnerDeclaration>,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    partners: serde_yaml::Mapping,
}

impl PartnersConfig {
    /// Load partner declarations from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading partner configuration from {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| PipelineError::ConfigFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::from_yaml_str(&content, path)
    }

    /// Parse partner declarations from YAML text; `origin` is used in errors
    pub fn from_yaml_str(content: &str, origin: &Path) -> Result<Self> {
        let config_error = |reason: String| PipelineError::ConfigFile {
            path: origin.to_path_buf(),
            reason,
        };

        let file: ConfigFile =
            serde_yaml::from_str(content).map_err(|e| config_error(e.to_string()))?;

        if file.partners.is_empty() {
            return Err(config_error("no partners declared".to_string()));
        }

        let mut declarations = Vec::with_capacity(file.partners.len());
        for (position, (key, raw)) in file.partners.into_iter().enumerate() {
            let id = match key {
                serde_yaml::Value::String(id) => id,
                serde_yaml::Value::Number(n) => n.to_string(),
                other => {
                    return Err(config_error(format!(
                        "partner identifiers must be strings, got {:?}",
                        other
                    )));
                }
            };
            declarations.push(PartnerDeclaration { id, position, raw });
        }

        debug!(
            "Declared partners: {}",
            declarations
                .iter()
                .map(|d| d.id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self { declarations })
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}
