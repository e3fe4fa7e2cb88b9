//! Unified output writing
//!
//! Builds a polars frame of string columns in the fixed output order and
//! writes it as CSV. Absent values are written as empty cells.

use crate::constants::{OUTPUT_DELIMITER, columns::OUTPUT_COLUMNS};
use crate::error::{PipelineError, Result};
use crate::models::UnifiedDataset;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// CSV writer for the unified dataset
#[derive(Debug, Clone)]
pub struct OutputWriter {
    output_path: PathBuf,
}

impl OutputWriter {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Write `dataset`, creating missing parent directories; returns rows written
    pub fn write(&self, dataset: &UnifiedDataset) -> Result<usize> {
        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| PipelineError::OutputWrite {
                    path: self.output_path.clone(),
                    reason: e.to_string(),
                })?;
            }
        }

        let mut df = dataset_to_frame(dataset)?;

        let file = File::create(&self.output_path).map_err(|e| PipelineError::OutputWrite {
            path: self.output_path.clone(),
            reason: e.to_string(),
        })?;

        CsvWriter::new(file)
            .include_header(true)
            .with_separator(OUTPUT_DELIMITER)
            .finish(&mut df)
            .map_err(|e| PipelineError::OutputWrite {
                path: self.output_path.clone(),
                reason: e.to_string(),
            })?;

        debug!(
            "Wrote {} rows to {}",
            df.height(),
            self.output_path.display()
        );

        Ok(df.height())
    }
}

/// Column-major frame of the dataset in output column order
pub fn dataset_to_frame(dataset: &UnifiedDataset) -> PolarsResult<DataFrame> {
    let mut columns: Vec<Vec<Option<&str>>> =
        vec![Vec::with_capacity(dataset.len()); OUTPUT_COLUMNS.len()];

    for record in dataset.iter() {
        for (column, value) in columns.iter_mut().zip(record.output_values()) {
            // Empty values are written as bare empty cells, like absent ones
            column.push(value.filter(|v| !v.is_empty()));
        }
    }

    let columns: Vec<Column> = OUTPUT_COLUMNS
        .iter()
        .zip(columns)
        .map(|(name, values)| Column::new((*name).into(), values))
        .collect();

    DataFrame::new(columns)
}
