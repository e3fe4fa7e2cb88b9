//! Partner source file reading
//!
//! Reads a delimited partner extract with polars, keeping every column as
//! text, and converts it into a [`RawTable`]. Empty cells come back as absent.

use crate::config::PartnerConfig;
use crate::error::{PipelineError, Result};
use crate::models::RawTable;
use polars::prelude::*;
use std::path::Path;
use tracing::debug;

/// Read the source file of `partner` from `input_dir`
pub fn read_partner_source(partner: &PartnerConfig, input_dir: &Path) -> Result<RawTable> {
    let path = partner.source_path(input_dir);
    if !path.is_file() {
        return Err(PipelineError::SourceNotFound {
            partner: partner.id.clone(),
            path,
        });
    }

    let source_error = |e: PolarsError| PipelineError::SourceRead {
        partner: partner.id.clone(),
        path: path.clone(),
        reason: e.to_string(),
    };

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_separator(partner.delimiter))
        .try_into_reader_with_file_path(Some(path.clone()))
        .map_err(source_error)?
        .finish()
        .map_err(source_error)?;

    let table = frame_to_raw_table(&df).map_err(source_error)?;

    debug!(
        "Read {} rows x {} columns for partner '{}' from {}",
        table.row_count(),
        table.header.len(),
        partner.id,
        path.display()
    );

    Ok(table)
}

/// Convert a frame of text columns into header plus row-major cells
pub fn frame_to_raw_table(df: &DataFrame) -> PolarsResult<RawTable> {
    let header: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let mut rows: Vec<Vec<Option<String>>> = vec![Vec::with_capacity(header.len()); df.height()];
    for column in df.get_columns() {
        let text = column.cast(&DataType::String)?;
        let values = text.as_materialized_series().str()?;
        for (row, value) in rows.iter_mut().zip(values.into_iter()) {
            row.push(value.map(str::to_string));
        }
    }

    Ok(RawTable::new(header, rows))
}
