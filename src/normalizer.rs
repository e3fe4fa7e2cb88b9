//! Partner normalization
//!
//! Turns one partner's raw table into standard-schema records: the column
//! mapping is resolved against the header first, then every row is projected
//! and passed through the transformer assigned to each standard field.

use crate::config::PartnerConfig;
use crate::error::Result;
use crate::mapping::ColumnMapping;
use crate::models::{NormalizationStats, NormalizedRecord, PartnerBatch, RawTable, StandardField};
use tracing::debug;

/// Normalizer bound to one partner's configuration
#[derive(Debug)]
pub struct PartnerNormalizer<'a> {
    config: &'a PartnerConfig,
}

impl<'a> PartnerNormalizer<'a> {
    pub fn new(config: &'a PartnerConfig) -> Self {
        Self { config }
    }

    /// Normalize every row of `raw`, in source order
    ///
    /// Fails only when the mapping does not fit the header, in which case no
    /// rows are produced. Values that cannot be normalized become `None` and
    /// are counted in the batch statistics.
    pub fn normalize(&self, raw: RawTable) -> Result<PartnerBatch> {
        let columns = ColumnMapping::resolve(&self.config.id, &self.config.mapping, &raw.header)?;

        let mut stats = NormalizationStats {
            rows: raw.row_count(),
            ..Default::default()
        };

        let records: Vec<NormalizedRecord> = raw
            .rows
            .into_iter()
            .map(|row| self.normalize_row(&columns, &row, &mut stats))
            .collect();

        debug!(
            "Partner '{}' normalized {} rows ({} unparseable values: {})",
            self.config.id,
            stats.rows,
            stats.total_unparseable(),
            StandardField::ALL
                .iter()
                .map(|field| format!("{}={}", field, stats.unparseable_for(*field)))
                .collect::<Vec<_>>()
                .join(" ")
        );

        Ok(PartnerBatch {
            partner_id: self.config.id.clone(),
            position: self.config.position,
            partner_code: self.config.partner_code.clone(),
            records,
            stats,
        })
    }

    fn normalize_row(
        &self,
        columns: &ColumnMapping,
        row: &[Option<String>],
        stats: &mut NormalizationStats,
    ) -> NormalizedRecord {
        let cells = columns.project(row);
        let values = StandardField::ALL.map(|field| {
            let raw = cells[field.index()];
            let normalized = field.normalize(raw);
            if raw.is_some() && normalized.is_none() {
                stats.unparseable[field.index()] += 1;
            }
            normalized
        });

        NormalizedRecord::from_values(values, self.config.partner_code.as_str())
    }
}
