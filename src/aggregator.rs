//! Merging of partner batches into the unified dataset
//!
//! Batches are concatenated in partner declaration order, whatever order they
//! finished in, and rows keep their source order within a partner. Dataset-wide
//! filtering is pluggable through [`RecordFilter`].

use crate::models::{NormalizedRecord, PartnerBatch, UnifiedDataset};
use tracing::info;

/// A dataset-wide predicate deciding which records are kept
pub trait RecordFilter: Send + Sync {
    /// Short name used in log output
    fn name(&self) -> &str;

    /// Whether `record` stays in the output
    fn keep(&self, record: &NormalizedRecord) -> bool;
}

/// Keeps records whose external_id is present and not blank
#[derive(Debug, Clone, Copy, Default)]
pub struct ExternalIdPresent;

impl RecordFilter for ExternalIdPresent {
    fn name(&self) -> &str {
        "external_id present"
    }

    fn keep(&self, record: &NormalizedRecord) -> bool {
        record
            .external_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty())
    }
}

/// Result of aggregation
#[derive(Debug, Clone, Default)]
pub struct AggregateOutcome {
    pub dataset: UnifiedDataset,

    /// Rows across all batches before filtering
    pub rows_in: usize,

    /// Rows removed by the filter
    pub rows_filtered: usize,
}

/// Concatenates partner batches and applies an optional filter
#[derive(Default)]
pub struct Aggregator {
    filter: Option<Box<dyn RecordFilter>>,
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("filter", &self.filter.as_ref().map(|filter| filter.name()))
            .finish()
    }
}

impl Aggregator {
    /// Aggregator that keeps every record
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `filter` to decide which records survive
    pub fn with_filter(mut self, filter: impl RecordFilter + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Aggregator configured from the external_id filter toggle
    pub fn for_options(drop_missing_external_id: bool) -> Self {
        if drop_missing_external_id {
            Self::new().with_filter(ExternalIdPresent)
        } else {
            Self::new()
        }
    }

    /// Merge batches into one dataset
    pub fn aggregate(&self, mut batches: Vec<PartnerBatch>) -> AggregateOutcome {
        batches.sort_by_key(|batch| batch.position);

        let rows_in: usize = batches.iter().map(|batch| batch.records.len()).sum();
        let mut records = Vec::with_capacity(rows_in);
        for batch in batches {
            records.extend(batch.records);
        }

        if let Some(filter) = &self.filter {
            records.retain(|record| filter.keep(record));
        }

        let rows_filtered = rows_in - records.len();
        if let Some(filter) = &self.filter {
            info!(
                "Filter '{}': {} -> {} records ({} removed)",
                filter.name(),
                rows_in,
                records.len(),
                rows_filtered
            );
        }

        AggregateOutcome {
            dataset: UnifiedDataset { records },
            rows_in,
            rows_filtered,
        }
    }
}
