//! Normalization pipeline orchestration.
//!
//! Drives every declared partner through read, normalize and aggregate, with
//! partners processed concurrently on blocking tasks and results collected in
//! declaration order. Writing the unified dataset is left to [`writer`].

pub mod reader;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::reader::read_partner_source;
use self::writer::OutputWriter;

use crate::aggregator::{Aggregator, RecordFilter};
use crate::config::{ErrorPolicy, PartnerDeclaration, PartnersConfig, PipelineOptions};
use crate::error::{PipelineError, Result};
use crate::models::{PartnerBatch, PartnerSummary, ProcessingStats, RunReport, SkippedPartner};
use crate::normalizer::PartnerNormalizer;

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::task;
use tracing::{debug, error, info, warn};

/// Resolve, read and normalize a single partner
///
/// Blocking; the pipeline runs it on tokio's blocking pool.
pub fn process_partner(declaration: &PartnerDeclaration, input_dir: &Path) -> Result<PartnerBatch> {
    let partner = declaration.resolve()?;
    debug!(
        "Partner '{}' ({}) reading {}",
        partner.id,
        partner.partner_code,
        partner.source_path(input_dir).display()
    );

    let raw = read_partner_source(&partner, input_dir)?;
    PartnerNormalizer::new(&partner).normalize(raw)
}

/// Runs partner normalization end to end
#[derive(Debug)]
pub struct NormalizationPipeline {
    options: PipelineOptions,
    aggregator: Aggregator,
}

impl NormalizationPipeline {
    /// Create a pipeline; the external_id filter follows `options`
    pub fn new(options: PipelineOptions) -> Self {
        let aggregator = Aggregator::for_options(options.drop_missing_external_id);
        Self {
            options,
            aggregator,
        }
    }

    /// Replace the dataset filter
    pub fn with_filter(mut self, filter: impl RecordFilter + 'static) -> Self {
        self.aggregator = Aggregator::new().with_filter(filter);
        self
    }

    /// Normalize every declared partner and aggregate the results
    ///
    /// Under [`ErrorPolicy::Abort`] the first failing partner, in declaration
    /// order, ends the run. Under [`ErrorPolicy::Skip`] partner-scoped
    /// failures are recorded in the report and the run continues; any other
    /// failure still ends the run.
    pub async fn run(&self, config: &PartnersConfig) -> Result<RunReport> {
        let start_time = Instant::now();
        info!(
            "Normalizing {} partners from {} ({} at a time)",
            config.len(),
            self.options.input_dir.display(),
            self.options.max_concurrent_partners
        );

        let pb = self.progress_bar(config.len());
        let input_dir = Arc::new(self.options.input_dir.clone());

        let mut results = stream::iter(config.declarations.iter().cloned())
            .map(|declaration| {
                let input_dir = Arc::clone(&input_dir);
                let pb = pb.clone();
                async move {
                    let partner_id = declaration.id.clone();
                    let result =
                        task::spawn_blocking(move || process_partner(&declaration, &input_dir))
                            .await
                            .map_err(|e| PipelineError::TaskFailed {
                                partner: partner_id.clone(),
                                reason: e.to_string(),
                            })
                            .and_then(|result| result);
                    pb.inc(1);
                    (partner_id, result)
                }
            })
            .buffered(self.options.max_concurrent_partners.max(1));

        let mut batches = Vec::with_capacity(config.len());
        let mut partners = Vec::with_capacity(config.len());
        let mut skipped = Vec::new();

        while let Some((partner_id, result)) = results.next().await {
            match result {
                Ok(batch) => {
                    info!(
                        "Partner '{}' ({}): {} rows, {} unparseable values",
                        batch.partner_id,
                        batch.partner_code,
                        batch.stats.rows,
                        batch.stats.total_unparseable()
                    );
                    partners.push(PartnerSummary {
                        partner_id: batch.partner_id.clone(),
                        partner_code: batch.partner_code.clone(),
                        stats: batch.stats.clone(),
                    });
                    batches.push(batch);
                }
                Err(e)
                    if self.options.error_policy == ErrorPolicy::Skip && e.is_partner_scoped() =>
                {
                    warn!("Skipping partner '{}': {}", partner_id, e);
                    skipped.push(SkippedPartner {
                        partner_id,
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    pb.abandon();
                    error!("Partner '{}' failed: {}", partner_id, e);
                    return Err(e);
                }
            }
        }
        pb.finish_and_clear();

        let outcome = self.aggregator.aggregate(batches);
        let processing_time_ms = start_time.elapsed().as_millis();

        info!(
            "Normalized {} records from {} partners ({} skipped) in {}ms",
            outcome.dataset.len(),
            partners.len(),
            skipped.len(),
            processing_time_ms
        );

        Ok(RunReport {
            dataset: outcome.dataset,
            partners,
            skipped,
            rows_read: outcome.rows_in,
            rows_filtered: outcome.rows_filtered,
            processing_time_ms,
        })
    }

    /// Run the pipeline and write the unified dataset to `output_path`
    ///
    /// Nothing is written when the run fails.
    pub async fn run_to_file(
        &self,
        config: &PartnersConfig,
        output_path: impl Into<PathBuf>,
    ) -> Result<(RunReport, ProcessingStats)> {
        let start_time = Instant::now();
        let report = self.run(config).await?;

        let writer = OutputWriter::new(output_path);
        let rows_written = writer.write(&report.dataset)?;

        let stats = ProcessingStats {
            partners_processed: report.partners.len(),
            partners_skipped: report.skipped.len(),
            rows_read: report.rows_read,
            rows_filtered: report.rows_filtered,
            rows_written,
            output_path: writer.output_path().to_path_buf(),
            processing_time_ms: start_time.elapsed().as_millis(),
        };

        Ok((report, stats))
    }

    fn progress_bar(&self, partners: usize) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(partners as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} partners {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message("Normalizing");
        pb
    }
}
