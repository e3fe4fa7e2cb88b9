//! Command implementation for the partner normalizer CLI
//!
//! Sets up logging, loads the partner configuration, runs the pipeline and
//! reports the outcome.

use crate::cli::args::Args;
use crate::config::PartnersConfig;
use crate::constants::LOG_TARGET;
use crate::models::{ProcessingStats, RunReport};
use crate::processor::NormalizationPipeline;
use anyhow::{Context, Result};
use colored::*;
use tracing::{debug, info};

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", LOG_TARGET, log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Run a full normalization from parsed arguments
pub async fn run(args: Args) -> Result<ProcessingStats> {
    setup_logging(&args);

    info!("Starting partner normalizer");
    debug!("Command line arguments: {:?}", args);

    let config = PartnersConfig::load(&args.config)
        .with_context(|| format!("Failed to load partners from {}", args.config.display()))?;

    let pipeline = NormalizationPipeline::new(args.pipeline_options());
    let (report, stats) = pipeline
        .run_to_file(&config, &args.output)
        .await
        .context("Normalization failed")?;

    print_summary(&report, &stats);
    Ok(stats)
}

/// Print the run summary to stdout
pub fn print_summary(report: &RunReport, stats: &ProcessingStats) {
    println!("\n{}", "Normalization Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Partners processed:".bright_cyan(),
        stats.partners_processed.to_string().bright_white()
    );

    for summary in &report.partners {
        let unparseable = summary.stats.total_unparseable();
        let detail = if unparseable > 0 {
            format!("({} unparseable values)", unparseable)
                .bright_yellow()
                .to_string()
        } else {
            String::new()
        };
        println!(
            "    {} [{}] {} rows {}",
            summary.partner_id,
            summary.partner_code,
            summary.stats.rows,
            detail
        );
    }

    if stats.partners_skipped > 0 {
        println!(
            "  {} {}",
            "Partners skipped:".bright_red(),
            stats.partners_skipped.to_string().bright_red().bold()
        );
        for skipped in &report.skipped {
            println!("    {}: {}", skipped.partner_id.bright_red(), skipped.reason);
        }
    }

    if stats.rows_filtered > 0 {
        println!(
            "  {} {}",
            "Rows filtered:".bright_cyan(),
            stats.rows_filtered.to_string().bright_white()
        );
    }
    println!(
        "  {} {}",
        "Rows written:".bright_cyan(),
        stats.rows_written.to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Output:".bright_cyan(),
        stats.output_path.display()
    );
}
