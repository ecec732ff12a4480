//! Generate static files

use anyhow::{Context, Result};

use crate::generator::GenerationReport;
use crate::{GenerateOptions, Site};

/// Generate the site and log a summary of what happened
pub fn run(site: &Site, options: &GenerateOptions) -> Result<GenerationReport> {
    let start = std::time::Instant::now();

    let report = site
        .generate(options)
        .with_context(|| format!("cannot generate into {:?}", options.destination))?;

    tracing::info!(
        "Posts: {} written, {} already present, {} failed",
        report.posts_written,
        report.posts_existing,
        report.post_failures.len()
    );
    if options.pages {
        tracing::info!(
            "Pages: {} written, {} failed",
            report.pages_written,
            report.page_failures.len()
        );
    }

    for failure in &report.post_failures {
        tracing::warn!("Post {:?} was not generated: {}", failure.path, failure.error);
    }
    for failure in &report.page_failures {
        tracing::warn!("Page {:?} was not generated: {}", failure.path, failure.error);
    }
    if let Some(assets) = &report.assets {
        for failure in &assets.failures {
            tracing::warn!("{}", failure);
        }
    }
    for failure in &report.stage_failures {
        tracing::error!("Stage {} failed: {}", failure.stage, failure.error);
    }

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(report)
}
