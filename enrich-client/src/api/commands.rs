//! Operator Commands
//!
//! Thin layer between the CLI and the store: submit, batch, health.

use anyhow::{anyhow, bail, Context};
use serde::Serialize;

use crate::logic::dashboard::{render_history, DashboardStats, HistoryRow};
use crate::logic::enrichment::LogSource;
use crate::logic::pipeline::derive_stages;
use crate::logic::report::{render_pipeline, render_report};
use crate::logic::store::{SubmissionStore, SubmitOutcome};
use crate::logic::transport::{EnrichClient, EnrichmentTransport};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Outcome of a batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub submitted: usize,
    pub completed: usize,
    pub failed: Vec<String>,
    /// Dashboard followed by the history table
    pub rendered: String,
}

impl BatchSummary {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

// ============================================================================
// COMMANDS
// ============================================================================

/// Submit one log and render the pipeline plus the full report.
///
/// The error carries the store's `last_error` text so the operator can
/// retry with the same input.
pub async fn submit_log<T: EnrichmentTransport>(
    store: &SubmissionStore<T>,
    raw_log: &str,
    source: Option<LogSource>,
) -> anyhow::Result<String> {
    match store.submit(raw_log, source).await {
        SubmitOutcome::Rejected => bail!("Nothing to submit: log is empty"),
        SubmitOutcome::Failed(message) => Err(anyhow!(message)),
        SubmitOutcome::Completed(result) => {
            let stages = derive_stages(Some(result.as_ref()));
            Ok(format!("{}\n\n{}", render_pipeline(&stages), render_report(&result)))
        }
        SubmitOutcome::Superseded(_) => bail!("Submission was superseded by a newer one"),
    }
}

/// Submit every non-blank line in order, one at a time.
///
/// A failed line does not stop the batch.
pub async fn run_batch<T, I, S>(
    store: &SubmissionStore<T>,
    lines: I,
    source: Option<LogSource>,
) -> BatchSummary
where
    T: EnrichmentTransport,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut submitted = 0;
    let mut completed = 0;
    let mut failed = Vec::new();

    for line in lines {
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }
        submitted += 1;
        match store.submit(line, source).await {
            SubmitOutcome::Completed(_) => completed += 1,
            SubmitOutcome::Failed(message) => {
                log::warn!("Line {} failed: {}", submitted, message);
                failed.push(message);
            }
            _ => {}
        }
    }

    let history = store.history();
    let rows: Vec<HistoryRow> = history.iter().map(|r| HistoryRow::from_result(r)).collect();
    let rendered = format!(
        "{}\n\n{}",
        DashboardStats::from_history(&history).render(),
        render_history(&rows)
    );

    log::info!("Batch done: {}/{} completed", completed, submitted);
    BatchSummary { submitted, completed, failed, rendered }
}

/// Query `/health` and render status plus configured downstream services
pub async fn check_health(client: &EnrichClient) -> anyhow::Result<String> {
    let health = client
        .health_check()
        .await
        .with_context(|| format!("Health check against {} failed", client.config().api_base))?;

    let mut out = vec![format!("Status: {}", health.status)];
    for (service, url) in &health.config {
        let url = url.as_str().map(str::to_string).unwrap_or_else(|| url.to_string());
        out.push(format!("  {}: {}", service, url));
    }

    if !health.is_ok() {
        bail!("{}", out.join("\n"));
    }
    Ok(out.join("\n"))
}

// ============================================================================
// TESTS
// ============================================================================
