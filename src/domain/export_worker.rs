//! Background worker rendering patent exports.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::domain::entities::{Patent, PatentKey, PatentWithHolders};
use crate::domain::export_job::{ExportJob, ExportResult};
use crate::domain::repositories::PatentRepository;
use crate::error::AppError;
use crate::utils::csv_codec::write_patents;

/// Attempts per database read inside a job.
const READ_ATTEMPTS: usize = 3;

fn read_backoff() -> impl Iterator<Item = std::time::Duration> {
    ExponentialBackoff::from_millis(10)
        .factor(10)
        .map(jitter)
        .take(READ_ATTEMPTS - 1)
}

fn is_transient(e: &AppError) -> bool {
    matches!(e, AppError::Unavailable { .. } | AppError::Internal { .. })
}

/// Reads the selected patents with their holders and renders the CSV body.
pub async fn render_export(repo: &dyn PatentRepository, job: &ExportJob) -> ExportResult {
    let limit = job.limit();

    let patents: Vec<Patent> = RetryIf::spawn(
        read_backoff(),
        || repo.list(&job.query, 0, limit),
        is_transient,
    )
    .await?;

    let keys: Vec<PatentKey> = patents.iter().map(Patent::key).collect();
    let holders = RetryIf::spawn(read_backoff(), || repo.holders(&keys), is_transient).await?;

    let rows = PatentWithHolders::attach(patents, holders);

    write_patents(&rows).map_err(|e| {
        tracing::error!(error = %e, "failed to render export");
        AppError::internal("Failed to render export", serde_json::json!({}))
    })
}

/// Consumes export jobs, running at most `concurrency` of them at once.
///
/// Returns when every sender has been dropped and in-flight jobs finished.
pub async fn run_export_worker(
    mut rx: mpsc::Receiver<ExportJob>,
    repo: Arc<dyn PatentRepository>,
    concurrency: usize,
) {
    let permits = Arc::new(Semaphore::new(concurrency));

    while let Some(job) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let repo = repo.clone();

        tokio::spawn(async move {
            let _permit = permit;

            if job.reply.is_closed() {
                tracing::debug!("export requester gone, skipping job");
                return;
            }

            let started = std::time::Instant::now();
            let result = render_export(repo.as_ref(), &job).await;

            match &result {
                Ok(body) => tracing::info!(
                    bytes = body.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "export rendered"
                ),
                Err(e) => tracing::warn!(error = %e, "export failed"),
            }

            if job.reply.send(result).is_err() {
                tracing::debug!("export requester timed out before completion");
            }
        });
    }

    // wait for in-flight jobs
    let _ = permits.acquire_many(concurrency as u32).await;
    tracing::info!("export worker stopped");
}
