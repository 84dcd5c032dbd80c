//! Submits export jobs to the background worker and awaits their result.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::domain::entities::PatentQuery;
use crate::domain::export_job::ExportJob;
use crate::domain::repositories::FilterRepository;
use crate::error::AppError;

use super::patent_service::ensure_filter;

pub struct ExportService {
    queue: mpsc::Sender<ExportJob>,
    filters: Arc<dyn FilterRepository>,
    timeout: Duration,
}

impl ExportService {
    pub fn new(
        queue: mpsc::Sender<ExportJob>,
        filters: Arc<dyn FilterRepository>,
        timeout: Duration,
    ) -> Self {
        Self {
            queue,
            filters,
            timeout,
        }
    }

    /// Free slots left in the job queue.
    pub fn queue_capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// `false` once the worker has stopped.
    pub fn is_running(&self) -> bool {
        !self.queue.is_closed()
    }

    /// Queues an export and waits for the rendered CSV.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if `query.filter_id` names no filter
    /// - [`AppError::Unavailable`] if the queue is full, the worker is gone,
    ///   or the job does not finish in time
    /// - [`AppError::Internal`] if the job failed or was dropped
    pub async fn export(&self, query: PatentQuery) -> Result<Vec<u8>, AppError> {
        ensure_filter(self.filters.as_ref(), query.filter_id).await?;

        let (job, reply) = ExportJob::new(query);

        self.queue.try_send(job).map_err(|e| match e {
            TrySendError::Full(_) => {
                tracing::warn!("export queue full, rejecting request");
                AppError::unavailable("Export queue is full, retry later", json!({}))
            }
            TrySendError::Closed(_) => {
                tracing::error!("export worker is not running");
                AppError::unavailable("Export worker is not running", json!({}))
            }
        })?;

        match tokio::time::timeout(self.timeout, reply).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(AppError::internal("Export job was dropped", json!({}))),
            Err(_) => {
                tracing::warn!(timeout_s = self.timeout.as_secs(), "export timed out");
                Err(AppError::unavailable(
                    "Export did not finish in time",
                    json!({ "timeout_seconds": self.timeout.as_secs() }),
                ))
            }
        }
    }
}
