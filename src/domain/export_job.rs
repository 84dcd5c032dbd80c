//! Export job model for the background CSV export worker.

use tokio::sync::oneshot;

use crate::domain::entities::PatentQuery;
use crate::error::AppError;

/// Maximum number of rows exported when no selection criterion is given.
pub const UNFILTERED_EXPORT_LIMIT: i64 = 10_000;

/// Outcome delivered back to the waiting handler: the CSV body.
pub type ExportResult = Result<Vec<u8>, AppError>;

/// A queued export request.
///
/// The handler keeps the receiving half of `reply` and waits on it with a
/// timeout; the worker answers exactly once. If the handler has already
/// given up, the answer is dropped.
#[derive(Debug)]
pub struct ExportJob {
    pub query: PatentQuery,
    pub reply: oneshot::Sender<ExportResult>,
}

impl ExportJob {
    pub fn new(query: PatentQuery) -> (Self, oneshot::Receiver<ExportResult>) {
        let (reply, rx) = oneshot::channel();
        (Self { query, reply }, rx)
    }

    /// Row cap for this job: unfiltered exports are truncated.
    pub fn limit(&self) -> Option<i64> {
        self.query
            .is_unfiltered()
            .then_some(UNFILTERED_EXPORT_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unfiltered_job_is_capped() {
        let (job, _rx) = ExportJob::new(PatentQuery::default());
        assert_eq!(job.limit(), Some(UNFILTERED_EXPORT_LIMIT));
    }

    #[test]
    fn test_filtered_job_is_not_capped() {
        let (job, _rx) = ExportJob::new(PatentQuery {
            actual: Some(true),
            ..Default::default()
        });
        assert_eq!(job.limit(), None);
    }

    #[tokio::test]
    async fn test_reply_reaches_receiver() {
        let (job, rx) = ExportJob::new(PatentQuery::default());
        job.reply.send(Ok(b"csv".to_vec())).unwrap();
        assert_eq!(rx.await.unwrap().unwrap(), b"csv");
    }
}
