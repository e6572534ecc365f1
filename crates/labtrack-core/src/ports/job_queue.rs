//! Job queue port - abstraction over job queue backends.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

use super::mailer::EmailMessage;

/// A job that can be queued and processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier.
    pub id: String,
    /// Job type/name for routing to handlers.
    pub job_type: String,
    /// Serialized payload.
    pub payload: serde_json::Value,
    /// When the job was created.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Job {
    pub const SEND_EMAIL: &'static str = "send_email";

    pub fn new(job_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            job_type: job_type.into(),
            payload,
            created_at: chrono::Utc::now(),
        }
    }

    pub fn send_email(message: &EmailMessage) -> Result<Self, JobQueueError> {
        let payload = serde_json::to_value(message)
            .map_err(|e| JobQueueError::EnqueueError(e.to_string()))?;
        Ok(Self::new(Self::SEND_EMAIL, payload))
    }

    /// Decode the payload of a `send_email` job.
    pub fn email(&self) -> Option<EmailMessage> {
        if self.job_type != Self::SEND_EMAIL {
            return None;
        }
        serde_json::from_value(self.payload.clone()).ok()
    }
}

/// Result of job processing. Jobs are never retried.
#[derive(Debug)]
pub enum JobResult {
    Success,
    Failed(String),
}

/// Job handler function type.
pub type JobHandler =
    Box<dyn Fn(Job) -> Pin<Box<dyn Future<Output = JobResult> + Send>> + Send + Sync>;

/// Job queue trait - abstraction over job queue backends.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Enqueue a job for processing.
    async fn enqueue(&self, job: Job) -> Result<(), JobQueueError>;

    /// Start processing jobs with the given handler.
    async fn start_worker(&self, handler: JobHandler) -> Result<(), JobQueueError>;

    /// Get queue statistics.
    async fn stats(&self) -> Result<QueueStats, JobQueueError>;
}

/// Queue statistics.
#[derive(Debug, Clone, Default)]
pub struct QueueStats {
    pub pending: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
}

/// Job queue errors.
#[derive(Debug, thiserror::Error)]
pub enum JobQueueError {
    #[error("Failed to enqueue job: {0}")]
    EnqueueError(String),

    #[error("Queue is full")]
    QueueFull,

    #[error("Backend error: {0}")]
    Backend(String),
}
