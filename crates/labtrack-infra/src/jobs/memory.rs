//! In-memory job queue implementation.
//!
//! Jobs live in a bounded channel drained by local worker tasks.
//! Nothing is persisted and failed jobs are dropped after logging.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use labtrack_core::ports::{Job, JobHandler, JobQueue, JobQueueError, JobResult, QueueStats};

/// In-memory job queue configuration.
#[derive(Debug, Clone)]
pub struct InMemoryJobQueueConfig {
    /// Maximum queued jobs (0 = bounded only by the channel).
    pub max_size: usize,
    /// Number of worker tasks.
    pub workers: usize,
}

impl Default for InMemoryJobQueueConfig {
    fn default() -> Self {
        Self {
            max_size: 1000,
            workers: 2,
        }
    }
}

/// In-memory job queue.
pub struct InMemoryJobQueue {
    stats: Arc<JobStats>,
    config: InMemoryJobQueueConfig,
    job_sender: mpsc::Sender<Job>,
    job_receiver: Arc<Mutex<mpsc::Receiver<Job>>>,
}

#[derive(Default)]
struct JobStats {
    pending: AtomicUsize,
    processing: AtomicUsize,
    completed: AtomicUsize,
    failed: AtomicUsize,
}

impl InMemoryJobQueue {
    pub fn new(config: InMemoryJobQueueConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.max_size.max(16));

        Self {
            stats: Arc::new(JobStats::default()),
            config,
            job_sender: tx,
            job_receiver: Arc::new(Mutex::new(rx)),
        }
    }
}

impl Default for InMemoryJobQueue {
    fn default() -> Self {
        Self::new(InMemoryJobQueueConfig::default())
    }
}

#[async_trait]
impl JobQueue for InMemoryJobQueue {
    async fn enqueue(&self, job: Job) -> Result<(), JobQueueError> {
        if self.config.max_size > 0 {
            let current_size = self.stats.pending.load(Ordering::Relaxed);
            if current_size >= self.config.max_size {
                return Err(JobQueueError::QueueFull);
            }
        }

        self.stats.pending.fetch_add(1, Ordering::Relaxed);

        if let Err(e) = self.job_sender.send(job).await {
            self.stats.pending.fetch_sub(1, Ordering::Relaxed);
            return Err(JobQueueError::EnqueueError(e.to_string()));
        }

        tracing::debug!(
            pending = self.stats.pending.load(Ordering::Relaxed),
            "Job enqueued"
        );

        Ok(())
    }

    async fn start_worker(&self, handler: JobHandler) -> Result<(), JobQueueError> {
        let handler: Arc<JobHandler> = Arc::new(handler);

        for worker_id in 0..self.config.workers {
            let handler = handler.clone();
            let receiver = self.job_receiver.clone();
            let stats = self.stats.clone();

            tokio::spawn(async move {
                tracing::info!(worker = worker_id, "Job worker started");

                loop {
                    let job = {
                        let mut rx = receiver.lock().await;
                        rx.recv().await
                    };

                    let Some(job) = job else {
                        tracing::info!(worker = worker_id, "Job worker shutting down");
                        break;
                    };

                    stats.pending.fetch_sub(1, Ordering::Relaxed);
                    stats.processing.fetch_add(1, Ordering::Relaxed);

                    let job_id = job.id.clone();
                    tracing::debug!(
                        worker = worker_id,
                        job_id = %job_id,
                        job_type = %job.job_type,
                        "Processing job"
                    );

                    let result = handler(job).await;
                    stats.processing.fetch_sub(1, Ordering::Relaxed);

                    match result {
                        JobResult::Success => {
                            stats.completed.fetch_add(1, Ordering::Relaxed);
                            tracing::debug!(job_id = %job_id, "Job completed");
                        }
                        JobResult::Failed(reason) => {
                            stats.failed.fetch_add(1, Ordering::Relaxed);
                            tracing::error!(job_id = %job_id, reason = %reason, "Job failed");
                        }
                    }
                }
            });
        }

        Ok(())
    }

    async fn stats(&self) -> Result<QueueStats, JobQueueError> {
        Ok(QueueStats {
            pending: self.stats.pending.load(Ordering::Relaxed),
            processing: self.stats.processing.load(Ordering::Relaxed),
            completed: self.stats.completed.load(Ordering::Relaxed),
            failed: self.stats.failed.load(Ordering::Relaxed),
        })
    }
}
