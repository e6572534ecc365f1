//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod job_queue;
mod mailer;
mod report;
mod repository;

pub use auth::{AuthError, PasswordService, TokenMaker, TokenPayload, TokenPurpose};
pub use job_queue::{Job, JobHandler, JobQueue, JobQueueError, JobResult, QueueStats};
pub use mailer::{EmailMessage, MailError, Mailer};
pub use report::{Report, ReportError, ReportGenerator};
pub use repository::{
    DashboardRepository, DeviceRepository, ExperimentRepository, ReactorRepository,
    ReadingRepository, UserRepository,
};
