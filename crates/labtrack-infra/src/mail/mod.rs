//! Outbound email: templates, a tracing-backed mailer and the queue handler.

mod outbox;
mod templates;

use std::sync::Arc;

use labtrack_core::ports::{Job, JobHandler, JobResult, Mailer};

pub use outbox::LogMailer;
pub use templates::password_reset_email;

/// Mask an address for logs: `jane@lab.io` becomes `j***@lab.io`.
pub fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            let mut chars = local.chars();
            match (chars.next(), chars.next()) {
                (Some(first), Some(_)) => format!("{first}***{domain}"),
                _ => format!("***{domain}"),
            }
        }
        None => "***".to_string(),
    }
}

/// Queue handler delivering `send_email` jobs through `mailer`.
pub fn email_job_handler(mailer: Arc<dyn Mailer>) -> JobHandler {
    Box::new(move |job: Job| {
        let mailer = mailer.clone();
        Box::pin(async move {
            let Some(message) = job.email() else {
                return JobResult::Failed(format!("unsupported job type {}", job.job_type));
            };

            match mailer.send(&message).await {
                Ok(()) => JobResult::Success,
                Err(e) => JobResult::Failed(e.to_string()),
            }
        })
    })
}
