use async_trait::async_trait;
use tokio::sync::Mutex;

use labtrack_core::ports::{EmailMessage, MailError, Mailer};

use super::mask_email;

/// Mailer that records messages and logs them instead of delivering.
/// Used when no mail transport is configured, and as a test double.
#[derive(Default)]
pub struct LogMailer {
    outbox: Mutex<Vec<EmailMessage>>,
}

impl LogMailer {
    /// Messages "sent" so far, oldest first.
    pub async fn sent(&self) -> Vec<EmailMessage> {
        self.outbox.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        if !message.to.contains('@') {
            return Err(MailError::InvalidRecipient(mask_email(&message.to)));
        }

        tracing::info!(
            to = %mask_email(&message.to),
            subject = %message.subject,
            bytes = message.html_body.len(),
            "Email dispatched"
        );

        self.outbox.lock().await.push(message.clone());
        Ok(())
    }
}
