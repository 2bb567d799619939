use std::sync::{Arc, Mutex, PoisonError};

use recipehub_shared::{ChannelPool, QueueError, schemas::EmailRequest};

#[derive(Clone)]
enum Transport {
    Queue(ChannelPool),
    Mock(Arc<Mutex<Vec<EmailRequest>>>),
}

/// Hands outbound emails to the notification worker through the email queue.
#[derive(Clone)]
pub struct Mailer {
    transport: Transport,
    queue: String,
}

impl Mailer {
    pub fn new(pool: ChannelPool, queue: impl Into<String>) -> Self {
        Self {
            transport: Transport::Queue(pool),
            queue: queue.into(),
        }
    }

    /// Keeps emails in memory instead of publishing them.
    pub fn new_mock(queue: impl Into<String>) -> Self {
        Self {
            transport: Transport::Mock(Arc::default()),
            queue: queue.into(),
        }
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    pub async fn send(&self, email: EmailRequest) -> Result<(), QueueError> {
        match &self.transport {
            Transport::Queue(pool) => {
                pool.publish_json(&self.queue, &serde_json::to_value(&email)?)
                    .await
                    .inspect_err(|e| {
                        tracing::error!(
                            queue = %self.queue,
                            recipient = %email.recipient,
                            error = %e,
                            "Failed to queue email"
                        );
                    })?;

                tracing::info!(queue = %self.queue, recipient = %email.recipient, "Email queued");
            }
            Transport::Mock(sent) => {
                tracing::debug!(recipient = %email.recipient, "Email captured by mock mailer");
                sent.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(email);
            }
        }

        Ok(())
    }

    /// Emails captured by a mock mailer, oldest first. Always empty for a queue mailer.
    pub fn sent(&self) -> Vec<EmailRequest> {
        match &self.transport {
            Transport::Queue(_) => Vec::new(),
            Transport::Mock(sent) => sent.lock().unwrap_or_else(PoisonError::into_inner).clone(),
        }
    }
}
