use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    #[error("recipient rejected: {0}")]
    Rejected(String),
    #[error("mail transport failed: {0}")]
    Transport(String),
}

/// Outbound mail delivery.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to_email: &str, subject: &str, content: &str) -> Result<(), NotifyError>;
}

/// A delivered (or recorded) mail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mail {
    pub to: String,
    pub subject: String,
    pub content: String,
}

/// Wrap notification content in the standard greeting and sign-off.
pub fn compose_body(content: &str, signature: &str) -> String {
    format!("Dear User,\r\n\r\n{content}\r\n\r\nThanks & regards\r\n{signature}")
}

/// Logs every mail instead of delivering it.
pub struct TracingNotifier {
    signature: String,
}

impl TracingNotifier {
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
        }
    }
}

#[async_trait]
impl Notifier for TracingNotifier {
    async fn send(&self, to_email: &str, subject: &str, content: &str) -> Result<(), NotifyError> {
        let body = compose_body(content, &self.signature);
        info!(to = to_email, subject, body = %body, "Mail delivery skipped (no relay configured)");
        Ok(())
    }
}

/// Keeps every mail in memory. Addresses registered with
/// [`fail_for`](RecordingNotifier::fail_for) are rejected.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Mail>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fail_for(&self, email: impl Into<String>) {
        self.failing.lock().await.insert(email.into());
    }

    pub async fn sent(&self) -> Vec<Mail> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_to(&self, email: &str) -> Vec<Mail> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|m| m.to == email)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, to_email: &str, subject: &str, content: &str) -> Result<(), NotifyError> {
        if self.failing.lock().await.contains(to_email) {
            return Err(NotifyError::Rejected(to_email.to_string()));
        }
        self.sent.lock().await.push(Mail {
            to: to_email.to_string(),
            subject: subject.to_string(),
            content: content.to_string(),
        });
        Ok(())
    }
}
