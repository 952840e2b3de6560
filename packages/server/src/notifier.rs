//! Mail delivery through an HTTP relay.

use std::time::Duration;

use async_trait::async_trait;
use lifecycle::notify::{Notifier, NotifyError, compose_body};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::NotifyConfig;

#[derive(Serialize)]
struct RelayMail<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: String,
}

/// Posts every mail as JSON to a relay endpoint.
pub struct HttpRelayNotifier {
    client: reqwest::Client,
    url: String,
    sender: String,
    signature: String,
}

impl HttpRelayNotifier {
    pub fn new(url: impl Into<String>, config: &NotifyConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            sender: config.sender.clone(),
            signature: config.signature.clone(),
        })
    }
}

#[async_trait]
impl Notifier for HttpRelayNotifier {
    #[instrument(skip(self, content), fields(relay = %self.url))]
    async fn send(&self, to_email: &str, subject: &str, content: &str) -> Result<(), NotifyError> {
        let mail = RelayMail {
            from: &self.sender,
            to: to_email,
            subject,
            body: compose_body(content, &self.signature),
        };
        let response = self
            .client
            .post(&self.url)
            .json(&mail)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() {
            return Err(NotifyError::Rejected(format!("{to_email}: relay answered {status}")));
        }
        if !status.is_success() {
            return Err(NotifyError::Transport(format!("relay answered {status}")));
        }
        debug!("Mail handed to relay");
        Ok(())
    }
}
