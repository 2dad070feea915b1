//! Delivery of accepted contact messages.

use crate::i18n::Language;
use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("contact endpoint request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("contact endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// The payload handed to a transport once a submission passed every check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub language: Language,
    pub fields: BTreeMap<String, String>,
}

pub trait Transport {
    fn send(
        &self,
        message: &ContactMessage,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// Stand-in for a backend: waits, logs, and always succeeds.
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    delay: Duration,
}

impl SimulatedTransport {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1500);

    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

impl Transport for SimulatedTransport {
    async fn send(&self, message: &ContactMessage) -> Result<(), TransportError> {
        tokio::time::sleep(self.delay).await;
        info!(
            "Simulated contact submission ({}): {:?}",
            message.language, message.fields
        );
        Ok(())
    }
}

/// POSTs the message as JSON to a backend endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    async fn send(&self, message: &ContactMessage) -> Result<(), TransportError> {
        debug!("Posting contact message to {}", self.endpoint);

        let response = self.client.post(&self.endpoint).json(message).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

/// The transport selected at startup.
#[derive(Debug, Clone)]
pub enum ContactTransport {
    Simulated(SimulatedTransport),
    Http(HttpTransport),
}

impl Transport for ContactTransport {
    async fn send(&self, message: &ContactMessage) -> Result<(), TransportError> {
        match self {
            ContactTransport::Simulated(t) => t.send(message).await,
            ContactTransport::Http(t) => t.send(message).await,
        }
    }
}
