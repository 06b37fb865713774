use std::{io, path::PathBuf};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use url::Url;
use uuid::Uuid;

/// A rendered message plus the envelope addresses the transport needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub raw: String,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("mail relay request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("mail relay rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("failed to spool message: {0}")]
    Spool(#[from] io::Error),
}

/// Delivers one message and returns the provider's message id. Called once
/// per submission; implementations must not retry.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<String, TransportError>;
}

#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    from: &'a str,
    to: &'a [String],
    raw_message_b64: String,
}

#[derive(Debug, Deserialize)]
struct RelayResponse {
    message_id: String,
}

/// Posts the raw message to an HTTP mail relay that fronts the provider's
/// send-raw-email API.
#[derive(Debug, Clone)]
pub struct HttpRelayTransport {
    client: Client,
    endpoint: Url,
    token: Option<String>,
}

impl HttpRelayTransport {
    pub fn new(endpoint: Url, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            token,
        }
    }
}

#[async_trait]
impl MailTransport for HttpRelayTransport {
    async fn send(&self, email: &OutboundEmail) -> Result<String, TransportError> {
        let mut request = self.client.post(self.endpoint.clone()).json(&RelayRequest {
            from: &email.from,
            to: &email.to,
            raw_message_b64: STANDARD.encode(email.raw.as_bytes()),
        });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let RelayResponse { message_id } = response.json().await?;
        info!(%message_id, "mail relay accepted message");
        Ok(message_id)
    }
}

/// Writes each message to `<dir>/<uuid>.eml`. For local development where
/// no relay is reachable.
#[derive(Debug, Clone)]
pub struct SpoolTransport {
    dir: PathBuf,
}

impl SpoolTransport {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl MailTransport for SpoolTransport {
    async fn send(&self, email: &OutboundEmail) -> Result<String, TransportError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let message_id = Uuid::new_v4().to_string();
        let path = self.dir.join(format!("{message_id}.eml"));
        tokio::fs::write(&path, email.raw.as_bytes()).await?;
        info!(%message_id, path = %path.display(), "spooled message");
        Ok(message_id)
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
