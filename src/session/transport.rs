use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use crate::models::chat::{ ChatRequest, ChatResponse };

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("relay request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("relay returned status {0}")]
    Status(u16),
    #[error("relay response was malformed: {0}")]
    Malformed(String),
}

/// Sends one chat request to the relay and returns the reply text.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<String, TransportError>;
}

#[async_trait]
impl<T: RelayTransport + ?Sized> RelayTransport for Arc<T> {
    async fn send(&self, request: &ChatRequest) -> Result<String, TransportError> {
        (**self).send(request).await
    }
}

pub struct HttpRelayTransport {
    http: HttpClient,
    endpoint: String,
}

impl HttpRelayTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Box::new(e) as Box<dyn StdError + Send + Sync>)?;

        Ok(Self {
            http,
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RelayTransport for HttpRelayTransport {
    async fn send(&self, request: &ChatRequest) -> Result<String, TransportError> {
        let resp = self.http.post(&self.endpoint).json(request).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = resp
            .json::<ChatResponse>().await
            .map_err(|e| TransportError::Malformed(e.to_string()))?;
        Ok(body.response)
    }
}
