pub mod groq;

use async_trait::async_trait;
use std::error::Error as StdError;
use std::sync::Arc;
use super::LlmConfig;
use self::groq::GroqChatClient;

/// Two-entry prompt sent upstream: the persona followed by the user's message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ChatClientError {
    #[error("no completion API credential configured")]
    MissingCredentials,
    #[error("completion service rate limited the request")]
    RateLimited,
    #[error("completion service rejected the credential")]
    Unauthorized,
    #[error("completion service returned status {0}")]
    Status(u16),
    #[error("request to completion service failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("completion service returned no content")]
    EmptyResponse,
    #[error("invalid response from completion service: {0}")]
    InvalidResponse(String),
}

impl ChatClientError {
    pub fn from_status(status: u16) -> Self {
        match status {
            429 => ChatClientError::RateLimited,
            401 => ChatClientError::Unauthorized,
            other => ChatClientError::Status(other),
        }
    }
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(
        &self,
        request: &CompletionRequest
    ) -> Result<CompletionResponse, ChatClientError>;

    /// `false` means the relay must not attempt a call at all.
    fn has_credentials(&self) -> bool;
    fn get_model(&self) -> String;
    fn get_base_url(&self) -> Option<String>;
}

pub fn new_client(
    config: &LlmConfig
) -> Result<Arc<dyn ChatClient>, Box<dyn StdError + Send + Sync>> {
    let client = GroqChatClient::from_config(config)?;
    Ok(Arc::new(client))
}
