use async_trait::async_trait;
use log::{ info, warn };
use reqwest::{ Client as HttpClient, Response, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde::{ Deserialize, Serialize };
use std::error::Error as StdError;
use std::time::Duration;

use super::{ ChatClient, ChatClientError, CompletionRequest, CompletionResponse };
use crate::llm::LlmConfig;

pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

const TEMPERATURE: f32 = 0.8;
const MAX_COMPLETION_TOKENS: u32 = 300;

pub struct GroqChatClient {
    http: HttpClient,
    api_key: Option<String>,
    model: String,
    base_url: String,
    max_retries: u32,
}

#[derive(Serialize)]
struct GroqMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct GroqRequest<'a> {
    model: &'a str,
    messages: Vec<GroqMessage<'a>>,
    temperature: f32,
    max_completion_tokens: u32,
}

#[derive(Deserialize)]
struct GroqResponse {
    #[serde(default)]
    choices: Vec<GroqChoice>,
}

#[derive(Deserialize)]
struct GroqChoice {
    message: GroqResponseMessage,
}

#[derive(Deserialize)]
struct GroqResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl GroqChatClient {
    pub fn new(
        api_key: Option<String>,
        model: Option<String>,
        base_url: Option<String>,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        let chat_model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let api_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &api_key {
            let mut auth = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| format!("Invalid API key format: {}", e))?;
            auth.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth);
        }

        let http = HttpClient::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| Box::new(e) as Box<dyn StdError + Send + Sync>)?;

        Ok(Self {
            http,
            api_key,
            model: chat_model,
            base_url: api_url,
            max_retries,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        Self::new(
            config.api_key.clone(),
            config.completion_model.clone(),
            config.base_url.clone(),
            config.timeout,
            config.max_retries,
        )
    }

    // Only connect failures and timeouts are retried; any HTTP status is final.
    async fn send_with_retries(&self, req: &GroqRequest<'_>) -> Result<Response, ChatClientError> {
        let mut attempt = 0;
        loop {
            match self.http.post(&self.base_url).json(req).send().await {
                Ok(resp) => {
                    return Ok(resp);
                }
                Err(e) if attempt < self.max_retries && (e.is_connect() || e.is_timeout()) => {
                    attempt += 1;
                    warn!(
                        "Groq request attempt {}/{} failed: {}. Retrying...",
                        attempt,
                        self.max_retries + 1,
                        e
                    );
                }
                Err(e) => {
                    return Err(ChatClientError::Transport(e));
                }
            }
        }
    }
}

#[async_trait]
impl ChatClient for GroqChatClient {
    async fn complete(
        &self,
        request: &CompletionRequest
    ) -> Result<CompletionResponse, ChatClientError> {
        if self.api_key.is_none() {
            return Err(ChatClientError::MissingCredentials);
        }

        let req = GroqRequest {
            model: &self.model,
            messages: vec![
                GroqMessage { role: "system", content: &request.system_prompt },
                GroqMessage { role: "user", content: &request.user_message }
            ],
            temperature: TEMPERATURE,
            max_completion_tokens: MAX_COMPLETION_TOKENS,
        };

        let resp = self.send_with_retries(&req).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ChatClientError::from_status(status.as_u16()));
        }

        let body = resp
            .json::<GroqResponse>().await
            .map_err(|e| ChatClientError::InvalidResponse(e.to_string()))?;

        let text = body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ChatClientError::EmptyResponse)?;

        info!("Groq completion received ({} chars)", text.len());
        Ok(CompletionResponse { text })
    }

    fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}
