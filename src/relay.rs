use log::{ info, warn, error };
use std::error::Error;
use std::sync::Arc;
use uuid::Uuid;

use crate::cli::ServeArgs;
use crate::config::canned::CannedWisdom;
use crate::config::prompt::{ self, PromptConfig };
use crate::llm::chat::{ ChatClient, ChatClientError, new_client as new_chat_client };
use crate::models::chat::ChatMessage;

pub const MESSAGE_REQUIRED: &str = "Message is required";

pub const UNAVAILABLE_RESPONSE: &str =
    "Well, you see, my philosophical punk rock wisdom service is temporarily unavailable. Even Diogenes needed a nap in his barrel now and then - please try again later.";

pub const RATE_LIMITED_RESPONSE: &str =
    "Well, you see, too many seekers are asking for wisdom at once. As Seneca said, 'Patience is a remedy for every sorrow' - give me a moment and ask again, or as The Ramones put it: 'hey ho, let's go' - just not all at the same time.";

pub const UNAUTHORIZED_RESPONSE: &str =
    "Well, you see, the gates of the wisdom archive refused my credentials. As Kafka knew, sometimes the door is only meant for you and still won't open - the operator needs to check the API key.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Sent back as `200 { response }`.
    Reply(String),
    /// Sent back as `400 { error }`.
    Rejected(&'static str),
}

#[derive(Clone)]
pub struct Relay {
    chat_client: Arc<dyn ChatClient>,
    prompt_config: Arc<PromptConfig>,
    canned: CannedWisdom,
}

/// Content of the final message, trimmed. `None` when there is nothing to send.
pub fn last_user_message(messages: &[ChatMessage]) -> Option<&str> {
    messages
        .last()
        .and_then(|m| m.content.as_deref())
        .map(str::trim)
        .filter(|content| !content.is_empty())
}

impl Relay {
    pub fn new(
        chat_client: Arc<dyn ChatClient>,
        prompt_config: Arc<PromptConfig>,
        canned: CannedWisdom
    ) -> Self {
        Self { chat_client, prompt_config, canned }
    }

    pub fn from_args(args: &ServeArgs) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let llm_config = args.llm_config();
        let chat_client = new_chat_client(&llm_config)?;
        info!(
            "Chat client configured: Model={}, BaseURL={}, Timeout={:?}, MaxRetries={}",
            chat_client.get_model(),
            chat_client.get_base_url().as_deref().unwrap_or("client default"),
            llm_config.timeout,
            llm_config.max_retries
        );
        if !chat_client.has_credentials() {
            warn!("No completion API key configured. Chat requests will get the unavailable reply.");
        }

        let prompt_config = prompt::load_prompts(args.persona_path.as_deref())?;
        info!("Persona source: {}", prompt_config.source_label());
        let canned = CannedWisdom::new(args.fallback_seed);
        info!("Fallback wisdom seed: {}", canned.seed());

        Ok(Self::new(chat_client, prompt_config, canned))
    }

    pub async fn respond(&self, messages: &[ChatMessage]) -> RelayOutcome {
        let request_id = Uuid::new_v4();

        let Some(user_message) = last_user_message(messages) else {
            warn!("[{}] Rejected chat request without a message", request_id);
            return RelayOutcome::Rejected(MESSAGE_REQUIRED);
        };

        if !self.chat_client.has_credentials() {
            warn!("[{}] No completion credential configured; skipping upstream call", request_id);
            return RelayOutcome::Reply(UNAVAILABLE_RESPONSE.to_string());
        }

        info!("[{}] Relaying message ({} chars) to {}", request_id, user_message.len(), self.chat_client.get_model());
        let request = prompt::build_completion_request(&self.prompt_config, user_message);

        let result = self.chat_client
            .complete(&request).await
            .and_then(|resp| {
                if resp.text.trim().is_empty() {
                    Err(ChatClientError::EmptyResponse)
                } else {
                    Ok(resp.text)
                }
            });

        match result {
            Ok(text) => {
                info!("[{}] Completion relayed", request_id);
                RelayOutcome::Reply(text)
            }
            Err(e) => {
                error!("[{}] Completion failed, replying with fallback: {}", request_id, e);
                RelayOutcome::Reply(self.fallback_for(&e, user_message))
            }
        }
    }

    pub fn fallback_for(&self, error: &ChatClientError, user_message: &str) -> String {
        match error {
            ChatClientError::RateLimited => RATE_LIMITED_RESPONSE.to_string(),
            ChatClientError::Unauthorized => UNAUTHORIZED_RESPONSE.to_string(),
            ChatClientError::MissingCredentials => UNAVAILABLE_RESPONSE.to_string(),
            _ => self.canned.compose(user_message),
        }
    }
}
