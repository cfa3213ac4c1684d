pub mod terminal;
pub mod transport;

use chrono::{ Local, Utc };
use log::warn;

use crate::models::chat::{ ChatMessage, ChatRequest, Message, Role };
use self::transport::{ RelayTransport, TransportError };

pub const CLIENT_ERROR_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";
pub const EMPTY_PLACEHOLDER: &str = "Ask Jaco anything and be enlightened!";
pub const TYPING_INDICATOR: &str = "Jaco is thinking...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejected {
    #[error("message is empty")]
    Empty,
    #[error("a request is already in flight")]
    Busy,
}

/// The request a submit produced. Only the newest user message goes out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub content: String,
}

impl PendingRequest {
    pub fn to_request(&self) -> ChatRequest {
        ChatRequest {
            messages: vec![ChatMessage::user(self.content.clone())],
        }
    }
}

pub struct ChatSession<T: RelayTransport> {
    transport: T,
    conversation: Vec<Message>,
    state: SessionState,
    input: String,
    next_seq: u64,
}

impl<T: RelayTransport> ChatSession<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            conversation: Vec::new(),
            state: SessionState::Idle,
            input: String::new(),
            next_seq: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == SessionState::Submitting
    }

    pub fn conversation(&self) -> &[Message] {
        &self.conversation
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `Idle -> Submitting`. Appends the user message from the input buffer
    /// and clears it. Rejections leave the session untouched.
    pub fn begin_submit(&mut self) -> Result<PendingRequest, SubmitRejected> {
        if self.state == SessionState::Submitting {
            return Err(SubmitRejected::Busy);
        }
        let content = self.input.trim().to_string();
        if content.is_empty() {
            return Err(SubmitRejected::Empty);
        }

        self.push_message(Role::User, content.clone());
        self.input.clear();
        self.state = SessionState::Submitting;
        Ok(PendingRequest { content })
    }

    /// `Submitting -> Idle`. Returns `None` if nothing was in flight.
    pub fn finish(&mut self, result: Result<String, TransportError>) -> Option<&Message> {
        if self.state != SessionState::Submitting {
            return None;
        }

        let content = match result {
            Ok(text) => text,
            Err(e) => {
                warn!("Chat request failed: {}", e);
                CLIENT_ERROR_MESSAGE.to_string()
            }
        };
        self.state = SessionState::Idle;
        Some(self.push_message(Role::Assistant, content))
    }

    /// Runs a whole exchange: submit, one relay call, append the reply.
    pub async fn submit(&mut self, text: &str) -> Result<&Message, SubmitRejected> {
        if self.state == SessionState::Submitting {
            return Err(SubmitRejected::Busy);
        }
        self.set_input(text);
        let pending = self.begin_submit()?;

        let result = self.transport.send(&pending.to_request()).await;
        self.finish(result).ok_or(SubmitRejected::Busy)
    }

    /// Re-renders the whole conversation. Each call starts from the top.
    pub fn render(&self) -> impl Iterator<Item = String> + '_ {
        let placeholder = self.conversation.is_empty().then(|| EMPTY_PLACEHOLDER.to_string());
        let typing = self.is_pending().then(|| TYPING_INDICATOR.to_string());

        placeholder
            .into_iter()
            .chain(self.conversation.iter().map(render_message))
            .chain(typing)
    }

    fn push_message(&mut self, role: Role, content: String) -> &Message {
        let timestamp = Utc::now();
        let id = format!("{}-{}", timestamp.timestamp_millis(), self.next_seq);
        self.next_seq += 1;

        self.conversation.push(Message { id, role, content, timestamp });
        &self.conversation[self.conversation.len() - 1]
    }
}

pub fn render_message(message: &Message) -> String {
    let speaker = match message.role {
        Role::User => "You",
        Role::Assistant => "Jaco",
    };
    format!(
        "[{}] {}: {}",
        message.timestamp.with_timezone(&Local).format("%H:%M:%S"),
        speaker,
        message.content
    )
}
