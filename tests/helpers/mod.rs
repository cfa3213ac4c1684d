#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{ AtomicUsize, Ordering };
use std::sync::{ Arc, Mutex };

use axum::Router;
use jaco::config::canned::CannedWisdom;
use jaco::config::prompt::PromptConfig;
use jaco::llm::chat::{ ChatClient, ChatClientError, CompletionRequest, CompletionResponse };
use jaco::relay::Relay;

pub const TEST_SEED: u64 = 7;

type Reply = Box<dyn Fn() -> Result<CompletionResponse, ChatClientError> + Send + Sync>;

pub struct MockChatClient {
    credentials: bool,
    reply: Reply,
    calls: AtomicUsize,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockChatClient {
    fn build(credentials: bool, reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            credentials,
            reply,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        let text = text.to_string();
        Self::build(true, Box::new(move || Ok(CompletionResponse { text: text.clone() })))
    }

    pub fn failing(error: fn() -> ChatClientError) -> Arc<Self> {
        Self::build(true, Box::new(move || Err(error())))
    }

    pub fn without_credentials() -> Arc<Self> {
        Self::build(false, Box::new(|| Ok(CompletionResponse { text: "should not be called".to_string() })))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ChatClient for MockChatClient {
    async fn complete(
        &self,
        request: &CompletionRequest
    ) -> Result<CompletionResponse, ChatClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        (self.reply)()
    }

    fn has_credentials(&self) -> bool {
        self.credentials
    }

    fn get_model(&self) -> String {
        "mock-model".to_string()
    }

    fn get_base_url(&self) -> Option<String> {
        None
    }
}

pub fn relay_with(client: Arc<MockChatClient>) -> Relay {
    Relay::new(client, Arc::new(PromptConfig::default()), CannedWisdom::new(Some(TEST_SEED)))
}

pub async fn spawn_router(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
