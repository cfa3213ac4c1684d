mod helpers;

use std::collections::VecDeque;
use std::sync::atomic::{ AtomicUsize, Ordering };
use std::sync::{ Arc, Mutex };
use std::time::Duration;

use jaco::models::chat::{ ChatRequest, Role, WireRole };
use jaco::server::api::create_router;
use jaco::session::terminal::run_session;
use jaco::session::transport::{ HttpRelayTransport, RelayTransport, TransportError };
use jaco::session::{ ChatSession, SessionState, SubmitRejected, CLIENT_ERROR_MESSAGE };

use helpers::{ closed_addr, relay_with, spawn_router, MockChatClient };

#[derive(Default)]
struct MockTransport {
    replies: Mutex<VecDeque<Result<String, TransportError>>>,
    requests: Mutex<Vec<ChatRequest>>,
    calls: AtomicUsize,
}

impl MockTransport {
    fn with_replies(replies: Vec<Result<String, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RelayTransport for MockTransport {
    async fn send(&self, request: &ChatRequest) -> Result<String, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(TransportError::Status(500)))
    }
}

#[tokio::test]
async fn submit_appends_user_then_assistant_message() {
    let transport = MockTransport::with_replies(vec![Ok("X".to_string())]);
    let mut session = ChatSession::new(transport.clone());

    session.set_input("What is courage?");
    let pending = session.begin_submit().unwrap();

    assert_eq!(session.state(), SessionState::Submitting);
    assert!(session.is_pending());
    assert_eq!(session.input(), "");
    assert_eq!(session.conversation().len(), 1);
    assert_eq!(session.conversation()[0].role, Role::User);
    assert_eq!(session.conversation()[0].content, "What is courage?");

    let result = session.transport().send(&pending.to_request()).await;
    let reply = session.finish(result).unwrap();
    assert_eq!(reply.role, Role::Assistant);
    assert_eq!(reply.content, "X");

    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.conversation().len(), 2);
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn submit_runs_a_full_exchange() {
    let transport = MockTransport::with_replies(vec![Ok("X".to_string())]);
    let mut session = ChatSession::new(transport.clone());

    let reply = session.submit("  What is courage?  ").await.unwrap();
    assert_eq!(reply.content, "X");

    assert_eq!(session.conversation()[0].content, "What is courage?");
    assert!(!session.is_pending());
}

#[tokio::test]
async fn submitting_while_pending_is_a_no_op() {
    let transport = MockTransport::with_replies(vec![Ok("X".to_string())]);
    let mut session = ChatSession::new(transport.clone());

    session.set_input("first");
    session.begin_submit().unwrap();

    session.set_input("second");
    assert_eq!(session.begin_submit(), Err(SubmitRejected::Busy));
    assert!(matches!(session.submit("third").await, Err(SubmitRejected::Busy)));

    assert_eq!(session.conversation().len(), 1);
    assert_eq!(transport.calls(), 0);
    assert!(session.is_pending());
}

#[tokio::test]
async fn empty_submit_dispatches_nothing() {
    let transport = MockTransport::with_replies(vec![]);
    let mut session = ChatSession::new(transport.clone());

    assert!(matches!(session.submit("   ").await, Err(SubmitRejected::Empty)));
    assert!(session.conversation().is_empty());
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn failure_appends_one_error_message() {
    let transport = MockTransport::with_replies(vec![Err(TransportError::Status(502))]);
    let mut session = ChatSession::new(transport.clone());

    session.submit("What is courage?").await.unwrap();

    let conversation = session.conversation();
    assert_eq!(conversation.len(), 2);
    assert_eq!(conversation[1].role, Role::Assistant);
    assert_eq!(conversation[1].content, CLIENT_ERROR_MESSAGE);
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test]
async fn only_the_newest_message_is_sent() {
    let transport = MockTransport::with_replies(vec![Ok("one".to_string()), Ok("two".to_string())]);
    let mut session = ChatSession::new(transport.clone());

    session.submit("first question").await.unwrap();
    session.submit("second question").await.unwrap();

    let requests = transport.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].messages.len(), 1);
    assert_eq!(requests[1].messages[0].role, WireRole::User);
    assert_eq!(requests[1].messages[0].content.as_deref(), Some("second question"));
    assert_eq!(session.conversation().len(), 4);
}

#[tokio::test]
async fn http_transport_talks_to_the_relay() {
    let client = MockChatClient::replying("X");
    let addr = spawn_router(create_router(relay_with(client.clone()))).await;
    let transport = HttpRelayTransport::new(&format!("http://{}/", addr), Duration::from_secs(5)).unwrap();
    let mut session = ChatSession::new(transport);

    let reply = session.submit("What is courage?").await.unwrap();

    assert_eq!(reply.content, "X");
    assert_eq!(client.calls(), 1);
    assert_eq!(client.requests()[0].user_message, "What is courage?");
}

#[tokio::test]
async fn http_transport_surfaces_relay_rejection_as_error() {
    let addr = spawn_router(create_router(relay_with(MockChatClient::replying("X")))).await;
    let transport = HttpRelayTransport::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap();

    let request = ChatRequest::default();
    let result = transport.send(&request).await;

    assert!(matches!(result, Err(TransportError::Status(400))));
}

#[tokio::test]
async fn network_failure_becomes_client_error_message() {
    let addr = closed_addr().await;
    let transport = HttpRelayTransport::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap();
    let mut session = ChatSession::new(transport);

    let reply = session.submit("What is courage?").await.unwrap();

    assert_eq!(reply.content, CLIENT_ERROR_MESSAGE);
    assert_eq!(session.conversation().len(), 2);
    assert!(!session.is_pending());
}

#[tokio::test]
async fn terminal_session_relays_lines_until_quit() {
    let transport = MockTransport::with_replies(vec![Ok("X".to_string())]);
    let session = ChatSession::new(transport.clone());
    let input: &[u8] = b"What is courage?\n   \n/quit\nnever sent\n";
    let mut output = Vec::new();

    run_session(session, input, &mut output).await.unwrap();

    let printed = String::from_utf8(output).unwrap();
    assert!(printed.starts_with("Ask Jaco anything and be enlightened!\n"));
    assert!(printed.contains("Jaco is thinking..."));
    assert!(printed.contains("Jaco: X"));
    assert_eq!(transport.calls(), 1);
}
