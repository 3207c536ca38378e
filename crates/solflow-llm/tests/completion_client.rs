//! Integration tests for the completion client against a local fake provider.
//!
//! Each test binds an axum server on an ephemeral port that speaks the
//! chat-completions shape, then drives the real HTTP client at it.
//!
//! Run with: `cargo test --package solflow-llm --test completion_client`

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use solflow_core::{ChatMessage, ChatState, CompletionOutcome, APOLOGY, GREETING};
use solflow_llm::{
    ask, CompletionClient, GenerationRequest, LlmError, ProviderConfig, TextGenerator,
    SYSTEM_PROMPT,
};
use tokio::net::TcpListener;

/// What the fake provider saw: request headers and JSON body.
#[derive(Clone, Default)]
struct Recorded {
    calls: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

/// Canned behavior for the fake provider.
#[derive(Clone)]
enum Reply {
    Answer(&'static str),
    Status(StatusCode),
    NoChoices,
}

#[derive(Clone)]
struct FakeProvider {
    reply: Reply,
    recorded: Recorded,
}

async fn completions(
    State(provider): State<FakeProvider>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    provider.recorded.calls.lock().unwrap().push((auth, body));

    match provider.reply {
        Reply::Answer(text) => Json(json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": text}, "finish_reason": "stop"}
            ]
        }))
        .into_response(),
        Reply::Status(status) => (status, "provider unavailable").into_response(),
        Reply::NoChoices => Json(json!({"choices": []})).into_response(),
    }
}

/// Start the fake provider and return its `/v1` base URL.
async fn spawn_provider(reply: Reply) -> (String, Recorded) {
    let recorded = Recorded::default();
    let state = FakeProvider {
        reply,
        recorded: recorded.clone(),
    };
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/v1"), recorded)
}

fn client_for(api_url: String, api_key: Option<&str>) -> CompletionClient {
    CompletionClient::new(ProviderConfig {
        api_url,
        api_key: api_key.map(str::to_string),
        model_name: "gpt-4o".into(),
        request_timeout_secs: Some(5),
    })
    .unwrap()
}

// ============================================================================
// HTTP client
// ============================================================================

#[tokio::test]
async fn sends_system_prompt_model_and_bearer_key() {
    let (url, recorded) = spawn_provider(Reply::Answer("Entry validates the owner.")).await;
    let client = client_for(url, Some("sk-test"));

    let text = client
        .generate(&GenerationRequest::new("What does entry do?"))
        .await
        .unwrap();

    assert_eq!(text, "Entry validates the owner.");

    let calls = recorded.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (auth, body) = &calls[0];
    assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
    assert_eq!(body["model"], "gpt-4o");
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["messages"][1]["content"], "What does entry do?");
}

#[tokio::test]
async fn omits_authorization_without_key() {
    let (url, recorded) = spawn_provider(Reply::Answer("ok")).await;
    let client = client_for(url, None);

    client.generate(&GenerationRequest::new("hi")).await.unwrap();

    let calls = recorded.calls.lock().unwrap();
    assert_eq!(calls[0].0, None);
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let (url, _) = spawn_provider(Reply::Status(StatusCode::SERVICE_UNAVAILABLE)).await;
    let client = client_for(url, Some("sk-test"));

    let err = client
        .generate(&GenerationRequest::new("hi"))
        .await
        .unwrap_err();

    match err {
        LlmError::Status { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "provider unavailable");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn empty_choices_is_an_error() {
    let (url, _) = spawn_provider(Reply::NoChoices).await;
    let client = client_for(url, None);

    let err = client
        .generate(&GenerationRequest::new("hi"))
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::EmptyResponse));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(format!("http://{addr}/v1"), None);
    let err = client
        .generate(&GenerationRequest::new("hi"))
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::Transport(_)));
}

// ============================================================================
// Chat driver
// ============================================================================

#[tokio::test]
async fn ask_over_http_appends_answer() {
    let (url, _) = spawn_provider(Reply::Answer("It initializes state.")).await;
    let client = client_for(url, None);
    let mut chat = ChatState::new();

    let outcome = ask(&mut chat, &client, "What does entry do?").await;

    assert_eq!(outcome, Some(CompletionOutcome::Answered));
    assert!(!chat.is_loading());
    assert_eq!(
        chat.transcript(),
        &[
            ChatMessage::assistant(GREETING),
            ChatMessage::user("What does entry do?"),
            ChatMessage::assistant("It initializes state."),
        ]
    );
}

#[tokio::test]
async fn ask_with_failing_provider_apologizes() {
    let (url, _) = spawn_provider(Reply::Status(StatusCode::UNAUTHORIZED)).await;
    let client = client_for(url, Some("sk-wrong"));
    let mut chat = ChatState::new();

    let outcome = ask(&mut chat, &client, "hello").await;

    assert_eq!(outcome, Some(CompletionOutcome::Apologized));
    assert_eq!(chat.transcript().last(), Some(&ChatMessage::assistant(APOLOGY)));
}
