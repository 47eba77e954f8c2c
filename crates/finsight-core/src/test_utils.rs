//! Test utilities for finsight-core
//!
//! This module provides a mock OpenAI-compatible server that can be used for
//! development and integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// How the mock server answers chat completion requests
#[derive(Debug, Clone)]
pub enum MockCompletion {
    /// Answer based on the prompt: scenario prompts get a plan echoing the
    /// question, fact summaries get a one-line summary
    Scripted,
    /// Always answer with this assistant text
    Text(String),
    /// Answer with this HTTP status and an error body
    Status(u16),
    /// 200 with a body that is not a chat completion
    Malformed,
    /// 200 with an empty `choices` array
    NoChoices,
}

/// A chat completion request as seen by the mock server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    mode: MockCompletion,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Mock OpenAI-compatible server for testing and development
pub struct MockCompletionServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockCompletionServer {
    /// Start a scripted mock server on an available port
    pub async fn start() -> Self {
        Self::start_with(MockCompletion::Scripted).await
    }

    /// Start the mock server with a fixed answering mode
    pub async fn start_with(mode: MockCompletion) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            mode,
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_chat))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            requests,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Chat completion requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockCompletionServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Model listing (health check)
async fn handle_models() -> Json<Value> {
    Json(json!({
        "object": "list",
        "data": [{"id": "mock-model", "object": "model", "owned_by": "finsight"}]
    }))
}

async fn handle_chat(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.requests.lock().unwrap().push(RecordedRequest {
        authorization,
        body: body.clone(),
    });

    match state.mode {
        MockCompletion::Scripted => completion(&body, &scripted_reply(&body)),
        MockCompletion::Text(ref text) => completion(&body, text),
        MockCompletion::Status(code) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                Json(json!({"error": {"message": "mock failure", "type": "server_error"}})),
            )
                .into_response()
        }
        MockCompletion::Malformed => (StatusCode::OK, "this is not json").into_response(),
        MockCompletion::NoChoices => Json(json!({"id": "chatcmpl-mock", "choices": []})).into_response(),
    }
}

fn completion(request: &Value, text: &str) -> Response {
    Json(json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "model": request["model"],
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": text},
            "finish_reason": "stop"
        }]
    }))
    .into_response()
}

/// Pick a reply from the user message; patterns match the prompt files in prompts/*.md
fn scripted_reply(request: &Value) -> String {
    let user = request["messages"]
        .as_array()
        .and_then(|messages| messages.iter().rev().find(|m| m["role"] == "user"))
        .and_then(|m| m["content"].as_str())
        .unwrap_or_default();

    if user.contains("FACTS (JSON):") {
        return "Your income comfortably covers your regular spending.".to_string();
    }

    let question = extract_question(user).unwrap_or("your scenario");
    format!(
        "Plan for: {}\n- Keep your emergency fund topped up\n- Review your largest expense first\n- Check progress every quarter",
        question
    )
}

fn extract_question(prompt: &str) -> Option<&str> {
    let start = prompt.find("User question: \"")? + "User question: \"".len();
    let end = prompt[start..].find("\"\n")?;
    Some(&prompt[start..start + end])
}
