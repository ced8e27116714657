//! Test support: a stub HTTP server and a scripted LLM provider.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use serde_json::Value;
use tokio::net::TcpListener;

use crate::llm::{ContentBlock, LlmProvider, Message, MessageResponse, StopReason, ToolDefinition, Usage};

/// A request received by [`StubServer`]
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: Method,
    /// Path and query, as sent
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

struct Stub {
    status: StatusCode,
    body: String,
    requests: Mutex<Vec<CapturedRequest>>,
}

/// Local HTTP server answering every request with one canned JSON response
pub struct StubServer {
    base_url: String,
    stub: Arc<Stub>,
}

impl StubServer {
    pub async fn start(status: u16, body: &str) -> Self {
        let stub = Arc::new(Stub {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new().fallback(respond).with_state(stub.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            stub,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.stub.requests.lock().unwrap().clone()
    }

    /// The only request received; fails if there was not exactly one
    pub fn single_request(&self) -> CapturedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected one request, got {:?}", requests);
        requests.into_iter().next().unwrap()
    }
}

async fn respond(
    State(stub): State<Arc<Stub>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    stub.requests.lock().unwrap().push(CapturedRequest {
        method,
        uri: uri.to_string(),
        headers,
        body,
    });
    (
        stub.status,
        [(header::CONTENT_TYPE, "application/json")],
        stub.body.clone(),
    )
}

/// A request as seen by [`ScriptedProvider`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub messages: Vec<Message>,
    pub system: Option<String>,
    pub tool_names: Vec<String>,
}

/// LLM provider that replays canned responses in order
#[derive(Default)]
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<MessageResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
    repeat_last: bool,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<MessageResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Default::default()
        }
    }

    /// Keep answering with the final response once the script runs out
    pub fn repeating(response: MessageResponse) -> Self {
        Self {
            responses: Mutex::new(vec![response].into()),
            repeat_last: true,
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LlmProvider for ScriptedProvider {
    async fn send_with_tools_and_system(
        &self,
        messages: Vec<Message>,
        system: Option<&str>,
        tools: Vec<ToolDefinition>,
    ) -> Result<MessageResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            messages,
            system: system.map(str::to_string),
            tool_names: tools.into_iter().map(|t| t.name).collect(),
        });

        let mut responses = self.responses.lock().unwrap();
        let next = if self.repeat_last && responses.len() == 1 {
            responses.front().cloned()
        } else {
            responses.pop_front()
        };
        next.ok_or_else(|| anyhow::anyhow!("script exhausted"))
    }

    fn model(&self) -> String {
        "scripted".to_string()
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}

/// A response that ends the turn with text
pub fn text_response(text: &str) -> MessageResponse {
    response(vec![ContentBlock::text(text)], StopReason::EndTurn)
}

/// A response that calls the given tools, in order
pub fn tool_call_response(calls: &[(&str, &str)]) -> MessageResponse {
    let blocks = calls
        .iter()
        .map(|(id, name)| ContentBlock::tool_use(*id, *name, Value::Object(Default::default())))
        .collect();
    response(blocks, StopReason::ToolUse)
}

fn response(content: Vec<ContentBlock>, stop_reason: StopReason) -> MessageResponse {
    MessageResponse {
        id: "msg_test".to_string(),
        content,
        model: "scripted".to_string(),
        stop_reason: Some(stop_reason),
        usage: Usage::default(),
    }
}
