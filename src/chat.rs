//! Relay of one visitor question to an external chat responder
//!
//! No history, streaming or retry: one POST per question, and any failure is
//! collapsed into one of two fixed messages for the visitor.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Shown when the responder answers with an error
pub const SERVICE_FALLBACK: &str = "Sorry, something went wrong with the AI. Try again!";

/// Shown when the responder cannot be reached or its answer cannot be read
pub const TRANSPORT_FALLBACK: &str = "Failed to connect to the AI. Please try again later.";

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Failed to reach chat endpoint: {message}")]
    Transport { message: String },

    #[error("Chat service error: {message}")]
    Service { message: String },
}

impl ChatError {
    pub fn transport(message: impl AsRef<str>) -> Self {
        ChatError::Transport {
            message: message.as_ref().to_string(),
        }
    }

    pub fn service(message: impl AsRef<str>) -> Self {
        ChatError::Service {
            message: message.as_ref().to_string(),
        }
    }

    /// The fixed text the visitor sees for this failure
    pub fn fallback(&self) -> &'static str {
        match self {
            ChatError::Transport { .. } => TRANSPORT_FALLBACK,
            ChatError::Service { .. } => SERVICE_FALLBACK,
        }
    }
}

pub type ChatResult<T> = Result<T, ChatError>;

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

/// Body returned by the responder: a reply, or an error indicator of any shape
#[derive(Debug, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl ChatResponse {
    /// `null`, `false`, `0` and `""` do not count as errors
    pub fn has_error(&self) -> bool {
        match &self.error {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Number(n)) => n.as_f64() != Some(0.0),
            Some(_) => true,
        }
    }

    pub fn into_reply(self) -> ChatResult<String> {
        if self.has_error() {
            let detail = self.error.map(|e| e.to_string()).unwrap_or_default();
            return Err(ChatError::service(detail));
        }
        self.response
            .ok_or_else(|| ChatError::service("response field missing"))
    }
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest<'_>) -> ChatResult<ChatResponse>;
}

/// JSON over HTTP POST
pub struct HttpChatTransport {
    client: Client,
    endpoint: String,
}

impl HttpChatTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn send(&self, request: &ChatRequest<'_>) -> ChatResult<ChatResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| ChatError::transport(e.to_string()))?;

        let status = response.status();
        log::debug!("Chat endpoint answered {}", status);
        if !status.is_success() {
            return Err(ChatError::service(format!("HTTP {}", status)));
        }

        // A 2xx answer that is not JSON counts as unreachable
        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| ChatError::transport(e.to_string()))
    }
}

pub struct ChatRelay<T> {
    transport: T,
}

impl<T: ChatTransport> ChatRelay<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Forward a question and return the reply or the matching failure
    pub async fn try_ask(&self, message: &str) -> ChatResult<String> {
        let response = self.transport.send(&ChatRequest { message }).await?;
        response.into_reply()
    }

    /// Text to show the visitor; `None` when the question is blank
    pub async fn ask(&self, message: &str) -> Option<String> {
        if message.trim().is_empty() {
            return None;
        }

        match self.try_ask(message).await {
            Ok(reply) => Some(reply),
            Err(e) => {
                log::error!("Error with AI: {}", e);
                Some(e.fallback().to_string())
            }
        }
    }
}
