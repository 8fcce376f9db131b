//! LLM client: the single point of entry for all upstream language-model calls.
//!
//! No other module calls the provider API directly. Handlers depend on the
//! `CompletionProvider` trait, never on `LlmClient`.
//!
//! The model is fixed to gpt-4o-mini and is deliberately not configurable.

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::sse::{Frame, FrameDecoder};

pub mod prompts;

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
/// The model used for every enhancement.
pub const MODEL: &str = "gpt-4o-mini";
const MAX_TOKENS: u32 = 500;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Incremental text fragments of one completion, in arrival order.
pub type FragmentStream = BoxStream<'static, Result<String, LlmError>>;

/// Anything that can stream a completion for a prompt.
///
/// `LlmClient` is the production implementation; tests substitute scripted
/// providers through the same seam.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Opens a streaming completion. Errors returned here happen before the
    /// first fragment; errors inside the stream happen after it.
    async fn stream_completion(&self, prompt: &str) -> Result<FragmentStream, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    stream: bool,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Streaming chat-completion client for an OpenAI-compatible provider.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: &str) -> Result<Self, LlmError> {
        // No request timeout: a completion stream stays open as long as the
        // provider keeps producing tokens.
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, CHAT_COMPLETIONS_PATH)
    }
}

#[async_trait]
impl CompletionProvider for LlmClient {
    async fn stream_completion(&self, prompt: &str) -> Result<FragmentStream, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            stream: true,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("LLM API returned {}: {}", status, body);
            let message = serde_json::from_str::<ProviderError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!("LLM stream opened (model: {MODEL})");

        let mut bytes = Box::pin(response.bytes_stream());
        let fragments = async_stream::stream! {
            let mut decoder = FrameDecoder::new();
            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        yield Err(LlmError::Http(e));
                        return;
                    }
                };
                for frame in decoder.push(&chunk) {
                    match frame {
                        Frame::Done => return,
                        Frame::Data(payload) => {
                            if let Some(fragment) = chunk_content(&payload) {
                                yield Ok(fragment);
                            }
                        }
                    }
                }
            }
            if let Some(Frame::Data(payload)) = decoder.finish() {
                if let Some(fragment) = chunk_content(&payload) {
                    yield Ok(fragment);
                }
            }
        };

        Ok(fragments.boxed())
    }
}

/// Extracts the first choice's delta text from one upstream chunk.
/// Returns `None` for role-only, finish, and malformed chunks.
fn chunk_content(payload: &str) -> Option<String> {
    match serde_json::from_str::<ChatChunk>(payload) {
        Ok(chunk) => chunk
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.delta.content)
            .filter(|content| !content.is_empty()),
        Err(e) => {
            warn!("Skipping malformed upstream chunk: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn spawn_provider(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_chunk_content_extracts_delta() {
        let payload = r#"{"choices":[{"delta":{"content":"Hi"}}]}"#;
        assert_eq!(chunk_content(payload), Some("Hi".to_string()));
    }

    #[test]
    fn test_chunk_content_skips_role_and_finish_chunks() {
        assert_eq!(
            chunk_content(r#"{"choices":[{"delta":{"role":"assistant"}}]}"#),
            None
        );
        assert_eq!(
            chunk_content(r#"{"choices":[{"delta":{},"finish_reason":"stop"}]}"#),
            None
        );
        assert_eq!(chunk_content(r#"{"choices":[]}"#), None);
    }

    #[test]
    fn test_chunk_content_skips_malformed() {
        assert_eq!(chunk_content("{not json"), None);
    }

    #[tokio::test]
    async fn test_streams_fragments_until_done() {
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"Led \"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"a team\"}}]}\n\n",
            "data: [DONE]\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"ignored\"}}]}\n\n",
        );
        let router = Router::new().route(
            "/v1/chat/completions",
            post(move |Json(request): Json<Value>| async move {
                assert_eq!(request["stream"], json!(true));
                assert_eq!(request["model"], json!(MODEL));
                assert_eq!(request["messages"][0]["content"], json!("the prompt"));
                body
            }),
        );
        let base = spawn_provider(router).await;

        let client = LlmClient::new("sk-test".to_string(), &base).unwrap();
        let fragments: Vec<String> = client
            .stream_completion("the prompt")
            .await
            .unwrap()
            .map(|r| r.unwrap())
            .collect()
            .await;

        assert_eq!(fragments, vec!["Led ".to_string(), "a team".to_string()]);
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"error": {"message": "Incorrect API key provided"}})),
                )
            }),
        );
        let base = spawn_provider(router).await;

        let client = LlmClient::new("sk-bad".to_string(), &base).unwrap();
        match client.stream_completion("p").await {
            Err(LlmError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Incorrect API key provided");
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected an API error"),
        }
    }
}
