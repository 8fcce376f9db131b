//! Axum route handlers for the Enhancement API.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{
        sse::{Event, Sse},
        IntoResponse, Response,
    },
    Json,
};
use futures::stream::{Stream, StreamExt};
use tracing::{debug, error, info, warn};

use crate::enhance::prompts::select_prompt;
use crate::enhance::protocol::{EnhanceRequest, StreamEvent};
use crate::errors::AppError;
use crate::llm_client::CompletionProvider;
use crate::sse::DONE_SENTINEL;
use crate::state::AppState;

/// POST /api/enhance
///
/// Validates the request, selects the field's prompt, and relays the upstream
/// completion as an event stream of `{content}` frames ending in `[DONE]`.
/// Once the stream has started, failures are reported in-band as one
/// `{error, details}` frame because the 200 status line is already sent.
pub async fn handle_enhance(
    State(state): State<AppState>,
    payload: Result<Json<EnhanceRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected enhance body: {rejection}");
            EnhanceRequest::default()
        }
    };

    let text = request
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Text is required".to_string()))?;

    let llm = state
        .llm
        .clone()
        .ok_or_else(|| AppError::Configuration("OPENAI_API_KEY is not set".to_string()))?;

    let field = request.field.unwrap_or_default();
    let prompt =
        select_prompt(&field, &text).map_err(|e| AppError::Validation(e.to_string()))?;

    info!(field = %field, chars = text.len(), "Opening enhancement stream");

    let events = relay_completion(llm, prompt);
    Ok(([(header::CONNECTION, "keep-alive")], Sse::new(events)).into_response())
}

/// Fallback for every method other than POST on the enhance route.
pub async fn handle_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

fn relay_completion(
    llm: Arc<dyn CompletionProvider>,
    prompt: String,
) -> impl Stream<Item = Result<Event, Infallible>> {
    async_stream::stream! {
        // Opened inside the stream so an open failure is reported the same
        // way as a mid-stream failure.
        let mut upstream = match llm.stream_completion(&prompt).await {
            Ok(upstream) => upstream,
            Err(e) => {
                error!("Upstream completion failed to open: {e}");
                yield Ok(frame(&StreamEvent::failure(e.to_string())));
                return;
            }
        };

        let mut forwarded = 0usize;
        while let Some(next) = upstream.next().await {
            match next {
                Ok(fragment) if fragment.is_empty() => continue,
                Ok(fragment) => {
                    forwarded += 1;
                    yield Ok(frame(&StreamEvent::content(fragment)));
                }
                Err(e) => {
                    error!("Upstream completion failed after {forwarded} fragments: {e}");
                    yield Ok(frame(&StreamEvent::failure(e.to_string())));
                    return;
                }
            }
        }

        debug!(fragments = forwarded, "Enhancement stream complete");
        yield Ok(Event::default().data(DONE_SENTINEL));
    }
}

fn frame(event: &StreamEvent) -> Event {
    Event::default().json_data(event).unwrap_or_else(|e| {
        error!("Failed to encode stream frame: {e}");
        Event::default().comment("unencodable frame")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::enhance::testing::{test_state, ScriptedProvider, Step};
    use crate::routes::build_router;

    fn enhance_request(method: Method, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri("/api/enhance")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Response) {
        let response = build_router(state).oneshot(request).await.unwrap();
        (response.status(), response)
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn error_message(response: Response) -> String {
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        body["error"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_streams_fragments_then_done() {
        let provider = ScriptedProvider::new(vec![
            Step::Fragment("Hello"),
            Step::Fragment(""),
            Step::Fragment(" world"),
        ]);
        let state = test_state(Some(provider.clone()));
        let (status, response) = send(
            state,
            enhance_request(Method::POST, json!({"text": "hi", "field": "profileSummary"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"].to_str().unwrap(),
            "text/event-stream"
        );
        assert_eq!(response.headers()["cache-control"], "no-cache");
        assert_eq!(
            body_text(response).await,
            "data: {\"content\":\"Hello\"}\n\ndata: {\"content\":\" world\"}\n\ndata: [DONE]\n\n"
        );

        let prompts = provider.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("professional summary"));
        assert!(prompts[0].contains("\"hi\""));
    }

    #[tokio::test]
    async fn test_non_post_is_405() {
        let state = test_state(Some(ScriptedProvider::new(vec![])));
        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/enhance")
            .body(Body::empty())
            .unwrap();
        let (status, response) = send(state, request).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(error_message(response).await, "Method not allowed");
    }

    #[tokio::test]
    async fn test_missing_text_is_400() {
        let provider = ScriptedProvider::new(vec![]);
        let state = test_state(Some(provider.clone()));
        let (status, response) = send(
            state,
            enhance_request(Method::POST, json!({"field": "skills"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_message(response).await, "Text is required");
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_text_is_400() {
        let state = test_state(Some(ScriptedProvider::new(vec![])));
        let (status, _) = send(
            state,
            enhance_request(Method::POST, json!({"text": "  \n ", "field": "skills"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        let state = test_state(Some(ScriptedProvider::new(vec![])));
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/enhance")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, _) = send(state, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_credential_is_500() {
        let state = test_state(None);
        let (status, response) = send(
            state,
            enhance_request(Method::POST, json!({"text": "hi", "field": "skills"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error_message(response).await, "API configuration error");
    }

    #[tokio::test]
    async fn test_unknown_field_is_400() {
        let provider = ScriptedProvider::new(vec![Step::Fragment("x")]);
        let state = test_state(Some(provider.clone()));
        let (status, response) = send(
            state,
            enhance_request(Method::POST, json!({"text": "hi", "field": "hobbies"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_message(response).await, "Unknown field: hobbies");
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_every_known_field_streams() {
        for field in crate::enhance::prompts::EnhanceField::ALL {
            let state = test_state(Some(ScriptedProvider::new(vec![Step::Fragment("ok")])));
            let (status, _) = send(
                state,
                enhance_request(Method::POST, json!({"text": "hi", "field": field.as_str()})),
            )
            .await;
            assert_eq!(status, StatusCode::OK, "field {field}");
        }
    }

    #[tokio::test]
    async fn test_mid_stream_failure_emits_error_frame_without_done() {
        let provider = ScriptedProvider::new(vec![
            Step::Fragment("Partial"),
            Step::Fail("connection reset"),
            Step::Fragment("never sent"),
        ]);
        let state = test_state(Some(provider));
        let (status, response) = send(
            state,
            enhance_request(Method::POST, json!({"text": "hi", "field": "education"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let body = body_text(response).await;
        let frames: Vec<&str> = body.split("\n\n").filter(|f| !f.is_empty()).collect();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0], "data: {\"content\":\"Partial\"}");
        let error: Value = serde_json::from_str(frames[1].strip_prefix("data: ").unwrap()).unwrap();
        assert_eq!(error["error"], "Failed to enhance content");
        assert!(error["details"].as_str().unwrap().contains("connection reset"));
        assert!(!body.contains("[DONE]"));
    }

    #[tokio::test]
    async fn test_open_failure_is_reported_in_band() {
        let state = test_state(Some(ScriptedProvider::failing_open("invalid api key")));
        let (status, response) = send(
            state,
            enhance_request(Method::POST, json!({"text": "hi", "field": "languages"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.starts_with("data: {\"error\":\"Failed to enhance content\""));
        assert!(body.contains("invalid api key"));
        assert!(!body.contains("[DONE]"));
    }
}
