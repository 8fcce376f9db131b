//! Client side of the enhancement protocol.
//!
//! Streams an enhancement from the endpoint and writes the growing text into
//! the editor after every fragment, so the field fills in progressively.

use std::time::Duration;

use futures::StreamExt;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::editor::{EnhancementTicket, SharedEditor};
use crate::enhance::protocol::{EnhanceRequest, ErrorBody, StreamEvent, ENHANCE_PATH};
use crate::enhance::target::EnhanceTarget;
use crate::sse::{Frame, FrameDecoder};

/// Pause after each merged fragment so the text visibly types itself in.
pub const DEFAULT_FRAGMENT_DELAY: Duration = Duration::from_millis(20);

pub const EMPTY_TEXT_ALERT: &str = "Please add content before enhancing";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Please add content before enhancing")]
    EmptyText,

    #[error("The entry being enhanced no longer exists")]
    MissingEntry,

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("{}", describe_upstream(.error, .details))]
    Upstream {
        error: String,
        details: Option<String>,
    },

    #[error("Superseded by a newer enhancement")]
    Superseded,
}

fn describe_upstream(error: &str, details: &Option<String>) -> String {
    match details {
        Some(details) => format!("{error}: {details}"),
        None => error.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhanceOutcome {
    pub key: String,
    pub text: String,
    pub fragments: usize,
}

pub struct EnhanceClient {
    http: reqwest::Client,
    endpoint: String,
    fragment_delay: Duration,
}

impl EnhanceClient {
    /// `base_url` is the service origin, e.g. `http://localhost:8080`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), ENHANCE_PATH),
            fragment_delay: DEFAULT_FRAGMENT_DELAY,
        })
    }

    pub fn with_fragment_delay(mut self, delay: Duration) -> Self {
        self.fragment_delay = delay;
        self
    }

    /// Enhances `target` in place.
    ///
    /// The target's loading flag is set for the duration of the call and
    /// cleared on every exit path. Failures other than supersession are also
    /// pushed to the editor's alerts. Text merged before a failure stays in
    /// the draft. A run that lost its ticket before the stream ended reports
    /// `Superseded`, whatever the stream itself did.
    pub async fn enhance(
        &self,
        editor: &SharedEditor,
        target: EnhanceTarget,
    ) -> Result<EnhanceOutcome, ClientError> {
        let (ticket, source) = editor.with(|state| {
            let ticket = state.begin_enhancement(&target);
            (ticket, target.source_text(state.draft()))
        });

        let result = self.run(editor, &target, &ticket, source).await;

        editor.with(|state| {
            let result = if state.is_current(&ticket) {
                result
            } else {
                Err(ClientError::Superseded)
            };
            match &result {
                Ok(outcome) => {
                    info!(key = %outcome.key, fragments = outcome.fragments, "Enhancement merged")
                }
                Err(ClientError::Superseded) => debug!(key = %ticket.key, "Enhancement superseded"),
                Err(ClientError::EmptyText) => {
                    warn!(key = %ticket.key, "Nothing to enhance");
                    state.alert(EMPTY_TEXT_ALERT);
                }
                Err(e) => {
                    warn!(key = %ticket.key, "Enhancement failed: {e}");
                    state.alert(format!("Failed to enhance: {e}"));
                }
            }
            state.finish_enhancement(&ticket);
            result
        })
    }

    async fn run(
        &self,
        editor: &SharedEditor,
        target: &EnhanceTarget,
        ticket: &EnhancementTicket,
        source: Option<String>,
    ) -> Result<EnhanceOutcome, ClientError> {
        let text = source.ok_or(ClientError::MissingEntry)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ClientError::EmptyText);
        }

        let request = EnhanceRequest {
            text: Some(text.to_string()),
            field: Some(target.field().to_string()),
        };
        let response = self.http.post(&self.endpoint).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status.canonical_reason().unwrap_or("Request failed").to_string(),
            };
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let mut body = Box::pin(response.bytes_stream());
        let mut decoder = FrameDecoder::new();
        let mut acc = Accumulator::default();

        while let Some(chunk) = body.next().await {
            for frame in decoder.push(&chunk?) {
                self.apply(editor, ticket, &mut acc, frame).await?;
            }
        }
        if let Some(frame) = decoder.finish() {
            self.apply(editor, ticket, &mut acc, frame).await?;
        }

        if let Some((error, details)) = acc.failure {
            return Err(ClientError::Upstream { error, details });
        }

        Ok(EnhanceOutcome {
            key: ticket.key.clone(),
            text: acc.text,
            fragments: acc.fragments,
        })
    }

    async fn apply(
        &self,
        editor: &SharedEditor,
        ticket: &EnhancementTicket,
        acc: &mut Accumulator,
        frame: Frame,
    ) -> Result<(), ClientError> {
        let Some(text) = acc.absorb(frame) else {
            return Ok(());
        };

        editor.with(|state| {
            if state.merge_enhancement(ticket, text) {
                Ok(())
            } else if state.is_current(ticket) {
                Err(ClientError::MissingEntry)
            } else {
                Err(ClientError::Superseded)
            }
        })?;

        if !self.fragment_delay.is_zero() {
            tokio::time::sleep(self.fragment_delay).await;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Accumulator {
    text: String,
    fragments: usize,
    failure: Option<(String, Option<String>)>,
}

impl Accumulator {
    /// Folds one frame in. Returns the accumulated text when the frame
    /// extended it.
    fn absorb(&mut self, frame: Frame) -> Option<&str> {
        // The stream ends on close, not on the sentinel.
        let Frame::Data(payload) = frame else {
            return None;
        };

        match serde_json::from_str::<StreamEvent>(&payload) {
            Ok(StreamEvent::Content { content }) => {
                self.text.push_str(&content);
                self.fragments += 1;
                Some(&self.text)
            }
            Ok(StreamEvent::Error { error, details }) => {
                self.failure = Some((error, details));
                None
            }
            Err(e) => {
                debug!("Skipping malformed frame: {e}");
                None
            }
        }
    }
}
