//! Wire types of the enhancement protocol, shared by the endpoint and the client.

use serde::{Deserialize, Serialize};

pub const ENHANCE_PATH: &str = "/api/enhance";

/// Body of `POST /api/enhance`.
///
/// Both members are optional at the serde level so that a missing `text`
/// reaches the handler and gets the protocol's own 400 response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnhanceRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
}

/// Payload of one `data:` frame of the enhancement stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StreamEvent {
    Content {
        content: String,
    },
    Error {
        error: String,
        #[serde(default)]
        details: Option<String>,
    },
}

impl StreamEvent {
    pub fn content(fragment: impl Into<String>) -> Self {
        StreamEvent::Content {
            content: fragment.into(),
        }
    }

    pub fn failure(details: impl Into<String>) -> Self {
        StreamEvent::Error {
            error: "Failed to enhance content".to_string(),
            details: Some(details.into()),
        }
    }
}

/// JSON body of every non-streaming error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
