use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /start`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    pub palette_size: usize,
}

/// Reply to `POST /start`.
///
/// The acknowledgement is implementation-defined, so every field is optional
/// and unknown fields are kept for logging.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct StartAck {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reply to `GET /proposal`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalResponse {
    /// Raw wire tokens, `p{position}{color}`.
    pub proposal: Vec<String>,
    /// The service's own attempt counter, if it keeps one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_attempt: Option<usize>,
}

impl ProposalResponse {
    pub fn new<S: Into<String>>(tokens: impl IntoIterator<Item = S>) -> Self {
        Self {
            proposal: tokens.into_iter().map(Into::into).collect(),
            current_attempt: None,
        }
    }
}

/// Body of `POST /respond`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FeedbackRequest {
    /// The proposal being answered, in wire form.
    pub proposal: Vec<String>,
    pub hits: usize,
}

/// Reply to `POST /respond`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FeedbackResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FeedbackResponse {
    pub fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
            message: None,
        }
    }
}
