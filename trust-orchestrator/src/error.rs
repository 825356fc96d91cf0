use std::time::Duration;

use thiserror::Error;
use warp::http::StatusCode;
use warp::{reject::Reject, Rejection, Reply};

/// A user input fault, naming the offending field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn missing(field: &'static str) -> Self {
        Self {
            field,
            reason: format!("{} is required", field),
        }
    }

    pub fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Record {id} has trust tier {level} outside 0..=3")]
    InvalidTier { id: String, level: i32 },
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned status {0}")]
    Status(u16),

    #[error("Unsupported content type: {0}")]
    NotText(String),

    #[error("No text could be extracted")]
    Empty,

    #[error("Fetch timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Error, Debug)]
pub enum ClassificationError {
    #[error("Classifier unreachable: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Classifier returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unparseable classifier response: {0}")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM API key is not configured")]
    MissingApiKey,

    #[error("LLM request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("LLM response had no choices")]
    EmptyResponse,
}

/// Fatal outcomes of assembling a context bundle.
#[derive(Error, Debug)]
pub enum ContextError {
    #[error("Trusted document {id} has no captured content")]
    MissingContent { id: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ContextError {
    pub fn kind(&self) -> &'static str {
        match self {
            ContextError::MissingContent { .. } => "missing_content",
            ContextError::Store(_) => "store",
        }
    }
}

#[derive(Error, Debug)]
pub enum VerificationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Classification(#[from] ClassificationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl Reject for ApiError {}

pub fn reject(err: impl Into<ApiError>) -> Rejection {
    warp::reject::custom(err.into())
}

impl ApiError {
    fn status_and_body(&self) -> (StatusCode, serde_json::Value) {
        match self {
            ApiError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": e.reason, "field": e.field }),
            ),
            ApiError::Verification(VerificationError::Validation(e)) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": e.reason, "field": e.field }),
            ),
            ApiError::Context(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({
                    "error": "Context unavailable",
                    "kind": e.kind(),
                    "details": e.to_string(),
                }),
            ),
            ApiError::Verification(VerificationError::Classification(e)) => (
                StatusCode::BAD_GATEWAY,
                serde_json::json!({ "error": "Failed to process AI verification", "details": e.to_string() }),
            ),
            ApiError::Verification(VerificationError::Store(e)) | ApiError::Store(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": "Storage failure", "details": e.to_string() }),
            ),
            ApiError::Fetch(e) => (
                StatusCode::BAD_GATEWAY,
                serde_json::json!({ "error": "Error extracting content", "details": e.to_string() }),
            ),
            ApiError::Llm(e) => (
                StatusCode::BAD_GATEWAY,
                serde_json::json!({ "error": "Error processing request", "details": e.to_string() }),
            ),
            ApiError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                serde_json::json!({ "error": "Document not found", "details": what }),
            ),
        }
    }
}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(api_err) = err.find::<ApiError>() {
        let (code, body) = api_err.status_and_body();
        if code.is_server_error() {
            tracing::error!(status = code.as_u16(), error = %api_err, "Request failed");
        } else {
            tracing::info!(status = code.as_u16(), error = %api_err, "Request rejected");
        }
        Ok(warp::reply::with_status(warp::reply::json(&body), code))
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        let body = serde_json::json!({ "error": "Bad request", "details": e.to_string() });
        Ok(warp::reply::with_status(warp::reply::json(&body), StatusCode::BAD_REQUEST))
    } else {
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_content_has_its_own_kind() {
        let err = ContextError::MissingContent { id: "docB".to_string() };
        assert_eq!(err.kind(), "missing_content");
        assert!(err.to_string().contains("docB"));
    }

    #[test]
    fn validation_errors_map_to_bad_request() {
        let (code, body) = ApiError::from(ValidationError::missing("prompt")).status_and_body();
        assert_eq!(code, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "prompt");
    }

    #[test]
    fn context_errors_report_generic_message_and_kind() {
        let err = ApiError::from(ContextError::MissingContent { id: "x".to_string() });
        let (code, body) = err.status_and_body();
        assert_eq!(code, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Context unavailable");
        assert_eq!(body["kind"], "missing_content");
    }
}
