//! Errors reported by the remote service itself.

use serde::Deserialize;
use thiserror::Error;

/// The service answered, but not with success.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("service returned {status}: {message}")]
pub struct ServiceError {
    /// HTTP status code of the reply.
    pub status: u16,
    /// The service's own explanation, or the raw body if it sent none.
    pub message: String,
}

impl ServiceError {
    /// Build an error from a status code and a raw reply body.
    ///
    /// Bodies shaped like `{"error": "..."}` contribute just the message;
    /// anything else is kept verbatim.
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|body| body.error)
            .unwrap_or_else(|_| body.trim().to_string());
        Self { status, message }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_error_body() {
        let err = ServiceError::from_body(400, r#"{"error": "No hay más combinaciones"}"#);
        assert_eq!(err.status, 400);
        assert_eq!(err.message, "No hay más combinaciones");
        assert_eq!(
            err.to_string(),
            "service returned 400: No hay más combinaciones"
        );
    }

    #[test]
    fn test_from_plain_body() {
        let err = ServiceError::from_body(502, "  Bad Gateway\n");
        assert_eq!(err.message, "Bad Gateway");
    }
}
