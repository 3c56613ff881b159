//! Error taxonomy for the forwarder.
//!
//! Every variant is converted to a CORS-bearing [`ProxyResponse`] at the
//! boundary of [`Forwarder::handle`](crate::proxy::Forwarder::handle); none
//! propagate further and none are retried.

use crate::http::{ProxyResponse, StatusCode};
use thiserror::Error;

/// Result type alias for forwarder operations.
pub type Result<T> = std::result::Result<T, ProxyError>;

/// Errors that can occur while forwarding a request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProxyError {
    /// A required query parameter is missing or the body is malformed.
    #[error("{0}")]
    Validation(String),

    /// The target URL is unparseable or its host is not allow-listed.
    #[error("{0}")]
    InvalidTarget(String),

    /// The inbound method is neither GET, POST nor OPTIONS.
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// The upstream could not be reached or its body could not be read.
    #[error("Upstream request failed: {0}")]
    Transport(String),
}

impl ProxyError {
    /// Create a transport error from any displayable failure.
    pub fn transport(err: impl std::fmt::Display) -> Self {
        ProxyError::Transport(err.to_string())
    }

    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Validation(_) | ProxyError::InvalidTarget(_) => StatusCode::BAD_REQUEST,
            ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Render the error as a plain-text proxy response.
    pub fn into_response(self) -> ProxyResponse {
        ProxyResponse::plain(self.status(), self.to_string())
    }
}

impl From<ProxyError> for ProxyResponse {
    fn from(err: ProxyError) -> Self {
        err.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ProxyError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ProxyError::InvalidTarget("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ProxyError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ProxyError::transport("refused").status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_transport_message() {
        let response: ProxyResponse = ProxyError::transport("connection refused").into();
        assert_eq!(response.status, StatusCode::BAD_GATEWAY);
        assert_eq!(
            response.text_body(),
            Some("Upstream request failed: connection refused".to_string())
        );
        assert_eq!(response.get_header("Access-Control-Allow-Origin"), Some("*"));
    }

    #[test]
    fn test_method_not_allowed_body() {
        let response = ProxyError::MethodNotAllowed.into_response();
        assert_eq!(response.text_body(), Some("Method Not Allowed".to_string()));
    }
}
