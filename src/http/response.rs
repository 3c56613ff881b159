//! Proxy HTTP response. Every response carries the CORS headers.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `Access-Control-Allow-Origin` value.
pub const CORS_ALLOW_ORIGIN: &str = "*";
/// `Access-Control-Allow-Headers` value.
pub const CORS_ALLOW_HEADERS: &str = "Content-Type";
/// `Access-Control-Allow-Methods` value.
pub const CORS_ALLOW_METHODS: &str = "GET,POST,OPTIONS";

/// HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCode(pub u16);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(200);
    pub const NO_CONTENT: StatusCode = StatusCode(204);
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    pub const METHOD_NOT_ALLOWED: StatusCode = StatusCode(405);
    pub const PAYLOAD_TOO_LARGE: StatusCode = StatusCode(413);
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);
    pub const BAD_GATEWAY: StatusCode = StatusCode(502);

    /// Check if the status code indicates success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }

    /// Check if the status code indicates a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0)
    }

    /// Check if the status code indicates a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.0)
    }
}

impl Default for StatusCode {
    fn default() -> Self {
        StatusCode::OK
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        StatusCode(code)
    }
}

impl From<StatusCode> for u16 {
    fn from(code: StatusCode) -> Self {
        code.0
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Response produced by the forwarder, either passed through from upstream
/// or synthesized locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// HTTP headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Bytes>,
}

impl ProxyResponse {
    /// Create a response with the given status and the CORS headers.
    pub fn new(status: impl Into<StatusCode>) -> Self {
        let headers = HashMap::from([
            (
                "Access-Control-Allow-Origin".to_string(),
                CORS_ALLOW_ORIGIN.to_string(),
            ),
            (
                "Access-Control-Allow-Headers".to_string(),
                CORS_ALLOW_HEADERS.to_string(),
            ),
            (
                "Access-Control-Allow-Methods".to_string(),
                CORS_ALLOW_METHODS.to_string(),
            ),
        ]);
        Self {
            status: status.into(),
            headers,
            body: None,
        }
    }

    /// Empty 204 answer to a CORS preflight.
    pub fn preflight() -> Self {
        Self::new(StatusCode::NO_CONTENT)
    }

    /// Create a plain-text response.
    pub fn plain(status: impl Into<StatusCode>, message: impl Into<String>) -> Self {
        Self::new(status)
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(message.into())
    }

    /// Add a header to the response.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the response body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Get a header value, matching the name case-insensitively.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    /// Get the body as text if present.
    pub fn text_body(&self) -> Option<String> {
        self.body
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).to_string())
    }
}
