//! Inbound HTTP request as handed to the forwarder by the hosting runtime.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// HTTP method enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    /// Any verb not named above, kept verbatim.
    Other(String),
}

impl Method {
    /// Parse a method name. Known verbs match case-insensitively.
    pub fn parse(method: &str) -> Self {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            "PATCH" => Method::Patch,
            "HEAD" => Method::Head,
            "OPTIONS" => Method::Options,
            _ => Method::Other(method.to_string()),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
            Method::Patch => write!(f, "PATCH"),
            Method::Head => write!(f, "HEAD"),
            Method::Options => write!(f, "OPTIONS"),
            Method::Other(other) => write!(f, "{}", other),
        }
    }
}

impl From<&hyper::Method> for Method {
    fn from(method: &hyper::Method) -> Self {
        Method::parse(method.as_str())
    }
}

/// An inbound request, created once per invocation and read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundRequest {
    /// HTTP method.
    pub method: Method,
    /// Request path (informational only).
    pub path: String,
    /// Decoded query parameters.
    pub query: HashMap<String, String>,
    /// HTTP headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Bytes>,
    /// Whether `body` holds base64 text rather than the raw payload.
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl InboundRequest {
    /// Create a new request with no parameters, headers or body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: HashMap::new(),
            headers: HashMap::new(),
            body: None,
            is_base64_encoded: false,
        }
    }

    /// Replace the query parameters with those decoded from a raw query string.
    ///
    /// When a key repeats, the first occurrence wins.
    pub fn with_query_string(mut self, raw: &str) -> Self {
        self.query = Self::from_query_string(raw);
        self
    }

    /// Decode an `application/x-www-form-urlencoded` query string.
    pub fn from_query_string(raw: &str) -> HashMap<String, String> {
        let mut query = HashMap::new();
        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            query
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
        query
    }

    /// Add a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set a raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self.is_base64_encoded = false;
        self
    }

    /// Set a body that carries base64 text to be decoded before forwarding.
    pub fn base64_body(mut self, encoded: impl Into<Bytes>) -> Self {
        self.body = Some(encoded.into());
        self.is_base64_encoded = true;
        self
    }

    /// Get a query parameter, treating empty values as absent.
    pub fn get_query(&self, key: &str) -> Option<&str> {
        self.query
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Get a header value, matching the name case-insensitively.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }
}

impl Default for InboundRequest {
    fn default() -> Self {
        Self::new(Method::Get, "/")
    }
}
