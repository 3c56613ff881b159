//! Upstream transport.
//!
//! The [`Upstream`] trait is the forwarder's single suspension point.
//! [`HttpUpstream`] is the production implementation; tests substitute a
//! recording fake to observe what would have been sent.

use crate::proxy::error::{ProxyError, Result};
use crate::proxy::outbound::OutboundRequest;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// A fully buffered upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    /// Status code as returned by the upstream, including 4xx/5xx.
    pub status: u16,
    /// Upstream Content-Type, if it sent one.
    pub content_type: Option<String>,
    /// Entire body, decoded as text.
    pub body: String,
}

impl UpstreamResponse {
    /// Create a response with no Content-Type.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
        }
    }

    /// Set the Content-Type.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Executes one outbound request.
///
/// Implementations report connection, DNS, timeout and body-read failures as
/// [`ProxyError::Transport`]. Upstream error statuses are not failures.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse>;
}

/// HTTP transport backed by a shared `reqwest` client.
///
/// Redirects are followed, as a browser `fetch` would; the backend answers
/// script `exec` calls with a redirect to a content host.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: Client,
}

impl HttpUpstream {
    /// Create a transport with the given overall request timeout.
    /// `None` leaves the client defaults in place.
    pub fn new(timeout: Option<Duration>) -> std::result::Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse> {
        debug!(method = %request.method, target = %request.url, "sending upstream request");

        let mut builder = self
            .client
            .request(request.method.as_reqwest(), request.url);
        if let Some(content_type) = request.content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(ProxyError::transport)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.map_err(ProxyError::transport)?;

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}
