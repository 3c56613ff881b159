//! The request forwarder.
//!
//! A linear decision chain: preflight, method gate, parameter validation,
//! target validation, dispatch, response mapping. Each stage either produces
//! a response or falls through to the next.

use crate::http::{InboundRequest, ProxyResponse};
use crate::proxy::allow_list::AllowList;
use crate::proxy::error::Result;
use crate::proxy::outbound::{OutboundRequest, DEFAULT_CONTENT_TYPE};
use crate::proxy::target::build_target_url;
use crate::proxy::upstream::{HttpUpstream, Upstream, UpstreamResponse};
use crate::proxy::validate::{Admission, ValidatedRequest};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Forwards browser requests to an allow-listed upstream.
pub struct Forwarder<U> {
    upstream: U,
    allow: AllowList,
}

impl Forwarder<HttpUpstream> {
    /// Create a forwarder over HTTP for the spreadsheet backend hosts.
    pub fn http(timeout: Option<Duration>) -> std::result::Result<Self, reqwest::Error> {
        Ok(Self::new(HttpUpstream::new(timeout)?))
    }
}

impl<U: Upstream> Forwarder<U> {
    /// Create a forwarder restricted to the spreadsheet backend hosts.
    pub fn new(upstream: U) -> Self {
        Self::with_allow_list(upstream, AllowList::sheets())
    }

    /// Create a forwarder with a custom allow-list.
    pub fn with_allow_list(upstream: U, allow: AllowList) -> Self {
        Self { upstream, allow }
    }

    /// Handle one inbound request. Never fails: every error becomes a
    /// response carrying the CORS headers.
    pub async fn handle(&self, request: InboundRequest) -> ProxyResponse {
        match self.forward(&request).await {
            Ok(response) => response,
            Err(err) => {
                if err.status().is_server_error() {
                    warn!(method = %request.method, error = %err, "upstream request failed");
                } else {
                    debug!(method = %request.method, status = %err.status(), error = %err, "request rejected");
                }
                err.into_response()
            }
        }
    }

    async fn forward(&self, request: &InboundRequest) -> Result<ProxyResponse> {
        let valid = match ValidatedRequest::parse(request)? {
            Admission::Preflight => return Ok(ProxyResponse::preflight()),
            Admission::Forward(valid) => valid,
        };

        let target = build_target_url(&valid.url, &valid.action, &self.allow)?;
        let outbound = OutboundRequest::assemble(&valid, target);
        let method = outbound.method;
        let url = outbound.url.clone();

        let upstream = self.upstream.send(outbound).await?;
        info!(%method, target = %url, status = upstream.status, "upstream responded");

        Ok(map_response(upstream))
    }
}

/// Pass an upstream response through: status and body unchanged, upstream
/// Content-Type or `application/json` when it sent none.
pub fn map_response(upstream: UpstreamResponse) -> ProxyResponse {
    let content_type = upstream
        .content_type
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
    ProxyResponse::new(upstream.status)
        .header("Content-Type", content_type)
        .body(upstream.body)
}
