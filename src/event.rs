//! Serverless invocation envelope.
//!
//! Function platforms hand a handler a JSON event describing the HTTP request
//! and expect a JSON result describing the reply. These types map that
//! envelope onto [`InboundRequest`] and [`ProxyResponse`].

use crate::http::{InboundRequest, Method, ProxyResponse};
use crate::proxy::{Forwarder, Upstream};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Inbound invocation event.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEvent {
    pub http_method: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl From<FunctionEvent> for InboundRequest {
    fn from(event: FunctionEvent) -> Self {
        let path = if event.path.is_empty() {
            "/".to_string()
        } else {
            event.path
        };
        InboundRequest {
            method: Method::parse(&event.http_method),
            path,
            query: event.query_string_parameters.unwrap_or_default(),
            headers: event.headers,
            body: event.body.map(Bytes::from),
            is_base64_encoded: event.is_base64_encoded,
        }
    }
}

/// Invocation result returned to the platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResult {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl From<ProxyResponse> for FunctionResult {
    fn from(response: ProxyResponse) -> Self {
        let body = response.text_body().unwrap_or_default();
        FunctionResult {
            status_code: response.status.into(),
            headers: response.headers,
            body,
            is_base64_encoded: false,
        }
    }
}

/// Run a single invocation.
pub async fn invoke<U: Upstream>(forwarder: &Forwarder<U>, event: FunctionEvent) -> FunctionResult {
    forwarder.handle(event.into()).await.into()
}
