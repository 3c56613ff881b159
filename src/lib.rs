//! # Sheets Proxy - CORS forwarder for a spreadsheet script backend
//!
//! A serverless-style function that relays browser GET/POST calls to a
//! spreadsheet-backed script deployment, reachable only through an
//! allow-listed pair of hostnames, and returns the backend's reply with the
//! CORS headers a browser needs to read it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   JSON event    ┌──────────────────────────────────────┐
//! │   Platform   │ ──────────────▶ │                                      │
//! │  invocation  │                 │              Forwarder               │
//! └──────────────┘                 │  preflight ─▶ method gate ─▶ params  │
//! ┌──────────────┐   HTTP request  │  ─▶ target allow-list ─▶ dispatch    │
//! │ ProxyServer  │ ──────────────▶ │  ─▶ response mapping (+ CORS)        │
//! │   (local)    │                 └──────────────────┬───────────────────┘
//! └──────────────┘                                    │ Upstream
//!                                                     ▼
//!                           script.google.com / script.googleusercontent.com
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sheets_proxy::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let forwarder = Forwarder::http(None)?;
//!
//!     let request = InboundRequest::new(Method::Get, "/")
//!         .query("url", "https://script.google.com/macros/s/ABC/exec")
//!         .query("action", "getData");
//!
//!     let response = forwarder.handle(request).await;
//!     println!("{} {:?}", response.status, response.text_body());
//!     Ok(())
//! }
//! ```
//!
//! ## Status codes
//!
//! | Condition                      | Status                 |
//! |--------------------------------|------------------------|
//! | OPTIONS preflight              | 204                    |
//! | method not GET/POST            | 405                    |
//! | missing `url` or `action`      | 400                    |
//! | invalid or disallowed target   | 400                    |
//! | transport failure              | 502                    |
//! | otherwise                      | upstream's, unchanged  |

pub mod event;
pub mod http;
pub mod proxy;
pub mod runtime;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::event::{invoke, FunctionEvent, FunctionResult};
    pub use crate::http::{InboundRequest, Method, ProxyResponse, StatusCode};
    pub use crate::proxy::{
        AllowList, Forwarder, HttpUpstream, OutboundRequest, ProxyError, Upstream,
        UpstreamResponse,
    };
    pub use crate::runtime::{ProxyServer, ServerConfig};
    pub use async_trait::async_trait;
}

// Re-export for convenience
pub use http::{InboundRequest, ProxyResponse};
pub use proxy::{Forwarder, ProxyError};
pub use runtime::{ProxyServer, ServerConfig};
