//! Local HTTP server hosting the forwarder.

use crate::http::{InboundRequest, Method, ProxyResponse, StatusCode};
use crate::proxy::{Forwarder, HttpUpstream, Upstream};
use crate::runtime::ServerConfig;
use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::header::{HeaderName, HeaderValue};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// HTTP server that mounts one forwarder at the configured function path.
pub struct ProxyServer<U = HttpUpstream> {
    /// Server configuration.
    config: ServerConfig,
    /// Shared forwarder.
    forwarder: Arc<Forwarder<U>>,
}

impl ProxyServer<HttpUpstream> {
    /// Create a server forwarding over HTTP to the spreadsheet backend.
    pub fn new(config: ServerConfig) -> Result<Self, reqwest::Error> {
        let forwarder = Forwarder::http(config.upstream_timeout_duration())?;
        Ok(Self::with_forwarder(config, forwarder))
    }
}

impl<U: Upstream + 'static> ProxyServer<U> {
    /// Create a server around an existing forwarder.
    pub fn with_forwarder(config: ServerConfig, forwarder: Forwarder<U>) -> Self {
        Self {
            config,
            forwarder: Arc::new(forwarder),
        }
    }

    /// Get the forwarder.
    pub fn forwarder(&self) -> Arc<Forwarder<U>> {
        self.forwarder.clone()
    }

    /// Bind the configured address and serve until the task is dropped.
    pub async fn run(self) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        self.serve(listener).await
    }

    /// Serve connections from an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        info!(
            "Sheets proxy listening on {} at {}",
            listener.local_addr()?,
            self.config.function_path
        );

        let config = Arc::new(self.config);
        let forwarder = self.forwarder;

        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let io = TokioIo::new(stream);

            let forwarder = forwarder.clone();
            let config = config.clone();

            tokio::task::spawn(async move {
                let service = service_fn(move |req| {
                    let forwarder = forwarder.clone();
                    let config = config.clone();
                    async move { handle_request(req, forwarder, config, remote_addr).await }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    error!("Error serving connection: {:?}", err);
                }
            });
        }
    }
}

/// Handle an incoming HTTP request.
async fn handle_request<U: Upstream>(
    req: Request<Incoming>,
    forwarder: Arc<Forwarder<U>>,
    config: Arc<ServerConfig>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let path = req.uri().path().to_string();
    let method = Method::from(req.method());
    let request_id = generate_request_id();

    let span = info_span!("request", %request_id, %method, %path);
    async move {
        debug!("Handling request from {}", remote_addr);

        if config.enable_health && path == "/_health" {
            return Ok(build_response(ProxyResponse::plain(StatusCode::OK, "OK")));
        }

        if !config.routes_to_function(&path) {
            return Ok(build_response(ProxyResponse::plain(
                StatusCode::NOT_FOUND,
                "Not Found",
            )));
        }

        let inbound = match convert_request(req, &config).await {
            Ok(inbound) => inbound,
            Err((status, message)) => {
                warn!(%status, "Failed to read request: {}", message);
                return Ok(build_response(ProxyResponse::plain(status, message)));
            }
        };

        let response = forwarder.handle(inbound).await;
        debug!(status = %response.status, "request complete");
        Ok(build_response(response))
    }
    .instrument(span)
    .await
}

/// Convert a hyper request into an [`InboundRequest`], buffering the body.
async fn convert_request(
    req: Request<Incoming>,
    config: &ServerConfig,
) -> Result<InboundRequest, (StatusCode, String)> {
    let method = Method::from(req.method());
    let path = req.uri().path().to_string();
    let query = req
        .uri()
        .query()
        .map(InboundRequest::from_query_string)
        .unwrap_or_default();

    let mut headers = HashMap::new();
    for (name, value) in req.headers() {
        if let Ok(v) = value.to_str() {
            headers.insert(name.as_str().to_string(), v.to_string());
        }
    }

    let body_bytes = match Limited::new(req.into_body(), config.max_body_size)
        .collect()
        .await
    {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<LengthLimitError>() => {
            return Err((
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body too large".to_string(),
            ));
        }
        Err(e) => {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("Failed to read request body: {}", e),
            ))
        }
    };

    Ok(InboundRequest {
        method,
        path,
        query,
        headers,
        body: (!body_bytes.is_empty()).then_some(body_bytes),
        is_base64_encoded: false,
    })
}

/// Build a hyper response from a [`ProxyResponse`].
fn build_response(proxy_response: ProxyResponse) -> Response<Full<Bytes>> {
    let status = hyper::StatusCode::from_u16(proxy_response.status.0).unwrap_or_else(|_| {
        warn!(
            "Invalid status code {}, falling back to 502 Bad Gateway",
            proxy_response.status.0
        );
        hyper::StatusCode::BAD_GATEWAY
    });

    let mut response = Response::new(Full::new(proxy_response.body.unwrap_or_default()));
    *response.status_mut() = status;

    for (name, value) in proxy_response.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(name), Ok(value)) => {
                response.headers_mut().insert(name, value);
            }
            _ => warn!("Skipping invalid response header '{}'", name),
        }
    }

    response
}

/// Generate a unique request ID.
fn generate_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("{:x}", timestamp)
}
