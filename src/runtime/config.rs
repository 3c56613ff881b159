//! Local server configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the local proxy server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Path the function is mounted at; sub-paths route to it too.
    pub function_path: String,
    /// Whether to serve `/_health`.
    pub enable_health: bool,
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
    /// Upstream request timeout in seconds. `None` keeps transport defaults.
    pub upstream_timeout: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8888,
            function_path: "/sheets-proxy".to_string(),
            enable_health: true,
            max_body_size: 10 * 1024 * 1024, // 10MB
            upstream_timeout: None,
        }
    }
}

impl ServerConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host address.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the function mount path. A leading slash is added and a trailing
    /// one removed.
    pub fn function_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        let trimmed = path.trim_matches('/');
        self.function_path = format!("/{}", trimmed);
        self
    }

    /// Enable or disable the health endpoint.
    pub fn enable_health(mut self, enabled: bool) -> Self {
        self.enable_health = enabled;
        self
    }

    /// Set the maximum request body size.
    pub fn max_body_size(mut self, bytes: usize) -> Self {
        self.max_body_size = bytes;
        self
    }

    /// Set the upstream timeout in seconds.
    pub fn upstream_timeout(mut self, seconds: Option<u64>) -> Self {
        self.upstream_timeout = seconds;
        self
    }

    /// Upstream timeout as a duration.
    pub fn upstream_timeout_duration(&self) -> Option<Duration> {
        self.upstream_timeout.map(Duration::from_secs)
    }

    /// Get the bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether a request path is served by the function.
    pub fn routes_to_function(&self, path: &str) -> bool {
        if self.function_path == "/" {
            return true;
        }
        match path.strip_prefix(self.function_path.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}
