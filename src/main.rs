//! Sheets proxy command line: serve the forwarder locally or run a single
//! platform invocation from a JSON event.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sheets_proxy::prelude::*;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sheets-proxy")]
#[command(about = "CORS forwarder for a spreadsheet script backend", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the forwarder over HTTP
    Serve {
        /// Address to bind to
        #[arg(long, env = "SHEETS_PROXY_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "SHEETS_PROXY_PORT", default_value_t = 8888)]
        port: u16,

        /// Path the function is mounted at
        #[arg(long, env = "SHEETS_PROXY_PATH", default_value = "/sheets-proxy")]
        path: String,

        /// Upstream request timeout in seconds
        #[arg(long, env = "SHEETS_PROXY_UPSTREAM_TIMEOUT")]
        upstream_timeout: Option<u64>,

        /// Maximum inbound body size in bytes
        #[arg(long, env = "SHEETS_PROXY_MAX_BODY_SIZE", default_value_t = 10 * 1024 * 1024)]
        max_body_size: usize,

        /// Disable the /_health endpoint
        #[arg(long, env = "SHEETS_PROXY_NO_HEALTH")]
        no_health: bool,
    },

    /// Run one invocation from a JSON event and print the JSON result
    Invoke {
        /// Event file; reads stdin when omitted
        #[arg(short, long)]
        event: Option<PathBuf>,

        /// Upstream request timeout in seconds
        #[arg(long, env = "SHEETS_PROXY_UPSTREAM_TIMEOUT")]
        upstream_timeout: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Serve {
            host,
            port,
            path,
            upstream_timeout,
            max_body_size,
            no_health,
        } => {
            let config = ServerConfig::new()
                .host(host)
                .port(port)
                .function_path(path)
                .upstream_timeout(upstream_timeout)
                .max_body_size(max_body_size)
                .enable_health(!no_health);

            tracing::info!(
                bind = %config.bind_addr(),
                path = %config.function_path,
                "Starting sheets proxy"
            );

            let server = ProxyServer::new(config).context("failed to build HTTP client")?;

            tokio::select! {
                res = server.run() => {
                    res.context("server error")?;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown signal received");
                }
            }
            Ok(())
        }

        Commands::Invoke {
            event,
            upstream_timeout,
        } => {
            let raw = match event {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read event file {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("failed to read event from stdin")?;
                    buf
                }
            };
            let event: FunctionEvent =
                serde_json::from_str(&raw).context("event is not a valid invocation event")?;

            let timeout = upstream_timeout.map(std::time::Duration::from_secs);
            let forwarder = Forwarder::http(timeout).context("failed to build HTTP client")?;
            let result = invoke(&forwarder, event).await;

            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
    }
}

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
