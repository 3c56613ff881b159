//! Local hosting runtime for the forwarder.

mod config;
mod server;

pub use config::ServerConfig;
pub use server::ProxyServer;
