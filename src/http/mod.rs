//! HTTP value types exchanged between the hosting runtime and the forwarder.

mod request;
mod response;

pub use request::{InboundRequest, Method};
pub use response::{
    ProxyResponse, StatusCode, CORS_ALLOW_HEADERS, CORS_ALLOW_METHODS, CORS_ALLOW_ORIGIN,
};
