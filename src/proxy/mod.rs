//! Request forwarding to the spreadsheet backend.

pub mod allow_list;
pub mod error;
pub mod forwarder;
pub mod outbound;
pub mod target;
pub mod upstream;
pub mod validate;

pub use allow_list::{AllowList, SHEETS_HOSTS};
pub use error::ProxyError;
pub use forwarder::{map_response, Forwarder};
pub use outbound::OutboundRequest;
pub use target::{build_target_url, TargetDescriptor};
pub use upstream::{HttpUpstream, Upstream, UpstreamResponse};
pub use validate::{Admission, ForwardMethod, ValidatedRequest};
