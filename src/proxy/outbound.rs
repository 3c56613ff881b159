//! Outbound request assembly.

use crate::proxy::target::TargetDescriptor;
use crate::proxy::validate::{ForwardMethod, ValidatedRequest};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use bytes::Bytes;
use url::Url;

/// Content-Type sent upstream when a POST carries none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Standard alphabet, padding optional, stray trailing bits ignored.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode base64 the way platform runtimes do: URL-safe characters are
/// accepted, anything outside the alphabet is skipped, decoding stops at
/// the first `=`, and a dangling sixth-bit group is dropped.
pub fn decode_base64_lenient(encoded: &[u8]) -> Bytes {
    let mut symbols: Vec<u8> = encoded
        .iter()
        .take_while(|&&b| b != b'=')
        .filter_map(|&b| match b {
            b'-' => Some(b'+'),
            b'_' => Some(b'/'),
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'+' | b'/' => Some(b),
            _ => None,
        })
        .collect();
    if symbols.len() % 4 == 1 {
        symbols.pop();
    }
    LENIENT
        .decode(&symbols)
        .map(Bytes::from)
        .unwrap_or_default()
}

/// The request sent to the upstream. Only the method, one Content-Type
/// header and the body are forwarded; cookies and credentials never are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: ForwardMethod,
    pub url: Url,
    /// Set for POST only.
    pub content_type: Option<String>,
    /// Set for POST only, and only when the inbound body was non-empty.
    pub body: Option<Bytes>,
}

impl OutboundRequest {
    /// Build the outbound request for a validated inbound request and its target.
    pub fn assemble(request: &ValidatedRequest, target: TargetDescriptor) -> Self {
        match request.method {
            ForwardMethod::Get => Self {
                method: ForwardMethod::Get,
                url: target.url,
                content_type: None,
                body: None,
            },
            ForwardMethod::Post => {
                let content_type = request
                    .content_type
                    .clone()
                    .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

                let body = match &request.body {
                    Some(encoded) if request.is_base64_encoded => {
                        Some(decode_base64_lenient(encoded))
                    }
                    Some(raw) => Some(raw.clone()),
                    None => None,
                };

                Self {
                    method: ForwardMethod::Post,
                    url: target.url,
                    content_type: Some(content_type),
                    body,
                }
            }
        }
    }
}
