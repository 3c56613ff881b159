//! Entry validation: preflight short-circuit, method gate and required
//! query parameters, performed once before any forwarding logic runs.

use crate::http::{InboundRequest, Method};
use crate::proxy::error::{ProxyError, Result};
use bytes::Bytes;

/// The two methods that are forwarded upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardMethod {
    Get,
    Post,
}

impl ForwardMethod {
    /// The equivalent `reqwest` method.
    pub fn as_reqwest(&self) -> reqwest::Method {
        match self {
            ForwardMethod::Get => reqwest::Method::GET,
            ForwardMethod::Post => reqwest::Method::POST,
        }
    }
}

impl std::fmt::Display for ForwardMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForwardMethod::Get => write!(f, "GET"),
            ForwardMethod::Post => write!(f, "POST"),
        }
    }
}

/// Outcome of admitting an inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// CORS preflight; answered locally.
    Preflight,
    /// A request to forward.
    Forward(ValidatedRequest),
}

/// An inbound request whose method and required parameters have been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub method: ForwardMethod,
    /// The `url` query parameter, not yet parsed.
    pub url: String,
    /// The `action` query parameter.
    pub action: String,
    /// Inbound Content-Type, if any.
    pub content_type: Option<String>,
    /// Inbound body; `None` when absent or empty.
    pub body: Option<Bytes>,
    pub is_base64_encoded: bool,
}

impl ValidatedRequest {
    /// Admit an inbound request or reject it.
    ///
    /// OPTIONS is admitted as a preflight regardless of parameters. Methods
    /// other than GET and POST fail with [`ProxyError::MethodNotAllowed`].
    /// Missing or empty `url`/`action` fail with [`ProxyError::Validation`].
    pub fn parse(request: &InboundRequest) -> Result<Admission> {
        let method = match request.method {
            Method::Options => return Ok(Admission::Preflight),
            Method::Get => ForwardMethod::Get,
            Method::Post => ForwardMethod::Post,
            _ => return Err(ProxyError::MethodNotAllowed),
        };

        let url = request.get_query("url");
        let action = request.get_query("action");
        let (url, action) = match (url, action) {
            (Some(url), Some(action)) => (url.to_string(), action.to_string()),
            (url, action) => {
                let missing: Vec<&str> = [("url", url), ("action", action)]
                    .into_iter()
                    .filter(|(_, value)| value.is_none())
                    .map(|(name, _)| name)
                    .collect();
                return Err(ProxyError::Validation(format!(
                    "Missing required query parameter(s): {}",
                    missing.join(", ")
                )));
            }
        };

        Ok(Admission::Forward(ValidatedRequest {
            method,
            url,
            action,
            content_type: request
                .get_header("content-type")
                .filter(|ct| !ct.is_empty())
                .map(str::to_string),
            body: request.body.clone().filter(|body| !body.is_empty()),
            is_base64_encoded: request.is_base64_encoded,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXEC: &str = "https://script.google.com/macros/s/ABC/exec";

    #[test]
    fn test_options_is_preflight_without_params() {
        let req = InboundRequest::new(Method::Options, "/");
        assert_eq!(ValidatedRequest::parse(&req).unwrap(), Admission::Preflight);
    }

    #[test]
    fn test_other_methods_rejected_before_params() {
        for method in [
            Method::Put,
            Method::Delete,
            Method::Patch,
            Method::Head,
            Method::Other("TRACE".to_string()),
        ] {
            let req = InboundRequest::new(method, "/")
                .query("url", EXEC)
                .query("action", "getData");
            assert_eq!(
                ValidatedRequest::parse(&req).unwrap_err(),
                ProxyError::MethodNotAllowed
            );
        }
    }

    #[test]
    fn test_missing_params_named() {
        let none = InboundRequest::new(Method::Get, "/");
        assert_eq!(
            ValidatedRequest::parse(&none).unwrap_err(),
            ProxyError::Validation("Missing required query parameter(s): url, action".into())
        );

        let no_action = InboundRequest::new(Method::Post, "/").query("url", EXEC);
        assert_eq!(
            ValidatedRequest::parse(&no_action).unwrap_err(),
            ProxyError::Validation("Missing required query parameter(s): action".into())
        );

        let empty_url = InboundRequest::new(Method::Get, "/")
            .query("url", "")
            .query("action", "getData");
        assert_eq!(
            ValidatedRequest::parse(&empty_url).unwrap_err(),
            ProxyError::Validation("Missing required query parameter(s): url".into())
        );
    }

    #[test]
    fn test_valid_post_captures_body_and_content_type() {
        let req = InboundRequest::new(Method::Post, "/")
            .query("url", EXEC)
            .query("action", "saveData")
            .header("Content-Type", "text/plain")
            .body("{\"a\":1}");
        let Admission::Forward(valid) = ValidatedRequest::parse(&req).unwrap() else {
            panic!("expected a forwardable request");
        };
        assert_eq!(valid.method, ForwardMethod::Post);
        assert_eq!(valid.url, EXEC);
        assert_eq!(valid.action, "saveData");
        assert_eq!(valid.content_type.as_deref(), Some("text/plain"));
        assert_eq!(valid.body, Some(Bytes::from_static(b"{\"a\":1}")));
        assert!(!valid.is_base64_encoded);
    }

    #[test]
    fn test_empty_content_type_is_absent() {
        let req = InboundRequest::new(Method::Post, "/")
            .query("url", EXEC)
            .query("action", "saveData")
            .header("content-type", "")
            .body("{}");
        let Admission::Forward(valid) = ValidatedRequest::parse(&req).unwrap() else {
            panic!("expected a forwardable request");
        };
        assert!(valid.content_type.is_none());
    }

    #[test]
    fn test_empty_body_is_absent() {
        let req = InboundRequest::new(Method::Post, "/")
            .query("url", EXEC)
            .query("action", "saveData")
            .body("");
        let Admission::Forward(valid) = ValidatedRequest::parse(&req).unwrap() else {
            panic!("expected a forwardable request");
        };
        assert!(valid.body.is_none());
    }
}
