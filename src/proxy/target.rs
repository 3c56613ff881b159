//! Target URL construction and host allow-listing.

use crate::proxy::allow_list::AllowList;
use crate::proxy::error::{ProxyError, Result};
use url::Url;

/// Message returned when the target host is not allow-listed.
pub const INVALID_HOST_MESSAGE: &str = "Invalid host for Sheets proxy";

/// A validated forwarding target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDescriptor {
    /// The `url` parameter exactly as received.
    pub raw: String,
    /// Hostname of the target, already checked against the allow-list.
    pub hostname: String,
    /// Outbound URL with the `action` parameter set.
    pub url: Url,
}

impl TargetDescriptor {
    /// The outbound URL as a string.
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

/// Parse `raw`, check its host against `allow`, and set `action` on the query.
///
/// An existing `action` pair is overwritten in place and later duplicates
/// are dropped; other pairs keep their order.
pub fn build_target_url(raw: &str, action: &str, allow: &AllowList) -> Result<TargetDescriptor> {
    let mut url =
        Url::parse(raw).map_err(|e| ProxyError::InvalidTarget(format!("Invalid URL: {}", e)))?;

    let hostname = match url.host_str() {
        Some(host) if allow.contains(host) => host.to_string(),
        _ => return Err(ProxyError::InvalidTarget(INVALID_HOST_MESSAGE.to_string())),
    };

    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    let mut replaced = false;
    pairs.retain_mut(|(key, value)| {
        if key.as_str() != "action" {
            return true;
        }
        if replaced {
            return false;
        }
        *value = action.to_string();
        replaced = true;
        true
    });
    if !replaced {
        pairs.push(("action".to_string(), action.to_string()));
    }
    url.query_pairs_mut().clear().extend_pairs(pairs);

    Ok(TargetDescriptor {
        raw: raw.to_string(),
        hostname,
        url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(raw: &str, action: &str) -> Result<TargetDescriptor> {
        build_target_url(raw, action, &AllowList::sheets())
    }

    #[test]
    fn test_appends_action() {
        let target = build("https://script.google.com/macros/s/ABC/exec", "getData").unwrap();
        assert_eq!(
            target.as_str(),
            "https://script.google.com/macros/s/ABC/exec?action=getData"
        );
        assert_eq!(target.hostname, "script.google.com");
        assert_eq!(target.raw, "https://script.google.com/macros/s/ABC/exec");
    }

    #[test]
    fn test_overwrites_existing_action_in_place() {
        let target = build(
            "https://script.googleusercontent.com/macros/echo?action=old&user=1&action=dup",
            "saveData",
        )
        .unwrap();
        assert_eq!(
            target.as_str(),
            "https://script.googleusercontent.com/macros/echo?action=saveData&user=1"
        );
    }

    #[test]
    fn test_keeps_other_params() {
        let target = build("https://script.google.com/exec?sheet=Main", "list").unwrap();
        assert_eq!(
            target.as_str(),
            "https://script.google.com/exec?sheet=Main&action=list"
        );
    }

    #[test]
    fn test_action_is_encoded() {
        let target = build("https://script.google.com/exec", "a&b=c").unwrap();
        assert_eq!(target.as_str(), "https://script.google.com/exec?action=a%26b%3Dc");
    }

    #[test]
    fn test_rejects_disallowed_host() {
        let err = build("https://evil.example.com/exec", "getData").unwrap_err();
        assert_eq!(err, ProxyError::InvalidTarget(INVALID_HOST_MESSAGE.to_string()));
    }

    #[test]
    fn test_rejects_lookalike_hosts() {
        assert!(build("https://script.google.com.evil.example/exec", "x").is_err());
        assert!(build("https://script.google.com@evil.example/exec", "x").is_err());
        assert!(build("https://google.com/exec", "x").is_err());
    }

    #[test]
    fn test_rejects_unparseable_url() {
        let err = build("not a url", "getData").unwrap_err();
        assert!(matches!(err, ProxyError::InvalidTarget(ref m) if m.starts_with("Invalid URL")));
        assert!(build("/relative/path", "getData").is_err());
    }

    #[test]
    fn test_rejects_hostless_url() {
        let err = build("data:text/plain,hello", "getData").unwrap_err();
        assert_eq!(err, ProxyError::InvalidTarget(INVALID_HOST_MESSAGE.to_string()));
    }

    #[test]
    fn test_hostname_is_case_normalized() {
        let target = build("https://SCRIPT.GOOGLE.COM/exec", "x").unwrap();
        assert_eq!(target.hostname, "script.google.com");
    }
}
