//! Hostnames the forwarder is permitted to reach.

/// Hosts serving the spreadsheet script backend.
pub const SHEETS_HOSTS: [&str; 2] = ["script.google.com", "script.googleusercontent.com"];

/// Immutable set of permitted target hostnames.
///
/// This is the forwarder's only access control: any target whose host is
/// not listed is rejected before an outbound request is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    hosts: Vec<String>,
}

impl AllowList {
    /// Create an allow-list from arbitrary hostnames.
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|host| host.into().to_ascii_lowercase())
                .collect(),
        }
    }

    /// The compiled-in spreadsheet backend hosts.
    pub fn sheets() -> Self {
        Self::new(SHEETS_HOSTS)
    }

    /// Check whether a hostname is permitted.
    pub fn contains(&self, host: &str) -> bool {
        self.hosts
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(host))
    }

    /// The permitted hostnames.
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::sheets()
    }
}
