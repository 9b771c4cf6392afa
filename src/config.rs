//! Host pin configuration.

use crate::error::{DnspinError, Result};
use std::fmt;
use std::path::Path;

/// Outcome of one lookup attempt for one host.
///
/// Produced fresh every cycle. The last known good address is never carried
/// here across cycles — it lives only in the target file, which is re-read
/// each cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionResult {
    /// No lookup has run yet (initial state after load).
    Unset,
    /// The server answered with at least one A record; this is the first.
    Resolved(String),
    /// The server was reached and has no A record for the name.
    NoRecord,
    /// The server could not be queried (network, timeout, protocol).
    LookupFailed,
}

impl fmt::Display for ResolutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str("unset"),
            Self::Resolved(ip) => f.write_str(ip),
            Self::NoRecord => f.write_str("no record"),
            Self::LookupFailed => f.write_str("lookup failed"),
        }
    }
}

/// One pinned hostname and the DNS server that answers for it.
///
/// # Example
///
/// ```
/// use dnspin::HostEntry;
///
/// let entry = HostEntry::new("api.internal", "10.0.0.53");
/// assert_eq!(entry.hostname, "api.internal");
/// assert_eq!(entry.server, "10.0.0.53");
/// ```
#[derive(Debug, Clone)]
pub struct HostEntry {
    /// Hostname to pin (e.g., `"api.internal"`).
    pub hostname: String,

    /// DNS server to query, hostname or IP. Port 53 is implied.
    pub server: String,

    /// Result of this cycle's lookup. Starts as
    /// [`ResolutionResult::Unset`].
    pub last_result: ResolutionResult,
}

impl HostEntry {
    /// Creates an entry with no lookup result yet.
    #[must_use]
    pub fn new(hostname: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            server: server.into(),
            last_result: ResolutionResult::Unset,
        }
    }
}

/// Loads the host configuration file.
///
/// Empty lines and lines starting with `#` are skipped. Every other line
/// must contain exactly two whitespace-separated fields: hostname, then DNS
/// server. The load is all-or-nothing; a malformed line fails it.
///
/// # Errors
///
/// Returns [`DnspinError::Io`] if the file cannot be read, or
/// [`DnspinError::Config`] with the 1-based line number and raw text of the
/// first malformed line.
pub fn load_host_config(path: &Path) -> Result<Vec<HostEntry>> {
    let content = std::fs::read_to_string(path)?;

    let mut hosts = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 2 {
            return Err(DnspinError::Config {
                line: idx + 1,
                text: line.to_string(),
            });
        }

        hosts.push(HostEntry::new(fields[0], fields[1]));
    }

    Ok(hosts)
}
