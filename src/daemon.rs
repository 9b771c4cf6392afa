//! The poll loop: resolve every host, merge, write, sleep, repeat.

use crate::config::HostEntry;
use crate::error::Result;
use crate::hosts_file::{self, MergeOutcome};
use crate::{lookup, writer};
use std::path::PathBuf;
use std::time::Duration;

/// Default seconds between cycles.
pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Process-wide settings, passed explicitly into the loop.
///
/// Exactly one dnspin instance may run against a given `hosts_path`; no
/// lock is taken, atomic rename is the only coordination with readers.
#[derive(Debug, Clone)]
pub struct Settings {
    /// The file to keep synchronized, normally `/etc/hosts`.
    pub hosts_path: PathBuf,

    /// Sleep between cycles.
    pub interval: Duration,
}

impl Settings {
    /// Creates settings with the default 5-second interval.
    #[must_use]
    pub fn new(hosts_path: impl Into<PathBuf>) -> Self {
        Self {
            hosts_path: hosts_path.into(),
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
        }
    }

    /// Overrides the poll interval.
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Runs one merge-and-write pass against the target file.
///
/// Reads the file, compares its managed region against this cycle's
/// resolution results, and rewrites it atomically only if they differ.
/// Returns whether a write occurred.
///
/// # Errors
///
/// Returns [`DnspinError::Io`](crate::DnspinError::Io) if the target file
/// cannot be read or the replacement cannot be written.
pub fn run_cycle(hosts: &[HostEntry], settings: &Settings) -> Result<bool> {
    let current = std::fs::read_to_string(&settings.hosts_path)?;

    match hosts_file::merge(&current, hosts) {
        MergeOutcome::Unchanged => Ok(false),
        MergeOutcome::Rewrite(content) => {
            writer::replace_file(&settings.hosts_path, &content)?;
            Ok(true)
        }
    }
}

/// Runs the daemon forever.
///
/// Each cycle resolves every host sequentially, logs the per-host outcome,
/// runs [`run_cycle`], and sleeps. Lookup and I/O failures are contained
/// within the cycle; nothing here terminates the loop.
pub async fn run(hosts: &mut [HostEntry], settings: &Settings) -> ! {
    loop {
        for host in hosts.iter_mut() {
            host.last_result = lookup::resolve_a(&host.hostname, &host.server).await;
            tracing::info!(
                host = %host.hostname,
                server = %host.server,
                result = %host.last_result,
                "Lookup complete"
            );
        }

        match run_cycle(hosts, settings) {
            Ok(true) => {
                tracing::info!(path = %settings.hosts_path.display(), "Hosts file updated");
            }
            Ok(false) => {
                tracing::debug!("No changes, hosts file not updated");
            }
            Err(e) => {
                tracing::warn!(
                    path = %settings.hosts_path.display(),
                    error = %e,
                    "Skipping this cycle's write"
                );
            }
        }

        tokio::time::sleep(settings.interval).await;
    }
}
