//! Error types.

use thiserror::Error;

/// Result alias for dnspin operations.
pub type Result<T> = std::result::Result<T, DnspinError>;

/// Errors returned by dnspin operations.
#[derive(Debug, Error)]
pub enum DnspinError {
    /// Filesystem I/O failed (typically `PermissionDenied` on the target
    /// hosts file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A host configuration line did not split into exactly two fields.
    #[error("malformed config line {line}: {text}")]
    Config {
        /// 1-based line number in the configuration file.
        line: usize,
        /// The raw offending line.
        text: String,
    },
}

impl DnspinError {
    /// Returns `true` if the underlying I/O error is `PermissionDenied`.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied)
    }
}
