//! # dnspin
//!
//! Pin hostnames in the system hosts file to the addresses reported by
//! explicitly chosen DNS servers.
//!
//! dnspin periodically queries one A record per configured host against
//! that host's own DNS server, bypassing the system resolver, and keeps a
//! sentinel-delimited block of `/etc/hosts` in sync with the answers.
//! Everything outside the block is preserved byte-for-byte, so manual
//! entries and other tools' edits survive every rewrite.
//!
//! ## Quick start
//!
//! A config file lists one `hostname server` pair per line:
//!
//! ```text
//! # dnspin.conf
//! api.internal   10.0.0.53
//! db.internal    10.0.0.53
//! ```
//!
//! ```bash
//! sudo dnspin --config dnspin.conf
//! ```
//!
//! The managed block in `/etc/hosts` looks like:
//!
//! ```text
//! ### DNSPIN BEGIN ###
//! 203.0.113.5	api.internal
//! 203.0.113.6	db.internal
//! ### DNSPIN END #####
//! ```
//!
//! ## Behavior
//!
//! - The file is rewritten only when the resolved addresses differ from
//!   what is already persisted; unchanged cycles never touch it.
//! - Rewrites go through a temp file in the same directory and an atomic
//!   rename, so concurrent readers (the OS resolver included) never see a
//!   partial file.
//! - A failed lookup keeps the previously persisted address, annotated
//!   with a comment; a server that authoritatively has no record removes
//!   the pin for that host.
//! - The previously written state is re-read from the file each cycle, so
//!   restarts are safe.
//!
//! ## Permissions
//!
//! Writing `/etc/hosts` requires root. The caller is responsible for
//! privilege elevation.
//!
//! **Note:** run at most one dnspin instance per target file. No lock is
//! taken; atomic rename only protects readers, not competing writers.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod daemon;
pub mod error;
pub mod hosts_file;
pub mod lookup;
pub mod writer;

pub use config::{HostEntry, ResolutionResult, load_host_config};
pub use daemon::Settings;
pub use error::{DnspinError, Result};
pub use hosts_file::{MANAGED_BEGIN, MANAGED_END, MergeOutcome, Regions, merge};
