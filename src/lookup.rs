//! Single A-record lookups against one explicit DNS server.
//!
//! Deliberately not a general resolver: one question, one record type, one
//! server, no retries. Retry policy is the poll interval, not this module.

use crate::config::ResolutionResult;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{
    NameServerConfig, NameServerConfigGroup, Protocol, ResolverConfig, ResolverOpts,
};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::proto::rr::{RData, RecordType};
use std::net::{SocketAddr, ToSocketAddrs};

/// Standard DNS port; the configured server string never carries a port.
const DNS_PORT: u16 = 53;

/// Resolves the configured server string (hostname or IP) to a socket
/// address via the system resolver.
fn server_addr(server: &str) -> std::io::Result<Option<SocketAddr>> {
    Ok((server, DNS_PORT).to_socket_addrs()?.next())
}

/// Queries `server` for the A record of `hostname` and classifies the
/// outcome.
///
/// - At least one A answer: [`ResolutionResult::Resolved`] with the first
///   address. Additional records are ignored; there is no rotation.
/// - Authoritative empty answer: [`ResolutionResult::NoRecord`].
/// - Anything else (unreachable server, timeout, protocol error):
///   [`ResolutionResult::LookupFailed`], with the error logged here.
pub async fn resolve_a(hostname: &str, server: &str) -> ResolutionResult {
    let addr = match server_addr(server) {
        Ok(Some(addr)) => addr,
        Ok(None) => {
            tracing::warn!(server = %server, "DNS server name resolved to no addresses");
            return ResolutionResult::LookupFailed;
        }
        Err(e) => {
            tracing::warn!(server = %server, error = %e, "Failed to resolve DNS server name");
            return ResolutionResult::LookupFailed;
        }
    };

    let group = NameServerConfigGroup::from(vec![NameServerConfig::new(addr, Protocol::Udp)]);
    let config = ResolverConfig::from_parts(None, vec![], group);

    let mut opts = ResolverOpts::default();
    // No retries inside a single lookup; the poll loop tries again anyway.
    opts.attempts = 0;
    // We rewrite the hosts file ourselves; consulting it would short-circuit
    // the very lookups this daemon exists to perform.
    opts.use_hosts_file = false;

    let resolver = TokioAsyncResolver::tokio(config, opts);

    match resolver.lookup(hostname, RecordType::A).await {
        Ok(lookup) => {
            let first = lookup.iter().find_map(|rdata| match rdata {
                RData::A(a) => Some(a.0),
                _ => None,
            });
            first.map_or(ResolutionResult::NoRecord, |ip| {
                ResolutionResult::Resolved(ip.to_string())
            })
        }
        Err(e) if matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. }) => {
            ResolutionResult::NoRecord
        }
        Err(e) => {
            tracing::warn!(host = %hostname, server = %server, error = %e, "Lookup failed");
            ResolutionResult::LookupFailed
        }
    }
}
