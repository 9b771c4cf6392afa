//! Hosts-file merge engine.
//!
//! The target file is split into three regions by two sentinel lines. Only
//! the lines between the sentinels belong to dnspin; everything before and
//! after is opaque and preserved verbatim. The previously written mappings
//! are re-parsed from the managed region every cycle — the file, not
//! process memory, is the source of "what was written last time", so a
//! restart changes nothing.

use crate::config::{HostEntry, ResolutionResult};
use std::collections::HashMap;

/// First line of the managed region, matched by full-line equality.
pub const MANAGED_BEGIN: &str = "### DNSPIN BEGIN ###";

/// Last line of the managed region, matched by full-line equality.
pub const MANAGED_END: &str = "### DNSPIN END #####";

/// Scanner position relative to the sentinel lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Location {
    Pre,
    In,
    Post,
}

/// The target file split into its three regions.
///
/// `pre` and `post` are opaque line sequences owned by whoever else edits
/// the file; `managed` is everything between the sentinels, including
/// annotation comments written by a previous cycle. The sentinel lines
/// themselves are not stored. A file without sentinels parses into `pre`
/// only, and rendering it appends a fresh managed region at the end.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Regions {
    pub pre: Vec<String>,
    pub managed: Vec<String>,
    pub post: Vec<String>,
}

impl Regions {
    /// Splits file content on the sentinel lines.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut regions = Self::default();
        let mut location = Location::Pre;

        for line in content.lines() {
            if line == MANAGED_BEGIN {
                location = Location::In;
            } else if line == MANAGED_END {
                location = Location::Post;
            } else {
                let region = match location {
                    Location::Pre => &mut regions.pre,
                    Location::In => &mut regions.managed,
                    Location::Post => &mut regions.post,
                };
                region.push(line.to_string());
            }
        }

        regions
    }

    /// Extracts the hostname→IP mappings persisted in the managed region.
    ///
    /// Annotation comments (`#`-first lines) and anything that is not
    /// exactly two fields are skipped. Mapping lines store the IP first,
    /// so `fields[1]` keys `fields[0]`.
    #[must_use]
    pub fn mappings(&self) -> HashMap<String, String> {
        let mut mappings = HashMap::new();
        for line in &self.managed {
            if line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if let [ip, hostname] = fields[..] {
                mappings.insert(hostname.to_string(), ip.to_string());
            }
        }
        mappings
    }
}

/// Result of a merge pass.
#[derive(Debug, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Persisted state already matches the resolved results; do not write.
    Unchanged,
    /// Replacement content for the whole file.
    Rewrite(String),
}

/// Merges this cycle's resolution results into the current file content.
///
/// Returns [`MergeOutcome::Unchanged`] when every host resolved to exactly
/// the address already persisted — the idempotence guarantee: an unchanged
/// cycle must not touch the file or its mtime.
#[must_use]
pub fn merge(current: &str, hosts: &[HostEntry]) -> MergeOutcome {
    let regions = Regions::parse(current);
    let persisted = regions.mappings();

    if !needs_rewrite(hosts, &persisted) {
        return MergeOutcome::Unchanged;
    }

    MergeOutcome::Rewrite(render(&regions, hosts, &persisted))
}

/// A rewrite is needed unless every host is `Resolved` to exactly its
/// persisted address and no stale mappings remain.
fn needs_rewrite(hosts: &[HostEntry], persisted: &HashMap<String, String>) -> bool {
    if persisted.len() != hosts.len() {
        return true;
    }
    hosts.iter().any(|host| match &host.last_result {
        ResolutionResult::Resolved(ip) => persisted.get(&host.hostname) != Some(ip),
        _ => true,
    })
}

/// Renders the replacement file: pre region, begin sentinel, one block per
/// host in configuration order, end sentinel, post region.
fn render(regions: &Regions, hosts: &[HostEntry], persisted: &HashMap<String, String>) -> String {
    let mut out = String::new();
    let mut push_line = |line: &str| {
        out.push_str(line);
        out.push('\n');
    };

    for line in &regions.pre {
        push_line(line);
    }

    push_line(MANAGED_BEGIN);

    for host in hosts {
        match &host.last_result {
            ResolutionResult::Resolved(ip) => {
                push_line(&format!("{ip}\t{}", host.hostname));
            }
            ResolutionResult::LookupFailed => {
                // Keep the last written address rather than dropping a
                // working pin over a transient failure.
                if let Some(cached) = persisted.get(&host.hostname) {
                    push_line(&format!(
                        "# {}: cached value, error during lookup to {}",
                        host.hostname, host.server
                    ));
                    push_line(&format!("{cached}\t{}", host.hostname));
                } else {
                    push_line(&format!(
                        "# {}: error during lookup to {}",
                        host.hostname, host.server
                    ));
                }
            }
            // An absent record must not leave a stale mapping behind.
            ResolutionResult::NoRecord | ResolutionResult::Unset => {}
        }
    }

    push_line(MANAGED_END);

    for line in &regions.post {
        push_line(line);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(hostname: &str, server: &str, ip: &str) -> HostEntry {
        let mut entry = HostEntry::new(hostname, server);
        entry.last_result = ResolutionResult::Resolved(ip.to_string());
        entry
    }

    fn with_result(hostname: &str, server: &str, result: ResolutionResult) -> HostEntry {
        let mut entry = HostEntry::new(hostname, server);
        entry.last_result = result;
        entry
    }

    const FILE_WITH_REGION: &str = "\
127.0.0.1\tlocalhost
### DNSPIN BEGIN ###
# api.internal: cached value, error during lookup to 10.0.0.53
203.0.113.5\tapi.internal
### DNSPIN END #####
255.255.255.255\tbroadcasthost
";

    #[test]
    fn parse_splits_three_regions() {
        let regions = Regions::parse(FILE_WITH_REGION);
        assert_eq!(regions.pre, vec!["127.0.0.1\tlocalhost"]);
        assert_eq!(
            regions.managed,
            vec![
                "# api.internal: cached value, error during lookup to 10.0.0.53",
                "203.0.113.5\tapi.internal",
            ]
        );
        assert_eq!(regions.post, vec!["255.255.255.255\tbroadcasthost"]);
    }

    #[test]
    fn parse_without_sentinels_is_all_pre() {
        let regions = Regions::parse("127.0.0.1\tlocalhost\n::1\tlocalhost\n");
        assert_eq!(regions.pre.len(), 2);
        assert!(regions.managed.is_empty());
        assert!(regions.post.is_empty());
    }

    #[test]
    fn sentinel_match_is_full_line_not_substring() {
        let content = "x ### DNSPIN BEGIN ### y\n### DNSPIN BEGIN ###\n1.2.3.4\ta\n### DNSPIN END #####\n";
        let regions = Regions::parse(content);
        assert_eq!(regions.pre, vec!["x ### DNSPIN BEGIN ### y"]);
        assert_eq!(regions.managed, vec!["1.2.3.4\ta"]);
    }

    #[test]
    fn mappings_skip_comments_and_odd_field_counts() {
        let regions = Regions::parse(FILE_WITH_REGION);
        let mappings = regions.mappings();
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings["api.internal"], "203.0.113.5");
    }

    #[test]
    fn merge_is_idempotent_when_state_matches() {
        let hosts = vec![resolved("api.internal", "10.0.0.53", "203.0.113.5")];
        assert_eq!(merge(FILE_WITH_REGION, &hosts), MergeOutcome::Unchanged);
    }

    #[test]
    fn merge_rewrites_on_changed_address() {
        let hosts = vec![resolved("api.internal", "10.0.0.53", "203.0.113.9")];
        match merge(FILE_WITH_REGION, &hosts) {
            MergeOutcome::Rewrite(content) => {
                assert!(content.contains("203.0.113.9\tapi.internal"));
                assert!(!content.contains("203.0.113.5"));
            }
            MergeOutcome::Unchanged => panic!("expected rewrite"),
        }
    }

    #[test]
    fn merge_rewrites_when_host_count_differs() {
        let hosts = vec![
            resolved("api.internal", "10.0.0.53", "203.0.113.5"),
            resolved("db.internal", "10.0.0.53", "203.0.113.6"),
        ];
        match merge(FILE_WITH_REGION, &hosts) {
            MergeOutcome::Rewrite(content) => {
                assert!(content.contains("203.0.113.5\tapi.internal"));
                assert!(content.contains("203.0.113.6\tdb.internal"));
            }
            MergeOutcome::Unchanged => panic!("expected rewrite"),
        }
    }

    #[test]
    fn merge_inserts_region_into_file_without_sentinels() {
        let hosts = vec![resolved("api.internal", "10.0.0.53", "203.0.113.5")];
        match merge("127.0.0.1\tlocalhost\n", &hosts) {
            MergeOutcome::Rewrite(content) => {
                assert_eq!(
                    content,
                    "127.0.0.1\tlocalhost\n\
                     ### DNSPIN BEGIN ###\n\
                     203.0.113.5\tapi.internal\n\
                     ### DNSPIN END #####\n"
                );
            }
            MergeOutcome::Unchanged => panic!("expected rewrite"),
        }
    }

    #[test]
    fn render_preserves_pre_and_post_verbatim() {
        let hosts = vec![resolved("api.internal", "10.0.0.53", "198.51.100.7")];
        match merge(FILE_WITH_REGION, &hosts) {
            MergeOutcome::Rewrite(content) => {
                assert!(content.starts_with("127.0.0.1\tlocalhost\n### DNSPIN BEGIN ###\n"));
                assert!(content.ends_with("### DNSPIN END #####\n255.255.255.255\tbroadcasthost\n"));
            }
            MergeOutcome::Unchanged => panic!("expected rewrite"),
        }
    }

    #[test]
    fn no_record_emits_nothing_even_with_prior_mapping() {
        let hosts = vec![with_result("api.internal", "10.0.0.53", ResolutionResult::NoRecord)];
        match merge(FILE_WITH_REGION, &hosts) {
            MergeOutcome::Rewrite(content) => {
                assert!(!content.contains("api.internal"));
            }
            MergeOutcome::Unchanged => panic!("expected rewrite"),
        }
    }

    #[test]
    fn lookup_failure_with_prior_keeps_cached_mapping() {
        let hosts = vec![with_result("api.internal", "10.0.0.53", ResolutionResult::LookupFailed)];
        match merge(FILE_WITH_REGION, &hosts) {
            MergeOutcome::Rewrite(content) => {
                assert!(content.contains(
                    "# api.internal: cached value, error during lookup to 10.0.0.53\n\
                     203.0.113.5\tapi.internal\n"
                ));
            }
            MergeOutcome::Unchanged => panic!("expected rewrite"),
        }
    }

    #[test]
    fn lookup_failure_without_prior_emits_comment_only() {
        let hosts = vec![with_result("api.internal", "10.0.0.53", ResolutionResult::LookupFailed)];
        match merge("", &hosts) {
            MergeOutcome::Rewrite(content) => {
                assert!(content.contains("# api.internal: error during lookup to 10.0.0.53\n"));
                assert!(!content.contains("\tapi.internal"));
            }
            MergeOutcome::Unchanged => panic!("expected rewrite"),
        }
    }

    #[test]
    fn render_preserves_configuration_order() {
        let hosts = vec![
            resolved("zeta.internal", "10.0.0.53", "10.1.0.1"),
            resolved("alpha.internal", "10.0.0.53", "10.1.0.2"),
        ];
        match merge("", &hosts) {
            MergeOutcome::Rewrite(content) => {
                let zeta = content.find("zeta.internal").unwrap();
                let alpha = content.find("alpha.internal").unwrap();
                assert!(zeta < alpha);
            }
            MergeOutcome::Unchanged => panic!("expected rewrite"),
        }
    }

    #[test]
    fn render_then_parse_round_trips_mappings() {
        let hosts = vec![
            resolved("api.internal", "10.0.0.53", "203.0.113.5"),
            resolved("db.internal", "10.0.0.54", "203.0.113.6"),
        ];
        let MergeOutcome::Rewrite(content) = merge("", &hosts) else {
            panic!("expected rewrite");
        };
        let mappings = Regions::parse(&content).mappings();
        assert_eq!(mappings.len(), 2);
        assert_eq!(mappings["api.internal"], "203.0.113.5");
        assert_eq!(mappings["db.internal"], "203.0.113.6");
    }

    #[test]
    fn stale_mapping_for_removed_host_forces_rewrite() {
        // File still pins api.internal but the config no longer lists it.
        let hosts = vec![resolved("db.internal", "10.0.0.54", "203.0.113.6")];
        match merge(FILE_WITH_REGION, &hosts) {
            MergeOutcome::Rewrite(content) => {
                assert!(!content.contains("api.internal"));
                assert!(content.contains("203.0.113.6\tdb.internal"));
            }
            MergeOutcome::Unchanged => panic!("expected rewrite"),
        }
    }

    #[test]
    fn empty_host_list_empties_populated_region() {
        match merge(FILE_WITH_REGION, &[]) {
            MergeOutcome::Rewrite(content) => {
                assert!(content.contains("### DNSPIN BEGIN ###\n### DNSPIN END #####\n"));
                assert!(!content.contains("api.internal"));
            }
            MergeOutcome::Unchanged => panic!("expected rewrite"),
        }
    }

    #[test]
    fn empty_host_list_against_empty_region_is_unchanged() {
        let content = "### DNSPIN BEGIN ###\n### DNSPIN END #####\n";
        assert_eq!(merge(content, &[]), MergeOutcome::Unchanged);
    }
}
