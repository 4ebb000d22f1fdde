//! Resolver configuration (spec.md §6): exactly the keys the public API
//! accepts, plus root hints and trust anchors. The teacher crate never had
//! configuration beyond `CliOptions` (and that only drove the CLI, not the
//! library); this module generalizes that plain-struct-with-`Default`-impl
//! shape into the dependency-injected config spec.md §9's "Global module
//! state" note asks for: every `Resolver` takes one of these by value
//! instead of reaching for a process-wide static.
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::cache::DEFAULT_MAX_SIZE;
use crate::name::Name;
use crate::rdata::Ds;

/// One root server hint: advertised name plus its well-known addresses.
#[derive(Debug, Clone)]
pub struct RootHint {
    pub name: Name,
    pub ipv4: Option<Ipv4Addr>,
    pub ipv6: Option<Ipv6Addr>,
}

impl RootHint {
    pub fn new(name: &str, ipv4: Option<&str>, ipv6: Option<&str>) -> Self {
        RootHint {
            name: Name::parse(name).expect("builtin root hint name is valid"),
            ipv4: ipv4.map(|s| s.parse().expect("builtin root hint IPv4 is valid")),
            ipv6: ipv6.map(|s| s.parse().expect("builtin root hint IPv6 is valid")),
        }
    }
}

/// Resolver configuration: the keys spec.md §6 lists, nothing more.
#[derive(Debug, Clone)]
pub struct Config {
    pub inet6: bool,
    pub tcp: bool,
    pub edns: bool,
    pub dnssec: bool,
    pub minimize: bool,
    pub max_referrals: u32,
    pub max_retries: u32,
    pub timeout_ms: u32,
    pub cache_size: u64,
    pub hints: Vec<RootHint>,
    pub anchors: Vec<Ds>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            inet6: false,
            tcp: false,
            edns: true,
            dnssec: false,
            minimize: false,
            max_referrals: 30,
            max_retries: 5,
            timeout_ms: 2000,
            cache_size: DEFAULT_MAX_SIZE,
            hints: root_hints(),
            anchors: Vec::new(),
        }
    }
}

impl Config {
    /// A config with DNSSEC validation turned on against the currently
    /// published root zone KSK. Spec.md §8 scenario 4 names "the published
    /// root KSK 2010" as the illustrative anchor; KSK-2010 was retired by
    /// the 2018 root-zone rollover, so this uses its successor, KSK-2017
    /// (see DESIGN.md Open Questions).
    pub fn with_dnssec() -> Self {
        Config {
            dnssec: true,
            anchors: root_trust_anchors(),
            ..Config::default()
        }
    }
}

/// IANA-published root server addresses (as of the 2024 root hints file).
pub fn root_hints() -> Vec<RootHint> {
    vec![
        RootHint::new("a.root-servers.net.", Some("198.41.0.4"), Some("2001:503:ba3e::2:30")),
        RootHint::new("b.root-servers.net.", Some("199.9.14.201"), Some("2001:500:200::b")),
        RootHint::new("c.root-servers.net.", Some("192.33.4.12"), Some("2001:500:2::c")),
        RootHint::new("d.root-servers.net.", Some("199.7.91.13"), Some("2001:500:2d::d")),
        RootHint::new("e.root-servers.net.", Some("192.203.230.10"), Some("2001:500:a8::e")),
        RootHint::new("f.root-servers.net.", Some("192.5.5.241"), Some("2001:500:2f::f")),
        RootHint::new("g.root-servers.net.", Some("192.112.36.4"), Some("2001:500:12::d0d")),
        RootHint::new("h.root-servers.net.", Some("198.97.190.53"), Some("2001:500:1::53")),
        RootHint::new("i.root-servers.net.", Some("192.36.148.17"), Some("2001:7fe::53")),
        RootHint::new("j.root-servers.net.", Some("192.58.128.30"), Some("2001:503:c27::2:30")),
        RootHint::new("k.root-servers.net.", Some("193.0.14.129"), Some("2001:7fd::1")),
        RootHint::new("l.root-servers.net.", Some("199.7.83.42"), Some("2001:500:9f::42")),
        RootHint::new("m.root-servers.net.", Some("202.12.27.33"), Some("2001:dc3::35")),
    ]
}

/// The root zone's published KSK-2017 DS record (RFC 8624 algorithm 8 /
/// RSASHA256, digest type 2 / SHA-256), the anchor in production use today.
pub fn root_trust_anchors() -> Vec<Ds> {
    vec![Ds {
        key_tag: 20326,
        algorithm: 8,
        digest_type: 2,
        digest: hex_digest(
            "E06D44B80B8F1D39A95C0B0D7C65D08458E880409BBC683457104237C7F8EC8",
        ),
    }]
}

fn hex_digest(s: &str) -> Vec<u8> {
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).expect("builtin trust anchor digest is valid hex"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_conservative_limits() {
        let cfg = Config::default();
        assert_eq!(cfg.max_referrals, 30);
        assert_eq!(cfg.max_retries, 5);
        assert!(!cfg.dnssec);
        assert_eq!(cfg.hints.len(), 13);
    }

    #[test]
    fn dnssec_config_carries_root_anchor() {
        let cfg = Config::with_dnssec();
        assert!(cfg.dnssec);
        assert_eq!(cfg.anchors.len(), 1);
        assert_eq!(cfg.anchors[0].key_tag, 20326);
        assert_eq!(cfg.anchors[0].digest.len(), 32);
    }
}
