//! Process-wide constants (spec §6).
use std::time::Duration;

/// Default DNS port, appended to a bare host with no explicit port.
pub const DEFAULT_PORT: &str = "53";

/// Bound on the walker's hop counter within one alias epoch.
pub const MAX_ITERATIONS: u32 = 16;

/// Bound on the walker's alias-chase depth.
pub const MAX_DEPTH: u32 = 16;

/// The nine IANA root server hostnames, consulted as the initial candidate
/// set of every fresh alias epoch, absent a [`ResolverConfig`] override.
pub const ROOT_SERVERS: [&str; 9] = [
    "a.root-servers.net.",
    "b.root-servers.net.",
    "c.root-servers.net.",
    "d.root-servers.net.",
    "e.root-servers.net.",
    "f.root-servers.net.",
    "g.root-servers.net.",
    "h.root-servers.net.",
    "i.root-servers.net.",
];

/// The built-in root server list, with no override applied.
pub fn root_servers() -> Vec<String> {
    ROOT_SERVERS.iter().map(|s| s.to_string()).collect()
}

/// Resolver-wide ambient configuration (spec §9's "Configuration"):
/// the per-request transport timeout and an optional root-server-list
/// override. Supplemental state, not a core data-model type — it only
/// parameterizes the transport and the walker/tracer's starting
/// candidate set, and is never mutated once built.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Per-exchange timeout handed to the transport.
    pub timeout: Duration,
    /// Overrides the built-in IANA root server list when set.
    pub root_servers: Option<Vec<String>>,
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// The candidate set a fresh walker/tracer epoch starts from: the
    /// override if one was configured, else the built-in root list.
    pub fn root_servers(&self) -> Vec<String> {
        self.root_servers.clone().unwrap_or_else(root_servers)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            timeout: Duration::from_secs(5),
            root_servers: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_falls_back_to_builtin_roots() {
        let config = ResolverConfig::default();
        assert_eq!(config.root_servers(), root_servers());
    }

    #[test]
    fn override_replaces_builtin_roots() {
        let config = ResolverConfig {
            root_servers: Some(vec!["ns1.test.".to_string()]),
            ..ResolverConfig::default()
        };
        assert_eq!(config.root_servers(), vec!["ns1.test.".to_string()]);
    }
}
