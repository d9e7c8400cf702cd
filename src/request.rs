//! A single DNS query request (spec §3, §6): target server, transport mode,
//! query name/type/class and the recursion-desired flag.
use std::fmt;

use crate::constants::DEFAULT_PORT;
use crate::wire::{Name, QClass, QType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportMode {
    Udp,
    Tcp,
}

impl Default for TransportMode {
    fn default() -> Self {
        TransportMode::Udp
    }
}

/// Options applied on top of `NewRequest`'s defaults (spec §6: `SetTCPMode`,
/// `SetCHAOSClass`, `SetRD`).
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestOptions {
    pub tcp_mode: bool,
    pub chaos_class: bool,
    pub recursion_desired: bool,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_tcp_mode(mut self) -> Self {
        self.tcp_mode = true;
        self
    }

    pub fn set_chaos_class(mut self) -> Self {
        self.chaos_class = true;
        self
    }

    pub fn set_rd(mut self, recurse: bool) -> Self {
        self.recursion_desired = recurse;
        self
    }
}

/// An immutable, cheaply-cloned DNS query request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub addr: String,
    pub mode: TransportMode,
    pub name: Name,
    pub qtype: QType,
    pub qclass: QClass,
    pub recursion_desired: bool,
}

impl Request {
    /// `addr` gets `:53` appended when it carries no port (spec §6 "Request
    /// address parsing"). `name` is canonicalised: lower-cased, fully
    /// qualified.
    pub fn new(addr: impl Into<String>, name: impl Into<String>, qtype: QType, options: RequestOptions) -> Self {
        let addr = normalize_addr(addr.into());
        let name = Name::from(name.into().as_str());

        Request {
            addr,
            mode: if options.tcp_mode { TransportMode::Tcp } else { TransportMode::Udp },
            name,
            qtype,
            qclass: if options.chaos_class { QClass::CHAOS } else { QClass::IN },
            recursion_desired: options.recursion_desired,
        }
    }
}

fn normalize_addr(addr: String) -> String {
    // IPv6 literals without brackets would be ambiguous with a port
    // separator; out of scope here since root/TLD servers are always given
    // as hostnames or bracketed/IPv4 literals upstream.
    if addr.rsplit(':').next().map(|p| p.parse::<u16>().is_ok()).unwrap_or(false) {
        addr
    } else {
        format!("{}:{}", addr, DEFAULT_PORT)
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} @{}", self.name.fqdn(), self.qtype, self.qclass, self.addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_default_port() {
        let req = Request::new("a.root-servers.net.", "example.com", QType::A, RequestOptions::new());
        assert_eq!(req.addr, "a.root-servers.net.:53");
    }

    #[test]
    fn keeps_explicit_port() {
        let req = Request::new("1.1.1.1:5353", "example.com", QType::A, RequestOptions::new());
        assert_eq!(req.addr, "1.1.1.1:5353");
    }

    #[test]
    fn name_canonicalisation_is_case_insensitive() {
        let a = Request::new("ns.example.", "EXAMPLE.com", QType::A, RequestOptions::new());
        let b = Request::new("ns.example.", "example.COM.", QType::A, RequestOptions::new());
        assert_eq!(a.name, b.name);
        assert_eq!(a, b);
    }

    #[test]
    fn options_set_tcp_chaos_and_rd() {
        let opts = RequestOptions::new().set_tcp_mode().set_chaos_class().set_rd(true);
        let req = Request::new("1.1.1.1", "version.bind", QType::TXT, opts);
        assert_eq!(req.mode, TransportMode::Tcp);
        assert_eq!(req.qclass, QClass::CHAOS);
        assert!(req.recursion_desired);
    }
}
