//! The `Resolver` (spec §6): the library's top-level entry point, tying
//! together the transport, executor, fan-in, walker, tracer and convenience
//! lookups into one handle callers construct once and reuse.
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;

use crate::batch::RequestBatch;
use crate::constants::ResolverConfig;
use crate::delegation::{self, Delegation, DelegationResult, Tracer};
use crate::error::DNSError;
use crate::fanin::fan_in;
use crate::lookup;
use crate::request::{Request, RequestOptions};
use crate::response::Response;
use crate::transport::{Transport, UdpTcpTransport};
use crate::walker::Walker;
use crate::wire::{Name, QType};

/// The resolver's public library surface. Cloning is cheap: it only holds
/// an `Arc<dyn Transport>` and a `ResolverConfig`.
#[derive(Clone)]
pub struct Resolver {
    transport: Arc<dyn Transport>,
    config: ResolverConfig,
}

impl Resolver {
    /// A resolver backed by this crate's own UDP/TCP transport, with a
    /// default `ResolverConfig`.
    pub fn new() -> Self {
        Resolver::with_config(ResolverConfig::default())
    }

    /// A resolver backed by this crate's own UDP/TCP transport, built from
    /// `config` (its `timeout` is handed straight to the transport).
    pub fn with_config(config: ResolverConfig) -> Self {
        Resolver {
            transport: Arc::new(UdpTcpTransport::new(config.timeout)),
            config,
        }
    }

    /// A resolver backed by a caller-supplied transport (tests, mocks,
    /// alternative protocols), with a default `ResolverConfig`.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Resolver {
            transport,
            config: ResolverConfig::default(),
        }
    }

    /// A resolver backed by a caller-supplied transport and config.
    pub fn with_transport_and_config(transport: Arc<dyn Transport>, config: ResolverConfig) -> Self {
        Resolver { transport, config }
    }

    /// Single-shot: one request, one response, via the executor.
    pub fn resolve(&self, request: Request) -> ReceiverStream<Response> {
        crate::executor::execute(self.transport.clone(), request)
    }

    /// Issues `requests` concurrently and merges their results.
    pub fn fan_in(&self, cancel: CancellationToken, requests: Vec<Request>) -> ReceiverStream<Response> {
        fan_in(self.transport.clone(), cancel, requests)
    }

    /// Concurrently queries `addr`/`name` for each of `types`.
    pub fn resolve_types(
        &self,
        cancel: CancellationToken,
        addr: &str,
        name: &str,
        types: &[QType],
        options: RequestOptions,
    ) -> ReceiverStream<Response> {
        let batch = RequestBatch::new(options);
        let requests = batch.from_types(addr, name, types);
        self.fan_in(cancel, requests)
    }

    /// Concurrently queries `addr` for `qtype` across each of `names`.
    pub fn resolve_names(
        &self,
        cancel: CancellationToken,
        addr: &str,
        qtype: QType,
        names: &[&str],
        options: RequestOptions,
    ) -> ReceiverStream<Response> {
        let batch = RequestBatch::new(options);
        let requests = batch.from_names(addr, qtype, names);
        self.fan_in(cancel, requests)
    }

    /// A fresh iterative walker over this resolver's transport and config.
    pub fn iterator(&self) -> Walker {
        Walker::with_config(self.transport.clone(), self.config.clone())
    }

    /// A fresh delegation tracer over this resolver's transport and config.
    pub fn delegation_tracer(&self) -> Tracer {
        Tracer::with_config(self.transport.clone(), self.config.clone())
    }

    pub async fn lookup_ipv4(&self, cancel: CancellationToken, name: &str) -> Result<Vec<Ipv4Addr>, DNSError> {
        lookup::lookup_ipv4(self.transport.clone(), self.config.clone(), cancel, name).await
    }

    pub async fn lookup_ipv6(&self, cancel: CancellationToken, name: &str) -> Result<Vec<Ipv6Addr>, DNSError> {
        lookup::lookup_ipv6(self.transport.clone(), self.config.clone(), cancel, name).await
    }

    pub async fn lookup_ip(&self, cancel: CancellationToken, name: &str) -> Result<Vec<IpAddr>, DNSError> {
        lookup::lookup_ip(self.transport.clone(), self.config.clone(), cancel, name).await
    }

    pub async fn lookup_ns(&self, cancel: CancellationToken, name: &str) -> Result<Vec<String>, DNSError> {
        lookup::lookup_ns(self.transport.clone(), self.config.clone(), cancel, name).await
    }

    /// Traces the NS delegation path for `name` and reads the resulting
    /// parent-server/nameserver pair.
    pub async fn delegation(&self, cancel: CancellationToken, name: &str) -> DelegationResult {
        let parsed = Name::from(name);
        self.delegation_tracer().resolve(cancel, parsed).await
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads `(parent-server-host, [NS hostnames])` out of a finished
/// [`DelegationResult`]'s path.
pub fn delegation_of(result: &DelegationResult, queried_name: &str) -> Option<Delegation> {
    delegation::delegation_from_path(&result.path, &Name::from(queried_name))
}
