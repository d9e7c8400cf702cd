//! The delegation tracer (spec §4.5): a restricted walker whose query type
//! is fixed to NS and whose success criterion is an NS record — in either
//! the Answer or Authority section — whose owner equals the query fqdn.
//! Returns the ordered path of every hop taken, not only the last.
use std::collections::HashSet;
use std::sync::Arc;

use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::constants::{ResolverConfig, MAX_ITERATIONS};
use crate::error::{DNSError, ErrorKind};
use crate::executor::execute;
use crate::request::{Request, RequestOptions};
use crate::response::{Outcome, Response};
use crate::transport::Transport;
use crate::wire::{Name, QClass, QType, RData};

/// The ordered hop path a [`Tracer::resolve`] call took, plus a terminal
/// error when the trace did not reach a delegation answer.
#[derive(Debug, Clone)]
pub struct DelegationResult {
    pub path: Vec<Response>,
    pub error: Option<DNSError>,
}

/// One NS delegation: the parent server that answered, and the hostnames
/// it delegated to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delegation {
    pub parent_server: String,
    pub nameservers: Vec<String>,
}

#[derive(Clone)]
pub struct Tracer {
    transport: Arc<dyn Transport>,
    config: ResolverConfig,
}

impl Tracer {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Tracer::with_config(transport, ResolverConfig::default())
    }

    pub fn with_config(transport: Arc<dyn Transport>, config: ResolverConfig) -> Self {
        Tracer { transport, config }
    }

    /// Traces the NS delegation path for `name`, returning every hop taken.
    pub async fn resolve(&self, cancel: CancellationToken, name: Name) -> DelegationResult {
        let mut path = Vec::new();
        let mut candidates = self.config.root_servers();
        let mut tried: HashSet<String> = HashSet::new();
        let mut iteration: u32 = 0;
        let fqdn = name.fqdn();

        loop {
            if iteration > MAX_ITERATIONS {
                return DelegationResult {
                    path,
                    error: Some(DNSError::new(ErrorKind::MaxIterations, fqdn, QType::NS, QClass::IN)),
                };
            }

            let available: Vec<&String> = candidates.iter().filter(|c| !tried.contains(*c)).collect();
            if available.is_empty() {
                return DelegationResult {
                    path,
                    error: Some(DNSError::new(ErrorKind::NoMoreServers, fqdn, QType::NS, QClass::IN)),
                };
            }

            let server = {
                use rand::seq::SliceRandom;
                available.choose(&mut rand::thread_rng()).expect("non-empty available set").to_string()
            };
            tried.insert(server.clone());

            let request = Request::new(&server, fqdn.clone(), QType::NS, RequestOptions::new());
            let mut exec_stream = execute(self.transport.clone(), request.clone());

            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    let error = DNSError::new(ErrorKind::Cancelled, fqdn.clone(), QType::NS, request.qclass)
                        .with_addr(&request.addr);
                    return DelegationResult { path, error: Some(error) };
                }
                response = exec_stream.next() => response,
            };

            let response = match response {
                Some(response) => response,
                None => {
                    let error = DNSError::new(ErrorKind::TransportOther, fqdn.clone(), QType::NS, request.qclass)
                        .with_addr(&request.addr)
                        .with_message("executor produced no result");
                    return DelegationResult { path, error: Some(error) };
                }
            };

            match &response.outcome {
                Outcome::Error(error) if error.is_soft() => {
                    // soft failure at any hop (first or later) is retried with
                    // another server in the current candidate set.
                    continue;
                }
                Outcome::Error(error) if error.is_name_error() => {
                    let error = error.clone();
                    path.push(response);
                    return DelegationResult { path, error: Some(error) };
                }
                Outcome::Error(_) => {
                    let error = response.error_ref().cloned();
                    path.push(response);
                    return DelegationResult { path, error };
                }
                Outcome::Success { message, .. } => {
                    let delegation_hit = message
                        .answers
                        .iter()
                        .chain(message.authorities.iter())
                        .any(|rr| rr.name.fqdn() == fqdn && matches!(rr.rdata, RData::Ns(_)));

                    if delegation_hit {
                        path.push(response);
                        return DelegationResult { path, error: None };
                    }

                    let mut next_candidates: Vec<String> = message
                        .authorities
                        .iter()
                        .filter(|rr| matches!(rr.rdata, RData::Ns(_)))
                        .filter(|rr| rr.name.is_suffix_of(&name))
                        .filter_map(|rr| match &rr.rdata {
                            RData::Ns(target) => Some(target.fqdn()),
                            _ => None,
                        })
                        .filter(|host| !tried.contains(host))
                        .collect();
                    next_candidates.sort();
                    next_candidates.dedup();

                    path.push(response);

                    if next_candidates.is_empty() {
                        return DelegationResult {
                            path,
                            error: Some(DNSError::new(ErrorKind::NoMoreServers, fqdn, QType::NS, QClass::IN)),
                        };
                    }

                    candidates = next_candidates;
                    iteration += 1;
                }
            }
        }
    }
}

/// Reads a finished trace's `path` into `(parent-server-host, [NS
/// hostnames])`. `Tracer::resolve` only ever terminates a path on a hop
/// whose Answer or Authority section already carries the matching NS
/// records (that is its success criterion), so the terminating hop itself
/// — the last element of `path` — is where this reads from; on the root
/// name, that naturally falls in the Answer section, elsewhere typically
/// Authority.
pub fn delegation_from_path(path: &[Response], queried_name: &Name) -> Option<Delegation> {
    let hop = path.last()?;
    let message = hop.message()?;
    let fqdn = queried_name.fqdn();

    let nameservers: Vec<String> = message
        .answers
        .iter()
        .chain(message.authorities.iter())
        .filter(|rr| rr.name.fqdn() == fqdn)
        .filter_map(|rr| match &rr.rdata {
            RData::Ns(target) => Some(target.fqdn()),
            _ => None,
        })
        .collect();

    if nameservers.is_empty() {
        return None;
    }

    Some(Delegation {
        parent_server: hop.addr().to_string(),
        nameservers,
    })
}
