//! The iterative walker (spec §4.4): the hard core. Drives a non-recursive,
//! root-down delegation walk for one `(name, type)` pair, following NS
//! referrals and CNAME aliases, bounded by `MAX_ITERATIONS`/`MAX_DEPTH`, and
//! emitting every hop's `Response` lazily as a single, finite,
//! non-restartable stream.
use std::collections::HashSet;
use std::sync::Arc;

use async_stream::stream;
use rand::seq::SliceRandom;
use tokio_stream::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::constants::{ResolverConfig, MAX_DEPTH, MAX_ITERATIONS};
use crate::error::{DNSError, ErrorKind};
use crate::executor::execute;
use crate::request::{Request, RequestOptions};
use crate::response::{Outcome, Response};
use crate::transport::Transport;
use crate::wire::{Name, QClass, QType, RData};

/// Drives `Resolve` calls for a fixed transport. Cheap to clone: it only
/// holds the `Arc<dyn Transport>` the executor ultimately drives and the
/// `ResolverConfig` its starting candidate set is read from.
#[derive(Clone)]
pub struct Walker {
    transport: Arc<dyn Transport>,
    config: ResolverConfig,
}

impl Walker {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Walker::with_config(transport, ResolverConfig::default())
    }

    pub fn with_config(transport: Arc<dyn Transport>, config: ResolverConfig) -> Self {
        Walker { transport, config }
    }

    /// Resolves `name`/`qtype` from the roots down. The returned stream
    /// yields every hop's `Response`, in the exact order they occur, and
    /// closes after exactly one terminating emission.
    pub fn resolve(&self, cancel: CancellationToken, name: Name, qtype: QType) -> impl Stream<Item = Response> {
        let transport = self.transport.clone();
        let root_servers = self.config.root_servers();

        stream! {
            let mut current_name = name;
            let mut depth: u32 = 0;

            'epoch: loop {
                let mut candidates = root_servers.clone();
                let mut tried: HashSet<String> = HashSet::new();
                let mut iteration: u32 = 0;

                loop {
                    if depth > MAX_DEPTH {
                        yield terminal(&current_name, qtype, ErrorKind::MaxDepth);
                        return;
                    }
                    if iteration > MAX_ITERATIONS {
                        yield terminal(&current_name, qtype, ErrorKind::MaxIterations);
                        return;
                    }

                    let available: Vec<&String> = candidates.iter().filter(|c| !tried.contains(*c)).collect();
                    if available.is_empty() {
                        yield terminal(&current_name, qtype, ErrorKind::NoMoreServers);
                        return;
                    }

                    let server = available
                        .choose(&mut rand::thread_rng())
                        .expect("non-empty available set")
                        .to_string();
                    tried.insert(server.clone());

                    let request = Request::new(&server, current_name.fqdn(), qtype, RequestOptions::new());
                    let mut exec_stream = execute(transport.clone(), request.clone());

                    let response = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            let error = DNSError::new(ErrorKind::Cancelled, current_name.fqdn(), qtype, request.qclass)
                                .with_addr(&request.addr);
                            yield Response::error(request, error);
                            return;
                        }
                        response = exec_stream.next() => response,
                    };

                    let response = match response {
                        Some(response) => response,
                        None => {
                            // executor stream closed without a result; contained fault.
                            let error = DNSError::new(ErrorKind::TransportOther, current_name.fqdn(), qtype, request.qclass)
                                .with_addr(&request.addr)
                                .with_message("executor produced no result");
                            yield Response::error(request, error);
                            return;
                        }
                    };

                    match &response.outcome {
                        Outcome::Error(error) if error.is_soft() => {
                            // soft failure: try another server from the same candidate set.
                            continue;
                        }
                        Outcome::Error(error) if error.is_name_error() => {
                            yield response;
                            return;
                        }
                        Outcome::Error(_truncated_or_other) => {
                            // truncated, or any other hard terminal error (cancelled is
                            // handled above, resource-exhaustion kinds originate here only).
                            yield response;
                            return;
                        }
                        Outcome::Success { message, .. } => {
                            let fqdn = current_name.fqdn();

                            let answer_hit = message
                                .answers
                                .iter()
                                .any(|rr| rr.name.fqdn() == fqdn && !matches!(rr.rdata, RData::Cname(_)));

                            if answer_hit {
                                yield response;
                                return;
                            }

                            let alias_target = message.answers.iter().rev().find_map(|rr| match &rr.rdata {
                                RData::Cname(target) => Some(target.clone()),
                                _ => None,
                            });

                            if let Some(target) = alias_target {
                                yield response;
                                depth += 1;
                                current_name = target;
                                continue 'epoch;
                            }

                            let mut next_candidates: Vec<String> = message
                                .authorities
                                .iter()
                                .filter(|rr| matches!(rr.rdata, RData::Ns(_)))
                                .filter(|rr| rr.name.is_suffix_of(&current_name))
                                .filter_map(|rr| match &rr.rdata {
                                    RData::Ns(target) => Some(target.fqdn()),
                                    _ => None,
                                })
                                .filter(|host| !tried.contains(host))
                                .collect();
                            next_candidates.sort();
                            next_candidates.dedup();

                            yield response;

                            if next_candidates.is_empty() {
                                yield terminal(&current_name, qtype, ErrorKind::NoMoreServers);
                                return;
                            }

                            candidates = next_candidates;
                            iteration += 1;
                        }
                    }
                }
            }
        }
    }
}

fn terminal(name: &Name, qtype: QType, kind: ErrorKind) -> Response {
    let error = DNSError::new(kind, name.fqdn(), qtype, QClass::IN);
    Response::error(Request::new("0.0.0.0", name.fqdn(), qtype, RequestOptions::new()), error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::root_servers;
    use crate::transport::TransportResult;
    use crate::wire::{Header, Message, ResourceRecord, ResponseCode};
    use async_trait::async_trait;
    use std::net::Ipv4Addr;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::pin;

    /// A scripted transport: each call to `exchange` pops the next canned
    /// message keyed by the server address consulted, so a test can script
    /// an entire referral chain.
    struct ScriptedTransport {
        by_addr: Mutex<std::collections::HashMap<String, Message>>,
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn exchange(&self, request: &Request) -> TransportResult {
            let mut scripts = self.by_addr.lock().unwrap();
            let message = scripts
                .remove(&request.addr)
                .unwrap_or_else(|| panic!("no script entry for {}", request.addr));
            TransportResult {
                message: Ok(message),
                rtt: Duration::from_millis(1),
            }
        }
    }

    fn success_header() -> Header {
        let mut header = Header::default();
        header.flags.is_response = true;
        header
    }

    #[tokio::test]
    async fn answer_hit_at_first_hop_terminates() {
        let name = Name::from("example.com.");
        let mut message = Message::query(&name, QType::A, QClass::IN, false);
        message.header = success_header();
        message.header.an_count = 1;
        message.answers.push(ResourceRecord {
            name: name.clone(),
            rtype: QType::A,
            rclass: QClass::IN,
            ttl: 60,
            rdata: RData::A(Ipv4Addr::new(93, 184, 216, 34)),
        });

        let mut by_addr = std::collections::HashMap::new();
        for root in root_servers() {
            by_addr.insert(format!("{}:53", root), message.clone());
        }
        let transport: Arc<dyn Transport> = Arc::new(ScriptedTransport {
            by_addr: Mutex::new(by_addr),
        });

        let walker = Walker::new(transport);
        let stream = walker.resolve(CancellationToken::new(), name, QType::A);
        pin!(stream);

        let response = stream.next().await.expect("one response");
        assert!(response.is_success());
        assert!(stream.next().await.is_none(), "stream closes after the terminating emission");
    }

    #[tokio::test]
    async fn referral_then_answer_hit_emits_two_hops() {
        let name = Name::from("example.com.");

        let mut referral = Message::query(&name, QType::A, QClass::IN, false);
        referral.header = success_header();
        referral.header.ns_count = 1;
        referral.authorities.push(ResourceRecord {
            name: Name::from("com."),
            rtype: QType::NS,
            rclass: QClass::IN,
            ttl: 60,
            rdata: RData::Ns(Name::from("ns1.tld.example.")),
        });

        let mut answer = Message::query(&name, QType::A, QClass::IN, false);
        answer.header = success_header();
        answer.header.an_count = 1;
        answer.answers.push(ResourceRecord {
            name: name.clone(),
            rtype: QType::A,
            rclass: QClass::IN,
            ttl: 60,
            rdata: RData::A(Ipv4Addr::new(1, 2, 3, 4)),
        });

        let mut by_addr = std::collections::HashMap::new();
        for root in root_servers() {
            by_addr.insert(format!("{}:53", root), referral.clone());
        }
        by_addr.insert("ns1.tld.example.:53".to_string(), answer);

        let transport: Arc<dyn Transport> = Arc::new(ScriptedTransport {
            by_addr: Mutex::new(by_addr),
        });

        let walker = Walker::new(transport);
        let stream = walker.resolve(CancellationToken::new(), name, QType::A);
        pin!(stream);

        let first = stream.next().await.expect("referral hop");
        assert!(first.is_success());
        assert!(first.message().unwrap().authorities[0].name.fqdn() == "com.");

        let second = stream.next().await.expect("answer hop");
        assert!(second.is_success());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn name_error_is_terminal() {
        let name = Name::from("nonexistent.example.");
        let mut message = Message::query(&name, QType::A, QClass::IN, false);
        message.header = success_header();
        message.header.flags.response_code = ResponseCode::NAME_ERROR;

        let mut by_addr = std::collections::HashMap::new();
        for root in root_servers() {
            by_addr.insert(format!("{}:53", root), message.clone());
        }
        let transport: Arc<dyn Transport> = Arc::new(ScriptedTransport {
            by_addr: Mutex::new(by_addr),
        });

        let walker = Walker::new(transport);
        let stream = walker.resolve(CancellationToken::new(), name, QType::A);
        pin!(stream);

        let response = stream.next().await.expect("one response");
        assert!(response.error_ref().unwrap().is_name_error());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn cancellation_before_first_hop_terminates_with_cancelled() {
        struct NeverRespondsTransport;
        #[async_trait]
        impl Transport for NeverRespondsTransport {
            async fn exchange(&self, _request: &Request) -> TransportResult {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }

        let transport: Arc<dyn Transport> = Arc::new(NeverRespondsTransport);
        let walker = Walker::new(transport);

        let cancel = CancellationToken::new();
        cancel.cancel();

        let stream = walker.resolve(cancel, Name::from("example.com."), QType::A);
        pin!(stream);

        let response = tokio::time::timeout(Duration::from_secs(1), stream.next())
            .await
            .expect("must not hang")
            .expect("one response");
        assert!(response.error_ref().unwrap().is_cancelled());
    }
}
