//! Convenience lookups (spec §4.6): thin synchronous-from-the-caller's-view
//! adapters over the [`Walker`] that drain its stream to completion and
//! extract typed answers from the final Response.
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::constants::ResolverConfig;
use crate::error::{DNSError, ErrorKind};
use crate::response::{Outcome, Response};
use crate::transport::Transport;
use crate::walker::Walker;
use crate::wire::{Name, QType, RData};

/// Drains a walker stream and returns its final (terminating) Response.
async fn drain_to_final(walker: &Walker, cancel: CancellationToken, name: Name, qtype: QType) -> Response {
    let stream = walker.resolve(cancel, name, qtype);
    tokio::pin!(stream);

    let mut last = None;
    while let Some(response) = stream.next().await {
        last = Some(response);
    }
    last.expect("walker stream always yields at least one terminating Response")
}

fn extract_records(response: &Response, matches: impl Fn(&RData) -> bool) -> Result<Vec<RData>, DNSError> {
    match &response.outcome {
        Outcome::Error(error) => Err(error.clone()),
        Outcome::Success { message, .. } => {
            let owner = message.question().map(|q| q.name.fqdn());
            let records = message
                .answers
                .iter()
                .filter(|rr| owner.as_deref().map(|o| o == rr.name.fqdn()).unwrap_or(true))
                .filter(|rr| matches(&rr.rdata))
                .map(|rr| rr.rdata.clone())
                .collect();
            Ok(records)
        }
    }
}

/// Resolves the A records for `name`. Short-circuits if `name` is already
/// an IPv4 literal.
pub async fn lookup_ipv4(
    transport: Arc<dyn Transport>,
    config: ResolverConfig,
    cancel: CancellationToken,
    name: &str,
) -> Result<Vec<Ipv4Addr>, DNSError> {
    if let Ok(addr) = name.parse::<Ipv4Addr>() {
        return Ok(vec![addr]);
    }

    let walker = Walker::with_config(transport, config);
    let response = drain_to_final(&walker, cancel, Name::from(name), QType::A).await;
    let records = extract_records(&response, |rdata| matches!(rdata, RData::A(_)))?;
    Ok(records
        .into_iter()
        .filter_map(|rdata| match rdata {
            RData::A(addr) => Some(addr),
            _ => None,
        })
        .collect())
}

/// Resolves the AAAA records for `name`. Short-circuits if `name` is
/// already an IPv6 literal.
pub async fn lookup_ipv6(
    transport: Arc<dyn Transport>,
    config: ResolverConfig,
    cancel: CancellationToken,
    name: &str,
) -> Result<Vec<Ipv6Addr>, DNSError> {
    if let Ok(addr) = name.parse::<Ipv6Addr>() {
        return Ok(vec![addr]);
    }

    let walker = Walker::with_config(transport, config);
    let response = drain_to_final(&walker, cancel, Name::from(name), QType::AAAA).await;
    let records = extract_records(&response, |rdata| matches!(rdata, RData::Aaaa(_)))?;
    Ok(records
        .into_iter()
        .filter_map(|rdata| match rdata {
            RData::Aaaa(addr) => Some(addr),
            _ => None,
        })
        .collect())
}

/// Both address families, IPv4 first; fails fast on the first error.
pub async fn lookup_ip(
    transport: Arc<dyn Transport>,
    config: ResolverConfig,
    cancel: CancellationToken,
    name: &str,
) -> Result<Vec<std::net::IpAddr>, DNSError> {
    let mut addrs: Vec<std::net::IpAddr> = lookup_ipv4(transport.clone(), config.clone(), cancel.clone(), name)
        .await?
        .into_iter()
        .map(std::net::IpAddr::V4)
        .collect();
    let v6 = lookup_ipv6(transport, config, cancel, name).await?;
    addrs.extend(v6.into_iter().map(std::net::IpAddr::V6));
    Ok(addrs)
}

/// Resolves the NS records for `name` from the final Answer.
pub async fn lookup_ns(
    transport: Arc<dyn Transport>,
    config: ResolverConfig,
    cancel: CancellationToken,
    name: &str,
) -> Result<Vec<String>, DNSError> {
    let walker = Walker::with_config(transport, config);
    let response = drain_to_final(&walker, cancel, Name::from(name), QType::NS).await;
    let records = extract_records(&response, |rdata| matches!(rdata, RData::Ns(_)))?;
    Ok(records
        .into_iter()
        .filter_map(|rdata| match rdata {
            RData::Ns(target) => Some(target.fqdn()),
            _ => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::root_servers;
    use crate::transport::TransportResult;
    use crate::wire::{Header, Message, QClass, ResourceRecord};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    struct ScriptedTransport {
        by_addr: Mutex<std::collections::HashMap<String, Message>>,
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn exchange(&self, request: &crate::request::Request) -> TransportResult {
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

    #[tokio::test]
    async fn lookup_ipv4_short_circuits_on_literal() {
        let transport: Arc<dyn Transport> = Arc::new(ScriptedTransport {
            by_addr: Mutex::new(std::collections::HashMap::new()),
        });
        let addrs = lookup_ipv4(transport, ResolverConfig::default(), CancellationToken::new(), "93.184.216.34")
            .await
            .unwrap();
        assert_eq!(addrs, vec!["93.184.216.34".parse::<Ipv4Addr>().unwrap()]);
    }

    #[tokio::test]
    async fn lookup_ipv4_extracts_a_records_from_final_answer() {
        let name = Name::from("example.com.");
        let mut message = Message::query(&name, QType::A, QClass::IN, false);
        message.header = Header::default();
        message.header.flags.is_response = true;
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

        let addrs = lookup_ipv4(transport, ResolverConfig::default(), CancellationToken::new(), "example.com")
            .await
            .unwrap();
        assert_eq!(addrs, vec![Ipv4Addr::new(93, 184, 216, 34)]);
    }
}
