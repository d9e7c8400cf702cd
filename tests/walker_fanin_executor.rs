//! Integration tests for the executor/fan-in/walker pipeline against a fake
//! in-process `Transport` (spec §9 "Test tooling").
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;

use iterdns::constants::root_servers;
use iterdns::request::{Request, RequestOptions};
use iterdns::transport::{Transport, TransportResult};
use iterdns::wire::{Header, Message, QClass, RData, ResourceRecord};
use iterdns::{QType, Walker};

fn success_header() -> Header {
    let mut header = Header::default();
    header.flags.is_response = true;
    header
}

/// Hands back a canned message keyed by the server address consulted, so a
/// test can script a whole referral chain across executor/fan-in/walker.
struct ScriptedTransport {
    by_addr: Mutex<HashMap<String, Message>>,
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

#[tokio::test]
async fn executor_runs_a_single_request_through_the_real_pipeline() {
    let name = iterdns::Name::from("example.com.");
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

    let mut by_addr = HashMap::new();
    by_addr.insert("1.1.1.1:53".to_string(), message);
    let transport: Arc<dyn Transport> = Arc::new(ScriptedTransport {
        by_addr: Mutex::new(by_addr),
    });

    let request = Request::new("1.1.1.1", "example.com", QType::A, RequestOptions::new());
    let mut stream = iterdns::executor::execute(transport, request);

    let response = stream.next().await.expect("one response");
    assert!(response.is_success());
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn fan_in_merges_three_independent_executor_calls() {
    let name = iterdns::Name::from("example.com.");

    let mut by_addr = HashMap::new();
    for (addr, qtype) in [("1.1.1.1:53", QType::A), ("2.2.2.2:53", QType::AAAA), ("3.3.3.3:53", QType::NS)] {
        let mut message = Message::query(&name, qtype, QClass::IN, false);
        message.header = success_header();
        by_addr.insert(addr.to_string(), message);
    }
    let transport: Arc<dyn Transport> = Arc::new(ScriptedTransport {
        by_addr: Mutex::new(by_addr),
    });

    let requests = vec![
        Request::new("1.1.1.1", "example.com", QType::A, RequestOptions::new()),
        Request::new("2.2.2.2", "example.com", QType::AAAA, RequestOptions::new()),
        Request::new("3.3.3.3", "example.com", QType::NS, RequestOptions::new()),
    ];

    let mut stream = iterdns::fanin::fan_in(transport, CancellationToken::new(), requests);

    let mut count = 0;
    while stream.next().await.is_some() {
        count += 1;
    }
    assert_eq!(count, 3);
}

#[tokio::test]
async fn walker_follows_a_referral_then_hits_the_answer() {
    let name = iterdns::Name::from("example.com.");

    let mut referral = Message::query(&name, QType::A, QClass::IN, false);
    referral.header = success_header();
    referral.header.ns_count = 1;
    referral.authorities.push(ResourceRecord {
        name: iterdns::Name::from("com."),
        rtype: QType::NS,
        rclass: QClass::IN,
        ttl: 60,
        rdata: RData::Ns(iterdns::Name::from("ns1.tld.example.")),
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

    let mut by_addr = HashMap::new();
    for root in root_servers() {
        by_addr.insert(format!("{}:53", root), referral.clone());
    }
    by_addr.insert("ns1.tld.example.:53".to_string(), answer);

    let transport: Arc<dyn Transport> = Arc::new(ScriptedTransport {
        by_addr: Mutex::new(by_addr),
    });

    let walker = Walker::new(transport);
    let stream = walker.resolve(CancellationToken::new(), name, QType::A);
    tokio::pin!(stream);

    let first = stream.next().await.expect("referral hop");
    assert!(first.is_success());

    let second = stream.next().await.expect("answer hop");
    assert!(second.is_success());

    assert!(stream.next().await.is_none(), "stream closes after the terminating emission");
}
