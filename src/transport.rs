//! The transport contract (spec §6) the executor drives: one DNS exchange,
//! UDP or TCP, per call. `UdpTcpTransport` is this crate's own concrete
//! implementation, built on the wire codec in [`crate::wire`]; callers may
//! substitute their own `Transport` (e.g. backed by a mock, for tests).
use std::time::{Duration, Instant};

use async_trait::async_trait;
use byteorder::{BigEndian, ByteOrder};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};
use tokio::time::timeout;

use crate::error::{CodecError, DNSError, ErrorKind};
use crate::request::{Request, TransportMode};
use crate::wire::message::MAX_MESSAGE_SIZE;
use crate::wire::Message;

/// One DNS exchange: send `request`'s query, wait for a reply, report the
/// raw outcome. Classification into the error taxonomy of spec §7 is the
/// executor's job, not the transport's — this trait only needs to
/// distinguish "timed out" from "anything else went wrong".
#[async_trait]
pub trait Transport: Send + Sync {
    async fn exchange(&self, request: &Request) -> TransportResult;
}

pub struct TransportResult {
    pub message: Result<Message, TransportFailure>,
    pub rtt: Duration,
}

#[derive(Debug)]
pub enum TransportFailure {
    Timeout,
    Io(String),
    Codec(String),
}

impl From<CodecError> for TransportFailure {
    fn from(err: CodecError) -> Self {
        TransportFailure::Codec(err.to_string())
    }
}

impl From<std::io::Error> for TransportFailure {
    fn from(err: std::io::Error) -> Self {
        TransportFailure::Io(err.to_string())
    }
}

/// Builds the `DNSError` the executor emits for a given transport failure
/// (timeout vs. everything else maps to spec §7's `Timeout`/`TransportOther`).
pub fn classify_transport_failure(failure: &TransportFailure, request: &Request) -> DNSError {
    let kind = match failure {
        TransportFailure::Timeout => ErrorKind::Timeout,
        TransportFailure::Io(_) | TransportFailure::Codec(_) => ErrorKind::TransportOther,
    };
    let message = match failure {
        TransportFailure::Io(m) | TransportFailure::Codec(m) => Some(m.clone()),
        TransportFailure::Timeout => None,
    };
    let mut error = DNSError::new(kind, request.name.fqdn(), request.qtype, request.qclass).with_addr(&request.addr);
    if let Some(m) = message {
        error = error.with_message(m);
    }
    error
}

/// UDP/TCP transport with a per-exchange timeout, using this crate's own
/// wire codec.
pub struct UdpTcpTransport {
    pub timeout: Duration,
}

impl Default for UdpTcpTransport {
    fn default() -> Self {
        UdpTcpTransport {
            timeout: Duration::from_secs(5),
        }
    }
}

impl UdpTcpTransport {
    pub fn new(timeout: Duration) -> Self {
        UdpTcpTransport { timeout }
    }

    async fn exchange_udp(&self, request: &Request, query: &Message) -> Result<Message, TransportFailure> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.connect(&request.addr).await?;

        let bytes = query.to_network_bytes()?;
        socket.send(&bytes).await?;

        let mut buf = [0u8; MAX_MESSAGE_SIZE];
        let received = socket.recv(&mut buf).await?;

        Ok(Message::from_network_bytes(&buf[..received])?)
    }

    async fn exchange_tcp(&self, request: &Request, query: &Message) -> Result<Message, TransportFailure> {
        let mut stream = TcpStream::connect(&request.addr).await?;

        let bytes = query.to_network_bytes()?;
        let mut framed = Vec::with_capacity(bytes.len() + 2);
        framed.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
        framed.extend_from_slice(&bytes);
        stream.write_all(&framed).await?;

        let mut len_buf = [0u8; 2];
        stream.read_exact(&mut len_buf).await?;
        let reply_len = BigEndian::read_u16(&len_buf) as usize;

        let mut reply = vec![0u8; reply_len];
        stream.read_exact(&mut reply).await?;

        Ok(Message::from_network_bytes(&reply)?)
    }
}

#[async_trait]
impl Transport for UdpTcpTransport {
    async fn exchange(&self, request: &Request) -> TransportResult {
        let query = Message::query(&request.name, request.qtype, request.qclass, request.recursion_desired);

        let start = Instant::now();
        let outcome = timeout(self.timeout, async {
            match request.mode {
                TransportMode::Udp => self.exchange_udp(request, &query).await,
                TransportMode::Tcp => self.exchange_tcp(request, &query).await,
            }
        })
        .await;
        let rtt = start.elapsed();

        let message = match outcome {
            Ok(result) => result,
            Err(_elapsed) => Err(TransportFailure::Timeout),
        };

        TransportResult { message, rtt }
    }
}
