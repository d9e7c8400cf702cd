//! The request executor (spec §4.1): wraps the transport in a uniform
//! single-shot asynchronous operation. `execute` runs on a fresh background
//! task and its result stream yields exactly one `Response`, then closes.
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::error::{DNSError, ErrorKind};
use crate::request::Request;
use crate::response::Response;
use crate::transport::{classify_transport_failure, Transport, TransportFailure};

/// Sends a contained-fault `Response` if the executor task is dropped (e.g.
/// panics) before it ever sends its real result — spec §4.1 point 4:
/// "Unexpected faults inside the task ... must be contained and reported as
/// a transport-other error on the stream; the task must never leak upward."
struct FaultGuard {
    sender: Option<mpsc::Sender<Response>>,
    request: Request,
}

impl FaultGuard {
    fn disarm(&mut self) {
        self.sender = None;
    }
}

impl Drop for FaultGuard {
    fn drop(&mut self) {
        if let Some(sender) = self.sender.take() {
            let error = DNSError::new(
                ErrorKind::TransportOther,
                self.request.name.fqdn(),
                self.request.qtype,
                self.request.qclass,
            )
            .with_addr(&self.request.addr)
            .with_message("executor task ended without a result");
            let _ = sender.try_send(Response::error(self.request.clone(), error));
        }
    }
}

/// Runs one request through `transport`, classifying the outcome per spec
/// §4.1 point 3, and returns a stream that yields that single `Response`.
pub fn execute(transport: Arc<dyn Transport>, request: Request) -> ReceiverStream<Response> {
    let (tx, rx) = mpsc::channel(1);

    tokio::spawn(async move {
        let mut guard = FaultGuard {
            sender: Some(tx.clone()),
            request: request.clone(),
        };

        let response = run_single_query(transport, &request).await;
        guard.disarm();

        let _ = tx.send(response).await;
    });

    ReceiverStream::new(rx)
}

async fn run_single_query(transport: Arc<dyn Transport>, request: &Request) -> Response {
    let result = transport.exchange(request).await;

    let message = match result.message {
        Ok(message) => message,
        Err(failure) => {
            let error = classify_transport_failure(&failure, request);
            log::debug!("executor: {} -> {}", request, error);
            return Response::error(request.clone(), error);
        }
    };

    let rcode = message.header.flags.response_code;

    // Classification is RCODE-gated, in order (spec §7): NXDOMAIN always
    // means name-error, even with TC set; truncated only applies once RCODE
    // is NOERROR; any other non-success RCODE is rcode-other.
    if rcode.is_name_error() {
        let error = DNSError::new(ErrorKind::NameError, request.name.fqdn(), request.qtype, request.qclass)
            .with_addr(&request.addr);
        return Response::error(request.clone(), error);
    }

    if rcode.is_success() && message.header.flags.truncated {
        let error = DNSError::new(ErrorKind::Truncated, request.name.fqdn(), request.qtype, request.qclass)
            .with_addr(&request.addr);
        return Response::error(request.clone(), error);
    }

    if !rcode.is_success() {
        let error = DNSError::new(
            ErrorKind::RcodeOther(rcode.to_string()),
            request.name.fqdn(),
            request.qtype,
            request.qclass,
        )
        .with_addr(&request.addr);
        return Response::error(request.clone(), error);
    }

    Response::success(request.clone(), message, result.rtt)
}

/// A `Transport` that always reports the same fixed failure; used by the
/// fault-guard unit test below to exercise the "task ended" path indirectly
/// through a transport that never completes its send.
#[cfg(test)]
struct NeverRespondsTransport;

#[cfg(test)]
#[async_trait::async_trait]
impl Transport for NeverRespondsTransport {
    async fn exchange(&self, _request: &Request) -> crate::transport::TransportResult {
        crate::transport::TransportResult {
            message: Err(TransportFailure::Timeout),
            rtt: std::time::Duration::from_millis(1),
        }
    }
}

#[cfg(test)]
struct FixedMessageTransport {
    message: crate::wire::Message,
}

#[cfg(test)]
#[async_trait::async_trait]
impl Transport for FixedMessageTransport {
    async fn exchange(&self, _request: &Request) -> crate::transport::TransportResult {
        crate::transport::TransportResult {
            message: Ok(self.message.clone()),
            rtt: std::time::Duration::from_millis(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestOptions;
    use crate::wire::{Name, QClass, QType, ResponseCode};
    use tokio_stream::StreamExt;

    #[tokio::test]
    async fn timeout_is_classified() {
        let transport: Arc<dyn Transport> = Arc::new(NeverRespondsTransport);
        let request = Request::new("1.1.1.1", "example.com", QType::A, RequestOptions::new());

        let mut stream = execute(transport, request);
        let response = stream.next().await.unwrap();
        assert!(response.error_ref().unwrap().is_timeout());

        assert!(stream.next().await.is_none(), "stream must close after exactly one item");
    }

    #[tokio::test]
    async fn name_error_wins_over_truncated_bit() {
        let name = Name::from("nonexistent.example.");
        let mut message = crate::wire::Message::query(&name, QType::A, QClass::IN, false);
        message.header.flags.is_response = true;
        message.header.flags.truncated = true;
        message.header.flags.response_code = ResponseCode::NAME_ERROR;

        let transport: Arc<dyn Transport> = Arc::new(FixedMessageTransport { message });
        let request = Request::new("1.1.1.1", "nonexistent.example", QType::A, RequestOptions::new());

        let mut stream = execute(transport, request);
        let response = stream.next().await.unwrap();
        assert!(response.error_ref().unwrap().is_name_error());
    }

    #[tokio::test]
    async fn truncated_still_applies_when_rcode_is_success() {
        let name = Name::from("example.com.");
        let mut message = crate::wire::Message::query(&name, QType::A, QClass::IN, false);
        message.header.flags.is_response = true;
        message.header.flags.truncated = true;

        let transport: Arc<dyn Transport> = Arc::new(FixedMessageTransport { message });
        let request = Request::new("1.1.1.1", "example.com", QType::A, RequestOptions::new());

        let mut stream = execute(transport, request);
        let response = stream.next().await.unwrap();
        let error = response.error_ref().unwrap();
        assert!(!error.is_name_error());
        assert_eq!(error.kind, ErrorKind::Truncated);
    }
}
