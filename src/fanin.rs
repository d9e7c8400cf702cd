//! The fan-in multiplexer (spec §4.2): issues a batch of requests
//! concurrently via the executor and merges their single-result streams
//! into one output stream, honouring cooperative cancellation.
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::error::{DNSError, ErrorKind};
use crate::executor::execute;
use crate::request::Request;
use crate::response::Response;
use crate::transport::Transport;
use crate::wire::{QClass, QType};

/// Runs `requests` concurrently (one subtask per request via [`execute`])
/// and forwards each one's single result onto a shared output stream. The
/// output closes once every subtask has forwarded its result, or as soon as
/// `cancel` fires — whichever comes first. Order is arbitrary: the contract
/// is set-equivalence to the union of per-request results, not positional
/// correspondence (spec §4.2).
pub fn fan_in(transport: Arc<dyn Transport>, cancel: CancellationToken, requests: Vec<Request>) -> ReceiverStream<Response> {
    let (tx, rx) = mpsc::channel(requests.len().max(1));

    tokio::spawn(async move {
        let mut pending: JoinSet<Option<Response>> = JoinSet::new();

        for request in requests {
            let transport = transport.clone();
            let cancel = cancel.clone();
            pending.spawn(async move {
                let mut stream = execute(transport, request);
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    response = stream.next() => response,
                }
            });
        }

        let mut cancelled_emitted = false;

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled(), if !cancelled_emitted => {
                    cancelled_emitted = true;
                    let error = DNSError::new(ErrorKind::Cancelled, "", QType::default(), QClass::default());
                    let synthetic = Response::error(synthetic_request(), error);
                    let _ = tx.send(synthetic).await;
                    break;
                }

                joined = pending.join_next() => {
                    match joined {
                        None => break,
                        Some(Err(_join_error)) => continue, // subtask panicked; contained, simply dropped
                        Some(Ok(None)) => continue,         // cancelled before its own result arrived
                        Some(Ok(Some(response))) => {
                            if tx.send(response).await.is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        }

        // Any subtasks still in `pending` at this point keep running in the
        // background (their inner executor task is independent of this
        // fan-in task); their eventual results are simply dropped along
        // with `pending` itself.
    });

    ReceiverStream::new(rx)
}

fn synthetic_request() -> Request {
    use crate::request::RequestOptions;
    Request::new("0.0.0.0", ".", QType::default(), RequestOptions::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestOptions;
    use crate::response::Outcome;
    use crate::transport::TransportResult;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::time::Duration;

    struct FixedTransport;

    #[async_trait]
    impl Transport for FixedTransport {
        async fn exchange(&self, request: &Request) -> TransportResult {
            use crate::wire::{Message, QClass};
            let message = Message::query(&request.name, request.qtype, QClass::IN, false);
            TransportResult {
                message: Ok(message),
                rtt: Duration::from_millis(1),
            }
        }
    }

    #[tokio::test]
    async fn fans_in_three_requests_exactly_once_each() {
        let transport: Arc<dyn Transport> = Arc::new(FixedTransport);
        let names: Vec<&str> = vec!["a.example.", "b.example.", "c.example."];
        let requests: Vec<Request> = names
            .iter()
            .map(|n| Request::new("1.1.1.1", *n, QType::A, RequestOptions::new()))
            .collect();

        let mut stream = fan_in(transport, CancellationToken::new(), requests);

        let mut seen = HashSet::new();
        while let Some(response) = stream.next().await {
            seen.insert(response.request.name.fqdn());
        }

        assert_eq!(seen.len(), 3);
        assert!(seen.contains("a.example."));
        assert!(seen.contains("b.example."));
        assert!(seen.contains("c.example."));
    }

    struct NeverRespondsTransport;

    #[async_trait]
    impl Transport for NeverRespondsTransport {
        async fn exchange(&self, _request: &Request) -> TransportResult {
            std::future::pending::<()>().await;
            unreachable!()
        }
    }

    #[tokio::test]
    async fn cancellation_closes_the_stream_with_a_synthetic_error() {
        let transport: Arc<dyn Transport> = Arc::new(NeverRespondsTransport);
        let requests = vec![Request::new("1.1.1.1", "example.com", QType::A, RequestOptions::new())];

        let cancel = CancellationToken::new();
        let mut stream = fan_in(transport, cancel.clone(), requests);
        cancel.cancel();

        let response = tokio::time::timeout(Duration::from_secs(1), stream.next())
            .await
            .expect("fan-in must not hang waiting on a cancelled subtask")
            .expect("a synthetic cancellation response must be emitted");

        match response.outcome {
            Outcome::Error(e) => assert!(e.is_cancelled()),
            Outcome::Success { .. } => panic!("expected a cancellation error"),
        }
    }
}
