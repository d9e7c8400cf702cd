//! The outcome of one request/exchange (spec §3): either a decoded message
//! (with RTT) or a classified error, never both.
use std::time::Duration;

use crate::error::DNSError;
use crate::request::Request;
use crate::wire::Message;

#[derive(Debug, Clone)]
pub struct Response {
    pub request: Request,
    pub outcome: Outcome,
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Success { message: Message, rtt: Duration },
    Error(DNSError),
}

impl Response {
    pub fn success(request: Request, message: Message, rtt: Duration) -> Self {
        Response {
            request,
            outcome: Outcome::Success { message, rtt },
        }
    }

    pub fn error(request: Request, error: DNSError) -> Self {
        Response {
            request,
            outcome: Outcome::Error(error),
        }
    }

    /// The server address that produced this response, recovered from the
    /// owning request (original_source/response.go's `Addr()`).
    pub fn addr(&self) -> &str {
        &self.request.addr
    }

    pub fn message(&self) -> Option<&Message> {
        match &self.outcome {
            Outcome::Success { message, .. } => Some(message),
            Outcome::Error(_) => None,
        }
    }

    pub fn error_ref(&self) -> Option<&DNSError> {
        match &self.outcome {
            Outcome::Error(e) => Some(e),
            Outcome::Success { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success { .. })
    }

    pub fn rtt(&self) -> Option<Duration> {
        match &self.outcome {
            Outcome::Success { rtt, .. } => Some(*rtt),
            Outcome::Error(_) => None,
        }
    }
}
