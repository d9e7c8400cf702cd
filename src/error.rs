//! A dedicated error for all possible errors in DNS queries: wire-codec
//! inconsistencies (`CodecError`) and the protocol/resolution error
//! taxonomy the walker classifies responses into (`DNSError`).
use std::fmt;
use std::io;
use std::str;

use crate::wire::{QClass, QType};

/// Errors from the wire codec: malformed packets, truncated buffers, bad
/// UTF-8 in TXT/character-strings. Kept separate from `DNSError`, which is
/// the resolution-level error carried by `Response`.
#[derive(Debug)]
pub enum CodecError {
    Io(io::Error),
    FromUtf8(std::string::FromUtf8Error),
    Utf8(str::Utf8Error),
    DNS(String),
    DNSInternalError(InternalError),
}

#[derive(Debug)]
pub enum InternalError {
    DnsDomainNameTooLong,
    EmptyDomainName,
    UnexpectedEndOfBuffer,
    CompressionPointerLoop,
}

impl CodecError {
    // Helper function to create a new codec error from a string
    pub fn new(s: &str) -> Self {
        CodecError::DNS(String::from(s))
    }
}

/// A specific custom `Result` for the wire codec
pub type DNSResult<T> = Result<T, CodecError>;

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Io(e) => write!(f, "io error: {}", e),
            CodecError::FromUtf8(e) => write!(f, "invalid utf8: {}", e),
            CodecError::Utf8(e) => write!(f, "invalid utf8: {}", e),
            CodecError::DNS(s) => write!(f, "{}", s),
            CodecError::DNSInternalError(e) => write!(f, "{:?}", e),
        }
    }
}

impl std::error::Error for CodecError {}

// All conversions for internal errors for CodecError
impl From<io::Error> for CodecError {
    fn from(err: io::Error) -> Self {
        CodecError::Io(err)
    }
}

impl From<String> for CodecError {
    fn from(err: String) -> Self {
        CodecError::DNS(err)
    }
}

impl From<std::string::FromUtf8Error> for CodecError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        CodecError::FromUtf8(err)
    }
}

impl From<str::Utf8Error> for CodecError {
    fn from(err: str::Utf8Error) -> Self {
        CodecError::Utf8(err)
    }
}

/// One entry of the resolution error taxonomy a `Response` carries (spec §7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The transport reported a timeout.
    Timeout,
    /// RCODE was NXDOMAIN: authoritative assertion the name does not exist.
    NameError,
    /// Header TC bit set; this layer does not retry in TCP automatically.
    Truncated,
    /// Any other non-zero RCODE, carried as text.
    RcodeOther(String),
    /// I/O or decoder failure below the protocol layer.
    TransportOther,
    /// The caller's cancellation signal fired.
    Cancelled,
    /// The walker's hop counter exceeded `MAX_ITERATIONS`.
    MaxIterations,
    /// The walker's alias-chase depth exceeded `MAX_DEPTH`.
    MaxDepth,
    /// The current candidate server set was exhausted.
    NoMoreServers,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Timeout => write!(f, "timeout"),
            ErrorKind::NameError => write!(f, "name error (NXDOMAIN)"),
            ErrorKind::Truncated => write!(f, "truncated"),
            ErrorKind::RcodeOther(rcode) => write!(f, "rcode {}", rcode),
            ErrorKind::TransportOther => write!(f, "transport error"),
            ErrorKind::Cancelled => write!(f, "cancelled"),
            ErrorKind::MaxIterations => write!(f, "max iterations reached"),
            ErrorKind::MaxDepth => write!(f, "max alias-chase depth reached"),
            ErrorKind::NoMoreServers => write!(f, "no more servers to try"),
        }
    }
}

/// A classified resolution/protocol error, echoing the query that produced it.
#[derive(Debug, Clone)]
pub struct DNSError {
    pub kind: ErrorKind,
    pub name: String,
    pub qtype: QType,
    pub qclass: QClass,
    /// Server address that produced the error, when applicable.
    pub addr: Option<String>,
    /// Extra human-readable context (wire decode failure message, I/O error text, ...).
    pub message: Option<String>,
}

impl DNSError {
    pub fn new(kind: ErrorKind, name: impl Into<String>, qtype: QType, qclass: QClass) -> Self {
        Self {
            kind,
            name: name.into(),
            qtype,
            qclass,
            addr: None,
            message: None,
        }
    }

    pub fn with_addr(mut self, addr: impl Into<String>) -> Self {
        self.addr = Some(addr.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_name_error(&self) -> bool {
        matches!(self.kind, ErrorKind::NameError)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, ErrorKind::Timeout)
    }

    /// Temporary == timeout, per spec's predicate set.
    pub fn is_temporary(&self) -> bool {
        self.is_timeout()
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, ErrorKind::Cancelled)
    }

    /// Soft failures: the walker tries another server in the current set.
    pub fn is_soft(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Timeout | ErrorKind::RcodeOther(_) | ErrorKind::TransportOther
        )
    }
}

impl fmt::Display for DNSError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lookup {} type {:?} class {:?}", self.name, self.qtype, self.qclass)?;
        if let Some(addr) = &self.addr {
            write!(f, " on {}", addr)?;
        }
        write!(f, ": {}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, " ({})", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for DNSError {}
