//! An iterative DNS resolver library: walks the delegation chain from the
//! root without a recursive upstream, following referrals and CNAME
//! aliases, and exposes the walk as a lazy stream of per-hop responses.
pub mod batch;
pub mod constants;
pub mod delegation;
pub mod error;
pub mod executor;
pub mod fanin;
pub mod lookup;
pub mod request;
pub mod resolver;
pub mod response;
pub mod transport;
pub mod walker;
pub mod wire;

pub use constants::ResolverConfig;
pub use delegation::{Delegation, DelegationResult, Tracer};
pub use error::{CodecError, DNSError, DNSResult, ErrorKind};
pub use request::{Request, RequestOptions, TransportMode};
pub use resolver::Resolver;
pub use response::{Outcome, Response};
pub use transport::{Transport, UdpTcpTransport};
pub use walker::Walker;
pub use wire::{Name, QClass, QType};
