//! The DNS wire codec: message encode/decode and resource-record types.
//!
//! Kept as a self-contained module so it can stand in for spec's "external
//! transport collaborator" contract (see [`crate::transport`]) while still
//! giving this crate a usable, dependency-free-of-the-OS implementation.
use std::io::Cursor;

use crate::error::DNSResult;

pub mod header;
pub mod message;
pub mod name;
pub mod primitive;
pub mod question;
pub mod record;

pub use header::{Flags, Header, OpCode, ResponseCode};
pub use message::Message;
pub use name::Name;
pub use question::{QClass, QType, Question};
pub use record::{RData, ResourceRecord};

/// Converts DNS wire structures to and from network-order bytes.
///
/// `from_network_bytes` takes a cursor over the *entire* received datagram
/// (not just the remaining tail) so that name-compression pointers, which
/// reference absolute offsets into the message, can be followed by seeking
/// the same cursor.
pub trait ToFromNetworkOrder<'a>: std::fmt::Debug {
    fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize>;
    fn from_network_bytes(&mut self, buffer: &mut Cursor<&'a [u8]>) -> DNSResult<()>;
}
