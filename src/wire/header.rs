//! The 12-byte DNS message header (RFC 1035 §4.1.1) and its bit-packed flags.
use std::convert::TryFrom;
use std::fmt;
use std::io::{Cursor, Result};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use dns_derive::{DnsEnum, DnsStruct};

use crate::error::{CodecError, DNSResult};

use super::ToFromNetworkOrder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, DnsEnum)]
pub enum OpCode {
    Query = 0,
    IQuery = 1,
    Status = 2,
    Notify = 4,
    Update = 5,
}

/// The response code (RCODE), kept as an open-ended newtype rather than a
/// closed enum: real servers occasionally answer with codes outside the
/// small registered set (e.g. EDNS extended RCODEs), and the walker only
/// ever needs to distinguish NOERROR, NXDOMAIN and "anything else".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResponseCode(pub u16);

impl ResponseCode {
    pub const NO_ERROR: ResponseCode = ResponseCode(0);
    pub const FORMAT_ERROR: ResponseCode = ResponseCode(1);
    pub const SERVER_FAILURE: ResponseCode = ResponseCode(2);
    pub const NAME_ERROR: ResponseCode = ResponseCode(3);
    pub const NOT_IMPLEMENTED: ResponseCode = ResponseCode(4);
    pub const REFUSED: ResponseCode = ResponseCode(5);

    /// ```
    /// use iterdns::wire::ResponseCode;
    ///
    /// assert!(ResponseCode::NO_ERROR.is_success());
    /// assert!(!ResponseCode::NAME_ERROR.is_success());
    /// ```
    pub fn is_success(&self) -> bool {
        *self == Self::NO_ERROR
    }

    pub fn is_name_error(&self) -> bool {
        *self == Self::NAME_ERROR
    }

    /// ```
    /// use iterdns::wire::ResponseCode;
    ///
    /// assert_eq!(ResponseCode::NAME_ERROR.name(), "NXDOMAIN");
    /// assert_eq!(ResponseCode(42).name(), "UNKNOWN");
    /// ```
    pub fn name(&self) -> &'static str {
        match *self {
            Self::NO_ERROR => "NOERROR",
            Self::FORMAT_ERROR => "FORMERR",
            Self::SERVER_FAILURE => "SERVFAIL",
            Self::NAME_ERROR => "NXDOMAIN",
            Self::NOT_IMPLEMENTED => "NOTIMP",
            Self::REFUSED => "REFUSED",
            _ => "UNKNOWN",
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name() == "UNKNOWN" {
            write!(f, "RCODE{}", self.0)
        } else {
            write!(f, "{}", self.name())
        }
    }
}

/// The bit-packed second half-word of the header.
///
/// ```text
///  0  1  2  3  4  5  6  7  8  9  10 11 12 13 14 15
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |QR|   Opcode  |AA|TC|RD|RA|   Z    |   RCODE   |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Flags {
    pub is_response: bool,
    pub op_code: OpCode,
    pub authoritative_answer: bool,
    pub truncated: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    pub z: u8,
    pub response_code: ResponseCode,
}

impl<'a> ToFromNetworkOrder<'a> for Flags {
    fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> Result<usize> {
        let mut flags = (self.is_response as u16) << 15;
        flags |= (self.op_code as u16) << 11;
        flags |= (self.authoritative_answer as u16) << 10;
        flags |= (self.truncated as u16) << 9;
        flags |= (self.recursion_desired as u16) << 8;
        flags |= (self.recursion_available as u16) << 7;
        flags |= ((self.z & 0b111) as u16) << 4;
        flags |= self.response_code.0 & 0b1111;

        buffer.write_u16::<BigEndian>(flags)?;
        Ok(2)
    }

    fn from_network_bytes(&mut self, buffer: &mut Cursor<&'a [u8]>) -> DNSResult<()> {
        let flags = buffer.read_u16::<BigEndian>()?;

        self.is_response = (flags >> 15) & 1 == 1;
        self.op_code = OpCode::try_from(((flags >> 11) & 0b1111) as u16)
            .map_err(|e| CodecError::new(&e))?;
        self.authoritative_answer = (flags >> 10) & 1 == 1;
        self.truncated = (flags >> 9) & 1 == 1;
        self.recursion_desired = (flags >> 8) & 1 == 1;
        self.recursion_available = (flags >> 7) & 1 == 1;
        self.z = ((flags >> 4) & 0b111) as u8;
        self.response_code = ResponseCode(flags & 0b1111);

        Ok(())
    }
}

/// ```
/// use std::io::Cursor;
/// use iterdns::wire::{Flags, Header};
/// use iterdns::wire::ToFromNetworkOrder;
///
/// let header = Header {
///     id: 0x1234,
///     flags: Flags { recursion_desired: true, ..Default::default() },
///     qd_count: 1,
///     an_count: 0,
///     ns_count: 0,
///     ar_count: 0,
/// };
///
/// let mut buffer = Vec::new();
/// header.to_network_bytes(&mut buffer).unwrap();
/// assert_eq!(buffer.len(), 12);
///
/// let mut cursor = Cursor::new(buffer.as_slice());
/// let mut decoded = Header::default();
/// decoded.from_network_bytes(&mut cursor).unwrap();
/// assert_eq!(decoded.id, 0x1234);
/// assert!(decoded.flags.recursion_desired);
/// ```
#[derive(Debug, Clone, Copy, Default, DnsStruct)]
pub struct Header {
    pub id: u16,
    pub flags: Flags,
    pub qd_count: u16,
    pub an_count: u16,
    pub ns_count: u16,
    pub ar_count: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_round_trip() {
        let flags = Flags {
            is_response: true,
            op_code: OpCode::IQuery,
            authoritative_answer: true,
            truncated: true,
            recursion_desired: true,
            recursion_available: true,
            z: 0b111,
            response_code: ResponseCode::NO_ERROR,
        };

        let mut buffer = Vec::new();
        flags.to_network_bytes(&mut buffer).unwrap();

        let mut cursor = Cursor::new(buffer.as_slice());
        let mut decoded = Flags::default();
        decoded.from_network_bytes(&mut cursor).unwrap();

        assert!(decoded.is_response);
        assert_eq!(decoded.op_code, OpCode::IQuery);
        assert!(decoded.authoritative_answer);
        assert!(decoded.truncated);
        assert!(decoded.recursion_desired);
        assert!(decoded.recursion_available);
        assert_eq!(decoded.z, 0b111);
        assert_eq!(decoded.response_code, ResponseCode::NO_ERROR);
    }

    #[test]
    fn header_round_trip() {
        let header = Header {
            id: 0x1234,
            flags: Flags {
                recursion_desired: true,
                ..Default::default()
            },
            qd_count: 1,
            an_count: 0,
            ns_count: 0,
            ar_count: 0,
        };

        let mut buffer = Vec::new();
        header.to_network_bytes(&mut buffer).unwrap();
        assert_eq!(buffer.len(), 12);

        let mut cursor = Cursor::new(buffer.as_slice());
        let mut decoded = Header::default();
        decoded.from_network_bytes(&mut cursor).unwrap();
        assert_eq!(decoded.id, 0x1234);
        assert!(decoded.flags.recursion_desired);
        assert_eq!(decoded.qd_count, 1);
    }
}
