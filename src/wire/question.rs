//! The question section entry (RFC 1035 §4.1.2): a queried name, type and class.
use std::fmt;
use std::io::{Cursor, Result};

use dns_derive::DnsStruct;

use crate::error::DNSResult;

use super::{Name, ToFromNetworkOrder};

/// A query type, kept open-ended (newtype over `u16`) rather than a closed
/// enum: Answer/Authority sections of real responses can carry RR types
/// this crate doesn't specially decode (SRV, CAA, ...), and those must
/// still round-trip rather than fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct QType(pub u16);

impl QType {
    pub const A: QType = QType(1);
    pub const NS: QType = QType(2);
    pub const CNAME: QType = QType(5);
    pub const SOA: QType = QType(6);
    pub const MX: QType = QType(15);
    pub const TXT: QType = QType(16);
    pub const AAAA: QType = QType(28);

    /// ```
    /// use iterdns::QType;
    ///
    /// assert_eq!(QType::AAAA.name(), "AAAA");
    /// assert_eq!(QType(999).name(), "UNKNOWN");
    /// ```
    pub fn name(&self) -> &'static str {
        match *self {
            Self::A => "A",
            Self::NS => "NS",
            Self::CNAME => "CNAME",
            Self::SOA => "SOA",
            Self::MX => "MX",
            Self::TXT => "TXT",
            Self::AAAA => "AAAA",
            _ => "UNKNOWN",
        }
    }
}

impl fmt::Display for QType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name() == "UNKNOWN" {
            write!(f, "TYPE{}", self.0)
        } else {
            write!(f, "{}", self.name())
        }
    }
}

impl std::str::FromStr for QType {
    type Err = String;

    /// ```
    /// use std::str::FromStr;
    /// use iterdns::QType;
    ///
    /// assert_eq!(QType::from_str("mx").unwrap(), QType::MX);
    /// assert_eq!(QType::from_str("65").unwrap(), QType(65));
    /// assert!(QType::from_str("not-a-type").is_err());
    /// ```
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "NS" => Ok(Self::NS),
            "CNAME" => Ok(Self::CNAME),
            "SOA" => Ok(Self::SOA),
            "MX" => Ok(Self::MX),
            "TXT" => Ok(Self::TXT),
            "AAAA" => Ok(Self::AAAA),
            other => other
                .parse::<u16>()
                .map(QType)
                .map_err(|_| format!("unknown query type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct QClass(pub u16);

impl QClass {
    pub const IN: QClass = QClass(1);
    pub const CHAOS: QClass = QClass(3);
    pub const ANY: QClass = QClass(255);

    /// ```
    /// use iterdns::QClass;
    ///
    /// assert_eq!(QClass::CHAOS.name(), "CH");
    /// assert_eq!(format!("{}", QClass(77)), "CLASS77");
    /// ```
    pub fn name(&self) -> &'static str {
        match *self {
            Self::IN => "IN",
            Self::CHAOS => "CH",
            Self::ANY => "ANY",
            _ => "UNKNOWN",
        }
    }
}

impl fmt::Display for QClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name() == "UNKNOWN" {
            write!(f, "CLASS{}", self.0)
        } else {
            write!(f, "{}", self.name())
        }
    }
}

impl<'a> ToFromNetworkOrder<'a> for QType {
    fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> Result<usize> {
        self.0.to_network_bytes(buffer)
    }

    fn from_network_bytes(&mut self, buffer: &mut Cursor<&'a [u8]>) -> DNSResult<()> {
        self.0.from_network_bytes(buffer)
    }
}

impl<'a> ToFromNetworkOrder<'a> for QClass {
    fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> Result<usize> {
        self.0.to_network_bytes(buffer)
    }

    fn from_network_bytes(&mut self, buffer: &mut Cursor<&'a [u8]>) -> DNSResult<()> {
        self.0.from_network_bytes(buffer)
    }
}

/// ```
/// use std::io::Cursor;
/// use iterdns::{Name, QClass, QType};
/// use iterdns::wire::{Question, ToFromNetworkOrder};
///
/// let question = Question { name: Name::from("example.com."), qtype: QType::A, qclass: QClass::IN };
/// let mut buffer = Vec::new();
/// question.to_network_bytes(&mut buffer).unwrap();
///
/// let mut cursor = Cursor::new(buffer.as_slice());
/// let mut decoded = Question::default();
/// decoded.from_network_bytes(&mut cursor).unwrap();
/// assert_eq!(decoded.name, question.name);
/// assert_eq!(decoded.qtype, QType::A);
/// ```
#[derive(Debug, Clone, Default, DnsStruct)]
pub struct Question {
    pub name: Name,
    pub qtype: QType,
    pub qclass: QClass,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_round_trip() {
        let question = Question {
            name: Name::from("example.com."),
            qtype: QType::A,
            qclass: QClass::IN,
        };

        let mut buffer = Vec::new();
        question.to_network_bytes(&mut buffer).unwrap();

        let mut cursor = Cursor::new(buffer.as_slice());
        let mut decoded = Question::default();
        decoded.from_network_bytes(&mut cursor).unwrap();

        assert_eq!(decoded.name, question.name);
        assert_eq!(decoded.qtype, QType::A);
        assert_eq!(decoded.qclass, QClass::IN);
    }
}
