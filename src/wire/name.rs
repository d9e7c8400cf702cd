//! Domain names: label vectors, lower-cased and fully-qualified per spec §3/§4.4
//! ("Casing"), with compression-pointer following on decode (RFC 1035 §4.1.4).
use std::fmt;
use std::io::{Cursor, Read, Result, Seek, SeekFrom};

use byteorder::WriteBytesExt;

use crate::error::{CodecError, DNSResult};

use super::ToFromNetworkOrder;

/// A maximum number of compression-pointer hops to follow before declaring
/// the message malformed; real messages never nest more than a handful.
const MAX_POINTER_HOPS: usize = 32;

/// A domain name as an ordered list of lower-cased labels, e.g. `["www",
/// "example", "com"]` for `www.example.com.`. The root name is the empty
/// vector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Name(pub Vec<String>);

impl Name {
    /// ```
    /// use iterdns::Name;
    ///
    /// assert_eq!(Name::root().fqdn(), ".");
    /// ```
    pub fn root() -> Self {
        Name(Vec::new())
    }

    /// The canonical, lower-cased, trailing-dot-terminated representation.
    ///
    /// ```
    /// use iterdns::Name;
    ///
    /// assert_eq!(Name::from("WWW.Example.com").fqdn(), "www.example.com.");
    /// ```
    pub fn fqdn(&self) -> String {
        if self.0.is_empty() {
            ".".to_string()
        } else {
            format!("{}.", self.0.join("."))
        }
    }

    /// True if `self` is `other` or a parent zone of `other`, i.e. `self`'s
    /// labels are a suffix of `other`'s labels. Used to validate that an NS
    /// record's owner name is in-bailiwick for the query being walked.
    pub fn is_suffix_of(&self, other: &Name) -> bool {
        if self.0.len() > other.0.len() {
            return false;
        }
        let offset = other.0.len() - self.0.len();
        self.0 == other.0[offset..]
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fqdn())
    }
}

impl From<&str> for Name {
    /// Builds a `Name` from caller/user input: lower-cased, split on `.`,
    /// tolerant of an optional trailing root label.
    fn from(s: &str) -> Self {
        let lower = s.trim_end_matches('.').to_ascii_lowercase();
        if lower.is_empty() {
            return Name::root();
        }
        Name(lower.split('.').map(|l| l.to_string()).collect())
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Name::from(s.as_str())
    }
}

impl<'a> ToFromNetworkOrder<'a> for Name {
    /// ```
    /// use std::io::Cursor;
    /// use iterdns::Name;
    /// use iterdns::wire::ToFromNetworkOrder;
    ///
    /// let name = Name::from("example.com.");
    /// let mut buffer = Vec::new();
    /// name.to_network_bytes(&mut buffer).unwrap();
    /// assert_eq!(buffer, &[7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 3, b'c', b'o', b'm', 0]);
    ///
    /// let mut cursor = Cursor::new(buffer.as_slice());
    /// let mut decoded = Name::default();
    /// decoded.from_network_bytes(&mut cursor).unwrap();
    /// assert_eq!(decoded, name);
    /// ```
    fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> Result<usize> {
        let mut length = 0usize;
        for label in &self.0 {
            let bytes = label.as_bytes();
            buffer.write_u8(bytes.len() as u8)?;
            buffer.extend_from_slice(bytes);
            length += 1 + bytes.len();
        }
        buffer.write_u8(0)?;
        length += 1;
        Ok(length)
    }

    fn from_network_bytes(&mut self, buffer: &mut Cursor<&'a [u8]>) -> DNSResult<()> {
        self.0.clear();

        let mut hops = 0usize;
        let mut resume_at: Option<u64> = None;

        loop {
            let mut len_byte = [0u8; 1];
            buffer.read_exact(&mut len_byte)?;
            let len = len_byte[0];

            if len == 0 {
                break;
            }

            // top two bits set => compression pointer (RFC 1035 §4.1.4)
            if len & 0xC0 == 0xC0 {
                hops += 1;
                if hops > MAX_POINTER_HOPS {
                    return Err(CodecError::DNSInternalError(
                        crate::error::InternalError::CompressionPointerLoop,
                    ));
                }

                let mut lo_byte = [0u8; 1];
                buffer.read_exact(&mut lo_byte)?;
                let pointer = (((len & 0x3F) as u64) << 8) | lo_byte[0] as u64;

                if resume_at.is_none() {
                    resume_at = Some(buffer.position());
                }
                buffer.seek(SeekFrom::Start(pointer))?;
                continue;
            }

            let mut label = vec![0u8; len as usize];
            buffer.read_exact(&mut label)?;
            let label = String::from_utf8(label)?.to_ascii_lowercase();
            self.0.push(label);
        }

        if let Some(pos) = resume_at {
            buffer.seek(SeekFrom::Start(pos))?;
        }

        Ok(())
    }
}
