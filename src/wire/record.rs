//! Resource records (RFC 1035 §3.2, §3.3): the Answer/Authority/Additional
//! section entries the walker inspects for answer hits, CNAME aliases and
//! NS referrals.
use std::fmt;
use std::io::{Cursor, Read, Result, Seek, SeekFrom};
use std::net::{Ipv4Addr, Ipv6Addr};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{CodecError, DNSResult};

use super::question::{QClass, QType};
use super::{Name, ToFromNetworkOrder};

/// The decoded RDATA payload. Types this crate has no specific decoding for
/// (SRV, CAA, OPT, ...) round-trip as raw bytes via `Unknown` rather than
/// failing the whole message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RData {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Ns(Name),
    Cname(Name),
    Soa {
        mname: Name,
        rname: Name,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum: u32,
    },
    Mx {
        preference: u16,
        exchange: Name,
    },
    Txt(Vec<Vec<u8>>),
    Unknown(Vec<u8>),
}

/// ```
/// use std::net::Ipv4Addr;
/// use iterdns::wire::RData;
///
/// assert_eq!(RData::A(Ipv4Addr::new(93, 184, 216, 34)).to_string(), "93.184.216.34");
/// ```
impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RData::A(addr) => write!(f, "{}", addr),
            RData::Aaaa(addr) => write!(f, "{}", addr),
            RData::Ns(name) => write!(f, "{}", name),
            RData::Cname(name) => write!(f, "{}", name),
            RData::Soa {
                mname,
                rname,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            } => write!(
                f,
                "{} {} {} {} {} {} {}",
                mname, rname, serial, refresh, retry, expire, minimum
            ),
            RData::Mx { preference, exchange } => write!(f, "{} {}", preference, exchange),
            RData::Txt(chunks) => {
                for (i, chunk) in chunks.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "\"{}\"", String::from_utf8_lossy(chunk))?;
                }
                Ok(())
            }
            RData::Unknown(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: Name,
    pub rtype: QType,
    pub rclass: QClass,
    pub ttl: u32,
    pub rdata: RData,
}

impl ResourceRecord {
    fn decode_rdata(qtype: QType, buffer: &mut Cursor<&[u8]>, rdlength: u16) -> DNSResult<RData> {
        let rdata_start = buffer.position();

        let rdata = match qtype {
            QType::A => {
                let mut octets = [0u8; 4];
                buffer.read_exact(&mut octets)?;
                RData::A(Ipv4Addr::from(octets))
            }
            QType::AAAA => {
                let mut octets = [0u8; 16];
                buffer.read_exact(&mut octets)?;
                RData::Aaaa(Ipv6Addr::from(octets))
            }
            QType::NS => {
                let mut name = Name::default();
                name.from_network_bytes(buffer)?;
                RData::Ns(name)
            }
            QType::CNAME => {
                let mut name = Name::default();
                name.from_network_bytes(buffer)?;
                RData::Cname(name)
            }
            QType::SOA => {
                let mut mname = Name::default();
                mname.from_network_bytes(buffer)?;
                let mut rname = Name::default();
                rname.from_network_bytes(buffer)?;
                let serial = buffer.read_u32::<BigEndian>()?;
                let refresh = buffer.read_u32::<BigEndian>()?;
                let retry = buffer.read_u32::<BigEndian>()?;
                let expire = buffer.read_u32::<BigEndian>()?;
                let minimum = buffer.read_u32::<BigEndian>()?;
                RData::Soa {
                    mname,
                    rname,
                    serial,
                    refresh,
                    retry,
                    expire,
                    minimum,
                }
            }
            QType::MX => {
                let preference = buffer.read_u16::<BigEndian>()?;
                let mut exchange = Name::default();
                exchange.from_network_bytes(buffer)?;
                RData::Mx { preference, exchange }
            }
            QType::TXT => {
                let mut chunks = Vec::new();
                while buffer.position() < rdata_start + rdlength as u64 {
                    let len = buffer.read_u8()? as usize;
                    let mut chunk = vec![0u8; len];
                    buffer.read_exact(&mut chunk)?;
                    chunks.push(chunk);
                }
                RData::Txt(chunks)
            }
            _ => {
                let mut raw = vec![0u8; rdlength as usize];
                buffer.read_exact(&mut raw)?;
                RData::Unknown(raw)
            }
        };

        // Defensive: realign on the declared rdlength regardless of how many
        // bytes the specific decoder consumed (a malformed/unexpected RDATA
        // for a known type must not desynchronize the rest of the message).
        buffer.seek(SeekFrom::Start(rdata_start + rdlength as u64))?;

        Ok(rdata)
    }

    fn encode_rdata(rdata: &RData, buffer: &mut Vec<u8>) -> Result<usize> {
        match rdata {
            RData::A(addr) => {
                buffer.extend_from_slice(&addr.octets());
                Ok(4)
            }
            RData::Aaaa(addr) => {
                buffer.extend_from_slice(&addr.octets());
                Ok(16)
            }
            RData::Ns(name) => name.to_network_bytes(buffer),
            RData::Cname(name) => name.to_network_bytes(buffer),
            RData::Soa {
                mname,
                rname,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            } => {
                let mut length = mname.to_network_bytes(buffer)?;
                length += rname.to_network_bytes(buffer)?;
                buffer.write_u32::<BigEndian>(*serial)?;
                buffer.write_u32::<BigEndian>(*refresh)?;
                buffer.write_u32::<BigEndian>(*retry)?;
                buffer.write_u32::<BigEndian>(*expire)?;
                buffer.write_u32::<BigEndian>(*minimum)?;
                Ok(length + 20)
            }
            RData::Mx { preference, exchange } => {
                buffer.write_u16::<BigEndian>(*preference)?;
                Ok(2 + exchange.to_network_bytes(buffer)?)
            }
            RData::Txt(chunks) => {
                let mut length = 0usize;
                for chunk in chunks {
                    buffer.write_u8(chunk.len() as u8)?;
                    buffer.extend_from_slice(chunk);
                    length += 1 + chunk.len();
                }
                Ok(length)
            }
            RData::Unknown(raw) => {
                buffer.extend_from_slice(raw);
                Ok(raw.len())
            }
        }
    }

    /// ```
    /// use std::io::Cursor;
    /// use std::net::Ipv4Addr;
    /// use iterdns::{Name, QClass, QType};
    /// use iterdns::wire::{RData, ResourceRecord};
    ///
    /// let rr = ResourceRecord {
    ///     name: Name::from("example.com."),
    ///     rtype: QType::A,
    ///     rclass: QClass::IN,
    ///     ttl: 300,
    ///     rdata: RData::A(Ipv4Addr::new(93, 184, 216, 34)),
    /// };
    ///
    /// let mut buffer = Vec::new();
    /// rr.to_network_bytes(&mut buffer).unwrap();
    ///
    /// let mut cursor = Cursor::new(buffer.as_slice());
    /// let decoded = ResourceRecord::from_network_bytes(&mut cursor).unwrap();
    /// assert_eq!(decoded, rr);
    /// ```
    pub fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> Result<usize> {
        let mut length = self.name.to_network_bytes(buffer)?;
        length += self.rtype.to_network_bytes(buffer)?;
        length += self.rclass.to_network_bytes(buffer)?;
        buffer.write_u32::<BigEndian>(self.ttl)?;
        length += 4;

        // Reserve space for rdlength, then patch it in once rdata is known.
        let rdlength_pos = buffer.len();
        buffer.write_u16::<BigEndian>(0)?;
        length += 2;

        let rdata_start = buffer.len();
        let rdata_len = Self::encode_rdata(&self.rdata, buffer)?;
        buffer[rdlength_pos..rdlength_pos + 2].copy_from_slice(&(rdata_len as u16).to_be_bytes());
        length += buffer.len() - rdata_start;

        Ok(length)
    }

    pub fn from_network_bytes(buffer: &mut Cursor<&[u8]>) -> DNSResult<Self> {
        let mut name = Name::default();
        name.from_network_bytes(buffer)?;

        let mut rtype = QType::default();
        rtype.from_network_bytes(buffer)?;

        let mut rclass = QClass::default();
        rclass.from_network_bytes(buffer)?;

        let ttl = buffer.read_u32::<BigEndian>()?;
        let rdlength = buffer.read_u16::<BigEndian>()?;

        let rdata = Self::decode_rdata(rtype, buffer, rdlength)
            .map_err(|e| CodecError::new(&format!("decoding rdata for {}: {}", rtype, e)))?;

        Ok(ResourceRecord {
            name,
            rtype,
            rclass,
            ttl,
            rdata,
        })
    }
}
