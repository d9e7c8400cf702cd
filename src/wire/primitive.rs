//! `ToFromNetworkOrder` impls for the primitive integer types a DNS message
//! is built out of.
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Result};

use crate::error::DNSResult;

use super::ToFromNetworkOrder;

impl<'a> ToFromNetworkOrder<'a> for u8 {
    /// ```
    /// use iterdns::wire::ToFromNetworkOrder;
    ///
    /// let mut buffer: Vec<u8> = Vec::new();
    /// assert!(255_u8.to_network_bytes(&mut buffer).is_ok());
    /// assert_eq!(buffer, &[0xFF]);
    /// ```
    fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> Result<usize> {
        buffer.write_u8(*self)?;
        Ok(1)
    }

    /// ```
    /// use std::io::Cursor;
    /// use iterdns::wire::ToFromNetworkOrder;
    ///
    /// let b = vec![0xFF];
    /// let mut cursor = Cursor::new(b.as_slice());
    /// let mut v = 0u8;
    /// assert!(v.from_network_bytes(&mut cursor).is_ok());
    /// assert_eq!(v, 255);
    /// ```
    fn from_network_bytes(&mut self, buffer: &mut Cursor<&'a [u8]>) -> DNSResult<()> {
        *self = buffer.read_u8()?;
        Ok(())
    }
}

impl<'a> ToFromNetworkOrder<'a> for u16 {
    /// ```
    /// use iterdns::wire::ToFromNetworkOrder;
    ///
    /// let mut buffer: Vec<u8> = Vec::new();
    /// assert!(0x1234_u16.to_network_bytes(&mut buffer).is_ok());
    /// assert_eq!(buffer, &[0x12, 0x34]);
    /// ```
    fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> Result<usize> {
        buffer.write_u16::<BigEndian>(*self)?;
        Ok(2)
    }

    /// ```
    /// use std::io::Cursor;
    /// use iterdns::wire::ToFromNetworkOrder;
    ///
    /// let b = vec![0x12, 0x34];
    /// let mut cursor = Cursor::new(b.as_slice());
    /// let mut v = 0u16;
    /// assert!(v.from_network_bytes(&mut cursor).is_ok());
    /// assert_eq!(v, 0x1234);
    /// ```
    fn from_network_bytes(&mut self, buffer: &mut Cursor<&'a [u8]>) -> DNSResult<()> {
        *self = buffer.read_u16::<BigEndian>()?;
        Ok(())
    }
}

impl<'a> ToFromNetworkOrder<'a> for u32 {
    fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> Result<usize> {
        buffer.write_u32::<BigEndian>(*self)?;
        Ok(4)
    }

    fn from_network_bytes(&mut self, buffer: &mut Cursor<&'a [u8]>) -> DNSResult<()> {
        *self = buffer.read_u32::<BigEndian>()?;
        Ok(())
    }
}
