//! All functions/traits to convert DNS structures to network order and back.
//!
//! This is the teacher crate's `ToFromNetworkOrder` trait, kept verbatim in
//! spirit (`to_network_bytes(&self, &mut Vec<u8>) -> io::Result<usize>` /
//! `from_network_bytes(&mut self, &mut Cursor<&[u8]>) -> DnsResult<()>`) but
//! with the blanket `Vec<T>`/`Option<T>` impls removed: the teacher's blanket
//! `Vec<T>` reader consumed bytes until the cursor's *entire backing buffer*
//! was exhausted, which only happens to work when the vector is the last
//! field of the last structure in a message. RDATA vectors (TXT character
//! strings, NSEC3 salt, DNSKEY public key, ...) are always bounded by an
//! RDLENGTH or by an explicit counted loop instead, so every such field reads
//! itself with ordinary loops in the owning type's impl rather than relying on
//! a generic collection reader.
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Result};

use crate::error::DnsResult;

/// Converts a structure to/from DNS network order (RFC 1035 §2.3.2: all
/// multi-octet values are big-endian).
pub trait ToFromNetworkOrder<'a> {
    /// Appends `self`'s wire representation to `buffer`, returning the number
    /// of bytes written.
    fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> Result<usize>;

    /// Reads `self`'s wire representation from `buffer`, advancing its
    /// cursor position.
    fn from_network_bytes(&mut self, buffer: &mut Cursor<&'a [u8]>) -> DnsResult<()>;
}

impl<'a> ToFromNetworkOrder<'a> for u8 {
    /// ```
    /// use dnslib::network_order::ToFromNetworkOrder;
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
    /// use dnslib::network_order::ToFromNetworkOrder;
    ///
    /// let b = vec![0xFF];
    /// let mut buffer = Cursor::new(b.as_slice());
    /// let mut v = 0u8;
    /// assert!(v.from_network_bytes(&mut buffer).is_ok());
    /// assert_eq!(v, 255);
    /// ```
    fn from_network_bytes(&mut self, buffer: &mut Cursor<&'a [u8]>) -> DnsResult<()> {
        *self = buffer.read_u8()?;
        Ok(())
    }
}

impl<'a> ToFromNetworkOrder<'a> for u16 {
    /// ```
    /// use dnslib::network_order::ToFromNetworkOrder;
    ///
    /// let mut buffer: Vec<u8> = Vec::new();
    /// assert!(0x1234_u16.to_network_bytes(&mut buffer).is_ok());
    /// assert_eq!(buffer, &[0x12, 0x34]);
    /// ```
    fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> Result<usize> {
        buffer.write_u16::<BigEndian>(*self)?;
        Ok(2)
    }

    fn from_network_bytes(&mut self, buffer: &mut Cursor<&'a [u8]>) -> DnsResult<()> {
        *self = buffer.read_u16::<BigEndian>()?;
        Ok(())
    }
}

impl<'a> ToFromNetworkOrder<'a> for u32 {
    fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> Result<usize> {
        buffer.write_u32::<BigEndian>(*self)?;
        Ok(4)
    }

    fn from_network_bytes(&mut self, buffer: &mut Cursor<&'a [u8]>) -> DnsResult<()> {
        *self = buffer.read_u32::<BigEndian>()?;
        Ok(())
    }
}

impl<'a> ToFromNetworkOrder<'a> for i32 {
    fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> Result<usize> {
        buffer.write_i32::<BigEndian>(*self)?;
        Ok(4)
    }

    fn from_network_bytes(&mut self, buffer: &mut Cursor<&'a [u8]>) -> DnsResult<()> {
        *self = buffer.read_i32::<BigEndian>()?;
        Ok(())
    }
}

impl<'a, const N: usize> ToFromNetworkOrder<'a> for [u8; N] {
    /// ```
    /// use dnslib::network_order::ToFromNetworkOrder;
    ///
    /// let mut buffer: Vec<u8> = Vec::new();
    /// assert_eq!([0xFFu8; 4].to_network_bytes(&mut buffer).unwrap(), 4);
    /// assert_eq!(buffer, &[0xFF; 4]);
    /// ```
    fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> Result<usize> {
        buffer.extend_from_slice(self);
        Ok(N)
    }

    fn from_network_bytes(&mut self, buffer: &mut Cursor<&'a [u8]>) -> DnsResult<()> {
        buffer.read_exact(self)?;
        Ok(())
    }
}

/// Reads exactly `len` raw bytes off `buffer` into a fresh `Vec<u8>`. Used by
/// every RDATA reader that needs to consume "the rest of RDLENGTH" or a
/// counted byte string, in place of the teacher's unsound blanket `Vec<T>`
/// impl.
pub fn read_bytes<'a>(buffer: &mut Cursor<&'a [u8]>, len: usize) -> DnsResult<Vec<u8>> {
    let mut v = vec![0u8; len];
    buffer.read_exact(&mut v)?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u16_round_trip() {
        let (buf, len) = crate::test_to_network!(0x1234u16);
        assert_eq!(len, 2);
        assert_eq!(buf, vec![0x12, 0x34]);

        let mut cursor = Cursor::new(buf.as_slice());
        let mut v = 0u16;
        v.from_network_bytes(&mut cursor).unwrap();
        assert_eq!(v, 0x1234);
    }

    #[test]
    fn fixed_array_round_trip() {
        let a: [u8; 4] = [1, 2, 3, 4];
        let (buf, len) = crate::test_to_network!(a);
        assert_eq!(len, 4);

        let mut cursor = Cursor::new(buf.as_slice());
        let mut v = [0u8; 4];
        v.from_network_bytes(&mut cursor).unwrap();
        assert_eq!(v, a);
    }

    #[test]
    fn read_bytes_is_bounded() {
        let data = vec![1u8, 2, 3, 4, 5];
        let mut cursor = Cursor::new(data.as_slice());
        let v = read_bytes(&mut cursor, 3).unwrap();
        assert_eq!(v, vec![1, 2, 3]);
        assert_eq!(cursor.position(), 3);
    }
}
