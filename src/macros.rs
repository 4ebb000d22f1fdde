//! Small helper macros in the teacher crate's style: `derive_enum!` hand-rolls
//! `ToFromNetworkOrder` for a wire-level numeric enum (used where `DnsEnum`'s
//! struct-field derive doesn't apply, i.e. top-level free-standing enums), and
//! `test_from_network!`/`test_to_network!` are the fixture helpers every codec
//! test in this crate is built on, exactly as in the teacher's `rfc1035.rs`
//! tests.

/// Implements `ToFromNetworkOrder` for a unit-only enum that already derives
/// `DnsEnum` (so `TryFrom<$repr>` exists), wire-encoded as a single `$repr`.
#[macro_export]
macro_rules! derive_enum {
    ($t:ty, u8) => {
        impl<'a> $crate::network_order::ToFromNetworkOrder<'a> for $t {
            fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
                use byteorder::WriteBytesExt;
                buffer.write_u8(*self as u8)?;
                Ok(1)
            }

            fn from_network_bytes(
                &mut self,
                buffer: &mut std::io::Cursor<&'a [u8]>,
            ) -> $crate::error::DnsResult<()> {
                use byteorder::ReadBytesExt;
                let value = buffer.read_u8()?;
                *self = <$t>::try_from(value).map_err(|e| $crate::error::DnsError::new(&e))?;
                Ok(())
            }
        }
    };

    ($t:ty, u16) => {
        impl<'a> $crate::network_order::ToFromNetworkOrder<'a> for $t {
            fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
                use byteorder::{BigEndian, WriteBytesExt};
                buffer.write_u16::<BigEndian>(*self as u16)?;
                Ok(2)
            }

            fn from_network_bytes(
                &mut self,
                buffer: &mut std::io::Cursor<&'a [u8]>,
            ) -> $crate::error::DnsResult<()> {
                use byteorder::{BigEndian, ReadBytesExt};
                let value = buffer.read_u16::<BigEndian>()?;
                *self = <$t>::try_from(value).map_err(|e| $crate::error::DnsError::new(&e))?;
                Ok(())
            }
        }
    };
}

/// Builds a value of type `$t` by reading the hex dump fixture `$slice`
/// through `ToFromNetworkOrder::from_network_bytes`.
#[macro_export]
macro_rules! test_from_network {
    ($slice:expr, $t:ty) => {{
        let s = $crate::util::get_sample_slice($slice);
        let mut buffer = std::io::Cursor::new(s.as_slice());
        let mut v = <$t>::default();
        $crate::network_order::ToFromNetworkOrder::from_network_bytes(&mut v, &mut buffer)
            .unwrap();
        v
    }};
}

/// Encodes `$data` and returns `(bytes, length)`.
#[macro_export]
macro_rules! test_to_network {
    ($data:expr) => {{
        let mut buffer: Vec<u8> = Vec::new();
        let bytes_written =
            $crate::network_order::ToFromNetworkOrder::to_network_bytes(&$data, &mut buffer)
                .unwrap();
        (buffer, bytes_written)
    }};
}

/// Pretty-prints a byte buffer either as hex (`"X"`) or as ASCII with
/// non-printable bytes replaced by `.` (`"C"`), for `log::debug!` call sites.
#[macro_export]
macro_rules! format_buffer {
    ("X", $buf:expr) => {{
        $buf.iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ")
    }};
    ("C", $buf:expr) => {{
        $buf.iter()
            .map(|&b| {
                if b.is_ascii_graphic() || b == b' ' {
                    b as char
                } else {
                    '.'
                }
            })
            .collect::<String>()
    }};
}
