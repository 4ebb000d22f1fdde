//! RDATA payload structs for the DNSSEC record types (RFC 4034 §2-4, RFC
//! 5155 §3-4, RFC 6698 §2). Split out of `rdata/mod.rs` purely so the
//! signature/key/proof shapes that `dnssec.rs` verifies against sit in one
//! place next to each other.
use crate::name::Name;

#[derive(Debug, Clone, PartialEq)]
pub struct Ds {
    pub key_tag: u16,
    pub algorithm: u8,
    pub digest_type: u8,
    pub digest: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dnskey {
    pub flags: u16,
    pub protocol: u8,
    pub algorithm: u8,
    pub public_key: Vec<u8>,
}

impl Dnskey {
    pub const ZONE_KEY_FLAG: u16 = 0x0100;
    pub const SECURE_ENTRY_POINT_FLAG: u16 = 0x0001;

    pub fn is_zone_key(&self) -> bool {
        self.flags & Self::ZONE_KEY_FLAG != 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rrsig {
    pub type_covered: u16,
    pub algorithm: u8,
    pub labels: u8,
    pub original_ttl: u32,
    pub expiration: u32,
    pub inception: u32,
    pub key_tag: u16,
    pub signer_name: Name,
    pub signature: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Nsec {
    pub next_domain: Name,
    pub type_bitmap: Vec<u16>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Nsec3 {
    pub hash_algorithm: u8,
    pub flags: u8,
    pub iterations: u16,
    pub salt: Vec<u8>,
    pub next_hashed_owner: Vec<u8>,
    pub type_bitmap: Vec<u16>,
}

impl Nsec3 {
    pub const OPT_OUT_FLAG: u8 = 0x01;

    pub fn opt_out(&self) -> bool {
        self.flags & Self::OPT_OUT_FLAG != 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Nsec3param {
    pub hash_algorithm: u8,
    pub flags: u8,
    pub iterations: u16,
    pub salt: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tlsa {
    pub cert_usage: u8,
    pub selector: u8,
    pub matching_type: u8,
    pub cert_association: Vec<u8>,
}
