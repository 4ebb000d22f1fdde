//! The DNS message: header, flags, question/record sections and EDNS(0).
//!
//! Generalizes the teacher's `rfc1035.rs` `DNSMessage`/`DNSPacketHeader`/
//! `DNSPacketFlags`/`DNSQuestion`/`DnsResponse`: sections become `Vec<Record>`
//! instead of a single `Option<DNSResourceRecord>` (a real message carries many
//! RRs per section), the flags word gains the AD/CD bits the teacher's
//! `DNSPacketFlags` never had, and RDATA is a real tagged union
//! (`crate::rdata::RData`) instead of a bare `rd_length` with the payload left
//! unparsed.
use std::fmt;
use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use dns_derive::{DnsEnum, DnsStruct};
use rand::Rng;

use crate::derive_enum;
use crate::error::{DnsError, DnsResult};
use crate::name::{CompressionTable, Name};
use crate::network_order::{read_bytes, ToFromNetworkOrder};
use crate::rdata::RData;

pub const MAX_UDP_PAYLOAD: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, DnsEnum)]
#[repr(u8)]
pub enum PacketType {
    Query = 0,
    Response = 1,
}
derive_enum!(PacketType, u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, DnsEnum)]
#[repr(u8)]
pub enum OpCode {
    Query = 0,
    IQuery = 1,
    Status = 2,
    Notify = 4,
    Update = 5,
    DOS = 6,
}
derive_enum!(OpCode, u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, DnsEnum)]
#[repr(u16)]
pub enum ResponseCode {
    NoError = 0,
    FormErr = 1,
    ServFail = 2,
    NXDomain = 3,
    NotImp = 4,
    Refused = 5,
    YXDomain = 6,
    YXRRSet = 7,
    NXRRSet = 8,
    NotAuth = 9,
    NotZone = 10,
    DSOTYPENI = 11,
    BADVERS = 16,
    BADKEY = 17,
    BADTIME = 18,
    BADMODE = 19,
    BADNAME = 20,
    BADALG = 21,
    BADTRUNC = 22,
    BADCOOKIE = 23,
}
derive_enum!(ResponseCode, u16);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, DnsEnum)]
#[repr(u16)]
pub enum QType {
    A = 1,
    NS = 2,
    MD = 3,
    MF = 4,
    CNAME = 5,
    SOA = 6,
    MB = 7,
    MG = 8,
    MR = 9,
    PTR = 12,
    HINFO = 13,
    MX = 15,
    TXT = 16,
    AFSDB = 18,
    RT = 21,
    NSAPPTR = 23,
    SIG = 24,
    KEY = 25,
    AAAA = 28,
    SRV = 33,
    NAPTR = 35,
    KX = 36,
    DNAME = 39,
    OPT = 41,
    DS = 43,
    SSHFP = 44,
    RRSIG = 46,
    NSEC = 47,
    DNSKEY = 48,
    NSEC3 = 50,
    NSEC3PARAM = 51,
    TLSA = 52,
    SMIMEA = 53,
    OPENPGPKEY = 61,
    SPF = 99,
    LP = 107,
    CDS = 59,
    CDNSKEY = 60,
    CAA = 257,
    AVC = 258,
    AXFR = 252,
    ANY = 255,
    TA = 32768,
    DLV = 32769,
}
derive_enum!(QType, u16);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, DnsEnum)]
#[repr(u16)]
pub enum QClass {
    IN = 1,
    CH = 3,
    HS = 4,
    ANY = 255,
}
derive_enum!(QClass, u16);

/// Header flags word (RFC 1035 §4.1.1 plus the RFC 4035 AD/CD bits spec.md
/// §4.C calls out): `QR Opcode(4) AA TC RD RA Z AD CD RCODE(4)`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    pub packet_type: PacketType,
    pub op_code: OpCode,
    pub authoritative_answer: bool,
    pub truncated: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    pub z: bool,
    pub authentic_data: bool,
    pub checking_disabled: bool,
    /// Low nibble of RCODE as carried in the header; the full extended code
    /// (with EDNS's high 8 bits prepended) lives on `Message::response_code`.
    pub response_code: ResponseCode,
}

impl Default for PacketType {
    fn default() -> Self {
        PacketType::Query
    }
}
impl Default for OpCode {
    fn default() -> Self {
        OpCode::Query
    }
}
impl Default for ResponseCode {
    fn default() -> Self {
        ResponseCode::NoError
    }
}
impl Default for QType {
    fn default() -> Self {
        QType::A
    }
}
impl Default for QClass {
    fn default() -> Self {
        QClass::IN
    }
}

impl<'a> ToFromNetworkOrder<'a> for Flags {
    fn to_network_bytes(&self, buffer: &mut Vec<u8>) -> std::io::Result<usize> {
        let mut word = (self.packet_type as u16) << 15;
        word |= (self.op_code as u16) << 11;
        word |= (self.authoritative_answer as u16) << 10;
        word |= (self.truncated as u16) << 9;
        word |= (self.recursion_desired as u16) << 8;
        word |= (self.recursion_available as u16) << 7;
        word |= (self.z as u16) << 6;
        word |= (self.authentic_data as u16) << 5;
        word |= (self.checking_disabled as u16) << 4;
        word |= (self.response_code as u16) & 0x0F;
        buffer.write_u16::<BigEndian>(word)?;
        Ok(2)
    }

    fn from_network_bytes(&mut self, buffer: &mut Cursor<&'a [u8]>) -> DnsResult<()> {
        let word = buffer.read_u16::<BigEndian>()?;
        self.packet_type = PacketType::try_from(word >> 15).map_err(|e| DnsError::new(&e))?;
        self.op_code = OpCode::try_from((word >> 11) & 0x0F).map_err(|e| DnsError::new(&e))?;
        self.authoritative_answer = (word >> 10) & 1 == 1;
        self.truncated = (word >> 9) & 1 == 1;
        self.recursion_desired = (word >> 8) & 1 == 1;
        self.recursion_available = (word >> 7) & 1 == 1;
        self.z = (word >> 6) & 1 == 1;
        self.authentic_data = (word >> 5) & 1 == 1;
        self.checking_disabled = (word >> 4) & 1 == 1;
        self.response_code = ResponseCode::try_from(word & 0x0F).map_err(|e| DnsError::new(&e))?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy, DnsStruct)]
pub struct Header {
    pub id: u16,
    pub flags: Flags,
    pub qd_count: u16,
    pub an_count: u16,
    pub ns_count: u16,
    pub ar_count: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub qname: Name,
    pub qtype: QType,
    pub qclass: QClass,
}

impl Question {
    pub fn new(qname: Name, qtype: QType, qclass: QClass) -> Self {
        Question {
            qname,
            qtype,
            qclass,
        }
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} {:?}", self.qname, self.qclass, self.qtype)
    }
}

/// One resource record: owner name, type/class/ttl and its decoded RDATA.
#[derive(Debug, Clone)]
pub struct Record {
    pub name: Name,
    pub rtype: QType,
    pub rclass: QClass,
    pub ttl: u32,
    pub rdata: RData,
}

impl Record {
    pub fn new(name: Name, rclass: QClass, ttl: u32, rdata: RData) -> Self {
        Record {
            name,
            rtype: rdata.qtype(),
            rclass,
            ttl,
            rdata,
        }
    }

    fn read(cursor: &mut Cursor<&[u8]>) -> DnsResult<Record> {
        let name = Name::read(cursor)?;
        let raw_rtype = cursor.read_u16::<BigEndian>()?;
        let rclass = read_u16_as(cursor, QClass::try_from)?;
        let ttl = cursor.read_u32::<BigEndian>()?;
        let rdlength = cursor.read_u16::<BigEndian>()?;

        let rdata_start = cursor.position();
        // A type code this crate has no `QType` variant for still must
        // round-trip (spec.md: "An unknown type decodes as an opaque byte
        // string that re-encodes identically") -- it must not fail the
        // whole message the way propagating `QType::try_from`'s error would.
        let rdata = match QType::try_from(raw_rtype) {
            Ok(known) => RData::read(cursor, known, rdlength as usize)?,
            Err(_) => RData::Unknown(raw_rtype, read_bytes(cursor, rdlength as usize)?),
        };
        let consumed = cursor.position() - rdata_start;
        if consumed != rdlength as u64 {
            return Err(DnsError::format(format!(
                "RDATA reader consumed {} bytes but RDLENGTH said {}",
                consumed, rdlength
            )));
        }

        let rtype = QType::try_from(raw_rtype).unwrap_or(QType::ANY);
        Ok(Record {
            name,
            rtype,
            rclass,
            ttl,
            rdata,
        })
    }

    fn write(
        &self,
        buffer: &mut Vec<u8>,
        table: &mut CompressionTable,
        allow_pointer: bool,
    ) -> DnsResult<usize> {
        let start = buffer.len();
        self.name.write_compressed(buffer, table, allow_pointer)?;
        // Always derive the wire type code from the RDATA, not `self.rtype`:
        // a record whose original type code had no `QType` variant still
        // carries that code in `RData::Unknown`, while `rtype` itself falls
        // back to the lossy `QType::ANY` placeholder for display/comparison.
        self.rdata.qtype_code().to_network_bytes(buffer)?;
        (self.rclass as u16).to_network_bytes(buffer)?;
        self.ttl.to_network_bytes(buffer)?;

        let rdlength_pos = buffer.len();
        buffer.write_u16::<BigEndian>(0)?; // patched below
        let rdata_start = buffer.len();
        self.rdata.write(buffer)?;
        let rdlength = (buffer.len() - rdata_start) as u16;
        buffer[rdlength_pos..rdlength_pos + 2].copy_from_slice(&rdlength.to_be_bytes());

        Ok(buffer.len() - start)
    }
}

fn read_u16_as<T>(cursor: &mut Cursor<&[u8]>, f: impl Fn(u16) -> Result<T, String>) -> DnsResult<T> {
    let raw = cursor.read_u16::<BigEndian>()?;
    f(raw).map_err(|e| DnsError::new(&e))
}

/// EDNS(0) pseudo-RR (RFC 6891), folded out of the OPT record found in the
/// additional section. `options` carries the raw `(code, data)` pairs (e.g.
/// COOKIE, RFC 7873) a server shell echoes back per spec.md §4.H.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Edns {
    pub udp_payload_size: u16,
    pub extended_rcode_high: u8,
    pub version: u8,
    pub dnssec_ok: bool,
    pub options: Vec<(u16, Vec<u8>)>,
}

/// RFC 6891 §6.1 EDNS option codes this crate knows the name of.
pub const OPT_CODE_COOKIE: u16 = 10;

/// A full DNS message: header plus the four sections. Sections are plain
/// `Vec<Record>` (the teacher's single `Option<DNSResourceRecord>` per
/// section could not represent more than one RR); `edns` is split out of
/// `additional` for convenient access, matching spec.md §4.C.
#[derive(Debug, Clone, Default)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<Record>,
    pub authorities: Vec<Record>,
    pub additionals: Vec<Record>,
    pub edns: Option<Edns>,
    /// Set when `from_bytes` ran out of buffer partway through a section
    /// (spec.md §4.C). A malformed message is still returned -- with
    /// whatever sections decoded before the buffer ran out -- but callers
    /// must not trust it for caching or DNSSEC chaining.
    pub malformed: bool,
}

impl Message {
    pub fn new_query(qname: Name, qtype: QType, qclass: QClass) -> Message {
        let mut rng = rand::thread_rng();
        let mut header = Header::default();
        header.id = rng.gen::<u16>();
        header.flags.packet_type = PacketType::Query;
        header.flags.op_code = OpCode::Query;
        header.flags.recursion_desired = true;
        header.qd_count = 1;

        Message {
            header,
            questions: vec![Question::new(qname, qtype, qclass)],
            ..Default::default()
        }
    }

    /// Response code as the full 12-bit value (spec.md §4.C): the header's
    /// low nibble combined with EDNS's extended high byte, when present.
    pub fn response_code(&self) -> u16 {
        let low = self.header.flags.response_code as u16;
        match &self.edns {
            Some(edns) => ((edns.extended_rcode_high as u16) << 4) | low,
            None => low,
        }
    }

    pub fn add_edns(&mut self, udp_payload_size: u16, dnssec_ok: bool) {
        self.edns = Some(Edns {
            udp_payload_size,
            extended_rcode_high: 0,
            version: 0,
            dnssec_ok,
            options: Vec::new(),
        });
    }

    pub fn to_bytes(&self) -> DnsResult<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut table = CompressionTable::new();

        self.header.to_network_bytes(&mut buffer)?;

        for q in &self.questions {
            // question names are never compressed (spec.md §4.C), but they
            // still seed the table for the sections that follow
            q.qname.write_compressed(&mut buffer, &mut table, false)?;
            (q.qtype as u16).to_network_bytes(&mut buffer)?;
            (q.qclass as u16).to_network_bytes(&mut buffer)?;
        }

        for r in &self.answers {
            r.write(&mut buffer, &mut table, true)?;
        }
        for r in &self.authorities {
            r.write(&mut buffer, &mut table, true)?;
        }
        for r in &self.additionals {
            r.write(&mut buffer, &mut table, true)?;
        }
        if let Some(edns) = &self.edns {
            write_opt_record(&mut buffer, edns, self.header.flags.response_code)?;
        }

        Ok(buffer)
    }

    /// Decodes a complete message and folds any OPT RR found in the
    /// additional section into `edns`. A buffer that runs out partway
    /// through a section (truncated UDP datagram, or a header count that
    /// overstates what's actually there) stops the parse at that point and
    /// returns a partial message with `malformed` set, rather than failing
    /// the whole decode (spec.md §4.C). Any other decode failure -- a bad
    /// pointer, an oversized label, an RDLENGTH mismatch -- is a genuine
    /// format error and still propagates.
    pub fn from_bytes(bytes: &[u8]) -> DnsResult<Message> {
        let mut cursor = Cursor::new(bytes);
        let mut header = Header::default();
        header.from_network_bytes(&mut cursor)?;

        let mut msg = Message {
            header,
            ..Default::default()
        };

        msg.questions.reserve(msg.header.qd_count as usize);
        for _ in 0..msg.header.qd_count {
            match read_question(&mut cursor) {
                Ok(q) => msg.questions.push(q),
                Err(e) if is_truncated(&e) => {
                    msg.malformed = true;
                    return Ok(msg);
                }
                Err(e) => return Err(e),
            }
        }

        msg.answers.reserve(msg.header.an_count as usize);
        for _ in 0..msg.header.an_count {
            match Record::read(&mut cursor) {
                Ok(r) => msg.answers.push(r),
                Err(e) if is_truncated(&e) => {
                    msg.malformed = true;
                    return Ok(msg);
                }
                Err(e) => return Err(e),
            }
        }

        msg.authorities.reserve(msg.header.ns_count as usize);
        for _ in 0..msg.header.ns_count {
            match Record::read(&mut cursor) {
                Ok(r) => msg.authorities.push(r),
                Err(e) if is_truncated(&e) => {
                    msg.malformed = true;
                    return Ok(msg);
                }
                Err(e) => return Err(e),
            }
        }

        msg.additionals.reserve(msg.header.ar_count as usize);
        for _ in 0..msg.header.ar_count {
            match Record::read(&mut cursor) {
                Ok(record) if record.rtype == QType::OPT => {
                    msg.edns = Some(parse_opt_record(&record));
                }
                Ok(record) => msg.additionals.push(record),
                Err(e) if is_truncated(&e) => {
                    msg.malformed = true;
                    return Ok(msg);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(msg)
    }
}

/// True when `err` reflects the cursor running out of bytes mid-section
/// rather than a genuinely malformed encoding (bad pointer, oversized
/// label, ...), which the lower codec layers already reject on their own.
fn is_truncated(err: &DnsError) -> bool {
    matches!(err, DnsError::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof)
}

fn read_question(cursor: &mut Cursor<&[u8]>) -> DnsResult<Question> {
    let qname = Name::read(cursor)?;
    let qtype = read_u16_as(cursor, QType::try_from)?;
    let qclass = read_u16_as(cursor, QClass::try_from)?;
    Ok(Question::new(qname, qtype, qclass))
}

fn parse_opt_record(record: &Record) -> Edns {
    // OPT's "class" field carries the requestor's UDP payload size and its
    // "ttl" field carries extended-rcode/version/flags (RFC 6891 §6.1.3).
    let class = record.rclass as u16;
    let ttl = record.ttl;
    let options = match &record.rdata {
        crate::rdata::RData::Unknown(_, raw) => parse_edns_options(raw),
        _ => Vec::new(),
    };
    Edns {
        udp_payload_size: class,
        extended_rcode_high: (ttl >> 24) as u8,
        version: (ttl >> 16) as u8,
        dnssec_ok: (ttl >> 15) & 1 == 1,
        options,
    }
}

fn parse_edns_options(raw: &[u8]) -> Vec<(u16, Vec<u8>)> {
    let mut opts = Vec::new();
    let mut cursor = Cursor::new(raw);
    loop {
        let Ok(code) = cursor.read_u16::<BigEndian>() else {
            break;
        };
        let Ok(len) = cursor.read_u16::<BigEndian>() else {
            break;
        };
        let mut data = vec![0u8; len as usize];
        if cursor.read_exact(&mut data).is_err() {
            break;
        }
        opts.push((code, data));
    }
    opts
}

fn write_opt_record(
    buffer: &mut Vec<u8>,
    edns: &Edns,
    response_code: ResponseCode,
) -> DnsResult<()> {
    Name::root().write_uncompressed(buffer)?;
    (QType::OPT as u16).to_network_bytes(buffer)?;
    edns.udp_payload_size.to_network_bytes(buffer)?;

    let mut ttl = (edns.extended_rcode_high as u32) << 24;
    ttl |= (edns.version as u32) << 16;
    ttl |= (edns.dnssec_ok as u32) << 15;
    let _ = response_code;
    ttl.to_network_bytes(buffer)?;

    let mut rdata = Vec::new();
    for (code, data) in &edns.options {
        rdata.write_u16::<BigEndian>(*code)?;
        rdata.write_u16::<BigEndian>(data.len() as u16)?;
        rdata.extend_from_slice(data);
    }
    (rdata.len() as u16).to_network_bytes(buffer)?;
    buffer.extend_from_slice(&rdata);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_round_trip() {
        let flags = Flags {
            packet_type: PacketType::Response,
            op_code: OpCode::Query,
            authoritative_answer: true,
            truncated: false,
            recursion_desired: true,
            recursion_available: true,
            z: false,
            authentic_data: true,
            checking_disabled: false,
            response_code: ResponseCode::NXDomain,
        };
        let (buf, len) = crate::test_to_network!(flags);
        assert_eq!(len, 2);

        let mut cursor = Cursor::new(buf.as_slice());
        let mut decoded = Flags::default();
        decoded.from_network_bytes(&mut cursor).unwrap();
        assert_eq!(decoded, flags);
    }

    #[test]
    fn query_round_trip_through_bytes() {
        let msg = Message::new_query(Name::parse("example.com.").unwrap(), QType::A, QClass::IN);
        let bytes = msg.to_bytes().unwrap();
        let decoded = Message::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.questions.len(), 1);
        assert_eq!(decoded.questions[0].qname, msg.questions[0].qname);
        assert_eq!(decoded.questions[0].qtype, QType::A);
        assert_eq!(decoded.header.id, msg.header.id);
    }

    #[test]
    fn edns_round_trip() {
        let mut msg = Message::new_query(Name::parse("example.com.").unwrap(), QType::A, QClass::IN);
        msg.add_edns(4096, true);
        msg.header.ar_count = 1;
        let bytes = msg.to_bytes().unwrap();
        let decoded = Message::from_bytes(&bytes).unwrap();
        let edns = decoded.edns.unwrap();
        assert_eq!(edns.udp_payload_size, 4096);
        assert!(edns.dnssec_ok);
    }

    #[test]
    fn truncated_buffer_decodes_partial_message_and_sets_malformed() {
        let mut msg = Message::new_query(Name::parse("example.com.").unwrap(), QType::A, QClass::IN);
        msg.header.flags.packet_type = PacketType::Response;
        msg.answers.push(Record::new(
            Name::parse("example.com.").unwrap(),
            QClass::IN,
            300,
            RData::A(std::net::Ipv4Addr::new(1, 2, 3, 4)),
        ));
        // Claim a second answer that was never actually written.
        msg.header.an_count = 2;

        let bytes = msg.to_bytes().unwrap();
        let decoded = Message::from_bytes(&bytes).unwrap();
        assert!(decoded.malformed);
        assert_eq!(decoded.questions.len(), 1);
        assert_eq!(decoded.answers.len(), 1);
    }

    #[test]
    fn unrecognized_type_code_decodes_message_opaquely() {
        let mut msg = Message::new_query(Name::parse("example.com.").unwrap(), QType::A, QClass::IN);
        msg.header.flags.packet_type = PacketType::Response;
        msg.answers.push(Record::new(
            Name::parse("example.com.").unwrap(),
            QClass::IN,
            300,
            RData::Unknown(65280, vec![0xde, 0xad, 0xbe, 0xef]),
        ));
        msg.header.an_count = 1;

        let bytes = msg.to_bytes().unwrap();
        let decoded = Message::from_bytes(&bytes).unwrap();
        assert!(!decoded.malformed);
        assert_eq!(decoded.answers.len(), 1);
        assert_eq!(decoded.answers[0].rdata, RData::Unknown(65280, vec![0xde, 0xad, 0xbe, 0xef]));

        // round-trips back out with the original type code, not a
        // substitute like QType::ANY (255).
        let reencoded = decoded.to_bytes().unwrap();
        assert_eq!(reencoded, bytes);
    }
}
