//! A dedicated error type for every layer of the crate: wire codec, transport,
//! DNSSEC verification and the recursive resolver state machine.
//!
//! The shape follows the teacher crate's original `DNSError`: a flat enum with
//! `From` conversions for the lower-level error types it wraps, rather than
//! `thiserror`/`anyhow`. Variants named in spec.md §7 (`FormatError`,
//! `Timeout`, `Cancelled`, ...) are added alongside the wire-level variants the
//! teacher already had (`Io`, `FromUtf8`, `Utf8`, `LoggerError`).
use std::fmt;
use std::io;
use std::str;

use crate::message::ResponseCode;

#[derive(Debug)]
pub enum DnsError {
    // --- wire / codec failures (teacher's original variants) ---
    Io(io::Error),
    FromUtf8(std::string::FromUtf8Error),
    Utf8(str::Utf8Error),
    LoggerError(log::SetLoggerError),
    AddrParse(std::net::AddrParseError),
    Dns(String),
    Internal(InternalError),

    // --- spec.md §7 error kinds ---
    /// Malformed wire input at any codec layer.
    FormatError(String),
    /// No response within the per-attempt timeout after max retries.
    Timeout,
    /// Caller cancelled the lookup.
    Cancelled,
    /// QR bit not set on a received message.
    NotResponse,
    /// Echoed question does not match the original.
    BadQuestion,
    /// Response opcode is not QUERY.
    BadOpcode,
    /// TCP response with TC set, or UDP -> TCP retry still truncated.
    BadTruncation,
    /// Response delegates to a zone that does not cover the queried name.
    LameServer,
    /// DNSSEC chain verification came back Bogus.
    BadSignature,
    /// CNAME/DNAME chain revisited a name already seen.
    AliasLoop,
    /// A synthesized name (DNAME target, reverse-pointer name, ...) is invalid.
    BadName(String),
    /// Unable to resolve glue for a delegated NS.
    NoAuthority,
    /// `hops` would exceed `max_referrals`.
    TooManyReferrals,
    /// DNSSEC algorithm recognized but not implemented (e.g. Ed448).
    UnsupportedAlgorithm(u8),
    /// No server in the current authority answered after `max_retries`.
    NoServersAvailable,
}

/// Lower-level internal invariants the wire codec enforces directly.
#[derive(Debug)]
pub enum InternalError {
    DnsDomainNameTooLong,
    DnsLabelTooLong,
    EmptyDomainName,
    PointerLoop,
    PointerOutOfRange,
    TruncatedLabel,
    NonAsciiByte,
    InvalidEscape,
}

/// A specific custom `Result` for all functions.
pub type DnsResult<T> = Result<T, DnsError>;

impl DnsError {
    pub fn new(s: &str) -> Self {
        DnsError::Dns(String::from(s))
    }

    pub fn format(s: impl Into<String>) -> Self {
        DnsError::FormatError(s.into())
    }

    /// Maps an error kind onto the rcode the DNS server shell should answer
    /// with when it cannot structurally represent the failure any other way.
    /// Per spec.md §7: "SERVFAIL for everything not structurally representable".
    pub fn to_rcode(&self) -> ResponseCode {
        match self {
            DnsError::FormatError(_) => ResponseCode::FormErr,
            DnsError::BadQuestion
            | DnsError::NotResponse
            | DnsError::BadOpcode
            | DnsError::Internal(_) => ResponseCode::FormErr,
            _ => ResponseCode::ServFail,
        }
    }
}

impl fmt::Display for DnsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DnsError::Io(e) => write!(f, "I/O error: {}", e),
            DnsError::FromUtf8(e) => write!(f, "invalid UTF-8: {}", e),
            DnsError::Utf8(e) => write!(f, "invalid UTF-8: {}", e),
            DnsError::LoggerError(e) => write!(f, "logger error: {}", e),
            DnsError::AddrParse(e) => write!(f, "invalid address: {}", e),
            DnsError::Dns(s) => write!(f, "{}", s),
            DnsError::Internal(e) => write!(f, "internal error: {:?}", e),
            DnsError::FormatError(s) => write!(f, "format error: {}", s),
            DnsError::Timeout => write!(f, "timeout waiting for a response"),
            DnsError::Cancelled => write!(f, "lookup cancelled"),
            DnsError::NotResponse => write!(f, "received message has QR=0"),
            DnsError::BadQuestion => write!(f, "response question does not match request"),
            DnsError::BadOpcode => write!(f, "response opcode is not QUERY"),
            DnsError::BadTruncation => write!(f, "truncated response over TCP"),
            DnsError::LameServer => write!(f, "lame delegation"),
            DnsError::BadSignature => write!(f, "DNSSEC validation failed"),
            DnsError::AliasLoop => write!(f, "CNAME/DNAME chain loop detected"),
            DnsError::BadName(s) => write!(f, "bad name: {}", s),
            DnsError::NoAuthority => write!(f, "unable to resolve glue for delegated NS"),
            DnsError::TooManyReferrals => write!(f, "too many referrals"),
            DnsError::UnsupportedAlgorithm(a) => write!(f, "unsupported DNSSEC algorithm {}", a),
            DnsError::NoServersAvailable => write!(f, "no server answered the query"),
        }
    }
}

impl std::error::Error for DnsError {}

impl From<io::Error> for DnsError {
    fn from(err: io::Error) -> Self {
        DnsError::Io(err)
    }
}

impl From<String> for DnsError {
    fn from(err: String) -> Self {
        DnsError::Dns(err)
    }
}

impl From<std::string::FromUtf8Error> for DnsError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        DnsError::FromUtf8(err)
    }
}

impl From<str::Utf8Error> for DnsError {
    fn from(err: str::Utf8Error) -> Self {
        DnsError::Utf8(err)
    }
}

impl From<log::SetLoggerError> for DnsError {
    fn from(err: log::SetLoggerError) -> Self {
        DnsError::LoggerError(err)
    }
}

impl From<std::net::AddrParseError> for DnsError {
    fn from(err: std::net::AddrParseError) -> Self {
        DnsError::AddrParse(err)
    }
}

impl From<InternalError> for DnsError {
    fn from(err: InternalError) -> Self {
        DnsError::Internal(err)
    }
}
