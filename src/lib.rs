//! A DNS wire codec, response cache and iterative recursive resolver.
//!
//! Layered the way the teacher crate was laid out (`network_order` for the
//! wire-order trait, `rfc1035`-style types split across `name`/`message`/
//! `rdata`, `error` for the crate-wide error type) but grown into the pieces
//! a resolver needs that a one-shot query tool did not: a TTL-aware
//! `cache`, a `transport` layer with retry/fallback, `dnssec` chain
//! validation and the `resolver` state machine itself, plus a thin
//! `server` shell and `config` for the pieces that bind them together.
#[macro_use]
pub mod macros;

pub mod error;
pub mod util;
pub mod network_order;
pub mod name;
pub mod message;
pub mod rdata;
pub mod cache;
pub mod dnssec;
pub mod transport;
pub mod resolver;
pub mod server;
pub mod config;

pub use error::{DnsError, DnsResult};
