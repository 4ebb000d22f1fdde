//! The DNS server shell (spec.md §4.H): a thin listener that validates
//! incoming requests, asks the `Resolver` to do the actual work, and shapes
//! the answer back onto the wire within the UDP/TCP size limits.
//!
//! The teacher's `dnsquery` only ever sent one query and printed the reply;
//! it never listened for one. This module is new, but still built out of
//! the teacher's `tokio::net::{UdpSocket, TcpStream}` + `log` idiom that
//! `transport.rs` already established for the client side.
use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, error, warn};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};

use crate::error::DnsResult;
use crate::message::{Message, OpCode, PacketType, QType, ResponseCode};
use crate::rdata::RData;
use crate::resolver::Resolver;

/// Maximum reply size offered to a UDP client without EDNS (RFC 1035
/// §4.2.1); replies that don't fit here are truncated unless the client
/// advertised a larger buffer via EDNS.
const CLASSIC_UDP_LIMIT: usize = 512;

/// A recursive DNS server shell wrapping a `Resolver`. `authoritative`
/// distinguishes a pure recursive forwarder (RA=1, AA=0) from a shell
/// fronting locally authoritative data (AA=1) -- spec.md §4.H leaves the
/// authoritative case as future work, so this crate only ever answers RA=1.
pub struct Server {
    resolver: Arc<Resolver>,
}

impl Server {
    pub fn new(resolver: Arc<Resolver>) -> Self {
        Server { resolver }
    }

    pub async fn run_udp(&self, bind_addr: SocketAddr) -> DnsResult<()> {
        let socket = Arc::new(UdpSocket::bind(bind_addr).await?);
        debug!("server: listening for UDP on {}", bind_addr);

        let mut buf = vec![0u8; 65535];
        loop {
            let (n, peer) = match socket.recv_from(&mut buf).await {
                Ok(v) => v,
                Err(e) => {
                    warn!("server: UDP recv failed: {}", e);
                    continue;
                }
            };

            let request_bytes = buf[..n].to_vec();
            let resolver = self.resolver.clone();
            let socket = socket.clone();
            tokio::spawn(async move {
                let response = handle(&resolver, &request_bytes).await;
                let fitted = fit_and_truncate(response, CLASSIC_UDP_LIMIT);
                match fitted.to_bytes() {
                    Ok(bytes) => {
                        if let Err(e) = socket.send_to(&bytes, peer).await {
                            warn!("server: UDP send to {} failed: {}", peer, e);
                        }
                    }
                    Err(e) => error!("server: failed to encode response for {}: {}", peer, e),
                }
            });
        }
    }

    pub async fn run_tcp(&self, bind_addr: SocketAddr) -> DnsResult<()> {
        let listener = TcpListener::bind(bind_addr).await?;
        debug!("server: listening for TCP on {}", bind_addr);

        loop {
            let (mut stream, peer) = match listener.accept().await {
                Ok(v) => v,
                Err(e) => {
                    warn!("server: TCP accept failed: {}", e);
                    continue;
                }
            };

            let resolver = self.resolver.clone();
            tokio::spawn(async move {
                loop {
                    let mut len_buf = [0u8; 2];
                    if stream.read_exact(&mut len_buf).await.is_err() {
                        break;
                    }
                    let len = u16::from_be_bytes(len_buf) as usize;
                    let mut body = vec![0u8; len];
                    if stream.read_exact(&mut body).await.is_err() {
                        break;
                    }

                    let response = handle(&resolver, &body).await;
                    // TCP has no classic 512-byte ceiling (RFC 1035 §4.2.2);
                    // still enforce the 65535-byte wire limit the 2-byte
                    // length prefix can represent.
                    let fitted = fit_and_truncate(response, u16::MAX as usize);
                    let Ok(bytes) = fitted.to_bytes() else {
                        break;
                    };

                    let mut framed = Vec::with_capacity(2 + bytes.len());
                    framed.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
                    framed.extend_from_slice(&bytes);
                    if stream.write_all(&framed).await.is_err() {
                        break;
                    }
                }
                debug!("server: TCP connection from {} closed", peer);
            });
        }
    }
}

/// Validates, resolves and shapes one request into a response message.
async fn handle(resolver: &Resolver, request_bytes: &[u8]) -> Message {
    let request = match Message::from_bytes(request_bytes) {
        Ok(m) => m,
        Err(_) => return error_response(None, ResponseCode::FormErr),
    };

    if let Err(rcode) = validate_request(&request) {
        return error_response(Some(&request), rcode);
    }

    let question = request.questions[0].clone();
    let do_bit = request.edns.as_ref().map(|e| e.dnssec_ok).unwrap_or(false);

    let mut response = match resolver.resolve(question).await {
        Ok(m) => m,
        Err(e) => {
            debug!("server: resolve failed: {}", e);
            return error_response(Some(&request), e.to_rcode());
        }
    };

    response.header.id = request.header.id;
    if !do_bit {
        strip_rrsigs(&mut response);
    }
    if let Some(client_edns) = &request.edns {
        response.add_edns(4096, do_bit);
        if let Some(resp_edns) = response.edns.as_mut() {
            resp_edns.options = client_edns
                .options
                .iter()
                .filter(|(code, _)| *code == crate::message::OPT_CODE_COOKIE)
                .cloned()
                .collect();
        }
    } else {
        response.edns = None;
    }

    response
}

/// Request rejection rules (spec.md §4.H): a well-formed query has QR=0,
/// RCODE=0, exactly one question and empty answer/authority sections.
fn validate_request(request: &Message) -> Result<(), ResponseCode> {
    if request.malformed {
        return Err(ResponseCode::FormErr);
    }
    if request.header.flags.packet_type != PacketType::Query {
        return Err(ResponseCode::FormErr);
    }
    if request.header.flags.op_code != OpCode::Query {
        return Err(ResponseCode::NotImp);
    }
    if request.header.flags.response_code != ResponseCode::NoError {
        return Err(ResponseCode::FormErr);
    }
    if request.questions.len() != 1 {
        return Err(ResponseCode::FormErr);
    }
    if !request.answers.is_empty() || !request.authorities.is_empty() {
        return Err(ResponseCode::FormErr);
    }
    Ok(())
}

/// Builds a minimal error response, echoing the question when one could be
/// salvaged from the request (spec.md §4.H: malformed requests get an
/// empty-question FORMERR).
fn error_response(request: Option<&Message>, rcode: ResponseCode) -> Message {
    let mut response = Message::default();
    response.header.flags.packet_type = PacketType::Response;
    response.header.flags.response_code = rcode;
    response.header.flags.recursion_available = true;

    if let Some(request) = request {
        response.header.id = request.header.id;
        response.header.flags.recursion_desired = request.header.flags.recursion_desired;
        if request.questions.len() == 1 {
            response.questions = request.questions.clone();
            response.header.qd_count = 1;
        }
    }
    response
}

/// Strips RRSIGs from every section when the client did not set the DNSSEC
/// OK bit (spec.md §4.H): a non-DNSSEC-aware resolver should never see
/// signatures it cannot validate.
fn strip_rrsigs(message: &mut Message) {
    message.answers.retain(|r| !matches!(r.rdata, RData::Rrsig(_)));
    message.authorities.retain(|r| !matches!(r.rdata, RData::Rrsig(_)));
    message.additionals.retain(|r| !matches!(r.rdata, RData::Rrsig(_)));
    message.header.an_count = message.answers.len() as u16;
    message.header.ns_count = message.authorities.len() as u16;
    message.header.ar_count = message.additionals.len() as u16;
}

/// Shrinks `message` to fit within `limit` bytes: first drops additional
/// records (keeping OPT), then authority records, setting TC=1 only if the
/// answer section itself still doesn't fit (spec.md §4.C's encoder-overflow
/// behavior, reused here for the server's own outgoing replies).
fn fit_and_truncate(mut message: Message, limit: usize) -> Message {
    if message.to_bytes().map(|b| b.len() <= limit).unwrap_or(false) {
        return message;
    }

    message.additionals.retain(|r| r.rtype == QType::OPT);
    message.header.ar_count = message.additionals.len() as u16;
    if message.to_bytes().map(|b| b.len() <= limit).unwrap_or(false) {
        return message;
    }

    message.authorities.clear();
    message.header.ns_count = 0;
    if message.to_bytes().map(|b| b.len() <= limit).unwrap_or(false) {
        return message;
    }

    message.answers.clear();
    message.header.an_count = 0;
    message.header.flags.truncated = true;
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{QClass, Record};
    use crate::name::Name;
    use std::net::Ipv4Addr;

    #[test]
    fn validate_rejects_non_query() {
        let mut m = Message::new_query(Name::parse("example.com.").unwrap(), QType::A, QClass::IN);
        m.header.flags.packet_type = PacketType::Response;
        assert_eq!(validate_request(&m), Err(ResponseCode::FormErr));
    }

    #[test]
    fn validate_rejects_nonempty_answer_section() {
        let mut m = Message::new_query(Name::parse("example.com.").unwrap(), QType::A, QClass::IN);
        m.answers.push(Record::new(
            Name::parse("example.com.").unwrap(),
            QClass::IN,
            300,
            RData::A(Ipv4Addr::new(1, 2, 3, 4)),
        ));
        assert_eq!(validate_request(&m), Err(ResponseCode::FormErr));
    }

    #[test]
    fn validate_accepts_well_formed_query() {
        let m = Message::new_query(Name::parse("example.com.").unwrap(), QType::A, QClass::IN);
        assert!(validate_request(&m).is_ok());
    }

    #[test]
    fn error_response_echoes_single_question() {
        let request = Message::new_query(Name::parse("example.com.").unwrap(), QType::A, QClass::IN);
        let response = error_response(Some(&request), ResponseCode::ServFail);
        assert_eq!(response.header.flags.response_code, ResponseCode::ServFail);
        assert_eq!(response.questions.len(), 1);
        assert_eq!(response.header.id, request.header.id);
    }

    #[test]
    fn strip_rrsigs_removes_signatures_only() {
        let mut message = Message::default();
        message.answers.push(Record::new(
            Name::parse("example.com.").unwrap(),
            QClass::IN,
            300,
            RData::A(Ipv4Addr::new(1, 2, 3, 4)),
        ));
        message.answers.push(Record::new(
            Name::parse("example.com.").unwrap(),
            QClass::IN,
            300,
            RData::Rrsig(crate::rdata::Rrsig {
                type_covered: QType::A as u16,
                algorithm: 8,
                labels: 2,
                original_ttl: 300,
                expiration: 0,
                inception: 0,
                key_tag: 0,
                signer_name: Name::root(),
                signature: vec![],
            }),
        ));
        strip_rrsigs(&mut message);
        assert_eq!(message.answers.len(), 1);
        assert!(matches!(message.answers[0].rdata, RData::A(_)));
    }

    #[test]
    fn fit_and_truncate_sets_tc_when_still_oversized() {
        let mut message = Message::new_query(Name::parse("example.com.").unwrap(), QType::TXT, QClass::IN);
        for _ in 0..200 {
            message.answers.push(Record::new(
                Name::parse("example.com.").unwrap(),
                QClass::IN,
                300,
                RData::Txt(vec![vec![b'x'; 200]]),
            ));
        }
        message.header.an_count = message.answers.len() as u16;
        let fitted = fit_and_truncate(message, CLASSIC_UDP_LIMIT);
        assert!(fitted.header.flags.truncated);
        assert!(fitted.answers.is_empty());
    }
}
