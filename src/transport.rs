//! UDP/TCP transport with the retry, TCP-fallback and response-validation
//! rules of spec.md §4.D.
//!
//! The teacher's `dnsquery::main` opened one `std::net::UdpSocket`, sent one
//! datagram and read one reply -- no retries, no TCP, no validation beyond
//! "the rcode wasn't an error". This module generalizes that single
//! round-trip into the full state machine: per-attempt timeout, UDP->TCP
//! fallback on truncation, EDNS-stripped retry on FORMERR/NOTIMP/SERVFAIL,
//! and rotation across the authority's candidate endpoints. Grounded on
//! `tokio::net::{UdpSocket, TcpStream}` (already pulled in via the
//! teacher's `tokio = { features = ["full"] }` but never used) and
//! `tokio::time::timeout` for the per-attempt deadline of spec.md §5.
use std::net::SocketAddr;
use std::time::Duration;

use log::{debug, warn};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};
use tokio::time::timeout;

use crate::error::{DnsError, DnsResult};
use crate::message::{Message, OpCode, PacketType, ResponseCode};

/// One full query attempt cycle against a set of candidate endpoints
/// (spec.md §4.D): per-server UDP with TCP-on-truncation fallback, EDNS
/// strip-and-retry on FORMERR/NOTIMP, and SERVFAIL rotation, bounded by
/// `max_retries` attempts in total.
#[derive(Debug, Clone)]
pub struct Transport {
    pub force_tcp: bool,
    pub timeout_ms: u32,
    pub max_retries: u32,
}

impl Transport {
    pub fn new(force_tcp: bool, timeout_ms: u32, max_retries: u32) -> Self {
        Transport {
            force_tcp,
            timeout_ms,
            max_retries,
        }
    }

    /// Sends `request` to each of `endpoints` in turn until one answers
    /// validly or the retry budget is exhausted.
    pub async fn send(&self, endpoints: &[SocketAddr], request: &Message) -> DnsResult<Message> {
        if endpoints.is_empty() {
            return Err(DnsError::NoServersAvailable);
        }

        let mut attempts = 0u32;
        let mut last_err = DnsError::NoServersAvailable;

        for &endpoint in endpoints {
            if attempts >= self.max_retries {
                break;
            }

            let mut current = request.clone();
            let mut edns_stripped = false;

            loop {
                attempts += 1;
                debug!("transport: querying {} (attempt {})", endpoint, attempts);

                let outcome = self.one_round_trip(endpoint, &current).await;
                let response = match outcome {
                    Ok(r) => r,
                    Err(e) => {
                        warn!("transport: {} failed: {}", endpoint, e);
                        last_err = e;
                        break;
                    }
                };

                if let Err(e) = validate_response(&current, &response) {
                    last_err = e;
                    break;
                }

                let rcode = response.header.flags.response_code;
                let retryable_without_edns = matches!(
                    rcode,
                    ResponseCode::FormErr | ResponseCode::NotImp | ResponseCode::ServFail
                );
                if retryable_without_edns && current.edns.is_some() && !edns_stripped {
                    debug!("transport: {} returned {:?} with EDNS set, retrying without it", endpoint, rcode);
                    current.edns = None;
                    edns_stripped = true;
                    if attempts >= self.max_retries {
                        break;
                    }
                    continue;
                }

                if rcode == ResponseCode::ServFail {
                    last_err = DnsError::Dns(format!("{} answered SERVFAIL", endpoint));
                    break;
                }

                return Ok(response);
            }

            if attempts >= self.max_retries {
                break;
            }
        }

        Err(last_err)
    }

    async fn one_round_trip(&self, endpoint: SocketAddr, request: &Message) -> DnsResult<Message> {
        if self.force_tcp {
            return self.query_tcp(endpoint, request).await;
        }

        let response = self.query_udp(endpoint, request).await?;
        if response.header.flags.truncated {
            debug!("transport: {} truncated over UDP, retrying over TCP", endpoint);
            let tcp_response = self.query_tcp(endpoint, request).await?;
            if tcp_response.header.flags.truncated {
                return Err(DnsError::BadTruncation);
            }
            return Ok(tcp_response);
        }
        Ok(response)
    }

    async fn query_udp(&self, endpoint: SocketAddr, request: &Message) -> DnsResult<Message> {
        let local_addr = if endpoint.is_ipv6() { "[::]:0" } else { "0.0.0.0:0" };
        let socket = UdpSocket::bind(local_addr).await?;
        socket.connect(endpoint).await?;

        let bytes = request.to_bytes()?;
        socket.send(&bytes).await?;

        let mut buf = vec![0u8; 65535];
        let n = timeout(Duration::from_millis(self.timeout_ms as u64), socket.recv(&mut buf))
            .await
            .map_err(|_| DnsError::Timeout)??;

        Message::from_bytes(&buf[..n])
    }

    async fn query_tcp(&self, endpoint: SocketAddr, request: &Message) -> DnsResult<Message> {
        let connect = timeout(Duration::from_millis(self.timeout_ms as u64), TcpStream::connect(endpoint));
        let mut stream = connect.await.map_err(|_| DnsError::Timeout)??;

        let payload = request.to_bytes()?;
        let mut framed = Vec::with_capacity(2 + payload.len());
        framed.extend_from_slice(&(payload.len() as u16).to_be_bytes());
        framed.extend_from_slice(&payload);

        let send = async {
            stream.write_all(&framed).await?;
            let mut len_buf = [0u8; 2];
            stream.read_exact(&mut len_buf).await?;
            let len = u16::from_be_bytes(len_buf) as usize;
            let mut body = vec![0u8; len];
            stream.read_exact(&mut body).await?;
            Ok::<Vec<u8>, std::io::Error>(body)
        };

        let body = timeout(Duration::from_millis(self.timeout_ms as u64), send)
            .await
            .map_err(|_| DnsError::Timeout)??;

        Message::from_bytes(&body)
    }
}

/// Validates a response against the request that produced it, per the
/// rejection rules of spec.md §4.D. Reflection defense (source address and
/// port matching the queried endpoint) is structural here: a connected UDP
/// socket only ever delivers datagrams from its connected peer, and the TCP
/// stream is dialed directly to the endpoint.
fn validate_response(request: &Message, response: &Message) -> DnsResult<()> {
    if response.header.flags.packet_type != PacketType::Response {
        return Err(DnsError::NotResponse);
    }
    if response.header.flags.op_code != OpCode::Query {
        return Err(DnsError::BadOpcode);
    }

    let question_matches = response.questions.len() == request.questions.len()
        && response
            .questions
            .iter()
            .zip(request.questions.iter())
            .all(|(a, b)| a.qname == b.qname && a.qtype == b.qtype && a.qclass == b.qclass);

    if !question_matches {
        let rcode = response.header.flags.response_code;
        let exempt = response.questions.is_empty()
            && matches!(rcode, ResponseCode::FormErr | ResponseCode::NotImp | ResponseCode::NXRRSet);
        if !exempt {
            return Err(DnsError::BadQuestion);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{QClass, QType};
    use crate::name::Name;

    #[test]
    fn validate_accepts_matching_question() {
        let q = Message::new_query(Name::parse("example.com.").unwrap(), QType::A, QClass::IN);
        let mut r = q.clone();
        r.header.flags.packet_type = PacketType::Response;
        assert!(validate_response(&q, &r).is_ok());
    }

    #[test]
    fn validate_rejects_non_response() {
        let q = Message::new_query(Name::parse("example.com.").unwrap(), QType::A, QClass::IN);
        let r = q.clone();
        assert!(matches!(validate_response(&q, &r), Err(DnsError::NotResponse)));
    }

    #[test]
    fn validate_rejects_mismatched_question() {
        let q = Message::new_query(Name::parse("example.com.").unwrap(), QType::A, QClass::IN);
        let mut r = Message::new_query(Name::parse("other.com.").unwrap(), QType::A, QClass::IN);
        r.header.flags.packet_type = PacketType::Response;
        assert!(matches!(validate_response(&q, &r), Err(DnsError::BadQuestion)));
    }

    #[test]
    fn validate_exempts_empty_question_formerr() {
        let q = Message::new_query(Name::parse("example.com.").unwrap(), QType::A, QClass::IN);
        let mut r = Message::default();
        r.header.flags.packet_type = PacketType::Response;
        r.header.flags.response_code = ResponseCode::FormErr;
        assert!(validate_response(&q, &r).is_ok());
    }
}
