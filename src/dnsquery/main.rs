//! A DNS resource query: a thin illustration of the public resolver API
//! (`dnslib::resolver::Resolver`) and, when `--ns` names a server directly,
//! of the bare transport layer underneath it -- mirroring the two ways the
//! teacher's original `dnsquery` and this crate's recursive resolver can
//! both be asked the same question.
use std::net::{SocketAddr, ToSocketAddrs};

use log::debug;

use dnslib::{
    config::Config,
    error::DnsResult,
    message::{Message, QClass, Question},
    name::Name,
    resolver::Resolver,
    transport::Transport,
};

mod args;
use args::CliOptions;

mod display;
use display::display_message;

#[tokio::main]
async fn main() -> DnsResult<()> {
    env_logger::init();

    let options = CliOptions::options()?;
    debug!("options: {:?}", &options);

    let qname = Name::parse(&options.domain)?;
    let question = Question::new(qname, options.qtype, QClass::IN);

    let response = match &options.ns {
        Some(ns) => query_one_server(ns, &question, &options).await?,
        None => {
            let mut config = if options.dnssec {
                Config::with_dnssec()
            } else {
                Config::default()
            };
            config.tcp = options.tcp;
            config.edns = !options.no_edns;
            config.minimize = options.minimize;
            config.inet6 = options.inet6;

            let resolver = Resolver::new(config);
            resolver.resolve(question).await?
        }
    };

    display_message(&response);

    if response.response_code() != 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Sends one query directly to `ns` without recursing, using the same
/// `Transport` the resolver itself relies on for every hop.
async fn query_one_server(ns: &str, question: &Question, options: &CliOptions) -> DnsResult<Message> {
    let endpoint: SocketAddr = format!("{}:53", ns)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| dnslib::error::DnsError::new(&format!("could not resolve nameserver {}", ns)))?;

    let mut request = Message::new_query(question.qname.clone(), question.qtype, question.qclass);
    if !options.no_edns {
        request.add_edns(4096, options.dnssec);
    }

    let transport = Transport::new(options.tcp, 2000, 3);
    transport.send(&[endpoint], &request).await
}
