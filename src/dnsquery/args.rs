//! Manage command line arguments here.
use std::str::FromStr;

use clap::{App, Arg};

use dnslib::{error::DnsResult, message::QType};

/// This structure holds the command line arguments.
#[derive(Debug)]
pub struct CliOptions {
    pub qtype: QType,
    pub domain: String,
    /// A specific server to query directly (classic `dig @ns` style). When
    /// absent, the full recursive resolver is used instead.
    pub ns: Option<String>,
    pub tcp: bool,
    pub no_edns: bool,
    pub dnssec: bool,
    pub minimize: bool,
    pub inet6: bool,
    pub debug: bool,
}

impl CliOptions {
    pub fn options() -> DnsResult<Self> {
        let matches = App::new("DNS query tool")
            .version("0.2")
            .author("Alain Viguier dandyvica@gmail.com")
            .about(
                r#"A simple DNS query client

            Project home page: https://github.com/dandyvica/dnsquery

            "#,
            )
            .arg(
                Arg::new("qtype")
                    .short('q')
                    .long("qtype")
                    .required(true)
                    .long_help("QType value")
                    .takes_value(true),
            )
            .arg(
                Arg::new("domain")
                    .short('d')
                    .long("domain")
                    .required(true)
                    .long_help("Domain to query")
                    .takes_value(true),
            )
            .arg(
                Arg::new("ns")
                    .short('n')
                    .long("ns")
                    .required(false)
                    .long_help("Query this server directly instead of resolving recursively")
                    .takes_value(true),
            )
            .arg(
                Arg::new("tcp")
                    .short('t')
                    .long("tcp")
                    .required(false)
                    .long_help("Force TCP")
                    .takes_value(false),
            )
            .arg(
                Arg::new("no-edns")
                    .short('o')
                    .long("no-edns")
                    .required(false)
                    .long_help("Don't send an OPT pseudo-RR")
                    .takes_value(false),
            )
            .arg(
                Arg::new("dnssec")
                    .short('s')
                    .long("dnssec")
                    .required(false)
                    .long_help("Validate the DNSSEC chain of trust")
                    .takes_value(false),
            )
            .arg(
                Arg::new("minimize")
                    .short('m')
                    .long("minimize")
                    .required(false)
                    .long_help("Use query name minimisation")
                    .takes_value(false),
            )
            .arg(
                Arg::new("inet6")
                    .short('6')
                    .long("inet6")
                    .required(false)
                    .long_help("Prefer IPv6 transport")
                    .takes_value(false),
            )
            .arg(
                Arg::new("debug")
                    .short('g')
                    .long("debug")
                    .required(false)
                    .long_help("Debug mode")
                    .takes_value(false),
            )
            .get_matches();

        Ok(CliOptions {
            qtype: QType::from_str(&matches.value_of("qtype").unwrap().to_uppercase())?,
            domain: String::from(matches.value_of("domain").unwrap()),
            ns: matches.value_of("ns").map(String::from),
            tcp: matches.is_present("tcp"),
            no_edns: matches.is_present("no-edns"),
            dnssec: matches.is_present("dnssec"),
            minimize: matches.is_present("minimize"),
            inet6: matches.is_present("inet6"),
            debug: matches.is_present("debug"),
        })
    }
}
