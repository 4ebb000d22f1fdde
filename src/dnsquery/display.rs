//! Prints a decoded `Message` the way `dig` would: a header summary line,
//! then one line per record per section. `RData` already implements
//! `Display` (`dnslib::rdata`), so unlike the teacher's original
//! `DisplayWrapper` there is no foreign-trait workaround needed here.
use dnslib::message::{Message, PacketType, Record};

pub fn display_message(msg: &Message) {
    println!(
        "id:{:04X} {:?} opcode:{:?} rcode:{:?} qd:{} an:{} ns:{} ar:{}",
        msg.header.id,
        msg.header.flags.packet_type,
        msg.header.flags.op_code,
        msg.header.flags.response_code,
        msg.header.qd_count,
        msg.header.an_count,
        msg.header.ns_count,
        msg.header.ar_count,
    );

    if msg.header.flags.packet_type == PacketType::Response {
        print!(
            "flags: aa:{} tc:{} rd:{} ra:{} ad:{}",
            msg.header.flags.authoritative_answer,
            msg.header.flags.truncated,
            msg.header.flags.recursion_desired,
            msg.header.flags.recursion_available,
            msg.header.flags.authentic_data,
        );
        if let Some(edns) = &msg.edns {
            print!(" edns: udp={} do={}", edns.udp_payload_size, edns.dnssec_ok);
        }
        println!();
    }

    for q in &msg.questions {
        println!(";; QUESTION: {}", q);
    }

    display_section("ANSWER", &msg.answers);
    display_section("AUTHORITY", &msg.authorities);
    display_section("ADDITIONAL", &msg.additionals);
}

fn display_section(title: &str, records: &[Record]) {
    if records.is_empty() {
        return;
    }
    println!(";; {} SECTION:", title);
    for r in records {
        println!("{}\t{}\t{:?}\t{:?}\t{}", r.name, r.ttl, r.rclass, r.rtype, r.rdata);
    }
}
