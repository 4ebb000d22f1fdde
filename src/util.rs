//! Small utility helpers shared by the codec and by tests: wire hex-dump
//! fixtures (the teacher's tests embed `wireshark`-style hex dumps as string
//! constants and parse them back with `get_sample_slice`) and debug-only
//! cursor/buffer dumps.
use std::io::Cursor;

/// Top two bits `11` mark a compression pointer (RFC 1035 §4.1.4).
pub fn is_pointer(byte: u8) -> bool {
    byte & 0xC0 == 0xC0
}

/// Top two bits `00` mark an ordinary label length octet.
pub fn is_label_length(byte: u8) -> bool {
    byte & 0xC0 == 0x00
}

/// Parses a `wireshark`/`tcpdump -X`-style hex dump (leading offset column,
/// whitespace-separated hex byte pairs, trailing ASCII gutter ignored) into
/// the raw bytes it represents. Used throughout this crate's wire-codec
/// tests to keep fixtures readable instead of `&[0x12, 0x34, ...]` literals.
pub fn get_sample_slice(dump: &str) -> Vec<u8> {
    let mut bytes = Vec::new();

    for line in dump.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // first whitespace-separated token is the offset column, e.g. "0000"
        let mut tokens = line.split_whitespace();
        tokens.next();

        for tok in tokens {
            // stop at the ASCII gutter: a valid hex-pair token is exactly 2
            // hex digits
            if tok.len() != 2 || !tok.chars().all(|c| c.is_ascii_hexdigit()) {
                break;
            }
            bytes.push(u8::from_str_radix(tok, 16).unwrap());
        }
    }

    bytes
}

/// Debug dump of a cursor's full backing buffer: index / hex / ASCII rows.
pub fn pretty_cursor(buffer: &Cursor<&[u8]>) {
    let reference = buffer.get_ref();

    eprintln!("position={}", buffer.position());

    eprint!("index:");
    for i in 0..reference.len() {
        eprint!("{:02} ", i);
    }
    eprintln!();

    eprint!("byte :");
    for x in *reference {
        eprint!("{:02X} ", x);
    }
    eprintln!();

    eprint!("ascii:");
    for &x in *reference {
        if x.is_ascii_graphic() {
            eprint!(" {} ", x as char);
        } else {
            eprint!("   ");
        }
    }
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_dump() {
        const PACKET: &str = r#"
0000   76 86 81 a0 00 01 00 08 00 00 00 01
"#;
        assert_eq!(
            get_sample_slice(PACKET),
            vec![0x76, 0x86, 0x81, 0xa0, 0x00, 0x01, 0x00, 0x08, 0x00, 0x00, 0x00, 0x01]
        );
    }

    #[test]
    fn pointer_vs_label() {
        assert!(is_pointer(0xC0));
        assert!(!is_label_length(0xC0));
        assert!(is_label_length(0x3F));
        assert!(!is_pointer(0x3F));
    }
}
