//! TTL-bounded, size-bounded response cache (spec.md §4.F): a keyed entry
//! map plus a deadline-ordered min-heap for eviction, storing the encoded
//! message so TTL decay and the AD-bit rewrite are simple byte patches
//! rather than a decode/mutate/re-encode round trip.
//!
//! Nothing in the teacher crate cached anything (`dnsquery` is a one-shot
//! query tool); this module is grounded on the teacher's own `log::debug!`
//! + `format_buffer!` instrumentation style and its `std::collections`-only
//! dependency footprint — no new crate is needed here.
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::{Duration, Instant};

use log::debug;

use crate::message::Message;
use crate::name::Name;

/// `(lower(name), type, lower(zone))`, per spec.md §3.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    name: Name,
    qtype: u16,
    zone: Name,
}

impl CacheKey {
    pub fn new(name: &Name, qtype: u16, zone: &Name) -> Self {
        CacheKey {
            name: name.to_lowercase(),
            qtype,
            zone: zone.to_lowercase(),
        }
    }

    fn usage(&self) -> usize {
        self.name.label_count() * 8 + self.zone.label_count() * 8
    }
}

const PER_ENTRY_OVERHEAD: usize = 80;
pub const DEFAULT_MAX_SIZE: u64 = 5 * 1024 * 1024;

/// Flags word byte offset of the AD bit within an encoded message. The
/// 16-bit flags word is big-endian at buffer offset 2..4; AD is bit 5 of
/// the *low* byte (RFC 1035 §4.1.1: high byte carries QR/Opcode/AA/TC/RD),
/// so the patch target is absolute offset 3, not 2.
const FLAGS_BYTE_OFFSET: usize = 3;
const AD_BIT_MASK: u8 = 0b0010_0000;

#[derive(Debug, Clone)]
struct Entry {
    encoded: Vec<u8>,
    insert_time: Instant,
    deadline: Option<Instant>,
    eternal: bool,
}

impl Entry {
    fn usage(&self, key: &CacheKey) -> usize {
        self.encoded.len() + key.usage() * 2 + PER_ENTRY_OVERHEAD
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
struct HeapItem {
    deadline: Option<Instant>,
    key: CacheKey,
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // entries with no deadline (eternal) sort as "latest" so the
        // min-heap (wrapped in Reverse by the caller) pops real deadlines
        // first
        match (self.deadline, other.deadline) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    }
}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-TTL-ordered message cache shared across all in-flight lookups
/// (spec.md §5: "the cache's internal map + heap require mutual
/// exclusion"). This type itself is not internally synchronized — callers
/// wrap it in a mutex, matching the teacher's preference for explicit
/// synchronization over a baked-in one (see DESIGN.md).
#[derive(Debug)]
pub struct Cache {
    entries: HashMap<CacheKey, Entry>,
    heap: BinaryHeap<Reverse<HeapItem>>,
    size: usize,
    max_size: u64,
}

impl Cache {
    pub fn new(max_size: u64) -> Self {
        Cache {
            entries: HashMap::new(),
            heap: BinaryHeap::new(),
            size: 0,
            max_size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Inserts `msg` under `(name, qtype, zone)`. Drops silently if the
    /// message's minimum positive TTL is zero and it is not `eternal`.
    pub fn insert(
        &mut self,
        name: &Name,
        qtype: u16,
        zone: &Name,
        msg: &Message,
        ad: bool,
        eternal: bool,
    ) {
        let min_ttl = min_positive_ttl(msg);
        if min_ttl == 0 && !eternal {
            debug!("cache: refusing to insert {:?} with min_ttl=0", name);
            return;
        }

        let key = CacheKey::new(name, qtype, zone);

        if let Some(existing) = self.entries.get(&key) {
            if existing.eternal && !eternal {
                debug!("cache: keeping eternal entry for {:?}", name);
                return;
            }
        }

        let mut encoded = match msg.to_bytes() {
            Ok(bytes) => bytes,
            Err(_) => return,
        };
        set_ad_bit(&mut encoded, ad);

        let deadline = if eternal {
            None
        } else {
            Some(Instant::now() + Duration::from_secs(min_ttl as u64))
        };

        let entry = Entry {
            encoded,
            insert_time: Instant::now(),
            deadline,
            eternal,
        };

        if let Some(old) = self.entries.get(&key) {
            self.size -= old.usage(&key);
        }
        self.size += entry.usage(&key);

        self.heap.push(Reverse(HeapItem {
            deadline: entry.deadline,
            key: key.clone(),
        }));
        self.entries.insert(key, entry);

        self.evict();
    }

    /// Looks up `(name, qtype, zone)`, decaying every non-OPT RR's TTL by
    /// the time elapsed since insert, floored at 1.
    pub fn hit(&mut self, name: &Name, qtype: u16, zone: &Name) -> Option<Message> {
        let key = CacheKey::new(name, qtype, zone);
        let entry = self.entries.get(&key)?;

        if let Some(deadline) = entry.deadline {
            if Instant::now() > deadline {
                self.remove(&key);
                return None;
            }
        }

        let mut msg = Message::from_bytes(&entry.encoded).ok()?;
        let elapsed = entry.insert_time.elapsed().as_secs() as u32;
        decay_ttls(&mut msg, elapsed);
        Some(msg)
    }

    fn remove(&mut self, key: &CacheKey) {
        if let Some(old) = self.entries.remove(key) {
            self.size -= old.usage(key);
        }
    }

    /// Pops the heap while total size exceeds `max_size`; stale heap
    /// entries (key's current deadline no longer matches the popped item)
    /// are discarded without affecting size accounting.
    pub fn prune(&mut self) {
        self.evict();
    }

    fn evict(&mut self) {
        while self.size as u64 > self.max_size {
            let Some(Reverse(item)) = self.heap.pop() else {
                break;
            };
            match self.entries.get(&item.key) {
                Some(current) if current.deadline == item.deadline => {
                    self.remove(&item.key);
                }
                _ => continue, // stale heap entry, key already replaced/removed
            }
        }
    }
}

fn min_positive_ttl(msg: &Message) -> u32 {
    msg.answers
        .iter()
        .chain(msg.authorities.iter())
        .chain(msg.additionals.iter())
        .map(|r| r.ttl)
        .filter(|&ttl| ttl > 0)
        .min()
        .unwrap_or(0)
}

fn decay_ttls(msg: &mut Message, elapsed: u32) {
    for r in msg
        .answers
        .iter_mut()
        .chain(msg.authorities.iter_mut())
        .chain(msg.additionals.iter_mut())
    {
        if r.rtype == crate::message::QType::OPT {
            continue;
        }
        r.ttl = r.ttl.saturating_sub(elapsed).max(1);
    }
}

fn set_ad_bit(encoded: &mut [u8], ad: bool) {
    if encoded.len() <= FLAGS_BYTE_OFFSET {
        return;
    }
    if ad {
        encoded[FLAGS_BYTE_OFFSET] |= AD_BIT_MASK;
    } else {
        encoded[FLAGS_BYTE_OFFSET] &= !AD_BIT_MASK;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Message, QClass, QType};
    use crate::rdata::RData;
    use std::net::Ipv4Addr;

    fn sample_message(ttl: u32) -> Message {
        let mut msg = Message::new_query(Name::parse("example.com.").unwrap(), QType::A, QClass::IN);
        msg.header.flags.packet_type = crate::message::PacketType::Response;
        msg.answers.push(crate::message::Record::new(
            Name::parse("example.com.").unwrap(),
            QClass::IN,
            ttl,
            RData::A(Ipv4Addr::new(1, 2, 3, 4)),
        ));
        msg.header.an_count = 1;
        msg
    }

    #[test]
    fn insert_then_hit_returns_message() {
        let mut cache = Cache::new(DEFAULT_MAX_SIZE);
        let name = Name::parse("example.com.").unwrap();
        let zone = Name::root();
        let msg = sample_message(300);

        cache.insert(&name, QType::A as u16, &zone, &msg, true, false);
        let hit = cache.hit(&name, QType::A as u16, &zone).unwrap();
        assert_eq!(hit.answers.len(), 1);
        assert!(hit.header.flags.authentic_data);
    }

    #[test]
    fn zero_ttl_insert_is_dropped() {
        let mut cache = Cache::new(DEFAULT_MAX_SIZE);
        let name = Name::parse("example.com.").unwrap();
        let zone = Name::root();
        let msg = sample_message(0);

        cache.insert(&name, QType::A as u16, &zone, &msg, false, false);
        assert!(cache.hit(&name, QType::A as u16, &zone).is_none());
    }

    #[test]
    fn ad_bit_flips_on_reinsert() {
        let mut cache = Cache::new(DEFAULT_MAX_SIZE);
        let name = Name::parse("example.com.").unwrap();
        let zone = Name::root();
        let msg = sample_message(300);

        cache.insert(&name, QType::A as u16, &zone, &msg, true, false);
        assert!(cache.hit(&name, QType::A as u16, &zone).unwrap().header.flags.authentic_data);

        cache.insert(&name, QType::A as u16, &zone, &msg, false, false);
        assert!(!cache.hit(&name, QType::A as u16, &zone).unwrap().header.flags.authentic_data);
    }
}
