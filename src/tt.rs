//! Direct-mapped transposition table.
//!
//! One probe per lookup: `index = key & hash_mask`, no rehash chain. Entries
//! are 16 bytes so a populated slot is a single cache line's worth of
//! neighbors; replacement favors deeper searches and stale generations over
//! a strict LRU policy, which would cost more than the collisions it avoids.

use crate::types::{Depth, Key, Move, ValueType};
use rayon::prelude::*;

const ENTRY_SIZE: usize = std::mem::size_of::<TtEntry>();
const MAX_SIZE_MB: i32 = 65_536;
const AGE_WORKERS: usize = 32;

/// One 16-byte slot: key, move-with-value, depth, age, bound type, mate flag.
#[derive(Copy, Clone, Debug)]
#[repr(C)]
pub struct TtEntry {
    pub key: Key,
    mv: u32,
    pub depth: i8,
    pub age: i8,
    value_type: u8,
    pub mate_threat: bool,
}

const _: () = assert!(std::mem::size_of::<TtEntry>() == 16);

impl TtEntry {
    const EMPTY: TtEntry = TtEntry {
        key: 0,
        mv: 0,
        depth: 0,
        age: 0,
        value_type: 0,
        mate_threat: false,
    };

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.key == 0
    }

    #[inline]
    pub fn mv(&self) -> Move {
        Move::from_bits(self.mv)
    }

    #[inline]
    pub fn value_type(&self) -> ValueType {
        ValueType::from(self.value_type)
    }
}

/// Running counters for probe/put traffic. Approximate under concurrent
/// probing (no atomics); exact under the single-writer discipline the rest
/// of this module assumes.
#[derive(Copy, Clone, Debug, Default)]
pub struct TtStats {
    pub puts: u64,
    pub probes: u64,
    pub hits: u64,
    pub misses: u64,
    pub collisions: u64,
    pub overwrites: u64,
    pub updates: u64,
}

/// Fixed-capacity, direct-mapped cache of search results keyed by position.
pub struct TtTable {
    data: Vec<TtEntry>,
    hash_mask: u64,
    entry_count: u64,
    size_in_byte: u64,
    stats: TtStats,
    /// Backing slot for `get_entry` on a zero-capacity table, so the
    /// no-op contract can still return a live `&mut TtEntry`.
    scratch: TtEntry,
}

impl TtTable {
    /// Builds a table sized to the largest power-of-two entry count fitting
    /// in `size_mb` megabytes. `size_mb == 0` yields an inert, zero-capacity
    /// table. Requests above `MAX_SIZE_MB` are clamped with a warning.
    pub fn new(size_mb: i32) -> Self {
        let clamped = Self::clamp_size_mb(size_mb);
        let n = Self::capacity_for(clamped);
        Self {
            data: vec![TtEntry::EMPTY; n],
            hash_mask: n.saturating_sub(1) as u64,
            entry_count: 0,
            size_in_byte: (n * ENTRY_SIZE) as u64,
            stats: TtStats::default(),
            scratch: TtEntry::EMPTY,
        }
    }

    fn clamp_size_mb(size_mb: i32) -> i32 {
        if size_mb > MAX_SIZE_MB {
            log::warn!("tt: requested {size_mb} MB exceeds max {MAX_SIZE_MB} MB, clamping");
            MAX_SIZE_MB
        } else {
            size_mb.max(0)
        }
    }

    fn capacity_for(size_mb: i32) -> usize {
        if size_mb <= 0 {
            return 0;
        }
        let bytes = (size_mb as u64) * 1_048_576;
        let slots = bytes / ENTRY_SIZE as u64;
        if slots == 0 {
            0
        } else {
            (1u64 << (63 - slots.leading_zeros())) as usize
        }
    }

    /// Equivalent to constructing a fresh table of the given size in place.
    /// Must not be called while any probe/put is in flight.
    pub fn resize(&mut self, size_mb: i32) {
        *self = Self::new(size_mb);
    }

    #[inline]
    fn hash(&self, key: Key) -> usize {
        (key & self.hash_mask) as usize
    }

    /// Looks up `key`, returning a live reference on a hit and decrementing
    /// its age (marking it used this generation). Bumps probe/hit/miss
    /// counters; a lookup on a zero-capacity table is a guaranteed miss.
    pub fn probe(&mut self, key: Key) -> Option<&mut TtEntry> {
        if self.data.is_empty() {
            return None;
        }
        self.stats.probes += 1;
        let idx = self.hash(key);
        let entry = &mut self.data[idx];
        if entry.key == key {
            self.stats.hits += 1;
            entry.age = entry.age.saturating_sub(1);
            Some(entry)
        } else {
            self.stats.misses += 1;
            None
        }
    }

    /// Returns the slot `key` maps to, regardless of occupancy, without
    /// touching statistics or age. Used by tooling that wants to inspect a
    /// slot directly. On a zero-capacity table this is a no-op like every
    /// other TT operation: it returns a reset scratch entry rather than
    /// indexing into the empty backing vector.
    pub fn get_entry(&mut self, key: Key) -> &mut TtEntry {
        if self.data.is_empty() {
            self.scratch = TtEntry::EMPTY;
            return &mut self.scratch;
        }
        let idx = self.hash(key);
        &mut self.data[idx]
    }

    /// Stores a search result, combining `mv` and `value` into one packed
    /// word. Empty slots are always filled; collisions are replaced only
    /// when the new result is deeper (or as deep and `forced`, or as deep
    /// and the resident entry is stale); same-key stores always replace.
    #[allow(clippy::too_many_arguments)]
    pub fn put(
        &mut self,
        key: Key,
        mv: Move,
        value: i16,
        depth: Depth,
        value_type: ValueType,
        mate_threat: bool,
        forced: bool,
    ) {
        if self.data.is_empty() {
            return;
        }
        self.stats.puts += 1;
        let idx = self.hash(key);
        let packed = TtEntry {
            key,
            mv: mv.set_value(value).to_bits(),
            depth: depth.raw(),
            age: 1,
            value_type: value_type.into(),
            mate_threat,
        };

        let slot = &mut self.data[idx];
        if slot.is_empty() {
            *slot = packed;
            self.entry_count += 1;
        } else if slot.key != key {
            self.stats.collisions += 1;
            let replace = depth.raw() > slot.depth
                || (depth.raw() == slot.depth && (forced || slot.age > 1));
            if replace {
                self.stats.overwrites += 1;
                *slot = packed;
            }
        } else {
            self.stats.updates += 1;
            *slot = packed;
        }

        debug_assert_eq!(
            self.stats.puts,
            self.entry_count + self.stats.collisions + self.stats.updates
        );
    }

    /// Increments `age` on every occupied slot, split across a fixed number
    /// of worker chunks. Must not overlap with probes/puts.
    pub fn age_entries(&mut self) {
        if self.data.is_empty() {
            return;
        }
        let chunk_len = self.data.len().div_ceil(AGE_WORKERS).max(1);
        self.data.par_chunks_mut(chunk_len).for_each(|chunk| {
            for entry in chunk.iter_mut() {
                if !entry.is_empty() {
                    entry.age = entry.age.wrapping_add(1);
                }
            }
        });
    }

    /// Zeroes every slot and resets all statistics. Same concurrency
    /// contract as `resize`.
    pub fn clear(&mut self) {
        self.data.fill(TtEntry::EMPTY);
        self.entry_count = 0;
        self.stats = TtStats::default();
    }

    /// Fill rate in per-mille (UCI `hashfull` convention), 0 on an empty
    /// table.
    pub fn hashfull(&self) -> u16 {
        if self.data.is_empty() {
            return 0;
        }
        ((1000 * self.entry_count) / self.data.len() as u64) as u16
    }

    pub fn len(&self) -> u64 {
        self.entry_count
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn stats(&self) -> TtStats {
        self.stats
    }

    pub fn string(&self) -> String {
        let probes = self.stats.probes;
        let (hit_pct, miss_pct) = if probes > 0 {
            (
                100.0 * self.stats.hits as f64 / probes as f64,
                100.0 * self.stats.misses as f64 / probes as f64,
            )
        } else {
            (0.0, 0.0)
        };
        format!(
            "tt: {} MB, capacity {}, entry size {} B, entries {} ({}\u{2030} full), \
             puts {}, updates {}, collisions {}, overwrites {}, \
             probes {}, hits {} ({hit_pct:.1}%), misses {} ({miss_pct:.1}%)",
            self.size_in_byte / (1024 * 1024),
            self.data.len(),
            ENTRY_SIZE,
            self.entry_count,
            self.hashfull(),
            self.stats.puts,
            self.stats.updates,
            self.stats.collisions,
            self.stats.overwrites,
            probes,
            self.stats.hits,
            self.stats.misses,
        )
    }
}
