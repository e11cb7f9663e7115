//! Fixed-size transposition table keyed by Zobrist hash.
//!
//! Direct-mapped: the slot is `key & (len - 1)` with a power-of-two length.
//! There is no chaining, so two positions sharing a slot evict each other.
//! A store only lands when the slot is empty or the new search is at least as
//! deep as the one already there.

use crate::moves::chess_move::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    pub key: u64,
    pub depth: u8,
    pub score: i32,
    pub bound: Bound,
    pub best_move: Option<Move>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TTStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
    stats: TTStats,
}

impl TranspositionTable {
    pub const DEFAULT_SIZE_MB: usize = 16;

    /// Table holding `entry_count` slots, rounded down to a power of two.
    pub fn with_entries(entry_count: usize) -> Self {
        let count = prev_power_of_two(entry_count.max(1));
        Self {
            entries: vec![None; count],
            stats: TTStats::default(),
        }
    }

    pub fn new_with_mb(size_mb: usize) -> Self {
        let bytes = size_mb.max(1) * 1024 * 1024;
        let entry_size = std::mem::size_of::<Option<TTEntry>>().max(1);
        Self::with_entries(bytes / entry_size)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.fill(None);
        self.stats = TTStats::default();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn stats(&self) -> TTStats {
        self.stats
    }

    /// Occupied slots per thousand, as reported by UCI `hashfull`.
    pub fn hashfull_permille(&self) -> u32 {
        let sample = self.entries.len().min(1000);
        let used = self.entries[..sample].iter().filter(|e| e.is_some()).count();
        (used * 1000 / sample.max(1)) as u32
    }

    #[inline]
    fn idx(&self, key: u64) -> usize {
        (key as usize) & (self.entries.len() - 1)
    }

    /// Entry for exactly `key`, if the slot still holds it.
    pub fn probe(&mut self, key: u64) -> Option<TTEntry> {
        self.stats.probes += 1;
        let idx = self.idx(key);
        let hit = self.entries[idx].filter(|e| e.key == key);
        if hit.is_some() {
            self.stats.hits += 1;
        }
        hit
    }

    pub fn store(&mut self, entry: TTEntry) {
        let idx = self.idx(entry.key);
        let replace = match self.entries[idx] {
            None => true,
            Some(existing) => entry.depth >= existing.depth,
        };
        if replace {
            self.stats.stores += 1;
            self.entries[idx] = Some(entry);
        }
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new_with_mb(Self::DEFAULT_SIZE_MB)
    }
}

#[inline]
fn prev_power_of_two(n: usize) -> usize {
    1usize << (usize::BITS - 1 - n.leading_zeros())
}
