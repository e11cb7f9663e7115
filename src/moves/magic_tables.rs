//! Magic-bitboard attack lookup for rooks and bishops.
//!
//! For every square a `MagicEntry` maps the relevant blockers of an occupancy
//! to a slot of a per-square attack table:
//!
//! `attacks = table[((occupancy & mask) * magic) >> (64 - index_bits)]`
//!
//! Magics are found at construction time by trying sparse random candidates
//! until one produces a table without a destructive collision. The generator
//! is seeded, so the same seed always yields the same tables.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game_state::bitboard::{subsets, BB_EMPTY};
use crate::game_state::chess_types::{Bitboard, Color, Square};
use crate::moves::leaper_tables::{king_attacks, knight_attacks, pawn_attacks};
use crate::moves::slider_rays::{relevant_blocker_mask, slider_attacks, Slider};

pub const DEFAULT_MAGIC_SEED: u64 = 0x1F2E_3D4C_5B6A_7988;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MagicEntry {
    pub mask: Bitboard,
    pub magic: u64,
    pub index_bits: u8,
}

impl MagicEntry {
    #[inline]
    pub fn index(&self, occupancy: Bitboard) -> usize {
        ((occupancy & self.mask).wrapping_mul(self.magic) >> (64 - self.index_bits)) as usize
    }
}

#[derive(Debug, Clone)]
struct SliderTable {
    entries: [MagicEntry; 64],
    attacks: Vec<Vec<Bitboard>>,
}

impl SliderTable {
    fn build(slider: Slider, rng: &mut StdRng) -> Self {
        let mut entries = [MagicEntry::default(); 64];
        let mut attacks = Vec::with_capacity(64);
        for square in 0..64u8 {
            let (entry, table) = find_magic(slider, square, rng);
            entries[square as usize] = entry;
            attacks.push(table);
        }
        Self { entries, attacks }
    }

    #[inline]
    fn lookup(&self, square: Square, occupancy: Bitboard) -> Bitboard {
        let sq = square as usize;
        self.attacks[sq][self.entries[sq].index(occupancy)]
    }
}

/// Read-only attack tables shared by move generation and attack queries.
#[derive(Debug, Clone)]
pub struct AttackTables {
    rook: SliderTable,
    bishop: SliderTable,
}

impl AttackTables {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_MAGIC_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        let started = Instant::now();
        let mut rng = StdRng::seed_from_u64(seed);
        let rook = SliderTable::build(Slider::Rook, &mut rng);
        let bishop = SliderTable::build(Slider::Bishop, &mut rng);
        log::info!(
            "magic attack tables built in {} ms",
            started.elapsed().as_millis()
        );
        Self { rook, bishop }
    }

    #[inline]
    pub fn rook_attacks(&self, square: Square, occupancy: Bitboard) -> Bitboard {
        self.rook.lookup(square, occupancy)
    }

    #[inline]
    pub fn bishop_attacks(&self, square: Square, occupancy: Bitboard) -> Bitboard {
        self.bishop.lookup(square, occupancy)
    }

    #[inline]
    pub fn queen_attacks(&self, square: Square, occupancy: Bitboard) -> Bitboard {
        self.rook_attacks(square, occupancy) | self.bishop_attacks(square, occupancy)
    }

    #[inline]
    pub fn knight_attacks(&self, square: Square) -> Bitboard {
        knight_attacks(square)
    }

    #[inline]
    pub fn king_attacks(&self, square: Square) -> Bitboard {
        king_attacks(square)
    }

    #[inline]
    pub fn pawn_attacks(&self, color: Color, square: Square) -> Bitboard {
        pawn_attacks(color, square)
    }

    pub fn magic_entry(&self, slider: Slider, square: Square) -> MagicEntry {
        match slider {
            Slider::Rook => self.rook.entries[square as usize],
            Slider::Bishop => self.bishop.entries[square as usize],
        }
    }

    pub fn slider_lookup(&self, slider: Slider, square: Square, occupancy: Bitboard) -> Bitboard {
        match slider {
            Slider::Rook => self.rook_attacks(square, occupancy),
            Slider::Bishop => self.bishop_attacks(square, occupancy),
        }
    }
}

impl Default for AttackTables {
    fn default() -> Self {
        Self::new()
    }
}

/// Search for a collision-free magic for one square. Loops until found.
pub fn find_magic(slider: Slider, square: Square, rng: &mut StdRng) -> (MagicEntry, Vec<Bitboard>) {
    let mask = relevant_blocker_mask(slider, square);
    let index_bits = mask.count_ones() as u8;
    let blocker_sets = subsets(mask);
    let reference: Vec<Bitboard> = blocker_sets
        .iter()
        .map(|&blockers| slider_attacks(slider, square, blockers))
        .collect();

    let mut attempts = 0u64;
    loop {
        attempts += 1;
        // Sparse candidates hash far better than uniform ones.
        let magic = rng.random::<u64>() & rng.random::<u64>() & rng.random::<u64>();
        let entry = MagicEntry {
            mask,
            magic,
            index_bits,
        };
        if let Some(table) = fill_table(&entry, &blocker_sets, &reference) {
            log::trace!("{slider:?} magic for square {square} after {attempts} attempts");
            return (entry, table);
        }
    }
}

fn fill_table(
    entry: &MagicEntry,
    blocker_sets: &[Bitboard],
    reference: &[Bitboard],
) -> Option<Vec<Bitboard>> {
    let mut table = vec![BB_EMPTY; 1usize << entry.index_bits];
    for (&blockers, &attacks) in blocker_sets.iter().zip(reference) {
        let slot = &mut table[entry.index(blockers)];
        if *slot == BB_EMPTY {
            *slot = attacks;
        } else if *slot != attacks {
            return None;
        }
    }
    Some(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_context;
    use crate::game_state::bitboard::{bitboard_to_grid, BB_EDGES, BB_FULL};

    #[test]
    fn lookup_matches_ray_casting_for_every_subset() {
        let tables = &test_context().attacks;
        for slider in [Slider::Rook, Slider::Bishop] {
            for square in 0..64u8 {
                let entry = tables.magic_entry(slider, square);
                assert_eq!(entry.mask, relevant_blocker_mask(slider, square));
                for blockers in subsets(entry.mask) {
                    let expected = slider_attacks(slider, square, blockers);
                    let got = tables.slider_lookup(slider, square, blockers);
                    assert_eq!(
                        got,
                        expected,
                        "{slider:?} on {square}\nblockers:\n{}",
                        bitboard_to_grid(blockers)
                    );
                }
            }
        }
    }

    #[test]
    fn irrelevant_occupancy_is_ignored() {
        let tables = &test_context().attacks;
        let d4 = 27u8;
        assert_eq!(tables.rook_attacks(d4, BB_EMPTY), 0x0808_0808_F708_0808);
        assert_eq!(tables.rook_attacks(d4, BB_EDGES), 0x0808_0808_F708_0808);
        assert_eq!(
            tables.rook_attacks(d4, BB_FULL & !(1u64 << d4)),
            0x0008_1408_0000
        );
        assert_eq!(tables.bishop_attacks(0, BB_EMPTY), 0x8040_2010_0804_0200);
        // Bishop on g6 with an adjacent, an edge and a distant blocker.
        assert_eq!(
            tables.bishop_attacks(46, 0x1080_0000_0008_0000),
            0x10A0_00A0_1008_0000
        );
    }

    #[test]
    fn same_seed_gives_same_magics() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        let (ea, ta) = find_magic(Slider::Bishop, 18, &mut a);
        let (eb, tb) = find_magic(Slider::Bishop, 18, &mut b);
        assert_eq!(ea, eb);
        assert_eq!(ta, tb);
    }
}
