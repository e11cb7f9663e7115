//! Direct ray-casting for sliding pieces.
//!
//! These routines are the ground truth the magic tables are built from and
//! checked against. They are too slow for the search itself.

use crate::game_state::bitboard::{
    offset_square, square_bb, BB_EMPTY, BISHOP_DIRECTIONS, ROOK_DIRECTIONS,
};
use crate::game_state::chess_types::{Bitboard, Square};

/// Slider flavour served by a magic table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slider {
    Rook,
    Bishop,
}

impl Slider {
    #[inline]
    pub const fn directions(self) -> &'static [(i8, i8); 4] {
        match self {
            Slider::Rook => &ROOK_DIRECTIONS,
            Slider::Bishop => &BISHOP_DIRECTIONS,
        }
    }
}

/// Attack set of `slider` on `square`, stopping at and including the first
/// blocker in each direction.
pub fn slider_attacks(slider: Slider, square: Square, blockers: Bitboard) -> Bitboard {
    let mut attacks = BB_EMPTY;
    for &(df, dr) in slider.directions() {
        let mut sq = square;
        while let Some(next) = offset_square(sq, df, dr) {
            attacks |= square_bb(next);
            if blockers & square_bb(next) != 0 {
                break;
            }
            sq = next;
        }
    }
    attacks
}

/// Squares whose occupancy can change the attack set of `slider` on `square`.
///
/// The last square of every ray is left out: a blocker there stops the ray at
/// the same place the board edge already does.
pub fn relevant_blocker_mask(slider: Slider, square: Square) -> Bitboard {
    let mut mask = BB_EMPTY;
    for &(df, dr) in slider.directions() {
        let mut sq = square;
        while let Some(next) = offset_square(sq, df, dr) {
            if offset_square(next, df, dr).is_none() {
                break;
            }
            mask |= square_bb(next);
            sq = next;
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::bitboard::BB_FULL;

    #[test]
    fn rook_rays_respect_blockers() {
        // Rook and bishop on d1, then a rook on d3.
        let blockers = 0x0800_0000_0020_0444u64;
        assert_eq!(slider_attacks(Slider::Rook, 3, blockers), 0x0808_0808_0808_0874);
        assert_eq!(slider_attacks(Slider::Bishop, 3, blockers), 0x0020_1400);

        let blockers = 0x0800_0000_0021_0046u64;
        assert_eq!(slider_attacks(Slider::Rook, 19, blockers), 0x0808_0808_0837_0808);
    }

    #[test]
    fn full_board_limits_to_neighbours() {
        let d4 = 27u8;
        let occ = BB_FULL & !(1u64 << d4);
        assert_eq!(slider_attacks(Slider::Rook, d4, occ), 0x0008_1408_0000);
    }

    #[test]
    fn mask_sizes_match_known_bit_counts() {
        // Corner rook: 12 relevant squares; centre bishop: 9.
        assert_eq!(relevant_blocker_mask(Slider::Rook, 0).count_ones(), 12);
        assert_eq!(relevant_blocker_mask(Slider::Rook, 27).count_ones(), 10);
        assert_eq!(relevant_blocker_mask(Slider::Bishop, 27).count_ones(), 9);
        assert_eq!(relevant_blocker_mask(Slider::Bishop, 0).count_ones(), 6);
        // Edge squares of a rook on a1 are excluded in their own direction only.
        let mask = relevant_blocker_mask(Slider::Rook, 0);
        assert_eq!(mask & (1u64 << 7), 0);
        assert_eq!(mask & (1u64 << 56), 0);
        assert_ne!(mask & (1u64 << 6), 0);
    }
}
