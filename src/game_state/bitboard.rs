//! Bitboard primitives: square arithmetic, masks, and set-bit iteration.

use crate::game_state::chess_types::{Bitboard, Square};

pub const BB_EMPTY: Bitboard = 0;
pub const BB_FULL: Bitboard = !0;
pub const BB_RANK_1: Bitboard = 0x0000_0000_0000_00FF;
pub const BB_RANK_8: Bitboard = 0xFF00_0000_0000_0000;
pub const BB_FILE_A: Bitboard = 0x0101_0101_0101_0101;
pub const BB_FILE_H: Bitboard = 0x8080_8080_8080_8080;
pub const BB_EDGES: Bitboard = BB_RANK_1 | BB_RANK_8 | BB_FILE_A | BB_FILE_H;

/// `(file_step, rank_step)` pairs for orthogonal rays.
pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
/// `(file_step, rank_step)` pairs for diagonal rays.
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

#[inline]
pub const fn rank_of(square: Square) -> u8 {
    square >> 3
}

#[inline]
pub const fn file_of(square: Square) -> u8 {
    square & 7
}

#[inline]
pub const fn make_square(rank: u8, file: u8) -> Square {
    (rank << 3) + file
}

#[inline]
pub const fn square_bb(square: Square) -> Bitboard {
    1u64 << square
}

/// Step `square` by a file/rank delta, or `None` when it leaves the board.
#[inline]
pub const fn offset_square(square: Square, file_step: i8, rank_step: i8) -> Option<Square> {
    let file = file_of(square) as i8 + file_step;
    let rank = rank_of(square) as i8 + rank_step;
    if file < 0 || file > 7 || rank < 0 || rank > 7 {
        None
    } else {
        Some(make_square(rank as u8, file as u8))
    }
}

/// Remove and return the lowest set square.
#[inline]
pub fn pop_lsb(bb: &mut Bitboard) -> Square {
    let sq = bb.trailing_zeros() as Square;
    *bb &= *bb - 1;
    sq
}

/// Iterate the set squares of a bitboard from a1 upward.
#[inline]
pub fn squares(bb: Bitboard) -> SquareIter {
    SquareIter(bb)
}

#[derive(Debug, Clone, Copy)]
pub struct SquareIter(Bitboard);

impl Iterator for SquareIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(pop_lsb(&mut self.0))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for SquareIter {}

/// Enumerate every subset of `mask` with the carry-rippler trick.
pub fn subsets(mask: Bitboard) -> Vec<Bitboard> {
    let mut out = Vec::with_capacity(1usize << mask.count_ones());
    let mut bb = BB_EMPTY;
    loop {
        out.push(bb);
        bb = bb.wrapping_sub(mask) & mask;
        if bb == 0 {
            break;
        }
    }
    out
}

/// Eight-line `0`/`1` grid, rank 8 first. Handy when a table test fails.
pub fn bitboard_to_grid(bb: Bitboard) -> String {
    let mut out = String::with_capacity(8 * 17);
    for rank in (0..8u8).rev() {
        for file in 0..8u8 {
            out.push(if bb & square_bb(make_square(rank, file)) != 0 {
                '1'
            } else {
                '0'
            });
            if file < 7 {
                out.push(' ');
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_and_file_arithmetic() {
        // g8 -> two ranks down, three files left is d6.
        let g8 = 62;
        let d6 = make_square(rank_of(g8) - 2, file_of(g8) - 3);
        assert_eq!(d6, 43);
        assert_eq!(offset_square(0, -1, 0), None);
        assert_eq!(offset_square(0, 1, 1), Some(9));
    }

    #[test]
    fn subsets_cover_power_set() {
        let mask = 0b1011_0000u64;
        let all = subsets(mask);
        assert_eq!(all.len(), 8);
        assert_eq!(all[0], 0);
        assert!(all.iter().all(|s| s & !mask == 0));
        let mut sorted = all.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 8);
    }

    #[test]
    fn square_iteration_is_ascending() {
        let got: Vec<Square> = squares(square_bb(3) | square_bb(40) | square_bb(63)).collect();
        assert_eq!(got, vec![3, 40, 63]);
        let mut bb = square_bb(9) | square_bb(10);
        assert_eq!(pop_lsb(&mut bb), 9);
        assert_eq!(bb, square_bb(10));
    }

    #[test]
    fn grid_marks_a1_bottom_left() {
        let grid = bitboard_to_grid(square_bb(0));
        assert_eq!(grid.lines().last(), Some("1 0 0 0 0 0 0 0"));
    }
}
