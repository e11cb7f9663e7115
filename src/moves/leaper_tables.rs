//! Static attack tables for pieces that do not slide.
//!
//! Knight and king targets are enumerated exhaustively at compile time by
//! comparing rank/file distances between every origin/target pair. Pawn
//! capture patterns are indexed by the pawn's color.

use crate::game_state::chess_types::{Bitboard, Color, Square};

pub const KNIGHT_ATTACKS: [Bitboard; 64] = generate_leaper_table(true);
pub const KING_ATTACKS: [Bitboard; 64] = generate_leaper_table(false);
pub const LIGHT_PAWN_ATTACKS: [Bitboard; 64] = generate_pawn_table(1);
pub const DARK_PAWN_ATTACKS: [Bitboard; 64] = generate_pawn_table(-1);

#[inline]
pub const fn knight_attacks(square: Square) -> Bitboard {
    KNIGHT_ATTACKS[square as usize]
}

#[inline]
pub const fn king_attacks(square: Square) -> Bitboard {
    KING_ATTACKS[square as usize]
}

/// Squares a pawn of `color` standing on `square` captures onto.
#[inline]
pub const fn pawn_attacks(color: Color, square: Square) -> Bitboard {
    match color {
        Color::Light => LIGHT_PAWN_ATTACKS[square as usize],
        Color::Dark => DARK_PAWN_ATTACKS[square as usize],
    }
}

const fn is_knight_step(rank_delta: i32, file_delta: i32) -> bool {
    let dr = rank_delta.abs();
    let df = file_delta.abs();
    (dr == 1 && df == 2) || (dr == 2 && df == 1)
}

const fn is_king_step(rank_delta: i32, file_delta: i32) -> bool {
    let dr = rank_delta.abs();
    let df = file_delta.abs();
    dr <= 1 && df <= 1 && (dr + df) > 0
}

const fn generate_leaper_table(knight: bool) -> [Bitboard; 64] {
    let mut table = [0u64; 64];
    let mut from = 0usize;

    while from < 64 {
        let mut to = 0usize;
        let mut attacks = 0u64;
        while to < 64 {
            let rank_delta = (to / 8) as i32 - (from / 8) as i32;
            let file_delta = (to % 8) as i32 - (from % 8) as i32;
            let hit = if knight {
                is_knight_step(rank_delta, file_delta)
            } else {
                is_king_step(rank_delta, file_delta)
            };
            if hit {
                attacks |= 1u64 << to;
            }
            to += 1;
        }
        table[from] = attacks;
        from += 1;
    }

    table
}

const fn generate_pawn_table(forward: i32) -> [Bitboard; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32 + forward;
        let mut attacks = 0u64;

        if rank >= 0 && rank < 8 {
            if file > 0 {
                attacks |= 1u64 << (rank * 8 + file - 1);
            }
            if file < 7 {
                attacks |= 1u64 << (rank * 8 + file + 1);
            }
        }

        table[sq] = attacks;
        sq += 1;
    }

    table
}
