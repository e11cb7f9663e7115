//! Zobrist hashing for transposition-table identity.
//!
//! The keys are generated from a fixed seed so hashes are deterministic across
//! runs, which is useful for testing and debugging. The hash is computed from
//! scratch on demand rather than carried on the board.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::leaper_tables::pawn_attacks;

pub const DEFAULT_ZOBRIST_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone)]
pub struct ZobristKeys {
    piece_square: [[[u64; 64]; 6]; 2],
    side_to_move: u64,
    castling: [u64; 16],
    en_passant_file: [u64; 8],
}

impl ZobristKeys {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_ZOBRIST_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        let mut state = seed;

        let mut piece_square = [[[0u64; 64]; 6]; 2];
        for color in &mut piece_square {
            for piece in color {
                for sq in piece {
                    *sq = next_random_u64(&mut state);
                }
            }
        }

        let side_to_move = next_random_u64(&mut state);

        let mut castling = [0u64; 16];
        for key in &mut castling {
            *key = next_random_u64(&mut state);
        }

        let mut en_passant_file = [0u64; 8];
        for key in &mut en_passant_file {
            *key = next_random_u64(&mut state);
        }

        Self {
            piece_square,
            side_to_move,
            castling,
            en_passant_file,
        }
    }

    /// Key for a `(color, piece, square)` occupancy term.
    #[inline]
    pub fn piece_square_key(&self, color: Color, piece: PieceKind, square: Square) -> u64 {
        self.piece_square[color.index()][piece.index()][square as usize]
    }

    /// Key for a castling-rights nibble (`0..=15`).
    #[inline]
    pub fn castling_key(&self, castling_rights: CastlingRights) -> u64 {
        self.castling[(castling_rights & 0x0F) as usize]
    }

    #[inline]
    pub fn en_passant_file_key(&self, file: u8) -> u64 {
        self.en_passant_file[(file & 7) as usize]
    }

    /// Toggle key, xored in when dark is to move.
    #[inline]
    pub fn side_to_move_key(&self) -> u64 {
        self.side_to_move
    }

    /// Full position key.
    ///
    /// The en-passant file only contributes when a pawn of the side to move
    /// could actually capture onto the target square, so a double push with
    /// no adjacent enemy pawn hashes the same as a quiet move.
    pub fn hash(&self, game_state: &GameState) -> u64 {
        let mut key = 0u64;

        for color in Color::ALL {
            for piece in PieceKind::ALL {
                let mut bb = game_state.pieces[color.index()][piece.index()];
                while bb != 0 {
                    let sq = bb.trailing_zeros() as Square;
                    key ^= self.piece_square_key(color, piece, sq);
                    bb &= bb - 1;
                }
            }
        }

        if game_state.side_to_move == Color::Dark {
            key ^= self.side_to_move_key();
        }

        key ^= self.castling_key(game_state.castling_rights);

        if let Some(ep_square) = game_state.en_passant_square {
            if en_passant_capturable(game_state, ep_square) {
                key ^= self.en_passant_file_key(ep_square % 8);
            }
        }

        key
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

/// A side-to-move pawn stands where it attacks `ep_square`.
#[inline]
fn en_passant_capturable(game_state: &GameState, ep_square: Square) -> bool {
    let us = game_state.side_to_move;
    // Squares from which our pawn hits `ep_square` are the ones the enemy
    // pawn pattern reaches from it.
    let origins = pawn_attacks(us.opposite(), ep_square);
    origins & game_state.piece_bb(us, PieceKind::Pawn) != 0
}

#[inline]
fn next_random_u64(state: &mut u64) -> u64 {
    // splitmix64
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
