//! Static evaluation used at the search leaves.
//!
//! The search is generic over `BoardScorer`; `MaterialScorer` counts material
//! only and is what the engine plays with.

use crate::game_state::{chess_types::*, game_state::GameState};

pub trait BoardScorer: Send + Sync {
    /// Score from the perspective of the side to move. Must be deterministic
    /// and symmetric under a color swap.
    fn score(&self, game_state: &GameState) -> i32;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl MaterialScorer {
    #[inline]
    pub const fn piece_value(piece: PieceKind) -> i32 {
        match piece {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 300,
            PieceKind::Bishop => 300,
            PieceKind::Rook => 500,
            PieceKind::Queen => 900,
            PieceKind::King => 0,
        }
    }

    #[inline]
    fn material_balance_white_minus_black(game_state: &GameState) -> i32 {
        PieceKind::ALL
            .into_iter()
            .map(|piece| {
                let white = game_state.piece_bb(Color::Light, piece).count_ones() as i32;
                let black = game_state.piece_bb(Color::Dark, piece).count_ones() as i32;
                (white - black) * Self::piece_value(piece)
            })
            .sum()
    }
}

impl BoardScorer for MaterialScorer {
    fn score(&self, game_state: &GameState) -> i32 {
        let white_minus_black = Self::material_balance_white_minus_black(game_state);
        match game_state.side_to_move {
            Color::Light => white_minus_black,
            Color::Dark => -white_minus_black,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardScorer, MaterialScorer};
    use crate::game_state::game_state::GameState;

    #[test]
    fn start_position_is_balanced() {
        assert_eq!(MaterialScorer.score(&GameState::new_game()), 0);
    }

    #[test]
    fn score_is_relative_to_side_to_move() {
        let white = GameState::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").expect("FEN");
        let black = GameState::from_fen("4k3/8/8/8/8/8/8/3QK3 b - - 0 1").expect("FEN");
        assert_eq!(MaterialScorer.score(&white), 900);
        assert_eq!(MaterialScorer.score(&black), -900);
    }

    #[test]
    fn mirrored_positions_score_equal() {
        let a = GameState::from_fen("4k3/pp6/8/8/8/8/1N6/4K3 w - - 0 1").expect("FEN");
        let b = GameState::from_fen("4k3/1n6/8/8/8/8/PP6/4K3 b - - 0 1").expect("FEN");
        assert_eq!(MaterialScorer.score(&a), MaterialScorer.score(&b));
    }
}
