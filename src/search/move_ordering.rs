//! Capture-value move ordering.
//!
//! Moves are scored from a victim/attacker table (most valuable victim, least
//! valuable attacker first) and only the single best one is swapped to the
//! front. The rest keep generation order.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::chess_move::{Move, ScoredMove};

/// Score given to the hash-table move so it is always tried first.
pub const TT_MOVE_SCORE: i32 = 1_000_000;

const PROMOTION_BONUS: i32 = 800;

/// `[victim][attacker]`, indexed by `PieceKind::index`.
const MVV_LVA: [[i32; 6]; 6] = [
    [105, 104, 103, 102, 101, 100],
    [205, 204, 203, 202, 201, 200],
    [305, 304, 303, 302, 301, 300],
    [405, 404, 403, 402, 401, 400],
    [505, 504, 503, 502, 501, 500],
    [605, 604, 603, 602, 601, 600],
];

pub fn score_move(game_state: &GameState, mv: Move, tt_move: Option<Move>) -> i32 {
    if tt_move == Some(mv) {
        return TT_MOVE_SCORE;
    }

    let us = game_state.side_to_move;
    let Some(attacker) = game_state.piece_on_for_color(us, mv.from_sq()) else {
        return 0;
    };
    let victim = if mv.is_en_passant() {
        Some(PieceKind::Pawn)
    } else {
        game_state.piece_on_for_color(us.opposite(), mv.to_sq())
    };

    let mut score = victim.map_or(0, |v| MVV_LVA[v.index()][attacker.index()]);
    if mv.promotion_piece() == Some(PieceKind::Queen) {
        score += PROMOTION_BONUS;
    }
    score
}

/// Score every move and put the best-scoring one first.
pub fn order_moves(game_state: &GameState, moves: &[Move], tt_move: Option<Move>) -> Vec<ScoredMove> {
    let mut scored: Vec<ScoredMove> = moves
        .iter()
        .map(|&mv| ScoredMove {
            mv,
            score: score_move(game_state, mv, tt_move),
        })
        .collect();
    move_best_to_front(&mut scored);
    scored
}

#[inline]
pub fn move_best_to_front(moves: &mut [ScoredMove]) {
    let best = moves
        .iter()
        .enumerate()
        .max_by_key(|(idx, m)| (m.score, std::cmp::Reverse(*idx)))
        .map(|(idx, _)| idx);
    if let Some(idx) = best {
        moves.swap(0, idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::long_algebraic::parse_move_text;

    fn mv(game: &GameState, text: &str) -> Move {
        parse_move_text(text, game).expect("move should parse")
    }

    #[test]
    fn cheaper_attacker_on_bigger_victim_ranks_higher() {
        let game = GameState::from_fen("4k3/8/8/3q4/2P1r3/8/8/3QK3 w - - 0 1").expect("FEN");
        let pawn_takes_queen = score_move(&game, mv(&game, "c4d5"), None);
        let queen_takes_queen = score_move(&game, mv(&game, "d1d5"), None);
        let quiet = score_move(&game, mv(&game, "e1f2"), None);
        assert!(pawn_takes_queen > queen_takes_queen);
        assert!(queen_takes_queen > quiet);
        assert_eq!(quiet, 0);
    }

    #[test]
    fn tt_move_goes_first_without_full_sort() {
        let game = GameState::from_fen("4k3/8/8/3q4/2P1r3/8/8/3QK3 w - - 0 1").expect("FEN");
        let moves = vec![
            mv(&game, "e1f2"),
            mv(&game, "c4d5"),
            mv(&game, "e1f1"),
            mv(&game, "d1d5"),
        ];

        let ordered = order_moves(&game, &moves, Some(mv(&game, "e1f1")));
        assert_eq!(ordered[0].mv, moves[2]);
        assert_eq!(ordered[0].score, TT_MOVE_SCORE);
        // Only one swap happened.
        assert_eq!(ordered[2].mv, moves[0]);
        assert_eq!(ordered[1].mv, moves[1]);
        assert_eq!(ordered[3].mv, moves[3]);

        let ordered = order_moves(&game, &moves, None);
        assert_eq!(ordered[0].mv, moves[1]);
    }

    #[test]
    fn en_passant_counts_as_pawn_capture() {
        let game = GameState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").expect("FEN");
        assert_eq!(score_move(&game, mv(&game, "e5d6"), None), MVV_LVA[0][0]);
    }
}
