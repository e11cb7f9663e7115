use crate::game_state::bitboard::{rank_of, square_bb, squares};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::en_passant_victim_square;
use crate::moves::chess_move::Move;
use crate::moves::magic_tables::AttackTables;

/// Pseudo-legal pawn moves whose destination lies in `target_mask`.
///
/// En passant is judged by the captured pawn's square, so a captures-only
/// mask of enemy pieces still admits it.
pub fn generate_pawn_moves(
    tables: &AttackTables,
    game_state: &GameState,
    target_mask: Bitboard,
    out: &mut Vec<Move>,
) {
    let side = game_state.side_to_move;
    let enemy = side.opposite();
    let enemy_occ = game_state.occupancy(enemy);
    let empty = !game_state.occupancy_all;
    let push = side.pawn_push();

    for from in squares(game_state.piece_bb(side, PieceKind::Pawn)) {
        // Pawns never stand on the last rank, so one step stays on the board.
        let one = (from as i8 + push) as Square;
        if square_bb(one) & empty != 0 {
            if square_bb(one) & target_mask != 0 {
                push_pawn_move(side, from, one, out);
            }
            if rank_of(from) == side.pawn_start_rank() {
                let two = (one as i8 + push) as Square;
                if square_bb(two) & empty & target_mask != 0 {
                    out.push(Move::new(from, two));
                }
            }
        }

        let attacks = tables.pawn_attacks(side, from);
        for to in squares(attacks & enemy_occ & target_mask) {
            push_pawn_move(side, from, to, out);
        }

        if let Some(ep) = game_state.en_passant_square {
            let victim = en_passant_victim_square(side, ep);
            if attacks & square_bb(ep) != 0
                && square_bb(ep) & empty != 0
                && square_bb(victim) & target_mask != 0
                && game_state.piece_bb(enemy, PieceKind::Pawn) & square_bb(victim) != 0
            {
                out.push(Move::en_passant(from, ep));
            }
        }
    }
}

#[inline]
fn push_pawn_move(side: Color, from: Square, to: Square, out: &mut Vec<Move>) {
    if rank_of(to) == side.promotion_rank() {
        for piece in PieceKind::PROMOTIONS {
            out.push(Move::promotion(from, to, piece));
        }
    } else {
        out.push(Move::new(from, to));
    }
}
