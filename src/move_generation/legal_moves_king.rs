use crate::game_state::bitboard::{square_bb, squares};
use crate::game_state::chess_rules::CASTLING_SIDES;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::chess_move::Move;
use crate::moves::magic_tables::AttackTables;

/// King steps plus castling candidates.
///
/// Castling is offered on rights and empty squares between king and rook
/// alone; whether the king passes through check is left to the legality test.
pub fn generate_king_moves(
    tables: &AttackTables,
    game_state: &GameState,
    target_mask: Bitboard,
    out: &mut Vec<Move>,
) {
    let side = game_state.side_to_move;
    let allowed = target_mask & !game_state.occupancy(side);
    let kings = game_state.piece_bb(side, PieceKind::King);

    for from in squares(kings) {
        for to in squares(tables.king_attacks(from) & allowed) {
            out.push(Move::new(from, to));
        }
    }

    let rooks = game_state.piece_bb(side, PieceKind::Rook);
    for castle in CASTLING_SIDES.iter().filter(|castle| castle.color == side) {
        if game_state.castling_rights & castle.right != 0
            && game_state.occupancy_all & castle.between == 0
            && kings & square_bb(castle.king_from) != 0
            && rooks & square_bb(castle.rook_from) != 0
            && target_mask & square_bb(castle.king_to) != 0
        {
            out.push(Move::castle(castle.king_from, castle.king_to));
        }
    }
}
