use crate::game_state::bitboard::squares;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::chess_move::Move;
use crate::moves::magic_tables::AttackTables;

/// Knight, bishop, rook and queen moves: one destination-set pass per kind.
pub fn generate_piece_moves(
    tables: &AttackTables,
    game_state: &GameState,
    target_mask: Bitboard,
    out: &mut Vec<Move>,
) {
    let side = game_state.side_to_move;
    let allowed = target_mask & !game_state.occupancy(side);
    let occupancy = game_state.occupancy_all;

    for piece in [
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
    ] {
        for from in squares(game_state.piece_bb(side, piece)) {
            let attacks = match piece {
                PieceKind::Knight => tables.knight_attacks(from),
                PieceKind::Bishop => tables.bishop_attacks(from, occupancy),
                PieceKind::Rook => tables.rook_attacks(from, occupancy),
                _ => tables.queen_attacks(from, occupancy),
            };
            for to in squares(attacks & allowed) {
                out.push(Move::new(from, to));
            }
        }
    }
}
