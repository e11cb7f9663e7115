use crate::game_state::chess_types::*;
use crate::moves::chess_move::Move;

/// Single undo record for `make_move` / `unmake_move`.
///
/// `captured_piece` is `Some(Pawn)` for en passant even though the pawn did
/// not stand on the destination square; the move kind tells the two apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoState {
    pub mv: Move,
    pub moved_piece: PieceKind,
    pub captured_piece: Option<PieceKind>,

    pub prev_castling_rights: CastlingRights,
    pub prev_en_passant_square: Option<Square>,
    pub prev_halfmove_clock: u16,
}
