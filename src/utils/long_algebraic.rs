//! Coordinate move text (`e2e4`, `e7e8q`) to `Move`.
//!
//! The text alone cannot tell a castle or an en-passant capture from a plain
//! move, so parsing consults the position. Only shape is checked here;
//! legality is the caller's job.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::bitboard::{file_of, rank_of};
use crate::game_state::chess_rules::castling_side_for;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::chess_move::Move;
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_move_text(text: &str, game_state: &GameState) -> ChessResult<Move> {
    if !text.is_ascii() || (text.len() != 4 && text.len() != 5) {
        return Err(ChessError::InvalidMove(text.to_owned()));
    }

    let from = algebraic_to_square(&text[0..2]).map_err(|_| ChessError::InvalidMove(text.to_owned()))?;
    let to = algebraic_to_square(&text[2..4]).map_err(|_| ChessError::InvalidMove(text.to_owned()))?;

    let (moving_color, moved_piece) = game_state
        .piece_on(from)
        .ok_or_else(|| ChessError::IllegalMove(format!("{text}: no piece on {}", &text[0..2])))?;
    if moving_color != game_state.side_to_move {
        return Err(ChessError::IllegalMove(format!(
            "{text}: piece does not belong to the side to move"
        )));
    }

    let promotion = match text.as_bytes().get(4) {
        Some(&ch) => Some(char_to_promotion(char::from(ch)).ok_or_else(|| {
            ChessError::InvalidMove(text.to_owned())
        })?),
        None => None,
    };

    if moved_piece == PieceKind::Pawn && rank_of(to) == moving_color.promotion_rank() {
        let piece = promotion.ok_or_else(|| {
            ChessError::IllegalMove(format!("{text}: promotion piece missing"))
        })?;
        return Ok(Move::promotion(from, to, piece));
    }
    if promotion.is_some() {
        return Err(ChessError::IllegalMove(format!(
            "{text}: only a pawn reaching the last rank may promote"
        )));
    }

    if moved_piece == PieceKind::King && castling_side_for(from, to).is_some() {
        return Ok(Move::castle(from, to));
    }

    if moved_piece == PieceKind::Pawn
        && game_state.en_passant_square == Some(to)
        && file_of(from) != file_of(to)
        && game_state.piece_on(to).is_none()
    {
        return Ok(Move::en_passant(from, to));
    }

    Ok(Move::new(from, to))
}

fn char_to_promotion(ch: char) -> Option<PieceKind> {
    match ch {
        'n' => Some(PieceKind::Knight),
        'b' => Some(PieceKind::Bishop),
        'r' => Some(PieceKind::Rook),
        'q' => Some(PieceKind::Queen),
        _ => None,
    }
}
