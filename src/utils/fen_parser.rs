//! FEN-to-GameState parser.
//!
//! Builds fully-populated incremental state from a Forsyth-Edwards Notation
//! string, including piece bitboards, rights, clocks, and occupancies. Only
//! the canonical spelling of each field is accepted, so every string that
//! parses serializes back to itself.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::bitboard::{rank_of, square_bb};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::algebraic_to_square;

fn invalid(message: impl Into<String>) -> ChessError {
    ChessError::InvalidFen(message.into())
}

pub fn parse_fen(fen: &str) -> ChessResult<GameState> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    let [board_part, side_part, castling_part, en_passant_part, halfmove_part, fullmove_part] =
        fields[..]
    else {
        return Err(invalid(format!(
            "expected 6 fields, found {} in '{fen}'",
            fields.len()
        )));
    };

    let mut game_state = GameState::new_empty();

    parse_board(board_part, &mut game_state)?;
    game_state.side_to_move = parse_side_to_move(side_part)?;
    game_state.castling_rights = parse_castling_rights(castling_part)?;
    game_state.en_passant_square = parse_en_passant_square(en_passant_part)?;
    game_state.halfmove_clock = parse_counter(halfmove_part, "halfmove clock")?;
    game_state.fullmove_number = parse_counter(fullmove_part, "fullmove number")?;

    let turn_offset = match game_state.side_to_move {
        Color::Light => 0,
        Color::Dark => 1,
    };
    game_state.ply = game_state
        .fullmove_number
        .saturating_sub(1)
        .saturating_mul(2)
        .saturating_add(turn_offset);

    game_state.recalc_occupancy();

    Ok(game_state)
}

fn parse_board(board_part: &str, game_state: &mut GameState) -> ChessResult<()> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid("board layout must contain 8 ranks"));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx as u8;
        let mut file = 0u8;
        let mut previous_was_digit = false;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) || previous_was_digit {
                    return Err(invalid(format!("invalid empty-square run in '{rank_str}'")));
                }
                file += empty_count as u8;
                previous_was_digit = true;
            } else {
                let (color, piece) = piece_from_fen_char(ch)
                    .ok_or_else(|| invalid(format!("invalid piece character '{ch}'")))?;
                if file >= 8 {
                    return Err(invalid(format!("rank '{rank_str}' has too many files")));
                }
                if piece == PieceKind::Pawn && (board_rank == 0 || board_rank == 7) {
                    return Err(invalid(format!("pawn on back rank in '{rank_str}'")));
                }
                let sq = board_rank * 8 + file;
                game_state.pieces[color.index()][piece.index()] |= square_bb(sq);
                file += 1;
                previous_was_digit = false;
            }

            if file > 8 {
                return Err(invalid(format!("rank '{rank_str}' has too many files")));
            }
        }

        if file != 8 {
            return Err(invalid(format!("rank '{rank_str}' does not cover 8 files")));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> ChessResult<Color> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(invalid(format!("invalid side-to-move field '{side_part}'"))),
    }
}

/// Letters must appear at most once and in `KQkq` order.
fn parse_castling_rights(castling_part: &str) -> ChessResult<CastlingRights> {
    if castling_part == "-" {
        return Ok(0);
    }
    if castling_part.is_empty() {
        return Err(invalid("empty castling field"));
    }

    let mut rights: CastlingRights = 0;

    for ch in castling_part.chars() {
        let flag = match ch {
            'K' => CASTLE_LIGHT_KINGSIDE,
            'Q' => CASTLE_LIGHT_QUEENSIDE,
            'k' => CASTLE_DARK_KINGSIDE,
            'q' => CASTLE_DARK_QUEENSIDE,
            _ => return Err(invalid(format!("invalid castling character '{ch}'"))),
        };
        if flag <= rights {
            return Err(invalid(format!("castling field '{castling_part}' is not in KQkq order")));
        }
        rights |= flag;
    }

    Ok(rights)
}

/// The target must sit on rank 3 or rank 6.
fn parse_en_passant_square(en_passant_part: &str) -> ChessResult<Option<Square>> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let square = algebraic_to_square(en_passant_part)
        .map_err(|_| invalid(format!("invalid en-passant square '{en_passant_part}'")))?;
    if !matches!(rank_of(square), 2 | 5) {
        return Err(invalid(format!(
            "en-passant square '{en_passant_part}' is not on rank 3 or 6"
        )));
    }
    Ok(Some(square))
}

fn parse_counter(text: &str, what: &str) -> ChessResult<u16> {
    let value = text
        .parse::<u16>()
        .map_err(|_| invalid(format!("invalid {what} '{text}'")))?;
    if value.to_string() != text {
        return Err(invalid(format!("{what} '{text}' is not in plain decimal form")));
    }
    Ok(value)
}

fn piece_from_fen_char(ch: char) -> Option<(Color, PieceKind)> {
    let color = if ch.is_ascii_uppercase() {
        Color::Light
    } else if ch.is_ascii_lowercase() {
        Color::Dark
    } else {
        return None;
    };

    PieceKind::from_char(ch).map(|piece| (color, piece))
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::errors::ChessError;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::*;
    use test_case::test_case;

    #[test]
    fn parse_starting_fen() {
        let game_state = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");

        assert_eq!(game_state.side_to_move, Color::Light);
        assert_eq!(game_state.castling_rights, CASTLE_ALL);
        assert_eq!(game_state.fullmove_number, 1);
        assert_eq!(game_state.halfmove_clock, 0);
        assert_eq!(game_state.ply, 0);
        assert_eq!(game_state.occupancy_all.count_ones(), 32);
    }

    #[test]
    fn ply_follows_fullmove_and_turn() {
        let game_state =
            parse_fen("4k3/8/8/8/8/8/8/4K3 b - - 12 30").expect("FEN should parse");
        assert_eq!(game_state.ply, 59);
        assert_eq!(game_state.halfmove_clock, 12);
    }

    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0" ; "five fields")]
    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 x" ; "seven fields")]
    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1" ; "seven ranks")]
    #[test_case("rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1" ; "bad piece")]
    #[test_case("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1" ; "short rank")]
    #[test_case("rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1" ; "long rank")]
    #[test_case("rnbqkbnr/pppppppp/44/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1" ; "split digit run")]
    #[test_case("4k2P/8/8/8/8/8/8/4K3 w - - 0 1" ; "pawn on eighth rank")]
    #[test_case("4k3/8/8/8/8/8/8/p3K3 b - - 0 1" ; "pawn on first rank")]
    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1" ; "bad side")]
    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkx - 0 1" ; "bad castling")]
    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w qkQK - 0 1" ; "castling order")]
    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e4 0 1" ; "en passant rank")]
    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x 1" ; "halfmove text")]
    #[test_case("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 01" ; "fullmove zero pad")]
    fn rejects_malformed_fen(fen: &str) {
        let err = parse_fen(fen).expect_err("FEN should be rejected");
        assert!(matches!(err, ChessError::InvalidFen(_)));
        assert!(!err.is_invariant_violation());
    }
}
