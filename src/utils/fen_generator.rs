//! FEN serialization. `parse_fen(generate_fen(s)) == s` for any canonical FEN.

use std::fmt::Write;

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::square_to_algebraic;

const CASTLING_LETTERS: [(CastlingRights, char); 4] = [
    (CASTLE_LIGHT_KINGSIDE, 'K'),
    (CASTLE_LIGHT_QUEENSIDE, 'Q'),
    (CASTLE_DARK_KINGSIDE, 'k'),
    (CASTLE_DARK_QUEENSIDE, 'q'),
];

pub fn generate_fen(game_state: &GameState) -> String {
    let mut fen = String::with_capacity(90);
    write_placement(&mut fen, game_state);

    fen.push(' ');
    fen.push(match game_state.side_to_move {
        Color::Light => 'w',
        Color::Dark => 'b',
    });

    fen.push(' ');
    let rights_start = fen.len();
    fen.extend(
        CASTLING_LETTERS
            .iter()
            .filter(|(flag, _)| game_state.castling_rights & flag != 0)
            .map(|&(_, letter)| letter),
    );
    if fen.len() == rights_start {
        fen.push('-');
    }

    fen.push(' ');
    match game_state.en_passant_square.map(square_to_algebraic) {
        Some(Ok(square)) => fen.push_str(&square),
        _ => fen.push('-'),
    }

    // Writing into a String cannot fail.
    let _ = write!(
        fen,
        " {} {}",
        game_state.halfmove_clock, game_state.fullmove_number
    );
    fen
}

/// Piece placement field, rank 8 first, runs of empty squares as digits.
fn write_placement(fen: &mut String, game_state: &GameState) {
    for rank in (0..8u8).rev() {
        let mut gap = 0u8;
        for square in rank * 8..rank * 8 + 8 {
            let Some((color, piece)) = game_state.piece_on(square) else {
                gap += 1;
                continue;
            };
            if gap > 0 {
                fen.push(char::from(b'0' + gap));
                gap = 0;
            }
            let letter = piece.to_char();
            fen.push(if color == Color::Light {
                letter.to_ascii_uppercase()
            } else {
                letter
            });
        }
        if gap > 0 {
            fen.push(char::from(b'0' + gap));
        }
        if rank != 0 {
            fen.push('/');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::generate_fen;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::{Color, CASTLE_DARK_KINGSIDE, CASTLE_DARK_QUEENSIDE};
    use crate::game_state::game_state::GameState;
    use crate::utils::fen_parser::parse_fen;
    use test_case::test_case;

    #[test_case(STARTING_POSITION_FEN ; "start")]
    #[test_case("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1" ; "kiwipete")]
    #[test_case("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1" ; "rook endgame")]
    #[test_case("rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2" ; "en passant target")]
    #[test_case("4k3/8/8/8/8/8/8/4K3 b - - 99 0" ; "zero fullmove")]
    #[test_case("r3k3/8/8/8/8/8/8/4K2R b Kq - 12 57" ; "mixed rights")]
    fn round_trips(fen: &str) {
        let parsed = parse_fen(fen).expect("FEN should parse");
        assert_eq!(generate_fen(&parsed), fen);
    }

    #[test]
    fn reparsed_fields_match() {
        let fen = "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/2N2N2/PPPP1PPP/R1BQ1RK1 b kq - 4 6";
        let parsed = parse_fen(fen).expect("FEN should parse");
        let reparsed = parse_fen(&generate_fen(&parsed)).expect("generated FEN should parse");

        assert_eq!(reparsed, parsed);
        assert_eq!(reparsed.side_to_move, Color::Dark);
        assert_eq!(
            reparsed.castling_rights,
            CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE
        );
        assert_eq!(reparsed.en_passant_square, None);
        assert_eq!((reparsed.halfmove_clock, reparsed.fullmove_number), (4, 6));
    }

    #[test]
    fn empty_board_placement() {
        let fen = generate_fen(&GameState::new_empty());
        assert!(fen.starts_with("8/8/8/8/8/8/8/8 w - - "));
    }
}
