//! Text diagram of a position for the UCI `d` command and test failures.

use std::fmt::Write;

use crate::game_state::{chess_types::*, game_state::GameState};

const FILE_LABELS: &str = "  a b c d e f g h";

/// Glyphs indexed by `[color][piece]`.
const GLYPHS: [[char; 6]; 2] = [
    ['♙', '♘', '♗', '♖', '♕', '♔'],
    ['♟', '♞', '♝', '♜', '♛', '♚'],
];

/// Unicode board, rank 8 at the top, with rank and file labels on all sides.
pub fn render_game_state(game_state: &GameState) -> String {
    let mut out = String::with_capacity(256);
    out.push_str(FILE_LABELS);
    out.push('\n');

    for rank in (0..8u8).rev() {
        let label = rank + 1;
        let row: Vec<String> = (0..8u8)
            .map(|file| {
                game_state
                    .piece_on(rank * 8 + file)
                    .map_or('·', |(color, piece)| GLYPHS[color.index()][piece.index()])
                    .to_string()
            })
            .collect();
        let _ = writeln!(out, "{label} {} {label}", row.join(" "));
    }

    out.push_str(FILE_LABELS);
    out
}

/// Board diagram followed by the FEN and side to move.
pub fn describe_game_state(game_state: &GameState) -> String {
    let side = match game_state.side_to_move {
        Color::Light => "white",
        Color::Dark => "black",
    };
    format!(
        "{}\nFen: {}\nSide to move: {side}",
        render_game_state(game_state),
        game_state.get_fen()
    )
}
