//! Crate root module declarations for the Ironfin engine.
//!
//! Exposes the board representation, attack tables, move generation, search
//! and UCI front-end so binaries, benches and tests share one module layout.

pub mod context;
pub mod errors;

pub mod game_state {
    pub mod bitboard;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod undo_state;
}

pub mod moves {
    pub mod chess_move;
    pub mod leaper_tables;
    pub mod magic_tables;
    pub mod slider_rays;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_moves_king;
    pub mod legal_moves_pawn;
    pub mod legal_moves_pieces;
    pub mod move_generator;
    pub mod perft;
}

pub mod search {
    pub mod board_scoring;
    pub mod iterative_deepening;
    pub mod move_ordering;
    pub mod time_management;
    pub mod transposition_table;
    pub mod zobrist;
}

pub mod uci {
    pub mod search_worker;
    pub mod uci_top;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod render_game_state;
}
