//! Errors used throughout the engine.
//!
//! `ChessError` is the single error type returned by board manipulation,
//! parsing, move generation and search. Variants fall into two classes:
//!
//! - Caller misuse / broken invariants (`NotSideToMove`, `EmptyHistory`,
//!   `UnmakeMismatch`, `NoPieceOnSquare`). These mean a bug in the caller or in
//!   the generator. They are returned as values so tests can assert on them,
//!   but nothing in the crate tries to recover from them.
//! - Input errors (`InvalidFen`, `InvalidSquare`, `InvalidMove`,
//!   `IllegalMove`). These come from text supplied by a user or GUI and are
//!   reported back without stopping the engine.

use thiserror::Error;

use crate::game_state::chess_types::Square;

pub type ChessResult<T> = Result<T, ChessError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    #[error("invalid square notation: {0}")]
    InvalidSquare(String),

    #[error("invalid move text: {0}")]
    InvalidMove(String),

    #[error("illegal move in current position: {0}")]
    IllegalMove(String),

    #[error("no piece on square {0}")]
    NoPieceOnSquare(Square),

    #[error("piece on square {0} does not belong to the side to move")]
    NotSideToMove(Square),

    #[error("unmake requested with empty history")]
    EmptyHistory,

    #[error("unmake move does not match the most recent make")]
    UnmakeMismatch,

    #[error("could not start search thread: {0}")]
    SearchThread(String),
}

impl ChessError {
    /// True for errors that indicate a programming bug rather than bad input.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            ChessError::NoPieceOnSquare(_)
                | ChessError::NotSideToMove(_)
                | ChessError::EmptyHistory
                | ChessError::UnmakeMismatch
        )
    }
}
