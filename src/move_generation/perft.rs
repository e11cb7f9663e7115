//! Leaf-count enumeration used as a move-generation oracle.
//!
//! `perft` counts leaves, `perft_divide` splits the count by root move, and
//! `perft_detailed` also classifies the moves that reach the leaves.

use crate::errors::ChessResult;
use crate::game_state::game_state::GameState;
use crate::move_generation::move_generator::MoveGenerator;
use crate::moves::chess_move::Move;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
    }
}

pub fn perft(generator: &MoveGenerator, game_state: &mut GameState, depth: u8) -> ChessResult<u64> {
    if depth == 0 {
        return Ok(1);
    }

    let moves = generator.all_legal_moves(game_state)?;
    if depth == 1 {
        return Ok(moves.len() as u64);
    }

    let mut nodes = 0u64;
    for mv in moves {
        game_state.make_move(mv)?;
        let result = perft(generator, game_state, depth - 1);
        game_state.unmake_move(mv)?;
        nodes += result?;
    }
    Ok(nodes)
}

/// Leaf count below each root move.
pub fn perft_divide(
    generator: &MoveGenerator,
    game_state: &mut GameState,
    depth: u8,
) -> ChessResult<Vec<(Move, u64)>> {
    if depth == 0 {
        return Ok(Vec::new());
    }

    let moves = generator.all_legal_moves(game_state)?;
    let mut out = Vec::with_capacity(moves.len());
    for mv in moves {
        game_state.make_move(mv)?;
        let result = perft(generator, game_state, depth - 1);
        game_state.unmake_move(mv)?;
        out.push((mv, result?));
    }
    Ok(out)
}

pub fn perft_detailed(
    generator: &MoveGenerator,
    game_state: &mut GameState,
    depth: u8,
) -> ChessResult<PerftCounts> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let mut total = PerftCounts::default();
    for mv in generator.all_legal_moves(game_state)? {
        let is_capture = mv.is_en_passant()
            || game_state
                .piece_on_for_color(game_state.side_to_move.opposite(), mv.to_sq())
                .is_some();

        game_state.make_move(mv)?;
        let result = if depth == 1 {
            Ok(PerftCounts {
                nodes: 1,
                captures: u64::from(is_capture),
                en_passant: u64::from(mv.is_en_passant()),
                castles: u64::from(mv.is_castling()),
                promotions: u64::from(mv.is_promotion()),
                checks: u64::from(
                    game_state.is_in_check(generator.tables(), game_state.side_to_move),
                ),
            })
        } else {
            perft_detailed(generator, game_state, depth - 1)
        };
        game_state.unmake_move(mv)?;
        total.merge(result?);
    }
    Ok(total)
}
