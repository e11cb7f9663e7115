//! Per-move time budgeting.
//!
//! UCI passes raw clock data (`wtime/btime/winc/binc/movetime`) and this module
//! turns it into a `SearchLimits` for the search: a depth cap plus an optional
//! wall-clock budget.

use std::time::Duration;

use crate::game_state::chess_types::Color;
use crate::game_state::game_state::GameState;

pub const MAX_SEARCH_DEPTH: u8 = 64;

/// Fewest moves the remaining clock is assumed to cover.
pub const MIN_MOVES_TO_GO: u64 = 10;

/// No single move gets more than this, whatever the clock says.
pub const MAX_MOVE_TIME_MS: u64 = 60_000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    pub depth: Option<u8>,
    pub movetime_ms: Option<u64>,
    pub wtime_ms: Option<u64>,
    pub btime_ms: Option<u64>,
    pub winc_ms: Option<u64>,
    pub binc_ms: Option<u64>,
    pub movestogo: Option<u16>,
    pub infinite: bool,
    pub perft: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_depth: u8,
    pub move_time: Option<Duration>,
}

impl SearchLimits {
    pub fn depth(max_depth: u8) -> Self {
        Self {
            max_depth: max_depth.clamp(1, MAX_SEARCH_DEPTH),
            move_time: None,
        }
    }

    pub fn move_time(budget: Duration) -> Self {
        Self {
            max_depth: MAX_SEARCH_DEPTH,
            move_time: Some(budget),
        }
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::depth(MAX_SEARCH_DEPTH)
    }
}

/// Combine `go` parameters with the engine options into search limits.
///
/// An explicit `depth` wins over the `FixedDepth` option (0 means unset).
/// `infinite` and a bare `go` search until stopped.
pub fn resolve_limits(
    game_state: &GameState,
    params: &GoParams,
    fixed_depth: u8,
    move_overhead_ms: u64,
) -> SearchLimits {
    let configured_depth = params
        .depth
        .or((fixed_depth > 0).then_some(fixed_depth))
        .unwrap_or(MAX_SEARCH_DEPTH)
        .clamp(1, MAX_SEARCH_DEPTH);

    let budget_ms = if params.infinite {
        None
    } else if let Some(movetime) = params.movetime_ms {
        Some(movetime)
    } else {
        let (remaining, inc) = match game_state.side_to_move {
            Color::Light => (params.wtime_ms, params.winc_ms),
            Color::Dark => (params.btime_ms, params.binc_ms),
        };
        remaining.map(|remaining| {
            adaptive_budget_ms(game_state.ply, remaining, inc, params.movestogo)
        })
    };

    SearchLimits {
        max_depth: configured_depth,
        move_time: budget_ms
            .map(|ms| Duration::from_millis(ms.saturating_sub(move_overhead_ms).max(1))),
    }
}

/// Slice of the remaining clock for one move.
pub fn adaptive_budget_ms(
    ply: u16,
    remaining_ms: u64,
    inc_ms: Option<u64>,
    movestogo: Option<u16>,
) -> u64 {
    let expected_moves_left = match movestogo {
        Some(mtg) => u64::from(mtg),
        None => 40u64.saturating_sub(u64::from(ply) / 2),
    }
    .max(MIN_MOVES_TO_GO);

    let base = remaining_ms / expected_moves_left;
    let inc_bonus = inc_ms.unwrap_or(0).saturating_mul(3) / 4;
    let target = base.saturating_add(inc_bonus);

    let max_budget = (remaining_ms / 4).min(MAX_MOVE_TIME_MS).max(1);
    target.clamp(1, max_budget)
}
