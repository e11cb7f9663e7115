//! Read-only tables shared by the board, move generator and search.
//!
//! Built once at startup and handed around by reference (or behind an `Arc`
//! for the search thread). Nothing in here changes after construction.

use std::time::Instant;

use crate::moves::magic_tables::{AttackTables, DEFAULT_MAGIC_SEED};
use crate::search::zobrist::{ZobristKeys, DEFAULT_ZOBRIST_SEED};

#[derive(Debug)]
pub struct EngineContext {
    pub attacks: AttackTables,
    pub zobrist: ZobristKeys,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::with_seeds(DEFAULT_MAGIC_SEED, DEFAULT_ZOBRIST_SEED)
    }

    pub fn with_seeds(magic_seed: u64, zobrist_seed: u64) -> Self {
        let start = Instant::now();
        let context = Self {
            attacks: AttackTables::with_seed(magic_seed),
            zobrist: ZobristKeys::with_seed(zobrist_seed),
        };
        log::info!(
            "engine context ready in {} ms",
            start.elapsed().as_millis()
        );
        context
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared context for unit tests so the magic search runs once per test binary.
#[cfg(test)]
pub(crate) fn test_context() -> &'static EngineContext {
    use std::sync::OnceLock;

    static CONTEXT: OnceLock<EngineContext> = OnceLock::new();
    CONTEXT.get_or_init(EngineContext::new)
}
