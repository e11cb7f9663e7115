//! Iterative deepening search with negamax alpha-beta pruning.
//!
//! Each iteration runs a full-width fail-hard negamax to the next depth,
//! hands off to a capture-only quiescence search at the horizon, and reuses
//! the transposition table for cutoffs and move ordering. An iteration that
//! is interrupted by the clock or the stop flag is thrown away; the move from
//! the last finished depth is returned.
//!
//! Time is checked after every root move and, inside the tree, once every
//! `TIME_CHECK_INTERVAL` nodes. Overruns between checks are expected.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::context::EngineContext;
use crate::errors::ChessResult;
use crate::game_state::game_state::GameState;
use crate::move_generation::move_generator::MoveGenerator;
use crate::moves::chess_move::Move;
use crate::search::board_scoring::BoardScorer;
use crate::search::move_ordering::order_moves;
use crate::search::time_management::SearchLimits;
use crate::search::transposition_table::{Bound, TTEntry, TranspositionTable};

/// Score bound; also the score of a checkmate.
///
/// Mates are not adjusted by ply, so a mate-in-3 and a mate-in-1 score the
/// same and the search has no preference between them.
pub const INFINITY: i32 = 1_000_000;

/// Hard cap on capture-only plies below the horizon.
pub const MAX_QUIESCENCE_DEPTH: u8 = 8;

const TIME_CHECK_INTERVAL: u64 = 2048;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub best_score: i32,
    pub reached_depth: u8,
    pub nodes: u64,
    pub elapsed_ms: u64,
}

/// Snapshot handed to the reporter after each finished depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchInfo {
    pub depth: u8,
    pub score: i32,
    pub nodes: u64,
    pub elapsed: Duration,
    pub hashfull: u32,
    pub pv: Vec<Move>,
}

impl SearchInfo {
    /// UCI `info` line for this iteration.
    ///
    /// Mate distance is not tracked, so a mate score is shown as the number of
    /// moves the finished depth covers.
    pub fn to_uci_line(&self) -> String {
        let score = if self.score >= INFINITY {
            format!("mate {}", (i32::from(self.depth) + 1) / 2)
        } else if self.score <= -INFINITY {
            format!("mate -{}", (i32::from(self.depth) / 2).max(1))
        } else {
            format!("cp {}", self.score)
        };
        let millis = self.elapsed.as_millis() as u64;
        let nps = self.nodes.saturating_mul(1000) / millis.max(1);
        let pv = self
            .pv
            .iter()
            .map(Move::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            "info depth {} score {} nodes {} nps {} time {} hashfull {} pv {}",
            self.depth, score, self.nodes, nps, millis, self.hashfull, pv
        )
    }
}

pub struct SearchEngine<'a, S: BoardScorer> {
    context: &'a EngineContext,
    generator: MoveGenerator<'a>,
    scorer: S,
    tt: &'a mut TranspositionTable,
    stop_flag: Option<Arc<AtomicBool>>,
    nodes: u64,
    start: Instant,
    deadline: Option<Instant>,
    stopped: bool,
}

impl<'a, S: BoardScorer> SearchEngine<'a, S> {
    pub fn new(context: &'a EngineContext, tt: &'a mut TranspositionTable, scorer: S) -> Self {
        Self {
            context,
            generator: MoveGenerator::new(&context.attacks),
            scorer,
            tt,
            stop_flag: None,
            nodes: 0,
            start: Instant::now(),
            deadline: None,
            stopped: false,
        }
    }

    /// Abort the search once `flag` is set; polled with the clock.
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }

    /// Search without progress reporting.
    pub fn search(
        &mut self,
        game_state: &mut GameState,
        limits: SearchLimits,
    ) -> ChessResult<SearchResult> {
        self.search_with_reporter(game_state, limits, &mut |_| {})
    }

    /// Run iterative deepening and call `reporter` after each finished depth.
    ///
    /// `game_state` is mutated during the search and restored before return.
    /// `best_move` is `None` only when the side to move has no legal move.
    pub fn search_with_reporter(
        &mut self,
        game_state: &mut GameState,
        limits: SearchLimits,
        reporter: &mut dyn FnMut(&SearchInfo),
    ) -> ChessResult<SearchResult> {
        self.nodes = 0;
        self.stopped = false;
        self.start = Instant::now();
        self.deadline = limits.move_time.map(|budget| self.start + budget);

        let root_moves = self.generator.all_legal_moves(game_state)?;
        if root_moves.is_empty() {
            let tables = &self.context.attacks;
            let best_score = if game_state.is_in_check(tables, game_state.side_to_move) {
                -INFINITY
            } else {
                0
            };
            return Ok(SearchResult {
                best_score,
                nodes: 1,
                ..SearchResult::default()
            });
        }

        let mut best: Option<(Move, i32)> = None;
        let mut reached_depth = 0u8;
        let mut fallback: Option<(Move, i32)> = None;

        for depth in 1..=limits.max_depth.max(1) {
            let previous_best = best.map(|(mv, _)| mv);
            let ordered = order_moves(game_state, &root_moves, previous_best);

            let mut alpha = -INFINITY;
            let beta = INFINITY;
            let mut depth_best: Option<(Move, i32)> = None;
            let mut searched = 0usize;

            for scored in &ordered {
                let mv = scored.mv;
                game_state.make_move(mv)?;
                let result = self.alpha_beta(game_state, depth - 1, -beta, -alpha);
                game_state.unmake_move(mv)?;
                let score = -result?;

                if self.stopped {
                    break;
                }
                searched += 1;

                if depth_best.map_or(true, |(_, s)| score > s) {
                    depth_best = Some((mv, score));
                }
                if score > alpha {
                    alpha = score;
                }

                if self.time_up() {
                    self.stopped = true;
                    break;
                }
            }

            if searched < ordered.len() {
                // Partial depth: keep only as a last resort.
                if best.is_none() {
                    fallback = depth_best.or(Some((ordered[0].mv, 0)));
                }
                log::debug!("depth {depth} abandoned after {searched}/{} root moves", ordered.len());
                break;
            }

            let Some((mv, score)) = depth_best else {
                break;
            };
            best = Some((mv, score));
            reached_depth = depth;
            self.tt.store(TTEntry {
                key: self.context.zobrist.hash(game_state),
                depth,
                score,
                bound: Bound::Exact,
                best_move: Some(mv),
            });

            let info = SearchInfo {
                depth,
                score,
                nodes: self.nodes,
                elapsed: self.start.elapsed(),
                hashfull: self.tt.hashfull_permille(),
                pv: self.principal_variation(game_state, mv, depth)?,
            };
            log::debug!("{}", info.to_uci_line());
            reporter(&info);

            if score.abs() >= INFINITY || self.stopped {
                break;
            }
        }

        let (best_move, best_score) = best
            .or(fallback)
            .unwrap_or((root_moves[0], 0));
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        log::info!(
            "search done: bestmove {best_move} score {best_score} depth {reached_depth} nodes {} time {elapsed_ms} ms",
            self.nodes
        );

        Ok(SearchResult {
            best_move: Some(best_move),
            best_score,
            reached_depth,
            nodes: self.nodes,
            elapsed_ms,
        })
    }

    fn alpha_beta(
        &mut self,
        game_state: &mut GameState,
        depth: u8,
        mut alpha: i32,
        beta: i32,
    ) -> ChessResult<i32> {
        self.nodes += 1;
        self.poll_stop();
        if self.stopped {
            return Ok(0);
        }

        let key = self.context.zobrist.hash(game_state);
        let mut tt_move = None;
        if let Some(entry) = self.tt.probe(key) {
            tt_move = entry.best_move;
            if entry.depth >= depth {
                match entry.bound {
                    Bound::Exact => return Ok(entry.score),
                    Bound::Lower if entry.score >= beta => return Ok(beta),
                    Bound::Upper if entry.score <= alpha => return Ok(alpha),
                    _ => {}
                }
            }
        }

        let moves = self.generator.all_legal_moves(game_state)?;
        if moves.is_empty() {
            let tables = &self.context.attacks;
            return Ok(if game_state.is_in_check(tables, game_state.side_to_move) {
                -INFINITY
            } else {
                0
            });
        }

        if depth == 0 {
            return self.quiescence(game_state, alpha, beta, 0);
        }

        let mut best_move = None;
        for scored in order_moves(game_state, &moves, tt_move) {
            let mv = scored.mv;
            game_state.make_move(mv)?;
            let result = self.alpha_beta(game_state, depth - 1, -beta, -alpha);
            game_state.unmake_move(mv)?;
            let score = -result?;

            if self.stopped {
                return Ok(0);
            }

            if score >= beta {
                self.tt.store(TTEntry {
                    key,
                    depth,
                    score: beta,
                    bound: Bound::Lower,
                    best_move: Some(mv),
                });
                return Ok(beta);
            }
            if score > alpha {
                alpha = score;
                best_move = Some(mv);
            }
        }

        self.tt.store(TTEntry {
            key,
            depth,
            score: alpha,
            bound: if best_move.is_some() {
                Bound::Exact
            } else {
                Bound::Upper
            },
            best_move,
        });
        Ok(alpha)
    }

    fn quiescence(
        &mut self,
        game_state: &mut GameState,
        mut alpha: i32,
        beta: i32,
        qdepth: u8,
    ) -> ChessResult<i32> {
        self.nodes += 1;
        self.poll_stop();
        if self.stopped {
            return Ok(0);
        }

        let stand_pat = self.scorer.score(game_state);
        if qdepth >= MAX_QUIESCENCE_DEPTH {
            return Ok(stand_pat);
        }
        if stand_pat >= beta {
            return Ok(beta);
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let captures = self.generator.legal_captures(game_state)?;
        for scored in order_moves(game_state, &captures, None) {
            let mv = scored.mv;
            game_state.make_move(mv)?;
            let result = self.quiescence(game_state, -beta, -alpha, qdepth + 1);
            game_state.unmake_move(mv)?;
            let score = -result?;

            if self.stopped {
                return Ok(0);
            }
            if score >= beta {
                return Ok(beta);
            }
            if score > alpha {
                alpha = score;
            }
        }

        Ok(alpha)
    }

    /// Best move followed by the hash-table continuation, legal moves only.
    fn principal_variation(
        &mut self,
        game_state: &mut GameState,
        first: Move,
        max_len: u8,
    ) -> ChessResult<Vec<Move>> {
        let mut line = vec![first];
        game_state.make_move(first)?;

        while line.len() < usize::from(max_len) {
            let key = self.context.zobrist.hash(game_state);
            let Some(next) = self.tt.probe(key).and_then(|entry| entry.best_move) else {
                break;
            };
            let legal = self.generator.all_legal_moves(game_state)?;
            if !legal.contains(&next) {
                break;
            }
            game_state.make_move(next)?;
            line.push(next);
        }

        for &mv in line.iter().rev() {
            game_state.unmake_move(mv)?;
        }
        Ok(line)
    }

    #[inline]
    fn poll_stop(&mut self) {
        if self.nodes % TIME_CHECK_INTERVAL == 0 && self.time_up() {
            self.stopped = true;
        }
    }

    fn time_up(&self) -> bool {
        if let Some(flag) = &self.stop_flag {
            if flag.load(Ordering::Relaxed) {
                return true;
            }
        }
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use std::time::Duration;

    use super::{SearchEngine, SearchInfo, INFINITY};
    use crate::context::test_context;
    use crate::game_state::game_state::GameState;
    use crate::move_generation::move_generator::MoveGenerator;
    use crate::moves::chess_move::Move;
    use crate::search::board_scoring::MaterialScorer;
    use crate::search::time_management::SearchLimits;
    use crate::search::transposition_table::TranspositionTable;

    fn search_fen(fen: &str, limits: SearchLimits) -> (GameState, super::SearchResult) {
        let mut game = GameState::from_fen(fen).expect("FEN should parse");
        let before = game.clone();
        let mut tt = TranspositionTable::with_entries(1 << 16);
        let result = SearchEngine::new(test_context(), &mut tt, MaterialScorer)
            .search(&mut game, limits)
            .expect("search should run");
        assert_eq!(game, before, "search must leave the board as it found it");
        (game, result)
    }

    #[test]
    fn finds_mate_in_one() {
        let (mut game, result) = search_fen("6k1/5Q2/6K1/8/8/8/8/8 w - - 0 1", SearchLimits::depth(3));
        let best_move = result.best_move.expect("best move should exist");
        assert_eq!(result.best_score, INFINITY);

        game.make_move(best_move).expect("best move should apply");
        let generator = MoveGenerator::new(&test_context().attacks);
        let replies = generator.all_legal_moves(&mut game).expect("generation");
        assert!(replies.is_empty(), "best move should deliver checkmate");
        assert!(game.is_in_check(&test_context().attacks, game.side_to_move));
    }

    #[test]
    fn single_legal_move_is_returned() {
        // g1 and h2 are covered by the rook, so Kxg2 is forced.
        let fen = "7k/8/8/8/8/8/6r1/7K w - - 0 1";
        let mut game = GameState::from_fen(fen).expect("FEN should parse");
        let generator = MoveGenerator::new(&test_context().attacks);
        let legal = generator.all_legal_moves(&mut game).expect("generation");
        assert_eq!(legal.len(), 1);

        for limits in [
            SearchLimits::depth(1),
            SearchLimits::depth(4),
            SearchLimits::move_time(Duration::from_millis(1)),
        ] {
            let (_, result) = search_fen(fen, limits);
            assert_eq!(result.best_move, Some(legal[0]));
        }
    }

    #[test]
    fn prefers_winning_capture() {
        let (_, result) = search_fen("4k3/8/8/8/8/8/4q3/4KQ2 w - - 0 1", SearchLimits::depth(2));
        let best_move = result.best_move.expect("best move should exist");
        assert_eq!(best_move.to_string(), "f1e2");
        assert_eq!(result.best_score, 900);
    }

    #[test]
    fn checkmated_and_stalemated_roots_have_no_move() {
        let (_, mated) = search_fen(
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
            SearchLimits::depth(3),
        );
        assert_eq!(mated.best_move, None);
        assert_eq!(mated.best_score, -INFINITY);

        let (_, stalemate) = search_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", SearchLimits::depth(3));
        assert_eq!(stalemate.best_move, None);
        assert_eq!(stalemate.best_score, 0);
    }

    #[test]
    fn stop_flag_still_yields_a_move() {
        let mut game = GameState::new_game();
        let mut tt = TranspositionTable::with_entries(1 << 12);
        let stop = Arc::new(AtomicBool::new(true));
        let result = SearchEngine::new(test_context(), &mut tt, MaterialScorer)
            .with_stop_flag(stop)
            .search(&mut game, SearchLimits::depth(10))
            .expect("search should run");
        assert!(result.best_move.is_some());
        assert_eq!(result.reached_depth, 0);
    }

    #[test]
    fn reporter_sees_each_depth() {
        let mut game = GameState::new_game();
        let mut tt = TranspositionTable::with_entries(1 << 16);
        let mut depths = Vec::new();
        let result = SearchEngine::new(test_context(), &mut tt, MaterialScorer)
            .search_with_reporter(&mut game, SearchLimits::depth(3), &mut |info| {
                depths.push(info.depth);
                assert!(!info.pv.is_empty());
            })
            .expect("search should run");
        assert_eq!(depths, vec![1, 2, 3]);
        assert_eq!(result.reached_depth, 3);
        assert!(result.nodes > 20);
    }

    #[test]
    fn info_line_formats_scores() {
        let info = SearchInfo {
            depth: 3,
            score: INFINITY,
            nodes: 2_000,
            elapsed: Duration::from_millis(4),
            hashfull: 7,
            pv: vec![Move::new(53, 61)],
        };
        assert_eq!(
            info.to_uci_line(),
            "info depth 3 score mate 2 nodes 2000 nps 500000 time 4 hashfull 7 pv f7f8"
        );

        let info = SearchInfo {
            score: -35,
            ..info
        };
        assert!(info.to_uci_line().contains("score cp -35"));
    }
}
