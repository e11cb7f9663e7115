//! Background search thread driven by the UCI front end.
//!
//! The worker owns a clone of the position, locks the shared transposition
//! table for the duration of the search, and writes `info` and `bestmove`
//! lines to the response channel. `stop` raises the shared flag and joins.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use crate::context::EngineContext;
use crate::game_state::game_state::GameState;
use crate::search::board_scoring::MaterialScorer;
use crate::search::iterative_deepening::SearchEngine;
use crate::search::time_management::SearchLimits;
use crate::search::transposition_table::TranspositionTable;

pub struct SearchWorker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SearchWorker {
    pub fn spawn(
        context: Arc<EngineContext>,
        tt: Arc<Mutex<TranspositionTable>>,
        mut game_state: GameState,
        limits: SearchLimits,
        responses: Sender<String>,
    ) -> io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("search".to_owned())
            .spawn(move || {
                let line = run_search(&context, &tt, &mut game_state, limits, worker_stop, &responses);
                let _ = responses.send(line);
            })?;
        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Ask the search to finish and wait for its `bestmove`.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("search thread panicked");
            }
        }
    }
}

impl Drop for SearchWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Search `game_state` and return the `bestmove` line.
pub fn run_search(
    context: &EngineContext,
    tt: &Mutex<TranspositionTable>,
    game_state: &mut GameState,
    limits: SearchLimits,
    stop: Arc<AtomicBool>,
    responses: &Sender<String>,
) -> String {
    let mut table = tt.lock().unwrap_or_else(PoisonError::into_inner);
    let mut engine = SearchEngine::new(context, &mut table, MaterialScorer).with_stop_flag(stop);
    let mut reporter = |info: &crate::search::iterative_deepening::SearchInfo| {
        let _ = responses.send(info.to_uci_line());
    };

    match engine.search_with_reporter(game_state, limits, &mut reporter) {
        Ok(result) => match result.best_move {
            Some(mv) => format!("bestmove {mv}"),
            None => {
                let _ = responses.send("info string no legal moves".to_owned());
                "bestmove 0000".to_owned()
            }
        },
        Err(err) => {
            log::error!("search failed: {err}");
            let _ = responses.send(format!("info string search error: {err}"));
            "bestmove 0000".to_owned()
        }
    }
}
