//! UCI protocol front-end.
//!
//! Parses UCI commands, keeps the current position and engine options, hands
//! `go` requests to a background search worker and writes every protocol line
//! to the response channel.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, PoisonError};

use crate::context::EngineContext;
use crate::errors::{ChessError, ChessResult};
use crate::game_state::game_state::GameState;
use crate::move_generation::move_generator::MoveGenerator;
use crate::move_generation::perft::perft_divide;
use crate::search::time_management::{resolve_limits, GoParams, MAX_SEARCH_DEPTH};
use crate::search::transposition_table::TranspositionTable;
use crate::uci::search_worker::SearchWorker;
use crate::utils::long_algebraic::parse_move_text;
use crate::utils::render_game_state::describe_game_state;

const UCI_ENGINE_NAME: &str = "Ironfin";
const UCI_ENGINE_AUTHOR: &str = "the Ironfin developers";

const DEFAULT_HASH_MB: usize = TranspositionTable::DEFAULT_SIZE_MB;

const MAX_HASH_MB: usize = 4096;
const MAX_MOVE_OVERHEAD_MS: u64 = 5_000;
const DEFAULT_MOVE_OVERHEAD_MS: u64 = 30;

pub struct UciState {
    context: Arc<EngineContext>,
    game_state: GameState,
    tt: Arc<Mutex<TranspositionTable>>,
    hash_mb: usize,
    fixed_depth: u8,
    move_overhead_ms: u64,
    search: Option<SearchWorker>,
    responses: Sender<String>,
}

impl UciState {
    pub fn new(context: Arc<EngineContext>, responses: Sender<String>) -> Self {
        Self {
            context,
            game_state: GameState::new_game(),
            tt: Arc::new(Mutex::new(TranspositionTable::new_with_mb(DEFAULT_HASH_MB))),
            hash_mb: DEFAULT_HASH_MB,
            fixed_depth: 0,
            move_overhead_ms: DEFAULT_MOVE_OVERHEAD_MS,
            search: None,
            responses,
        }
    }

    fn send(&self, line: impl Into<String>) {
        // The receiver only goes away at shutdown.
        let _ = self.responses.send(line.into());
    }

    fn is_searching(&self) -> bool {
        self.search.as_ref().is_some_and(SearchWorker::is_running)
    }

    fn stop_search(&mut self) {
        if let Some(mut worker) = self.search.take() {
            worker.stop();
        }
    }

    /// Handle one input line. Returns `true` when the engine should exit.
    pub fn handle_command(&mut self, line: &str) -> bool {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return false;
        }

        let cmd = trimmed.split_whitespace().next().unwrap_or_default();
        log::debug!("uci <- {trimmed}");

        match cmd {
            "uci" => {
                self.send(format!("id name {UCI_ENGINE_NAME}"));
                self.send(format!("id author {UCI_ENGINE_AUTHOR}"));
                self.send(format!(
                    "option name Hash type spin default {DEFAULT_HASH_MB} min 1 max {MAX_HASH_MB}"
                ));
                self.send(format!(
                    "option name FixedDepth type spin default 0 min 0 max {MAX_SEARCH_DEPTH}"
                ));
                self.send(format!(
                    "option name MoveOverhead type spin default {DEFAULT_MOVE_OVERHEAD_MS} min 0 max {MAX_MOVE_OVERHEAD_MS}"
                ));
                self.send("uciok");
            }
            "isready" => self.send("readyok"),
            "setoption" => {
                if let Err(err) = self.handle_setoption(trimmed) {
                    log::warn!("setoption rejected: {err}");
                    self.send(format!("info string setoption error: {err}"));
                }
            }
            "ucinewgame" => {
                self.stop_search();
                self.game_state = GameState::new_game();
                self.tt.lock().unwrap_or_else(PoisonError::into_inner).clear();
            }
            "position" => {
                if self.is_searching() {
                    log::warn!("position ignored while a search is running");
                    self.send("info string position ignored: search in progress");
                } else if let Err(err) = self.handle_position(trimmed) {
                    log::warn!("position rejected: {err}");
                    self.send(format!("info string position error: {err}"));
                }
            }
            "go" => {
                if self.is_searching() {
                    log::warn!("go ignored while a search is running");
                    self.send("info string go ignored: search in progress");
                } else if let Err(err) = self.handle_go(trimmed) {
                    log::error!("go failed: {err}");
                    self.send(format!("info string go error: {err}"));
                    self.send("bestmove 0000");
                }
            }
            "stop" => self.stop_search(),
            "d" => {
                for row in describe_game_state(&self.game_state).lines() {
                    self.send(row);
                }
            }
            "quit" => {
                self.stop_search();
                return true;
            }
            _ => {
                log::debug!("ignoring unknown command '{cmd}'");
            }
        }

        false
    }

    fn handle_setoption(&mut self, line: &str) -> Result<(), String> {
        let mut tokens = line.split_whitespace();
        let _ = tokens.next(); // setoption

        let mut name_tokens = Vec::<&str>::new();
        let mut value_tokens = Vec::<&str>::new();
        let mut mode = "";

        for tok in tokens {
            match tok {
                "name" => mode = "name",
                "value" => mode = "value",
                _ if mode == "name" => name_tokens.push(tok),
                _ if mode == "value" => value_tokens.push(tok),
                _ => {}
            }
        }

        let name = name_tokens.join(" ");
        let value = value_tokens.join(" ");

        if name.eq_ignore_ascii_case("Hash") {
            if self.is_searching() {
                return Err("cannot resize Hash during a search".to_owned());
            }
            let parsed = value
                .parse::<usize>()
                .map_err(|_| format!("invalid Hash value '{value}'"))?;
            self.hash_mb = parsed.clamp(1, MAX_HASH_MB);
            *self.tt.lock().unwrap_or_else(PoisonError::into_inner) =
                TranspositionTable::new_with_mb(self.hash_mb);
            log::info!("hash resized to {} MB", self.hash_mb);
        } else if name.eq_ignore_ascii_case("FixedDepth") {
            let parsed = value
                .parse::<u8>()
                .map_err(|_| format!("invalid FixedDepth value '{value}'"))?;
            self.fixed_depth = parsed.min(MAX_SEARCH_DEPTH);
        } else if name.eq_ignore_ascii_case("MoveOverhead") {
            let parsed = value
                .parse::<u64>()
                .map_err(|_| format!("invalid MoveOverhead value '{value}'"))?;
            self.move_overhead_ms = parsed.min(MAX_MOVE_OVERHEAD_MS);
        } else {
            return Err(format!("unknown option '{name}'"));
        }

        Ok(())
    }

    fn handle_position(&mut self, line: &str) -> ChessResult<()> {
        let mut tokens = line.split_whitespace().peekable();
        let _ = tokens.next(); // "position"

        let mut base_state = match tokens.next() {
            Some("startpos") => GameState::new_game(),
            Some("fen") => {
                let mut fen_parts = Vec::<&str>::new();
                while let Some(next) = tokens.next_if(|tok| *tok != "moves") {
                    fen_parts.push(next);
                }
                if fen_parts.is_empty() {
                    return Err(ChessError::InvalidFen(
                        "missing FEN after 'position fen'".to_owned(),
                    ));
                }
                let fen = fen_parts.join(" ");
                let parsed = GameState::from_fen(&fen)?;
                if !parsed.validate(&self.context.attacks) {
                    return Err(ChessError::InvalidFen(format!(
                        "position fails sanity checks: '{fen}'"
                    )));
                }
                parsed
            }
            Some(other) => {
                return Err(ChessError::InvalidFen(format!(
                    "unsupported position token '{other}'"
                )))
            }
            None => {
                return Err(ChessError::InvalidFen(
                    "incomplete position command".to_owned(),
                ))
            }
        };

        if tokens.next_if_eq(&"moves").is_some() {
            let generator = MoveGenerator::new(&self.context.attacks);
            for text in tokens {
                let mv = parse_move_text(text, &base_state)?;
                if !generator.all_legal_moves(&mut base_state)?.contains(&mv) {
                    return Err(ChessError::IllegalMove(text.to_owned()));
                }
                base_state.make_move(mv)?;
            }
        }

        self.game_state = base_state;
        Ok(())
    }

    fn handle_go(&mut self, line: &str) -> ChessResult<()> {
        let params = parse_go_params(line);

        if let Some(depth) = params.perft {
            let generator = MoveGenerator::new(&self.context.attacks);
            let mut game_state = self.game_state.clone();
            let divide = perft_divide(&generator, &mut game_state, depth)?;
            let total: u64 = divide.iter().map(|(_, nodes)| nodes).sum();
            for (mv, nodes) in divide {
                self.send(format!("{mv}: {nodes}"));
            }
            self.send("");
            self.send(format!("Nodes searched: {total}"));
            return Ok(());
        }

        let limits = resolve_limits(
            &self.game_state,
            &params,
            self.fixed_depth,
            self.move_overhead_ms,
        );
        log::info!(
            "go: depth {} budget {:?}",
            limits.max_depth,
            limits.move_time
        );

        // Reap the previous, already finished worker.
        self.stop_search();
        let worker = SearchWorker::spawn(
            Arc::clone(&self.context),
            Arc::clone(&self.tt),
            self.game_state.clone(),
            limits,
            self.responses.clone(),
        )
        .map_err(|err| ChessError::SearchThread(err.to_string()))?;
        self.search = Some(worker);
        Ok(())
    }
}

pub fn parse_go_params(line: &str) -> GoParams {
    let mut params = GoParams::default();
    let tokens = line.split_whitespace().collect::<Vec<_>>();
    let mut i = 0usize;
    while i < tokens.len() {
        match tokens[i] {
            "depth" => {
                i += 1;
                params.depth = tokens.get(i).and_then(|x| x.parse::<u8>().ok());
            }
            "movetime" => {
                i += 1;
                params.movetime_ms = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            "wtime" => {
                i += 1;
                params.wtime_ms = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            "btime" => {
                i += 1;
                params.btime_ms = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            "winc" => {
                i += 1;
                params.winc_ms = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            "binc" => {
                i += 1;
                params.binc_ms = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            "movestogo" => {
                i += 1;
                params.movestogo = tokens.get(i).and_then(|x| x.parse::<u16>().ok());
            }
            "perft" => {
                i += 1;
                params.perft = tokens.get(i).and_then(|x| x.parse::<u8>().ok());
            }
            "infinite" => {
                params.infinite = true;
            }
            _ => {}
        }
        i += 1;
    }
    params
}
