use std::io::{self, BufRead, Write};

use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, Move, Position};
use tracing::warn;
use vampirc_uci::uci::{UciSearchControl, UciTimeControl};
use vampirc_uci::{UciMessage, parser};

use crate::engine::bench;
use crate::engine::eval::{OnlineTablebase, evaluate};
use crate::engine::search::{SearchLimits, Searcher};

use super::EngineError;

pub struct UCI {
    pub board: Chess,
    searcher: Searcher,
}

impl UCI {
    pub fn new() -> Self {
        UCI {
            board: Chess::default(),
            searcher: Searcher::new(),
        }
    }

    pub fn run(&mut self) {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(_) => break,
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let msg = parser::parse_one(line);
            match msg {
                UciMessage::Uci => self.cmd_uci(&mut stdout),
                UciMessage::IsReady => writeln!(stdout, "readyok").unwrap(),
                UciMessage::SetOption { name, value } => {
                    self.apply_setoption(name.trim(), value.as_deref());
                }
                UciMessage::UciNewGame => self.cmd_ucinewgame(),
                UciMessage::Position {
                    startpos,
                    fen,
                    moves,
                } => {
                    let fen_str = fen.as_ref().map(|f| f.as_str());
                    let move_strs: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
                    let refs: Vec<&str> = move_strs.iter().map(String::as_str).collect();
                    if let Err(err) = self.apply_position(startpos, fen_str, &refs) {
                        warn!("position rejected: {err}");
                        writeln!(stdout, "info string {err}").unwrap();
                    }
                }
                UciMessage::Go {
                    time_control,
                    search_control,
                } => {
                    let limits = go_to_limits(time_control.as_ref(), search_control.as_ref());
                    self.do_go(limits, &mut stdout);
                }
                UciMessage::Stop => {
                    // only flips the deadline flag; an in-flight search
                    // observes it at its next poll point
                    self.searcher.time_control().trip();
                }
                UciMessage::Quit => break,
                UciMessage::Unknown(ref s, _) => {
                    let parts: Vec<&str> = s.split_whitespace().collect();
                    if let Some(&first) = parts.first() {
                        match first {
                            "d" | "display" => self.cmd_display(&mut stdout),
                            "eval" => self.cmd_eval(&mut stdout),
                            "bench" => {
                                bench::run();
                            }
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
            stdout.flush().unwrap();
        }
    }

    fn cmd_uci(&self, stdout: &mut io::Stdout) {
        writeln!(stdout, "id name Phalanx {}", env!("CARGO_PKG_VERSION")).unwrap();
        writeln!(stdout, "id author Phalanx Team").unwrap();
        writeln!(stdout).unwrap();
        writeln!(stdout, "option name OnlineTablebase type check default false").unwrap();
        writeln!(stdout, "uciok").unwrap();
    }

    /// Apply setoption by name and value.
    fn apply_setoption(&mut self, name: &str, value: Option<&str>) {
        let opt = name.to_lowercase().replace([' ', '_'], "");
        let value = value.unwrap_or("").trim();
        if opt == "onlinetablebase" {
            let enabled = value.eq_ignore_ascii_case("true") || value == "1";
            self.searcher.set_tablebase(if enabled {
                Some(Box::new(OnlineTablebase::new()))
            } else {
                None
            });
        }
    }

    pub fn cmd_ucinewgame(&mut self) {
        self.board = Chess::default();
    }

    /// Parse a raw `position ...` command split on whitespace.
    pub fn cmd_position(&mut self, parts: &[&str]) -> Result<(), EngineError> {
        let mut idx = 1;
        let startpos = idx < parts.len() && parts[idx] == "startpos";
        let mut fen_str: Option<String> = None;
        let mut move_strs: Vec<&str> = Vec::new();

        if startpos {
            idx += 1;
        } else if idx < parts.len() && parts[idx] == "fen" {
            idx += 1;
            let mut fen_parts = Vec::new();
            while idx < parts.len() && parts[idx] != "moves" {
                fen_parts.push(parts[idx]);
                idx += 1;
            }
            fen_str = Some(fen_parts.join(" "));
        }

        if idx < parts.len() && parts[idx] == "moves" {
            idx += 1;
            move_strs = parts[idx..].to_vec();
        }

        self.apply_position(startpos, fen_str.as_deref(), &move_strs)
    }

    /// Load a position and replay moves. A rejected FEN leaves the
    /// previously active position in effect; unparseable or illegal
    /// replay moves are skipped.
    fn apply_position(
        &mut self,
        startpos: bool,
        fen: Option<&str>,
        move_strs: &[&str],
    ) -> Result<(), EngineError> {
        let mut board = if startpos {
            Chess::default()
        } else if let Some(fen_str) = fen {
            let parsed: Fen = fen_str
                .parse()
                .map_err(|_| EngineError::InvalidFen(fen_str.to_string()))?;
            parsed
                .into_position(CastlingMode::Standard)
                .map_err(|_| EngineError::InvalidFen(fen_str.to_string()))?
        } else {
            self.board.clone()
        };

        for &s in move_strs {
            if let Some(mv) = parse_move_on(&board, s) {
                if let Ok(next) = board.clone().play(&mv) {
                    board = next;
                }
            }
        }

        self.board = board;
        Ok(())
    }

    pub fn parse_move(&self, move_str: &str) -> Option<Move> {
        parse_move_on(&self.board, move_str)
    }

    /// Run the search and emit the final bestmove line.
    fn do_go(&mut self, limits: SearchLimits, stdout: &mut io::Stdout) {
        let result = self.searcher.search(&self.board, limits);
        match result.best_move {
            Some(mv) => writeln!(
                stdout,
                "bestmove {} ponder 0000",
                mv.to_uci(CastlingMode::Standard)
            )
            .unwrap(),
            None => writeln!(stdout, "bestmove 0000 ponder 0000").unwrap(),
        }
    }

    fn cmd_display(&self, stdout: &mut io::Stdout) {
        writeln!(stdout, "\n{:?}", self.board).unwrap();
    }

    fn cmd_eval(&self, stdout: &mut io::Stdout) {
        let score = evaluate(&self.board, self.board.turn());
        writeln!(stdout, "Evaluation: {} cp", score).unwrap();
        writeln!(
            stdout,
            "(Positive = {} advantage)",
            if self.board.turn() == Color::White {
                "White"
            } else {
                "Black"
            }
        )
        .unwrap();
    }
}

fn parse_move_on(board: &Chess, move_str: &str) -> Option<Move> {
    let uci: UciMove = move_str.parse().ok()?;
    let mv = uci.to_move(board).ok()?;
    if board.is_legal(&mv) { Some(mv) } else { None }
}

/// Build SearchLimits from a vampirc-parsed go command.
fn go_to_limits(
    time_control: Option<&UciTimeControl>,
    search_control: Option<&UciSearchControl>,
) -> SearchLimits {
    let mut limits = SearchLimits::default();

    if let Some(sc) = search_control {
        limits.depth = sc.depth.map(i32::from);
        limits.nodes = sc.nodes;
    }

    if let Some(tc) = time_control {
        match tc {
            UciTimeControl::Infinite => limits.infinite = true,
            UciTimeControl::MoveTime(d) => {
                limits.movetime = Some(duration_to_millis(d));
            }
            UciTimeControl::TimeLeft {
                white_time,
                black_time,
                white_increment,
                black_increment,
                moves_to_go,
            } => {
                limits.wtime = white_time.as_ref().map(duration_to_millis);
                limits.btime = black_time.as_ref().map(duration_to_millis);
                limits.winc = white_increment.as_ref().map(duration_to_millis);
                limits.binc = black_increment.as_ref().map(duration_to_millis);
                limits.movestogo = moves_to_go.map(u32::from);
            }
            _ => {}
        }
    }

    limits
}

fn duration_to_millis(d: &vampirc_uci::Duration) -> u64 {
    d.num_milliseconds().max(0) as u64
}

impl Default for UCI {
    fn default() -> Self {
        Self::new()
    }
}
