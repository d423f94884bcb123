//! Fixed-depth negamax with alpha-beta and heuristic pruning.
//!
//! Every node works on its own child clone of the position, so the
//! caller's position is never mutated, cancelled searches included.
//! Cancellation is polled at the top of each call and at the top of the
//! move loop, never inside the evaluation.

use std::time::Instant;

use shakmaty::{Chess, Move, Position};

use crate::engine::eval;
use crate::engine::eval::TablebaseProbe;
use crate::engine::types::{DRAW_SCORE, INFINITY, MATE_BASE, Phase, piece_value};

use super::killers::KillerTable;
use super::timeman::TimeControl;

/// No pruning while the node evaluation is beyond this magnitude; wild
/// tactical positions are searched in full.
const PRUNE_EVAL_CEILING: i32 = 750;
/// Captures with a static-exchange estimate below this are skipped.
const SEE_PRUNE_THRESHOLD: i32 = -50;
/// A move whose look-ahead evaluation falls this far below alpha is
/// skipped, provided the evaluation stays inside the band below.
const LOOKAHEAD_MARGIN: i32 = 200;
const LOOKAHEAD_BAND: i32 = 500;

/// Mutable state of one search invocation. Fresh per call to the
/// driver; nothing here is shared between searches.
pub(super) struct SearchContext<'a> {
    pub(super) nodes: u64,
    pub(super) killers: KillerTable,
    pub(super) timer: &'a TimeControl,
    pub(super) deadline: Option<Instant>,
    pub(super) node_limit: Option<u64>,
    pub(super) tablebase: Option<&'a dyn TablebaseProbe>,
}

impl<'a> SearchContext<'a> {
    pub(super) fn new(timer: &'a TimeControl, tablebase: Option<&'a dyn TablebaseProbe>) -> Self {
        SearchContext {
            nodes: 0,
            killers: KillerTable::new(),
            timer,
            deadline: None,
            node_limit: None,
            tablebase,
        }
    }

    /// Cooperative stop check: the shared flag, the node budget, and a
    /// direct deadline comparison that bounds overrun even when the
    /// timer thread is scheduled late.
    pub(super) fn should_stop(&self) -> bool {
        if self.timer.is_expired() {
            return true;
        }
        if let Some(limit) = self.node_limit {
            if self.nodes >= limit {
                return true;
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                self.timer.trip();
                return true;
            }
        }
        false
    }

    pub(super) fn negamax(
        &mut self,
        pos: &Chess,
        depth: i32,
        mut alpha: i32,
        beta: i32,
    ) -> (i32, Option<Move>) {
        let side = pos.turn();
        if self.should_stop() {
            return (eval::evaluate(pos, side), None);
        }
        self.nodes += 1;

        if depth <= 0 {
            return (eval::evaluate_with(pos, side, self.tablebase), None);
        }

        let legals = pos.legal_moves();
        if legals.is_empty() {
            return if pos.is_checkmate() {
                (-(MATE_BASE + depth), None)
            } else {
                (DRAW_SCORE, None)
            };
        }

        let node_eval = eval::evaluate(pos, side);
        let phase = eval::game_phase(pos);
        let mut best_score = -INFINITY;
        let mut best_move: Option<Move> = None;

        for (i, mv) in legals.iter().enumerate() {
            if self.should_stop() {
                break;
            }
            // the first move is always searched, so the principal line
            // never loses its terminal checks to a heuristic skip
            if i > 0 && self.prune(pos, mv, depth, alpha, node_eval, phase) {
                continue;
            }

            let child = match pos.clone().play(mv) {
                Ok(p) => p,
                Err(_) => continue,
            };
            if child.is_checkmate() {
                return (MATE_BASE + depth, Some(mv.clone()));
            }
            let score = if is_draw(&child) {
                DRAW_SCORE
            } else {
                -self.negamax(&child, depth - 1, -beta, -alpha).0
            };

            if score > best_score {
                best_score = score;
                best_move = Some(mv.clone());
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                self.killers.record(mv, depth);
                break;
            }
        }

        match best_move {
            Some(mv) => (best_score, Some(mv)),
            // cancelled before any branch completed: fall back to the
            // first legal move and the static evaluation
            None => (node_eval, Some(legals[0].clone())),
        }
    }

    fn prune(
        &mut self,
        pos: &Chess,
        mv: &Move,
        depth: i32,
        alpha: i32,
        node_eval: i32,
        phase: Phase,
    ) -> bool {
        if node_eval.abs() > PRUNE_EVAL_CEILING {
            return false;
        }
        if mv.is_capture() && see_estimate(pos, mv, phase) < SEE_PRUNE_THRESHOLD {
            return true;
        }
        if self.killers.matches_near(mv, depth) {
            return true;
        }
        // at depth 1 the look-ahead would cost as much as the recursion
        // it is trying to save
        if depth >= 2 {
            if let Ok(child) = pos.clone().play(mv) {
                if child.is_checkmate() {
                    return false;
                }
                let e = eval::evaluate(&child, pos.turn());
                if e < alpha - LOOKAHEAD_MARGIN && e.abs() < LOOKAHEAD_BAND {
                    self.killers.record(mv, depth);
                    return true;
                }
            }
        }
        false
    }
}

fn is_draw(pos: &Chess) -> bool {
    pos.is_stalemate() || pos.is_insufficient_material() || pos.halfmoves() >= 100
}

/// Cheap static-exchange estimate of a capture: a higher-valued piece
/// taking a defended lower-valued one scores the raw material loss,
/// anything else scores zero. En passant is pawn-takes-pawn, zero.
pub(crate) fn see_estimate(pos: &Chess, mv: &Move, phase: Phase) -> i32 {
    let Some(victim) = mv.capture() else { return 0 };
    let attacker_v = piece_value(mv.role(), phase);
    let victim_v = piece_value(victim, phase);
    if attacker_v > victim_v {
        let board = pos.board();
        let defenders = board.attacks_to(mv.to(), !pos.turn(), board.occupied()).count();
        if defenders >= 1 {
            return victim_v - attacker_v;
        }
    }
    0
}

/// Fixed-depth search over a single position with fresh per-invocation
/// state and no limits. Depth 0 returns the bare evaluation.
pub fn search_fixed(pos: &Chess, depth: i32, alpha: i32, beta: i32) -> (i32, Option<Move>) {
    let timer = TimeControl::new();
    let mut ctx = SearchContext::new(&timer, None);
    ctx.negamax(pos, depth, alpha, beta)
}
