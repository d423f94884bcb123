//! Optional endgame tablebase probe.
//!
//! The probe is an injected capability: the evaluation asks it for a
//! verdict on low-piece positions and falls back to the ordinary
//! computation on any failure. The bundled implementation queries the
//! lichess.org online tablebase over HTTP.

use std::time::Duration;

use serde::Deserialize;
use shakmaty::fen::Fen;
use shakmaty::{Chess, EnPassantMode, Position};
use tracing::debug;

use crate::engine::types::{DRAW_SCORE, MATE_BASE, MAX_DEPTH};

/// Positions with at most this many pieces are worth probing.
pub const TB_PIECE_LIMIT: usize = 7;

const PROBE_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TbOutcome {
    Win,
    Loss,
    Draw,
}

/// Verdict for the side to move, with distance to mate in plies.
#[derive(Clone, Copy, Debug)]
pub struct TbResult {
    pub outcome: TbOutcome,
    pub distance_to_mate: i32,
}

/// External tablebase query. `None` means unavailable; callers must
/// degrade to their own computation, never propagate the failure.
pub trait TablebaseProbe: Send {
    fn probe(&self, pos: &Chess) -> Option<TbResult>;
}

/// Mate-distance score for a probe verdict, on the same scale as search
/// mate scores: a nearer mate ranks strictly higher.
pub fn tb_score(result: TbResult) -> i32 {
    let distance = result.distance_to_mate.abs().min(MAX_DEPTH);
    match result.outcome {
        TbOutcome::Win => MATE_BASE + (MAX_DEPTH - distance),
        TbOutcome::Loss => -(MATE_BASE + (MAX_DEPTH - distance)),
        TbOutcome::Draw => DRAW_SCORE,
    }
}

#[derive(Deserialize)]
struct TbResponse {
    category: String,
    dtm: Option<i32>,
}

/// Probe backed by the lichess online tablebase.
pub struct OnlineTablebase {
    client: reqwest::blocking::Client,
    endpoint: String,
}

const DEFAULT_ENDPOINT: &str = "http://tablebase.lichess.ovh/standard";

impl OnlineTablebase {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: &str) -> Self {
        OnlineTablebase {
            client: reqwest::blocking::Client::new(),
            endpoint: endpoint.to_string(),
        }
    }
}

impl Default for OnlineTablebase {
    fn default() -> Self {
        Self::new()
    }
}

impl TablebaseProbe for OnlineTablebase {
    fn probe(&self, pos: &Chess) -> Option<TbResult> {
        if pos.board().occupied().count() > TB_PIECE_LIMIT {
            return None;
        }

        let fen = Fen::from_position(pos.clone(), EnPassantMode::Legal).to_string();
        let url = format!("{}?fen={}", self.endpoint, fen.replace(' ', "_"));

        let response = match self.client.get(&url).timeout(PROBE_TIMEOUT).send() {
            Ok(r) => r,
            Err(err) => {
                debug!("tablebase unreachable: {err}");
                return None;
            }
        };
        let body = match response.text() {
            Ok(t) => t,
            Err(err) => {
                debug!("tablebase read failed: {err}");
                return None;
            }
        };
        let parsed: TbResponse = match serde_json::from_str(&body) {
            Ok(p) => p,
            Err(err) => {
                debug!("malformed tablebase response: {err}");
                return None;
            }
        };

        let outcome = match parsed.category.as_str() {
            "win" => TbOutcome::Win,
            "loss" => TbOutcome::Loss,
            "draw" | "cursed-win" | "blessed-loss" => TbOutcome::Draw,
            other => {
                debug!("unknown tablebase category: {other}");
                return None;
            }
        };

        Some(TbResult {
            outcome,
            distance_to_mate: parsed.dtm.unwrap_or(0),
        })
    }
}
