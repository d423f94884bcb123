//! Search limits and results.

use std::time::Duration;

use shakmaty::Move;

/// Limits parsed from a `go` command.
#[derive(Clone, Debug)]
pub struct SearchLimits {
    pub depth: Option<i32>,
    pub nodes: Option<u64>,
    pub movetime: Option<u64>,
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
    pub movestogo: Option<u32>,
    pub infinite: bool,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            depth: None,
            nodes: None,
            movetime: None,
            wtime: None,
            btime: None,
            winc: None,
            binc: None,
            movestogo: None,
            infinite: false,
        }
    }
}

/// Outcome of one driver invocation.
#[derive(Clone, Debug)]
pub struct SearchResult {
    /// Best move found, or `None` when the position has no legal move.
    pub best_move: Option<Move>,
    /// Score of the best move, from the side to move's point of view.
    pub score: i32,
    /// Nodes visited across all iterations.
    pub nodes: u64,
    /// Wall-clock time spent.
    pub elapsed: Duration,
    /// Deepest fully completed iteration.
    pub depth: i32,
}
