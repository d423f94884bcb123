//! Fixed benchmark suite: a depth-limited search over a set of known
//! positions, reporting aggregate nodes, time, and nodes per second.
//! Tablebase probing stays disabled for the duration; each position is
//! searched by a fresh `Searcher`.

use std::time::{Duration, Instant};

use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess};

use crate::engine::search::{SearchLimits, Searcher};

pub const BENCH_POSITIONS: [&str; 10] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 10",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 11",
    "4rrk1/pp1n3p/3q2pQ/2p1pb2/2PP4/2P3N1/P2B2PP/4RRK1 b - - 7 19",
    "rq3rk1/ppp2ppp/1bnpN3/3N2B1/4P3/7P/PPPQ1PP1/2KR3R b - - 0 14",
    "r1bq1r1k/1pp1n1pp/1p1p4/4p2Q/4PpP1/1BNP4/PPP2P1P/3R1RK1 b - g3 0 14",
    "r3r1k1/2p2ppp/p1p1bn2/8/1q2P3/2NPQN2/PPP3PP/R4RK1 b - - 2 15",
    "r1bbk1nr/pp3p1p/2n5/1N4p1/2Np1B2/8/PPP2PPP/2KR1B1R w kq - 0 13",
    "r1bq1rk1/ppp1nppp/4n3/3p3Q/3P4/1BP1B3/PP1N2PP/R4RK1 w - - 1 16",
    "4r1k1/r1q2ppp/ppp2n2/4P3/5Rb1/1N1BQ3/PPP3PP/R5K1 w - - 1 17",
];

pub const BENCH_DEPTH: i32 = 3;

#[derive(Clone, Copy, Debug)]
pub struct BenchReport {
    pub nodes: u64,
    pub elapsed: Duration,
}

pub fn run() -> BenchReport {
    let mut total_nodes = 0u64;
    let start = Instant::now();

    for fen in BENCH_POSITIONS {
        let pos: Chess = match fen
            .parse::<Fen>()
            .ok()
            .and_then(|f| f.into_position(CastlingMode::Standard).ok())
        {
            Some(p) => p,
            None => continue,
        };
        println!("\nposition fen {fen}");
        let mut searcher = Searcher::new();
        let limits = SearchLimits {
            depth: Some(BENCH_DEPTH),
            ..Default::default()
        };
        let result = searcher.search(&pos, limits);
        total_nodes += result.nodes;
    }

    let elapsed = start.elapsed();
    let secs = elapsed.as_secs_f64();
    let nps = if secs > 0.0 {
        total_nodes as f64 / secs
    } else {
        0.0
    };
    println!("\nNodes searched: {total_nodes}");
    println!("Time taken: {secs:.2}s");
    println!("Nodes per second: {nps:.2}");

    BenchReport {
        nodes: total_nodes,
        elapsed,
    }
}
