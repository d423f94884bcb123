//! Search tests: fixed-depth contract, mate detection and ordering,
//! cancellation behavior, and the iterative deepening driver.

use std::time::Duration;

use phalanx::engine::eval::evaluate;
use phalanx::engine::search::{SearchLimits, Searcher, search_fixed};
use phalanx::engine::types::{INFINITY, MATE_BASE};
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Position, Square};

fn from_fen(fen: &str) -> Chess {
    let f: Fen = fen.parse().unwrap();
    f.into_position(CastlingMode::Standard).unwrap()
}

fn to_fen(pos: &Chess) -> String {
    Fen::from_position(pos.clone(), EnPassantMode::Legal).to_string()
}

#[test]
fn depth_zero_returns_the_static_evaluation() {
    let positions = [
        Chess::default(),
        from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 10"),
        from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 b - - 0 11"),
    ];
    for pos in positions {
        let (score, mv) = search_fixed(&pos, 0, -INFINITY, INFINITY);
        assert_eq!(score, evaluate(&pos, pos.turn()));
        assert!(mv.is_none());
    }
}

#[test]
fn the_only_legal_move_is_found_at_every_depth() {
    // black is in check from the rook and has exactly one square
    let pos = from_fen("R6k/8/5K2/8/8/8/8/8 b - - 0 1");
    assert_eq!(pos.legal_moves().len(), 1);
    for depth in 1..=4 {
        let (_, mv) = search_fixed(&pos, depth, -INFINITY, INFINITY);
        let mv = mv.expect("a legal move exists");
        assert_eq!(mv.from(), Some(Square::H8));
        assert_eq!(mv.to(), Square::H7);
    }
}

#[test]
fn mate_in_one_is_found_at_depth_one() {
    let pos = from_fen("6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1");
    let (score, mv) = search_fixed(&pos, 1, -INFINITY, INFINITY);
    assert_eq!(score, MATE_BASE + 1);
    assert_eq!(mv.expect("mating move").to(), Square::E8);
}

#[test]
fn mate_scores_order_by_remaining_depth() {
    let pos = from_fen("6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1");
    let (shallow, _) = search_fixed(&pos, 1, -INFINITY, INFINITY);
    let (deep, _) = search_fixed(&pos, 3, -INFINITY, INFINITY);
    assert!(shallow > MATE_BASE);
    assert!(deep > MATE_BASE);
    assert!(deep > shallow, "a mate nearer the root must rank higher");
}

#[test]
fn mate_is_still_preferred_at_depth_two() {
    let pos = from_fen("6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1");
    let (score, _) = search_fixed(&pos, 2, -INFINITY, INFINITY);
    assert!(score > MATE_BASE);
}

#[test]
fn startpos_depth_one_returns_a_quiet_legal_move() {
    let pos = Chess::default();
    let mut searcher = Searcher::new();
    let limits = SearchLimits {
        depth: Some(1),
        ..Default::default()
    };
    let result = searcher.search(&pos, limits);
    let mv = result.best_move.expect("startpos has legal moves");
    assert!(pos.is_legal(&mv));
    // symmetric material and tables; what remains is development tempo
    assert!(result.score.abs() < 100);
    assert_eq!(result.depth, 1);
    assert!(result.nodes > 0);
}

#[test]
fn driver_searches_startpos_to_depth_three() {
    let pos = Chess::default();
    let mut searcher = Searcher::new();
    let limits = SearchLimits {
        depth: Some(3),
        ..Default::default()
    };
    let result = searcher.search(&pos, limits);
    assert!(result.best_move.is_some());
    assert_eq!(result.depth, 3);
}

#[test]
fn driver_reports_mate_and_stops_early() {
    let pos = from_fen("6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1");
    let mut searcher = Searcher::new();
    let limits = SearchLimits {
        depth: Some(6),
        ..Default::default()
    };
    let result = searcher.search(&pos, limits);
    assert!(result.score > MATE_BASE);
    assert_eq!(result.best_move.expect("mating move").to(), Square::E8);
    // no point iterating to the requested limit once mate is proven
    assert!(result.depth < 6);
}

#[test]
fn node_limit_stops_the_search() {
    let pos = Chess::default();
    let mut searcher = Searcher::new();
    let limits = SearchLimits {
        nodes: Some(1000),
        ..Default::default()
    };
    let result = searcher.search(&pos, limits);
    assert!(result.best_move.is_some());
}

#[test]
fn a_mated_root_has_no_best_move() {
    // fool's mate: white is checkmated, no legal moves
    let pos = from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
    let mut searcher = Searcher::new();
    let limits = SearchLimits {
        depth: Some(2),
        ..Default::default()
    };
    let result = searcher.search(&pos, limits);
    assert!(result.best_move.is_none());
    assert!(result.score < -MATE_BASE);
}

#[test]
fn stopped_search_returns_a_move_and_leaves_the_position_intact() {
    let pos = from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 10");
    let before = to_fen(&pos);

    let mut searcher = Searcher::new();
    let handle = searcher.time_control();
    let stopper = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(30));
        handle.trip();
    });

    // no depth or time limit: only the stop signal ends this search
    let result = searcher.search(&pos, SearchLimits::default());
    stopper.join().unwrap();

    assert!(result.best_move.is_some());
    assert_eq!(to_fen(&pos), before);
    assert!(result.elapsed < Duration::from_secs(5));
}
