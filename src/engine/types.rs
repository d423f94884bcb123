//! Score constants, game phase, and piece values.

use shakmaty::Role;

/// Alpha-beta window bound. Never returned as a final score.
pub const INFINITY: i32 = 1_000_000;

/// Base of the mate-score band. A mate detected with `d` remaining plies
/// scores `MATE_BASE + d`, so a mate nearer the root outranks a deeper
/// one while every mate score stays inside the search window.
pub const MATE_BASE: i32 = 900_000;

pub const DRAW_SCORE: i32 = 0;

pub const MAX_DEPTH: i32 = 64;

/// Game phase, derived from total non-king material.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Middlegame,
    Endgame,
}

const PAWN_VALUE_MG: i32 = 99;
const KNIGHT_VALUE_MG: i32 = 300;
const BISHOP_VALUE_MG: i32 = 320;
const ROOK_VALUE_MG: i32 = 500;
const QUEEN_VALUE_MG: i32 = 900;

const PAWN_VALUE_EG: i32 = 149;
const KNIGHT_VALUE_EG: i32 = 279;
const BISHOP_VALUE_EG: i32 = 349;
const ROOK_VALUE_EG: i32 = 600;
pub const QUEEN_VALUE_EG: i32 = 1100;

const KING_VALUE: i32 = 50_000;

/// Centipawn value of a piece in the given phase.
pub fn piece_value(role: Role, phase: Phase) -> i32 {
    match phase {
        Phase::Middlegame => match role {
            Role::Pawn => PAWN_VALUE_MG,
            Role::Knight => KNIGHT_VALUE_MG,
            Role::Bishop => BISHOP_VALUE_MG,
            Role::Rook => ROOK_VALUE_MG,
            Role::Queen => QUEEN_VALUE_MG,
            Role::King => KING_VALUE,
        },
        Phase::Endgame => match role {
            Role::Pawn => PAWN_VALUE_EG,
            Role::Knight => KNIGHT_VALUE_EG,
            Role::Bishop => BISHOP_VALUE_EG,
            Role::Rook => ROOK_VALUE_EG,
            Role::Queen => QUEEN_VALUE_EG,
            Role::King => KING_VALUE,
        },
    }
}
