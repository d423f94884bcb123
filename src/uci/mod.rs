//! UCI protocol interface

pub mod protocol;

use thiserror::Error;

/// Caller-facing configuration failures. Anything else malformed is
/// silently ignored per protocol convention.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid fen: {0}")]
    InvalidFen(String),
}

pub use protocol::UCI;
