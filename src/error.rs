//! Error types for the engine.

use thiserror::Error;

use crate::outcome::Outcome;

/// Precondition violations reported by the engine.
///
/// The search itself is total over well-formed boards, so every variant here
/// describes a caller mistake rather than a runtime failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("board must have {expected} cells, got {got}")]
    InvalidBoardLength { expected: usize, got: usize },

    #[error("invalid cell value {value} at position {position} (expected 0 or 1)")]
    InvalidCellValue { value: u8, position: usize },

    #[error("invalid character '{character}' at position {position}")]
    InvalidCellCharacter { character: char, position: usize },

    #[error("invalid player id {0} (expected 0 or 1)")]
    InvalidPlayer(u8),

    #[error("move {0} is outside the board")]
    MoveOutOfRange(usize),

    #[error("cell {0} is already occupied")]
    CellOccupied(usize),

    #[error("game is already decided: {0}")]
    GameOver(Outcome),

    #[error("no valid moves available")]
    NoValidMoves,
}

/// Convenience result alias.
pub type Result<T> = std::result::Result<T, Error>;
