//! Error types for board queries and the game session.

use crate::board::{Color, Square};

/// Errors raised by the engine.
///
/// Clicks on squares that cannot be acted on are not errors; the
/// orchestrator reports them as ignored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// No king of the given color is on the board.
    #[error("no {color} king on the board")]
    MissingKing { color: Color },

    /// Moves were requested for a square holding no piece.
    #[error("no piece on {square}")]
    EmptySquare { square: Square },

    /// A square name or coordinate pair could not be parsed.
    #[error("invalid square: {text}")]
    InvalidSquare { text: String },

    /// A named setting (color, pruning mode) could not be parsed.
    #[error("invalid {what}: {text}")]
    InvalidSetting { what: &'static str, text: String },
}

/// Result type alias for engine operations.
pub type GameResult<T> = Result<T, GameError>;
