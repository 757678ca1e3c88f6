//! Housechess: a two-player chess variant with a minimax opponent.
//!
//! The rules are simplified: no castling, en passant, or promotion, and moves
//! are not filtered for king safety. A game ends when a king is captured, or
//! when the side to move has been caught in check with no way out three
//! times (a house rule, not standard checkmate).
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, piece values, and engine parameters
//! - [`board`] - Pieces, squares, and the 8x8 grid
//! - [`movegen`] - Move generation from movement rules
//! - [`check`] - Check detection and the escape test
//! - [`eval`] - Material evaluation
//! - [`search`] - Minimax with alpha-beta pruning
//! - [`game`] - Game session: turns, selection, move log, endings
//! - [`protocol`] - Text protocol for driving a session
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```
//! use housechess::board::Square;
//! use housechess::game::{ClickOutcome, Game, GameConfig};
//!
//! let mut game = Game::new(GameConfig::two_players());
//!
//! // Black opens: select the E7 pawn, then move it to E6
//! game.click("e7".parse().unwrap()).unwrap();
//! let outcome = game.click("e6".parse().unwrap()).unwrap();
//! assert!(matches!(outcome, ClickOutcome::Moved(_)));
//! assert_eq!(game.status(), "White's Turn");
//! ```

pub mod board;
pub mod check;
pub mod constants;
pub mod error;
pub mod eval;
pub mod game;
pub mod movegen;
pub mod protocol;
pub mod search;
