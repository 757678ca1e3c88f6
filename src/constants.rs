//! Constants for board geometry, piece values, and engine parameters.
//!
//! # Automated Player
//!
//! Whether the computer opponent is on by default is controlled by a Cargo
//! feature:
//! - `computer-opponent` (default): White is played by the engine
//!
//! ```sh
//! cargo build                          # White automated
//! cargo build --no-default-features    # two humans
//! ```
//!
//! The default can still be overridden at startup (see `GameConfig`).

use std::time::Duration;

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN).
pub const N: usize = 8;

/// Pawn starting row for White (White's back rank is row 7).
pub const WHITE_PAWN_ROW: usize = 6;

/// Pawn starting row for Black (Black's back rank is row 0).
pub const BLACK_PAWN_ROW: usize = 1;

// =============================================================================
// Piece Values (material score)
// =============================================================================

pub const PAWN_VALUE: i32 = 1;
pub const KNIGHT_VALUE: i32 = 3;
pub const BISHOP_VALUE: i32 = 3;
pub const ROOK_VALUE: i32 = 5;
pub const QUEEN_VALUE: i32 = 9;

/// King value. Large so that the search never trades the king for material.
pub const KING_VALUE: i32 = 1000;

/// Score bound used as "infinity" by the search.
///
/// A side with no moves scores `-INF` for White and `+INF` for Black.
pub const INF: i32 = i32::MAX;

// =============================================================================
// Search and Game Parameters
// =============================================================================

/// Plies searched below each root move of the automated player.
pub const SEARCH_DEPTH: u32 = 3;

/// Inescapable checks that end the game (house rule).
pub const CHECK_WARNING_LIMIT: u32 = 3;

/// Pause before the automated player replies, in milliseconds.
pub const AI_DELAY_MS: u64 = 500;

/// Pause before the automated player replies.
pub const AI_DELAY: Duration = Duration::from_millis(AI_DELAY_MS);

/// Whether the automated player is on unless configured otherwise.
#[cfg(feature = "computer-opponent")]
pub const AI_ENABLED: bool = true;

#[cfg(not(feature = "computer-opponent"))]
pub const AI_ENABLED: bool = false;

// =============================================================================
// Direction Tables (row delta, column delta)
// =============================================================================

/// Knight jumps. The order fixes move-list order.
pub const KNIGHT_OFFSETS: [(isize, isize); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

/// King steps: orthogonal first, then diagonal.
pub const KING_OFFSETS: [(isize, isize); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

pub const BISHOP_DIRS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

pub const ROOK_DIRS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Queen rays: diagonals, then orthogonals.
pub const QUEEN_DIRS: [(isize, isize); 8] = [
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
];
