//! Minimax search with alpha-beta pruning.
//!
//! The search works on one shared board. Every simulated move is applied
//! through a [`MoveGuard`], which takes the move back when it goes out of
//! scope, so the board is restored on every exit path, cut-offs included.
//!
//! White is always the maximizing side and Black the minimizing side; scores
//! come from [`evaluate`] at the leaves. A side with no moves at all scores
//! as the worst possible outcome for itself (`-INF` for White, `+INF` for
//! Black).
//!
//! ## Pruning modes
//!
//! - [`Pruning::Full`] leaves the whole node on `beta <= alpha`
//! - [`Pruning::PerPiece`] only leaves the current piece's move list and
//!   carries on with the next piece
//! - [`Pruning::Disabled`] never cuts, giving plain minimax
//!
//! All three produce the same root scores and the same chosen move; they
//! differ only in how many nodes they visit.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use tracing::debug;

use crate::board::{Board, Color, Move, Piece, Square};
use crate::constants::INF;
use crate::error::{GameError, GameResult};
use crate::eval::evaluate;
use crate::movegen::{destinations, moves_for};

/// How aggressively the search cuts branches.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Pruning {
    #[default]
    Full,
    PerPiece,
    Disabled,
}

impl fmt::Display for Pruning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pruning::Full => write!(f, "full"),
            Pruning::PerPiece => write!(f, "per-piece"),
            Pruning::Disabled => write!(f, "none"),
        }
    }
}

impl FromStr for Pruning {
    type Err = GameError;

    fn from_str(s: &str) -> GameResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(Pruning::Full),
            "per-piece" | "piece" => Ok(Pruning::PerPiece),
            "none" | "off" | "disabled" => Ok(Pruning::Disabled),
            _ => Err(GameError::InvalidSetting {
                what: "pruning mode",
                text: s.to_string(),
            }),
        }
    }
}

/// Applies a move to a board and undoes it when dropped.
///
/// Derefs to the board so recursion can keep working on it while the move
/// is in place.
pub struct MoveGuard<'a> {
    board: &'a mut Board,
    mv: Move,
    captured: Option<Piece>,
}

impl<'a> MoveGuard<'a> {
    pub fn apply(board: &'a mut Board, mv: Move) -> Self {
        let captured = board.apply(mv);
        Self {
            board,
            mv,
            captured,
        }
    }

    /// The piece that stood on the destination before the move.
    pub fn captured(&self) -> Option<Piece> {
        self.captured
    }
}

impl Deref for MoveGuard<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        self.board.unapply(self.mv, self.captured);
    }
}

/// Counters gathered during one search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes entered, leaves included
    pub nodes: u64,
    /// Times a `beta <= alpha` cut-off was taken
    pub cutoffs: u64,
}

/// Outcome of a root search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// Chosen move, `None` if the side had no moves
    pub best: Option<Move>,
    /// Score of the chosen move (White-positive)
    pub score: i32,
    pub stats: SearchStats,
}

/// Alpha-beta searcher.
#[derive(Clone, Debug, Default)]
pub struct Searcher {
    pruning: Pruning,
    halted: bool,
    stats: SearchStats,
}

impl Searcher {
    pub fn new(pruning: Pruning) -> Self {
        Self {
            pruning,
            halted: false,
            stats: SearchStats::default(),
        }
    }

    /// Treat every node as a leaf, as happens once the game is over.
    ///
    /// [`Game`](crate::game::Game) never searches a finished game, so only
    /// direct callers of [`Searcher::search`] set this.
    pub fn halted(mut self, halted: bool) -> Self {
        self.halted = halted;
        self
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Score the board `depth` plies deep with White maximizing.
    ///
    /// `maximizing` selects the side to move at this node: `true` for White.
    /// The board is left exactly as it was found.
    pub fn search(
        &mut self,
        board: &mut Board,
        depth: u32,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.stats.nodes += 1;
        if depth == 0 || self.halted {
            return evaluate(board);
        }

        let color = if maximizing { Color::White } else { Color::Black };
        let mut best = if maximizing { -INF } else { INF };

        // Siblings all see the same board since each child is undone.
        let pieces: Vec<(Square, Piece)> = board.pieces_of(color).collect();

        'pieces: for (from, piece) in pieces {
            for to in destinations(board, from, piece) {
                let score = {
                    let mut child = MoveGuard::apply(board, Move::new(from, to));
                    self.search(&mut child, depth - 1, !maximizing, alpha, beta)
                };

                if maximizing {
                    best = best.max(score);
                    alpha = alpha.max(score);
                } else {
                    best = best.min(score);
                    beta = beta.min(score);
                }

                if beta <= alpha {
                    match self.pruning {
                        Pruning::Full => {
                            self.stats.cutoffs += 1;
                            break 'pieces;
                        }
                        Pruning::PerPiece => {
                            self.stats.cutoffs += 1;
                            break;
                        }
                        Pruning::Disabled => {}
                    }
                }
            }
        }

        best
    }

    /// Pick the move for `color`, scoring each root move with a full-window
    /// search `depth` plies below it.
    ///
    /// White keeps the highest score, Black the lowest; ties go to the move
    /// found first (pieces in row-major order, then move-list order).
    pub fn best_move(&mut self, board: &mut Board, color: Color, depth: u32) -> SearchResult {
        self.stats = SearchStats::default();
        let mut best: Option<(Move, i32)> = None;

        for mv in moves_for(board, color) {
            let score = {
                let mut child = MoveGuard::apply(board, mv);
                self.search(&mut child, depth, color == Color::Black, -INF, INF)
            };

            let better = match best {
                None => true,
                Some((_, current)) => match color {
                    Color::White => score > current,
                    Color::Black => score < current,
                },
            };
            if better {
                best = Some((mv, score));
            }
        }

        let result = SearchResult {
            best: best.map(|(mv, _)| mv),
            score: best.map_or_else(|| evaluate(board), |(_, s)| s),
            stats: self.stats,
        };
        debug!(
            side = %color,
            depth,
            pruning = %self.pruning,
            nodes = result.stats.nodes,
            cutoffs = result.stats.cutoffs,
            best = ?result.best.map(|m| m.to_string()),
            score = result.score,
            "search finished"
        );
        result
    }
}
