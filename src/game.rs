//! Game session: turn sequencing, selection, move log, and game endings.
//!
//! A [`Game`] owns every piece of mutable state for one session: the board,
//! whose turn it is, the current selection, the per-side move log, the
//! check-warning counter, and the game-over flag. The presentation layer
//! feeds it clicks and reads the state back.
//!
//! ## States
//!
//! - awaiting selection: a click on one of the mover's pieces selects it
//! - piece selected: a click on a highlighted square moves there, a click on
//!   the selected square deselects, a click on another own piece reselects,
//!   anything else is ignored
//! - game over: every click is ignored until [`Game::reset`]
//!
//! ## Endings
//!
//! Capturing a king wins at once. Separately, each time the side to move is
//! found in check with no move that gets it out, a warning is counted; the
//! third warning ends the game. A check that can be escaped is not reported.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::board::{Board, Color, Move, Piece, PieceKind, Square};
use crate::check::is_inescapable_check;
use crate::constants::{AI_DELAY, AI_ENABLED, CHECK_WARNING_LIMIT, SEARCH_DEPTH};
use crate::error::{GameError, GameResult};
use crate::movegen::destinations;
use crate::search::{Pruning, Searcher};

/// Startup settings for a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// Whether one side is played by the engine
    pub ai_enabled: bool,
    /// The side the engine plays
    pub ai_color: Color,
    /// Plies searched below each candidate move
    pub search_depth: u32,
    /// Pause the presentation layer should take before the engine replies
    pub ai_delay: Duration,
    pub pruning: Pruning,
    /// Whether the driver starts a new game right after a king capture
    pub auto_reset: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ai_enabled: AI_ENABLED,
            ai_color: Color::White,
            search_depth: SEARCH_DEPTH,
            ai_delay: AI_DELAY,
            pruning: Pruning::default(),
            auto_reset: true,
        }
    }
}

impl GameConfig {
    /// Two humans, no engine.
    pub fn two_players() -> Self {
        Self {
            ai_enabled: false,
            ..Self::default()
        }
    }
}

/// One line of the move log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    pub side: Color,
    /// Glyph plus destination, e.g. "♟ to E6"
    pub text: String,
}

impl MoveRecord {
    fn new(piece: Piece, to: Square) -> Self {
        Self {
            side: piece.color,
            text: format!("{} to {to}", piece.glyph()),
        }
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Messages the presentation layer must show the players.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Announcement {
    /// `side` is in check with no way out; `count` warnings so far
    CheckWarning { side: Color, count: u32 },
    /// The warning limit was reached; `side` lost
    Checkmate { side: Color },
    /// `winner` took the opposing king
    KingCaptured { winner: Color },
    /// The engine's side has no move at all
    Stalemate { side: Color },
}

impl fmt::Display for Announcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Announcement::CheckWarning { side, count } => write!(
                f,
                "{} is in check! Warning {count}/{CHECK_WARNING_LIMIT}",
                side.name()
            ),
            Announcement::Checkmate { side } => {
                write!(f, "{} is in checkmate! Game over.", side.name())
            }
            Announcement::KingCaptured { winner } => {
                write!(f, "{} wins by capturing the king!", winner.name())
            }
            Announcement::Stalemate { side } => {
                write!(f, "{} has no moves left. Game over.", side.name())
            }
        }
    }
}

/// Where the session stands with respect to clicks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    AwaitingSelection,
    PieceSelected,
    GameOver,
}

/// The selected piece and the squares it may move to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub square: Square,
    pub destinations: Vec<Square>,
}

/// Everything that follows from one completed move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveReport {
    pub mv: Move,
    pub record: MoveRecord,
    pub captured: Option<Piece>,
    pub announcement: Option<Announcement>,
    /// Set when the engine should reply after the given pause
    pub ai_scheduled: Option<Duration>,
}

/// Result of a click.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    Selected(Selection),
    Deselected,
    Moved(MoveReport),
}

/// Result of asking the engine to move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AiOutcome {
    /// No engine move was due
    Idle,
    Moved(MoveReport),
    /// The engine had nothing to play
    NoMove(Announcement),
}

/// One game session.
#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    board: Board,
    turn: Color,
    selection: Option<Selection>,
    history: Vec<MoveRecord>,
    check_warnings: u32,
    game_over: bool,
    winner: Option<Color>,
    ai_pending: bool,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl Game {
    /// A new game from the starting position, Black to move.
    pub fn new(config: GameConfig) -> Self {
        Self::with_position(Board::start(), Color::Black, config)
    }

    /// A game from an arbitrary position. [`Game::reset`] still goes back to
    /// the starting position.
    pub fn with_position(board: Board, to_move: Color, config: GameConfig) -> Self {
        let mut game = Self {
            config,
            board,
            turn: to_move,
            selection: None,
            history: Vec::new(),
            check_warnings: 0,
            game_over: false,
            winner: None,
            ai_pending: false,
        };
        game.ai_pending = game.is_automated(to_move);
        game
    }

    /// Return every piece of state to the start of a new game.
    pub fn reset(&mut self) {
        info!("new game");
        let config = self.config.clone();
        *self = Self::new(config);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn phase(&self) -> Phase {
        if self.game_over {
            Phase::GameOver
        } else if self.selection.is_some() {
            Phase::PieceSelected
        } else {
            Phase::AwaitingSelection
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Squares to highlight for the current selection.
    pub fn highlights(&self) -> &[Square] {
        match &self.selection {
            Some(sel) => &sel.destinations,
            None => &[],
        }
    }

    /// The full move log, both sides interleaved in play order.
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// The move log of one side.
    pub fn history_of(&self, side: Color) -> impl Iterator<Item = &MoveRecord> {
        self.history.iter().filter(move |r| r.side == side)
    }

    pub fn check_warnings(&self) -> u32 {
        self.check_warnings
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    /// Whether `side` is played by the engine.
    pub fn is_automated(&self, side: Color) -> bool {
        self.config.ai_enabled && self.config.ai_color == side
    }

    /// Pause before the engine should move, if an engine move is due.
    pub fn pending_ai_move(&self) -> Option<Duration> {
        self.ai_pending.then_some(self.config.ai_delay)
    }

    /// One-line status, e.g. "Black's Turn".
    pub fn status(&self) -> String {
        match (self.game_over, self.winner) {
            (false, _) => format!("{}'s Turn", self.turn.name()),
            (true, Some(winner)) => format!("Game over: {} wins", winner.name()),
            (true, None) => "Game over".to_string(),
        }
    }

    /// Handle a click on `sq`.
    ///
    /// Clicks that cannot be acted on (game over, engine's turn, empty or
    /// enemy square with nothing selected, unhighlighted square) come back
    /// as [`ClickOutcome::Ignored`].
    ///
    /// # Errors
    /// - [`GameError::MissingKing`] if the side to move after
    ///   the move has no king; the game is left untouched
    pub fn click(&mut self, sq: Square) -> GameResult<ClickOutcome> {
        if self.game_over || self.is_automated(self.turn) {
            return Ok(ClickOutcome::Ignored);
        }

        if let Some(sel) = &self.selection {
            if sel.destinations.contains(&sq) {
                let mv = Move::new(sel.square, sq);
                let report = self.commit_move(mv)?;
                self.selection = None;
                return Ok(ClickOutcome::Moved(report));
            }
            if sel.square == sq {
                debug!(square = %sq, "deselected");
                self.selection = None;
                return Ok(ClickOutcome::Deselected);
            }
        }

        match self.board.get(sq) {
            Some(piece) if piece.color == self.turn => {
                let selection = Selection {
                    square: sq,
                    destinations: destinations(&self.board, sq, piece),
                };
                debug!(square = %sq, moves = selection.destinations.len(), "selected");
                self.selection = Some(selection.clone());
                Ok(ClickOutcome::Selected(selection))
            }
            _ => Ok(ClickOutcome::Ignored),
        }
    }

    /// Let the engine play its scheduled move.
    ///
    /// # Errors
    /// - [`GameError::MissingKing`] as for [`Game::click`]
    pub fn play_ai_move(&mut self) -> GameResult<AiOutcome> {
        if !self.ai_pending || self.game_over {
            return Ok(AiOutcome::Idle);
        }
        let side = self.turn;
        let mut searcher = Searcher::new(self.config.pruning);
        let result = searcher.best_move(&mut self.board, side, self.config.search_depth);

        match result.best {
            Some(mv) => {
                let report = self.commit_move(mv)?;
                Ok(AiOutcome::Moved(report))
            }
            None => {
                let announcement = Announcement::Stalemate { side };
                warn!(side = %side, "engine has no move");
                self.game_over = true;
                self.ai_pending = false;
                Ok(AiOutcome::NoMove(announcement))
            }
        }
    }

    /// Play `mv` for the side to move and apply every consequence.
    fn commit_move(&mut self, mv: Move) -> GameResult<MoveReport> {
        let mover = self.turn;
        let defender = mover.opponent();

        // Work on a copy so a failed check lookup leaves the game as it was.
        let mut next = self.board.clone();
        let piece = next
            .get(mv.from)
            .ok_or(GameError::EmptySquare { square: mv.from })?;
        let captured = next.apply(mv);
        let king_taken = captured.is_some_and(|p| p.kind == PieceKind::King);
        let trapped = !king_taken && is_inescapable_check(&next, defender)?;

        self.board = next;
        let record = MoveRecord::new(piece, mv.to);
        info!(side = %mover, mv = %mv, record = %record, "move");
        self.history.push(record.clone());

        let mut announcement = None;
        if king_taken {
            self.game_over = true;
            self.winner = Some(mover);
            announcement = Some(Announcement::KingCaptured { winner: mover });
            info!(winner = %mover, "king captured");
        } else if trapped {
            self.check_warnings += 1;
            if self.check_warnings >= CHECK_WARNING_LIMIT {
                self.game_over = true;
                self.winner = Some(mover);
                announcement = Some(Announcement::Checkmate { side: defender });
                info!(loser = %defender, "checkmate by warning limit");
            } else {
                announcement = Some(Announcement::CheckWarning {
                    side: defender,
                    count: self.check_warnings,
                });
                warn!(side = %defender, count = self.check_warnings, "inescapable check");
            }
        }

        if !self.game_over {
            self.turn = defender;
        }
        self.ai_pending = !self.game_over && self.is_automated(defender);

        Ok(MoveReport {
            mv,
            record,
            captured,
            announcement,
            ai_scheduled: self.pending_ai_move(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: usize, col: usize) -> Square {
        Square::new(row, col).unwrap()
    }

    fn quick_ai() -> GameConfig {
        GameConfig {
            ai_enabled: true,
            ai_delay: Duration::ZERO,
            search_depth: 1,
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_new_game_state() {
        let game = Game::new(GameConfig::two_players());
        assert_eq!(game.turn(), Color::Black);
        assert_eq!(game.phase(), Phase::AwaitingSelection);
        assert_eq!(game.status(), "Black's Turn");
        assert!(game.history().is_empty());
        assert_eq!(game.pending_ai_move(), None);
    }

    #[test]
    fn test_select_and_deselect() {
        let mut game = Game::new(GameConfig::two_players());
        let outcome = game.click(sq(1, 4)).unwrap();
        assert_eq!(
            outcome,
            ClickOutcome::Selected(Selection {
                square: sq(1, 4),
                destinations: vec![sq(2, 4), sq(3, 4)],
            })
        );
        assert_eq!(game.phase(), Phase::PieceSelected);
        assert_eq!(game.highlights(), &[sq(2, 4), sq(3, 4)]);

        assert_eq!(game.click(sq(1, 4)).unwrap(), ClickOutcome::Deselected);
        assert_eq!(game.phase(), Phase::AwaitingSelection);
        assert!(game.highlights().is_empty());
    }

    #[test]
    fn test_ignored_clicks() {
        let mut game = Game::new(GameConfig::two_players());
        // Empty square and enemy piece with nothing selected.
        assert_eq!(game.click(sq(4, 4)).unwrap(), ClickOutcome::Ignored);
        assert_eq!(game.click(sq(6, 4)).unwrap(), ClickOutcome::Ignored);

        // Unhighlighted square keeps the selection.
        game.click(sq(1, 4)).unwrap();
        assert_eq!(game.click(sq(5, 5)).unwrap(), ClickOutcome::Ignored);
        assert_eq!(game.selection().map(|s| s.square), Some(sq(1, 4)));
    }

    #[test]
    fn test_reselect_own_piece() {
        let mut game = Game::new(GameConfig::two_players());
        game.click(sq(1, 4)).unwrap();
        let outcome = game.click(sq(0, 1)).unwrap();
        assert!(matches!(outcome, ClickOutcome::Selected(ref s) if s.square == sq(0, 1)));
        assert_eq!(game.highlights(), &[sq(2, 2), sq(2, 0)]);
    }

    #[test]
    fn test_move_switches_turn_and_logs() {
        let mut game = Game::new(GameConfig::two_players());
        game.click(sq(1, 4)).unwrap();
        let outcome = game.click(sq(2, 4)).unwrap();
        let ClickOutcome::Moved(report) = outcome else {
            panic!("expected a move, got {outcome:?}");
        };
        assert_eq!(report.record.text, "♟ to E6");
        assert_eq!(report.captured, None);
        assert_eq!(report.announcement, None);
        assert_eq!(report.ai_scheduled, None);
        assert_eq!(game.turn(), Color::White);
        assert_eq!(game.status(), "White's Turn");
        assert_eq!(game.history_of(Color::Black).count(), 1);
        assert_eq!(game.history_of(Color::White).count(), 0);
        assert_eq!(game.phase(), Phase::AwaitingSelection);
    }

    #[test]
    fn test_ai_scheduled_and_clicks_blocked() {
        let mut game = Game::new(quick_ai());
        game.click(sq(1, 4)).unwrap();
        let ClickOutcome::Moved(report) = game.click(sq(2, 4)).unwrap() else {
            panic!("expected a move");
        };
        assert_eq!(report.ai_scheduled, Some(Duration::ZERO));

        // White's pieces belong to the engine.
        assert_eq!(game.click(sq(6, 4)).unwrap(), ClickOutcome::Ignored);

        let outcome = game.play_ai_move().unwrap();
        assert!(matches!(outcome, AiOutcome::Moved(ref r) if r.record.side == Color::White));
        assert_eq!(game.turn(), Color::Black);
        assert_eq!(game.pending_ai_move(), None);
        assert_eq!(game.play_ai_move().unwrap(), AiOutcome::Idle);
    }

    #[test]
    fn test_engine_playing_black_moves_first() {
        let config = GameConfig {
            ai_color: Color::Black,
            ..quick_ai()
        };
        let mut game = Game::new(config);
        assert_eq!(game.pending_ai_move(), Some(Duration::ZERO));
        assert!(matches!(game.play_ai_move().unwrap(), AiOutcome::Moved(_)));
        assert_eq!(game.turn(), Color::White);

        game.reset();
        assert_eq!(game.pending_ai_move(), Some(Duration::ZERO));
    }

    #[test]
    fn test_engine_without_moves_ends_game() {
        // White king walled in by its own pawns on the last row.
        let board = Board::empty()
            .with(sq(0, 0), Piece::new(Color::White, PieceKind::King))
            .with(sq(0, 1), Piece::new(Color::White, PieceKind::Pawn))
            .with(sq(1, 0), Piece::new(Color::White, PieceKind::Pawn))
            .with(sq(1, 1), Piece::new(Color::White, PieceKind::Pawn))
            .with(sq(7, 7), Piece::new(Color::Black, PieceKind::King));
        let mut game = Game::with_position(board.clone(), Color::White, quick_ai());
        assert_eq!(
            game.play_ai_move().unwrap(),
            AiOutcome::NoMove(Announcement::Stalemate { side: Color::White })
        );
        assert!(game.is_over());
        assert_eq!(game.turn(), Color::White);
        assert_eq!(game.board(), &board);
    }

    #[test]
    fn test_engine_move_runs_check_rule() {
        // Black king on H8 boxed in by its own pawns; the rook can take the
        // queen on D8 and pin the king to the back row.
        let board = Board::empty()
            .with(sq(0, 0), Piece::new(Color::White, PieceKind::Rook))
            .with(sq(7, 7), Piece::new(Color::White, PieceKind::King))
            .with(sq(0, 3), Piece::new(Color::Black, PieceKind::Queen))
            .with(sq(0, 7), Piece::new(Color::Black, PieceKind::King))
            .with(sq(1, 6), Piece::new(Color::Black, PieceKind::Pawn))
            .with(sq(1, 7), Piece::new(Color::Black, PieceKind::Pawn));
        let mut game = Game::with_position(board, Color::White, quick_ai());

        let AiOutcome::Moved(report) = game.play_ai_move().unwrap() else {
            panic!("engine should have moved");
        };
        assert_eq!(report.mv, Move::new(sq(0, 0), sq(0, 3)));
        assert_eq!(report.record.to_string(), "♖ to D8");
        assert_eq!(
            report.announcement,
            Some(Announcement::CheckWarning { side: Color::Black, count: 1 })
        );
        assert_eq!(game.check_warnings(), 1);
        assert!(!game.is_over());
        assert_eq!(game.turn(), Color::Black);
    }

    #[test]
    fn test_missing_king_leaves_game_untouched() {
        let board = Board::empty()
            .with(sq(1, 0), Piece::new(Color::Black, PieceKind::Pawn))
            .with(sq(0, 7), Piece::new(Color::Black, PieceKind::King));
        let mut game = Game::with_position(board.clone(), Color::Black, GameConfig::two_players());
        game.click(sq(1, 0)).unwrap();
        assert!(game.click(sq(2, 0)).is_err());
        assert_eq!(game.board(), &board);
        assert_eq!(game.turn(), Color::Black);
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_announcement_text() {
        assert_eq!(
            Announcement::CheckWarning { side: Color::White, count: 2 }.to_string(),
            "White is in check! Warning 2/3"
        );
        assert_eq!(
            Announcement::KingCaptured { winner: Color::Black }.to_string(),
            "Black wins by capturing the king!"
        );
    }
}
