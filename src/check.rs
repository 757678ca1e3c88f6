//! Check detection and the escape test behind the house-rule checkmate.

use crate::board::{Board, Color, Square};
use crate::error::{GameError, GameResult};
use crate::movegen::{destinations, moves_for};

/// Locate the king of `color`.
///
/// # Errors
/// - [`GameError::MissingKing`] if `color` has no king on the board
pub fn find_king(board: &Board, color: Color) -> GameResult<Square> {
    board
        .king_square(color)
        .ok_or(GameError::MissingKing { color })
}

/// Whether any opposing piece has the king of `color` among its destinations.
///
/// # Errors
/// - [`GameError::MissingKing`] if `color` has no king on the board
pub fn is_in_check(board: &Board, color: Color) -> GameResult<bool> {
    let king = find_king(board, color)?;
    Ok(attacks(board, color.opponent(), king))
}

/// Whether any piece of `attacker` can move onto `target`.
pub fn attacks(board: &Board, attacker: Color, target: Square) -> bool {
    board
        .pieces_of(attacker)
        .any(|(from, piece)| destinations(board, from, piece).contains(&target))
}

/// Whether `color` is in check and every one of its moves leaves it in check.
///
/// Each move is tried on a scratch copy, so `board` is never touched.
///
/// # Errors
/// - [`GameError::MissingKing`] if `color` has no king on the board
pub fn is_inescapable_check(board: &Board, color: Color) -> GameResult<bool> {
    if !is_in_check(board, color)? {
        return Ok(false);
    }

    let mut scratch = board.clone();
    for mv in moves_for(board, color) {
        let captured = scratch.apply(mv);
        let still_in_check = is_in_check(&scratch, color);
        scratch.unapply(mv, captured);
        if !still_in_check? {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Piece, PieceKind};

    fn sq(row: usize, col: usize) -> Square {
        Square::new(row, col).unwrap()
    }

    fn piece(color: Color, kind: PieceKind) -> Piece {
        Piece::new(color, kind)
    }

    /// White king boxed in on H1 by its own pawns, black rook on B1.
    fn back_rank() -> Board {
        Board::empty()
            .with(sq(7, 7), piece(Color::White, PieceKind::King))
            .with(sq(6, 6), piece(Color::White, PieceKind::Pawn))
            .with(sq(6, 7), piece(Color::White, PieceKind::Pawn))
            .with(sq(7, 1), piece(Color::Black, PieceKind::Rook))
            .with(sq(0, 4), piece(Color::Black, PieceKind::King))
    }

    #[test]
    fn test_start_position_not_in_check() {
        let board = Board::start();
        assert_eq!(is_in_check(&board, Color::White), Ok(false));
        assert_eq!(is_in_check(&board, Color::Black), Ok(false));
    }

    #[test]
    fn test_missing_king_is_error() {
        let board = Board::empty().with(sq(0, 0), piece(Color::White, PieceKind::Rook));
        assert_eq!(
            is_in_check(&board, Color::Black),
            Err(GameError::MissingKing { color: Color::Black })
        );
        assert!(is_inescapable_check(&board, Color::Black).is_err());
    }

    #[test]
    fn test_rook_gives_check() {
        let board = back_rank();
        assert_eq!(is_in_check(&board, Color::White), Ok(true));
        assert_eq!(is_in_check(&board, Color::Black), Ok(false));
    }

    #[test]
    fn test_blocked_rook_gives_no_check() {
        let board = back_rank().with(sq(7, 4), piece(Color::White, PieceKind::Bishop));
        assert_eq!(is_in_check(&board, Color::White), Ok(false));
    }

    #[test]
    fn test_pawn_checks_diagonally_only() {
        let board = Board::empty()
            .with(sq(4, 4), piece(Color::White, PieceKind::King))
            .with(sq(3, 4), piece(Color::Black, PieceKind::Pawn))
            .with(sq(0, 0), piece(Color::Black, PieceKind::King));
        assert_eq!(is_in_check(&board, Color::White), Ok(false));

        let board = board.with(sq(3, 3), piece(Color::Black, PieceKind::Pawn));
        assert_eq!(is_in_check(&board, Color::White), Ok(true));
    }

    #[test]
    fn test_back_rank_is_inescapable() {
        let board = back_rank();
        let before = board.clone();
        assert_eq!(is_inescapable_check(&board, Color::White), Ok(true));
        assert_eq!(board, before);
    }

    #[test]
    fn test_escape_by_capture() {
        // A white rook on the second row can drop back and take the checker.
        let board = back_rank().with(sq(6, 1), piece(Color::White, PieceKind::Rook));
        assert_eq!(is_inescapable_check(&board, Color::White), Ok(false));
    }

    #[test]
    fn test_escape_by_king_step() {
        let board = back_rank().with(sq(6, 6), piece(Color::Black, PieceKind::Knight));
        // The king can take the knight on G2 and leave the first row.
        assert_eq!(is_inescapable_check(&board, Color::White), Ok(false));
    }

    #[test]
    fn test_not_in_check_is_not_inescapable() {
        let board = Board::start();
        assert_eq!(is_inescapable_check(&board, Color::Black), Ok(false));
    }
}
