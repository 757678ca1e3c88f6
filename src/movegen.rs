//! Move generation from movement rules alone.
//!
//! Destinations are produced without looking at king safety: a move that
//! leaves the mover's own king attacked is still generated. Output order is
//! fixed by the offset and direction tables in [`crate::constants`], which
//! keeps the search reproducible.

use crate::board::{Board, Color, Move, Piece, PieceKind, Square};
use crate::constants::{BISHOP_DIRS, KING_OFFSETS, KNIGHT_OFFSETS, QUEEN_DIRS, ROOK_DIRS};
use crate::error::{GameError, GameResult};

/// Destinations for the piece standing on `from`.
///
/// # Errors
/// - [`GameError::EmptySquare`] if `from` holds no piece
pub fn generate_moves(board: &Board, from: Square) -> GameResult<Vec<Square>> {
    let piece = board
        .get(from)
        .ok_or(GameError::EmptySquare { square: from })?;
    Ok(destinations(board, from, piece))
}

/// Destinations for `piece` as if it stood on `from`.
pub fn destinations(board: &Board, from: Square, piece: Piece) -> Vec<Square> {
    let mut out = Vec::with_capacity(28);
    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, from, piece.color, &mut out),
        PieceKind::Knight => step_moves(board, from, piece.color, &KNIGHT_OFFSETS, &mut out),
        PieceKind::Bishop => ray_moves(board, from, piece.color, &BISHOP_DIRS, &mut out),
        PieceKind::Rook => ray_moves(board, from, piece.color, &ROOK_DIRS, &mut out),
        PieceKind::Queen => ray_moves(board, from, piece.color, &QUEEN_DIRS, &mut out),
        PieceKind::King => step_moves(board, from, piece.color, &KING_OFFSETS, &mut out),
    }
    out
}

/// Every move available to `color`, pieces taken in row-major order.
pub fn moves_for(board: &Board, color: Color) -> Vec<Move> {
    board
        .pieces_of(color)
        .flat_map(|(from, piece)| {
            destinations(board, from, piece)
                .into_iter()
                .map(move |to| Move::new(from, to))
        })
        .collect()
}

/// `true` if `sq` is empty or holds a piece of the other color.
#[inline]
fn open_for(board: &Board, sq: Square, color: Color) -> bool {
    board.get(sq).is_none_or(|p| p.color != color)
}

fn pawn_moves(board: &Board, from: Square, color: Color, out: &mut Vec<Square>) {
    let dir = color.forward();
    let Some(one) = from.offset(dir, 0) else {
        // Pawns never promote; one on the last row is stuck.
        return;
    };

    if board.get(one).is_none() {
        out.push(one);
        if from.row == color.pawn_row() {
            if let Some(two) = one.offset(dir, 0) {
                if board.get(two).is_none() {
                    out.push(two);
                }
            }
        }
    }

    for dc in [-1, 1] {
        if let Some(target) = from.offset(dir, dc) {
            if board.get(target).is_some_and(|p| p.color != color) {
                out.push(target);
            }
        }
    }
}

fn step_moves(
    board: &Board,
    from: Square,
    color: Color,
    offsets: &[(isize, isize)],
    out: &mut Vec<Square>,
) {
    for &(dr, dc) in offsets {
        if let Some(to) = from.offset(dr, dc) {
            if open_for(board, to, color) {
                out.push(to);
            }
        }
    }
}

fn ray_moves(
    board: &Board,
    from: Square,
    color: Color,
    dirs: &[(isize, isize)],
    out: &mut Vec<Square>,
) {
    for &(dr, dc) in dirs {
        let mut cur = from;
        while let Some(to) = cur.offset(dr, dc) {
            match board.get(to) {
                None => out.push(to),
                Some(p) => {
                    if p.color != color {
                        out.push(to);
                    }
                    break;
                }
            }
            cur = to;
        }
    }
}
