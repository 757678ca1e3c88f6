//! Material evaluation.

use crate::board::{Board, Color, PieceKind, Square};
use crate::constants::{
    BISHOP_VALUE, KING_VALUE, KNIGHT_VALUE, PAWN_VALUE, QUEEN_VALUE, ROOK_VALUE,
};

/// Material value of a piece kind.
#[inline]
pub fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => PAWN_VALUE,
        PieceKind::Knight => KNIGHT_VALUE,
        PieceKind::Bishop => BISHOP_VALUE,
        PieceKind::Rook => ROOK_VALUE,
        PieceKind::Queen => QUEEN_VALUE,
        PieceKind::King => KING_VALUE,
    }
}

/// Signed material balance: positive favours White, negative favours Black.
pub fn evaluate(board: &Board) -> i32 {
    Square::all()
        .filter_map(|sq| board.get(sq))
        .map(|p| match p.color {
            Color::White => piece_value(p.kind),
            Color::Black => -piece_value(p.kind),
        })
        .sum()
}
