//! Board model: pieces, squares, and the 8x8 grid.
//!
//! Rows run from 0 (Black's back rank) to 7 (White's back rank); columns run
//! from 0 to 7 left to right from White's side. Square names follow the
//! usual letter/number convention, so row 7 column 0 is `A1`.

use std::fmt;
use std::str::FromStr;

use crate::constants::{BLACK_PAWN_ROW, N, WHITE_PAWN_ROW};
use crate::error::{GameError, GameResult};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Capitalised name, as shown in status lines ("White").
    pub fn name(self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Black => "Black",
        }
    }

    /// Row delta of a pawn step for this color.
    #[inline]
    pub fn forward(self) -> isize {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    #[inline]
    pub fn pawn_row(self) -> usize {
        match self {
            Color::White => WHITE_PAWN_ROW,
            Color::Black => BLACK_PAWN_ROW,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

impl FromStr for Color {
    type Err = GameError;

    fn from_str(s: &str) -> GameResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "w" | "white" => Ok(Color::White),
            "b" | "black" => Ok(Color::Black),
            _ => Err(GameError::InvalidSetting {
                what: "color",
                text: s.to_string(),
            }),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// A colored piece. Pieces are plain values; two pawns of one color are equal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Unicode chess glyph (hollow for White, filled for Black).
    pub fn glyph(self) -> char {
        use PieceKind::*;
        match (self.color, self.kind) {
            (Color::White, Pawn) => '♙',
            (Color::White, Knight) => '♘',
            (Color::White, Bishop) => '♗',
            (Color::White, Rook) => '♖',
            (Color::White, Queen) => '♕',
            (Color::White, King) => '♔',
            (Color::Black, Pawn) => '♟',
            (Color::Black, Knight) => '♞',
            (Color::Black, Bishop) => '♝',
            (Color::Black, Rook) => '♜',
            (Color::Black, Queen) => '♛',
            (Color::Black, King) => '♚',
        }
    }

    /// The same piece with the other color.
    pub fn recolored(self) -> Self {
        Self::new(self.color.opponent(), self.kind)
    }
}

/// A board coordinate. Always on the board once constructed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Square {
    pub row: usize,
    pub col: usize,
}

impl Square {
    /// Returns `None` when either coordinate is off the board.
    pub fn new(row: usize, col: usize) -> Option<Self> {
        (row < N && col < N).then_some(Self { row, col })
    }

    /// Step by a (row, column) delta, or `None` if that leaves the board.
    #[inline]
    pub fn offset(self, dr: isize, dc: isize) -> Option<Self> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Self::new(row, col)
    }

    /// All 64 squares in row-major order (row 0 first).
    pub fn all() -> impl Iterator<Item = Square> {
        (0..N).flat_map(|row| (0..N).map(move |col| Square { row, col }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'A' + self.col as u8) as char;
        write!(f, "{file}{}", N - self.row)
    }
}

impl FromStr for Square {
    type Err = GameError;

    /// Parse an algebraic name such as `e2` or `E2`.
    fn from_str(s: &str) -> GameResult<Self> {
        let invalid = || GameError::InvalidSquare { text: s.to_string() };
        let bytes = s.trim().as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }
        let file = bytes[0].to_ascii_uppercase();
        let rank = bytes[1];
        if !(b'A'..b'A' + N as u8).contains(&file) || !(b'1'..=b'0' + N as u8).contains(&rank) {
            return Err(invalid());
        }
        let col = (file - b'A') as usize;
        let row = N - (rank - b'0') as usize;
        Square::new(row, col).ok_or_else(invalid)
    }
}

/// A move from one square to another.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// The 8x8 grid.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Option<Piece>; N]; N],
}

impl Default for Board {
    fn default() -> Self {
        Self::start()
    }
}

impl Board {
    /// A board with no pieces on it.
    pub fn empty() -> Self {
        Self {
            cells: [[None; N]; N],
        }
    }

    /// The standard starting position.
    pub fn start() -> Self {
        use PieceKind::*;
        const BACK_RANK: [PieceKind; N] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        let mut board = Self::empty();
        for col in 0..N {
            board.cells[0][col] = Some(Piece::new(Color::Black, BACK_RANK[col]));
            board.cells[BLACK_PAWN_ROW][col] = Some(Piece::new(Color::Black, Pawn));
            board.cells[WHITE_PAWN_ROW][col] = Some(Piece::new(Color::White, Pawn));
            board.cells[N - 1][col] = Some(Piece::new(Color::White, BACK_RANK[col]));
        }
        board
    }

    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.row][sq.col]
    }

    #[inline]
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.cells[sq.row][sq.col] = piece;
    }

    /// Place a piece, builder style. Handy for setting up positions.
    pub fn with(mut self, sq: Square, piece: Piece) -> Self {
        self.set(sq, Some(piece));
        self
    }

    /// Move whatever stands on `mv.from` to `mv.to`, returning the piece that
    /// was on the destination.
    pub fn apply(&mut self, mv: Move) -> Option<Piece> {
        let moving = self.cells[mv.from.row][mv.from.col].take();
        std::mem::replace(&mut self.cells[mv.to.row][mv.to.col], moving)
    }

    /// Reverse [`Board::apply`] given the piece it returned.
    pub fn unapply(&mut self, mv: Move, captured: Option<Piece>) {
        let moved = std::mem::replace(&mut self.cells[mv.to.row][mv.to.col], captured);
        self.cells[mv.from.row][mv.from.col] = moved;
    }

    /// Occupied squares of one color, in row-major order.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| match self.get(sq) {
            Some(p) if p.color == color => Some((sq, p)),
            _ => None,
        })
    }

    /// First king of `color` in row-major order.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|(_, p)| p.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }

    pub fn count_empty(&self) -> usize {
        Square::all().filter(|&sq| self.get(sq).is_none()).count()
    }

    /// The same board with every piece's color flipped in place.
    pub fn recolored(&self) -> Self {
        let mut out = self.clone();
        for row in out.cells.iter_mut() {
            for cell in row.iter_mut() {
                *cell = cell.map(Piece::recolored);
            }
        }
        out
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..N {
            write!(f, "{} ", N - row)?;
            for col in 0..N {
                let ch = self.cells[row][col].map_or('.', Piece::glyph);
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "  ")?;
        for col in 0..N {
            write!(f, "{} ", (b'A' + col as u8) as char)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: usize, col: usize) -> Square {
        Square::new(row, col).unwrap()
    }

    #[test]
    fn test_start_position() {
        let board = Board::start();
        assert_eq!(board.count_empty(), 32);
        assert_eq!(
            board.get(sq(0, 4)),
            Some(Piece::new(Color::Black, PieceKind::King))
        );
        assert_eq!(
            board.get(sq(7, 3)),
            Some(Piece::new(Color::White, PieceKind::Queen))
        );
        assert_eq!(board.king_square(Color::White), Some(sq(7, 4)));
        assert_eq!(board.pieces_of(Color::Black).count(), 16);
    }

    #[test]
    fn test_square_names() {
        assert_eq!(sq(7, 0).to_string(), "A1");
        assert_eq!(sq(0, 7).to_string(), "H8");
        assert_eq!(sq(2, 4).to_string(), "E6");
        assert_eq!("e2".parse::<Square>().unwrap(), sq(6, 4));
        assert_eq!("H8".parse::<Square>().unwrap(), sq(0, 7));
        assert!("i1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("a".parse::<Square>().is_err());
    }

    #[test]
    fn test_offset_leaves_board() {
        assert_eq!(sq(0, 0).offset(-1, 0), None);
        assert_eq!(sq(7, 7).offset(0, 1), None);
        assert_eq!(sq(3, 3).offset(2, -1), Some(sq(5, 2)));
    }

    #[test]
    fn test_apply_unapply_restores() {
        let mut board = Board::start();
        let before = board.clone();
        let mv = Move::new(sq(7, 1), sq(1, 0));
        let captured = board.apply(mv);
        assert_eq!(captured, Some(Piece::new(Color::Black, PieceKind::Pawn)));
        assert_eq!(board.get(sq(7, 1)), None);
        board.unapply(mv, captured);
        assert_eq!(board, before);
    }

    #[test]
    fn test_recolored_twice_is_identity() {
        let board = Board::start();
        assert_eq!(board.recolored().recolored(), board);
        assert_eq!(
            board.recolored().get(sq(0, 4)),
            Some(Piece::new(Color::White, PieceKind::King))
        );
    }
}
