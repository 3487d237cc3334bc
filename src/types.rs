// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use num_traits::{FromPrimitive, ToPrimitive};
use serde::{Serialize, Serializer};
use std::convert::TryFrom;
use std::fmt::{self, Display, Write};
use std::ops::Mul;
use std::str::FromStr;

use crate::error::{OutOfBounds, SquareParseError};

// TableIndex is a trait for all types that can serve as an index into a table.
// It is common to use these types as indices into tables, so this trait allows
// any type implementing To and FromPrimitive to be used as table indices.
pub trait TableIndex {
    fn as_index(self) -> usize;
    fn from_index(idx: usize) -> Self;
}

impl<T> TableIndex for T
where
    T: FromPrimitive + ToPrimitive,
{
    fn as_index(self) -> usize {
        self.to_u32().unwrap() as usize
    }

    fn from_index(idx: usize) -> T {
        <T as FromPrimitive>::from_u64(idx as u64).unwrap()
    }
}

#[rustfmt::skip]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive, ToPrimitive)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    pub fn of(rank: Rank, file: File) -> Square {
        Square::from_index(rank.as_index() * 8 + file.as_index())
    }

    pub fn rank(self) -> Rank {
        Rank::from_index(self.as_index() >> 3)
    }

    pub fn file(self) -> File {
        File::from_index(self.as_index() & 7)
    }

    /// Moves this square by the given offset. Fails if the result would leave
    /// the board; generators treat that as "no such square".
    pub fn translate(self, offset: Offset) -> Result<Square, OutOfBounds> {
        let file = self.file().as_index() as i32 + i32::from(offset.file);
        let rank = self.rank().as_index() as i32 + i32::from(offset.rank);
        if !(0..8).contains(&file) || !(0..8).contains(&rank) {
            return Err(OutOfBounds {
                square: self,
                offset,
            });
        }

        Ok(Square::of(
            Rank::from_index(rank as usize),
            File::from_index(file as usize),
        ))
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Square, SquareParseError> {
        let mut chars = s.chars();
        let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => (file, rank),
            _ => return Err(SquareParseError(s.to_owned())),
        };

        let file = File::try_from(file).map_err(|_| SquareParseError(s.to_owned()))?;
        let rank = Rank::try_from(rank).map_err(|_| SquareParseError(s.to_owned()))?;
        Ok(Square::of(rank, file))
    }
}

impl Serialize for Square {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[rustfmt::skip]
pub static SQUARES: [Square; 64] = [
    Square::A1, Square::B1, Square::C1, Square::D1, Square::E1, Square::F1, Square::G1, Square::H1,
    Square::A2, Square::B2, Square::C2, Square::D2, Square::E2, Square::F2, Square::G2, Square::H2,
    Square::A3, Square::B3, Square::C3, Square::D3, Square::E3, Square::F3, Square::G3, Square::H3,
    Square::A4, Square::B4, Square::C4, Square::D4, Square::E4, Square::F4, Square::G4, Square::H4,
    Square::A5, Square::B5, Square::C5, Square::D5, Square::E5, Square::F5, Square::G5, Square::H5,
    Square::A6, Square::B6, Square::C6, Square::D6, Square::E6, Square::F6, Square::G6, Square::H6,
    Square::A7, Square::B7, Square::C7, Square::D7, Square::E7, Square::F7, Square::G7, Square::H7,
    Square::A8, Square::B8, Square::C8, Square::D8, Square::E8, Square::F8, Square::G8, Square::H8,
];

/// A displacement on the board, in files and ranks. Offsets scale, so a
/// sliding piece's ray is a unit offset multiplied by the distance travelled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Offset {
    pub file: i8,
    pub rank: i8,
}

impl Offset {
    pub const fn new(file: i8, rank: i8) -> Offset {
        Offset { file, rank }
    }
}

impl Mul<i8> for Offset {
    type Output = Offset;

    fn mul(self, k: i8) -> Offset {
        Offset::new(self.file * k, self.rank * k)
    }
}

pub const STRAIGHT_OFFSETS: [Offset; 4] = [
    Offset::new(0, 1),
    Offset::new(1, 0),
    Offset::new(0, -1),
    Offset::new(-1, 0),
];

pub const DIAGONAL_OFFSETS: [Offset; 4] = [
    Offset::new(1, 1),
    Offset::new(1, -1),
    Offset::new(-1, -1),
    Offset::new(-1, 1),
];

pub const KNIGHT_OFFSETS: [Offset; 8] = [
    Offset::new(2, 1),
    Offset::new(2, -1),
    Offset::new(1, 2),
    Offset::new(-1, 2),
    Offset::new(-2, -1),
    Offset::new(-2, 1),
    Offset::new(-1, -2),
    Offset::new(1, -2),
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum Rank {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
}

impl Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char((b'1' + self.as_index() as u8) as char)
    }
}

impl TryFrom<char> for Rank {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '1'..='8' => Ok(Rank::from_index(value as usize - '1' as usize)),
            _ => Err(()),
        }
    }
}

pub static RANKS: [Rank; 8] = [
    Rank::One,
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl Display for File {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char((b'a' + self.as_index() as u8) as char)
    }
}

impl TryFrom<char> for File {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'a'..='h' => Ok(File::from_index(value as usize - 'a' as usize)),
            _ => Err(()),
        }
    }
}

pub static FILES: [File; 8] = [
    File::A,
    File::B,
    File::C,
    File::D,
    File::E,
    File::F,
    File::G,
    File::H,
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive, Serialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn toggle(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// The direction, in ranks, that this color's pawns advance.
    pub fn pawn_direction(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// The rank this color's pawns start on, the only rank a double push may
    /// begin from.
    pub fn pawn_rank(self) -> Rank {
        match self {
            Color::White => Rank::Two,
            Color::Black => Rank::Seven,
        }
    }

    /// The rank this color's pieces start on. Pawns of the opposing color
    /// promote here.
    pub fn back_rank(self) -> Rank {
        match self {
            Color::White => Rank::One,
            Color::Black => Rank::Eight,
        }
    }

    pub fn promotion_rank(self) -> Rank {
        self.toggle().back_rank()
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self {
            Color::White => 'w',
            Color::Black => 'b',
        };
        f.write_char(chr)
    }
}

pub static COLORS: [Color; 2] = [Color::White, Color::Black];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive, Serialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// The upper-case letter algebraic notation uses for this kind. Pawns have
    /// none.
    pub fn san_letter(self) -> Option<char> {
        match self {
            PieceKind::Pawn => None,
            PieceKind::Knight => Some('N'),
            PieceKind::Bishop => Some('B'),
            PieceKind::Rook => Some('R'),
            PieceKind::Queen => Some('Q'),
            PieceKind::King => Some('K'),
        }
    }
}

impl Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        f.write_char(chr)
    }
}

pub static PIECE_KINDS: [PieceKind; 6] = [
    PieceKind::Pawn,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

/// The kinds a pawn may promote to, in the order the legal move filter emits
/// them.
pub static PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Piece {
        Piece { kind, color }
    }
}

impl TryFrom<char> for Piece {
    type Error = ();

    fn try_from(c: char) -> Result<Self, Self::Error> {
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return Err(()),
        };

        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Ok(Piece::new(kind, color))
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let lower = self.kind.to_string();
        match self.color {
            Color::White => f.write_str(&lower.to_ascii_uppercase()),
            Color::Black => f.write_str(&lower),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, File, Offset, Piece, PieceKind, Rank, Square, DIAGONAL_OFFSETS};
    use std::convert::TryFrom;

    #[test]
    fn square_of_rank_and_file() {
        assert_eq!(Square::E4, Square::of(Rank::Four, File::E));
        assert_eq!(Rank::Four, Square::E4.rank());
        assert_eq!(File::E, Square::E4.file());
    }

    #[test]
    fn square_text() {
        assert_eq!("e4", Square::E4.to_string());
        assert_eq!("a1", Square::A1.to_string());
        assert_eq!("h8", Square::H8.to_string());
        assert_eq!(Ok(Square::C6), "c6".parse());
        assert!("i1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("a".parse::<Square>().is_err());
        assert!("a1a".parse::<Square>().is_err());
    }

    #[test]
    fn translate_in_bounds() {
        assert_eq!(Ok(Square::F3), Square::G1.translate(Offset::new(-1, 2)));
        assert_eq!(Ok(Square::H8), Square::A1.translate(Offset::new(1, 1) * 7));
    }

    #[test]
    fn translate_out_of_bounds() {
        assert!(Square::A1.translate(Offset::new(-1, 0)).is_err());
        assert!(Square::H8.translate(Offset::new(0, 1)).is_err());
        assert!(Square::H1.translate(Offset::new(1, 1)).is_err());
        // a ray that would wrap around the edge of the board must not
        for &offset in DIAGONAL_OFFSETS.iter() {
            assert!(Square::D4.translate(offset * 5).is_err());
        }
    }

    #[test]
    fn piece_letters() {
        assert_eq!(
            Ok(Piece::new(PieceKind::Knight, Color::White)),
            Piece::try_from('N')
        );
        assert_eq!(
            Ok(Piece::new(PieceKind::Queen, Color::Black)),
            Piece::try_from('q')
        );
        assert!(Piece::try_from('x').is_err());
        assert_eq!("K", Piece::new(PieceKind::King, Color::White).to_string());
        assert_eq!("p", Piece::new(PieceKind::Pawn, Color::Black).to_string());
    }

    #[test]
    fn color_tables() {
        assert_eq!(Color::Black, Color::White.toggle());
        assert_eq!(Rank::Eight, Color::White.promotion_rank());
        assert_eq!(Rank::One, Color::Black.promotion_rank());
        assert_eq!(Rank::Seven, Color::Black.pawn_rank());
        assert_eq!(-1, Color::Black.pawn_direction());
    }
}
