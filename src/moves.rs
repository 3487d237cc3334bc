// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `moves` module contains the definition of a Move. A move is nothing more
//! than the square a piece leaves, the square it lands on, and, for pawns
//! reaching the last rank, the kind it promotes to. Everything else about a
//! move (whether it captures, castles, or takes en passant) is a property of the
//! position it is played in and is worked out by the move applier.
use std::fmt;

use crate::types::{PieceKind, Square};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Move {
    source: Square,
    destination: Square,
    promotion: Option<PieceKind>,
}

impl Move {
    /// Constructs a move from the source square to the destination square.
    pub fn new(source: Square, destination: Square) -> Move {
        Move {
            source,
            destination,
            promotion: None,
        }
    }

    /// Constructs a pawn move from the source square to the destination
    /// square, promoting the pawn to the given piece kind.
    pub fn promotion(source: Square, destination: Square, kind: PieceKind) -> Move {
        assert!(
            kind != PieceKind::Pawn && kind != PieceKind::King,
            "invalid promotion piece"
        );
        Move {
            source,
            destination,
            promotion: Some(kind),
        }
    }

    /// Returns the source square of this move.
    pub fn source(self) -> Square {
        self.source
    }

    /// Returns the destination square of this move.
    pub fn destination(self) -> Square {
        self.destination
    }

    /// If this move is a promotion, returns the piece kind that the pawn is
    /// being promoted to.
    pub fn promotion_piece(self) -> Option<PieceKind> {
        self.promotion
    }

    pub fn is_promotion(self) -> bool {
        self.promotion.is_some()
    }

    /// Returns this move with the given promotion kind attached.
    pub fn with_promotion(self, kind: PieceKind) -> Move {
        Move::promotion(self.source, self.destination, kind)
    }
}

/// Moves display in UCI long algebraic form, e.g. `e2e4` or `e7e8q`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.source, self.destination)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Move;
    use crate::types::{PieceKind, Square};

    #[test]
    fn quiet_display() {
        assert_eq!("e2e4", Move::new(Square::E2, Square::E4).to_string());
    }

    #[test]
    fn promotion_display() {
        let mov = Move::promotion(Square::E7, Square::E8, PieceKind::Knight);
        assert_eq!("e7e8n", mov.to_string());
        assert_eq!(Some(PieceKind::Knight), mov.promotion_piece());
    }

    #[test]
    fn structural_equality() {
        assert_eq!(
            Move::new(Square::G1, Square::F3),
            Move::new(Square::G1, Square::F3)
        );
        assert_ne!(
            Move::new(Square::E7, Square::E8).with_promotion(PieceKind::Queen),
            Move::new(Square::E7, Square::E8).with_promotion(PieceKind::Rook)
        );
    }

    #[test]
    #[should_panic]
    fn king_promotion_panics() {
        Move::promotion(Square::E7, Square::E8, PieceKind::King);
    }
}
