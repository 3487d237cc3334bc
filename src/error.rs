// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use thiserror::Error;

use crate::types::{Offset, Square};

/// An offset was applied to a square and the result fell off the board.
/// Move generation treats this as "no such square"; it never escapes the
/// generator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("{square} offset ({}, {}) is out of bounds", .offset.file, .offset.rank)]
pub struct OutOfBounds {
    pub square: Square,
    pub offset: Offset,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid square: {0:?}")]
pub struct SquareParseError(pub String);

/// Possible errors that can arise when parsing a FEN string into a `Position`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum FenParseError {
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("invalid digit in board description")]
    InvalidDigit,
    #[error("rank does not sum to eight squares")]
    FileDoesNotSumToEight,
    #[error("unknown piece")]
    UnknownPiece,
    #[error("invalid side to move")]
    InvalidSideToMove,
    #[error("invalid castling rights")]
    InvalidCastle,
    #[error("invalid en-passant square")]
    InvalidEnPassant,
    #[error("empty halfmove clock")]
    EmptyHalfmove,
    #[error("invalid halfmove clock")]
    InvalidHalfmove,
    #[error("empty fullmove clock")]
    EmptyFullmove,
    #[error("invalid fullmove clock")]
    InvalidFullmove,
}

/// A move token could not be turned into exactly one legal move.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NotationError {
    /// The token does not have the shape of algebraic notation at all.
    #[error("unrecognized move notation {token:?}")]
    Malformed { token: String },

    /// The token parsed, but zero or several legal moves match it.
    #[error("move notation {token:?} matches {candidates} legal moves, expected exactly one")]
    Unresolved { token: String, candidates: usize },
}

impl NotationError {
    pub fn token(&self) -> &str {
        match self {
            NotationError::Malformed { token } => token,
            NotationError::Unresolved { token, .. } => token,
        }
    }

    /// Number of legal moves that matched the token; zero for malformed
    /// tokens.
    pub fn candidates(&self) -> usize {
        match self {
            NotationError::Malformed { .. } => 0,
            NotationError::Unresolved { candidates, .. } => *candidates,
        }
    }
}
