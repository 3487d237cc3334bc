// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Chess rules: legal move generation, move application, game status and
//! algebraic notation over an immutable `Position`.
#![allow(dead_code)]

#[macro_use]
extern crate num_derive;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod attacks;
mod error;
mod move_generator;
mod moves;
mod notation;
mod perft;
mod position;
mod types;

pub use error::{FenParseError, NotationError, OutOfBounds, SquareParseError};
pub use move_generator::{GenerationMode, MoveGenerator, MoveVec, MAX_MOVES};
pub use moves::Move;
pub use perft::{divide, perft};
pub use position::{CastleOrigins, CastleWing, EnPassant, MoveHistory, Position, Status};
pub use types::{
    Color, File, Offset, Piece, PieceKind, Rank, Square, TableIndex, COLORS, DIAGONAL_OFFSETS,
    FILES, KNIGHT_OFFSETS, PIECE_KINDS, PROMOTION_KINDS, RANKS, SQUARES, STRAIGHT_OFFSETS,
};
