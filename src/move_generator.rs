// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Move generation. The generator works directly off of the position's square
//! contents: every piece of the side being generated for is visited in board
//! order (a1, b1, ..., h8) and its moves are produced in a fixed direction
//! order, so generation is deterministic.
//!
//! The generator has two modes. `Moves` produces pseudo-legal moves: moves that
//! obey the movement rules of each piece but that may leave the mover's own
//! king in check. `Attacks` produces the squares each piece could capture on;
//! this is what the attack oracle is built from.
use arrayvec::ArrayVec;

use crate::attacks;
use crate::moves::Move;
use crate::position::{CastleWing, Position};
use crate::types::{Color, Offset, PieceKind, Square};
use crate::types::{DIAGONAL_OFFSETS, KNIGHT_OFFSETS, PROMOTION_KINDS, SQUARES, STRAIGHT_OFFSETS};

/// Capacity of a `MoveVec`. No reachable chess position has more than 218
/// legal moves.
pub const MAX_MOVES: usize = 256;

pub type MoveVec = ArrayVec<[Move; MAX_MOVES]>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GenerationMode {
    /// Pseudo-legal moves, castling included.
    Moves,
    /// Capture targets only. Pawns attack both forward diagonals whether or not
    /// anything stands there; nothing castles.
    Attacks,
}

#[derive(Copy, Clone, Debug, Default)]
pub struct MoveGenerator;

impl MoveGenerator {
    pub fn new() -> MoveGenerator {
        MoveGenerator
    }

    /// Generates all pseudo-legal moves for the side to move.
    pub fn generate_moves(&self, pos: &Position, moves: &mut MoveVec) {
        self.generate_pseudolegal(pos, pos.side_to_move(), GenerationMode::Moves, moves)
    }

    /// Generates every legal move for the side to move. A pawn move that
    /// reaches the last rank is produced four times, once for each promotion
    /// kind.
    pub fn generate_legal(&self, pos: &Position, moves: &mut MoveVec) {
        let mut pseudolegal = MoveVec::default();
        self.generate_moves(pos, &mut pseudolegal);
        for &mov in pseudolegal.iter() {
            if !pos.is_legal_given_pseudolegal(mov) {
                continue;
            }

            if pos.is_promoting(mov) {
                for &kind in PROMOTION_KINDS.iter() {
                    moves.push(mov.with_promotion(kind));
                }
            } else {
                moves.push(mov);
            }
        }
    }

    pub fn generate_pseudolegal(
        &self,
        pos: &Position,
        side: Color,
        mode: GenerationMode,
        moves: &mut MoveVec,
    ) {
        for &square in SQUARES.iter() {
            let piece = match pos.piece_at(square) {
                Some(piece) if piece.color == side => piece,
                _ => continue,
            };

            match piece.kind {
                PieceKind::Pawn => self.generate_pawn_moves(pos, side, square, mode, moves),
                PieceKind::Knight => {
                    self.generate_steps(pos, side, square, &KNIGHT_OFFSETS, moves)
                }
                PieceKind::Bishop => {
                    self.generate_slides(pos, side, square, &DIAGONAL_OFFSETS, moves)
                }
                PieceKind::Rook => {
                    self.generate_slides(pos, side, square, &STRAIGHT_OFFSETS, moves)
                }
                PieceKind::Queen => {
                    self.generate_slides(pos, side, square, &STRAIGHT_OFFSETS, moves);
                    self.generate_slides(pos, side, square, &DIAGONAL_OFFSETS, moves);
                }
                PieceKind::King => {
                    self.generate_steps(pos, side, square, &STRAIGHT_OFFSETS, moves);
                    self.generate_steps(pos, side, square, &DIAGONAL_OFFSETS, moves);
                    if mode == GenerationMode::Moves {
                        self.generate_castles(pos, side, square, moves);
                    }
                }
            }
        }
    }

    fn generate_pawn_moves(
        &self,
        pos: &Position,
        side: Color,
        square: Square,
        mode: GenerationMode,
        moves: &mut MoveVec,
    ) {
        let forward = side.pawn_direction();
        for &file_delta in &[-1, 1] {
            let target = match square.translate(Offset::new(file_delta, forward)) {
                Ok(target) => target,
                Err(_) => continue,
            };

            if mode == GenerationMode::Attacks {
                moves.push(Move::new(square, target));
                continue;
            }

            let is_capture = match pos.piece_at(target) {
                Some(piece) => piece.color != side,
                None => pos.en_passant().map_or(false, |ep| {
                    ep.target == target
                        && pos.piece_at(ep.victim).map(|p| p.color) == Some(side.toggle())
                }),
            };

            if is_capture {
                moves.push(Move::new(square, target));
            }
        }

        if mode == GenerationMode::Attacks {
            return;
        }

        let single = match square.translate(Offset::new(0, forward)) {
            Ok(target) => target,
            Err(_) => return,
        };

        if pos.piece_at(single).is_some() {
            return;
        }

        moves.push(Move::new(square, single));
        if square.rank() != side.pawn_rank() {
            return;
        }

        if let Ok(double) = square.translate(Offset::new(0, forward) * 2) {
            if pos.piece_at(double).is_none() {
                moves.push(Move::new(square, double));
            }
        }
    }

    /// Single-step pieces: knights and kings.
    fn generate_steps(
        &self,
        pos: &Position,
        side: Color,
        square: Square,
        offsets: &[Offset],
        moves: &mut MoveVec,
    ) {
        for &offset in offsets {
            let target = match square.translate(offset) {
                Ok(target) => target,
                Err(_) => continue,
            };

            match pos.piece_at(target) {
                Some(piece) if piece.color == side => {}
                _ => moves.push(Move::new(square, target)),
            }
        }
    }

    /// Sliding pieces. Each ray runs until it leaves the board or hits a piece;
    /// an enemy piece is included as a capture, a friendly one is not.
    fn generate_slides(
        &self,
        pos: &Position,
        side: Color,
        square: Square,
        offsets: &[Offset],
        moves: &mut MoveVec,
    ) {
        for &offset in offsets {
            for distance in 1..8 {
                let target = match square.translate(offset * distance) {
                    Ok(target) => target,
                    Err(_) => break,
                };

                match pos.piece_at(target) {
                    None => moves.push(Move::new(square, target)),
                    Some(piece) if piece.color != side => {
                        moves.push(Move::new(square, target));
                        break;
                    }
                    Some(_) => break,
                }
            }
        }
    }

    fn generate_castles(&self, pos: &Position, side: Color, square: Square, moves: &mut MoveVec) {
        let home = CastleWing::king_home(side);
        if square != home || pos.has_moved_from(home) {
            return;
        }

        for &wing in CastleWing::ALL.iter() {
            let rook_square = wing.rook_home(side);
            if pos.has_moved_from(rook_square) {
                continue;
            }

            match pos.piece_at(rook_square) {
                Some(rook) if rook.kind == PieceKind::Rook && rook.color == side => {}
                _ => continue,
            }

            if wing
                .between(side)
                .iter()
                .any(|&sq| pos.piece_at(sq).is_some())
            {
                continue;
            }

            // The king may not castle out of, through, or into check.
            if wing
                .king_path(side)
                .iter()
                .any(|&sq| attacks::is_attacked(pos, sq, side.toggle()))
            {
                continue;
            }

            moves.push(Move::new(home, wing.king_destination(side)));
        }
    }
}
