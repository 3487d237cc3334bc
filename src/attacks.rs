// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::move_generator::{GenerationMode, MoveGenerator, MoveVec};
use crate::position::Position;
use crate::types::{Color, Square};

/// Returns every square attacked by the given side, one entry per attacking
/// piece. A square attacked by two pieces appears twice.
pub fn attacked_squares(pos: &Position, by: Color) -> impl Iterator<Item = Square> {
    let mut attacks = MoveVec::default();
    MoveGenerator::new().generate_pseudolegal(pos, by, GenerationMode::Attacks, &mut attacks);
    attacks.into_iter().map(|mov| mov.destination())
}

/// Returns whether or not any piece of the given side attacks the given square.
///
/// Castling never appears in attack generation, which is what lets castling
/// legality ask this question without recursing into itself.
pub fn is_attacked(pos: &Position, square: Square, by: Color) -> bool {
    attacked_squares(pos, by).any(|target| target == square)
}

#[cfg(test)]
mod tests {
    use super::{attacked_squares, is_attacked};
    use crate::position::Position;
    use crate::types::{Color, Square};

    #[test]
    fn pawn_attacks_diagonals() {
        let pos = Position::from_fen("8/8/8/8/8/8/4P3/8 w - - 0 1").unwrap();
        assert!(is_attacked(&pos, Square::D3, Color::White));
        assert!(is_attacked(&pos, Square::F3, Color::White));
        // pushes are not attacks
        assert!(!is_attacked(&pos, Square::E3, Color::White));
    }

    #[test]
    fn black_pawn_attacks_down() {
        let pos = Position::from_fen("8/4p3/8/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(is_attacked(&pos, Square::D6, Color::Black));
        assert!(!is_attacked(&pos, Square::D8, Color::Black));
    }

    #[test]
    fn slider_blocked() {
        let pos = Position::from_fen("8/8/8/8/8/8/4P3/4R3 w - - 0 1").unwrap();
        assert!(!is_attacked(&pos, Square::E4, Color::White));
        assert!(is_attacked(&pos, Square::A1, Color::White));
    }

    #[test]
    fn slider_attacks_through_to_enemy() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4R3 b - - 0 1").unwrap();
        assert!(is_attacked(&pos, Square::E8, Color::White));
    }

    #[test]
    fn empty_board_attacks_nothing() {
        let pos = Position::from_fen("8/8/8/8/8/8/8/8 w - - 0 0").unwrap();
        assert_eq!(0, attacked_squares(&pos, Color::White).count());
        assert!(!is_attacked(&pos, Square::E4, Color::Black));
    }

    #[test]
    fn king_attacks() {
        let pos = Position::from_fen("8/8/8/8/8/8/8/K7 w - - 0 1").unwrap();
        assert_eq!(3, attacked_squares(&pos, Color::White).count());
        assert!(is_attacked(&pos, Square::B2, Color::White));
    }
}
