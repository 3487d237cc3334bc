// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use arbiter::{CastleWing, Color, Move, PieceKind, Position, Square, Status};

fn play(pos: &Position, tokens: &[&str]) -> Position {
    let mut pos = pos.clone();
    for token in tokens {
        let mov = pos
            .move_from_san(token)
            .unwrap_or_else(|err| panic!("{}: {}", token, err));
        pos = pos.apply_move(mov);
    }
    pos
}

#[test]
fn open_game_keeps_castling_rights() {
    let pos = play(&Position::from_start_position(), &["e4", "e5", "Nf3", "Nc6"]);
    assert_eq!(Color::White, pos.side_to_move());
    assert_eq!(4, pos.history().len());
    assert_eq!(3, pos.fullmove_clock());
    for &color in &[Color::White, Color::Black] {
        assert!(pos.can_castle_kingside(color));
        assert!(pos.can_castle_queenside(color));
    }
    assert_eq!(
        "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
        pos.as_fen()
    );
}

#[test]
fn italian_castles() {
    let pos = play(
        &Position::from_start_position(),
        &["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5", "O-O"],
    );
    assert_eq!(Some(PieceKind::King), pos.piece_at(Square::G1).map(|p| p.kind));
    assert_eq!(Some(PieceKind::Rook), pos.piece_at(Square::F1).map(|p| p.kind));
    assert_eq!(None, pos.piece_at(Square::H1));
    assert!(!pos.can_castle_kingside(Color::White));
    assert!(!pos.can_castle_queenside(Color::White));
    assert!(pos.can_castle_kingside(Color::Black));
}

#[test]
fn returning_rook_does_not_restore_castling() {
    let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let pos = play(&pos, &["Rh2", "Ra7", "Rh1", "Ra8"]);
    assert!(!pos.can_castle(Color::White, CastleWing::Kingside));
    assert!(pos.can_castle(Color::White, CastleWing::Queenside));
    assert!(pos.move_from_san("O-O").is_err());
    assert!(pos.move_from_san("O-O-O").is_ok());
    assert_eq!("r3k2r/8/8/8/8/8/8/R3K2R w Qk - 4 3", pos.as_fen());
}

#[test]
fn castling_through_check() {
    // the rook on f2 covers f1
    let pos = Position::from_fen("4k3/8/8/8/8/8/5r2/4K2R w K - 0 1").unwrap();
    assert!(pos.move_from_san("O-O").is_err());
    assert!(!pos.is_legal(Move::new(Square::E1, Square::G1)));
}

#[test]
fn castling_out_of_check() {
    let pos = Position::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
    assert!(pos.is_check(Color::White));
    assert!(pos.move_from_san("O-O").is_err());
    assert!(pos.move_from_san("O-O-O").is_err());
}

#[test]
fn queenside_ignores_attacked_b_file() {
    let pos = Position::from_fen("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
    assert_eq!(
        Ok(Move::new(Square::E1, Square::C1)),
        pos.move_from_san("O-O-O")
    );
}

#[test]
fn en_passant_window() {
    let pos = Position::from_fen("4k3/3p4/8/4P3/8/8/8/4K3 b - - 0 1").unwrap();
    let pos = play(&pos, &["d5"]);
    assert_eq!(Some(Square::D6), pos.en_passant_square());

    let taken = play(&pos, &["exd6"]);
    assert_eq!(None, taken.piece_at(Square::D5));
    assert_eq!(Some(PieceKind::Pawn), taken.piece_at(Square::D6).map(|p| p.kind));
    assert_eq!(None, taken.en_passant_square());

    // waiting a move closes the window
    let waited = play(&pos, &["Kd1", "Kd8"]);
    assert_eq!(None, waited.en_passant_square());
    assert!(waited.move_from_san("exd6").is_err());
}

#[test]
fn fools_mate() {
    let start = Position::from_start_position();
    let before_mate = play(&start, &["f3", "e5", "g4"]);
    let queen = before_mate.move_from_san("Qh4").unwrap();
    assert_eq!("Qh4#", before_mate.san(queen));

    let pos = before_mate.apply_move(queen);
    assert_eq!(
        Status::Checkmate {
            winner: Color::Black
        },
        pos.status()
    );
    assert!(pos.is_checkmate());
    assert!(pos.is_game_over());
    assert!(!pos.is_draw());
    assert!(pos.legal_moves().is_empty());
}

#[test]
fn stalemate() {
    let pos = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(!pos.is_check(Color::Black));
    assert_eq!(Status::Stalemate, pos.status());
    assert!(pos.is_draw());
}

#[test]
fn bare_kings_is_a_draw() {
    let pos = Position::from_fen("4k3/8/8/8/8/8/3q4/4K3 w - - 0 1").unwrap();
    assert_eq!(Status::Ongoing, pos.status());

    let pos = play(&pos, &["Kxd2"]);
    assert!(pos.is_bare_kings());
    assert_eq!(Status::BareKings, pos.status());
    assert!(pos.is_draw());
}

#[test]
fn underpromotion() {
    let pos = Position::from_fen("k7/4P3/8/8/8/8/8/K7 w - - 0 1").unwrap();
    let pos = play(&pos, &["e8=N"]);
    assert_eq!(
        Some(PieceKind::Knight),
        pos.piece_at(Square::E8).map(|p| p.kind)
    );
    assert_eq!(None, pos.piece_at(Square::E7));
}

#[test]
fn pinned_piece_cannot_move() {
    let pos = Position::from_fen("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
    assert!(pos
        .legal_moves()
        .iter()
        .all(|mov| mov.source() != Square::E2));
}
