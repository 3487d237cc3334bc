// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use arbiter::Position;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PerftResults {
    pub nodes: u64,
    pub captures: u64,
    pub en_passants: u32,
    pub castles: u32,
    pub promotions: u32,
    pub checks: u32,
    pub checkmates: u32,
}

pub fn perft(fen: &str, depth: u32) -> PerftResults {
    let mut results = Default::default();
    let position = Position::from_fen(fen).unwrap();
    perft_impl(&position, depth, &mut results);
    results
}

fn perft_impl(pos: &Position, depth: u32, results: &mut PerftResults) {
    if depth == 0 {
        results.nodes += 1;
        return;
    }

    for mov in pos.legal_moves() {
        let child = pos.apply_move(mov);
        if depth == 1 {
            if pos.is_capture(mov) {
                results.captures += 1;
            }

            if pos.is_en_passant(mov) {
                results.en_passants += 1;
            }

            if pos.is_castle(mov) {
                results.castles += 1;
            }

            if mov.is_promotion() {
                results.promotions += 1;
            }

            if child.is_check(child.side_to_move()) {
                results.checks += 1;
            }

            if child.is_checkmate() {
                results.checkmates += 1;
            }
        }

        perft_impl(&child, depth - 1, results);
    }
}

#[test]
fn perft_start_3() {
    let results = perft(
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        3,
    );
    assert_eq!(
        PerftResults {
            nodes: 8902,
            captures: 34,
            en_passants: 0,
            castles: 0,
            promotions: 0,
            checks: 12,
            checkmates: 0,
        },
        results
    );
}

#[test]
fn perft_kiwipete_1() {
    let results = perft(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        1,
    );
    assert_eq!(48, results.nodes);
    assert_eq!(8, results.captures);
    assert_eq!(0, results.en_passants);
    assert_eq!(2, results.castles);
    assert_eq!(0, results.promotions);
    assert_eq!(0, results.checks);
}

#[test]
fn perft_kiwipete_2() {
    let results = perft(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        2,
    );
    assert_eq!(
        PerftResults {
            nodes: 2039,
            captures: 351,
            en_passants: 1,
            castles: 91,
            promotions: 0,
            checks: 3,
            checkmates: 0,
        },
        results
    );
}

#[test]
fn perft_position_3_3() {
    let results = perft("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 3);
    assert_eq!(
        PerftResults {
            nodes: 2812,
            captures: 209,
            en_passants: 2,
            castles: 0,
            promotions: 0,
            checks: 267,
            checkmates: 0,
        },
        results
    );
}

#[test]
fn perft_position_4_1() {
    let results = perft(
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        1,
    );
    assert_eq!(6, results.nodes);
    assert_eq!(0, results.castles);
    assert_eq!(0, results.promotions);
}

#[test]
fn perft_position_4_2() {
    let results = perft(
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        2,
    );
    assert_eq!(
        PerftResults {
            nodes: 264,
            captures: 87,
            en_passants: 0,
            castles: 6,
            promotions: 48,
            checks: 10,
            checkmates: 0,
        },
        results
    );
}

#[test]
fn perft_agrees_with_library() {
    let fen = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";
    let pos = Position::from_fen(fen).unwrap();
    assert_eq!(perft(fen, 2).nodes, arbiter::perft(&pos, 2));
}
