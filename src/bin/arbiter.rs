// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

use std::process;
use std::time::Instant;

use arbiter::{divide, perft, Color, Move, Position, Status};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

fn fen_arg() -> Arg<'static, 'static> {
    Arg::with_name("FEN")
        .help("FEN string for a board position, or \"startpos\"")
        .required(true)
        .index(1)
}

fn main() {
    env_logger::init();
    let matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("perft")
                .about("PERFT analysis of board positions")
                .arg(fen_arg())
                .arg(
                    Arg::with_name("depth")
                        .help("Depth of move tree to search")
                        .value_name("DEPTH")
                        .short("-d")
                        .long("--depth")
                        .takes_value(true)
                        .required(true),
                )
                .arg(
                    Arg::with_name("divide")
                        .help("Report the node count below each legal move")
                        .long("--divide"),
                ),
        )
        .subcommand(
            SubCommand::with_name("moves")
                .about("List the legal moves and status of a board position")
                .arg(fen_arg())
                .arg(
                    Arg::with_name("json")
                        .help("Print the report as JSON")
                        .long("--json"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        ("perft", Some(matches)) => run_perft(matches),
        ("moves", Some(matches)) => run_moves(matches),
        _ => unreachable!(),
    }
}

fn parse_position(matches: &ArgMatches) -> Position {
    let fen = matches.value_of("FEN").unwrap();
    if fen == "startpos" {
        return Position::from_start_position();
    }

    match Position::from_fen(fen) {
        Ok(pos) => pos,
        Err(err) => {
            println!("invalid fen: {}", err);
            process::exit(1);
        }
    }
}

fn run_perft(matches: &ArgMatches) -> ! {
    let depth = value_t_or_exit!(matches, "depth", u32);
    let pos = parse_position(matches);

    println!("fen:   {}", pos.as_fen());
    println!("depth: {}", depth);
    println!();
    println!("{}", pos);
    println!();
    if matches.is_present("divide") {
        let start = Instant::now();
        let split = divide(&pos, depth);
        let total: u64 = split.iter().map(|&(_, count)| count).sum();
        for (mov, count) in split {
            println!("{}: {}", mov, count);
        }
        println!();
        println!("perft({}) = {} ({} ms)", depth, total, start.elapsed().as_millis());
        process::exit(0);
    }

    for i in 1..depth + 1 {
        let start = Instant::now();
        let results = perft(&pos, i);
        let ms = start.elapsed().as_millis();
        info!("perft({}) finished in {} ms", i, ms);
        println!("perft({}) = {} ({} ms)", i, results, ms);
    }

    process::exit(0);
}

#[derive(Serialize)]
struct MoveReport {
    uci: String,
    san: String,
    #[serde(rename = "move")]
    mov: Move,
}

#[derive(Serialize)]
struct PositionReport {
    fen: String,
    side_to_move: Color,
    check: bool,
    status: Status,
    moves: Vec<MoveReport>,
}

fn run_moves(matches: &ArgMatches) -> ! {
    let pos = parse_position(matches);
    let side = pos.side_to_move();
    let report = PositionReport {
        fen: pos.as_fen(),
        side_to_move: side,
        check: pos.is_check(side),
        status: pos.status(),
        moves: pos
            .legal_moves()
            .iter()
            .map(|&mov| MoveReport {
                uci: mov.to_string(),
                san: pos.san(mov),
                mov,
            })
            .collect(),
    };
    info!("{} legal moves for {}", report.moves.len(), report.fen);

    if matches.is_present("json") {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                println!("failed to serialize report: {}", err);
                process::exit(1);
            }
        }
        process::exit(0);
    }

    println!("{}", pos);
    println!();
    println!("fen:    {}", report.fen);
    println!("status: {:?}", report.status);
    if report.check {
        println!("{} is in check", if side == Color::White { "white" } else { "black" });
    }
    println!();
    for entry in &report.moves {
        println!("{:<8} {}", entry.san, entry.uci);
    }

    process::exit(0);
}
