// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Move notation. Standard algebraic notation (SAN, `Nf3`, `exd5`, `O-O`,
//! `e8=Q`) is what people write down; UCI long algebraic notation (`g1f3`,
//! `e7e8q`) is what engines exchange. Neither can be turned into a `Move`
//! without the position it is played in, so everything here hangs off of
//! `Position` and resolves against the legal move set.
//!
//! The SAN grammar accepted is
//!
//! ```text
//! [KQRBN]? [a-h]? [1-8]? x? [a-h][1-8] (=? [QRBNqrbn])? [+#!?]*
//! ```
//!
//! plus `O-O` and `O-O-O` (also written with zeros).
use std::convert::TryFrom;
use std::fmt::Write;

use crate::error::NotationError;
use crate::moves::Move;
use crate::position::{CastleWing, Position};
use crate::types::{Color, File, PieceKind, Rank, Square};

/// A SAN token broken into its parts, before it is matched against any
/// position.
#[derive(Clone, Debug, PartialEq, Eq)]
enum SanToken<'a> {
    Castle(CastleWing),
    Normal {
        kind: PieceKind,
        hint: &'a str,
        destination: Square,
        promotion: Option<PieceKind>,
    },
}

fn piece_letter(c: char) -> Option<PieceKind> {
    match c {
        'K' => Some(PieceKind::King),
        'Q' => Some(PieceKind::Queen),
        'R' => Some(PieceKind::Rook),
        'B' => Some(PieceKind::Bishop),
        'N' => Some(PieceKind::Knight),
        _ => None,
    }
}

fn promotion_letter(c: char) -> Option<PieceKind> {
    match c.to_ascii_uppercase() {
        'Q' => Some(PieceKind::Queen),
        'R' => Some(PieceKind::Rook),
        'B' => Some(PieceKind::Bishop),
        'N' => Some(PieceKind::Knight),
        _ => None,
    }
}

fn is_file(c: u8) -> bool {
    File::try_from(c as char).is_ok()
}

fn is_rank(c: u8) -> bool {
    Rank::try_from(c as char).is_ok()
}

/// Splits a SAN token into its parts. Returns `None` if the token does not
/// match the grammar.
fn parse_san(token: &str) -> Option<SanToken<'_>> {
    if !token.is_ascii() {
        return None;
    }

    let body = token.trim_end_matches(|c: char| "+#!?".contains(c));
    match body {
        "O-O" | "0-0" => return Some(SanToken::Castle(CastleWing::Kingside)),
        "O-O-O" | "0-0-0" => return Some(SanToken::Castle(CastleWing::Queenside)),
        _ => {}
    }

    let mut rest = body;

    // Optional piece letter. Lower-case letters are files, never pieces.
    let kind = match rest.chars().next().and_then(piece_letter) {
        Some(kind) => {
            rest = &rest[1..];
            kind
        }
        None => PieceKind::Pawn,
    };

    // Optional promotion suffix, with or without the '='.
    let mut promotion = None;
    let bytes = rest.as_bytes();
    if bytes.len() >= 3 {
        let last = bytes[bytes.len() - 1] as char;
        let before = bytes[bytes.len() - 2];
        if let Some(promoted) = promotion_letter(last) {
            if before == b'=' {
                promotion = Some(promoted);
                rest = &rest[..rest.len() - 2];
            } else if is_rank(before) {
                promotion = Some(promoted);
                rest = &rest[..rest.len() - 1];
            }
        }
    }

    // Mandatory destination square.
    if rest.len() < 2 {
        return None;
    }
    let (prefix, destination) = rest.split_at(rest.len() - 2);
    let destination = destination.parse::<Square>().ok()?;

    // Optional capture marker, then an origin hint of an optional file
    // followed by an optional rank.
    let hint = prefix.strip_suffix('x').unwrap_or(prefix);
    let hint_bytes = hint.as_bytes();
    let valid_hint = match hint_bytes {
        [] => true,
        [c] => is_file(*c) || is_rank(*c),
        [f, r] => is_file(*f) && is_rank(*r),
        _ => false,
    };
    if !valid_hint {
        return None;
    }

    if promotion.is_some() && kind != PieceKind::Pawn {
        return None;
    }

    Some(SanToken::Normal {
        kind,
        hint,
        destination,
        promotion,
    })
}

impl Position {
    /// Resolves a SAN token, played by the side to move, to the unique legal
    /// move it describes.
    pub fn move_from_san(&self, token: &str) -> Result<Move, NotationError> {
        self.interpret(self.side_to_move(), token)
    }

    /// Resolves a SAN token, played by the given side, to the unique legal move
    /// it describes. A side that is not on move has no legal moves, so every
    /// token fails for it.
    pub fn interpret(&self, side: Color, token: &str) -> Result<Move, NotationError> {
        let parsed = match parse_san(token) {
            Some(parsed) => parsed,
            None => {
                debug!("unrecognized move notation: {:?}", token);
                return Err(NotationError::Malformed {
                    token: token.to_owned(),
                });
            }
        };

        let legal_moves = if side == self.side_to_move() {
            self.legal_moves()
        } else {
            Default::default()
        };

        let candidates: Vec<Move> = match parsed {
            SanToken::Castle(wing) => {
                vec![Move::new(
                    CastleWing::king_home(side),
                    wing.king_destination(side),
                )]
            }
            SanToken::Normal {
                kind,
                hint,
                destination,
                promotion,
            } => legal_moves
                .iter()
                .cloned()
                .filter(|mov| {
                    self.piece_at(mov.source()).map(|p| p.kind) == Some(kind)
                        && mov.destination() == destination
                        && (promotion.is_none() || mov.promotion_piece() == promotion)
                        && mov.source().to_string().contains(hint)
                })
                .collect(),
        };

        // Castling skips generation above, so the survivor is always checked
        // against the legal set before it is handed back.
        match candidates.as_slice() {
            [mov] if legal_moves.contains(mov) => {
                trace!("resolved {:?} to {}", token, mov);
                Ok(*mov)
            }
            [_] => {
                debug!("move notation {:?} is not a legal move", token);
                Err(NotationError::Unresolved {
                    token: token.to_owned(),
                    candidates: 0,
                })
            }
            _ => {
                debug!(
                    "move notation {:?} matched {} legal moves",
                    token,
                    candidates.len()
                );
                Err(NotationError::Unresolved {
                    token: token.to_owned(),
                    candidates: candidates.len(),
                })
            }
        }
    }

    /// Writes the given legal move in standard algebraic notation, using the
    /// least disambiguation that identifies it and marking check and mate.
    pub fn san(&self, mov: Move) -> String {
        let piece = self
            .piece_at(mov.source())
            .expect("invalid move: no piece at source square");
        let mut buf = String::new();

        if let Some(wing) = CastleWing::from_king_move(piece.color, mov.source(), mov.destination())
            .filter(|_| piece.kind == PieceKind::King)
        {
            buf.push_str(match wing {
                CastleWing::Kingside => "O-O",
                CastleWing::Queenside => "O-O-O",
            });
        } else {
            let capture = self.is_capture(mov);
            match piece.kind.san_letter() {
                Some(letter) => {
                    buf.push(letter);
                    buf.push_str(&self.disambiguation(mov, piece.kind));
                }
                None if capture => write!(&mut buf, "{}", mov.source().file()).unwrap(),
                None => {}
            }

            if capture {
                buf.push('x');
            }
            write!(&mut buf, "{}", mov.destination()).unwrap();
            if let Some(kind) = mov.promotion_piece() {
                buf.push('=');
                buf.push(kind.san_letter().unwrap_or('Q'));
            }
        }

        let next = self.apply_move(mov);
        if next.is_check(next.side_to_move()) {
            if next.legal_moves().is_empty() {
                buf.push('#');
            } else {
                buf.push('+');
            }
        }

        buf
    }

    /// The origin hint needed to tell this move apart from other moves of the
    /// same piece kind to the same square: nothing, the file, the rank, or the
    /// whole square, in that order of preference.
    fn disambiguation(&self, mov: Move, kind: PieceKind) -> String {
        let rivals: Vec<Square> = self
            .legal_moves()
            .iter()
            .filter(|other| {
                other.destination() == mov.destination()
                    && other.source() != mov.source()
                    && self.piece_at(other.source()).map(|p| p.kind) == Some(kind)
            })
            .map(|other| other.source())
            .collect();

        let source = mov.source();
        if rivals.is_empty() {
            String::new()
        } else if rivals.iter().all(|sq| sq.file() != source.file()) {
            source.file().to_string()
        } else if rivals.iter().all(|sq| sq.rank() != source.rank()) {
            source.rank().to_string()
        } else {
            source.to_string()
        }
    }

    /// Parses the UCI representation of a move (`e2e4`, `e7e8q`) into the
    /// legal move it names, if there is one.
    pub fn move_from_uci(&self, move_str: &str) -> Option<Move> {
        if !move_str.is_ascii() || (move_str.len() != 4 && move_str.len() != 5) {
            return None;
        }

        let source = move_str[0..2].parse::<Square>().ok()?;
        let destination = move_str[2..4].parse::<Square>().ok()?;
        let mov = match move_str[4..].chars().next() {
            Some(c) => Move::promotion(source, destination, promotion_letter(c)?),
            None => Move::new(source, destination),
        };

        if self.is_legal(mov) {
            Some(mov)
        } else {
            None
        }
    }
}
