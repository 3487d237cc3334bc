// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use arrayvec::ArrayVec;
use std::convert::TryFrom;
use std::fmt::{self, Write};
use std::iter;
use std::sync::Arc;

use crate::attacks;
use crate::error::FenParseError;
use crate::move_generator::{MoveGenerator, MoveVec};
use crate::moves::Move;
use crate::types::TableIndex;
use crate::types::{Color, File, Offset, Piece, PieceKind, Rank, Square};
use crate::types::{FILES, RANKS, SQUARES};

bitflags! {
    /// The six squares whose pieces take part in castling. A square is in the
    /// set once anything has moved off of it (or been captured on it), after
    /// which castling that relies on it is permanently forbidden.
    pub struct CastleOrigins: u8 {
        const NONE = 0;
        const A1 = 0b0000_0001;
        const E1 = 0b0000_0010;
        const H1 = 0b0000_0100;
        const A8 = 0b0000_1000;
        const E8 = 0b0001_0000;
        const H8 = 0b0010_0000;
    }
}

impl CastleOrigins {
    pub fn of(square: Square) -> CastleOrigins {
        match square {
            Square::A1 => CastleOrigins::A1,
            Square::E1 => CastleOrigins::E1,
            Square::H1 => CastleOrigins::H1,
            Square::A8 => CastleOrigins::A8,
            Square::E8 => CastleOrigins::E8,
            Square::H8 => CastleOrigins::H8,
            _ => CastleOrigins::NONE,
        }
    }
}

/// The two sides of the board a king can castle towards.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CastleWing {
    Kingside,
    Queenside,
}

impl CastleWing {
    pub const ALL: [CastleWing; 2] = [CastleWing::Kingside, CastleWing::Queenside];

    pub fn king_home(color: Color) -> Square {
        Square::of(color.back_rank(), File::E)
    }

    pub fn rook_home(self, color: Color) -> Square {
        let file = match self {
            CastleWing::Kingside => File::H,
            CastleWing::Queenside => File::A,
        };
        Square::of(color.back_rank(), file)
    }

    pub fn king_destination(self, color: Color) -> Square {
        let file = match self {
            CastleWing::Kingside => File::G,
            CastleWing::Queenside => File::C,
        };
        Square::of(color.back_rank(), file)
    }

    /// The rook lands on the square the king crossed.
    pub fn rook_destination(self, color: Color) -> Square {
        let file = match self {
            CastleWing::Kingside => File::F,
            CastleWing::Queenside => File::D,
        };
        Square::of(color.back_rank(), file)
    }

    /// Squares strictly between the king and the rook; all must be empty.
    pub fn between(self, color: Color) -> ArrayVec<[Square; 3]> {
        let files: &[File] = match self {
            CastleWing::Kingside => &[File::F, File::G],
            CastleWing::Queenside => &[File::B, File::C, File::D],
        };
        files
            .iter()
            .map(|&file| Square::of(color.back_rank(), file))
            .collect()
    }

    /// Squares the king stands on, passes over, and lands on; none may be
    /// attacked.
    pub fn king_path(self, color: Color) -> ArrayVec<[Square; 3]> {
        let files: &[File] = match self {
            CastleWing::Kingside => &[File::E, File::F, File::G],
            CastleWing::Queenside => &[File::E, File::D, File::C],
        };
        files
            .iter()
            .map(|&file| Square::of(color.back_rank(), file))
            .collect()
    }

    /// Identifies a castling move from its king squares.
    pub fn from_king_move(color: Color, source: Square, destination: Square) -> Option<CastleWing> {
        if source != CastleWing::king_home(color) {
            return None;
        }

        CastleWing::ALL
            .iter()
            .cloned()
            .find(|wing| wing.king_destination(color) == destination)
    }
}

/// The en-passant opportunity left behind by a double pawn push: the square a
/// capturing pawn lands on, and the square of the pawn it removes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EnPassant {
    pub target: Square,
    pub victim: Square,
}

/// What, if anything, ends the game in a position. The engine only reports
/// this; it is up to the caller to stop playing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Status {
    Ongoing,
    Checkmate { winner: Color },
    Stalemate,
    /// Nothing but the two kings is left on the board.
    BareKings,
}

/// The moves that led to a position. Appending a move links a new node onto
/// the shared list, so deriving a position never copies the game so far.
#[derive(Clone, Default)]
pub struct MoveHistory {
    head: Option<Arc<HistoryNode>>,
    len: usize,
}

struct HistoryNode {
    mov: Move,
    prev: Option<Arc<HistoryNode>>,
}

impl MoveHistory {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The most recently applied move.
    pub fn last(&self) -> Option<Move> {
        self.head.as_ref().map(|node| node.mov)
    }

    /// Iterates newest first.
    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        iter::successors(self.head.as_deref(), |node| node.prev.as_deref()).map(|node| node.mov)
    }

    /// The moves oldest first.
    pub fn to_vec(&self) -> Vec<Move> {
        let mut moves: Vec<Move> = self.iter().collect();
        moves.reverse();
        moves
    }

    fn push(&self, mov: Move) -> MoveHistory {
        MoveHistory {
            head: Some(Arc::new(HistoryNode {
                mov,
                prev: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }
}

impl PartialEq for MoveHistory {
    fn eq(&self, other: &MoveHistory) -> bool {
        if self.len != other.len {
            return false;
        }

        match (&self.head, &other.head) {
            (Some(a), Some(b)) if Arc::ptr_eq(a, b) => true,
            _ => self.iter().eq(other.iter()),
        }
    }
}

impl Eq for MoveHistory {}

impl fmt::Debug for MoveHistory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.to_vec()).finish()
    }
}

// Unlinks nodes one at a time; the default drop would recurse once per move.
impl Drop for MoveHistory {
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(node) = next {
            next = match Arc::try_unwrap(node) {
                Ok(mut node) => node.prev.take(),
                Err(_) => None,
            };
        }
    }
}

/// A snapshot of a game. Positions are never modified once built; applying a
/// move produces a new position and leaves this one untouched, so positions
/// can be shared freely across threads and search branches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    placement: [Option<Piece>; 64],
    ply_count: u32,
    halfmove_clock: u32,
    en_passant: Option<EnPassant>,
    castling_moved: CastleOrigins,
    history: MoveHistory,
}

//
// Board state getters
//

impl Position {
    /// An empty board, White to move, with every castling right already lost.
    pub fn new() -> Position {
        Position {
            placement: [None; 64],
            ply_count: 0,
            halfmove_clock: 0,
            en_passant: None,
            castling_moved: CastleOrigins::all(),
            history: MoveHistory::default(),
        }
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.placement[square.as_index()]
    }

    /// Iterates over every occupied square, in board order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        SQUARES
            .iter()
            .filter_map(move |&sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|&(_, piece)| piece == Piece::new(PieceKind::King, color))
            .map(|(sq, _)| sq)
    }

    pub fn ply_count(&self) -> u32 {
        self.ply_count
    }

    pub fn side_to_move(&self) -> Color {
        if self.ply_count % 2 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_clock(&self) -> u32 {
        self.ply_count / 2 + 1
    }

    pub fn en_passant(&self) -> Option<EnPassant> {
        self.en_passant
    }

    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant.map(|ep| ep.target)
    }

    pub fn castling_moved(&self) -> CastleOrigins {
        self.castling_moved
    }

    /// Moves applied to reach this position, oldest first. Positions built
    /// from FEN start with an empty history.
    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    /// Whether a piece has left (or been captured on) the given square. Only
    /// the six castling squares are tracked; every other square answers false.
    pub fn has_moved_from(&self, square: Square) -> bool {
        let origin = CastleOrigins::of(square);
        !origin.is_empty() && self.castling_moved.contains(origin)
    }

    pub fn can_castle(&self, color: Color, wing: CastleWing) -> bool {
        !self.has_moved_from(CastleWing::king_home(color))
            && !self.has_moved_from(wing.rook_home(color))
    }

    pub fn can_castle_kingside(&self, color: Color) -> bool {
        self.can_castle(color, CastleWing::Kingside)
    }

    pub fn can_castle_queenside(&self, color: Color) -> bool {
        self.can_castle(color, CastleWing::Queenside)
    }

    /// Whether this move takes a pawn to the last rank.
    pub fn is_promoting(&self, mov: Move) -> bool {
        match self.piece_at(mov.source()) {
            Some(piece) if piece.kind == PieceKind::Pawn => {
                mov.destination().rank() == piece.color.promotion_rank()
            }
            _ => false,
        }
    }

    /// Whether this move removes an enemy piece, en passant included.
    pub fn is_capture(&self, mov: Move) -> bool {
        if self.piece_at(mov.destination()).is_some() {
            return true;
        }

        self.is_en_passant(mov)
    }

    pub fn is_en_passant(&self, mov: Move) -> bool {
        let is_pawn = self
            .piece_at(mov.source())
            .map_or(false, |p| p.kind == PieceKind::Pawn);
        is_pawn && self.en_passant_square() == Some(mov.destination())
    }

    pub fn is_castle(&self, mov: Move) -> bool {
        match self.piece_at(mov.source()) {
            Some(piece) if piece.kind == PieceKind::King => {
                CastleWing::from_king_move(piece.color, mov.source(), mov.destination()).is_some()
            }
            _ => false,
        }
    }
}

//
// Move application
//

impl Position {
    /// Produces the position that results from playing the given move. The
    /// move need only be pseudo-legal; legality is the move generator's
    /// concern. A pawn reaching the last rank without a promotion kind stays a
    /// pawn, which is all the legality test needs.
    pub fn apply_move(&self, mov: Move) -> Position {
        let moving_piece = self
            .piece_at(mov.source())
            .expect("invalid move: no piece at source square");
        trace!("apply_move: {} {}", moving_piece, mov);
        let side = moving_piece.color;
        let mut placement = self.placement;
        let is_capture = self.is_capture(mov);

        // En-passant is the one capture where the captured pawn does not sit on
        // the destination square; it sits beside the capturing pawn.
        if self.is_en_passant(mov) {
            let victim = Square::of(mov.source().rank(), mov.destination().file());
            placement[victim.as_index()] = None;
        }

        // Castles are encoded as the king's two-square move. The rook comes
        // along here; the king moves below like any other piece.
        if moving_piece.kind == PieceKind::King {
            if let Some(wing) = CastleWing::from_king_move(side, mov.source(), mov.destination())
            {
                let rook_home = wing.rook_home(side);
                if let Some(rook) = placement[rook_home.as_index()].take() {
                    placement[wing.rook_destination(side).as_index()] = Some(rook);
                }
            }
        }

        let placed = match mov.promotion_piece() {
            Some(kind) if self.is_promoting(mov) => Piece::new(kind, side),
            _ => moving_piece,
        };
        placement[mov.source().as_index()] = None;
        placement[mov.destination().as_index()] = Some(placed);

        let en_passant = if moving_piece.kind == PieceKind::Pawn
            && mov.source().rank() == side.pawn_rank()
            && mov.source().translate(Offset::new(0, side.pawn_direction()) * 2)
                == Ok(mov.destination())
        {
            mov.source()
                .translate(Offset::new(0, side.pawn_direction()))
                .ok()
                .map(|target| EnPassant {
                    target,
                    victim: mov.destination(),
                })
        } else {
            None
        };

        // A piece leaving a castling square, or being captured on one, loses
        // the castling rights tied to it for good.
        let castling_moved = self.castling_moved
            | CastleOrigins::of(mov.source())
            | CastleOrigins::of(mov.destination());

        let halfmove_clock = if is_capture || moving_piece.kind == PieceKind::Pawn {
            0
        } else {
            self.halfmove_clock + 1
        };

        let history = self.history.push(mov);

        Position {
            placement,
            ply_count: self.ply_count + 1,
            halfmove_clock,
            en_passant,
            castling_moved,
            history,
        }
    }
}

//
// Board analysis (check detection, legality, game termination)
//

impl Position {
    /// Whether the given color's king is attacked. A side with no king is
    /// never in check.
    pub fn is_check(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(king) => attacks::is_attacked(self, king, color.toggle()),
            None => false,
        }
    }

    /// All legal moves for the side to move.
    pub fn legal_moves(&self) -> MoveVec {
        let mut moves = MoveVec::default();
        MoveGenerator::new().generate_legal(self, &mut moves);
        moves
    }

    /// Move legality test. Returns true if this move is a legal move from the
    /// given position, promotion kind included.
    pub fn is_legal(&self, mov: Move) -> bool {
        self.legal_moves().contains(&mov)
    }

    /// Legality test for moves that are already known to be pseudolegal: plays
    /// the move and checks that the mover's king is not left attacked.
    pub fn is_legal_given_pseudolegal(&self, mov: Move) -> bool {
        let side = self.side_to_move();
        !self.apply_move(mov).is_check(side)
    }

    pub fn is_bare_kings(&self) -> bool {
        let mut count = 0;
        for (_, piece) in self.pieces() {
            if piece.kind != PieceKind::King {
                return false;
            }

            count += 1;
        }

        count == 2
    }

    pub fn status(&self) -> Status {
        if self.is_bare_kings() {
            return Status::BareKings;
        }

        if !self.legal_moves().is_empty() {
            return Status::Ongoing;
        }

        let side = self.side_to_move();
        if self.is_check(side) {
            Status::Checkmate {
                winner: side.toggle(),
            }
        } else {
            Status::Stalemate
        }
    }

    pub fn is_checkmate(&self) -> bool {
        match self.status() {
            Status::Checkmate { .. } => true,
            _ => false,
        }
    }

    pub fn is_draw(&self) -> bool {
        match self.status() {
            Status::Stalemate | Status::BareKings => true,
            _ => false,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.status() != Status::Ongoing
    }
}

//
// FEN parsing and generation.
//
// Positions can be created by parsing FEN and FEN can be produced from
// particular positions. A FEN position carries no move history.
//

impl Position {
    pub fn from_start_position() -> Position {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut placement = [None; 64];
        for (&file, &kind) in FILES.iter().zip(BACK_RANK.iter()) {
            placement[Square::of(Rank::One, file).as_index()] = Some(Piece::new(kind, Color::White));
            placement[Square::of(Rank::Two, file).as_index()] =
                Some(Piece::new(PieceKind::Pawn, Color::White));
            placement[Square::of(Rank::Seven, file).as_index()] =
                Some(Piece::new(PieceKind::Pawn, Color::Black));
            placement[Square::of(Rank::Eight, file).as_index()] = Some(Piece::new(kind, Color::Black));
        }

        Position {
            placement,
            castling_moved: CastleOrigins::NONE,
            ..Position::new()
        }
    }

    /// Constructs a new position from a FEN representation of a board position.
    pub fn from_fen<S: AsRef<str>>(fen: S) -> Result<Position, FenParseError> {
        use std::iter::Peekable;
        use std::str::Chars;

        type Stream<'a> = Peekable<Chars<'a>>;

        fn eat(iter: &mut Stream<'_>, expected: char) -> Result<(), FenParseError> {
            match iter.next() {
                Some(c) if c == expected => Ok(()),
                Some(c) => Err(FenParseError::UnexpectedChar(c)),
                None => Err(FenParseError::UnexpectedEnd),
            }
        }

        fn peek(iter: &mut Stream<'_>) -> Result<char, FenParseError> {
            iter.peek().cloned().ok_or(FenParseError::UnexpectedEnd)
        }

        fn eat_side_to_move(iter: &mut Stream<'_>) -> Result<Color, FenParseError> {
            let side = match peek(iter)? {
                'w' => Color::White,
                'b' => Color::Black,
                _ => return Err(FenParseError::InvalidSideToMove),
            };

            iter.next();
            Ok(side)
        }

        fn eat_castle_status(iter: &mut Stream<'_>) -> Result<CastleOrigins, FenParseError> {
            let mut moved = CastleOrigins::all();
            if peek(iter)? == '-' {
                iter.next();
                return Ok(moved);
            }

            for _ in 0..4 {
                match peek(iter)? {
                    'K' => moved.remove(CastleOrigins::E1 | CastleOrigins::H1),
                    'Q' => moved.remove(CastleOrigins::E1 | CastleOrigins::A1),
                    'k' => moved.remove(CastleOrigins::E8 | CastleOrigins::H8),
                    'q' => moved.remove(CastleOrigins::E8 | CastleOrigins::A8),
                    ' ' => break,
                    _ => return Err(FenParseError::InvalidCastle),
                }

                iter.next();
            }

            Ok(moved)
        }

        fn eat_en_passant(iter: &mut Stream<'_>) -> Result<Option<Square>, FenParseError> {
            if peek(iter)? == '-' {
                iter.next();
                return Ok(None);
            }

            let file = File::try_from(peek(iter)?).map_err(|_| FenParseError::InvalidEnPassant)?;
            iter.next();
            let rank = Rank::try_from(peek(iter)?).map_err(|_| FenParseError::InvalidEnPassant)?;
            iter.next();
            Ok(Some(Square::of(rank, file)))
        }

        fn eat_number(
            iter: &mut Stream<'_>,
            empty: FenParseError,
            invalid: FenParseError,
        ) -> Result<u32, FenParseError> {
            let mut buf = String::new();
            while let Some(&c) = iter.peek() {
                if !c.is_ascii_digit() {
                    break;
                }

                buf.push(c);
                iter.next();
            }

            if buf.is_empty() {
                return Err(empty);
            }

            buf.parse::<u32>().map_err(|_| invalid)
        }

        let mut pos = Position::new();
        let iter = &mut fen.as_ref().chars().peekable();
        for &rank in RANKS.iter().rev() {
            let mut file = File::A as usize;
            while file <= File::H as usize {
                let c = peek(iter)?;
                // digits 1 through 8 indicate empty squares.
                if c.is_ascii_digit() {
                    if c < '1' || c > '8' {
                        return Err(FenParseError::InvalidDigit);
                    }

                    file += c as usize - '0' as usize;
                    if file > 8 {
                        return Err(FenParseError::FileDoesNotSumToEight);
                    }

                    iter.next();
                    continue;
                }

                // if it's not a digit, it represents a piece.
                let piece = Piece::try_from(c).map_err(|_| FenParseError::UnknownPiece)?;
                pos.placement[Square::of(rank, File::from_index(file)).as_index()] = Some(piece);
                iter.next();
                file += 1;
            }

            if rank != Rank::One {
                eat(iter, '/')?;
            }
        }

        eat(iter, ' ')?;
        let side = eat_side_to_move(iter)?;
        eat(iter, ' ')?;
        pos.castling_moved = eat_castle_status(iter)?;
        eat(iter, ' ')?;
        let ep_square = eat_en_passant(iter)?;
        eat(iter, ' ')?;
        pos.halfmove_clock =
            eat_number(iter, FenParseError::EmptyHalfmove, FenParseError::InvalidHalfmove)?;
        eat(iter, ' ')?;
        let fullmove =
            eat_number(iter, FenParseError::EmptyFullmove, FenParseError::InvalidFullmove)?;
        if let Some(c) = iter.next() {
            return Err(FenParseError::UnexpectedChar(c));
        }

        pos.ply_count = fullmove.saturating_sub(1) * 2
            + match side {
                Color::White => 0,
                Color::Black => 1,
            };

        // The pawn that just double-pushed belongs to the side not on move and
        // sits one rank past the en-passant square, which is on that side's
        // third rank.
        if let Some(target) = ep_square {
            let expected_rank = match side {
                Color::White => Rank::Six,
                Color::Black => Rank::Three,
            };
            if target.rank() != expected_rank {
                return Err(FenParseError::InvalidEnPassant);
            }

            let victim = target
                .translate(Offset::new(0, -side.pawn_direction()))
                .map_err(|_| FenParseError::InvalidEnPassant)?;
            let victim_is_pawn =
                pos.piece_at(victim) == Some(Piece::new(PieceKind::Pawn, side.toggle()));
            if !victim_is_pawn || pos.piece_at(target).is_some() {
                return Err(FenParseError::InvalidEnPassant);
            }

            pos.en_passant = Some(EnPassant { target, victim });
        }

        Ok(pos)
    }

    pub fn as_fen(&self) -> String {
        let mut buf = String::new();
        for &rank in RANKS.iter().rev() {
            let mut empty_squares = 0;
            for &file in &FILES {
                if let Some(piece) = self.piece_at(Square::of(rank, file)) {
                    if empty_squares != 0 {
                        write!(&mut buf, "{}", empty_squares).unwrap();
                    }
                    write!(&mut buf, "{}", piece).unwrap();
                    empty_squares = 0;
                } else {
                    empty_squares += 1;
                }
            }

            if empty_squares != 0 {
                write!(&mut buf, "{}", empty_squares).unwrap();
            }

            if rank != Rank::One {
                buf.push('/');
            }
        }

        write!(&mut buf, " {} ", self.side_to_move()).unwrap();
        let rights = [
            (Color::White, CastleWing::Kingside, 'K'),
            (Color::White, CastleWing::Queenside, 'Q'),
            (Color::Black, CastleWing::Kingside, 'k'),
            (Color::Black, CastleWing::Queenside, 'q'),
        ];
        let before = buf.len();
        for &(color, wing, chr) in rights.iter() {
            if self.can_castle(color, wing) {
                buf.push(chr);
            }
        }
        if buf.len() == before {
            buf.push('-');
        }

        buf.push(' ');
        if let Some(ep_square) = self.en_passant_square() {
            write!(&mut buf, "{}", ep_square).unwrap();
        } else {
            buf.push('-');
        }

        write!(
            &mut buf,
            " {} {}",
            self.halfmove_clock(),
            self.fullmove_clock()
        )
        .unwrap();
        buf
    }
}

//
// Trait implementations
//

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &rank in RANKS.iter().rev() {
            for &file in &FILES {
                if let Some(piece) = self.piece_at(Square::of(rank, file)) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", rank)?;
        }

        for _ in &FILES {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for &file in &FILES {
            write!(f, " {} ", file)?;
        }

        writeln!(f)?;
        Ok(())
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::from_start_position()
    }
}
