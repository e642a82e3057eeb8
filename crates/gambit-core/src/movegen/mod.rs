//! Move generation.
//!
//! [`generate_pseudo_legal`] pushes every pseudo-legal move into a caller
//! closure without building a list. Legality is decided separately by
//! applying each candidate, asking whether the mover's king is attacked,
//! and taking the move back.

mod pawns;
mod pieces;

use crate::chess_move::{Move, parse_coordinates};
use crate::error::MoveParseError;
use crate::position::{Position, Undo};
use crate::square::Square;

use self::pawns::gen_pawns;
use self::pieces::{gen_castles, gen_pieces};

/// Upper bound on moves in any reachable position is 218.
const CAPACITY: usize = 256;

/// Fixed-capacity move buffer living on the stack.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; CAPACITY],
    len: usize,
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList {
            moves: [Move::NULL; CAPACITY],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!(self.len < CAPACITY);
        self.moves[self.len] = mv;
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len]
    }

    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Move {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = std::iter::Take<std::array::IntoIter<Move, CAPACITY>>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter().take(self.len)
    }
}

/// Feed every pseudo-legal move for the side to move into `sink`.
///
/// Pseudo-legal moves obey piece movement rules but may leave the mover's
/// king attacked. Castling is the exception: its path is checked here.
pub fn generate_pseudo_legal(pos: &Position, sink: &mut impl FnMut(Move)) {
    gen_pawns(pos, sink);
    gen_pieces(pos, sink);
    gen_castles(pos, sink);
}

/// Make-test-unmake: does `mv` leave the mover's own king safe?
///
/// `mv` must be pseudo-legal in `pos`. `pos` is restored before returning.
pub fn is_legal(pos: &mut Position, mv: Move) -> bool {
    let mover = pos.side_to_move();
    let mut undo = Undo::default();
    pos.make_in_place(mv, &mut undo);
    let legal = !crate::attacks::is_in_check(pos, mover);
    pos.unmake(&undo);
    legal
}

/// All legal moves in `pos`.
pub fn generate_all_legal(pos: &mut Position) -> MoveList {
    let mut pseudo = MoveList::new();
    generate_pseudo_legal(pos, &mut |mv| pseudo.push(mv));

    let mut legal = MoveList::new();
    for mv in pseudo {
        if is_legal(pos, mv) {
            legal.push(mv);
        }
    }
    legal
}

/// Legal moves of the piece standing on `from`.
pub fn legal_moves_from_square(pos: &mut Position, from: Square) -> MoveList {
    let mut pseudo = MoveList::new();
    generate_pseudo_legal(pos, &mut |mv| {
        if mv.from() == from {
            pseudo.push(mv);
        }
    });

    let mut legal = MoveList::new();
    for mv in pseudo {
        if is_legal(pos, mv) {
            legal.push(mv);
        }
    }
    legal
}

impl Position {
    /// Does the side to move have at least one legal move?
    pub fn has_legal_move(&mut self) -> bool {
        let mut pseudo = MoveList::new();
        generate_pseudo_legal(self, &mut |mv| pseudo.push(mv));
        pseudo.into_iter().any(|mv| is_legal(self, mv))
    }

    /// Resolve a coordinate move string (`e2e4`, `e7e8q`) against the legal moves.
    pub fn parse_move(&self, text: &str) -> Result<Move, MoveParseError> {
        let (from, to, promo) = parse_coordinates(text)?;
        let mut scratch = self.clone();
        legal_moves_from_square(&mut scratch, from)
            .into_iter()
            .find(|mv| mv.to() == to && mv.promotion_kind() == promo)
            .ok_or_else(|| MoveParseError::Illegal(text.to_string()))
    }
}
