//! Moves packed into a `u32`.
//!
//! ```text
//! bits  0-5:  from square
//! bits  6-11: to square
//! bits 12-14: moving piece kind
//! bits 15-17: promotion kind (0 = none, otherwise a PieceKind index)
//! bit  18:    capture (set for en passant too)
//! bit  19:    en passant capture
//! bit  20:    castle (king move, rook follows)
//! bit  21:    double pawn push
//! ```

use std::fmt;

use crate::error::MoveParseError;
use crate::piece::PieceKind;
use crate::square::Square;

const TO_SHIFT: u32 = 6;
const MOVER_SHIFT: u32 = 12;
const PROMO_SHIFT: u32 = 15;

const CAPTURE: u32 = 1 << 18;
const EN_PASSANT: u32 = 1 << 19;
const CASTLE: u32 = 1 << 20;
const DOUBLE_PUSH: u32 = 1 << 21;

/// An immutable, fully-described move. Equality is by encoded value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u32);

impl Move {
    /// "No move". A1→A1 by a pawn is never generated.
    pub const NULL: Move = Move(0);

    #[inline]
    const fn pack(from: Square, to: Square, mover: PieceKind, extra: u32) -> Move {
        Move(
            from.index() as u32
                | (to.index() as u32) << TO_SHIFT
                | (mover as u32) << MOVER_SHIFT
                | extra,
        )
    }

    /// A non-capturing move.
    pub const fn quiet(from: Square, to: Square, mover: PieceKind) -> Move {
        Self::pack(from, to, mover, 0)
    }

    pub const fn capture(from: Square, to: Square, mover: PieceKind) -> Move {
        Self::pack(from, to, mover, CAPTURE)
    }

    pub const fn double_push(from: Square, to: Square) -> Move {
        Self::pack(from, to, PieceKind::Pawn, DOUBLE_PUSH)
    }

    pub const fn en_passant(from: Square, to: Square) -> Move {
        Self::pack(from, to, PieceKind::Pawn, CAPTURE | EN_PASSANT)
    }

    /// Castle, described by the king's own from/to squares.
    pub const fn castle(from: Square, to: Square) -> Move {
        Self::pack(from, to, PieceKind::King, CASTLE)
    }

    pub const fn promotion(from: Square, to: Square, promo: PieceKind, capture: bool) -> Move {
        let flags = if capture { CAPTURE } else { 0 };
        Self::pack(from, to, PieceKind::Pawn, flags | (promo as u32) << PROMO_SHIFT)
    }

    #[inline]
    pub const fn from(self) -> Square {
        Square::from_index_unchecked((self.0 & 0x3F) as u8)
    }

    #[inline]
    pub const fn to(self) -> Square {
        Square::from_index_unchecked((self.0 >> TO_SHIFT & 0x3F) as u8)
    }

    #[inline]
    pub const fn mover(self) -> PieceKind {
        match PieceKind::from_index((self.0 >> MOVER_SHIFT & 0x7) as u8) {
            Some(kind) => kind,
            None => PieceKind::Pawn,
        }
    }

    #[inline]
    pub const fn promotion_kind(self) -> Option<PieceKind> {
        match self.0 >> PROMO_SHIFT & 0x7 {
            0 => None,
            idx => PieceKind::from_index(idx as u8),
        }
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.0 & CAPTURE != 0
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.0 & EN_PASSANT != 0
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        self.0 & CASTLE != 0
    }

    #[inline]
    pub const fn is_double_push(self) -> bool {
        self.0 & DOUBLE_PUSH != 0
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.0 >> PROMO_SHIFT & 0x7 != 0
    }

    /// Captures and promotions.
    #[inline]
    pub const fn is_tactical(self) -> bool {
        self.is_capture() || self.is_promotion()
    }

    /// Resets the fifty-move clock and makes earlier positions unrepeatable.
    #[inline]
    pub const fn is_irreversible(self) -> bool {
        self.is_capture() || matches!(self.mover(), PieceKind::Pawn)
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Coordinate notation, e.g. `e2e4`, `e7e8q`. The null move is `0000`.
    pub fn to_uci(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("0000");
        }
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(kind) = self.promotion_kind() {
            write!(f, "{}", kind.letter())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self})")
    }
}

/// Split a coordinate string into from, to and optional promotion kind.
///
/// Only checks syntax; [`Position::parse_move`](crate::Position::parse_move)
/// resolves the result against the legal moves.
pub fn parse_coordinates(s: &str) -> Result<(Square, Square, Option<PieceKind>), MoveParseError> {
    let malformed = || MoveParseError::Malformed(s.to_string());
    if !s.is_ascii() || !(4..=5).contains(&s.len()) {
        return Err(malformed());
    }
    let from = Square::from_algebraic(&s[0..2]).ok_or_else(malformed)?;
    let to = Square::from_algebraic(&s[2..4]).ok_or_else(malformed)?;
    let promo = match s[4..].chars().next() {
        None => None,
        Some(c) => match PieceKind::from_letter(c) {
            Some(kind @ (PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)) => {
                Some(kind)
            }
            _ => return Err(malformed()),
        },
    };
    Ok((from, to, promo))
}
