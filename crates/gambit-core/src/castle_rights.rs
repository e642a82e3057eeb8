//! Castling rights as a 4-bit mask: bit 0 = K, 1 = Q, 2 = k, 3 = q.

use std::fmt;

use crate::color::Color;
use crate::error::FenError;
use crate::square::Square;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    King,
    Queen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastleRights(u8);

impl CastleRights {
    pub const NONE: CastleRights = CastleRights(0);
    pub const ALL: CastleRights = CastleRights(0b1111);
    pub const WHITE_KING: CastleRights = CastleRights(0b0001);
    pub const WHITE_QUEEN: CastleRights = CastleRights(0b0010);
    pub const BLACK_KING: CastleRights = CastleRights(0b0100);
    pub const BLACK_QUEEN: CastleRights = CastleRights(0b1000);

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::flag(color, side).0 != 0
    }

    #[inline]
    pub const fn insert(self, other: CastleRights) -> CastleRights {
        CastleRights(self.0 | other.0)
    }

    const fn flag(color: Color, side: CastleSide) -> CastleRights {
        match (color, side) {
            (Color::White, CastleSide::King) => Self::WHITE_KING,
            (Color::White, CastleSide::Queen) => Self::WHITE_QUEEN,
            (Color::Black, CastleSide::King) => Self::BLACK_KING,
            (Color::Black, CastleSide::Queen) => Self::BLACK_QUEEN,
        }
    }

    /// Rights left after a move touching `from` and `to`.
    ///
    /// Moving a king off its home square drops both of that side's rights;
    /// moving from or capturing on a corner square drops the matching one.
    #[inline]
    pub const fn after_move(self, from: Square, to: Square) -> CastleRights {
        CastleRights(self.0 & KEEP_MASK[from.index()] & KEEP_MASK[to.index()])
    }

    /// Parse the FEN castling field (`KQkq`, `Kq`, `-`).
    pub fn from_fen(field: &str) -> Result<CastleRights, FenError> {
        if field == "-" {
            return Ok(CastleRights::NONE);
        }
        let mut rights = CastleRights::NONE;
        for c in field.chars() {
            let flag = match c {
                'K' => Self::WHITE_KING,
                'Q' => Self::WHITE_QUEEN,
                'k' => Self::BLACK_KING,
                'q' => Self::BLACK_QUEEN,
                _ => return Err(FenError::InvalidCastling(c)),
            };
            rights = rights.insert(flag);
        }
        Ok(rights)
    }
}

const KEEP_MASK: [u8; 64] = {
    let mut table = [0b1111u8; 64];
    table[Square::E1.index()] = 0b1100;
    table[Square::H1.index()] = 0b1110;
    table[Square::A1.index()] = 0b1101;
    table[Square::E8.index()] = 0b0011;
    table[Square::H8.index()] = 0b1011;
    table[Square::A8.index()] = 0b0111;
    table
};

/// FEN castling field, always in `KQkq` order.
impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        for (flag, c) in [
            (Self::WHITE_KING, 'K'),
            (Self::WHITE_QUEEN, 'Q'),
            (Self::BLACK_KING, 'k'),
            (Self::BLACK_QUEEN, 'q'),
        ] {
            if self.0 & flag.0 != 0 {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fen_field_roundtrip() {
        for field in ["KQkq", "Kq", "k", "-", "KQ"] {
            assert_eq!(CastleRights::from_fen(field).unwrap().to_string(), field);
        }
    }

    #[test]
    fn display_reorders_to_kqkq() {
        assert_eq!(CastleRights::from_fen("qkQK").unwrap().to_string(), "KQkq");
    }

    #[test]
    fn rejects_unknown_letters() {
        assert!(CastleRights::from_fen("KX").is_err());
    }

    #[test]
    fn king_move_drops_both_rights() {
        let rights = CastleRights::ALL.after_move(Square::E1, Square::E2);
        assert!(!rights.has(Color::White, CastleSide::King));
        assert!(!rights.has(Color::White, CastleSide::Queen));
        assert!(rights.has(Color::Black, CastleSide::King));
        assert!(rights.has(Color::Black, CastleSide::Queen));
    }

    #[test]
    fn rook_capture_drops_one_right() {
        let rights = CastleRights::ALL.after_move(Square::B2, Square::H8);
        assert!(!rights.has(Color::Black, CastleSide::King));
        assert!(rights.has(Color::Black, CastleSide::Queen));
        assert_eq!(rights.bits(), 0b1011);
    }

    #[test]
    fn unrelated_move_keeps_rights() {
        assert_eq!(CastleRights::ALL.after_move(Square::G1, Square::F3), CastleRights::ALL);
    }
}
