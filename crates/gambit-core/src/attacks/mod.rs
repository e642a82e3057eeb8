//! Attack sets per piece type, and square-attack queries on a [`Position`].
//!
//! Sliders use the classical ray approach: take the full ray, find the
//! nearest blocker, and cut off everything behind it. The blocker itself
//! stays in the set.

mod tables;

use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::piece::PieceKind;
use crate::position::Position;
use crate::square::Square;

use self::tables::{
    EAST, KING_ATTACKS, KNIGHT_ATTACKS, NORTH, NORTH_EAST, NORTH_WEST, PAWN_ATTACKS, RAYS, SOUTH,
    SOUTH_EAST, SOUTH_WEST, WEST,
};

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index()]
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index()]
}

/// Squares a pawn of `color` on `sq` captures on.
#[inline]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index()]
}

/// Ray towards higher indices: the nearest blocker is the lowest bit.
#[inline]
fn positive_ray(dir: usize, sq: Square, occupied: Bitboard) -> Bitboard {
    let ray = RAYS[dir][sq.index()];
    match (ray & occupied).lsb() {
        Some(blocker) => ray ^ RAYS[dir][blocker.index()],
        None => ray,
    }
}

/// Ray towards lower indices: the nearest blocker is the highest bit.
#[inline]
fn negative_ray(dir: usize, sq: Square, occupied: Bitboard) -> Bitboard {
    let ray = RAYS[dir][sq.index()];
    match (ray & occupied).msb() {
        Some(blocker) => ray ^ RAYS[dir][blocker.index()],
        None => ray,
    }
}

#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    positive_ray(NORTH, sq, occupied)
        | positive_ray(EAST, sq, occupied)
        | negative_ray(SOUTH, sq, occupied)
        | negative_ray(WEST, sq, occupied)
}

#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    positive_ray(NORTH_EAST, sq, occupied)
        | positive_ray(NORTH_WEST, sq, occupied)
        | negative_ray(SOUTH_WEST, sq, occupied)
        | negative_ray(SOUTH_EAST, sq, occupied)
}

#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}

/// Attack set of a `kind` piece of `color` standing on `sq`.
pub fn attacks_of(kind: PieceKind, color: Color, sq: Square, occupied: Bitboard) -> Bitboard {
    match kind {
        PieceKind::Pawn => pawn_attacks(color, sq),
        PieceKind::Knight => knight_attacks(sq),
        PieceKind::Bishop => bishop_attacks(sq, occupied),
        PieceKind::Rook => rook_attacks(sq, occupied),
        PieceKind::Queen => queen_attacks(sq, occupied),
        PieceKind::King => king_attacks(sq),
    }
}

/// Is `sq` attacked by any piece of color `by`?
///
/// Works backwards from the target: a `by` pawn attacks `sq` exactly when a
/// pawn of the other color on `sq` would attack the pawn's square, and the
/// same symmetry holds for every other piece kind.
pub fn is_square_attacked(pos: &Position, sq: Square, by: Color) -> bool {
    let occupied = pos.occupied();
    let queens = pos.pieces(by, PieceKind::Queen);

    (pawn_attacks(!by, sq) & pos.pieces(by, PieceKind::Pawn)).is_nonempty()
        || (knight_attacks(sq) & pos.pieces(by, PieceKind::Knight)).is_nonempty()
        || (king_attacks(sq) & pos.pieces(by, PieceKind::King)).is_nonempty()
        || (bishop_attacks(sq, occupied) & (pos.pieces(by, PieceKind::Bishop) | queens))
            .is_nonempty()
        || (rook_attacks(sq, occupied) & (pos.pieces(by, PieceKind::Rook) | queens)).is_nonempty()
}

/// Is `color`'s king attacked? A side without a king is never in check.
pub fn is_in_check(pos: &Position, color: Color) -> bool {
    pos.king_square(color)
        .is_some_and(|king| is_square_attacked(pos, king, !color))
}
