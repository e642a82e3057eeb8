//! Piece-square tables, tapered between middlegame and endgame.
//!
//! Tables are laid out the way a board is printed: the first row is rank 8,
//! the last row is rank 1, each row runs from the a-file to the h-file.
//! Values are from White's point of view; Black reads the vertical mirror.

use gambit_core::{Color, PieceKind, Square};

use crate::eval::score::{S, Score};

#[rustfmt::skip]
const PAWN: [Score; 64] = [
    S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0),
    S( 60, 90), S( 60, 90), S( 60, 90), S( 65, 90), S( 65, 90), S( 60, 90), S( 60, 90), S( 60, 90),
    S( 12, 40), S( 14, 40), S( 20, 40), S( 28, 40), S( 28, 40), S( 20, 40), S( 14, 40), S( 12, 40),
    S(  6, 20), S(  6, 20), S( 12, 20), S( 24, 22), S( 24, 22), S( 12, 20), S(  6, 20), S(  6, 20),
    S(  0, 10), S(  0, 10), S(  6, 10), S( 20, 12), S( 20, 12), S(  6, 10), S(  0, 10), S(  0, 10),
    S(  4,  2), S( -4,  2), S( -8,  2), S(  2,  4), S(  2,  4), S( -8,  2), S( -4,  2), S(  4,  2),
    S(  4,  0), S(  8,  0), S(  8,  0), S(-18,  0), S(-18,  0), S(  8,  0), S(  8,  0), S(  4,  0),
    S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0),
];

#[rustfmt::skip]
const KNIGHT: [Score; 64] = [
    S(-50,-40), S(-36,-30), S(-28,-24), S(-28,-24), S(-28,-24), S(-28,-24), S(-36,-30), S(-50,-40),
    S(-36,-30), S(-16,-14), S(  0, -6), S(  2, -2), S(  2, -2), S(  0, -6), S(-16,-14), S(-36,-30),
    S(-28,-24), S(  2, -4), S( 12,  6), S( 16, 10), S( 16, 10), S( 12,  6), S(  2, -4), S(-28,-24),
    S(-28,-20), S(  4,  0), S( 16, 10), S( 22, 16), S( 22, 16), S( 16, 10), S(  4,  0), S(-28,-20),
    S(-28,-20), S(  0,  0), S( 14, 10), S( 20, 16), S( 20, 16), S( 14, 10), S(  0,  0), S(-28,-20),
    S(-28,-24), S(  4, -4), S( 10,  4), S( 12,  8), S( 12,  8), S( 10,  4), S(  4, -4), S(-28,-24),
    S(-36,-30), S(-16,-14), S(  0, -6), S(  4, -2), S(  4, -2), S(  0, -6), S(-16,-14), S(-36,-30),
    S(-50,-40), S(-32,-30), S(-28,-24), S(-28,-24), S(-28,-24), S(-28,-24), S(-32,-30), S(-50,-40),
];

#[rustfmt::skip]
const BISHOP: [Score; 64] = [
    S(-18,-14), S(-10, -8), S(-10, -8), S(-10, -8), S(-10, -8), S(-10, -8), S(-10, -8), S(-18,-14),
    S(-10, -8), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(-10, -8),
    S(-10, -8), S(  0,  0), S(  6,  4), S( 10,  6), S( 10,  6), S(  6,  4), S(  0,  0), S(-10, -8),
    S(-10, -8), S(  6,  2), S(  6,  4), S( 10,  8), S( 10,  8), S(  6,  4), S(  6,  2), S(-10, -8),
    S(-10, -8), S(  0,  2), S( 10,  4), S( 10,  8), S( 10,  8), S( 10,  4), S(  0,  2), S(-10, -8),
    S(-10, -8), S( 10,  0), S( 10,  4), S( 10,  4), S( 10,  4), S( 10,  4), S( 10,  0), S(-10, -8),
    S(-10, -8), S(  6,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  6,  0), S(-10, -8),
    S(-18,-14), S(-10, -8), S(-12, -8), S(-10, -8), S(-10, -8), S(-12, -8), S(-10, -8), S(-18,-14),
];

#[rustfmt::skip]
const ROOK: [Score; 64] = [
    S(  0,  6), S(  0,  6), S(  0,  6), S(  0,  6), S(  0,  6), S(  0,  6), S(  0,  6), S(  0,  6),
    S(  6, 10), S( 12, 10), S( 12, 10), S( 12, 10), S( 12, 10), S( 12, 10), S( 12, 10), S(  6, 10),
    S( -6,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S( -6,  0),
    S( -6,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S( -6,  0),
    S( -6,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S( -6,  0),
    S( -6,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S( -6,  0),
    S( -6,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S( -6,  0),
    S( -2,  0), S(  0,  0), S(  2,  0), S(  8,  0), S(  8,  0), S(  4,  0), S(  0,  0), S( -2,  0),
];

#[rustfmt::skip]
const QUEEN: [Score; 64] = [
    S(-20,-16), S(-10,-10), S(-10,-10), S( -4, -6), S( -4, -6), S(-10,-10), S(-10,-10), S(-20,-16),
    S(-10,-10), S(  0,  0), S(  0,  2), S(  0,  4), S(  0,  4), S(  0,  2), S(  0,  0), S(-10,-10),
    S(-10, -6), S(  0,  4), S(  4,  6), S(  4,  8), S(  4,  8), S(  4,  6), S(  0,  4), S(-10, -6),
    S( -4, -4), S(  0,  4), S(  4,  8), S(  4, 10), S(  4, 10), S(  4,  8), S(  0,  4), S( -4, -4),
    S( -2, -4), S(  0,  4), S(  4,  8), S(  4, 10), S(  4, 10), S(  4,  8), S(  0,  4), S( -2, -4),
    S(-10, -6), S(  4,  2), S(  4,  6), S(  4,  6), S(  4,  6), S(  4,  6), S(  0,  2), S(-10, -6),
    S(-10,-10), S(  0,  0), S(  4,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(  0,  0), S(-10,-10),
    S(-20,-16), S(-10,-10), S(-10,-10), S( -2, -6), S( -4, -6), S(-10,-10), S(-10,-10), S(-20,-16),
];

/// Middlegame halves keep the king tucked away; endgame halves pull it to the centre.
#[rustfmt::skip]
const KING: [Score; 64] = [
    S(-32,-48), S(-40,-32), S(-40,-28), S(-50,-24), S(-50,-24), S(-40,-28), S(-40,-32), S(-32,-48),
    S(-32,-30), S(-40,-14), S(-40, -6), S(-50,  0), S(-50,  0), S(-40, -6), S(-40,-14), S(-32,-30),
    S(-32,-26), S(-40, -6), S(-40, 14), S(-50, 22), S(-50, 22), S(-40, 14), S(-40, -6), S(-32,-26),
    S(-32,-24), S(-40,  0), S(-40, 22), S(-50, 30), S(-50, 30), S(-40, 22), S(-40,  0), S(-32,-24),
    S(-22,-24), S(-30,  0), S(-30, 20), S(-40, 28), S(-40, 28), S(-30, 20), S(-30,  0), S(-22,-24),
    S(-12,-26), S(-20, -6), S(-20, 12), S(-22, 18), S(-22, 18), S(-20, 12), S(-20, -6), S(-12,-26),
    S( 16,-30), S( 16,-16), S( -4, -4), S( -6,  0), S( -6,  0), S( -4, -4), S( 16,-16), S( 16,-30),
    S( 18,-48), S( 28,-30), S( 10,-24), S( -2,-20), S(  0,-20), S(  8,-24), S( 30,-30), S( 18,-48),
];

static TABLES: [[Score; 64]; 6] = [PAWN, KNIGHT, BISHOP, ROOK, QUEEN, KING];

/// Table bonus for a `color` piece of `kind` on `sq`.
#[inline]
pub fn pst_value(kind: PieceKind, color: Color, sq: Square) -> Score {
    // Row 0 of each table is rank 8, so White flips and Black reads directly.
    let row_major = match color {
        Color::White => sq.index() ^ 56,
        Color::Black => sq.index(),
    };
    TABLES[kind.index()][row_major]
}
