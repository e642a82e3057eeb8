//! Material balance, bishop pair and insufficient-material detection.
//!
//! Scores are from White's perspective (positive = White ahead).

use gambit_core::{Bitboard, Color, PieceKind, Position};

use crate::eval::score::{S, Score};

/// Centipawn value of each piece kind, indexed by [`PieceKind::index`].
pub const PIECE_VALUE: [i32; 6] = [100, 320, 330, 500, 900, 0];

const BISHOP_PAIR: Score = S(40, 40);

const LIGHT_SQUARES: Bitboard = Bitboard(0x55AA_55AA_55AA_55AA);

/// Sum of piece values for `color`.
pub fn material_of(pos: &Position, color: Color) -> i32 {
    PieceKind::ALL
        .iter()
        .map(|&kind| pos.pieces(color, kind).count() as i32 * PIECE_VALUE[kind.index()])
        .sum()
}

/// Material plus the bishop pair bonus, White minus Black.
pub fn material(pos: &Position) -> Score {
    let raw = material_of(pos, Color::White) - material_of(pos, Color::Black);
    let mut score = S(raw, raw);

    if pos.pieces(Color::White, PieceKind::Bishop).count() >= 2 {
        score += BISHOP_PAIR;
    }
    if pos.pieces(Color::Black, PieceKind::Bishop).count() >= 2 {
        score -= BISHOP_PAIR;
    }
    score
}

/// Neither side can possibly deliver mate.
///
/// Covers bare kings, a single minor piece, and one bishop each on the
/// same square colour.
pub fn is_insufficient_material(pos: &Position) -> bool {
    let heavy = pos.kind(PieceKind::Pawn) | pos.kind(PieceKind::Rook) | pos.kind(PieceKind::Queen);
    if heavy.is_nonempty() {
        return false;
    }

    let knights = pos.kind(PieceKind::Knight);
    let bishops = pos.kind(PieceKind::Bishop);
    match (knights | bishops).count() {
        0 | 1 => true,
        2 => {
            knights.is_empty()
                && pos.pieces(Color::White, PieceKind::Bishop).count() == 1
                && ((bishops & LIGHT_SQUARES).count() != 1)
        }
        _ => false,
    }
}
