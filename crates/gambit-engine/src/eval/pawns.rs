//! Pawn structure: doubled, isolated and passed pawns.
//!
//! All scores are from White's perspective (positive = White advantage).

use gambit_core::{Bitboard, Color, PieceKind, Position, Square};

use crate::eval::score::{S, Score};

/// For each file index, the mask of the neighbouring files.
const ADJACENT_FILES: [Bitboard; 8] = {
    let mut table = [Bitboard::EMPTY; 8];
    let mut f = 0;
    while f < 8 {
        let mut bits = 0u64;
        if f > 0 {
            bits |= Bitboard::file(f - 1).0;
        }
        if f < 7 {
            bits |= Bitboard::file(f + 1).0;
        }
        table[f as usize] = Bitboard(bits);
        f += 1;
    }
    table
};

/// `[color][square]`: own and neighbouring files strictly ahead of the pawn.
///
/// A pawn is passed when this mask holds no enemy pawn.
static PASSED_SPAN: [[Bitboard; 64]; 2] = {
    let mut table = [[Bitboard::EMPTY; 64]; 2];
    let mut sq = 0;
    while sq < 64 {
        let file = (sq % 8) as u8;
        let rank = (sq / 8) as u8;
        let files = Bitboard::file(file).0 | ADJACENT_FILES[file as usize].0;

        let mut ahead_white = 0u64;
        let mut ahead_black = 0u64;
        let mut r = 0;
        while r < 8 {
            if r > rank {
                ahead_white |= Bitboard::rank(r).0;
            } else if r < rank {
                ahead_black |= Bitboard::rank(r).0;
            }
            r += 1;
        }
        table[0][sq] = Bitboard(files & ahead_white);
        table[1][sq] = Bitboard(files & ahead_black);
        sq += 1;
    }
    table
};

/// Passed pawn bonus by rank counted from the pawn's own back rank.
const PASSED_BONUS: [Score; 8] = [
    S(0, 0),
    S(0, 0),
    S(5, 12),
    S(10, 20),
    S(20, 36),
    S(35, 60),
    S(60, 100),
    S(0, 0),
];

/// Per pawn beyond the first on a file.
const DOUBLED_PENALTY: Score = S(-8, -16);

const ISOLATED_PENALTY: Score = S(-10, -12);

/// Pawn structure balance, White minus Black.
pub fn evaluate_pawns(pos: &Position) -> Score {
    let white = pos.pieces(Color::White, PieceKind::Pawn);
    let black = pos.pieces(Color::Black, PieceKind::Pawn);
    side_structure(white, black, Color::White) - side_structure(black, white, Color::Black)
}

fn side_structure(own: Bitboard, enemy: Bitboard, color: Color) -> Score {
    let mut score = Score::ZERO;

    for file in 0..8u8 {
        let count = (Bitboard::file(file) & own).count() as i32;
        if count > 1 {
            score += DOUBLED_PENALTY * (count - 1);
        }
    }

    for sq in own {
        if (ADJACENT_FILES[sq.file() as usize] & own).is_empty() {
            score += ISOLATED_PENALTY;
        }
        if is_passed(sq, color, enemy) {
            score += PASSED_BONUS[relative_rank(sq, color)];
        }
    }

    score
}

fn is_passed(sq: Square, color: Color, enemy_pawns: Bitboard) -> bool {
    (PASSED_SPAN[color.index()][sq.index()] & enemy_pawns).is_empty()
}

fn relative_rank(sq: Square, color: Color) -> usize {
    match color {
        Color::White => sq.rank() as usize,
        Color::Black => 7 - sq.rank() as usize,
    }
}

#[cfg(test)]
mod tests {
    use gambit_core::Position;

    use super::*;

    fn parse(fen: &str) -> Position {
        fen.parse().unwrap()
    }

    #[test]
    fn starting_position_is_symmetric() {
        assert_eq!(evaluate_pawns(&Position::starting_position()), Score::ZERO);
    }

    #[test]
    fn lone_pawn_is_isolated_and_passed() {
        let score = evaluate_pawns(&parse("4k3/8/8/8/4P3/8/8/4K3 w - - 0 1"));
        assert_eq!(score, ISOLATED_PENALTY + PASSED_BONUS[3]);
    }

    #[test]
    fn doubled_pawns() {
        let score = evaluate_pawns(&parse("4k3/8/8/8/4P3/4P3/8/4K3 w - - 0 1"));
        let expected = DOUBLED_PENALTY
            + ISOLATED_PENALTY * 2
            + PASSED_BONUS[2]
            + PASSED_BONUS[3];
        assert_eq!(score, expected);
    }

    #[test]
    fn enemy_pawn_on_adjacent_file_blocks_passer() {
        // d6 sits in the span of e4; the pawns are mirror images otherwise.
        let score = evaluate_pawns(&parse("4k3/8/3p4/8/4P3/8/8/4K3 w - - 0 1"));
        let white = ISOLATED_PENALTY;
        let black = ISOLATED_PENALTY;
        assert_eq!(score, white - black);
    }

    #[test]
    fn black_passer_counts_from_its_own_side() {
        let score = evaluate_pawns(&parse("4k3/8/8/8/8/3p4/8/4K3 w - - 0 1"));
        assert_eq!(score, -(ISOLATED_PENALTY + PASSED_BONUS[5]));
    }

    #[test]
    fn passed_span_excludes_own_rank() {
        assert!(is_passed(Square::E4, Color::White, Square::D4.bitboard()));
        assert!(!is_passed(Square::E4, Color::White, Square::D5.bitboard()));
        assert!(!is_passed(Square::E5, Color::Black, Square::F2.bitboard()));
    }
}
