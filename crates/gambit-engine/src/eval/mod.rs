//! Static evaluation.
//!
//! The search only sees [`EvaluationStrategy`]; [`ClassicalEval`] is the
//! production implementation and [`MaterialEval`] a bare material count.

pub mod material;
pub mod pawns;
pub mod phase;
pub mod pst;
pub mod score;

use gambit_core::{Color, PieceKind, Position};

use self::material::{is_insufficient_material, material, material_of};
use self::pawns::evaluate_pawns;
use self::phase::game_phase;
use self::pst::pst_value;
use self::score::Score;

/// Turns a position into a centipawn score from the side to move's perspective.
pub trait EvaluationStrategy {
    fn evaluate(&self, pos: &Position) -> i32;
}

/// Bonus for having the move.
const TEMPO: i32 = 10;

/// Halfmove clock at which the fifty-move fade begins.
const FADE_START: u16 = 80;
const FADE_END: u16 = 100;

/// Hand-crafted evaluation: material, tapered piece-square tables and
/// pawn structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicalEval;

impl ClassicalEval {
    /// White-relative score before tempo and the fifty-move fade.
    pub fn white_relative(pos: &Position) -> i32 {
        let mut score: Score = material(pos) + evaluate_pawns(pos);

        for color in Color::ALL {
            let mut side = Score::ZERO;
            for kind in PieceKind::ALL {
                for sq in pos.pieces(color, kind) {
                    side += pst_value(kind, color, sq);
                }
            }
            match color {
                Color::White => score += side,
                Color::Black => score -= side,
            }
        }

        score.taper(game_phase(pos))
    }
}

impl EvaluationStrategy for ClassicalEval {
    fn evaluate(&self, pos: &Position) -> i32 {
        if is_insufficient_material(pos) {
            return 0;
        }

        let white = Self::white_relative(pos);
        let stm = match pos.side_to_move() {
            Color::White => white,
            Color::Black => -white,
        } + TEMPO;

        fade(stm, pos.halfmove_clock())
    }
}

/// Scale `score` linearly towards zero as the halfmove clock runs from
/// [`FADE_START`] to [`FADE_END`].
fn fade(score: i32, halfmove_clock: u16) -> i32 {
    if halfmove_clock <= FADE_START {
        return score;
    }
    let left = i32::from(FADE_END.saturating_sub(halfmove_clock));
    score * left / i32::from(FADE_END - FADE_START)
}

/// Material only, side to move minus opponent.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialEval;

impl EvaluationStrategy for MaterialEval {
    fn evaluate(&self, pos: &Position) -> i32 {
        let us = pos.side_to_move();
        material_of(pos, us) - material_of(pos, !us)
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
    fn starting_position_is_tempo_only() {
        let pos = Position::starting_position();
        assert_eq!(ClassicalEval::white_relative(&pos), 0);
        assert_eq!(ClassicalEval.evaluate(&pos), TEMPO);
    }

    #[test]
    fn score_flips_with_side_to_move() {
        let white = parse("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        let black = parse("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1");
        let w = ClassicalEval.evaluate(&white);
        let b = ClassicalEval.evaluate(&black);
        assert!(w > 800);
        assert_eq!(w - TEMPO, -(b - TEMPO));
    }

    #[test]
    fn insufficient_material_is_zero() {
        assert_eq!(ClassicalEval.evaluate(&parse("8/8/4k3/8/8/4K3/5N2/8 w - - 0 1")), 0);
    }

    #[test]
    fn fifty_move_fade() {
        assert_eq!(fade(200, 0), 200);
        assert_eq!(fade(200, 80), 200);
        assert_eq!(fade(200, 90), 100);
        assert_eq!(fade(-200, 95), -50);
        assert_eq!(fade(200, 100), 0);
        assert_eq!(fade(200, 130), 0);

        let fresh = parse("4k3/8/8/8/8/8/8/R3K3 w - - 0 60");
        let stale = parse("4k3/8/8/8/8/8/8/R3K3 w - - 99 60");
        assert!(ClassicalEval.evaluate(&stale).abs() < ClassicalEval.evaluate(&fresh).abs());
    }

    #[test]
    fn material_eval_is_side_relative() {
        let pos = parse("4k3/8/8/8/8/8/8/R3K3 b - - 0 1");
        assert_eq!(MaterialEval.evaluate(&pos), -500);
    }
}
