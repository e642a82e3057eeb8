//! Game phase calculation based on remaining non-pawn material.

use gambit_core::{PieceKind, Position};

/// Phase of a full starting complement of non-pawn material.
///
/// Weights: Knight=1, Bishop=1, Rook=2, Queen=4, so 4 + 4 + 8 + 8 = 24.
pub const MAX_PHASE: i32 = 24;

const PHASE_WEIGHT: [(PieceKind, i32); 4] = [
    (PieceKind::Knight, 1),
    (PieceKind::Bishop, 1),
    (PieceKind::Rook, 2),
    (PieceKind::Queen, 4),
];

/// Phase in `0..=MAX_PHASE`; promotions cannot push it past the maximum.
pub fn game_phase(pos: &Position) -> i32 {
    let phase: i32 = PHASE_WEIGHT
        .iter()
        .map(|&(kind, weight)| pos.kind(kind).count() as i32 * weight)
        .sum();
    phase.min(MAX_PHASE)
}

#[cfg(test)]
mod tests {
    use gambit_core::Position;

    use super::{MAX_PHASE, game_phase};

    #[test]
    fn starting_position_is_max_phase() {
        assert_eq!(game_phase(&Position::starting_position()), MAX_PHASE);
    }

    #[test]
    fn bare_kings_is_zero_phase() {
        let pos: Position = "8/8/4k3/8/8/4K3/8/8 w - - 0 1".parse().unwrap();
        assert_eq!(game_phase(&pos), 0);
    }

    #[test]
    fn missing_queen_drops_four() {
        let pos: Position = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1"
            .parse()
            .unwrap();
        assert_eq!(game_phase(&pos), 20);
    }

    #[test]
    fn extra_queens_are_clamped() {
        let pos: Position = "4k3/8/8/8/8/8/8/QQQQKQQQ w - - 0 1".parse().unwrap();
        assert_eq!(game_phase(&pos), MAX_PHASE);
    }
}
