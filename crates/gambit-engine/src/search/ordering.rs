//! Move ordering: hash move, captures by MVV-LVA, killers, then history.

use std::cmp::Reverse;

use gambit_core::{Move, PieceKind, Position};

use crate::search::heuristics::{HistoryTable, KillerTable};

/// Ranks candidate moves so the likeliest cutoffs are searched first.
///
/// Ordering never drops moves; it only permutes `moves`.
pub trait MoveOrderer {
    fn order(&mut self, pos: &Position, ply: usize, hash_move: Move, in_check: bool, moves: &mut [Move], depth: u8);

    /// A quiet move caused a beta cutoff. `pos` is the position the move was played from.
    fn on_cutoff(&mut self, pos: &Position, ply: usize, mv: Move, depth: u8);

    /// Forget accumulated statistics.
    fn clear(&mut self) {}
}

const HASH_MOVE: i32 = 4_000_000;
const CAPTURE_BASE: i32 = 3_000_000;
const PROMOTION_BASE: i32 = 2_500_000;
const KILLER: [i32; 2] = [2_003_000, 2_002_000];

/// Victim weight minus attacker weight, so PxQ outranks QxP.
const VICTIM: [i32; 6] = [100, 300, 310, 500, 900, 0];

/// Hash move, then captures by MVV-LVA, then killers, then history.
#[derive(Default)]
pub struct HeuristicOrderer {
    killers: KillerTable,
    history: HistoryTable,
}

impl HeuristicOrderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn score(&self, pos: &Position, ply: usize, hash_move: Move, mv: Move) -> i32 {
        if mv == hash_move {
            return HASH_MOVE;
        }
        if mv.is_capture() {
            let victim = if mv.is_en_passant() {
                PieceKind::Pawn
            } else {
                pos.piece_on(mv.to()).map_or(PieceKind::Pawn, |p| p.kind)
            };
            let promo = mv.promotion_kind().map_or(0, |k| VICTIM[k.index()]);
            return CAPTURE_BASE + VICTIM[victim.index()] * 10 - VICTIM[mv.mover().index()] / 10 + promo;
        }
        if let Some(kind) = mv.promotion_kind() {
            return PROMOTION_BASE + VICTIM[kind.index()];
        }
        match self.killers.rank(ply, mv) {
            Some(rank) => KILLER[rank],
            None => self.history.score(pos.side_to_move(), mv),
        }
    }
}

impl MoveOrderer for HeuristicOrderer {
    fn order(&mut self, pos: &Position, ply: usize, hash_move: Move, _in_check: bool, moves: &mut [Move], _depth: u8) {
        moves.sort_by_key(|&mv| Reverse(self.score(pos, ply, hash_move, mv)));
    }

    fn on_cutoff(&mut self, pos: &Position, ply: usize, mv: Move, depth: u8) {
        if mv.is_tactical() {
            return;
        }
        self.killers.store(ply, mv);
        self.history.reward(pos.side_to_move(), mv, depth);
    }

    fn clear(&mut self) {
        self.killers.clear();
        self.history.clear();
    }
}
