//! Killer move table and history heuristic for quiet move ordering.

use gambit_core::{Color, Move};

use crate::search::MAX_PLY;

/// Two killer moves per ply: quiet moves that caused beta cutoffs.
pub struct KillerTable {
    slots: [[Move; 2]; MAX_PLY],
}

impl KillerTable {
    pub fn new() -> Self {
        Self {
            slots: [[Move::NULL; 2]; MAX_PLY],
        }
    }

    /// Record `mv` as the newest killer at `ply`, shifting the previous one down.
    pub fn store(&mut self, ply: usize, mv: Move) {
        let Some(slot) = self.slots.get_mut(ply) else {
            return;
        };
        if slot[0] != mv {
            slot[1] = slot[0];
            slot[0] = mv;
        }
    }

    /// 0 for the newest killer, 1 for the older one.
    pub fn rank(&self, ply: usize, mv: Move) -> Option<usize> {
        let slot = self.slots.get(ply)?;
        if mv.is_null() {
            None
        } else if slot[0] == mv {
            Some(0)
        } else if slot[1] == mv {
            Some(1)
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.slots = [[Move::NULL; 2]; MAX_PLY];
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Ceiling for a history entry.
const HISTORY_MAX: i32 = 1 << 20;

/// History heuristic indexed by `[side][from * 64 + to]`.
pub struct HistoryTable {
    table: Box<[[i32; 64 * 64]; 2]>,
}

impl HistoryTable {
    pub fn new() -> Self {
        Self {
            table: Box::new([[0; 64 * 64]; 2]),
        }
    }

    #[inline]
    fn slot(mv: Move) -> usize {
        mv.from().index() * 64 + mv.to().index()
    }

    /// Reward a quiet move played by `side` that caused a cutoff at `depth`.
    pub fn reward(&mut self, side: Color, mv: Move, depth: u8) {
        let bonus = i32::from(depth) * i32::from(depth);
        let entry = &mut self.table[side.index()][Self::slot(mv)];
        *entry = (*entry + bonus).min(HISTORY_MAX);
    }

    pub fn score(&self, side: Color, mv: Move) -> i32 {
        self.table[side.index()][Self::slot(mv)]
    }

    pub fn clear(&mut self) {
        for side in self.table.iter_mut() {
            side.fill(0);
        }
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gambit_core::Square;

    fn e2e4() -> Move {
        Move::double_push(Square::E2, Square::E4)
    }

    fn d2d4() -> Move {
        Move::double_push(Square::D2, Square::D4)
    }

    #[test]
    fn killers_shift_newest_first() {
        let mut kt = KillerTable::new();
        kt.store(5, e2e4());
        assert_eq!(kt.rank(5, e2e4()), Some(0));
        assert_eq!(kt.rank(5, d2d4()), None);

        kt.store(5, d2d4());
        assert_eq!(kt.rank(5, d2d4()), Some(0));
        assert_eq!(kt.rank(5, e2e4()), Some(1));

        // Re-storing the newest killer does not evict the older one.
        kt.store(5, d2d4());
        assert_eq!(kt.rank(5, e2e4()), Some(1));
    }

    #[test]
    fn killers_are_per_ply() {
        let mut kt = KillerTable::new();
        kt.store(3, e2e4());
        assert_eq!(kt.rank(4, e2e4()), None);
        assert_eq!(kt.rank(MAX_PLY + 3, e2e4()), None);
        kt.store(MAX_PLY + 3, e2e4());
        assert_eq!(kt.rank(3, Move::NULL), None);
    }

    #[test]
    fn history_accumulates_depth_squared_per_side() {
        let mut ht = HistoryTable::new();
        ht.reward(Color::White, e2e4(), 4);
        ht.reward(Color::White, e2e4(), 3);
        assert_eq!(ht.score(Color::White, e2e4()), 25);
        assert_eq!(ht.score(Color::Black, e2e4()), 0);

        ht.clear();
        assert_eq!(ht.score(Color::White, e2e4()), 0);
    }

    #[test]
    fn history_is_clamped() {
        let mut ht = HistoryTable::new();
        for _ in 0..20_000 {
            ht.reward(Color::Black, d2d4(), 100);
        }
        assert_eq!(ht.score(Color::Black, d2d4()), HISTORY_MAX);
    }
}
