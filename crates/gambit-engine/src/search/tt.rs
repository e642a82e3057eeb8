//! Transposition table: a fixed-size cache of search results keyed by Zobrist hash.

use gambit_core::Move;

use crate::search::MATE_BOUND;

/// How a stored score relates to the true value of the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bound {
    /// Empty slot.
    #[default]
    None,
    /// The score is exact (PV node).
    Exact,
    /// The true score is at least the stored one (failed high).
    Lower,
    /// The true score is at most the stored one (failed low).
    Upper,
}

/// What a probe found for a matching key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtHit {
    /// Best move from the earlier search, returned even when it cannot cut off.
    pub best_move: Move,
    /// Ply-adjusted score, present only when depth and bound allow a cutoff.
    pub cutoff: Option<i32>,
}

/// Cache of search results.
///
/// `ply` is the distance from the search root; implementations store mate
/// scores relative to the node and translate them back on the way out.
pub trait TranspositionTable {
    fn probe(&self, key: u64, depth: u8, ply: usize, alpha: i32, beta: i32) -> Option<TtHit>;

    #[allow(clippy::too_many_arguments)]
    fn store(&mut self, key: u64, depth: u8, bound: Bound, score: i32, best_move: Move, ply: usize, age: u8);

    /// Current search generation.
    fn age(&self) -> u8;

    /// Start a new generation; called once per search.
    fn bump_age(&mut self);

    fn clear(&mut self);
}

/// Convert a root-relative score to node-relative form for storage.
///
/// Mate scores count plies from the root; stored entries must count from
/// the node itself so a hit on another path still reads correctly.
pub fn score_to_tt(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score >= MATE_BOUND {
        score + ply
    } else if score <= -MATE_BOUND {
        score - ply
    } else {
        score
    }
}

/// Reverse of [`score_to_tt`].
pub fn score_from_tt(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score >= MATE_BOUND {
        score - ply
    } else if score <= -MATE_BOUND {
        score + ply
    } else {
        score
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Entry {
    key: u64,
    best_move: Move,
    score: i32,
    depth: u8,
    bound: Bound,
    age: u8,
}

/// Single-slot, power-of-two table indexed by the low bits of the key.
pub struct ArrayTable {
    entries: Box<[Entry]>,
    mask: u64,
    age: u8,
}

impl ArrayTable {
    /// Table with at least `capacity` slots (rounded up to a power of two).
    pub fn with_capacity(capacity: usize) -> Self {
        let slots = capacity.max(1).next_power_of_two();
        Self {
            entries: vec![Entry::default(); slots].into_boxed_slice(),
            mask: (slots - 1) as u64,
            age: 0,
        }
    }

    /// Table sized to roughly `mb` megabytes (rounded down to a power of two).
    pub fn new(mb: usize) -> Self {
        let bytes = mb.max(1) * 1024 * 1024;
        let slots = bytes / std::mem::size_of::<Entry>();
        let slots = if slots.is_power_of_two() {
            slots
        } else {
            slots.next_power_of_two() >> 1
        };
        Self::with_capacity(slots)
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        (key & self.mask) as usize
    }
}

impl TranspositionTable for ArrayTable {
    fn probe(&self, key: u64, depth: u8, ply: usize, alpha: i32, beta: i32) -> Option<TtHit> {
        let entry = &self.entries[self.index(key)];
        if entry.bound == Bound::None || entry.key != key {
            return None;
        }

        let score = score_from_tt(entry.score, ply);
        let usable = entry.depth >= depth
            && match entry.bound {
                Bound::Exact => true,
                Bound::Lower => score >= beta,
                Bound::Upper => score <= alpha,
                Bound::None => false,
            };

        Some(TtHit {
            best_move: entry.best_move,
            cutoff: usable.then_some(score),
        })
    }

    fn store(&mut self, key: u64, depth: u8, bound: Bound, score: i32, best_move: Move, ply: usize, age: u8) {
        let index = self.index(key);
        let entry = &mut self.entries[index];

        let replace = entry.bound == Bound::None
            || entry.key == key
            || depth > entry.depth
            || entry.age != age;
        if !replace {
            return;
        }

        // A fail-low node has no best move; keep the old hint for ordering.
        if !best_move.is_null() || entry.key != key {
            entry.best_move = best_move;
        }
        entry.key = key;
        entry.depth = depth;
        entry.bound = bound;
        entry.score = score_to_tt(score, ply);
        entry.age = age;
    }

    fn age(&self) -> u8 {
        self.age
    }

    fn bump_age(&mut self) {
        self.age = self.age.wrapping_add(1);
    }

    fn clear(&mut self) {
        self.entries.fill(Entry::default());
        self.age = 0;
    }
}

impl std::fmt::Debug for ArrayTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayTable")
            .field("entries", &self.entries.len())
            .field("age", &self.age)
            .finish()
    }
}
