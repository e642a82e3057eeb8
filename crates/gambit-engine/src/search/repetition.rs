//! Path history for threefold repetition detection.

use crate::search::MAX_PLY;

/// Zobrist keys along the current game and search path, indexed by ply.
///
/// Index 0 is the oldest position the caller supplied; the search root
/// sits at [`root_index`](Self::root_index). Only indices at or above the
/// floor take part in repetition counting, because an irreversible move
/// (capture or pawn move) makes every earlier position unreachable.
#[derive(Debug, Clone)]
pub struct RepetitionTracker {
    keys: Vec<u64>,
    floor: usize,
    root: usize,
}

impl RepetitionTracker {
    pub fn new() -> Self {
        Self {
            keys: vec![0; MAX_PLY + 1],
            floor: 0,
            root: 0,
        }
    }

    /// Reset to the game history `history` (oldest first, already trimmed at
    /// the last irreversible move) followed by `root_key`.
    pub fn seed(&mut self, history: &[u64], root_key: u64) {
        self.keys.clear();
        self.keys.extend_from_slice(history);
        self.keys.push(root_key);
        self.root = history.len();
        self.keys.resize(self.root + MAX_PLY + 1, 0);
        self.floor = 0;
    }

    /// Index of the search root.
    pub fn root_index(&self) -> usize {
        self.root
    }

    #[inline]
    pub fn set(&mut self, index: usize, key: u64) {
        self.keys[index] = key;
    }

    #[inline]
    pub fn get(&self, index: usize) -> u64 {
        self.keys[index]
    }

    #[inline]
    pub fn floor(&self) -> usize {
        self.floor
    }

    #[inline]
    pub fn set_floor(&mut self, index: usize) {
        self.floor = index;
    }

    /// The key at `index` occurs at least three times in `floor..=index`.
    pub fn is_threefold(&self, index: usize) -> bool {
        let key = self.keys[index];
        let start = self.floor.min(index);
        self.keys[start..=index].iter().filter(|&&k| k == key).count() >= 3
    }
}

impl Default for RepetitionTracker {
    fn default() -> Self {
        Self::new()
    }
}
