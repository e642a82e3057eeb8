//! Search configuration.

use std::time::Duration;

use crate::search::MAX_PLY;

/// Knobs for one [`SearchEngine`](crate::SearchEngine).
///
/// Depth and time limits combine: iterative deepening stops at whichever
/// is hit first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Deepest iteration, clamped to `1..MAX_PLY`.
    pub max_depth: u8,
    /// Wall-clock budget per search; `None` searches to `max_depth`.
    pub time_budget: Option<Duration>,
    /// Centipawns charged to the better side for a repetition or fifty-move draw.
    pub contempt: i32,
    /// Transposition table size.
    pub tt_size_mb: usize,
    /// Half-width of the first aspiration window; 0 disables aspiration.
    pub aspiration_window: i32,
    pub lmr: bool,
    pub futility: bool,
    pub late_move_pruning: bool,
}

impl SearchConfig {
    /// `max_depth` clamped into the range the search supports.
    pub fn depth_limit(&self) -> u8 {
        self.max_depth.clamp(1, (MAX_PLY - 1) as u8)
    }

    /// Plain alpha-beta: no reductions or pruning.
    pub fn exhaustive(max_depth: u8) -> Self {
        Self {
            max_depth,
            lmr: false,
            futility: false,
            late_move_pruning: false,
            ..Self::default()
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 6,
            time_budget: None,
            contempt: 20,
            tt_size_mb: 16,
            aspiration_window: 50,
            lmr: true,
            futility: true,
            late_move_pruning: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.max_depth, 6);
        assert_eq!(config.contempt, 20);
        assert_eq!(config.aspiration_window, 50);
        assert!(config.lmr && config.futility && config.late_move_pruning);
        assert!(config.time_budget.is_none());
    }

    #[test]
    fn depth_limit_is_clamped() {
        let mut config = SearchConfig::default();
        config.max_depth = 0;
        assert_eq!(config.depth_limit(), 1);
        config.max_depth = 255;
        assert_eq!(config.depth_limit(), (MAX_PLY - 1) as u8);
    }

    #[test]
    fn exhaustive_turns_heuristics_off() {
        let config = SearchConfig::exhaustive(4);
        assert_eq!(config.max_depth, 4);
        assert!(!config.lmr && !config.futility && !config.late_move_pruning);
    }
}
