//! Engine facade: opening book first, search second.

use std::time::Duration;

use gambit_core::{Move, Position};
use tracing::info;

use crate::book::{NoBook, OpeningBook};
use crate::config::SearchConfig;
use crate::search::{SearchEngine, SearchResult};

/// Where a chosen move came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveSource {
    Book,
    Search(SearchResult),
}

/// Outcome of [`Engine::pick_move`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// `None` only when the side to move has no legal move.
    pub best_move: Option<Move>,
    pub source: MoveSource,
}

/// A searcher paired with an opening book.
pub struct Engine {
    search: SearchEngine,
    book: Box<dyn OpeningBook + Send>,
}

impl Engine {
    pub fn new(config: SearchConfig) -> Self {
        Self::with_parts(SearchEngine::new(config), Box::new(NoBook))
    }

    pub fn with_parts(search: SearchEngine, book: Box<dyn OpeningBook + Send>) -> Self {
        Self { search, book }
    }

    pub fn set_book(&mut self, book: Box<dyn OpeningBook + Send>) {
        self.book = book;
    }

    pub fn set_max_depth(&mut self, depth: u8) {
        self.search.config_mut().max_depth = depth;
    }

    pub fn set_time_budget(&mut self, budget: Option<Duration>) {
        self.search.config_mut().time_budget = budget;
    }

    pub fn search_engine(&self) -> &SearchEngine {
        &self.search
    }

    pub fn search_engine_mut(&mut self) -> &mut SearchEngine {
        &mut self.search
    }

    /// Choose a move for `pos`.
    ///
    /// A book move is returned without searching. `history` and `progress`
    /// are as for [`SearchEngine::compute_best_move`].
    pub fn pick_move(&mut self, pos: &Position, history: &[u64], progress: &mut dyn FnMut(u8)) -> Decision {
        if let Some(mv) = self.book.pick(pos) {
            info!(book_move = %mv, "book hit");
            progress(0);
            progress(100);
            return Decision {
                best_move: Some(mv),
                source: MoveSource::Book,
            };
        }

        let result = self.search.compute_best_move(pos, history, progress);
        Decision {
            best_move: result.best_move,
            source: MoveSource::Search(result),
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("search", &self.search)
            .finish_non_exhaustive()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::WeightedBook;

    #[test]
    fn book_move_skips_the_search() {
        let mut engine = Engine::default();
        engine.set_book(Box::new(WeightedBook::from_text("d2d4 d7d5\n")));
        let mut reports = Vec::new();
        let decision = engine.pick_move(&Position::starting_position(), &[], &mut |p| reports.push(p));
        assert_eq!(decision.best_move.unwrap().to_uci(), "d2d4");
        assert_eq!(decision.source, MoveSource::Book);
        assert_eq!(reports, vec![0, 100]);
    }

    #[test]
    fn out_of_book_falls_back_to_search() {
        let mut engine = Engine::default();
        engine.set_book(Box::new(WeightedBook::from_text("d2d4 d7d5\n")));
        engine.set_max_depth(2);
        let pos = Position::starting_position().with_move(
            Position::starting_position().parse_move("e2e4").unwrap(),
        );
        let decision = engine.pick_move(&pos, &[], &mut |_| {});
        assert!(decision.best_move.is_some());
        match decision.source {
            MoveSource::Search(result) => assert_eq!(result.depth, 2),
            MoveSource::Book => panic!("position is not in the book"),
        }
    }

    #[test]
    fn settings_reach_the_search_config() {
        let mut engine = Engine::default();
        engine.set_max_depth(9);
        engine.set_time_budget(Some(Duration::from_millis(250)));
        let config = engine.search_engine().config();
        assert_eq!(config.max_depth, 9);
        assert_eq!(config.time_budget, Some(Duration::from_millis(250)));
    }
}
