//! Search, evaluation and opening book for gambit.

pub mod book;
pub mod config;
pub mod engine;
pub mod eval;
pub mod search;

pub use book::{BookError, NoBook, OpeningBook, WeightedBook};
pub use config::SearchConfig;
pub use engine::{Decision, Engine, MoveSource};
pub use eval::{ClassicalEval, EvaluationStrategy, MaterialEval};
pub use search::ordering::{HeuristicOrderer, MoveOrderer};
pub use search::repetition::RepetitionTracker;
pub use search::tt::{ArrayTable, Bound, TranspositionTable, TtHit};
pub use search::{INF, MATE, MAX_PLY, SearchEngine, SearchResult, format_score, is_mate_score};
