//! Search algorithms and move ordering.

pub mod control;
pub mod draw;
pub mod heuristics;
pub mod negamax;
pub mod ordering;
pub mod repetition;
pub mod tt;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use gambit_core::{Move, Position, Undo, generate_all_legal};
use tracing::info;

use crate::config::SearchConfig;
use crate::eval::{ClassicalEval, EvaluationStrategy};
use control::SearchControl;
use negamax::{PvTable, Searcher};
use ordering::{HeuristicOrderer, MoveOrderer};
use repetition::RepetitionTracker;
use tt::{ArrayTable, Bound, TranspositionTable};

/// Score of delivering mate at the root; a mate `n` plies away scores `MATE - n`.
pub const MATE: i32 = 30_000;

/// Bound wider than any reachable score.
pub const INF: i32 = 32_000;

/// Maximum search depth in plies, sizing every per-ply table.
pub const MAX_PLY: usize = 128;

/// Scores at or beyond this magnitude announce a forced mate.
pub const MATE_BOUND: i32 = MATE - MAX_PLY as i32;

#[inline]
pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE_BOUND
}

/// Render a score as `+35`, `-120`, `#3` or `#-2` (mate in full moves).
pub fn format_score(score: i32) -> String {
    if is_mate_score(score) {
        let plies = MATE - score.abs();
        let moves = (plies + 1) / 2;
        if score > 0 {
            format!("#{moves}")
        } else {
            format!("#-{moves}")
        }
    } else {
        format!("{score:+}")
    }
}

/// Result of a completed search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Best move of the deepest completed iteration; `None` only when the
    /// root has no legal move.
    pub best_move: Option<Move>,
    /// Score in centipawns from the side to move's point of view.
    pub score: i32,
    /// Deepest fully completed iteration.
    pub depth: u8,
    pub nodes: u64,
    /// Principal variation, starting with `best_move`.
    pub pv: Vec<Move>,
    pub elapsed: Duration,
}

/// Monotone wrapper around a caller's progress callback.
pub struct Progress<'a> {
    sink: &'a mut dyn FnMut(u8),
    last: u8,
}

impl<'a> Progress<'a> {
    pub fn new(sink: &'a mut dyn FnMut(u8)) -> Self {
        Self { sink, last: 0 }
    }

    /// Forward `percent`, never going below a value already reported.
    pub fn report(&mut self, percent: u8) {
        self.last = percent.min(100).max(self.last);
        (self.sink)(self.last);
    }
}

/// Iterative-deepening alpha-beta searcher.
///
/// Owns the transposition table, the move orderer and the evaluator, so
/// successive calls reuse what earlier searches learned.
pub struct SearchEngine {
    config: SearchConfig,
    tt: Box<dyn TranspositionTable + Send>,
    orderer: Box<dyn MoveOrderer + Send>,
    eval: Box<dyn EvaluationStrategy + Send>,
    repetition: RepetitionTracker,
    undo: Vec<Undo>,
    pv: Box<PvTable>,
    stop_flag: Option<Arc<AtomicBool>>,
}

impl SearchEngine {
    /// Engine with the array table, heuristic orderer and classical evaluation.
    pub fn new(config: SearchConfig) -> Self {
        let tt = ArrayTable::new(config.tt_size_mb);
        Self::with_parts(
            config,
            Box::new(tt),
            Box::new(HeuristicOrderer::new()),
            Box::new(ClassicalEval),
        )
    }

    /// Engine over caller-supplied components.
    pub fn with_parts(
        config: SearchConfig,
        tt: Box<dyn TranspositionTable + Send>,
        orderer: Box<dyn MoveOrderer + Send>,
        eval: Box<dyn EvaluationStrategy + Send>,
    ) -> Self {
        Self {
            config,
            tt,
            orderer,
            eval,
            repetition: RepetitionTracker::new(),
            undo: vec![Undo::default(); MAX_PLY],
            pv: Box::new(PvTable::new()),
            stop_flag: None,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SearchConfig {
        &mut self.config
    }

    /// Replace the table with a fresh [`ArrayTable`] of `mb` megabytes.
    pub fn resize_tt(&mut self, mb: usize) {
        self.config.tt_size_mb = mb;
        self.tt = Box::new(ArrayTable::new(mb));
    }

    /// Forget everything learned by earlier searches.
    pub fn clear(&mut self) {
        self.tt.clear();
        self.orderer.clear();
    }

    /// Raise `flag` from another thread to cut the next search short.
    pub fn set_stop_flag(&mut self, flag: Option<Arc<AtomicBool>>) {
        self.stop_flag = flag;
    }

    /// Search `root` and return the best move of the deepest completed
    /// iteration.
    ///
    /// `history` holds the keys of the positions played before `root`,
    /// oldest first, trimmed at the last irreversible move. `progress` is
    /// called with 0 first, non-decreasing percentages while searching and
    /// 100 last.
    pub fn compute_best_move(
        &mut self,
        root: &Position,
        history: &[u64],
        progress: &mut dyn FnMut(u8),
    ) -> SearchResult {
        let mut progress = Progress::new(progress);
        progress.report(0);

        let control = SearchControl::new(self.config.time_budget, self.stop_flag.clone());
        let mut pos = root.clone();
        let root_key = pos.hash();
        self.repetition.seed(history, root_key);
        self.tt.bump_age();
        let age = self.tt.age();

        let legal = generate_all_legal(&mut pos);
        if legal.is_empty() {
            let score = if pos.is_in_check() { -MATE } else { 0 };
            info!(score = %format_score(score), "no legal moves at the root");
            progress.report(100);
            return SearchResult {
                best_move: None,
                score,
                depth: 0,
                nodes: 0,
                pv: Vec::new(),
                elapsed: control.elapsed(),
            };
        }

        let in_check = pos.is_in_check();
        let max_depth = self.config.depth_limit();
        let mut moves: Vec<Move> = legal.into_iter().collect();

        let mut searcher = Searcher {
            tt: self.tt.as_mut(),
            orderer: self.orderer.as_mut(),
            eval: self.eval.as_ref(),
            repetition: &mut self.repetition,
            undo: &mut self.undo,
            pv: &mut self.pv,
            config: &self.config,
            control,
            nodes: 0,
            age,
        };

        let mut hash_move = searcher
            .tt
            .probe(root_key, 0, 0, -INF, INF)
            .map_or(Move::NULL, |hit| hit.best_move);

        let mut result = SearchResult {
            best_move: Some(moves[0]),
            score: 0,
            depth: 0,
            nodes: 0,
            pv: Vec::new(),
            elapsed: Duration::ZERO,
        };

        for depth in 1..=max_depth {
            searcher
                .orderer
                .order(&pos, 0, hash_move, in_check, &mut moves, depth);

            let Some(outcome) = searcher.aspiration(&mut pos, &moves, depth, result.score, &mut progress)
            else {
                break;
            };

            let mut pv: Vec<Move> = searcher.pv.root_pv().to_vec();
            if pv.first() != Some(&outcome.best_move) {
                pv = vec![outcome.best_move];
            }
            result.best_move = Some(outcome.best_move);
            result.score = outcome.score;
            result.depth = depth;
            result.pv = pv;
            hash_move = outcome.best_move;

            searcher.tt.store(
                root_key,
                depth,
                Bound::Exact,
                outcome.score,
                outcome.best_move,
                0,
                age,
            );

            let elapsed = searcher.control.elapsed();
            let elapsed_ms = elapsed.as_millis() as u64;
            let nps = searcher.nodes * 1000 / elapsed_ms.max(1);
            info!(
                depth,
                score = %format_score(outcome.score),
                nodes = searcher.nodes,
                elapsed_ms,
                nps,
                best = %outcome.best_move,
                "iteration complete"
            );

            progress.report((u32::from(depth) * 100 / u32::from(max_depth)) as u8);

            if outcome.score > 0 && is_mate_score(outcome.score) {
                break;
            }
            if searcher.control.poll() {
                break;
            }
        }

        result.nodes = searcher.nodes;
        result.elapsed = searcher.control.elapsed();
        if result.pv.is_empty()
            && let Some(mv) = result.best_move
        {
            result.pv.push(mv);
        }

        info!(
            depth = result.depth,
            score = %format_score(result.score),
            nodes = result.nodes,
            elapsed_ms = result.elapsed.as_millis() as u64,
            stopped = searcher.control.stopped(),
            best = %result.best_move.unwrap_or(Move::NULL),
            "search finished"
        );
        progress.report(100);
        result
    }
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("config", &self.config)
            .field("tt_age", &self.tt.age())
            .finish_non_exhaustive()
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use gambit_core::Square;

    use super::*;

    const SCHOLAR: &str = "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4";
    const STALEMATE: &str = "k7/2K5/1Q6/8/8/8/8/8 b - - 0 1";
    const MATED: &str = "7k/6Q1/5K2/8/8/8/8/8 b - - 0 1";

    fn search_depth(fen: &str, depth: u8) -> SearchResult {
        let pos: Position = fen.parse().unwrap();
        let mut config = SearchConfig::default();
        config.max_depth = depth;
        config.tt_size_mb = 1;
        let mut engine = SearchEngine::new(config);
        engine.compute_best_move(&pos, &[], &mut |_| {})
    }

    #[test]
    fn format_score_renders_centipawns_and_mates() {
        assert_eq!(format_score(35), "+35");
        assert_eq!(format_score(0), "+0");
        assert_eq!(format_score(-120), "-120");
        assert_eq!(format_score(MATE - 1), "#1");
        assert_eq!(format_score(MATE - 5), "#3");
        assert_eq!(format_score(-MATE + 4), "#-2");
    }

    #[test]
    fn mate_band() {
        assert!(is_mate_score(MATE - 3));
        assert!(is_mate_score(-MATE + 10));
        assert!(!is_mate_score(MATE_BOUND - 1));
    }

    #[test]
    fn progress_never_goes_backwards() {
        let mut seen = Vec::new();
        let mut sink = |p: u8| seen.push(p);
        let mut progress = Progress::new(&mut sink);
        progress.report(10);
        progress.report(5);
        progress.report(150);
        drop(progress);
        assert_eq!(seen, vec![10, 10, 100]);
    }

    #[test]
    fn depth_1_returns_legal_move() {
        let result = search_depth(gambit_core::STARTING_FEN, 1);
        let mut pos = Position::starting_position();
        let legal = generate_all_legal(&mut pos);
        let best = result.best_move.unwrap();
        assert!(legal.contains(best));
        assert_eq!(result.depth, 1);
    }

    #[test]
    fn finds_mate_in_one() {
        for depth in [2, 4, 6] {
            let result = search_depth(SCHOLAR, depth);
            assert_eq!(result.best_move.unwrap().to_uci(), "h5f7");
            assert_eq!(result.score, MATE - 1);
            assert_eq!(format_score(result.score), "#1");
        }
    }

    #[test]
    fn stalemate_has_no_move_and_scores_zero() {
        let result = search_depth(STALEMATE, 3);
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, 0);
        assert!(result.pv.is_empty());
    }

    #[test]
    fn checkmated_root_has_no_move() {
        let result = search_depth(MATED, 3);
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, -MATE);
    }

    #[test]
    fn pv_starts_with_best_move() {
        let result = search_depth(gambit_core::STARTING_FEN, 4);
        assert!(!result.pv.is_empty());
        assert_eq!(Some(result.pv[0]), result.best_move);

        // The line must be playable.
        let mut pos = Position::starting_position();
        for &mv in &result.pv {
            assert!(generate_all_legal(&mut pos).contains(mv));
            pos = pos.with_move(mv);
        }
    }

    #[test]
    fn warm_table_gives_same_best_move() {
        let pos: Position = SCHOLAR.parse().unwrap();
        let mut config = SearchConfig::default();
        config.max_depth = 3;
        config.tt_size_mb = 1;
        let mut engine = SearchEngine::new(config);
        let first = engine.compute_best_move(&pos, &[], &mut |_| {});
        let second = engine.compute_best_move(&pos, &[], &mut |_| {});
        assert_eq!(first.best_move, second.best_move);
        assert_eq!(first.score, second.score);
    }

    #[test]
    fn raised_stop_flag_returns_a_move() {
        let pos = Position::starting_position();
        let mut config = SearchConfig::default();
        config.max_depth = 64;
        config.tt_size_mb = 1;
        let mut engine = SearchEngine::new(config);
        let flag = Arc::new(AtomicBool::new(false));
        engine.set_stop_flag(Some(Arc::clone(&flag)));

        let mut reports = Vec::new();
        let result = engine.compute_best_move(&pos, &[], &mut |p| {
            reports.push(p);
            if p > 0 {
                flag.store(true, Ordering::Relaxed);
            }
        });

        assert!(result.best_move.is_some());
        assert!(result.depth < 64);
        assert_eq!(reports.last(), Some(&100));
    }

    #[test]
    fn repetition_scores_as_draw() {
        // 1.Nf3 Nf6 2.Ng1 Ng8 returns to the start; a third visit is a draw.
        let start = Position::starting_position();
        let b1 = start.with_move(Move::quiet(Square::G1, Square::F3, gambit_core::PieceKind::Knight));
        let b2 = b1.with_move(Move::quiet(Square::G8, Square::F6, gambit_core::PieceKind::Knight));
        let b3 = b2.with_move(Move::quiet(Square::F3, Square::G1, gambit_core::PieceKind::Knight));
        let b4 = b3.with_move(Move::quiet(Square::F6, Square::G8, gambit_core::PieceKind::Knight));
        assert_eq!(b4.hash(), start.hash());

        let history = [start.hash(), b1.hash(), b2.hash(), b3.hash()];
        let mut config = SearchConfig::default();
        config.max_depth = 4;
        config.tt_size_mb = 1;
        let mut engine = SearchEngine::new(config);
        let result = engine.compute_best_move(&b4, &history, &mut |_| {});
        assert!(result.score.abs() <= 100, "score {}", result.score);
        assert!(result.best_move.is_some());
    }

    #[test]
    fn resize_and_clear_keep_the_engine_usable() {
        let mut engine = SearchEngine::default();
        engine.resize_tt(1);
        engine.clear();
        assert_eq!(engine.config().tt_size_mb, 1);
        engine.config_mut().max_depth = 2;
        let result = engine.compute_best_move(&Position::starting_position(), &[], &mut |_| {});
        assert_eq!(result.depth, 2);
    }
}
