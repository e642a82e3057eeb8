//! Negamax alpha-beta search with principal variation search.

use gambit_core::{Move, Position, Undo, generate_all_legal};
use tracing::debug;

use crate::config::SearchConfig;
use crate::eval::EvaluationStrategy;
use crate::search::control::SearchControl;
use crate::search::draw::{draw_score, is_fifty_move_draw};
use crate::search::ordering::MoveOrderer;
use crate::search::repetition::RepetitionTracker;
use crate::search::tt::{Bound, TranspositionTable};
use crate::search::{INF, MATE, MAX_PLY, Progress, is_mate_score};

/// Futility margin by remaining depth.
const FUTILITY_MARGIN: [i32; 3] = [0, 150, 300];

/// Deepest node at which futility pruning applies.
const FUTILITY_DEPTH: i32 = 2;

/// Deepest node at which late-move pruning applies.
const LMP_DEPTH: i32 = 3;

/// Quiet moves searched at `depth` before the rest are skipped.
#[inline]
fn lmp_threshold(depth: i32) -> usize {
    (4 + depth * depth) as usize
}

/// Triangular principal variation table.
///
/// Row `ply` holds the best line found from that ply; a node writes its
/// move at the head of its row and copies the child's row behind it.
pub struct PvTable {
    moves: [[Move; MAX_PLY]; MAX_PLY],
    len: [usize; MAX_PLY],
}

impl PvTable {
    pub fn new() -> Self {
        Self {
            moves: [[Move::NULL; MAX_PLY]; MAX_PLY],
            len: [0; MAX_PLY],
        }
    }

    /// Forget the line at `ply` (called on node entry).
    #[inline]
    pub fn clear_ply(&mut self, ply: usize) {
        if ply < MAX_PLY {
            self.len[ply] = 0;
        }
    }

    /// Make `mv` followed by the line at `ply + 1` the line at `ply`.
    pub fn update(&mut self, ply: usize, mv: Move) {
        if ply >= MAX_PLY {
            return;
        }
        self.moves[ply][0] = mv;

        let child = ply + 1;
        if child < MAX_PLY {
            let copy_len = self.len[child].min(MAX_PLY - 1);
            let (top, bottom) = self.moves.split_at_mut(child);
            top[ply][1..1 + copy_len].copy_from_slice(&bottom[0][..copy_len]);
            self.len[ply] = 1 + copy_len;
        } else {
            self.len[ply] = 1;
        }
    }

    /// Line found from the root.
    pub fn root_pv(&self) -> &[Move] {
        &self.moves[0][..self.len[0]]
    }
}

impl Default for PvTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Best root move and score of one completed root pass.
#[derive(Debug, Clone, Copy)]
pub(super) struct RootOutcome {
    pub best_move: Move,
    pub score: i32,
}

/// Mutable search state threaded through the recursion.
///
/// Borrows the long-lived parts of a [`SearchEngine`](super::SearchEngine)
/// for the duration of one `compute_best_move` call.
pub(super) struct Searcher<'a> {
    pub tt: &'a mut dyn TranspositionTable,
    pub orderer: &'a mut dyn MoveOrderer,
    pub eval: &'a dyn EvaluationStrategy,
    pub repetition: &'a mut RepetitionTracker,
    pub undo: &'a mut [Undo],
    pub pv: &'a mut PvTable,
    pub config: &'a SearchConfig,
    pub control: SearchControl,
    pub nodes: u64,
    pub age: u8,
}

impl Searcher<'_> {
    /// Apply `mv` at `ply`, record the child key and raise the repetition
    /// floor for irreversible moves. Returns the floor to restore.
    #[inline]
    fn enter(&mut self, pos: &mut Position, mv: Move, ply: usize) -> usize {
        pos.make_in_place(mv, &mut self.undo[ply]);
        let index = self.repetition.root_index() + ply + 1;
        self.repetition.set(index, pos.hash());
        let saved_floor = self.repetition.floor();
        if mv.is_irreversible() {
            self.repetition.set_floor(index);
        }
        saved_floor
    }

    #[inline]
    fn leave(&mut self, pos: &mut Position, ply: usize, saved_floor: usize) {
        self.repetition.set_floor(saved_floor);
        pos.unmake(&self.undo[ply]);
    }

    /// Search every root move at `depth` inside `(alpha, beta)`.
    ///
    /// `moves` must be the ordered legal root moves. Returns `None` when
    /// the search was stopped before the pass finished.
    pub fn search_root(
        &mut self,
        pos: &mut Position,
        moves: &[Move],
        depth: u8,
        mut alpha: i32,
        beta: i32,
        progress: &mut Progress<'_>,
    ) -> Option<RootOutcome> {
        let max_depth = u32::from(self.config.depth_limit());
        let total = moves.len() as u32;
        let child_depth = i32::from(depth) - 1;

        self.pv.clear_ply(0);
        let mut best = RootOutcome {
            best_move: moves[0],
            score: -INF,
        };

        for (i, &mv) in moves.iter().enumerate() {
            let saved_floor = self.enter(pos, mv, 0);
            let score = if i == 0 {
                -self.negamax(pos, child_depth, -beta, -alpha, 1)
            } else {
                let mut s = -self.negamax(pos, child_depth, -alpha - 1, -alpha, 1);
                if s > alpha && s < beta {
                    s = -self.negamax(pos, child_depth, -beta, -alpha, 1);
                }
                s
            };
            self.leave(pos, 0, saved_floor);

            if self.control.stopped() {
                return None;
            }

            if score > best.score {
                best = RootOutcome {
                    best_move: mv,
                    score,
                };
            }
            if score > alpha {
                alpha = score;
                self.pv.update(0, mv);
            }

            let done = i as u32 + 1;
            let coarse = (u32::from(depth) - 1) * 100 / max_depth;
            let fine = done * 100 / (max_depth * total);
            progress.report((coarse + fine).min(99) as u8);

            if alpha >= beta {
                break;
            }
        }

        Some(best)
    }

    /// Root pass wrapped in an aspiration window around `previous`.
    ///
    /// The window grows fourfold on every fail-low or fail-high until it
    /// covers the full range.
    pub fn aspiration(
        &mut self,
        pos: &mut Position,
        moves: &[Move],
        depth: u8,
        previous: i32,
        progress: &mut Progress<'_>,
    ) -> Option<RootOutcome> {
        let window = self.config.aspiration_window;
        if depth == 1 || window <= 0 || is_mate_score(previous) {
            return self.search_root(pos, moves, depth, -INF, INF, progress);
        }

        let mut delta = window;
        let mut alpha = (previous - delta).max(-INF);
        let mut beta = (previous + delta).min(INF);

        loop {
            let outcome = self.search_root(pos, moves, depth, alpha, beta, progress)?;
            let failed_low = outcome.score <= alpha && alpha > -INF;
            let failed_high = outcome.score >= beta && beta < INF;
            if !failed_low && !failed_high {
                return Some(outcome);
            }

            delta = delta.saturating_mul(4);
            if failed_low {
                alpha = previous.saturating_sub(delta).max(-INF);
            } else {
                beta = previous.saturating_add(delta).min(INF);
            }
            debug!(
                depth,
                score = outcome.score,
                alpha,
                beta,
                fail = if failed_low { "low" } else { "high" },
                "aspiration re-search"
            );
        }
    }

    /// Negamax search of `pos` to `depth` plies at distance `ply` from the root.
    ///
    /// Returns the score from the side to move's point of view. When the
    /// search has been stopped the return value is meaningless and callers
    /// unwind without using it.
    pub fn negamax(&mut self, pos: &mut Position, depth: i32, mut alpha: i32, mut beta: i32, ply: usize) -> i32 {
        self.pv.clear_ply(ply);
        self.nodes += 1;

        if self.control.should_stop(self.nodes) {
            return 0;
        }

        // Mate distance pruning.
        alpha = alpha.max(-MATE + ply as i32);
        beta = beta.min(MATE - ply as i32 - 1);
        if alpha >= beta {
            return alpha;
        }

        let index = self.repetition.root_index() + ply;
        if self.repetition.is_threefold(index) || self.fifty_move_draw(pos) {
            return draw_score(self.eval.evaluate(pos), self.config.contempt);
        }

        let key = pos.hash();
        let tt_depth = depth.max(0) as u8;
        let mut hash_move = Move::NULL;
        if let Some(hit) = self.tt.probe(key, tt_depth, ply, alpha, beta) {
            if let Some(score) = hit.cutoff {
                return score;
            }
            hash_move = hit.best_move;
        }

        if depth <= 0 || ply >= MAX_PLY - 1 {
            return self.eval.evaluate(pos);
        }

        let mut moves = generate_all_legal(pos);
        let in_check = pos.is_in_check();
        if moves.is_empty() {
            let score = if in_check { -MATE + ply as i32 } else { 0 };
            self.tt.store(key, tt_depth, Bound::Exact, score, Move::NULL, ply, self.age);
            return score;
        }

        self.orderer
            .order(pos, ply, hash_move, in_check, moves.as_mut_slice(), tt_depth);

        let prunable = !in_check
            && !is_mate_score(alpha)
            && ((self.config.futility && depth <= FUTILITY_DEPTH)
                || (self.config.late_move_pruning && depth <= LMP_DEPTH));
        let static_eval = if prunable {
            Some(self.eval.evaluate(pos))
        } else {
            None
        };

        let original_alpha = alpha;
        let mut best_score = -INF;
        let mut best_move = Move::NULL;

        for (i, &mv) in moves.iter().enumerate() {
            let move_number = i + 1;
            let quiet = !mv.is_tactical();

            if move_number > 1
                && quiet
                && let Some(eval) = static_eval
            {
                if self.config.futility
                    && depth <= FUTILITY_DEPTH
                    && eval + FUTILITY_MARGIN[depth as usize] <= alpha
                {
                    continue;
                }
                if self.config.late_move_pruning
                    && depth <= LMP_DEPTH
                    && move_number > lmp_threshold(depth)
                {
                    continue;
                }
            }

            let saved_floor = self.enter(pos, mv, ply);
            let child = ply + 1;
            let full = depth - 1;

            let score = if move_number == 1 {
                -self.negamax(pos, full, -beta, -alpha, child)
            } else {
                let mut s;
                if self.config.lmr && !in_check && quiet && full >= 3 && move_number > 3 {
                    let reduction = 1 + i32::from(move_number > 10);
                    s = -self.negamax(pos, full - reduction, -alpha - 1, -alpha, child);
                    if s > alpha {
                        s = -self.negamax(pos, full, -alpha - 1, -alpha, child);
                    }
                } else {
                    s = -self.negamax(pos, full, -alpha - 1, -alpha, child);
                }
                if s > alpha && s < beta {
                    s = -self.negamax(pos, full, -beta, -alpha, child);
                }
                s
            };

            self.leave(pos, ply, saved_floor);

            if self.control.stopped() {
                return 0;
            }

            if score > best_score {
                best_score = score;
                best_move = mv;
            }
            if score > alpha {
                alpha = score;
                self.pv.update(ply, mv);
                if alpha >= beta {
                    if quiet {
                        self.orderer.on_cutoff(pos, ply, mv, tt_depth);
                    }
                    break;
                }
            }
        }

        let bound = if best_score <= original_alpha {
            Bound::Upper
        } else if best_score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.tt
            .store(key, tt_depth, bound, best_score, best_move, ply, self.age);

        best_score
    }

    /// Fifty-move draw, unless the move that reached the limit delivered mate.
    fn fifty_move_draw(&self, pos: &mut Position) -> bool {
        is_fifty_move_draw(pos) && !(pos.is_in_check() && !pos.has_legal_move())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    use gambit_core::{PieceKind, Square};

    use super::*;
    use crate::eval::MaterialEval;
    use crate::search::ordering::HeuristicOrderer;
    use crate::search::tt::ArrayTable;

    /// Pawn pushes and pawn captures available for both sides.
    const PAWN_TENSION: &str = "4k3/ppp5/8/3p4/2P1P3/8/PP6/4K3 w - - 0 1";

    fn mv(from: Square, to: Square) -> Move {
        Move::quiet(from, to, PieceKind::Knight)
    }

    /// Owns everything a [`Searcher`] borrows.
    struct Parts {
        tt: ArrayTable,
        orderer: HeuristicOrderer,
        repetition: RepetitionTracker,
        undo: Vec<Undo>,
        pv: PvTable,
        config: SearchConfig,
    }

    impl Parts {
        fn new(history: &[u64], root: &Position, floor: usize) -> Self {
            let mut repetition = RepetitionTracker::new();
            repetition.seed(history, root.hash());
            repetition.set_floor(floor);
            Self {
                tt: ArrayTable::new(1),
                orderer: HeuristicOrderer::new(),
                repetition,
                undo: vec![Undo::default(); MAX_PLY + 1],
                pv: PvTable::new(),
                config: SearchConfig::exhaustive(3),
            }
        }

        fn searcher(&mut self, control: SearchControl) -> Searcher<'_> {
            Searcher {
                tt: &mut self.tt,
                orderer: &mut self.orderer,
                eval: &MaterialEval,
                repetition: &mut self.repetition,
                undo: &mut self.undo,
                pv: &mut self.pv,
                config: &self.config,
                control,
                nodes: 0,
                age: 0,
            }
        }
    }

    #[test]
    fn irreversible_moves_restore_the_floor() {
        let mut pos: Position = PAWN_TENSION.parse().unwrap();
        let before = pos.clone();
        let history = [11, 22, 33];
        let mut parts = Parts::new(&history, &pos, 1);

        let moves: Vec<Move> = generate_all_legal(&mut pos).into_iter().collect();
        assert!(moves.iter().any(|m| m.is_irreversible()));

        let mut report = |_: u8| {};
        let mut progress = Progress::new(&mut report);
        let mut searcher = parts.searcher(SearchControl::new(None, None));
        let outcome = searcher.search_root(&mut pos, &moves, 3, -INF, INF, &mut progress);
        assert!(outcome.is_some());
        assert!(searcher.nodes > moves.len() as u64);

        assert_eq!(pos, before);
        assert_eq!(parts.repetition.floor(), 1);
        assert_eq!(parts.repetition.root_index(), history.len());
        for (i, &key) in history.iter().enumerate() {
            assert_eq!(parts.repetition.get(i), key);
        }
        assert_eq!(parts.repetition.get(history.len()), before.hash());
    }

    #[test]
    fn stopped_search_restores_the_floor() {
        let mut pos: Position = PAWN_TENSION.parse().unwrap();
        let before = pos.clone();
        let mut parts = Parts::new(&[], &pos, 0);

        let mut control = SearchControl::new(None, Some(Arc::new(AtomicBool::new(true))));
        assert!(control.poll());

        // The pawn push raises the floor to ply 1 before the child sees the stop.
        let push = pos.parse_move("e4e5").unwrap();
        assert!(push.is_irreversible());

        let mut report = |_: u8| {};
        let mut progress = Progress::new(&mut report);
        let mut searcher = parts.searcher(control);
        let outcome = searcher.search_root(&mut pos, &[push], 3, -INF, INF, &mut progress);
        assert!(outcome.is_none());

        assert_eq!(pos, before);
        assert_eq!(parts.repetition.floor(), 0);
    }

    #[test]
    fn pv_update_prepends_child_line() {
        let mut pv = PvTable::new();
        pv.clear_ply(2);
        pv.update(2, mv(Square::G8, Square::F6));
        pv.clear_ply(1);
        pv.update(1, mv(Square::B1, Square::C3));
        pv.clear_ply(0);
        pv.update(0, mv(Square::G1, Square::F3));
        assert_eq!(
            pv.root_pv(),
            &[
                mv(Square::G1, Square::F3),
                mv(Square::B1, Square::C3),
                mv(Square::G8, Square::F6)
            ]
        );
    }

    #[test]
    fn cleared_child_truncates_line() {
        let mut pv = PvTable::new();
        pv.update(1, mv(Square::B1, Square::C3));
        pv.clear_ply(1);
        pv.update(0, mv(Square::G1, Square::F3));
        assert_eq!(pv.root_pv(), &[mv(Square::G1, Square::F3)]);
    }

    #[test]
    fn update_at_last_ply_is_single_move() {
        let mut pv = PvTable::new();
        pv.update(MAX_PLY - 1, mv(Square::B1, Square::C3));
        pv.update(MAX_PLY, mv(Square::G1, Square::F3));
        pv.update(MAX_PLY - 2, mv(Square::G1, Square::F3));
        assert_eq!(pv.len[MAX_PLY - 2], 2);
    }

    #[test]
    fn lmp_threshold_grows_with_depth() {
        assert_eq!(lmp_threshold(1), 5);
        assert_eq!(lmp_threshold(2), 8);
        assert_eq!(lmp_threshold(3), 13);
    }
}
