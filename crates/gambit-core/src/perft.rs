//! Perft (performance test) for move generation correctness verification.

use tracing::debug;

use crate::attacks::is_in_check;
use crate::movegen::{MoveList, generate_all_legal};
use crate::position::{Position, Undo};

/// Count the number of leaf nodes at the given depth.
///
/// Depth 0 returns 1 (the current position). Depth 1 returns the number
/// of legal moves without applying them.
pub fn perft(pos: &mut Position, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_all_legal(pos);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut undo = Undo::default();
    let mut nodes = 0u64;
    for mv in moves {
        pos.make_in_place(mv, &mut undo);
        nodes += perft(pos, depth - 1);
        pos.unmake(&undo);
    }
    nodes
}

/// Run perft with per-move breakdown (useful for debugging).
///
/// Returns a vector of `(uci_move, node_count)` pairs sorted alphabetically.
pub fn divide(pos: &mut Position, depth: usize) -> Vec<(String, u64)> {
    let moves = generate_all_legal(pos);
    let mut undo = Undo::default();
    let mut results: Vec<(String, u64)> = Vec::with_capacity(moves.len());
    for mv in moves {
        pos.make_in_place(mv, &mut undo);
        let count = if depth <= 1 { 1 } else { perft(pos, depth - 1) };
        pos.unmake(&undo);
        debug!(mv = %mv, nodes = count, "divide");
        results.push((mv.to_uci(), count));
    }
    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

/// Leaf-move breakdown gathered by [`perft_stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftStats {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

/// Perft that also classifies every move played on the last ply.
///
/// Captures include en passant captures.
pub fn perft_stats(pos: &mut Position, depth: usize) -> PerftStats {
    let mut stats = PerftStats::default();
    if depth == 0 {
        stats.nodes = 1;
        return stats;
    }
    collect_stats(pos, depth, &mut stats);
    stats
}

fn collect_stats(pos: &mut Position, depth: usize, stats: &mut PerftStats) {
    let moves: MoveList = generate_all_legal(pos);
    let mut undo = Undo::default();
    for mv in moves {
        pos.make_in_place(mv, &mut undo);
        if depth == 1 {
            stats.nodes += 1;
            stats.captures += u64::from(mv.is_capture());
            stats.en_passant += u64::from(mv.is_en_passant());
            stats.castles += u64::from(mv.is_castle());
            stats.promotions += u64::from(mv.is_promotion());
            if is_in_check(pos, pos.side_to_move()) {
                stats.checks += 1;
                if !pos.has_legal_move() {
                    stats.checkmates += 1;
                }
            }
        } else {
            collect_stats(pos, depth - 1, stats);
        }
        pos.unmake(&undo);
    }
}
