//! Draw rules and contempt scoring inside the search.

use gambit_core::Position;

/// Halfmove clock value at which the fifty-move rule applies.
pub const FIFTY_MOVE_PLIES: u16 = 100;

/// The fifty-move rule has been reached.
#[inline]
pub fn is_fifty_move_draw(pos: &Position) -> bool {
    pos.halfmove_clock() >= FIFTY_MOVE_PLIES
}

/// Score of a rule draw for the side to move.
///
/// `static_eval` is the side to move's own evaluation. A side that stands
/// better is charged `contempt` for accepting the draw; a side that stands
/// worse is credited the same amount, so it steers towards it.
pub fn draw_score(static_eval: i32, contempt: i32) -> i32 {
    match static_eval.signum() {
        1 => -contempt,
        -1 => contempt,
        _ => 0,
    }
}
