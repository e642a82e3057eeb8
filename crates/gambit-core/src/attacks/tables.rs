//! Attack tables computed at compile time; read-only for the life of the process.

use crate::bitboard::Bitboard;

/// Ray directions as (rank delta, file delta). The first four point towards
/// higher square indices, the last four towards lower ones.
pub(crate) const DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),   // north
    (0, 1),   // east
    (1, 1),   // north-east
    (1, -1),  // north-west
    (-1, 0),  // south
    (0, -1),  // west
    (-1, -1), // south-west
    (-1, 1),  // south-east
];

pub(crate) const NORTH: usize = 0;
pub(crate) const EAST: usize = 1;
pub(crate) const NORTH_EAST: usize = 2;
pub(crate) const NORTH_WEST: usize = 3;
pub(crate) const SOUTH: usize = 4;
pub(crate) const WEST: usize = 5;
pub(crate) const SOUTH_WEST: usize = 6;
pub(crate) const SOUTH_EAST: usize = 7;

const fn on_board(rank: i8, file: i8) -> bool {
    rank >= 0 && rank < 8 && file >= 0 && file < 8
}

const fn leaper_table(deltas: [(i8, i8); 8]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0;
    while sq < 64 {
        let rank = (sq / 8) as i8;
        let file = (sq % 8) as i8;
        let mut bits = 0u64;
        let mut d = 0;
        while d < deltas.len() {
            let (r, f) = (rank + deltas[d].0, file + deltas[d].1);
            if on_board(r, f) {
                bits |= 1u64 << (r * 8 + f) as u32;
            }
            d += 1;
        }
        table[sq] = Bitboard(bits);
        sq += 1;
    }
    table
}

const fn pawn_table() -> [[Bitboard; 64]; 2] {
    let mut table = [[Bitboard::EMPTY; 64]; 2];
    let mut sq = 0;
    while sq < 64 {
        let bit = 1u64 << sq;
        let not_a = !Bitboard::FILE_A.0;
        let not_h = !Bitboard::FILE_H.0;
        table[0][sq] = Bitboard(((bit << 7) & not_h) | ((bit << 9) & not_a));
        table[1][sq] = Bitboard(((bit >> 9) & not_h) | ((bit >> 7) & not_a));
        sq += 1;
    }
    table
}

/// Squares from `sq` to the board edge in each direction, excluding `sq`.
const fn ray_table() -> [[Bitboard; 64]; 8] {
    let mut table = [[Bitboard::EMPTY; 64]; 8];
    let mut dir = 0;
    while dir < 8 {
        let (dr, df) = DIRECTIONS[dir];
        let mut sq = 0;
        while sq < 64 {
            let mut r = (sq / 8) as i8 + dr;
            let mut f = (sq % 8) as i8 + df;
            let mut bits = 0u64;
            while on_board(r, f) {
                bits |= 1u64 << (r * 8 + f) as u32;
                r += dr;
                f += df;
            }
            table[dir][sq] = Bitboard(bits);
            sq += 1;
        }
        dir += 1;
    }
    table
}

pub(crate) static KNIGHT_ATTACKS: [Bitboard; 64] = leaper_table([
    (2, 1), (2, -1), (-2, 1), (-2, -1),
    (1, 2), (1, -2), (-1, 2), (-1, -2),
]);

pub(crate) static KING_ATTACKS: [Bitboard; 64] = leaper_table([
    (1, 0), (1, 1), (0, 1), (-1, 1),
    (-1, 0), (-1, -1), (0, -1), (1, -1),
]);

/// Indexed `[color][square]`: the squares a pawn of that color attacks.
pub(crate) static PAWN_ATTACKS: [[Bitboard; 64]; 2] = pawn_table();

/// Indexed `[direction][square]`.
pub(crate) static RAYS: [[Bitboard; 64]; 8] = ray_table();
