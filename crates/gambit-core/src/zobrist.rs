//! Zobrist fingerprints.
//!
//! Keys come from a counter-based splitmix64 stream with a fixed seed, so
//! every build produces the same values. Layout of the stream:
//! 768 piece-square keys, one side-to-move key, 16 castling keys, 8
//! en-passant file keys.

use crate::attacks::pawn_attacks;
use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::piece::{Piece, PieceKind};
use crate::position::Position;
use crate::square::Square;

const SEED: u64 = 0x9E37_79B9_7F4A_7C15;

const SIDE_OFFSET: usize = 768;
const CASTLING_OFFSET: usize = SIDE_OFFSET + 1;
const EP_OFFSET: usize = CASTLING_OFFSET + 16;
const KEY_COUNT: usize = EP_OFFSET + 8;

const fn splitmix64(n: u64) -> u64 {
    let mut z = SEED.wrapping_add(n.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

static KEYS: [u64; KEY_COUNT] = {
    let mut keys = [0u64; KEY_COUNT];
    let mut i = 0;
    while i < KEY_COUNT {
        keys[i] = splitmix64(i as u64 + 1);
        i += 1;
    }
    keys
};

/// XORed in when Black is to move.
pub const SIDE_TO_MOVE: u64 = splitmix64(SIDE_OFFSET as u64 + 1);

#[inline]
pub fn piece_key(piece: Piece, sq: Square) -> u64 {
    KEYS[piece.index() * 64 + sq.index()]
}

#[inline]
pub fn castling_key(rights: CastleRights) -> u64 {
    KEYS[CASTLING_OFFSET + rights.bits() as usize]
}

/// En-passant contribution: the file key only when a pawn of the side to
/// move stands ready to capture on the target square, otherwise 0.
///
/// A double push with no capturing pawn nearby therefore hashes exactly
/// like the same placement reached without it.
#[inline]
pub fn en_passant_key(pos: &Position) -> u64 {
    match pos.ep_square() {
        Some(ep) if ep_capture_possible(pos, ep) => KEYS[EP_OFFSET + ep.file() as usize],
        _ => 0,
    }
}

fn ep_capture_possible(pos: &Position, ep: Square) -> bool {
    let us = pos.side_to_move();
    (pawn_attacks(!us, ep) & pos.pieces(us, PieceKind::Pawn)).is_nonempty()
}

/// Fingerprint computed from scratch.
pub fn hash(pos: &Position) -> u64 {
    let mut h = 0u64;
    for color in Color::ALL {
        for kind in PieceKind::ALL {
            let piece = Piece::new(color, kind);
            for sq in pos.pieces(color, kind) {
                h ^= piece_key(piece, sq);
            }
        }
    }
    if pos.side_to_move() == Color::Black {
        h ^= SIDE_TO_MOVE;
    }
    h ^ castling_key(pos.castling_rights()) ^ en_passant_key(pos)
}
