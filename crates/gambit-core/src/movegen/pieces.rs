//! Pseudo-legal knight, slider and king moves, including castling.

use crate::attacks::{attacks_of, is_square_attacked};
use crate::bitboard::Bitboard;
use crate::castle_rights::CastleSide;
use crate::chess_move::Move;
use crate::piece::PieceKind;
use crate::position::Position;
use crate::square::Square;

/// Knights, bishops, rooks, queens and the king's ordinary steps.
pub(super) fn gen_pieces(pos: &Position, sink: &mut impl FnMut(Move)) {
    let us = pos.side_to_move();
    let own = pos.side(us);
    let enemy = pos.side(!us);
    let occupied = pos.occupied();

    for kind in [
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ] {
        for from in pos.pieces(us, kind) {
            let targets = attacks_of(kind, us, from, occupied) & !own;
            for to in targets {
                if enemy.contains(to) {
                    sink(Move::capture(from, to, kind));
                } else {
                    sink(Move::quiet(from, to, kind));
                }
            }
        }
    }
}

/// Castling: rights held, king and rook on their home squares, the squares
/// between them empty, and none of the king's origin, transit or
/// destination squares attacked.
pub(super) fn gen_castles(pos: &Position, sink: &mut impl FnMut(Move)) {
    let us = pos.side_to_move();
    let rights = pos.castling_rights();
    let rank = us.back_rank();
    let Some(king_from) = Square::from_coords(4, rank) else {
        return;
    };
    if !pos.pieces(us, PieceKind::King).contains(king_from) {
        return;
    }

    // (side, rook file, files that must be empty, files the king crosses)
    let sides: [(CastleSide, u8, &[u8], [u8; 3]); 2] = [
        (CastleSide::King, 7, &[5, 6], [4, 5, 6]),
        (CastleSide::Queen, 0, &[1, 2, 3], [4, 3, 2]),
    ];

    for (side, rook_file, empty_files, king_path) in sides {
        if !rights.has(us, side) {
            continue;
        }
        let rook_home = Square::from_coords(rook_file, rank);
        if !rook_home.is_some_and(|sq| pos.pieces(us, PieceKind::Rook).contains(sq)) {
            continue;
        }
        let must_be_empty = empty_files
            .iter()
            .filter_map(|&file| Square::from_coords(file, rank))
            .fold(Bitboard::EMPTY, |acc, sq| acc | sq.bitboard());
        if (must_be_empty & pos.occupied()).is_nonempty() {
            continue;
        }
        let path_attacked = king_path
            .iter()
            .filter_map(|&file| Square::from_coords(file, rank))
            .any(|sq| is_square_attacked(pos, sq, !us));
        if path_attacked {
            continue;
        }
        if let Some(king_to) = Square::from_coords(king_path[2], rank) {
            sink(Move::castle(king_from, king_to));
        }
    }
}
