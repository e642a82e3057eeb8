//! Pseudo-legal pawn moves: pushes, double pushes, captures, promotions, en passant.

use crate::attacks::pawn_attacks;
use crate::bitboard::Bitboard;
use crate::chess_move::Move;
use crate::color::Color;
use crate::piece::PieceKind;
use crate::position::Position;
use crate::square::Square;

pub(super) fn gen_pawns(pos: &Position, sink: &mut impl FnMut(Move)) {
    let us = pos.side_to_move();
    let them = !us;
    let enemy = pos.side(them);
    let empty = !pos.occupied();
    let (start_rank, promo_rank) = match us {
        Color::White => (Bitboard::RANK_2, Bitboard::RANK_8),
        Color::Black => (Bitboard::RANK_7, Bitboard::RANK_1),
    };

    for from in pos.pieces(us, PieceKind::Pawn) {
        let one = from.offset(us.forward());
        if empty.contains(one) {
            if promo_rank.contains(one) {
                push_promotions(from, one, false, sink);
            } else {
                sink(Move::quiet(from, one, PieceKind::Pawn));
                if start_rank.contains(from) {
                    let two = one.offset(us.forward());
                    if empty.contains(two) {
                        sink(Move::double_push(from, two));
                    }
                }
            }
        }

        let targets = pawn_attacks(us, from);
        for to in targets & enemy {
            if promo_rank.contains(to) {
                push_promotions(from, to, true, sink);
            } else {
                sink(Move::capture(from, to, PieceKind::Pawn));
            }
        }

        if let Some(ep) = pos.ep_square()
            && targets.contains(ep)
        {
            sink(Move::en_passant(from, ep));
        }
    }
}

fn push_promotions(from: Square, to: Square, capture: bool, sink: &mut impl FnMut(Move)) {
    for kind in PieceKind::PROMOTIONS {
        sink(Move::promotion(from, to, kind, capture));
    }
}
