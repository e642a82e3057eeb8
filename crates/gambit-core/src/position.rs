//! Bitboard position with reversible move application.
//!
//! Twelve disjoint piece boards are the source of truth; the per-color and
//! total occupancy boards are derived and recomputed after every mutation.
//! [`Position::make`] / [`Position::make_in_place`] record a full snapshot in
//! an [`Undo`] which [`Position::unmake`] restores. Calls must pair up in
//! strict LIFO order.

use std::fmt;

use crate::attacks;
use crate::bitboard::Bitboard;
use crate::castle_rights::CastleRights;
use crate::chess_move::Move;
use crate::color::Color;
use crate::error::PositionError;
use crate::piece::{Piece, PieceKind};
use crate::square::Square;
use crate::zobrist;

/// Everything needed to take a move back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Undo {
    boards: [Bitboard; Piece::COUNT],
    white_to_move: bool,
    castling: CastleRights,
    en_passant: Option<Square>,
    halfmove_clock: u16,
    fullmove_number: u16,
    hash: u64,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    /// Indexed by [`Piece::index`].
    boards: [Bitboard; Piece::COUNT],
    by_color: [Bitboard; 2],
    occupied: Bitboard,
    side_to_move: Color,
    castling: CastleRights,
    en_passant: Option<Square>,
    halfmove_clock: u16,
    fullmove_number: u16,
    hash: u64,
}

impl Position {
    /// The standard initial position.
    pub fn starting_position() -> Position {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut boards = [Bitboard::EMPTY; Piece::COUNT];
        for (file, kind) in BACK_RANK.into_iter().enumerate() {
            let file = file as u8;
            boards[Piece::new(Color::White, kind).index()] |= Bitboard::file(file) & Bitboard::RANK_1;
            boards[Piece::new(Color::Black, kind).index()] |= Bitboard::file(file) & Bitboard::RANK_8;
        }
        boards[Piece::new(Color::White, PieceKind::Pawn).index()] = Bitboard::RANK_2;
        boards[Piece::new(Color::Black, PieceKind::Pawn).index()] = Bitboard::RANK_7;

        Position::from_parts(boards, Color::White, CastleRights::ALL, None, 0, 1)
    }

    /// Assemble a position, deriving aggregates and the hash. Used by FEN import.
    pub(crate) fn from_parts(
        boards: [Bitboard; Piece::COUNT],
        side_to_move: Color,
        castling: CastleRights,
        en_passant: Option<Square>,
        halfmove_clock: u16,
        fullmove_number: u16,
    ) -> Position {
        let mut pos = Position {
            boards,
            by_color: [Bitboard::EMPTY; 2],
            occupied: Bitboard::EMPTY,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
            hash: 0,
        };
        pos.recompute_aggregates();
        pos.hash = zobrist::hash(&pos);
        pos
    }

    // ── accessors ──────────────────────────────────────────────────────────

    /// Board of one colored piece kind.
    #[inline]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.boards[Piece::new(color, kind).index()]
    }

    /// Board of one piece kind, both colors.
    #[inline]
    pub fn kind(&self, kind: PieceKind) -> Bitboard {
        self.pieces(Color::White, kind) | self.pieces(Color::Black, kind)
    }

    #[inline]
    pub fn side(&self, color: Color) -> Bitboard {
        self.by_color[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn is_white_to_move(&self) -> bool {
        self.side_to_move == Color::White
    }

    #[inline]
    pub fn castling_rights(&self) -> CastleRights {
        self.castling
    }

    #[inline]
    pub fn ep_square(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Zobrist fingerprint, maintained incrementally by `make`.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        (0..Piece::COUNT)
            .find(|&idx| self.boards[idx].contains(sq))
            .and_then(Piece::from_index)
    }

    fn kind_on(&self, sq: Square, color: Color) -> Option<PieceKind> {
        PieceKind::ALL
            .into_iter()
            .find(|&kind| self.pieces(color, kind).contains(sq))
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(color, PieceKind::King).lsb()
    }

    /// Is the side to move in check?
    pub fn is_in_check(&self) -> bool {
        attacks::is_in_check(self, self.side_to_move)
    }

    // ── mutation ───────────────────────────────────────────────────────────

    /// Apply `mv` and return the record that undoes it.
    #[inline]
    pub fn make(&mut self, mv: Move) -> Undo {
        let mut undo = Undo::default();
        self.make_in_place(mv, &mut undo);
        undo
    }

    /// Apply `mv`, writing the undo snapshot into a caller-owned slot.
    ///
    /// `mv` must be pseudo-legal for this position.
    pub fn make_in_place(&mut self, mv: Move, undo: &mut Undo) {
        *undo = self.snapshot();

        let us = self.side_to_move;
        let them = !us;
        let from = mv.from();
        let to = mv.to();
        let mover = Piece::new(us, mv.mover());

        let mut hash = self.hash ^ zobrist::en_passant_key(self) ^ zobrist::castling_key(self.castling);

        if mv.is_en_passant() {
            let victim_sq = to.offset(-us.forward());
            hash ^= self.toggle(Piece::new(them, PieceKind::Pawn), victim_sq);
        } else if mv.is_capture() {
            debug_assert!(self.side(them).contains(to), "capture flag on {mv} with empty target");
            if let Some(kind) = self.kind_on(to, them) {
                hash ^= self.toggle(Piece::new(them, kind), to);
            }
        }

        // The pawn leaves and the promoted piece lands in one step.
        let landed = match mv.promotion_kind() {
            Some(kind) => Piece::new(us, kind),
            None => mover,
        };
        hash ^= self.toggle(mover, from);
        hash ^= self.toggle(landed, to);

        if mv.is_castle() {
            let rank = us.back_rank();
            let (rook_from, rook_to) = if to.file() == 6 { (7, 5) } else { (0, 3) };
            let rook = Piece::new(us, PieceKind::Rook);
            for file in [rook_from, rook_to] {
                if let Some(sq) = Square::from_coords(file, rank) {
                    hash ^= self.toggle(rook, sq);
                }
            }
        }

        self.castling = self.castling.after_move(from, to);
        self.en_passant = if mv.is_double_push() {
            Some(from.offset(us.forward()))
        } else {
            None
        };
        self.halfmove_clock = if mv.is_irreversible() { 0 } else { self.halfmove_clock.saturating_add(1) };
        if us == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = them;
        self.recompute_aggregates();

        hash ^= zobrist::SIDE_TO_MOVE;
        hash ^= zobrist::castling_key(self.castling) ^ zobrist::en_passant_key(self);
        self.hash = hash;

        debug_assert!(self.validate_overlap().is_ok(), "overlapping boards after {mv}");
        debug_assert_eq!(self.hash, zobrist::hash(self), "hash drift after {mv}");
    }

    /// Restore the snapshot taken by the matching `make`.
    pub fn unmake(&mut self, undo: &Undo) {
        self.boards = undo.boards;
        self.side_to_move = if undo.white_to_move { Color::White } else { Color::Black };
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
        self.hash = undo.hash;
        self.recompute_aggregates();
    }

    /// Copy-make: the position after `mv`, leaving `self` untouched.
    pub fn with_move(&self, mv: Move) -> Position {
        let mut next = self.clone();
        next.make(mv);
        next
    }

    fn snapshot(&self) -> Undo {
        Undo {
            boards: self.boards,
            white_to_move: self.is_white_to_move(),
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            hash: self.hash,
        }
    }

    /// XOR `piece` on `sq` and return the matching hash delta.
    #[inline]
    fn toggle(&mut self, piece: Piece, sq: Square) -> u64 {
        self.boards[piece.index()] ^= sq.bitboard();
        zobrist::piece_key(piece, sq)
    }

    fn recompute_aggregates(&mut self) {
        let (white, black) = self.boards.split_at(6);
        self.by_color[0] = white.iter().fold(Bitboard::EMPTY, |acc, &bb| acc | bb);
        self.by_color[1] = black.iter().fold(Bitboard::EMPTY, |acc, &bb| acc | bb);
        self.occupied = self.by_color[0] | self.by_color[1];
    }

    // ── validation ─────────────────────────────────────────────────────────

    fn validate_overlap(&self) -> Result<(), PositionError> {
        let mut seen = Bitboard::EMPTY;
        for bb in self.boards {
            if let Some(sq) = (seen & bb).lsb() {
                return Err(PositionError::Overlap(sq));
            }
            seen |= bb;
        }
        Ok(())
    }

    /// Structural checks: disjoint boards, one king per side, no pawns on
    /// the first or last rank, and the side that just moved not left in check.
    pub fn validate(&self) -> Result<(), PositionError> {
        self.validate_overlap()?;
        for color in Color::ALL {
            let count = self.pieces(color, PieceKind::King).count();
            if count != 1 {
                return Err(PositionError::KingCount { color, count });
            }
        }
        let back_ranks = Bitboard::RANK_1 | Bitboard::RANK_8;
        if let Some(sq) = (self.kind(PieceKind::Pawn) & back_ranks).lsb() {
            return Err(PositionError::PawnOnBackRank(sq));
        }
        let waiting = !self.side_to_move;
        if attacks::is_in_check(self, waiting) {
            return Err(PositionError::OpponentInCheck(waiting));
        }
        Ok(())
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::starting_position()
    }
}

/// Prints the FEN.
impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position(\"{self}\")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pawn(color: Color) -> Piece {
        Piece::new(color, PieceKind::Pawn)
    }

    #[test]
    fn start_position_aggregates() {
        let pos = Position::starting_position();
        assert_eq!(pos.side(Color::White), Bitboard::RANK_1 | Bitboard::RANK_2);
        assert_eq!(pos.side(Color::Black), Bitboard::RANK_7 | Bitboard::RANK_8);
        assert_eq!(pos.occupied().count(), 32);
        assert_eq!(pos.king_square(Color::White), Some(Square::E1));
        assert_eq!(pos.king_square(Color::Black), Some(Square::E8));
        assert!(pos.validate().is_ok());
    }

    #[test]
    fn piece_on_reports_color_and_kind() {
        let pos = Position::starting_position();
        assert_eq!(pos.piece_on(Square::D8), Some(Piece::new(Color::Black, PieceKind::Queen)));
        assert_eq!(pos.piece_on(Square::E2), Some(pawn(Color::White)));
        assert_eq!(pos.piece_on(Square::E4), None);
    }

    #[test]
    fn double_push_sets_en_passant_and_clock() {
        let mut pos = Position::starting_position();
        pos.make(Move::double_push(Square::E2, Square::E4));
        assert_eq!(pos.ep_square(), Some(Square::E3));
        assert_eq!(pos.side_to_move(), Color::Black);
        assert_eq!(pos.halfmove_clock(), 0);
        assert_eq!(pos.fullmove_number(), 1);

        pos.make(Move::quiet(Square::G8, Square::F6, PieceKind::Knight));
        assert_eq!(pos.ep_square(), None);
        assert_eq!(pos.halfmove_clock(), 1);
        assert_eq!(pos.fullmove_number(), 2);
    }

    #[test]
    fn unmake_restores_exact_snapshot() {
        let mut pos = Position::starting_position();
        let before = pos.clone();
        let undo = pos.make(Move::quiet(Square::G1, Square::F3, PieceKind::Knight));
        assert_ne!(pos, before);
        pos.unmake(&undo);
        assert_eq!(pos, before);
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let mut pos: Position = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2".parse().unwrap();
        let before = pos.clone();
        let undo = pos.make(Move::en_passant(Square::E5, Square::D6));
        assert_eq!(pos.piece_on(Square::D5), None);
        assert_eq!(pos.piece_on(Square::D6), Some(pawn(Color::White)));
        assert!(pos.pieces(Color::Black, PieceKind::Pawn).is_empty());
        pos.unmake(&undo);
        assert_eq!(pos, before);
    }

    #[test]
    fn castling_moves_rook_and_drops_rights() {
        let mut pos: Position = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
        pos.make(Move::castle(Square::E1, Square::G1));
        assert_eq!(pos.piece_on(Square::F1), Some(Piece::new(Color::White, PieceKind::Rook)));
        assert_eq!(pos.piece_on(Square::H1), None);
        assert_eq!(pos.castling_rights().to_string(), "kq");

        pos.make(Move::castle(Square::E8, Square::C8));
        assert_eq!(pos.piece_on(Square::D8), Some(Piece::new(Color::Black, PieceKind::Rook)));
        assert_eq!(pos.piece_on(Square::A8), None);
        assert_eq!(pos.castling_rights(), CastleRights::NONE);
    }

    #[test]
    fn capturing_a_corner_rook_drops_that_right() {
        let mut pos: Position = "r3k2r/8/8/8/8/8/6B1/R3K2R w KQkq - 0 1".parse().unwrap();
        pos.make(Move::capture(Square::G2, Square::A8, PieceKind::Bishop));
        assert_eq!(pos.castling_rights().to_string(), "KQk");
    }

    #[test]
    fn promotion_swaps_pawn_for_piece() {
        let mut pos: Position = "1r2k3/P7/8/8/8/8/8/4K3 w - - 3 40".parse().unwrap();
        let before = pos.clone();
        let undo = pos.make(Move::promotion(Square::A7, Square::B8, PieceKind::Queen, true));
        assert_eq!(pos.piece_on(Square::B8), Some(Piece::new(Color::White, PieceKind::Queen)));
        assert!(pos.pieces(Color::White, PieceKind::Pawn).is_empty());
        assert!(pos.pieces(Color::Black, PieceKind::Rook).is_empty());
        assert_eq!(pos.halfmove_clock(), 0);
        pos.unmake(&undo);
        assert_eq!(pos, before);
    }

    #[test]
    fn validate_rejects_bad_structure() {
        let mut boards = [Bitboard::EMPTY; Piece::COUNT];
        boards[Piece::new(Color::White, PieceKind::King).index()] = Square::E1.bitboard();
        let pos = Position::from_parts(boards, Color::White, CastleRights::NONE, None, 0, 1);
        assert_eq!(
            pos.validate(),
            Err(PositionError::KingCount { color: Color::Black, count: 0 })
        );

        boards[Piece::new(Color::Black, PieceKind::King).index()] = Square::E8.bitboard();
        boards[pawn(Color::Black).index()] = Square::A1.bitboard();
        let pos = Position::from_parts(boards, Color::White, CastleRights::NONE, None, 0, 1);
        assert_eq!(pos.validate(), Err(PositionError::PawnOnBackRank(Square::A1)));

        boards[pawn(Color::Black).index()] = Square::E1.bitboard();
        let pos = Position::from_parts(boards, Color::White, CastleRights::NONE, None, 0, 1);
        assert_eq!(pos.validate(), Err(PositionError::Overlap(Square::E1)));
    }

    #[test]
    fn validate_rejects_check_on_the_waiting_side() {
        let mut boards = [Bitboard::EMPTY; Piece::COUNT];
        boards[Piece::new(Color::White, PieceKind::King).index()] = Square::E1.bitboard();
        boards[Piece::new(Color::Black, PieceKind::King).index()] = Square::E8.bitboard();
        boards[Piece::new(Color::White, PieceKind::Queen).index()] = Square::E2.bitboard();

        let white_to_move = Position::from_parts(boards, Color::White, CastleRights::NONE, None, 0, 1);
        assert_eq!(
            white_to_move.validate(),
            Err(PositionError::OpponentInCheck(Color::Black))
        );

        // The same placement is fine when the checked side is to move.
        let black_to_move = Position::from_parts(boards, Color::Black, CastleRights::NONE, None, 0, 1);
        assert_eq!(black_to_move.validate(), Ok(()));
    }
}
