//! FEN import (`FromStr`) and export (`Display`) for [`Position`].

use std::fmt;
use std::str::FromStr;

use crate::bitboard::Bitboard;
use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::error::FenError;
use crate::piece::{Piece, PieceKind};
use crate::position::Position;
use crate::square::Square;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn parse_placement(field: &str) -> Result<[Bitboard; Piece::COUNT], FenError> {
    let rows: Vec<&str> = field.split('/').collect();
    if rows.len() != 8 {
        return Err(FenError::RankCount(rows.len()));
    }

    let mut boards = [Bitboard::EMPTY; Piece::COUNT];
    for (row, text) in rows.iter().enumerate() {
        let rank = 7 - row as u8;
        let mut file = 0usize;
        for c in text.chars() {
            if let Some(skip) = c.to_digit(10) {
                if !(1..=8).contains(&skip) {
                    return Err(FenError::InvalidPiece(c));
                }
                file += skip as usize;
                continue;
            }
            let piece = Piece::from_fen_char(c).ok_or(FenError::InvalidPiece(c))?;
            let sq = Square::from_coords(file as u8, rank)
                .ok_or(FenError::RankLength { rank: row, length: file + 1 })?;
            boards[piece.index()] |= sq.bitboard();
            file += 1;
        }
        if file != 8 {
            return Err(FenError::RankLength { rank: row, length: file });
        }
    }
    Ok(boards)
}

fn parse_counter(field: Option<&str>, name: &'static str, default: u16) -> Result<u16, FenError> {
    match field {
        None => Ok(default),
        Some(text) => text.parse().map_err(|_| FenError::InvalidCounter {
            field: name,
            found: text.to_string(),
        }),
    }
}

/// Accepts full six-field FEN, or the four-field EPD form with the move
/// counters defaulting to `0 1`.
impl FromStr for Position {
    type Err = FenError;

    fn from_str(fen: &str) -> Result<Position, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 4 && fields.len() != 6 {
            return Err(FenError::FieldCount(fields.len()));
        }

        let boards = parse_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidColor(other.to_string())),
        };

        let castling = CastleRights::from_fen(fields[2])?;

        let en_passant = match fields[3] {
            "-" => None,
            text => {
                let sq = Square::from_algebraic(text)
                    .filter(|sq| sq.rank() == 2 || sq.rank() == 5)
                    .ok_or_else(|| FenError::InvalidEnPassant(text.to_string()))?;
                Some(sq)
            }
        };

        let halfmove_clock = parse_counter(fields.get(4).copied(), "halfmove clock", 0)?;
        let fullmove_number = parse_counter(fields.get(5).copied(), "fullmove number", 1)?;

        let pos = Position::from_parts(
            boards,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        );
        pos.validate()?;
        if let Some(sq) = en_passant
            && !en_passant_is_possible(&pos, sq)
        {
            return Err(FenError::InvalidEnPassant(fields[3].to_string()));
        }
        Ok(pos)
    }
}

/// `sq` must be the square an enemy pawn just skipped over: on the far
/// side's third rank, empty along with the pawn's origin, and with the
/// pawn standing right in front of it.
fn en_passant_is_possible(pos: &Position, sq: Square) -> bool {
    let us = pos.side_to_move();
    let expected_rank = match us {
        Color::White => 5,
        Color::Black => 2,
    };
    if sq.rank() != expected_rank {
        return false;
    }
    let origin = sq.offset(us.forward());
    let pushed = sq.offset(-us.forward());
    pos.piece_on(sq).is_none()
        && pos.piece_on(origin).is_none()
        && pos.piece_on(pushed) == Some(Piece::new(!us, PieceKind::Pawn))
}

impl Position {
    pub fn to_fen(&self) -> String {
        self.to_string()
    }
}

/// Standard six-field FEN.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                let piece = Square::from_coords(file, rank).and_then(|sq| self.piece_on(sq));
                match piece {
                    Some(piece) => {
                        if empty > 0 {
                            write!(f, "{empty}")?;
                            empty = 0;
                        }
                        write!(f, "{piece}")?;
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{empty}")?;
            }
            if rank > 0 {
                f.write_str("/")?;
            }
        }

        write!(f, " {} {} ", self.side_to_move(), self.castling_rights())?;
        match self.ep_square() {
            Some(sq) => write!(f, "{sq}")?,
            None => f.write_str("-")?,
        }
        write!(f, " {} {}", self.halfmove_clock(), self.fullmove_number())
    }
}
