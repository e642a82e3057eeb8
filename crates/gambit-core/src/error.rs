//! Error types for FEN parsing, position validation and move strings.

use crate::color::Color;
use crate::square::Square;

/// Errors produced while parsing a FEN string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    #[error("expected 4 or 6 FEN fields, found {0}")]
    FieldCount(usize),

    #[error("expected 8 ranks in piece placement, found {0}")]
    RankCount(usize),

    /// `rank` counts from the top of the FEN string (0 = rank 8).
    #[error("rank {rank} describes {length} squares, expected 8")]
    RankLength { rank: usize, length: usize },

    #[error("invalid piece character '{0}'")]
    InvalidPiece(char),

    #[error("invalid side to move \"{0}\"")]
    InvalidColor(String),

    #[error("invalid castling character '{0}'")]
    InvalidCastling(char),

    #[error("invalid en passant square \"{0}\"")]
    InvalidEnPassant(String),

    #[error("invalid {field}: \"{found}\"")]
    InvalidCounter { field: &'static str, found: String },

    #[error("invalid position: {0}")]
    Position(#[from] PositionError),
}

/// Structural problems found by [`Position::validate`](crate::Position::validate).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("{color:?} has {count} kings, expected 1")]
    KingCount { color: Color, count: u32 },

    #[error("pawn on back rank at {0}")]
    PawnOnBackRank(Square),

    #[error("square {0} is claimed by more than one piece board")]
    Overlap(Square),

    /// The side not to move is in check, so its king could be captured.
    #[error("{0:?} is in check but not to move")]
    OpponentInCheck(Color),
}

/// Errors produced while resolving a coordinate move string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveParseError {
    #[error("malformed move string \"{0}\"")]
    Malformed(String),

    #[error("move \"{0}\" is not legal in this position")]
    Illegal(String),
}
