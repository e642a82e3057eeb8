//! Core chess types: board representation, move generation, and game rules.

pub mod attacks;
mod bitboard;
mod castle_rights;
mod chess_move;
mod color;
mod error;
mod fen;
pub mod movegen;
mod perft;
mod piece;
mod position;
mod square;
pub mod zobrist;

pub use bitboard::Bitboard;
pub use castle_rights::{CastleRights, CastleSide};
pub use chess_move::{Move, parse_coordinates};
pub use color::Color;
pub use error::{FenError, MoveParseError, PositionError};
pub use fen::STARTING_FEN;
pub use movegen::{MoveList, generate_all_legal, generate_pseudo_legal, legal_moves_from_square};
pub use perft::{PerftStats, divide, perft, perft_stats};
pub use piece::{Piece, PieceKind};
pub use position::{Position, Undo};
pub use square::Square;
