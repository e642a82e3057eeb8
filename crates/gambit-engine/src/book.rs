//! Opening book consulted before searching.

use std::collections::HashMap;
use std::path::Path;

use gambit_core::{Move, PieceKind, Position, generate_all_legal};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, warn};

/// Seed used when the caller does not supply one.
pub const DEFAULT_SEED: u64 = 0xC0FFEE;

/// Errors raised while loading a book file.
///
/// Malformed lines are not errors; they are skipped with a warning.
#[derive(Debug, Error)]
pub enum BookError {
    #[error("failed to read opening book: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of prepared moves.
pub trait OpeningBook {
    /// A book move for `pos`, or `None` when the position is out of book.
    fn pick(&mut self, pos: &Position) -> Option<Move>;
}

/// Book that never has a move.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBook;

impl OpeningBook for NoBook {
    fn pick(&mut self, _pos: &Position) -> Option<Move> {
        None
    }
}

/// Candidate moves for one position with their weights.
#[derive(Debug, Clone, Default)]
struct Candidates {
    moves: Vec<(Move, u32)>,
    total: u32,
}

impl Candidates {
    fn add(&mut self, mv: Move, weight: u32) {
        match self.moves.iter_mut().find(|(m, _)| *m == mv) {
            Some((_, w)) => *w += weight,
            None => self.moves.push((mv, weight)),
        }
        self.total += weight;
    }
}

/// In-memory book keyed by Zobrist hash, picking in proportion to weight.
///
/// Built from text lines, each one game from the starting position:
///
/// ```text
/// # comment
/// 1.e2e4 e7e5 2.g1f3 b8c6
/// 1. d4 Nf6 2. c4 e6
/// ```
///
/// Tokens are coordinate moves or simple SAN; move numbers, check marks
/// and blank lines are ignored. Every prefix position gains weight 1 for
/// the move played from it. A token naming no legal move ends its line.
#[derive(Debug, Clone)]
pub struct WeightedBook {
    entries: HashMap<u64, Candidates>,
    rng: StdRng,
}

impl WeightedBook {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            entries: HashMap::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Build a book from the lines of `text`.
    pub fn from_text(text: &str) -> Self {
        let mut book = Self::new();
        let mut moves = 0;
        for (number, line) in text.lines().enumerate() {
            moves += book.add_line(number + 1, line);
        }
        debug!(positions = book.len(), moves, "opening book built");
        book
    }

    /// Read and build a book file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BookError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loading opening book");
        Ok(Self::from_text(&text))
    }

    /// Ingest one game line; returns how many of its moves were accepted.
    pub fn add_line(&mut self, number: usize, line: &str) -> usize {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            return 0;
        }

        let mut pos = Position::starting_position();
        let mut accepted = 0;
        for token in line.split_whitespace().filter_map(clean_token) {
            let Some(mv) = resolve_token(&pos, &token) else {
                warn!(line = number, token = %token, "book token is not a legal move, rest of line skipped");
                break;
            };
            self.entries.entry(pos.hash()).or_default().add(mv, 1);
            pos = pos.with_move(mv);
            accepted += 1;
        }
        accepted
    }

    /// Number of positions with at least one book move.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Book moves for `pos` with their weights.
    pub fn candidates(&self, pos: &Position) -> &[(Move, u32)] {
        self.entries
            .get(&pos.hash())
            .map(|c| c.moves.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for WeightedBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OpeningBook for WeightedBook {
    fn pick(&mut self, pos: &Position) -> Option<Move> {
        let entry = self.entries.get(&pos.hash())?;
        let (first, _) = *entry.moves.first()?;
        let roll = if entry.total <= 1 {
            1
        } else {
            self.rng.random_range(1..=entry.total)
        };

        let mut acc = 0;
        for &(mv, weight) in &entry.moves {
            acc += weight;
            if acc >= roll {
                return Some(mv);
            }
        }
        Some(first)
    }
}

/// Strip move numbers, check marks and invisible characters from a token.
fn clean_token(raw: &str) -> Option<String> {
    let mut token: String = raw
        .chars()
        .filter(|c| !matches!(c, '\u{200B}' | '\u{00A0}' | '+' | '#' | '!' | '?'))
        .collect();

    let digits = token.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 && token[digits..].starts_with('.') {
        token = token[digits..].trim_start_matches('.').to_string();
    }

    (!token.is_empty()).then_some(token)
}

/// Resolve a coordinate or simple SAN token against the legal moves of `pos`.
fn resolve_token(pos: &Position, token: &str) -> Option<Move> {
    if let Ok(mv) = pos.parse_move(&token.to_ascii_lowercase()) {
        return Some(mv);
    }

    let wanted = normalize_san(token);
    let mut scratch = pos.clone();
    let legal = generate_all_legal(&mut scratch);
    legal
        .iter()
        .copied()
        .find(|&mv| simple_san(legal.as_slice(), mv) == wanted)
}

fn normalize_san(token: &str) -> String {
    let token = token.replace("0-0-0", "O-O-O").replace("0-0", "O-O").replace("e.p.", "");
    // "exd5" is sometimes written "ed5".
    let bytes = token.as_bytes();
    if bytes.len() == 3
        && (b'a'..=b'h').contains(&bytes[0])
        && (b'a'..=b'h').contains(&bytes[1])
        && (b'1'..=b'8').contains(&bytes[2])
    {
        return format!("{}x{}", &token[..1], &token[1..]);
    }
    token
}

/// SAN for `mv` without check marks, disambiguated against `legal`.
fn simple_san(legal: &[Move], mv: Move) -> String {
    if mv.is_castle() {
        return if mv.to().file() > mv.from().file() {
            "O-O".to_string()
        } else {
            "O-O-O".to_string()
        };
    }

    let mut san = String::new();
    let from = mv.from().to_string();
    let kind = mv.mover();
    if kind == PieceKind::Pawn {
        if mv.is_capture() {
            san.push_str(&from[..1]);
        }
    } else {
        san.push(kind.letter().to_ascii_uppercase());
        let rivals: Vec<Move> = legal
            .iter()
            .copied()
            .filter(|&m| m.mover() == kind && m.to() == mv.to() && m.from() != mv.from())
            .collect();
        if !rivals.is_empty() {
            let same_file = rivals.iter().any(|m| m.from().file() == mv.from().file());
            let same_rank = rivals.iter().any(|m| m.from().rank() == mv.from().rank());
            if !same_file {
                san.push_str(&from[..1]);
            } else if !same_rank {
                san.push_str(&from[1..]);
            } else {
                san.push_str(&from);
            }
        }
    }

    if mv.is_capture() {
        san.push('x');
    }
    san.push_str(&mv.to().to_string());
    if let Some(promo) = mv.promotion_kind() {
        san.push('=');
        san.push(promo.letter().to_ascii_uppercase());
    }
    san
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(moves: &[&str]) -> Position {
        let mut pos = Position::starting_position();
        for text in moves {
            let mv = pos.parse_move(text).unwrap();
            pos = pos.with_move(mv);
        }
        pos
    }

    #[test]
    fn every_prefix_is_indexed() {
        let book = WeightedBook::from_text("1.e2e4 e7e5 2.g1f3\n");
        assert_eq!(book.len(), 3);
        let after_e4 = play(&["e2e4"]);
        assert_eq!(book.candidates(&after_e4).len(), 1);
        assert_eq!(book.candidates(&after_e4)[0].0.to_uci(), "e7e5");
    }

    #[test]
    fn weights_accumulate_across_lines() {
        let book = WeightedBook::from_text("e2e4 e7e5\ne2e4 c7c5\nd2d4\n");
        let start = Position::starting_position();
        let candidates = book.candidates(&start);
        let e4 = candidates.iter().find(|(m, _)| m.to_uci() == "e2e4").unwrap();
        let d4 = candidates.iter().find(|(m, _)| m.to_uci() == "d2d4").unwrap();
        assert_eq!(e4.1, 2);
        assert_eq!(d4.1, 1);
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let book = WeightedBook::from_text("# main lines\n\n; more\n   \n");
        assert!(book.is_empty());
    }

    #[test]
    fn bad_token_stops_only_its_line() {
        let book = WeightedBook::from_text("e2e4 e2e5 d7d5\nd2d4 d7d5\n");
        // e2e4 from the start, then nothing after the bad token.
        assert!(book.candidates(&play(&["e2e4"])).is_empty());
        assert_eq!(book.candidates(&play(&["d2d4"])).len(), 1);
    }

    #[test]
    fn san_and_move_numbers_resolve() {
        let book = WeightedBook::from_text("1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 4. O-O\n1...x\n");
        let pos = play(&["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "a7a6"]);
        let candidates = book.candidates(&pos);
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].0.is_castle());
    }

    #[test]
    fn san_disambiguates_and_captures() {
        // Both rooks can reach d1.
        let pos: Position = "4k3/8/8/3p4/4P3/8/8/R4RK1 w - - 0 1".parse().unwrap();
        assert_eq!(resolve_token(&pos, "Rad1").unwrap().to_uci(), "a1d1");
        assert_eq!(resolve_token(&pos, "Rfd1").unwrap().to_uci(), "f1d1");
        assert_eq!(resolve_token(&pos, "exd5").unwrap().to_uci(), "e4d5");
        assert_eq!(resolve_token(&pos, "ed5").unwrap().to_uci(), "e4d5");
        assert!(resolve_token(&pos, "Rd1").is_none());
    }

    #[test]
    fn san_promotion() {
        let pos: Position = "4k3/P7/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        assert_eq!(resolve_token(&pos, "a8=Q+").map(|m| m.to_uci()), None);
        let token = clean_token("a8=Q+").unwrap();
        assert_eq!(resolve_token(&pos, &token).unwrap().to_uci(), "a7a8q");
    }

    #[test]
    fn clean_token_strips_numbers_and_marks() {
        assert_eq!(clean_token("1.e4").as_deref(), Some("e4"));
        assert_eq!(clean_token("12...Nf6").as_deref(), Some("Nf6"));
        assert_eq!(clean_token("Qh5#").as_deref(), Some("Qh5"));
        assert_eq!(clean_token("3."), None);
    }

    #[test]
    fn pick_follows_the_weights() {
        let mut book = WeightedBook::from_text("e2e4\n");
        let start = Position::starting_position();
        for _ in 0..5 {
            assert_eq!(book.pick(&start).unwrap().to_uci(), "e2e4");
        }
        assert_eq!(book.pick(&play(&["d2d4"])), None);
    }

    #[test]
    fn same_seed_same_choices() {
        let text = "e2e4\nd2d4\nc2c4\ng1f3\n";
        let start = Position::starting_position();
        let mut a = WeightedBook::from_text(text);
        let mut b = WeightedBook::from_text(text);
        let picks_a: Vec<_> = (0..20).map(|_| a.pick(&start)).collect();
        let picks_b: Vec<_> = (0..20).map(|_| b.pick(&start)).collect();
        assert_eq!(picks_a, picks_b);
        assert!(picks_a.iter().all(Option::is_some));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = WeightedBook::load("/definitely/not/here.book").unwrap_err();
        assert!(matches!(err, BookError::Io(_)));
    }
}
