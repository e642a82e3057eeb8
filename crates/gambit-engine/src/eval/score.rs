//! Middlegame/endgame score pair used by the tapered evaluation.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::eval::phase::MAX_PHASE;

/// A pair of centipawn values, one for the middlegame and one for the endgame.
///
/// Terms are accumulated as pairs and blended once at the end with
/// [`Score::taper`], so every term can weigh differently as material
/// comes off the board.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Score {
    pub mg: i32,
    pub eg: i32,
}

impl Score {
    pub const ZERO: Score = Score { mg: 0, eg: 0 };

    #[inline]
    pub const fn new(mg: i32, eg: i32) -> Score {
        Score { mg, eg }
    }

    /// Blend the two halves by game phase.
    ///
    /// `phase` runs from 0 (bare kings and pawns) to [`MAX_PHASE`]
    /// (full opening material); values outside that range are clamped.
    #[inline]
    pub fn taper(self, phase: i32) -> i32 {
        let phase = phase.clamp(0, MAX_PHASE);
        (self.mg * phase + self.eg * (MAX_PHASE - phase)) / MAX_PHASE
    }
}

/// Shorthand constructor, `S(mg, eg)`, for table literals.
#[allow(non_snake_case)]
#[inline]
pub const fn S(mg: i32, eg: i32) -> Score {
    Score::new(mg, eg)
}

impl Add for Score {
    type Output = Score;

    #[inline]
    fn add(self, rhs: Score) -> Score {
        Score::new(self.mg + rhs.mg, self.eg + rhs.eg)
    }
}

impl AddAssign for Score {
    #[inline]
    fn add_assign(&mut self, rhs: Score) {
        *self = *self + rhs;
    }
}

impl Sub for Score {
    type Output = Score;

    #[inline]
    fn sub(self, rhs: Score) -> Score {
        Score::new(self.mg - rhs.mg, self.eg - rhs.eg)
    }
}

impl SubAssign for Score {
    #[inline]
    fn sub_assign(&mut self, rhs: Score) {
        *self = *self - rhs;
    }
}

impl Neg for Score {
    type Output = Score;

    #[inline]
    fn neg(self) -> Score {
        Score::new(-self.mg, -self.eg)
    }
}

impl Mul<i32> for Score {
    type Output = Score;

    #[inline]
    fn mul(self, rhs: i32) -> Score {
        Score::new(self.mg * rhs, self.eg * rhs)
    }
}

impl fmt::Debug for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S({}, {})", self.mg, self.eg)
    }
}

#[cfg(test)]
mod tests {
    use super::{S, Score};
    use crate::eval::phase::MAX_PHASE;

    #[test]
    fn arithmetic_is_componentwise() {
        assert_eq!(S(10, 20) + S(30, -40), S(40, -20));
        assert_eq!(S(50, 60) - S(10, 20), S(40, 40));
        assert_eq!(-S(10, -20), S(-10, 20));
        assert_eq!(S(10, 20) * -2, S(-20, -40));

        let mut s = S(1, 2);
        s += S(3, 4);
        s -= S(1, 1);
        assert_eq!(s, S(3, 5));
    }

    #[test]
    fn taper_endpoints() {
        let s = S(100, 300);
        assert_eq!(s.taper(MAX_PHASE), 100);
        assert_eq!(s.taper(0), 300);
        assert_eq!(s.taper(MAX_PHASE / 2), 200);
    }

    #[test]
    fn taper_clamps_phase() {
        let s = S(100, 300);
        assert_eq!(s.taper(MAX_PHASE + 10), 100);
        assert_eq!(s.taper(-3), 300);
        assert_eq!(Score::ZERO.taper(12), 0);
    }
}
