//! Canonical musical time — rational beat positions used as timeline keys.
//!
//! Times are stored as reduced `i64` fractions so that `2`, `4/2`, and
//! `2.0` all canonicalize to the same key. Floats are snapped to a
//! microbeat grid before reduction; exact halves and other common
//! subdivisions survive the round trip exactly.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Grid used when canonicalizing floating-point times.
const FLOAT_DENOMINATOR: i64 = 1_000_000;

/// A rational beat position. Always stored reduced with a positive
/// denominator, so structural equality is value equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Time {
    numerator: i64,
    denominator: i64,
}

impl Time {
    pub const ZERO: Time = Time {
        numerator: 0,
        denominator: 1,
    };

    /// Create a time from a fraction of beats. Panics if `denominator` is 0.
    pub fn new(numerator: i64, denominator: i64) -> Self {
        assert!(denominator != 0, "time denominator must be non-zero");
        let g = gcd(numerator.abs(), denominator.abs()).max(1);
        Self {
            numerator: numerator / g * denominator.signum(),
            denominator: denominator.abs() / g,
        }
    }

    pub fn from_beats(beats: i64) -> Self {
        Self {
            numerator: beats,
            denominator: 1,
        }
    }

    /// Canonicalize a floating-point beat position onto the microbeat grid.
    pub fn from_float(beats: f64) -> Self {
        Self::new(
            (beats * FLOAT_DENOMINATOR as f64).round() as i64,
            FLOAT_DENOMINATOR,
        )
    }

    pub fn numerator(self) -> i64 {
        self.numerator
    }

    pub fn denominator(self) -> i64 {
        self.denominator
    }

    pub fn to_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    pub fn is_negative(self) -> bool {
        self.numerator < 0
    }

    /// Round to the nearest multiple of `interval`, exact halves rounding up.
    pub fn round_to_multiple_of(self, interval: Time) -> Time {
        // self / interval = n/d; nearest integer with .5 rounding up is
        // floor((2n + d) / 2d) for positive d.
        let ratio = self / interval;
        let steps = (2 * ratio.numerator + ratio.denominator).div_euclid(2 * ratio.denominator);
        interval * Time::from_beats(steps)
    }
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

impl Add for Time {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.numerator * rhs.denominator + rhs.numerator * self.denominator,
            self.denominator * rhs.denominator,
        )
    }
}

impl Sub for Time {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.numerator * rhs.denominator - rhs.numerator * self.denominator,
            self.denominator * rhs.denominator,
        )
    }
}

impl Mul for Time {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.numerator * rhs.numerator,
            self.denominator * rhs.denominator,
        )
    }
}

impl Div for Time {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Self::new(
            self.numerator * rhs.denominator,
            self.denominator * rhs.numerator,
        )
    }
}

impl Neg for Time {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            numerator: -self.numerator,
            denominator: self.denominator,
        }
    }
}

impl Ord for Time {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.numerator * other.denominator).cmp(&(other.numerator * self.denominator))
    }
}

impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<i64> for Time {
    fn from(beats: i64) -> Self {
        Self::from_beats(beats)
    }
}

impl From<f64> for Time {
    fn from(beats: f64) -> Self {
        Self::from_float(beats)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator == 1 {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}", self.to_f64())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduction_canonicalizes() {
        assert_eq!(Time::new(4, 2), Time::from_beats(2));
        assert_eq!(Time::new(-4, 2), Time::from_beats(-2));
        assert_eq!(Time::new(4, -2), Time::from_beats(-2));
        assert_eq!(Time::new(3, 6), Time::new(1, 2));
    }

    #[test]
    fn float_and_integer_share_a_key() {
        assert_eq!(Time::from_float(2.0), Time::from_beats(2));
        assert_eq!(Time::from_float(0.5), Time::new(1, 2));
        assert_eq!(Time::from_float(1.25), Time::new(5, 4));
    }

    #[test]
    fn arithmetic() {
        let half = Time::new(1, 2);
        let third = Time::new(1, 3);
        assert_eq!(half + third, Time::new(5, 6));
        assert_eq!(half - third, Time::new(1, 6));
        assert_eq!(half * third, Time::new(1, 6));
        assert_eq!(half / third, Time::new(3, 2));
        assert_eq!(-half, Time::new(-1, 2));
    }

    #[test]
    fn ordering_across_denominators() {
        assert!(Time::new(1, 3) < Time::new(1, 2));
        assert!(Time::from_beats(-1) < Time::ZERO);
        assert!(Time::new(7, 4) > Time::new(3, 2));
    }

    #[test]
    fn round_to_multiple_ties_up() {
        let half = Time::new(1, 2);
        assert_eq!(Time::from_float(0.7).round_to_multiple_of(half), half);
        assert_eq!(
            Time::from_float(1.1).round_to_multiple_of(half),
            Time::from_beats(1)
        );
        assert_eq!(
            Time::from_float(1.24).round_to_multiple_of(half),
            Time::from_beats(1)
        );
        // Exact half-interval rounds up, not to even.
        assert_eq!(
            Time::from_float(1.25).round_to_multiple_of(half),
            Time::new(3, 2)
        );
        assert_eq!(Time::from_float(0.25).round_to_multiple_of(half), half);
    }

    #[test]
    fn round_to_multiple_of_negative_position() {
        let one = Time::from_beats(1);
        assert_eq!(Time::from_float(-0.4).round_to_multiple_of(one), Time::ZERO);
        assert_eq!(
            Time::from_float(-0.6).round_to_multiple_of(one),
            Time::from_beats(-1)
        );
        // -0.5 ties upward to 0.
        assert_eq!(Time::from_float(-0.5).round_to_multiple_of(one), Time::ZERO);
    }

    #[test]
    fn display() {
        assert_eq!(Time::from_beats(3).to_string(), "3");
        assert_eq!(Time::new(1, 2).to_string(), "0.5");
    }

    #[test]
    #[should_panic]
    fn zero_denominator_panics() {
        let _ = Time::new(1, 0);
    }
}
