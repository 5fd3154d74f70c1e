//! Intervals — signed distances between pitches, in semitones.

use std::fmt;
use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A signed interval in semitones.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Interval(i32);

impl Interval {
    pub const UNISON: Interval = Interval(0);
    pub const TRITONE: Interval = Interval(6);
    pub const OCTAVE: Interval = Interval(12);

    pub fn new(semitones: i32) -> Self {
        Self(semitones)
    }

    pub fn semitones(self) -> i32 {
        self.0
    }

    /// Magnitude of the interval.
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }
}

impl Add for Interval {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Interval {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Interval {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.0)
    }
}
