//! Duration and intensity value types.
//!
//! A [`Duration`] is measured in beats; a negative duration encodes a rest
//! of that length (the clock advances, nothing sounds). An [`Intensity`] is
//! a normalized dynamic in 0.0..=1.0, the same velocity convention the
//! event layer uses.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A length in beats. Negative values are rests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Duration(f64);

impl Duration {
    pub const WHOLE: Duration = Duration(4.0);
    pub const HALF: Duration = Duration(2.0);
    pub const QUARTER: Duration = Duration(1.0);
    pub const EIGHTH: Duration = Duration(0.5);
    pub const SIXTEENTH: Duration = Duration(0.25);
    pub const THIRTY_SECOND: Duration = Duration(0.125);

    pub fn from_beats(beats: f64) -> Self {
        Self(beats)
    }

    pub fn beats(self) -> f64 {
        self.0
    }

    /// Whether this duration encodes a rest.
    pub fn is_rest(self) -> bool {
        self.0 < 0.0
    }

    /// The sounding length, sign removed.
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// The same length as a rest.
    pub fn to_rest(self) -> Self {
        Self(-self.0.abs())
    }

    pub fn scale(self, factor: f64) -> Self {
        Self(self.0 * factor)
    }
}

impl From<f64> for Duration {
    fn from(beats: f64) -> Self {
        Self(beats)
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Duration {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Duration {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Mul<f64> for Duration {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}

impl PartialOrd for Duration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A normalized dynamic level in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intensity(f64);

impl Intensity {
    pub const PPP: Intensity = Intensity(0.125);
    pub const PP: Intensity = Intensity(0.25);
    pub const P: Intensity = Intensity(0.375);
    pub const MP: Intensity = Intensity(0.5);
    pub const MF: Intensity = Intensity(0.625);
    pub const FORTE: Intensity = Intensity(0.75);
    pub const FF: Intensity = Intensity(0.875);
    pub const FFF: Intensity = Intensity(1.0);

    /// Create an intensity, clamping into 0.0..=1.0.
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// MIDI velocity 0..=127.
    pub fn to_midi_velocity(self) -> u8 {
        (self.0 * 127.0).round() as u8
    }

    /// Scale by a factor, staying clamped.
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.0 * factor)
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self::MF
    }
}

impl PartialOrd for Intensity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}
