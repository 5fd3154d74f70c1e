//! Pitch classes — the twelve equivalence classes of pitches under octave
//! transposition, numbered 0 (C) through 11 (B).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical flat-preferring names for the twelve pitch classes.
const NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// One of the twelve pitch classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PitchClass(u8);

impl PitchClass {
    pub const C: PitchClass = PitchClass(0);
    pub const DB: PitchClass = PitchClass(1);
    pub const D: PitchClass = PitchClass(2);
    pub const EB: PitchClass = PitchClass(3);
    pub const E: PitchClass = PitchClass(4);
    pub const F: PitchClass = PitchClass(5);
    pub const GB: PitchClass = PitchClass(6);
    pub const G: PitchClass = PitchClass(7);
    pub const AB: PitchClass = PitchClass(8);
    pub const A: PitchClass = PitchClass(9);
    pub const BB: PitchClass = PitchClass(10);
    pub const B: PitchClass = PitchClass(11);

    /// Create a pitch class from any integer, wrapped into 0..=11.
    pub fn from_value(value: i32) -> Self {
        Self(value.rem_euclid(12) as u8)
    }

    /// The numeric value, 0..=11.
    pub fn value(self) -> u8 {
        self.0
    }

    /// The canonical (flat-preferring) name, e.g. "Eb".
    pub fn name(self) -> &'static str {
        NAMES[self.0 as usize]
    }

    /// Parse a name like "C", "F#", or "Bb". Sharps and flats both accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        let base = match chars.next()? {
            'C' => 0i32,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return None,
        };
        let accidental = match chars.next() {
            None => 0,
            Some('#') => 1,
            Some('b') => -1,
            Some(_) => return None,
        };
        if chars.next().is_some() {
            return None;
        }
        Some(Self::from_value(base + accidental))
    }

    /// Transpose by a number of semitones, wrapping within the octave.
    pub fn transpose(self, semitones: i32) -> Self {
        Self::from_value(self.0 as i32 + semitones)
    }

    /// Signed shortest distance in semitones from `self` to `other`,
    /// in the range -6..=6.
    ///
    /// A tritone (distance 6) is ambiguous: going up or down lands on the
    /// same class. The tie is broken by the value of `self` — classes below
    /// Gb resolve upward, Gb and above resolve downward. This keeps a
    /// tritone alternation anchored instead of drifting an octave per pair.
    pub fn distance_to(self, other: PitchClass) -> i32 {
        let delta = (other.0 as i32 - self.0 as i32).rem_euclid(12);
        if delta > 6 {
            delta - 12
        } else if delta == 6 && self.0 >= 6 {
            -6
        } else {
            delta
        }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
