//! Absolute pitches — a pitch class in a specific octave, with an optional
//! fractional-semitone offset for microtonal inflection.
//!
//! Octave numbering follows the MIDI convention used across the crate:
//! C4 = middle C = MIDI 60, C-1 = MIDI 0.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use super::interval::Interval;
use super::pitch_class::PitchClass;

/// An absolute pitch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pitch {
    pitch_class: PitchClass,
    octave: i8,
    /// Fractional semitone offset, -1.0..1.0. Zero for twelve-tone material.
    offset: f64,
}

impl Pitch {
    pub fn new(pitch_class: PitchClass, octave: i8) -> Self {
        Self {
            pitch_class,
            octave,
            offset: 0.0,
        }
    }

    pub fn with_offset(pitch_class: PitchClass, octave: i8, offset: f64) -> Self {
        Self {
            pitch_class,
            octave,
            offset,
        }
    }

    /// Build a pitch from a MIDI note number.
    pub fn from_midi(midi: i32) -> Self {
        Self {
            pitch_class: PitchClass::from_value(midi),
            octave: (midi.div_euclid(12) - 1) as i8,
            offset: 0.0,
        }
    }

    pub fn pitch_class(self) -> PitchClass {
        self.pitch_class
    }

    pub fn octave(self) -> i8 {
        self.octave
    }

    pub fn offset(self) -> f64 {
        self.offset
    }

    /// The MIDI note number, ignoring the microtonal offset.
    pub fn midi(self) -> i32 {
        (self.octave as i32 + 1) * 12 + self.pitch_class.value() as i32
    }

    /// The pitch as a fractional MIDI value, offset included.
    pub fn midi_f64(self) -> f64 {
        self.midi() as f64 + self.offset
    }

    /// The absolute pitch of `pitch_class` nearest to this pitch.
    ///
    /// Uses the tritone-safe distance rule of
    /// [`PitchClass::distance_to`], so repeated nearest-pitch resolution
    /// never walks off in one direction.
    pub fn nearest(self, pitch_class: PitchClass) -> Pitch {
        let mut p = Self::from_midi(self.midi() + self.pitch_class.distance_to(pitch_class));
        p.offset = self.offset;
        p
    }

    /// Transpose by a whole number of octaves.
    pub fn transpose_octaves(self, octaves: i8) -> Self {
        Self {
            octave: self.octave + octaves,
            ..self
        }
    }
}

impl Add<Interval> for Pitch {
    type Output = Pitch;

    fn add(self, rhs: Interval) -> Pitch {
        let mut p = Pitch::from_midi(self.midi() + rhs.semitones());
        p.offset = self.offset;
        p
    }
}

impl Sub<Interval> for Pitch {
    type Output = Pitch;

    fn sub(self, rhs: Interval) -> Pitch {
        self + (-rhs)
    }
}

impl Sub for Pitch {
    type Output = Interval;

    fn sub(self, rhs: Pitch) -> Interval {
        Interval::new(self.midi() - rhs.midi())
    }
}

impl PartialEq for Pitch {
    fn eq(&self, other: &Self) -> bool {
        self.midi() == other.midi() && self.offset == other.offset
    }
}

impl PartialOrd for Pitch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.midi_f64().partial_cmp(&other.midi_f64())
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch_class, self.octave)
    }
}
