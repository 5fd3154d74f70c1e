//! Pitch value types — pitch classes, absolute pitches, intervals, and
//! pitch-class sets.
//!
//! All types here are small `Copy` values with arithmetic operators, so
//! pattern code can combine them freely without ownership ceremony.
//! C4 = middle C = MIDI 60 throughout.

pub mod interval;
pub mod pitch;
pub mod pitch_class;
pub mod set;

pub use interval::Interval;
pub use pitch::Pitch;
pub use pitch_class::PitchClass;
pub use set::PitchClassSet;
