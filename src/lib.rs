//! Mtk — an algorithmic music composition core.
//!
//! The crate turns lazy pattern generators into concrete timelines:
//! [`pattern`] supplies bounded generators over musical values, [`chain`]
//! resolves parallel pitch/intensity/duration streams into note events,
//! [`sequencer`] places each emitted batch on a time axis, and
//! [`timeline`] accumulates the result as an ordered map from rational
//! time to event lists. Everything is synchronous and pull-based; no I/O
//! happens here.

pub mod chain;
pub mod error;
pub mod event;
pub mod pattern;
pub mod pitch;
pub mod sequencer;
pub mod time;
pub mod timeline;
pub mod values;

pub use chain::{Chain, ChainConfig, PitchLike};
pub use error::PatternError;
pub use event::Event;
pub use pattern::{
    Bounds, Callback, Choice, Cycle, Element, FnStep, ForEach, FunctionPattern, Lines, Palindrome,
    PatternNode, Scope, Sequence, Value, Variable,
};
pub use pitch::{Interval, Pitch, PitchClass, PitchClassSet};
pub use sequencer::{Sequencer, Timing};
pub use time::Time;
pub use timeline::Timeline;
pub use values::{Duration, Intensity};
