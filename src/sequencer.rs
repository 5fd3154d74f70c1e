//! Sequencers — drive a [`Chain`] step by step and place each emitted batch
//! on a time axis, producing a [`Timeline`].
//!
//! The variants differ only in how the clock advances between steps, so
//! they share one struct parameterized by a [`Timing`] policy. Rest steps
//! always advance the clock and never insert events.

use std::fmt;

use crate::chain::Chain;
use crate::error::PatternError;
use crate::event::Event;
use crate::pattern::{PatternNode, Scope, Value};
use crate::time::Time;
use crate::timeline::Timeline;

/// How the clock advances after each step.
pub enum Timing {
    /// A fixed unit per step.
    Fixed { unit: Time },
    /// A fixed grid: the clock moves by `step_size` whether or not the
    /// step emitted notes.
    Grid { step_size: Time },
    /// Dovetailing: the clock moves by the longest absolute duration of
    /// the step just emitted, so each step starts when the previous one
    /// ends.
    Legato,
    /// Deltas pulled from an independent duration pattern. A rest from the
    /// rhythm silences that slot; rhythm exhaustion ends the run.
    Rhythm { pattern: PatternNode },
}

impl fmt::Debug for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed { unit } => f.debug_struct("Fixed").field("unit", unit).finish(),
            Self::Grid { step_size } => f
                .debug_struct("Grid")
                .field("step_size", step_size)
                .finish(),
            Self::Legato => write!(f, "Legato"),
            Self::Rhythm { .. } => write!(f, "Rhythm(..)"),
        }
    }
}

type EventFilter = Box<dyn FnMut(Vec<Event>) -> Vec<Event>>;

/// Runs a chain to exhaustion (or a cap) and accumulates a timeline.
pub struct Sequencer {
    chain: Chain,
    timing: Timing,
    max_steps: Option<usize>,
    max_time: Option<Time>,
    filter: Option<EventFilter>,
    seed: Option<u64>,
    scope: Scope,
}

impl fmt::Debug for Sequencer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequencer")
            .field("timing", &self.timing)
            .field("max_steps", &self.max_steps)
            .field("max_time", &self.max_time)
            .field("filtered", &self.filter.is_some())
            .finish_non_exhaustive()
    }
}

impl Sequencer {
    /// Base sequencer: the clock advances by a fixed unit per step.
    pub fn new(chain: Chain, unit: impl Into<Time>) -> Self {
        Self::with_timing(chain, Timing::Fixed { unit: unit.into() })
    }

    /// Step sequencer: a fixed grid, rests keep their slot.
    pub fn step(chain: Chain, step_size: impl Into<Time>) -> Self {
        Self::with_timing(
            chain,
            Timing::Grid {
                step_size: step_size.into(),
            },
        )
    }

    /// Legato sequencer: each step starts when the previous one ends.
    pub fn legato(chain: Chain) -> Self {
        Self::with_timing(chain, Timing::Legato)
    }

    /// Rhythmic sequencer: step deltas come from `rhythm`.
    pub fn rhythmic(chain: Chain, rhythm: impl Into<PatternNode>) -> Self {
        Self::with_timing(
            chain,
            Timing::Rhythm {
                pattern: rhythm.into(),
            },
        )
    }

    pub fn with_timing(chain: Chain, timing: Timing) -> Self {
        Self {
            chain,
            timing,
            max_steps: None,
            max_time: None,
            filter: None,
            seed: None,
            scope: Scope::new(),
        }
    }

    /// Cap the number of chain steps taken.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Stop once the clock passes this time. A batch landing exactly at
    /// the cap is still emitted.
    pub fn with_max_time(mut self, max_time: impl Into<Time>) -> Self {
        self.max_time = Some(max_time.into());
        self
    }

    /// Transform each batch before insertion.
    pub fn with_filter(mut self, filter: impl FnMut(Vec<Event>) -> Vec<Event> + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Seed the random source. Every `to_timeline` call restarts from this
    /// seed, so runs over random patterns replay identically.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self.scope = Scope::with_seed(seed);
        self
    }

    /// Run the chain to exhaustion (or a cap) and return the timeline.
    ///
    /// Rewinds the chain and the rhythm pattern first, so repeated calls
    /// produce the same timeline.
    pub fn to_timeline(&mut self) -> Result<Timeline, PatternError> {
        self.rewind();
        let mut timeline = Timeline::new();
        let mut clock = Time::ZERO;
        let mut steps = 0usize;
        loop {
            if self.max_steps.is_some_and(|cap| steps >= cap) {
                break;
            }
            if self.max_time.is_some_and(|cap| clock > cap) {
                break;
            }
            let Some(batch) = self.chain.next_step(&mut self.scope)? else {
                break;
            };
            let batch = match self.filter.as_mut() {
                Some(filter) => filter(batch),
                None => batch,
            };
            let delta = match &mut self.timing {
                Timing::Fixed { unit } => *unit,
                Timing::Grid { step_size } => *step_size,
                Timing::Legato => Time::from_float(longest_duration(&batch)),
                Timing::Rhythm { pattern } => match pattern.next(&mut self.scope)? {
                    None => break,
                    Some(value) => {
                        let beats = rhythm_beats(&value)?;
                        if beats < 0.0 {
                            // A rhythm rest silences this slot entirely.
                            clock = clock + Time::from_float(-beats);
                            steps += 1;
                            continue;
                        }
                        Time::from_float(beats)
                    }
                },
            };
            let sounding: Vec<Event> = batch.into_iter().filter(|e| !e.is_rest()).collect();
            if !sounding.is_empty() {
                timeline.add_all(clock, sounding);
            }
            steps += 1;
            clock = clock + delta;
        }
        Ok(timeline)
    }

    fn rewind(&mut self) {
        self.chain.rewind();
        if let Timing::Rhythm { pattern } = &mut self.timing {
            pattern.rewind();
        }
        self.scope.clear_frames();
        if let Some(seed) = self.seed {
            self.scope = Scope::with_seed(seed);
        }
    }
}

/// Longest absolute duration in a batch, in beats. Zero for an empty batch.
fn longest_duration(batch: &[Event]) -> f64 {
    batch
        .iter()
        .map(|e| e.duration().abs().beats())
        .fold(0.0, f64::max)
}

fn rhythm_beats(value: &Value) -> Result<f64, PatternError> {
    match value {
        Value::Duration(d) => Ok(d.beats()),
        Value::Number(n) => Ok(*n),
        Value::Rest => Ok(-1.0),
        other => Err(PatternError::invalid(format!(
            "not a rhythm duration: {other:?}"
        ))),
    }
}
