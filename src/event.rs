//! Timeline events — notes, control values, rests, and nested timelines.
//!
//! An event is immutable once built. A rest carries a negative duration:
//! consumers advance their clock by its magnitude and play nothing. A
//! nested [`Timeline`] event is a placeholder expanded by
//! [`Timeline::flatten`](crate::timeline::Timeline::flatten).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pitch::Pitch;
use crate::timeline::Timeline;
use crate::values::{Duration, Intensity};

/// A single timeline event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A sounding note.
    Note {
        pitch: Pitch,
        intensity: Intensity,
        duration: Duration,
        channel: Option<u8>,
    },
    /// A non-note control value (automation data).
    Control {
        value: f64,
        duration: Duration,
        channel: Option<u8>,
    },
    /// Silence. The duration is negative by construction.
    Rest { duration: Duration },
    /// A whole timeline embedded at one position.
    Timeline(Timeline),
}

impl Event {
    pub fn note(pitch: Pitch, intensity: Intensity, duration: Duration) -> Self {
        Self::Note {
            pitch,
            intensity,
            duration,
            channel: None,
        }
    }

    pub fn note_on_channel(
        pitch: Pitch,
        intensity: Intensity,
        duration: Duration,
        channel: u8,
    ) -> Self {
        Self::Note {
            pitch,
            intensity,
            duration,
            channel: Some(channel),
        }
    }

    pub fn control(value: f64, duration: Duration) -> Self {
        Self::Control {
            value,
            duration,
            channel: None,
        }
    }

    /// A rest of the given length. The sign of `duration` is ignored; the
    /// stored duration is always negative.
    pub fn rest(duration: Duration) -> Self {
        Self::Rest {
            duration: duration.to_rest(),
        }
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, Self::Rest { .. })
    }

    /// The event's duration. A nested timeline reports its own length.
    pub fn duration(&self) -> Duration {
        match self {
            Self::Note { duration, .. }
            | Self::Control { duration, .. }
            | Self::Rest { duration } => *duration,
            Self::Timeline(timeline) => timeline.length(),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Note {
                pitch,
                intensity,
                duration,
                channel,
            } => {
                write!(f, "{pitch} {intensity} {duration}")?;
                if let Some(channel) = channel {
                    write!(f, " ch{channel}")?;
                }
                Ok(())
            }
            Self::Control { value, duration, .. } => write!(f, "cc {value} {duration}"),
            Self::Rest { duration } => write!(f, "rest {}", duration.abs()),
            Self::Timeline(timeline) => write!(f, "timeline({} entries)", timeline.len()),
        }
    }
}
