//! Event assembly — lock-step resolution of pitch, intensity, and duration
//! streams into concrete note events.
//!
//! A [`Chain`] owns three role slots, each fed by a pattern or a bare value.
//! Every step pulls one value per role and resolves them into a batch of
//! [`Event`]s. Pitch material may be relative (intervals applied to the
//! previous pitch), pitch classes (snapped to the nearest octave), or
//! absolute; the chain carries the previous-pitch state across steps so
//! melodic motion composes. A step is all-or-nothing: it emits a complete
//! batch or a single rest, never a partial chord.

use serde::{Deserialize, Serialize};

use crate::error::PatternError;
use crate::event::Event;
use crate::pattern::{PatternNode, Scope, Value};
use crate::pitch::{Interval, Pitch, PitchClass};
use crate::values::{Duration, Intensity};

/// Chain-wide defaults and limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Anchor pitch: the base for the first relative step and the center
    /// that `max_interval` folding measures from.
    pub default_pitch: Pitch,
    pub default_intensity: Intensity,
    pub default_duration: Duration,
    /// When set, pitches computed by interval addition are folded by
    /// octaves until within this distance of `default_pitch`.
    pub max_interval: Option<Interval>,
    /// MIDI channel stamped on every emitted note.
    pub channel: Option<u8>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            default_pitch: Pitch::new(PitchClass::C, 4),
            default_intensity: Intensity::default(),
            default_duration: Duration::QUARTER,
            max_interval: None,
            channel: None,
        }
    }
}

/// Pitch material classified for resolution. Closed, so every step's pitch
/// handling is exhaustive.
#[derive(Debug, Clone, PartialEq)]
pub enum PitchLike {
    /// Concrete pitches, used directly.
    Absolute(Vec<Pitch>),
    /// A signed offset from the previous pitch(es).
    Relative(Interval),
    /// Pitch classes, snapped to the octave nearest the previous pitch.
    Classes(Vec<PitchClass>),
}

impl PitchLike {
    /// Classify a pattern value as pitch material.
    pub fn from_value(value: &Value) -> Result<Self, PatternError> {
        match value {
            Value::Pitch(p) => Ok(Self::Absolute(vec![*p])),
            Value::Chord(pitches) => Ok(Self::Absolute(pitches.clone())),
            Value::Interval(interval) => Ok(Self::Relative(*interval)),
            Value::Number(n) => Ok(Self::Relative(Interval::new(n.round() as i32))),
            Value::PitchClass(pc) => Ok(Self::Classes(vec![*pc])),
            Value::List(values) => {
                if let Some(pitches) = values
                    .iter()
                    .map(|v| match v {
                        Value::Pitch(p) => Some(*p),
                        _ => None,
                    })
                    .collect::<Option<Vec<_>>>()
                {
                    return Ok(Self::Absolute(pitches));
                }
                if let Some(classes) = values
                    .iter()
                    .map(|v| match v {
                        Value::PitchClass(pc) => Some(*pc),
                        _ => None,
                    })
                    .collect::<Option<Vec<_>>>()
                {
                    return Ok(Self::Classes(classes));
                }
                Err(PatternError::invalid(
                    "pitch list must be all pitches or all pitch classes",
                ))
            }
            other => Err(PatternError::invalid(format!(
                "not pitch material: {other:?}"
            ))),
        }
    }
}

/// One role slot's source.
#[derive(Debug, Clone, Default)]
pub enum Role {
    /// No source configured; every step uses the config default.
    #[default]
    Unset,
    /// A bare value, repeated every step without exhausting.
    Constant(Value),
    Pattern(PatternNode),
}

/// What one role produced for a step.
enum RolePull {
    Default,
    Value(Value),
    Exhausted,
}

impl Role {
    fn pull(&mut self, scope: &mut Scope) -> Result<RolePull, PatternError> {
        match self {
            Self::Unset => Ok(RolePull::Default),
            Self::Constant(value) => Ok(RolePull::Value(value.clone())),
            Self::Pattern(pattern) => Ok(match pattern.next(scope)? {
                Some(value) => RolePull::Value(value),
                None => RolePull::Exhausted,
            }),
        }
    }

    fn rewind(&mut self) {
        if let Self::Pattern(pattern) = self {
            pattern.rewind();
        }
    }
}

impl From<PatternNode> for Role {
    fn from(pattern: PatternNode) -> Self {
        Self::Pattern(pattern)
    }
}

impl From<Value> for Role {
    fn from(value: Value) -> Self {
        Self::Constant(value)
    }
}

impl From<Pitch> for Role {
    fn from(p: Pitch) -> Self {
        Self::Constant(Value::Pitch(p))
    }
}

impl From<PitchClass> for Role {
    fn from(pc: PitchClass) -> Self {
        Self::Constant(Value::PitchClass(pc))
    }
}

impl From<Interval> for Role {
    fn from(i: Interval) -> Self {
        Self::Constant(Value::Interval(i))
    }
}

impl From<Duration> for Role {
    fn from(d: Duration) -> Self {
        Self::Constant(Value::Duration(d))
    }
}

impl From<Intensity> for Role {
    fn from(i: Intensity) -> Self {
        Self::Constant(Value::Intensity(i))
    }
}

/// Assembles parallel pitch, intensity, and duration streams into events.
#[derive(Debug, Clone)]
pub struct Chain {
    pitch: Role,
    intensity: Role,
    duration: Role,
    config: ChainConfig,
    /// Pitches emitted by the last sounding step. Rests hold this.
    previous: Option<Vec<Pitch>>,
    done: bool,
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl Chain {
    pub fn new() -> Self {
        Self {
            pitch: Role::Unset,
            intensity: Role::Unset,
            duration: Role::Unset,
            config: ChainConfig::default(),
            previous: None,
            done: false,
        }
    }

    pub fn with_config(mut self, config: ChainConfig) -> Self {
        self.config = config;
        self
    }

    pub fn pitch(mut self, source: impl Into<Role>) -> Self {
        self.pitch = source.into();
        self
    }

    pub fn intensity(mut self, source: impl Into<Role>) -> Self {
        self.intensity = source.into();
        self
    }

    pub fn duration(mut self, source: impl Into<Role>) -> Self {
        self.duration = source.into();
        self
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Resolve the next step into a batch of events.
    ///
    /// `Ok(None)` once any role pattern exhausts; the chain stays ended
    /// until [`rewind`](Self::rewind). All three role cursors advance every
    /// step, including rest steps.
    pub fn next_step(&mut self, scope: &mut Scope) -> Result<Option<Vec<Event>>, PatternError> {
        if self.done {
            return Ok(None);
        }
        let pitch = self.pitch.pull(scope)?;
        let intensity = self.intensity.pull(scope)?;
        let duration = self.duration.pull(scope)?;
        if matches!(pitch, RolePull::Exhausted)
            || matches!(intensity, RolePull::Exhausted)
            || matches!(duration, RolePull::Exhausted)
        {
            self.done = true;
            return Ok(None);
        }

        let duration = match duration {
            RolePull::Default => self.config.default_duration,
            RolePull::Value(Value::Duration(d)) => d,
            RolePull::Value(Value::Number(n)) => Duration::from_beats(n),
            RolePull::Value(Value::Rest) => self.config.default_duration.to_rest(),
            RolePull::Value(other) => {
                return Err(PatternError::invalid(format!("not a duration: {other:?}")))
            }
            RolePull::Exhausted => unreachable!(),
        };

        // A rest in any role silences the whole step. Cursors have already
        // advanced; the previous-pitch state is held.
        let pitch_rest = matches!(pitch, RolePull::Value(Value::Rest));
        let intensity_rest = matches!(intensity, RolePull::Value(Value::Rest));
        if pitch_rest || intensity_rest || duration.is_rest() {
            return Ok(Some(vec![Event::rest(duration)]));
        }

        let intensity = match intensity {
            RolePull::Default => self.config.default_intensity,
            RolePull::Value(Value::Intensity(i)) => i,
            RolePull::Value(Value::Number(n)) => Intensity::new(n),
            RolePull::Value(other) => {
                return Err(PatternError::invalid(format!(
                    "not an intensity: {other:?}"
                )))
            }
            RolePull::Exhausted => unreachable!(),
        };

        let pitches = match pitch {
            RolePull::Default => vec![self.config.default_pitch],
            RolePull::Value(value) => self.resolve_pitches(&PitchLike::from_value(&value)?),
            RolePull::Exhausted => unreachable!(),
        };
        self.previous = Some(pitches.clone());

        let events = pitches
            .into_iter()
            .map(|pitch| match self.config.channel {
                Some(channel) => Event::note_on_channel(pitch, intensity, duration, channel),
                None => Event::note(pitch, intensity, duration),
            })
            .collect();
        Ok(Some(events))
    }

    fn resolve_pitches(&self, material: &PitchLike) -> Vec<Pitch> {
        match material {
            PitchLike::Absolute(pitches) => pitches.clone(),
            PitchLike::Relative(interval) => {
                let base = match &self.previous {
                    Some(pitches) => pitches.clone(),
                    None => vec![self.config.default_pitch],
                };
                base.into_iter()
                    .map(|p| self.fold_toward_anchor(p + *interval))
                    .collect()
            }
            PitchLike::Classes(classes) => {
                let reference = self.lowest_previous();
                classes.iter().map(|&pc| reference.nearest(pc)).collect()
            }
        }
    }

    /// The lowest pitch of the previous step, or the anchor when none.
    fn lowest_previous(&self) -> Pitch {
        self.previous
            .as_deref()
            .and_then(|pitches| {
                pitches
                    .iter()
                    .copied()
                    .min_by(|a, b| a.midi().cmp(&b.midi()))
            })
            .unwrap_or(self.config.default_pitch)
    }

    /// Fold a pitch by octaves until within `max_interval` of the anchor.
    /// Applied only to pitches produced by interval addition.
    fn fold_toward_anchor(&self, pitch: Pitch) -> Pitch {
        let Some(max_interval) = self.config.max_interval else {
            return pitch;
        };
        let anchor = self.config.default_pitch;
        let mut pitch = pitch;
        loop {
            let distance = (pitch - anchor).abs();
            if distance <= max_interval.abs() {
                return pitch;
            }
            let folded = if pitch.midi() > anchor.midi() {
                pitch - Interval::OCTAVE
            } else {
                pitch + Interval::OCTAVE
            };
            // A span tighter than an octave can make folding overshoot;
            // keep whichever side is closer and stop.
            if (folded - anchor).abs() >= distance {
                return pitch;
            }
            pitch = folded;
        }
    }

    /// Reset role patterns and the previous-pitch state.
    pub fn rewind(&mut self) {
        self.pitch.rewind();
        self.intensity.rewind();
        self.duration.rewind();
        self.previous = None;
        self.done = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{Cycle, Element, Sequence};

    fn steps(chain: &mut Chain) -> Vec<Vec<Event>> {
        let mut scope = Scope::with_seed(0);
        let mut out = Vec::new();
        for _ in 0..64 {
            match chain.next_step(&mut scope).unwrap() {
                Some(batch) => out.push(batch),
                None => break,
            }
        }
        out
    }

    fn pitches_of(batch: &[Event]) -> Vec<Pitch> {
        batch
            .iter()
            .map(|e| match e {
                Event::Note { pitch, .. } => *pitch,
                other => panic!("expected note, got {other:?}"),
            })
            .collect()
    }

    fn pc_cycle(classes: &[PitchClass]) -> PatternNode {
        Cycle::new(classes.iter().map(|&pc| pc.into())).into()
    }

    #[test]
    fn absolute_pitches_pass_through() {
        let mut chain = Chain::new().pitch(PatternNode::from(Sequence::new([
            Pitch::new(PitchClass::C, 4).into(),
            Pitch::new(PitchClass::E, 4).into(),
        ])));
        let steps = steps(&mut chain);
        assert_eq!(steps.len(), 2);
        assert_eq!(pitches_of(&steps[0]), vec![Pitch::new(PitchClass::C, 4)]);
        assert_eq!(pitches_of(&steps[1]), vec![Pitch::new(PitchClass::E, 4)]);
    }

    #[test]
    fn tritone_alternation_does_not_drift() {
        let mut chain = Chain::new().pitch(pc_cycle(&[
            PitchClass::C,
            PitchClass::GB,
            PitchClass::C,
            PitchClass::GB,
            PitchClass::C,
        ]));
        // The cycle repeats forever, so pull exactly five steps.
        let mut scope = Scope::with_seed(0);
        let mut got = Vec::new();
        for _ in 0..5 {
            let batch = chain.next_step(&mut scope).unwrap().unwrap();
            got.extend(pitches_of(&batch));
        }
        assert_eq!(
            got,
            vec![
                Pitch::new(PitchClass::C, 4),
                Pitch::new(PitchClass::GB, 4),
                Pitch::new(PitchClass::C, 4),
                Pitch::new(PitchClass::GB, 4),
                Pitch::new(PitchClass::C, 4),
            ]
        );
    }

    #[test]
    fn intervals_walk_from_the_default_pitch() {
        let mut chain = Chain::new().pitch(PatternNode::from(Sequence::from_values([2, 2, 1])));
        let steps = steps(&mut chain);
        let got: Vec<Pitch> = steps.iter().flat_map(|b| pitches_of(b)).collect();
        assert_eq!(
            got,
            vec![
                Pitch::new(PitchClass::D, 4),
                Pitch::new(PitchClass::E, 4),
                Pitch::new(PitchClass::F, 4),
            ]
        );
    }

    #[test]
    fn intervals_apply_elementwise_to_chords() {
        let c_major = Value::Chord(vec![
            Pitch::new(PitchClass::C, 4),
            Pitch::new(PitchClass::E, 4),
            Pitch::new(PitchClass::G, 4),
        ]);
        let mut chain = Chain::new().pitch(PatternNode::from(Sequence::new([
            c_major.into(),
            Element::from(Interval::new(2)),
        ])));
        let steps = steps(&mut chain);
        assert_eq!(
            pitches_of(&steps[1]),
            vec![
                Pitch::new(PitchClass::D, 4),
                Pitch::new(PitchClass::GB, 4),
                Pitch::new(PitchClass::A, 4),
            ]
        );
    }

    #[test]
    fn pitch_classes_snap_to_the_previous_lowest() {
        let mut chain = Chain::new().pitch(PatternNode::from(Sequence::new([
            Pitch::new(PitchClass::A, 4).into(),
            PitchClass::C.into(),
        ])));
        let steps = steps(&mut chain);
        // Nearest C to A4 is C5, three semitones up.
        assert_eq!(pitches_of(&steps[1]), vec![Pitch::new(PitchClass::C, 5)]);
    }

    #[test]
    fn rest_in_any_role_silences_the_step() {
        let mut chain = Chain::new()
            .pitch(PatternNode::from(Sequence::new([
                Pitch::new(PitchClass::C, 4).into(),
                Value::Rest.into(),
                Element::from(Interval::new(2)),
            ])))
            .duration(Duration::HALF);
        let steps = steps(&mut chain);
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[1], vec![Event::rest(Duration::HALF)]);
        // Previous pitch held across the rest: C4 + 2 = D4.
        assert_eq!(pitches_of(&steps[2]), vec![Pitch::new(PitchClass::D, 4)]);
    }

    #[test]
    fn negative_duration_is_a_rest_step() {
        let mut chain = Chain::new()
            .pitch(Pitch::new(PitchClass::C, 4))
            .duration(PatternNode::from(Sequence::new([
                Duration::QUARTER.into(),
                (-Duration::QUARTER).into(),
                Duration::HALF.into(),
            ])));
        let steps = steps(&mut chain);
        assert_eq!(steps.len(), 3);
        assert!(!steps[0][0].is_rest());
        assert!(steps[1][0].is_rest());
        assert!(!steps[2][0].is_rest());
    }

    #[test]
    fn ends_when_any_role_exhausts() {
        let mut chain = Chain::new()
            .pitch(Pitch::new(PitchClass::C, 4))
            .intensity(PatternNode::from(Sequence::new([
                Intensity::P.into(),
                Intensity::FORTE.into(),
            ])));
        assert_eq!(steps(&mut chain).len(), 2);
    }

    #[test]
    fn defaults_fill_unset_roles() {
        let mut chain = Chain::new().pitch(PatternNode::from(Sequence::new([
            Pitch::new(PitchClass::G, 4).into()
        ])));
        let steps = steps(&mut chain);
        match &steps[0][0] {
            Event::Note {
                intensity,
                duration,
                channel,
                ..
            } => {
                assert_eq!(*intensity, Intensity::default());
                assert_eq!(*duration, Duration::QUARTER);
                assert_eq!(*channel, None);
            }
            other => panic!("expected note, got {other:?}"),
        }
    }

    #[test]
    fn max_interval_folds_toward_the_anchor() {
        let mut chain = Chain::new()
            .with_config(ChainConfig {
                max_interval: Some(Interval::OCTAVE),
                ..ChainConfig::default()
            })
            .pitch(PatternNode::from(Sequence::from_values([7, 7, 7])));
        let steps = steps(&mut chain);
        let got: Vec<Pitch> = steps.iter().flat_map(|b| pitches_of(b)).collect();
        // C4 +7 = G4. G4 +7 = D5, 14 above the anchor, folded to D4.
        // D4 +7 = A4, back in range.
        assert_eq!(
            got,
            vec![
                Pitch::new(PitchClass::G, 4),
                Pitch::new(PitchClass::D, 4),
                Pitch::new(PitchClass::A, 4),
            ]
        );
    }

    #[test]
    fn numbers_resolve_per_role() {
        let mut chain = Chain::new()
            .pitch(PatternNode::from(Sequence::from_values([0.0])))
            .intensity(Value::Number(0.5))
            .duration(Value::Number(2.0));
        let steps = steps(&mut chain);
        match &steps[0][0] {
            Event::Note {
                intensity, duration, ..
            } => {
                assert_eq!(*intensity, Intensity::new(0.5));
                assert_eq!(*duration, Duration::HALF);
            }
            other => panic!("expected note, got {other:?}"),
        }
    }

    #[test]
    fn channel_stamps_every_note() {
        let mut chain = Chain::new()
            .with_config(ChainConfig {
                channel: Some(3),
                ..ChainConfig::default()
            })
            .pitch(PatternNode::from(Sequence::new([Value::Chord(vec![
                Pitch::new(PitchClass::C, 4),
                Pitch::new(PitchClass::G, 4),
            ])
            .into()])));
        let steps = steps(&mut chain);
        for event in &steps[0] {
            match event {
                Event::Note { channel, .. } => assert_eq!(*channel, Some(3)),
                other => panic!("expected note, got {other:?}"),
            }
        }
    }

    #[test]
    fn rewind_replays_and_clears_previous_state() {
        let mut chain = Chain::new().pitch(PatternNode::from(Sequence::from_values([4, 3])));
        let first = steps(&mut chain);
        chain.rewind();
        let second = steps(&mut chain);
        assert_eq!(first, second);
    }

    #[test]
    fn non_pitch_material_in_pitch_role_is_an_error() {
        let mut chain = Chain::new().pitch(Value::Duration(Duration::QUARTER));
        let mut scope = Scope::with_seed(0);
        assert!(matches!(
            chain.next_step(&mut scope),
            Err(PatternError::InvalidConfiguration(_))
        ));
    }
}
