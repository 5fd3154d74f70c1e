//! Pattern values and the elements that produce them.

use serde::{Deserialize, Serialize};

use super::scope::Scope;
use super::variable::Variable;
use super::PatternNode;
use crate::error::PatternError;
use crate::pitch::{Interval, Pitch, PitchClass};
use crate::values::{Duration, Intensity};

/// Everything a pattern can yield. A closed union, so downstream
/// resolution (notably the chain's pitch handling) is exhaustive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Number(f64),
    Pitch(Pitch),
    PitchClass(PitchClass),
    /// Several pitches sounding together.
    Chord(Vec<Pitch>),
    Interval(Interval),
    Duration(Duration),
    Intensity(Intensity),
    /// The literal rest marker. Any role of a chain step that resolves to
    /// this silences the whole step.
    Rest,
    /// An ordered collection, produced by "all"-scope variables.
    List(Vec<Value>),
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(n as f64)
    }
}

impl From<Pitch> for Value {
    fn from(p: Pitch) -> Self {
        Self::Pitch(p)
    }
}

impl From<PitchClass> for Value {
    fn from(pc: PitchClass) -> Self {
        Self::PitchClass(pc)
    }
}

impl From<Interval> for Value {
    fn from(i: Interval) -> Self {
        Self::Interval(i)
    }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Self {
        Self::Duration(d)
    }
}

impl From<Intensity> for Value {
    fn from(i: Intensity) -> Self {
        Self::Intensity(i)
    }
}

/// One slot of a pattern's configured element list.
#[derive(Debug, Clone)]
pub enum Element {
    /// A literal value, emitted as-is.
    Value(Value),
    /// A nested pattern, drained to exhaustion before the cursor advances.
    Pattern(Box<PatternNode>),
    /// A variable, resolved against the active loop scope on emission.
    Variable(Variable),
}

impl Element {
    /// Pull the next value this slot produces.
    ///
    /// `fresh` marks the first pull since the cursor arrived at this slot:
    /// literals and variables produce exactly one value per visit, and a
    /// nested pattern is rewound so each visit replays it from the start.
    /// `Ok(None)` means the slot is spent and the cursor should advance —
    /// immediately so for an empty nested pattern, which occupies no
    /// position in the output.
    pub(crate) fn pull(
        &mut self,
        fresh: bool,
        scope: &mut Scope,
    ) -> Result<Option<Value>, PatternError> {
        match self {
            Self::Value(value) => Ok(fresh.then(|| value.clone())),
            Self::Variable(variable) => {
                if fresh {
                    variable.resolve(scope).map(Some)
                } else {
                    Ok(None)
                }
            }
            Self::Pattern(pattern) => {
                if fresh {
                    pattern.rewind();
                }
                pattern.next(scope)
            }
        }
    }
}

impl From<Value> for Element {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<f64> for Element {
    fn from(n: f64) -> Self {
        Self::Value(Value::Number(n))
    }
}

impl From<i32> for Element {
    fn from(n: i32) -> Self {
        Self::Value(Value::Number(n as f64))
    }
}

impl From<Pitch> for Element {
    fn from(p: Pitch) -> Self {
        Self::Value(Value::Pitch(p))
    }
}

impl From<PitchClass> for Element {
    fn from(pc: PitchClass) -> Self {
        Self::Value(Value::PitchClass(pc))
    }
}

impl From<Interval> for Element {
    fn from(i: Interval) -> Self {
        Self::Value(Value::Interval(i))
    }
}

impl From<Duration> for Element {
    fn from(d: Duration) -> Self {
        Self::Value(Value::Duration(d))
    }
}

impl From<Intensity> for Element {
    fn from(i: Intensity) -> Self {
        Self::Value(Value::Intensity(i))
    }
}

impl From<PatternNode> for Element {
    fn from(pattern: PatternNode) -> Self {
        Self::Pattern(Box::new(pattern))
    }
}

impl From<Variable> for Element {
    fn from(variable: Variable) -> Self {
        Self::Variable(variable)
    }
}
