//! Line-segment patterns — linear ramps between target values.
//!
//! Each element is a `(target, steps)` pair. A segment emits `steps`
//! interpolated points from the last emitted value up to and including the
//! target, so consecutive segments concatenate into a continuous ramp.
//! Used for automation data (filter sweeps, volume fades) rather than
//! discrete notes.

use super::element::Value;
use super::scope::Scope;
use super::Bounds;
use crate::error::PatternError;

/// One ramp target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub target: f64,
    /// Interpolation steps to reach `target`. Zero jumps straight there.
    pub steps: usize,
}

impl Point {
    pub fn new(target: f64, steps: usize) -> Self {
        Self { target, steps }
    }
}

impl From<f64> for Point {
    fn from(target: f64) -> Self {
        Self { target, steps: 0 }
    }
}

impl From<(f64, usize)> for Point {
    fn from((target, steps): (f64, usize)) -> Self {
        Self { target, steps }
    }
}

/// Piecewise-linear interpolation over a list of targets.
#[derive(Debug, Clone)]
pub struct Lines {
    points: Vec<Point>,
    bounds: Bounds,
    pos: usize,
    /// Steps already emitted within the current segment.
    step: usize,
    /// Value the current segment ramps from.
    origin: f64,
    /// Last emitted value, carried across segments and cycles.
    previous: Option<f64>,
    emitted: usize,
    cycles: usize,
}

impl Lines {
    /// Build from ramp points. Rejects non-finite targets.
    pub fn new(points: impl IntoIterator<Item = impl Into<Point>>) -> Result<Self, PatternError> {
        let points: Vec<Point> = points.into_iter().map(Into::into).collect();
        for p in &points {
            if !p.target.is_finite() {
                return Err(PatternError::invalid(format!(
                    "line target must be finite, got {}",
                    p.target
                )));
            }
        }
        Ok(Self {
            points,
            bounds: Bounds::one_cycle(),
            pos: 0,
            step: 0,
            origin: 0.0,
            previous: None,
            emitted: 0,
            cycles: 0,
        })
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Result<Self, PatternError> {
        bounds.validate()?;
        self.bounds = Bounds {
            max_cycles: bounds.max_cycles.or(Some(1)),
            ..bounds
        };
        Ok(self)
    }

    pub fn next(&mut self, _scope: &mut Scope) -> Result<Option<Value>, PatternError> {
        if self.points.is_empty() {
            return Ok(None);
        }
        if self.bounds.stop_elements(self.emitted) {
            return Ok(None);
        }
        if self.pos >= self.points.len() {
            self.cycles += 1;
            if self.bounds.stop_cycles(self.emitted, self.cycles) {
                return Ok(None);
            }
            self.pos = 0;
            self.step = 0;
        }
        let point = self.points[self.pos];
        let value = match self.previous {
            // The head of a ramp has nothing to interpolate from.
            None => {
                self.pos += 1;
                point.target
            }
            Some(_) if point.steps == 0 => {
                self.pos += 1;
                point.target
            }
            Some(previous) => {
                if self.step == 0 {
                    self.origin = previous;
                }
                self.step += 1;
                let t = self.step as f64 / point.steps as f64;
                let value = self.origin + (point.target - self.origin) * t;
                if self.step >= point.steps {
                    self.pos += 1;
                    self.step = 0;
                }
                value
            }
        };
        self.previous = Some(value);
        self.emitted += 1;
        Ok(Some(Value::Number(value)))
    }

    pub fn rewind(&mut self) {
        self.pos = 0;
        self.step = 0;
        self.origin = 0.0;
        self.previous = None;
        self.emitted = 0;
        self.cycles = 0;
    }
}
