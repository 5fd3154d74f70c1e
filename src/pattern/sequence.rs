//! Ordered traversal patterns: one-shot [`Sequence`] and endless [`Cycle`].
//!
//! Both walk the element list left to right, draining nested patterns in
//! place. They differ only in their default cycle bound: a `Sequence` plays
//! once, a `Cycle` repeats until something else stops it.

use super::element::{Element, Value};
use super::scope::Scope;
use super::Bounds;
use crate::error::PatternError;

/// Shared in-order cursor over an element list.
#[derive(Debug, Clone)]
struct Walk {
    elements: Vec<Element>,
    bounds: Bounds,
    pos: usize,
    /// First pull since the cursor arrived at `pos`.
    fresh: bool,
    emitted: usize,
    cycles: usize,
    /// Whether the current cycle has produced anything; guards against
    /// spinning forever on a list of only-empty nested patterns.
    produced_in_cycle: bool,
}

impl Walk {
    fn new(elements: Vec<Element>, bounds: Bounds) -> Self {
        Self {
            elements,
            bounds,
            pos: 0,
            fresh: true,
            emitted: 0,
            cycles: 0,
            produced_in_cycle: false,
        }
    }

    fn next(&mut self, scope: &mut Scope) -> Result<Option<Value>, PatternError> {
        if self.elements.is_empty() {
            return Ok(None);
        }
        loop {
            if self.bounds.stop_elements(self.emitted) {
                return Ok(None);
            }
            if self.pos >= self.elements.len() {
                self.cycles += 1;
                if self.bounds.stop_cycles(self.emitted, self.cycles) {
                    return Ok(None);
                }
                if !self.produced_in_cycle {
                    // A whole cycle emitted nothing; another will not either.
                    return Ok(None);
                }
                self.pos = 0;
                self.fresh = true;
                self.produced_in_cycle = false;
            }
            match self.elements[self.pos].pull(self.fresh, scope)? {
                Some(value) => {
                    self.fresh = false;
                    self.emitted += 1;
                    self.produced_in_cycle = true;
                    return Ok(Some(value));
                }
                None => {
                    self.pos += 1;
                    self.fresh = true;
                }
            }
        }
    }

    fn rewind(&mut self) {
        self.pos = 0;
        self.fresh = true;
        self.emitted = 0;
        self.cycles = 0;
        self.produced_in_cycle = false;
        for element in &mut self.elements {
            if let Element::Pattern(pattern) = element {
                pattern.rewind();
            }
        }
    }
}

/// Plays its elements once per cycle, one cycle by default.
#[derive(Debug, Clone)]
pub struct Sequence {
    walk: Walk,
}

impl Sequence {
    pub fn new(elements: impl IntoIterator<Item = Element>) -> Self {
        Self {
            walk: Walk::new(elements.into_iter().collect(), Bounds::one_cycle()),
        }
    }

    /// Convenience constructor from plain values.
    pub fn from_values<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::new(values.into_iter().map(|v| Element::Value(v.into())))
    }

    /// Override the iteration bounds. `max_cycles` still defaults to 1 when
    /// unset in `bounds`.
    pub fn with_bounds(mut self, bounds: Bounds) -> Result<Self, PatternError> {
        bounds.validate()?;
        self.walk.bounds = Bounds {
            max_cycles: bounds.max_cycles.or(Some(1)),
            ..bounds
        };
        Ok(self)
    }

    pub fn next(&mut self, scope: &mut Scope) -> Result<Option<Value>, PatternError> {
        self.walk.next(scope)
    }

    pub fn rewind(&mut self) {
        self.walk.rewind();
    }

    /// A new sequence holding `n` concatenated copies of one flattened
    /// cycle. A fractional `n` appends the first `round(frac * len)`
    /// values of a further copy, so `repeat(2.67)` of a 3-element list
    /// yields two full copies plus two more values.
    ///
    /// Nested patterns are flattened through a fresh scope; use
    /// [`repeat_with_scope`](Self::repeat_with_scope) to control the random
    /// source seen by nested choices.
    pub fn repeat(&self, n: f64) -> Result<Sequence, PatternError> {
        self.repeat_with_scope(n, &mut Scope::default())
    }

    pub fn repeat_with_scope(
        &self,
        n: f64,
        scope: &mut Scope,
    ) -> Result<Sequence, PatternError> {
        if !n.is_finite() || n < 0.0 {
            return Err(PatternError::invalid(format!(
                "repeat count must be finite and non-negative, got {n}"
            )));
        }
        // One flattened cycle, free of element/cycle caps.
        let mut probe = Walk::new(self.walk.elements.clone(), Bounds::one_cycle());
        let mut cycle = Vec::new();
        while let Some(value) = probe.next(scope)? {
            cycle.push(value);
        }
        let whole = n.floor() as usize;
        let partial = ((n - n.floor()) * cycle.len() as f64).round() as usize;
        let mut values = Vec::with_capacity(whole * cycle.len() + partial);
        for _ in 0..whole {
            values.extend(cycle.iter().cloned());
        }
        values.extend(cycle.iter().take(partial).cloned());
        Ok(Sequence::from_values(values))
    }
}

/// Same mechanics as [`Sequence`], but repeats indefinitely by default.
#[derive(Debug, Clone)]
pub struct Cycle {
    walk: Walk,
}

impl Cycle {
    pub fn new(elements: impl IntoIterator<Item = Element>) -> Self {
        Self {
            walk: Walk::new(elements.into_iter().collect(), Bounds::unbounded()),
        }
    }

    pub fn from_values<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::new(values.into_iter().map(|v| Element::Value(v.into())))
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Result<Self, PatternError> {
        bounds.validate()?;
        self.walk.bounds = bounds;
        Ok(self)
    }

    pub fn next(&mut self, scope: &mut Scope) -> Result<Option<Value>, PatternError> {
        self.walk.next(scope)
    }

    pub fn rewind(&mut self) {
        self.walk.rewind();
    }
}
