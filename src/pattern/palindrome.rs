//! Palindrome traversal — forward, then backward, repeating.
//!
//! With `repeat_ends` off (the default) the pivot elements are played once
//! per pass: `[1,2,3,4]` gives `1 2 3 4 3 2 1 2 3 4 …`. With it on, both
//! ends repeat: `1 2 3 4 4 3 2 1 1 2 …`. Nested patterns expand forward on
//! both passes; only the order of slots reverses, never their contents.

use super::element::{Element, Value};
use super::scope::Scope;
use super::Bounds;
use crate::error::PatternError;

/// Forward-then-backward traversal of an element list.
#[derive(Debug, Clone)]
pub struct Palindrome {
    elements: Vec<Element>,
    bounds: Bounds,
    repeat_ends: bool,
    pos: usize,
    forward: bool,
    fresh: bool,
    emitted: usize,
    cycles: usize,
    produced_in_cycle: bool,
}

impl Palindrome {
    pub fn new(elements: impl IntoIterator<Item = Element>) -> Self {
        Self {
            elements: elements.into_iter().collect(),
            bounds: Bounds::unbounded(),
            repeat_ends: false,
            pos: 0,
            forward: true,
            fresh: true,
            emitted: 0,
            cycles: 0,
            produced_in_cycle: false,
        }
    }

    pub fn from_values<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::new(values.into_iter().map(|v| Element::Value(v.into())))
    }

    /// Repeat the pivot elements when the direction turns.
    pub fn with_repeat_ends(mut self, repeat_ends: bool) -> Self {
        self.repeat_ends = repeat_ends;
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Result<Self, PatternError> {
        bounds.validate()?;
        self.bounds = bounds;
        Ok(self)
    }

    pub fn next(&mut self, scope: &mut Scope) -> Result<Option<Value>, PatternError> {
        if self.elements.is_empty() {
            return Ok(None);
        }
        loop {
            if self.bounds.stop_elements(self.emitted) {
                return Ok(None);
            }
            match self.elements[self.pos].pull(self.fresh, scope)? {
                Some(value) => {
                    self.fresh = false;
                    self.emitted += 1;
                    self.produced_in_cycle = true;
                    return Ok(Some(value));
                }
                None => {
                    if !self.advance() {
                        return Ok(None);
                    }
                }
            }
        }
    }

    /// Move to the next slot, turning at the ends. Returns `false` when a
    /// completed sweep hits the cycle cap or produced nothing at all.
    fn advance(&mut self) -> bool {
        let n = self.elements.len();
        self.fresh = true;
        if n == 1 {
            // Degenerate palindrome: each visit is a full sweep.
            return self.finish_sweep();
        }
        if self.forward {
            if self.pos + 1 < n {
                self.pos += 1;
            } else {
                self.forward = false;
                self.pos = if self.repeat_ends { n - 1 } else { n - 2 };
            }
        } else if self.pos > 0 {
            self.pos -= 1;
        } else {
            self.forward = true;
            self.pos = if self.repeat_ends { 0 } else { 1 };
            return self.finish_sweep();
        }
        true
    }

    fn finish_sweep(&mut self) -> bool {
        self.cycles += 1;
        if self.bounds.stop_cycles(self.emitted, self.cycles) {
            return false;
        }
        if !self.produced_in_cycle {
            return false;
        }
        self.produced_in_cycle = false;
        true
    }

    pub fn rewind(&mut self) {
        self.pos = 0;
        self.forward = true;
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
