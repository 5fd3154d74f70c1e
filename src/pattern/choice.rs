//! Random selection patterns.
//!
//! Every `next()` makes an independent draw from the configured elements,
//! uniformly or by weight, using the scope's seeded random source. A drawn
//! sub-pattern is drained to exhaustion before the next draw happens.

use rand::Rng;

use super::element::{Element, Value};
use super::scope::Scope;
use super::Bounds;
use crate::error::PatternError;

/// Draws one element at random per emission.
#[derive(Debug, Clone)]
pub struct Choice {
    elements: Vec<Element>,
    weights: Option<Vec<f64>>,
    bounds: Bounds,
    /// Index currently being drained, if a draw is in progress.
    current: Option<usize>,
    fresh: bool,
    emitted: usize,
    /// Completed draws; one draw counts as one cycle.
    cycles: usize,
    /// Indices seen to complete without emitting since the last value.
    /// Once every index is in here the choice is known to be empty.
    empty_seen: Vec<bool>,
}

impl Choice {
    pub fn new(elements: impl IntoIterator<Item = Element>) -> Self {
        let elements: Vec<Element> = elements.into_iter().collect();
        let n = elements.len();
        Self {
            elements,
            weights: None,
            bounds: Bounds::unbounded(),
            current: None,
            fresh: true,
            emitted: 0,
            cycles: 0,
            empty_seen: vec![false; n],
        }
    }

    pub fn from_values<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::new(values.into_iter().map(|v| Element::Value(v.into())))
    }

    /// Weight the draw. One weight per element, all non-negative, at least
    /// one positive.
    pub fn with_weights(mut self, weights: Vec<f64>) -> Result<Self, PatternError> {
        if weights.len() != self.elements.len() {
            return Err(PatternError::invalid(format!(
                "{} weights for {} elements",
                weights.len(),
                self.elements.len()
            )));
        }
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(PatternError::invalid(
                "weights must be finite and non-negative",
            ));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(PatternError::invalid("at least one weight must be positive"));
        }
        self.weights = Some(weights);
        Ok(self)
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
            let index = match self.current {
                Some(index) => index,
                None => {
                    if self.bounds.stop_cycles(self.emitted, self.cycles) {
                        return Ok(None);
                    }
                    if self.empty_seen.iter().all(|&seen| seen) {
                        // Every element has come up empty; nothing to draw.
                        return Ok(None);
                    }
                    let index = self.draw(scope);
                    self.current = Some(index);
                    self.fresh = true;
                    index
                }
            };
            match self.elements[index].pull(self.fresh, scope)? {
                Some(value) => {
                    self.fresh = false;
                    self.emitted += 1;
                    self.empty_seen.fill(false);
                    return Ok(Some(value));
                }
                None => {
                    if self.fresh {
                        // The draw produced nothing at all.
                        self.empty_seen[index] = true;
                    }
                    self.current = None;
                    self.cycles += 1;
                }
            }
        }
    }

    fn draw(&self, scope: &mut Scope) -> usize {
        match &self.weights {
            None => scope.rng().gen_range(0..self.elements.len()),
            Some(weights) => {
                let total: f64 = weights.iter().sum();
                let mut r = scope.rng().gen::<f64>() * total;
                for (index, &w) in weights.iter().enumerate() {
                    if r < w {
                        return index;
                    }
                    r -= w;
                }
                weights.len() - 1
            }
        }
    }

    pub fn rewind(&mut self) {
        self.current = None;
        self.fresh = true;
        self.emitted = 0;
        self.cycles = 0;
        self.empty_seen.fill(false);
        for element in &mut self.elements {
            if let Element::Pattern(pattern) = element {
                pattern.rewind();
            }
        }
    }
}
