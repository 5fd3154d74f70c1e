//! Lazy bounded pattern generators — the composition algebra.
//!
//! A pattern is a stateful generator: `next()` produces the next value or
//! `Ok(None)` once its bounds are exhausted, and `rewind()` restores the
//! initial cursor without rebuilding anything. Elements of a pattern may be
//! plain values, variables resolved against the enclosing loop scope, or
//! nested patterns, which are drained transparently before the cursor moves
//! on.
//!
//! The variants differ only in their production policy over the element
//! list: [`Sequence`] and [`Cycle`] walk it in order, [`Choice`] draws at
//! random, [`Palindrome`] sweeps forward and back, [`Lines`] interpolates
//! ramps, [`FunctionPattern`] delegates to a callback, and [`ForEach`]
//! runs sub-patterns as nested loops with cross-level variable capture.

pub mod choice;
pub mod element;
pub mod for_each;
pub mod function;
pub mod lines;
pub mod palindrome;
pub mod scope;
pub mod sequence;
pub mod variable;

pub use choice::Choice;
pub use element::{Element, Value};
pub use for_each::ForEach;
pub use function::{Callback, FnStep, FunctionPattern};
pub use lines::Lines;
pub use palindrome::Palindrome;
pub use scope::Scope;
pub use sequence::{Cycle, Sequence};
pub use variable::Variable;

use crate::error::PatternError;

/// Iteration bounds shared by every generator variant.
///
/// `min_elements` takes precedence: while fewer than `min_elements` values
/// have been emitted, iteration continues even past `max_elements` or
/// `max_cycles`. Otherwise `max_elements` caps total emissions and
/// `max_cycles` caps full traversals of the configured list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    pub min_elements: Option<usize>,
    pub max_elements: Option<usize>,
    pub max_cycles: Option<usize>,
}

impl Bounds {
    /// Unbounded in every dimension.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Bounds for one-shot variants: a single cycle, no element caps.
    pub fn one_cycle() -> Self {
        Self {
            max_cycles: Some(1),
            ..Self::default()
        }
    }

    /// Reject contradictory bounds.
    pub fn validate(&self) -> Result<(), PatternError> {
        if let (Some(min), Some(max)) = (self.min_elements, self.max_elements) {
            if min > max {
                return Err(PatternError::invalid(format!(
                    "min_elements {min} exceeds max_elements {max}"
                )));
            }
        }
        Ok(())
    }

    fn must_continue(&self, emitted: usize) -> bool {
        self.min_elements.is_some_and(|min| emitted < min)
    }

    /// Whether emission must stop because the element cap is reached.
    pub(crate) fn stop_elements(&self, emitted: usize) -> bool {
        !self.must_continue(emitted) && self.max_elements.is_some_and(|max| emitted >= max)
    }

    /// Whether emission must stop because the cycle cap is reached.
    pub(crate) fn stop_cycles(&self, emitted: usize, cycles: usize) -> bool {
        !self.must_continue(emitted) && self.max_cycles.is_some_and(|max| cycles >= max)
    }
}

/// A node in a pattern tree. Closed over all generator variants so that
/// dispatch is exhaustive.
#[derive(Debug, Clone)]
pub enum PatternNode {
    Sequence(Sequence),
    Cycle(Cycle),
    Choice(Choice),
    Palindrome(Palindrome),
    Lines(Lines),
    Function(FunctionPattern),
    ForEach(ForEach),
}

impl PatternNode {
    /// Produce the next value, or `Ok(None)` once bounds are exhausted.
    pub fn next(&mut self, scope: &mut Scope) -> Result<Option<Value>, PatternError> {
        match self {
            Self::Sequence(p) => p.next(scope),
            Self::Cycle(p) => p.next(scope),
            Self::Choice(p) => p.next(scope),
            Self::Palindrome(p) => p.next(scope),
            Self::Lines(p) => p.next(scope),
            Self::Function(p) => p.next(scope),
            Self::ForEach(p) => p.next(scope),
        }
    }

    /// Reset the cursor and every nested pattern's cursor.
    pub fn rewind(&mut self) {
        match self {
            Self::Sequence(p) => p.rewind(),
            Self::Cycle(p) => p.rewind(),
            Self::Choice(p) => p.rewind(),
            Self::Palindrome(p) => p.rewind(),
            Self::Lines(p) => p.rewind(),
            Self::Function(p) => p.rewind(),
            Self::ForEach(p) => p.rewind(),
        }
    }

    /// Drain the remaining values into a vector. Test and tooling helper;
    /// unbounded patterns will not return.
    pub fn collect(&mut self, scope: &mut Scope) -> Result<Vec<Value>, PatternError> {
        let mut out = Vec::new();
        while let Some(value) = self.next(scope)? {
            out.push(value);
        }
        Ok(out)
    }
}

impl From<Sequence> for PatternNode {
    fn from(p: Sequence) -> Self {
        Self::Sequence(p)
    }
}

impl From<Cycle> for PatternNode {
    fn from(p: Cycle) -> Self {
        Self::Cycle(p)
    }
}

impl From<Choice> for PatternNode {
    fn from(p: Choice) -> Self {
        Self::Choice(p)
    }
}

impl From<Palindrome> for PatternNode {
    fn from(p: Palindrome) -> Self {
        Self::Palindrome(p)
    }
}

impl From<Lines> for PatternNode {
    fn from(p: Lines) -> Self {
        Self::Lines(p)
    }
}

impl From<FunctionPattern> for PatternNode {
    fn from(p: FunctionPattern) -> Self {
        Self::Function(p)
    }
}

impl From<ForEach> for PatternNode {
    fn from(p: ForEach) -> Self {
        Self::ForEach(p)
    }
}
