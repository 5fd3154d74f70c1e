//! Callback-driven patterns.
//!
//! A [`FunctionPattern`] asks a user callback for each value. The callback
//! shape — how much context it wants — is fixed at construction rather than
//! sensed at call time, so dispatch stays explicit. A callback may answer
//! with a value, with a whole sub-pattern to drain before it is consulted
//! again, or with [`FnStep::Done`] to end iteration voluntarily.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::element::Value;
use super::scope::Scope;
use super::{Bounds, PatternNode};
use crate::error::PatternError;

/// What a callback produces for one invocation.
pub enum FnStep {
    /// Emit this value.
    Yield(Value),
    /// Drain this pattern before invoking the callback again.
    Expand(PatternNode),
    /// End iteration.
    Done,
}

type PrevFn = dyn FnMut(Option<&Value>) -> FnStep;
type PrevIndexFn = dyn FnMut(Option<&Value>, usize) -> FnStep;
type PrevIndexSubFn = dyn FnMut(Option<&Value>, usize, usize) -> FnStep;

/// The callback and its declared shape.
///
/// Closures are shared behind `Rc<RefCell<…>>` so pattern trees stay
/// cloneable; clones share the closure's captured state but keep
/// independent cursors.
#[derive(Clone)]
pub enum Callback {
    /// `f(previous)`
    Prev(Rc<RefCell<PrevFn>>),
    /// `f(previous, call_index)`
    PrevIndex(Rc<RefCell<PrevIndexFn>>),
    /// `f(previous, call_index, index_within_current_subsequence)`
    PrevIndexSub(Rc<RefCell<PrevIndexSubFn>>),
}

impl Callback {
    pub fn prev(f: impl FnMut(Option<&Value>) -> FnStep + 'static) -> Self {
        Self::Prev(Rc::new(RefCell::new(f)))
    }

    pub fn prev_index(f: impl FnMut(Option<&Value>, usize) -> FnStep + 'static) -> Self {
        Self::PrevIndex(Rc::new(RefCell::new(f)))
    }

    pub fn prev_index_sub(
        f: impl FnMut(Option<&Value>, usize, usize) -> FnStep + 'static,
    ) -> Self {
        Self::PrevIndexSub(Rc::new(RefCell::new(f)))
    }

    fn invoke(&self, previous: Option<&Value>, call_index: usize, sub_index: usize) -> FnStep {
        match self {
            Self::Prev(f) => (f.borrow_mut())(previous),
            Self::PrevIndex(f) => (f.borrow_mut())(previous, call_index),
            Self::PrevIndexSub(f) => (f.borrow_mut())(previous, call_index, sub_index),
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match self {
            Self::Prev(_) => "Prev",
            Self::PrevIndex(_) => "PrevIndex",
            Self::PrevIndexSub(_) => "PrevIndexSub",
        };
        write!(f, "Callback::{shape}(<closure>)")
    }
}

/// A pattern whose values come from a callback.
#[derive(Debug, Clone)]
pub struct FunctionPattern {
    callback: Callback,
    bounds: Bounds,
    expanded: Option<Box<PatternNode>>,
    previous: Option<Value>,
    call_index: usize,
    /// Values emitted by the expansion currently being drained.
    sub_index: usize,
    emitted: usize,
    done: bool,
}

impl FunctionPattern {
    pub fn new(callback: Callback) -> Self {
        Self {
            callback,
            bounds: Bounds::unbounded(),
            expanded: None,
            previous: None,
            call_index: 0,
            sub_index: 0,
            emitted: 0,
            done: false,
        }
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Result<Self, PatternError> {
        bounds.validate()?;
        self.bounds = bounds;
        Ok(self)
    }

    pub fn next(&mut self, scope: &mut Scope) -> Result<Option<Value>, PatternError> {
        loop {
            if self.done || self.bounds.stop_elements(self.emitted) {
                return Ok(None);
            }
            if let Some(pattern) = self.expanded.as_mut() {
                match pattern.next(scope)? {
                    Some(value) => {
                        self.sub_index += 1;
                        self.emitted += 1;
                        self.previous = Some(value.clone());
                        return Ok(Some(value));
                    }
                    None => self.expanded = None,
                }
                continue;
            }
            // Each invocation counts as one cycle.
            if self.bounds.stop_cycles(self.emitted, self.call_index) {
                return Ok(None);
            }
            let step =
                self.callback
                    .invoke(self.previous.as_ref(), self.call_index, self.sub_index);
            self.call_index += 1;
            self.sub_index = 0;
            match step {
                FnStep::Yield(value) => {
                    self.emitted += 1;
                    self.previous = Some(value.clone());
                    return Ok(Some(value));
                }
                FnStep::Expand(pattern) => {
                    let mut pattern = Box::new(pattern);
                    pattern.rewind();
                    self.expanded = Some(pattern);
                }
                FnStep::Done => {
                    self.done = true;
                    return Ok(None);
                }
            }
        }
    }

    pub fn rewind(&mut self) {
        self.expanded = None;
        self.previous = None;
        self.call_index = 0;
        self.sub_index = 0;
        self.emitted = 0;
        self.done = false;
    }
}
