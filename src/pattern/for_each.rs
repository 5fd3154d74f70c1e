//! Nested-loop pattern combinator with cross-level variable capture.
//!
//! `ForEach` drives its sub-patterns as nested loops, outermost slowest:
//! for each value of `P0`, for each value of `P1` (with `P0`'s current
//! value visible), …, it yields the values of the innermost pattern. The
//! current value of every outer level is bound on the scope's frame stack
//! while inner levels run, which is what gives
//! [`Variable`](super::Variable)s something to resolve against.

use super::element::Value;
use super::scope::Scope;
use super::PatternNode;
use crate::error::PatternError;

/// Runs sub-patterns as nested loops, yielding the innermost values.
#[derive(Debug, Clone)]
pub struct ForEach {
    patterns: Vec<PatternNode>,
    /// Current value of each outer level, outermost first. Holds at most
    /// `patterns.len() - 1` entries; the innermost level's values are
    /// yielded, not bound.
    frames: Vec<Value>,
    done: bool,
}

impl ForEach {
    pub fn new(patterns: impl IntoIterator<Item = PatternNode>) -> Self {
        Self {
            patterns: patterns.into_iter().collect(),
            frames: Vec::new(),
            done: false,
        }
    }

    /// Number of loop levels.
    pub fn depth(&self) -> usize {
        self.patterns.len()
    }

    pub fn next(&mut self, scope: &mut Scope) -> Result<Option<Value>, PatternError> {
        if self.done || self.patterns.is_empty() {
            return Ok(None);
        }
        let innermost = self.patterns.len() - 1;
        loop {
            // Bind a frame for every outer level that lacks one. A missing
            // frame means that level starts a fresh pass (its pattern was
            // rewound when an outer level advanced).
            while self.frames.len() < innermost {
                let level = self.frames.len();
                match self.pull_level(level, scope)? {
                    Some(value) => self.frames.push(value),
                    None => {
                        if !self.advance_above(level, scope)? {
                            self.done = true;
                            return Ok(None);
                        }
                    }
                }
            }
            match self.pull_level(innermost, scope)? {
                Some(value) => return Ok(Some(value)),
                None => {
                    if !self.advance_above(innermost, scope)? {
                        self.done = true;
                        return Ok(None);
                    }
                }
            }
        }
    }

    /// Advance the nearest level outside `level` that still has values,
    /// rewinding everything inside it. Returns `false` once the outermost
    /// level is exhausted.
    fn advance_above(
        &mut self,
        mut level: usize,
        scope: &mut Scope,
    ) -> Result<bool, PatternError> {
        loop {
            if level == 0 {
                return Ok(false);
            }
            level -= 1;
            for inner in level + 1..self.patterns.len() {
                self.patterns[inner].rewind();
            }
            self.frames.truncate(level);
            if let Some(value) = self.pull_level(level, scope)? {
                self.frames.push(value);
                return Ok(true);
            }
        }
    }

    /// Pull the next value of one level with the outer frames visible.
    fn pull_level(
        &mut self,
        level: usize,
        scope: &mut Scope,
    ) -> Result<Option<Value>, PatternError> {
        let visible = level.min(self.frames.len());
        for frame in &self.frames[..visible] {
            scope.push_frame(frame.clone());
        }
        let result = self.patterns[level].next(scope);
        for _ in 0..visible {
            scope.pop_frame();
        }
        result
    }

    /// Reset every sub-pattern and the value stack.
    pub fn rewind(&mut self) {
        for pattern in &mut self.patterns {
            pattern.rewind();
        }
        self.frames.clear();
        self.done = false;
    }
}
