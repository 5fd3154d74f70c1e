//! Error types for pattern construction and evaluation.
//!
//! End of iteration is not an error: pattern `next()` calls return
//! `Ok(None)` when a generator's bounds are exhausted. The variants here
//! cover genuine faults — a malformed pattern tree or a configuration that
//! can never be satisfied — and abort the enclosing generation step.

use std::fmt;

/// A fault raised while building or evaluating a pattern tree.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternError {
    /// A variable referenced a loop level that is not currently bound.
    UnboundVariable {
        /// Relative depth the variable asked for.
        depth: usize,
        /// Number of loop frames that were actually bound.
        active: usize,
    },
    /// Contradictory or malformed configuration, detected at construction.
    InvalidConfiguration(String),
}

impl PatternError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnboundVariable { depth, active } => write!(
                f,
                "unbound variable: depth {depth} with {active} active frame(s)"
            ),
            Self::InvalidConfiguration(message) => {
                write!(f, "invalid configuration: {message}")
            }
        }
    }
}

impl std::error::Error for PatternError {}
