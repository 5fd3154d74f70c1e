//! Variables — deferred references resolved against the loop scope.
//!
//! A variable is created by the pattern builder and read-only afterwards.
//! Implicit variables resolve at emission time against the frames a
//! [`ForEach`](super::ForEach) has bound: by relative depth (0 is the
//! immediately enclosing loop, deeper indices wrap around the active
//! levels), by a random active level, or by capturing all active levels at
//! once.

use rand::Rng;

use super::element::Value;
use super::scope::Scope;
use crate::error::PatternError;

#[derive(Debug, Clone, PartialEq)]
enum Binding {
    /// An explicit value, independent of any loop.
    Bound(Value),
    /// The enclosing loop value at this relative depth.
    Depth(usize),
    /// A uniformly chosen active loop value.
    Random,
    /// Every active loop value, outermost first.
    All,
}

/// A named reference inside a pattern's element list.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    binding: Binding,
}

impl Variable {
    /// A variable carrying its own value.
    pub fn bound(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            binding: Binding::Bound(value),
        }
    }

    /// An implicit variable at a relative loop depth; 0 is the immediately
    /// enclosing loop.
    pub fn depth(depth: usize) -> Self {
        Self {
            name: format!("${depth}"),
            binding: Binding::Depth(depth),
        }
    }

    /// An implicit variable drawing a random active loop value.
    pub fn random() -> Self {
        Self {
            name: "$?".into(),
            binding: Binding::Random,
        }
    }

    /// An implicit variable capturing every active loop value.
    pub fn all() -> Self {
        Self {
            name: "$*".into(),
            binding: Binding::All,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve against the currently bound loop frames.
    pub fn resolve(&self, scope: &mut Scope) -> Result<Value, PatternError> {
        match &self.binding {
            Binding::Bound(value) => Ok(value.clone()),
            Binding::Depth(depth) => {
                let active = scope.frames().len();
                if active == 0 {
                    return Err(PatternError::UnboundVariable {
                        depth: *depth,
                        active: 0,
                    });
                }
                // Depths wrap around the active levels, so an over-deep
                // reference lands on an established frame instead of failing.
                let index = active - 1 - (depth % active);
                Ok(scope.frames()[index].clone())
            }
            Binding::Random => {
                let active = scope.frames().len();
                if active == 0 {
                    return Err(PatternError::UnboundVariable {
                        depth: 0,
                        active: 0,
                    });
                }
                let index = scope.rng().gen_range(0..active);
                Ok(scope.frames()[index].clone())
            }
            Binding::All => Ok(Value::List(scope.frames().to_vec())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope_with(values: &[f64]) -> Scope {
        let mut scope = Scope::with_seed(1);
        for &v in values {
            scope.push_frame(Value::Number(v));
        }
        scope
    }

    #[test]
    fn bound_resolves_to_its_value() {
        let mut scope = scope_with(&[]);
        let v = Variable::bound("root", Value::Number(60.0));
        assert_eq!(v.resolve(&mut scope).unwrap(), Value::Number(60.0));
    }

    #[test]
    fn depth_zero_is_innermost_frame() {
        let mut scope = scope_with(&[1.0, 2.0, 3.0]);
        assert_eq!(
            Variable::depth(0).resolve(&mut scope).unwrap(),
            Value::Number(3.0)
        );
        assert_eq!(
            Variable::depth(2).resolve(&mut scope).unwrap(),
            Value::Number(1.0)
        );
    }

    #[test]
    fn out_of_range_depth_wraps() {
        let mut scope = scope_with(&[1.0, 2.0]);
        // depth 2 wraps to depth 0 with two active frames.
        assert_eq!(
            Variable::depth(2).resolve(&mut scope).unwrap(),
            Value::Number(2.0)
        );
        assert_eq!(
            Variable::depth(5).resolve(&mut scope).unwrap(),
            Value::Number(1.0)
        );
    }

    #[test]
    fn depth_with_no_frames_is_unbound() {
        let mut scope = scope_with(&[]);
        assert_eq!(
            Variable::depth(0).resolve(&mut scope),
            Err(PatternError::UnboundVariable {
                depth: 0,
                active: 0
            })
        );
    }

    #[test]
    fn random_draws_only_active_frames() {
        let mut scope = scope_with(&[10.0, 20.0]);
        for _ in 0..32 {
            match Variable::random().resolve(&mut scope).unwrap() {
                Value::Number(n) => assert!(n == 10.0 || n == 20.0),
                other => panic!("unexpected value {other:?}"),
            }
        }
    }

    #[test]
    fn random_with_no_frames_is_unbound() {
        let mut scope = scope_with(&[]);
        assert!(Variable::random().resolve(&mut scope).is_err());
    }

    #[test]
    fn all_captures_outer_to_inner() {
        let mut scope = scope_with(&[1.0, 2.0]);
        assert_eq!(
            Variable::all().resolve(&mut scope).unwrap(),
            Value::List(vec![Value::Number(1.0), Value::Number(2.0)])
        );
    }
}
