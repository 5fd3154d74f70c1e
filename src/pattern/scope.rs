//! Evaluation scope — the loop frame stack and the random source.
//!
//! A single `Scope` is threaded through every `next()` call of a pattern
//! tree. [`ForEach`](super::ForEach) pushes its bound loop values here so
//! variables inside nested patterns can see them, and every random decision
//! (a [`Choice`](super::Choice) draw, a "random" variable) pulls from the
//! scope's seeded `ChaCha8Rng`, so a seed makes a whole generation run
//! reproducible.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::element::Value;

/// Evaluation context passed down a pattern tree.
#[derive(Debug, Clone)]
pub struct Scope {
    frames: Vec<Value>,
    rng: ChaCha8Rng,
}

impl Scope {
    /// A scope with an OS-entropy random source.
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// A scope with a deterministic, seeded random source.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            frames: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// The currently bound loop values, outermost first.
    pub fn frames(&self) -> &[Value] {
        &self.frames
    }

    /// The random source for choice draws and random variables.
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Bind a loop frame. Callers must pop what they push.
    pub(crate) fn push_frame(&mut self, value: Value) {
        self.frames.push(value);
    }

    pub(crate) fn pop_frame(&mut self) {
        self.frames.pop();
    }

    /// Drop every bound frame.
    pub(crate) fn clear_frames(&mut self) {
        self.frames.clear();
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn seeded_scopes_agree() {
        let mut a = Scope::with_seed(42);
        let mut b = Scope::with_seed(42);
        let xs: Vec<u32> = (0..8).map(|_| a.rng().gen_range(0..100)).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.rng().gen_range(0..100)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn frames_push_and_pop() {
        let mut scope = Scope::with_seed(0);
        assert!(scope.frames().is_empty());
        scope.push_frame(Value::Number(1.0));
        scope.push_frame(Value::Number(2.0));
        assert_eq!(scope.frames().len(), 2);
        scope.pop_frame();
        assert_eq!(scope.frames(), &[Value::Number(1.0)]);
        scope.clear_frames();
        assert!(scope.frames().is_empty());
    }
}
