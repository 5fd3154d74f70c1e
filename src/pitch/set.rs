//! Pitch-class sets and their canonical orderings (musical set theory).

use serde::{Deserialize, Serialize};

use super::pitch_class::PitchClass;

/// An unordered set of distinct pitch classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchClassSet {
    /// Distinct members in ascending value order.
    classes: Vec<PitchClass>,
}

impl PitchClassSet {
    /// Build a set from any iterable of pitch classes; duplicates collapse.
    pub fn new(classes: impl IntoIterator<Item = PitchClass>) -> Self {
        let mut seen = [false; 12];
        let mut members = Vec::new();
        for pc in classes {
            if !seen[pc.value() as usize] {
                seen[pc.value() as usize] = true;
                members.push(pc);
            }
        }
        members.sort();
        Self { classes: members }
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Members in ascending value order.
    pub fn classes(&self) -> &[PitchClass] {
        &self.classes
    }

    /// The most compact rotation of the set.
    ///
    /// Among all rotations, picks the one with the smallest outer span;
    /// ties are broken by packing toward the bottom (smaller interval from
    /// the first member to each successively earlier member), and a final
    /// tie by the lowest starting pitch class.
    pub fn normal_order(&self) -> Vec<PitchClass> {
        let n = self.classes.len();
        if n <= 1 {
            return self.classes.clone();
        }

        let mut best: Option<(Vec<i32>, Vec<PitchClass>)> = None;
        for start in 0..n {
            let rotation: Vec<PitchClass> = (0..n)
                .map(|i| self.classes[(start + i) % n])
                .collect();
            let first = rotation[0].value() as i32;
            // Key: span first, then the interval to each earlier member,
            // then the starting class itself.
            let mut key: Vec<i32> = (1..n)
                .rev()
                .map(|i| (rotation[i].value() as i32 - first).rem_euclid(12))
                .collect();
            key.push(first);
            match &best {
                Some((best_key, _)) if *best_key <= key => {}
                _ => best = Some((key, rotation)),
            }
        }
        best.expect("non-empty set has a rotation").1
    }

    /// The normal order transposed to begin at 0, as semitone offsets.
    ///
    /// Two sets related by transposition share a normal form:
    /// a C major and a Db major triad both give `[0, 4, 7]`.
    pub fn normal_form(&self) -> Vec<u8> {
        let order = self.normal_order();
        match order.first() {
            None => Vec::new(),
            Some(first) => {
                let root = first.value() as i32;
                order
                    .iter()
                    .map(|pc| (pc.value() as i32 - root).rem_euclid(12) as u8)
                    .collect()
            }
        }
    }
}

impl FromIterator<PitchClass> for PitchClassSet {
    fn from_iter<I: IntoIterator<Item = PitchClass>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PitchClass as PC;

    #[test]
    fn duplicates_collapse() {
        let set = PitchClassSet::new([PC::C, PC::E, PC::C, PC::G, PC::E]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.classes(), &[PC::C, PC::E, PC::G]);
    }

    #[test]
    fn normal_order_minor_triad_shape() {
        let set = PitchClassSet::new([PC::E, PC::A, PC::C]);
        assert_eq!(set.normal_order(), vec![PC::A, PC::C, PC::E]);
    }

    #[test]
    fn normal_order_packs_left_on_span_tie() {
        let set = PitchClassSet::new([PC::C, PC::E, PC::AB, PC::A, PC::B]);
        assert_eq!(
            set.normal_order(),
            vec![PC::AB, PC::A, PC::B, PC::C, PC::E]
        );
    }

    #[test]
    fn normal_form_is_transposition_invariant() {
        let c_major = PitchClassSet::new([PC::C, PC::E, PC::G]);
        let db_major = PitchClassSet::new([PC::DB, PC::F, PC::AB]);
        assert_eq!(c_major.normal_form(), vec![0, 4, 7]);
        assert_eq!(db_major.normal_form(), vec![0, 4, 7]);
    }

    #[test]
    fn normal_form_minor_triad() {
        let c_minor = PitchClassSet::new([PC::C, PC::EB, PC::G]);
        assert_eq!(c_minor.normal_form(), vec![0, 3, 7]);
    }

    #[test]
    fn singleton_and_empty() {
        assert_eq!(PitchClassSet::new([PC::F]).normal_order(), vec![PC::F]);
        assert_eq!(PitchClassSet::new([PC::F]).normal_form(), vec![0]);
        assert!(PitchClassSet::new([]).normal_order().is_empty());
        assert!(PitchClassSet::new([]).normal_form().is_empty());
    }

    #[test]
    fn whole_tone_scale_starts_lowest() {
        // Perfectly symmetric set: every rotation has the same span, so the
        // final tie-break picks the lowest starting class.
        let set = PitchClassSet::new([PC::D, PC::E, PC::GB, PC::AB, PC::BB, PC::C]);
        assert_eq!(set.normal_order()[0], PC::C);
        assert_eq!(set.normal_form(), vec![0, 2, 4, 6, 8, 10]);
    }
}
