//! Chaotic permutations
//! ====================
//! A trajectory of a [`ChaoticMap`] is turned into a bijection of `0..N` by
//! ranking: after a discarded burn-in of `transient` steps the next `N`
//! values are kept, and position `i` is assigned the rank of value `i` in
//! ascending order. Ties keep their original order, so the result is always
//! a bijection whatever the floating-point values are.
//!
//! ```
//! use chaosperm::{ChaoticMap, PermutationGenerator};
//!
//! let perm = PermutationGenerator::new(ChaoticMap::logistic())
//!     .generate(0.1, 10)
//!     .unwrap();
//! assert_eq!(perm.as_slice(), &[1, 5, 9, 0, 4, 8, 2, 6, 7, 3]);
//! ```

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::{ChaosError, Result};
use crate::map::ChaoticMap;

/// Default number of discarded iterations before sampling.
pub const DEFAULT_TRANSIENT: usize = 1000;

/// Longest period the degeneracy check looks back over.
pub const DEGENERATE_WINDOW: usize = 16;

/// Two retained values this close are treated as a repeat.
pub const DEGENERATE_TOLERANCE: f64 = 1e-12;

/// A bijection of `0..len()`; `perm[i]` is where position `i` goes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Permutation(Vec<usize>);

impl Permutation {
    pub fn identity(len: usize) -> Self {
        Permutation((0..len).collect())
    }

    /// Accepts `targets` only if it covers every index in `0..len` exactly once.
    pub fn from_vec(targets: Vec<usize>) -> Result<Self> {
        let n = targets.len();
        let mut seen = vec![false; n];
        for (i, &t) in targets.iter().enumerate() {
            if t >= n {
                return Err(ChaosError::NotAPermutation {
                    detail: format!("entry {i} maps to {t}, outside 0..{n}"),
                });
            }
            if std::mem::replace(&mut seen[t], true) {
                return Err(ChaosError::NotAPermutation {
                    detail: format!("target {t} appears more than once"),
                });
            }
        }
        Ok(Permutation(targets))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.0
    }

    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(i, &t)| i == t)
    }

    /// `inv[perm[i]] = i`.
    pub fn inverse(&self) -> Self {
        let mut inv = vec![0; self.0.len()];
        for (i, &t) in self.0.iter().enumerate() {
            inv[t] = i;
        }
        Permutation(inv)
    }

    /// Applies `first`, then `self`: `result[i] = self[first[i]]`.
    pub fn after(&self, first: &Permutation) -> Result<Self> {
        check_len(self.len(), first.len())?;
        Ok(Permutation(first.0.iter().map(|&t| self.0[t]).collect()))
    }

    /// `self` composed with itself `k` times (`k = 0` is the identity).
    pub fn pow(&self, mut k: u64) -> Self {
        let mut result = Permutation::identity(self.len());
        let mut base = self.clone();
        while k > 0 {
            if k & 1 == 1 {
                result = Permutation(result.0.iter().map(|&t| base.0[t]).collect());
            }
            base = Permutation(base.0.iter().map(|&t| base.0[t]).collect());
            k >>= 1;
        }
        result
    }

    /// Moves each item to the position the permutation sends it to:
    /// `out[perm[i]] = items[i]`.
    pub fn relocate<T: Clone>(&self, items: &[T]) -> Result<Vec<T>> {
        check_len(self.len(), items.len())?;
        Ok(self.inverse().gather(items))
    }

    /// `out[i] = items[perm[i]]`. Lengths must already agree.
    pub(crate) fn gather<T: Clone>(&self, items: &[T]) -> Vec<T> {
        self.0.iter().map(|&src| items[src].clone()).collect()
    }
}

impl TryFrom<Vec<usize>> for Permutation {
    type Error = ChaosError;

    fn try_from(targets: Vec<usize>) -> Result<Self> {
        Permutation::from_vec(targets)
    }
}

impl From<Permutation> for Vec<usize> {
    fn from(perm: Permutation) -> Self {
        perm.0
    }
}

impl AsRef<[usize]> for Permutation {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

impl Index<usize> for Permutation {
    type Output = usize;

    fn index(&self, i: usize) -> &usize {
        &self.0[i]
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

pub(crate) fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(ChaosError::LengthMismatch { expected, actual });
    }
    Ok(())
}

/// Drives a [`ChaoticMap`] to produce permutations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PermutationGenerator {
    map: ChaoticMap,
    transient: usize,
}

impl PermutationGenerator {
    pub fn new(map: ChaoticMap) -> Self {
        Self {
            map,
            transient: DEFAULT_TRANSIENT,
        }
    }

    pub fn with_transient(mut self, transient: usize) -> Self {
        self.transient = transient;
        self
    }

    pub fn map(&self) -> ChaoticMap {
        self.map
    }

    pub fn transient(&self) -> usize {
        self.transient
    }

    /// The `size` values retained after burn-in. The first one is the value
    /// produced by the first post-burn-in step.
    pub fn trajectory(&self, seed: f64, size: usize) -> Result<Vec<f64>> {
        if size < 1 {
            return Err(ChaosError::InvalidSize { size });
        }
        self.map.validate_seed(seed)?;
        let values: Vec<f64> = self
            .map
            .trajectory(seed)
            .burn_in(self.transient)
            .take(size)
            .collect();
        detect_degenerate(self.map, &values)?;
        Ok(values)
    }

    pub fn generate(&self, seed: f64, size: usize) -> Result<Permutation> {
        Ok(rank(&self.trajectory(seed, size)?))
    }
}

/// Free-function form of [`PermutationGenerator::generate`].
pub fn generate(map: ChaoticMap, seed: f64, size: usize, transient: usize) -> Result<Permutation> {
    PermutationGenerator::new(map)
        .with_transient(transient)
        .generate(seed, size)
}

/// 0-based rank of every value in ascending order, ties by position.
pub fn rank(values: &[f64]) -> Permutation {
    let mut order: Vec<usize> = (0..values.len()).collect();
    // `sort_by` is stable, which fixes the tie-break.
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    let mut ranks = vec![0; values.len()];
    for (r, &i) in order.iter().enumerate() {
        ranks[i] = r;
    }
    Permutation(ranks)
}

/// Fails if any value repeats one of the previous [`DEGENERATE_WINDOW`]
/// values to within [`DEGENERATE_TOLERANCE`].
pub(crate) fn detect_degenerate(map: ChaoticMap, values: &[f64]) -> Result<()> {
    for (k, &x) in values.iter().enumerate().skip(1) {
        for period in 1..=DEGENERATE_WINDOW.min(k) {
            if (x - values[k - period]).abs() <= DEGENERATE_TOLERANCE {
                return Err(ChaosError::DegenerateSequence {
                    map: map.name(),
                    index: k,
                    period,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn is_bijection(perm: &Permutation) -> bool {
        let mut sorted = perm.as_slice().to_vec();
        sorted.sort_unstable();
        sorted == (0..perm.len()).collect::<Vec<_>>()
    }

    #[test]
    fn logistic_golden_ten() {
        let perm = generate(ChaoticMap::logistic(), 0.1, 10, DEFAULT_TRANSIENT).unwrap();
        assert_eq!(perm.as_slice(), &[1, 5, 9, 0, 4, 8, 2, 6, 7, 3]);
    }

    #[test]
    fn tent_golden_ten() {
        let perm = generate(ChaoticMap::tent(), 0.1, 10, DEFAULT_TRANSIENT).unwrap();
        assert_eq!(perm.as_slice(), &[8, 4, 7, 5, 9, 0, 1, 2, 3, 6]);
    }

    #[test]
    fn single_element_is_identity() {
        let perm = generate(ChaoticMap::logistic(), 0.1, 1, DEFAULT_TRANSIENT).unwrap();
        assert_eq!(perm.as_slice(), &[0]);
    }

    #[test]
    fn trajectory_starts_after_burn_in() {
        let map = ChaoticMap::logistic();
        let values = PermutationGenerator::new(map)
            .with_transient(3)
            .trajectory(0.1, 2)
            .unwrap();
        let mut x = 0.1;
        for _ in 0..4 {
            x = map.next(x);
        }
        assert_eq!(values[0], x);
        assert_eq!(values[1], map.next(x));
    }

    #[test]
    fn every_map_yields_bijections() {
        for map in [ChaoticMap::logistic(), ChaoticMap::chebyshev(), ChaoticMap::tent()] {
            for &size in &[2usize, 17, 256, 1000] {
                let perm = generate(map, 0.3, size, DEFAULT_TRANSIENT).unwrap();
                assert!(is_bijection(&perm), "{map} size {size}");
            }
        }
    }

    #[test]
    fn generation_is_reproducible() {
        let g = PermutationGenerator::new(ChaoticMap::chebyshev()).with_transient(250);
        assert_eq!(g.generate(0.42, 300).unwrap(), g.generate(0.42, 300).unwrap());
    }

    #[test]
    fn rank_breaks_ties_by_position() {
        let perm = rank(&[0.5, 0.1, 0.5, 0.1]);
        assert_eq!(perm.as_slice(), &[2, 0, 3, 1]);
    }

    #[test]
    fn rejects_zero_size() {
        assert_eq!(
            generate(ChaoticMap::logistic(), 0.1, 0, DEFAULT_TRANSIENT),
            Err(ChaosError::InvalidSize { size: 0 })
        );
    }

    #[test]
    fn rejects_zero_seed() {
        let err = generate(ChaoticMap::logistic(), 0.0, 10, DEFAULT_TRANSIENT).unwrap_err();
        assert!(matches!(err, ChaosError::InvalidSeed { .. }));
    }

    #[test]
    fn tent_at_two_collapses() {
        // mu = 2 doubles the mantissa away and lands on 0.0.
        let err = generate(ChaoticMap::Tent { mu: 2.0 }, 0.1, 10, DEFAULT_TRANSIENT).unwrap_err();
        assert!(matches!(err, ChaosError::DegenerateSequence { period: 1, .. }));
    }

    #[test]
    fn chebyshev_order_one_is_degenerate() {
        let err = generate(ChaoticMap::Chebyshev { n: 1 }, 0.3, 10, DEFAULT_TRANSIENT).unwrap_err();
        assert!(matches!(err, ChaosError::DegenerateSequence { .. }));
    }

    #[test]
    fn from_vec_validates() {
        assert!(Permutation::from_vec(vec![2, 0, 1]).is_ok());
        assert!(Permutation::from_vec(vec![0, 0, 1]).is_err());
        assert!(Permutation::from_vec(vec![0, 3, 1]).is_err());
        assert!(Permutation::from_vec(vec![]).is_ok());
    }

    #[test]
    fn inverse_undoes() {
        let p = Permutation::from_vec(vec![3, 0, 4, 1, 2]).unwrap();
        assert!(p.inverse().after(&p).unwrap().is_identity());
        assert!(p.after(&p.inverse()).unwrap().is_identity());
    }

    #[test]
    fn relocate_moves_items_forward() {
        let p = Permutation::from_vec(vec![2, 0, 1]).unwrap();
        assert_eq!(p.relocate(&['a', 'b', 'c']).unwrap(), vec!['b', 'c', 'a']);
        assert_eq!(
            p.relocate(&[1, 2]),
            Err(ChaosError::LengthMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn pow_matches_repeated_composition() {
        let p = generate(ChaoticMap::logistic(), 0.2, 12, DEFAULT_TRANSIENT).unwrap();
        let mut manual = Permutation::identity(12);
        for _ in 0..5 {
            manual = p.after(&manual).unwrap();
        }
        assert_eq!(p.pow(5), manual);
        assert!(p.pow(0).is_identity());
    }

    #[test]
    fn serde_checks_bijection() {
        let p: Permutation = serde_json::from_str("[1,0,2]").unwrap();
        assert_eq!(p.as_slice(), &[1, 0, 2]);
        assert!(serde_json::from_str::<Permutation>("[1,1,2]").is_err());
        assert_eq!(serde_json::to_string(&p).unwrap(), "[1,0,2]");
    }
}
