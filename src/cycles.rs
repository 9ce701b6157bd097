//! Cycle structure and multiplicative order of permutations.
//!
//! Following `i -> perm[i]` from every unvisited index partitions `0..N`
//! into disjoint cycles. The order of the permutation, the number of
//! applications that returns any arrangement to itself, is the LCM of the
//! cycle lengths. It grows super-polynomially in `N`, so it is computed as a
//! [`BigUint`] from the largest prime power dividing each length.

use std::collections::BTreeMap;

use num_bigint::BigUint;
use num_traits::One;
use serde::Serialize;

use crate::permutation::Permutation;

/// Cycle lengths of a permutation, in the order their smallest index appears.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CycleDecomposition {
    lengths: Vec<usize>,
}

impl CycleDecomposition {
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    pub fn cycle_count(&self) -> usize {
        self.lengths.len()
    }

    /// Sum of the cycle lengths; equals the permutation length.
    pub fn total_len(&self) -> usize {
        self.lengths.iter().sum()
    }

    pub fn fixed_points(&self) -> usize {
        self.lengths.iter().filter(|&&l| l == 1).count()
    }

    /// Cycle length -> number of cycles with that length.
    pub fn histogram(&self) -> BTreeMap<usize, usize> {
        let mut counts = BTreeMap::new();
        for &l in &self.lengths {
            *counts.entry(l).or_insert(0) += 1;
        }
        counts
    }

    pub fn order(&self) -> BigUint {
        order(self)
    }
}

pub fn decompose(perm: &Permutation) -> CycleDecomposition {
    let targets = perm.as_slice();
    let mut visited = vec![false; targets.len()];
    let mut lengths = Vec::new();
    for start in 0..targets.len() {
        if visited[start] {
            continue;
        }
        let mut len = 0;
        let mut j = start;
        while !visited[j] {
            visited[j] = true;
            j = targets[j];
            len += 1;
        }
        lengths.push(len);
    }
    CycleDecomposition { lengths }
}

/// LCM of all cycle lengths; `1` for an empty decomposition.
pub fn order(decomposition: &CycleDecomposition) -> BigUint {
    let mut max_power: BTreeMap<usize, u32> = BTreeMap::new();
    for &len in decomposition.lengths() {
        for (p, e) in factorize(len) {
            let slot = max_power.entry(p).or_insert(0);
            *slot = (*slot).max(e);
        }
    }
    max_power
        .into_iter()
        .fold(BigUint::one(), |acc, (p, e)| acc * BigUint::from(p).pow(e))
}

/// Trial-division factorisation; cycle lengths never exceed `N`.
fn factorize(mut n: usize) -> Vec<(usize, u32)> {
    let mut factors = Vec::new();
    let mut p = 2;
    while p * p <= n {
        if n % p == 0 {
            let mut e = 0;
            while n % p == 0 {
                n /= p;
                e += 1;
            }
            factors.push((p, e));
        }
        p += 1;
    }
    if n > 1 {
        factors.push((n, 1));
    }
    factors
}
