//! Cipher keys: which map, which seed, how long a burn-in.
//!
//! Keys serialise with serde so they can live in a JSON file:
//!
//! ```json
//! {
//!   "rows":    { "map": { "kind": "logistic", "mu": 3.99 }, "seed": 0.1 },
//!   "columns": { "map": { "kind": "tent", "mu": 1.99 }, "seed": 0.2 },
//!   "pixels":  null
//! }
//! ```
//!
//! An absent stage (`None` / `null`) is skipped; there is no magic seed value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::diffusion;
use crate::error::{ChaosError, Result};
use crate::map::ChaoticMap;
use crate::permutation::{Permutation, PermutationGenerator, DEFAULT_TRANSIENT};

fn default_transient() -> usize {
    DEFAULT_TRANSIENT
}

/// One chaotic key: a map, a seed in its domain, and a burn-in length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChaosKey {
    pub map: ChaoticMap,
    pub seed: f64,
    #[serde(default = "default_transient")]
    pub transient: usize,
}

impl ChaosKey {
    pub fn new(map: ChaoticMap, seed: f64) -> Self {
        Self {
            map,
            seed,
            transient: DEFAULT_TRANSIENT,
        }
    }

    pub fn with_transient(mut self, transient: usize) -> Self {
        self.transient = transient;
        self
    }

    pub fn generator(&self) -> PermutationGenerator {
        PermutationGenerator::new(self.map).with_transient(self.transient)
    }

    pub fn permutation(&self, size: usize) -> Result<Permutation> {
        self.generator().generate(self.seed, size)
    }

    pub fn keystream(&self, len: usize) -> Result<Vec<u8>> {
        diffusion::keystream_with_transient(self.map, self.seed, self.transient, len)
    }
}

impl fmt::Display for ChaosKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.map, self.seed)?;
        if self.transient != DEFAULT_TRANSIENT {
            write!(f, "/{}", self.transient)?;
        }
        Ok(())
    }
}

/// Parses `<map>@<seed>[/<transient>]`, e.g. `logistic:3.99@0.1` or `tent@0.2/500`.
impl FromStr for ChaosKey {
    type Err = ChaosError;

    fn from_str(s: &str) -> Result<Self> {
        let (map, rest) = s.split_once('@').ok_or_else(|| ChaosError::InvalidMapParameter {
            map: "key",
            detail: format!("expected <map>@<seed>, got {s:?}"),
        })?;
        let (seed, transient) = match rest.split_once('/') {
            Some((seed, transient)) => (seed, Some(transient)),
            None => (rest, None),
        };
        let map: ChaoticMap = map.parse()?;
        let seed: f64 = seed.trim().parse().map_err(|_| ChaosError::InvalidSeed {
            map: map.name(),
            seed: f64::NAN,
        })?;
        let mut key = ChaosKey::new(map, seed);
        if let Some(t) = transient {
            key.transient = t.trim().parse().map_err(|_| ChaosError::InvalidMapParameter {
                map: "key",
                detail: format!("cannot parse transient {t:?}"),
            })?;
        }
        map.validate_seed(seed)?;
        Ok(key)
    }
}

/// Keys for the composed image cipher. Each stage is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageKey {
    /// Row permutation over `0..height`.
    #[serde(default)]
    pub rows: Option<ChaosKey>,
    /// Column permutation over `0..width`.
    #[serde(default)]
    pub columns: Option<ChaosKey>,
    /// Pixel diffusion keystream.
    #[serde(default)]
    pub pixels: Option<ChaosKey>,
}

impl ImageKey {
    pub fn is_spatial(&self) -> bool {
        self.rows.is_some() || self.columns.is_some()
    }

    /// Permutation for one axis; identity when the axis has no key.
    pub fn axis_permutation(key: Option<&ChaosKey>, len: usize) -> Result<Permutation> {
        match key {
            Some(key) => key.permutation(len),
            None => Ok(Permutation::identity(len)),
        }
    }
}
