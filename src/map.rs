//! Chaotic scalar maps
//! ===================
//! A closed family of one-dimensional recurrences `x' = f(x)`:
//!
//! * **Logistic** `x' = μ·x·(1−x)` on `[0,1]`, chaotic near `μ≈3.99`.
//! * **Chebyshev** `x' = cos(n·arccos x)` on `[-1,1]`.
//! * **Tent** `x' = μ·min(x, 1−x)` on `[0,1]`, chaotic near `μ≈2`.
//!
//! Maps are plain values: no state, no identity beyond tag and parameter.
//! Iteration state lives in [`Trajectory`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChaosError, Result};

pub const DEFAULT_LOGISTIC_MU: f64 = 3.99;
pub const DEFAULT_CHEBYSHEV_N: u32 = 3;
pub const DEFAULT_TENT_MU: f64 = 1.99;

/// Seeds closer than this to a rejected point count as that point.
const FIXED_POINT_TOLERANCE: f64 = 1e-12;

/// A parameterised chaotic map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChaoticMap {
    Logistic { mu: f64 },
    Chebyshev { n: u32 },
    Tent { mu: f64 },
}

impl Default for ChaoticMap {
    fn default() -> Self {
        Self::logistic()
    }
}

impl ChaoticMap {
    pub const fn logistic() -> Self {
        ChaoticMap::Logistic {
            mu: DEFAULT_LOGISTIC_MU,
        }
    }

    pub const fn chebyshev() -> Self {
        ChaoticMap::Chebyshev {
            n: DEFAULT_CHEBYSHEV_N,
        }
    }

    pub const fn tent() -> Self {
        ChaoticMap::Tent {
            mu: DEFAULT_TENT_MU,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            ChaoticMap::Logistic { .. } => "logistic",
            ChaoticMap::Chebyshev { .. } => "chebyshev",
            ChaoticMap::Tent { .. } => "tent",
        }
    }

    /// One step of the recurrence. Outside the declared domain the result is
    /// unspecified (possibly NaN); validate seeds with [`Self::validate_seed`].
    #[inline(always)]
    pub fn next(&self, x: f64) -> f64 {
        match *self {
            ChaoticMap::Logistic { mu } => mu * x * (1.0 - x),
            ChaoticMap::Chebyshev { n } => (f64::from(n) * x.acos()).cos(),
            ChaoticMap::Tent { mu } => mu * x.min(1.0 - x),
        }
    }

    /// Closed domain `(low, high)` the map sends into itself.
    pub const fn domain(&self) -> (f64, f64) {
        match self {
            ChaoticMap::Chebyshev { .. } => (-1.0, 1.0),
            ChaoticMap::Logistic { .. } | ChaoticMap::Tent { .. } => (0.0, 1.0),
        }
    }

    /// Checks the map parameter keeps iterates inside the domain.
    pub fn validate(&self) -> Result<()> {
        let invalid = |detail: String| -> Result<()> {
            Err(ChaosError::InvalidMapParameter {
                map: self.name(),
                detail,
            })
        };
        match *self {
            ChaoticMap::Logistic { mu } if !(mu.is_finite() && mu > 0.0 && mu <= 4.0) => {
                invalid(format!("mu must lie in (0, 4], got {mu}"))
            }
            ChaoticMap::Tent { mu } if !(mu.is_finite() && mu > 0.0 && mu <= 2.0) => {
                invalid(format!("mu must lie in (0, 2], got {mu}"))
            }
            ChaoticMap::Chebyshev { n } if n < 1 => invalid(format!("n must be >= 1, got {n}")),
            _ => Ok(()),
        }
    }

    /// Validates the parameter, then the seed: it must be finite, strictly
    /// inside the domain, and not one of the points that pin the orbit.
    pub fn validate_seed(&self, seed: f64) -> Result<()> {
        self.validate()?;
        let (low, high) = self.domain();
        let near = |point: f64| (seed - point).abs() <= FIXED_POINT_TOLERANCE;
        let degenerate = match *self {
            ChaoticMap::Logistic { mu } => near(0.5) || near(1.0 - 1.0 / mu),
            ChaoticMap::Tent { mu } => near(0.5) || near(mu / (1.0 + mu)),
            ChaoticMap::Chebyshev { .. } => near(0.0),
        };
        if !seed.is_finite() || seed <= low || seed >= high || degenerate {
            return Err(ChaosError::InvalidSeed {
                map: self.name(),
                seed,
            });
        }
        Ok(())
    }

    /// Quantises a domain value to a keystream byte: `floor(x·255)` on
    /// `[0,1]`, `floor(((x+1)/2)·255)` on `[-1,1]`.
    #[inline(always)]
    pub fn quantize(&self, x: f64) -> u8 {
        match self {
            ChaoticMap::Chebyshev { .. } => (((x + 1.0) / 2.0) * 255.0) as u8,
            ChaoticMap::Logistic { .. } | ChaoticMap::Tent { .. } => (x * 255.0) as u8,
        }
    }

    /// Unvalidated orbit starting at `seed`.
    pub fn trajectory(&self, seed: f64) -> Trajectory {
        Trajectory {
            map: *self,
            state: seed,
        }
    }
}

impl fmt::Display for ChaoticMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChaoticMap::Logistic { mu } | ChaoticMap::Tent { mu } => {
                write!(f, "{}:{}", self.name(), mu)
            }
            ChaoticMap::Chebyshev { n } => write!(f, "{}:{}", self.name(), n),
        }
    }
}

/// Parses `logistic`, `logistic:3.99`, `chebyshev:3`, `tent:1.99`.
/// A bare name selects the default parameter.
impl FromStr for ChaoticMap {
    type Err = ChaosError;

    fn from_str(s: &str) -> Result<Self> {
        let (name, param) = match s.trim().split_once(':') {
            Some((name, param)) => (name.trim(), Some(param.trim())),
            None => (s.trim(), None),
        };
        let bad = |map: &'static str, param: &str| ChaosError::InvalidMapParameter {
            map,
            detail: format!("cannot parse {param:?}"),
        };
        let map = match name.to_ascii_lowercase().as_str() {
            "logistic" => match param {
                None => ChaoticMap::logistic(),
                Some(p) => ChaoticMap::Logistic {
                    mu: p.parse().map_err(|_| bad("logistic", p))?,
                },
            },
            "chebyshev" => match param {
                None => ChaoticMap::chebyshev(),
                Some(p) => ChaoticMap::Chebyshev {
                    n: p.parse().map_err(|_| bad("chebyshev", p))?,
                },
            },
            "tent" => match param {
                None => ChaoticMap::tent(),
                Some(p) => ChaoticMap::Tent {
                    mu: p.parse().map_err(|_| bad("tent", p))?,
                },
            },
            other => {
                return Err(ChaosError::InvalidMapParameter {
                    map: "map",
                    detail: format!("unknown map {other:?}"),
                })
            }
        };
        map.validate()?;
        Ok(map)
    }
}

/// Orbit of a map. Each `next()` applies the recurrence once and yields the
/// new value; the starting seed itself is never yielded.
#[derive(Debug, Clone)]
pub struct Trajectory {
    map: ChaoticMap,
    state: f64,
}

impl Trajectory {
    /// Advances `iterations` steps, discarding the values.
    pub fn burn_in(mut self, iterations: usize) -> Self {
        for _ in 0..iterations {
            self.state = self.map.next(self.state);
        }
        self
    }

    /// Most recently produced value (the seed before the first step).
    pub fn state(&self) -> f64 {
        self.state
    }
}

impl Iterator for Trajectory {
    type Item = f64;

    #[inline(always)]
    fn next(&mut self) -> Option<f64> {
        self.state = self.map.next(self.state);
        Some(self.state)
    }
}
