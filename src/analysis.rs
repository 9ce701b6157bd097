//! Permutation quality diagnostics.
//!
//! Nothing here affects cipher correctness. A [`CycleReport`] describes the
//! cycle structure of a single generated permutation; [`sweep`] averages the
//! order over many random seeds for a range of sizes, which is how the maps
//! are compared against each other.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::cycles::{decompose, CycleDecomposition};
use crate::error::{ChaosError, Result};
use crate::key::ChaosKey;
use crate::map::ChaoticMap;
use crate::permutation::{PermutationGenerator, DEFAULT_TRANSIENT};

fn as_decimal<S: Serializer>(
    value: &BigUint,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Cycle structure of one generated permutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    pub key: ChaosKey,
    pub size: usize,
    /// Cycle length -> count.
    pub cycles: BTreeMap<usize, usize>,
    pub cycle_count: usize,
    #[serde(serialize_with = "as_decimal")]
    pub order: BigUint,
    #[serde(skip)]
    decomposition: CycleDecomposition,
}

impl CycleReport {
    pub fn new(key: &ChaosKey, size: usize) -> Result<Self> {
        let perm = key.permutation(size)?;
        let decomposition = decompose(&perm);
        Ok(Self {
            key: *key,
            size,
            cycles: decomposition.histogram(),
            cycle_count: decomposition.cycle_count(),
            order: decomposition.order(),
            decomposition,
        })
    }

    pub fn decomposition(&self) -> &CycleDecomposition {
        &self.decomposition
    }
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} map, seed {} (permutation size: {})",
            self.key.map, self.key.seed, self.size
        )?;
        writeln!(f, "{}", "-".repeat(50))?;
        writeln!(f, "cycle structure:")?;
        for (length, count) in &self.cycles {
            writeln!(f, "  {count} cycle(s) of length {length}")?;
        }
        writeln!(f, "total cycles: {}", self.cycle_count)?;
        writeln!(f, "order (lcm of cycle lengths): {}", self.order)?;
        write!(f, "{}", "-".repeat(50))
    }
}

/// Parameters of an order sweep over permutation sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub min_size: usize,
    pub max_size: usize,
    pub step: usize,
    pub seeds_per_size: usize,
    pub transient: usize,
    /// Seeds are drawn uniformly from `[seed_low, seed_high)`.
    pub seed_low: f64,
    pub seed_high: f64,
    /// Seed of the RNG that draws the map seeds.
    pub rng_seed: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            min_size: 50,
            max_size: 1000,
            step: 50,
            seeds_per_size: 100,
            transient: DEFAULT_TRANSIENT,
            seed_low: 0.1,
            seed_high: 0.9,
            rng_seed: 0,
        }
    }
}

impl SweepConfig {
    pub fn sizes(&self) -> impl Iterator<Item = usize> {
        (self.min_size..=self.max_size).step_by(self.step.max(1))
    }

    fn validate(&self) -> Result<()> {
        for size in [self.min_size, self.step, self.seeds_per_size] {
            if size < 1 {
                return Err(ChaosError::InvalidSize { size });
            }
        }
        if self.max_size < self.min_size {
            return Err(ChaosError::InvalidSize {
                size: self.max_size,
            });
        }
        if !(self.seed_low < self.seed_high) {
            return Err(ChaosError::InvalidSeed {
                map: "sweep",
                seed: self.seed_high,
            });
        }
        Ok(())
    }
}

/// Averages for one permutation size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub size: usize,
    pub mean_order: f64,
    /// `20·log10(mean_order)`.
    pub mean_order_db: f64,
    pub mean_generation_ms: f64,
}

/// Mean order and generation time per size, over random seeds.
///
/// Seeds are drawn up front from a `StdRng` seeded with
/// `config.rng_seed`, so the sweep is repeatable; the per-seed generations
/// are independent and run in parallel under the `parallel` feature.
pub fn sweep(map: ChaoticMap, config: &SweepConfig) -> Result<Vec<SweepPoint>> {
    config.validate()?;
    map.validate()?;
    let generator = PermutationGenerator::new(map).with_transient(config.transient);
    let mut rng = StdRng::seed_from_u64(config.rng_seed);

    let mut points = Vec::new();
    for size in config.sizes() {
        let seeds: Vec<f64> = (0..config.seeds_per_size)
            .map(|_| rng.gen_range(config.seed_low..config.seed_high))
            .collect();

        #[cfg(feature = "parallel")]
        let samples = seeds
            .par_iter()
            .map(|&seed| measure(&generator, seed, size))
            .collect::<Result<Vec<_>>>()?;
        #[cfg(not(feature = "parallel"))]
        let samples = seeds
            .iter()
            .map(|&seed| measure(&generator, seed, size))
            .collect::<Result<Vec<_>>>()?;

        let n = samples.len() as f64;
        let mean_order = samples.iter().map(|(order, _)| order).sum::<f64>() / n;
        let mean_generation_ms = samples.iter().map(|(_, ms)| ms).sum::<f64>() / n;
        let point = SweepPoint {
            size,
            mean_order,
            mean_order_db: to_db(mean_order),
            mean_generation_ms,
        };
        debug!(
            map = %map,
            size,
            mean_order = point.mean_order,
            mean_generation_ms = point.mean_generation_ms,
            "sweep point"
        );
        points.push(point);
    }
    Ok(points)
}

/// (order, generation time in ms) for one seed.
fn measure(generator: &PermutationGenerator, seed: f64, size: usize) -> Result<(f64, f64)> {
    let start = Instant::now();
    let perm = generator.generate(seed, size)?;
    let elapsed = start.elapsed().as_secs_f64() * 1000.0;
    let order = decompose(&perm).order().to_f64().unwrap_or(f64::INFINITY);
    Ok((order, elapsed))
}

fn to_db(value: f64) -> f64 {
    if value > 0.0 {
        20.0 * value.log10()
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SweepConfig {
        SweepConfig {
            min_size: 10,
            max_size: 40,
            step: 10,
            seeds_per_size: 5,
            rng_seed: 7,
            ..SweepConfig::default()
        }
    }

    #[test]
    fn report_for_golden_permutation() {
        let report = CycleReport::new(&ChaosKey::new(ChaoticMap::logistic(), 0.1), 10).unwrap();
        assert_eq!(report.cycles.clone().into_iter().collect::<Vec<_>>(), vec![(1, 1), (9, 1)]);
        assert_eq!(report.cycle_count, 2);
        assert_eq!(report.order, BigUint::from(9u32));
        assert_eq!(report.decomposition().total_len(), 10);
    }

    #[test]
    fn report_display_and_json() {
        let report = CycleReport::new(&ChaosKey::new(ChaoticMap::logistic(), 0.1), 10).unwrap();
        let text = report.to_string();
        assert!(text.contains("1 cycle(s) of length 9"));
        assert!(text.contains("order (lcm of cycle lengths): 9"));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["order"], "9");
        assert_eq!(json["cycles"]["9"], 1);
    }

    #[test]
    fn sweep_covers_requested_sizes() {
        let points = sweep(ChaoticMap::logistic(), &small_config()).unwrap();
        let sizes: Vec<_> = points.iter().map(|p| p.size).collect();
        assert_eq!(sizes, vec![10, 20, 30, 40]);
        for p in &points {
            assert!(p.mean_order >= 1.0);
            assert!((p.mean_order_db - 20.0 * p.mean_order.log10()).abs() < 1e-9);
        }
    }

    #[test]
    fn sweep_is_repeatable() {
        let a = sweep(ChaoticMap::tent(), &small_config()).unwrap();
        let b = sweep(ChaoticMap::tent(), &small_config()).unwrap();
        let orders = |pts: &[SweepPoint]| pts.iter().map(|p| p.mean_order).collect::<Vec<_>>();
        assert_eq!(orders(&a), orders(&b));
    }

    #[test]
    fn sweep_rejects_bad_config() {
        let mut config = small_config();
        config.step = 0;
        assert!(sweep(ChaoticMap::logistic(), &config).is_err());
        let mut config = small_config();
        config.max_size = 5;
        assert!(sweep(ChaoticMap::logistic(), &config).is_err());
        let mut config = small_config();
        config.seed_low = 0.9;
        assert!(sweep(ChaoticMap::logistic(), &config).is_err());
    }

    #[test]
    fn db_of_one_is_zero() {
        assert_eq!(to_db(1.0), 0.0);
        assert!((to_db(100.0) - 40.0).abs() < 1e-12);
    }
}
