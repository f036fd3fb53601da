use serde::{Deserialize, Serialize};
use statrs::distribution::{Normal, Triangular, Uniform};

use crate::error::ReiError;
use crate::monte_carlo::rng::RandomSource;
use crate::ReiResult;

/// Fallback half-width of the derived [min, max] range, as a fraction of the
/// mean. Tunable policy carried over from the original tool, not a numerical
/// necessity.
const DEFAULT_RANGE_SPREAD: f64 = 0.2;

/// Fallback std-dev as a fraction of the mean when a Normal spec omits it.
const DEFAULT_STD_DEV_FRACTION: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionKind {
    Normal,
    Uniform,
    Triangular,
}

/// Declarative distribution for one simulated variable.
///
/// Only `mean` is mandatory; missing shape parameters fall back to policy
/// defaults (`std_dev = 0.1·mean`, range `mean ± 20%`, `mode = mean`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DistributionSpec {
    #[serde(rename = "type")]
    pub kind: DistributionKind,
    pub mean: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<f64>,
}

impl DistributionSpec {
    pub fn normal(mean: f64, std_dev: f64) -> Self {
        Self {
            kind: DistributionKind::Normal,
            mean,
            std_dev: Some(std_dev),
            min: None,
            max: None,
            mode: None,
        }
    }

    pub fn uniform(min: f64, max: f64) -> Self {
        Self {
            kind: DistributionKind::Uniform,
            mean: (min + max) / 2.0,
            std_dev: None,
            min: Some(min),
            max: Some(max),
            mode: None,
        }
    }

    pub fn triangular(min: f64, mode: f64, max: f64) -> Self {
        Self {
            kind: DistributionKind::Triangular,
            mean: (min + mode + max) / 3.0,
            std_dev: None,
            min: Some(min),
            max: Some(max),
            mode: Some(mode),
        }
    }
}

/// A spec checked and bound to a concrete sampler. Construction happens once
/// before the batch starts, so malformed parameters can never abort a trial
/// mid-run.
#[derive(Debug, Clone)]
pub enum ResolvedDistribution {
    /// Degenerate spread (zero std-dev or min == max): always returns `mean`.
    Point(f64),
    Normal(Normal),
    Uniform(Uniform),
    Triangular(Triangular),
}

impl ResolvedDistribution {
    pub fn sample(&self, rng: &mut RandomSource) -> f64 {
        match self {
            ResolvedDistribution::Point(v) => *v,
            ResolvedDistribution::Normal(d) => rng.sample(d),
            ResolvedDistribution::Uniform(d) => rng.sample(d),
            ResolvedDistribution::Triangular(d) => rng.sample(d),
        }
    }
}

/// Validate `spec` and bind it to a sampler. `variable` names the offending
/// field in configuration errors.
pub fn resolve(spec: &DistributionSpec, variable: &str) -> ReiResult<ResolvedDistribution> {
    if !spec.mean.is_finite() {
        return Err(ReiError::InvalidInput {
            field: variable.into(),
            reason: "mean must be a finite number".into(),
        });
    }

    match spec.kind {
        DistributionKind::Normal => {
            let std_dev = spec
                .std_dev
                .unwrap_or(spec.mean.abs() * DEFAULT_STD_DEV_FRACTION);
            if std_dev < 0.0 || !std_dev.is_finite() {
                return Err(ReiError::InvalidInput {
                    field: variable.into(),
                    reason: format!("std_dev must be >= 0, got {std_dev}"),
                });
            }
            if std_dev == 0.0 {
                return Ok(ResolvedDistribution::Point(spec.mean));
            }
            Normal::new(spec.mean, std_dev)
                .map(ResolvedDistribution::Normal)
                .map_err(|e| ReiError::InvalidInput {
                    field: variable.into(),
                    reason: format!("invalid Normal parameters: {e}"),
                })
        }
        DistributionKind::Uniform => {
            let (min, max) = derived_range(spec);
            if min > max {
                return Err(ReiError::InvalidInput {
                    field: variable.into(),
                    reason: format!("min ({min}) must be <= max ({max})"),
                });
            }
            if min == max {
                return Ok(ResolvedDistribution::Point(min));
            }
            Uniform::new(min, max)
                .map(ResolvedDistribution::Uniform)
                .map_err(|e| ReiError::InvalidInput {
                    field: variable.into(),
                    reason: format!("invalid Uniform parameters: {e}"),
                })
        }
        DistributionKind::Triangular => {
            let (min, max) = derived_range(spec);
            let mode = spec.mode.unwrap_or(spec.mean);
            if min > max {
                return Err(ReiError::InvalidInput {
                    field: variable.into(),
                    reason: format!("min ({min}) must be <= max ({max})"),
                });
            }
            if mode < min || mode > max {
                return Err(ReiError::InvalidInput {
                    field: variable.into(),
                    reason: format!("mode ({mode}) must lie within [{min}, {max}]"),
                });
            }
            if min == max {
                return Ok(ResolvedDistribution::Point(min));
            }
            Triangular::new(min, max, mode)
                .map(ResolvedDistribution::Triangular)
                .map_err(|e| ReiError::InvalidInput {
                    field: variable.into(),
                    reason: format!("invalid Triangular parameters: {e}"),
                })
        }
    }
}

/// `[min, max]` with absent bounds derived as mean ± 20% of |mean|.
fn derived_range(spec: &DistributionSpec) -> (f64, f64) {
    let half_width = spec.mean.abs() * DEFAULT_RANGE_SPREAD;
    let min = spec.min.unwrap_or(spec.mean - half_width);
    let max = spec.max.unwrap_or(spec.mean + half_width);
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_many(dist: &ResolvedDistribution, n: usize, seed: u64) -> Vec<f64> {
        let mut rng = RandomSource::from_seed(seed);
        (0..n).map(|_| dist.sample(&mut rng)).collect()
    }

    #[test]
    fn test_normal_sampling_statistics() {
        let dist = resolve(&DistributionSpec::normal(100.0, 10.0), "x").unwrap();
        let samples = sample_many(&dist, 100_000, 42);
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let var = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        assert!((mean - 100.0).abs() < 1.0, "mean={mean}");
        assert!((var.sqrt() - 10.0).abs() < 0.5, "std={}", var.sqrt());
    }

    #[test]
    fn test_triangular_stays_within_bounds() {
        let dist = resolve(&DistributionSpec::triangular(0.0, 50.0, 100.0), "x").unwrap();
        for s in sample_many(&dist, 100_000, 7) {
            assert!((0.0..=100.0).contains(&s), "sample {s} out of bounds");
        }
    }

    #[test]
    fn test_triangular_mean() {
        let dist = resolve(&DistributionSpec::triangular(0.0, 50.0, 100.0), "x").unwrap();
        let samples = sample_many(&dist, 50_000, 3);
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        // Triangular mean = (min + mode + max) / 3
        assert!((mean - 50.0).abs() < 1.0, "mean={mean}");
    }

    #[test]
    fn test_uniform_bounds_and_mean() {
        let dist = resolve(&DistributionSpec::uniform(10.0, 20.0), "x").unwrap();
        let samples = sample_many(&dist, 50_000, 5);
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        assert!(samples.iter().all(|s| (10.0..=20.0).contains(s)));
        assert!((mean - 15.0).abs() < 0.1, "mean={mean}");
    }

    #[test]
    fn test_zero_std_dev_degenerates_to_mean() {
        let dist = resolve(&DistributionSpec::normal(2500.0, 0.0), "x").unwrap();
        let mut rng = RandomSource::from_seed(1);
        for _ in 0..100 {
            assert_eq!(dist.sample(&mut rng), 2500.0);
        }
    }

    #[test]
    fn test_negative_std_dev_rejected() {
        let spec = DistributionSpec::normal(100.0, -1.0);
        assert!(resolve(&spec, "rental_income").is_err());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let spec = DistributionSpec::uniform(20.0, 10.0);
        assert!(resolve(&spec, "x").is_err());
    }

    #[test]
    fn test_mode_outside_range_rejected() {
        let spec = DistributionSpec::triangular(0.0, 150.0, 100.0);
        assert!(resolve(&spec, "x").is_err());
    }

    #[test]
    fn test_default_std_dev_is_tenth_of_mean() {
        let spec = DistributionSpec {
            kind: DistributionKind::Normal,
            mean: 1000.0,
            std_dev: None,
            min: None,
            max: None,
            mode: None,
        };
        let dist = resolve(&spec, "x").unwrap();
        let samples = sample_many(&dist, 50_000, 11);
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let std = (samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
        assert!((std - 100.0).abs() < 5.0, "std={std}");
    }

    #[test]
    fn test_default_range_is_plus_minus_twenty_percent() {
        let spec = DistributionSpec {
            kind: DistributionKind::Uniform,
            mean: 100.0,
            std_dev: None,
            min: None,
            max: None,
            mode: None,
        };
        let dist = resolve(&spec, "x").unwrap();
        let samples = sample_many(&dist, 20_000, 13);
        assert!(samples.iter().all(|s| (80.0..=120.0).contains(s)));
    }

    #[test]
    fn test_spec_json_round_trip() {
        let json = r#"{"type":"normal","mean":2500,"std_dev":100}"#;
        let spec: DistributionSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.kind, DistributionKind::Normal);
        assert_eq!(spec.mean, 2500.0);
        assert_eq!(spec.std_dev, Some(100.0));
        assert!(spec.min.is_none());
    }
}
