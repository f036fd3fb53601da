use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ReiError;
use crate::monte_carlo::cash_flow::{self, InvestmentParameters, TrialResult};
use crate::monte_carlo::recommendations::{self, Recommendation, RiskProfile};
use crate::monte_carlo::rng::RandomSource;
use crate::monte_carlo::scenario::{ScenarioGenerator, VariableDistributions};
use crate::monte_carlo::stats::{
    self, ConfidenceInterval, Correlations, Distributions, ProbabilityAnalysis, RiskMetrics,
    ScenarioAnalysis, SummaryStatistics,
};
use crate::types::{with_metadata_f64, ComputationOutput};
use crate::ReiResult;

const MIN_SIMULATIONS: u32 = 100;
const MAX_SIMULATIONS: u32 = 100_000;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Batch controls. Percentile levels double as the confidence-interval levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    #[serde(default = "default_num_simulations")]
    pub num_simulations: u32,
    /// None means seed from entropy; the seed actually used is always echoed
    /// in the output metadata.
    #[serde(default)]
    pub random_seed: Option<u64>,
    #[serde(default = "default_confidence_levels")]
    pub confidence_levels: Vec<f64>,
}

fn default_num_simulations() -> u32 {
    10_000
}

fn default_confidence_levels() -> Vec<f64> {
    vec![5.0, 10.0, 25.0, 50.0, 75.0, 90.0, 95.0]
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            num_simulations: default_num_simulations(),
            random_seed: None,
            confidence_levels: default_confidence_levels(),
        }
    }
}

/// Thresholds for the probability analysis only; the simulation itself never
/// reads them. IRR in percent, cash flow and loss in dollars.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TargetMetrics {
    #[serde(default = "default_minimum_irr")]
    pub minimum_irr: f64,
    #[serde(default)]
    pub minimum_cash_flow: f64,
    #[serde(default)]
    pub maximum_loss: f64,
}

fn default_minimum_irr() -> f64 {
    10.0
}

impl Default for TargetMetrics {
    fn default() -> Self {
        Self {
            minimum_irr: default_minimum_irr(),
            minimum_cash_flow: 0.0,
            maximum_loss: 0.0,
        }
    }
}

/// Complete configuration for one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationInput {
    pub investment_parameters: InvestmentParameters,
    pub variable_distributions: VariableDistributions,
    #[serde(default)]
    pub simulation_settings: SimulationSettings,
    #[serde(default)]
    pub target_metrics: TargetMetrics,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationMetadata {
    pub num_simulations: u32,
    /// The seed that reproduces this run.
    pub random_seed: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub summary_statistics: SummaryStatistics,
    pub distributions: Distributions,
    pub risk_metrics: RiskMetrics,
    pub probability_analysis: ProbabilityAnalysis,
    pub correlations: Correlations,
    pub scenario_analysis: ScenarioAnalysis,
    pub confidence_intervals: Vec<ConfidenceInterval>,
    pub recommendations: Vec<Recommendation>,
    pub simulation_metadata: SimulationMetadata,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(input: &SimulationInput) -> ReiResult<()> {
    cash_flow::validate_parameters(&input.investment_parameters)?;

    let settings = &input.simulation_settings;
    if !(MIN_SIMULATIONS..=MAX_SIMULATIONS).contains(&settings.num_simulations) {
        return Err(ReiError::InvalidInput {
            field: "num_simulations".into(),
            reason: format!("must be between {MIN_SIMULATIONS} and {MAX_SIMULATIONS}"),
        });
    }
    if settings.confidence_levels.is_empty() {
        return Err(ReiError::InvalidInput {
            field: "confidence_levels".into(),
            reason: "at least one level is required".into(),
        });
    }
    for &level in &settings.confidence_levels {
        if !(0.0..100.0).contains(&level) || level == 0.0 {
            return Err(ReiError::InvalidInput {
                field: "confidence_levels".into(),
                reason: format!("level {level} must lie in (0, 100)"),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Run `n` trials through one shared random source.
///
/// Serial on purpose: a single RNG drawn in trial order is what makes a seed
/// reproduce a run bit-for-bit. Trial counts at the configured maximum finish
/// in well under a second, so fan-out buys nothing here.
fn run_trials(
    params: &InvestmentParameters,
    generator: &ScenarioGenerator,
    rng: &mut RandomSource,
    n: u32,
) -> Vec<TrialResult> {
    (0..n)
        .map(|_| cash_flow::evaluate_trial(params, generator.draw(rng)))
        .collect()
}

/// Run a full Monte Carlo simulation of a rental property investment.
///
/// Validates the configuration, evaluates `num_simulations` sampled
/// scenarios, and returns summary statistics, outcome distributions, risk
/// metrics, probabilities against the configured targets, input/output
/// correlations, key scenarios, confidence intervals, and recommendations.
pub fn run_simulation(
    input: &SimulationInput,
) -> ReiResult<ComputationOutput<SimulationOutput>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    validate(input)?;
    // Distribution errors also surface here, before the first trial.
    let generator = ScenarioGenerator::new(&input.variable_distributions)?;
    let mut rng = RandomSource::from_optional_seed(input.simulation_settings.random_seed);
    let seed_used = rng.seed();

    let results = run_trials(
        &input.investment_parameters,
        &generator,
        &mut rng,
        input.simulation_settings.num_simulations,
    );

    let report = stats::summarize(
        &results,
        &input.simulation_settings.confidence_levels,
        &input.target_metrics,
    );

    let irr_mean = report.summary_statistics.irr.mean;
    let irr_std = report.summary_statistics.irr.std_dev;
    let recommendations = recommendations::synthesize(&RiskProfile {
        mean_irr: irr_mean,
        probability_of_loss: report.risk_metrics.probability_of_loss,
        coefficient_of_variation: if irr_mean.abs() > f64::EPSILON {
            irr_std / irr_mean.abs()
        } else {
            0.0
        },
        value_at_risk_10: report.risk_metrics.value_at_risk_10,
        probability_of_doubling: report.probability_analysis.probability_of_doubling,
    });

    let output = SimulationOutput {
        summary_statistics: report.summary_statistics,
        distributions: report.distributions,
        risk_metrics: report.risk_metrics,
        probability_analysis: report.probability_analysis,
        correlations: report.correlations,
        scenario_analysis: report.scenario_analysis,
        confidence_intervals: report.confidence_intervals,
        recommendations,
        simulation_metadata: SimulationMetadata {
            num_simulations: input.simulation_settings.num_simulations,
            random_seed: seed_used,
            timestamp: Utc::now(),
        },
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata_f64(
        "Monte Carlo Rental Investment Simulation",
        &serde_json::json!({
            "num_simulations": input.simulation_settings.num_simulations,
            "random_seed": seed_used,
            "holding_period_years": input.investment_parameters.holding_period_years,
            "confidence_levels": input.simulation_settings.confidence_levels,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monte_carlo::distributions::DistributionSpec;

    const SEED: u64 = 42;

    fn basic_input() -> SimulationInput {
        serde_json::from_value(serde_json::json!({
            "investment_parameters": {
                "purchase_price": 300000,
                "down_payment_percent": 20,
                "loan_interest_rate": 7,
                "loan_term_years": 30,
                "holding_period_years": 5
            },
            "variable_distributions": {
                "rental_income": {"type": "normal", "mean": 2500, "std_dev": 100},
                "operating_expenses": {"type": "normal", "mean": 8000, "std_dev": 500}
            },
            "simulation_settings": {
                "num_simulations": 1000,
                "random_seed": SEED
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_end_to_end_example() {
        let result = run_simulation(&basic_input()).unwrap();
        let out = &result.result;

        let mean_irr = out.summary_statistics.irr.mean;
        assert!(mean_irr.is_finite());
        assert!((-20.0..=40.0).contains(&mean_irr), "mean_irr={mean_irr}");
        assert!((0.0..=100.0).contains(&out.probability_analysis.irr_above_target));
        assert_eq!(out.simulation_metadata.num_simulations, 1000);
        assert_eq!(out.simulation_metadata.random_seed, SEED);
    }

    #[test]
    fn test_seeded_reproducibility() {
        let input = basic_input();
        let a = run_simulation(&input).unwrap();
        let b = run_simulation(&input).unwrap();
        assert_eq!(
            a.result.summary_statistics.irr.mean,
            b.result.summary_statistics.irr.mean
        );
        assert_eq!(
            a.result.summary_statistics.total_profit.median,
            b.result.summary_statistics.total_profit.median
        );
        assert_eq!(
            a.result.risk_metrics.value_at_risk_10,
            b.result.risk_metrics.value_at_risk_10
        );
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut input = basic_input();
        let a = run_simulation(&input).unwrap();
        input.simulation_settings.random_seed = Some(43);
        let b = run_simulation(&input).unwrap();
        assert_ne!(
            a.result.summary_statistics.irr.mean,
            b.result.summary_statistics.irr.mean
        );
    }

    #[test]
    fn test_entropy_seed_is_echoed_and_replayable() {
        let mut input = basic_input();
        input.simulation_settings.random_seed = None;
        let first = run_simulation(&input).unwrap();
        input.simulation_settings.random_seed =
            Some(first.result.simulation_metadata.random_seed);
        let replay = run_simulation(&input).unwrap();
        assert_eq!(
            first.result.summary_statistics.irr.mean,
            replay.result.summary_statistics.irr.mean
        );
    }

    #[test]
    fn test_histogram_counts_sum_to_num_simulations() {
        let result = run_simulation(&basic_input()).unwrap();
        let total: u32 = result
            .result
            .distributions
            .irr
            .histogram
            .iter()
            .map(|b| b.count)
            .sum();
        assert_eq!(total, 1000);
    }

    #[test]
    fn test_percentile_monotonicity_across_levels() {
        let result = run_simulation(&basic_input()).unwrap();
        let pcts = &result.result.distributions.irr.percentiles;
        for w in pcts.windows(2) {
            assert!(w[0].percentile < w[1].percentile);
            assert!(w[0].value <= w[1].value);
        }
    }

    #[test]
    fn test_all_probabilities_within_bounds() {
        let result = run_simulation(&basic_input()).unwrap();
        let p = &result.result.probability_analysis;
        for v in [
            p.irr_above_target,
            p.cash_flow_above_target,
            p.loss_within_limit,
            p.all_targets_met,
            p.probability_of_doubling,
            result.result.risk_metrics.probability_of_loss,
        ] {
            assert!((0.0..=100.0).contains(&v), "probability {v} out of bounds");
        }
    }

    #[test]
    fn test_scenario_analysis_spans_the_batch() {
        let result = run_simulation(&basic_input()).unwrap();
        let s = &result.result.scenario_analysis;
        assert!(s.worst_case.irr <= s.median_case.irr);
        assert!(s.median_case.irr <= s.best_case.irr);
        assert!(s.worst_case.irr <= s.percentile_10.irr);
        assert!(s.percentile_90.irr <= s.best_case.irr);
    }

    #[test]
    fn test_too_few_simulations_rejected() {
        let mut input = basic_input();
        input.simulation_settings.num_simulations = 50;
        assert!(run_simulation(&input).is_err());
    }

    #[test]
    fn test_too_many_simulations_rejected() {
        let mut input = basic_input();
        input.simulation_settings.num_simulations = 200_000;
        assert!(run_simulation(&input).is_err());
    }

    #[test]
    fn test_bad_confidence_level_rejected() {
        let mut input = basic_input();
        input.simulation_settings.confidence_levels = vec![50.0, 110.0];
        assert!(run_simulation(&input).is_err());
    }

    #[test]
    fn test_degenerate_distribution_rejected_before_batch() {
        let mut input = basic_input();
        input.variable_distributions.rental_income = DistributionSpec {
            kind: crate::monte_carlo::distributions::DistributionKind::Uniform,
            mean: 2500.0,
            std_dev: None,
            min: Some(3000.0),
            max: Some(2000.0),
            mode: None,
        };
        assert!(run_simulation(&input).is_err());
    }

    #[test]
    fn test_settings_defaults() {
        let settings: SimulationSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.num_simulations, 10_000);
        assert!(settings.random_seed.is_none());
        assert_eq!(
            settings.confidence_levels,
            vec![5.0, 10.0, 25.0, 50.0, 75.0, 90.0, 95.0]
        );

        let targets: TargetMetrics = serde_json::from_str("{}").unwrap();
        assert_eq!(targets.minimum_irr, 10.0);
        assert_eq!(targets.minimum_cash_flow, 0.0);
        assert_eq!(targets.maximum_loss, 0.0);
    }

    #[test]
    fn test_zero_std_dev_runs_deterministic_scenario() {
        let mut input = basic_input();
        input.variable_distributions.rental_income = DistributionSpec::normal(2500.0, 0.0);
        let result = run_simulation(&input).unwrap();
        // Rent is constant; its correlation with IRR must be reported as 0.
        let rent_corr = result
            .result
            .correlations
            .pairs
            .iter()
            .find(|p| p.input == "monthly_rent" && p.output == "irr")
            .unwrap();
        assert_eq!(rent_corr.coefficient, 0.0);
    }

    #[test]
    fn test_envelope_metadata() {
        let result = run_simulation(&basic_input()).unwrap();
        assert_eq!(result.metadata.precision, "ieee754_f64");
        assert!(result.methodology.contains("Monte Carlo"));
    }

    #[test]
    fn test_output_serializes() {
        let result = run_simulation(&basic_input()).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["result"]["summary_statistics"]["irr"]["mean"].is_number());
        assert!(json["result"]["recommendations"].is_array());
        assert!(json["result"]["simulation_metadata"]["timestamp"].is_string());
    }
}
