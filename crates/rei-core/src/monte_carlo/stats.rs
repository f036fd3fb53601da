//! Statistical post-processing over the full set of trial results.
//!
//! Conventions (documented because several have competing textbook forms):
//! - std-dev, skewness, kurtosis are population moments (divide by n);
//!   kurtosis is excess (normal ⇒ 0).
//! - median averages the two middle values for even n.
//! - percentile p uses the index `ceil(p/100·n) − 1`, clamped to ≥ 0; no
//!   interpolation. VaR and confidence intervals reuse the same rule.

use serde::{Deserialize, Serialize};

use crate::monte_carlo::cash_flow::TrialResult;
use crate::monte_carlo::simulation::TargetMetrics;

/// Risk-free reference (percent) for the Sharpe ratio on IRR.
const RISK_FREE_RATE_PCT: f64 = 2.0;

/// Histogram resolution for every metric distribution.
const HISTOGRAM_BINS: usize = 20;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Descriptive statistics for one output metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSummary {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub skewness: f64,
    pub kurtosis: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub irr: MetricSummary,
    pub total_return: MetricSummary,
    pub cash_on_cash_return: MetricSummary,
    pub equity_multiple: MetricSummary,
    pub monthly_cash_flow: MetricSummary,
    pub total_profit: MetricSummary,
}

/// A single equal-width histogram bin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u32,
    pub frequency: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PercentilePoint {
    pub percentile: f64,
    pub value: f64,
}

/// Histogram plus requested percentiles for one metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricDistribution {
    pub histogram: Vec<HistogramBin>,
    pub percentiles: Vec<PercentilePoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Distributions {
    pub irr: MetricDistribution,
    pub total_return: MetricDistribution,
    pub monthly_cash_flow: MetricDistribution,
}

/// Dollar-loss risk measures over total profit, plus IRR-based ratios.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub value_at_risk_5: f64,
    pub value_at_risk_10: f64,
    pub conditional_var_5: f64,
    pub conditional_var_10: f64,
    /// Percent of trials with a negative total profit.
    pub probability_of_loss: f64,
    /// RMS of IRR shortfalls below zero, percent units.
    pub downside_deviation: f64,
    pub sharpe_ratio: f64,
}

/// Percent of trials meeting each target, all in [0, 100].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbabilityAnalysis {
    pub irr_above_target: f64,
    pub cash_flow_above_target: f64,
    pub loss_within_limit: f64,
    pub all_targets_met: f64,
    pub probability_of_doubling: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationEntry {
    pub input: String,
    pub output: String,
    pub coefficient: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityRank {
    pub variable: String,
    pub correlation_with_irr: f64,
    pub impact: ImpactLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Correlations {
    pub pairs: Vec<CorrelationEntry>,
    /// Inputs ordered by |correlation with IRR| descending.
    pub sensitivity_ranking: Vec<SensitivityRank>,
}

/// Representative trials for inspection, picked from the IRR ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioAnalysis {
    pub best_case: TrialResult,
    pub worst_case: TrialResult,
    pub median_case: TrialResult,
    pub percentile_10: TrialResult,
    pub percentile_90: TrialResult,
}

/// Two-sided interval on IRR at one confidence level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub level: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Everything the statistics engine derives from one batch of trials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsReport {
    pub summary_statistics: SummaryStatistics,
    pub distributions: Distributions,
    pub risk_metrics: RiskMetrics,
    pub probability_analysis: ProbabilityAnalysis,
    pub correlations: Correlations,
    pub scenario_analysis: ScenarioAnalysis,
    pub confidence_intervals: Vec<ConfidenceInterval>,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Summarize a non-empty batch of trial results.
pub fn summarize(
    results: &[TrialResult],
    confidence_levels: &[f64],
    targets: &TargetMetrics,
) -> StatisticsReport {
    let irr: Vec<f64> = results.iter().map(|r| r.irr).collect();
    let total_return: Vec<f64> = results.iter().map(|r| r.total_return).collect();
    let coc: Vec<f64> = results.iter().map(|r| r.cash_on_cash_return).collect();
    let equity_multiple: Vec<f64> = results.iter().map(|r| r.equity_multiple).collect();
    let monthly_cf: Vec<f64> = results.iter().map(|r| r.monthly_cash_flow).collect();
    let profit: Vec<f64> = results.iter().map(|r| r.total_profit).collect();

    let summary_statistics = SummaryStatistics {
        irr: summarize_metric(&irr),
        total_return: summarize_metric(&total_return),
        cash_on_cash_return: summarize_metric(&coc),
        equity_multiple: summarize_metric(&equity_multiple),
        monthly_cash_flow: summarize_metric(&monthly_cf),
        total_profit: summarize_metric(&profit),
    };

    let distributions = Distributions {
        irr: metric_distribution(&irr, confidence_levels),
        total_return: metric_distribution(&total_return, confidence_levels),
        monthly_cash_flow: metric_distribution(&monthly_cf, confidence_levels),
    };

    StatisticsReport {
        risk_metrics: risk_metrics(&profit, &irr, &summary_statistics.irr),
        probability_analysis: probability_analysis(results, targets),
        correlations: correlations(results),
        scenario_analysis: scenario_analysis(results),
        confidence_intervals: confidence_intervals(&irr, confidence_levels),
        summary_statistics,
        distributions,
    }
}

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

/// Index of percentile `p` in a sorted slice: ceil(p/100·n) − 1, clamped.
fn percentile_index(n: usize, p: f64) -> usize {
    let idx = (p / 100.0 * n as f64).ceil() as i64 - 1;
    idx.clamp(0, n as i64 - 1) as usize
}

fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    sorted[percentile_index(sorted.len(), p)]
}

fn summarize_metric(values: &[f64]) -> MetricSummary {
    let sorted = sorted_copy(values);
    let n = sorted.len() as f64;

    let mean = sorted.iter().sum::<f64>() / n;
    let median = if sorted.len() % 2 == 0 {
        let mid = sorted.len() / 2;
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[sorted.len() / 2]
    };

    let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    let (skewness, kurtosis) = if std_dev > f64::EPSILON {
        let skew = sorted.iter().map(|v| ((v - mean) / std_dev).powi(3)).sum::<f64>() / n;
        let kurt = sorted.iter().map(|v| ((v - mean) / std_dev).powi(4)).sum::<f64>() / n - 3.0;
        (skew, kurt)
    } else {
        (0.0, 0.0)
    };

    MetricSummary {
        mean,
        median,
        std_dev,
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        skewness,
        kurtosis,
    }
}

/// Equal-width histogram over [min, max]. Every value lands in exactly one
/// bin, so counts always sum to the number of trials.
fn build_histogram(sorted: &[f64], num_bins: usize) -> Vec<HistogramBin> {
    let min_val = sorted[0];
    let max_val = sorted[sorted.len() - 1];
    let n = sorted.len() as f64;

    if (max_val - min_val).abs() < f64::EPSILON {
        return vec![HistogramBin {
            lower: min_val,
            upper: max_val,
            count: sorted.len() as u32,
            frequency: 1.0,
        }];
    }

    let bin_width = (max_val - min_val) / num_bins as f64;
    let mut bins: Vec<HistogramBin> = (0..num_bins)
        .map(|i| HistogramBin {
            lower: min_val + i as f64 * bin_width,
            upper: if i == num_bins - 1 {
                max_val
            } else {
                min_val + (i + 1) as f64 * bin_width
            },
            count: 0,
            frequency: 0.0,
        })
        .collect();

    for &val in sorted {
        let mut idx = ((val - min_val) / bin_width).floor() as usize;
        if idx >= num_bins {
            idx = num_bins - 1;
        }
        bins[idx].count += 1;
    }
    for bin in &mut bins {
        bin.frequency = bin.count as f64 / n;
    }
    bins
}

fn metric_distribution(values: &[f64], levels: &[f64]) -> MetricDistribution {
    let sorted = sorted_copy(values);
    MetricDistribution {
        histogram: build_histogram(&sorted, HISTOGRAM_BINS),
        percentiles: levels
            .iter()
            .map(|&p| PercentilePoint {
                percentile: p,
                value: percentile_sorted(&sorted, p),
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Risk metrics
// ---------------------------------------------------------------------------

fn var_and_cvar(sorted_profit: &[f64], level: f64) -> (f64, f64) {
    let idx = percentile_index(sorted_profit.len(), level);
    let var = sorted_profit[idx];
    let tail = &sorted_profit[..=idx];
    let cvar = tail.iter().sum::<f64>() / tail.len() as f64;
    (var, cvar)
}

fn risk_metrics(profit: &[f64], irr: &[f64], irr_summary: &MetricSummary) -> RiskMetrics {
    let sorted_profit = sorted_copy(profit);
    let n = profit.len() as f64;

    let (value_at_risk_5, conditional_var_5) = var_and_cvar(&sorted_profit, 5.0);
    let (value_at_risk_10, conditional_var_10) = var_and_cvar(&sorted_profit, 10.0);

    let losses = profit.iter().filter(|&&p| p < 0.0).count() as f64;

    // Downside deviation on IRR against a zero target.
    let downside_sq = irr
        .iter()
        .map(|&r| if r < 0.0 { r * r } else { 0.0 })
        .sum::<f64>()
        / n;

    let sharpe_ratio = if irr_summary.std_dev > f64::EPSILON {
        (irr_summary.mean - RISK_FREE_RATE_PCT) / irr_summary.std_dev
    } else {
        0.0
    };

    RiskMetrics {
        value_at_risk_5,
        value_at_risk_10,
        conditional_var_5,
        conditional_var_10,
        probability_of_loss: losses / n * 100.0,
        downside_deviation: downside_sq.sqrt(),
        sharpe_ratio,
    }
}

// ---------------------------------------------------------------------------
// Probability analysis
// ---------------------------------------------------------------------------

fn probability_analysis(results: &[TrialResult], targets: &TargetMetrics) -> ProbabilityAnalysis {
    let n = results.len() as f64;
    let pct = |count: usize| count as f64 / n * 100.0;

    let irr_ok = |r: &TrialResult| r.irr >= targets.minimum_irr;
    let cf_ok = |r: &TrialResult| r.monthly_cash_flow >= targets.minimum_cash_flow;
    let loss_ok = |r: &TrialResult| r.total_profit > targets.maximum_loss;

    ProbabilityAnalysis {
        irr_above_target: pct(results.iter().filter(|r| irr_ok(r)).count()),
        cash_flow_above_target: pct(results.iter().filter(|r| cf_ok(r)).count()),
        loss_within_limit: pct(results.iter().filter(|r| loss_ok(r)).count()),
        all_targets_met: pct(
            results
                .iter()
                .filter(|r| irr_ok(r) && cf_ok(r) && loss_ok(r))
                .count(),
        ),
        probability_of_doubling: pct(results.iter().filter(|r| r.equity_multiple >= 2.0).count()),
    }
}

// ---------------------------------------------------------------------------
// Correlations and sensitivity ranking
// ---------------------------------------------------------------------------

/// Pearson correlation coefficient; 0 when either series is constant.
fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom < f64::EPSILON {
        0.0
    } else {
        cov / denom
    }
}

fn impact_label(coefficient: f64) -> ImpactLevel {
    let abs = coefficient.abs();
    if abs > 0.7 {
        ImpactLevel::High
    } else if abs > 0.4 {
        ImpactLevel::Medium
    } else {
        ImpactLevel::Low
    }
}

fn correlations(results: &[TrialResult]) -> Correlations {
    let inputs: [(&str, Vec<f64>); 4] = [
        (
            "monthly_rent",
            results.iter().map(|r| r.inputs.monthly_rent).collect(),
        ),
        (
            "vacancy_rate",
            results.iter().map(|r| r.inputs.vacancy_rate).collect(),
        ),
        (
            "annual_expenses",
            results.iter().map(|r| r.inputs.annual_expenses).collect(),
        ),
        (
            "appreciation_rate",
            results.iter().map(|r| r.inputs.appreciation_rate).collect(),
        ),
    ];
    let outputs: [(&str, Vec<f64>); 3] = [
        ("irr", results.iter().map(|r| r.irr).collect()),
        ("total_return", results.iter().map(|r| r.total_return).collect()),
        (
            "monthly_cash_flow",
            results.iter().map(|r| r.monthly_cash_flow).collect(),
        ),
    ];

    let mut pairs = Vec::with_capacity(inputs.len() * outputs.len());
    let mut ranking = Vec::with_capacity(inputs.len());

    for (input_name, input_values) in &inputs {
        for (output_name, output_values) in &outputs {
            let coefficient = pearson(input_values, output_values);
            if *output_name == "irr" {
                ranking.push(SensitivityRank {
                    variable: (*input_name).to_string(),
                    correlation_with_irr: coefficient,
                    impact: impact_label(coefficient),
                });
            }
            pairs.push(CorrelationEntry {
                input: (*input_name).to_string(),
                output: (*output_name).to_string(),
                coefficient,
            });
        }
    }

    ranking.sort_by(|a, b| {
        b.correlation_with_irr
            .abs()
            .partial_cmp(&a.correlation_with_irr.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Correlations {
        pairs,
        sensitivity_ranking: ranking,
    }
}

// ---------------------------------------------------------------------------
// Key scenarios and confidence intervals
// ---------------------------------------------------------------------------

fn scenario_analysis(results: &[TrialResult]) -> ScenarioAnalysis {
    let mut by_irr: Vec<TrialResult> = results.to_vec();
    by_irr.sort_by(|a, b| a.irr.partial_cmp(&b.irr).unwrap_or(std::cmp::Ordering::Equal));
    let n = by_irr.len();

    ScenarioAnalysis {
        best_case: by_irr[n - 1],
        worst_case: by_irr[0],
        median_case: by_irr[n / 2],
        percentile_10: by_irr[percentile_index(n, 10.0)],
        percentile_90: by_irr[percentile_index(n, 90.0)],
    }
}

fn confidence_intervals(irr: &[f64], levels: &[f64]) -> Vec<ConfidenceInterval> {
    let sorted = sorted_copy(irr);
    levels
        .iter()
        .map(|&level| ConfidenceInterval {
            level,
            lower: percentile_sorted(&sorted, (100.0 - level) / 2.0),
            upper: percentile_sorted(&sorted, (100.0 + level) / 2.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monte_carlo::scenario::Scenario;

    fn trial(irr: f64, profit: f64, rent: f64) -> TrialResult {
        TrialResult {
            irr,
            total_return: profit / 10.0,
            cash_on_cash_return: irr / 2.0,
            equity_multiple: 1.0 + profit / 100_000.0,
            monthly_cash_flow: profit / 60.0,
            annual_cash_flow: profit / 5.0,
            total_profit: profit,
            exit_value: 350_000.0,
            inputs: Scenario {
                monthly_rent: rent,
                vacancy_rate: 5.0,
                annual_expenses: 8_000.0,
                appreciation_rate: 3.0,
                exit_cap_rate: 6.5,
            },
        }
    }

    fn batch() -> Vec<TrialResult> {
        // IRR tracks rent linearly so correlations are predictable.
        (0..100)
            .map(|i| {
                let rent = 2_000.0 + 10.0 * i as f64;
                trial(i as f64 - 20.0, (i as f64 - 20.0) * 1_000.0, rent)
            })
            .collect()
    }

    #[test]
    fn test_percentile_index_spec_formula() {
        // ceil(p/100·n) − 1
        assert_eq!(percentile_index(100, 50.0), 49);
        assert_eq!(percentile_index(100, 10.0), 9);
        assert_eq!(percentile_index(100, 100.0), 99);
        assert_eq!(percentile_index(100, 0.0), 0);
        assert_eq!(percentile_index(3, 50.0), 1);
    }

    #[test]
    fn test_percentile_monotonicity() {
        let values: Vec<f64> = (0..1000).map(|i| (i as f64) * 0.37).collect();
        let sorted = sorted_copy(&values);
        let mut last = f64::NEG_INFINITY;
        for p in [1.0, 5.0, 10.0, 25.0, 50.0, 75.0, 90.0, 95.0, 99.0] {
            let v = percentile_sorted(&sorted, p);
            assert!(v >= last, "percentile({p})={v} < {last}");
            last = v;
        }
    }

    #[test]
    fn test_metric_summary_known_values() {
        let summary = summarize_metric(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((summary.mean - 5.0).abs() < 1e-12);
        // Population std-dev of this classic set is exactly 2.
        assert!((summary.std_dev - 2.0).abs() < 1e-12);
        assert!((summary.median - 4.5).abs() < 1e-12);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 9.0);
    }

    #[test]
    fn test_symmetric_data_has_zero_skew() {
        let summary = summarize_metric(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(summary.skewness.abs() < 1e-12);
    }

    #[test]
    fn test_histogram_counts_sum_to_n() {
        let values: Vec<f64> = (0..10_000).map(|i| ((i * 7919) % 1000) as f64).collect();
        let bins = build_histogram(&sorted_copy(&values), 20);
        assert_eq!(bins.len(), 20);
        let total: u32 = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, 10_000);
    }

    #[test]
    fn test_histogram_constant_values_single_bin() {
        let bins = build_histogram(&[5.0; 50], 20);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 50);
        assert_eq!(bins[0].frequency, 1.0);
    }

    #[test]
    fn test_var_is_percentile_and_cvar_is_tail_mean() {
        let profit: Vec<f64> = (1..=100).map(|i| i as f64 * 100.0).collect();
        let sorted = sorted_copy(&profit);
        let (var, cvar) = var_and_cvar(&sorted, 10.0);
        assert_eq!(var, 1_000.0); // 10th value
        // Mean of 100..=1000 step 100
        assert!((cvar - 550.0).abs() < 1e-9);
        assert!(cvar <= var);
    }

    #[test]
    fn test_pearson_perfect_and_inverse() {
        let xs: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 * x + 1.0).collect();
        let zs: Vec<f64> = xs.iter().map(|x| -2.0 * x).collect();
        assert!((pearson(&xs, &ys) - 1.0).abs() < 1e-12);
        assert!((pearson(&xs, &zs) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_constant_series_is_zero() {
        let xs = [1.0; 10];
        let ys: Vec<f64> = (0..10).map(|i| i as f64).collect();
        assert_eq!(pearson(&xs, &ys), 0.0);
    }

    #[test]
    fn test_impact_labels() {
        assert_eq!(impact_label(0.9), ImpactLevel::High);
        assert_eq!(impact_label(-0.75), ImpactLevel::High);
        assert_eq!(impact_label(0.5), ImpactLevel::Medium);
        assert_eq!(impact_label(0.2), ImpactLevel::Low);
    }

    #[test]
    fn test_correlation_ranking_orders_by_magnitude() {
        let report = correlations(&batch());
        assert_eq!(report.pairs.len(), 12);
        assert_eq!(report.sensitivity_ranking.len(), 4);
        // Rent drives IRR perfectly in the synthetic batch.
        assert_eq!(report.sensitivity_ranking[0].variable, "monthly_rent");
        assert_eq!(report.sensitivity_ranking[0].impact, ImpactLevel::High);
        for w in report.sensitivity_ranking.windows(2) {
            assert!(
                w[0].correlation_with_irr.abs() >= w[1].correlation_with_irr.abs(),
                "ranking not sorted by |correlation|"
            );
        }
    }

    #[test]
    fn test_probability_analysis_bounds_and_values() {
        let targets = TargetMetrics {
            minimum_irr: 10.0,
            minimum_cash_flow: 0.0,
            maximum_loss: 0.0,
        };
        let analysis = probability_analysis(&batch(), &targets);
        for p in [
            analysis.irr_above_target,
            analysis.cash_flow_above_target,
            analysis.loss_within_limit,
            analysis.all_targets_met,
            analysis.probability_of_doubling,
        ] {
            assert!((0.0..=100.0).contains(&p), "probability {p} out of bounds");
        }
        // IRRs run -20..79; 70 of 100 are >= 10.
        assert!((analysis.irr_above_target - 70.0).abs() < 1e-9);
        // Joint probability can never exceed any marginal.
        assert!(analysis.all_targets_met <= analysis.irr_above_target);
        assert!(analysis.all_targets_met <= analysis.loss_within_limit);
    }

    #[test]
    fn test_scenario_analysis_ordering() {
        let analysis = scenario_analysis(&batch());
        assert!(analysis.worst_case.irr <= analysis.percentile_10.irr);
        assert!(analysis.percentile_10.irr <= analysis.median_case.irr);
        assert!(analysis.median_case.irr <= analysis.percentile_90.irr);
        assert!(analysis.percentile_90.irr <= analysis.best_case.irr);
    }

    #[test]
    fn test_confidence_intervals_widen_with_level() {
        let irr: Vec<f64> = batch().iter().map(|r| r.irr).collect();
        let cis = confidence_intervals(&irr, &[50.0, 90.0]);
        assert_eq!(cis.len(), 2);
        let narrow = &cis[0];
        let wide = &cis[1];
        assert!(narrow.lower <= narrow.upper);
        assert!(wide.lower <= narrow.lower);
        assert!(wide.upper >= narrow.upper);
    }

    #[test]
    fn test_full_report_shape() {
        let targets = TargetMetrics::default();
        let report = summarize(&batch(), &[5.0, 50.0, 95.0], &targets);
        assert_eq!(report.distributions.irr.percentiles.len(), 3);
        assert_eq!(report.confidence_intervals.len(), 3);
        let total: u32 = report
            .distributions
            .irr
            .histogram
            .iter()
            .map(|b| b.count)
            .sum();
        assert_eq!(total as usize, batch().len());
    }
}
