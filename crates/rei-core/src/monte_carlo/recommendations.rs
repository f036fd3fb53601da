//! Maps simulation statistics to qualitative guidance via a fixed rule table.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub priority: Priority,
    pub message: String,
    pub action: String,
}

/// The handful of aggregates the rule table keys on. IRR figures and
/// probabilities are percent; VaR is dollars.
#[derive(Debug, Clone, Copy)]
pub struct RiskProfile {
    pub mean_irr: f64,
    pub probability_of_loss: f64,
    pub coefficient_of_variation: f64,
    pub value_at_risk_10: f64,
    pub probability_of_doubling: f64,
}

fn rec(category: &str, priority: Priority, message: String, action: &str) -> Recommendation {
    Recommendation {
        category: category.to_string(),
        priority,
        message,
        action: action.to_string(),
    }
}

/// Fixed thresholds; tune here, not at call sites.
const STRONG_IRR_PCT: f64 = 15.0;
const WEAK_IRR_PCT: f64 = 8.0;
const HIGH_LOSS_PROBABILITY_PCT: f64 = 20.0;
const LOW_LOSS_PROBABILITY_PCT: f64 = 5.0;
const HIGH_VARIATION: f64 = 1.0;
const STRONG_DOUBLING_PCT: f64 = 50.0;

/// Produce guidance ordered high priority first.
pub fn synthesize(profile: &RiskProfile) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    if profile.mean_irr > STRONG_IRR_PCT {
        recs.push(rec(
            "performance",
            Priority::Medium,
            format!(
                "Expected IRR of {:.1}% exceeds the {STRONG_IRR_PCT:.0}% strong-deal threshold",
                profile.mean_irr
            ),
            "Deal clears typical return hurdles; verify rent and expense assumptions hold",
        ));
    } else if profile.mean_irr < WEAK_IRR_PCT {
        recs.push(rec(
            "performance",
            Priority::High,
            format!(
                "Expected IRR of {:.1}% is below the {WEAK_IRR_PCT:.0}% minimum most investors require",
                profile.mean_irr
            ),
            "Renegotiate the purchase price or find additional income before proceeding",
        ));
    }

    if profile.probability_of_loss > HIGH_LOSS_PROBABILITY_PCT {
        recs.push(rec(
            "risk",
            Priority::High,
            format!(
                "{:.1}% of simulated outcomes lose money",
                profile.probability_of_loss
            ),
            "Increase the down payment or build larger reserves to absorb downside scenarios",
        ));
    } else if profile.probability_of_loss < LOW_LOSS_PROBABILITY_PCT {
        recs.push(rec(
            "risk",
            Priority::Low,
            format!(
                "Only {:.1}% of simulated outcomes lose money",
                profile.probability_of_loss
            ),
            "Downside exposure is limited under the modeled assumptions",
        ));
    }

    if profile.coefficient_of_variation > HIGH_VARIATION {
        recs.push(rec(
            "volatility",
            Priority::Medium,
            format!(
                "Outcome spread is wide (coefficient of variation {:.2})",
                profile.coefficient_of_variation
            ),
            "Stress-test the most sensitive inputs and avoid thin cash reserves",
        ));
    }

    if profile.value_at_risk_10 < 0.0 {
        recs.push(rec(
            "risk",
            Priority::Medium,
            format!(
                "One in ten outcomes loses ${:.0} or more",
                -profile.value_at_risk_10
            ),
            "Hold liquid reserves of at least this size for the duration of the hold",
        ));
    }

    if profile.probability_of_doubling > STRONG_DOUBLING_PCT {
        recs.push(rec(
            "upside",
            Priority::Low,
            format!(
                "{:.1}% of outcomes at least double the invested equity",
                profile.probability_of_doubling
            ),
            "Upside capture is strong; a longer hold may compound it further",
        ));
    }

    recs.sort_by_key(|r| r.priority);
    recs
}
