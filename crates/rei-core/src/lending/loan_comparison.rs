use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ReiError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::ReiResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One financing offer to compare.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanOffer {
    /// Label shown in results ("Bank A 30yr", "Credit union 15yr").
    pub name: String,
    /// Annual interest rate as a decimal (0.065 = 6.5%).
    pub interest_rate: Rate,
    /// Amortization term in years.
    pub term_years: u32,
    /// Discount/origination points (1 = 1% of the loan).
    #[serde(default)]
    pub points: Decimal,
    /// Flat lender fees due at closing.
    #[serde(default)]
    pub fees: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanComparisonInput {
    /// Principal borrowed under every offer.
    pub loan_amount: Money,
    pub offers: Vec<LoanOffer>,
}

/// Per-offer cost breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanOfferResult {
    pub name: String,
    pub monthly_payment: Money,
    /// Points plus flat fees.
    pub upfront_costs: Money,
    /// Interest paid over the full term.
    pub total_interest: Money,
    /// Upfront costs plus total interest.
    pub total_cost: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanComparisonOutput {
    /// One entry per offer, input order preserved.
    pub offers: Vec<LoanOfferResult>,
    /// Name of the offer with the lowest total cost.
    pub best_offer: String,
    /// Total cost difference between the cheapest and most expensive offer.
    pub savings_vs_worst: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Rank financing offers by lifetime cost (upfront charges plus total
/// interest over the full amortization).
pub fn compare_loans(
    input: &LoanComparisonInput,
) -> ReiResult<ComputationOutput<LoanComparisonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(input)?;

    let mut results = Vec::with_capacity(input.offers.len());
    for offer in &input.offers {
        let monthly_payment =
            amortized_monthly_payment(input.loan_amount, offer.interest_rate, offer.term_years);
        let num_payments = Decimal::from(offer.term_years) * dec!(12);
        let total_interest = monthly_payment * num_payments - input.loan_amount;
        let upfront_costs = input.loan_amount * offer.points / dec!(100) + offer.fees;
        let total_cost = upfront_costs + total_interest;

        if offer.interest_rate > dec!(0.15) {
            warnings.push(format!(
                "Offer '{}' carries a {:.1}% rate, well above conventional pricing",
                offer.name,
                offer.interest_rate * dec!(100)
            ));
        }

        results.push(LoanOfferResult {
            name: offer.name.clone(),
            monthly_payment,
            upfront_costs,
            total_interest,
            total_cost,
        });
    }

    // Input order is preserved in `offers`; best/worst are picked by scan.
    let best = results
        .iter()
        .min_by(|a, b| a.total_cost.cmp(&b.total_cost))
        .ok_or_else(|| ReiError::InsufficientData("no loan offers provided".into()))?;
    let worst = results
        .iter()
        .max_by(|a, b| a.total_cost.cmp(&b.total_cost))
        .ok_or_else(|| ReiError::InsufficientData("no loan offers provided".into()))?;

    let output = LoanComparisonOutput {
        best_offer: best.name.clone(),
        savings_vs_worst: worst.total_cost - best.total_cost,
        offers: results.clone(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Lifetime Loan Cost Comparison",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Standard annuity payment. A zero rate degenerates to straight-line
/// principal repayment.
pub(crate) fn amortized_monthly_payment(principal: Money, annual_rate: Rate, term_years: u32) -> Money {
    let num_payments = Decimal::from(term_years * 12);
    if annual_rate.is_zero() {
        return principal / num_payments;
    }
    let monthly_rate = annual_rate / dec!(12);
    let factor = (Decimal::ONE + monthly_rate).powd(num_payments);
    principal * monthly_rate * factor / (factor - Decimal::ONE)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(input: &LoanComparisonInput) -> ReiResult<()> {
    if input.loan_amount <= Decimal::ZERO {
        return Err(ReiError::InvalidInput {
            field: "loan_amount".into(),
            reason: "must be positive".into(),
        });
    }
    if input.offers.len() < 2 {
        return Err(ReiError::InsufficientData(
            "at least two loan offers are required for a comparison".into(),
        ));
    }
    for (i, offer) in input.offers.iter().enumerate() {
        if offer.name.trim().is_empty() {
            return Err(ReiError::InvalidInput {
                field: format!("offers[{i}].name"),
                reason: "must not be empty".into(),
            });
        }
        if offer.interest_rate < Decimal::ZERO {
            return Err(ReiError::InvalidInput {
                field: format!("offers[{i}].interest_rate"),
                reason: "must be >= 0".into(),
            });
        }
        if offer.term_years == 0 {
            return Err(ReiError::InvalidInput {
                field: format!("offers[{i}].term_years"),
                reason: "must be at least 1 year".into(),
            });
        }
        if offer.points < Decimal::ZERO {
            return Err(ReiError::InvalidInput {
                field: format!("offers[{i}].points"),
                reason: "must be >= 0".into(),
            });
        }
        if offer.fees < Decimal::ZERO {
            return Err(ReiError::InvalidInput {
                field: format!("offers[{i}].fees"),
                reason: "must be >= 0".into(),
            });
        }
    }
    Ok(())
}
