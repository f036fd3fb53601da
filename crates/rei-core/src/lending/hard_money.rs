use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ReiError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::ReiResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for a hard-money (fix-and-flip) loan analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardMoneyLoanInput {
    /// Acquisition price of the property.
    pub purchase_price: Money,
    /// Renovation budget.
    pub rehab_budget: Money,
    /// Expected after-repair value at resale.
    pub after_repair_value: Money,
    /// Maximum loan as a fraction of ARV (e.g. 0.70).
    pub loan_to_arv: Rate,
    /// Annual interest rate (interest-only, e.g. 0.12).
    pub interest_rate: Rate,
    /// Origination points (2 = 2% of the loan).
    pub points: Decimal,
    /// Loan term in months.
    pub term_months: u32,
    /// Monthly taxes, insurance, and utilities while holding.
    pub monthly_holding_costs: Money,
    /// Resale costs as a fraction of ARV (agent commission, transfer taxes).
    pub selling_costs_rate: Rate,
}

/// Result of a hard-money loan analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardMoneyLoanOutput {
    /// Funded loan: lesser of the ARV limit and total project cost.
    pub loan_amount: Money,
    /// Loan as a fraction of ARV.
    pub ltv_arv: Rate,
    /// Points charged at closing.
    pub origination_fee: Money,
    /// Interest-only monthly payment.
    pub monthly_interest_payment: Money,
    /// Interest paid over the full term.
    pub total_interest: Money,
    /// Holding costs over the full term.
    pub total_holding_costs: Money,
    /// Origination + interest + holding costs.
    pub total_financing_cost: Money,
    /// Resale costs at the assumed ARV.
    pub selling_costs: Money,
    /// Cash the borrower must bring: project cost not covered by the loan,
    /// plus origination.
    pub cash_required: Money,
    /// ARV minus every cost in the project.
    pub net_profit: Money,
    /// Net profit over cash invested (cash required + carry).
    pub return_on_cash: Rate,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyze a hard-money loan for a fix-and-flip project.
pub fn analyze_hard_money_loan(
    input: &HardMoneyLoanInput,
) -> ReiResult<ComputationOutput<HardMoneyLoanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(input)?;

    let project_cost = input.purchase_price + input.rehab_budget;
    let arv_limit = input.after_repair_value * input.loan_to_arv;
    let loan_amount = arv_limit.min(project_cost);
    let ltv_arv = loan_amount / input.after_repair_value;

    let origination_fee = loan_amount * input.points / dec!(100);
    let monthly_interest_payment = loan_amount * input.interest_rate / dec!(12);
    let months = Decimal::from(input.term_months);
    let total_interest = monthly_interest_payment * months;
    let total_holding_costs = input.monthly_holding_costs * months;
    let total_financing_cost = origination_fee + total_interest + total_holding_costs;

    let selling_costs = input.after_repair_value * input.selling_costs_rate;

    let cash_required = (project_cost - loan_amount) + origination_fee;
    let cash_invested = cash_required + total_interest + total_holding_costs;

    let net_profit = input.after_repair_value
        - project_cost
        - total_financing_cost
        - selling_costs;

    let return_on_cash = if cash_invested.is_zero() {
        Decimal::ZERO
    } else {
        net_profit / cash_invested
    };

    // --- Rule-of-thumb warnings ---
    if ltv_arv > dec!(0.75) {
        warnings.push(format!(
            "Loan is {:.1}% of ARV; most hard-money lenders cap at 70-75%",
            ltv_arv * dec!(100)
        ));
    }
    if net_profit < Decimal::ZERO {
        warnings.push("Projected net profit is negative; the deal loses money as modeled".into());
    } else if net_profit < input.after_repair_value * dec!(0.10) {
        warnings.push(
            "Projected profit is under 10% of ARV, a thin margin for a value-add project".into(),
        );
    }
    if input.interest_rate > dec!(0.15) {
        warnings.push(format!(
            "Interest rate {:.1}% is above typical hard-money pricing",
            input.interest_rate * dec!(100)
        ));
    }

    let output = HardMoneyLoanOutput {
        loan_amount,
        ltv_arv,
        origination_fee,
        monthly_interest_payment,
        total_interest,
        total_holding_costs,
        total_financing_cost,
        selling_costs,
        cash_required,
        net_profit,
        return_on_cash,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Hard-Money Loan Analysis",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(input: &HardMoneyLoanInput) -> ReiResult<()> {
    if input.purchase_price <= Decimal::ZERO {
        return Err(ReiError::InvalidInput {
            field: "purchase_price".into(),
            reason: "must be positive".into(),
        });
    }
    if input.after_repair_value <= Decimal::ZERO {
        return Err(ReiError::InvalidInput {
            field: "after_repair_value".into(),
            reason: "must be positive".into(),
        });
    }
    if input.rehab_budget < Decimal::ZERO {
        return Err(ReiError::InvalidInput {
            field: "rehab_budget".into(),
            reason: "must be >= 0".into(),
        });
    }
    if input.loan_to_arv <= Decimal::ZERO || input.loan_to_arv > Decimal::ONE {
        return Err(ReiError::InvalidInput {
            field: "loan_to_arv".into(),
            reason: "must be between 0 and 1".into(),
        });
    }
    if input.interest_rate < Decimal::ZERO {
        return Err(ReiError::InvalidInput {
            field: "interest_rate".into(),
            reason: "must be >= 0".into(),
        });
    }
    if input.points < Decimal::ZERO {
        return Err(ReiError::InvalidInput {
            field: "points".into(),
            reason: "must be >= 0".into(),
        });
    }
    if input.term_months == 0 {
        return Err(ReiError::InvalidInput {
            field: "term_months".into(),
            reason: "must be at least 1 month".into(),
        });
    }
    if input.selling_costs_rate < Decimal::ZERO || input.selling_costs_rate >= Decimal::ONE {
        return Err(ReiError::InvalidInput {
            field: "selling_costs_rate".into(),
            reason: "must be between 0 and 1".into(),
        });
    }
    Ok(())
}
