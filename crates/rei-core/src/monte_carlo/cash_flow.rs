use serde::{Deserialize, Serialize};

use crate::error::ReiError;
use crate::monte_carlo::scenario::Scenario;
use crate::solver::{self, IrrParams};
use crate::ReiResult;

/// Denominators smaller than this are treated as zero.
const EPS: f64 = 1e-9;

/// Fixed base parameters of the investment, immutable across a run.
/// Rates are percent (7 = 7%).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InvestmentParameters {
    pub purchase_price: f64,
    pub down_payment_percent: f64,
    #[serde(default)]
    pub closing_costs: f64,
    pub holding_period_years: u32,
    pub loan_interest_rate: f64,
    pub loan_term_years: u32,
}

/// Outcome of one simulated trial. Return rates are percent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrialResult {
    pub irr: f64,
    pub total_return: f64,
    pub cash_on_cash_return: f64,
    pub equity_multiple: f64,
    pub monthly_cash_flow: f64,
    pub annual_cash_flow: f64,
    pub total_profit: f64,
    pub exit_value: f64,
    pub inputs: Scenario,
}

/// Validate the fixed parameters once, before any trial runs.
pub fn validate_parameters(params: &InvestmentParameters) -> ReiResult<()> {
    if params.purchase_price <= 0.0 || !params.purchase_price.is_finite() {
        return Err(ReiError::InvalidInput {
            field: "purchase_price".into(),
            reason: "must be a positive number".into(),
        });
    }
    if !(0.0..=100.0).contains(&params.down_payment_percent) {
        return Err(ReiError::InvalidInput {
            field: "down_payment_percent".into(),
            reason: "must be between 0 and 100".into(),
        });
    }
    if params.closing_costs < 0.0 {
        return Err(ReiError::InvalidInput {
            field: "closing_costs".into(),
            reason: "must be >= 0".into(),
        });
    }
    if params.holding_period_years < 1 {
        return Err(ReiError::InvalidInput {
            field: "holding_period_years".into(),
            reason: "must be at least 1 year".into(),
        });
    }
    if params.loan_term_years < 1 {
        return Err(ReiError::InvalidInput {
            field: "loan_term_years".into(),
            reason: "must be at least 1 year".into(),
        });
    }
    if params.loan_interest_rate < 0.0 || !params.loan_interest_rate.is_finite() {
        return Err(ReiError::InvalidInput {
            field: "loan_interest_rate".into(),
            reason: "must be >= 0".into(),
        });
    }
    Ok(())
}

/// Evaluate one scenario against the fixed parameters.
///
/// Never fails: pathological samples (negative rents, near-zero cap rates)
/// are clamped or guarded so a single trial cannot abort the batch. Assumes
/// `validate_parameters` has already passed.
pub fn evaluate_trial(params: &InvestmentParameters, scenario: Scenario) -> TrialResult {
    let down_payment = params.purchase_price * params.down_payment_percent / 100.0;
    let loan_amount = params.purchase_price - down_payment;
    let initial_cash = down_payment + params.closing_costs;

    let monthly_rate = params.loan_interest_rate / 100.0 / 12.0;
    let loan_months = params.loan_term_years * 12;
    let monthly_payment = amortized_payment(loan_amount, monthly_rate, loan_months);

    // Operating cash flow, identical for every year of the hold.
    let vacancy = scenario.vacancy_rate.clamp(0.0, 100.0);
    let effective_rent = scenario.monthly_rent * 12.0 * (1.0 - vacancy / 100.0);
    let noi = effective_rent - scenario.annual_expenses;
    let annual_debt_service = monthly_payment * 12.0;
    let annual_cash_flow = noi - annual_debt_service;

    // Exit: lower of the appreciated price and the income-approach value.
    // The income approach only applies when NOI is positive; a distressed
    // scenario still sells at its (possibly flat) appreciated price.
    let years = params.holding_period_years;
    let appreciated = params.purchase_price * (1.0 + scenario.appreciation_rate / 100.0).powi(years as i32);
    let cap = scenario.exit_cap_rate / 100.0;
    let exit_value = if cap > EPS && noi > 0.0 {
        appreciated.min(noi / cap)
    } else {
        appreciated
    };

    let months_elapsed = (years * 12).min(loan_months);
    let balance = remaining_balance(loan_amount, monthly_rate, loan_months, months_elapsed);
    let sale_proceeds = exit_value - balance;

    // Cash-flow vector: equity out at t=0, operating flow each year, sale
    // proceeds added in the final year.
    let mut flows = Vec::with_capacity(years as usize + 1);
    flows.push(-initial_cash);
    for year in 1..=years {
        if year == years {
            flows.push(annual_cash_flow + sale_proceeds);
        } else {
            flows.push(annual_cash_flow);
        }
    }

    // Non-convergence returns the last estimate by contract; the batch
    // statistics absorb individual trial noise.
    let irr = solver::irr(&flows, IrrParams::default()).rate * 100.0;

    let total_inflows = annual_cash_flow * years as f64 + sale_proceeds;
    let total_profit = total_inflows - initial_cash;

    let (total_return, cash_on_cash_return, equity_multiple) = if initial_cash > EPS {
        (
            total_profit / initial_cash * 100.0,
            annual_cash_flow / initial_cash * 100.0,
            total_inflows / initial_cash,
        )
    } else {
        (0.0, 0.0, 0.0)
    };

    TrialResult {
        irr,
        total_return,
        cash_on_cash_return,
        equity_multiple,
        monthly_cash_flow: annual_cash_flow / 12.0,
        annual_cash_flow,
        total_profit,
        exit_value,
        inputs: scenario,
    }
}

/// Standard annuity payment: P·r(1+r)^n / ((1+r)^n − 1).
fn amortized_payment(principal: f64, monthly_rate: f64, total_months: u32) -> f64 {
    if principal <= 0.0 || total_months == 0 {
        return 0.0;
    }
    if monthly_rate.abs() < EPS {
        return principal / total_months as f64;
    }
    let compound = (1.0 + monthly_rate).powi(total_months as i32);
    principal * monthly_rate * compound / (compound - 1.0)
}

/// Outstanding balance after `months_elapsed` payments, in closed form:
/// B_k = P·((1+r)^n − (1+r)^k) / ((1+r)^n − 1).
fn remaining_balance(
    principal: f64,
    monthly_rate: f64,
    total_months: u32,
    months_elapsed: u32,
) -> f64 {
    if principal <= 0.0 || total_months == 0 || months_elapsed >= total_months {
        return 0.0;
    }
    if monthly_rate.abs() < EPS {
        return principal * (1.0 - months_elapsed as f64 / total_months as f64);
    }
    let factor_n = (1.0 + monthly_rate).powi(total_months as i32);
    let factor_k = (1.0 + monthly_rate).powi(months_elapsed as i32);
    principal * (factor_n - factor_k) / (factor_n - 1.0)
}
