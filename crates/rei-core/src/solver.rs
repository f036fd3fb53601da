//! Shared NPV/IRR root finder.
//!
//! Every calculator that needs an internal rate of return goes through this
//! one Newton-Raphson implementation. The Monte Carlo cash-flow engine calls
//! it once per trial, so `irr` never fails: when the iteration budget runs
//! out the last estimate is returned and `converged` is set to false.

use crate::error::ReiError;
use crate::ReiResult;

/// Rate clamp bounds applied every iteration to prevent divergence.
const MIN_RATE: f64 = -0.99;
const MAX_RATE: f64 = 10.0;

/// Tuning knobs for the Newton-Raphson iteration.
#[derive(Debug, Clone, Copy)]
pub struct IrrParams {
    pub initial_guess: f64,
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl Default for IrrParams {
    fn default() -> Self {
        Self {
            initial_guess: 0.10,
            tolerance: 1e-5,
            max_iterations: 100,
        }
    }
}

/// Outcome of an IRR solve. `rate` is a decimal (0.10 = 10%).
#[derive(Debug, Clone, Copy)]
pub struct IrrEstimate {
    pub rate: f64,
    pub converged: bool,
    pub iterations: u32,
}

/// Net present value of `cash_flows` at `rate`, with cash_flows[t] occurring
/// at period t.
pub fn npv(rate: f64, cash_flows: &[f64]) -> f64 {
    let one_plus_r = 1.0 + rate;
    let mut result = 0.0;
    let mut discount = 1.0;
    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount *= one_plus_r;
        }
        result += cf / discount;
    }
    result
}

/// NPV(r) and its derivative d(NPV)/dr, evaluated in one pass.
fn npv_and_derivative(cash_flows: &[f64], rate: f64) -> (f64, f64) {
    let one_plus_r = 1.0 + rate;
    let mut npv = 0.0;
    let mut dnpv = 0.0;
    let mut discount = 1.0; // (1+r)^-t
    for (t, cf) in cash_flows.iter().enumerate() {
        npv += cf * discount;
        if t > 0 {
            // d/dr of CF_t (1+r)^-t = -t CF_t (1+r)^-(t+1)
            dnpv -= t as f64 * cf * discount / one_plus_r;
        }
        discount /= one_plus_r;
    }
    (npv, dnpv)
}

/// Newton-Raphson IRR. Converges when successive rates differ by less than
/// `params.tolerance`; the rate is clamped to [-0.99, 10] each step. Never
/// fails: a non-converged solve reports the last estimate.
pub fn irr(cash_flows: &[f64], params: IrrParams) -> IrrEstimate {
    let mut rate = params.initial_guess;

    for i in 0..params.max_iterations {
        let (npv_val, dnpv) = npv_and_derivative(cash_flows, rate);

        if dnpv.abs() < 1e-12 {
            // Flat NPV curve: a better estimate is not reachable from here.
            return IrrEstimate {
                rate,
                converged: false,
                iterations: i,
            };
        }

        let new_rate = (rate - npv_val / dnpv).clamp(MIN_RATE, MAX_RATE);

        if (new_rate - rate).abs() < params.tolerance {
            return IrrEstimate {
                rate: new_rate,
                converged: true,
                iterations: i + 1,
            };
        }

        rate = new_rate;
    }

    IrrEstimate {
        rate,
        converged: false,
        iterations: params.max_iterations,
    }
}

/// Strict variant for the standalone IRR tool: validates the flow vector and
/// surfaces non-convergence as an error instead of a best-effort estimate.
pub fn irr_checked(cash_flows: &[f64], params: IrrParams) -> ReiResult<IrrEstimate> {
    if cash_flows.len() < 2 {
        return Err(ReiError::InsufficientData(
            "IRR requires at least 2 cash flows".into(),
        ));
    }
    if !cash_flows.iter().any(|cf| *cf < 0.0) || !cash_flows.iter().any(|cf| *cf > 0.0) {
        return Err(ReiError::InvalidInput {
            field: "cash_flows".into(),
            reason: "IRR requires at least one negative and one positive cash flow".into(),
        });
    }

    let estimate = irr(cash_flows, params);
    if !estimate.converged {
        return Err(ReiError::ConvergenceFailure {
            function: "IRR".into(),
            iterations: estimate.iterations,
        });
    }
    Ok(estimate)
}
