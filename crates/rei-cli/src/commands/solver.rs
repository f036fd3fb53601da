use clap::Args;
use serde_json::{json, Value};

use rei_core::solver::{self, IrrParams};

/// Arguments for the standalone IRR solver
#[derive(Args)]
pub struct IrrArgs {
    /// Periodic cash flows (comma-separated, e.g. "-1000,300,400,500")
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub cash_flows: Vec<f64>,

    /// Initial guess for the Newton iteration, as a decimal
    #[arg(long, default_value_t = 0.10)]
    pub guess: f64,
}

/// Arguments for net present value
#[derive(Args)]
pub struct NpvArgs {
    /// Discount rate as a decimal (0.10 = 10%)
    #[arg(long)]
    pub rate: f64,

    /// Periodic cash flows (comma-separated, e.g. "-1000,300,400,500")
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub cash_flows: Vec<f64>,
}

pub fn run_irr(args: IrrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = IrrParams {
        initial_guess: args.guess,
        ..IrrParams::default()
    };
    let estimate = solver::irr_checked(&args.cash_flows, params)?;
    Ok(json!({
        "irr": estimate.rate,
        "irr_percent": estimate.rate * 100.0,
        "iterations": estimate.iterations,
    }))
}

pub fn run_npv(args: NpvArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if args.cash_flows.is_empty() {
        return Err("--cash-flows requires at least one value".into());
    }
    let value = solver::npv(args.rate, &args.cash_flows);
    Ok(json!({
        "npv": value,
        "rate": args.rate,
        "periods": args.cash_flows.len(),
    }))
}
