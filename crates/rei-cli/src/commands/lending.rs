use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rei_core::lending::hard_money::{self, HardMoneyLoanInput};
use rei_core::lending::loan_comparison::{self, LoanComparisonInput};

use crate::input;

/// Arguments for hard-money loan analysis
#[derive(Args)]
pub struct HardMoneyArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Acquisition price
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Renovation budget
    #[arg(long)]
    pub rehab_budget: Option<Decimal>,

    /// Expected after-repair value
    #[arg(long)]
    pub arv: Option<Decimal>,

    /// Maximum loan as a fraction of ARV
    #[arg(long, default_value = "0.70")]
    pub loan_to_arv: Decimal,

    /// Annual interest rate as a decimal
    #[arg(long, default_value = "0.12")]
    pub interest_rate: Decimal,

    /// Origination points
    #[arg(long, default_value = "2")]
    pub points: Decimal,

    /// Loan term in months
    #[arg(long, default_value_t = 6)]
    pub term_months: u32,

    /// Monthly taxes, insurance, and utilities
    #[arg(long, default_value = "0")]
    pub monthly_holding_costs: Decimal,

    /// Resale costs as a fraction of ARV
    #[arg(long, default_value = "0.07")]
    pub selling_costs_rate: Decimal,
}

/// Arguments for loan comparison
#[derive(Args)]
pub struct CompareLoansArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_hard_money(args: HardMoneyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let hm_input: HardMoneyLoanInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let purchase_price = args
            .purchase_price
            .ok_or("--purchase-price is required (or provide --input)")?;
        let rehab_budget = args
            .rehab_budget
            .ok_or("--rehab-budget is required (or provide --input)")?;
        let after_repair_value = args.arv.ok_or("--arv is required (or provide --input)")?;

        HardMoneyLoanInput {
            purchase_price,
            rehab_budget,
            after_repair_value,
            loan_to_arv: args.loan_to_arv,
            interest_rate: args.interest_rate,
            points: args.points,
            term_months: args.term_months,
            monthly_holding_costs: args.monthly_holding_costs,
            selling_costs_rate: args.selling_costs_rate,
        }
    };

    let result = hard_money::analyze_hard_money_loan(&hm_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_compare_loans(args: CompareLoansArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cmp_input: LoanComparisonInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for loan comparison".into());
    };
    let result = loan_comparison::compare_loans(&cmp_input)?;
    Ok(serde_json::to_value(result)?)
}
