//! Like-kind (IRC §1031) exchange analysis: boot, recognized and deferred
//! gain, carryover basis, and the identification/closing deadlines.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ReiError;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::ReiResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange1031Input {
    /// Sale price of the relinquished property.
    pub relinquished_sale_price: Money,
    /// Adjusted basis of the relinquished property (cost plus improvements
    /// minus depreciation taken).
    pub adjusted_basis: Money,
    /// Commissions and closing costs on the sale.
    #[serde(default)]
    pub selling_costs: Money,
    /// Mortgage paid off on the relinquished property.
    #[serde(default)]
    pub relinquished_mortgage: Money,
    /// Purchase price of the replacement property.
    pub replacement_price: Money,
    /// New mortgage on the replacement property.
    #[serde(default)]
    pub replacement_mortgage: Money,
    /// Closing date of the relinquished sale; starts the 45/180-day clocks.
    pub sale_closing_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange1031Output {
    /// Gain realized on the sale (net price minus adjusted basis).
    pub realized_gain: Money,
    /// Equity freed by the sale after costs and mortgage payoff.
    pub net_equity: Money,
    /// Equity not reinvested in the replacement.
    pub cash_boot: Money,
    /// Debt relief not replaced by new debt.
    pub mortgage_boot: Money,
    pub total_boot: Money,
    /// Taxable now: the lesser of realized gain and total boot.
    pub recognized_gain: Money,
    /// Deferred into the replacement property.
    pub deferred_gain: Money,
    /// Replacement purchase price reduced by the deferred gain.
    pub replacement_basis: Money,
    /// 45 days after closing: candidate replacements must be identified.
    pub identification_deadline: NaiveDate,
    /// 180 days after closing: the replacement purchase must close.
    pub exchange_deadline: NaiveDate,
    /// True when no gain is recognized.
    pub fully_deferred: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyze a like-kind exchange and report boot, gain treatment, carryover
/// basis, and the statutory deadlines.
pub fn analyze_exchange(
    input: &Exchange1031Input,
) -> ReiResult<ComputationOutput<Exchange1031Output>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(input)?;

    let net_sale_price = input.relinquished_sale_price - input.selling_costs;
    let realized_gain = net_sale_price - input.adjusted_basis;
    let net_equity = net_sale_price - input.relinquished_mortgage;

    let equity_reinvested = input.replacement_price - input.replacement_mortgage;
    let cash_boot = (net_equity - equity_reinvested).max(Decimal::ZERO);
    let mortgage_boot =
        (input.relinquished_mortgage - input.replacement_mortgage).max(Decimal::ZERO);
    let total_boot = cash_boot + mortgage_boot;

    // A realized loss cannot be recognized through a 1031 exchange.
    let recognized_gain = realized_gain.max(Decimal::ZERO).min(total_boot);
    let deferred_gain = (realized_gain - recognized_gain).max(Decimal::ZERO);
    let replacement_basis = input.replacement_price - deferred_gain;

    let identification_deadline = deadline(input.sale_closing_date, 45)?;
    let exchange_deadline = deadline(input.sale_closing_date, 180)?;

    if realized_gain <= Decimal::ZERO {
        warnings.push(
            "Sale realizes no gain; a 1031 exchange defers nothing and forfeits loss recognition"
                .into(),
        );
    }
    if input.replacement_price < net_sale_price {
        warnings.push(
            "Replacement costs less than the net sale price; trading down triggers boot".into(),
        );
    }
    if total_boot > Decimal::ZERO && realized_gain > Decimal::ZERO {
        warnings.push(format!(
            "${total_boot:.0} of boot makes ${recognized_gain:.0} of gain taxable this year"
        ));
    }

    let output = Exchange1031Output {
        realized_gain,
        net_equity,
        cash_boot,
        mortgage_boot,
        total_boot,
        recognized_gain,
        deferred_gain,
        replacement_basis,
        identification_deadline,
        exchange_deadline,
        fully_deferred: recognized_gain.is_zero() && realized_gain > Decimal::ZERO,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Like-Kind Exchange (IRC 1031) Analysis",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn deadline(from: NaiveDate, days: u64) -> ReiResult<NaiveDate> {
    from.checked_add_days(Days::new(days))
        .ok_or_else(|| ReiError::InvalidInput {
            field: "sale_closing_date".into(),
            reason: "date out of supported range".into(),
        })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(input: &Exchange1031Input) -> ReiResult<()> {
    if input.relinquished_sale_price <= Decimal::ZERO {
        return Err(ReiError::InvalidInput {
            field: "relinquished_sale_price".into(),
            reason: "must be positive".into(),
        });
    }
    if input.adjusted_basis < Decimal::ZERO {
        return Err(ReiError::InvalidInput {
            field: "adjusted_basis".into(),
            reason: "must be >= 0".into(),
        });
    }
    if input.selling_costs < Decimal::ZERO {
        return Err(ReiError::InvalidInput {
            field: "selling_costs".into(),
            reason: "must be >= 0".into(),
        });
    }
    if input.relinquished_mortgage < Decimal::ZERO {
        return Err(ReiError::InvalidInput {
            field: "relinquished_mortgage".into(),
            reason: "must be >= 0".into(),
        });
    }
    if input.replacement_price <= Decimal::ZERO {
        return Err(ReiError::InvalidInput {
            field: "replacement_price".into(),
            reason: "must be positive".into(),
        });
    }
    if input.replacement_mortgage < Decimal::ZERO {
        return Err(ReiError::InvalidInput {
            field: "replacement_mortgage".into(),
            reason: "must be >= 0".into(),
        });
    }
    if input.selling_costs >= input.relinquished_sale_price {
        return Err(ReiError::InvalidInput {
            field: "selling_costs".into(),
            reason: "must be less than the sale price".into(),
        });
    }
    Ok(())
}
