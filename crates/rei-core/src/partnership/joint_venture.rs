//! Joint-venture distribution waterfall: return of capital, then preferred
//! return, then the remaining profit split by the agreed percentages.

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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
    pub name: String,
    /// Capital contributed at formation.
    pub capital_contribution: Money,
    /// Share of post-preferred profit as a decimal (0.5 = 50%). Shares must
    /// sum to 1 across partners.
    pub profit_share: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JointVentureInput {
    pub partners: Vec<Partner>,
    /// Total cash available for distribution at exit, including the return
    /// of contributed capital.
    pub distributable_cash: Money,
    /// Annual preferred return on contributed capital as a decimal
    /// (0.08 = 8%), simple, non-compounding.
    #[serde(default)]
    pub preferred_return_rate: Rate,
    /// Years of the hold, used to accrue the preferred return.
    pub hold_years: u32,
}

/// Distribution detail for one partner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerDistribution {
    pub name: String,
    pub capital_contribution: Money,
    pub capital_returned: Money,
    pub preferred_received: Money,
    pub profit_split: Money,
    pub total_distribution: Money,
    /// Total received minus capital contributed.
    pub net_profit: Money,
    /// Net profit over capital contributed.
    pub return_on_investment: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JointVentureOutput {
    pub partners: Vec<PartnerDistribution>,
    pub total_capital: Money,
    /// Preferred return accrued across all partners, whether or not the
    /// waterfall could pay it in full.
    pub total_preferred_accrued: Money,
    /// Cash left after capital and preferred tiers, split by profit share.
    pub residual_profit: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the three-tier distribution waterfall. When cash is short, each tier
/// pays pro-rata to the accrued claim and later tiers receive nothing.
pub fn distribute(
    input: &JointVentureInput,
) -> ReiResult<ComputationOutput<JointVentureOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(input)?;

    let total_capital: Decimal = input
        .partners
        .iter()
        .map(|p| p.capital_contribution)
        .sum();
    let years = Decimal::from(input.hold_years);

    let mut remaining = input.distributable_cash;

    // Tier 1: return of capital, pro-rata on contribution when short.
    let capital_pool = remaining.min(total_capital);
    remaining -= capital_pool;

    // Tier 2: simple preferred return on contributed capital.
    let total_preferred_accrued = total_capital * input.preferred_return_rate * years;
    let preferred_pool = remaining.min(total_preferred_accrued);
    remaining -= preferred_pool;

    // Tier 3: whatever is left, split by profit share.
    let residual_profit = remaining;

    let mut partners = Vec::with_capacity(input.partners.len());
    for partner in &input.partners {
        let capital_fraction = if total_capital.is_zero() {
            Decimal::ZERO
        } else {
            partner.capital_contribution / total_capital
        };

        let capital_returned = capital_pool * capital_fraction;
        let preferred_received = preferred_pool * capital_fraction;
        let profit_split = residual_profit * partner.profit_share;
        let total_distribution = capital_returned + preferred_received + profit_split;
        let net_profit = total_distribution - partner.capital_contribution;
        let return_on_investment = if partner.capital_contribution.is_zero() {
            Decimal::ZERO
        } else {
            net_profit / partner.capital_contribution
        };

        partners.push(PartnerDistribution {
            name: partner.name.clone(),
            capital_contribution: partner.capital_contribution,
            capital_returned,
            preferred_received,
            profit_split,
            total_distribution,
            net_profit,
            return_on_investment,
        });
    }

    if input.distributable_cash < total_capital {
        warnings.push(
            "Distributable cash does not return contributed capital; partners absorb a loss"
                .into(),
        );
    } else if preferred_pool < total_preferred_accrued {
        warnings.push(
            "Cash covers capital but not the full preferred return; no residual profit to split"
                .into(),
        );
    }

    let output = JointVentureOutput {
        partners,
        total_capital,
        total_preferred_accrued,
        residual_profit,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Joint-Venture Distribution Waterfall",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

const PROFIT_SHARE_TOLERANCE: Decimal = dec!(0.0001);

fn validate(input: &JointVentureInput) -> ReiResult<()> {
    if input.partners.len() < 2 {
        return Err(ReiError::InsufficientData(
            "a joint venture needs at least two partners".into(),
        ));
    }
    if input.distributable_cash < Decimal::ZERO {
        return Err(ReiError::InvalidInput {
            field: "distributable_cash".into(),
            reason: "must be >= 0".into(),
        });
    }
    if input.preferred_return_rate < Decimal::ZERO {
        return Err(ReiError::InvalidInput {
            field: "preferred_return_rate".into(),
            reason: "must be >= 0".into(),
        });
    }
    let mut share_sum = Decimal::ZERO;
    for (i, partner) in input.partners.iter().enumerate() {
        if partner.name.trim().is_empty() {
            return Err(ReiError::InvalidInput {
                field: format!("partners[{i}].name"),
                reason: "must not be empty".into(),
            });
        }
        if partner.capital_contribution <= Decimal::ZERO {
            return Err(ReiError::InvalidInput {
                field: format!("partners[{i}].capital_contribution"),
                reason: "must be positive".into(),
            });
        }
        if partner.profit_share < Decimal::ZERO || partner.profit_share > Decimal::ONE {
            return Err(ReiError::InvalidInput {
                field: format!("partners[{i}].profit_share"),
                reason: "must be between 0 and 1".into(),
            });
        }
        share_sum += partner.profit_share;
    }
    if (share_sum - Decimal::ONE).abs() > PROFIT_SHARE_TOLERANCE {
        return Err(ReiError::InvalidInput {
            field: "partners".into(),
            reason: format!("profit shares must sum to 1, got {share_sum}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// GP puts in $100k for 30% of profit, LP $400k for 70%, 8% pref, 5y.
    fn sample_input() -> JointVentureInput {
        JointVentureInput {
            partners: vec![
                Partner {
                    name: "GP".into(),
                    capital_contribution: dec!(100000),
                    profit_share: dec!(0.30),
                },
                Partner {
                    name: "LP".into(),
                    capital_contribution: dec!(400000),
                    profit_share: dec!(0.70),
                },
            ],
            distributable_cash: dec!(900000),
            preferred_return_rate: dec!(0.08),
            hold_years: 5,
        }
    }

    #[test]
    fn test_full_waterfall() {
        let result = distribute(&sample_input()).unwrap();
        let out = &result.result;
        assert_eq!(out.total_capital, dec!(500000));
        // 500k * 8% * 5 years
        assert_eq!(out.total_preferred_accrued, dec!(200000));
        // 900k - 500k capital - 200k preferred
        assert_eq!(out.residual_profit, dec!(200000));

        let gp = &out.partners[0];
        assert_eq!(gp.capital_returned, dec!(100000));
        // 20% of the preferred pool (capital-weighted)
        assert_eq!(gp.preferred_received, dec!(40000));
        // 30% of residual
        assert_eq!(gp.profit_split, dec!(60000));
        assert_eq!(gp.total_distribution, dec!(200000));
        assert_eq!(gp.net_profit, dec!(100000));
        assert_eq!(gp.return_on_investment, Decimal::ONE);
    }

    #[test]
    fn test_distributions_sum_to_cash() {
        let result = distribute(&sample_input()).unwrap();
        let total: Decimal = result
            .result
            .partners
            .iter()
            .map(|p| p.total_distribution)
            .sum();
        assert_eq!(total, dec!(900000));
    }

    #[test]
    fn test_short_cash_pays_capital_pro_rata() {
        let mut input = sample_input();
        input.distributable_cash = dec!(400000);
        let result = distribute(&input).unwrap();
        let out = &result.result;
        assert_eq!(out.residual_profit, Decimal::ZERO);
        let gp = &out.partners[0];
        let lp = &out.partners[1];
        // 400k across 500k of claims: 80 cents on the dollar
        assert_eq!(gp.capital_returned, dec!(80000));
        assert_eq!(lp.capital_returned, dec!(320000));
        assert_eq!(gp.preferred_received, Decimal::ZERO);
        assert!(gp.net_profit < Decimal::ZERO);
        assert!(result.warnings.iter().any(|w| w.contains("loss")));
    }

    #[test]
    fn test_partial_preferred_stops_profit_tier() {
        let mut input = sample_input();
        input.distributable_cash = dec!(600000);
        let result = distribute(&input).unwrap();
        let out = &result.result;
        // Capital paid in full, 100k of the 200k preferred, nothing residual.
        assert_eq!(out.residual_profit, Decimal::ZERO);
        assert_eq!(out.partners[0].preferred_received, dec!(20000));
        assert_eq!(out.partners[1].preferred_received, dec!(80000));
        assert!(result.warnings.iter().any(|w| w.contains("preferred")));
    }

    #[test]
    fn test_zero_preferred_rate() {
        let mut input = sample_input();
        input.preferred_return_rate = Decimal::ZERO;
        let result = distribute(&input).unwrap();
        let out = &result.result;
        assert_eq!(out.total_preferred_accrued, Decimal::ZERO);
        assert_eq!(out.residual_profit, dec!(400000));
    }

    #[test]
    fn test_profit_shares_must_sum_to_one() {
        let mut input = sample_input();
        input.partners[0].profit_share = dec!(0.40);
        let err = distribute(&input).unwrap_err();
        assert!(matches!(err, ReiError::InvalidInput { field, .. } if field == "partners"));
    }

    #[test]
    fn test_single_partner_rejected() {
        let mut input = sample_input();
        input.partners.truncate(1);
        input.partners[0].profit_share = Decimal::ONE;
        assert!(matches!(
            distribute(&input).unwrap_err(),
            ReiError::InsufficientData(_)
        ));
    }

    #[test]
    fn test_zero_capital_rejected() {
        let mut input = sample_input();
        input.partners[0].capital_contribution = Decimal::ZERO;
        assert!(distribute(&input).is_err());
    }
}
