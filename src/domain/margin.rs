//! Cross-venue net margin.
//!
//! Backing one outcome on the ladder venue and the opposite outcome on the
//! simulation venue locks in `1 - 1/odds_a - 1/odds_b` before costs. Fees,
//! slippage allowances and gas (all expressed as a fraction of stake) are
//! deducted to give the net margin the strategy layer compares against its
//! threshold.
//!
//! Uses `Decimal` so that cost totals are exact.

use rust_decimal::Decimal;
use thiserror::Error;

/// Inputs for one two-leg opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetMarginInputs {
    /// Decimal odds on the ladder venue leg.
    pub odds_ladder: Decimal,
    /// Decimal odds on the simulation venue leg.
    pub odds_simulation: Decimal,
    pub fees_ladder: Decimal,
    pub fees_simulation: Decimal,
    pub gas_cost: Decimal,
    pub slippage_ladder: Decimal,
    pub slippage_simulation: Decimal,
}

/// Margin decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetMarginBreakdown {
    pub gross_margin: Decimal,
    pub fees_total: Decimal,
    pub slippage_total: Decimal,
    pub gas_total: Decimal,
    pub net_margin: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MarginError {
    #[error("{field} must be greater than 1, got {value}")]
    InvalidOdds { field: &'static str, value: Decimal },
    #[error("{field} must be non-negative, got {value}")]
    NegativeCost { field: &'static str, value: Decimal },
    #[error("threshold must be in [0, 1), got {0}")]
    InvalidThreshold(Decimal),
}

impl NetMarginInputs {
    fn validate(&self) -> Result<(), MarginError> {
        for (field, value) in [
            ("odds_ladder", self.odds_ladder),
            ("odds_simulation", self.odds_simulation),
        ] {
            if value <= Decimal::ONE {
                return Err(MarginError::InvalidOdds { field, value });
            }
        }
        for (field, value) in [
            ("fees_ladder", self.fees_ladder),
            ("fees_simulation", self.fees_simulation),
            ("gas_cost", self.gas_cost),
            ("slippage_ladder", self.slippage_ladder),
            ("slippage_simulation", self.slippage_simulation),
        ] {
            if value < Decimal::ZERO {
                return Err(MarginError::NegativeCost { field, value });
            }
        }
        Ok(())
    }
}

/// Compute gross and net margin for a two-leg position.
pub fn compute_net_margin(inputs: &NetMarginInputs) -> Result<NetMarginBreakdown, MarginError> {
    inputs.validate()?;

    let implied_ladder = Decimal::ONE / inputs.odds_ladder;
    let implied_simulation = Decimal::ONE / inputs.odds_simulation;
    let gross_margin = Decimal::ONE - implied_ladder - implied_simulation;

    let fees_total = inputs.fees_ladder + inputs.fees_simulation;
    let slippage_total = inputs.slippage_ladder + inputs.slippage_simulation;
    let gas_total = inputs.gas_cost;
    let net_margin = gross_margin - (fees_total + slippage_total + gas_total);

    Ok(NetMarginBreakdown {
        gross_margin,
        fees_total,
        slippage_total,
        gas_total,
        net_margin,
    })
}

/// True when the net margin reaches `threshold` (a fraction in `[0, 1)`).
pub fn meets_net_margin_threshold(
    inputs: &NetMarginInputs,
    threshold: Decimal,
) -> Result<bool, MarginError> {
    if threshold < Decimal::ZERO || threshold >= Decimal::ONE {
        return Err(MarginError::InvalidThreshold(threshold));
    }
    Ok(compute_net_margin(inputs)?.net_margin >= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn scenario(odds_ladder: Decimal, odds_simulation: Decimal) -> NetMarginInputs {
        NetMarginInputs {
            odds_ladder,
            odds_simulation,
            fees_ladder: dec!(0.004),
            fees_simulation: dec!(0.003),
            gas_cost: dec!(0.002),
            slippage_ladder: dec!(0.002),
            slippage_simulation: dec!(0.0015),
        }
    }

    #[test]
    fn test_breakdown_totals_are_exact() {
        let breakdown = compute_net_margin(&scenario(dec!(2.1), dec!(2.05))).unwrap();
        assert_eq!(breakdown.fees_total, dec!(0.007));
        assert_eq!(breakdown.slippage_total, dec!(0.0035));
        assert_eq!(breakdown.gas_total, dec!(0.002));
        let expected = breakdown.gross_margin - dec!(0.0125);
        assert!((breakdown.net_margin - expected).abs() < dec!(0.000001));
    }

    #[test]
    fn test_threshold_check() {
        // gross ≈ 0.0360, net ≈ 0.0235
        let tight = scenario(dec!(2.1), dec!(2.05));
        assert!(meets_net_margin_threshold(&tight, dec!(0.015)).unwrap());
        assert!(!meets_net_margin_threshold(&tight, dec!(0.03)).unwrap());

        let mut wide = scenario(dec!(2.5), dec!(2.6));
        wide.fees_ladder = dec!(0.002);
        wide.fees_simulation = dec!(0.002);
        wide.gas_cost = dec!(0.001);
        wide.slippage_ladder = dec!(0.001);
        wide.slippage_simulation = dec!(0.001);
        assert!(meets_net_margin_threshold(&wide, dec!(0.015)).unwrap());

        assert_eq!(
            meets_net_margin_threshold(&wide, dec!(1.2)),
            Err(MarginError::InvalidThreshold(dec!(1.2)))
        );
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        assert!(matches!(
            compute_net_margin(&scenario(Decimal::ONE, dec!(2.1))),
            Err(MarginError::InvalidOdds { field: "odds_ladder", .. })
        ));
        let mut negative = scenario(dec!(2.1), dec!(2.2));
        negative.gas_cost = Decimal::NEGATIVE_ONE;
        assert!(matches!(
            compute_net_margin(&negative),
            Err(MarginError::NegativeCost { field: "gas_cost", .. })
        ));
    }
}
