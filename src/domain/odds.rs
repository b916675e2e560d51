//! Odds conversion and payout math.
//!
//! All prices on both venues are decimal odds (payout multiplier per unit
//! staked, strictly greater than 1). These helpers convert to and from
//! implied probability and american odds, apply venue commission, and strip
//! bookmaker overround. Pure functions, f64 in and out.

use thiserror::Error;

/// Tolerance used when checking the decimal-odds lower bound.
pub const ODDS_EPSILON: f64 = 1e-9;

/// Conversion failures, carrying the offending input.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum OddsError {
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },
    #[error("probability must be in (0, 1), got {0}")]
    InvalidProbability(f64),
    #[error("decimal odds must be greater than 1, got {0}")]
    InvalidDecimal(f64),
    #[error("american odds cannot be zero")]
    InvalidAmerican,
    #[error("commission must be in [0, 1), got {0}")]
    InvalidCommission(f64),
    #[error("{field} must be non-negative, got {value}")]
    InvalidCost { field: &'static str, value: f64 },
    #[error("total implied probability must be positive, got {0}")]
    InvalidProbabilityTotal(f64),
}

fn ensure_finite(value: f64, field: &'static str) -> Result<f64, OddsError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(OddsError::NonFinite { field, value })
    }
}

fn ensure_probability(value: f64) -> Result<f64, OddsError> {
    ensure_finite(value, "probability")?;
    if value <= 0.0 || value >= 1.0 {
        return Err(OddsError::InvalidProbability(value));
    }
    Ok(value)
}

/// Validate a decimal price: finite and strictly above 1.
pub fn ensure_decimal_odds(value: f64) -> Result<f64, OddsError> {
    ensure_finite(value, "decimal_odds")?;
    if value <= 1.0 + ODDS_EPSILON {
        return Err(OddsError::InvalidDecimal(value));
    }
    Ok(value)
}

fn ensure_commission(value: f64) -> Result<f64, OddsError> {
    ensure_finite(value, "commission")?;
    if !(0.0..1.0).contains(&value) {
        return Err(OddsError::InvalidCommission(value));
    }
    Ok(value)
}

/// Fair decimal odds for an implied probability.
pub fn decimal_from_probability(probability: f64) -> Result<f64, OddsError> {
    Ok(1.0 / ensure_probability(probability)?)
}

/// Implied probability of a decimal price.
pub fn probability_from_decimal(decimal_odds: f64) -> Result<f64, OddsError> {
    Ok(1.0 / ensure_decimal_odds(decimal_odds)?)
}

/// Convert american (moneyline) odds to decimal.
///
/// `+150` → 2.5, `-110` → 1.909…
pub fn decimal_from_american(american_odds: f64) -> Result<f64, OddsError> {
    ensure_finite(american_odds, "american_odds")?;
    if american_odds == 0.0 {
        return Err(OddsError::InvalidAmerican);
    }
    if american_odds > 0.0 {
        Ok(1.0 + american_odds / 100.0)
    } else {
        Ok(1.0 + 100.0 / american_odds.abs())
    }
}

/// Convert decimal odds to american odds, rounded to the nearest integer.
pub fn american_from_decimal(decimal_odds: f64) -> Result<f64, OddsError> {
    let odds = ensure_decimal_odds(decimal_odds)?;
    if odds >= 2.0 {
        Ok(((odds - 1.0) * 100.0).round())
    } else {
        Ok((-100.0 / (odds - 1.0)).round())
    }
}

/// Net decimal odds after the venue keeps `commission_rate` of winnings.
pub fn apply_commission(decimal_odds: f64, commission_rate: f64) -> Result<f64, OddsError> {
    let odds = ensure_decimal_odds(decimal_odds)?;
    let commission = ensure_commission(commission_rate)?;
    Ok(1.0 + (odds - 1.0) * (1.0 - commission))
}

/// Inverse of [`apply_commission`].
pub fn remove_commission(net_decimal_odds: f64, commission_rate: f64) -> Result<f64, OddsError> {
    let odds = ensure_decimal_odds(net_decimal_odds)?;
    let commission = ensure_commission(commission_rate)?;
    Ok(1.0 + (odds - 1.0) / (1.0 - commission))
}

/// Implied probabilities of every outcome, rescaled to sum to 1.
///
/// An empty market yields an empty vector.
pub fn normalized_probabilities(decimal_odds: &[f64]) -> Result<Vec<f64>, OddsError> {
    if decimal_odds.is_empty() {
        return Ok(Vec::new());
    }
    let implied = decimal_odds
        .iter()
        .map(|&odds| probability_from_decimal(odds))
        .collect::<Result<Vec<_>, _>>()?;
    let total: f64 = implied.iter().sum();
    if total <= ODDS_EPSILON {
        return Err(OddsError::InvalidProbabilityTotal(total));
    }
    Ok(implied.into_iter().map(|p| p / total).collect())
}

/// Fair decimal odds with the bookmaker margin removed.
pub fn remove_overround(decimal_odds: &[f64]) -> Result<Vec<f64>, OddsError> {
    normalized_probabilities(decimal_odds)?
        .into_iter()
        .map(decimal_from_probability)
        .collect()
}

/// Gross payout of a winning stake at the given decimal price.
pub fn expected_payout(stake: f64, decimal_odds: f64) -> f64 {
    stake * decimal_odds
}

/// Remaining room under a payout cap, never negative.
pub fn payout_headroom(payout_cap: f64, payout: f64) -> f64 {
    (payout_cap - payout).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_american_decimal_roundtrip() {
        let decimal = decimal_from_american(-110.0).unwrap();
        assert!((decimal - 1.909_090_9).abs() < 1e-6);
        assert_eq!(american_from_decimal(decimal).unwrap(), -110.0);

        assert!((decimal_from_american(145.0).unwrap() - 2.45).abs() < 1e-12);
        assert_eq!(american_from_decimal(2.45).unwrap(), 145.0);
    }

    #[test]
    fn test_probability_decimal_roundtrip() {
        let probability = probability_from_decimal(2.5).unwrap();
        assert!((probability - 0.4).abs() < 1e-9);
        assert!((decimal_from_probability(probability).unwrap() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_out_of_domain_inputs() {
        assert_eq!(probability_from_decimal(1.0), Err(OddsError::InvalidDecimal(1.0)));
        assert_eq!(decimal_from_probability(1.0), Err(OddsError::InvalidProbability(1.0)));
        assert_eq!(decimal_from_american(0.0), Err(OddsError::InvalidAmerican));
        assert_eq!(apply_commission(2.0, 1.0), Err(OddsError::InvalidCommission(1.0)));
        assert!(matches!(
            probability_from_decimal(f64::NAN),
            Err(OddsError::NonFinite { field: "decimal_odds", .. })
        ));
    }

    #[test]
    fn test_commission_applied_to_winnings_only() {
        let net = apply_commission(2.5, 0.05).unwrap();
        assert!((net - 2.425).abs() < 1e-12);
        let gross = remove_commission(net, 0.05).unwrap();
        assert!((gross - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_overround_removed() {
        let fair = remove_overround(&[1.85, 2.05]).unwrap();
        let total: f64 = normalized_probabilities(&fair).unwrap().iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        let implied: f64 = fair.iter().map(|o| 1.0 / o).sum();
        assert!((implied - 1.0).abs() < 1e-9);
        assert!(normalized_probabilities(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_payout_helpers() {
        assert!((expected_payout(50.0, 1.85) - 92.5).abs() < 1e-9);
        assert_eq!(payout_headroom(100.0, 120.0), 0.0);
        assert!((payout_headroom(1000.0, 92.5) - 907.5).abs() < 1e-9);
    }
}
