//! Quote Simulator - Pre-trade Validation on the Simulation Venue
//!
//! Prices a stake through the venue quote engine, checks it against the
//! current payout limits and the configured quoted/marginal odds tolerance,
//! and returns the full simulation. Nothing is ever submitted from here.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::domain::bet::{QuoteSimulation, SimulationRequest};
use crate::domain::odds::{expected_payout, payout_headroom};
use crate::error::{CacheError, QuoteSimError};
use crate::ports::quote_engine::{LimitsProvider, QuoteEngine};

/// Tolerance applied to the payout and delta comparisons.
pub const SIMULATION_EPSILON: f64 = 1e-9;

/// Simulation thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
  /// Largest accepted `|marginal - quoted|`.
  pub delta_odd_reject: f64,
}

impl SimulationConfig {
  pub fn validate(&self) -> Result<(), QuoteSimError> {
    if self.delta_odd_reject.is_finite() && self.delta_odd_reject > 0.0 {
      Ok(())
    } else {
      Err(QuoteSimError::Configuration {
        field: "delta_odd_reject",
        value: self.delta_odd_reject,
      })
    }
  }
}

/// Stateless validator over the quote engine and a limits provider.
pub struct QuoteSimulator {
  threshold: f64,
  engine: Arc<dyn QuoteEngine>,
  limits: Arc<dyn LimitsProvider>,
}

impl QuoteSimulator {
  pub fn new(
    config: SimulationConfig,
    engine: Arc<dyn QuoteEngine>,
    limits: Arc<dyn LimitsProvider>,
  ) -> Result<Self, QuoteSimError> {
    config.validate()?;
    Ok(Self {
      threshold: config.delta_odd_reject,
      engine,
      limits,
    })
  }

  pub const fn threshold(&self) -> f64 {
    self.threshold
  }

  /// Validate a stake against the current quote and payout limits.
  ///
  /// Checks run in order: stake, quote prices, limits, payout cap, odds
  /// delta. The first failure is returned.
  #[instrument(skip(self, request), fields(stake = request.stake))]
  pub async fn simulate_quote(
    &self,
    request: &SimulationRequest,
  ) -> Result<QuoteSimulation, QuoteSimError> {
    let stake = request.stake;
    if !(stake.is_finite() && stake > 0.0) {
      return Err(QuoteSimError::Stake { stake });
    }

    let quote = self
      .engine
      .fetch_quote(request)
      .await
      .map_err(|e| QuoteSimError::upstream("quote_engine.fetch_quote", e))?;
    let quoted_odd = ensure_price("quoted_odd", quote.quoted_odd)?;
    let marginal_odd = ensure_price("marginal_odd", quote.marginal_odd)?;

    let limits = self
      .limits
      .latest()
      .await
      .map_err(limits_error)?;
    if !(limits.max_payout_usd.is_finite() && limits.max_payout_usd > 0.0) {
      return Err(QuoteSimError::InvalidLimits {
        max_payout_usd: limits.max_payout_usd,
      });
    }

    let payout_cap = if quote.max_payout_limit.is_finite() && quote.max_payout_limit > 0.0 {
      limits.max_payout_usd.min(quote.max_payout_limit)
    } else {
      limits.max_payout_usd
    };

    let expected_payout = expected_payout(stake, marginal_odd);
    if expected_payout > payout_cap + SIMULATION_EPSILON {
      warn!(expected_payout, payout_cap, "Simulated payout above cap");
      return Err(QuoteSimError::MaxPayoutExceeded {
        expected_payout,
        payout_cap,
      });
    }

    let delta = (marginal_odd - quoted_odd).abs();
    if delta > self.threshold + SIMULATION_EPSILON {
      warn!(delta, threshold = self.threshold, "Odds delta above threshold");
      return Err(QuoteSimError::DeltaThresholdExceeded {
        delta,
        threshold: self.threshold,
      });
    }

    let simulation = QuoteSimulation {
      quoted_odd,
      marginal_odd,
      delta,
      stake,
      amount_token: quote.amount_token.or(request.amount_token),
      expected_payout,
      payout_cap,
      payout_headroom: payout_headroom(payout_cap, expected_payout),
    };
    debug!(
      delta,
      expected_payout,
      headroom = simulation.payout_headroom,
      "Quote simulation accepted"
    );
    Ok(simulation)
  }
}

/// Cache failures keep their own kind; anything else is an upstream error.
fn limits_error(err: anyhow::Error) -> QuoteSimError {
  match err.downcast::<CacheError>() {
    Ok(cache) => QuoteSimError::Cache(cache),
    Err(err) => QuoteSimError::upstream("limits_provider.latest", err),
  }
}

/// Quote prices live in the decimal-odds domain: finite and above 1.
fn ensure_price(field: &'static str, value: f64) -> Result<f64, QuoteSimError> {
  if value.is_finite() && value > 1.0 {
    Ok(value)
  } else {
    Err(QuoteSimError::InvalidResponse { field, value })
  }
}

#[cfg(test)]
mod tests {
  use async_trait::async_trait;
  use chrono::Utc;

  use super::*;
  use crate::domain::bet::EngineQuote;
  use crate::domain::snapshot::LimitsSnapshot;

  struct StubEngine(EngineQuote);

  #[async_trait]
  impl QuoteEngine for StubEngine {
    async fn fetch_quote(&self, _request: &SimulationRequest) -> anyhow::Result<EngineQuote> {
      Ok(self.0.clone())
    }

    async fn max_payout(&self) -> anyhow::Result<f64> {
      Ok(1_000.0)
    }
  }

  struct StubLimits(f64);

  #[async_trait]
  impl LimitsProvider for StubLimits {
    async fn latest(&self) -> anyhow::Result<LimitsSnapshot> {
      Ok(LimitsSnapshot {
        max_payout_usd: self.0,
        quote_margin: 0.0,
        fetched_at: Utc::now(),
      })
    }
  }

  fn quote(quoted: f64, marginal: f64) -> EngineQuote {
    EngineQuote {
      quoted_odd: quoted,
      marginal_odd: marginal,
      max_payout_limit: f64::INFINITY,
      amount_token: None,
    }
  }

  fn simulator(threshold: f64, quote: EngineQuote, max_payout: f64) -> QuoteSimulator {
    QuoteSimulator::new(
      SimulationConfig {
        delta_odd_reject: threshold,
      },
      Arc::new(StubEngine(quote)),
      Arc::new(StubLimits(max_payout)),
    )
    .unwrap()
  }

  fn request(stake: f64) -> SimulationRequest {
    SimulationRequest {
      stake,
      amount_token: None,
    }
  }

  #[tokio::test]
  async fn test_delta_above_threshold_rejected() {
    let sim = simulator(0.005, quote(1.84, 1.85), 1_000.0);
    let err = sim.simulate_quote(&request(50.0)).await.unwrap_err();
    match err {
      QuoteSimError::DeltaThresholdExceeded { delta, threshold } => {
        assert!((delta - 0.01).abs() < 1e-9);
        assert_eq!(threshold, 0.005);
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[tokio::test]
  async fn test_delta_within_threshold_reports_payout() {
    let sim = simulator(0.02, quote(1.84, 1.85), 1_000.0);
    let result = sim.simulate_quote(&request(50.0)).await.unwrap();
    assert!((result.expected_payout - 92.5).abs() < 1e-9);
    assert!((result.delta - 0.01).abs() < 1e-9);
    assert_eq!(result.payout_cap, 1_000.0);
    assert!((result.payout_headroom - 907.5).abs() < 1e-9);
  }

  #[tokio::test]
  async fn test_quote_limit_tightens_cap() {
    let mut q = quote(1.84, 1.85);
    q.max_payout_limit = 90.0;
    let sim = simulator(0.02, q, 1_000.0);
    let err = sim.simulate_quote(&request(50.0)).await.unwrap_err();
    assert!(matches!(
      err,
      QuoteSimError::MaxPayoutExceeded { payout_cap, .. } if payout_cap == 90.0
    ));
    assert!(err.is_rejection());
  }

  #[tokio::test]
  async fn test_payout_exactly_at_cap_passes() {
    let sim = simulator(0.02, quote(2.0, 2.0), 100.0);
    let result = sim.simulate_quote(&request(50.0)).await.unwrap();
    assert_eq!(result.payout_headroom, 0.0);
  }

  #[tokio::test]
  async fn test_invalid_stake_rejected_before_quote() {
    let sim = simulator(0.02, quote(1.84, 1.85), 1_000.0);
    for stake in [0.0, -5.0, f64::NAN, f64::INFINITY] {
      let err = sim.simulate_quote(&request(stake)).await.unwrap_err();
      assert_eq!(err.code(), "E-SIM-STAKE");
    }
  }

  #[tokio::test]
  async fn test_price_at_or_below_one_is_invalid_response() {
    let sim = simulator(0.02, quote(1.0, 1.85), 1_000.0);
    let err = sim.simulate_quote(&request(10.0)).await.unwrap_err();
    assert!(matches!(
      err,
      QuoteSimError::InvalidResponse { field: "quoted_odd", .. }
    ));
  }

  #[tokio::test]
  async fn test_non_positive_limits_rejected() {
    let sim = simulator(0.02, quote(1.84, 1.85), 0.0);
    let err = sim.simulate_quote(&request(10.0)).await.unwrap_err();
    assert_eq!(err.code(), "E-SIM-INVALID-LIMITS");
  }

  #[tokio::test]
  async fn test_amount_token_prefers_quote_value() {
    let mut q = quote(1.84, 1.85);
    q.amount_token = Some(12.0);
    let sim = simulator(0.02, q, 1_000.0);
    let result = sim
      .simulate_quote(&SimulationRequest {
        stake: 10.0,
        amount_token: Some(3.0),
      })
      .await
      .unwrap();
    assert_eq!(result.amount_token, Some(12.0));
  }

  struct StaleLimits;

  #[async_trait]
  impl LimitsProvider for StaleLimits {
    async fn latest(&self) -> anyhow::Result<LimitsSnapshot> {
      Err(anyhow::Error::new(CacheError::Stale {
        label: "limits".into(),
        age_ms: 4_000,
        ttl_ms: 2_500,
      }))
    }
  }

  #[tokio::test]
  async fn test_stale_limits_surface_as_cache_error() {
    let sim = QuoteSimulator::new(
      SimulationConfig {
        delta_odd_reject: 0.02,
      },
      Arc::new(StubEngine(quote(1.84, 1.85))),
      Arc::new(StaleLimits),
    )
    .unwrap();
    let err = sim.simulate_quote(&request(10.0)).await.unwrap_err();
    assert!(matches!(err, QuoteSimError::Cache(CacheError::Stale { .. })));
    assert_eq!(err.code(), "E-SIM-LIMITS-STALE");
  }

  #[test]
  fn test_threshold_validated_at_construction() {
    for threshold in [0.0, -0.1, f64::NAN] {
      let result = QuoteSimulator::new(
        SimulationConfig {
          delta_odd_reject: threshold,
        },
        Arc::new(StubEngine(quote(1.84, 1.85))),
        Arc::new(StubLimits(1_000.0)),
      );
      assert!(matches!(result, Err(ref e) if e.code() == "E-SIM-CONFIG"));
    }
  }
}
