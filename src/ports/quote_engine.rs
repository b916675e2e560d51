//! Simulation Venue Ports - Quote Engine and Payout Limits
//!
//! The simulation venue prices a stake through its quote engine and caps
//! payouts per counterparty. Limits reach the simulator through
//! `LimitsProvider`, which in production is the cache-backed
//! `adapters::limits::RegistryLimits`.

use async_trait::async_trait;

use crate::domain::bet::{EngineQuote, SimulationRequest};
use crate::domain::snapshot::LimitsSnapshot;

/// Venue quote engine.
#[async_trait]
pub trait QuoteEngine: Send + Sync + 'static {
  /// Quoted and marginal price for the requested stake.
  async fn fetch_quote(&self, request: &SimulationRequest) -> anyhow::Result<EngineQuote>;

  /// Current venue-wide payout ceiling in USD.
  async fn max_payout(&self) -> anyhow::Result<f64>;
}

/// Source of payout-limit snapshots.
#[async_trait]
pub trait LimitsProvider: Send + Sync + 'static {
  /// Latest limits, stamped with their upstream fetch time.
  async fn latest(&self) -> anyhow::Result<LimitsSnapshot>;
}
