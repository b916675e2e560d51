//! Payout Limits Adapters
//!
//! Two `LimitsProvider` implementations wired around the runtime registry:
//! - `EngineLimitsFetcher`: the registry's upstream loader, stamping the
//!   quote engine's venue-wide payout ceiling with the observation time
//! - `RegistryLimits`: what the quote simulator consumes, serving limits
//!   from the registry's cached slot

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::cache::{Clock, RuntimeRegistry};
use crate::domain::snapshot::LimitsSnapshot;
use crate::ports::quote_engine::{LimitsProvider, QuoteEngine};

/// Loads payout limits straight from the quote engine.
pub struct EngineLimitsFetcher {
    engine: Arc<dyn QuoteEngine>,
    clock: Arc<dyn Clock>,
    /// Venue quote margin reported alongside the payout cap.
    quote_margin: f64,
}

impl EngineLimitsFetcher {
    pub fn new(engine: Arc<dyn QuoteEngine>, clock: Arc<dyn Clock>, quote_margin: f64) -> Self {
        Self {
            engine,
            clock,
            quote_margin,
        }
    }
}

#[async_trait]
impl LimitsProvider for EngineLimitsFetcher {
    async fn latest(&self) -> Result<LimitsSnapshot> {
        let max_payout_usd = self
            .engine
            .max_payout()
            .await
            .context("Failed to query max payout")?;
        debug!(max_payout_usd, "Payout limits fetched");
        Ok(LimitsSnapshot {
            max_payout_usd,
            quote_margin: self.quote_margin,
            fetched_at: self.clock.now(),
        })
    }
}

/// Serves limits through the runtime registry's single-flight slot.
pub struct RegistryLimits {
    registry: Arc<RuntimeRegistry>,
}

impl RegistryLimits {
    pub fn new(registry: Arc<RuntimeRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl LimitsProvider for RegistryLimits {
    async fn latest(&self) -> Result<LimitsSnapshot> {
        Ok(self.registry.limits().await?)
    }
}
