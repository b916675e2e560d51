//! Runtime Fetcher Ports - Upstream Loaders for the Runtime Registry
//!
//! One loader per runtime resource. The registry calls a loader only on a
//! cache miss, and never twice concurrently for the same key. Loaders own
//! their own retry policy; the registry does not retry.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::snapshot::{BankSnapshot, GasSnapshot, SequencerStatus};
use crate::ports::quote_engine::LimitsProvider;
use crate::ports::venue::MetadataProvider;

/// Treasury balance loader.
#[async_trait]
pub trait BankFetcher: Send + Sync + 'static {
  async fn fetch_bank(&self) -> anyhow::Result<BankSnapshot>;
}

/// Per-chain gas price loader.
#[async_trait]
pub trait GasFetcher: Send + Sync + 'static {
  async fn fetch_gas(&self, chain: &str) -> anyhow::Result<GasSnapshot>;
}

/// Sequencer health check.
#[async_trait]
pub trait SequencerFetcher: Send + Sync + 'static {
  async fn fetch_sequencer(&self) -> anyhow::Result<SequencerStatus>;
}

/// The full set of loaders a `RuntimeRegistry` is built with.
#[derive(Clone)]
pub struct RuntimeFetchers {
  pub bank: Arc<dyn BankFetcher>,
  pub gas: Arc<dyn GasFetcher>,
  /// Venue metadata shares the ladder client's provider contract.
  pub venue_metadata: Arc<dyn MetadataProvider>,
  pub limits: Arc<dyn LimitsProvider>,
  pub sequencer: Arc<dyn SequencerFetcher>,
}
