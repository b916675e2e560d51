//! Ladder Venue Ports - Metadata, Quotes and Order Submission
//!
//! Collaborators of the ladder venue client. Implementations own the
//! transport (HTTP, RPC) and any retry policy; the client itself never
//! retries.

use async_trait::async_trait;

use crate::domain::bet::{OrderResponse, PreparedOrder, Quote, QuoteRequest};
use crate::domain::snapshot::VenueMetadata;

/// Source of venue metadata snapshots.
#[async_trait]
pub trait MetadataProvider: Send + Sync + 'static {
  /// Latest metadata, stamped with its upstream fetch time.
  ///
  /// Must not silently serve stale data; the caller rejects snapshots
  /// older than its TTL.
  async fn latest(&self) -> anyhow::Result<VenueMetadata>;
}

/// Raw best-price lookup, before ladder alignment.
#[async_trait]
pub trait QuoteSource: Send + Sync + 'static {
  async fn best_quote(&self, request: &QuoteRequest) -> anyhow::Result<Quote>;
}

/// Order submission on the ladder venue.
#[async_trait]
pub trait OrderExecutor: Send + Sync + 'static {
  /// Submit a prepared order and wait for its settlement.
  ///
  /// May be slow or never settle; callers bound it with a deadline.
  async fn submit(&self, order: PreparedOrder) -> anyhow::Result<OrderResponse>;
}
