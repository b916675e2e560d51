//! Ladder Venue Client - Aligned Quotes and Bounded-time Order Placement
//!
//! The ladder venue only trades at discrete prices published in its
//! metadata. This client:
//! - Caches venue metadata in its own single-flight slot (stale or malformed
//!   snapshots are rejected, never cached)
//! - Aligns every quoted and submitted price to the venue ladder
//! - Rejects orders whose slippage exceeds the venue maximum before any
//!   submission
//! - Bounds submission by `betting_delay + heartbeat`; a late executor is
//!   detached and its outcome only logged
//! - Reconciles fills into a final `BetExecution`

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, instrument, warn};

use crate::cache::{Clock, SnapshotCell};
use crate::domain::bet::{BetExecution, BetRequest, OrderResponse, PreparedOrder, Quote, QuoteRequest};
use crate::domain::snapshot::VenueMetadata;
use crate::error::LadderClientError;
use crate::ports::venue::{MetadataProvider, OrderExecutor, QuoteSource};

/// Client for the discretized-ladder venue.
pub struct LadderClient {
  /// Metadata slot scoped to this client.
  metadata_slot: SnapshotCell<VenueMetadata, LadderClientError>,
  metadata: Arc<dyn MetadataProvider>,
  quotes: Arc<dyn QuoteSource>,
  executor: Arc<dyn OrderExecutor>,
}

impl LadderClient {
  /// Create a client. A zero metadata TTL is a configuration error.
  pub fn new(
    metadata_ttl: Duration,
    metadata: Arc<dyn MetadataProvider>,
    quotes: Arc<dyn QuoteSource>,
    executor: Arc<dyn OrderExecutor>,
    clock: Arc<dyn Clock>,
  ) -> Result<Self, LadderClientError> {
    Ok(Self {
      metadata_slot: SnapshotCell::new("venue_metadata", metadata_ttl, clock)?,
      metadata,
      quotes,
      executor,
    })
  }

  /// Best available quote with its price aligned to the venue ladder.
  #[instrument(skip(self, request), fields(market = %request.market_uid, side = %request.side))]
  pub async fn best_quote(&self, request: &QuoteRequest) -> Result<Quote, LadderClientError> {
    let metadata = self.load_metadata().await?;
    let mut quote = self
      .quotes
      .best_quote(request)
      .await
      .map_err(|e| LadderClientError::upstream("quote_source.best_quote", e))?;

    let raw_odds = quote.odds;
    quote.odds = metadata.ladder.align(raw_odds)?;
    debug!(raw_odds, aligned_odds = quote.odds, "Quote aligned to ladder");
    Ok(quote)
  }

  /// Place a bet and reconcile its fills.
  ///
  /// Fails with `SlippageRejected` before anything is submitted when the
  /// requested slippage exceeds the venue maximum, and with `Timeout` when
  /// the executor does not settle within the metadata deadline.
  #[instrument(
    skip(self, request),
    fields(market = %request.market_uid, side = %request.side, stake = request.stake)
  )]
  pub async fn place_bet(&self, request: BetRequest) -> Result<BetExecution, LadderClientError> {
    let metadata = self.load_metadata().await?;

    if slippage_exceeds(request.odds_slippage, metadata.max_odds_slippage) {
      warn!(
        requested = request.odds_slippage,
        max = metadata.max_odds_slippage,
        "Slippage above venue maximum, order not submitted"
      );
      return Err(LadderClientError::SlippageRejected {
        requested: request.odds_slippage,
        max: metadata.max_odds_slippage,
      });
    }

    let order = PreparedOrder {
      odds: metadata.ladder.align(request.odds)?,
      market_uid: request.market_uid,
      side: request.side,
      stake: request.stake,
      odds_slippage: request.odds_slippage,
      betting_delay_ms: metadata.betting_delay_ms,
      heartbeat_ms: metadata.heartbeat_ms,
    };

    let response = self
      .submit_within(order, metadata.submission_deadline())
      .await?;
    let execution = BetExecution::reconcile(request.stake, response);

    info!(
      status = ?execution.status,
      filled = execution.filled_stake(),
      remaining = execution.remaining_stake,
      "Bet reconciled"
    );
    Ok(execution)
  }

  /// Cached metadata, fetched and validated on miss.
  async fn load_metadata(&self) -> Result<VenueMetadata, LadderClientError> {
    let provider = Arc::clone(&self.metadata);
    self
      .metadata_slot
      .get_or_fetch(move || async move {
        let metadata = provider
          .latest()
          .await
          .map_err(|e| LadderClientError::upstream("metadata_provider.latest", e))?;
        metadata.ladder.validate()?;
        let max = metadata.max_odds_slippage;
        if !(max.is_finite() && max >= 0.0) {
          return Err(LadderClientError::InvalidMetadata {
            field: "max_odds_slippage",
            value: max,
          });
        }
        Ok(metadata)
      })
      .await
  }

  async fn submit_within(
    &self,
    order: PreparedOrder,
    deadline: Option<Duration>,
  ) -> Result<OrderResponse, LadderClientError> {
    let Some(deadline) = deadline else {
      return self
        .executor
        .submit(order)
        .await
        .map_err(|e| LadderClientError::upstream("order_executor.submit", e));
    };

    let executor = Arc::clone(&self.executor);
    let mut handle = tokio::spawn(async move { executor.submit(order).await }.in_current_span());

    match tokio::time::timeout(deadline, &mut handle).await {
      Ok(Ok(result)) => result.map_err(|e| LadderClientError::upstream("order_executor.submit", e)),
      Ok(Err(join_err)) => Err(LadderClientError::upstream(
        "order_executor.submit",
        anyhow::Error::new(join_err),
      )),
      Err(_) => {
        let deadline_ms = deadline.as_millis();
        warn!(deadline_ms, "Order not settled before deadline, detaching executor");
        tokio::spawn(log_late_settlement(handle).in_current_span());
        Err(LadderClientError::Timeout { deadline_ms })
      }
    }
  }
}

/// Negative or non-finite requested slippage is never acceptable.
fn slippage_exceeds(requested: f64, max: f64) -> bool {
  !(requested.is_finite() && requested >= 0.0) || requested > max
}

/// Wait for a detached submission and record how it ended.
async fn log_late_settlement(handle: JoinHandle<anyhow::Result<OrderResponse>>) {
  match handle.await {
    Ok(Ok(response)) => warn!(
      status = ?response.status,
      fills = response.fills.len(),
      "Late executor settlement ignored"
    ),
    Ok(Err(e)) => warn!(error = %e, "Late executor failure ignored"),
    Err(e) => warn!(error = %e, "Detached executor task did not complete"),
  }
}
