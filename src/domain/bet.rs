//! Quote, order and simulation entities.
//!
//! Created per call and handed back to the strategy layer; nothing here is
//! persisted by the runtime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Deterministic cross-venue market identifier (hashed upstream).
pub type MarketUid = String;

/// Fill-size tolerance used when reconciling an order.
pub const FILL_EPSILON: f64 = 1e-9;

/// Settlement status of an order on the ladder venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Accepted,
    PartiallyAccepted,
    Void,
}

/// Request for the best available price on a market side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub market_uid: MarketUid,
    pub side: String,
    pub stake: f64,
}

/// Best available price and size for a market side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub market_uid: MarketUid,
    pub side: String,
    pub odds: f64,
    pub available_stake: f64,
}

/// Order intent from the strategy layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetRequest {
    pub market_uid: MarketUid,
    pub side: String,
    pub stake: f64,
    /// Requested price, aligned to the ladder before submission.
    pub odds: f64,
    /// Slippage the caller is willing to accept.
    pub odds_slippage: f64,
}

/// Order as handed to the executor: aligned price plus venue timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedOrder {
    pub market_uid: MarketUid,
    pub side: String,
    pub odds: f64,
    pub stake: f64,
    pub odds_slippage: f64,
    pub betting_delay_ms: f64,
    pub heartbeat_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub fill_id: String,
    pub filled_stake: f64,
    pub odds: f64,
    pub accepted_at: DateTime<Utc>,
}

/// Raw executor outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub status: OrderStatus,
    pub fills: Vec<Fill>,
}

/// Reconciled outcome of a placed bet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetExecution {
    pub status: OrderStatus,
    pub fills: Vec<Fill>,
    pub requested_stake: f64,
    pub remaining_stake: f64,
}

impl BetExecution {
    /// Reconcile an executor response against the requested stake.
    ///
    /// `Accepted` needs the executor to report acceptance *and* the stake to
    /// be fully filled; any positive fill short of that is
    /// `PartiallyAccepted`; no fill at all is `Void`.
    pub fn reconcile(requested_stake: f64, response: OrderResponse) -> Self {
        let filled: f64 = response.fills.iter().map(|f| f.filled_stake).sum();
        let remaining_stake = (requested_stake - filled).max(0.0);
        let status = if remaining_stake <= FILL_EPSILON
            && response.status == OrderStatus::Accepted
        {
            OrderStatus::Accepted
        } else if filled > FILL_EPSILON {
            OrderStatus::PartiallyAccepted
        } else {
            OrderStatus::Void
        };
        Self {
            status,
            fills: response.fills,
            requested_stake,
            remaining_stake,
        }
    }

    pub fn filled_stake(&self) -> f64 {
        self.fills.iter().map(|f| f.filled_stake).sum()
    }
}

/// Request for a pre-trade simulation on the quote venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    pub stake: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_token: Option<f64>,
}

/// Quote engine answer for a stake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineQuote {
    pub quoted_odd: f64,
    pub marginal_odd: f64,
    /// Per-quote payout ceiling; ignored unless finite and positive.
    pub max_payout_limit: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_token: Option<f64>,
}

/// Validated hypothetical trade. Nothing has been submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSimulation {
    pub quoted_odd: f64,
    pub marginal_odd: f64,
    pub delta: f64,
    pub stake: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_token: Option<f64>,
    pub expected_payout: f64,
    pub payout_cap: f64,
    pub payout_headroom: f64,
}
