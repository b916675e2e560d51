//! Runtime snapshot types.
//!
//! Every externally fetched fact carries the instant it was observed
//! upstream. Freshness is always judged from that embedded timestamp, never
//! from the moment the fetch happened to complete locally.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ladder::OddsLadder;

/// A value that knows when it was observed.
pub trait Timestamped {
    /// Upstream observation time, or `None` if the provider did not stamp
    /// the value (such a value is never cached).
    fn timestamp(&self) -> Option<DateTime<Utc>>;
}

/// Treasury balance across chains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankSnapshot {
    pub total_usd: f64,
    pub per_chain_usd: BTreeMap<String, f64>,
    pub fetched_at: DateTime<Utc>,
}

/// Network gas price on one chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasSnapshot {
    pub chain: String,
    pub price_gwei: f64,
    pub fetched_at: DateTime<Utc>,
}

/// Ladder venue metadata.
///
/// Timing parameters are published in milliseconds and may be missing or
/// garbage upstream, so they stay `f64` here and are interpreted by
/// [`VenueMetadata::submission_deadline`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueMetadata {
    pub ladder: OddsLadder,
    pub betting_delay_ms: f64,
    pub heartbeat_ms: f64,
    /// Largest slippage the venue accepts on an order.
    pub max_odds_slippage: f64,
    pub fetched_at: DateTime<Utc>,
}

impl VenueMetadata {
    /// Time allowed for an order to settle: betting delay plus heartbeat.
    ///
    /// `None` means unbounded. Returned whenever either input is not finite,
    /// their sum is not strictly positive, or it overflows a `Duration`.
    pub fn submission_deadline(&self) -> Option<Duration> {
        if !(self.betting_delay_ms.is_finite() && self.heartbeat_ms.is_finite()) {
            return None;
        }
        let total_ms = self.betting_delay_ms + self.heartbeat_ms;
        if total_ms > 0.0 {
            Duration::try_from_secs_f64(total_ms / 1000.0).ok()
        } else {
            None
        }
    }
}

/// Counterparty payout limits on the simulation venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitsSnapshot {
    pub max_payout_usd: f64,
    pub quote_margin: f64,
    pub fetched_at: DateTime<Utc>,
}

/// Rollup sequencer health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencerStatus {
    pub chain: String,
    pub healthy: bool,
    pub checked_at: DateTime<Utc>,
}

impl Timestamped for BankSnapshot {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.fetched_at)
    }
}

impl Timestamped for GasSnapshot {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.fetched_at)
    }
}

impl Timestamped for VenueMetadata {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.fetched_at)
    }
}

impl Timestamped for LimitsSnapshot {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.fetched_at)
    }
}

impl Timestamped for SequencerStatus {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        Some(self.checked_at)
    }
}
