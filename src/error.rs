//! Error taxonomy for the runtime cache and both venue clients.
//!
//! Every variant carries the numbers that triggered it so callers can
//! branch on structure rather than parse messages. Each enum also exposes a
//! stable `code()` for logs and metrics labels.
//!
//! Errors that cross a single-flight slot are `Clone`: every waiter on the
//! same fetch receives the same outcome. Upstream `anyhow` errors are kept
//! behind an `Arc` for that reason.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::ladder::LadderError;

/// Runtime cache failures.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
  /// Rejected at construction; never retried.
  #[error("{field} ttl must be a positive duration, got {value_ms} ms")]
  Configuration { field: String, value_ms: u128 },
  /// A per-chain resource was requested without a chain.
  #[error("chain identifier required for {resource}")]
  MissingChain { resource: &'static str },
  /// Loader returned a value without an observation timestamp.
  #[error("{label} snapshot missing timestamp")]
  MissingTimestamp { label: String },
  /// Loader returned a value already older than its TTL.
  #[error("{label} snapshot stale (age {age_ms} ms > ttl {ttl_ms} ms)")]
  Stale {
    label: String,
    age_ms: i64,
    ttl_ms: u128,
  },
  #[error("{label} fetch failed: {cause:#}")]
  Fetch {
    label: String,
    cause: Arc<anyhow::Error>,
  },
}

impl CacheError {
  pub fn fetch(label: impl Into<String>, cause: anyhow::Error) -> Self {
    Self::Fetch {
      label: label.into(),
      cause: Arc::new(cause),
    }
  }

  pub const fn code(&self) -> &'static str {
    match self {
      Self::Configuration { .. } => "E-CACHE-CONFIG",
      Self::MissingChain { .. } => "E-CACHE-CHAIN",
      Self::MissingTimestamp { .. } => "E-CACHE-TIMESTAMP",
      Self::Stale { .. } => "E-CACHE-STALE",
      Self::Fetch { .. } => "E-CACHE-FETCH",
    }
  }

  /// Stale or unstamped snapshot; a later call may succeed.
  pub const fn is_stale(&self) -> bool {
    matches!(self, Self::Stale { .. } | Self::MissingTimestamp { .. })
  }
}

/// Ladder venue client failures.
#[derive(Debug, Clone, Error)]
pub enum LadderClientError {
  /// Metadata slot failure (stale snapshot, bad TTL).
  #[error(transparent)]
  Cache(#[from] CacheError),
  /// Malformed ladder in metadata, or a price that cannot be aligned.
  #[error(transparent)]
  Ladder(#[from] LadderError),
  /// Metadata field outside its valid range.
  #[error("invalid venue metadata: {field}={value}")]
  InvalidMetadata { field: &'static str, value: f64 },
  #[error("requested slippage {requested} exceeds venue max {max}")]
  SlippageRejected { requested: f64, max: f64 },
  /// Deadline elapsed; the executor outcome is not observed.
  #[error("order not settled within {deadline_ms} ms")]
  Timeout { deadline_ms: u128 },
  #[error("{operation} failed: {cause:#}")]
  Upstream {
    operation: &'static str,
    cause: Arc<anyhow::Error>,
  },
}

impl LadderClientError {
  pub fn upstream(operation: &'static str, cause: anyhow::Error) -> Self {
    Self::Upstream {
      operation,
      cause: Arc::new(cause),
    }
  }

  pub const fn code(&self) -> &'static str {
    match self {
      Self::Cache(inner) if inner.is_stale() => "E-LADDER-METADATA-STALE",
      Self::Cache(inner) => inner.code(),
      Self::Ladder(LadderError::InvalidDefinition { .. }) => "E-LADDER-METADATA-INVALID",
      Self::Ladder(LadderError::Incompatible { .. }) => "E-LADDER-ODDS",
      Self::InvalidMetadata { .. } => "E-LADDER-METADATA-INVALID",
      Self::SlippageRejected { .. } => "E-LADDER-SLIPPAGE",
      Self::Timeout { .. } => "E-LADDER-PARTIAL-TIMEOUT",
      Self::Upstream { .. } => "E-LADDER-UPSTREAM",
    }
  }
}

/// Quote simulation failures.
#[derive(Debug, Clone, Error)]
pub enum QuoteSimError {
  #[error("{field} must be finite and positive, got {value}")]
  Configuration { field: &'static str, value: f64 },
  #[error("stake must be a positive finite amount, got {stake}")]
  Stake { stake: f64 },
  #[error("invalid quote response: {field}={value}")]
  InvalidResponse { field: &'static str, value: f64 },
  /// Limits slot failure surfaced by the runtime cache.
  #[error(transparent)]
  Cache(#[from] CacheError),
  #[error("invalid payout limits: max_payout_usd={max_payout_usd}")]
  InvalidLimits { max_payout_usd: f64 },
  #[error("max payout exceeded: payout={expected_payout:.2}, cap={payout_cap:.2}")]
  MaxPayoutExceeded {
    expected_payout: f64,
    payout_cap: f64,
  },
  #[error("odds delta {delta:.6} above threshold {threshold:.6}")]
  DeltaThresholdExceeded { delta: f64, threshold: f64 },
  #[error("{operation} failed: {cause:#}")]
  Upstream {
    operation: &'static str,
    cause: Arc<anyhow::Error>,
  },
}

impl QuoteSimError {
  pub fn upstream(operation: &'static str, cause: anyhow::Error) -> Self {
    Self::Upstream {
      operation,
      cause: Arc::new(cause),
    }
  }

  pub const fn code(&self) -> &'static str {
    match self {
      Self::Configuration { .. } => "E-SIM-CONFIG",
      Self::Stake { .. } => "E-SIM-STAKE",
      Self::InvalidResponse { .. } => "E-SIM-INVALID-RESPONSE",
      Self::Cache(inner) if inner.is_stale() => "E-SIM-LIMITS-STALE",
      Self::Cache(inner) => inner.code(),
      Self::InvalidLimits { .. } => "E-SIM-INVALID-LIMITS",
      Self::MaxPayoutExceeded { .. } => "E-SIM-MAX-PAYOUT",
      Self::DeltaThresholdExceeded { .. } => "E-SIM-DELTA-THRESH",
      Self::Upstream { .. } => "E-SIM-UPSTREAM",
    }
  }

  /// Deterministic business-rule rejection: identical inputs reproduce it.
  pub const fn is_rejection(&self) -> bool {
    matches!(
      self,
      Self::MaxPayoutExceeded { .. } | Self::DeltaThresholdExceeded { .. }
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::ladder::OddsLadder;

  #[test]
  fn test_stale_cache_error_maps_to_metadata_stale() {
    let err = LadderClientError::from(CacheError::Stale {
      label: "venue_metadata".into(),
      age_ms: 1500,
      ttl_ms: 800,
    });
    assert_eq!(err.code(), "E-LADDER-METADATA-STALE");
    assert_eq!(
      err.to_string(),
      "venue_metadata snapshot stale (age 1500 ms > ttl 800 ms)"
    );
  }

  #[test]
  fn test_ladder_error_codes() {
    let invalid = LadderClientError::from(LadderError::InvalidDefinition {
      ladder: OddsLadder::Levels(vec![]),
    });
    assert_eq!(invalid.code(), "E-LADDER-METADATA-INVALID");

    let incompatible = LadderClientError::from(LadderError::Incompatible {
      price: f64::NAN,
      ladder: OddsLadder::Step(0.05),
    });
    assert_eq!(incompatible.code(), "E-LADDER-ODDS");
  }

  #[test]
  fn test_upstream_message_includes_cause_chain() {
    let cause = anyhow::anyhow!("connection reset").context("GET /metadata");
    let err = CacheError::fetch("bank", cause);
    assert_eq!(err.code(), "E-CACHE-FETCH");
    assert_eq!(err.to_string(), "bank fetch failed: GET /metadata: connection reset");
  }

  #[test]
  fn test_simulation_rejections_are_flagged() {
    let err = QuoteSimError::DeltaThresholdExceeded {
      delta: 0.01,
      threshold: 0.005,
    };
    assert!(err.is_rejection());
    assert_eq!(err.code(), "E-SIM-DELTA-THRESH");
    assert!(!QuoteSimError::Stake { stake: 0.0 }.is_rejection());
  }

  #[test]
  fn test_stale_limits_keep_cache_kind() {
    let err = QuoteSimError::from(CacheError::Stale {
      label: "limits".into(),
      age_ms: 3_000,
      ttl_ms: 2_500,
    });
    assert_eq!(err.code(), "E-SIM-LIMITS-STALE");
    assert!(!err.is_rejection());
    let err = QuoteSimError::from(CacheError::fetch("limits", anyhow::anyhow!("down")));
    assert_eq!(err.code(), "E-CACHE-FETCH");
  }
}
