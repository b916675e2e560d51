//! Runtime Registry - Cached Runtime Facts for the Strategy Layer
//!
//! Holds one single-flight slot per runtime resource (bank, venue metadata,
//! limits, sequencer) plus one slot per chain for gas. Each registry is an
//! explicit instance built from its fetchers, TTLs and clock; there is no
//! process-wide cache.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::cell::{KeyedSnapshotCells, SnapshotCell};
use super::clock::Clock;
use crate::domain::snapshot::{
    BankSnapshot, GasSnapshot, LimitsSnapshot, SequencerStatus, VenueMetadata,
};
use crate::error::CacheError;
use crate::ports::runtime::RuntimeFetchers;

/// Per-resource time-to-live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeTtls {
    pub bank: Duration,
    pub gas: Duration,
    pub venue_metadata: Duration,
    pub limits: Duration,
    pub sequencer: Duration,
}

impl Default for RuntimeTtls {
    fn default() -> Self {
        Self {
            bank: Duration::from_millis(5_000),
            gas: Duration::from_millis(2_000),
            venue_metadata: Duration::from_millis(800),
            limits: Duration::from_millis(2_500),
            sequencer: Duration::from_millis(1_000),
        }
    }
}

impl RuntimeTtls {
    /// Every TTL must be strictly positive.
    pub fn validate(&self) -> Result<(), CacheError> {
        let fields = [
            ("bank", self.bank),
            ("gas", self.gas),
            ("venue_metadata", self.venue_metadata),
            ("limits", self.limits),
            ("sequencer", self.sequencer),
        ];
        match fields.into_iter().find(|(_, ttl)| ttl.is_zero()) {
            Some((field, ttl)) => Err(CacheError::Configuration {
                field: field.to_string(),
                value_ms: ttl.as_millis(),
            }),
            None => Ok(()),
        }
    }
}

/// Identifies one registry slot for targeted invalidation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuntimeKey {
    Bank,
    Gas(String),
    VenueMetadata,
    Limits,
    Sequencer,
}

pub struct RuntimeRegistry {
    fetchers: RuntimeFetchers,
    ttls: RuntimeTtls,
    bank: SnapshotCell<BankSnapshot>,
    gas: KeyedSnapshotCells<GasSnapshot>,
    venue_metadata: SnapshotCell<VenueMetadata>,
    limits: SnapshotCell<LimitsSnapshot>,
    sequencer: SnapshotCell<SequencerStatus>,
}

impl RuntimeRegistry {
    /// Build a registry. Fails on any non-positive TTL before any slot
    /// exists.
    pub fn new(
        ttls: RuntimeTtls,
        fetchers: RuntimeFetchers,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CacheError> {
        ttls.validate()?;
        Ok(Self {
            bank: SnapshotCell::new("bank", ttls.bank, Arc::clone(&clock))?,
            gas: KeyedSnapshotCells::new("gas", ttls.gas, Arc::clone(&clock))?,
            venue_metadata: SnapshotCell::new(
                "venue_metadata",
                ttls.venue_metadata,
                Arc::clone(&clock),
            )?,
            limits: SnapshotCell::new("limits", ttls.limits, Arc::clone(&clock))?,
            sequencer: SnapshotCell::new("sequencer", ttls.sequencer, clock)?,
            fetchers,
            ttls,
        })
    }

    pub const fn ttls(&self) -> &RuntimeTtls {
        &self.ttls
    }

    pub async fn bank(&self) -> Result<BankSnapshot, CacheError> {
        let fetcher = Arc::clone(&self.fetchers.bank);
        self.bank
            .get_or_fetch(move || async move {
                fetcher
                    .fetch_bank()
                    .await
                    .map_err(|e| CacheError::fetch("bank", e))
            })
            .await
    }

    /// Gas price for one chain. An empty chain fails with
    /// [`CacheError::MissingChain`] and never reaches the fetcher.
    pub async fn gas(&self, chain: &str) -> Result<GasSnapshot, CacheError> {
        let fetcher = Arc::clone(&self.fetchers.gas);
        let owned = chain.to_string();
        self.gas
            .get_or_fetch(chain, move || async move {
                fetcher
                    .fetch_gas(&owned)
                    .await
                    .map_err(|e| CacheError::fetch(format!("gas:{owned}"), e))
            })
            .await
    }

    pub async fn venue_metadata(&self) -> Result<VenueMetadata, CacheError> {
        let provider = Arc::clone(&self.fetchers.venue_metadata);
        self.venue_metadata
            .get_or_fetch(move || async move {
                provider
                    .latest()
                    .await
                    .map_err(|e| CacheError::fetch("venue_metadata", e))
            })
            .await
    }

    pub async fn limits(&self) -> Result<LimitsSnapshot, CacheError> {
        let provider = Arc::clone(&self.fetchers.limits);
        self.limits
            .get_or_fetch(move || async move {
                provider
                    .latest()
                    .await
                    .map_err(|e| CacheError::fetch("limits", e))
            })
            .await
    }

    pub async fn sequencer_health(&self) -> Result<SequencerStatus, CacheError> {
        let fetcher = Arc::clone(&self.fetchers.sequencer);
        self.sequencer
            .get_or_fetch(move || async move {
                fetcher
                    .fetch_sequencer()
                    .await
                    .map_err(|e| CacheError::fetch("sequencer", e))
            })
            .await
    }

    /// Clear every slot, including all per-chain gas slots.
    pub fn invalidate(&self) {
        self.bank.invalidate();
        self.gas.invalidate_all();
        self.venue_metadata.invalidate();
        self.limits.invalidate();
        self.sequencer.invalidate();
        info!("Runtime registry invalidated");
    }

    pub fn invalidate_key(&self, key: &RuntimeKey) {
        match key {
            RuntimeKey::Bank => self.bank.invalidate(),
            RuntimeKey::Gas(chain) => self.gas.invalidate(chain),
            RuntimeKey::VenueMetadata => self.venue_metadata.invalidate(),
            RuntimeKey::Limits => self.limits.invalidate(),
            RuntimeKey::Sequencer => self.sequencer.invalidate(),
        }
        info!(key = ?key, "Runtime registry slot invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttls_are_valid() {
        assert!(RuntimeTtls::default().validate().is_ok());
    }

    #[test]
    fn test_zero_ttl_names_the_field() {
        let ttls = RuntimeTtls {
            limits: Duration::ZERO,
            ..RuntimeTtls::default()
        };
        let err = ttls.validate().unwrap_err();
        assert_eq!(err.code(), "E-CACHE-CONFIG");
        assert_eq!(err.to_string(), "limits ttl must be a positive duration, got 0 ms");
    }
}
