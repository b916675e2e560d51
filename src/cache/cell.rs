//! Single-flight TTL slots.
//!
//! A `SnapshotCell` holds at most one cached value and at most one
//! outstanding upstream fetch. Concurrent misses share the same fetch
//! through a `Shared` future, so N callers cause exactly one upstream call
//! and all observe its single outcome.
//!
//! Freshness is taken from the timestamp embedded in the value: a value is
//! served while `now - timestamp <= ttl`, and a freshly fetched value that
//! already fails that check is rejected and never installed.
//!
//! Slot state lives under a `parking_lot::Mutex` that is never held across
//! an `.await`.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::clock::Clock;
use crate::domain::snapshot::Timestamped;
use crate::error::CacheError;

type SharedFetch<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;

struct Entry<T> {
    value: T,
    expires_at: DateTime<Utc>,
}

struct Pending<T, E> {
    id: u64,
    fetch: SharedFetch<T, E>,
}

struct Slot<T, E> {
    entry: Option<Entry<T>>,
    pending: Option<Pending<T, E>>,
    next_id: u64,
}

impl<T, E> Default for Slot<T, E> {
    fn default() -> Self {
        Self {
            entry: None,
            pending: None,
            next_id: 0,
        }
    }
}

/// Validated TTL in both representations.
#[derive(Debug, Clone, Copy)]
struct Ttl {
    std: Duration,
    chrono: chrono::Duration,
}

impl Ttl {
    fn new(field: &str, ttl: Duration) -> Result<Self, CacheError> {
        let invalid = || CacheError::Configuration {
            field: field.to_string(),
            value_ms: ttl.as_millis(),
        };
        if ttl.is_zero() {
            return Err(invalid());
        }
        let chrono = chrono::Duration::from_std(ttl).map_err(|_| invalid())?;
        Ok(Self { std: ttl, chrono })
    }
}

/// Check a freshly fetched value and compute its expiry.
fn admit<T: Timestamped>(
    label: &str,
    ttl: Ttl,
    now: DateTime<Utc>,
    value: T,
) -> Result<(T, DateTime<Utc>), CacheError> {
    let Some(stamped_at) = value.timestamp() else {
        return Err(CacheError::MissingTimestamp {
            label: label.to_string(),
        });
    };
    let age = now - stamped_at;
    if age > ttl.chrono {
        return Err(CacheError::Stale {
            label: label.to_string(),
            age_ms: age.num_milliseconds(),
            ttl_ms: ttl.std.as_millis(),
        });
    }
    // A timestamp from the future is treated as observed now.
    Ok((value, now.min(stamped_at) + ttl.chrono))
}

/// One single-flight, TTL-governed cache slot.
///
/// `E` is the caller's error type; cache-originated failures (stale or
/// unstamped snapshots) are converted into it.
pub struct SnapshotCell<T, E = CacheError> {
    label: Arc<str>,
    ttl: Ttl,
    clock: Arc<dyn Clock>,
    slot: Arc<Mutex<Slot<T, E>>>,
}

impl<T, E> SnapshotCell<T, E>
where
    T: Timestamped + Clone + Send + Sync + 'static,
    E: From<CacheError> + Clone + Send + Sync + 'static,
{
    /// Create an empty slot. A zero TTL is a configuration error.
    pub fn new(
        label: impl Into<String>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CacheError> {
        let label = label.into();
        let ttl = Ttl::new(&label, ttl)?;
        Ok(Self::with_ttl(label, ttl, clock))
    }

    fn with_ttl(label: String, ttl: Ttl, clock: Arc<dyn Clock>) -> Self {
        Self {
            label: Arc::from(label),
            ttl,
            clock,
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    /// Serve the cached value, join the in-flight fetch, or start one.
    ///
    /// `fetch` is only invoked when a new upstream call is needed. It is
    /// called while the slot is locked, so it must only construct the
    /// future, not perform work.
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let shared = {
            let mut slot = self.slot.lock();
            if let Some(entry) = &slot.entry {
                if self.clock.now() <= entry.expires_at {
                    debug!(label = %self.label, "Cache hit");
                    return Ok(entry.value.clone());
                }
            }
            if let Some(pending) = &slot.pending {
                debug!(label = %self.label, "Joining in-flight fetch");
                pending.fetch.clone()
            } else {
                slot.next_id += 1;
                let id = slot.next_id;
                let fetch = self.start_fetch(id, fetch());
                slot.pending = Some(Pending {
                    id,
                    fetch: fetch.clone(),
                });
                fetch
            }
        };
        shared.await
    }

    /// Drop the cached value and forget any in-flight fetch.
    ///
    /// Callers already awaiting the old fetch still receive its outcome,
    /// but it is not installed; the next `get_or_fetch` starts afresh.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock();
        slot.entry = None;
        slot.pending = None;
    }

    fn start_fetch<Fut>(&self, id: u64, upstream: Fut) -> SharedFetch<T, E>
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let slot = Arc::clone(&self.slot);
        let clock = Arc::clone(&self.clock);
        let label = Arc::clone(&self.label);
        let ttl = self.ttl;

        async move {
            let outcome = match upstream.await {
                Ok(value) => admit(&label, ttl, clock.now(), value).map_err(|err| {
                    warn!(label = %label, error = %err, "Rejected fetched snapshot");
                    E::from(err)
                }),
                Err(err) => Err(err),
            };

            let mut slot = slot.lock();
            if slot.pending.as_ref().is_some_and(|p| p.id == id) {
                slot.pending = None;
                match &outcome {
                    Ok((value, expires_at)) => {
                        info!(label = %label, expires_at = %expires_at, "Snapshot cached");
                        slot.entry = Some(Entry {
                            value: value.clone(),
                            expires_at: *expires_at,
                        });
                    }
                    Err(_) => slot.entry = None,
                }
            } else {
                debug!(label = %label, "Fetch superseded by invalidation, not installed");
            }
            outcome.map(|(value, _)| value)
        }
        .boxed()
        .shared()
    }
}

/// Independent single-flight slots keyed by a string identifier
/// (e.g. one gas slot per chain).
pub struct KeyedSnapshotCells<T, E = CacheError> {
    resource: &'static str,
    ttl: Ttl,
    clock: Arc<dyn Clock>,
    cells: Mutex<HashMap<String, Arc<SnapshotCell<T, E>>>>,
}

impl<T, E> KeyedSnapshotCells<T, E>
where
    T: Timestamped + Clone + Send + Sync + 'static,
    E: From<CacheError> + Clone + Send + Sync + 'static,
{
    pub fn new(
        resource: &'static str,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CacheError> {
        Ok(Self {
            resource,
            ttl: Ttl::new(resource, ttl)?,
            clock,
            cells: Mutex::new(HashMap::new()),
        })
    }

    /// Per-key [`SnapshotCell::get_or_fetch`]. An empty key fails before
    /// any fetch is attempted.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        if key.trim().is_empty() {
            return Err(CacheError::MissingChain {
                resource: self.resource,
            }
            .into());
        }
        let cell = {
            let mut cells = self.cells.lock();
            Arc::clone(cells.entry(key.to_string()).or_insert_with(|| {
                Arc::new(SnapshotCell::with_ttl(
                    format!("{}:{key}", self.resource),
                    self.ttl,
                    Arc::clone(&self.clock),
                ))
            }))
        };
        cell.get_or_fetch(fetch).await
    }

    pub fn invalidate(&self, key: &str) {
        if let Some(cell) = self.cells.lock().remove(key) {
            cell.invalidate();
        }
    }

    pub fn invalidate_all(&self) {
        let mut cells = self.cells.lock();
        for cell in cells.values() {
            cell.invalidate();
        }
        cells.clear();
    }
}
