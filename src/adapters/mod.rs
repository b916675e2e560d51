//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` on top of other
//! ports and the runtime cache. Transport adapters (HTTP, RPC) for the
//! venues live outside this crate.
//!
//! Adapter categories:
//! - `limits`: payout limits loaded from the quote engine and served from
//!   the runtime registry

pub mod limits;

pub use limits::{EngineLimitsFetcher, RegistryLimits};
