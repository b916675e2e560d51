//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the cache and usecases layers
//! require from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `venue`: ladder venue metadata, quotes and order submission
//! - `quote_engine`: simulation venue quotes and payout limits
//! - `runtime`: upstream loaders behind the runtime registry

pub mod quote_engine;
pub mod runtime;
pub mod venue;

pub use quote_engine::{LimitsProvider, QuoteEngine};
pub use runtime::{BankFetcher, GasFetcher, RuntimeFetchers, SequencerFetcher};
pub use venue::{MetadataProvider, OrderExecutor, QuoteSource};
