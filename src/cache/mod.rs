//! Runtime Cache - Single-flight TTL Slots
//!
//! - `clock`: injectable wall clock
//! - `cell`: one single-flight slot, and a per-key family of them
//! - `registry`: the runtime resources (bank, gas, venue metadata, limits,
//!   sequencer) behind one instance

pub mod cell;
pub mod clock;
pub mod registry;

pub use cell::{KeyedSnapshotCells, SnapshotCell};
pub use clock::{Clock, ManualClock, SystemClock};
pub use registry::{RuntimeKey, RuntimeRegistry, RuntimeTtls};
