//! Use Cases Layer - Venue Clients
//!
//! Orchestrates domain logic with port interfaces. Each client is an
//! explicit instance built from its collaborators; none hold global state.
//!
//! Use cases:
//! - `LadderClient`: aligned quotes and bounded-time order placement on the
//!   discretized-ladder venue
//! - `QuoteSimulator`: pre-trade quote validation on the simulation venue

pub mod ladder_client;
pub mod quote_simulator;

pub use ladder_client::LadderClient;
pub use quote_simulator::{QuoteSimulator, SimulationConfig};
