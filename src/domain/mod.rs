//! Domain layer - Pure pricing logic and entities.
//!
//! No I/O and no async here (hexagonal architecture inner ring).
//! Everything is deterministic and testable in isolation.

pub mod bet;
pub mod ladder;
pub mod margin;
pub mod odds;
pub mod snapshot;

// Re-export core types for convenience
pub use bet::{
    BetExecution, BetRequest, EngineQuote, Fill, MarketUid, OrderResponse, OrderStatus,
    PreparedOrder, Quote, QuoteRequest, QuoteSimulation, SimulationRequest,
};
pub use ladder::{LadderError, OddsLadder, align};
pub use margin::{NetMarginBreakdown, NetMarginInputs, compute_net_margin};
pub use odds::OddsError;
pub use snapshot::{
    BankSnapshot, GasSnapshot, LimitsSnapshot, SequencerStatus, Timestamped, VenueMetadata,
};
