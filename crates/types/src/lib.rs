//! Shared types for the traffic simulator.
//!
//! Node and application handles are opaque: the scheduling core passes them
//! between the scenario builder and the application layer without owning any
//! behavior behind them.

mod endpoints;
mod identifiers;
mod traffic;

pub use endpoints::EndpointPool;
pub use identifiers::{ApplicationId, NetworkId, NodeId};
pub use traffic::TrafficClass;
