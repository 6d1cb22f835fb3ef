//! Core types for the traffic simulator.
//!
//! - [`RandomVariable`] and [`SimRng`]: the random variable source
//! - [`Event`] and [`Action`]: what a source receives and emits
//! - [`TrafficSource`]: a deterministic, synchronous traffic state machine
//! - [`ApplicationLayer`]: the collaborator that installs applications and
//!   sends bursts on a source's behalf

mod error;
mod message;
mod random;
mod session;
mod traits;

pub use error::SourceError;
pub use message::{Action, Event, TimerId};
pub use random::{RandomVariable, SimRng};
pub use session::{SenderSpec, TransferSession};
pub use traits::{ApplicationLayer, TrafficSource};
