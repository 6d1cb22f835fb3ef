//! Deterministic discrete-event runner.
//!
//! This crate provides the virtual clock that traffic sources run on. Given
//! the same seed, run number and sources, it produces identical results
//! every run.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  SimulationRunner                       │
//! │                                                         │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Event Queue (BTreeMap<EventKey, Event>)        │ │
//! │  │     Ordered by: time, source, sequence             │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     sources: Vec<Box<dyn TrafficSource>>           │ │
//! │  │     Each handles one event at a time               │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Actions → timers, bursts via ApplicationLayer  │ │
//! │  └────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no preemption: an event's actions are fully executed before the
//! next event is popped.

mod applications;
mod event_queue;
mod runner;

pub use applications::{InstalledSender, InstalledSink, RecordingApplications};
pub use event_queue::EventKey;
pub use runner::{RunnerError, SimulationRunner, SimulationStats};

/// Index of a traffic source registered with a [`SimulationRunner`].
pub type SourceIndex = u32;
