//! Traffic Simulator
//!
//! Builds wireless-network traffic scenarios on top of the deterministic
//! runner in `trafficsim-simulation`.
//!
//! # Architecture
//!
//! - **Endpoint Selection**: participant counts around a target fraction and
//!   distinct station indices drawn without replacement
//! - **Traffic Plans**: one participant set per traffic class per network
//! - **Workloads**: the FTP Model 2 renewal schedule, a self-rescheduling
//!   traffic source that rotates over its client applications
//! - **Configuration**: builder structs with the 3GPP defaults
//!
//! # Example
//!
//! ```ignore
//! use trafficsim_simulator::{FtpM2Config, Simulator, SimulatorConfig};
//! use std::time::Duration;
//!
//! // Two networks of about 10 stations each
//! let config = SimulatorConfig::new(2, 10)
//!     .with_seed(12345)
//!     .with_ftp(FtpM2Config::default().with_arrival_rate(0.5));
//!
//! let mut simulator = Simulator::new(config)?;
//! let report = simulator.run_for(Duration::from_secs(10))?;
//!
//! println!("Bursts: {}", report.total_bursts());
//! ```

pub mod config;
pub mod endpoints;
pub mod plan;
pub mod report;
pub mod runner;
pub mod workload;

pub use config::{ClassShare, FtpM2Config, NetworkConfig, SimulatorConfig, TrafficMix};
pub use endpoints::{EndpointSelector, PopulationModel, SelectionError, SelectionStrategy};
pub use plan::{ParticipantSet, TrafficPlan};
pub use report::{NetworkReport, SimulationReport};
pub use runner::{NetworkDeployment, Simulator, SimulatorError};
pub use workload::{FtpM2Endpoints, FtpM2Schedule, ScheduleError, SchedulePhase};
