//! Traffic workloads driven by the simulation runner.
//!
//! Each workload is a [`trafficsim_core::TrafficSource`]. Today that is the
//! 3GPP FTP Model 2 renewal schedule.

mod ftp_m2;

pub use ftp_m2::{FtpM2Endpoints, FtpM2Schedule, ScheduleError, SchedulePhase};
