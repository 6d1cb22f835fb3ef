//! Transfer sessions and application install requests.

use crate::RandomVariable;
use std::net::SocketAddrV4;
use std::time::Duration;
use trafficsim_types::ApplicationId;

/// One file-transfer burst for one client application.
///
/// Produced by a single activation and handed to the application layer. The
/// scheduler keeps no reference to it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferSession {
    /// Client application that sends the burst.
    pub application: ApplicationId,

    /// Cursor position the application was selected at.
    pub client_index: usize,

    /// Activation counter, starting at 0 for the first burst.
    pub sequence: u64,

    /// Virtual time the burst starts.
    pub started_at: Duration,

    /// File size fixed at configuration time.
    pub file_size: f64,

    /// Service-time offset (`file_size / data_rate`).
    pub transfer_time: Duration,
}

/// Attributes for sender applications installed on client nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct SenderSpec {
    /// Server address the sender transmits to.
    pub remote: SocketAddrV4,

    /// Segment size in bytes.
    pub segment_size: u32,

    /// File-size distribution the sender is attributed with.
    pub file_size: RandomVariable,

    /// File size drawn from `file_size` when the senders were installed.
    pub file_size_bytes: u64,

    /// Time the sender applications start.
    pub start: Duration,

    /// Time the sender applications stop.
    pub stop: Duration,
}
