//! Events delivered to traffic sources and actions they emit.

use crate::TransferSession;
use std::time::Duration;

/// Timers a traffic source can arm.
///
/// A source has at most one pending timer per id; arming an id again
/// replaces the pending one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerId {
    /// Next file-transfer activation.
    FileTransfer,
    /// End of the client activity window.
    ClientStop,
}

/// Inputs delivered to a traffic source by the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A timer armed via [`Action::SetTimer`] fired.
    Timer(TimerId),

    /// The owner asked the source to stop generating traffic.
    Stop,
}

impl Event {
    /// Get a human-readable name for this event type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Event::Timer(TimerId::FileTransfer) => "FileTransferTimer",
            Event::Timer(TimerId::ClientStop) => "ClientStopTimer",
            Event::Stop => "Stop",
        }
    }
}

/// Outputs of a traffic source, executed by the runner.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Deliver `Event::Timer(id)` at absolute virtual time `fire_at`.
    SetTimer { id: TimerId, fire_at: Duration },

    /// Drop the pending timer with this id, if any.
    CancelTimer { id: TimerId },

    /// Ask the application layer to send one file burst.
    SendBurst(TransferSession),
}

impl Action {
    /// Get a human-readable name for this action type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Action::SetTimer { .. } => "SetTimer",
            Action::CancelTimer { .. } => "CancelTimer",
            Action::SendBurst(_) => "SendBurst",
        }
    }

    /// Check if this action arms or cancels a timer.
    pub fn is_timer(&self) -> bool {
        matches!(self, Action::SetTimer { .. } | Action::CancelTimer { .. })
    }
}
