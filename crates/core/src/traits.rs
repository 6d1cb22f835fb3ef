//! Core traits for traffic sources and the application layer they drive.

use crate::{Action, Event, SenderSpec, SimRng, SourceError, TransferSession};
use std::time::Duration;
use trafficsim_types::{ApplicationId, EndpointPool};

/// Collaborator that owns the transport and application layer.
///
/// Traffic sources decide *when* something happens; the application layer
/// decides *how*. Keeping installation and burst delivery behind this trait
/// lets the scheduling logic run without a live network stack.
pub trait ApplicationLayer {
    /// Install a passive receive sink bound to `port` on every node.
    ///
    /// Returns the installed applications in node order.
    fn install_receive_sink(
        &mut self,
        nodes: &EndpointPool,
        port: u16,
        start: Duration,
    ) -> Vec<ApplicationId>;

    /// Install a sender on every node, all targeting `spec.remote`.
    ///
    /// Returns the installed applications in node order.
    fn install_sender(&mut self, nodes: &EndpointPool, spec: &SenderSpec) -> Vec<ApplicationId>;

    /// Send one burst from the session's application.
    fn send_burst(&mut self, session: &TransferSession);
}

/// A traffic source driven by a discrete-event runner.
///
/// Sources are:
///
/// - **Synchronous**: No async, no `.await`
/// - **Deterministic**: Same state + event + RNG state = same actions
/// - **Pure-ish**: Mutates self, performs I/O only through the
///   [`ApplicationLayer`] handed to [`TrafficSource::start`]
///
/// The runner calls [`TrafficSource::set_time`] before every `start` and
/// `handle` call and executes the returned actions.
pub trait TrafficSource {
    /// Name used in logs and reports.
    fn name(&self) -> &str;

    /// Install applications and return the actions that begin the schedule.
    fn start(
        &mut self,
        apps: &mut dyn ApplicationLayer,
        rng: &mut SimRng,
    ) -> Result<Vec<Action>, SourceError>;

    /// Process an event, returning actions to perform.
    ///
    /// Never blocks. Randomness comes only from `rng`.
    fn handle(&mut self, event: Event, rng: &mut SimRng) -> Vec<Action>;

    /// Set the current virtual time.
    fn set_time(&mut self, now: Duration);

    /// Get the time last set via `set_time()`.
    fn now(&self) -> Duration;
}
