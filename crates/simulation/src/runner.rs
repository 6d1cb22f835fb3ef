//! Deterministic simulation runner.
//!
//! Sources are pure-ish state machines; the runner owns the clock, the event
//! queue, the RNG and the application layer, and executes every action a
//! source emits.

use crate::event_queue::EventKey;
use crate::{RecordingApplications, SourceIndex};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, trace};
use trafficsim_core::{Action, ApplicationLayer, Event, SimRng, SourceError, TimerId, TrafficSource};

/// Errors from runner operations addressed at a specific source.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// No source is registered under this index.
    #[error("Unknown traffic source index {0}")]
    UnknownSource(SourceIndex),

    /// The source refused to start.
    #[error(transparent)]
    Start(#[from] SourceError),
}

/// Statistics collected during simulation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SimulationStats {
    /// Total events processed.
    pub events_processed: u64,
    /// Total actions generated by sources.
    pub actions_generated: u64,
    /// Timers armed (including replacements).
    pub timers_set: u64,
    /// Timers cancelled or replaced before firing.
    pub timers_cancelled: u64,
    /// Bursts handed to the application layer.
    pub bursts_sent: u64,
}

/// Deterministic discrete-event runner.
///
/// Processes events in `(time, source, sequence)` order, one at a time, each
/// to completion before the next. Given the same seed, run number and
/// sources, produces identical results every run.
pub struct SimulationRunner<A: ApplicationLayer = RecordingApplications> {
    /// Registered sources, indexed by SourceIndex.
    sources: Vec<Box<dyn TrafficSource>>,

    /// Global event queue, ordered deterministically.
    event_queue: BTreeMap<EventKey, Event>,

    /// Sequence counter for deterministic ordering.
    sequence: u64,

    /// Current simulation time.
    now: Duration,

    /// The run's only RNG, lent to sources for every call.
    rng: SimRng,

    /// Pending timers, for replacement and cancellation.
    timers: HashMap<(SourceIndex, TimerId), EventKey>,

    /// Application layer that executes installs and bursts.
    apps: A,

    stats: SimulationStats,
}

impl<A: ApplicationLayer> SimulationRunner<A> {
    /// Create a runner with an RNG seeded from `(seed, run)`.
    pub fn new(apps: A, seed: u64, run: u64) -> Self {
        Self {
            sources: Vec::new(),
            event_queue: BTreeMap::new(),
            sequence: 0,
            now: Duration::ZERO,
            rng: SimRng::new(seed, run),
            timers: HashMap::new(),
            apps,
            stats: SimulationStats::default(),
        }
    }

    /// Register a source. It stays idle until [`Self::start_source`].
    pub fn add_source(&mut self, source: Box<dyn TrafficSource>) -> SourceIndex {
        let index = self.sources.len() as SourceIndex;
        debug!(source = index, name = source.name(), "Registered traffic source");
        self.sources.push(source);
        index
    }

    /// Start a source at the current time and execute its initial actions.
    pub fn start_source(&mut self, index: SourceIndex) -> Result<(), RunnerError> {
        let now = self.now;
        let source = self
            .sources
            .get_mut(index as usize)
            .ok_or(RunnerError::UnknownSource(index))?;

        source.set_time(now);
        let actions = source.start(&mut self.apps, &mut self.rng)?;
        info!(
            source = index,
            name = source.name(),
            initial_actions = actions.len(),
            "Started traffic source"
        );

        self.execute(index, actions);
        Ok(())
    }

    /// Deliver `Event::Stop` to a source at virtual time `at`.
    pub fn stop_source(&mut self, index: SourceIndex, at: Duration) -> Result<(), RunnerError> {
        if index as usize >= self.sources.len() {
            return Err(RunnerError::UnknownSource(index));
        }
        let at = at.max(self.now);
        self.schedule_event(index, at, Event::Stop);
        Ok(())
    }

    /// Process every event with time `<= end_time`.
    ///
    /// Later events stay queued, so a subsequent call continues where this
    /// one left off. The clock ends at `end_time` (it never moves backwards).
    pub fn run_until(&mut self, end_time: Duration) {
        trace!(
            end_time_secs = end_time.as_secs_f64(),
            "Running simulation step"
        );

        while let Some((key, event)) = self.pop_due(end_time) {
            self.now = key.time;
            let index = key.source;

            trace!(
                time = ?self.now,
                source = index,
                event = event.type_name(),
                "Processing event"
            );
            self.stats.events_processed += 1;

            if let Event::Timer(id) = event {
                self.timers.remove(&(index, id));
            }

            let Some(source) = self.sources.get_mut(index as usize) else {
                continue;
            };
            source.set_time(self.now);
            let actions = source.handle(event, &mut self.rng);
            self.execute(index, actions);
        }

        if !self.event_queue.is_empty() {
            debug!(
                remaining_events = self.event_queue.len(),
                "Time limit reached"
            );
        }
        self.now = self.now.max(end_time);
    }

    fn pop_due(&mut self, end_time: Duration) -> Option<(EventKey, Event)> {
        let (&key, _) = self.event_queue.first_key_value()?;
        if key.time > end_time {
            return None;
        }
        self.event_queue.pop_first()
    }

    fn execute(&mut self, from: SourceIndex, actions: Vec<Action>) {
        self.stats.actions_generated += actions.len() as u64;
        for action in actions {
            self.process_action(from, action);
        }
    }

    fn process_action(&mut self, from: SourceIndex, action: Action) {
        match action {
            Action::SetTimer { id, fire_at } => {
                self.cancel_timer(from, id);
                let fire_at = fire_at.max(self.now);
                let key = self.schedule_event(from, fire_at, Event::Timer(id));
                self.timers.insert((from, id), key);
                self.stats.timers_set += 1;
            }
            Action::CancelTimer { id } => self.cancel_timer(from, id),
            Action::SendBurst(session) => {
                trace!(
                    source = from,
                    application = %session.application,
                    sequence = session.sequence,
                    "Sending burst"
                );
                self.apps.send_burst(&session);
                self.stats.bursts_sent += 1;
            }
        }
    }

    fn cancel_timer(&mut self, source: SourceIndex, id: TimerId) {
        if let Some(key) = self.timers.remove(&(source, id)) {
            if self.event_queue.remove(&key).is_some() {
                self.stats.timers_cancelled += 1;
            }
        }
    }

    fn schedule_event(&mut self, source: SourceIndex, time: Duration, event: Event) -> EventKey {
        self.sequence += 1;
        let key = EventKey {
            time,
            source,
            sequence: self.sequence,
        };
        self.event_queue.insert(key, event);
        key
    }

    /// Current simulation time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Statistics collected so far.
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// Number of events waiting in the queue.
    pub fn pending_events(&self) -> usize {
        self.event_queue.len()
    }

    /// Time of the next queued event, if any.
    pub fn next_event_time(&self) -> Option<Duration> {
        self.event_queue.first_key_value().map(|(key, _)| key.time)
    }

    /// Get a registered source.
    pub fn source(&self, index: SourceIndex) -> Option<&dyn TrafficSource> {
        self.sources.get(index as usize).map(|s| s.as_ref())
    }

    /// Number of registered sources.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// The application layer.
    pub fn apps(&self) -> &A {
        &self.apps
    }

    /// Mutable access to the application layer.
    pub fn apps_mut(&mut self) -> &mut A {
        &mut self.apps
    }

    /// Mutable access to the run's RNG, for setup draws made outside sources.
    pub fn rng_mut(&mut self) -> &mut SimRng {
        &mut self.rng
    }
}
