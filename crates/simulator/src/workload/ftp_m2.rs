//! 3GPP FTP Model 2 renewal schedule.
//!
//! Files arrive as a renewal process: each gap is an Exponential(1/λ) draw
//! plus a constant transfer time fixed when the schedule is configured.
//! Every arrival starts one burst on the next client application in
//! round-robin order, then the schedule re-arms itself.

use crate::config::FtpM2Config;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use trafficsim_core::{
    Action, ApplicationLayer, Event, RandomVariable, SenderSpec, SimRng, SourceError, TimerId,
    TrafficSource, TransferSession,
};
use trafficsim_types::{ApplicationId, EndpointPool};

/// Nodes and addresses an FTP schedule installs applications on.
#[derive(Clone, Debug, Default)]
pub struct FtpM2Endpoints {
    /// Nodes that receive files (sinks).
    pub servers: EndpointPool,

    /// Nodes that send files.
    pub clients: EndpointPool,

    /// Addresses of the servers; one sender per client per address.
    pub server_addresses: Arc<[Ipv4Addr]>,
}

/// Lifecycle of a schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulePhase {
    Unconfigured,
    Configured,
    Running,
    Stopped,
}

/// Values fixed by `configure`.
#[derive(Clone, Debug)]
struct ConfiguredSchedule {
    config: FtpM2Config,
    arrivals: RandomVariable,
    start_jitter: RandomVariable,
    file_size: f64,
    transfer_time: Duration,
}

impl ConfiguredSchedule {
    fn next_delay(&self, rng: &mut SimRng) -> Duration {
        secs(rng.sample(self.arrivals)) + self.transfer_time
    }
}

/// Self-renewing FTP Model 2 traffic source.
///
/// The schedule owns its cursor and configuration. Endpoint pools are
/// shared handles; the schedule never modifies them.
pub struct FtpM2Schedule {
    name: String,
    endpoints: FtpM2Endpoints,
    phase: SchedulePhase,
    schedule: Option<ConfiguredSchedule>,
    server_apps: Vec<ApplicationId>,
    client_apps: Vec<ApplicationId>,
    cursor: usize,
    activations: u64,
    now: Duration,
}

impl FtpM2Schedule {
    /// Create an unconfigured schedule.
    pub fn new(name: impl Into<String>, endpoints: FtpM2Endpoints) -> Self {
        Self {
            name: name.into(),
            endpoints,
            phase: SchedulePhase::Unconfigured,
            schedule: None,
            server_apps: Vec::new(),
            client_apps: Vec::new(),
            cursor: 0,
            activations: 0,
            now: Duration::ZERO,
        }
    }

    /// Apply the configuration. May succeed at most once.
    ///
    /// Samples the file size once from LogNormal(μ, σ); the resulting
    /// transfer time is reused for every later arrival.
    pub fn configure(
        &mut self,
        config: FtpM2Config,
        rng: &mut SimRng,
    ) -> Result<(), ScheduleError> {
        if self.schedule.is_some() {
            return Err(ScheduleError::AlreadyConfigured);
        }
        if self.endpoints.servers.is_empty() {
            return Err(ScheduleError::NoServers);
        }
        if self.endpoints.clients.is_empty() {
            return Err(ScheduleError::NoClients);
        }
        if self.endpoints.server_addresses.is_empty() {
            return Err(ScheduleError::NoServerAddresses);
        }
        if !(config.lambda > 0.0 && config.lambda.is_finite()) {
            return Err(ScheduleError::InvalidArrivalRate(config.lambda));
        }
        if !(config.data_rate > 0.0 && config.data_rate.is_finite()) {
            return Err(ScheduleError::InvalidDataRate(config.data_rate));
        }

        let file_size = rng.sample(config.file_size());
        let transfer_time = secs(file_size / config.data_rate);
        info!(
            source = %self.name,
            lambda = config.lambda,
            file_size,
            transfer_time = ?transfer_time,
            "Configured FTP Model 2 schedule"
        );

        self.schedule = Some(ConfiguredSchedule {
            arrivals: config.arrivals(),
            start_jitter: RandomVariable::Uniform {
                min: 0.0,
                max: config.start_jitter.as_secs_f64(),
            },
            file_size,
            transfer_time,
            config,
        });
        self.phase = SchedulePhase::Configured;
        Ok(())
    }

    /// Gap until the next arrival: an exponential draw plus the transfer time.
    ///
    /// `None` before configuration.
    pub fn next_delay(&self, rng: &mut SimRng) -> Option<Duration> {
        self.schedule.as_ref().map(|s| s.next_delay(rng))
    }

    fn activate(&mut self, rng: &mut SimRng) -> Vec<Action> {
        let Some(schedule) = self.schedule.as_ref() else {
            return vec![];
        };
        assert!(
            self.cursor < self.client_apps.len(),
            "cursor {} out of range for {} client applications",
            self.cursor,
            self.client_apps.len()
        );

        let session = TransferSession {
            application: self.client_apps[self.cursor],
            client_index: self.cursor,
            sequence: self.activations,
            started_at: self.now,
            file_size: schedule.file_size,
            transfer_time: schedule.transfer_time,
        };
        let fire_at = self.now + schedule.next_delay(rng);

        debug!(
            source = %self.name,
            application = %session.application,
            cursor = self.cursor,
            sequence = self.activations,
            next = ?fire_at,
            "Starting file transfer"
        );

        self.activations += 1;
        self.cursor = (self.cursor + 1) % self.client_apps.len();

        vec![
            Action::SendBurst(session),
            Action::SetTimer {
                id: TimerId::FileTransfer,
                fire_at,
            },
        ]
    }

    fn stop(&mut self) -> Vec<Action> {
        match self.phase {
            SchedulePhase::Running => {}
            // Stopped before starting: a later `start` installs nothing.
            SchedulePhase::Configured => {
                self.phase = SchedulePhase::Stopped;
                info!(source = %self.name, "Stopped FTP Model 2 schedule before start");
                return vec![];
            }
            SchedulePhase::Unconfigured | SchedulePhase::Stopped => return vec![],
        }
        self.phase = SchedulePhase::Stopped;
        info!(
            source = %self.name,
            activations = self.activations,
            "Stopped FTP Model 2 schedule"
        );
        vec![
            Action::CancelTimer {
                id: TimerId::FileTransfer,
            },
            Action::CancelTimer {
                id: TimerId::ClientStop,
            },
        ]
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SchedulePhase {
        self.phase
    }

    /// Index of the client application the next activation uses.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of activations so far.
    pub fn activations(&self) -> u64 {
        self.activations
    }

    /// Client applications in rotation order, populated by `start`.
    pub fn client_applications(&self) -> &[ApplicationId] {
        &self.client_apps
    }

    /// Server sinks, populated by `start`.
    pub fn server_applications(&self) -> &[ApplicationId] {
        &self.server_apps
    }

    /// The applied configuration.
    pub fn config(&self) -> Option<&FtpM2Config> {
        self.schedule.as_ref().map(|s| &s.config)
    }

    /// File size sampled at configuration.
    pub fn file_size(&self) -> Option<f64> {
        self.schedule.as_ref().map(|s| s.file_size)
    }

    /// Constant offset added to every gap.
    pub fn transfer_time(&self) -> Option<Duration> {
        self.schedule.as_ref().map(|s| s.transfer_time)
    }

    /// The endpoints this schedule installs on.
    pub fn endpoints(&self) -> &FtpM2Endpoints {
        &self.endpoints
    }
}

impl TrafficSource for FtpM2Schedule {
    fn name(&self) -> &str {
        &self.name
    }

    /// Install sinks and senders, then arm the first activation at
    /// `max(now, client_start) + next_delay()`.
    fn start(
        &mut self,
        apps: &mut dyn ApplicationLayer,
        rng: &mut SimRng,
    ) -> Result<Vec<Action>, SourceError> {
        match self.phase {
            SchedulePhase::Configured => {}
            SchedulePhase::Unconfigured => {
                return Err(SourceError::NotConfigured {
                    source_name: self.name.clone(),
                })
            }
            SchedulePhase::Running => {
                return Err(SourceError::AlreadyStarted {
                    source_name: self.name.clone(),
                })
            }
            SchedulePhase::Stopped => {
                return Err(SourceError::Stopped {
                    source_name: self.name.clone(),
                })
            }
        }
        let Some(schedule) = self.schedule.as_ref() else {
            return Err(SourceError::NotConfigured {
                source_name: self.name.clone(),
            });
        };
        let config = &schedule.config;

        self.server_apps =
            apps.install_receive_sink(&self.endpoints.servers, config.port, config.server_start);

        let file_size_bytes = rng.sample(config.file_size()) as u64;
        let jitter = secs(rng.sample(schedule.start_jitter));
        let mut client_apps = Vec::new();
        for &address in self.endpoints.server_addresses.iter() {
            let spec = SenderSpec {
                remote: SocketAddrV4::new(address, config.port),
                segment_size: config.segment_size,
                file_size: config.file_size(),
                file_size_bytes,
                start: config.client_start + jitter,
                stop: config.client_stop,
            };
            client_apps.extend(apps.install_sender(&self.endpoints.clients, &spec));
        }
        if client_apps.is_empty() {
            return Err(SourceError::NoApplications {
                source_name: self.name.clone(),
            });
        }

        let first = self.now.max(config.client_start) + schedule.next_delay(rng);
        let mut actions = vec![Action::SetTimer {
            id: TimerId::FileTransfer,
            fire_at: first,
        }];
        if config.stop_at_client_stop {
            actions.push(Action::SetTimer {
                id: TimerId::ClientStop,
                fire_at: config.client_stop,
            });
        }

        info!(
            source = %self.name,
            servers = self.server_apps.len(),
            clients = client_apps.len(),
            first_activation = ?first,
            "Started FTP Model 2 schedule"
        );
        self.client_apps = client_apps;
        self.cursor = 0;
        self.phase = SchedulePhase::Running;
        Ok(actions)
    }

    fn handle(&mut self, event: Event, rng: &mut SimRng) -> Vec<Action> {
        match event {
            Event::Timer(TimerId::FileTransfer) if self.phase == SchedulePhase::Running => {
                self.activate(rng)
            }
            Event::Timer(TimerId::ClientStop) | Event::Stop => self.stop(),
            Event::Timer(TimerId::FileTransfer) => {
                warn!(
                    source = %self.name,
                    phase = ?self.phase,
                    "Ignoring file transfer timer outside running phase"
                );
                vec![]
            }
        }
    }

    fn set_time(&mut self, now: Duration) {
        self.now = now;
    }

    fn now(&self) -> Duration {
        self.now
    }
}

/// Convert sampled seconds to a duration, saturating on overflow.
fn secs(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or(Duration::MAX)
}

/// Errors configuring an FTP schedule.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("FTP Model 2 schedule is already configured")]
    AlreadyConfigured,

    #[error("FTP Model 2 schedule has no server nodes")]
    NoServers,

    #[error("FTP Model 2 schedule has no client nodes")]
    NoClients,

    #[error("FTP Model 2 schedule has no server addresses")]
    NoServerAddresses,

    #[error("Arrival rate must be positive and finite, got {0}")]
    InvalidArrivalRate(f64),

    #[error("Data rate must be positive and finite, got {0}")]
    InvalidDataRate(f64),
}
