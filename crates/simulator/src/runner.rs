//! Scenario assembly and execution.

use crate::config::{NetworkConfig, SimulatorConfig};
use crate::endpoints::{EndpointSelector, SelectionError};
use crate::plan::TrafficPlan;
use crate::report::{NetworkReport, SimulationReport};
use crate::workload::{FtpM2Endpoints, FtpM2Schedule, ScheduleError};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use trafficsim_simulation::{RecordingApplications, RunnerError, SimulationRunner, SourceIndex};
use trafficsim_types::{ApplicationId, EndpointPool, NetworkId, TrafficClass};

/// Errors building or running a simulation.
#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("Simulation has no networks")]
    NoNetworks,

    #[error("Network {0} has no access points")]
    NoAccessPoints(NetworkId),

    #[error("Unknown network {0}")]
    UnknownNetwork(NetworkId),

    #[error("{network} has {stations} stations, more than its address space holds")]
    AddressSpaceExhausted { network: NetworkId, stations: u32 },

    #[error("Node ids overflow while deploying {0}")]
    NodeIdOverflow(NetworkId),

    #[error("Endpoint selection failed: {0}")]
    Selection(#[from] SelectionError),

    #[error("FTP schedule configuration failed: {0}")]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Runner(#[from] RunnerError),
}

/// One network as deployed by the simulator.
#[derive(Debug)]
pub struct NetworkDeployment {
    pub network: NetworkId,

    /// Station nodes, indexed like the traffic plan.
    pub stations: EndpointPool,

    pub access_points: EndpointPool,

    pub plan: TrafficPlan,

    /// FTP schedule, absent when the mix has no FTP class.
    pub ftp_source: Option<SourceIndex>,

    /// FTP client applications in rotation order, known once started.
    pub ftp_clients: Vec<ApplicationId>,
}

/// Builds networks from a [`SimulatorConfig`] and runs their traffic.
///
/// All randomness (population sizes, participant selection, file sizes and
/// arrivals) comes from one RNG seeded from the config's seed and run, so a
/// config always produces the same report.
pub struct Simulator {
    config: SimulatorConfig,
    runner: SimulationRunner<RecordingApplications>,
    networks: Vec<NetworkDeployment>,
    initialized: bool,
}

impl Simulator {
    /// Size every network, build its traffic plan and configure its FTP
    /// schedule.
    pub fn new(config: SimulatorConfig) -> Result<Self, SimulatorError> {
        if config.networks.is_empty() {
            return Err(SimulatorError::NoNetworks);
        }

        let mut runner =
            SimulationRunner::new(RecordingApplications::new(), config.seed, config.run);
        let selector = EndpointSelector::new(config.selection_strategy);

        let mut next_node = 0u32;
        let mut networks = Vec::with_capacity(config.networks.len());
        for (i, network_config) in config.networks.iter().enumerate() {
            let network = NetworkId(i as u32);
            let deployment = deploy_network(
                network,
                network_config,
                &config,
                &selector,
                &mut next_node,
                &mut runner,
            )?;
            networks.push(deployment);
        }

        info!(
            networks = networks.len(),
            nodes = next_node,
            seed = config.seed,
            run = config.run,
            "Built simulation"
        );

        Ok(Self {
            config,
            runner,
            networks,
            initialized: false,
        })
    }

    /// Start every FTP schedule. Called by [`Self::run_for`] if needed.
    pub fn initialize(&mut self) -> Result<(), SimulatorError> {
        if self.initialized {
            return Ok(());
        }
        for deployment in &mut self.networks {
            let Some(source) = deployment.ftp_source else {
                continue;
            };
            let installed = self.runner.apps().senders().len();
            self.runner.start_source(source)?;
            deployment.ftp_clients = self.runner.apps().senders()[installed..]
                .iter()
                .map(|s| s.application)
                .collect();
        }
        self.initialized = true;
        Ok(())
    }

    /// Advance virtual time by `duration` and report.
    pub fn run_for(&mut self, duration: Duration) -> Result<SimulationReport, SimulatorError> {
        self.initialize()?;
        let end = self.runner.now() + duration;
        self.runner.run_until(end);

        let report = self.report(duration);
        info!(
            end_time = ?report.end_time,
            bursts = report.total_bursts(),
            events = report.stats.events_processed,
            "Simulation run complete"
        );
        Ok(report)
    }

    /// Stop a network's FTP schedule at virtual time `at`.
    pub fn stop_network(&mut self, network: NetworkId, at: Duration) -> Result<(), SimulatorError> {
        let deployment = self
            .networks
            .get(network.0 as usize)
            .ok_or(SimulatorError::UnknownNetwork(network))?;
        match deployment.ftp_source {
            Some(source) => self.runner.stop_source(source, at)?,
            None => warn!(%network, "Network has no FTP schedule to stop"),
        }
        Ok(())
    }

    fn report(&self, duration: Duration) -> SimulationReport {
        let bursts = self.runner.apps().bursts_by_application();
        let networks = self
            .networks
            .iter()
            .map(|d| NetworkReport {
                network: d.network,
                stations: d.plan.population(),
                access_points: d.access_points.len() as u32,
                participants: d.plan.iter().map(|p| (p.class, p.indices.len())).collect(),
                ftp_clients: d.ftp_clients.len(),
                ftp_bursts_per_client: d
                    .ftp_clients
                    .iter()
                    .map(|app| bursts.get(app).copied().unwrap_or(0))
                    .collect(),
            })
            .collect();

        SimulationReport {
            end_time: self.runner.now(),
            duration,
            networks,
            stats: self.runner.stats().clone(),
        }
    }

    /// The configuration the simulator was built from.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Deployed networks, in configuration order.
    pub fn networks(&self) -> &[NetworkDeployment] {
        &self.networks
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.runner.now()
    }

    /// The recorded application layer.
    pub fn applications(&self) -> &RecordingApplications {
        self.runner.apps()
    }
}

fn deploy_network(
    network: NetworkId,
    network_config: &NetworkConfig,
    config: &SimulatorConfig,
    selector: &EndpointSelector,
    next_node: &mut u32,
    runner: &mut SimulationRunner<RecordingApplications>,
) -> Result<NetworkDeployment, SimulatorError> {
    if network_config.access_points == 0 {
        return Err(SimulatorError::NoAccessPoints(network));
    }

    let population = network_config.stations.sample(runner.rng_mut());
    if population > MAX_STATIONS_PER_NETWORK || station_address(network, 0).is_none() {
        return Err(SimulatorError::AddressSpaceExhausted {
            network,
            stations: population,
        });
    }
    let first_access_point = next_node
        .checked_add(population)
        .ok_or(SimulatorError::NodeIdOverflow(network))?;
    let end = first_access_point
        .checked_add(network_config.access_points)
        .ok_or(SimulatorError::NodeIdOverflow(network))?;

    let stations = EndpointPool::contiguous(*next_node, population);
    let access_points = EndpointPool::contiguous(first_access_point, network_config.access_points);
    *next_node = end;

    let plan = TrafficPlan::build(
        network,
        population,
        &config.traffic_mix,
        selector,
        runner.rng_mut(),
    )?;

    let ftp_source = match plan.participants(TrafficClass::Ftp) {
        Some(indices) => {
            let endpoints = FtpM2Endpoints {
                servers: stations.subset(indices),
                clients: access_points.clone(),
                server_addresses: indices
                    .iter()
                    .map(|&index| station_address(network, index))
                    .collect::<Option<Arc<[Ipv4Addr]>>>()
                    .ok_or(SimulatorError::AddressSpaceExhausted {
                        network,
                        stations: population,
                    })?,
            };
            let mut schedule = FtpM2Schedule::new(format!("ftp-{}", network.label()), endpoints);
            schedule.configure(config.ftp.clone(), runner.rng_mut())?;
            Some(runner.add_source(Box::new(schedule)))
        }
        None => None,
    };

    info!(
        %network,
        stations = population,
        access_points = network_config.access_points,
        ftp_servers = plan.participants(TrafficClass::Ftp).map_or(0, <[u32]>::len),
        "Deployed network"
    );

    Ok(NetworkDeployment {
        network,
        stations,
        access_points,
        plan,
        ftp_source,
        ftp_clients: Vec::new(),
    })
}

/// Host addresses per third octet; `.0` and `.255` are skipped.
const HOSTS_PER_OCTET: u32 = 254;

/// Largest station population that [`station_address`] can number.
const MAX_STATIONS_PER_NETWORK: u32 = 256 * HOSTS_PER_OCTET;

/// Address of station `index` in `network`: `10.<network + 1>.<hi>.<lo>`
/// with `lo` in `1..=254`.
///
/// `None` once the network or station index runs out of addresses.
fn station_address(network: NetworkId, index: u32) -> Option<Ipv4Addr> {
    let subnet = network.0.checked_add(1).filter(|&s| s <= 254)?;
    let hi = index / HOSTS_PER_OCTET;
    if hi > 255 {
        return None;
    }
    let lo = index % HOSTS_PER_OCTET + 1;
    Some(Ipv4Addr::new(10, subnet as u8, hi as u8, lo as u8))
}
