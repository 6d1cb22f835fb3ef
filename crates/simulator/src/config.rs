//! Configuration types for the simulator.

use crate::endpoints::{PopulationModel, SelectionStrategy};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use trafficsim_core::RandomVariable;
use trafficsim_types::TrafficClass;

/// Variance of the participant fraction used for every class by default.
pub const DEFAULT_FRACTION_VARIANCE: f64 = 0.01;

/// Configuration for a simulation run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// One entry per simulated network.
    pub networks: Vec<NetworkConfig>,

    /// Which traffic classes each network selects participants for.
    pub traffic_mix: TrafficMix,

    /// FTP Model 2 parameters, shared by every network.
    pub ftp: FtpM2Config,

    /// How participant indices are drawn.
    pub selection_strategy: SelectionStrategy,

    /// Random seed for deterministic simulation.
    pub seed: u64,

    /// Run number; selects an independent stream for the same seed.
    pub run: u64,
}

impl SimulatorConfig {
    /// Create a configuration with `num_networks` networks whose station
    /// counts are drawn from `Normal(stations_per_network, 5)`.
    pub fn new(num_networks: u32, stations_per_network: u32) -> Self {
        Self {
            networks: (0..num_networks)
                .map(|_| NetworkConfig::normal(stations_per_network as f64, 5.0))
                .collect(),
            traffic_mix: TrafficMix::default(),
            ftp: FtpM2Config::default(),
            selection_strategy: SelectionStrategy::default(),
            seed: 1,
            run: 1,
        }
    }

    /// Replace the network list.
    pub fn with_networks(mut self, networks: Vec<NetworkConfig>) -> Self {
        self.networks = networks;
        self
    }

    /// Set the traffic mix.
    pub fn with_traffic_mix(mut self, mix: TrafficMix) -> Self {
        self.traffic_mix = mix;
        self
    }

    /// Set the FTP Model 2 parameters.
    pub fn with_ftp(mut self, ftp: FtpM2Config) -> Self {
        self.ftp = ftp;
        self
    }

    /// Set the selection strategy.
    pub fn with_selection_strategy(mut self, strategy: SelectionStrategy) -> Self {
        self.selection_strategy = strategy;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the run number.
    pub fn with_run(mut self, run: u64) -> Self {
        self.run = run;
        self
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// Configuration for one network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// How many stations the network gets.
    pub stations: PopulationModel,

    /// Number of access points. FTP clients run on these.
    pub access_points: u32,
}

impl NetworkConfig {
    /// A network with exactly `stations` stations and one access point.
    pub fn fixed(stations: u32) -> Self {
        Self {
            stations: PopulationModel::Fixed(stations),
            access_points: 1,
        }
    }

    /// A network with a normally distributed station count.
    pub fn normal(mean: f64, variance: f64) -> Self {
        Self {
            stations: PopulationModel::Normal { mean, variance },
            access_points: 1,
        }
    }

    /// Set the number of access points.
    pub fn with_access_points(mut self, access_points: u32) -> Self {
        self.access_points = access_points;
        self
    }
}

/// Target share of stations taking part in one traffic class.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassShare {
    pub class: TrafficClass,

    /// Mean fraction of stations selected.
    pub mean_fraction: f64,

    /// Variance of the fraction.
    pub variance_fraction: f64,
}

impl ClassShare {
    /// The class's default share.
    pub fn new(class: TrafficClass) -> Self {
        Self {
            class,
            mean_fraction: class.default_fraction(),
            variance_fraction: DEFAULT_FRACTION_VARIANCE,
        }
    }

    /// Set the mean fraction (clamped to 0.0 - 1.0).
    pub fn with_fraction(mut self, mean_fraction: f64) -> Self {
        self.mean_fraction = mean_fraction.clamp(0.0, 1.0);
        self
    }

    /// Set the fraction variance (at least 0.0).
    pub fn with_variance(mut self, variance_fraction: f64) -> Self {
        self.variance_fraction = variance_fraction.max(0.0);
        self
    }
}

/// Ordered list of class shares; participants are selected in this order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrafficMix {
    pub shares: Vec<ClassShare>,
}

impl TrafficMix {
    /// Only FTP traffic.
    pub fn ftp_only() -> Self {
        Self {
            shares: vec![ClassShare::new(TrafficClass::Ftp)],
        }
    }

    /// Add or replace the share for `share.class`.
    pub fn with_share(mut self, share: ClassShare) -> Self {
        match self.shares.iter_mut().find(|s| s.class == share.class) {
            Some(existing) => *existing = share,
            None => self.shares.push(share),
        }
        self
    }

    /// Share for a class, if present.
    pub fn share(&self, class: TrafficClass) -> Option<&ClassShare> {
        self.shares.iter().find(|s| s.class == class)
    }
}

impl Default for TrafficMix {
    fn default() -> Self {
        Self {
            shares: TrafficClass::ALL.into_iter().map(ClassShare::new).collect(),
        }
    }
}

/// FTP Model 2 parameters (3GPP TR 36.814, A.2.1.3.1).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FtpM2Config {
    /// Port the receive sinks bind to and senders target.
    pub port: u16,

    /// When server sinks start.
    pub server_start: Duration,

    /// Base time for the first activation and for sender start.
    pub client_start: Duration,

    /// When senders stop.
    pub client_stop: Duration,

    /// File arrival rate λ; inter-arrival gaps are Exponential(1/λ).
    pub lambda: f64,

    /// Log-normal file-size μ.
    pub mu: f64,

    /// Log-normal file-size σ.
    pub sigma: f64,

    /// Link data rate; `file_size / data_rate` is added to every gap.
    pub data_rate: f64,

    /// Sender segment size in bytes.
    pub segment_size: u32,

    /// Senders start at `client_start + Uniform(0, start_jitter)`.
    pub start_jitter: Duration,

    /// Stop scheduling at `client_stop` instead of re-arming until the
    /// run's horizon.
    pub stop_at_client_stop: bool,
}

impl Default for FtpM2Config {
    fn default() -> Self {
        Self {
            port: TrafficClass::Ftp.default_port(),
            server_start: Duration::ZERO,
            client_start: Duration::from_secs(1),
            client_stop: Duration::from_secs(10),
            lambda: 0.2,
            mu: 14.45,
            sigma: 0.35,
            data_rate: 100_000_000.0,
            segment_size: 1448,
            start_jitter: Duration::from_millis(100),
            stop_at_client_stop: false,
        }
    }
}

impl FtpM2Config {
    /// Set the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set server start, client start and client stop times.
    pub fn with_timing(
        mut self,
        server_start: Duration,
        client_start: Duration,
        client_stop: Duration,
    ) -> Self {
        self.server_start = server_start;
        self.client_start = client_start;
        self.client_stop = client_stop;
        self
    }

    /// Set the arrival rate λ.
    pub fn with_arrival_rate(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    /// Set the log-normal file-size parameters.
    pub fn with_file_size(mut self, mu: f64, sigma: f64) -> Self {
        self.mu = mu;
        self.sigma = sigma;
        self
    }

    /// Set the link data rate.
    pub fn with_data_rate(mut self, data_rate: f64) -> Self {
        self.data_rate = data_rate;
        self
    }

    /// Set the maximum sender start jitter.
    pub fn with_start_jitter(mut self, jitter: Duration) -> Self {
        self.start_jitter = jitter;
        self
    }

    /// Stop scheduling at `client_stop`.
    pub fn with_stop_at_client_stop(mut self, stop: bool) -> Self {
        self.stop_at_client_stop = stop;
        self
    }

    /// Inter-arrival distribution.
    pub fn arrivals(&self) -> RandomVariable {
        RandomVariable::Exponential {
            mean: 1.0 / self.lambda,
        }
    }

    /// File-size distribution.
    pub fn file_size(&self) -> RandomVariable {
        RandomVariable::LogNormal {
            mu: self.mu,
            sigma: self.sigma,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mix_covers_every_class_in_order() {
        let mix = TrafficMix::default();
        let classes: Vec<TrafficClass> = mix.shares.iter().map(|s| s.class).collect();
        assert_eq!(classes, TrafficClass::ALL.to_vec());
        assert_eq!(mix.share(TrafficClass::Ftp).map(|s| s.mean_fraction), Some(0.2));
    }

    #[test]
    fn test_with_share_replaces_existing() {
        let mix = TrafficMix::ftp_only()
            .with_share(ClassShare::new(TrafficClass::Ftp).with_fraction(0.5))
            .with_share(ClassShare::new(TrafficClass::Http));
        assert_eq!(mix.shares.len(), 2);
        assert_eq!(mix.share(TrafficClass::Ftp).map(|s| s.mean_fraction), Some(0.5));
    }

    #[test]
    fn test_class_share_builders_clamp() {
        let share = ClassShare::new(TrafficClass::Http)
            .with_fraction(1.7)
            .with_variance(-0.5);
        assert_eq!(share.mean_fraction, 1.0);
        assert_eq!(share.variance_fraction, 0.0);
        assert_eq!(
            ClassShare::new(TrafficClass::Http).with_fraction(-0.2).mean_fraction,
            0.0
        );
        assert_eq!(
            ClassShare::new(TrafficClass::Http).with_fraction(0.35).mean_fraction,
            0.35
        );
    }

    #[test]
    fn test_ftp_defaults() {
        let config = FtpM2Config::default();
        assert_eq!(config.port, 5150);
        match config.arrivals() {
            RandomVariable::Exponential { mean } => assert!((mean - 5.0).abs() < 1e-9),
            other => panic!("unexpected arrival distribution {other:?}"),
        }
        assert!(!config.stop_at_client_stop);
    }

    #[test]
    fn test_simulator_config_builder() {
        let config = SimulatorConfig::new(4, 12).with_seed(7).with_run(3);
        assert_eq!(config.networks.len(), 4);
        assert_eq!(config.seed, 7);
        assert_eq!(config.run, 3);
        assert_eq!(
            config.networks[0].stations,
            PopulationModel::Normal {
                mean: 12.0,
                variance: 5.0
            }
        );
    }
}
