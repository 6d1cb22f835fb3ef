//! Results of a simulation run.

use std::time::Duration;
use trafficsim_simulation::SimulationStats;
use trafficsim_types::{NetworkId, TrafficClass};

/// Per-network outcome.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkReport {
    pub network: NetworkId,

    /// Stations the network was sized to.
    pub stations: u32,

    pub access_points: u32,

    /// Participant count per class, in mix order.
    pub participants: Vec<(TrafficClass, usize)>,

    /// FTP client applications in rotation order.
    pub ftp_clients: usize,

    /// Bursts sent by each FTP client application, in rotation order.
    pub ftp_bursts_per_client: Vec<u64>,
}

impl NetworkReport {
    /// Participant count for `class`, zero if the class was not planned.
    pub fn participants(&self, class: TrafficClass) -> usize {
        self.participants
            .iter()
            .find(|(c, _)| *c == class)
            .map_or(0, |(_, n)| *n)
    }

    /// Total FTP bursts sent in this network.
    pub fn ftp_bursts(&self) -> u64 {
        self.ftp_bursts_per_client.iter().sum()
    }
}

/// Summary of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationReport {
    /// Virtual time at the end of the run.
    pub end_time: Duration,

    /// Virtual time covered by the `run_for` call that produced this report.
    pub duration: Duration,

    pub networks: Vec<NetworkReport>,

    pub stats: SimulationStats,
}

impl SimulationReport {
    /// Bursts sent across all networks since the start of the simulation.
    pub fn total_bursts(&self) -> u64 {
        self.networks.iter().map(NetworkReport::ftp_bursts).sum()
    }

    /// Average bursts per second of virtual time since the start.
    pub fn bursts_per_second(&self) -> f64 {
        let secs = self.end_time.as_secs_f64();
        if secs > 0.0 {
            self.total_bursts() as f64 / secs
        } else {
            0.0
        }
    }

    /// Report for one network.
    pub fn network(&self, network: NetworkId) -> Option<&NetworkReport> {
        self.networks.iter().find(|n| n.network == network)
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Simulation Report ===");
        println!("End time: {:.3}s", self.end_time.as_secs_f64());
        println!("Events processed: {}", self.stats.events_processed);
        println!(
            "Bursts: {} ({:.3}/s)",
            self.total_bursts(),
            self.bursts_per_second()
        );
        for network in &self.networks {
            println!(
                "{}: {} stations, {} APs, {} FTP clients, {} bursts",
                network.network,
                network.stations,
                network.access_points,
                network.ftp_clients,
                network.ftp_bursts()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(bursts: &[&[u64]], end_secs: u64) -> SimulationReport {
        SimulationReport {
            end_time: Duration::from_secs(end_secs),
            duration: Duration::from_secs(end_secs),
            networks: bursts
                .iter()
                .enumerate()
                .map(|(i, per_client)| NetworkReport {
                    network: NetworkId(i as u32),
                    stations: 10,
                    access_points: 1,
                    participants: vec![(TrafficClass::Ftp, 2)],
                    ftp_clients: per_client.len(),
                    ftp_bursts_per_client: per_client.to_vec(),
                })
                .collect(),
            stats: SimulationStats::default(),
        }
    }

    #[test]
    fn test_totals_and_rate() {
        let report = report(&[&[2, 1], &[3]], 3);
        assert_eq!(report.total_bursts(), 6);
        assert!((report.bursts_per_second() - 2.0).abs() < 1e-9);
        assert_eq!(report.network(NetworkId(1)).map(|n| n.ftp_bursts()), Some(3));
        assert!(report.network(NetworkId(5)).is_none());
    }

    #[test]
    fn test_print_summary_handles_empty_and_populated_reports() {
        report(&[], 0).print_summary();
        report(&[&[2, 1], &[]], 5).print_summary();
    }

    #[test]
    fn test_zero_duration_rate() {
        assert_eq!(report(&[&[1]], 0).bursts_per_second(), 0.0);
    }

    #[test]
    fn test_missing_class_counts_zero() {
        let report = report(&[&[]], 1);
        assert_eq!(report.networks[0].participants(TrafficClass::Ftp), 2);
        assert_eq!(report.networks[0].participants(TrafficClass::Voip), 0);
    }
}
