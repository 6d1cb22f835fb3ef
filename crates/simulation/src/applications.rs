//! In-memory application layer that records what it was asked to do.

use std::collections::BTreeMap;
use std::time::Duration;
use trafficsim_core::{ApplicationLayer, SenderSpec, TransferSession};
use trafficsim_types::{ApplicationId, EndpointPool, NodeId};

/// A receive sink installed on a server node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledSink {
    pub application: ApplicationId,
    pub node: NodeId,
    pub port: u16,
    pub start: Duration,
}

/// A sender installed on a client node.
#[derive(Debug, Clone, PartialEq)]
pub struct InstalledSender {
    pub application: ApplicationId,
    pub node: NodeId,
    pub spec: SenderSpec,
}

/// Application layer that allocates ids and records every request.
///
/// Stands in for a transport stack: nothing is transmitted, but installs and
/// bursts are kept in call order for inspection.
#[derive(Debug, Default)]
pub struct RecordingApplications {
    next_id: u64,
    sinks: Vec<InstalledSink>,
    senders: Vec<InstalledSender>,
    bursts: Vec<TransferSession>,
}

impl RecordingApplications {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> ApplicationId {
        let id = ApplicationId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Installed receive sinks, in install order.
    pub fn sinks(&self) -> &[InstalledSink] {
        &self.sinks
    }

    /// Installed senders, in install order.
    pub fn senders(&self) -> &[InstalledSender] {
        &self.senders
    }

    /// Bursts sent, in send order.
    pub fn bursts(&self) -> &[TransferSession] {
        &self.bursts
    }

    /// Number of bursts sent per application.
    pub fn bursts_by_application(&self) -> BTreeMap<ApplicationId, u64> {
        let mut counts = BTreeMap::new();
        for burst in &self.bursts {
            *counts.entry(burst.application).or_insert(0) += 1;
        }
        counts
    }

    /// Look up the sender installed as `application`.
    pub fn sender(&self, application: ApplicationId) -> Option<&InstalledSender> {
        self.senders.iter().find(|s| s.application == application)
    }
}

impl ApplicationLayer for RecordingApplications {
    fn install_receive_sink(
        &mut self,
        nodes: &EndpointPool,
        port: u16,
        start: Duration,
    ) -> Vec<ApplicationId> {
        nodes
            .iter()
            .map(|&node| {
                let application = self.allocate();
                self.sinks.push(InstalledSink {
                    application,
                    node,
                    port,
                    start,
                });
                application
            })
            .collect()
    }

    fn install_sender(&mut self, nodes: &EndpointPool, spec: &SenderSpec) -> Vec<ApplicationId> {
        nodes
            .iter()
            .map(|&node| {
                let application = self.allocate();
                self.senders.push(InstalledSender {
                    application,
                    node,
                    spec: spec.clone(),
                });
                application
            })
            .collect()
    }

    fn send_burst(&mut self, session: &TransferSession) {
        self.bursts.push(session.clone());
    }
}
