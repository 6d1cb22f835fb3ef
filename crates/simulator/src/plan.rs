//! Per-network traffic plans.

use crate::config::TrafficMix;
use crate::endpoints::{EndpointSelector, SelectionError};
use tracing::debug;
use trafficsim_core::SimRng;
use trafficsim_types::{NetworkId, TrafficClass};

/// Stations selected for one traffic class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParticipantSet {
    pub class: TrafficClass,

    /// Station indices in draw order.
    pub indices: Vec<u32>,
}

/// Which stations of a network take part in which traffic class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrafficPlan {
    network: NetworkId,
    population: u32,
    participants: Vec<ParticipantSet>,
}

impl TrafficPlan {
    /// Select participants for every class in `mix`, in mix order.
    ///
    /// Classes are drawn independently, so one station may take part in
    /// several classes.
    pub fn build(
        network: NetworkId,
        population: u32,
        mix: &TrafficMix,
        selector: &EndpointSelector,
        rng: &mut SimRng,
    ) -> Result<Self, SelectionError> {
        let mut participants = Vec::with_capacity(mix.shares.len());
        for share in &mix.shares {
            let indices = selector.select_participants(
                population,
                share.mean_fraction,
                share.variance_fraction,
                rng,
            )?;
            debug!(
                %network,
                class = %share.class,
                selected = indices.len(),
                population,
                "Selected participants"
            );
            participants.push(ParticipantSet {
                class: share.class,
                indices,
            });
        }

        Ok(Self {
            network,
            population,
            participants,
        })
    }

    /// Network this plan is for.
    pub fn network(&self) -> NetworkId {
        self.network
    }

    /// Number of stations the plan selected from.
    pub fn population(&self) -> u32 {
        self.population
    }

    /// Participants of `class`, if the mix contained it.
    pub fn participants(&self, class: TrafficClass) -> Option<&[u32]> {
        self.participants
            .iter()
            .find(|p| p.class == class)
            .map(|p| p.indices.as_slice())
    }

    /// All participant sets, in mix order.
    pub fn iter(&self) -> impl Iterator<Item = &ParticipantSet> {
        self.participants.iter()
    }
}
