//! Station population sizing.

use serde::{Deserialize, Serialize};
use trafficsim_core::{RandomVariable, SimRng};

/// How many stations a network gets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PopulationModel {
    /// Exactly this many stations.
    Fixed(u32),

    /// `trunc(Uniform(1, max + 0.01))`: anywhere from 1 to `max`.
    Uniform { max: u32 },

    /// `trunc(Normal(mean, variance))`, at least 1.
    Normal { mean: f64, variance: f64 },
}

impl PopulationModel {
    /// Draw a population size. Always at least one station.
    pub fn sample(&self, rng: &mut SimRng) -> u32 {
        let size = match *self {
            PopulationModel::Fixed(count) => count as f64,
            PopulationModel::Uniform { max } => rng.sample(RandomVariable::Uniform {
                min: 1.0,
                max: max as f64 + 0.01,
            }),
            PopulationModel::Normal { mean, variance } => {
                rng.sample(RandomVariable::Normal { mean, variance })
            }
        };
        size.max(1.0) as u32
    }
}

impl Default for PopulationModel {
    fn default() -> Self {
        PopulationModel::Fixed(10)
    }
}
