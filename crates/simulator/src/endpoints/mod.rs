//! Endpoint selection for traffic classes.
//!
//! Picks which stations of a network take part in a traffic class: first a
//! participant count drawn around a target fraction, then that many distinct
//! station indices drawn without replacement.

mod population;

pub use population::PopulationModel;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;
use trafficsim_core::{RandomVariable, SimRng};

/// Slack added to the upper bound of index draws so that truncation can
/// reach `max` itself.
const INDEX_DRAW_SLACK: f64 = 0.01;

/// How distinct indices are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionStrategy {
    /// Draw `trunc(Uniform(min, max + 0.01))` and reject repeats.
    ///
    /// Attempts are unbounded; requesting the whole range waits on the
    /// narrow draw window that yields `max`.
    #[default]
    Rejection,

    /// Partial Fisher–Yates shuffle over `[min, max]`: exactly `k` draws.
    ///
    /// Every index in the range is equally likely, including `max`, so the
    /// output distribution differs from [`SelectionStrategy::Rejection`]
    /// where `max` is rare.
    PartialShuffle,
}

/// Picks participant sets from a population.
#[derive(Clone, Copy, Debug, Default)]
pub struct EndpointSelector {
    strategy: SelectionStrategy,
}

impl EndpointSelector {
    /// Create a selector using the given strategy.
    pub fn new(strategy: SelectionStrategy) -> Self {
        Self { strategy }
    }

    /// The strategy used by [`Self::select_distinct`].
    pub fn strategy(&self) -> SelectionStrategy {
        self.strategy
    }

    /// Number of participants for a population of `population` stations.
    ///
    /// Draws `f ~ Normal(mean_fraction, variance_fraction)` and returns
    /// `ceil(population * f)` clamped to `[1, population]`, so degenerate
    /// fractions (negative, above one) still give a usable count.
    pub fn selection_count(
        &self,
        population: u32,
        mean_fraction: f64,
        variance_fraction: f64,
        rng: &mut SimRng,
    ) -> Result<u32, SelectionError> {
        if population == 0 {
            return Err(SelectionError::EmptyPopulation);
        }

        let fraction = rng.sample(RandomVariable::Normal {
            mean: mean_fraction,
            variance: variance_fraction,
        });
        // f64::max discards NaN, so the count is always at least one.
        let count = (population as f64 * fraction)
            .ceil()
            .max(1.0)
            .min(population as f64);
        Ok(count as u32)
    }

    /// Draw `count` distinct indices from `[min, max]`.
    ///
    /// The result is in draw order, not sorted. `(1, 0, 0)` returns `[0]`
    /// without touching the RNG.
    pub fn select_distinct(
        &self,
        count: u32,
        min: u32,
        max: u32,
        rng: &mut SimRng,
    ) -> Result<Vec<u32>, SelectionError> {
        if count == 1 && min == 0 && max == 0 {
            return Ok(vec![0]);
        }
        if min > max {
            return Err(SelectionError::InvalidRange { min, max });
        }
        let available = u64::from(max - min) + 1;
        if u64::from(count) > available {
            return Err(SelectionError::TooManyRequested {
                requested: count,
                available,
            });
        }

        let selected = match self.strategy {
            SelectionStrategy::Rejection => select_by_rejection(count, min, max, rng),
            SelectionStrategy::PartialShuffle => select_by_partial_shuffle(count, min, max, rng),
        };
        Ok(selected)
    }

    /// Pick the participants of one traffic class from stations `0..population`.
    pub fn select_participants(
        &self,
        population: u32,
        mean_fraction: f64,
        variance_fraction: f64,
        rng: &mut SimRng,
    ) -> Result<Vec<u32>, SelectionError> {
        let count = self.selection_count(population, mean_fraction, variance_fraction, rng)?;
        self.select_distinct(count, 0, population - 1, rng)
    }
}

fn select_by_rejection(count: u32, min: u32, max: u32, rng: &mut SimRng) -> Vec<u32> {
    let draw = RandomVariable::Uniform {
        min: min as f64,
        max: max as f64 + INDEX_DRAW_SLACK,
    };

    let mut selected = Vec::with_capacity(count as usize);
    let mut attempts = 0u64;
    while selected.len() < count as usize {
        attempts += 1;
        let candidate = rng.sample(draw) as u32;
        if !selected.contains(&candidate) {
            selected.push(candidate);
        }
    }

    trace!(count, min, max, attempts, "Selected endpoints by rejection");
    selected
}

fn select_by_partial_shuffle(count: u32, min: u32, max: u32, rng: &mut SimRng) -> Vec<u32> {
    let mut pool: Vec<u32> = (min..=max).collect();
    let count = count as usize;
    for i in 0..count {
        let j = rng.gen_range(i..pool.len());
        pool.swap(i, j);
    }
    pool.truncate(count);
    pool
}

/// Errors from endpoint selection.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Cannot select endpoints from an empty population")]
    EmptyPopulation,

    #[error("Invalid index range: min {min} is greater than max {max}")]
    InvalidRange { min: u32, max: u32 },

    #[error("Requested {requested} distinct endpoints but only {available} are available")]
    TooManyRequested { requested: u32, available: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;
    use std::collections::HashSet;

    fn assert_distinct_in_range(indices: &[u32], count: u32, min: u32, max: u32) {
        assert_eq!(indices.len(), count as usize);
        let unique: HashSet<u32> = indices.iter().copied().collect();
        assert_eq!(unique.len(), indices.len(), "duplicates in {indices:?}");
        for &i in indices {
            assert!((min..=max).contains(&i), "index {i} outside [{min}, {max}]");
        }
    }

    #[test]
    fn test_selection_count_is_always_in_range() {
        let selector = EndpointSelector::default();
        for seed in 0..50 {
            let mut rng = SimRng::new(seed, 1);
            for population in [1u32, 2, 5, 10, 37] {
                let cases = [(0.6, 0.01), (0.0, 0.01), (-1.0, 0.5), (1.5, 0.5), (0.2, 4.0)];
                for (mean, variance) in cases {
                    let k = selector
                        .selection_count(population, mean, variance, &mut rng)
                        .unwrap();
                    assert!(
                        (1..=population).contains(&k),
                        "k={k} for N={population}, mean={mean}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_selection_count_near_target_fraction() {
        let selector = EndpointSelector::default();
        let trials = 200;
        let mut total = 0u32;
        for seed in 0..trials {
            let mut rng = SimRng::new(seed, 1);
            let k = selector.selection_count(10, 0.6, 0.01, &mut rng).unwrap();
            assert!((3..=10).contains(&k), "k={k} is far from 6");
            total += k;
        }
        // ceil() biases upwards by about half a station.
        let mean = total as f64 / trials as f64;
        assert!((6.0..=7.2).contains(&mean), "mean k was {mean}");
    }

    #[test]
    fn test_selection_count_rejects_empty_population() {
        let mut rng = SimRng::new(1, 1);
        assert_eq!(
            EndpointSelector::default().selection_count(0, 0.5, 0.01, &mut rng),
            Err(SelectionError::EmptyPopulation)
        );
    }

    #[test]
    fn test_single_zero_index_skips_sampling() {
        let selector = EndpointSelector::default();
        let mut rng = SimRng::new(9, 1);
        let mut untouched = SimRng::new(9, 1);

        assert_eq!(selector.select_distinct(1, 0, 0, &mut rng), Ok(vec![0]));
        assert_eq!(rng.next_u64(), untouched.next_u64());
    }

    #[test]
    fn test_default_strategy_is_rejection() {
        assert_eq!(
            EndpointSelector::default().strategy(),
            SelectionStrategy::Rejection
        );
        assert_eq!(
            EndpointSelector::new(SelectionStrategy::PartialShuffle).strategy(),
            SelectionStrategy::PartialShuffle
        );
    }

    #[test]
    fn test_rejection_returns_distinct_indices() {
        let selector = EndpointSelector::new(SelectionStrategy::Rejection);
        for seed in 0..20 {
            let mut rng = SimRng::new(seed, 1);
            let indices = selector.select_distinct(4, 3, 12, &mut rng).unwrap();
            assert_distinct_in_range(&indices, 4, 3, 12);
        }
    }

    #[test]
    fn test_rejection_can_select_whole_range() {
        let selector = EndpointSelector::new(SelectionStrategy::Rejection);
        let mut rng = SimRng::new(5, 1);
        let indices = selector.select_distinct(5, 0, 4, &mut rng).unwrap();
        assert_distinct_in_range(&indices, 5, 0, 4);
    }

    #[test]
    fn test_rejection_single_nonzero_index() {
        let selector = EndpointSelector::new(SelectionStrategy::Rejection);
        let mut rng = SimRng::new(5, 1);
        assert_eq!(selector.select_distinct(1, 7, 7, &mut rng), Ok(vec![7]));
    }

    #[test]
    fn test_partial_shuffle_returns_distinct_indices() {
        let selector = EndpointSelector::new(SelectionStrategy::PartialShuffle);
        for seed in 0..20 {
            let mut rng = SimRng::new(seed, 1);
            let indices = selector.select_distinct(6, 10, 15, &mut rng).unwrap();
            assert_distinct_in_range(&indices, 6, 10, 15);
        }
    }

    #[test]
    fn test_partial_shuffle_reaches_every_index() {
        let selector = EndpointSelector::new(SelectionStrategy::PartialShuffle);
        let mut rng = SimRng::new(11, 1);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            seen.extend(selector.select_distinct(1, 0, 4, &mut rng).unwrap());
        }
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn test_invalid_requests_are_rejected() {
        let selector = EndpointSelector::default();
        let mut rng = SimRng::new(1, 1);
        assert_eq!(
            selector.select_distinct(2, 5, 4, &mut rng),
            Err(SelectionError::InvalidRange { min: 5, max: 4 })
        );
        assert_eq!(
            selector.select_distinct(4, 0, 2, &mut rng),
            Err(SelectionError::TooManyRequested {
                requested: 4,
                available: 3
            })
        );
    }

    #[test]
    fn test_select_participants_within_population() {
        let selector = EndpointSelector::default();
        let mut rng = SimRng::new(21, 1);
        let participants = selector.select_participants(10, 0.4, 0.01, &mut rng).unwrap();
        assert!(!participants.is_empty());
        let count = participants.len() as u32;
        assert_distinct_in_range(&participants, count, 0, 9);
    }

    #[test]
    fn test_select_participants_single_station() {
        let selector = EndpointSelector::default();
        let mut rng = SimRng::new(21, 1);
        assert_eq!(
            selector.select_participants(1, 0.2, 0.01, &mut rng),
            Ok(vec![0])
        );
    }
}
