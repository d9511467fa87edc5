//! Portfolio Configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a portfolio run.
///
/// All knobs are supplied by the caller; nothing is hard-coded in the
/// coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioConfig {
    /// Number of parallel workers.
    pub num_workers: usize,
    /// Conflict budget for round 0. Doubles every round thereafter.
    pub initial_conflict_budget: u64,
    /// Base random seed; worker `i` is seeded with `base_seed + i`.
    pub base_seed: u64,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            num_workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            initial_conflict_budget: 400,
            base_seed: 0,
        }
    }
}

impl PortfolioConfig {
    /// Create a configuration with the given worker count.
    #[must_use]
    pub fn new(num_workers: usize) -> Self {
        Self {
            num_workers,
            ..Default::default()
        }
    }

    /// Set the number of workers.
    #[must_use]
    pub fn with_num_workers(mut self, n: usize) -> Self {
        self.num_workers = n;
        self
    }

    /// Set the round-0 conflict budget.
    #[must_use]
    pub fn with_initial_budget(mut self, budget: u64) -> Self {
        self.initial_conflict_budget = budget;
        self
    }

    /// Set the base random seed.
    #[must_use]
    pub fn with_base_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }
}
