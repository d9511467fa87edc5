//! Portfolio Worker.
//!
//! A worker owns one forked solver instance and a private assumption set.
//! Each round it optionally guesses a cube literal, runs one budgeted
//! search, and classifies the three-valued result. Whether a sub-result is
//! globally valid or an artifact of the guessed cube is decided here: an
//! unsat answer whose core mentions the cube only refutes the guess, so the
//! worker blocks that branch in its own instance and keeps going.

use crate::engine::{CaseSplitOracle, CheckResult, EngineError, SolverInstance};
use crate::literal::{Literal, UniverseId};
use crate::outcome::WorkerOutcome;
use smallvec::SmallVec;
use tracing::debug;

/// Per-worker counters, folded into the run statistics at the end.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerStats {
    /// Rounds this worker completed (including inconclusive ones).
    pub rounds: u64,
    /// Rounds that ended in a cube-local conflict.
    pub cube_conflicts: u64,
}

/// One portfolio worker: a private solver instance plus its base
/// assumptions, already translated into the instance's universe.
pub struct Worker {
    id: usize,
    instance: Box<dyn SolverInstance>,
    base_assumptions: Vec<Literal>,
    retired: bool,
    stats: WorkerStats,
}

impl Worker {
    /// Create a worker over a freshly forked instance.
    #[must_use]
    pub fn new(id: usize, instance: Box<dyn SolverInstance>, base_assumptions: Vec<Literal>) -> Self {
        Self {
            id,
            instance,
            base_assumptions,
            retired: false,
            stats: WorkerStats::default(),
        }
    }

    /// This worker's index in the pool.
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    /// The universe this worker's instance lives in.
    #[must_use]
    pub fn universe(&self) -> UniverseId {
        self.instance.universe()
    }

    /// Shared access to the underlying instance.
    #[must_use]
    pub fn instance(&self) -> &dyn SolverInstance {
        self.instance.as_ref()
    }

    /// Exclusive access to the underlying instance.
    pub fn instance_mut(&mut self) -> &mut dyn SolverInstance {
        self.instance.as_mut()
    }

    /// Per-worker counters.
    #[must_use]
    pub fn stats(&self) -> WorkerStats {
        self.stats
    }

    /// Whether this worker has been removed from the pool after an error.
    #[must_use]
    pub fn is_retired(&self) -> bool {
        self.retired
    }

    /// Remove this worker from the pool.
    pub fn retire(&mut self) {
        self.retired = true;
    }

    /// Run one round of budgeted search.
    ///
    /// Round 0 never cubes; later rounds consult the oracle on this
    /// worker's own instance. The `check` call is the sole blocking point.
    pub fn run_round(
        &mut self,
        round: u64,
        budget: u64,
        oracle: &dyn CaseSplitOracle,
    ) -> Result<WorkerOutcome, EngineError> {
        let mut assumptions: SmallVec<[Literal; 8]> =
            SmallVec::from_slice(&self.base_assumptions);
        let cube = if round > 0 {
            oracle.choose(self.instance.as_mut())
        } else {
            None
        };
        if let Some(c) = cube {
            assumptions.push(c);
        }

        self.instance.set_conflict_budget(budget);
        debug!(worker = self.id, round, budget, cube = ?cube, "dispatching search");

        let result = self.instance.check(&assumptions)?;
        self.stats.rounds += 1;

        match result {
            CheckResult::Unknown => Ok(WorkerOutcome::BudgetExhausted),
            CheckResult::Unsat => {
                let core = self.instance.unsat_core();
                if let Some(c) = cube {
                    if core.contains(&c) {
                        // The conflict is an artifact of the guess. Prune
                        // this branch of the worker's private search forever
                        // and report a non-decisive round.
                        let block: Vec<Literal> = core.iter().map(|l| l.negate()).collect();
                        self.instance.assert_clause(&block);
                        self.stats.cube_conflicts += 1;
                        debug!(worker = self.id, round, "cube-local conflict, branch blocked");
                        return Ok(WorkerOutcome::CubeUnsat);
                    }
                }
                Ok(WorkerOutcome::Unsat(core))
            }
            CheckResult::Sat => Ok(WorkerOutcome::Sat),
        }
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("id", &self.id)
            .field("universe", &self.instance.universe())
            .field("retired", &self.retired)
            .field("stats", &self.stats)
            .finish()
    }
}
