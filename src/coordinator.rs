//! Round Coordinator.
//!
//! Owns the worker pool and drives the round loop: fork workers, run them
//! in parallel to a join barrier, decide continue-or-stop, exchange unit
//! facts, escalate the budget, and finally translate the winning artifact
//! back into the caller's universe.
//!
//! Threads are spawned fresh each round and joined before the round ends.
//! The join barrier is load-bearing: it is what lets the unit exchange and
//! the budget escalation run without any locking, and it guarantees round
//! n's broadcast is fully applied to every worker before round n+1 starts
//! for any of them.

use crate::config::PortfolioConfig;
use crate::engine::{CancelToken, CaseSplitOracle, SolverInstance, UniverseTranslator};
use crate::error::{PortfolioError, Result};
use crate::literal::{Literal, UniverseId};
use crate::outcome::{SharedVerdict, Verdict, WorkerOutcome};
use crate::translate::{translate_core, translate_model};
use crate::units::UnitLedger;
use crate::worker::Worker;
use std::thread;
use tracing::{debug, info, warn};

/// Counters aggregated over one portfolio run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortfolioStats {
    /// Rounds executed (a round counts once all workers have joined).
    pub rounds: u64,
    /// Unit facts pushed into worker universes across all exchanges.
    pub units_shared: u64,
    /// Cube-local conflicts across all workers.
    pub cube_conflicts: u64,
    /// Workers retired after an engine error.
    pub workers_retired: usize,
    /// Index of the worker whose outcome was returned, if any won.
    pub winner: Option<usize>,
}

/// Parallel portfolio solving coordinator.
///
/// Runs several forked solver instances over the same problem with
/// different seeds and per-worker case splits, shares deduced unit facts
/// between rounds, and returns the first decisive answer.
pub struct Portfolio<T, O> {
    config: PortfolioConfig,
    translator: T,
    oracle: O,
    stats: PortfolioStats,
}

impl<T, O> Portfolio<T, O>
where
    T: UniverseTranslator,
    O: CaseSplitOracle,
{
    /// Create a coordinator from a configuration and its collaborators.
    #[must_use]
    pub fn new(config: PortfolioConfig, translator: T, oracle: O) -> Self {
        Self {
            config,
            translator,
            oracle,
            stats: PortfolioStats::default(),
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &PortfolioConfig {
        &self.config
    }

    /// Counters from the most recent `solve`.
    #[must_use]
    pub fn stats(&self) -> &PortfolioStats {
        &self.stats
    }

    /// Solve the root instance's problem under the given assumptions.
    ///
    /// Forks one worker per configured slot, then loops rounds of parallel
    /// budgeted search until a worker claims a decisive, globally valid
    /// outcome or every worker has failed. The returned verdict is entirely
    /// in the caller's universe.
    pub fn solve(&mut self, root: &dyn SolverInstance, assumptions: &[Literal]) -> Result<Verdict> {
        if self.config.num_workers == 0 {
            return Err(PortfolioError::NoWorkers);
        }
        self.stats = PortfolioStats::default();

        let caller = root.universe();
        let mut workers: Vec<Worker> = (0..self.config.num_workers)
            .map(|i| {
                let instance = root.fork(self.config.base_seed + i as u64);
                let universe = instance.universe();
                let base = assumptions
                    .iter()
                    .map(|&lit| self.translator.translate_literal(lit, caller, universe))
                    .collect();
                Worker::new(i, instance, base)
            })
            .collect();
        let tokens: Vec<CancelToken> = workers
            .iter()
            .map(|w| w.instance().cancel_token())
            .collect();

        let shared = SharedVerdict::new();
        let mut ledger = UnitLedger::new(self.config.num_workers);
        let mut round: u64 = 0;
        let mut budget = self.config.initial_conflict_budget.max(1);

        loop {
            info!(round, budget, "starting portfolio round");

            let oracle = &self.oracle;
            thread::scope(|s| {
                for worker in workers.iter_mut().filter(|w| !w.is_retired()) {
                    let shared = &shared;
                    let tokens = &tokens;
                    s.spawn(move || {
                        let id = worker.id();
                        match worker.run_round(round, budget, oracle) {
                            Ok(outcome) if outcome.is_decisive() => {
                                if shared.claim(id, outcome) {
                                    debug!(worker = id, round, "claimed winning outcome");
                                    for (other, token) in tokens.iter().enumerate() {
                                        if other != id {
                                            token.cancel();
                                        }
                                    }
                                }
                            }
                            Ok(_) => {}
                            Err(err) => {
                                warn!(worker = id, error = %err, "worker failed, retiring");
                                shared.record_error(err);
                                worker.retire();
                            }
                        }
                    });
                }
            });

            self.stats.rounds += 1;
            if shared.has_winner() {
                break;
            }
            if workers.iter().all(Worker::is_retired) {
                self.finish_stats(&workers, None);
                let err = shared.take_failure().ok_or_else(|| {
                    PortfolioError::Internal("all workers retired with no error recorded".into())
                })?;
                return Err(PortfolioError::Engine(err));
            }

            let pushed = exchange_units(&mut ledger, &mut workers, &self.translator, caller);
            debug!(round, pushed, ledger = ledger.len(), "unit exchange complete");
            self.stats.units_shared += pushed;

            round += 1;
            budget = budget.saturating_mul(2);
        }

        let (winner, outcome) = shared
            .take_winner()
            .ok_or_else(|| PortfolioError::Internal("winner flag set with empty slot".into()))?;
        self.finish_stats(&workers, Some(winner));
        info!(winner, rounds = self.stats.rounds, "portfolio finished");

        let worker = &workers[winner];
        let universe = worker.universe();
        match outcome {
            WorkerOutcome::Sat => {
                let model = worker
                    .instance()
                    .model()
                    .ok_or(PortfolioError::MissingModel)?;
                Ok(Verdict::Sat(translate_model(
                    &self.translator,
                    &model,
                    universe,
                    caller,
                )))
            }
            WorkerOutcome::Unsat(core) => Ok(Verdict::Unsat(translate_core(
                &self.translator,
                &core,
                universe,
                caller,
            ))),
            WorkerOutcome::BudgetExhausted | WorkerOutcome::CubeUnsat => Err(
                PortfolioError::Internal("non-decisive outcome in winner slot".into()),
            ),
        }
    }

    fn finish_stats(&mut self, workers: &[Worker], winner: Option<usize>) {
        self.stats.cube_conflicts = workers.iter().map(|w| w.stats().cube_conflicts).sum();
        self.stats.workers_retired = workers.iter().filter(|w| w.is_retired()).count();
        self.stats.winner = winner;
    }
}

/// Collect newly deduced base-level facts from every surviving worker into
/// the ledger, then broadcast each worker's unseen ledger entries into its
/// universe. Runs strictly between rounds, after the join barrier.
fn exchange_units<T: UniverseTranslator>(
    ledger: &mut UnitLedger,
    workers: &mut [Worker],
    translator: &T,
    caller: UniverseId,
) -> u64 {
    for worker in workers.iter_mut().filter(|w| !w.is_retired()) {
        worker.instance_mut().pop_to_base();
        let from = ledger.watermark(worker.id());
        let universe = worker.universe();
        let trail = worker.instance().assigned_literals();
        for &lit in trail.get(from..).unwrap_or(&[]) {
            let fact = translator.translate_literal(lit, universe, caller);
            ledger.insert(fact);
        }
    }

    let mut pushed = 0;
    for worker in workers.iter_mut().filter(|w| !w.is_retired()) {
        let start = ledger.watermark(worker.id());
        let universe = worker.universe();
        for index in start..ledger.len() {
            let local = translator.translate_literal(ledger.fact(index), caller, universe);
            worker.instance_mut().assert_unit(local);
            pushed += 1;
        }
        ledger.advance(worker.id());
    }
    pushed
}
