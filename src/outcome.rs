//! Round Outcomes and the Shared Winner Slot.

use crate::engine::{EngineError, Model};
use crate::literal::Literal;
use std::sync::Mutex;

/// Outcome of one worker round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerOutcome {
    /// Decisive: the problem is satisfiable. The model is read from the
    /// winning instance at translation time.
    Sat,
    /// Decisive: the problem is unsatisfiable, justified by this core.
    Unsat(Vec<Literal>),
    /// Inconclusive; the worker will retry next round with a larger budget.
    BudgetExhausted,
    /// Unsatisfiability was induced by the worker's guessed cube, not the
    /// problem. The branch is now blocked in that worker's instance.
    CubeUnsat,
}

impl WorkerOutcome {
    /// Whether this outcome may claim the winner slot.
    #[must_use]
    pub fn is_decisive(&self) -> bool {
        matches!(self, Self::Sat | Self::Unsat(_))
    }
}

/// Final answer of a portfolio run, in the caller's universe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Satisfiable, with a model.
    Sat(Model),
    /// Unsatisfiable, with a justifying core.
    Unsat(Vec<Literal>),
}

#[derive(Debug, Default)]
struct VerdictSlot {
    winner: Option<(usize, WorkerOutcome)>,
    failure: Option<EngineError>,
}

/// The single-assignment winner slot shared by all workers of one run.
///
/// The first decisive claim wins; every later claim is discarded. The error
/// record lives under the same lock: last writer wins, except that a fatal
/// engine error is never displaced by a recoverable one. Which of several
/// same-severity errors survives a round is scheduling-dependent.
#[derive(Debug, Default)]
pub struct SharedVerdict {
    slot: Mutex<VerdictSlot>,
}

impl SharedVerdict {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to claim the winner slot with a decisive outcome.
    ///
    /// Returns `true` only for the first claimant; the caller then owns
    /// cancelling the losing workers.
    pub fn claim(&self, worker: usize, outcome: WorkerOutcome) -> bool {
        debug_assert!(outcome.is_decisive());
        let mut slot = self.slot.lock().expect("mutex poisoned");
        if slot.winner.is_none() {
            slot.winner = Some((worker, outcome));
            true
        } else {
            false
        }
    }

    /// Record a worker failure as the representative error.
    pub fn record_error(&self, err: EngineError) {
        let mut slot = self.slot.lock().expect("mutex poisoned");
        match slot.failure {
            Some(ref kept) if kept.is_fatal() && !err.is_fatal() => {}
            _ => slot.failure = Some(err),
        }
    }

    /// Whether a winner has been claimed.
    #[must_use]
    pub fn has_winner(&self) -> bool {
        self.slot.lock().expect("mutex poisoned").winner.is_some()
    }

    /// Take the winning outcome, if any.
    pub fn take_winner(&self) -> Option<(usize, WorkerOutcome)> {
        self.slot.lock().expect("mutex poisoned").winner.take()
    }

    /// Take the retained error record, if any.
    pub fn take_failure(&self) -> Option<EngineError> {
        self.slot.lock().expect("mutex poisoned").failure.take()
    }
}
