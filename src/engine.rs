//! Interfaces to the Sequential Solving Engine.
//!
//! The coordinator never looks inside the search procedure. It consumes a
//! [`SolverInstance`] as an opaque capability (fork, budget, check, report),
//! a [`UniverseTranslator`] to move terms between isolated universes, and a
//! [`CaseSplitOracle`] to propose cube literals. Implementations live in the
//! surrounding solver; the test suite supplies instrumented doubles.

use crate::literal::{Literal, TermId, UniverseId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Three-valued result of one search call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckResult {
    /// Satisfiable under the given assumptions.
    Sat,
    /// Unsatisfiable under the given assumptions.
    Unsat,
    /// Inconclusive (budget exhausted or cancelled).
    Unknown,
}

/// Error raised by the solving engine, caught at the worker boundary.
///
/// Errors never unwind across a thread join; the coordinator converts them
/// into the per-run error record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// A well-formed solver-level failure, e.g. an internal inconsistency
    /// report. The portfolio may continue with the remaining workers.
    #[error("solver inconsistency: {0}")]
    Inconsistency(String),
    /// The engine itself is unusable. Carries the engine's numeric code.
    #[error("engine failure (code {code}): {message}")]
    Fatal {
        /// Engine-defined error code.
        code: u32,
        /// Human-readable description.
        message: String,
    },
}

impl EngineError {
    /// Whether this error indicates the engine is unusable for further
    /// rounds.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal { .. })
    }
}

/// A Boolean assignment over atoms of one universe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    assignments: Vec<(TermId, bool)>,
}

impl Model {
    /// Create an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an assignment.
    pub fn assign(&mut self, atom: TermId, value: bool) {
        self.assignments.push((atom, value));
    }

    /// Look up the value of an atom, if assigned.
    #[must_use]
    pub fn value(&self, atom: TermId) -> Option<bool> {
        self.assignments
            .iter()
            .find(|(a, _)| *a == atom)
            .map(|&(_, v)| v)
    }

    /// Iterate over all assignments.
    pub fn iter(&self) -> impl Iterator<Item = (TermId, bool)> + '_ {
        self.assignments.iter().copied()
    }

    /// Number of assigned atoms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Check if the model assigns nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

impl FromIterator<(TermId, bool)> for Model {
    fn from_iter<I: IntoIterator<Item = (TermId, bool)>>(iter: I) -> Self {
        Self {
            assignments: iter.into_iter().collect(),
        }
    }
}

/// Cooperative cancellation signal shared with one solver instance.
///
/// The instance polls the flag at safe points inside its search loop and
/// returns [`CheckResult::Unknown`] promptly once it is set. Setting the
/// flag is idempotent and safe concurrently with an in-flight search.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a fresh, unset token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// One self-contained sequential solving engine over one universe.
///
/// The coordinator forks one instance per worker and drives each through
/// rounds of budgeted search. An instance's learned state persists across
/// rounds; only the assumption set is rebuilt each round.
pub trait SolverInstance: Send {
    /// The universe this instance's terms live in.
    fn universe(&self) -> UniverseId;

    /// Deep-copy this instance (constraints and learned state) into a fresh
    /// universe, reseeding its randomized heuristics.
    fn fork(&self, seed: u64) -> Box<dyn SolverInstance>;

    /// Bound the number of conflicts the next `check` may spend.
    fn set_conflict_budget(&mut self, budget: u64);

    /// Run the search under the given assumptions.
    ///
    /// This is the sole blocking operation in the portfolio; it must observe
    /// the instance's cancellation token.
    fn check(&mut self, assumptions: &[Literal]) -> Result<CheckResult, EngineError>;

    /// Conflicts spent by the most recent `check`.
    fn conflicts(&self) -> u64;

    /// The model found by the most recent satisfiable `check`.
    fn model(&self) -> Option<Model>;

    /// The assumption subset justifying the most recent unsatisfiable
    /// `check`.
    fn unsat_core(&self) -> Vec<Literal>;

    /// Assert a unit fact at the base level.
    fn assert_unit(&mut self, fact: Literal);

    /// Assert a clause at the base level.
    fn assert_clause(&mut self, clause: &[Literal]);

    /// Undo any assumption-induced state, back to the base level.
    fn pop_to_base(&mut self);

    /// The ordered sequence of literals currently assigned at base level.
    fn assigned_literals(&self) -> Vec<Literal>;

    /// The cancellation token observed by this instance's search loop.
    fn cancel_token(&self) -> CancelToken;
}

/// Maps terms between two independent universes.
///
/// Translation is total for any term reachable from the source universe's
/// asserted constraints, and preserves structure and identity: translating
/// the same term twice yields the same target term. Term objects are never
/// shared by reference across universes.
pub trait UniverseTranslator {
    /// Translate a term into the target universe.
    fn translate_term(&self, term: TermId, from: UniverseId, to: UniverseId) -> TermId;

    /// Translate a literal, preserving its sign.
    fn translate_literal(&self, lit: Literal, from: UniverseId, to: UniverseId) -> Literal {
        lit.with_atom(self.translate_term(lit.atom(), from, to))
    }
}

/// Proposes a case-split literal for one worker's next round.
///
/// Consulted on the worker's own instance, on the worker's own thread, so
/// implementations must be shareable across threads. Returning `None` skips
/// cubing for the round.
pub trait CaseSplitOracle: Send + Sync {
    /// Choose a cube literal for this instance, if any looks promising.
    fn choose(&self, instance: &mut dyn SolverInstance) -> Option<Literal>;
}
