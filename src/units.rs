//! Unit Fact Ledger.
//!
//! Between rounds, each worker's newly assigned base-level literals are
//! translated into the caller's universe and collected here; the ledger is
//! then re-broadcast so every worker sees every fact exactly once. The
//! ledger is only touched in the sequential phase between rounds — the
//! round barrier is what makes lock-free access safe, not any property of
//! this type.

use crate::literal::Literal;
use rustc_hash::FxHashSet;

/// Deduplicated ledger of unit facts, in the caller's universe, with one
/// broadcast watermark per worker.
///
/// Invariants: the fact list only grows; each watermark is monotone
/// non-decreasing and never exceeds the ledger length.
#[derive(Debug)]
pub struct UnitLedger {
    facts: Vec<Literal>,
    seen: FxHashSet<Literal>,
    watermarks: Vec<usize>,
}

impl UnitLedger {
    /// Create an empty ledger for the given worker count.
    #[must_use]
    pub fn new(num_workers: usize) -> Self {
        Self {
            facts: Vec::new(),
            seen: FxHashSet::default(),
            watermarks: vec![0; num_workers],
        }
    }

    /// Number of facts collected so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Check if no facts have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// The broadcast watermark of a worker.
    ///
    /// Doubles as the read position into that worker's assignment trail:
    /// broadcast facts re-enter the trail as base-level assignments, so the
    /// two counts advance together.
    #[must_use]
    pub fn watermark(&self, worker: usize) -> usize {
        self.watermarks[worker]
    }

    /// Insert a fact (already translated into the caller's universe).
    ///
    /// Returns `true` if the fact was new. Deduplication is by identity of
    /// the translated literal.
    pub fn insert(&mut self, fact: Literal) -> bool {
        if self.seen.insert(fact) {
            self.facts.push(fact);
            true
        } else {
            false
        }
    }

    /// Fact at the given ledger index.
    #[must_use]
    pub fn fact(&self, index: usize) -> Literal {
        self.facts[index]
    }

    /// Facts a worker has not yet received.
    #[must_use]
    pub fn unseen_by(&self, worker: usize) -> &[Literal] {
        &self.facts[self.watermarks[worker]..]
    }

    /// Mark every current fact as pushed into the given worker.
    pub fn advance(&mut self, worker: usize) {
        debug_assert!(self.watermarks[worker] <= self.facts.len());
        self.watermarks[worker] = self.facts.len();
    }
}
