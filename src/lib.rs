//! Cubist - Parallel Portfolio Solving Coordinator
//!
//! Runs several independent attempts at one satisfiability problem
//! concurrently: each worker owns a deep fork of the problem in its own
//! symbol universe, with its own random seed and its own guessed case
//! split ("cube"). Workers search under a shared conflict budget that
//! doubles every round; deduced unit facts cross universes between rounds;
//! the first worker to reach a decisive, globally valid answer wins and
//! cancels the rest.
//!
//! The sequential search procedure itself is external: it is consumed
//! through the [`SolverInstance`] trait, alongside a [`UniverseTranslator`]
//! for moving terms between universes and a [`CaseSplitOracle`] for
//! proposing cubes.
//!
//! # Example
//!
//! ```ignore
//! use cubist::{Portfolio, PortfolioConfig, Verdict};
//!
//! let config = PortfolioConfig::new(4).with_initial_budget(400);
//! let mut portfolio = Portfolio::new(config, translator, oracle);
//!
//! match portfolio.solve(&root_instance, &assumptions)? {
//!     Verdict::Sat(model) => println!("sat, {} assignments", model.len()),
//!     Verdict::Unsat(core) => println!("unsat, core of {}", core.len()),
//! }
//! ```
//!
//! A worker reporting unsat does not immediately end the run: if the unsat
//! core contains the worker's cube, the conflict only refutes the guess.
//! The worker blocks that branch in its private instance and the round
//! loop continues — this is what keeps per-worker case splits sound.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod literal;
pub mod outcome;
pub mod translate;
pub mod units;
pub mod worker;

pub use config::PortfolioConfig;
pub use coordinator::{Portfolio, PortfolioStats};
pub use engine::{
    CancelToken, CaseSplitOracle, CheckResult, EngineError, Model, SolverInstance,
    UniverseTranslator,
};
pub use error::{PortfolioError, Result};
pub use literal::{Literal, TermId, UniverseId};
pub use outcome::{SharedVerdict, Verdict, WorkerOutcome};
pub use units::UnitLedger;
pub use worker::{Worker, WorkerStats};
