//! Error Type for Portfolio Solving.

use crate::engine::EngineError;
use thiserror::Error;

/// Error surfaced by a portfolio run.
///
/// The caller receives either a decisive verdict or exactly one of these;
/// no partial result is ever returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PortfolioError {
    /// Every worker failed; this is the retained engine error record.
    #[error("solver engine failure: {0}")]
    Engine(#[from] EngineError),
    /// The winning worker reported sat but produced no model. Indicates an
    /// internal consistency violation in the engine, not user input.
    #[error("winning worker reported sat without a model")]
    MissingModel,
    /// The portfolio was configured with zero workers.
    #[error("portfolio requires at least one worker")]
    NoWorkers,
    /// Coordinator-level invariant violation.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for portfolio operations.
pub type Result<T> = std::result::Result<T, PortfolioError>;
