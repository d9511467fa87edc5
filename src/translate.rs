//! Winning-Result Translation.
//!
//! The winning worker's model or unsat core lives in that worker's private
//! universe; the caller only understands its own. These helpers move the
//! artifact across, term by term.

use crate::engine::{Model, UniverseTranslator};
use crate::literal::{Literal, UniverseId};

/// Translate a model's assignments into the target universe.
#[must_use]
pub fn translate_model<T: UniverseTranslator + ?Sized>(
    translator: &T,
    model: &Model,
    from: UniverseId,
    to: UniverseId,
) -> Model {
    model
        .iter()
        .map(|(atom, value)| (translator.translate_term(atom, from, to), value))
        .collect()
}

/// Translate every literal of an unsat core into the target universe.
#[must_use]
pub fn translate_core<T: UniverseTranslator + ?Sized>(
    translator: &T,
    core: &[Literal],
    from: UniverseId,
    to: UniverseId,
) -> Vec<Literal> {
    core.iter()
        .map(|&lit| translator.translate_literal(lit, from, to))
        .collect()
}
