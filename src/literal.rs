//! Term, Universe, and Literal Identifiers.
//!
//! Workers each own an independent universe of terms; the same constraint
//! lives at different [`TermId`]s in different universes, and universes are
//! only ever bridged through a translator. The types here are deliberately
//! opaque so nothing in the coordinator can confuse ids across universes by
//! accident.

use std::fmt;

/// Identifier of a term within one universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TermId(u32);

impl TermId {
    /// Create a term id from a raw index.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw index.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Identifier of a symbol universe.
///
/// Each forked solver instance owns a fresh universe; the caller's problem
/// lives in the root universe. Ids are allocated by the engine, not by this
/// crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UniverseId(u32);

impl UniverseId {
    /// Create a universe id from a raw value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for UniverseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{}", self.0)
    }
}

/// A literal: a signed atom within one universe.
///
/// Packed representation, sign in the low bit. Atom ids are limited to
/// `u32::MAX >> 1`, matching the engine's term id space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal(u32);

impl Literal {
    /// Create a positive literal over an atom.
    #[must_use]
    pub const fn positive(atom: TermId) -> Self {
        Self(atom.raw() << 1)
    }

    /// Create a negative literal over an atom.
    #[must_use]
    pub const fn negative(atom: TermId) -> Self {
        Self((atom.raw() << 1) | 1)
    }

    /// The atom this literal is over.
    #[must_use]
    pub const fn atom(self) -> TermId {
        TermId::new(self.0 >> 1)
    }

    /// Check if this literal is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        (self.0 & 1) == 0
    }

    /// Check if this literal is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        (self.0 & 1) != 0
    }

    /// The negation of this literal.
    #[must_use]
    pub const fn negate(self) -> Self {
        Self(self.0 ^ 1)
    }

    /// Rebuild this literal over a different atom, keeping the sign.
    ///
    /// This is the primitive a translator uses to move a literal between
    /// universes.
    #[must_use]
    pub const fn with_atom(self, atom: TermId) -> Self {
        Self((atom.raw() << 1) | (self.0 & 1))
    }

    /// Get the raw packed value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Create from a raw packed value.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_positive() {
            write!(f, "{}", self.atom())
        } else {
            write!(f, "-{}", self.atom())
        }
    }
}
