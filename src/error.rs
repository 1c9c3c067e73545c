//! Error types.
//!
//! [`PatternError`] is raised while building a pattern model that breaks a
//! structural invariant. [`InterpretError`] is raised while walking a valid
//! model with a strategy or traversal direction that cannot handle it.

use std::fmt;

use crate::types::IndexInt;

/// Construction-time violation of a pattern model invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// A character range with `low > high`.
    InvertedRange { low: char, high: char },
    /// The range at `index` overlaps, touches or precedes its predecessor.
    UnsortedRanges { index: usize },
    /// A character node whose must-match set is not contained in its can-match set.
    MustNotSubsetOfCan,
    /// A loop with `min > max`.
    InvertedLoopBounds { min: u64, max: IndexInt },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::InvertedRange { low, high } => {
                write!(f, "inverted character range {:?}-{:?}", low, high)
            }
            PatternError::UnsortedRanges { index } => {
                write!(f, "character range #{} is not sorted and disjoint from the previous one", index)
            }
            PatternError::MustNotSubsetOfCan => write!(f, "must-match ranges are not a subset of can-match ranges"),
            PatternError::InvertedLoopBounds { min, max } => {
                write!(f, "loop lower bound {} exceeds upper bound {}", min, max)
            }
        }
    }
}

impl std::error::Error for PatternError {}

/// A pattern feature that a strategy or traversal direction does not support.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Unsupported {
    /// Lookaround reached a matching interpretation.
    LookaroundInMatching { behind: bool },
    /// Lookaround reached a backward traversal.
    LookaroundInBackward { behind: bool },
}

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = |behind: bool| if behind { "lookbehind" } else { "lookahead" };
        match self {
            Unsupported::LookaroundInMatching { behind } => {
                write!(f, "{} is not supported by the matching interpretation", kind(*behind))
            }
            Unsupported::LookaroundInBackward { behind } => {
                write!(f, "{} is not supported by backward traversal", kind(*behind))
            }
        }
    }
}

/// Failure of an `interpret` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpretError {
    Unsupported(Unsupported),
    /// The pattern nests deeper than the configured limit.
    DepthLimitExceeded { limit: usize },
}

impl From<Unsupported> for InterpretError {
    fn from(e: Unsupported) -> Self {
        InterpretError::Unsupported(e)
    }
}

impl fmt::Display for InterpretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpretError::Unsupported(e) => write!(f, "unsupported pattern: {}", e),
            InterpretError::DepthLimitExceeded { limit } => {
                write!(f, "pattern nesting exceeds the depth limit of {}", limit)
            }
        }
    }
}

impl std::error::Error for InterpretError {}
