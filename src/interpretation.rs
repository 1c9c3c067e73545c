//! Interpretation strategy contract.
//!
//! An [`Interpreter`][crate::interpreter::Interpreter] walks a pattern tree
//! and delegates every semantic decision to a [`RegexInterpretation`]. The
//! strategy decides what the abstract state is and how each pattern construct
//! transforms it; the interpreter only decides the order of visits.

use crate::error::InterpretError;
use crate::ranges::CharRanges;
use crate::types::IndexInt;

/// Abstract semantics of the pattern constructs.
///
/// Implementations must be pure: the same inputs produce the same state.
pub trait RegexInterpretation {
    /// The abstract state threaded through the pattern.
    type State: Clone + std::fmt::Debug;

    /// Initial state of a walk.
    fn top(&self) -> Self::State;

    /// Neutral element of [`join`][Self::join].
    fn bottom(&self) -> Self::State;

    /// Merges two branches, widening instead when `widen` is set.
    fn join(&self, a: &Self::State, b: &Self::State, widen: bool) -> Self::State;

    /// Consumes one character with the given must- and can-match sets.
    fn add_char(&self, prev: &Self::State, must_match: &CharRanges, can_match: &CharRanges) -> Self::State;

    /// Restricts the state to the start of the subject.
    fn assume_start(&self, prev: &Self::State) -> Self::State;

    /// Restricts the state to the end of the subject.
    fn assume_end(&self, prev: &Self::State) -> Self::State;

    /// State in which the loop body is visited once.
    fn begin_loop(&self, prev: &Self::State, min: u64, max: IndexInt) -> Self::State;

    /// Folds the single-iteration effect `next` over `min..=max` repetitions.
    fn end_loop(&self, prev: &Self::State, next: &Self::State, min: u64, max: IndexInt) -> Self::State;

    /// Side state in which the lookaround pattern is visited.
    ///
    /// Strategies without lookaround semantics return [`InterpretError::Unsupported`].
    fn begin_lookaround(&self, prev: &Self::State, behind: bool) -> Result<Self::State, InterpretError>;

    /// Combines the outer state with the visited lookaround side state.
    fn end_lookaround(&self, prev: &Self::State, next: &Self::State, behind: bool) -> Result<Self::State, InterpretError>;

    /// Degrades the state after an unmodeled sub-pattern.
    fn unknown(&self, data: &Self::State) -> Self::State;
}
