//! Matching interpretation.
//!
//! Decides whether a pattern can or must match a fixed abstract input by
//! tracking a pair of domain states:
//!
//! - `over` over-approximates what the pattern could possibly accept,
//! - `under` under-approximates what the pattern is guaranteed to accept.
//!
//! Every primitive of the domain comes in an over- and an under-approximating
//! variant, selected by the `under` flag of [`MatchingOperations`]. For every
//! reachable state `under ⊑ over` holds as long as the domain respects it.

use std::fmt::Debug;

use log::debug;

use crate::error::{InterpretError, Unsupported};
use crate::interpretation::RegexInterpretation;
use crate::interpreter::{Direction, Interpreter};
use crate::pattern::Element;
use crate::ranges::CharRanges;
use crate::types::IndexInt;

/// Domain primitives driven by [`MatchingInterpretation`].
///
/// `I` is the (abstract) input the pattern is matched against.
pub trait MatchingOperations<I: ?Sized> {
    /// Abstract set of match positions (or whatever the domain tracks).
    type State: Clone + Debug;

    /// State before anything has been matched.
    fn top(&self, input: &I) -> Self::State;

    /// The unsatisfiable state.
    fn bottom(&self, input: &I) -> Self::State;

    /// Whether `state` is the unsatisfiable element.
    fn is_bottom(&self, state: &Self::State) -> bool;

    /// Consumes one character from `ranges`.
    fn match_char(&self, input: &I, prev: &Self::State, ranges: &CharRanges, under: bool) -> Self::State;

    /// Keeps only what is at the start of the input.
    fn assume_start(&self, input: &I, prev: &Self::State, under: bool) -> Self::State;

    /// Keeps only what is at the end of the input.
    fn assume_end(&self, input: &I, prev: &Self::State, under: bool) -> Self::State;

    /// Least upper bound, or a widening of it when `widen` is set.
    fn join(&self, a: &Self::State, b: &Self::State, widen: bool, under: bool) -> Self::State;

    /// State the loop body is interpreted from.
    fn begin_loop(&self, input: &I, prev: &Self::State, min: u64, max: IndexInt, under: bool) -> Self::State;

    /// Combines the state before the loop with the single-iteration effect
    /// `next` of its body over `min..=max` iterations.
    fn end_loop(
        &self,
        input: &I,
        prev: &Self::State,
        next: &Self::State,
        min: u64,
        max: IndexInt,
        under: bool,
    ) -> Self::State;
}

/// Over- and under-approximation of the matching behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingState<S> {
    pub over: S,
    pub under: S,
}

impl<S> MatchingState<S> {
    /// Creates a state from both approximations.
    pub fn new(over: S, under: S) -> Self {
        Self { over, under }
    }
}

/// Outcome of matching a pattern against an input.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MatchVerdict {
    /// The pattern is guaranteed to match.
    Must,
    /// The pattern can match, but is not guaranteed to.
    May,
    /// The pattern cannot match.
    Never,
}

impl MatchVerdict {
    /// Whether a match is possible at all.
    pub fn can_match(self) -> bool {
        self != MatchVerdict::Never
    }

    /// Whether a match is guaranteed.
    pub fn must_match(self) -> bool {
        self == MatchVerdict::Must
    }
}

/// Matching strategy over the domain `O` and the input `I`.
#[derive(Debug)]
pub struct MatchingInterpretation<'a, O, I: ?Sized> {
    operations: &'a O,
    input: &'a I,
}

impl<O, I: ?Sized> Clone for MatchingInterpretation<'_, O, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O, I: ?Sized> Copy for MatchingInterpretation<'_, O, I> {}

impl<'a, O, I> MatchingInterpretation<'a, O, I>
where
    O: MatchingOperations<I>,
    I: ?Sized,
{
    /// Creates a strategy matching against `input`.
    pub fn new(operations: &'a O, input: &'a I) -> Self {
        Self { operations, input }
    }

    /// Get the domain operations.
    pub fn operations(&self) -> &'a O {
        self.operations
    }

    /// Get the input being matched.
    pub fn input(&self) -> &'a I {
        self.input
    }

    /// Classifies a final state.
    pub fn verdict(&self, state: &MatchingState<O::State>) -> MatchVerdict {
        if !self.operations.is_bottom(&state.under) {
            MatchVerdict::Must
        } else if !self.operations.is_bottom(&state.over) {
            MatchVerdict::May
        } else {
            MatchVerdict::Never
        }
    }
}

impl<O, I> RegexInterpretation for MatchingInterpretation<'_, O, I>
where
    O: MatchingOperations<I>,
    I: ?Sized,
{
    type State = MatchingState<O::State>;

    fn top(&self) -> Self::State {
        MatchingState::new(self.operations.top(self.input), self.operations.top(self.input))
    }

    fn bottom(&self) -> Self::State {
        MatchingState::new(self.operations.bottom(self.input), self.operations.bottom(self.input))
    }

    fn join(&self, a: &Self::State, b: &Self::State, widen: bool) -> Self::State {
        MatchingState::new(
            self.operations.join(&a.over, &b.over, widen, false),
            self.operations.join(&a.under, &b.under, widen, true),
        )
    }

    fn add_char(&self, prev: &Self::State, must_match: &CharRanges, can_match: &CharRanges) -> Self::State {
        MatchingState::new(
            self.operations.match_char(self.input, &prev.over, can_match, false),
            self.operations.match_char(self.input, &prev.under, must_match, true),
        )
    }

    fn assume_start(&self, prev: &Self::State) -> Self::State {
        MatchingState::new(
            self.operations.assume_start(self.input, &prev.over, false),
            self.operations.assume_start(self.input, &prev.under, true),
        )
    }

    fn assume_end(&self, prev: &Self::State) -> Self::State {
        MatchingState::new(
            self.operations.assume_end(self.input, &prev.over, false),
            self.operations.assume_end(self.input, &prev.under, true),
        )
    }

    fn begin_loop(&self, prev: &Self::State, min: u64, max: IndexInt) -> Self::State {
        MatchingState::new(
            self.operations.begin_loop(self.input, &prev.over, min, max, false),
            self.operations.begin_loop(self.input, &prev.under, min, max, true),
        )
    }

    fn end_loop(&self, prev: &Self::State, next: &Self::State, min: u64, max: IndexInt) -> Self::State {
        MatchingState::new(
            self.operations.end_loop(self.input, &prev.over, &next.over, min, max, false),
            self.operations.end_loop(self.input, &prev.under, &next.under, min, max, true),
        )
    }

    fn begin_lookaround(&self, _prev: &Self::State, behind: bool) -> Result<Self::State, InterpretError> {
        Err(Unsupported::LookaroundInMatching { behind }.into())
    }

    fn end_lookaround(&self, _prev: &Self::State, _next: &Self::State, behind: bool) -> Result<Self::State, InterpretError> {
        Err(Unsupported::LookaroundInMatching { behind }.into())
    }

    /// An unmodeled sub-pattern keeps everything the over-approximation
    /// allowed but guarantees nothing.
    fn unknown(&self, data: &Self::State) -> Self::State {
        MatchingState::new(data.over.clone(), self.operations.bottom(self.input))
    }
}

/// Interprets `pattern` against `input` and classifies the result.
pub fn check_match<O, I>(
    operations: &O,
    input: &I,
    pattern: &Element,
    direction: Direction,
) -> Result<MatchVerdict, InterpretError>
where
    O: MatchingOperations<I>,
    I: ?Sized,
{
    let strategy = MatchingInterpretation::new(operations, input);
    let state = Interpreter::new(strategy, direction).interpret(pattern)?;
    let verdict = strategy.verdict(&state);
    debug!("Verdict for {}: {:?}", pattern, verdict);
    Ok(verdict)
}
