//! Generating interpretation.
//!
//! Synthesizes a domain value describing the whole language of a pattern.
//! The state is a pair of domain values:
//!
//! - `closed`: the value of complete paths through the pattern so far,
//! - `open`: the value reachable while still inside an unterminated loop
//!   iteration, which may be extended without crossing the loop's exit.
//!
//! Repetition is never unrolled: the loop body is interpreted once from a
//! fresh `(top, empty)` state and the domain's
//! [`repeat`][GeneratingOperations::repeat] folds that single-iteration value
//! over the repetition count.
//!
//! In under-approximating mode the strategy uses the must-match ranges of
//! characters and collapses anything it does not understand to bottom.

use std::fmt::Debug;

use log::debug;

use crate::error::InterpretError;
use crate::interpretation::RegexInterpretation;
use crate::interpreter::{Direction, Interpreter};
use crate::pattern::Element;
use crate::ranges::CharRanges;
use crate::types::IndexInt;

/// Domain primitives driven by [`GeneratingInterpretation`].
pub trait GeneratingOperations {
    /// Abstract language.
    type Value: Clone + Debug;

    /// Every string.
    fn top(&self) -> Self::Value;

    /// The empty language.
    fn bottom(&self) -> Self::Value;

    /// The language containing only the empty string.
    fn empty(&self) -> Self::Value;

    /// Whether the empty string may belong to `value`.
    fn can_be_empty(&self, value: &Self::Value) -> bool;

    /// Appends one character from `ranges`; an open result may be extended further.
    fn add_char(&self, prev: &Self::Value, ranges: &CharRanges, closed: bool) -> Self::Value;

    /// Least upper bound, or a widening of it when `widen` is set.
    fn join(&self, a: &Self::Value, b: &Self::Value, widen: bool) -> Self::Value;

    /// Repetition closure.
    ///
    /// `prev` is the value before the loop, `body` the value of one complete
    /// iteration and `last` the value of the final, possibly open, iteration.
    /// The result must cover every iteration count in `[min, max]`, including
    /// zero iterations when `min == 0`.
    fn repeat(&self, prev: &Self::Value, body: &Self::Value, last: &Self::Value, min: u64, max: IndexInt) -> Self::Value;
}

/// Open and closed tracks of the generated value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratingState<D> {
    pub open: D,
    pub closed: D,
}

impl<D> GeneratingState<D> {
    /// Creates a state from both tracks.
    pub fn new(open: D, closed: D) -> Self {
        Self { open, closed }
    }
}

/// Generating strategy over the domain `O`.
#[derive(Debug)]
pub struct GeneratingInterpretation<'a, O> {
    operations: &'a O,
    under_approximate: bool,
}

impl<O> Clone for GeneratingInterpretation<'_, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O> Copy for GeneratingInterpretation<'_, O> {}

impl<'a, O: GeneratingOperations> GeneratingInterpretation<'a, O> {
    /// An over-approximating strategy.
    pub fn new(operations: &'a O) -> Self {
        Self::with_mode(operations, false)
    }

    /// An under-approximating strategy.
    pub fn under_approximating(operations: &'a O) -> Self {
        Self::with_mode(operations, true)
    }

    /// Over- or under-approximating strategy, depending on `under_approximate`.
    pub fn with_mode(operations: &'a O, under_approximate: bool) -> Self {
        Self {
            operations,
            under_approximate,
        }
    }

    /// Get the domain operations.
    pub fn operations(&self) -> &'a O {
        self.operations
    }

    /// Whether the strategy under-approximates.
    pub fn is_under_approximating(&self) -> bool {
        self.under_approximate
    }

    fn fresh(&self) -> GeneratingState<O::Value> {
        GeneratingState::new(self.operations.top(), self.operations.empty())
    }
}

impl<O: GeneratingOperations> RegexInterpretation for GeneratingInterpretation<'_, O> {
    type State = GeneratingState<O::Value>;

    fn top(&self) -> Self::State {
        GeneratingState::new(self.operations.top(), self.operations.top())
    }

    fn bottom(&self) -> Self::State {
        GeneratingState::new(self.operations.bottom(), self.operations.bottom())
    }

    fn join(&self, a: &Self::State, b: &Self::State, widen: bool) -> Self::State {
        GeneratingState::new(
            self.operations.join(&a.open, &b.open, widen),
            self.operations.join(&a.closed, &b.closed, widen),
        )
    }

    fn add_char(&self, prev: &Self::State, must_match: &CharRanges, can_match: &CharRanges) -> Self::State {
        let ranges = if self.under_approximate { must_match } else { can_match };
        GeneratingState::new(
            self.operations.add_char(&prev.closed, ranges, false),
            self.operations.add_char(&prev.closed, ranges, true),
        )
    }

    /// Restarting is only possible if the text so far could have been empty.
    fn assume_start(&self, prev: &Self::State) -> Self::State {
        if self.operations.can_be_empty(&prev.closed) {
            self.fresh()
        } else {
            self.bottom()
        }
    }

    fn assume_end(&self, prev: &Self::State) -> Self::State {
        GeneratingState::new(prev.closed.clone(), prev.closed.clone())
    }

    fn begin_loop(&self, _prev: &Self::State, _min: u64, _max: IndexInt) -> Self::State {
        self.fresh()
    }

    fn end_loop(&self, prev: &Self::State, next: &Self::State, min: u64, max: IndexInt) -> Self::State {
        let mut open = self
            .operations
            .repeat(&prev.closed, &next.closed, &next.open, min, max);
        let closed = self
            .operations
            .repeat(&prev.closed, &next.closed, &next.closed, min, max);

        // Zero-iteration continuations stay reachable.
        if min == 0 || self.operations.can_be_empty(&next.closed) {
            open = self.operations.join(&prev.open, &open, false);
        }

        GeneratingState::new(open, closed)
    }

    /// The lookaround pattern is interpreted from scratch.
    fn begin_lookaround(&self, _prev: &Self::State, _behind: bool) -> Result<Self::State, InterpretError> {
        Ok(self.top())
    }

    /// Dropping the lookaround constraint only over-approximates the language.
    fn end_lookaround(&self, prev: &Self::State, _next: &Self::State, _behind: bool) -> Result<Self::State, InterpretError> {
        if self.under_approximate {
            Ok(self.bottom())
        } else {
            Ok(prev.clone())
        }
    }

    fn unknown(&self, data: &Self::State) -> Self::State {
        if self.under_approximate {
            self.bottom()
        } else {
            data.clone()
        }
    }
}

/// Interprets `pattern` forward and returns the value of its complete paths.
pub fn generate<O: GeneratingOperations>(
    operations: &O,
    pattern: &Element,
    under_approximate: bool,
) -> Result<O::Value, InterpretError> {
    let strategy = GeneratingInterpretation::with_mode(operations, under_approximate);
    let state = Interpreter::new(strategy, Direction::Forward).interpret(pattern)?;
    debug!("Generated value for {}: {:?}", pattern, state.closed);
    Ok(state.closed)
}
