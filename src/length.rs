//! Reference generating domain over string lengths.
//!
//! [`LengthDomain`] abstracts a language by the interval of lengths of its
//! strings. It is coarse but sound, small enough to check by hand, and gives
//! the open/closed tracks of
//! [`GeneratingInterpretation`][crate::generating::GeneratingInterpretation]
//! a concrete meaning:
//!
//! - a *closed* value is the length range of complete strings,
//! - an *open* value is the length range of strings that may still be
//!   extended, so adding a character to an open value leaves its upper bound
//!   unbounded.

use std::fmt;

use log::debug;

use crate::domain::AbstractDomain;
use crate::generating::GeneratingOperations;
use crate::ranges::CharRanges;
use crate::types::IndexInt;

/// Interval of string lengths, or the empty language.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LengthRange {
    Bottom,
    Range { min: u64, max: IndexInt },
}

impl LengthRange {
    /// `[min, max]`, or `Bottom` if the interval is empty.
    pub fn new(min: u64, max: IndexInt) -> Self {
        if IndexInt::Finite(min) > max {
            LengthRange::Bottom
        } else {
            LengthRange::Range { min, max }
        }
    }

    /// The single length `n`.
    pub fn exact(n: u64) -> Self {
        LengthRange::new(n, IndexInt::Finite(n))
    }

    /// Every length from `n` upward.
    pub fn at_least(n: u64) -> Self {
        LengthRange::new(n, IndexInt::Infinity)
    }

    /// Check if this is the empty language.
    pub fn is_bottom(&self) -> bool {
        matches!(self, LengthRange::Bottom)
    }

    /// Lower bound, `None` for bottom.
    pub fn min(&self) -> Option<u64> {
        match self {
            LengthRange::Bottom => None,
            LengthRange::Range { min, .. } => Some(*min),
        }
    }

    /// Upper bound, `None` for bottom.
    pub fn max(&self) -> Option<IndexInt> {
        match self {
            LengthRange::Bottom => None,
            LengthRange::Range { max, .. } => Some(*max),
        }
    }

    /// Check if length `n` is in the range.
    pub fn contains(&self, n: u64) -> bool {
        match self {
            LengthRange::Bottom => false,
            LengthRange::Range { min, max } => *min <= n && IndexInt::Finite(n) <= *max,
        }
    }

    /// Lengths of `a · b` for `a` in `self`, `b` in `other`.
    pub fn add(&self, other: &LengthRange) -> LengthRange {
        match (self, other) {
            (LengthRange::Range { min: a, max: x }, LengthRange::Range { min: b, max: y }) => {
                LengthRange::new(a.saturating_add(*b), x.add(*y))
            }
            _ => LengthRange::Bottom,
        }
    }

    /// Lengths of `k` concatenated strings of `self`, for `k` in `[lo, hi]`.
    pub fn times(&self, lo: u64, hi: IndexInt) -> LengthRange {
        match self {
            LengthRange::Bottom if lo == 0 => LengthRange::exact(0),
            LengthRange::Bottom => LengthRange::Bottom,
            LengthRange::Range { min, max } => LengthRange::new(min.saturating_mul(lo), max.mul(hi)),
        }
    }
}

impl fmt::Display for LengthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthRange::Bottom => write!(f, "⊥"),
            LengthRange::Range { min, max } => write!(f, "[{}, {}]", min, max),
        }
    }
}

/// Length-interval domain.
#[derive(Debug, Copy, Clone, Default)]
pub struct LengthDomain;

impl AbstractDomain for LengthDomain {
    type Value = LengthRange;

    fn bottom(&self) -> LengthRange {
        LengthRange::Bottom
    }

    fn top(&self) -> LengthRange {
        LengthRange::at_least(0)
    }

    fn is_bottom(&self, value: &LengthRange) -> bool {
        value.is_bottom()
    }

    fn is_top(&self, value: &LengthRange) -> bool {
        *value == AbstractDomain::top(self)
    }

    fn le(&self, a: &LengthRange, b: &LengthRange) -> bool {
        match (a, b) {
            (LengthRange::Bottom, _) => true,
            (_, LengthRange::Bottom) => false,
            (LengthRange::Range { min: a, max: x }, LengthRange::Range { min: b, max: y }) => b <= a && x <= y,
        }
    }

    fn join(&self, a: &LengthRange, b: &LengthRange) -> LengthRange {
        match (a, b) {
            (LengthRange::Bottom, e) | (e, LengthRange::Bottom) => *e,
            (LengthRange::Range { min: a, max: x }, LengthRange::Range { min: b, max: y }) => {
                LengthRange::new(*a.min(b), *x.max(y))
            }
        }
    }

    fn meet(&self, a: &LengthRange, b: &LengthRange) -> LengthRange {
        match (a, b) {
            (LengthRange::Range { min: a, max: x }, LengthRange::Range { min: b, max: y }) => {
                LengthRange::new(*a.max(b), *x.min(y))
            }
            _ => LengthRange::Bottom,
        }
    }

    /// Standard interval widening: unstable bounds jump to `0` and `∞`.
    fn widen(&self, a: &LengthRange, b: &LengthRange) -> LengthRange {
        match (a, b) {
            (LengthRange::Bottom, e) | (e, LengthRange::Bottom) => *e,
            (LengthRange::Range { min: a, max: x }, LengthRange::Range { min: b, max: y }) => {
                let min = if b < a { 0 } else { *a };
                let max = if y > x { IndexInt::Infinity } else { *x };
                LengthRange::new(min, max)
            }
        }
    }
}

impl GeneratingOperations for LengthDomain {
    type Value = LengthRange;

    fn top(&self) -> LengthRange {
        AbstractDomain::top(self)
    }

    fn bottom(&self) -> LengthRange {
        AbstractDomain::bottom(self)
    }

    fn empty(&self) -> LengthRange {
        LengthRange::exact(0)
    }

    fn can_be_empty(&self, value: &LengthRange) -> bool {
        value.contains(0)
    }

    fn add_char(&self, prev: &LengthRange, ranges: &CharRanges, closed: bool) -> LengthRange {
        if ranges.is_empty() {
            return LengthRange::Bottom;
        }
        match prev {
            LengthRange::Bottom => LengthRange::Bottom,
            LengthRange::Range { min, max } if closed => LengthRange::new(min.saturating_add(1), max.add(IndexInt::ONE)),
            LengthRange::Range { min, .. } => LengthRange::at_least(min.saturating_add(1)),
        }
    }

    fn join(&self, a: &LengthRange, b: &LengthRange, widen: bool) -> LengthRange {
        self.join_or_widen(a, b, widen)
    }

    /// `prev` joined over `k` in `[min, max]` with `k = 0` giving `prev`
    /// and `k ≥ 1` giving `prev · body^(k-1) · last`.
    fn repeat(&self, prev: &LengthRange, body: &LengthRange, last: &LengthRange, min: u64, max: IndexInt) -> LengthRange {
        let zero = if min == 0 { *prev } else { LengthRange::Bottom };

        let first = min.max(1);
        let iterated = if IndexInt::Finite(first) > max {
            LengthRange::Bottom
        } else {
            let middle = body.times(first - 1, max.saturating_sub(IndexInt::ONE));
            prev.add(&middle).add(last)
        };

        let result = AbstractDomain::join(self, &zero, &iterated);
        debug!(
            "Length loop {{{},{}}} of {} from {} (last {}): {}",
            min, max, body, prev, last, result
        );
        result
    }
}
