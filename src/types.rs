//! Loop-bound integers.
//!
//! Loop bounds are non-negative and the upper bound may be unbounded, so
//! they are represented by [`IndexInt`]: a finite `u64` or positive infinity.
use std::cmp::Ordering;
use std::fmt;

/// A non-negative integer or `+∞`.
///
/// # Invariants
///
/// - `Finite(n) < Infinity` for every `n`
/// - Arithmetic saturates: anything that would overflow `u64` becomes `Infinity`
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum IndexInt {
    Finite(u64),
    Infinity,
}

impl IndexInt {
    /// Zero.
    pub const ZERO: IndexInt = IndexInt::Finite(0);
    /// One.
    pub const ONE: IndexInt = IndexInt::Finite(1);

    /// Check if the value is a finite number.
    pub fn is_finite(self) -> bool {
        matches!(self, IndexInt::Finite(_))
    }

    /// Check if the value is `∞`.
    pub fn is_infinite(self) -> bool {
        matches!(self, IndexInt::Infinity)
    }

    /// The finite value, or `None` for `∞`.
    pub fn as_finite(self) -> Option<u64> {
        match self {
            IndexInt::Finite(n) => Some(n),
            IndexInt::Infinity => None,
        }
    }

    /// Addition saturating at `∞`.
    pub fn add(self, other: IndexInt) -> IndexInt {
        match (self, other) {
            (IndexInt::Finite(a), IndexInt::Finite(b)) => a.checked_add(b).map_or(IndexInt::Infinity, IndexInt::Finite),
            _ => IndexInt::Infinity,
        }
    }

    /// Multiplication with `0 * ∞ = 0`.
    pub fn mul(self, other: IndexInt) -> IndexInt {
        match (self, other) {
            (IndexInt::Finite(0), _) | (_, IndexInt::Finite(0)) => IndexInt::ZERO,
            (IndexInt::Finite(a), IndexInt::Finite(b)) => a.checked_mul(b).map_or(IndexInt::Infinity, IndexInt::Finite),
            _ => IndexInt::Infinity,
        }
    }

    /// Subtraction clamped at zero. `∞ - n = ∞`, `n - ∞ = 0`.
    pub fn saturating_sub(self, other: IndexInt) -> IndexInt {
        match (self, other) {
            (IndexInt::Infinity, IndexInt::Finite(_)) => IndexInt::Infinity,
            (IndexInt::Infinity, IndexInt::Infinity) => IndexInt::ZERO,
            (IndexInt::Finite(_), IndexInt::Infinity) => IndexInt::ZERO,
            (IndexInt::Finite(a), IndexInt::Finite(b)) => IndexInt::Finite(a.saturating_sub(b)),
        }
    }
}

impl PartialOrd for IndexInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexInt {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (IndexInt::Finite(a), IndexInt::Finite(b)) => a.cmp(b),
            (IndexInt::Finite(_), IndexInt::Infinity) => Ordering::Less,
            (IndexInt::Infinity, IndexInt::Finite(_)) => Ordering::Greater,
            (IndexInt::Infinity, IndexInt::Infinity) => Ordering::Equal,
        }
    }
}

impl From<u64> for IndexInt {
    fn from(value: u64) -> Self {
        IndexInt::Finite(value)
    }
}

impl From<Option<u64>> for IndexInt {
    /// `None` stands for an unbounded loop maximum.
    fn from(value: Option<u64>) -> Self {
        value.map_or(IndexInt::Infinity, IndexInt::Finite)
    }
}

impl fmt::Display for IndexInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexInt::Finite(n) => write!(f, "{}", n),
            IndexInt::Infinity => write!(f, "∞"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(IndexInt::Finite(3) < IndexInt::Finite(4));
        assert!(IndexInt::Finite(u64::MAX) < IndexInt::Infinity);
        assert_eq!(IndexInt::Infinity.max(IndexInt::Finite(7)), IndexInt::Infinity);
        assert_eq!(IndexInt::Infinity.min(IndexInt::Finite(7)), IndexInt::Finite(7));
    }

    #[test]
    fn test_add_saturates() {
        assert_eq!(IndexInt::Finite(2).add(IndexInt::Finite(3)), IndexInt::Finite(5));
        assert_eq!(IndexInt::Finite(u64::MAX).add(IndexInt::ONE), IndexInt::Infinity);
        assert_eq!(IndexInt::Finite(2).add(IndexInt::Infinity), IndexInt::Infinity);
    }

    #[test]
    fn test_mul() {
        assert_eq!(IndexInt::Finite(2).mul(IndexInt::Finite(3)), IndexInt::Finite(6));
        assert_eq!(IndexInt::ZERO.mul(IndexInt::Infinity), IndexInt::ZERO);
        assert_eq!(IndexInt::Infinity.mul(IndexInt::ZERO), IndexInt::ZERO);
        assert_eq!(IndexInt::Finite(2).mul(IndexInt::Infinity), IndexInt::Infinity);
        assert_eq!(IndexInt::Finite(u64::MAX).mul(IndexInt::Finite(2)), IndexInt::Infinity);
    }

    #[test]
    fn test_saturating_sub() {
        assert_eq!(IndexInt::Finite(2).saturating_sub(IndexInt::Finite(3)), IndexInt::ZERO);
        assert_eq!(IndexInt::Finite(5).saturating_sub(IndexInt::Finite(3)), IndexInt::Finite(2));
        assert_eq!(IndexInt::Infinity.saturating_sub(IndexInt::ONE), IndexInt::Infinity);
        assert_eq!(IndexInt::Finite(5).saturating_sub(IndexInt::Infinity), IndexInt::ZERO);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(IndexInt::from(None), IndexInt::Infinity);
        assert_eq!(IndexInt::from(Some(4)), IndexInt::Finite(4));
    }

    #[test]
    fn test_display() {
        assert_eq!(IndexInt::Finite(42).to_string(), "42");
        assert_eq!(IndexInt::Infinity.to_string(), "∞");
    }
}
