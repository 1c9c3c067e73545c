//! Lattice structure shared by generating domains.
//!
//! The generating strategy only needs a join and an optional widening from
//! its domain, but a domain that is a proper lattice can be checked against
//! the lattice laws and reuses [`AbstractDomain::join_or_widen`] for its
//! [`GeneratingOperations::join`][crate::generating::GeneratingOperations::join].

use std::fmt::Debug;

/// A lattice of abstract values with a widening.
///
/// Implementations must make `le` a partial order with `bottom` as least and
/// `top` as greatest value, `join`/`meet` its least upper and greatest lower
/// bounds, and `widen` an upper bound of both arguments that stabilizes every
/// ascending chain.
pub trait AbstractDomain: Clone + Debug {
    /// Abstract value of the lattice.
    type Value: Clone + Debug + PartialEq;

    /// ⊥, the empty language.
    fn bottom(&self) -> Self::Value;

    /// ⊤, every string.
    fn top(&self) -> Self::Value;

    /// Whether `value` is ⊥.
    fn is_bottom(&self, value: &Self::Value) -> bool;

    /// Whether `value` is ⊤.
    fn is_top(&self, value: &Self::Value) -> bool;

    /// `a ⊑ b`: `a` describes no more strings than `b`.
    fn le(&self, a: &Self::Value, b: &Self::Value) -> bool;

    /// `a ⊔ b`.
    fn join(&self, a: &Self::Value, b: &Self::Value) -> Self::Value;

    /// `a ⊓ b`.
    fn meet(&self, a: &Self::Value, b: &Self::Value) -> Self::Value;

    /// `a ∇ b`, where `a` is the older value.
    fn widen(&self, a: &Self::Value, b: &Self::Value) -> Self::Value;

    /// Equality up to the order.
    fn equivalent(&self, a: &Self::Value, b: &Self::Value) -> bool {
        self.le(a, b) && self.le(b, a)
    }

    /// `a ∇ b` if `widen` is set, `a ⊔ b` otherwise.
    fn join_or_widen(&self, a: &Self::Value, b: &Self::Value, widen: bool) -> Self::Value {
        if widen {
            self.widen(a, b)
        } else {
            self.join(a, b)
        }
    }

    /// Join of every value, ⊥ if there are none.
    fn join_all<I>(&self, values: I) -> Self::Value
    where
        I: IntoIterator<Item = Self::Value>,
    {
        values.into_iter().fold(self.bottom(), |acc, v| self.join(&acc, &v))
    }
}
