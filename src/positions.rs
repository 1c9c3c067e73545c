//! Reference matching domain over a concrete string.
//!
//! This is the classic position-set simulation of a regular expression,
//! plugged into [`MatchingInterpretation`][crate::matching::MatchingInterpretation].
//! It is exact, so the over- and under-approximations coincide and equal
//! ordinary regex search.
//!
//! A state is a [`Reach`]: for every *origin* position `o` of the subject,
//! the set of positions reachable from `o` by the pattern read so far. Keeping
//! the origin lets [`end_loop`][MatchingOperations::end_loop] compose the
//! single-iteration effect of a loop body with itself until a fixpoint, which
//! a plain position set could not do.
//!
//! The top state starts a match at every position (unanchored search); `^`
//! and `$` keep only positions `0` and `len` respectively.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use log::debug;

use crate::matching::MatchingOperations;
use crate::ranges::CharRanges;
use crate::types::IndexInt;

/// A concrete subject string, indexed by character.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subject {
    chars: Vec<char>,
}

impl Subject {
    /// Creates a subject from the characters of `text`.
    pub fn new(text: &str) -> Self {
        Subject {
            chars: text.chars().collect(),
        }
    }

    /// Number of characters. Positions range over `0..=len`.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the subject has no characters.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Character starting at `position`.
    pub fn char_at(&self, position: usize) -> Option<char> {
        self.chars.get(position).copied()
    }

    /// The subject read right to left.
    pub fn reversed(&self) -> Self {
        Subject {
            chars: self.chars.iter().rev().copied().collect(),
        }
    }
}

impl From<&str> for Subject {
    fn from(text: &str) -> Self {
        Subject::new(text)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.chars {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// A set of string positions backed by `u64` words.
#[derive(Debug, Clone, Default)]
pub struct PositionSet {
    words: Vec<u64>,
}

impl PositionSet {
    const BITS_PER_WORD: usize = 64;

    /// Creates an empty set.
    pub fn new() -> Self {
        Self { words: Vec::new() }
    }

    /// The positions `0..=last`.
    pub fn up_to(last: usize) -> Self {
        let mut set = Self::new();
        set.extend(0..=last);
        set
    }

    fn word_and_bit(position: usize) -> (usize, usize) {
        (position / Self::BITS_PER_WORD, position % Self::BITS_PER_WORD)
    }

    /// Check if `position` is in the set.
    pub fn contains(&self, position: usize) -> bool {
        let (word_idx, bit_idx) = Self::word_and_bit(position);
        match self.words.get(word_idx) {
            Some(word) => word & (1u64 << bit_idx) != 0,
            None => false,
        }
    }

    /// Returns true if the position was not previously present.
    pub fn insert(&mut self, position: usize) -> bool {
        let (word_idx, bit_idx) = Self::word_and_bit(position);
        if word_idx >= self.words.len() {
            self.words.resize(word_idx + 1, 0);
        }
        let mask = 1u64 << bit_idx;
        let was_clear = self.words[word_idx] & mask == 0;
        self.words[word_idx] |= mask;
        was_clear
    }

    /// Inserts every position of `positions`.
    pub fn extend(&mut self, positions: impl IntoIterator<Item = usize>) {
        for p in positions {
            self.insert(p);
        }
    }

    /// Number of positions in the set.
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Adds every position of `other`. Returns true if `self` changed.
    pub fn union_with(&mut self, other: &PositionSet) -> bool {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        let mut changed = false;
        for (w, o) in self.words.iter_mut().zip(&other.words) {
            let joined = *w | o;
            changed |= joined != *w;
            *w = joined;
        }
        changed
    }

    /// Keeps only the positions satisfying `keep`.
    pub fn filtered(&self, keep: impl Fn(usize) -> bool) -> PositionSet {
        let mut out = PositionSet::new();
        out.extend(self.iter().filter(|&p| keep(p)));
        out
    }

    /// `self ⊆ other`.
    pub fn is_subset(&self, other: &PositionSet) -> bool {
        self.words
            .iter()
            .enumerate()
            .all(|(i, &w)| w & !other.words.get(i).copied().unwrap_or(0) == 0)
    }

    /// Iterates positions in increasing order.
    pub fn iter(&self) -> PositionSetIter<'_> {
        PositionSetIter {
            set: self,
            word_idx: 0,
            current_word: self.words.first().copied().unwrap_or(0),
        }
    }

    /// Positions in increasing order.
    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }
}

impl PartialEq for PositionSet {
    fn eq(&self, other: &Self) -> bool {
        self.is_subset(other) && other.is_subset(self)
    }
}

impl Eq for PositionSet {}

impl Hash for PositionSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Trailing zero words do not change the content.
        let used = self.words.iter().rposition(|&w| w != 0).map_or(0, |i| i + 1);
        self.words[..used].hash(state);
    }
}

impl FromIterator<usize> for PositionSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        let mut set = PositionSet::new();
        set.extend(iter);
        set
    }
}

/// Iterator over the positions of a [`PositionSet`], in increasing order.
pub struct PositionSetIter<'a> {
    set: &'a PositionSet,
    word_idx: usize,
    current_word: u64,
}

impl Iterator for PositionSetIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_word != 0 {
                let bit_idx = self.current_word.trailing_zeros() as usize;
                self.current_word &= self.current_word - 1;
                return Some(self.word_idx * PositionSet::BITS_PER_WORD + bit_idx);
            }

            self.word_idx += 1;
            if self.word_idx >= self.set.words.len() {
                return None;
            }
            self.current_word = self.set.words[self.word_idx];
        }
    }
}

/// Positions reachable from each origin.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reach {
    // invariant: one entry per origin `0..=len`
    from: Vec<PositionSet>,
}

impl Reach {
    /// No position is reachable.
    pub fn empty(len: usize) -> Self {
        Reach {
            from: vec![PositionSet::new(); len + 1],
        }
    }

    /// Every origin reaches exactly itself.
    pub fn identity(len: usize) -> Self {
        Reach {
            from: (0..=len).map(|o| PositionSet::from_iter([o])).collect(),
        }
    }

    /// Positions reachable from `origin`.
    pub fn from_origin(&self, origin: usize) -> Option<&PositionSet> {
        self.from.get(origin)
    }

    /// All reachable positions, whatever the origin.
    pub fn ends(&self) -> PositionSet {
        let mut out = PositionSet::new();
        for set in &self.from {
            out.union_with(set);
        }
        out
    }

    /// Check if `position` is reachable from any origin.
    pub fn contains(&self, position: usize) -> bool {
        self.from.iter().any(|s| s.contains(position))
    }

    /// Check if nothing is reachable.
    pub fn is_empty(&self) -> bool {
        self.from.iter().all(PositionSet::is_empty)
    }

    /// Reachable positions in increasing order.
    pub fn to_vec(&self) -> Vec<usize> {
        self.ends().to_vec()
    }

    /// Every `(origin, end)` pair, i.e. the matched spans.
    pub fn spans(&self) -> Vec<(usize, usize)> {
        self.from
            .iter()
            .enumerate()
            .flat_map(|(o, set)| set.iter().map(move |e| (o, e)))
            .collect()
    }

    /// `self ⊑ other`.
    pub fn is_subset(&self, other: &Reach) -> bool {
        self.from
            .iter()
            .enumerate()
            .all(|(o, s)| other.from.get(o).is_some_and(|t| s.is_subset(t)))
    }

    /// Adds every pair of `other`. Returns true if `self` changed.
    fn union_with(&mut self, other: &Reach) -> bool {
        let mut changed = false;
        for (s, t) in self.from.iter_mut().zip(&other.from) {
            changed |= s.union_with(t);
        }
        changed
    }

    fn map_ends(&self, f: impl Fn(&PositionSet) -> PositionSet) -> Reach {
        Reach {
            from: self.from.iter().map(f).collect(),
        }
    }

    /// Relational composition: follow `self`, then `step` from wherever `self` ended.
    fn then(&self, step: &Reach) -> Reach {
        self.map_ends(|ends| {
            let mut out = PositionSet::new();
            for p in ends.iter() {
                if let Some(next) = step.from.get(p) {
                    out.union_with(next);
                }
            }
            out
        })
    }
}

/// Exact matching operations on a [`Subject`].
///
/// The `under` flag is ignored: both approximations are exact.
#[derive(Debug, Copy, Clone, Default)]
pub struct PositionDomain;

impl MatchingOperations<Subject> for PositionDomain {
    type State = Reach;

    fn top(&self, input: &Subject) -> Reach {
        Reach::identity(input.len())
    }

    fn bottom(&self, input: &Subject) -> Reach {
        Reach::empty(input.len())
    }

    fn is_bottom(&self, state: &Reach) -> bool {
        state.is_empty()
    }

    fn match_char(&self, input: &Subject, prev: &Reach, ranges: &CharRanges, _under: bool) -> Reach {
        prev.map_ends(|ends| {
            ends.iter()
                .filter(|&p| input.char_at(p).is_some_and(|c| ranges.contains(c)))
                .map(|p| p + 1)
                .collect()
        })
    }

    fn assume_start(&self, _input: &Subject, prev: &Reach, _under: bool) -> Reach {
        prev.map_ends(|ends| ends.filtered(|p| p == 0))
    }

    fn assume_end(&self, input: &Subject, prev: &Reach, _under: bool) -> Reach {
        let len = input.len();
        prev.map_ends(|ends| ends.filtered(|p| p == len))
    }

    fn join(&self, a: &Reach, b: &Reach, _widen: bool, _under: bool) -> Reach {
        let mut out = a.clone();
        out.union_with(b);
        out
    }

    /// The body is interpreted as a relation from every position.
    fn begin_loop(&self, input: &Subject, _prev: &Reach, _min: u64, _max: IndexInt, _under: bool) -> Reach {
        Reach::identity(input.len())
    }

    /// Joins `prev ∘ stepᵏ` for `k` in `min..=max`.
    ///
    /// Below `min` the iterates live in a finite space, so they eventually
    /// cycle; once one repeats, whole periods are skipped. Above `min` the
    /// iteration stops as soon as the accumulated result is stable.
    fn end_loop(&self, input: &Subject, prev: &Reach, step: &Reach, min: u64, max: IndexInt, _under: bool) -> Reach {
        let mut acc = prev.clone();
        let mut k = 0u64;
        let mut compositions = 0u64;

        let mut seen: HashMap<Reach, u64> = HashMap::new();
        while k < min && !acc.is_empty() {
            if let Some(&first) = seen.get(&acc) {
                let remaining = (min - k) % (k - first);
                for _ in 0..remaining {
                    acc = acc.then(step);
                }
                compositions += remaining;
                k = min;
                break;
            }
            seen.insert(acc.clone(), k);
            acc = acc.then(step);
            compositions += 1;
            k += 1;
        }

        let mut result = Reach::empty(input.len());
        if acc.is_empty() {
            debug!("Loop {{{},{}}} emptied after {} compositions", min, max, compositions);
            return result;
        }
        result.union_with(&acc);

        while IndexInt::Finite(k) < max {
            acc = acc.then(step);
            compositions += 1;
            k += 1;
            if acc.is_empty() || !result.union_with(&acc) {
                // Nothing new: every further iteration is already covered.
                break;
            }
        }

        debug!("Loop {{{},{}}} stabilized after {} compositions", min, max, compositions);
        result
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_position_set_basics() {
        let mut set = PositionSet::new();
        assert!(set.is_empty());
        assert!(set.insert(3));
        assert!(!set.insert(3));
        assert!(set.insert(64));
        assert!(set.insert(65));
        assert_eq!(set.len(), 3);
        assert_eq!(set.to_vec(), vec![3, 64, 65]);
        assert!(set.contains(64));
        assert!(!set.contains(1000));
    }

    #[test]
    fn test_position_set_equality_ignores_capacity() {
        let mut a = PositionSet::new();
        a.insert(100);
        let b = a.filtered(|p| p < 10);
        assert_eq!(b, PositionSet::new());
        assert_ne!(a, b);
    }

    #[test]
    fn test_position_set_subset_and_union() {
        let small: PositionSet = [1, 2].into_iter().collect();
        let mut big = PositionSet::up_to(70);
        assert!(small.is_subset(&big));
        assert!(!big.is_subset(&small));
        assert!(!big.union_with(&small));
        assert!(big.union_with(&PositionSet::from_iter([200])));
        assert!(big.contains(200));
    }

    #[test]
    fn test_subject() {
        let s = Subject::new("héllo");
        assert_eq!(s.len(), 5);
        assert_eq!(s.char_at(1), Some('é'));
        assert_eq!(s.char_at(5), None);
        assert_eq!(s.reversed().to_string(), "olléh");
    }

    #[test]
    fn test_match_char_advances_positions() {
        let s = Subject::new("aba");
        let top = PositionDomain.top(&s);
        let next = PositionDomain.match_char(&s, &top, &CharRanges::single('a'), false);
        assert_eq!(next.spans(), vec![(0, 1), (2, 3)]);
    }

    #[test]
    fn test_anchors_filter_positions() {
        let s = Subject::new("ab");
        let top = PositionDomain.top(&s);
        assert_eq!(PositionDomain.assume_start(&s, &top, false).spans(), vec![(0, 0)]);
        assert_eq!(PositionDomain.assume_end(&s, &top, false).spans(), vec![(2, 2)]);
    }

    #[test]
    fn test_end_loop_fixpoint() {
        let s = Subject::new("aaab");
        let a = CharRanges::single('a');
        let top = PositionDomain.top(&s);
        let body = PositionDomain.begin_loop(&s, &top, 0, IndexInt::Infinity, false);
        let step = PositionDomain.match_char(&s, &body, &a, false);

        let star = PositionDomain.end_loop(&s, &top, &step, 0, IndexInt::Infinity, false);
        assert_eq!(star.from_origin(0).map(PositionSet::to_vec), Some(vec![0, 1, 2, 3]));
        assert_eq!(star.from_origin(3).map(PositionSet::to_vec), Some(vec![3]));

        let bounded = PositionDomain.end_loop(&s, &top, &step, 2, IndexInt::Finite(2), false);
        assert_eq!(bounded.spans(), vec![(0, 2), (1, 3)]);

        let never = PositionDomain.end_loop(&s, &top, &step, 0, IndexInt::ZERO, false);
        assert_eq!(never, top);
    }

    #[test]
    fn test_end_loop_huge_minimum() {
        use crate::interpreter::Direction;
        use crate::matching::{check_match, MatchVerdict};
        use crate::pattern::Element;

        let anchored = |e: Element| Element::concat([Element::start(), e, Element::end()]);
        let verdict = |text: &str, e: &Element| check_match(&PositionDomain, &Subject::new(text), e, Direction::Forward).unwrap();

        let stars = Element::repeat(Element::star(Element::char('a')), 20_000_000, None).unwrap();
        assert_eq!(verdict("a", &stars), MatchVerdict::Must);

        let stars = anchored(Element::repeat(Element::star(Element::char('a')), 1_000_000_000, None).unwrap());
        assert_eq!(verdict("aaa", &stars), MatchVerdict::Must);

        let maybe_a = Element::union([Element::char('a'), Element::empty()]);
        let exact = anchored(Element::repeat(maybe_a, 1_000_000_000, Some(1_000_000_000)).unwrap());
        assert_eq!(verdict("aa", &exact), MatchVerdict::Must);
        assert_eq!(verdict("ab", &exact), MatchVerdict::Never);

        let many = anchored(Element::repeat(Element::char('a'), 1_000_000_000, None).unwrap());
        assert_eq!(verdict("aa", &many), MatchVerdict::Never);
    }
}

