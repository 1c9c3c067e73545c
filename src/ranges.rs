//! Character ranges.
//!
//! A [`CharRanges`] is a set of Unicode scalar values stored as sorted,
//! disjoint, non-adjacent inclusive ranges. Every constructor either
//! normalizes its input into that form or rejects it, so two sets are equal
//! iff their range lists are equal.

use std::fmt;

use crate::error::PatternError;

/// Successor in the Unicode scalar value space, skipping surrogates.
fn next_char(c: char) -> Option<char> {
    match c as u32 {
        0xD7FF => Some('\u{E000}'),
        u => char::from_u32(u + 1),
    }
}

/// Predecessor in the Unicode scalar value space, skipping surrogates.
fn prev_char(c: char) -> Option<char> {
    match c as u32 {
        0 => None,
        0xE000 => Some('\u{D7FF}'),
        u => char::from_u32(u - 1),
    }
}

/// Inclusive range of characters `low..=high`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CharRange {
    low: char,
    high: char,
}

impl CharRange {
    /// The range `low..=high`; fails if `low > high`.
    pub fn new(low: char, high: char) -> Result<Self, PatternError> {
        if low > high {
            return Err(PatternError::InvertedRange { low, high });
        }
        Ok(CharRange { low, high })
    }

    /// The range containing only `c`.
    pub fn single(c: char) -> Self {
        CharRange { low: c, high: c }
    }

    /// Lowest character of the range.
    pub fn low(&self) -> char {
        self.low
    }

    /// Highest character of the range.
    pub fn high(&self) -> char {
        self.high
    }

    /// Check if `c` is in the range.
    pub fn contains(&self, c: char) -> bool {
        self.low <= c && c <= self.high
    }
}

impl fmt::Display for CharRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.low == self.high {
            write!(f, "{}", self.low.escape_debug())
        } else {
            write!(f, "{}-{}", self.low.escape_debug(), self.high.escape_debug())
        }
    }
}

/// Canonical set of characters.
#[derive(Debug, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CharRanges {
    // invariant: sorted, disjoint, non-adjacent
    ranges: Vec<CharRange>,
}

impl CharRanges {
    /// The empty set.
    pub fn empty() -> Self {
        CharRanges { ranges: Vec::new() }
    }

    /// Every Unicode scalar value.
    pub fn full() -> Self {
        CharRanges {
            ranges: vec![CharRange {
                low: '\0',
                high: char::MAX,
            }],
        }
    }

    /// The set containing only `c`.
    pub fn single(c: char) -> Self {
        CharRanges {
            ranges: vec![CharRange::single(c)],
        }
    }

    /// The set `low..=high`; fails if `low > high`.
    pub fn range(low: char, high: char) -> Result<Self, PatternError> {
        Ok(CharRanges {
            ranges: vec![CharRange::new(low, high)?],
        })
    }

    /// Builds a set from arbitrary ranges: sorts them and merges overlapping
    /// or adjacent ones.
    pub fn from_ranges<I>(ranges: I) -> Self
    where
        I: IntoIterator<Item = CharRange>,
    {
        let mut ranges: Vec<CharRange> = ranges.into_iter().collect();
        ranges.sort_unstable();
        let mut out = Vec::<CharRange>::with_capacity(ranges.len());
        for r in ranges {
            if let Some(last) = out.last_mut() {
                let touches = match next_char(last.high) {
                    Some(n) => r.low <= n,
                    None => true,
                };
                if touches {
                    if r.high > last.high {
                        last.high = r.high;
                    }
                    continue;
                }
            }
            out.push(r);
        }
        CharRanges { ranges: out }
    }

    /// Builds a set from ranges that are already sorted and non-overlapping.
    ///
    /// Adjacent ranges are merged. Unsorted or overlapping input is rejected
    /// with the index of the first offending range.
    pub fn try_from_sorted(ranges: Vec<CharRange>) -> Result<Self, PatternError> {
        for (index, pair) in ranges.windows(2).enumerate() {
            if pair[1].low <= pair[0].high {
                return Err(PatternError::UnsortedRanges { index: index + 1 });
            }
        }
        Ok(Self::from_ranges(ranges))
    }

    /// Builds a set from individual characters.
    pub fn from_chars<I>(chars: I) -> Self
    where
        I: IntoIterator<Item = char>,
    {
        Self::from_ranges(chars.into_iter().map(CharRange::single))
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Check if the set contains every character.
    pub fn is_full(&self) -> bool {
        *self == Self::full()
    }

    /// The canonical ranges, in increasing order.
    pub fn ranges(&self) -> &[CharRange] {
        &self.ranges
    }

    /// Iterates the canonical ranges.
    pub fn iter(&self) -> impl Iterator<Item = &CharRange> {
        self.ranges.iter()
    }

    /// Returns the single character of a singleton set.
    pub fn as_single(&self) -> Option<char> {
        match self.ranges.as_slice() {
            [r] if r.low == r.high => Some(r.low),
            _ => None,
        }
    }

    /// Check if `c` is in the set (binary search).
    pub fn contains(&self, c: char) -> bool {
        let mut lo = 0usize;
        let mut hi = self.ranges.len();
        while lo < hi {
            let mid = (lo + hi) / 2;
            let r = self.ranges[mid];
            if c < r.low {
                hi = mid;
            } else if c > r.high {
                lo = mid + 1;
            } else {
                return true;
            }
        }
        false
    }

    /// Set union.
    pub fn union(&self, other: &Self) -> Self {
        Self::from_ranges(self.ranges.iter().chain(other.ranges.iter()).copied())
    }

    /// Set intersection.
    pub fn intersection(&self, other: &Self) -> Self {
        let mut out = Vec::new();
        let mut i = 0usize;
        let mut j = 0usize;
        while i < self.ranges.len() && j < other.ranges.len() {
            let a = self.ranges[i];
            let b = other.ranges[j];
            let low = a.low.max(b.low);
            let high = a.high.min(b.high);
            if low <= high {
                out.push(CharRange { low, high });
            }
            if a.high < b.high {
                i += 1;
            } else {
                j += 1;
            }
        }
        // Pieces of disjoint inputs are already disjoint and sorted.
        CharRanges { ranges: out }
    }

    /// Every character not in the set.
    pub fn complement(&self) -> Self {
        let mut out = Vec::new();
        let mut cur = Some('\0');
        for r in &self.ranges {
            if let Some(c) = cur {
                if c < r.low {
                    if let Some(p) = prev_char(r.low) {
                        out.push(CharRange { low: c, high: p });
                    }
                }
            }
            cur = next_char(r.high);
        }
        if let Some(c) = cur {
            out.push(CharRange { low: c, high: char::MAX });
        }
        CharRanges { ranges: out }
    }

    /// `self ⊆ other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.ranges
            .iter()
            .all(|r| other.ranges.iter().any(|o| o.low <= r.low && r.high <= o.high))
    }
}

impl From<CharRange> for CharRanges {
    fn from(r: CharRange) -> Self {
        CharRanges { ranges: vec![r] }
    }
}

impl fmt::Display for CharRanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(c) = self.as_single() {
            return write!(f, "{}", c.escape_debug());
        }
        if self.is_full() {
            return write!(f, "[^]");
        }
        write!(f, "[")?;
        for r in &self.ranges {
            write!(f, "{}", r)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(low: char, high: char) -> CharRange {
        CharRange::new(low, high).unwrap()
    }

    #[test]
    fn test_inverted_range() {
        assert_eq!(
            CharRange::new('z', 'a'),
            Err(PatternError::InvertedRange { low: 'z', high: 'a' })
        );
    }

    #[test]
    fn test_from_ranges_normalizes() {
        let set = CharRanges::from_ranges([r('x', 'z'), r('a', 'c'), r('b', 'f'), r('g', 'h')]);
        assert_eq!(set.ranges(), &[r('a', 'h'), r('x', 'z')]);
    }

    #[test]
    fn test_try_from_sorted() {
        let set = CharRanges::try_from_sorted(vec![r('a', 'c'), r('d', 'e'), r('x', 'z')]).unwrap();
        assert_eq!(set.ranges(), &[r('a', 'e'), r('x', 'z')]);

        assert_eq!(
            CharRanges::try_from_sorted(vec![r('a', 'c'), r('x', 'z'), r('b', 'd')]),
            Err(PatternError::UnsortedRanges { index: 2 })
        );
        assert_eq!(
            CharRanges::try_from_sorted(vec![r('a', 'c'), r('c', 'd')]),
            Err(PatternError::UnsortedRanges { index: 1 })
        );
    }

    #[test]
    fn test_contains() {
        let set = CharRanges::from_ranges([r('a', 'c'), r('x', 'z')]);
        assert!(set.contains('a'));
        assert!(set.contains('b'));
        assert!(set.contains('z'));
        assert!(!set.contains('d'));
        assert!(!set.contains('A'));
        assert!(!CharRanges::empty().contains('a'));
        assert!(CharRanges::full().contains('\u{10FFFF}'));
    }

    #[test]
    fn test_set_ops() {
        let abc = CharRanges::range('a', 'c').unwrap();
        let bcd = CharRanges::range('b', 'd').unwrap();
        assert_eq!(abc.union(&bcd), CharRanges::range('a', 'd').unwrap());
        assert_eq!(abc.intersection(&bcd), CharRanges::range('b', 'c').unwrap());
        assert!(abc.intersection(&CharRanges::single('z')).is_empty());
    }

    #[test]
    fn test_complement() {
        let set = CharRanges::range('b', 'y').unwrap();
        let comp = set.complement();
        assert!(comp.contains('a'));
        assert!(comp.contains('z'));
        assert!(!comp.contains('m'));
        assert_eq!(comp.complement(), set);

        assert_eq!(CharRanges::empty().complement(), CharRanges::full());
        assert!(CharRanges::full().complement().is_empty());
    }

    #[test]
    fn test_complement_skips_surrogates() {
        let set = CharRanges::range('\u{E000}', char::MAX).unwrap();
        let comp = set.complement();
        assert_eq!(comp.ranges(), &[r('\0', '\u{D7FF}')]);
        assert!(comp.union(&set).is_full());
    }

    #[test]
    fn test_subset() {
        let ac = CharRanges::range('a', 'c').unwrap();
        let az = CharRanges::range('a', 'z').unwrap();
        assert!(ac.is_subset(&az));
        assert!(!az.is_subset(&ac));
        assert!(CharRanges::empty().is_subset(&ac));
        assert!(az.is_subset(&CharRanges::full()));
    }

    #[test]
    fn test_display() {
        assert_eq!(CharRanges::single('a').to_string(), "a");
        assert_eq!(CharRanges::from_chars(['a', 'b', 'c', 'x']).to_string(), "[a-cx]");
        assert_eq!(CharRanges::full().to_string(), "[^]");
        assert_eq!(CharRanges::empty().to_string(), "[]");
    }
}
