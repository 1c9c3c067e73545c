//! Pattern model.
//!
//! An [`Element`] is an immutable tree describing a de-sugared regular
//! expression. Node payloads with invariants ([`Character`], [`Loop`]) have
//! private fields and validating constructors, so any tree built through this
//! API satisfies:
//!
//! - `must_match ⊆ can_match` for every character node
//! - `min <= max` for every loop node
//! - every [`CharRanges`] is canonical (sorted, disjoint)

use std::fmt;
use std::mem;

use crate::error::PatternError;
use crate::ranges::CharRanges;
use crate::types::IndexInt;

/// A single-character pattern.
///
/// `must_match` holds the characters that are guaranteed to match,
/// `can_match` the characters that possibly match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Character {
    must_match: CharRanges,
    can_match: CharRanges,
}

impl Character {
    /// Fails unless `must_match ⊆ can_match`.
    pub fn new(must_match: CharRanges, can_match: CharRanges) -> Result<Self, PatternError> {
        if !must_match.is_subset(&can_match) {
            return Err(PatternError::MustNotSubsetOfCan);
        }
        Ok(Character { must_match, can_match })
    }

    /// A character node whose must- and can-match sets coincide.
    pub fn exact(ranges: CharRanges) -> Self {
        Character {
            must_match: ranges.clone(),
            can_match: ranges,
        }
    }

    /// Characters guaranteed to match.
    pub fn must_match(&self) -> &CharRanges {
        &self.must_match
    }

    /// Characters that may match.
    pub fn can_match(&self) -> &CharRanges {
        &self.can_match
    }

    /// Check if the must- and can-match sets coincide.
    pub fn is_exact(&self) -> bool {
        self.must_match == self.can_match
    }
}

/// Bounded or unbounded repetition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Loop {
    pattern: Box<Element>,
    min: u64,
    max: IndexInt,
}

impl Loop {
    /// Fails unless `min <= max`.
    pub fn new(pattern: Element, min: u64, max: IndexInt) -> Result<Self, PatternError> {
        if IndexInt::Finite(min) > max {
            return Err(PatternError::InvertedLoopBounds { min, max });
        }
        Ok(Loop {
            pattern: Box::new(pattern),
            min,
            max,
        })
    }

    /// The repeated pattern.
    pub fn pattern(&self) -> &Element {
        &self.pattern
    }

    /// Minimum number of iterations.
    pub fn min(&self) -> u64 {
        self.min
    }

    /// Maximum number of iterations, possibly `∞`.
    pub fn max(&self) -> IndexInt {
        self.max
    }
}

/// Zero-width assertion on the string boundary.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    Start,
    End,
}

/// Zero-width assertion that `pattern` matches ahead of (or behind) the current position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Lookaround {
    pattern: Box<Element>,
    behind: bool,
}

impl Lookaround {
    /// Lookbehind if `behind` is set, lookahead otherwise.
    pub fn new(pattern: Element, behind: bool) -> Self {
        Lookaround {
            pattern: Box::new(pattern),
            behind,
        }
    }

    /// The asserted pattern.
    pub fn pattern(&self) -> &Element {
        &self.pattern
    }

    /// Check if this is a lookbehind.
    pub fn is_behind(&self) -> bool {
        self.behind
    }
}

/// A node of the pattern model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Element {
    Character(Character),
    /// Sequential composition. An empty sequence is the empty pattern.
    Concatenation(Vec<Element>),
    /// Alternation.
    Union(Vec<Element>),
    Loop(Loop),
    Anchor(AnchorKind),
    Lookaround(Lookaround),
    /// A sub-pattern that could not be modeled faithfully, with a best-effort approximation.
    Unknown(Box<Element>),
}

impl Element {
    /// The empty pattern, matching only the empty string.
    pub fn empty() -> Self {
        Element::Concatenation(Vec::new())
    }

    /// A single character.
    pub fn char(c: char) -> Self {
        Element::Character(Character::exact(CharRanges::single(c)))
    }

    /// A character class with identical must- and can-match sets.
    pub fn class(ranges: CharRanges) -> Self {
        Element::Character(Character::exact(ranges))
    }

    /// Any character (`.` with dot-all).
    pub fn any_char() -> Self {
        Element::class(CharRanges::full())
    }

    /// A character node with distinct must- and can-match sets.
    pub fn character(must_match: CharRanges, can_match: CharRanges) -> Result<Self, PatternError> {
        Ok(Element::Character(Character::new(must_match, can_match)?))
    }

    /// Concatenation of single characters.
    pub fn literal(text: &str) -> Self {
        Element::Concatenation(text.chars().map(Element::char).collect())
    }

    /// Sequence of `parts`.
    pub fn concat<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = Element>,
    {
        Element::Concatenation(parts.into_iter().collect())
    }

    /// Alternation of `patterns`.
    pub fn union<I>(patterns: I) -> Self
    where
        I: IntoIterator<Item = Element>,
    {
        Element::Union(patterns.into_iter().collect())
    }

    /// `pattern{min,max}`; `max = None` is unbounded.
    pub fn repeat(pattern: Element, min: u64, max: Option<u64>) -> Result<Self, PatternError> {
        Ok(Element::Loop(Loop::new(pattern, min, IndexInt::from(max))?))
    }

    /// `pattern*`
    pub fn star(pattern: Element) -> Self {
        Element::Loop(Loop {
            pattern: Box::new(pattern),
            min: 0,
            max: IndexInt::Infinity,
        })
    }

    /// `pattern+`
    pub fn plus(pattern: Element) -> Self {
        Element::Loop(Loop {
            pattern: Box::new(pattern),
            min: 1,
            max: IndexInt::Infinity,
        })
    }

    /// `pattern?`
    pub fn optional(pattern: Element) -> Self {
        Element::Loop(Loop {
            pattern: Box::new(pattern),
            min: 0,
            max: IndexInt::ONE,
        })
    }

    /// `^`
    pub fn start() -> Self {
        Element::Anchor(AnchorKind::Start)
    }

    /// `$`
    pub fn end() -> Self {
        Element::Anchor(AnchorKind::End)
    }

    /// `(?=pattern)`
    pub fn lookahead(pattern: Element) -> Self {
        Element::Lookaround(Lookaround::new(pattern, false))
    }

    /// `(?<=pattern)`
    pub fn lookbehind(pattern: Element) -> Self {
        Element::Lookaround(Lookaround::new(pattern, true))
    }

    /// Marks `pattern` as an approximation of something not modeled.
    pub fn unknown(pattern: Element) -> Self {
        Element::Unknown(Box::new(pattern))
    }

    /// Direct children, in pattern order.
    pub fn children(&self) -> Vec<&Element> {
        match self {
            Element::Character(_) | Element::Anchor(_) => Vec::new(),
            Element::Concatenation(parts) | Element::Union(parts) => parts.iter().collect(),
            Element::Loop(l) => vec![l.pattern()],
            Element::Lookaround(l) => vec![l.pattern()],
            Element::Unknown(inner) => vec![inner.as_ref()],
        }
    }

    /// Nesting depth; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((e, d)) = stack.pop() {
            max = max.max(d);
            stack.extend(e.children().into_iter().map(|c| (c, d + 1)));
        }
        max
    }

    /// Total number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(e) = stack.pop() {
            count += 1;
            stack.extend(e.children());
        }
        count
    }

    /// Check if any node of the tree is a lookaround.
    pub fn contains_lookaround(&self) -> bool {
        let mut stack = vec![self];
        while let Some(e) = stack.pop() {
            if matches!(e, Element::Lookaround(_)) {
                return true;
            }
            stack.extend(e.children());
        }
        false
    }

    /// Re-checks every node invariant.
    ///
    /// Trees built through the constructors of this module are always valid;
    /// this is for trees that were deserialized or assembled elsewhere.
    pub fn validate(&self) -> Result<(), PatternError> {
        let mut stack = vec![self];
        while let Some(e) = stack.pop() {
            match e {
                Element::Character(c) => {
                    if !c.must_match.is_subset(&c.can_match) {
                        return Err(PatternError::MustNotSubsetOfCan);
                    }
                }
                Element::Loop(l) => {
                    if IndexInt::Finite(l.min) > l.max {
                        return Err(PatternError::InvertedLoopBounds { min: l.min, max: l.max });
                    }
                }
                _ => {}
            }
            stack.extend(e.children());
        }
        Ok(())
    }
}

/// Moves the direct children of `element` onto `stack`, leaving it a leaf.
fn detach_children(element: &mut Element, stack: &mut Vec<Element>) {
    match element {
        Element::Concatenation(parts) | Element::Union(parts) => stack.append(parts),
        Element::Loop(Loop { pattern, .. }) | Element::Lookaround(Lookaround { pattern, .. }) => {
            stack.push(mem::replace(pattern.as_mut(), Element::empty()));
        }
        Element::Unknown(inner) => stack.push(mem::replace(inner.as_mut(), Element::empty())),
        Element::Character(_) | Element::Anchor(_) => {}
    }
}

/// Tears the tree down level by level, so dropping a deeply nested pattern
/// does not recurse once per nesting level.
impl Drop for Element {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        detach_children(self, &mut stack);
        while let Some(mut element) = stack.pop() {
            detach_children(&mut element, &mut stack);
        }
    }
}

impl From<Character> for Element {
    fn from(c: Character) -> Self {
        Element::Character(c)
    }
}

impl From<Loop> for Element {
    fn from(l: Loop) -> Self {
        Element::Loop(l)
    }
}

impl From<Lookaround> for Element {
    fn from(l: Lookaround) -> Self {
        Element::Lookaround(l)
    }
}

impl fmt::Display for Element {
    /// Regex-like rendering, for diagnostics only.
    ///
    /// Inexact characters print as `<must|can>` and unknown sub-patterns as `(?unknown:...)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Character(c) => {
                if c.is_exact() {
                    write!(f, "{}", c.can_match)
                } else {
                    write!(f, "<{}|{}>", c.must_match, c.can_match)
                }
            }
            Element::Concatenation(parts) => {
                for p in parts {
                    if matches!(p, Element::Union(_)) {
                        write!(f, "(?:{})", p)?;
                    } else {
                        write!(f, "{}", p)?;
                    }
                }
                Ok(())
            }
            Element::Union(patterns) => {
                for (i, p) in patterns.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    write!(f, "{}", p)?;
                }
                Ok(())
            }
            Element::Loop(l) => {
                let atomic = match l.pattern.as_ref() {
                    Element::Character(_) | Element::Anchor(_) | Element::Lookaround(_) => true,
                    Element::Concatenation(parts) => parts.len() == 1 && matches!(parts[0], Element::Character(_)),
                    _ => false,
                };
                if atomic {
                    write!(f, "{}", l.pattern)?;
                } else {
                    write!(f, "(?:{})", l.pattern)?;
                }
                match (l.min, l.max) {
                    (0, IndexInt::Infinity) => write!(f, "*"),
                    (1, IndexInt::Infinity) => write!(f, "+"),
                    (0, IndexInt::Finite(1)) => write!(f, "?"),
                    (min, IndexInt::Infinity) => write!(f, "{{{},}}", min),
                    (min, IndexInt::Finite(max)) if min == max => write!(f, "{{{}}}", min),
                    (min, IndexInt::Finite(max)) => write!(f, "{{{},{}}}", min, max),
                }
            }
            Element::Anchor(AnchorKind::Start) => write!(f, "^"),
            Element::Anchor(AnchorKind::End) => write!(f, "$"),
            Element::Lookaround(l) => {
                let prefix = if l.behind { "?<=" } else { "?=" };
                write!(f, "({}{})", prefix, l.pattern)
            }
            Element::Unknown(inner) => write!(f, "(?unknown:{})", inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_invariant() {
        let ab = CharRanges::range('a', 'b').unwrap();
        let az = CharRanges::range('a', 'z').unwrap();
        assert!(Character::new(ab.clone(), az.clone()).is_ok());
        assert_eq!(Character::new(az, ab), Err(PatternError::MustNotSubsetOfCan));
    }

    #[test]
    fn test_loop_invariant() {
        assert!(Loop::new(Element::char('a'), 2, IndexInt::Finite(3)).is_ok());
        assert!(Loop::new(Element::char('a'), 2, IndexInt::Infinity).is_ok());
        assert!(Loop::new(Element::char('a'), 0, IndexInt::ZERO).is_ok());
        assert_eq!(
            Element::repeat(Element::char('a'), 3, Some(2)),
            Err(PatternError::InvertedLoopBounds {
                min: 3,
                max: IndexInt::Finite(2)
            })
        );
    }

    #[test]
    fn test_unbounded_repeat() {
        let e = Element::repeat(Element::char('a'), 2, None).unwrap();
        match &e {
            Element::Loop(l) => {
                assert_eq!(l.min(), 2);
                assert_eq!(l.max(), IndexInt::Infinity);
            }
            _ => panic!("expected a loop"),
        }
    }

    #[test]
    fn test_depth_and_count() {
        let e = Element::concat([Element::start(), Element::star(Element::literal("ab")), Element::end()]);
        // concat -> loop -> concat -> char
        assert_eq!(e.depth(), 4);
        // concat, ^, loop, concat, a, b, $
        assert_eq!(e.node_count(), 7);
        assert_eq!(Element::char('x').depth(), 1);
    }

    #[test]
    fn test_contains_lookaround() {
        let plain = Element::union([Element::literal("a"), Element::literal("b")]);
        assert!(!plain.contains_lookaround());
        let nested = Element::concat([Element::char('a'), Element::unknown(Element::lookahead(Element::char('b')))]);
        assert!(nested.contains_lookaround());
    }

    #[test]
    fn test_validate() {
        let e = Element::concat([
            Element::plus(Element::class(CharRanges::range('0', '9').unwrap())),
            Element::optional(Element::char('x')),
        ]);
        assert_eq!(e.validate(), Ok(()));
    }

    #[test]
    fn test_display() {
        let e = Element::concat([
            Element::start(),
            Element::plus(Element::class(CharRanges::range('a', 'z').unwrap())),
            Element::union([Element::literal("x"), Element::literal("yz")]),
            Element::repeat(Element::literal("ab"), 2, Some(3)).unwrap(),
            Element::lookahead(Element::char('q')),
            Element::end(),
        ]);
        assert_eq!(e.to_string(), "^[a-z]+(?:x|yz)(?:ab){2,3}(?=q)$");

        let inexact = Element::character(CharRanges::single('a'), CharRanges::range('a', 'b').unwrap()).unwrap();
        assert_eq!(inexact.to_string(), "<a|[a-b]>");
        assert_eq!(Element::unknown(Element::char('a')).to_string(), "(?unknown:a)");
    }

    #[test]
    fn test_drop_deeply_nested_tree() {
        let mut e = Element::char('a');
        for i in 0..1_000_000 {
            e = match i % 4 {
                0 => Element::unknown(e),
                1 => Element::star(e),
                2 => Element::lookahead(e),
                _ => Element::concat([Element::char('b'), e]),
            };
        }
        assert_eq!(e.depth(), 1_000_001);
        drop(e);
    }
}
