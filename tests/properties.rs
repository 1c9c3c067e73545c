//! Property-based tests for the interpreter and both strategies.
//!
//! Patterns are generated over a tiny alphabet so that random subjects
//! actually match them now and then.

use proptest::prelude::*;
use regex_absint::error::InterpretError;
use regex_absint::generating::generate;
use regex_absint::interpretation::RegexInterpretation;
use regex_absint::interpreter::{Direction, Interpreter};
use regex_absint::length::LengthDomain;
use regex_absint::matching::{check_match, MatchVerdict, MatchingInterpretation, MatchingState};
use regex_absint::pattern::Element;
use regex_absint::positions::{PositionDomain, Reach, Subject};
use regex_absint::ranges::CharRanges;
use regex_absint::types::IndexInt;

// Strategy for a single character class over `a..=c`
fn ranges() -> impl Strategy<Value = CharRanges> {
    prop::collection::btree_set(prop::char::range('a', 'c'), 0..3).prop_map(CharRanges::from_chars)
}

// Strategy for leaves: exact and inexact characters, and anchors
fn leaf() -> impl Strategy<Value = Element> {
    prop_oneof![
        4 => prop::char::range('a', 'c').prop_map(Element::char),
        2 => (ranges(), ranges()).prop_map(|(must, extra)| {
            let can = must.union(&extra);
            Element::character(must, can).unwrap()
        }),
        1 => Just(Element::start()),
        1 => Just(Element::end()),
    ]
}

// Strategy for lookaround-free patterns
fn pattern() -> impl Strategy<Value = Element> {
    leaf().prop_recursive(4, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Element::Concatenation),
            prop::collection::vec(inner.clone(), 0..3).prop_map(Element::Union),
            (inner.clone(), 0..3u64, prop::option::of(0..3u64)).prop_map(|(body, min, extra)| {
                Element::repeat(body, min, extra.map(|e| min + e)).unwrap()
            }),
            inner.prop_map(Element::unknown),
        ]
    })
}

fn subject() -> impl Strategy<Value = String> {
    "[abc]{0,6}"
}

// Matching strategy that checks `under ⊆ over` on every intermediate state
struct InclusionChecked<'a>(MatchingInterpretation<'a, PositionDomain, Subject>);

fn included(op: &str, state: MatchingState<Reach>) -> MatchingState<Reach> {
    assert!(state.under.is_subset(&state.over), "under ⊈ over after {}: {:?}", op, state);
    state
}

impl RegexInterpretation for InclusionChecked<'_> {
    type State = MatchingState<Reach>;

    fn top(&self) -> Self::State {
        included("top", self.0.top())
    }

    fn bottom(&self) -> Self::State {
        included("bottom", self.0.bottom())
    }

    fn join(&self, a: &Self::State, b: &Self::State, widen: bool) -> Self::State {
        included("join", self.0.join(a, b, widen))
    }

    fn add_char(&self, prev: &Self::State, must_match: &CharRanges, can_match: &CharRanges) -> Self::State {
        included("add_char", self.0.add_char(prev, must_match, can_match))
    }

    fn assume_start(&self, prev: &Self::State) -> Self::State {
        included("assume_start", self.0.assume_start(prev))
    }

    fn assume_end(&self, prev: &Self::State) -> Self::State {
        included("assume_end", self.0.assume_end(prev))
    }

    fn begin_loop(&self, prev: &Self::State, min: u64, max: IndexInt) -> Self::State {
        included("begin_loop", self.0.begin_loop(prev, min, max))
    }

    fn end_loop(&self, prev: &Self::State, next: &Self::State, min: u64, max: IndexInt) -> Self::State {
        included("end_loop", self.0.end_loop(prev, next, min, max))
    }

    fn begin_lookaround(&self, prev: &Self::State, behind: bool) -> Result<Self::State, InterpretError> {
        self.0.begin_lookaround(prev, behind).map(|s| included("begin_lookaround", s))
    }

    fn end_lookaround(&self, prev: &Self::State, next: &Self::State, behind: bool) -> Result<Self::State, InterpretError> {
        self.0.end_lookaround(prev, next, behind).map(|s| included("end_lookaround", s))
    }

    fn unknown(&self, data: &Self::State) -> Self::State {
        included("unknown", self.0.unknown(data))
    }
}

proptest! {
    #[test]
    fn under_is_included_in_over(e in pattern(), text in subject()) {
        let subject = Subject::new(&text);
        for direction in [Direction::Forward, Direction::Backward] {
            let strategy = InclusionChecked(MatchingInterpretation::new(&PositionDomain, &subject));
            let state = Interpreter::new(strategy, direction).interpret(&e).unwrap();
            prop_assert!(state.under.is_subset(&state.over), "{} on {:?}", e, text);
        }
    }

    #[test]
    fn unknown_preserves_over(e in pattern(), text in subject()) {
        let subject = Subject::new(&text);
        let interpreter = Interpreter::forward(MatchingInterpretation::new(&PositionDomain, &subject));
        let plain = interpreter.interpret(&e).unwrap();
        let wrapped = interpreter.interpret(&Element::unknown(e.clone())).unwrap();
        prop_assert!(wrapped.under.is_empty());
        prop_assert_eq!(wrapped.over, plain.over);
    }

    #[test]
    fn interpretation_is_deterministic(e in pattern(), text in subject()) {
        let subject = Subject::new(&text);
        let interpreter = Interpreter::forward(MatchingInterpretation::new(&PositionDomain, &subject));
        prop_assert_eq!(interpreter.interpret(&e).unwrap(), interpreter.interpret(&e).unwrap());
        prop_assert_eq!(
            generate(&LengthDomain, &e, false).unwrap(),
            generate(&LengthDomain, &e, false).unwrap()
        );
    }

    #[test]
    fn backward_on_reversed_subject_agrees(e in pattern(), text in subject()) {
        let subject = Subject::new(&text);
        let forward = check_match(&PositionDomain, &subject, &e, Direction::Forward).unwrap();
        let backward = check_match(&PositionDomain, &subject.reversed(), &e, Direction::Backward).unwrap();
        prop_assert_eq!(forward, backward, "{} on {:?}", e, text);
    }

    #[test]
    fn generated_lengths_cover_matches(e in pattern(), text in subject()) {
        let anchored = Element::concat([Element::start(), e, Element::end()]);
        let verdict = check_match(&PositionDomain, &Subject::new(&text), &anchored, Direction::Forward).unwrap();
        if verdict == MatchVerdict::Must {
            let lengths = generate(&LengthDomain, &anchored, false).unwrap();
            let len = text.chars().count() as u64;
            prop_assert!(lengths.contains(len), "{} accepts {:?} but lengths are {}", anchored, text, lengths);
        }
    }
}
