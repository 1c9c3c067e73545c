//! # regex-absint: Abstract Interpretation of Regular Expressions
//!
//! **`regex-absint`** is a framework for analyzing regular expressions by
//! abstract interpretation. A regex is modeled as a tree of [`Element`]s, and
//! a generic [`Interpreter`] walks that tree while delegating every
//! semantic decision to a pluggable [`RegexInterpretation`] strategy.
//!
//! ## Two Strategies
//!
//! - **Matching** ([`matching`]): given an abstract input, track an
//!   over-approximation (*may match*) and an under-approximation
//!   (*must match*) of the pattern's behavior.
//! - **Generating** ([`generating`]): synthesize an abstract value describing
//!   the language of the pattern, with separate *open* and *closed* tracks
//!   for partially and completely traversed paths.
//!
//! Both strategies are generic over a user-supplied domain. The crate ships
//! one concrete domain for each: [`positions`] (exact reachable positions in
//! a fixed string) and [`length`] (intervals of string lengths).
//!
//! ## Key Features
//!
//! - **Direction-aware traversal**: the same pattern can be interpreted
//!   forward or backward; concatenation order and anchor polarity flip.
//! - **Sound imprecision**: patterns that cannot be modeled exactly are
//!   wrapped in [`Element::Unknown`], which keeps over-approximations sound
//!   and collapses under-approximations.
//! - **Validated model**: character ranges and repetition bounds are checked
//!   at construction time.
//!
//! ## Basic Usage
//!
//! ```rust
//! use regex_absint::interpreter::Direction;
//! use regex_absint::length::{LengthDomain, LengthRange};
//! use regex_absint::matching::{check_match, MatchVerdict};
//! use regex_absint::pattern::Element;
//! use regex_absint::positions::{PositionDomain, Subject};
//!
//! // ^a+b$
//! let pattern = Element::concat([
//!     Element::start(),
//!     Element::plus(Element::char('a')),
//!     Element::char('b'),
//!     Element::end(),
//! ]);
//!
//! // 1. Matching against a concrete subject
//! let subject = Subject::new("aaab");
//! let verdict = check_match(&PositionDomain, &subject, &pattern, Direction::Forward).unwrap();
//! assert_eq!(verdict, MatchVerdict::Must);
//!
//! // 2. Generating the lengths of the language
//! let lengths = regex_absint::generating::generate(&LengthDomain, &pattern, false).unwrap();
//! assert_eq!(lengths, LengthRange::at_least(2));
//! ```
//!
//! ## Core Components
//!
//! - **[`pattern`]**: The regex model and its builders.
//! - **[`interpreter`]**: The tree walker and its configuration.
//! - **[`interpretation`]**: The strategy contract.
//! - **[`dot`]**: Utilities for visualizing patterns using Graphviz.

pub mod domain;
pub mod dot;
pub mod error;
pub mod generating;
pub mod interpretation;
pub mod interpreter;
pub mod length;
pub mod matching;
pub mod pattern;
pub mod positions;
pub mod ranges;
pub mod types;
pub mod visit;

pub use crate::error::{InterpretError, PatternError, Unsupported};
pub use crate::interpretation::RegexInterpretation;
pub use crate::interpreter::{Direction, Interpreter, InterpreterConfig};
pub use crate::pattern::Element;
pub use crate::ranges::{CharRange, CharRanges};
pub use crate::types::IndexInt;
