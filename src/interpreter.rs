//! Forward and backward pattern interpreters.
//!
//! The [`Interpreter`] walks a pattern tree depth-first, threading one
//! abstract state through it and asking its [`RegexInterpretation`] strategy
//! to transform that state at every node.
//!
//! The two traversal directions differ in exactly two places:
//!
//! | Construct     | Forward               | Backward              |
//! |---------------|-----------------------|-----------------------|
//! | Concatenation | parts in order        | parts in reverse      |
//! | `^`           | `assume_start`        | `assume_end`          |
//! | `$`           | `assume_end`          | `assume_start`        |
//!
//! Backward interpretation of a pattern computes what forward interpretation
//! would compute against the reversed input. Lookaround has no backward
//! semantics and is rejected.
//!
//! # Example
//!
//! ```
//! use regex_absint::interpreter::Interpreter;
//! use regex_absint::matching::MatchingInterpretation;
//! use regex_absint::pattern::Element;
//! use regex_absint::positions::{PositionDomain, Subject};
//!
//! let subject = Subject::new("xab");
//! let strategy = MatchingInterpretation::new(&PositionDomain, &subject);
//! let pattern = Element::literal("ab");
//!
//! let state = Interpreter::forward(strategy).interpret(&pattern).unwrap();
//! assert!(state.over.contains(3));
//! ```

use log::{debug, trace, warn};

use crate::error::{InterpretError, Unsupported};
use crate::interpretation::RegexInterpretation;
use crate::pattern::{AnchorKind, Character, Element, Lookaround, Loop};
use crate::visit::{visit_element, ElementVisitor};

/// Default bound on pattern nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Traversal order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Left to right, from the start of the input.
    Forward,
    /// Right to left, from the end of the input.
    Backward,
}

/// Interpreter settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Maximum nesting depth of an interpreted pattern, `None` for no limit.
    ///
    /// The walk is recursive; without a limit a deeply nested pattern can
    /// exhaust the native stack.
    pub max_depth: Option<usize>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

/// Directional pattern interpreter.
///
/// Holds no per-call state and can be reused across `interpret` calls.
#[derive(Debug, Clone)]
pub struct Interpreter<R> {
    interpretation: R,
    direction: Direction,
    config: InterpreterConfig,
}

impl<R: RegexInterpretation> Interpreter<R> {
    /// Creates an interpreter with the default configuration.
    pub fn new(interpretation: R, direction: Direction) -> Self {
        Self::with_config(interpretation, direction, InterpreterConfig::default())
    }

    /// Creates an interpreter with a custom configuration.
    pub fn with_config(interpretation: R, direction: Direction, config: InterpreterConfig) -> Self {
        Self {
            interpretation,
            direction,
            config,
        }
    }

    /// Forward interpreter with the default configuration.
    pub fn forward(interpretation: R) -> Self {
        Self::new(interpretation, Direction::Forward)
    }

    /// Backward interpreter with the default configuration.
    pub fn backward(interpretation: R) -> Self {
        Self::new(interpretation, Direction::Backward)
    }

    /// Get the traversal direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Get the strategy driven by this interpreter.
    pub fn interpretation(&self) -> &R {
        &self.interpretation
    }

    /// Get the configuration.
    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Interprets `root` starting from the strategy's top state.
    pub fn interpret(&self, root: &Element) -> Result<R::State, InterpretError> {
        debug!("Interpreting {} nodes ({:?})", root.node_count(), self.direction);

        let mut data = self.interpretation.top();
        let mut walk = Walk {
            interpretation: &self.interpretation,
            direction: self.direction,
            max_depth: self.config.max_depth,
            depth: 0,
        };
        walk.visit(root, &mut data)?;

        debug!("Interpretation result: {:?}", data);
        Ok(data)
    }
}

fn kind(element: &Element) -> &'static str {
    match element {
        Element::Character(_) => "character",
        Element::Concatenation(_) => "concatenation",
        Element::Union(_) => "union",
        Element::Loop(_) => "loop",
        Element::Anchor(AnchorKind::Start) => "start anchor",
        Element::Anchor(AnchorKind::End) => "end anchor",
        Element::Lookaround(_) => "lookaround",
        Element::Unknown(_) => "unknown",
    }
}

/// State of a single `interpret` call.
struct Walk<'a, R> {
    interpretation: &'a R,
    direction: Direction,
    max_depth: Option<usize>,
    depth: usize,
}

impl<R: RegexInterpretation> Walk<'_, R> {
    fn visit(&mut self, element: &Element, data: &mut R::State) -> Result<(), InterpretError> {
        if let Some(limit) = self.max_depth {
            if self.depth >= limit {
                warn!("Pattern nesting exceeds the depth limit of {}", limit);
                return Err(InterpretError::DepthLimitExceeded { limit });
            }
        }

        self.depth += 1;
        trace!(
            "{:>width$}visit {} ({} children)",
            "",
            kind(element),
            element.children().len(),
            width = self.depth - 1
        );
        let result = visit_element(self, element, data);
        self.depth -= 1;
        result
    }
}

impl<R: RegexInterpretation> ElementVisitor<R::State> for Walk<'_, R> {
    type Error = InterpretError;

    fn visit_character(&mut self, character: &Character, data: &mut R::State) -> Result<(), InterpretError> {
        *data = self
            .interpretation
            .add_char(data, character.must_match(), character.can_match());
        Ok(())
    }

    fn visit_concatenation(&mut self, parts: &[Element], data: &mut R::State) -> Result<(), InterpretError> {
        match self.direction {
            Direction::Forward => {
                for part in parts {
                    self.visit(part, data)?;
                }
            }
            Direction::Backward => {
                for part in parts.iter().rev() {
                    self.visit(part, data)?;
                }
            }
        }
        Ok(())
    }

    fn visit_union(&mut self, patterns: &[Element], data: &mut R::State) -> Result<(), InterpretError> {
        let mut result = self.interpretation.bottom();
        for pattern in patterns {
            let mut branch = data.clone();
            self.visit(pattern, &mut branch)?;
            result = self.interpretation.join(&result, &branch, false);
        }
        *data = result;
        Ok(())
    }

    fn visit_loop(&mut self, repetition: &Loop, data: &mut R::State) -> Result<(), InterpretError> {
        let (min, max) = (repetition.min(), repetition.max());
        let mut next = self.interpretation.begin_loop(data, min, max);
        self.visit(repetition.pattern(), &mut next)?;
        *data = self.interpretation.end_loop(data, &next, min, max);
        Ok(())
    }

    fn visit_anchor(&mut self, kind: AnchorKind, data: &mut R::State) -> Result<(), InterpretError> {
        let at_start = matches!(
            (kind, self.direction),
            (AnchorKind::Start, Direction::Forward) | (AnchorKind::End, Direction::Backward)
        );
        *data = if at_start {
            self.interpretation.assume_start(data)
        } else {
            self.interpretation.assume_end(data)
        };
        Ok(())
    }

    fn visit_lookaround(&mut self, lookaround: &Lookaround, data: &mut R::State) -> Result<(), InterpretError> {
        let behind = lookaround.is_behind();
        if self.direction == Direction::Backward {
            warn!("Rejecting lookaround in backward traversal");
            return Err(Unsupported::LookaroundInBackward { behind }.into());
        }

        let mut next = match self.interpretation.begin_lookaround(data, behind) {
            Ok(next) => next,
            Err(e) => {
                warn!("Rejecting lookaround: {}", e);
                return Err(e);
            }
        };
        self.visit(lookaround.pattern(), &mut next)?;
        *data = self.interpretation.end_lookaround(data, &next, behind)?;
        Ok(())
    }

    fn visit_unknown(&mut self, pattern: &Element, data: &mut R::State) -> Result<(), InterpretError> {
        self.visit(pattern, data)?;
        *data = self.interpretation.unknown(data);
        Ok(())
    }
}
