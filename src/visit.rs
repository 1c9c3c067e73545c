//! Single-entry dispatch over pattern elements.
//!
//! [`visit_element`] matches on the element variant and calls the
//! corresponding [`ElementVisitor`] handler, threading the caller's state by
//! mutable reference. The match is exhaustive, so adding a variant to
//! [`Element`] without a handler is a compile error.

use crate::pattern::{AnchorKind, Character, Element, Lookaround, Loop};

/// Per-variant handlers for a walk over a pattern tree.
///
/// `T` is the state threaded through the walk.
pub trait ElementVisitor<T> {
    /// Error that aborts the walk.
    type Error;

    /// Called on a single character.
    fn visit_character(&mut self, character: &Character, data: &mut T) -> Result<(), Self::Error>;

    /// Called on a sequence of parts.
    fn visit_concatenation(&mut self, parts: &[Element], data: &mut T) -> Result<(), Self::Error>;

    /// Called on an alternation.
    fn visit_union(&mut self, patterns: &[Element], data: &mut T) -> Result<(), Self::Error>;

    /// Called on a repetition.
    fn visit_loop(&mut self, repetition: &Loop, data: &mut T) -> Result<(), Self::Error>;

    /// Called on a start or end anchor.
    fn visit_anchor(&mut self, kind: AnchorKind, data: &mut T) -> Result<(), Self::Error>;

    /// Called on a lookahead or lookbehind.
    fn visit_lookaround(&mut self, lookaround: &Lookaround, data: &mut T) -> Result<(), Self::Error>;

    /// Called on a sub-pattern marked as unmodeled.
    fn visit_unknown(&mut self, pattern: &Element, data: &mut T) -> Result<(), Self::Error>;
}

/// Dispatches `element` to the handler for its variant.
pub fn visit_element<T, V>(visitor: &mut V, element: &Element, data: &mut T) -> Result<(), V::Error>
where
    V: ElementVisitor<T> + ?Sized,
{
    match element {
        Element::Character(c) => visitor.visit_character(c, data),
        Element::Concatenation(parts) => visitor.visit_concatenation(parts, data),
        Element::Union(patterns) => visitor.visit_union(patterns, data),
        Element::Loop(l) => visitor.visit_loop(l, data),
        Element::Anchor(kind) => visitor.visit_anchor(*kind, data),
        Element::Lookaround(l) => visitor.visit_lookaround(l, data),
        Element::Unknown(inner) => visitor.visit_unknown(inner, data),
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;

    /// Records the variant names in visiting order.
    struct Tracer;

    impl ElementVisitor<Vec<&'static str>> for Tracer {
        type Error = Infallible;

        fn visit_character(&mut self, _: &Character, data: &mut Vec<&'static str>) -> Result<(), Infallible> {
            data.push("char");
            Ok(())
        }

        fn visit_concatenation(&mut self, parts: &[Element], data: &mut Vec<&'static str>) -> Result<(), Infallible> {
            data.push("concat");
            for p in parts {
                visit_element(self, p, data)?;
            }
            Ok(())
        }

        fn visit_union(&mut self, patterns: &[Element], data: &mut Vec<&'static str>) -> Result<(), Infallible> {
            data.push("union");
            for p in patterns {
                visit_element(self, p, data)?;
            }
            Ok(())
        }

        fn visit_loop(&mut self, repetition: &Loop, data: &mut Vec<&'static str>) -> Result<(), Infallible> {
            data.push("loop");
            visit_element(self, repetition.pattern(), data)
        }

        fn visit_anchor(&mut self, kind: AnchorKind, data: &mut Vec<&'static str>) -> Result<(), Infallible> {
            data.push(match kind {
                AnchorKind::Start => "start",
                AnchorKind::End => "end",
            });
            Ok(())
        }

        fn visit_lookaround(&mut self, lookaround: &Lookaround, data: &mut Vec<&'static str>) -> Result<(), Infallible> {
            data.push("lookaround");
            visit_element(self, lookaround.pattern(), data)
        }

        fn visit_unknown(&mut self, pattern: &Element, data: &mut Vec<&'static str>) -> Result<(), Infallible> {
            data.push("unknown");
            visit_element(self, pattern, data)
        }
    }

    #[test]
    fn test_dispatch_reaches_every_variant() {
        let e = Element::concat([
            Element::start(),
            Element::union([Element::char('a'), Element::star(Element::char('b'))]),
            Element::lookahead(Element::char('c')),
            Element::unknown(Element::char('d')),
            Element::end(),
        ]);
        let mut trace = Vec::new();
        visit_element(&mut Tracer, &e, &mut trace).unwrap();
        assert_eq!(
            trace,
            vec![
                "concat",
                "start",
                "union",
                "char",
                "loop",
                "char",
                "lookaround",
                "char",
                "unknown",
                "char",
                "end",
            ]
        );
    }
}
