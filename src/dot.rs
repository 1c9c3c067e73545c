//! Pattern tree to DOT (Graphviz) conversion.
//!
//! Renders an [`Element`] tree as a directed graph, which can be visualized
//! using Graphviz tools like `dot` or online viewers.
//!
//! # DOT Format
//!
//! The generated DOT output follows these conventions:
//! - **Character nodes** are leaves labeled with their can-match set; inexact
//!   characters show `must | can`
//! - **Anchors and lookarounds** (zero-width constructs) use a separate shape
//! - **Unknown nodes** are drawn with the configured style (dashed by default)
//! - **Edges** go from parent to child; children of concatenations and unions
//!   are labeled with their position when `label_edges` is set
//!
//! # Examples
//!
//! ```
//! use regex_absint::pattern::Element;
//!
//! let e = Element::concat([Element::start(), Element::star(Element::char('a')), Element::end()]);
//! let dot = e.to_dot().unwrap();
//! assert!(dot.starts_with("digraph {"));
//! // Write to file and render with: dot -Tpng output.dot -o output.png
//! ```

use std::fmt::Write as _;

use crate::pattern::{AnchorKind, Element};
use crate::types::IndexInt;

/// Configuration options for DOT output generation.
///
/// # Examples
///
/// ```
/// use regex_absint::dot::DotConfig;
/// use regex_absint::pattern::Element;
///
/// let config = DotConfig {
///     label_edges: false,
///     ..DotConfig::default()
/// };
/// let dot = Element::literal("ab").to_dot_with_config(&config).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for composite nodes (default: "ellipse")
    pub node_shape: &'static str,
    /// Shape for character leaves (default: "box")
    pub char_shape: &'static str,
    /// Shape for anchors and lookarounds (default: "diamond")
    pub zero_width_shape: &'static str,
    /// Style for unknown nodes (default: "dashed")
    pub unknown_style: &'static str,
    /// Whether to label edges with the child position (default: true)
    pub label_edges: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            node_shape: "ellipse",
            char_shape: "box",
            zero_width_shape: "diamond",
            unknown_style: "dashed",
            label_edges: true,
        }
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

fn loop_label(min: u64, max: IndexInt) -> String {
    match max {
        IndexInt::Infinity => format!("{{{},}}", min),
        IndexInt::Finite(max) => format!("{{{},{}}}", min, max),
    }
}

impl Element {
    /// Converts the pattern tree to DOT format.
    pub fn to_dot(&self) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(&DotConfig::default())
    }

    /// Converts the pattern tree to DOT format with custom configuration.
    pub fn to_dot_with_config(&self, config: &DotConfig) -> Result<String, std::fmt::Error> {
        let mut dot = String::new();
        writeln!(dot, "digraph {{")?;
        writeln!(dot, "node [shape={}];", config.node_shape)?;

        let mut next_id = 1usize;
        // (node, id, parent id, position among ordered siblings)
        let mut stack: Vec<(&Element, usize, Option<usize>, Option<usize>)> = vec![(self, 0, None, None)];

        while let Some((element, id, parent, position)) = stack.pop() {
            let (label, shape, style) = match element {
                Element::Character(c) if c.is_exact() => (c.can_match().to_string(), config.char_shape, None),
                Element::Character(c) => (
                    format!("{} | {}", c.must_match(), c.can_match()),
                    config.char_shape,
                    None,
                ),
                Element::Concatenation(_) => ("·".to_string(), config.node_shape, None),
                Element::Union(_) => ("|".to_string(), config.node_shape, None),
                Element::Loop(l) => (loop_label(l.min(), l.max()), config.node_shape, None),
                Element::Anchor(AnchorKind::Start) => ("^".to_string(), config.zero_width_shape, None),
                Element::Anchor(AnchorKind::End) => ("$".to_string(), config.zero_width_shape, None),
                Element::Lookaround(l) if l.is_behind() => ("?<=".to_string(), config.zero_width_shape, None),
                Element::Lookaround(_) => ("?=".to_string(), config.zero_width_shape, None),
                Element::Unknown(_) => ("?".to_string(), config.node_shape, Some(config.unknown_style)),
            };

            write!(dot, "{} [label=\"{}\", shape={}", id, escape(&label), shape)?;
            if let Some(style) = style {
                write!(dot, ", style={}", style)?;
            }
            writeln!(dot, "];")?;

            match (parent, position) {
                (Some(parent), Some(position)) if config.label_edges => {
                    writeln!(dot, "{} -> {} [label=\"{}\"];", parent, id, position)?;
                }
                (Some(parent), _) => writeln!(dot, "{} -> {};", parent, id)?,
                (None, _) => {}
            }

            // Push in reverse so that children are emitted in pattern order.
            let ordered = matches!(element, Element::Concatenation(_) | Element::Union(_));
            let children = element.children();
            let first_id = next_id;
            next_id += children.len();
            for (i, child) in children.into_iter().enumerate().rev() {
                stack.push((child, first_id + i, Some(id), ordered.then_some(i)));
            }
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}
