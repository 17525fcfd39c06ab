//! The typeset AST produced by the parser.
//!
//! Every variant of [`AnyParseNode`] corresponds to one node tag consumed
//! by downstream HTML/MathML builders. The parser emits a fixed subset
//! directly (symbol leaves, groups, scripts, delimiter pairs, text runs,
//! arrays) and the registered function handlers contribute the remainder
//! (fractions, roots, accents, named operators, rules).

use strum::{Display, EnumDiscriminants};

use crate::spacing_data::MeasurementOwned;
use crate::style::Style;
use crate::symbols::Atom;
use crate::types::{Mode, SourceLocation};

/// Column alignment and spacing for one column of an [`ParseNodeArray`].
#[derive(Debug, Clone, PartialEq)]
pub enum AlignSpec {
    /// A separator column such as a vertical rule.
    Separator {
        /// The separator string, e.g. `"|"`.
        separator: String,
    },
    /// A content column with alignment and optional gaps.
    Align {
        /// Alignment letter: `"l"`, `"c"` or `"r"`.
        align: String,
        /// Space before the column content, in em.
        pregap: Option<f64>,
        /// Space after the column content, in em.
        postgap: Option<f64>,
    },
}

/// The abstract syntax tree node family.
///
/// Uses `strum` to derive the [`NodeType`] discriminant enum so node tags
/// can be inspected without pattern matching on the full payload.
#[derive(Debug, Clone, PartialEq, EnumDiscriminants)]
#[strum_discriminants(vis(pub))]
#[strum_discriminants(doc = "Discriminant naming the tag of a parse node")]
#[strum_discriminants(derive(Display, Hash), strum(serialize_all = "lowercase"))]
#[strum_discriminants(name(NodeType))]
pub enum AnyParseNode {
    /// Rows and columns, as produced inside `cases`.
    Array(ParseNodeArray),
    /// An ordered sequence of child nodes treated as one unit.
    OrdGroup(ParseNodeOrdGroup),
    /// Superscript/subscript attachment.
    SupSub(ParseNodeSupSub),
    /// Generalized fraction, the output of the `\frac` handler.
    Genfrac(Box<ParseNodeGenfrac>),
    /// Paired-delimiter group (`abs`, `norm`, `floor`, `ceil`, `cases`).
    LeftRight(ParseNodeLeftRight),
    /// Square or nth root, the output of the `\sqrt` handler.
    Sqrt(Box<ParseNodeSqrt>),
    /// A single symbol belonging to a spacing atom family.
    Atom(ParseNodeAtom),
    /// An ordinary math symbol.
    MathOrd(ParseNodeMathOrd),
    /// An ordinary text symbol.
    TextOrd(ParseNodeTextOrd),
    /// A named operator such as `\sum` or `\sin`.
    Op(ParseNodeOp),
    /// A run of text-mode characters from a string literal.
    Text(ParseNodeText),
    /// A style wrapper, used for `cases` cells.
    Styling(ParseNodeStyling),
    /// An accented base, the output of the accent handlers.
    Accent(Box<ParseNodeAccent>),
    /// An overlined expression.
    Overline(ParseNodeOverline),
    /// An underlined expression.
    Underline(ParseNodeUnderline),
}

/// Convenient alias used throughout the crate.
pub type ParseNode = AnyParseNode;

/// An array of rows and columns, wrapped in a `leftright` by the `cases`
/// lowering.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeArray {
    /// The parsing mode the node was produced in.
    pub mode: Mode,
    /// Optional source location.
    pub loc: Option<SourceLocation>,
    /// Per-column alignment specifications.
    pub cols: Option<Vec<AlignSpec>>,
    /// Vertical stretching factor applied to every row.
    pub arraystretch: f64,
    /// The cells, row by row.
    pub body: Vec<Vec<AnyParseNode>>,
    /// Extra vertical gaps after each row but the last.
    pub row_gaps: Vec<Option<MeasurementOwned>>,
    /// Horizontal lines to draw before each row (and after the last).
    pub h_lines_before_row: Vec<Vec<bool>>,
}

/// An ordered group of child nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeOrdGroup {
    /// The parsing mode the node was produced in.
    pub mode: Mode,
    /// Optional source location.
    pub loc: Option<SourceLocation>,
    /// The grouped child nodes.
    pub body: Vec<AnyParseNode>,
}

/// Superscript and/or subscript attached to a base.
///
/// Emitted only when at least one of `sup`/`sub` is present.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeSupSub {
    /// The parsing mode the node was produced in.
    pub mode: Mode,
    /// Optional source location.
    pub loc: Option<SourceLocation>,
    /// The base expression being decorated.
    pub base: Option<Box<AnyParseNode>>,
    /// Superscript, if any.
    pub sup: Option<Box<AnyParseNode>>,
    /// Subscript, if any.
    pub sub: Option<Box<AnyParseNode>>,
}

/// A generalized fraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeGenfrac {
    /// The parsing mode the node was produced in.
    pub mode: Mode,
    /// Optional source location.
    pub loc: Option<SourceLocation>,
    /// Whether this is a continued fraction.
    pub continued: bool,
    /// The numerator.
    pub numer: Box<AnyParseNode>,
    /// The denominator.
    pub denom: Box<AnyParseNode>,
    /// Whether to draw the fraction bar.
    pub has_bar_line: bool,
    /// Optional left delimiter.
    pub left_delim: Option<String>,
    /// Optional right delimiter.
    pub right_delim: Option<String>,
    /// Forced display size; `None` means automatic.
    pub size: Option<&'static Style>,
    /// Custom bar thickness.
    pub bar_size: Option<MeasurementOwned>,
}

/// A paired-delimiter group.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeLeftRight {
    /// The parsing mode the node was produced in.
    pub mode: Mode,
    /// Optional source location.
    pub loc: Option<SourceLocation>,
    /// The enclosed expressions.
    pub body: Vec<AnyParseNode>,
    /// The left delimiter symbol.
    pub left: String,
    /// The right delimiter symbol; `"."` renders as nothing.
    pub right: String,
}

/// A square or nth root.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeSqrt {
    /// The parsing mode the node was produced in.
    pub mode: Mode,
    /// Optional source location.
    pub loc: Option<SourceLocation>,
    /// The radicand.
    pub body: AnyParseNode,
    /// Optional root index.
    pub index: Option<AnyParseNode>,
}

/// A symbol classified into a spacing atom family by the symbol table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNodeAtom {
    /// The atom family controlling the spacing around the symbol.
    pub family: Atom,
    /// The parsing mode the node was produced in.
    pub mode: Mode,
    /// Optional source location.
    pub loc: Option<SourceLocation>,
    /// The symbol text.
    pub text: String,
}

/// An ordinary math symbol (variables, Greek letters).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNodeMathOrd {
    /// The parsing mode the node was produced in.
    pub mode: Mode,
    /// Optional source location.
    pub loc: Option<SourceLocation>,
    /// The symbol text.
    pub text: String,
}

/// An ordinary text symbol (digits, unknown characters).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNodeTextOrd {
    /// The parsing mode the node was produced in.
    pub mode: Mode,
    /// Optional source location.
    pub loc: Option<SourceLocation>,
    /// The symbol text.
    pub text: String,
}

/// A named operator in symbol form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNodeOp {
    /// The parsing mode the node was produced in.
    pub mode: Mode,
    /// Optional source location.
    pub loc: Option<SourceLocation>,
    /// Whether scripts attach above/below rather than as sub/superscripts.
    pub limits: bool,
    /// Whether the operator sits directly under a `supsub` node.
    pub parent_is_sup_sub: bool,
    /// The operator command, e.g. `"\\sum"` or `"\\sin"`.
    pub name: String,
    /// Whether the operator renders as a single glyph.
    pub symbol: bool,
}

/// A run of literal text inside a math expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeText {
    /// The parsing mode the node was produced in.
    pub mode: Mode,
    /// Optional source location.
    pub loc: Option<SourceLocation>,
    /// The characters, one text-mode `textord` each.
    pub body: Vec<AnyParseNode>,
}

/// A style wrapper around child nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeStyling {
    /// The parsing mode the node was produced in.
    pub mode: Mode,
    /// Optional source location.
    pub loc: Option<SourceLocation>,
    /// The style the children should be laid out in.
    pub style: &'static Style,
    /// The wrapped expressions.
    pub body: Vec<AnyParseNode>,
}

/// An accent over a base expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeAccent {
    /// The parsing mode the node was produced in.
    pub mode: Mode,
    /// Optional source location.
    pub loc: Option<SourceLocation>,
    /// The accent command, e.g. `"\\hat"`.
    pub label: String,
    /// Whether the accent stretches to the width of the base.
    pub is_stretchy: Option<bool>,
    /// Whether the accent shifts with a skewed base.
    pub is_shifty: Option<bool>,
    /// The accented expression.
    pub base: AnyParseNode,
}

/// A horizontal line above an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeOverline {
    /// The parsing mode the node was produced in.
    pub mode: Mode,
    /// Optional source location.
    pub loc: Option<SourceLocation>,
    /// The overlined expression.
    pub body: Box<AnyParseNode>,
}

/// A horizontal line below an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeUnderline {
    /// The parsing mode the node was produced in.
    pub mode: Mode,
    /// Optional source location.
    pub loc: Option<SourceLocation>,
    /// The underlined expression.
    pub body: Box<AnyParseNode>,
}

impl AnyParseNode {
    /// The tag of this node.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        self.into()
    }
}

/// Removes every source location from the given nodes, recursively.
///
/// Binding values are stored through this before they enter the
/// environment: a substituted subtree must not point diagnostics at the
/// `let` statement it came from. Tests also use it to compare trees
/// structurally.
pub fn strip_locations(nodes: &mut [AnyParseNode]) {
    for node in nodes {
        strip_node(node);
    }
}

fn strip_opt(node: &mut Option<Box<AnyParseNode>>) {
    if let Some(inner) = node {
        strip_node(inner);
    }
}

fn strip_node(node: &mut AnyParseNode) {
    match node {
        AnyParseNode::Array(n) => {
            n.loc = None;
            for row in &mut n.body {
                strip_locations(row);
            }
        }
        AnyParseNode::OrdGroup(n) => {
            n.loc = None;
            strip_locations(&mut n.body);
        }
        AnyParseNode::SupSub(n) => {
            n.loc = None;
            strip_opt(&mut n.base);
            strip_opt(&mut n.sup);
            strip_opt(&mut n.sub);
        }
        AnyParseNode::Genfrac(n) => {
            n.loc = None;
            strip_node(&mut n.numer);
            strip_node(&mut n.denom);
        }
        AnyParseNode::LeftRight(n) => {
            n.loc = None;
            strip_locations(&mut n.body);
        }
        AnyParseNode::Sqrt(n) => {
            n.loc = None;
            strip_node(&mut n.body);
            if let Some(index) = &mut n.index {
                strip_node(index);
            }
        }
        AnyParseNode::Atom(n) => n.loc = None,
        AnyParseNode::MathOrd(n) => n.loc = None,
        AnyParseNode::TextOrd(n) => n.loc = None,
        AnyParseNode::Op(n) => n.loc = None,
        AnyParseNode::Text(n) => {
            n.loc = None;
            strip_locations(&mut n.body);
        }
        AnyParseNode::Styling(n) => {
            n.loc = None;
            strip_locations(&mut n.body);
        }
        AnyParseNode::Accent(n) => {
            n.loc = None;
            strip_node(&mut n.base);
        }
        AnyParseNode::Overline(n) => {
            n.loc = None;
            strip_node(&mut n.body);
        }
        AnyParseNode::Underline(n) => {
            n.loc = None;
            strip_node(&mut n.body);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_display() {
        let node = AnyParseNode::MathOrd(ParseNodeMathOrd {
            mode: Mode::Math,
            loc: None,
            text: "x".to_owned(),
        });
        assert_eq!(node.node_type(), NodeType::MathOrd);
        assert_eq!(node.node_type().to_string(), "mathord");
        assert_eq!(NodeType::OrdGroup.to_string(), "ordgroup");
        assert_eq!(NodeType::SupSub.to_string(), "supsub");
    }

    #[test]
    fn test_strip_locations_recurses() {
        let loc = crate::types::SourceLocation::from_str("x^2", 0, 1);
        let mut nodes = vec![AnyParseNode::SupSub(ParseNodeSupSub {
            mode: Mode::Math,
            loc: Some(loc.clone()),
            base: Some(Box::new(AnyParseNode::MathOrd(ParseNodeMathOrd {
                mode: Mode::Math,
                loc: Some(loc),
                text: "x".to_owned(),
            }))),
            sup: None,
            sub: None,
        })];
        strip_locations(&mut nodes);
        let AnyParseNode::SupSub(supsub) = &nodes[0] else {
            panic!("expected supsub");
        };
        assert!(supsub.loc.is_none());
        let Some(base) = &supsub.base else {
            panic!("expected base");
        };
        assert!(matches!(&**base, AnyParseNode::MathOrd(m) if m.loc.is_none()));
    }
}
