//! Function definition utilities.
//!
//! Lowered calls such as `frac(a, b)` are dispatched to handlers looked up
//! by command name in the [`MathletContext`](crate::context::MathletContext).
//! This module provides the registration types and the context value a
//! handler receives. Handlers return a single parse node; the parser treats
//! that node opaquely.

use crate::parser::Parser;
use crate::parser::parse_node::{NodeType, ParseNode};
use crate::types::{ErrorLocationProvider as _, ParseError, SourceLocation, Token};

/// Context passed to a function handler.
pub struct FunctionContext<'a, 'b> {
    /// The command being lowered, e.g. `"\\frac"`.
    pub func_name: String,
    /// The invoking parser; gives handlers access to mode and settings.
    pub parser: &'a mut Parser<'b>,
    /// The call-site token, when one is available.
    pub token: Option<&'a Token>,
}

impl FunctionContext<'_, '_> {
    /// The source location of the call-site token, if available.
    #[must_use]
    pub fn loc(&self) -> Option<SourceLocation> {
        let t = self.token?;
        t.loc().cloned()
    }
}

/// A function handler: receives the context, the mandatory arguments and
/// the optional arguments, and produces the lowered node.
pub type FunctionHandler = fn(
    context: FunctionContext,
    args: Vec<ParseNode>,
    opt_args: Vec<Option<ParseNode>>,
) -> Result<ParseNode, ParseError>;

/// Parsing behaviour shared by every name a definition registers.
#[derive(Debug, Clone, Default)]
pub struct FunctionPropSpec {
    /// The number of mandatory arguments.
    pub num_args: usize,
    /// The number of optional arguments.
    pub num_optional_args: usize,
}

/// A complete function definition covering one or more names.
pub struct FunctionDefSpec<'b> {
    /// The node tag the handler lowers to, for downstream dispatch.
    pub node_type: Option<NodeType>,
    /// The command names this definition registers.
    pub names: &'b [&'b str],
    /// Argument counts.
    pub props: FunctionPropSpec,
    /// The handler invoked at lowering time.
    pub handler: Option<FunctionHandler>,
}

/// The per-name record stored in the context registry.
#[derive(Debug, Clone)]
pub struct FunctionSpec {
    /// The node tag the handler lowers to.
    pub node_type: Option<NodeType>,
    /// The number of mandatory arguments the handler expects.
    pub num_args: usize,
    /// The number of optional arguments the handler expects.
    pub num_optional_args: usize,
    /// The handler invoked at lowering time.
    pub handler: Option<FunctionHandler>,
}

/// Unwraps a one-element `ordgroup` so handlers see the element itself.
#[must_use]
pub fn normalize_argument(arg: &ParseNode) -> &ParseNode {
    match arg {
        ParseNode::OrdGroup(group) if group.body.len() == 1 => &group.body[0],
        _ => arg,
    }
}
