//! The public parse entry point.

use crate::context::MathletContext;
use crate::parser::{Parser, parse_node::ParseNode};
use crate::types::{ParseError, Settings};

/// Parses an expression and returns the resulting parse tree.
///
/// All parser state (lookahead, binding environment, mode) lives for this
/// one call and is dropped before it returns. On failure the error carries
/// the offending token's offsets and no partial tree is produced.
pub fn parse_tree(
    ctx: &MathletContext,
    expr: &str,
    settings: &Settings,
) -> Result<Vec<ParseNode>, ParseError> {
    let mut parser = Parser::new(expr, settings, ctx);
    parser.parse()
}
