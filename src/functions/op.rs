//! Named operator handlers.
//!
//! Four families with distinct limit and glyph behaviour: the big symbol
//! operators (`\sum`, `\prod`), integrals, the limit-style text operators
//! (`\lim`, `\max`, `\min`) and the plain text operators (`\sin`, `\log`,
//! ...).

use crate::context::MathletContext;
use crate::define_function::{FunctionContext, FunctionDefSpec, FunctionPropSpec};
use crate::parser::parse_node::{NodeType, ParseNode, ParseNodeOp};

/// Registers the named operator handlers.
pub fn define_op(ctx: &mut MathletContext) {
    // Big operators: single glyph, scripts become limits
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Op),
        names: &["\\sum", "\\prod"],
        props: FunctionPropSpec::default(),
        handler: Some(|context: FunctionContext, _args, _opt_args| {
            Ok(ParseNode::Op(ParseNodeOp {
                mode: context.parser.mode,
                loc: context.loc(),
                limits: true,
                parent_is_sup_sub: false,
                name: context.func_name,
                symbol: true,
            }))
        }),
    });

    // Integrals: single glyph, scripts stay sub/superscript
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Op),
        names: &["\\int"],
        props: FunctionPropSpec::default(),
        handler: Some(|context: FunctionContext, _args, _opt_args| {
            Ok(ParseNode::Op(ParseNodeOp {
                mode: context.parser.mode,
                loc: context.loc(),
                limits: false,
                parent_is_sup_sub: false,
                name: context.func_name,
                symbol: true,
            }))
        }),
    });

    // Limit-style text operators
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Op),
        names: &["\\lim", "\\max", "\\min"],
        props: FunctionPropSpec::default(),
        handler: Some(|context: FunctionContext, _args, _opt_args| {
            Ok(ParseNode::Op(ParseNodeOp {
                mode: context.parser.mode,
                loc: context.loc(),
                limits: true,
                parent_is_sup_sub: false,
                name: context.func_name,
                symbol: false,
            }))
        }),
    });

    // Plain text operators
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Op),
        names: &["\\sin", "\\cos", "\\tan", "\\ln", "\\log", "\\exp"],
        props: FunctionPropSpec::default(),
        handler: Some(|context: FunctionContext, _args, _opt_args| {
            Ok(ParseNode::Op(ParseNodeOp {
                mode: context.parser.mode,
                loc: context.loc(),
                limits: false,
                parent_is_sup_sub: false,
                name: context.func_name,
                symbol: false,
            }))
        }),
    });
}
