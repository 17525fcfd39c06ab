//! Generalized fraction handler.

use crate::context::MathletContext;
use crate::define_function::{FunctionContext, FunctionDefSpec, FunctionPropSpec};
use crate::parser::parse_node::{NodeType, ParseNode, ParseNodeGenfrac};

/// Registers the `\frac` handler.
pub fn define_genfrac(ctx: &mut MathletContext) {
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Genfrac),
        names: &["\\frac"],
        props: FunctionPropSpec {
            num_args: 2,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, args, _opt_args| {
            let numer = args[0].clone();
            let denom = args[1].clone();
            Ok(ParseNode::Genfrac(Box::new(ParseNodeGenfrac {
                mode: context.parser.mode,
                loc: context.loc(),
                continued: false,
                numer: Box::new(numer),
                denom: Box::new(denom),
                has_bar_line: true,
                left_delim: None,
                right_delim: None,
                size: None,
                bar_size: None,
            })))
        }),
    });
}
