//! Square root and nth root handler.

use crate::context::MathletContext;
use crate::define_function::{FunctionContext, FunctionDefSpec, FunctionPropSpec};
use crate::parser::parse_node::{NodeType, ParseNode, ParseNodeSqrt};

/// Registers the `\sqrt` handler. The single optional argument is the root
/// index; `root(i, x)` lowers through the same handler with the index set.
pub fn define_sqrt(ctx: &mut MathletContext) {
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Sqrt),
        names: &["\\sqrt"],
        props: FunctionPropSpec {
            num_args: 1,
            num_optional_args: 1,
        },
        handler: Some(|context: FunctionContext, args, opt_args| {
            let body = args[0].clone();
            let index = opt_args[0].clone();
            Ok(ParseNode::Sqrt(Box::new(ParseNodeSqrt {
                mode: context.parser.mode,
                loc: context.loc(),
                body,
                index,
            })))
        }),
    });
}
