//! Accent handlers.

use phf::phf_set;

use crate::context::MathletContext;
use crate::define_function::{
    FunctionContext, FunctionDefSpec, FunctionPropSpec, normalize_argument,
};
use crate::parser::parse_node::{NodeType, ParseNode, ParseNodeAccent};

/// Accents that keep their natural width instead of stretching over the
/// base.
static NON_STRETCHY_ACCENTS: phf::Set<&'static str> = phf_set! {
    "\\acute", "\\grave", "\\ddot", "\\tilde", "\\bar", "\\breve",
    "\\check", "\\hat", "\\dot",
};

/// The math-mode accent commands the notation can reach, via the short
/// accent calls (`hat(x)`) or the generic `accent(x, kind)` form.
const MATH_ACCENTS: &[&str] = &[
    "\\hat", "\\bar", "\\tilde", "\\dot", "\\ddot", "\\vec", "\\acute", "\\grave", "\\check",
    "\\breve",
];

/// Registers the accent handlers.
pub fn define_accent(ctx: &mut MathletContext) {
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Accent),
        names: MATH_ACCENTS,
        props: FunctionPropSpec {
            num_args: 1,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, args, _opt_args| {
            let base = normalize_argument(&args[0]);
            let is_stretchy = !NON_STRETCHY_ACCENTS.contains(context.func_name.as_str());
            let is_shifty = !is_stretchy;

            Ok(ParseNode::Accent(Box::new(ParseNodeAccent {
                mode: context.parser.mode,
                loc: context.loc(),
                label: context.func_name,
                is_stretchy: Some(is_stretchy),
                is_shifty: Some(is_shifty),
                base: base.clone(),
            })))
        }),
    });
}
