#![allow(dead_code)]

use std::sync::OnceLock;

use mathlet::parser::parse_node::{ParseNode, strip_locations};
use mathlet::{MathletContext, ParseError, Settings, parse};

static DEFAULT_CONTEXT: OnceLock<MathletContext> = OnceLock::new();

pub fn default_ctx() -> &'static MathletContext {
    DEFAULT_CONTEXT.get_or_init(MathletContext::default)
}

pub fn parse_expr(expr: &str) -> Result<Vec<ParseNode>, ParseError> {
    parse(default_ctx(), expr, &Settings::default())
}

/// Parses and strips all source locations, for structural comparison.
pub fn parse_stripped(expr: &str) -> Vec<ParseNode> {
    let mut nodes =
        parse_expr(expr).unwrap_or_else(|error| panic!("parse failed for {expr:?}: {error}"));
    strip_locations(&mut nodes);
    nodes
}

/// Parses input that is expected to fail and returns the error.
pub fn parse_error(expr: &str) -> ParseError {
    match parse_expr(expr) {
        Ok(nodes) => panic!("expected {expr:?} to fail, got {nodes:#?}"),
        Err(error) => error,
    }
}
