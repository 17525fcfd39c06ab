mod setup;

use mathlet::parser::parse_node::{AnyParseNode, NodeType, ParseNode};
use mathlet::symbols::{Atom, Mode};
use mathlet::types::ParseErrorKind;
use setup::{parse_error, parse_expr, parse_stripped};

fn assert_math_ord(node: &ParseNode, text: &str) {
    match node {
        AnyParseNode::MathOrd(n) => assert_eq!(n.text, text),
        other => panic!("expected mathord {text:?}, got {other:#?}"),
    }
}

fn assert_text_ord(node: &ParseNode, text: &str) {
    match node {
        AnyParseNode::TextOrd(n) => assert_eq!(n.text, text),
        other => panic!("expected textord {text:?}, got {other:#?}"),
    }
}

fn assert_atom(node: &ParseNode, family: Atom, text: &str) {
    match node {
        AnyParseNode::Atom(n) => {
            assert_eq!(n.family, family);
            assert_eq!(n.text, text);
        }
        other => panic!("expected {family:?} atom {text:?}, got {other:#?}"),
    }
}

#[test]
fn empty_input_parses_to_empty_sequence() {
    assert!(parse_expr("").unwrap().is_empty());
    assert!(parse_expr("   \n\t").unwrap().is_empty());
    assert!(parse_expr("// just a comment").unwrap().is_empty());
}

#[test]
fn scripts_attach_in_either_order() {
    let nodes = parse_stripped("x_1^2 + y");
    assert_eq!(nodes.len(), 3);

    let AnyParseNode::SupSub(supsub) = &nodes[0] else {
        panic!("expected supsub, got {:#?}", nodes[0]);
    };
    assert_math_ord(supsub.base.as_deref().unwrap(), "x");
    assert_text_ord(supsub.sub.as_deref().unwrap(), "1");
    assert_text_ord(supsub.sup.as_deref().unwrap(), "2");

    assert_atom(&nodes[1], Atom::Bin, "+");
    assert_math_ord(&nodes[2], "y");
}

#[test]
fn slash_lowers_to_a_fraction() {
    let nodes = parse_stripped("a / b");
    assert_eq!(nodes.len(), 1);
    let AnyParseNode::Genfrac(frac) = &nodes[0] else {
        panic!("expected genfrac, got {:#?}", nodes[0]);
    };
    assert_math_ord(&frac.numer, "a");
    assert_math_ord(&frac.denom, "b");
    assert!(frac.has_bar_line);
}

#[test]
fn fraction_binds_at_the_multiplicative_level() {
    let nodes = parse_stripped("a + b / c + d");
    assert_eq!(nodes.len(), 5);
    assert_math_ord(&nodes[0], "a");
    assert_atom(&nodes[1], Atom::Bin, "+");
    let AnyParseNode::Genfrac(frac) = &nodes[2] else {
        panic!("expected genfrac in the middle, got {:#?}", nodes[2]);
    };
    assert_math_ord(&frac.numer, "b");
    assert_math_ord(&frac.denom, "c");
    assert_atom(&nodes[3], Atom::Bin, "+");
    assert_math_ord(&nodes[4], "d");
}

#[test]
fn fraction_swallows_the_accumulated_left_sequence() {
    let nodes = parse_stripped("2 x / 3");
    assert_eq!(nodes.len(), 1);
    let AnyParseNode::Genfrac(frac) = &nodes[0] else {
        panic!("expected genfrac, got {:#?}", nodes[0]);
    };
    let AnyParseNode::OrdGroup(numer) = &*frac.numer else {
        panic!("expected ordgroup numerator, got {:#?}", frac.numer);
    };
    assert_eq!(numer.body.len(), 2);
    assert_text_ord(&frac.denom, "3");
}

#[test]
fn fractions_chain_left_associatively() {
    let nodes = parse_stripped("a / b / c");
    assert_eq!(nodes.len(), 1);
    let AnyParseNode::Genfrac(outer) = &nodes[0] else {
        panic!("expected genfrac, got {:#?}", nodes[0]);
    };
    assert!(matches!(&*outer.numer, AnyParseNode::Genfrac(_)));
    assert_math_ord(&outer.denom, "c");
}

#[test]
fn juxtaposition_is_multiplication_without_the_operator() {
    let juxtaposed = parse_stripped("2 x");
    let mut explicit = parse_stripped("2 * x");
    assert_eq!(explicit.len(), 3);
    assert_atom(&explicit[1], Atom::Bin, "\\cdot");
    explicit.remove(1);
    assert_eq!(juxtaposed, explicit);
}

#[test]
fn symmetric_operands_produce_equal_subtrees() {
    let nodes = parse_stripped("x y + x y");
    assert_eq!(nodes.len(), 5);
    assert_eq!(nodes[..2], nodes[3..]);

    let nodes = parse_stripped("x y * x y");
    assert_eq!(nodes.len(), 5);
    assert_eq!(nodes[..2], nodes[3..]);
}

#[test]
fn comparison_operators_chain_flat() {
    let nodes = parse_stripped("a = b == c");
    assert_eq!(nodes.len(), 5);
    assert_atom(&nodes[1], Atom::Rel, "=");
    // `==` maps onto the plain equals symbol
    assert_atom(&nodes[3], Atom::Rel, "=");
}

#[test]
fn arrows_map_to_their_symbol_commands() {
    let nodes = parse_stripped("a -> b <=> c");
    assert_eq!(nodes.len(), 5);
    assert_atom(&nodes[1], Atom::Rel, "\\to");
    assert_atom(&nodes[3], Atom::Rel, "\\Leftrightarrow");
}

#[test]
fn unary_minus_emits_a_minus_symbol() {
    let nodes = parse_stripped("-x");
    assert_eq!(nodes.len(), 2);
    assert_atom(&nodes[0], Atom::Bin, "-");
    assert_math_ord(&nodes[1], "x");

    // Unary plus is a no-op
    assert_eq!(parse_stripped("+x"), parse_stripped("x"));
}

#[test]
fn trailing_semicolon_keeps_the_last_statement() {
    assert_eq!(parse_stripped("x;"), parse_stripped("x"));
    assert_eq!(parse_stripped("a; ; b"), parse_stripped("b"));
}

#[test]
fn only_the_last_expression_statement_survives() {
    let nodes = parse_stripped("a + 1; b + 2");
    assert_eq!(nodes.len(), 3);
    assert_math_ord(&nodes[0], "b");
}

#[test]
fn empty_parens_stay_visible() {
    let nodes = parse_stripped("()");
    assert_eq!(nodes.len(), 1);
    let AnyParseNode::OrdGroup(group) = &nodes[0] else {
        panic!("expected ordgroup, got {:#?}", nodes[0]);
    };
    assert_eq!(group.body.len(), 2);
    assert_atom(&group.body[0], Atom::Open, "(");
    assert_atom(&group.body[1], Atom::Close, ")");
}

#[test]
fn brackets_are_visible_groups() {
    let nodes = parse_stripped("[x]");
    let AnyParseNode::OrdGroup(group) = &nodes[0] else {
        panic!("expected ordgroup, got {:#?}", nodes[0]);
    };
    assert_eq!(group.body.len(), 3);
    assert_atom(&group.body[0], Atom::Open, "[");
    assert_math_ord(&group.body[1], "x");
    assert_atom(&group.body[2], Atom::Close, "]");
}

#[test]
fn braces_group_invisibly() {
    let nodes = parse_stripped("{a + b}");
    assert_eq!(nodes.len(), 1);
    let AnyParseNode::OrdGroup(group) = &nodes[0] else {
        panic!("expected ordgroup, got {:#?}", nodes[0]);
    };
    assert_eq!(group.body.len(), 3);
    assert_math_ord(&group.body[0], "a");
}

#[test]
fn commas_inside_visible_groups_are_symbols() {
    let nodes = parse_stripped("(a, b)");
    let AnyParseNode::OrdGroup(group) = &nodes[0] else {
        panic!("expected ordgroup, got {:#?}", nodes[0]);
    };
    assert_eq!(group.body.len(), 5);
    assert_atom(&group.body[2], Atom::Punct, ",");
}

#[test]
fn greek_names_lower_to_symbol_commands() {
    let nodes = parse_stripped("alpha + Omega + oo");
    assert_eq!(nodes.len(), 5);
    assert_math_ord(&nodes[0], "\\alpha");
    assert_math_ord(&nodes[2], "\\Omega");
    assert_text_ord(&nodes[4], "\\infty");
}

#[test]
fn multi_letter_identifiers_split_into_letters() {
    let nodes = parse_stripped("speed");
    assert_eq!(nodes.len(), 1);
    let AnyParseNode::OrdGroup(group) = &nodes[0] else {
        panic!("expected ordgroup, got {:#?}", nodes[0]);
    };
    assert_eq!(group.body.len(), 5);
    assert_math_ord(&group.body[0], "s");
    assert_math_ord(&group.body[4], "d");
}

#[test]
fn unknown_character_survives_as_textord() {
    let nodes = parse_stripped("\u{a7}");
    assert_eq!(nodes.len(), 1);
    assert_text_ord(&nodes[0], "\u{a7}");
}

#[test]
fn string_literals_become_mixed_mode_text() {
    let nodes = parse_expr("\"if\"").unwrap();
    assert_eq!(nodes.len(), 1);
    let AnyParseNode::Text(text) = &nodes[0] else {
        panic!("expected text node, got {:#?}", nodes[0]);
    };
    assert_eq!(text.mode, Mode::Math);
    assert_eq!(text.body.len(), 2);
    for child in &text.body {
        let AnyParseNode::TextOrd(ch) = child else {
            panic!("expected textord child, got {child:#?}");
        };
        assert_eq!(ch.mode, Mode::Text);
    }
}

#[test]
fn parenthesized_script_arguments_work() {
    let nodes = parse_stripped("x^(n+1)");
    let AnyParseNode::SupSub(supsub) = &nodes[0] else {
        panic!("expected supsub, got {:#?}", nodes[0]);
    };
    let sup = supsub.sup.as_deref().unwrap();
    assert_eq!(sup.node_type(), NodeType::OrdGroup);
}

#[test]
fn braced_script_arguments_take_full_expressions() {
    let nodes = parse_stripped("x^{a + b}");
    let AnyParseNode::SupSub(supsub) = &nodes[0] else {
        panic!("expected supsub, got {:#?}", nodes[0]);
    };
    let AnyParseNode::OrdGroup(sup) = supsub.sup.as_deref().unwrap() else {
        panic!("expected ordgroup superscript");
    };
    assert_eq!(sup.body.len(), 3);
}

#[test]
fn double_scripts_are_rejected() {
    assert!(matches!(
        parse_error("x^1^2").kind.as_ref(),
        ParseErrorKind::DoubleSuperscript
    ));
    assert!(matches!(
        parse_error("x_1_2").kind.as_ref(),
        ParseErrorKind::DoubleSubscript
    ));
}

#[test]
fn missing_script_argument_is_rejected() {
    assert!(matches!(
        parse_error("x^").kind.as_ref(),
        ParseErrorKind::ExpectedScriptArgument
    ));
    // The unbraced form stops at operators; a signed exponent needs braces
    assert!(matches!(
        parse_error("x^-1").kind.as_ref(),
        ParseErrorKind::ExpectedScriptArgument
    ));
    assert!(parse_expr("x^{-1}").is_ok());
}

#[test]
fn dangling_operator_is_rejected() {
    let error = parse_error("a +");
    assert!(matches!(
        error.kind.as_ref(),
        ParseErrorKind::ExpectedExpressionAfterOperator { operator } if operator == "+"
    ));
}

#[test]
fn dangling_arrow_operators_are_rejected() {
    // An arrow with no right operand fails at the comparison level
    let error = parse_error("a -> ");
    assert!(matches!(
        error.kind.as_ref(),
        ParseErrorKind::ExpectedExpressionAfterOperator { operator } if operator == "->"
    ));

    // An arrow where an operand is expected cannot begin a primary
    let error = parse_error("a + ->");
    assert!(matches!(
        error.kind.as_ref(),
        ParseErrorKind::ExpectedExpressionAfterOperator { operator } if operator == "+"
    ));

    // A bare arrow never becomes a floating relation symbol
    let error = parse_error("->");
    assert!(matches!(
        error.kind.as_ref(),
        ParseErrorKind::ExpectedSemicolonOrEnd { found } if found == "->"
    ));
    let error = parse_error("<=>");
    assert!(matches!(
        error.kind.as_ref(),
        ParseErrorKind::ExpectedSemicolonOrEnd { found } if found == "<=>"
    ));
}

#[test]
fn stray_token_at_statement_boundary_is_rejected() {
    let error = parse_error("a ]");
    assert!(matches!(
        error.kind.as_ref(),
        ParseErrorKind::ExpectedSemicolonOrEnd { found } if found == "]"
    ));
}

#[test]
fn unclosed_group_is_rejected() {
    assert!(matches!(
        parse_error("(a").kind.as_ref(),
        ParseErrorKind::UnexpectedEnd
    ));
}

#[test]
fn error_positions_point_into_the_input() {
    let error = parse_error("ab ?");
    assert!(matches!(
        error.kind.as_ref(),
        ParseErrorKind::UnexpectedCharacter { .. }
    ));
    assert_eq!(error.position, Some(3));
    assert_eq!(error.length, Some(1));
}
