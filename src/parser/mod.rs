//! The core parser, converting the notation into typeset parse nodes.
//!
//! # Parsing strategy
//!
//! The parser is a precedence-climbing recursive descent over a single
//! lazily fetched lookahead token:
//!
//! - A source is a `;`-separated statement list. `let` statements populate
//!   the binding environment; the last expression statement provides the
//!   parse result.
//! - Expression levels, from loosest to tightest binding: comparison,
//!   additive, multiplicative (which also owns implicit juxtaposition and
//!   the fraction lowering for `/`), unary sign, postfix scripts, primary.
//! - Binary operators lower to flat symbol nodes in the emitted sequence;
//!   the level structure only decides what `/` swallows as a numerator and
//!   where a juxtaposed operand may start.
//!
//! Every level takes a stop set. Encountering a stop member or the EOF
//! sentinel terminates the level without consuming the token.
//!
//! # Lowering
//!
//! Identifiers lower through a fixed policy (call, binding, named symbol,
//! named operator, single character, per-character group). Calls lower
//! through the table in [`Parser::lower_call`], either into a registered
//! handler, a delimiter pair, the `cases` array construction, or the
//! fallback group rendering. Errors abort the parse at the first violation;
//! there is no recovery.

use std::mem;
use std::sync::Arc;

use phf::{phf_map, phf_set};

use crate::context::MathletContext;
use crate::define_function::FunctionContext;
use crate::lexer::Lexer;
use crate::namespace::KeyMap;
use crate::style::TEXT;
use crate::symbols::{Group, Mode, NonAtom};
use crate::types::{ParseError, ParseErrorKind, SourceLocation, Settings, Token, TokenKind};

pub mod parse_node;

use parse_node::{
    AlignSpec, ParseNode, ParseNodeArray, ParseNodeLeftRight, ParseNodeOrdGroup,
    ParseNodeStyling, ParseNodeSupSub, ParseNodeText, ParseNodeTextOrd, strip_locations,
};

/// Identifiers that lower to a single named symbol.
static NAMED_SYMBOLS: phf::Map<&'static str, &'static str> = phf_map! {
    "alpha" => "\\alpha",
    "beta" => "\\beta",
    "gamma" => "\\gamma",
    "delta" => "\\delta",
    "epsilon" => "\\epsilon",
    "zeta" => "\\zeta",
    "eta" => "\\eta",
    "theta" => "\\theta",
    "iota" => "\\iota",
    "kappa" => "\\kappa",
    "lambda" => "\\lambda",
    "mu" => "\\mu",
    "nu" => "\\nu",
    "xi" => "\\xi",
    "pi" => "\\pi",
    "rho" => "\\rho",
    "sigma" => "\\sigma",
    "tau" => "\\tau",
    "upsilon" => "\\upsilon",
    "phi" => "\\phi",
    "chi" => "\\chi",
    "psi" => "\\psi",
    "omega" => "\\omega",
    "Gamma" => "\\Gamma",
    "Delta" => "\\Delta",
    "Theta" => "\\Theta",
    "Lambda" => "\\Lambda",
    "Xi" => "\\Xi",
    "Pi" => "\\Pi",
    "Sigma" => "\\Sigma",
    "Upsilon" => "\\Upsilon",
    "Phi" => "\\Phi",
    "Psi" => "\\Psi",
    "Omega" => "\\Omega",
    "oo" => "\\infty",
    "infty" => "\\infty",
};

/// Identifiers that lower through a named-operator handler.
static NAMED_OPERATORS: phf::Map<&'static str, &'static str> = phf_map! {
    "sin" => "\\sin",
    "cos" => "\\cos",
    "tan" => "\\tan",
    "ln" => "\\ln",
    "log" => "\\log",
    "exp" => "\\exp",
    "lim" => "\\lim",
    "max" => "\\max",
    "min" => "\\min",
    "sum" => "\\sum",
    "prod" => "\\prod",
    "int" => "\\int",
};

/// Short-form accent calls: `hat(x)` and friends.
static ACCENT_CALLS: phf::Map<&'static str, &'static str> = phf_map! {
    "hat" => "\\hat",
    "bar" => "\\bar",
    "tilde" => "\\tilde",
    "dot" => "\\dot",
    "ddot" => "\\ddot",
    "vec" => "\\vec",
    "overline" => "\\overline",
    "underline" => "\\underline",
};

/// Accent kinds accepted by `accent(base, kind)`, matched case-insensitively
/// after trimming. `arrow` aliases `\vec`.
static ACCENT_KINDS: phf::Map<&'static str, &'static str> = phf_map! {
    "hat" => "\\hat",
    "bar" => "\\bar",
    "tilde" => "\\tilde",
    "dot" => "\\dot",
    "ddot" => "\\ddot",
    "vec" => "\\vec",
    "arrow" => "\\vec",
    "acute" => "\\acute",
    "grave" => "\\grave",
    "check" => "\\check",
    "breve" => "\\breve",
    "overline" => "\\overline",
    "underline" => "\\underline",
};

/// Operator-to-symbol command map for emitted binary/relation symbols.
/// Operators not listed here (`+`, `=`, `<`, ...) pass through unchanged.
static OPERATOR_SYMBOLS: phf::Map<&'static str, &'static str> = phf_map! {
    "*" => "\\cdot",
    "==" => "=",
    "!=" => "\\ne",
    "<=" => "\\leq",
    ">=" => "\\geq",
    "->" => "\\to",
    "<-" => "\\leftarrow",
    "<->" => "\\leftrightarrow",
    "=>" => "\\Rightarrow",
    "<=>" => "\\Leftrightarrow",
};

/// The comparison-level operators. Left-associative chaining is allowed.
static COMPARISON_OPERATORS: phf::Set<&'static str> = phf_set! {
    "=", "==", "!=", "<", "<=", ">", ">=", "->", "<-", "<->", "=>", "<=>",
};

/// Tokens that can never begin a primary; the primary dispatch returns
/// nothing for them so the enclosing level stops. Covers every binary
/// operator, arrows included, so a dangling operator fails the same way
/// at every level instead of an arrow leaking through as a floating
/// relation symbol.
static NON_PREFIX_TOKENS: phf::Set<&'static str> = phf_set! {
    "+", "-", "*", "/", "^", "_", "=", "==", "!=", "<", "<=", ">", ">=",
    "->", "<-", "<->", "=>", "<=>",
};

/// Stop set for statement bodies.
const STATEMENT_STOP: &[&str] = &[";"];
/// Stop set for braced groups and braced script arguments.
const BRACE_STOP: &[&str] = &["}"];
/// Stop set for call arguments.
const ARGUMENT_STOP: &[&str] = &[",", ")"];
/// Stop set for `cases` cells, which adds the row separator.
const CASES_STOP: &[&str] = &[",", ";", ")"];
/// Narrow stop set for unbraced script arguments: every operator, the
/// closing delimiters, and (implicitly) EOF.
const SCRIPT_STOP: &[&str] = &[
    "+", "-", "*", "/", "^", "_", "=", "<", ">", "!", "==", "!=", "<=", ">=", "->", "<-", "<->",
    "=>", "<=>", ")", "]", "}",
];

/// Whether a token may begin a primary. This is the juxtaposition guard: a
/// dangling closing delimiter or operator must not be misread as an
/// implicit-multiplication operand.
fn can_start_primary(token: &Token) -> bool {
    match token.kind {
        TokenKind::Identifier | TokenKind::Number | TokenKind::Str => true,
        TokenKind::Punct => matches!(token.text.as_str(), "(" | "[" | "{"),
        TokenKind::Operator | TokenKind::Eof => false,
    }
}

/// Collapses a sequence to a single node: one element stands alone, any
/// other length is wrapped into an `ordgroup`.
fn wrap_ordgroup(mut nodes: Vec<ParseNode>, mode: Mode) -> ParseNode {
    if nodes.len() == 1 {
        return nodes.remove(0);
    }
    ParseNode::OrdGroup(ParseNodeOrdGroup {
        mode,
        loc: None,
        body: nodes,
    })
}

/// Visible-delimiter normalisation: braces render as their command forms,
/// everything else passes through.
fn normalize_delimiter(delim: &str) -> &str {
    match delim {
        "{" => "\\{",
        "}" => "\\}",
        other => other,
    }
}

/// Reduces a node sequence to plain text, used for the kind argument of
/// `accent(base, kind)`. Symbol leaves contribute their text, groups
/// recurse, text runs contribute their characters; any other shape fails.
fn extract_plain_text(nodes: &[ParseNode]) -> Option<String> {
    let mut out = String::new();
    push_plain_text(nodes, &mut out).then_some(out)
}

fn push_plain_text(nodes: &[ParseNode], out: &mut String) -> bool {
    for node in nodes {
        match node {
            ParseNode::TextOrd(n) => out.push_str(&n.text),
            ParseNode::MathOrd(n) => out.push_str(&n.text),
            ParseNode::Atom(n) => out.push_str(&n.text),
            ParseNode::OrdGroup(n) => {
                if !push_plain_text(&n.body, out) {
                    return false;
                }
            }
            ParseNode::Text(n) => {
                for child in &n.body {
                    let ParseNode::TextOrd(t) = child else {
                        return false;
                    };
                    out.push_str(&t.text);
                }
            }
            _ => return false,
        }
    }
    true
}

/// The parser. All state lives for one [`Parser::parse`] call and is
/// discarded with the instance; parsers are not reusable across inputs.
pub struct Parser<'a> {
    /// Current parsing mode; the default mode of newly emitted nodes.
    pub mode: Mode,
    /// Global configuration, forwarded to function handlers.
    pub settings: &'a Settings,
    /// Shared context with function handlers and the symbol table.
    pub ctx: &'a MathletContext,
    lexer: Lexer,
    /// Cached lookahead token.
    next_token: Option<Token>,
    /// The `let` binding environment. Flat, single scope, late bindings
    /// shadow earlier ones. Values are stored location-stripped.
    bindings: KeyMap<String, Vec<ParseNode>>,
}

impl<'a> Parser<'a> {
    /// Creates a new parser over `input`.
    #[must_use]
    pub fn new(input: &str, settings: &'a Settings, ctx: &'a MathletContext) -> Self {
        Self {
            mode: Mode::Math,
            settings,
            ctx,
            lexer: Lexer::new(Arc::from(input)),
            next_token: None,
            bindings: KeyMap::default(),
        }
    }

    /// Retrieves the current lookahead token, fetching one if necessary.
    /// Repeated calls without [`Parser::consume`] return the same token.
    pub fn fetch(&mut self) -> Result<&Token, ParseError> {
        match &mut self.next_token {
            Some(next_token) => Ok(next_token),
            next_token => {
                let token = self.lexer.lex()?;
                Ok(next_token.get_or_insert(token))
            }
        }
    }

    /// Discards the current lookahead token.
    pub fn consume(&mut self) {
        self.next_token = None;
    }

    /// Checks that the lookahead is `text` and optionally consumes it. The
    /// EOF sentinel is matched with `consume` set to false so it is never
    /// consumed.
    pub fn expect(&mut self, text: &str, consume: bool) -> Result<(), ParseError> {
        let token = self.fetch()?;
        // A string literal never satisfies a structural expectation even if
        // its cooked content happens to match.
        if token.text != text || token.kind == TokenKind::Str {
            return Err(ParseError::with_token(
                ParseErrorKind::ExpectedToken {
                    expected: text.to_owned(),
                    found: token.text.clone(),
                },
                token,
            ));
        }
        if consume {
            self.consume();
        }
        Ok(())
    }

    /// Whether the lookahead terminates the current expression level.
    fn at_stop(&mut self, stop: &[&str]) -> Result<bool, ParseError> {
        let token = self.fetch()?;
        Ok(match token.kind {
            TokenKind::Eof => true,
            TokenKind::Operator | TokenKind::Punct => stop.contains(&token.text.as_str()),
            _ => false,
        })
    }

    /// Parses the entire input: a `;`-separated statement list. The result
    /// is the node sequence of the last expression statement; earlier
    /// expression statements only matter through their `let` side effects.
    pub fn parse(&mut self) -> Result<Vec<ParseNode>, ParseError> {
        let mut result = Vec::new();

        loop {
            let token = self.fetch()?.clone();
            if token.kind == TokenKind::Eof {
                break;
            }
            if token.kind == TokenKind::Punct && token.text == ";" {
                self.consume();
                continue;
            }

            if token.kind == TokenKind::Identifier && token.text == "let" {
                self.parse_let_binding()?;
            } else {
                let body = self.parse_expression(STATEMENT_STOP)?;
                if body.is_empty() {
                    let found = self.fetch()?.clone();
                    return Err(ParseError::with_token(
                        ParseErrorKind::ExpectedSemicolonOrEnd {
                            found: found.text.clone(),
                        },
                        &found,
                    ));
                }
                result = body;
            }

            let boundary = self.fetch()?.clone();
            match boundary.kind {
                TokenKind::Eof => break,
                TokenKind::Punct if boundary.text == ";" => self.consume(),
                _ => {
                    return Err(ParseError::with_token(
                        ParseErrorKind::ExpectedSemicolonOrEnd {
                            found: boundary.text.clone(),
                        },
                        &boundary,
                    ));
                }
            }
        }

        self.expect("EOF", false)?;
        Ok(result)
    }

    /// Parses `let IDENT = expression` and stores the location-stripped
    /// body in the binding environment.
    fn parse_let_binding(&mut self) -> Result<(), ParseError> {
        self.consume(); // the `let` keyword

        let name_token = self.fetch()?.clone();
        if name_token.kind != TokenKind::Identifier {
            return Err(ParseError::with_token(
                ParseErrorKind::ExpectedIdentifierAfterLet {
                    found: name_token.text.clone(),
                },
                &name_token,
            ));
        }
        self.consume();

        self.expect("=", true)?;

        let mut body = self.parse_expression(STATEMENT_STOP)?;
        strip_locations(&mut body);
        self.bindings.insert(name_token.text, body);
        Ok(())
    }

    /// Parses an expression body up to the stop set. Loops so that loose
    /// punctuation (a comma inside a visible group, say) re-enters the
    /// grammar as a fresh symbol primary.
    fn parse_expression(&mut self, stop: &[&str]) -> Result<Vec<ParseNode>, ParseError> {
        let mut nodes = Vec::new();
        loop {
            if self.at_stop(stop)? {
                break;
            }
            let chunk = self.parse_comparison(stop)?;
            if chunk.is_empty() {
                break;
            }
            nodes.extend(chunk);
        }
        Ok(nodes)
    }

    /// Comparison level: `= == != < <= > >= -> <- <-> => <=>`, chaining
    /// left-associatively into a flat sequence.
    fn parse_comparison(&mut self, stop: &[&str]) -> Result<Vec<ParseNode>, ParseError> {
        let mut nodes = self.parse_additive(stop)?;
        if nodes.is_empty() {
            return Ok(nodes);
        }
        loop {
            if self.at_stop(stop)? {
                break;
            }
            let token = self.fetch()?;
            if token.kind != TokenKind::Operator
                || !COMPARISON_OPERATORS.contains(token.text.as_str())
            {
                break;
            }
            let operator = token.clone();
            self.consume();
            let rhs = self.parse_additive(stop)?;
            if rhs.is_empty() {
                return Err(ParseError::with_token(
                    ParseErrorKind::ExpectedExpressionAfterOperator {
                        operator: operator.text.clone(),
                    },
                    &operator,
                ));
            }
            nodes.push(self.operator_symbol(&operator.text, operator.loc));
            nodes.extend(rhs);
        }
        Ok(nodes)
    }

    /// Additive level: `+` and `-`.
    fn parse_additive(&mut self, stop: &[&str]) -> Result<Vec<ParseNode>, ParseError> {
        let mut nodes = self.parse_multiplicative(stop)?;
        if nodes.is_empty() {
            return Ok(nodes);
        }
        loop {
            if self.at_stop(stop)? {
                break;
            }
            let token = self.fetch()?;
            if token.kind != TokenKind::Operator || !matches!(token.text.as_str(), "+" | "-") {
                break;
            }
            let operator = token.clone();
            self.consume();
            let rhs = self.parse_multiplicative(stop)?;
            if rhs.is_empty() {
                return Err(ParseError::with_token(
                    ParseErrorKind::ExpectedExpressionAfterOperator {
                        operator: operator.text.clone(),
                    },
                    &operator,
                ));
            }
            nodes.push(self.operator_symbol(&operator.text, operator.loc));
            nodes.extend(rhs);
        }
        Ok(nodes)
    }

    /// Multiplicative level. Owns three behaviours: explicit `*`, the
    /// fraction lowering for `/` (which swallows the accumulated left
    /// sequence as the numerator), and implicit juxtaposition.
    fn parse_multiplicative(&mut self, stop: &[&str]) -> Result<Vec<ParseNode>, ParseError> {
        let mut nodes = self.parse_unary(stop)?;
        if nodes.is_empty() {
            return Ok(nodes);
        }
        loop {
            if self.at_stop(stop)? {
                break;
            }
            let token = self.fetch()?.clone();
            match (token.kind, token.text.as_str()) {
                (TokenKind::Operator, "*") => {
                    self.consume();
                    let rhs = self.parse_unary(stop)?;
                    if rhs.is_empty() {
                        return Err(ParseError::with_token(
                            ParseErrorKind::ExpectedExpressionAfterOperator {
                                operator: token.text.clone(),
                            },
                            &token,
                        ));
                    }
                    nodes.push(self.operator_symbol("*", token.loc));
                    nodes.extend(rhs);
                }
                (TokenKind::Operator, "/") => {
                    self.consume();
                    let denominator = self.parse_unary(stop)?;
                    if denominator.is_empty() {
                        return Err(ParseError::with_token(
                            ParseErrorKind::ExpectedExpressionAfterOperator {
                                operator: token.text.clone(),
                            },
                            &token,
                        ));
                    }
                    // `/` never becomes an operator symbol: everything
                    // accumulated so far is the numerator and the fraction
                    // node is the new left operand for further chaining.
                    let numer = wrap_ordgroup(mem::take(&mut nodes), self.mode);
                    let denom = wrap_ordgroup(denominator, self.mode);
                    let frac =
                        self.call_function("\\frac", vec![numer, denom], vec![], Some(&token))?;
                    nodes.push(frac);
                }
                (TokenKind::Operator, text)
                    if COMPARISON_OPERATORS.contains(text) || matches!(text, "+" | "-") =>
                {
                    break;
                }
                _ => {
                    // Implicit juxtaposition, gated on the primary guard.
                    if !can_start_primary(&token) {
                        break;
                    }
                    let rhs = self.parse_unary(stop)?;
                    if rhs.is_empty() {
                        break;
                    }
                    nodes.extend(rhs);
                }
            }
        }
        Ok(nodes)
    }

    /// Unary level: an optional leading sign. `+` is a no-op; `-` emits a
    /// minus symbol followed by its operand.
    fn parse_unary(&mut self, stop: &[&str]) -> Result<Vec<ParseNode>, ParseError> {
        if self.at_stop(stop)? {
            return Ok(Vec::new());
        }
        let token = self.fetch()?.clone();
        if token.kind == TokenKind::Operator && matches!(token.text.as_str(), "+" | "-") {
            self.consume();
            let mut nodes = Vec::new();
            if token.text == "-" {
                nodes.push(self.operator_symbol("-", token.loc.clone()));
            }
            let body = self.parse_unary(stop)?;
            if body.is_empty() {
                return Err(ParseError::with_token(
                    ParseErrorKind::ExpectedExpressionAfterOperator {
                        operator: token.text.clone(),
                    },
                    &token,
                ));
            }
            nodes.extend(body);
            return Ok(nodes);
        }
        self.parse_postfix(stop)
    }

    /// Postfix level: at most one `^` and one `_` attachment per base, in
    /// either order.
    fn parse_postfix(&mut self, stop: &[&str]) -> Result<Vec<ParseNode>, ParseError> {
        let Some(base) = self.parse_primary(stop)? else {
            return Ok(Vec::new());
        };

        let mut superscript = None;
        let mut subscript = None;
        loop {
            if self.at_stop(stop)? {
                break;
            }
            let token = self.fetch()?.clone();
            if token.kind != TokenKind::Operator {
                break;
            }
            match token.text.as_str() {
                "^" => {
                    if superscript.is_some() {
                        return Err(ParseError::with_token(
                            ParseErrorKind::DoubleSuperscript,
                            &token,
                        ));
                    }
                    self.consume();
                    superscript = Some(self.parse_script_argument()?);
                }
                "_" => {
                    if subscript.is_some() {
                        return Err(ParseError::with_token(
                            ParseErrorKind::DoubleSubscript,
                            &token,
                        ));
                    }
                    self.consume();
                    subscript = Some(self.parse_script_argument()?);
                }
                _ => break,
            }
        }

        if superscript.is_some() || subscript.is_some() {
            return Ok(vec![ParseNode::SupSub(ParseNodeSupSub {
                mode: self.mode,
                loc: None,
                base: Some(Box::new(base)),
                sup: superscript.map(Box::new),
                sub: subscript.map(Box::new),
            })]);
        }
        Ok(vec![base])
    }

    /// Parses one script argument: either a braced expression or a single
    /// unary-precedence expression under the narrow script stop set.
    fn parse_script_argument(&mut self) -> Result<ParseNode, ParseError> {
        let token = self.fetch()?;
        if token.kind == TokenKind::Punct && token.text == "{" {
            self.consume();
            let body = self.parse_expression(BRACE_STOP)?;
            self.expect("}", true)?;
            return Ok(wrap_ordgroup(body, self.mode));
        }

        let nodes = self.parse_unary(SCRIPT_STOP)?;
        if nodes.is_empty() {
            let found = self.fetch()?;
            return Err(ParseError::with_token(
                ParseErrorKind::ExpectedScriptArgument,
                found,
            ));
        }
        Ok(wrap_ordgroup(nodes, self.mode))
    }

    /// Primary dispatch: identifiers, literals, groups, and loose symbol
    /// tokens. Returns `None` without consuming for tokens that cannot
    /// begin a primary, so the caller stops.
    fn parse_primary(&mut self, stop: &[&str]) -> Result<Option<ParseNode>, ParseError> {
        let token = self.fetch()?.clone();
        match token.kind {
            TokenKind::Eof => Ok(None),
            TokenKind::Identifier => {
                self.consume();
                self.lower_identifier(&token).map(Some)
            }
            TokenKind::Number => {
                self.consume();
                Ok(Some(ParseNode::TextOrd(ParseNodeTextOrd {
                    mode: self.mode,
                    loc: token.loc,
                    text: token.text,
                })))
            }
            TokenKind::Str => {
                self.consume();
                // A run of text-mode characters inside the current (math)
                // mode. The mixed-mode shape is what builders expect.
                let body = token
                    .text
                    .chars()
                    .map(|ch| {
                        ParseNode::TextOrd(ParseNodeTextOrd {
                            mode: Mode::Text,
                            loc: token.loc.clone(),
                            text: ch.to_string(),
                        })
                    })
                    .collect();
                Ok(Some(ParseNode::Text(ParseNodeText {
                    mode: self.mode,
                    loc: None,
                    body,
                })))
            }
            TokenKind::Operator | TokenKind::Punct if stop.contains(&token.text.as_str()) => {
                Ok(None)
            }
            TokenKind::Operator | TokenKind::Punct => match token.text.as_str() {
                "(" => self.parse_visible_group(")").map(Some),
                "[" => self.parse_visible_group("]").map(Some),
                "{" => {
                    self.consume();
                    let body = self.parse_expression(BRACE_STOP)?;
                    self.expect("}", true)?;
                    // Braces are semantic grouping only; no visible
                    // delimiters survive into the output.
                    Ok(Some(ParseNode::OrdGroup(ParseNodeOrdGroup {
                        mode: self.mode,
                        loc: None,
                        body,
                    })))
                }
                ")" | "]" | "}" => Ok(None),
                text if NON_PREFIX_TOKENS.contains(text) => Ok(None),
                _ => {
                    self.consume();
                    Ok(Some(self.operator_symbol(&token.text, token.loc)))
                }
            },
        }
    }

    /// Parses `( ... )` or `[ ... ]` into an `ordgroup` that keeps the
    /// delimiters visible as symbol nodes at both ends.
    fn parse_visible_group(&mut self, close: &str) -> Result<ParseNode, ParseError> {
        let open_token = self.fetch()?.clone();
        self.consume();

        let body = self.parse_expression(&[close])?;

        let close_token = self.fetch()?.clone();
        if close_token.kind == TokenKind::Eof {
            return Err(ParseError::with_token(
                ParseErrorKind::UnexpectedEnd,
                &close_token,
            ));
        }
        self.expect(close, true)?;

        let mut nodes = Vec::with_capacity(body.len() + 2);
        nodes.push(self.symbol_node(normalize_delimiter(&open_token.text), open_token.loc));
        nodes.extend(body);
        nodes.push(self.symbol_node(normalize_delimiter(close), close_token.loc));
        Ok(ParseNode::OrdGroup(ParseNodeOrdGroup {
            mode: self.mode,
            loc: None,
            body: nodes,
        }))
    }

    /// Lowers a just-consumed identifier token.
    fn lower_identifier(&mut self, token: &Token) -> Result<ParseNode, ParseError> {
        let name = token.text.as_str();

        let next_is_call = {
            let next = self.fetch()?;
            next.kind == TokenKind::Punct && next.text == "("
        };
        if next_is_call {
            return self.parse_call(token);
        }

        if let Some(stored) = self.bindings.get(name) {
            // The environment stores values, not references: this clone is
            // what keeps every substitution an independent instance.
            let stored = stored.clone();
            return Ok(wrap_ordgroup(stored, self.mode));
        }

        if let Some(&command) = NAMED_SYMBOLS.get(name) {
            return Ok(self.symbol_node(command, token.loc.clone()));
        }

        if let Some(&command) = NAMED_OPERATORS.get(name) {
            return self.call_function(command, Vec::new(), Vec::new(), Some(token));
        }

        let mut chars = name.chars();
        chars.next();
        if chars.next().is_none() {
            return Ok(self.symbol_node(name, token.loc.clone()));
        }

        // Multi-letter identifiers render as concatenated ordinary letters.
        let body = name
            .chars()
            .map(|ch| self.symbol_node(&ch.to_string(), token.loc.clone()))
            .collect();
        Ok(ParseNode::OrdGroup(ParseNodeOrdGroup {
            mode: self.mode,
            loc: None,
            body,
        }))
    }

    /// Parses and lowers a call. The lookahead is the opening parenthesis.
    fn parse_call(&mut self, name_token: &Token) -> Result<ParseNode, ParseError> {
        if name_token.text == "cases" {
            return self.parse_cases(name_token);
        }

        self.consume(); // "("

        let mut arguments: Vec<Vec<ParseNode>> = Vec::new();
        let first = self.fetch()?;
        if first.kind == TokenKind::Punct && first.text == ")" {
            self.consume();
            return self.lower_call(name_token, arguments);
        }

        loop {
            let argument = self.parse_expression(ARGUMENT_STOP)?;
            if argument.is_empty() {
                let found = self.fetch()?.clone();
                if found.kind == TokenKind::Eof {
                    return Err(ParseError::with_token(ParseErrorKind::UnexpectedEnd, &found));
                }
                // Covers trailing commas as well as `f(,)` style holes.
                return Err(ParseError::with_token(
                    ParseErrorKind::EmptyCallArgument {
                        name: name_token.text.clone(),
                    },
                    &found,
                ));
            }
            arguments.push(argument);

            let separator = self.fetch()?.clone();
            match (separator.kind, separator.text.as_str()) {
                (TokenKind::Punct, ",") => self.consume(),
                (TokenKind::Punct, ")") => {
                    self.consume();
                    break;
                }
                (TokenKind::Eof, _) => {
                    return Err(ParseError::with_token(
                        ParseErrorKind::UnexpectedEnd,
                        &separator,
                    ));
                }
                _ => {
                    return Err(ParseError::with_token(
                        ParseErrorKind::ExpectedToken {
                            expected: ")".to_owned(),
                            found: separator.text.clone(),
                        },
                        &separator,
                    ));
                }
            }
        }

        self.lower_call(name_token, arguments)
    }

    /// Checks the argument count of a structural call.
    fn check_arity(
        name_token: &Token,
        expected: usize,
        arguments: &[Vec<ParseNode>],
    ) -> Result<(), ParseError> {
        if arguments.len() == expected {
            return Ok(());
        }
        Err(ParseError::with_token(
            ParseErrorKind::ArityMismatch {
                name: name_token.text.clone(),
                expected,
                got: arguments.len(),
            },
            name_token,
        ))
    }

    /// Lowers a parsed call to its node shape.
    fn lower_call(
        &mut self,
        name_token: &Token,
        arguments: Vec<Vec<ParseNode>>,
    ) -> Result<ParseNode, ParseError> {
        let name = name_token.text.as_str();
        match name {
            "frac" => {
                Self::check_arity(name_token, 2, &arguments)?;
                let mut args = arguments.into_iter();
                let numer = wrap_ordgroup(args.next().unwrap_or_default(), self.mode);
                let denom = wrap_ordgroup(args.next().unwrap_or_default(), self.mode);
                self.call_function("\\frac", vec![numer, denom], vec![], Some(name_token))
            }
            "sqrt" => {
                Self::check_arity(name_token, 1, &arguments)?;
                let mut args = arguments.into_iter();
                let radicand = wrap_ordgroup(args.next().unwrap_or_default(), self.mode);
                self.call_function("\\sqrt", vec![radicand], vec![None], Some(name_token))
            }
            "root" => {
                Self::check_arity(name_token, 2, &arguments)?;
                let mut args = arguments.into_iter();
                let index = wrap_ordgroup(args.next().unwrap_or_default(), self.mode);
                let radicand = wrap_ordgroup(args.next().unwrap_or_default(), self.mode);
                self.call_function("\\sqrt", vec![radicand], vec![Some(index)], Some(name_token))
            }
            "accent" => {
                Self::check_arity(name_token, 2, &arguments)?;
                let mut args = arguments.into_iter();
                let base = wrap_ordgroup(args.next().unwrap_or_default(), self.mode);
                let kind_nodes = args.next().unwrap_or_default();
                let Some(kind_text) = extract_plain_text(&kind_nodes) else {
                    return Err(ParseError::with_token(
                        ParseErrorKind::AccentKindMustBeText,
                        name_token,
                    ));
                };
                let kind = kind_text.trim().to_ascii_lowercase();
                let Some(&command) = ACCENT_KINDS.get(kind.as_str()) else {
                    return Err(ParseError::with_token(
                        ParseErrorKind::UnsupportedAccent { kind },
                        name_token,
                    ));
                };
                self.call_function(command, vec![base], vec![], Some(name_token))
            }
            "abs" | "norm" | "floor" | "ceil" => {
                Self::check_arity(name_token, 1, &arguments)?;
                let (left, right) = match name {
                    "abs" => ("|", "|"),
                    "norm" => ("\\|", "\\|"),
                    "floor" => ("\\lfloor", "\\rfloor"),
                    _ => ("\\lceil", "\\rceil"),
                };
                let body = arguments.into_iter().next().unwrap_or_default();
                Ok(ParseNode::LeftRight(ParseNodeLeftRight {
                    mode: self.mode,
                    loc: None,
                    body,
                    left: left.to_owned(),
                    right: right.to_owned(),
                }))
            }
            _ => {
                if let Some(&command) = ACCENT_CALLS.get(name) {
                    Self::check_arity(name_token, 1, &arguments)?;
                    let base = wrap_ordgroup(
                        arguments.into_iter().next().unwrap_or_default(),
                        self.mode,
                    );
                    return self.call_function(command, vec![base], vec![], Some(name_token));
                }
                if let Some(&command) = NAMED_OPERATORS.get(name) {
                    let operator =
                        self.call_function(command, Vec::new(), Vec::new(), Some(name_token))?;
                    let parens = self.parenthesized_arguments(arguments);
                    return Ok(ParseNode::OrdGroup(ParseNodeOrdGroup {
                        mode: self.mode,
                        loc: None,
                        body: vec![operator, parens],
                    }));
                }
                // Unknown name: render the name as ordinary letters
                // followed by the parenthesised arguments.
                let mut body: Vec<ParseNode> = name_token
                    .text
                    .chars()
                    .map(|ch| self.symbol_node(&ch.to_string(), name_token.loc.clone()))
                    .collect();
                body.push(self.parenthesized_arguments(arguments));
                Ok(ParseNode::OrdGroup(ParseNodeOrdGroup {
                    mode: self.mode,
                    loc: None,
                    body,
                }))
            }
        }
    }

    /// Assembles `( a1, a2, ... )` as an `ordgroup` with visible parens and
    /// comma symbols.
    fn parenthesized_arguments(&self, arguments: Vec<Vec<ParseNode>>) -> ParseNode {
        let mut body = vec![self.symbol_node("(", None)];
        for (index, argument) in arguments.into_iter().enumerate() {
            if index > 0 {
                body.push(self.symbol_node(",", None));
            }
            body.push(wrap_ordgroup(argument, self.mode));
        }
        body.push(self.symbol_node(")", None));
        ParseNode::OrdGroup(ParseNodeOrdGroup {
            mode: self.mode,
            loc: None,
            body,
        })
    }

    /// Parses and lowers `cases(c11, c12; c21, c22; ...)`. Commas separate
    /// cells, semicolons separate rows, a trailing empty row is dropped.
    fn parse_cases(&mut self, name_token: &Token) -> Result<ParseNode, ParseError> {
        self.consume(); // "("

        let first = self.fetch()?;
        if first.kind == TokenKind::Punct && first.text == ")" {
            self.consume();
            return Err(ParseError::with_token(
                ParseErrorKind::EmptyCases,
                name_token,
            ));
        }

        let mut rows: Vec<Vec<Vec<ParseNode>>> = Vec::new();
        let mut row: Vec<Vec<ParseNode>> = Vec::new();
        loop {
            let cell = self.parse_expression(CASES_STOP)?;
            let separator = self.fetch()?.clone();
            match (separator.kind, separator.text.as_str()) {
                (TokenKind::Punct, ",") => {
                    row.push(cell);
                    self.consume();
                }
                (TokenKind::Punct, ";") => {
                    row.push(cell);
                    rows.push(mem::take(&mut row));
                    self.consume();
                }
                (TokenKind::Punct, ")") => {
                    if !(cell.is_empty() && row.is_empty()) {
                        row.push(cell);
                        rows.push(mem::take(&mut row));
                    }
                    self.consume();
                    break;
                }
                (TokenKind::Eof, _) => {
                    return Err(ParseError::with_token(
                        ParseErrorKind::UnexpectedEnd,
                        &separator,
                    ));
                }
                _ => {
                    return Err(ParseError::with_token(
                        ParseErrorKind::ExpectedToken {
                            expected: ")".to_owned(),
                            found: separator.text.clone(),
                        },
                        &separator,
                    ));
                }
            }
        }

        if rows.is_empty() {
            return Err(ParseError::with_token(
                ParseErrorKind::EmptyCases,
                name_token,
            ));
        }

        Ok(self.build_cases(rows))
    }

    /// Builds the `leftright { array }` shape for `cases`.
    fn build_cases(&self, rows: Vec<Vec<Vec<ParseNode>>>) -> ParseNode {
        let max_cols = rows.iter().map(Vec::len).max().unwrap_or(0);

        let cols = (0..max_cols)
            .map(|index| {
                // Only a multi-column cases gets the gap after the first
                // column.
                let postgap = if index == 0 && max_cols > 1 { 1.0 } else { 0.0 };
                AlignSpec::Align {
                    align: "l".to_owned(),
                    pregap: Some(0.0),
                    postgap: Some(postgap),
                }
            })
            .collect();

        let body: Vec<Vec<ParseNode>> = rows
            .into_iter()
            .map(|mut row| {
                row.resize_with(max_cols, Vec::new);
                row.into_iter()
                    .map(|cell| {
                        ParseNode::Styling(ParseNodeStyling {
                            mode: self.mode,
                            loc: None,
                            style: &TEXT,
                            body: vec![wrap_ordgroup(cell, self.mode)],
                        })
                    })
                    .collect()
            })
            .collect();

        let row_count = body.len();
        let array = ParseNode::Array(ParseNodeArray {
            mode: self.mode,
            loc: None,
            cols: Some(cols),
            arraystretch: 1.2,
            body,
            row_gaps: vec![None; row_count.saturating_sub(1)],
            h_lines_before_row: vec![Vec::new(); row_count + 1],
        });

        ParseNode::LeftRight(ParseNodeLeftRight {
            mode: self.mode,
            loc: None,
            body: vec![array],
            left: "\\{".to_owned(),
            right: ".".to_owned(),
        })
    }

    /// Invokes a registered function handler.
    pub fn call_function(
        &mut self,
        name: &str,
        args: Vec<ParseNode>,
        opt_args: Vec<Option<ParseNode>>,
        token: Option<&Token>,
    ) -> Result<ParseNode, ParseError> {
        let spec = self
            .ctx
            .functions
            .get(name)
            .map(|spec| (spec.handler, spec.num_args, spec.num_optional_args));
        let Some((Some(handler), num_args, num_optional_args)) = spec else {
            let kind = ParseErrorKind::UnsupportedFunction {
                name: name.to_owned(),
            };
            return Err(match token {
                Some(t) => ParseError::with_token(kind, t),
                None => ParseError::new(kind),
            });
        };

        if args.len() != num_args || opt_args.len() != num_optional_args {
            return Err(ParseError::new(
                "Internal lowering bug: handler invoked with the wrong argument count",
            ));
        }

        let context = FunctionContext {
            func_name: name.to_owned(),
            parser: self,
            token,
        };
        handler(context, args, opt_args)
    }

    /// Emits the node for a single symbol according to the symbol table:
    /// an atom of the table's family, the table's ordinary group, or the
    /// content-preserving `textord` fallback.
    fn symbol_node(&self, text: &str, loc: Option<SourceLocation>) -> ParseNode {
        match self.ctx.symbols.get(self.mode, text).map(|info| info.group) {
            Some(Group::Atom(family)) => ParseNode::Atom(parse_node::ParseNodeAtom {
                family,
                mode: self.mode,
                loc,
                text: text.to_owned(),
            }),
            Some(Group::NonAtom(NonAtom::MathOrd)) => {
                ParseNode::MathOrd(parse_node::ParseNodeMathOrd {
                    mode: self.mode,
                    loc,
                    text: text.to_owned(),
                })
            }
            Some(Group::NonAtom(NonAtom::TextOrd)) | None => {
                ParseNode::TextOrd(ParseNodeTextOrd {
                    mode: self.mode,
                    loc,
                    text: text.to_owned(),
                })
            }
        }
    }

    /// Emits the symbol node for an operator token, translating through the
    /// operator-to-symbol map first.
    fn operator_symbol(&self, text: &str, loc: Option<SourceLocation>) -> ParseNode {
        let symbol = OPERATOR_SYMBOLS.get(text).copied().unwrap_or(text);
        self.symbol_node(symbol, loc)
    }
}
