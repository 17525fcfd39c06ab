//! mathlet - a parser for a compact, expression-oriented math notation.
//!
//! Given a source string such as `let t = x^2; frac(t + 1, t - 1)`, the
//! parser produces an abstract syntax tree of KaTeX-style typeset nodes
//! suitable for a downstream math-to-HTML/MathML layout engine. The crate
//! owns the lexer, the precedence-aware expression grammar (including
//! implicit juxtaposition and the fraction lowering for `/`), `let`
//! bindings, the structural call library (`frac`, `root`, accents, `cases`,
//! delimiter wrappers, named operators) and the symbol classification
//! policy. Layout, font metrics and rendering are external consumers of the
//! produced tree.
//!
//! ```rust
//! use mathlet::{MathletContext, Settings, parse};
//!
//! fn main() -> Result<(), mathlet::ParseError> {
//!     let ctx = MathletContext::default();
//!     let settings = Settings::default();
//!
//!     let nodes = parse(&ctx, "x_1^2 + y", &settings)?;
//!     assert_eq!(nodes.len(), 3);
//!     Ok(())
//! }
//! ```
#![warn(missing_docs)]
#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![warn(clippy::str_to_string)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::panic)]
#![warn(clippy::expect_used)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::unwrap_in_result)]
#![warn(clippy::if_then_some_else_none)]
#![warn(clippy::clone_on_ref_ptr)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::string_slice)]
#![allow(clippy::pub_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::float_cmp)]
#![allow(clippy::module_name_repetitions)]

pub mod context;
pub mod define_function;
pub mod functions;
pub mod lexer;
pub mod namespace;
/// The parse entry point.
pub mod parse_tree;
/// Core parsing logic for the notation.
pub mod parser;
pub mod spacing_data;
pub mod style;
pub mod symbols;
pub mod types;

/// Registry of function handlers and the symbol table consulted while
/// parsing. The default context carries the bundled handlers (`\frac`,
/// `\sqrt`, the accents, the named operators, `\overline`, `\underline`)
/// and the default symbol catalogue.
pub use crate::context::MathletContext;

/// Parses an expression into a sequence of typeset parse nodes.
///
/// # Examples
///
/// ```rust
/// use mathlet::{MathletContext, Settings, parse};
///
/// let ctx = MathletContext::default();
/// let nodes = parse(&ctx, "a / b", &Settings::default()).unwrap();
/// assert_eq!(nodes.len(), 1); // one genfrac node
/// ```
pub use crate::parse_tree::parse_tree as parse;

/// Error type for lexing and parsing failures.
///
/// Carries the categorised [`types::ParseErrorKind`], the byte position and
/// length of the offending range, and renders a context excerpt with the
/// range underlined.
pub use crate::types::ParseError;

/// Configuration forwarded to function handlers and downstream builders.
/// Construct with `Settings::builder()` or use the defaults.
pub use crate::types::Settings;

/// Current version of the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
