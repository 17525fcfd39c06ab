//! Parse error handling.
//!
//! A [`ParseError`] distinguishes problems in the expression the user
//! provided from internal bugs. Errors carry the categorised reason, the
//! byte position and length of the offending range, and enough context to
//! render a caret-style diagnostic into the original input.

use core::fmt;

use thiserror::Error;

use crate::types::SourceLocation;

/// Error produced when lexing or parsing fails.
///
/// The first violation aborts the parse; no partial AST is ever returned.
/// When created with [`ParseError::with_token`] the rendered message
/// includes the position and an excerpt of the input with the offending
/// range underlined.
#[derive(Debug, Error)]
#[error("mathlet parse error: {kind}{context}")]
pub struct ParseError {
    /// Categorised reason for the failure.
    #[source]
    pub kind: Box<ParseErrorKind>,
    /// Start offset of the offending range, if known.
    pub position: Option<usize>,
    /// Byte length of the offending range, if known.
    pub length: Option<usize>,
    /// Context rendered alongside the message.
    context: ParseErrorContext,
}

impl ParseError {
    /// Create a new error with the given kind and no location context.
    pub fn new<T: Into<ParseErrorKind>>(kind: T) -> Self {
        Self::from_kind(kind.into(), ParseErrorContext::None, None, None)
    }

    /// Create a new error with location context taken from a token or
    /// anything else that can provide a [`SourceLocation`].
    pub fn with_token<T: Into<ParseErrorKind>>(kind: T, token: &dyn ErrorLocationProvider) -> Self {
        let mut position = None;
        let mut length = None;
        let context = token.loc().filter(|loc| loc.start() <= loc.end()).map_or(
            ParseErrorContext::None,
            |loc| {
                position = Some(loc.start());
                length = Some(loc.end().saturating_sub(loc.start()));
                ParseErrorContext::Location(loc.clone())
            },
        );

        Self::from_kind(kind.into(), context, position, length)
    }

    fn from_kind(
        kind: ParseErrorKind,
        context: ParseErrorContext,
        position: Option<usize>,
        length: Option<usize>,
    ) -> Self {
        Self {
            kind: Box::new(kind),
            position,
            length,
            context,
        }
    }
}

/// Describes the specific reason for a [`ParseError`].
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    #[error("{0}")]
    Message(&'static str),
    // Lexical failures
    #[error("Unexpected character: '{character}'")]
    UnexpectedCharacter { character: String },
    #[error("Unterminated string literal")]
    UnterminatedString,
    #[error("Unterminated block comment")]
    UnterminatedBlockComment,
    // Structural failures
    #[error("Expected '{expected}', got '{found}'")]
    ExpectedToken { expected: String, found: String },
    #[error("Expected ';' or end of input, got '{found}'")]
    ExpectedSemicolonOrEnd { found: String },
    #[error("Unexpected end of input")]
    UnexpectedEnd,
    // Grammar failures
    #[error("Double superscript")]
    DoubleSuperscript,
    #[error("Double subscript")]
    DoubleSubscript,
    #[error("Expected a superscript or subscript argument")]
    ExpectedScriptArgument,
    #[error("Expected expression after '{operator}'")]
    ExpectedExpressionAfterOperator { operator: String },
    // Binding failures
    #[error("Expected identifier after 'let', got '{found}'")]
    ExpectedIdentifierAfterLet { found: String },
    // Call failures
    #[error("'{name}' expects {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("No function handler for '{name}'")]
    UnsupportedFunction { name: String },
    #[error("Unknown accent '{kind}'")]
    UnsupportedAccent { kind: String },
    #[error("The accent kind argument must reduce to plain text")]
    AccentKindMustBeText,
    #[error("Empty argument in call to '{name}'")]
    EmptyCallArgument { name: String },
    #[error("cases() requires at least one cell")]
    EmptyCases,
}

impl From<&'static str> for ParseErrorKind {
    fn from(message: &'static str) -> Self {
        Self::Message(message)
    }
}

#[derive(Debug)]
enum ParseErrorContext {
    None,
    Location(SourceLocation),
}

impl fmt::Display for ParseErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Location(SourceLocation { input, start, end }) => {
                let input_len = input.len();
                if *start == input_len {
                    write!(f, " at end of input: ")?;
                } else {
                    write!(f, " at position {}: ", start + 1)?;
                }

                let mut prefix_start = start.saturating_sub(15);
                prefix_start = adjust_char_boundary(input, prefix_start, false);
                if prefix_start > 0 {
                    write!(f, "\u{2026}")?;
                }
                write!(f, "{}", &input[prefix_start..*start])?;
                if end > start {
                    // Underline the offending range with combining low lines.
                    for c in input[*start..*end].chars() {
                        write!(f, "{c}\u{0332}")?;
                    }
                }
                let mut suffix_end = (*end + 15).min(input_len);
                suffix_end = adjust_char_boundary(input, suffix_end, true);
                if suffix_end < input_len {
                    write!(f, "{}", &input[*end..suffix_end])?;
                    write!(f, "\u{2026}")?;
                } else {
                    write!(f, "{}", &input[*end..])?;
                }
                Ok(())
            }
        }
    }
}

const fn adjust_char_boundary(input: &str, mut index: usize, forward: bool) -> usize {
    if forward {
        while index < input.len() && !input.is_char_boundary(index) {
            index += 1;
        }
    } else {
        while index > 0 && !input.is_char_boundary(index) {
            index -= 1;
        }
    }
    index
}

/// Trait for types that can provide error location information.
pub trait ErrorLocationProvider {
    /// Get the source location if available.
    fn loc(&self) -> Option<&SourceLocation>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Token, TokenKind};
    use std::sync::Arc;

    #[test]
    fn test_parse_error_creation() {
        let error = ParseError::new("Invalid syntax");
        assert!(matches!(
            error.kind.as_ref(),
            ParseErrorKind::Message("Invalid syntax")
        ));
        assert!(
            error
                .to_string()
                .contains("mathlet parse error: Invalid syntax")
        );
        assert_eq!(error.position, None);
        assert_eq!(error.length, None);
    }

    #[test]
    fn test_parse_error_with_token_context() {
        let input = Arc::from("frac(a, b) + oops + more input here");
        let loc = SourceLocation::new(Arc::clone(&input), 13, 17); // "oops"
        let token = Token::new("oops".to_owned(), TokenKind::Identifier, Some(loc));

        let error = ParseError::with_token("Invalid syntax", &token);
        let rendered = error.to_string();
        assert!(rendered.contains("mathlet parse error: Invalid syntax"));
        assert!(rendered.contains("at position 14"));
        assert_eq!(error.position, Some(13));
        assert_eq!(error.length, Some(4));
    }

    #[test]
    fn test_context_at_end_of_input() {
        let input: Arc<str> = Arc::from("a +");
        let loc = SourceLocation::new(Arc::clone(&input), 3, 3);
        let token = Token::new("EOF".to_owned(), TokenKind::Eof, Some(loc));

        let error = ParseError::with_token(ParseErrorKind::UnexpectedEnd, &token);
        assert!(error.to_string().contains("at end of input"));
    }
}
