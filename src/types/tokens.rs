use crate::types::{ErrorLocationProvider, SourceLocation};

/// Lexical category of a [`Token`].
///
/// The notation distinguishes token classes at lex time; the text alone is
/// not enough to classify a token (`.` is punctuation, but the same byte can
/// open a number such as `.5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Names: `x`, `frac`, `alpha`, `let`, ...
    Identifier,
    /// Numeric literals with at most one decimal point.
    Number,
    /// Quoted string literals (content stored with escapes resolved).
    Str,
    /// Single- or multi-character operators (`+`, `^`, `<=>`, ...).
    Operator,
    /// Punctuation and delimiters (`,`, `(`, `|`, ...).
    Punct,
    /// The end-of-input sentinel. Produced idempotently once the lexer
    /// reaches the end.
    Eof,
}

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token content. For string literals this is the cooked text with
    /// escape sequences already resolved; for everything else it is the
    /// literal input slice.
    pub text: String,
    /// Lexical category.
    pub kind: TokenKind,
    /// Source range for error reporting. For string literals the range
    /// covers the quotes.
    pub loc: Option<SourceLocation>,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(text: String, kind: TokenKind, loc: Option<SourceLocation>) -> Self {
        Self { text, kind, loc }
    }
}

impl ErrorLocationProvider for Token {
    fn loc(&self) -> Option<&SourceLocation> {
        self.loc.as_ref()
    }
}

impl ErrorLocationProvider for Option<Token> {
    fn loc(&self) -> Option<&SourceLocation> {
        let t = self.as_ref()?;
        t.loc.as_ref()
    }
}
