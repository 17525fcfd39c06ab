//! The lexer turns the input into a stream of categorised tokens.
//!
//! Its single exposed operation is [`Lexer::lex`], which skips any trivia
//! (whitespace and comments) and returns the next token together with its
//! byte range. Once the end of input is reached, `lex` keeps returning the
//! EOF sentinel at the end position, so the parser's lookahead never has to
//! special-case exhaustion.

use std::sync::Arc;

use crate::types::{ParseError, ParseErrorKind, SourceLocation, Token, TokenKind};

/// Multi-character operators, longest first so that a prefix such as `<=`
/// can never shadow `<=>`.
const MULTI_CHAR_OPERATORS: [&str; 9] = [
    "<=>", "<->", "=>", "->", "<-", "<=", ">=", "!=", "==",
];

// Underscore stays out of identifiers: it is the subscript operator, and
// `x_1` must lex as three tokens.
const fn is_identifier_start(b: u8) -> bool {
    b.is_ascii_alphabetic()
}

const fn is_identifier_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric()
}

const fn is_single_operator(b: u8) -> bool {
    matches!(
        b,
        b'+' | b'-' | b'*' | b'/' | b'^' | b'_' | b'=' | b'<' | b'>' | b'!'
    )
}

const fn is_punctuation(b: u8) -> bool {
    matches!(
        b,
        b',' | b':' | b';' | b'.' | b'(' | b')' | b'[' | b']' | b'{' | b'}' | b'|'
    )
}

/// The stateful tokenizer. Holds a shared copy of the input and the byte
/// position the next token starts at.
pub struct Lexer {
    input: Arc<str>,
    last_index: usize,
}

impl Lexer {
    /// Creates a new `Lexer` over the given input.
    #[must_use]
    pub const fn new(input: Arc<str>) -> Self {
        Self {
            input,
            last_index: 0,
        }
    }

    /// The byte position the next token will be read from.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.last_index
    }

    fn loc(&self, start: usize, end: usize) -> Option<SourceLocation> {
        Some(SourceLocation::new(Arc::clone(&self.input), start, end))
    }

    fn token(&self, text: String, kind: TokenKind, start: usize, end: usize) -> Token {
        Token::new(text, kind, self.loc(start, end))
    }

    /// Skips whitespace, `//` line comments and `/* */` block comments.
    /// Block comments do not nest.
    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        let bytes = self.input.as_bytes();
        loop {
            while self.last_index < bytes.len()
                && matches!(bytes[self.last_index], b' ' | b'\t' | b'\r' | b'\n')
            {
                self.last_index += 1;
            }
            let rest = &self.input[self.last_index..];
            if rest.starts_with("//") {
                match rest.find('\n') {
                    Some(offset) => self.last_index += offset + 1,
                    None => self.last_index = self.input.len(),
                }
            } else if rest.starts_with("/*") {
                let open = self.last_index;
                match rest[2..].find("*/") {
                    Some(offset) => self.last_index += 2 + offset + 2,
                    None => {
                        let token = self.token(
                            "/*".to_owned(),
                            TokenKind::Punct,
                            open,
                            open + 2,
                        );
                        return Err(ParseError::with_token(
                            ParseErrorKind::UnterminatedBlockComment,
                            &token,
                        ));
                    }
                }
            } else {
                return Ok(());
            }
        }
    }

    /// Tokenizes and returns the next token.
    pub fn lex(&mut self) -> Result<Token, ParseError> {
        self.skip_trivia()?;

        let bytes = self.input.as_bytes();
        if self.last_index >= bytes.len() {
            let end = self.input.len();
            return Ok(self.token("EOF".to_owned(), TokenKind::Eof, end, end));
        }

        let start = self.last_index;
        let first = bytes[start];

        // Identifier (the `let` keyword is recognised downstream)
        if is_identifier_start(first) {
            let mut end = start + 1;
            while end < bytes.len() && is_identifier_continue(bytes[end]) {
                end += 1;
            }
            self.last_index = end;
            return Ok(self.token(
                self.input[start..end].to_owned(),
                TokenKind::Identifier,
                start,
                end,
            ));
        }

        // Number: digits with at most one dot; a leading dot counts when a
        // digit follows
        let leading_dot_number =
            first == b'.' && bytes.get(start + 1).is_some_and(u8::is_ascii_digit);
        if first.is_ascii_digit() || leading_dot_number {
            let mut end = start;
            let mut seen_dot = false;
            while end < bytes.len() {
                let b = bytes[end];
                if b.is_ascii_digit() {
                    end += 1;
                } else if b == b'.' && !seen_dot {
                    seen_dot = true;
                    end += 1;
                } else {
                    break;
                }
            }
            self.last_index = end;
            return Ok(self.token(
                self.input[start..end].to_owned(),
                TokenKind::Number,
                start,
                end,
            ));
        }

        if first == b'"' || first == b'\'' {
            return self.lex_string(first as char);
        }

        let rest = &self.input[start..];
        for op in MULTI_CHAR_OPERATORS {
            if rest.starts_with(op) {
                let end = start + op.len();
                self.last_index = end;
                return Ok(self.token(op.to_owned(), TokenKind::Operator, start, end));
            }
        }

        if is_single_operator(first) {
            let end = start + 1;
            self.last_index = end;
            return Ok(self.token(
                (first as char).to_string(),
                TokenKind::Operator,
                start,
                end,
            ));
        }

        if is_punctuation(first) {
            let end = start + 1;
            self.last_index = end;
            return Ok(self.token(
                (first as char).to_string(),
                TokenKind::Punct,
                start,
                end,
            ));
        }

        // Any other non-ASCII character becomes a punctuation token so the
        // parser's symbol-table fallback can preserve it. Leftover ASCII
        // bytes are genuine lexical errors.
        let ch = rest.chars().next().unwrap_or('\u{fffd}');
        let end = start + ch.len_utf8();
        if !ch.is_ascii() {
            self.last_index = end;
            return Ok(self.token(ch.to_string(), TokenKind::Punct, start, end));
        }

        let token = self.token(ch.to_string(), TokenKind::Punct, start, end);
        Err(ParseError::with_token(
            ParseErrorKind::UnexpectedCharacter {
                character: ch.to_string(),
            },
            &token,
        ))
    }

    /// Lexes a string literal delimited by `quote`. The returned token text
    /// has escape sequences resolved; its location covers the quotes.
    fn lex_string(&mut self, quote: char) -> Result<Token, ParseError> {
        let start = self.last_index;
        let mut text = String::new();
        let mut chars = self.input[start + 1..].char_indices();

        while let Some((offset, ch)) = chars.next() {
            match ch {
                c if c == quote => {
                    let end = start + 1 + offset + quote.len_utf8();
                    self.last_index = end;
                    return Ok(self.token(text, TokenKind::Str, start, end));
                }
                '\\' => {
                    let Some((_, escaped)) = chars.next() else {
                        break;
                    };
                    match escaped {
                        'n' => text.push('\n'),
                        'r' => text.push('\r'),
                        't' => text.push('\t'),
                        other => text.push(other),
                    }
                }
                other => text.push(other),
            }
        }

        let token = self.token(quote.to_string(), TokenKind::Str, start, start + 1);
        Err(ParseError::with_token(
            ParseErrorKind::UnterminatedString,
            &token,
        ))
    }
}
