use std::sync::Arc;

use mathlet::lexer::Lexer;
use mathlet::types::{ParseErrorKind, Token, TokenKind};

fn lex_all(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(Arc::from(input));
    let mut tokens = Vec::new();
    loop {
        let token = lexer.lex().expect("lexing should succeed");
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind).collect()
}

fn texts(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

#[test]
fn lexes_identifiers_numbers_and_operators() {
    let tokens = lex_all("x_1^2 + y");
    assert_eq!(texts(&tokens), ["x", "_", "1", "^", "2", "+", "y", "EOF"]);
    assert_eq!(
        kinds(&tokens),
        [
            TokenKind::Identifier,
            TokenKind::Operator,
            TokenKind::Number,
            TokenKind::Operator,
            TokenKind::Number,
            TokenKind::Operator,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tokens_carry_byte_offsets() {
    let tokens = lex_all("ab + 12");
    let spans: Vec<(usize, usize)> = tokens
        .iter()
        .map(|t| {
            let loc = t.loc.as_ref().expect("token should carry a location");
            (loc.start(), loc.end())
        })
        .collect();
    assert_eq!(spans, [(0, 2), (3, 4), (5, 7), (7, 7)]);
}

#[test]
fn eof_is_idempotent() {
    let mut lexer = Lexer::new(Arc::from("a"));
    assert_eq!(lexer.lex().unwrap().kind, TokenKind::Identifier);
    for _ in 0..3 {
        let eof = lexer.lex().unwrap();
        assert_eq!(eof.kind, TokenKind::Eof);
        assert_eq!(eof.text, "EOF");
        let loc = eof.loc.expect("EOF should carry its end position");
        assert_eq!((loc.start(), loc.end()), (1, 1));
    }
}

#[test]
fn multi_char_operators_use_longest_match() {
    let tokens = lex_all("<=> <-> => -> <- <= >= != ==");
    assert_eq!(
        texts(&tokens),
        ["<=>", "<->", "=>", "->", "<-", "<=", ">=", "!=", "==", "EOF"]
    );
    assert!(
        tokens[..tokens.len() - 1]
            .iter()
            .all(|t| t.kind == TokenKind::Operator)
    );
}

#[test]
fn adjacent_operators_do_not_merge_wrongly() {
    let tokens = lex_all("a<=b");
    assert_eq!(texts(&tokens), ["a", "<=", "b", "EOF"]);
}

#[test]
fn numbers_allow_one_decimal_point() {
    let tokens = lex_all("1.5 .5 1.2.3");
    assert_eq!(texts(&tokens), ["1.5", ".5", "1.2", ".3", "EOF"]);
    assert!(
        tokens[..tokens.len() - 1]
            .iter()
            .all(|t| t.kind == TokenKind::Number)
    );
}

#[test]
fn lone_dot_is_punctuation() {
    let tokens = lex_all(".");
    assert_eq!(tokens[0].kind, TokenKind::Punct);
    assert_eq!(tokens[0].text, ".");
}

#[test]
fn string_literals_resolve_escapes() {
    let tokens = lex_all(r#""a\nb\\c\"d\x""#);
    assert_eq!(tokens[0].kind, TokenKind::Str);
    assert_eq!(tokens[0].text, "a\nb\\c\"dx");
}

#[test]
fn single_quoted_strings_work() {
    let tokens = lex_all(r"'hi there'");
    assert_eq!(tokens[0].kind, TokenKind::Str);
    assert_eq!(tokens[0].text, "hi there");
}

#[test]
fn string_location_covers_the_quotes() {
    let tokens = lex_all(r#"  "ab"  "#);
    let loc = tokens[0].loc.as_ref().unwrap();
    assert_eq!((loc.start(), loc.end()), (2, 6));
}

#[test]
fn unterminated_string_fails_at_opening_quote() {
    let mut lexer = Lexer::new(Arc::from("  \"abc"));
    let error = lexer.lex().expect_err("should fail");
    assert!(matches!(
        error.kind.as_ref(),
        ParseErrorKind::UnterminatedString
    ));
    assert_eq!(error.position, Some(2));
}

#[test]
fn line_comments_are_trivia() {
    let tokens = lex_all("a // comment\nb");
    assert_eq!(texts(&tokens), ["a", "b", "EOF"]);
}

#[test]
fn line_comment_may_end_the_input() {
    let tokens = lex_all("a // no newline");
    assert_eq!(texts(&tokens), ["a", "EOF"]);
}

#[test]
fn block_comments_are_trivia() {
    let tokens = lex_all("a /* one\ntwo */ b");
    assert_eq!(texts(&tokens), ["a", "b", "EOF"]);
}

#[test]
fn unterminated_block_comment_points_at_opening() {
    let mut lexer = Lexer::new(Arc::from("ab /* never closed"));
    assert_eq!(lexer.lex().unwrap().text, "ab");
    let error = lexer.lex().expect_err("should fail");
    assert!(matches!(
        error.kind.as_ref(),
        ParseErrorKind::UnterminatedBlockComment
    ));
    assert_eq!(error.position, Some(3));
    assert_eq!(error.length, Some(2));
}

#[test]
fn unexpected_ascii_character_fails() {
    let mut lexer = Lexer::new(Arc::from("#"));
    let error = lexer.lex().expect_err("should fail");
    assert!(matches!(
        error.kind.as_ref(),
        ParseErrorKind::UnexpectedCharacter { character } if character == "#"
    ));
    assert_eq!(error.position, Some(0));
}

#[test]
fn unknown_unicode_character_becomes_a_token() {
    let tokens = lex_all("\u{a7}");
    assert_eq!(tokens[0].kind, TokenKind::Punct);
    assert_eq!(tokens[0].text, "\u{a7}");
}

#[test]
fn relexing_reproduces_offsets() {
    let input = "let t = x^2; frac(t + 1, t - 1)";
    let first: Vec<(usize, usize)> = lex_all(input)
        .iter()
        .map(|t| {
            let loc = t.loc.as_ref().unwrap();
            (loc.start(), loc.end())
        })
        .collect();
    let second: Vec<(usize, usize)> = lex_all(input)
        .iter()
        .map(|t| {
            let loc = t.loc.as_ref().unwrap();
            (loc.start(), loc.end())
        })
        .collect();
    assert_eq!(first, second);
}
