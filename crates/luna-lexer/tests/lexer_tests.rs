//! Integration tests for the Lunatico lexer.
//!
//! Each test tokenizes a small program and checks the resulting kind/lexeme
//! sequence, including the final `Eof` token, against the scanner rules.

use luna_common::error::LexErrorKind;
use luna_common::span::line_col;
use luna_common::token::TokenKind;
use luna_lexer::Lexer;

/// Tokenize and return `(kind, lexeme)` pairs, asserting no lex errors.
fn lex_ok(source: &str) -> Vec<(TokenKind, String)> {
    let (tokens, errors) = Lexer::tokenize(source);
    assert!(errors.is_empty(), "unexpected lex errors: {errors:?}");
    tokens
        .into_iter()
        .map(|t| {
            (
                t.kind,
                source[t.span.start as usize..t.span.end as usize].to_string(),
            )
        })
        .collect()
}

#[test]
fn full_function_declaration() {
    let pairs = lex_ok("function add(a, b) return a + b end");
    let expected = [
        (TokenKind::Keyword, "function"),
        (TokenKind::Identifier, "add"),
        (TokenKind::ParenOpen, "("),
        (TokenKind::Identifier, "a"),
        (TokenKind::Comma, ","),
        (TokenKind::Identifier, "b"),
        (TokenKind::ParenClose, ")"),
        (TokenKind::Keyword, "return"),
        (TokenKind::Identifier, "a"),
        (TokenKind::Operator, "+"),
        (TokenKind::Identifier, "b"),
        (TokenKind::Keyword, "end"),
        (TokenKind::Eof, ""),
    ];
    assert_eq!(
        pairs,
        expected
            .iter()
            .map(|(k, s)| (*k, s.to_string()))
            .collect::<Vec<_>>()
    );
}

#[test]
fn all_keywords_tokenize_as_keywords() {
    let pairs = lex_ok("if then else end function local return while do");
    assert_eq!(pairs.len(), 10); // 9 keywords + Eof
    for (kind, text) in &pairs[..9] {
        assert_eq!(*kind, TokenKind::Keyword, "{text} should be a keyword");
    }
}

#[test]
fn compound_before_simple_operators() {
    // A `<=` must not lex as `<` `=`.
    let pairs = lex_ok("a <= b == c ~= d");
    let ops: Vec<&str> = pairs
        .iter()
        .filter(|(k, _)| *k == TokenKind::Operator)
        .map(|(_, s)| s.as_str())
        .collect();
    assert_eq!(ops, vec!["<=", "==", "~="]);
}

#[test]
fn numbers_integer_decimal_and_leading_dot() {
    let pairs = lex_ok("1 42 3.14 .5");
    let nums: Vec<&str> = pairs
        .iter()
        .filter(|(k, _)| *k == TokenKind::Number)
        .map(|(_, s)| s.as_str())
        .collect();
    assert_eq!(nums, vec!["1", "42", "3.14", ".5"]);
}

#[test]
fn integer_followed_by_concat_is_not_a_decimal() {
    let pairs = lex_ok("1 .. 2");
    assert_eq!(pairs[0], (TokenKind::Number, "1".to_string()));
    assert_eq!(pairs[1], (TokenKind::Operator, "..".to_string()));
    assert_eq!(pairs[2], (TokenKind::Number, "2".to_string()));
}

#[test]
fn strings_keep_quotes_in_span() {
    let pairs = lex_ok(r#"x = "olá""#);
    assert_eq!(pairs[2], (TokenKind::String, r#""olá""#.to_string()));
}

#[test]
fn escapes_do_not_terminate_strings() {
    let pairs = lex_ok(r#"'a\'b' "c\nd""#);
    assert_eq!(pairs[0].0, TokenKind::String);
    assert_eq!(pairs[1].0, TokenKind::String);
    assert_eq!(pairs[2].0, TokenKind::Eof);
}

#[test]
fn comments_every_flavor() {
    let source = "a -- line\nb --[[ block ]] c --[[\nmulti\nline]] d";
    let idents: Vec<String> = lex_ok(source)
        .into_iter()
        .filter(|(k, _)| *k == TokenKind::Identifier)
        .map(|(_, s)| s)
        .collect();
    assert_eq!(idents, vec!["a", "b", "c", "d"]);
}

#[test]
fn error_positions_resolve_to_line_and_column() {
    let source = "x = 1\ny = @";
    let (_, errors) = Lexer::tokenize(source);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, LexErrorKind::UnexpectedCharacter('@'));
    let pos = line_col(source, errors[0].span.start);
    assert_eq!((pos.line, pos.column), (2, 5));
}

#[test]
fn unterminated_string_spans_to_eof() {
    let source = "s = 'no end";
    let (tokens, errors) = Lexer::tokenize(source);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, LexErrorKind::UnterminatedString);
    assert_eq!(errors[0].span.end, source.len() as u32);
    // The bad literal surfaces as a single Unknown token.
    assert!(tokens.iter().any(|t| t.kind == TokenKind::Unknown));
}
