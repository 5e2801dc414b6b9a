// Lunatico lexer -- tokenizer for the Lunatico scripting language.

use luna_common::error::{LexError, LexErrorKind};
use luna_common::span::Span;
use luna_common::token::{is_keyword, Token, TokenKind};

/// The Lunatico lexer. Converts source text into a stream of tokens.
///
/// Scanning works directly on the source slice: `pos` is the byte offset
/// of the scan position, and lookahead reads characters off the remaining
/// suffix. Implements `Iterator<Item = Token>` so callers can consume
/// tokens lazily or collect them into a `Vec`. Whitespace and comments
/// are skipped, never emitted.
///
/// Lexical errors do not abort the scan: an `Unknown` token is emitted and
/// the error is collected in [`Lexer::errors`], leaving the fail-fast
/// decision to the driver.
pub struct Lexer<'src> {
    source: &'src str,
    /// Byte offset of the scan position.
    pos: usize,
    /// Whether we have already emitted the `Eof` token.
    emitted_eof: bool,
    /// Lexical errors collected so far.
    errors: Vec<LexError>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            emitted_eof: false,
            errors: Vec::new(),
        }
    }

    /// Convenience: tokenize the entire source.
    ///
    /// The returned vector includes the final `Eof` token; the second
    /// element holds any lexical errors in source order.
    pub fn tokenize(source: &str) -> (Vec<Token>, Vec<LexError>) {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        for token in &mut lexer {
            tokens.push(token);
        }
        (tokens, lexer.errors)
    }

    /// Errors collected so far.
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    // ── Scan position ──────────────────────────────────────────────────

    /// The unconsumed tail of the source.
    fn rest(&self) -> &'src str {
        &self.source[self.pos..]
    }

    /// Look at the current character without consuming it.
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Look one character past the current one.
    fn peek2(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    /// Consume the current character.
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume characters while the predicate holds.
    fn bump_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&predicate) {
            self.bump();
        }
    }

    fn offset(&self) -> u32 {
        self.pos as u32
    }

    // ── Tokenization ───────────────────────────────────────────────────

    /// Produce the next token.
    fn next_token(&mut self) -> Token {
        self.skip_trivia();

        let start = self.offset();

        let Some(c) = self.peek() else {
            return Token::new(TokenKind::Eof, start, start);
        };

        match c {
            // ── Delimiters and punctuation ──────────────────────────────
            '(' => self.single_char_token(TokenKind::ParenOpen, start),
            ')' => self.single_char_token(TokenKind::ParenClose, start),
            '{' => self.single_char_token(TokenKind::BraceOpen, start),
            '}' => self.single_char_token(TokenKind::BraceClose, start),
            ';' => self.single_char_token(TokenKind::Semicolon, start),
            ':' => self.single_char_token(TokenKind::Colon, start),
            ',' => self.single_char_token(TokenKind::Comma, start),

            // ── Operators ───────────────────────────────────────────────
            '+' | '-' | '*' | '/' | '%' => self.single_char_token(TokenKind::Operator, start),
            '=' | '~' | '<' | '>' => self.lex_compound_operator(start),
            '.' => self.lex_dot(start),

            // ── Literals ────────────────────────────────────────────────
            '0'..='9' => self.lex_number(start),
            '"' | '\'' => self.lex_string(start, c),

            // ── Identifiers and keywords ────────────────────────────────
            c if is_ident_start(c) => self.lex_ident(start),

            // ── Anything else ───────────────────────────────────────────
            _ => {
                self.bump();
                let end = self.offset();
                self.errors.push(LexError::new(
                    LexErrorKind::UnexpectedCharacter(c),
                    Span::new(start, end),
                ));
                Token::new(TokenKind::Unknown, start, end)
            }
        }
    }

    // ── Trivia ─────────────────────────────────────────────────────────

    /// Skip whitespace (including newlines) and comments, repeatedly.
    fn skip_trivia(&mut self) {
        loop {
            self.bump_while(|c| c.is_whitespace());
            if self.peek() == Some('-') && self.peek2() == Some('-') {
                self.skip_comment();
            } else {
                break;
            }
        }
    }

    /// Skip a comment. `--[[ ... ]]` is a block comment, `--` runs to end
    /// of line. An unclosed block comment extends to end of input.
    fn skip_comment(&mut self) {
        self.bump(); // -
        self.bump(); // -
        if self.peek() == Some('[') && self.peek2() == Some('[') {
            self.bump();
            self.bump();
            loop {
                match self.bump() {
                    None => break,
                    Some(']') if self.peek() == Some(']') => {
                        self.bump();
                        break;
                    }
                    Some(_) => {}
                }
            }
        } else {
            self.bump_while(|c| c != '\n');
        }
    }

    // ── Helpers ────────────────────────────────────────────────────────

    /// Consume one character and return a token of the given kind.
    fn single_char_token(&mut self, kind: TokenKind, start: u32) -> Token {
        self.bump();
        Token::new(kind, start, self.offset())
    }

    /// `= ~ < >`, optionally followed by `=` to form `== ~= <= >=`.
    ///
    /// A lone `~` is emitted as an operator token; the parser rejects it.
    fn lex_compound_operator(&mut self, start: u32) -> Token {
        self.bump();
        if self.peek() == Some('=') {
            self.bump();
        }
        Token::new(TokenKind::Operator, start, self.offset())
    }

    /// `.` starts a leading-dot number (`.5`), the concatenation operator
    /// (`..`), or the vararg marker (`...`). A bare dot is an error.
    fn lex_dot(&mut self, start: u32) -> Token {
        if self.peek2().is_some_and(|c| c.is_ascii_digit()) {
            return self.lex_number(start);
        }
        self.bump(); // .
        if self.peek() == Some('.') {
            self.bump();
            if self.peek() == Some('.') {
                self.bump();
            }
            return Token::new(TokenKind::Operator, start, self.offset());
        }
        let end = self.offset();
        self.errors.push(LexError::new(
            LexErrorKind::UnexpectedCharacter('.'),
            Span::new(start, end),
        ));
        Token::new(TokenKind::Unknown, start, end)
    }

    /// Number literal: `[0-9]+(\.[0-9]+)?`, or `.[0-9]+` when called from
    /// [`Self::lex_dot`].
    fn lex_number(&mut self, start: u32) -> Token {
        if self.peek() == Some('.') {
            self.bump();
            self.bump_while(|c| c.is_ascii_digit());
            return Token::new(TokenKind::Number, start, self.offset());
        }
        self.bump_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') && self.peek2().is_some_and(|c| c.is_ascii_digit()) {
            self.bump(); // .
            self.bump_while(|c| c.is_ascii_digit());
        }
        Token::new(TokenKind::Number, start, self.offset())
    }

    /// String literal delimited by `quote` (either `'` or `"`), with
    /// backslash escapes. The token span covers the quotes.
    fn lex_string(&mut self, start: u32, quote: char) -> Token {
        self.bump(); // opening quote
        loop {
            match self.peek() {
                None => {
                    let end = self.offset();
                    self.errors.push(LexError::new(
                        LexErrorKind::UnterminatedString,
                        Span::new(start, end),
                    ));
                    return Token::new(TokenKind::Unknown, start, end);
                }
                Some('\\') => {
                    self.bump();
                    // The escaped character, whatever it is, is part of
                    // the literal and must not close it.
                    self.bump();
                }
                Some(c) if c == quote => {
                    self.bump();
                    return Token::new(TokenKind::String, start, self.offset());
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    /// Identifier or keyword: `[A-Za-z_][A-Za-z0-9_]*`.
    fn lex_ident(&mut self, start: u32) -> Token {
        self.bump_while(is_ident_continue);
        let end = self.offset();
        let text = &self.source[start as usize..end as usize];
        let kind = if is_keyword(text) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        Token::new(kind, start, end)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.emitted_eof = true;
        }
        tracing::debug!(
            kind = %token.kind,
            start = token.span.start,
            end = token.span.end,
            "lexer: token"
        );
        Some(token)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, errors) = Lexer::tokenize(source);
        assert!(errors.is_empty(), "unexpected lex errors: {errors:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    fn texts(source: &str) -> Vec<String> {
        let (tokens, _) = Lexer::tokenize(source);
        tokens
            .into_iter()
            .map(|t| source[t.span.start as usize..t.span.end as usize].to_string())
            .collect()
    }

    #[test]
    fn empty_source_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn assignment_statement() {
        assert_eq!(
            kinds("x = 1 + 2"),
            vec![
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Number,
                TokenKind::Operator,
                TokenKind::Number,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keywords_vs_identifiers() {
        assert_eq!(
            kinds("if foo then end"),
            vec![
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::Keyword,
                TokenKind::Keyword,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn compound_operators_scan_as_one_token() {
        assert_eq!(
            texts("== ~= <= >= .. ..."),
            vec!["==", "~=", "<=", ">=", "..", "...", ""]
        );
    }

    #[test]
    fn leading_dot_number() {
        let (tokens, errors) = Lexer::tokenize(".5");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].span, Span::new(0, 2));
    }

    #[test]
    fn decimal_number() {
        assert_eq!(texts("3.14"), vec!["3.14", ""]);
    }

    #[test]
    fn bare_dot_is_an_error() {
        let (tokens, errors) = Lexer::tokenize(". x");
        assert_eq!(tokens[0].kind, TokenKind::Unknown);
        assert_eq!(
            errors,
            vec![LexError::new(
                LexErrorKind::UnexpectedCharacter('.'),
                Span::new(0, 1)
            )]
        );
    }

    #[test]
    fn string_literals_both_quotes() {
        assert_eq!(
            kinds(r#""hello" 'world'"#),
            vec![TokenKind::String, TokenKind::String, TokenKind::Eof]
        );
    }

    #[test]
    fn string_with_escaped_quote() {
        let src = r#""say \"hi\"""#;
        let (tokens, errors) = Lexer::tokenize(src);
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].span, Span::new(0, src.len() as u32));
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let (tokens, errors) = Lexer::tokenize("\"oops");
        assert_eq!(tokens[0].kind, TokenKind::Unknown);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, LexErrorKind::UnterminatedString);
    }

    #[test]
    fn line_comment_is_skipped() {
        assert_eq!(
            kinds("x = 1 -- the answer\ny = 2"),
            vec![
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Number,
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Number,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn block_comment_is_skipped() {
        assert_eq!(
            kinds("x --[[ spans\nlines ]] = 1"),
            vec![
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Number,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unclosed_block_comment_runs_to_eof() {
        assert_eq!(kinds("x --[[ never closed"), vec![
            TokenKind::Identifier,
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn minus_is_not_a_comment() {
        assert_eq!(
            kinds("a - b"),
            vec![
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lone_tilde_is_an_operator_token() {
        // The parser rejects it; lexically it is just an operator lexeme.
        assert_eq!(texts("~"), vec!["~", ""]);
    }

    #[test]
    fn unknown_character_collects_error_and_continues() {
        let (tokens, errors) = Lexer::tokenize("x @ y");
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::Identifier,
                TokenKind::Unknown,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, LexErrorKind::UnexpectedCharacter('@'));
    }

    #[test]
    fn spans_stay_byte_accurate_after_multibyte_content() {
        // 'é' is two bytes; everything after it must still slice cleanly.
        let src = "s = 'café' x = 1";
        let (tokens, errors) = Lexer::tokenize(src);
        assert!(errors.is_empty());
        let x = tokens
            .iter()
            .find(|t| {
                t.kind == TokenKind::Identifier
                    && &src[t.span.start as usize..t.span.end as usize] == "x"
            })
            .expect("the identifier after the string");
        assert_eq!(src.as_bytes()[x.span.start as usize], b'x');
    }

    #[test]
    fn braces_and_punctuation() {
        assert_eq!(
            kinds("{ } ; : ,"),
            vec![
                TokenKind::BraceOpen,
                TokenKind::BraceClose,
                TokenKind::Semicolon,
                TokenKind::Colon,
                TokenKind::Comma,
                TokenKind::Eof,
            ]
        );
    }
}
