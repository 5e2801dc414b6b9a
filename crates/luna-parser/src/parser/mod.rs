//! Event-based parser for Lunatico.
//!
//! The parser consumes the scanner's token stream and produces events
//! (Open/Close/Advance) that are later converted into a rowan green tree.
//! This decouples parsing logic from tree construction.
//!
//! # Architecture
//!
//! The parser uses matklad's event-based approach (as in rust-analyzer):
//!
//! 1. Parse functions call `open()` to start a node, `advance()` to consume
//!    tokens, and `close()` to finish a node with its actual kind.
//! 2. Events are collected into a flat `Vec<Event>`.
//! 3. `build_tree()` converts events into a rowan `GreenNode`.
//!
//! The `open_before()` method enables wrapping a previously completed node
//! (e.g., turning the left operand into `binary_expr(lhs, op, rhs)`) using
//! the "forward parent" technique.
//!
//! # Error strategy
//!
//! The parser is first-error-only: the first mismatch records one
//! [`ParseError`] and sets a sticky flag that every statement loop checks,
//! so parsing unwinds without piling up cascade errors. There is no
//! recovery.

pub(crate) mod expressions;
pub(crate) mod statements;

use luna_common::span::Span;
use luna_common::token::Token;

use crate::error::ParseError;
use crate::syntax_kind::SyntaxKind;

/// A parser event. Events are collected during parsing and later converted
/// into a rowan green tree by [`Parser::build_tree`].
#[derive(Debug)]
enum Event {
    /// Start a new CST node. The `kind` is initially TOMBSTONE and gets
    /// patched by `close()` with the real node kind.
    ///
    /// `forward_parent` is used by `open_before()` to indicate that this
    /// node should be opened before the node at the specified event index.
    Open {
        kind: SyntaxKind,
        forward_parent: Option<usize>,
    },
    /// Finish the current CST node.
    Close,
    /// Consume the current token, advancing the token position.
    Advance,
}

/// An opaque marker for a started but not-yet-closed CST node.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkOpened {
    index: usize,
}

/// An opaque marker for a completed (opened and closed) CST node.
/// Used by `open_before()` to wrap a previously completed node.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkClosed {
    index: usize,
}

/// Event-based parser for Lunatico source code.
///
/// Consumes a `Vec<Token>` (from the scanner) plus the source text,
/// producing events that are later converted into a rowan green tree.
pub(crate) struct Parser<'src> {
    /// All tokens from the scanner (including Eof).
    tokens: Vec<Token>,
    /// Current position in the token stream.
    pos: usize,
    /// Collected parser events.
    events: Vec<Event>,
    /// Original source text (for extracting token text via spans).
    source: &'src str,
    /// Collected parse errors (at most one, see module docs).
    errors: Vec<ParseError>,
    /// Whether an error has been encountered.
    has_error: bool,
}

impl<'src> Parser<'src> {
    /// Create a new parser from a token stream and source text.
    pub(crate) fn new(tokens: Vec<Token>, source: &'src str) -> Self {
        Self {
            tokens,
            pos: 0,
            events: Vec::new(),
            source,
            errors: Vec::new(),
            has_error: false,
        }
    }

    // ── Lookahead ──────────────────────────────────────────────────────

    /// Returns the refined SyntaxKind of the current token, or `EOF` if
    /// past the end of the token stream.
    pub(crate) fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Returns the refined SyntaxKind of the Nth token ahead.
    /// `nth(0)` is equivalent to `current()`.
    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        match self.tokens.get(self.pos + n) {
            Some(token) => SyntaxKind::from_token(token.kind, self.token_text(token)),
            None => SyntaxKind::EOF,
        }
    }

    /// Returns the text of the current token.
    pub(crate) fn current_text(&self) -> &str {
        match self.tokens.get(self.pos) {
            Some(token) => self.token_text(token),
            None => "",
        }
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        match self.tokens.get(self.pos) {
            Some(token) => token.span,
            None => {
                // Past end: zero-length span at end of source.
                let end = self.source.len() as u32;
                Span::new(end, end)
            }
        }
    }

    /// Check if the current token matches the given kind.
    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Check if the current token matches any of the given kinds.
    pub(crate) fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current())
    }

    fn token_text(&self, token: &Token) -> &str {
        &self.source[token.span.start as usize..token.span.end as usize]
    }

    // ── Mutation: node management ──────────────────────────────────────

    /// Start a new CST node. Returns a marker that must be passed to
    /// `close()` to finish the node.
    pub(crate) fn open(&mut self) -> MarkOpened {
        let mark = MarkOpened {
            index: self.events.len(),
        };
        self.events.push(Event::Open {
            kind: SyntaxKind::TOMBSTONE,
            forward_parent: None,
        });
        mark
    }

    /// Start a new CST node BEFORE a previously completed node.
    ///
    /// This enables wrapping: after parsing the left operand we discover an
    /// infix operator, so the operand must become the first child of a new
    /// `BINARY_EXPR` node. Instead of physically inserting into the events
    /// vec (which would invalidate indices), the completed node's Open
    /// event gets a `forward_parent` link to the wrapping Open event.
    pub(crate) fn open_before(&mut self, completed: MarkClosed) -> MarkOpened {
        let mark = MarkOpened {
            index: self.events.len(),
        };
        self.events.push(Event::Open {
            kind: SyntaxKind::TOMBSTONE,
            forward_parent: None,
        });
        if let Event::Open { forward_parent, .. } = &mut self.events[completed.index] {
            *forward_parent = Some(mark.index);
        }
        mark
    }

    /// Close a CST node, patching its Open event with the actual kind.
    pub(crate) fn close(&mut self, m: MarkOpened, kind: SyntaxKind) -> MarkClosed {
        if let Event::Open {
            kind: slot_kind, ..
        } = &mut self.events[m.index]
        {
            *slot_kind = kind;
        }
        self.events.push(Event::Close);
        MarkClosed { index: m.index }
    }

    // ── Mutation: token consumption ────────────────────────────────────

    /// Consume the current token.
    pub(crate) fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.events.push(Event::Advance);
            self.pos += 1;
        }
    }

    /// Consume the current token wrapped in an ERROR_NODE, recording the
    /// given error. Used when encountering an unexpected token.
    pub(crate) fn advance_with_error(&mut self, message: &str) {
        let m = self.open();
        self.error(message);
        self.advance();
        self.close(m, SyntaxKind::ERROR_NODE);
    }

    /// If the current token matches `kind`, consume it and return true.
    /// Otherwise, record a token-mismatch error and return false.
    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            self.error(&format!(
                "Esperado token {:?}, encontrado {:?} ('{}')",
                kind,
                self.current(),
                self.current_text()
            ));
            false
        }
    }

    /// If the current token matches `kind`, consume it and return true.
    /// Otherwise, return false (no error recorded).
    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    // ── Error reporting ────────────────────────────────────────────────

    /// Record a parse error at the current position and set the sticky
    /// error flag. Only the first error is kept.
    pub(crate) fn error(&mut self, message: &str) {
        if self.has_error {
            return;
        }
        let span = self.current_span();
        self.errors.push(ParseError::new(message, span));
        self.has_error = true;
    }

    /// Whether the parser has encountered an error.
    /// Parse functions check this and bail early.
    pub(crate) fn has_error(&self) -> bool {
        self.has_error
    }

    // ── Tree building ──────────────────────────────────────────────────

    /// Convert collected events into a rowan `GreenNode` and errors.
    ///
    /// Forward parents: when `open_before(completed)` was called, the
    /// completed node's Open event carries a `forward_parent` link to the
    /// wrapping Open event. When we encounter such an Open, we follow the
    /// chain, collect all kinds, and open nodes in reverse order
    /// (outermost wrapper first); the wrapper Open events are then marked
    /// TOMBSTONE so they are skipped when encountered later.
    pub(crate) fn build_tree(mut self) -> (rowan::GreenNode, Vec<ParseError>) {
        let mut builder = rowan::GreenNodeBuilder::new();
        let mut token_pos: usize = 0;
        let mut forward_parents: Vec<(usize, SyntaxKind)> = Vec::new();

        let mut i = 0;
        while i < self.events.len() {
            match self.events[i] {
                Event::Open {
                    kind,
                    forward_parent,
                } => {
                    if forward_parent.is_some() {
                        forward_parents.clear();
                        let mut current = i;
                        loop {
                            let (fk, fp) = match self.events[current] {
                                Event::Open {
                                    kind,
                                    forward_parent,
                                } => (kind, forward_parent),
                                _ => unreachable!("forward parent must point at an Open event"),
                            };
                            forward_parents.push((current, fk));
                            match fp {
                                Some(next) => current = next,
                                None => break,
                            }
                        }

                        // Tombstone the wrapper Opens so they are skipped
                        // when reached in sequence later.
                        for &(fp_idx, _) in forward_parents.iter().skip(1) {
                            if let Event::Open {
                                ref mut kind,
                                ref mut forward_parent,
                            } = self.events[fp_idx]
                            {
                                *kind = SyntaxKind::TOMBSTONE;
                                *forward_parent = None;
                            }
                        }
                        if let Event::Open {
                            ref mut forward_parent,
                            ..
                        } = self.events[i]
                        {
                            *forward_parent = None;
                        }

                        // Open nodes outermost wrapper first.
                        for &(_, fk) in forward_parents.iter().rev() {
                            if fk != SyntaxKind::TOMBSTONE {
                                builder.start_node(rowan::SyntaxKind(fk as u16));
                            }
                        }
                    } else if kind != SyntaxKind::TOMBSTONE {
                        builder.start_node(rowan::SyntaxKind(kind as u16));
                    }
                }
                Event::Close => {
                    builder.finish_node();
                }
                Event::Advance => {
                    if token_pos < self.tokens.len() {
                        let token = &self.tokens[token_pos];
                        let text =
                            &self.source[token.span.start as usize..token.span.end as usize];
                        let syntax_kind = SyntaxKind::from_token(token.kind, text);
                        builder.token(rowan::SyntaxKind(syntax_kind as u16), text);
                        token_pos += 1;
                    }
                }
            }
            i += 1;
        }

        (builder.finish(), self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use luna_lexer::Lexer;

    fn parser_for(source: &str) -> Parser<'_> {
        let (tokens, errors) = Lexer::tokenize(source);
        assert!(errors.is_empty(), "lex errors in test source: {errors:?}");
        Parser::new(tokens, source)
    }

    #[test]
    fn smoke_test_parser_produces_green_node() {
        let source = "x = 5";
        let mut parser = parser_for(source);

        let root = parser.open();
        let assign = parser.open();
        parser.advance(); // x
        parser.advance(); // =
        parser.advance(); // 5
        parser.close(assign, SyntaxKind::ASSIGN_STMT);
        parser.advance(); // Eof
        parser.close(root, SyntaxKind::SOURCE_FILE);

        let (green, errors) = parser.build_tree();
        assert!(errors.is_empty(), "expected no errors: {errors:?}");

        let root_node = crate::cst::SyntaxNode::new_root(green);
        assert_eq!(root_node.kind(), SyntaxKind::SOURCE_FILE);
        // CST text is the concatenation of token texts; the scanner never
        // emits whitespace.
        assert_eq!(root_node.text().to_string(), "x=5");

        let children: Vec<_> = root_node.children().collect();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].kind(), SyntaxKind::ASSIGN_STMT);
    }

    #[test]
    fn lookahead_refines_tokens() {
        let parser = parser_for("x = f(1)");
        assert_eq!(parser.current(), SyntaxKind::IDENT);
        assert_eq!(parser.nth(1), SyntaxKind::EQ);
        assert_eq!(parser.nth(2), SyntaxKind::IDENT);
        assert_eq!(parser.nth(3), SyntaxKind::L_PAREN);
        assert_eq!(parser.nth(100), SyntaxKind::EOF);
    }

    #[test]
    fn expect_records_only_the_first_error() {
        let source = "local x";
        let mut parser = parser_for(source);

        let root = parser.open();
        assert!(parser.expect(SyntaxKind::LOCAL_KW));
        assert!(!parser.has_error());

        assert!(!parser.expect(SyntaxKind::LOCAL_KW));
        assert!(parser.has_error());
        assert!(!parser.expect(SyntaxKind::THEN_KW));

        parser.advance(); // x
        parser.advance(); // Eof
        parser.close(root, SyntaxKind::SOURCE_FILE);

        let (_green, errors) = parser.build_tree();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message,
            "Esperado token LOCAL_KW, encontrado IDENT ('x')"
        );
    }

    #[test]
    fn eat_consumes_only_on_match() {
        let mut parser = parser_for("local x");
        assert!(parser.eat(SyntaxKind::LOCAL_KW));
        assert!(!parser.eat(SyntaxKind::LOCAL_KW));
        assert!(!parser.has_error());
    }

    #[test]
    fn open_before_wraps_completed_node() {
        let source = "f(42)";
        let mut parser = parser_for(source);

        let root = parser.open();

        let name = parser.open();
        parser.advance(); // f
        let name_closed = parser.close(name, SyntaxKind::NAME_REF);

        let call = parser.open_before(name_closed);
        parser.advance(); // (
        parser.advance(); // 42
        parser.advance(); // )
        parser.close(call, SyntaxKind::CALL_EXPR);

        parser.advance(); // Eof
        parser.close(root, SyntaxKind::SOURCE_FILE);

        let (green, errors) = parser.build_tree();
        assert!(errors.is_empty());

        let root_node = crate::cst::SyntaxNode::new_root(green);
        let call_node = root_node.children().next().unwrap();
        assert_eq!(call_node.kind(), SyntaxKind::CALL_EXPR);
        let name_ref = call_node.children().next().unwrap();
        assert_eq!(name_ref.kind(), SyntaxKind::NAME_REF);
    }

    #[test]
    fn current_span_past_end_is_empty_at_eof() {
        let mut parser = parser_for("x");
        parser.advance(); // x
        parser.advance(); // Eof
        let span = parser.current_span();
        assert_eq!(span.start, 1);
        assert!(span.is_empty());
    }
}
