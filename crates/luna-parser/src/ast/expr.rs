//! Typed AST nodes for expressions.
//!
//! Covers the expression forms of the grammar: number/string literals,
//! variable references, binary operations, function calls, and
//! parenthesized groupings.

use crate::ast::{ast_node, child_node, AstNode};
use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

// ── Expr enum ────────────────────────────────────────────────────────────

/// Any expression node.
#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Literal),
    NameRef(NameRef),
    BinaryExpr(BinaryExpr),
    CallExpr(CallExpr),
    ParenExpr(ParenExpr),
}

impl Expr {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::LITERAL => Some(Expr::Literal(Literal { syntax: node })),
            SyntaxKind::NAME_REF => Some(Expr::NameRef(NameRef { syntax: node })),
            SyntaxKind::BINARY_EXPR => Some(Expr::BinaryExpr(BinaryExpr { syntax: node })),
            SyntaxKind::CALL_EXPR => Some(Expr::CallExpr(CallExpr { syntax: node })),
            SyntaxKind::PAREN_EXPR => Some(Expr::ParenExpr(ParenExpr { syntax: node })),
            _ => None,
        }
    }

    /// Access the underlying syntax node regardless of variant.
    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Expr::Literal(n) => &n.syntax,
            Expr::NameRef(n) => &n.syntax,
            Expr::BinaryExpr(n) => &n.syntax,
            Expr::CallExpr(n) => &n.syntax,
            Expr::ParenExpr(n) => &n.syntax,
        }
    }
}

// ── Literal ──────────────────────────────────────────────────────────────

/// What a literal holds, by its token kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Number,
    String,
}

ast_node!(Literal, LITERAL);

impl Literal {
    /// The literal token (NUMBER or STRING).
    pub fn token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .next()
    }

    /// Number vs. string, decided by the token kind.
    pub fn kind(&self) -> Option<LiteralKind> {
        match self.token()?.kind() {
            SyntaxKind::NUMBER => Some(LiteralKind::Number),
            SyntaxKind::STRING => Some(LiteralKind::String),
            _ => None,
        }
    }

    /// The literal's value text.
    ///
    /// Numbers keep their lexeme as written. Strings are stripped of their
    /// quotes and have their backslash escapes processed.
    pub fn value(&self) -> Option<String> {
        let token = self.token()?;
        match token.kind() {
            SyntaxKind::NUMBER => Some(token.text().to_string()),
            SyntaxKind::STRING => Some(unescape_string(token.text())),
            _ => None,
        }
    }
}

/// Strip the surrounding quotes and process `\n \t \r \\ \' \"` escapes.
/// An unknown escape keeps the escaped character as-is.
fn unescape_string(raw: &str) -> String {
    let inner = if raw.len() >= 2 {
        &raw[1..raw.len() - 1]
    } else {
        raw
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

// ── Name Reference ───────────────────────────────────────────────────────

ast_node!(NameRef, NAME_REF);

impl NameRef {
    /// The identifier text.
    pub fn text(&self) -> Option<String> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| t.kind() == SyntaxKind::IDENT)
            .map(|t| t.text().to_string())
    }
}

// ── Binary Expression ────────────────────────────────────────────────────

ast_node!(BinaryExpr, BINARY_EXPR);

impl BinaryExpr {
    /// The left-hand side expression.
    pub fn lhs(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    /// The right-hand side expression.
    pub fn rhs(&self) -> Option<Expr> {
        self.syntax.children().filter_map(Expr::cast).nth(1)
    }

    /// The operator token.
    pub fn op(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| t.kind().is_binary_operator())
    }

    /// The operator lexeme (`+`, `==`, ...).
    pub fn op_text(&self) -> Option<String> {
        self.op().map(|t| t.text().to_string())
    }
}

// ── Call Expression ──────────────────────────────────────────────────────

ast_node!(CallExpr, CALL_EXPR);

impl CallExpr {
    /// The callee name. Calls only take the `identifier(...)` form.
    pub fn callee(&self) -> Option<NameRef> {
        child_node(&self.syntax)
    }

    /// The argument list.
    pub fn arg_list(&self) -> Option<ArgList> {
        child_node(&self.syntax)
    }

    /// All argument expressions, in order.
    pub fn args(&self) -> Vec<Expr> {
        self.arg_list()
            .map(|list| list.args().collect())
            .unwrap_or_default()
    }
}

ast_node!(ArgList, ARG_LIST);

impl ArgList {
    /// All argument expressions.
    pub fn args(&self) -> impl Iterator<Item = Expr> + '_ {
        self.syntax.children().filter_map(Expr::cast)
    }
}

// ── Parenthesized Expression ─────────────────────────────────────────────

ast_node!(ParenExpr, PAREN_EXPR);

impl ParenExpr {
    /// The grouped inner expression.
    pub fn inner(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescape_handles_all_escapes() {
        assert_eq!(unescape_string(r#""a\nb""#), "a\nb");
        assert_eq!(unescape_string(r#""a\tb""#), "a\tb");
        assert_eq!(unescape_string(r#""a\rb""#), "a\rb");
        assert_eq!(unescape_string(r#""a\\b""#), "a\\b");
        assert_eq!(unescape_string(r#""a\"b""#), "a\"b");
        assert_eq!(unescape_string(r#"'a\'b'"#), "a'b");
    }

    #[test]
    fn unescape_keeps_unknown_escapes() {
        assert_eq!(unescape_string(r#""a\qb""#), "aqb");
    }

    #[test]
    fn unescape_plain_string() {
        assert_eq!(unescape_string(r#""hello""#), "hello");
        assert_eq!(unescape_string("''"), "");
    }
}
