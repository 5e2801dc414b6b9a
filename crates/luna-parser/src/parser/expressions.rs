//! Pratt expression parser for Lunatico.
//!
//! Implements operator precedence parsing with a binding power table over
//! the grammar's three infix levels: comparison, additive, multiplicative,
//! all left-associative. Atoms are number/string literals, identifiers,
//! function calls, and parenthesized expressions.
//!
//! Calls only exist in the `identifier '(' args ')'` form. The language
//! has no first-class callees, so call recognition happens at the atom via
//! one token of lookahead rather than as a postfix loop.

use crate::syntax_kind::SyntaxKind;

use super::{MarkClosed, Parser};

// ── Binding Power Table ────────────────────────────────────────────────

/// Returns (left_bp, right_bp) for infix operators.
///
/// Left < right means left-associative. Returns `None` if the token is not
/// an infix operator; note that `=`, `..` and `...` are NOT expression
/// operators in this grammar.
fn infix_binding_power(op: SyntaxKind) -> Option<(u8, u8)> {
    match op {
        // Comparison and equality: lowest, left-associative
        SyntaxKind::EQ_EQ
        | SyntaxKind::TILDE_EQ
        | SyntaxKind::LT
        | SyntaxKind::GT
        | SyntaxKind::LT_EQ
        | SyntaxKind::GT_EQ => Some((1, 2)),

        // Additive: left-associative
        SyntaxKind::PLUS | SyntaxKind::MINUS => Some((3, 4)),

        // Multiplicative: left-associative
        SyntaxKind::STAR | SyntaxKind::SLASH | SyntaxKind::PERCENT => Some((5, 6)),

        _ => None,
    }
}

// ── Expression Entry Point ─────────────────────────────────────────────

/// Parse an expression at the default (lowest) binding power.
pub(crate) fn parse_expr(p: &mut Parser) {
    tracing::debug!(token = %p.current_text(), "parser: expression");
    expr_bp(p, 0);
}

/// Parse an expression with the given minimum binding power.
///
/// The core Pratt loop: parse an atom (the LHS), then consume infix
/// operators as long as their binding power exceeds `min_bp`, wrapping
/// the LHS into BINARY_EXPR nodes via `open_before`.
fn expr_bp(p: &mut Parser, min_bp: u8) -> Option<MarkClosed> {
    let mut lhs = atom(p)?;

    loop {
        if p.has_error() {
            break;
        }

        match infix_binding_power(p.current()) {
            Some((l_bp, r_bp)) => {
                if l_bp < min_bp {
                    break;
                }
                let m = p.open_before(lhs);
                p.advance(); // operator
                expr_bp(p, r_bp);
                lhs = p.close(m, SyntaxKind::BINARY_EXPR);
            }
            None => break,
        }
    }

    Some(lhs)
}

// ── Atoms ──────────────────────────────────────────────────────────────

/// Parse an atomic expression: literal, identifier, call, or grouping.
fn atom(p: &mut Parser) -> Option<MarkClosed> {
    match p.current() {
        SyntaxKind::NUMBER | SyntaxKind::STRING => {
            let m = p.open();
            p.advance();
            Some(p.close(m, SyntaxKind::LITERAL))
        }

        SyntaxKind::IDENT => {
            // One-token lookahead: `f(` is a call, anything else a variable.
            if p.nth(1) == SyntaxKind::L_PAREN {
                Some(parse_call_expr(p))
            } else {
                let m = p.open();
                p.advance();
                Some(p.close(m, SyntaxKind::NAME_REF))
            }
        }

        SyntaxKind::L_PAREN => {
            let m = p.open();
            p.advance(); // (
            expr_bp(p, 0);
            p.expect(SyntaxKind::R_PAREN);
            Some(p.close(m, SyntaxKind::PAREN_EXPR))
        }

        _ => {
            p.error(&format!("Token inesperado '{}'", p.current_text()));
            None
        }
    }
}

// ── Function Call ──────────────────────────────────────────────────────

/// Parse a function call: `identifier '(' [expr {',' expr}] ')'`.
///
/// The caller guarantees the current token is an IDENT followed by `(`.
pub(crate) fn parse_call_expr(p: &mut Parser) -> MarkClosed {
    tracing::debug!(callee = %p.current_text(), "parser: call");
    let m = p.open();

    let name = p.open();
    p.advance(); // callee identifier
    p.close(name, SyntaxKind::NAME_REF);

    parse_arg_list(p);
    p.close(m, SyntaxKind::CALL_EXPR)
}

/// Parse an argument list: `'(' [expr {',' expr}] ')'`.
fn parse_arg_list(p: &mut Parser) {
    let m = p.open();
    p.advance(); // (

    if !p.at(SyntaxKind::R_PAREN) && !p.at(SyntaxKind::EOF) {
        expr_bp(p, 0);
        while p.eat(SyntaxKind::COMMA) {
            if p.has_error() {
                break;
            }
            expr_bp(p, 0);
        }
    }

    p.expect(SyntaxKind::R_PAREN);
    p.close(m, SyntaxKind::ARG_LIST);
}
