//! Statement and declaration parsers for Lunatico.
//!
//! Parses the statement forms of the grammar: `if`, `while`, function
//! declarations, `return`, `local` variable declarations, assignments,
//! and call statements. Statement dispatch needs one token of lookahead
//! at an identifier (`=` means assignment, `(` means call).

use crate::syntax_kind::SyntaxKind;

use super::{expressions, Parser};

/// Parse a complete source file: the top-level statement block.
pub(crate) fn parse_source_file(p: &mut Parser) {
    let root = p.open();

    loop {
        if p.has_error() || p.at(SyntaxKind::EOF) {
            break;
        }
        if p.eat(SyntaxKind::SEMICOLON) {
            continue;
        }
        parse_statement(p);
    }

    // Attach whatever remains (error case), then the Eof token.
    while !p.at(SyntaxKind::EOF) {
        p.advance();
    }
    p.advance(); // Eof

    p.close(root, SyntaxKind::SOURCE_FILE);
}

/// Parse a single statement, dispatching on the current token.
fn parse_statement(p: &mut Parser) {
    match p.current() {
        SyntaxKind::IF_KW => parse_if_stmt(p),
        SyntaxKind::WHILE_KW => parse_while_stmt(p),
        SyntaxKind::FUNCTION_KW => parse_fn_decl(p),
        SyntaxKind::RETURN_KW => parse_return_stmt(p),
        SyntaxKind::LOCAL_KW => parse_var_decl(p),
        SyntaxKind::IDENT => {
            if p.nth(1) == SyntaxKind::EQ {
                parse_assign_stmt(p);
            } else if p.nth(1) == SyntaxKind::L_PAREN {
                expressions::parse_call_expr(p);
            } else {
                p.advance_with_error(&format!("Token inesperado '{}'", p.current_text()));
            }
        }
        _ => {
            p.advance_with_error(&format!("Token inesperado '{}'", p.current_text()));
        }
    }
}

/// Parse a statement block terminated by one of `terminators` (or EOF).
///
/// The terminator token itself is left for the caller to consume.
fn parse_block(p: &mut Parser, terminators: &[SyntaxKind]) {
    let m = p.open();
    loop {
        if p.has_error() || p.at(SyntaxKind::EOF) || p.at_any(terminators) {
            break;
        }
        if p.eat(SyntaxKind::SEMICOLON) {
            continue;
        }
        parse_statement(p);
    }
    p.close(m, SyntaxKind::BLOCK);
}

/// Parse a name in definition position, wrapping the IDENT in a NAME node.
fn parse_name(p: &mut Parser) {
    if p.at(SyntaxKind::IDENT) {
        let m = p.open();
        p.advance();
        p.close(m, SyntaxKind::NAME);
    } else {
        p.expect(SyntaxKind::IDENT);
    }
}

/// `'if' expr 'then' block ['else' block] 'end'`
fn parse_if_stmt(p: &mut Parser) {
    tracing::debug!("parser: if statement");
    let m = p.open();
    p.advance(); // if

    expressions::parse_expr(p);
    p.expect(SyntaxKind::THEN_KW);

    if !p.has_error() {
        parse_block(p, &[SyntaxKind::ELSE_KW, SyntaxKind::END_KW]);
    }

    if p.at(SyntaxKind::ELSE_KW) {
        let e = p.open();
        p.advance(); // else
        parse_block(p, &[SyntaxKind::END_KW]);
        p.close(e, SyntaxKind::ELSE_BRANCH);
    }

    p.expect(SyntaxKind::END_KW);
    p.close(m, SyntaxKind::IF_STMT);
}

/// `'while' expr 'do' block 'end'`
fn parse_while_stmt(p: &mut Parser) {
    tracing::debug!("parser: while statement");
    let m = p.open();
    p.advance(); // while

    expressions::parse_expr(p);
    p.expect(SyntaxKind::DO_KW);

    if !p.has_error() {
        parse_block(p, &[SyntaxKind::END_KW]);
    }

    p.expect(SyntaxKind::END_KW);
    p.close(m, SyntaxKind::WHILE_STMT);
}

/// `'function' name '(' [param {',' param}] ')' block 'end'`
fn parse_fn_decl(p: &mut Parser) {
    tracing::debug!("parser: function declaration");
    let m = p.open();
    p.advance(); // function

    parse_name(p);

    if !p.has_error() {
        parse_param_list(p);
    }

    if !p.has_error() {
        parse_block(p, &[SyntaxKind::END_KW]);
    }

    p.expect(SyntaxKind::END_KW);
    p.close(m, SyntaxKind::FN_DECL);
}

/// `'(' [param {',' param}] ')'`
fn parse_param_list(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::L_PAREN);

    if p.at(SyntaxKind::IDENT) {
        parse_param(p);
        while p.eat(SyntaxKind::COMMA) {
            if p.has_error() {
                break;
            }
            parse_param(p);
        }
    }

    p.expect(SyntaxKind::R_PAREN);
    p.close(m, SyntaxKind::PARAM_LIST);
}

/// A single parameter name.
fn parse_param(p: &mut Parser) {
    if p.at(SyntaxKind::IDENT) {
        let m = p.open();
        p.advance();
        p.close(m, SyntaxKind::PARAM);
    } else {
        p.expect(SyntaxKind::IDENT);
    }
}

/// `'return' [expr]`
///
/// The expression is present iff the next token can start one.
fn parse_return_stmt(p: &mut Parser) {
    tracing::debug!("parser: return statement");
    let m = p.open();
    p.advance(); // return

    if p.at_any(&[
        SyntaxKind::NUMBER,
        SyntaxKind::STRING,
        SyntaxKind::IDENT,
        SyntaxKind::L_PAREN,
    ]) {
        expressions::parse_expr(p);
    }

    p.close(m, SyntaxKind::RETURN_STMT);
}

/// `'local' name [':' typename] ['=' expr]`
fn parse_var_decl(p: &mut Parser) {
    tracing::debug!("parser: variable declaration");
    let m = p.open();
    p.advance(); // local

    parse_name(p);

    if p.at(SyntaxKind::COLON) {
        let ann = p.open();
        p.advance(); // :
        p.expect(SyntaxKind::IDENT);
        p.close(ann, SyntaxKind::TYPE_ANNOTATION);
    }

    if p.eat(SyntaxKind::EQ) {
        expressions::parse_expr(p);
    }

    p.close(m, SyntaxKind::VAR_DECL);
}

/// `name '=' expr`
fn parse_assign_stmt(p: &mut Parser) {
    tracing::debug!(target = %p.current_text(), "parser: assignment");
    let m = p.open();

    let target = p.open();
    p.advance(); // identifier
    p.close(target, SyntaxKind::NAME_REF);

    p.advance(); // =
    expressions::parse_expr(p);

    p.close(m, SyntaxKind::ASSIGN_STMT);
}
