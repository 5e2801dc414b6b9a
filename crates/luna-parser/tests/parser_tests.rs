//! Integration tests for the Lunatico parser.
//!
//! Structural assertions go through the typed AST views; whole-tree shape
//! checks go through the AST printer with insta inline snapshots.

use luna_parser::ast::expr::{Expr, LiteralKind};
use luna_parser::ast::stmt::Stmt;
use luna_parser::dump::dump_ast;
use luna_parser::parse;

fn dump(source: &str) -> String {
    let parsed = parse(source);
    assert!(
        parsed.ok(),
        "unexpected errors for {source:?}: {:?} / {:?}",
        parsed.errors(),
        parsed.lex_errors()
    );
    dump_ast(&parsed.tree()).trim_end().to_string()
}

// ── Statements ─────────────────────────────────────────────────────────

#[test]
fn empty_source_is_an_empty_block() {
    let parsed = parse("");
    assert!(parsed.ok());
    assert_eq!(parsed.tree().statements().count(), 0);
    insta::assert_snapshot!(dump(""), @"Block");
}

#[test]
fn variable_declaration_with_initializer() {
    insta::assert_snapshot!(dump("local x = 1 + 2"), @r"
    Block
      VariableDeclaration(name: x)
        BinaryOp(+)
          Number(1)
          Number(2)
    ");
}

#[test]
fn variable_declaration_with_type_annotation() {
    insta::assert_snapshot!(dump("local x: number = 10"), @r"
    Block
      VariableDeclaration(name: x, type: number)
        Number(10)
    ");
}

#[test]
fn bare_variable_declaration() {
    insta::assert_snapshot!(dump("local x"), @r"
    Block
      VariableDeclaration(name: x)
    ");
}

#[test]
fn assignment_vs_call_lookahead() {
    let parsed = parse("x = 1; f(2)");
    assert!(parsed.ok());
    let stmts: Vec<Stmt> = parsed.tree().statements().collect();
    assert_eq!(stmts.len(), 2);
    assert!(matches!(stmts[0], Stmt::AssignStmt(_)));
    assert!(matches!(stmts[1], Stmt::CallStmt(_)));
}

#[test]
fn if_with_else() {
    insta::assert_snapshot!(dump("if x == 1 then y = 2 else y = 3 end"), @r"
    Block
      IfStatement
        Condition:
          BinaryOp(==)
            Variable(x)
            Number(1)
        Then:
          Block
            Assignment
              Variable(y)
              Number(2)
        Else:
          Block
            Assignment
              Variable(y)
              Number(3)
    ");
}

#[test]
fn if_without_else_has_no_else_header() {
    let text = dump("if x < 2 then y = 1 end");
    assert!(!text.contains("Else:"));
    assert!(text.contains("Then:"));
}

#[test]
fn while_statement() {
    insta::assert_snapshot!(dump("while n > 0 do n = n - 1 end"), @r"
    Block
      WhileStatement
        Condition:
          BinaryOp(>)
            Variable(n)
            Number(0)
        Body:
          Block
            Assignment
              Variable(n)
              BinaryOp(-)
                Variable(n)
                Number(1)
    ");
}

#[test]
fn function_declaration_and_call() {
    let source = "function add(a, b) return a + b end add(1, 2)";
    insta::assert_snapshot!(dump(source), @r"
    Block
      FunctionDeclaration(add)
        Parameters:
          Parameter(a)
          Parameter(b)
        Body:
          Block
            ReturnStatement
              BinaryOp(+)
                Variable(a)
                Variable(b)
      FunctionCall(add)
        Number(1)
        Number(2)
    ");
}

#[test]
fn return_without_value() {
    insta::assert_snapshot!(dump("function f() return end"), @r"
    Block
      FunctionDeclaration(f)
        Parameters:
        Body:
          Block
            ReturnStatement
    ");
}

#[test]
fn string_literals_unescape_in_dump() {
    insta::assert_snapshot!(dump(r#"s = "olá""#), @r#"
    Block
      Assignment
        Variable(s)
        String("olá")
    "#);
}

#[test]
fn string_escapes_are_processed() {
    let parsed = parse(r#"s = 'a\tb\'c'"#);
    assert!(parsed.ok());
    let Stmt::AssignStmt(assign) = parsed.tree().statements().next().unwrap() else {
        panic!("expected assignment");
    };
    let Some(Expr::Literal(lit)) = assign.value() else {
        panic!("expected literal");
    };
    assert_eq!(lit.value().as_deref(), Some("a\tb'c"));
}

// ── Expressions ────────────────────────────────────────────────────────

#[test]
fn multiplication_binds_tighter_than_addition() {
    insta::assert_snapshot!(dump("x = 1 + 2 * 3"), @r"
    Block
      Assignment
        Variable(x)
        BinaryOp(+)
          Number(1)
          BinaryOp(*)
            Number(2)
            Number(3)
    ");
}

#[test]
fn additive_operators_are_left_associative() {
    insta::assert_snapshot!(dump("x = 1 - 2 - 3"), @r"
    Block
      Assignment
        Variable(x)
        BinaryOp(-)
          BinaryOp(-)
            Number(1)
            Number(2)
          Number(3)
    ");
}

#[test]
fn comparison_binds_loosest() {
    insta::assert_snapshot!(dump("b = 1 + 2 < 3 * 4"), @r"
    Block
      Assignment
        Variable(b)
        BinaryOp(<)
          BinaryOp(+)
            Number(1)
            Number(2)
          BinaryOp(*)
            Number(3)
            Number(4)
    ");
}

#[test]
fn parens_override_precedence_and_stay_transparent() {
    insta::assert_snapshot!(dump("x = (1 + 2) * 3"), @r"
    Block
      Assignment
        Variable(x)
        BinaryOp(*)
          BinaryOp(+)
            Number(1)
            Number(2)
          Number(3)
    ");
}

#[test]
fn call_arguments_can_be_expressions() {
    let parsed = parse("f(1 + 2, g(3), x)");
    assert!(parsed.ok());
    let stmt = parsed.tree().statements().next().unwrap();
    let Stmt::CallStmt(call) = stmt else {
        panic!("expected a call statement");
    };
    assert_eq!(call.callee().and_then(|c| c.text()).as_deref(), Some("f"));
    let args = call.args();
    assert_eq!(args.len(), 3);
    assert!(matches!(args[0], Expr::BinaryExpr(_)));
    assert!(matches!(args[1], Expr::CallExpr(_)));
    assert!(matches!(args[2], Expr::NameRef(_)));
}

#[test]
fn literal_kinds_are_distinguished() {
    let parsed = parse(r#"x = 1 y = "dois""#);
    assert!(parsed.ok());
    let stmts: Vec<Stmt> = parsed.tree().statements().collect();
    let values: Vec<LiteralKind> = stmts
        .iter()
        .map(|s| {
            let Stmt::AssignStmt(a) = s else {
                panic!("expected assignment")
            };
            let Some(Expr::Literal(lit)) = a.value() else {
                panic!("expected literal")
            };
            lit.kind().unwrap()
        })
        .collect();
    assert_eq!(values, vec![LiteralKind::Number, LiteralKind::String]);
}

// ── Errors ─────────────────────────────────────────────────────────────

#[test]
fn missing_then_is_a_token_mismatch() {
    let parsed = parse("if x == 1 y = 2 end");
    assert_eq!(parsed.errors().len(), 1);
    assert_eq!(
        parsed.errors()[0].message,
        "Esperado token THEN_KW, encontrado IDENT ('y')"
    );
}

#[test]
fn unexpected_token_at_statement_start() {
    let parsed = parse("1 + 2");
    assert_eq!(parsed.errors().len(), 1);
    assert_eq!(parsed.errors()[0].message, "Token inesperado '1'");
}

#[test]
fn only_the_first_error_is_reported() {
    // Both operators are unexpected at statement position; the sticky
    // error flag must keep the second one out.
    let parsed = parse("+ -");
    assert_eq!(parsed.errors().len(), 1);
    assert_eq!(parsed.errors()[0].message, "Token inesperado '+'");
}

#[test]
fn lex_errors_surface_through_parse() {
    let parsed = parse("x = @");
    assert!(!parsed.ok());
    assert_eq!(parsed.lex_errors().len(), 1);
}

#[test]
fn missing_end_reports_at_eof() {
    let parsed = parse("while x > 0 do x = x - 1");
    assert_eq!(parsed.errors().len(), 1);
    assert!(parsed.errors()[0].message.starts_with("Esperado token END_KW"));
}
