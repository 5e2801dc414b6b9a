//! AST pretty-printer.
//!
//! Renders the typed AST one node per line, two spaces of indentation per
//! level. This is a debugging surface: the driver prints the tree before
//! and after semantic analysis.

use std::fmt::Write;

use crate::ast::expr::{CallExpr, Expr, LiteralKind};
use crate::ast::stmt::{Block, SourceFile, Stmt};

/// Render the whole program. The top-level source file prints as `Block`.
pub fn dump_ast(file: &SourceFile) -> String {
    let mut out = String::new();
    line(&mut out, 0, "Block");
    for stmt in file.statements() {
        dump_stmt(&mut out, &stmt, 1);
    }
    out
}

fn line(out: &mut String, indent: usize, text: &str) {
    for _ in 0..indent {
        out.push_str("  ");
    }
    out.push_str(text);
    out.push('\n');
}

fn dump_block(out: &mut String, block: &Block, indent: usize) {
    line(out, indent, "Block");
    for stmt in block.statements() {
        dump_stmt(out, &stmt, indent + 1);
    }
}

fn dump_stmt(out: &mut String, stmt: &Stmt, indent: usize) {
    match stmt {
        Stmt::IfStmt(node) => {
            line(out, indent, "IfStatement");
            line(out, indent + 1, "Condition:");
            if let Some(cond) = node.condition() {
                dump_expr(out, &cond, indent + 2);
            }
            line(out, indent + 1, "Then:");
            if let Some(block) = node.then_block() {
                dump_block(out, &block, indent + 2);
            }
            if let Some(else_branch) = node.else_branch() {
                line(out, indent + 1, "Else:");
                if let Some(block) = else_branch.block() {
                    dump_block(out, &block, indent + 2);
                }
            }
        }
        Stmt::WhileStmt(node) => {
            line(out, indent, "WhileStatement");
            line(out, indent + 1, "Condition:");
            if let Some(cond) = node.condition() {
                dump_expr(out, &cond, indent + 2);
            }
            line(out, indent + 1, "Body:");
            if let Some(body) = node.body() {
                dump_block(out, &body, indent + 2);
            }
        }
        Stmt::FnDecl(node) => {
            let name = node.name().and_then(|n| n.text()).unwrap_or_default();
            line(out, indent, &format!("FunctionDeclaration({name})"));
            line(out, indent + 1, "Parameters:");
            for param in node.params() {
                let pname = param.name().unwrap_or_default();
                line(out, indent + 2, &format!("Parameter({pname})"));
            }
            line(out, indent + 1, "Body:");
            if let Some(body) = node.body() {
                dump_block(out, &body, indent + 2);
            }
        }
        Stmt::ReturnStmt(node) => {
            line(out, indent, "ReturnStatement");
            if let Some(value) = node.value() {
                dump_expr(out, &value, indent + 1);
            }
        }
        Stmt::VarDecl(node) => {
            let name = node.name().and_then(|n| n.text()).unwrap_or_default();
            let mut label = format!("VariableDeclaration(name: {name}");
            if let Some(ty) = node.type_annotation().and_then(|a| a.type_name()) {
                let _ = write!(label, ", type: {ty}");
            }
            label.push(')');
            line(out, indent, &label);
            if let Some(init) = node.initializer() {
                dump_expr(out, &init, indent + 1);
            }
        }
        Stmt::AssignStmt(node) => {
            line(out, indent, "Assignment");
            if let Some(target) = node.target() {
                let name = target.text().unwrap_or_default();
                line(out, indent + 1, &format!("Variable({name})"));
            }
            if let Some(value) = node.value() {
                dump_expr(out, &value, indent + 1);
            }
        }
        Stmt::CallStmt(node) => {
            dump_call(out, node, indent);
        }
    }
}

fn dump_expr(out: &mut String, expr: &Expr, indent: usize) {
    match expr {
        Expr::Literal(node) => {
            let value = node.value().unwrap_or_default();
            match node.kind() {
                Some(LiteralKind::String) => {
                    line(out, indent, &format!("String(\"{value}\")"));
                }
                _ => line(out, indent, &format!("Number({value})")),
            }
        }
        Expr::NameRef(node) => {
            let name = node.text().unwrap_or_default();
            line(out, indent, &format!("Variable({name})"));
        }
        Expr::BinaryExpr(node) => {
            let op = node.op_text().unwrap_or_default();
            line(out, indent, &format!("BinaryOp({op})"));
            if let Some(lhs) = node.lhs() {
                dump_expr(out, &lhs, indent + 1);
            }
            if let Some(rhs) = node.rhs() {
                dump_expr(out, &rhs, indent + 1);
            }
        }
        Expr::CallExpr(node) => {
            dump_call(out, node, indent);
        }
        // Grouping parens are syntax only; print the inner expression.
        Expr::ParenExpr(node) => {
            if let Some(inner) = node.inner() {
                dump_expr(out, &inner, indent);
            }
        }
    }
}

fn dump_call(out: &mut String, node: &CallExpr, indent: usize) {
    let name = node.callee().and_then(|c| c.text()).unwrap_or_default();
    line(out, indent, &format!("FunctionCall({name})"));
    for arg in node.args() {
        dump_expr(out, &arg, indent + 1);
    }
}
