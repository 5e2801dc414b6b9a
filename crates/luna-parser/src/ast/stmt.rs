//! Typed AST nodes for statements and declarations.
//!
//! Covers: SourceFile, Block, IfStmt, ElseBranch, WhileStmt, FnDecl,
//! ParamList, Param, ReturnStmt, VarDecl, TypeAnnotation, AssignStmt,
//! and the Stmt dispatch enum.

use crate::ast::expr::{CallExpr, Expr, NameRef};
use crate::ast::{ast_node, child_node, child_nodes, child_token, AstNode};
use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

// ── Source File ──────────────────────────────────────────────────────────

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    /// All top-level statements. The source file IS the program's
    /// top-level block.
    pub fn statements(&self) -> impl Iterator<Item = Stmt> + '_ {
        self.syntax.children().filter_map(Stmt::cast)
    }
}

// ── Stmt enum ────────────────────────────────────────────────────────────

/// Any statement node.
#[derive(Debug, Clone)]
pub enum Stmt {
    IfStmt(IfStmt),
    WhileStmt(WhileStmt),
    FnDecl(FnDecl),
    ReturnStmt(ReturnStmt),
    VarDecl(VarDecl),
    AssignStmt(AssignStmt),
    /// A function call in statement position.
    CallStmt(CallExpr),
}

impl Stmt {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::IF_STMT => Some(Stmt::IfStmt(IfStmt { syntax: node })),
            SyntaxKind::WHILE_STMT => Some(Stmt::WhileStmt(WhileStmt { syntax: node })),
            SyntaxKind::FN_DECL => Some(Stmt::FnDecl(FnDecl { syntax: node })),
            SyntaxKind::RETURN_STMT => Some(Stmt::ReturnStmt(ReturnStmt { syntax: node })),
            SyntaxKind::VAR_DECL => Some(Stmt::VarDecl(VarDecl { syntax: node })),
            SyntaxKind::ASSIGN_STMT => Some(Stmt::AssignStmt(AssignStmt { syntax: node })),
            SyntaxKind::CALL_EXPR => CallExpr::cast(node).map(Stmt::CallStmt),
            _ => None,
        }
    }

    /// Access the underlying syntax node regardless of variant.
    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Stmt::IfStmt(n) => &n.syntax,
            Stmt::WhileStmt(n) => &n.syntax,
            Stmt::FnDecl(n) => &n.syntax,
            Stmt::ReturnStmt(n) => &n.syntax,
            Stmt::VarDecl(n) => &n.syntax,
            Stmt::AssignStmt(n) => &n.syntax,
            Stmt::CallStmt(n) => AstNode::syntax(n),
        }
    }
}

// ── Block ────────────────────────────────────────────────────────────────

ast_node!(Block, BLOCK);

impl Block {
    /// All statements in the block, in order.
    pub fn statements(&self) -> impl Iterator<Item = Stmt> + '_ {
        self.syntax.children().filter_map(Stmt::cast)
    }
}

// ── If Statement ─────────────────────────────────────────────────────────

ast_node!(IfStmt, IF_STMT);

impl IfStmt {
    /// The condition expression.
    pub fn condition(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    /// The `then` block.
    pub fn then_block(&self) -> Option<Block> {
        child_node(&self.syntax)
    }

    /// The `else` arm, if present.
    pub fn else_branch(&self) -> Option<ElseBranch> {
        child_node(&self.syntax)
    }
}

ast_node!(ElseBranch, ELSE_BRANCH);

impl ElseBranch {
    /// The block of the `else` arm.
    pub fn block(&self) -> Option<Block> {
        child_node(&self.syntax)
    }
}

// ── While Statement ──────────────────────────────────────────────────────

ast_node!(WhileStmt, WHILE_STMT);

impl WhileStmt {
    /// The loop condition.
    pub fn condition(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    /// The loop body.
    pub fn body(&self) -> Option<Block> {
        child_node(&self.syntax)
    }
}

// ── Function Declaration ─────────────────────────────────────────────────

ast_node!(FnDecl, FN_DECL);

impl FnDecl {
    /// The function name.
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    /// The parameter list.
    pub fn param_list(&self) -> Option<ParamList> {
        child_node(&self.syntax)
    }

    /// All parameters, in order.
    pub fn params(&self) -> Vec<Param> {
        self.param_list()
            .map(|list| list.params().collect())
            .unwrap_or_default()
    }

    /// The function body.
    pub fn body(&self) -> Option<Block> {
        child_node(&self.syntax)
    }
}

ast_node!(ParamList, PARAM_LIST);

impl ParamList {
    /// All parameters in the list.
    pub fn params(&self) -> impl Iterator<Item = Param> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(Param, PARAM);

impl Param {
    /// The parameter name token.
    pub fn name_token(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::IDENT)
    }

    /// The parameter name text.
    pub fn name(&self) -> Option<String> {
        self.name_token().map(|t| t.text().to_string())
    }
}

// ── Name (definition position) ───────────────────────────────────────────

ast_node!(Name, NAME);

impl Name {
    /// The identifier text.
    pub fn text(&self) -> Option<String> {
        child_token(&self.syntax, SyntaxKind::IDENT).map(|t| t.text().to_string())
    }
}

// ── Return Statement ─────────────────────────────────────────────────────

ast_node!(ReturnStmt, RETURN_STMT);

impl ReturnStmt {
    /// The returned expression, if any.
    pub fn value(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

// ── Variable Declaration ─────────────────────────────────────────────────

ast_node!(VarDecl, VAR_DECL);

impl VarDecl {
    /// The declared name.
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    /// The declared type annotation, if present. Recorded but not checked
    /// against the initializer's inferred type.
    pub fn type_annotation(&self) -> Option<TypeAnnotation> {
        child_node(&self.syntax)
    }

    /// The initializer expression, if present.
    pub fn initializer(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

ast_node!(TypeAnnotation, TYPE_ANNOTATION);

impl TypeAnnotation {
    /// The declared type name.
    pub fn type_name(&self) -> Option<String> {
        child_token(&self.syntax, SyntaxKind::IDENT).map(|t| t.text().to_string())
    }
}

// ── Assignment ───────────────────────────────────────────────────────────

ast_node!(AssignStmt, ASSIGN_STMT);

impl AssignStmt {
    /// The assignment target (always a plain variable).
    pub fn target(&self) -> Option<NameRef> {
        child_node(&self.syntax)
    }

    /// The assigned expression.
    ///
    /// The target NAME_REF is also Expr-castable, so the value is the
    /// second castable child.
    pub fn value(&self) -> Option<Expr> {
        self.syntax.children().filter_map(Expr::cast).nth(1)
    }
}
