//! Inference engine for Lunatico.
//!
//! Walks the typed AST depth-first, generates unification constraints as
//! it goes, and records an inferred type for every visited node in a
//! side table keyed by the node's text range. After a successful walk the
//! table is resolved and projected to primitive [`DataType`] annotations.
//!
//! The walk is fail-fast: the first semantic error aborts the traversal
//! and becomes the single entry of [`TypeckResult::errors`]. Unification
//! is destructive, so there is nothing to roll back.

use rowan::TextRange;
use rustc_hash::FxHashMap;

use luna_parser::ast::expr::{
    BinaryExpr, CallExpr, Expr, Literal, LiteralKind, NameRef, ParenExpr,
};
use luna_parser::ast::stmt::{
    AssignStmt, Block, FnDecl, IfStmt, ReturnStmt, SourceFile, Stmt, VarDecl, WhileStmt,
};
use luna_parser::ast::AstNode;
use luna_parser::Parse;

use crate::env::TypeEnv;
use crate::error::{ConstraintOrigin, TypeError};
use crate::ty::{DataType, Scheme, Ty};
use crate::unify::InferCtx;
use crate::TypeckResult;

/// Type-check a parsed program.
pub fn infer(parse: &Parse) -> TypeckResult {
    let mut walker = Walker {
        ctx: InferCtx::new(),
        env: TypeEnv::new(),
        types: FxHashMap::default(),
    };

    let tree = parse.tree();
    let outcome = walker.infer_source_file(&tree);

    let Walker {
        mut ctx,
        env,
        types,
    } = walker;

    match outcome {
        Ok(result_ty) => {
            let types: FxHashMap<TextRange, DataType> = types
                .into_iter()
                .map(|(range, ty)| (range, ctx.resolve(ty).data_type()))
                .collect();
            TypeckResult {
                types,
                errors: Vec::new(),
                result_type: Some(ctx.resolve(result_ty)),
                bindings: env.into_bindings(),
            }
        }
        Err(err) => TypeckResult {
            types: FxHashMap::default(),
            errors: vec![err],
            result_type: None,
            bindings: env.into_bindings(),
        },
    }
}

/// The traversal state: unification context, environment, and the
/// per-node type table.
struct Walker {
    ctx: InferCtx,
    env: TypeEnv,
    types: FxHashMap<TextRange, Ty>,
}

impl Walker {
    fn record(&mut self, range: TextRange, ty: &Ty) {
        self.types.insert(range, ty.clone());
    }

    // ── Blocks ──────────────────────────────────────────────────────────

    /// The top-level source file is the program's block.
    fn infer_source_file(&mut self, file: &SourceFile) -> Result<Ty, TypeError> {
        let mut last = None;
        for stmt in file.statements() {
            last = Some(self.infer_stmt(&stmt)?);
        }
        let ty = last.unwrap_or_else(Ty::nil);
        // An empty program stays unannotated: its type table entry would
        // claim `nil` for a node nothing was inferred for.
        if file.statements().next().is_some() {
            self.record(file.syntax().text_range(), &ty);
        }
        Ok(ty)
    }

    /// A block yields the type of its last statement, or `nil` if empty.
    fn infer_block(&mut self, block: &Block) -> Result<Ty, TypeError> {
        let mut last = None;
        for stmt in block.statements() {
            last = Some(self.infer_stmt(&stmt)?);
        }
        let ty = last.unwrap_or_else(Ty::nil);
        self.record(block.syntax().text_range(), &ty);
        Ok(ty)
    }

    // ── Statements ──────────────────────────────────────────────────────

    fn infer_stmt(&mut self, stmt: &Stmt) -> Result<Ty, TypeError> {
        match stmt {
            Stmt::IfStmt(node) => self.infer_if(node),
            Stmt::WhileStmt(node) => self.infer_while(node),
            Stmt::FnDecl(node) => self.infer_fn_decl(node),
            Stmt::ReturnStmt(node) => self.infer_return(node),
            Stmt::VarDecl(node) => self.infer_var_decl(node),
            Stmt::AssignStmt(node) => self.infer_assign(node),
            Stmt::CallStmt(node) => self.infer_call(node),
        }
    }

    /// `if`: the condition is boolean; both arms must agree (a missing
    /// `else` arm counts as `nil`); yields the then-arm's type.
    fn infer_if(&mut self, node: &IfStmt) -> Result<Ty, TypeError> {
        let if_span = node.syntax().text_range();

        let (cond_ty, cond_span) = self.infer_opt_expr(node.condition(), if_span)?;
        self.ctx.unify(
            cond_ty,
            Ty::boolean(),
            ConstraintOrigin::Condition { span: cond_span },
        )?;

        let (then_ty, then_span) = match node.then_block() {
            Some(block) => (self.infer_block(&block)?, block.syntax().text_range()),
            None => (Ty::nil(), if_span),
        };
        let (else_ty, else_span) = match node.else_branch() {
            Some(branch) => {
                let span = branch.syntax().text_range();
                match branch.block() {
                    Some(block) => (self.infer_block(&block)?, span),
                    None => (Ty::nil(), span),
                }
            }
            None => (Ty::nil(), if_span),
        };

        self.ctx.unify(
            then_ty.clone(),
            else_ty,
            ConstraintOrigin::IfBranches {
                if_span,
                then_span,
                else_span,
            },
        )?;

        self.record(if_span, &then_ty);
        Ok(then_ty)
    }

    /// `while`: boolean condition, body inferred for effect, yields `nil`.
    fn infer_while(&mut self, node: &WhileStmt) -> Result<Ty, TypeError> {
        let while_span = node.syntax().text_range();

        let (cond_ty, cond_span) = self.infer_opt_expr(node.condition(), while_span)?;
        self.ctx.unify(
            cond_ty,
            Ty::boolean(),
            ConstraintOrigin::Condition { span: cond_span },
        )?;

        if let Some(body) = node.body() {
            self.infer_block(&body)?;
        }

        let ty = Ty::nil();
        self.record(while_span, &ty);
        Ok(ty)
    }

    /// `function f(p1 ... pn) body end`: parameters are bound
    /// monomorphically so uses in the body constrain them; the function
    /// type is the right-fold `p1 -> (p2 -> ... -> body)`; the name is
    /// bound to its generalization.
    fn infer_fn_decl(&mut self, node: &FnDecl) -> Result<Ty, TypeError> {
        let mut param_tys = Vec::new();
        for param in node.params() {
            let ty = self.ctx.fresh_var();
            if let Some(name) = param.name() {
                self.env.insert(name, Scheme::mono(ty.clone()));
            }
            self.record(param.syntax().text_range(), &ty);
            param_tys.push(ty);
        }

        let body_ty = match node.body() {
            Some(body) => self.infer_block(&body)?,
            None => Ty::nil(),
        };

        let mut fun_ty = body_ty;
        for param_ty in param_tys.into_iter().rev() {
            fun_ty = Ty::fun(param_ty, fun_ty);
        }

        if let Some(name) = node.name().and_then(|n| n.text()) {
            let scheme = self.ctx.generalize(fun_ty.clone());
            self.env.insert(name, scheme);
        }

        self.record(node.syntax().text_range(), &fun_ty);
        Ok(fun_ty)
    }

    /// `return [expr]`: yields the expression's type, `nil` without one.
    /// The value flows into the enclosing block's sequencing only; it is
    /// not unified against the function's result position.
    fn infer_return(&mut self, node: &ReturnStmt) -> Result<Ty, TypeError> {
        let ty = match node.value() {
            Some(expr) => self.infer_expr(&expr)?,
            None => Ty::nil(),
        };
        self.record(node.syntax().text_range(), &ty);
        Ok(ty)
    }

    /// `local x [: t] [= e]`: a fresh variable, unified with the
    /// initializer when present, generalized into the environment. The
    /// declared type name is recorded by the parser but not checked here.
    fn infer_var_decl(&mut self, node: &VarDecl) -> Result<Ty, TypeError> {
        let binding_span = node.syntax().text_range();
        let ty = self.ctx.fresh_var();

        if let Some(init) = node.initializer() {
            let init_ty = self.infer_expr(&init)?;
            self.ctx
                .unify(ty.clone(), init_ty, ConstraintOrigin::VarDecl { binding_span })?;
        }

        if let Some(name) = node.name().and_then(|n| n.text()) {
            let scheme = self.ctx.generalize(ty.clone());
            self.env.insert(name, scheme);
        }

        self.record(binding_span, &ty);
        Ok(ty)
    }

    /// `x = e`: the target must already be declared; the value unifies
    /// with a fresh instantiation of the target's scheme; yields the
    /// value's type.
    fn infer_assign(&mut self, node: &AssignStmt) -> Result<Ty, TypeError> {
        let span = node.syntax().text_range();

        let value_ty = match node.value() {
            Some(expr) => self.infer_expr(&expr)?,
            None => self.ctx.fresh_var(),
        };

        let Some(target) = node.target() else {
            self.record(span, &value_ty);
            return Ok(value_ty);
        };
        let lhs_span = target.syntax().text_range();
        let name = target.text().unwrap_or_default();

        let scheme = match self.env.lookup(&name) {
            Some(scheme) => scheme.clone(),
            None => {
                return Err(TypeError::UndeclaredVariable {
                    name,
                    span: lhs_span,
                })
            }
        };
        let var_ty = self.ctx.instantiate(&scheme);

        let rhs_span = node
            .value()
            .map(|e| e.syntax().text_range())
            .unwrap_or(span);
        self.ctx.unify(
            var_ty,
            value_ty.clone(),
            ConstraintOrigin::Assignment { lhs_span, rhs_span },
        )?;

        self.record(lhs_span, &value_ty);
        self.record(span, &value_ty);
        Ok(value_ty)
    }

    // ── Expressions ─────────────────────────────────────────────────────

    fn infer_expr(&mut self, expr: &Expr) -> Result<Ty, TypeError> {
        match expr {
            Expr::Literal(node) => self.infer_literal(node),
            Expr::NameRef(node) => self.infer_name_ref(node),
            Expr::BinaryExpr(node) => self.infer_binary(node),
            Expr::CallExpr(node) => self.infer_call(node),
            Expr::ParenExpr(node) => self.infer_paren(node),
        }
    }

    /// Infer an optional expression, falling back to a fresh variable
    /// (and the fallback span) when the parser produced nothing.
    fn infer_opt_expr(
        &mut self,
        expr: Option<Expr>,
        fallback_span: TextRange,
    ) -> Result<(Ty, TextRange), TypeError> {
        match expr {
            Some(expr) => {
                let span = expr.syntax().text_range();
                Ok((self.infer_expr(&expr)?, span))
            }
            None => Ok((self.ctx.fresh_var(), fallback_span)),
        }
    }

    fn infer_literal(&mut self, node: &Literal) -> Result<Ty, TypeError> {
        let ty = match node.kind() {
            Some(LiteralKind::String) => Ty::string(),
            _ => Ty::number(),
        };
        self.record(node.syntax().text_range(), &ty);
        Ok(ty)
    }

    /// A variable use instantiates its scheme fresh.
    fn infer_name_ref(&mut self, node: &NameRef) -> Result<Ty, TypeError> {
        let span = node.syntax().text_range();
        let name = node.text().unwrap_or_default();

        let scheme = match self.env.lookup(&name) {
            Some(scheme) => scheme.clone(),
            None => return Err(TypeError::UndeclaredVariable { name, span }),
        };
        let ty = self.ctx.instantiate(&scheme);
        self.record(span, &ty);
        Ok(ty)
    }

    /// Arithmetic operators (`+ - * /`) force both sides to `number` and
    /// yield `number`; every other operator unifies its sides and yields
    /// `boolean`.
    fn infer_binary(&mut self, node: &BinaryExpr) -> Result<Ty, TypeError> {
        let span = node.syntax().text_range();
        let op = node.op_text().unwrap_or_default();
        let op_span = node.op().map(|t| t.text_range()).unwrap_or(span);
        let origin = ConstraintOrigin::BinOp { op_span };

        let (lhs_ty, _) = self.infer_opt_expr(node.lhs(), span)?;
        let (rhs_ty, _) = self.infer_opt_expr(node.rhs(), span)?;

        let ty = if matches!(op.as_str(), "+" | "-" | "*" | "/") {
            self.ctx.unify(lhs_ty, Ty::number(), origin.clone())?;
            self.ctx.unify(rhs_ty, Ty::number(), origin)?;
            Ty::number()
        } else {
            self.ctx.unify(lhs_ty, rhs_ty, origin)?;
            Ty::boolean()
        };

        self.record(span, &ty);
        Ok(ty)
    }

    /// A call looks the callee up as a variable, then applies the
    /// arguments left to right: each step unifies the current callee type
    /// with `arg -> result` for a fresh `result`, which becomes the
    /// callee type of the next step.
    fn infer_call(&mut self, node: &CallExpr) -> Result<Ty, TypeError> {
        let call_site = node.syntax().text_range();

        let Some(callee) = node.callee() else {
            let ty = self.ctx.fresh_var();
            self.record(call_site, &ty);
            return Ok(ty);
        };
        let mut fn_ty = self.infer_name_ref(&callee)?;

        for (arg_idx, arg) in node.args().iter().enumerate() {
            let arg_ty = self.infer_expr(arg)?;
            let result = self.ctx.fresh_var();
            self.ctx.unify(
                fn_ty,
                Ty::fun(arg_ty, result.clone()),
                ConstraintOrigin::FnArg { call_site, arg_idx },
            )?;
            fn_ty = result;
        }

        self.record(call_site, &fn_ty);
        Ok(fn_ty)
    }

    /// Grouping parens are transparent to typing.
    fn infer_paren(&mut self, node: &ParenExpr) -> Result<Ty, TypeError> {
        let span = node.syntax().text_range();
        let (ty, _) = self.infer_opt_expr(node.inner(), span)?;
        self.record(span, &ty);
        Ok(ty)
    }
}
