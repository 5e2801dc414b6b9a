//! Unification engine for Hindley-Milner type inference.
//!
//! Implements the core unification algorithm using `ena`'s union-find
//! table. A type variable's binding lives in the table's value slot:
//! binding is monotone (a slot is set exactly once, by `unify`) and
//! `resolve` follows chains with ena's path compression. The occurs check
//! rejects infinite types before any binding happens; on failure the
//! error propagates -- there is no rollback discipline.

use ena::unify::InPlaceUnificationTable;
use rustc_hash::FxHashMap;

use crate::error::{ConstraintOrigin, TypeError};
use crate::ty::{Scheme, Ty, TyVar};

/// The inference context -- owns the unification table.
///
/// Packages the otherwise-global mutable state (the fresh-variable counter
/// is ena's key allocator) into one value that is passed through the
/// traversal, keeping the engine re-entrant: two checks never share state.
pub struct InferCtx {
    /// The union-find unification table.
    table: InPlaceUnificationTable<TyVar>,
}

impl InferCtx {
    /// Create a new, empty inference context.
    ///
    /// Variable numbering starts at zero for every context.
    pub fn new() -> Self {
        InferCtx {
            table: InPlaceUnificationTable::new(),
        }
    }

    // ── Type Variable Creation ──────────────────────────────────────────

    /// Create a fresh, unbound type variable.
    pub fn fresh_var(&mut self) -> Ty {
        Ty::Var(self.table.new_key(None))
    }

    /// Number of variables created so far. Strictly increasing for the
    /// lifetime of the context.
    pub fn var_count(&mut self) -> u32 {
        self.table.len() as u32
    }

    // ── Resolution ──────────────────────────────────────────────────────

    /// Resolve a type to its canonical representative.
    ///
    /// A bound variable is replaced by the resolution of its binding;
    /// an unbound variable normalizes to its union-find root so that two
    /// unified-but-unbound variables compare equal. Function types resolve
    /// recursively.
    pub fn resolve(&mut self, ty: Ty) -> Ty {
        match ty {
            Ty::Var(v) => match self.table.probe_value(v) {
                Some(inner) => self.resolve(inner),
                None => Ty::Var(self.table.find(v)),
            },
            Ty::Fun(arg, ret) => {
                let arg = self.resolve(*arg);
                let ret = self.resolve(*ret);
                Ty::fun(arg, ret)
            }
            other => other,
        }
    }

    // ── Occurs Check ────────────────────────────────────────────────────

    /// Check if a type variable occurs anywhere within a type.
    ///
    /// Used exclusively to prevent infinite types like `a ~ (a) -> a`.
    pub fn occurs_in(&mut self, var: TyVar, ty: &Ty) -> bool {
        match ty {
            Ty::Var(v) => {
                if self.table.find(*v) == self.table.find(var) {
                    return true;
                }
                match self.table.probe_value(*v) {
                    Some(inner) => self.occurs_in(var, &inner),
                    None => false,
                }
            }
            Ty::Prim(_) => false,
            Ty::Fun(arg, ret) => self.occurs_in(var, arg) || self.occurs_in(var, ret),
        }
    }

    // ── Unification ─────────────────────────────────────────────────────

    /// Unify two types, making them denote the same type.
    ///
    /// Both types are first resolved through the union-find table, then
    /// structurally compared:
    /// variable/variable unions, variable/type binds (after the occurs
    /// check), primitives compare tags, functions unify argument then
    /// result, and anything else is a shape mismatch.
    pub fn unify(&mut self, a: Ty, b: Ty, origin: ConstraintOrigin) -> Result<(), TypeError> {
        let a = self.resolve(a);
        let b = self.resolve(b);

        match (a, b) {
            // Two identical variables -- already unified.
            (Ty::Var(v1), Ty::Var(v2)) if v1 == v2 => Ok(()),

            // Variable meets variable -- union them.
            (Ty::Var(v1), Ty::Var(v2)) => {
                self.table
                    .unify_var_var(v1, v2)
                    .expect("unifying two unbound vars cannot fail");
                Ok(())
            }

            // Variable meets concrete type -- bind it, occurs check first.
            (Ty::Var(v), ty) | (ty, Ty::Var(v)) => {
                if self.occurs_in(v, &ty) {
                    Err(TypeError::InfiniteType { var: v, ty, origin })
                } else {
                    self.table
                        .unify_var_value(v, Some(ty))
                        .expect("binding an unbound var after the occurs check cannot fail");
                    Ok(())
                }
            }

            // Primitive meets primitive -- tags must match.
            (Ty::Prim(p1), Ty::Prim(p2)) => {
                if p1 == p2 {
                    Ok(())
                } else {
                    Err(TypeError::PrimMismatch {
                        expected: p1,
                        found: p2,
                        origin,
                    })
                }
            }

            // Function meets function -- unify argument, then result.
            (Ty::Fun(a1, r1), Ty::Fun(a2, r2)) => {
                self.unify(*a1, *a2, origin.clone())?;
                self.unify(*r1, *r2, origin)
            }

            // Function vs. primitive: structurally incompatible.
            (a, b) => Err(TypeError::ShapeMismatch {
                expected: a,
                found: b,
                origin,
            }),
        }
    }

    // ── Generalization ──────────────────────────────────────────────────

    /// Generalize a type into a polymorphic scheme.
    ///
    /// Quantifies over ALL free variables of the resolved type, with no
    /// subtraction of variables free in the environment. This diverges
    /// from textbook HM but is sound for this language, where
    /// expression-level bindings never capture outer free type variables.
    pub fn generalize(&mut self, ty: Ty) -> Scheme {
        let resolved = self.resolve(ty);
        let mut vars = Vec::new();
        collect_free_vars(&resolved, &mut vars);
        // Deduplicate while preserving first-appearance order.
        let mut seen = std::collections::HashSet::new();
        vars.retain(|v| seen.insert(*v));
        Scheme { vars, ty: resolved }
    }

    // ── Instantiation ───────────────────────────────────────────────────

    /// Instantiate a polymorphic scheme with fresh type variables.
    ///
    /// Quantified variables are replaced by fresh ones; unquantified
    /// variables are preserved by identity so they keep unifying with the
    /// environment.
    pub fn instantiate(&mut self, scheme: &Scheme) -> Ty {
        if scheme.vars.is_empty() {
            return scheme.ty.clone();
        }

        let substitution: FxHashMap<TyVar, Ty> = scheme
            .vars
            .iter()
            .map(|v| (*v, self.fresh_var()))
            .collect();

        self.apply_substitution(&scheme.ty, &substitution)
    }

    /// Apply a substitution map to a type, resolving through the table so
    /// that scheme bodies whose free variables got bound after
    /// generalization still copy correctly.
    fn apply_substitution(&mut self, ty: &Ty, subst: &FxHashMap<TyVar, Ty>) -> Ty {
        match ty {
            Ty::Var(v) => {
                if let Some(replacement) = subst.get(v) {
                    replacement.clone()
                } else {
                    match self.table.probe_value(*v) {
                        Some(inner) => self.apply_substitution(&inner, subst),
                        None => ty.clone(),
                    }
                }
            }
            Ty::Prim(_) => ty.clone(),
            Ty::Fun(arg, ret) => {
                let arg = self.apply_substitution(arg, subst);
                let ret = self.apply_substitution(ret, subst);
                Ty::fun(arg, ret)
            }
        }
    }
}

impl Default for InferCtx {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect the free type variables of an already-resolved type, in order
/// of first appearance. Primitives contribute nothing.
fn collect_free_vars(ty: &Ty, out: &mut Vec<TyVar>) {
    match ty {
        Ty::Var(v) => out.push(*v),
        Ty::Prim(_) => {}
        Ty::Fun(arg, ret) => {
            collect_free_vars(arg, out);
            collect_free_vars(ret, out);
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────
