//! Type representation for the Lunatico type system.
//!
//! Defines the core `Ty` enum, the primitive `DataType` tags, type
//! variables (`TyVar`), and polymorphic type schemes (`Scheme`). These form
//! the foundation of Hindley-Milner type inference.

use std::fmt;

/// The primitive type tags of the surface language.
///
/// Every AST node ends up annotated with one of these after inference.
/// `Table` exists in the surface vocabulary (declared type names) but is
/// never produced by inference; `Unknown` marks nodes whose type variable
/// was never constrained.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    Nil,
    Number,
    String,
    Boolean,
    Function,
    Table,
    Unknown,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Nil => "nil",
            DataType::Number => "number",
            DataType::String => "string",
            DataType::Boolean => "boolean",
            DataType::Function => "function",
            DataType::Table => "table",
            DataType::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

/// A type variable, identified by a `u32` index into the unification table.
///
/// Type variables are created during inference and unified with concrete
/// types or other variables. The `ena` crate handles the union-find
/// mechanics; binding a variable's value slot is the only way it is ever
/// resolved, and a binding is never cleared.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TyVar(pub u32);

/// A Lunatico type.
///
/// - `Var`: an inference variable (to be resolved by unification)
/// - `Prim`: a primitive type (`nil`, `number`, ...)
/// - `Fun`: a function type in curried form -- exactly one argument and
///   one result; multi-parameter functions are nested `Fun` nodes
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ty {
    Var(TyVar),
    Prim(DataType),
    Fun(Box<Ty>, Box<Ty>),
}

impl Ty {
    /// Create a `nil` type.
    pub fn nil() -> Ty {
        Ty::Prim(DataType::Nil)
    }

    /// Create a `number` type.
    pub fn number() -> Ty {
        Ty::Prim(DataType::Number)
    }

    /// Create a `string` type.
    pub fn string() -> Ty {
        Ty::Prim(DataType::String)
    }

    /// Create a `boolean` type.
    pub fn boolean() -> Ty {
        Ty::Prim(DataType::Boolean)
    }

    /// Create a curried function type.
    pub fn fun(arg: Ty, ret: Ty) -> Ty {
        Ty::Fun(Box::new(arg), Box::new(ret))
    }

    /// The primitive projection used for AST node annotations.
    ///
    /// Resolve the type first; an unresolved variable projects to
    /// `unknown`, a function to `function`.
    pub fn data_type(&self) -> DataType {
        match self {
            Ty::Prim(p) => *p,
            Ty::Fun(..) => DataType::Function,
            Ty::Var(_) => DataType::Unknown,
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Var(v) => write!(f, "?{}", v.0),
            Ty::Prim(p) => write!(f, "{p}"),
            Ty::Fun(arg, ret) => write!(f, "({arg}) -> {ret}"),
        }
    }
}

/// A polymorphic type scheme: a type with universally quantified variables.
///
/// The identity function's scheme is `forall a. a -> a`, represented as
/// `Scheme { vars: [a], ty: Fun(Var(a), Var(a)) }`. Schemes live in the
/// environment; plain types live transiently during inference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scheme {
    /// The quantified (generic) type variables.
    pub vars: Vec<TyVar>,
    /// The underlying type (may reference vars).
    pub ty: Ty,
}

impl Scheme {
    /// Create a monomorphic scheme (no quantified variables).
    pub fn mono(ty: Ty) -> Self {
        Scheme {
            vars: Vec::new(),
            ty,
        }
    }
}

// ── ena trait implementations ──────────────────────────────────────────

impl ena::unify::UnifyKey for TyVar {
    type Value = Option<Ty>;

    fn index(&self) -> u32 {
        self.0
    }

    fn from_index(u: u32) -> Self {
        TyVar(u)
    }

    fn tag() -> &'static str {
        "TyVar"
    }
}

impl ena::unify::EqUnifyValue for Ty {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_projection() {
        assert_eq!(Ty::number().data_type(), DataType::Number);
        assert_eq!(
            Ty::fun(Ty::number(), Ty::nil()).data_type(),
            DataType::Function
        );
        assert_eq!(Ty::Var(TyVar(0)).data_type(), DataType::Unknown);
    }

    #[test]
    fn ty_display() {
        assert_eq!(Ty::number().to_string(), "number");
        assert_eq!(Ty::Var(TyVar(3)).to_string(), "?3");
        assert_eq!(
            Ty::fun(Ty::number(), Ty::fun(Ty::string(), Ty::boolean())).to_string(),
            "(number) -> (string) -> boolean"
        );
    }

    #[test]
    fn mono_scheme_has_no_quantified_vars() {
        let scheme = Scheme::mono(Ty::string());
        assert!(scheme.vars.is_empty());
        assert_eq!(scheme.ty, Ty::string());
    }
}
