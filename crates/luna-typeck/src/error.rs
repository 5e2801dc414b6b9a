//! Type error types with provenance tracking.
//!
//! Every unification error carries a `ConstraintOrigin` recording where the
//! constraint came from, so diagnostics can point at the offending source
//! span even though the error messages themselves are fixed sentences.

use std::fmt;

use rowan::TextRange;

use crate::ty::{DataType, Ty, TyVar};

/// The origin of a type constraint -- where in the source did we decide
/// these two types should be equal?
#[derive(Clone, Debug)]
pub enum ConstraintOrigin {
    /// A binary operator: `a + b` forces both sides to `number`,
    /// `a == b` forces both sides equal.
    BinOp { op_span: TextRange },
    /// An `if`/`while` condition must be `boolean`.
    Condition { span: TextRange },
    /// The two arms of an `if` must agree.
    IfBranches {
        if_span: TextRange,
        then_span: TextRange,
        else_span: TextRange,
    },
    /// An assignment: the value must match the variable's type.
    Assignment {
        lhs_span: TextRange,
        rhs_span: TextRange,
    },
    /// A `local` declaration with an initializer.
    VarDecl { binding_span: TextRange },
    /// A call argument applied to the callee's type.
    FnArg {
        call_site: TextRange,
        arg_idx: usize,
    },
    /// Synthetic origin for constraints with no single source location.
    Builtin,
}

impl ConstraintOrigin {
    /// The primary source span of the constraint, if it has one.
    pub fn primary_span(&self) -> Option<TextRange> {
        match self {
            ConstraintOrigin::BinOp { op_span } => Some(*op_span),
            ConstraintOrigin::Condition { span } => Some(*span),
            ConstraintOrigin::IfBranches { if_span, .. } => Some(*if_span),
            ConstraintOrigin::Assignment { lhs_span, .. } => Some(*lhs_span),
            ConstraintOrigin::VarDecl { binding_span } => Some(*binding_span),
            ConstraintOrigin::FnArg { call_site, .. } => Some(*call_site),
            ConstraintOrigin::Builtin => None,
        }
    }
}

/// A semantic error found during type checking.
///
/// The Display text is the user-facing message; labels and spans are
/// layered on top by the diagnostics renderer.
#[derive(Clone, Debug)]
pub enum TypeError {
    /// A variable was referenced (or assigned) without being declared.
    UndeclaredVariable { name: String, span: TextRange },
    /// A type variable appears in the type it is being bound to.
    ///
    /// Binding it would build the infinite type
    /// `((((...) -> t) -> t) -> t`.
    InfiniteType {
        var: TyVar,
        ty: Ty,
        origin: ConstraintOrigin,
    },
    /// Two primitive types with different tags.
    PrimMismatch {
        expected: DataType,
        found: DataType,
        origin: ConstraintOrigin,
    },
    /// Structurally incompatible types (function vs. primitive).
    ShapeMismatch {
        expected: Ty,
        found: Ty,
        origin: ConstraintOrigin,
    },
}

impl TypeError {
    /// The span diagnostics should anchor on, if any.
    pub fn primary_span(&self) -> Option<TextRange> {
        match self {
            TypeError::UndeclaredVariable { span, .. } => Some(*span),
            TypeError::InfiniteType { origin, .. }
            | TypeError::PrimMismatch { origin, .. }
            | TypeError::ShapeMismatch { origin, .. } => origin.primary_span(),
        }
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeError::UndeclaredVariable { name, .. } => {
                write!(f, "Erro: variável '{name}' não declarada.")
            }
            TypeError::InfiniteType { .. } => {
                write!(f, "Erro: ocorrência circular em unificação.")
            }
            TypeError::PrimMismatch { .. } => {
                write!(f, "Erro: tipos primitivos incompatíveis.")
            }
            TypeError::ShapeMismatch { .. } => {
                write!(f, "Erro: unificação de tipos incompatíveis.")
            }
        }
    }
}

impl std::error::Error for TypeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_the_message_catalogue() {
        let span = TextRange::new(0.into(), 1.into());
        assert_eq!(
            TypeError::UndeclaredVariable {
                name: "z".into(),
                span,
            }
            .to_string(),
            "Erro: variável 'z' não declarada."
        );
        assert_eq!(
            TypeError::InfiniteType {
                var: TyVar(0),
                ty: Ty::number(),
                origin: ConstraintOrigin::Builtin,
            }
            .to_string(),
            "Erro: ocorrência circular em unificação."
        );
        assert_eq!(
            TypeError::PrimMismatch {
                expected: DataType::Number,
                found: DataType::String,
                origin: ConstraintOrigin::Builtin,
            }
            .to_string(),
            "Erro: tipos primitivos incompatíveis."
        );
        assert_eq!(
            TypeError::ShapeMismatch {
                expected: Ty::fun(Ty::number(), Ty::number()),
                found: Ty::number(),
                origin: ConstraintOrigin::Builtin,
            }
            .to_string(),
            "Erro: unificação de tipos incompatíveis."
        );
    }
}
