//! Lunatico type checker: Hindley-Milner type inference.
//!
//! Walks the parser's typed AST, assigns a type to every node (resolving
//! unknowns through first-order unification), generalizes declarations
//! into polymorphic schemes, and instantiates them fresh at every use.
//!
//! # Architecture
//!
//! - [`ty`]: core type representation (DataType, Ty, TyVar, Scheme)
//! - [`unify`]: unification engine with occurs check, generalization,
//!   and scheme instantiation over an `ena` union-find table
//! - [`env`]: append-only type environment with newest-first lookup
//! - [`error`]: semantic error types with constraint provenance
//! - [`infer`]: the AST walker
//! - [`diagnostics`]: ariadne rendering for the driver

pub mod diagnostics;
pub mod env;
pub mod error;
pub mod infer;
pub mod ty;
pub mod unify;

use rowan::TextRange;
use rustc_hash::FxHashMap;

use crate::error::TypeError;
use crate::ty::{DataType, Scheme, Ty};

/// The result of type checking a program.
///
/// On success, `types` maps every visited node's text range to its
/// resolved primitive annotation and `result_type` holds the program
/// block's type. On failure, `errors` holds the first (and only) semantic
/// error -- checking is fail-fast.
pub struct TypeckResult {
    /// Map from node text ranges to their resolved annotations.
    pub types: FxHashMap<TextRange, DataType>,
    /// Semantic errors (at most one).
    pub errors: Vec<TypeError>,
    /// The resolved type of the program's top-level block.
    pub result_type: Option<Ty>,
    /// The final environment, in insertion order (shadowed entries kept).
    pub bindings: Vec<(String, Scheme)>,
}

impl TypeckResult {
    /// Whether checking succeeded.
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// The resolved annotation recorded for the given node range.
    pub fn data_type_at(&self, range: TextRange) -> Option<DataType> {
        self.types.get(&range).copied()
    }

    /// The newest scheme bound to `name`, if any.
    pub fn binding(&self, name: &str) -> Option<&Scheme> {
        self.bindings
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, scheme)| scheme)
    }
}

/// Type-check a parsed program.
///
/// This is the main entry point for the type checker. Every call uses a
/// fresh inference context: variable numbering restarts at zero.
pub fn check(parse: &luna_parser::Parse) -> TypeckResult {
    infer::infer(parse)
}
