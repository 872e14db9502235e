mod builtins;
mod canonicalize;
mod coalesce;
mod compact;
mod constrain;
mod env;
mod infer;
mod infer_expr;
mod show;
mod simple_ty;
mod simplify;
pub(crate) mod type_table;


#[cfg(test)]
mod pbt;

pub use compact::{merge, CompactType, CompactTypeScheme};
pub use env::Env;
pub use simple_ty::{FunctionTy, PolyType, RecordTy, SimpleType, TupleTy, TyVar, TypeScheme};

use lang_ast::Name;
use thiserror::Error;
use type_table::TypeTable;

/// Every way inference can fail. The rendered types are produced when the
/// error is raised, each side named independently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("cannot constrain {lhs} <: {rhs}")]
    CannotConstrain { lhs: String, rhs: String },

    #[error("missing field: {field} in {record}")]
    MissingField { field: Name, record: String },

    #[error("identifier not found: {0}")]
    IdentifierNotFound(Name),
}

/// One inference session. Owns the fresh variable counter and every variable
/// created while typing; sessions never share state.
#[derive(Debug, Clone, Default)]
pub struct Typer {
    pub(crate) table: TypeTable,
}

impl Typer {
    pub fn new() -> Self {
        Self {
            table: TypeTable::new(),
        }
    }

    pub fn fresh_var(&mut self, level: u32) -> SimpleType {
        self.table.fresh_var(level).into()
    }

    pub(crate) fn fresh_ty_var(&mut self, level: u32) -> TyVar {
        self.table.fresh_var(level)
    }

    pub fn lower_bounds(&self, var: TyVar) -> &[SimpleType] {
        self.table.lower_bounds(var)
    }

    pub fn upper_bounds(&self, var: TyVar) -> &[SimpleType] {
        self.table.upper_bounds(var)
    }

    /// Number of variables allocated by this session.
    pub fn var_count(&self) -> usize {
        self.table.len()
    }
}
