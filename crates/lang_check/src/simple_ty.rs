// ==============================================================================
// SimpleType: the internal inferred type
// ==============================================================================
//
// Structural nodes are immutable and shared behind `Rc`; two structural types
// are "the same object" only when they share an allocation. Variables are
// handles into the session's arena and carry their creation level so the
// level of any type can be computed without touching the arena.

use std::{cell::OnceCell, fmt, rc::Rc};

use derive_more::{Debug, From};
use itertools::Itertools;
use la_arena::Idx;
use lang_ast::Name;
use lang_ty::PrimitiveTy;

use crate::type_table::VarState;

/// Handle to a type variable owned by a [`crate::Typer`] session.
///
/// Identity and ordering follow the uid, which is the variable's index in
/// the session arena.
#[derive(Clone, Copy)]
pub struct TyVar {
    pub(crate) id: Idx<VarState>,
    pub(crate) level: u32,
}

impl TyVar {
    pub fn uid(self) -> u32 {
        u32::from(self.id.into_raw())
    }

    pub fn level(self) -> u32 {
        self.level
    }
}

impl PartialEq for TyVar {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TyVar {}

impl std::hash::Hash for TyVar {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.uid().hash(state);
    }
}

impl PartialOrd for TyVar {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TyVar {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.uid().cmp(&other.uid())
    }
}

impl fmt::Debug for TyVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "α{}", self.uid())
    }
}

impl fmt::Display for TyVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "α{}{}", self.uid(), "'".repeat(self.level as usize))
    }
}

#[derive(Debug, Clone)]
pub enum SimpleType {
    #[debug("{_0:?}")]
    Primitive(PrimitiveTy),
    #[debug("{_0:?}")]
    Variable(TyVar),
    #[debug("{_0:?}")]
    Function(Rc<FunctionTy>),
    #[debug("{_0:?}")]
    Tuple(Rc<TupleTy>),
    #[debug("{_0:?}")]
    Record(Rc<RecordTy>),
}

#[derive(Debug)]
#[debug("({lhs:?} -> {rhs:?})")]
pub struct FunctionTy {
    pub lhs: SimpleType,
    pub rhs: SimpleType,
    level: u32,
    hash: OnceCell<String>,
}

#[derive(Debug)]
#[debug("{elems:?}")]
pub struct TupleTy {
    pub elems: Vec<SimpleType>,
    level: u32,
    hash: OnceCell<String>,
}

#[derive(Debug)]
#[debug("{fields:?}")]
pub struct RecordTy {
    pub fields: Vec<(Name, SimpleType)>,
    level: u32,
    hash: OnceCell<String>,
}

impl From<PrimitiveTy> for SimpleType {
    fn from(value: PrimitiveTy) -> Self {
        SimpleType::Primitive(value)
    }
}

impl From<TyVar> for SimpleType {
    fn from(value: TyVar) -> Self {
        SimpleType::Variable(value)
    }
}

impl RecordTy {
    pub fn field(&self, name: &str) -> Option<&SimpleType> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, ty)| ty)
    }
}

impl SimpleType {
    pub fn function(lhs: SimpleType, rhs: SimpleType) -> Self {
        let level = lhs.level().max(rhs.level());
        SimpleType::Function(Rc::new(FunctionTy {
            lhs,
            rhs,
            level,
            hash: OnceCell::new(),
        }))
    }

    /// `a -> b -> ... -> ret`
    pub fn function_n(params: impl IntoIterator<Item = SimpleType>, ret: SimpleType) -> Self {
        let params: Vec<_> = params.into_iter().collect();
        params
            .into_iter()
            .rev()
            .fold(ret, |ret, param| SimpleType::function(param, ret))
    }

    pub fn tuple(elems: Vec<SimpleType>) -> Self {
        let level = elems.iter().map(SimpleType::level).max().unwrap_or(0);
        SimpleType::Tuple(Rc::new(TupleTy {
            elems,
            level,
            hash: OnceCell::new(),
        }))
    }

    pub fn record(fields: Vec<(Name, SimpleType)>) -> Self {
        let level = fields.iter().map(|(_, ty)| ty.level()).max().unwrap_or(0);
        SimpleType::Record(Rc::new(RecordTy {
            fields,
            level,
            hash: OnceCell::new(),
        }))
    }

    pub fn level(&self) -> u32 {
        match self {
            SimpleType::Primitive(_) => 0,
            SimpleType::Variable(var) => var.level,
            SimpleType::Function(fun) => fun.level,
            SimpleType::Tuple(tup) => tup.level,
            SimpleType::Record(rcd) => rcd.level,
        }
    }

    pub fn as_var(&self) -> Option<TyVar> {
        match self {
            SimpleType::Variable(var) => Some(*var),
            _ => None,
        }
    }

    /// Primitives compare by value, variables by uid and structural types by
    /// allocation.
    pub fn same_object(&self, other: &SimpleType) -> bool {
        match (self, other) {
            (SimpleType::Primitive(a), SimpleType::Primitive(b)) => a == b,
            (SimpleType::Variable(a), SimpleType::Variable(b)) => a == b,
            (SimpleType::Function(a), SimpleType::Function(b)) => Rc::ptr_eq(a, b),
            (SimpleType::Tuple(a), SimpleType::Tuple(b)) => Rc::ptr_eq(a, b),
            (SimpleType::Record(a), SimpleType::Record(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Structural key used to memoize constraint edges. Independent of the
    /// bounds a variable has accumulated.
    pub fn hash_key(&self) -> String {
        match self {
            SimpleType::Primitive(prim) => prim.name().to_string(),
            SimpleType::Variable(var) => format!("var_{}", var.uid()),
            SimpleType::Function(fun) => fun
                .hash
                .get_or_init(|| {
                    format!(
                        "[{}]fun {} -> {}",
                        fun.level,
                        fun.lhs.hash_key(),
                        fun.rhs.hash_key()
                    )
                })
                .clone(),
            SimpleType::Tuple(tup) => tup
                .hash
                .get_or_init(|| {
                    format!(
                        "[{}]({})",
                        tup.level,
                        tup.elems.iter().map(SimpleType::hash_key).join(", ")
                    )
                })
                .clone(),
            SimpleType::Record(rcd) => rcd
                .hash
                .get_or_init(|| {
                    format!(
                        "[{}]{{{}}}",
                        rcd.level,
                        rcd.fields
                            .iter()
                            .map(|(name, ty)| format!("{name}: {}", ty.hash_key()))
                            .join(", ")
                    )
                })
                .clone(),
        }
    }
}

/// Raw rendering: variables as `α<uid>` with one `'` per level.
impl fmt::Display for SimpleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimpleType::Primitive(prim) => write!(f, "{prim}"),
            SimpleType::Variable(var) => write!(f, "{var}"),
            SimpleType::Function(fun) => write!(f, "({} -> {})", fun.lhs, fun.rhs),
            SimpleType::Tuple(tup) => write!(f, "({})", tup.elems.iter().join(", ")),
            SimpleType::Record(rcd) => write!(
                f,
                "{{{}}}",
                rcd.fields
                    .iter()
                    .map(|(name, ty)| format!("{name}: {ty}"))
                    .join(", ")
            ),
        }
    }
}

/// A let-bound type: variables in `body` above `level` are quantified.
#[derive(Debug, Clone)]
#[debug("Poly({level}, {body:?})")]
pub struct PolyType {
    pub level: u32,
    pub body: SimpleType,
}

impl PolyType {
    pub fn new(level: u32, body: SimpleType) -> Self {
        Self { level, body }
    }
}

#[derive(Debug, Clone, From)]
pub enum TypeScheme {
    #[debug("{_0:?}")]
    Simple(SimpleType),
    #[debug("{_0:?}")]
    Poly(PolyType),
}

impl From<PrimitiveTy> for TypeScheme {
    fn from(value: PrimitiveTy) -> Self {
        TypeScheme::Simple(value.into())
    }
}

impl From<TyVar> for TypeScheme {
    fn from(value: TyVar) -> Self {
        TypeScheme::Simple(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_levels_take_the_max_child() {
        let int: SimpleType = PrimitiveTy::Int.into();
        assert_eq!(SimpleType::tuple(vec![]).level(), 0);
        assert_eq!(SimpleType::record(vec![]).level(), 0);
        assert_eq!(SimpleType::function(int.clone(), int.clone()).level(), 0);
    }

    #[test]
    fn hash_ignores_allocation() {
        let int: SimpleType = PrimitiveTy::Int.into();
        let a = SimpleType::function(int.clone(), PrimitiveTy::Bool.into());
        let b = SimpleType::function(int, PrimitiveTy::Bool.into());
        assert!(!a.same_object(&b));
        assert_eq!(a.hash_key(), b.hash_key());
        assert_eq!(a.hash_key(), "[0]fun int -> bool");
    }

    #[test]
    fn record_rendering_keeps_field_order() {
        let rcd = SimpleType::record(vec![
            ("thing".into(), PrimitiveTy::Int.into()),
            ("self".into(), PrimitiveTy::Bool.into()),
        ]);
        assert_eq!(rcd.to_string(), "{thing: int, self: bool}");
        assert_eq!(rcd.hash_key(), "[0]{thing: int, self: bool}");
    }
}
