// The term language consumed by the checker. Terms arrive already desugared:
// `if c then a else b` is an application of the builtin `if`, operators are
// applications of named builtins, and grouping parentheses are gone.

pub mod build;
mod show;

#[cfg(any(test, feature = "proptest_support"))]
pub mod arbitrary;


use derive_more::{Debug, From};
use ordered_float::OrderedFloat;
use smol_str::SmolStr;

pub type Name = SmolStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, From)]
pub enum Literal {
    #[debug("Bool({_0})")]
    Bool(bool),
    #[debug("Int({_0})")]
    Integer(i64),
    #[debug("Float({_0})")]
    Float(OrderedFloat<f64>),
    #[debug("Str({_0:?})")]
    String(SmolStr),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    #[debug("{_0:?}")]
    Literal(Literal),

    #[debug("Var({_0})")]
    Var(Name),

    /// `fun param -> body`
    #[debug("Fun({param}, {body:?})")]
    Lambda { param: Name, body: Box<Term> },

    #[debug("App({fun:?} {arg:?})")]
    Apply { fun: Box<Term>, arg: Box<Term> },

    /// Field order is the source order. Names are expected to be unique.
    #[debug("Rcd({_0:?})")]
    Record(Vec<(Name, Term)>),

    /// `recv.field`
    #[debug("Sel({recv:?}, {field})")]
    Select { recv: Box<Term>, field: Name },

    #[debug("Tuple({_0:?})")]
    Tuple(Vec<Term>),

    /// `let [rec] name = rhs in body`
    #[debug("Let({binding:?}, {body:?})")]
    LetIn { binding: Box<Binding>, body: Box<Term> },
}

/// A named right-hand side. Recursive bindings can refer to their own name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[debug("Let({name}, rec: {is_rec}, {rhs:?})")]
pub struct Binding {
    pub name: Name,
    pub is_rec: bool,
    pub rhs: Term,
}

impl Binding {
    pub fn new(name: impl Into<Name>, rhs: Term) -> Self {
        Self {
            name: name.into(),
            is_rec: false,
            rhs,
        }
    }

    pub fn rec(name: impl Into<Name>, rhs: Term) -> Self {
        Self {
            name: name.into(),
            is_rec: true,
            rhs,
        }
    }
}

/// Module level definitions, typed in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[debug("Program({defs:?})")]
pub struct Program {
    pub defs: Vec<Binding>,
}

impl Program {
    pub fn new(defs: impl IntoIterator<Item = Binding>) -> Self {
        Self {
            defs: defs.into_iter().collect(),
        }
    }
}

impl From<Literal> for Term {
    fn from(value: Literal) -> Self {
        Term::Literal(value)
    }
}
