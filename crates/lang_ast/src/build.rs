//! Small constructors for writing terms by hand, mostly in tests and
//! by front ends that lower their own syntax trees.

use crate::{Binding, Literal, Name, Term};

pub fn bool_lit(value: bool) -> Term {
    Literal::Bool(value).into()
}

pub fn int(value: i64) -> Term {
    Literal::Integer(value).into()
}

pub fn float(value: f64) -> Term {
    Literal::Float(value.into()).into()
}

pub fn string(value: impl Into<Name>) -> Term {
    Literal::String(value.into()).into()
}

pub fn var(name: impl Into<Name>) -> Term {
    Term::Var(name.into())
}

pub fn lam(param: impl Into<Name>, body: Term) -> Term {
    Term::Lambda {
        param: param.into(),
        body: Box::new(body),
    }
}

/// `fun a -> fun b -> ... -> body`
pub fn lam_n<N: Into<Name>>(params: impl IntoIterator<Item = N>, body: Term) -> Term {
    let params: Vec<Name> = params.into_iter().map(Into::into).collect();
    params
        .into_iter()
        .rev()
        .fold(body, |body, param| lam(param, body))
}

pub fn app(fun: Term, arg: Term) -> Term {
    Term::Apply {
        fun: Box::new(fun),
        arg: Box::new(arg),
    }
}

/// Left nested application: `f a b c`.
pub fn app_n(fun: Term, args: impl IntoIterator<Item = Term>) -> Term {
    args.into_iter().fold(fun, app)
}

pub fn rcd<N: Into<Name>>(fields: impl IntoIterator<Item = (N, Term)>) -> Term {
    Term::Record(
        fields
            .into_iter()
            .map(|(name, term)| (name.into(), term))
            .collect(),
    )
}

pub fn sel(recv: Term, field: impl Into<Name>) -> Term {
    Term::Select {
        recv: Box::new(recv),
        field: field.into(),
    }
}

pub fn tup(elems: impl IntoIterator<Item = Term>) -> Term {
    Term::Tuple(elems.into_iter().collect())
}

pub fn let_in(name: impl Into<Name>, rhs: Term, body: Term) -> Term {
    Term::LetIn {
        binding: Box::new(Binding::new(name, rhs)),
        body: Box::new(body),
    }
}

pub fn let_rec(name: impl Into<Name>, rhs: Term, body: Term) -> Term {
    Term::LetIn {
        binding: Box::new(Binding::rec(name, rhs)),
        body: Box::new(body),
    }
}

/// `if cond then then_branch else else_branch`, desugared into the builtin.
pub fn if_then_else(cond: Term, then_branch: Term, else_branch: Term) -> Term {
    app_n(var("if"), [cond, then_branch, else_branch])
}
