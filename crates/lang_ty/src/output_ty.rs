use std::fmt;
use std::sync::Arc;

use derive_more::Debug;
use itertools::Itertools;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use crate::PrimitiveTy;

// ==============================================================================
// OutputTy: the user facing representation of an inferred type
// ==============================================================================
//
// Inference works on simple types whose variables carry bounds. Those bounds
// are never shown directly: after simplification they are coalesced into
// unions (positive positions) and intersections (negative positions), and
// cycles through bounds become explicit recursive types.

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OutputTy {
    #[debug("⊤")]
    Top,

    #[debug("⊥")]
    Bottom,

    #[debug("{_0:?}")]
    Primitive(PrimitiveTy),

    /// A type variable, identified by the uid of the inference variable it
    /// came from. Display names are assigned separately.
    #[debug("TyVar({_0:?})")]
    TyVar(u32),

    #[debug("Function({param:?} -> {body:?})")]
    Function { param: TyRef, body: TyRef },

    #[debug("Tuple({_0:?})")]
    Tuple(Vec<TyRef>),

    /// Fields keep the order they were produced in.
    #[debug("Record({_0:?})")]
    Record(Vec<(SmolStr, TyRef)>),

    #[debug("Union({_0:?})")]
    Union(Vec<TyRef>),

    #[debug("Intersection({_0:?})")]
    Intersection(Vec<TyRef>),

    /// `body as binder`: occurrences of `TyVar(binder)` inside `body` stand
    /// for the whole type.
    #[debug("Recursive({binder:?}, {body:?})")]
    Recursive { binder: u32, body: TyRef },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[debug("{_0:?}")]
pub struct TyRef(pub Arc<OutputTy>);

impl From<OutputTy> for TyRef {
    fn from(value: OutputTy) -> Self {
        TyRef(Arc::new(value))
    }
}

impl std::ops::Deref for TyRef {
    type Target = OutputTy;

    fn deref(&self) -> &OutputTy {
        &self.0
    }
}

impl From<PrimitiveTy> for OutputTy {
    fn from(value: PrimitiveTy) -> Self {
        OutputTy::Primitive(value)
    }
}

pub type Substitutions = FxHashMap<u32, u32>;

impl OutputTy {
    pub fn function(param: impl Into<OutputTy>, body: impl Into<OutputTy>) -> Self {
        let param: OutputTy = param.into();
        let body: OutputTy = body.into();
        OutputTy::Function {
            param: param.into(),
            body: body.into(),
        }
    }

    pub fn record<N: Into<SmolStr>>(fields: impl IntoIterator<Item = (N, OutputTy)>) -> Self {
        OutputTy::Record(
            fields
                .into_iter()
                .map(|(name, ty)| -> (SmolStr, TyRef) { (name.into(), ty.into()) })
                .collect(),
        )
    }

    /// Direct children, left to right.
    pub fn children(&self) -> Vec<&TyRef> {
        match self {
            OutputTy::Top | OutputTy::Bottom | OutputTy::Primitive(_) | OutputTy::TyVar(_) => {
                Vec::new()
            }
            OutputTy::Function { param, body } => vec![param, body],
            OutputTy::Tuple(elems) | OutputTy::Union(elems) | OutputTy::Intersection(elems) => {
                elems.iter().collect()
            }
            OutputTy::Record(fields) => fields.iter().map(|(_, ty)| ty).collect(),
            OutputTy::Recursive { body, .. } => vec![body],
        }
    }

    /// Every type variable in depth first order, binders before their bodies.
    /// Duplicates are kept.
    pub fn type_vars_list(&self) -> Vec<u32> {
        let mut out = Vec::new();
        self.collect_type_vars(&mut out);
        out
    }

    fn collect_type_vars(&self, out: &mut Vec<u32>) {
        match self {
            OutputTy::TyVar(x) => out.push(*x),
            OutputTy::Recursive { binder, body } => {
                out.push(*binder);
                body.collect_type_vars(out);
            }
            _ => {
                for child in self.children() {
                    child.collect_type_vars(out);
                }
            }
        }
    }

    /// Distinct type variables in order of first appearance.
    pub fn type_vars(&self) -> Vec<u32> {
        let mut seen = FxHashSet::default();
        self.type_vars_list()
            .into_iter()
            .filter(|x| seen.insert(*x))
            .collect()
    }

    /// Renumber the type variables to `0..n` in order of first appearance.
    pub fn normalize_vars(&self) -> OutputTy {
        let subs: Substitutions = self
            .type_vars()
            .into_iter()
            .enumerate()
            .map(|(i, var)| (var, i as u32))
            .collect();

        self.normalize_inner(&subs)
    }

    pub fn normalize_inner(&self, subs: &Substitutions) -> OutputTy {
        let go = |ty: &TyRef| -> TyRef { ty.normalize_inner(subs).into() };
        let rename = |x: &u32| subs.get(x).copied().unwrap_or(*x);
        match self {
            OutputTy::Top | OutputTy::Bottom | OutputTy::Primitive(_) => self.clone(),
            OutputTy::TyVar(x) => OutputTy::TyVar(rename(x)),
            OutputTy::Function { param, body } => OutputTy::Function {
                param: go(param),
                body: go(body),
            },
            OutputTy::Tuple(elems) => OutputTy::Tuple(elems.iter().map(go).collect()),
            OutputTy::Record(fields) => OutputTy::Record(
                fields
                    .iter()
                    .map(|(name, ty)| (name.clone(), go(ty)))
                    .collect(),
            ),
            OutputTy::Union(members) => OutputTy::Union(members.iter().map(go).collect()),
            OutputTy::Intersection(members) => {
                OutputTy::Intersection(members.iter().map(go).collect())
            }
            OutputTy::Recursive { binder, body } => OutputTy::Recursive {
                binder: rename(binder),
                body: go(body),
            },
        }
    }
}

// ==============================================================================
// Display
// ==============================================================================
//
// Variables are named 'a, 'b, ... in first-encounter order of a depth first
// walk, recursion binders included. Precedences:
//   function      10 (param printed at 11, so `->` is right associative)
//   union ∨       20
//   intersection ∧ 25
//   recursive     body printed at 31, `body as 'x`
// tuple and record children reset to 0.

/// 0 → 'a, 1 → 'b, ..., 25 → 'z, 26 → 'a1, ...
pub fn tyvar_name(idx: usize) -> String {
    let letter = (b'a' + (idx % 26) as u8) as char;
    let suffix = idx / 26;
    if suffix == 0 {
        format!("'{letter}")
    } else {
        format!("'{letter}{suffix}")
    }
}

struct Shown<'a> {
    ty: &'a OutputTy,
    names: &'a FxHashMap<u32, String>,
    prec: u8,
}

impl<'a> Shown<'a> {
    fn child(&self, ty: &'a OutputTy, prec: u8) -> Shown<'a> {
        Shown {
            ty,
            names: self.names,
            prec,
        }
    }

    fn name(&self, var: u32) -> &str {
        self.names.get(&var).map(String::as_str).unwrap_or("'?")
    }

    fn members(
        &self,
        f: &mut fmt::Formatter<'_>,
        members: &'a [TyRef],
        sep: &str,
        prec: u8,
    ) -> fmt::Result {
        let parens = self.prec > prec;
        if parens {
            write!(f, "(")?;
        }
        write!(
            f,
            "{}",
            members.iter().map(|m| self.child(m, prec)).join(sep)
        )?;
        if parens {
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl fmt::Display for Shown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            OutputTy::Top => write!(f, "⊤"),
            OutputTy::Bottom => write!(f, "⊥"),
            OutputTy::Primitive(p) => write!(f, "{p}"),
            OutputTy::TyVar(x) => write!(f, "{}", self.name(*x)),
            OutputTy::Recursive { binder, body } => {
                write!(f, "{} as {}", self.child(body, 31), self.name(*binder))
            }
            OutputTy::Function { param, body } => {
                let parens = self.prec > 10;
                if parens {
                    write!(f, "(")?;
                }
                write!(f, "{} -> {}", self.child(param, 11), self.child(body, 10))?;
                if parens {
                    write!(f, ")")?;
                }
                Ok(())
            }
            OutputTy::Tuple(elems) => write!(
                f,
                "({})",
                elems.iter().map(|e| self.child(e, 0)).join(", ")
            ),
            OutputTy::Record(fields) => write!(
                f,
                "{{{}}}",
                fields
                    .iter()
                    .map(|(name, ty)| format!("{name}: {}", self.child(ty, 0)))
                    .join(", ")
            ),
            OutputTy::Union(members) => self.members(f, members, " ∨ ", 20),
            OutputTy::Intersection(members) => self.members(f, members, " ∧ ", 25),
        }
    }
}

impl fmt::Display for OutputTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: FxHashMap<u32, String> = self
            .type_vars()
            .into_iter()
            .enumerate()
            .map(|(i, var)| (var, tyvar_name(i)))
            .collect();

        write!(
            f,
            "{}",
            Shown {
                ty: self,
                names: &names,
                prec: 0,
            }
        )
    }
}

impl fmt::Display for TyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}
