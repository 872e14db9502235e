// ==============================================================================
// CompactType: one layer of a type with all co-occurring parts grouped
// ==============================================================================
//
// A compact type is read as a union in positive position and as an
// intersection in negative position; the polarity always comes from the
// traversal, never from the node. Variables are kept sorted by uid and
// primitives by name so the rendering and the structural hash are stable.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use itertools::Itertools;
use lang_ast::Name;
use lang_ty::PrimitiveTy;

use crate::TyVar;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompactType {
    pub vars: BTreeSet<TyVar>,
    pub prims: BTreeSet<PrimitiveTy>,
    pub tuple: Option<Vec<CompactType>>,
    pub record: Option<BTreeMap<Name, CompactType>>,
    pub function: Option<Box<(CompactType, CompactType)>>,
    /// Set when a union met parts with no common supertype, such as tuples
    /// of different arity. The whole union then reads as `⊤`.
    pub top: bool,
}

/// A compact term plus the bodies of the variables introduced to break
/// cycles in it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompactTypeScheme {
    pub term: CompactType,
    pub rec_vars: BTreeMap<TyVar, CompactType>,
}

impl CompactType {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_var(var: TyVar) -> Self {
        Self {
            vars: BTreeSet::from([var]),
            ..Self::default()
        }
    }

    pub fn from_prim(prim: PrimitiveTy) -> Self {
        Self {
            prims: BTreeSet::from([prim]),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
            && self.prims.is_empty()
            && self.tuple.is_none()
            && self.record.is_none()
            && self.function.is_none()
            && !self.top
    }

    /// Structural key, used to notice when a traversal re-enters a type it
    /// is already expanding. An empty record contributes nothing.
    pub fn hash_key(&self) -> String {
        let vars = self.vars.iter().map(|var| var.uid().to_string());
        let prims = self.prims.iter().map(|prim| prim.name().to_string());

        let record = self
            .record
            .as_ref()
            .filter(|fields| !fields.is_empty())
            .map(|fields| {
                format!(
                    "{{{}}}",
                    fields
                        .iter()
                        .map(|(name, field)| format!("{name}: {}", field.hash_key()))
                        .join(", ")
                )
            });
        let tuple = self
            .tuple
            .as_ref()
            .map(|elems| format!("({})", elems.iter().map(CompactType::hash_key).join(", ")));
        let function = self
            .function
            .as_ref()
            .map(|fun| format!("{} -> {}", fun.0.hash_key(), fun.1.hash_key()));

        format!(
            "‹{}›",
            vars.chain(prims)
                .chain(record)
                .chain(tuple)
                .chain(function)
                .chain(self.top.then(|| "⊤".to_string()))
                .join(", ")
        )
    }
}

impl fmt::Display for CompactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.vars.iter().map(ToString::to_string).collect();
        parts.extend(self.prims.iter().map(|prim| prim.name().to_string()));
        if let Some(fields) = &self.record {
            parts.push(format!(
                "{{{}}}",
                fields
                    .iter()
                    .map(|(name, field)| format!("{name}: {field}"))
                    .join(", ")
            ));
        }
        if let Some(elems) = &self.tuple {
            parts.push(format!("({})", elems.iter().join(", ")));
        }
        if let Some(fun) = &self.function {
            parts.push(format!("{} -> {}", fun.0, fun.1));
        }
        if self.top {
            parts.push("⊤".to_string());
        }
        write!(f, "‹{}›", parts.join(", "))
    }
}

/// Combines two compact types read at the same polarity: a union when
/// `positive`, an intersection otherwise. Records keep the common fields of
/// a union and every field of an intersection. A union of tuples with
/// different arities has no tuple supertype and becomes `⊤`.
pub fn merge(lhs: &CompactType, rhs: &CompactType, positive: bool) -> CompactType {
    let arity_clash = matches!(
        (&lhs.tuple, &rhs.tuple),
        (Some(l), Some(r)) if l.len() != r.len()
    );
    let top = positive && (lhs.top || rhs.top || arity_clash);

    let vars = lhs.vars.union(&rhs.vars).copied().collect();
    let prims = lhs.prims.union(&rhs.prims).copied().collect();

    let record = match (&lhs.record, &rhs.record) {
        (Some(l), Some(r)) if positive => Some(
            l.iter()
                .filter_map(|(name, l_field)| {
                    let r_field = r.get(name)?;
                    Some((name.clone(), merge(l_field, r_field, positive)))
                })
                .collect(),
        ),
        (Some(l), Some(r)) => {
            let mut fields = l.clone();
            for (name, r_field) in r {
                let field = match fields.get(name) {
                    Some(l_field) => merge(l_field, r_field, positive),
                    None => r_field.clone(),
                };
                fields.insert(name.clone(), field);
            }
            Some(fields)
        }
        (Some(only), None) | (None, Some(only)) => Some(only.clone()),
        (None, None) => None,
    };

    let tuple = match (&lhs.tuple, &rhs.tuple) {
        _ if top => None,
        (Some(l), Some(r)) if l.len() == r.len() => Some(
            l.iter()
                .zip(r)
                .map(|(l_elem, r_elem)| merge(l_elem, r_elem, positive))
                .collect(),
        ),
        (Some(l), Some(_)) => Some(l.clone()),
        (Some(only), None) | (None, Some(only)) => Some(only.clone()),
        (None, None) => None,
    };

    let function = match (&lhs.function, &rhs.function) {
        (Some(l), Some(r)) => Some(Box::new((
            merge(&l.0, &r.0, !positive),
            merge(&l.1, &r.1, positive),
        ))),
        (Some(only), None) | (None, Some(only)) => Some(only.clone()),
        (None, None) => None,
    };

    CompactType {
        vars,
        prims,
        tuple,
        record,
        function,
        top,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Typer;

    fn prim(prim: PrimitiveTy) -> CompactType {
        CompactType::from_prim(prim)
    }

    fn rcd(fields: impl IntoIterator<Item = (&'static str, CompactType)>) -> CompactType {
        CompactType {
            record: Some(
                fields
                    .into_iter()
                    .map(|(name, ty)| (Name::from(name), ty))
                    .collect(),
            ),
            ..CompactType::default()
        }
    }

    fn tup(elems: Vec<CompactType>) -> CompactType {
        CompactType {
            tuple: Some(elems),
            ..CompactType::default()
        }
    }

    #[test]
    fn rendering_orders_parts() {
        let mut typer = Typer::new();
        let a = typer.fresh_ty_var(0);
        let b = typer.fresh_ty_var(1);

        let mut ty = merge(&CompactType::from_var(b), &CompactType::from_var(a), true);
        ty.prims.insert(PrimitiveTy::Int);
        ty.prims.insert(PrimitiveTy::Bool);
        ty.record = Some(BTreeMap::new());
        ty.function = Some(Box::new((CompactType::empty(), prim(PrimitiveTy::Int))));

        assert_eq!(ty.to_string(), "‹α0, α1', bool, int, {}, ‹› -> ‹int››");
        assert_eq!(ty.hash_key(), "‹0, 1, bool, int, ‹› -> ‹int››");
        assert_eq!(CompactType::empty().to_string(), "‹›");
    }

    #[test]
    fn union_of_records_keeps_common_fields() {
        let l = rcd([("a", prim(PrimitiveTy::Int)), ("b", prim(PrimitiveTy::Bool))]);
        let r = rcd([("b", prim(PrimitiveTy::Bool)), ("c", prim(PrimitiveTy::Int))]);

        assert_eq!(merge(&l, &r, true).to_string(), "‹{b: ‹bool›}›");
        assert_eq!(
            merge(&l, &r, false).to_string(),
            "‹{a: ‹int›, b: ‹bool›, c: ‹int›}›"
        );
    }

    #[test]
    fn merged_function_flips_the_param() {
        let fun = |param: PrimitiveTy, ret: PrimitiveTy| CompactType {
            function: Some(Box::new((prim(param), prim(ret)))),
            ..CompactType::default()
        };
        let l = fun(PrimitiveTy::Int, PrimitiveTy::Bool);
        let r = fun(PrimitiveTy::Float, PrimitiveTy::String);

        // polarity only decides records and tuples, the sets always union
        let merged = merge(&l, &r, true);
        assert_eq!(merged.to_string(), "‹‹float, int› -> ‹bool, string››");
        assert!(merge(&l, &CompactType::empty(), true) == l);
    }

    #[test]
    fn tuple_arity_mismatch() {
        let pair = tup(vec![prim(PrimitiveTy::Int), prim(PrimitiveTy::Int)]);
        let single = tup(vec![prim(PrimitiveTy::Bool)]);
        let other = tup(vec![prim(PrimitiveTy::Bool), prim(PrimitiveTy::Float)]);

        let union = merge(&pair, &single, true);
        assert!(union.top && union.tuple.is_none());
        assert_eq!(union.to_string(), "‹⊤›");
        // once a union is ⊤, later tuples are absorbed
        assert_eq!(merge(&union, &other, true).to_string(), "‹⊤›");

        let inter = merge(&pair, &single, false);
        assert!(!inter.top);
        assert_eq!(inter.tuple, pair.tuple);
        assert_eq!(
            merge(&pair, &other, true).to_string(),
            "‹(‹bool, int›, ‹float, int›)›"
        );
    }

    #[test]
    fn empty_means_no_parts() {
        assert!(CompactType::empty().is_empty());
        assert!(!tup(vec![]).is_empty());
        assert!(!rcd([]).is_empty());
        assert!(!CompactType {
            top: true,
            ..CompactType::default()
        }
        .is_empty());
    }
}
