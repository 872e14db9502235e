// ==============================================================================
// Canonicalization: SimpleType -> CompactTypeScheme
// ==============================================================================
//
// Two interleaved traversals. `flatten` turns one syntactic layer into a
// compact type, replacing a variable by every variable reachable from it
// through same-polarity variable bounds. `expand` then merges in the
// structural bounds of the variables it finds and descends into the result.
//
// Cycles are detected on whole compact types rather than single variables,
// so co-occurring recursive types with different periods are unrolled until
// they line up before a recursive variable is introduced for them.

use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{compact::merge, CompactType, CompactTypeScheme, SimpleType, TyVar, Typer};

#[derive(Default)]
struct Canonicalizer {
    in_progress: FxHashSet<(String, bool)>,
    recursive: FxHashMap<(String, bool), TyVar>,
    rec_vars: BTreeMap<TyVar, CompactType>,
}

impl Typer {
    pub fn canonicalize_type(&mut self, ty: &SimpleType) -> CompactTypeScheme {
        let mut state = Canonicalizer::default();
        let flat = self.flatten(ty, true);
        let term = self.expand(&flat, true, &mut state);
        CompactTypeScheme {
            term,
            rec_vars: state.rec_vars,
        }
    }

    fn flatten(&self, ty: &SimpleType, positive: bool) -> CompactType {
        match ty {
            SimpleType::Primitive(prim) => CompactType::from_prim(*prim),
            SimpleType::Variable(var) => CompactType {
                vars: self.close_over(*var, positive),
                ..CompactType::default()
            },
            SimpleType::Function(fun) => CompactType {
                function: Some(Box::new((
                    self.flatten(&fun.lhs, !positive),
                    self.flatten(&fun.rhs, positive),
                ))),
                ..CompactType::default()
            },
            SimpleType::Tuple(tup) => CompactType {
                tuple: Some(
                    tup.elems
                        .iter()
                        .map(|elem| self.flatten(elem, positive))
                        .collect(),
                ),
                ..CompactType::default()
            },
            SimpleType::Record(rcd) => CompactType {
                record: Some(
                    rcd.fields
                        .iter()
                        .map(|(name, field)| (name.clone(), self.flatten(field, positive)))
                        .collect(),
                ),
                ..CompactType::default()
            },
        }
    }

    /// `var` and every variable reachable from it through bounds of the
    /// given polarity that are themselves variables.
    pub(crate) fn close_over(&self, var: TyVar, positive: bool) -> BTreeSet<TyVar> {
        let mut done = BTreeSet::new();
        let mut todo = vec![var];
        while let Some(var) = todo.pop() {
            if !done.insert(var) {
                continue;
            }
            todo.extend(
                self.table
                    .bounds(var, positive)
                    .iter()
                    .filter_map(SimpleType::as_var)
                    .filter(|bound| !done.contains(bound)),
            );
        }
        done
    }

    fn expand(
        &mut self,
        ty: &CompactType,
        positive: bool,
        state: &mut Canonicalizer,
    ) -> CompactType {
        if ty.is_empty() {
            return ty.clone();
        }

        let key = (ty.hash_key(), positive);
        if state.in_progress.contains(&key) {
            let var = match state.recursive.get(&key) {
                Some(var) => *var,
                None => {
                    let var = self.fresh_ty_var(0);
                    log::trace!("{} is recursive, bound to {var}", key.0);
                    state.recursive.insert(key, var);
                    var
                }
            };
            return CompactType::from_var(var);
        }
        state.in_progress.insert(key.clone());

        let mut res = ty.clone();
        for var in &ty.vars {
            for bound in self.table.bounds(*var, positive) {
                if bound.as_var().is_none() {
                    res = merge(&res, &self.flatten(bound, positive), positive);
                }
            }
        }

        let adapted = CompactType {
            vars: res.vars,
            prims: res.prims,
            tuple: res.tuple.map(|elems| {
                elems
                    .iter()
                    .map(|elem| self.expand(elem, positive, state))
                    .collect()
            }),
            record: res.record.map(|fields| {
                fields
                    .iter()
                    .map(|(name, field)| (name.clone(), self.expand(field, positive, state)))
                    .collect()
            }),
            function: res.function.map(|fun| {
                Box::new((
                    self.expand(&fun.0, !positive, state),
                    self.expand(&fun.1, positive, state),
                ))
            }),
            top: res.top,
        };

        state.in_progress.remove(&key);
        match state.recursive.get(&key) {
            Some(var) => {
                state.rec_vars.insert(*var, adapted);
                CompactType::from_var(*var)
            }
            None => adapted,
        }
    }
}

#[cfg(test)]
mod tests {
    use lang_ty::PrimitiveTy;

    use crate::{SimpleType, Typer};

    #[test]
    fn variable_cycles_are_closed_over() {
        let mut typer = Typer::new();
        let a = typer.fresh_var(0);
        let b = typer.fresh_var(0);
        let c = typer.fresh_var(0);
        typer.constrain(&b, &a).unwrap();
        typer.constrain(&a, &b).unwrap();
        typer.constrain(&c, &a).unwrap();

        let uids = |typer: &Typer, var: &SimpleType, positive: bool| -> Vec<u32> {
            typer
                .close_over(var.as_var().unwrap(), positive)
                .into_iter()
                .map(|var| var.uid())
                .collect()
        };

        // a variable on the left of `<:` only gains upper bounds
        assert_eq!(uids(&typer, &a, false), [0, 1]);
        assert_eq!(uids(&typer, &c, false), [0, 1, 2]);
        assert_eq!(uids(&typer, &a, true), [0]);
    }

    #[test]
    fn structural_bounds_are_merged_in() {
        let mut typer = Typer::new();
        let a = typer.fresh_var(0);
        typer.constrain(&PrimitiveTy::Int.into(), &a).unwrap();
        typer.constrain(&PrimitiveTy::Bool.into(), &a).unwrap();
        let ty = SimpleType::function(a.clone(), a);

        let scheme = typer.canonicalize_type(&ty);
        assert_eq!(scheme.term.to_string(), "‹‹α0› -> ‹α0, bool, int››");
        assert!(scheme.rec_vars.is_empty());
    }

    #[test]
    fn cycles_get_a_recursive_var() {
        let mut typer = Typer::new();
        let a = typer.fresh_var(0);
        let fun = SimpleType::function(PrimitiveTy::Int.into(), a.clone());
        typer.constrain(&fun, &a).unwrap();

        let scheme = typer.canonicalize_type(&a);
        assert_eq!(scheme.term.to_string(), "‹α1›");
        let body = &scheme.rec_vars[&scheme.term.vars.first().copied().unwrap()];
        assert_eq!(body.to_string(), "‹α0, ‹int› -> ‹α1››");
    }
}
