// ==============================================================================
// Co-occurrence simplification: CompactTypeScheme -> CompactTypeScheme
// ==============================================================================
//
// Analysis records, for every variable and polarity, which variables and
// primitives always appear next to it. Then:
//   - a non-recursive variable seen in only one polarity is removed,
//   - a variable that always co-occurs with another one in some polarity is
//     unified into it,
//   - a variable that co-occurs with the same primitive in both polarities
//     is removed, since it is equivalent to that primitive.
// The rebuild applies the resulting substitution in one step.

use std::collections::{BTreeMap, BTreeSet};

use lang_ty::PrimitiveTy;
use rustc_hash::FxHashMap;

use crate::{compact::merge, CompactType, CompactTypeScheme, TyVar, Typer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CoOccur {
    Var(TyVar),
    Prim(PrimitiveTy),
}

/// Body of a recursive variable, computed once every substitution is known.
#[derive(Debug, Clone)]
enum RecBody {
    Original(CompactType),
    Merged {
        lhs: Box<RecBody>,
        rhs: Box<RecBody>,
        positive: bool,
    },
}

#[derive(Default)]
struct Analysis {
    all_vars: BTreeSet<TyVar>,
    rec_vars: BTreeMap<TyVar, RecBody>,
    co_occurs: FxHashMap<(TyVar, bool), Vec<CoOccur>>,
    /// `None` removes the variable, `Some(w)` replaces it with `w`.
    var_subst: FxHashMap<TyVar, Option<TyVar>>,
}

impl Typer {
    pub fn simplify_type(&self, scheme: &CompactTypeScheme) -> CompactTypeScheme {
        let mut analysis = Analysis {
            all_vars: scheme.rec_vars.keys().copied().collect(),
            ..Analysis::default()
        };
        analysis.analyze(&scheme.term, true, scheme);

        // highest uid first
        let order: Vec<TyVar> = analysis.all_vars.iter().rev().copied().collect();
        analysis.remove_polar_vars(&order);
        analysis.unify_co_occurring(&order);

        let term = analysis.rebuild(&scheme.term);
        let rec_vars = analysis
            .rec_vars
            .iter()
            .map(|(var, body)| (*var, analysis.force(body)))
            .collect();
        CompactTypeScheme { term, rec_vars }
    }
}

impl Analysis {
    fn analyze(&mut self, ty: &CompactType, positive: bool, scheme: &CompactTypeScheme) {
        for var in &ty.vars {
            self.all_vars.insert(*var);

            let occurs: Vec<CoOccur> = ty
                .vars
                .iter()
                .map(|var| CoOccur::Var(*var))
                .chain(ty.prims.iter().map(|prim| CoOccur::Prim(*prim)))
                .collect();
            match self.co_occurs.get_mut(&(*var, positive)) {
                Some(old) => old.retain(|occ| occurs.contains(occ)),
                None => {
                    log::trace!("co-occurrence {var} ({positive}): {occurs:?}");
                    self.co_occurs.insert((*var, positive), occurs);
                }
            }

            if let Some(body) = scheme.rec_vars.get(var) {
                if !self.rec_vars.contains_key(var) {
                    // registered before descending so the body is analyzed once
                    self.rec_vars.insert(*var, RecBody::Original(body.clone()));
                    self.analyze(body, positive, scheme);
                }
            }
        }

        if let Some(fields) = &ty.record {
            for field in fields.values() {
                self.analyze(field, positive, scheme);
            }
        }
        if let Some(elems) = &ty.tuple {
            for elem in elems {
                self.analyze(elem, positive, scheme);
            }
        }
        if let Some(fun) = &ty.function {
            self.analyze(&fun.0, !positive, scheme);
            self.analyze(&fun.1, positive, scheme);
        }
    }

    fn remove_polar_vars(&mut self, order: &[TyVar]) {
        for var in order {
            if self.rec_vars.contains_key(var) {
                continue;
            }
            let pos = self.co_occurs.contains_key(&(*var, true));
            let neg = self.co_occurs.contains_key(&(*var, false));
            if pos != neg {
                log::trace!("{var} only occurs {}", if pos { "positively" } else { "negatively" });
                self.var_subst.insert(*var, None);
            }
        }
    }

    fn unify_co_occurring(&mut self, order: &[TyVar]) {
        for &v in order {
            if self.var_subst.contains_key(&v) {
                continue;
            }

            for positive in [true, false] {
                let Some(occurs) = self.co_occurs.get(&(v, positive)).cloned() else {
                    continue;
                };

                for occ in occurs {
                    match occ {
                        CoOccur::Var(w) => self.try_unify(v, w, positive),
                        CoOccur::Prim(prim) => {
                            let both = self
                                .co_occurs
                                .get(&(v, !positive))
                                .is_some_and(|other| other.contains(&CoOccur::Prim(prim)));
                            if both {
                                log::trace!("{v} is equivalent to {prim}");
                                self.var_subst.insert(v, None);
                            }
                        }
                    }
                }
            }
        }
    }

    /// Unifies `w` into `v` when `w` always appears next to `v` in the same
    /// polarity.
    fn try_unify(&mut self, v: TyVar, w: TyVar, positive: bool) {
        if w == v || self.var_subst.contains_key(&w) {
            return;
        }
        // a recursive variable only merges with another recursive one
        if self.rec_vars.contains_key(&v) != self.rec_vars.contains_key(&w) {
            return;
        }
        if let Some(w_occurs) = self.co_occurs.get(&(w, positive)) {
            if !w_occurs.contains(&CoOccur::Var(v)) {
                return;
            }
        }

        log::trace!("unify {w} into {v}");
        self.var_subst.insert(w, Some(v));

        match self.rec_vars.remove(&w) {
            None => {
                // v's occurrences in the other polarity are now shared with w's
                let w_other = self.co_occurs.get(&(w, !positive)).cloned();
                if let (Some(w_other), Some(v_other)) =
                    (w_other, self.co_occurs.get_mut(&(v, !positive)))
                {
                    v_other.retain(|occ| *occ == CoOccur::Var(v) || w_other.contains(occ));
                }
            }
            Some(w_body) => {
                if let Some(v_body) = self.rec_vars.remove(&v) {
                    self.rec_vars.insert(
                        v,
                        RecBody::Merged {
                            lhs: Box::new(v_body),
                            rhs: Box::new(w_body),
                            positive,
                        },
                    );
                }
            }
        }
    }

    fn substitute(&self, var: TyVar) -> Option<TyVar> {
        match self.var_subst.get(&var) {
            None => Some(var),
            Some(subst) => *subst,
        }
    }

    fn rebuild(&self, ty: &CompactType) -> CompactType {
        CompactType {
            vars: ty
                .vars
                .iter()
                .filter_map(|var| self.substitute(*var))
                .collect(),
            prims: ty.prims.clone(),
            tuple: ty
                .tuple
                .as_ref()
                .map(|elems| elems.iter().map(|elem| self.rebuild(elem)).collect()),
            record: ty.record.as_ref().map(|fields| {
                fields
                    .iter()
                    .map(|(name, field)| (name.clone(), self.rebuild(field)))
                    .collect()
            }),
            function: ty
                .function
                .as_ref()
                .map(|fun| Box::new((self.rebuild(&fun.0), self.rebuild(&fun.1)))),
            top: ty.top,
        }
    }

    fn force(&self, body: &RecBody) -> CompactType {
        match body {
            RecBody::Original(ty) => self.rebuild(ty),
            RecBody::Merged { lhs, rhs, positive } => {
                merge(&self.force(lhs), &self.force(rhs), *positive)
            }
        }
    }
}
