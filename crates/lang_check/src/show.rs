// ==============================================================================
// Rendering of inferred types
// ==============================================================================
//
// `show` is the user facing path through all three simplification passes.
// The other renderers read the raw bound graph and exist for debugging and
// for error messages, which must not depend on simplification.

use std::collections::VecDeque;

use itertools::Itertools;
use lang_ty::{OutputTy, TyRef};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{PolyType, SimpleType, TyVar, Typer};

impl Typer {
    /// Canonicalize, simplify and coalesce `ty`, then print it.
    pub fn show(&mut self, ty: &SimpleType) -> String {
        self.output_type(ty).to_string()
    }

    pub fn output_type(&mut self, ty: &SimpleType) -> OutputTy {
        log::debug!("inferred: {ty}");
        let canonical = self.canonicalize_type(ty);
        log::debug!("canonicalized: {}", canonical.term);
        let simplified = self.simplify_type(&canonical);
        log::debug!("simplified: {}", simplified.term);
        let output = self.coalesce_compact_type(&simplified);
        log::debug!("coalesced: {output}");
        output
    }

    pub fn show_scheme(&mut self, scheme: &PolyType) -> String {
        self.show(&scheme.body)
    }

    /// `α<uid>` for variables, `'` per level, no bounds.
    pub fn show_raw(&self, ty: &SimpleType) -> String {
        ty.to_string()
    }

    /// Every variable reachable from `ty` that has bounds, in uid order:
    /// `α1 :> lb | lb <: ub & ub`.
    pub fn show_bounds(&self, ty: &SimpleType) -> String {
        self.reachable_vars(ty)
            .into_iter()
            .filter_map(|var| {
                let lower = self.table.lower_bounds(var);
                let upper = self.table.upper_bounds(var);
                if lower.is_empty() && upper.is_empty() {
                    return None;
                }

                let mut entry = var.to_string();
                if !lower.is_empty() {
                    entry.push_str(" :> ");
                    entry.push_str(&lower.iter().join(" | "));
                }
                if !upper.is_empty() {
                    entry.push_str(" <: ");
                    entry.push_str(&upper.iter().join(" & "));
                }
                Some(entry)
            })
            .join(", ")
    }

    /// Breadth first over structure and bounds.
    fn reachable_vars(&self, ty: &SimpleType) -> Vec<TyVar> {
        let mut seen = FxHashSet::default();
        let mut vars = Vec::new();
        let mut queue = VecDeque::from([ty.clone()]);

        while let Some(ty) = queue.pop_front() {
            match &ty {
                SimpleType::Primitive(_) => {}
                SimpleType::Variable(var) => {
                    if !seen.insert(*var) {
                        continue;
                    }
                    vars.push(*var);
                    queue.extend(self.table.lower_bounds(*var).iter().cloned());
                    queue.extend(self.table.upper_bounds(*var).iter().cloned());
                }
                SimpleType::Function(fun) => {
                    queue.push_back(fun.lhs.clone());
                    queue.push_back(fun.rhs.clone());
                }
                SimpleType::Tuple(tup) => queue.extend(tup.elems.iter().cloned()),
                SimpleType::Record(rcd) => {
                    queue.extend(rcd.fields.iter().map(|(_, field)| field.clone()))
                }
            }
        }

        vars.sort();
        vars
    }

    /// Renders one side of a type error straight from the bound graph: a
    /// positive variable is shown joined with its lower bounds, a negative
    /// one met with its upper bounds.
    pub(crate) fn render_for_error(&mut self, ty: &SimpleType) -> String {
        let mut in_progress = FxHashSet::default();
        let mut recursive = FxHashMap::default();
        self.coalesce_bounds(ty, true, &mut in_progress, &mut recursive)
            .to_string()
    }

    fn coalesce_bounds(
        &mut self,
        ty: &SimpleType,
        positive: bool,
        in_progress: &mut FxHashSet<(TyVar, bool)>,
        recursive: &mut FxHashMap<(TyVar, bool), TyVar>,
    ) -> OutputTy {
        match ty {
            SimpleType::Primitive(prim) => OutputTy::Primitive(*prim),
            SimpleType::Function(fun) => {
                let param = self.coalesce_bounds(&fun.lhs, !positive, in_progress, recursive);
                let body = self.coalesce_bounds(&fun.rhs, positive, in_progress, recursive);
                OutputTy::function(param, body)
            }
            SimpleType::Tuple(tup) => OutputTy::Tuple(
                tup.elems
                    .iter()
                    .map(|elem| {
                        TyRef::from(self.coalesce_bounds(elem, positive, in_progress, recursive))
                    })
                    .collect(),
            ),
            SimpleType::Record(rcd) => OutputTy::Record(
                rcd.fields
                    .iter()
                    .map(|(name, field)| {
                        let field = self.coalesce_bounds(field, positive, in_progress, recursive);
                        (name.clone(), TyRef::from(field))
                    })
                    .collect(),
            ),
            SimpleType::Variable(var) => {
                let key = (*var, positive);
                if in_progress.contains(&key) {
                    let binder = match recursive.get(&key) {
                        Some(binder) => *binder,
                        None => {
                            let binder = self.fresh_ty_var(0);
                            recursive.insert(key, binder);
                            binder
                        }
                    };
                    return OutputTy::TyVar(binder.uid());
                }

                in_progress.insert(key);
                let bounds = self.table.bounds(*var, positive).to_vec();
                let mut members = vec![TyRef::from(OutputTy::TyVar(var.uid()))];
                for bound in &bounds {
                    let bound = self.coalesce_bounds(bound, positive, in_progress, recursive);
                    members.push(bound.into());
                }
                in_progress.remove(&key);

                let res = match (members.len(), positive) {
                    (1, _) => OutputTy::TyVar(var.uid()),
                    (_, true) => OutputTy::Union(members),
                    (_, false) => OutputTy::Intersection(members),
                };

                match recursive.get(&key) {
                    Some(binder) => OutputTy::Recursive {
                        binder: binder.uid(),
                        body: res.into(),
                    },
                    None => res,
                }
            }
        }
    }
}
