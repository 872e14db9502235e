// ==============================================================================
// Biunification: constrain(lhs, rhs) records lhs <: rhs
// ==============================================================================
//
// A variable on the left gains an upper bound, a variable on the right gains
// a lower bound, and every new bound is checked against the bounds already on
// the opposite side. The level guard keeps a variable from ever pointing at a
// type from a deeper let scope: such a type is first extruded down to the
// variable's level.
//
// Only edges with a variable on one side can close a cycle, so only those
// are memoized.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{SimpleType, TyVar, TypeError, Typer};

impl Typer {
    pub fn constrain(&mut self, lhs: &SimpleType, rhs: &SimpleType) -> Result<(), TypeError> {
        let mut cache = FxHashSet::default();
        self.constrain_inner(lhs, rhs, &mut cache)
    }

    fn constrain_inner(
        &mut self,
        lhs: &SimpleType,
        rhs: &SimpleType,
        cache: &mut FxHashSet<String>,
    ) -> Result<(), TypeError> {
        if lhs.same_object(rhs) {
            return Ok(());
        }

        if matches!(lhs, SimpleType::Variable(_)) || matches!(rhs, SimpleType::Variable(_)) {
            let key = format!("{} <: {}", lhs.hash_key(), rhs.hash_key());
            if !cache.insert(key) {
                return Ok(());
            }
        }

        log::trace!("constrain {lhs} <: {rhs}");

        match (lhs, rhs) {
            (SimpleType::Primitive(l), SimpleType::Primitive(r)) if l.is_subtype_of(*r) => Ok(()),

            (SimpleType::Function(l), SimpleType::Function(r)) => {
                self.constrain_inner(&r.lhs, &l.lhs, cache)?; // contravariant
                self.constrain_inner(&l.rhs, &r.rhs, cache) // covariant
            }

            (SimpleType::Record(l), SimpleType::Record(r)) => {
                for (name, r_field) in &r.fields {
                    let Some(l_field) = l.field(name) else {
                        return Err(TypeError::MissingField {
                            field: name.clone(),
                            record: self.render_for_error(lhs),
                        });
                    };
                    self.constrain_inner(l_field, r_field, cache)?;
                }
                Ok(())
            }

            (SimpleType::Tuple(l), SimpleType::Tuple(r)) if l.elems.len() == r.elems.len() => {
                for (l_elem, r_elem) in l.elems.iter().zip(&r.elems) {
                    self.constrain_inner(l_elem, r_elem, cache)?;
                }
                Ok(())
            }

            (SimpleType::Variable(var), _) if rhs.level() <= var.level => {
                self.table.prepend_upper(*var, rhs.clone());
                let lower_bounds = self.table.lower_bounds(*var).to_vec();
                for lb in &lower_bounds {
                    self.constrain_inner(lb, rhs, cache)?;
                }
                Ok(())
            }

            (_, SimpleType::Variable(var)) if lhs.level() <= var.level => {
                self.table.prepend_lower(*var, lhs.clone());
                let upper_bounds = self.table.upper_bounds(*var).to_vec();
                for ub in &upper_bounds {
                    self.constrain_inner(lhs, ub, cache)?;
                }
                Ok(())
            }

            (SimpleType::Variable(var), _) => {
                let rhs = self.extrude(rhs, false, var.level);
                self.constrain_inner(lhs, &rhs, cache)
            }

            (_, SimpleType::Variable(var)) => {
                let lhs = self.extrude(lhs, true, var.level);
                self.constrain_inner(&lhs, rhs, cache)
            }

            _ => Err(TypeError::CannotConstrain {
                lhs: self.render_for_error(lhs),
                rhs: self.render_for_error(rhs),
            }),
        }
    }

    /// Copies `ty` down to `level`, replacing each variable that lives deeper
    /// with a fresh one at `level` linked to the original.
    pub(crate) fn extrude(&mut self, ty: &SimpleType, positive: bool, level: u32) -> SimpleType {
        let mut extruded = FxHashMap::default();
        self.extrude_inner(ty, positive, level, &mut extruded)
    }

    fn extrude_inner(
        &mut self,
        ty: &SimpleType,
        positive: bool,
        level: u32,
        extruded: &mut FxHashMap<(TyVar, bool), TyVar>,
    ) -> SimpleType {
        if ty.level() <= level {
            return ty.clone();
        }

        match ty {
            SimpleType::Primitive(_) => ty.clone(),
            SimpleType::Function(fun) => {
                let lhs = self.extrude_inner(&fun.lhs, !positive, level, extruded);
                let rhs = self.extrude_inner(&fun.rhs, positive, level, extruded);
                SimpleType::function(lhs, rhs)
            }
            SimpleType::Tuple(tup) => {
                let elems = tup
                    .elems
                    .iter()
                    .map(|elem| self.extrude_inner(elem, positive, level, extruded))
                    .collect();
                SimpleType::tuple(elems)
            }
            SimpleType::Record(rcd) => {
                let fields = rcd
                    .fields
                    .iter()
                    .map(|(name, field)| {
                        (
                            name.clone(),
                            self.extrude_inner(field, positive, level, extruded),
                        )
                    })
                    .collect();
                SimpleType::record(fields)
            }
            SimpleType::Variable(var) => {
                if let Some(copy) = extruded.get(&(*var, positive)) {
                    return (*copy).into();
                }

                let copy = self.fresh_ty_var(level);
                extruded.insert((*var, positive), copy);
                log::trace!("extrude {var} to {copy} (positive: {positive})");

                if positive {
                    self.table.prepend_upper(*var, copy.into());
                    let lower_bounds = self.table.lower_bounds(*var).to_vec();
                    let bounds = lower_bounds
                        .iter()
                        .map(|b| self.extrude_inner(b, positive, level, extruded))
                        .collect();
                    self.table.set_lower(copy, bounds);
                } else {
                    self.table.prepend_lower(*var, copy.into());
                    let upper_bounds = self.table.upper_bounds(*var).to_vec();
                    let bounds = upper_bounds
                        .iter()
                        .map(|b| self.extrude_inner(b, positive, level, extruded))
                        .collect();
                    self.table.set_upper(copy, bounds);
                }

                copy.into()
            }
        }
    }
}
