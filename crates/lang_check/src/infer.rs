// ==============================================================================
// Let-polymorphism: generalization and instantiation by levels
// ==============================================================================
//
// A let right-hand side is typed one level deeper than its binding site.
// Variables created at that deeper level are exactly the ones the scheme
// quantifies over; instantiation copies them fresh at the use site and
// shares everything at or below the scheme's level.

use lang_ast::{Binding, Program};
use rustc_hash::FxHashMap;

use crate::{Env, PolyType, SimpleType, TyVar, TypeError, TypeScheme, Typer};

impl Typer {
    /// Types every definition in order. Each one is visible to the ones after
    /// it; a recursive one also sees itself.
    pub fn infer_types(&mut self, program: &Program, env: &Env) -> Result<Vec<PolyType>, TypeError> {
        let mut env = env.clone();
        let mut schemes = Vec::with_capacity(program.defs.len());
        for def in &program.defs {
            let scheme = self.type_let_rhs(def, &env, 0)?;
            log::debug!("{}: {}", def.name, scheme.body);
            env.insert(def.name.clone(), scheme.clone());
            schemes.push(scheme);
        }
        Ok(schemes)
    }

    pub(crate) fn type_let_rhs(
        &mut self,
        binding: &Binding,
        env: &Env,
        level: u32,
    ) -> Result<PolyType, TypeError> {
        let body = if binding.is_rec {
            let placeholder = self.fresh_var(level + 1);
            let env = env.extend(binding.name.clone(), placeholder.clone());
            let ty = self.type_term(&binding.rhs, &env, level + 1)?;
            self.constrain(&ty, &placeholder)?;
            placeholder
        } else {
            self.type_term(&binding.rhs, env, level + 1)?
        };
        Ok(PolyType::new(level, body))
    }

    pub fn instantiate(&mut self, scheme: &TypeScheme, level: u32) -> SimpleType {
        match scheme {
            TypeScheme::Simple(ty) => ty.clone(),
            TypeScheme::Poly(poly) => self.freshen_above(poly.level, &poly.body, level),
        }
    }

    /// Copies `ty`, replacing every variable above `limit` with a fresh one at
    /// `level`. Each variable is copied once; its bounds are copied last to
    /// first.
    pub(crate) fn freshen_above(&mut self, limit: u32, ty: &SimpleType, level: u32) -> SimpleType {
        let mut freshened = FxHashMap::default();
        self.freshen(limit, ty, level, &mut freshened)
    }

    fn freshen(
        &mut self,
        limit: u32,
        ty: &SimpleType,
        level: u32,
        freshened: &mut FxHashMap<TyVar, TyVar>,
    ) -> SimpleType {
        if ty.level() <= limit {
            return ty.clone();
        }

        match ty {
            SimpleType::Primitive(_) => ty.clone(),
            SimpleType::Function(fun) => {
                let lhs = self.freshen(limit, &fun.lhs, level, freshened);
                let rhs = self.freshen(limit, &fun.rhs, level, freshened);
                SimpleType::function(lhs, rhs)
            }
            SimpleType::Tuple(tup) => {
                let elems = tup
                    .elems
                    .iter()
                    .map(|elem| self.freshen(limit, elem, level, freshened))
                    .collect();
                SimpleType::tuple(elems)
            }
            SimpleType::Record(rcd) => {
                let fields = rcd
                    .fields
                    .iter()
                    .map(|(name, field)| (name.clone(), self.freshen(limit, field, level, freshened)))
                    .collect();
                SimpleType::record(fields)
            }
            SimpleType::Variable(var) => {
                if let Some(copy) = freshened.get(var) {
                    return (*copy).into();
                }

                let copy = self.fresh_ty_var(level);
                freshened.insert(*var, copy);

                let lower = self.table.lower_bounds(*var).to_vec();
                let lower = self.freshen_bounds_rev(limit, &lower, level, freshened);
                self.table.set_lower(copy, lower);

                let upper = self.table.upper_bounds(*var).to_vec();
                let upper = self.freshen_bounds_rev(limit, &upper, level, freshened);
                self.table.set_upper(copy, upper);

                copy.into()
            }
        }
    }

    /// Freshens `bounds` from the last to the first, keeping their positions.
    fn freshen_bounds_rev(
        &mut self,
        limit: u32,
        bounds: &[SimpleType],
        level: u32,
        freshened: &mut FxHashMap<TyVar, TyVar>,
    ) -> Vec<SimpleType> {
        let mut copies: Vec<SimpleType> = bounds
            .iter()
            .rev()
            .map(|bound| self.freshen(limit, bound, level, freshened))
            .collect();
        copies.reverse();
        copies
    }
}

#[cfg(test)]
mod tests {
    use lang_ty::PrimitiveTy;

    use crate::{SimpleType, TypeScheme, Typer};

    #[test]
    fn freshen_copies_only_vars_above_the_limit() {
        let mut typer = Typer::new();
        let free = typer.fresh_var(0);
        let quantified = typer.fresh_var(1);
        let body = SimpleType::function(quantified.clone(), free.clone());

        let copy = typer.freshen_above(0, &body, 0);
        assert_eq!(typer.show_raw(&copy), "(α2 -> α0)");

        // each use site gets its own copy
        let other = typer.freshen_above(0, &body, 0);
        assert_eq!(typer.show_raw(&other), "(α3 -> α0)");
    }

    #[test]
    fn freshen_keeps_sharing_and_bound_order() {
        let mut typer = Typer::new();
        let var = typer.fresh_var(1);
        let v = var.as_var().unwrap();
        typer.table.prepend_lower(v, PrimitiveTy::Int.into());
        typer.table.prepend_lower(v, SimpleType::function(var.clone(), var.clone()));

        let copy = typer.freshen_above(0, &var, 0);
        let c = copy.as_var().unwrap();
        assert_eq!(typer.show_raw(&copy), "α1");
        let lower: Vec<_> = typer.lower_bounds(c).iter().map(|b| b.to_string()).collect();
        assert_eq!(lower, ["(α1 -> α1)", "int"]);
    }

    #[test]
    fn monomorphic_schemes_are_shared() {
        let mut typer = Typer::new();
        let var = typer.fresh_var(1);
        let inst = typer.instantiate(&TypeScheme::Simple(var.clone()), 0);
        assert!(inst.same_object(&var));
    }
}
