// ==============================================================================
// TypeTable: arena of type variables and their bounds
// ==============================================================================
//
// Variables are never removed. A variable's uid is its arena index, so uids
// are handed out in creation order and never reused within a session.
// Bounds are kept newest first.

use la_arena::Arena;

use crate::{SimpleType, TyVar};

#[derive(Debug, Clone, Default)]
pub struct VarState {
    level: u32,
    pub(crate) lower_bounds: Vec<SimpleType>,
    pub(crate) upper_bounds: Vec<SimpleType>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct TypeTable {
    vars: Arena<VarState>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh_var(&mut self, level: u32) -> TyVar {
        let id = self.vars.alloc(VarState {
            level,
            ..VarState::default()
        });
        TyVar { id, level }
    }

    pub fn lower_bounds(&self, var: TyVar) -> &[SimpleType] {
        &self.vars[var.id].lower_bounds
    }

    pub fn upper_bounds(&self, var: TyVar) -> &[SimpleType] {
        &self.vars[var.id].upper_bounds
    }

    /// Lower bounds in positive position, upper bounds in negative position.
    pub fn bounds(&self, var: TyVar, positive: bool) -> &[SimpleType] {
        if positive {
            self.lower_bounds(var)
        } else {
            self.upper_bounds(var)
        }
    }

    /// A bound never lives deeper than the variable it bounds.
    fn check_level(&self, var: TyVar, ty: &SimpleType) {
        let level = self.vars[var.id].level;
        debug_assert!(ty.level() <= level, "{ty} escapes {var} at level {level}");
    }

    pub fn prepend_lower(&mut self, var: TyVar, ty: SimpleType) {
        self.check_level(var, &ty);
        self.vars[var.id].lower_bounds.insert(0, ty);
    }

    pub fn prepend_upper(&mut self, var: TyVar, ty: SimpleType) {
        self.check_level(var, &ty);
        self.vars[var.id].upper_bounds.insert(0, ty);
    }

    pub fn set_lower(&mut self, var: TyVar, bounds: Vec<SimpleType>) {
        bounds.iter().for_each(|ty| self.check_level(var, ty));
        self.vars[var.id].lower_bounds = bounds;
    }

    pub fn set_upper(&mut self, var: TyVar, bounds: Vec<SimpleType>) {
        bounds.iter().for_each(|ty| self.check_level(var, ty));
        self.vars[var.id].upper_bounds = bounds;
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Every variable allocated so far, in uid order.
    #[cfg(test)]
    pub fn vars(&self) -> impl Iterator<Item = (TyVar, &VarState)> + '_ {
        self.vars.iter().map(|(id, state)| {
            (
                TyVar {
                    id,
                    level: state.level,
                },
                state,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use lang_ty::PrimitiveTy;

    use super::*;

    #[test]
    fn uids_follow_allocation_order() {
        let mut table = TypeTable::new();
        let a = table.fresh_var(0);
        let b = table.fresh_var(3);

        assert_eq!(a.uid(), 0);
        assert_eq!(b.uid(), 1);
        assert_eq!(b.level(), 3);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn new_bounds_go_first() {
        let mut table = TypeTable::new();
        let var = table.fresh_var(0);

        table.prepend_lower(var, PrimitiveTy::Int.into());
        table.prepend_lower(var, PrimitiveTy::Bool.into());
        table.prepend_upper(var, PrimitiveTy::Float.into());

        let shown: Vec<String> = table.lower_bounds(var).iter().map(|t| t.to_string()).collect();
        assert_eq!(shown, ["bool", "int"]);
        assert_eq!(table.bounds(var, false).len(), 1);
        assert_eq!(table.bounds(var, true).len(), 2);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "escapes")]
    fn deeper_bound_is_rejected() {
        let mut table = TypeTable::new();
        let shallow = table.fresh_var(0);
        let deep = table.fresh_var(2);
        table.prepend_upper(shallow, deep.into());
    }

    #[test]
    fn vars_report_their_levels() {
        let mut table = TypeTable::new();
        table.fresh_var(2);
        table.fresh_var(0);

        let levels: Vec<_> = table.vars().map(|(var, _)| (var.uid(), var.level())).collect();
        assert_eq!(levels, [(0, 2), (1, 0)]);
    }
}
