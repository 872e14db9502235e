use lang_ty::PrimitiveTy;

use crate::{Env, PolyType, SimpleType, Typer};

impl Typer {
    /// The default environment. `if` is the only polymorphic builtin, so it
    /// allocates this session's first variable.
    pub fn builtins(&mut self) -> Env {
        let bool_ty: SimpleType = PrimitiveTy::Bool.into();
        let int_ty: SimpleType = PrimitiveTy::Int.into();

        // quantified, so it must sit above the scheme's level
        let branch = self.fresh_var(1);
        let if_ty = SimpleType::function_n(
            [bool_ty.clone(), branch.clone(), branch.clone()],
            branch,
        );

        let mut env = Env::new();
        env.insert("true", PrimitiveTy::Bool);
        env.insert("false", PrimitiveTy::Bool);
        env.insert("not", SimpleType::function(bool_ty.clone(), bool_ty));
        env.insert("succ", SimpleType::function(int_ty.clone(), int_ty.clone()));
        env.insert(
            "add",
            SimpleType::function_n([int_ty.clone(), int_ty.clone()], int_ty),
        );
        env.insert("if", PolyType::new(0, if_ty));
        env
    }
}
