use lang_ast::Term;
use lang_ty::PrimitiveTy;

use crate::{Env, SimpleType, TypeError, Typer};

impl Typer {
    pub fn infer_type(&mut self, term: &Term, env: &Env) -> Result<SimpleType, TypeError> {
        let ty = self.type_term(term, env, 0)?;
        log::debug!("{term}: {ty}");
        Ok(ty)
    }

    pub(crate) fn type_term(
        &mut self,
        term: &Term,
        env: &Env,
        level: u32,
    ) -> Result<SimpleType, TypeError> {
        match term {
            Term::Literal(lit) => Ok(PrimitiveTy::from(lit).into()),

            Term::Var(name) => {
                let scheme = env
                    .lookup(name)
                    .ok_or_else(|| TypeError::IdentifierNotFound(name.clone()))?
                    .clone();
                Ok(self.instantiate(&scheme, level))
            }

            Term::Lambda { param, body } => {
                let param_ty = self.fresh_var(level);
                let env = env.extend(param.clone(), param_ty.clone());
                let body_ty = self.type_term(body, &env, level)?;
                Ok(SimpleType::function(param_ty, body_ty))
            }

            Term::Apply { fun, arg } => {
                let fun_ty = self.type_term(fun, env, level)?;
                let arg_ty = self.type_term(arg, env, level)?;
                let res = self.fresh_var(level);
                self.constrain(&fun_ty, &SimpleType::function(arg_ty, res.clone()))?;
                Ok(res)
            }

            Term::Select { recv, field } => {
                let recv_ty = self.type_term(recv, env, level)?;
                let field_ty = self.fresh_var(level);
                let expected = SimpleType::record(vec![(field.clone(), field_ty.clone())]);
                self.constrain(&recv_ty, &expected)?;
                Ok(field_ty)
            }

            Term::Tuple(elems) => {
                let elems = elems
                    .iter()
                    .map(|elem| self.type_term(elem, env, level))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(SimpleType::tuple(elems))
            }

            Term::Record(fields) => {
                let fields = fields
                    .iter()
                    .map(|(name, field)| Ok((name.clone(), self.type_term(field, env, level)?)))
                    .collect::<Result<Vec<_>, TypeError>>()?;
                Ok(SimpleType::record(fields))
            }

            Term::LetIn { binding, body } => {
                let scheme = self.type_let_rhs(binding, env, level)?;
                let env = env.extend(binding.name.clone(), scheme);
                self.type_term(body, &env, level)
            }
        }
    }
}
