// ==============================================================================
// Display: source-like printing of terms
// ==============================================================================
//
// Precedences: a lambda or let body extends as far right as possible (10),
// application is left associative (20), selection binds tightest (30).

use std::fmt;

use itertools::Itertools;

use crate::{Binding, Literal, Program, Term};

const LAMBDA_PREC: u8 = 10;
const APPLY_PREC: u8 = 20;
const SELECT_PREC: u8 = 30;

struct Prec<'a>(&'a Term, u8);

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Integer(i) => write!(f, "{i}"),
            Literal::Float(x) => write!(f, "{x}"),
            Literal::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl fmt::Display for Prec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (term, outer) = (self.0, self.1);
        match term {
            Term::Literal(lit) => write!(f, "{lit}"),
            Term::Var(name) => write!(f, "{name}"),
            Term::Lambda { param, body } => {
                let parens = outer > LAMBDA_PREC;
                open(f, parens)?;
                write!(f, "fun {param} -> {}", Prec(body, LAMBDA_PREC))?;
                close(f, parens)
            }
            Term::Apply { fun, arg } => {
                let parens = outer > APPLY_PREC;
                open(f, parens)?;
                write!(f, "{} {}", Prec(fun, APPLY_PREC), Prec(arg, APPLY_PREC + 1))?;
                close(f, parens)
            }
            Term::Record(fields) => write!(
                f,
                "{{{}}}",
                fields
                    .iter()
                    .map(|(name, term)| format!("{name}: {}", Prec(term, 0)))
                    .join(", ")
            ),
            Term::Select { recv, field } => write!(f, "{}.{field}", Prec(recv, SELECT_PREC)),
            Term::Tuple(elems) => write!(
                f,
                "({})",
                elems.iter().map(|term| Prec(term, 0)).join(", ")
            ),
            Term::LetIn { binding, body } => {
                let parens = outer > LAMBDA_PREC;
                open(f, parens)?;
                write!(f, "{binding} in {}", Prec(body, 0))?;
                close(f, parens)
            }
        }
    }
}

fn open(f: &mut fmt::Formatter<'_>, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "(")?;
    }
    Ok(())
}

fn close(f: &mut fmt::Formatter<'_>, parens: bool) -> fmt::Result {
    if parens {
        write!(f, ")")?;
    }
    Ok(())
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Prec(self, 0), f)
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kw = if self.is_rec { "let rec" } else { "let" };
        write!(f, "{kw} {} = {}", self.name, Prec(&self.rhs, 0))
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for def in &self.defs {
            writeln!(f, "{def}")?;
        }
        Ok(())
    }
}
