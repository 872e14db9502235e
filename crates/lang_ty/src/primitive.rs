use std::fmt;

use lang_ast::Literal;

/// Built-in base types. Each has a single interned representation, so two
/// primitives with the same name are always the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveTy {
    // keep alphabetical, `Ord` must agree with ordering by name
    Bool,
    Float,
    Int,
    String,
}

impl PrimitiveTy {
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveTy::Bool => "bool",
            PrimitiveTy::Int => "int",
            PrimitiveTy::Float => "float",
            PrimitiveTy::String => "string",
        }
    }

    /// The only widening between distinct primitives is `int <: float`.
    pub fn is_subtype_of(self, sup: PrimitiveTy) -> bool {
        self == sup || matches!((self, sup), (PrimitiveTy::Int, PrimitiveTy::Float))
    }
}

impl From<&Literal> for PrimitiveTy {
    fn from(value: &Literal) -> Self {
        match value {
            Literal::Bool(_) => PrimitiveTy::Bool,
            Literal::Integer(_) => PrimitiveTy::Int,
            Literal::Float(_) => PrimitiveTy::Float,
            Literal::String(_) => PrimitiveTy::String,
        }
    }
}

impl fmt::Display for PrimitiveTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_widens_to_float_only() {
        assert!(PrimitiveTy::Int.is_subtype_of(PrimitiveTy::Float));
        assert!(!PrimitiveTy::Float.is_subtype_of(PrimitiveTy::Int));
        assert!(PrimitiveTy::Bool.is_subtype_of(PrimitiveTy::Bool));
        assert!(!PrimitiveTy::Bool.is_subtype_of(PrimitiveTy::Int));
    }

    #[test]
    fn names_sort_like_primitive_order() {
        // Compact types keep primitives sorted by name; the derived order agrees.
        let mut prims = [
            PrimitiveTy::String,
            PrimitiveTy::Int,
            PrimitiveTy::Float,
            PrimitiveTy::Bool,
        ];
        prims.sort();
        let names: Vec<_> = prims.iter().map(|p| p.name()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
