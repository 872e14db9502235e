// ==============================================================================
// Property-Based Tests for Type Inference
// ==============================================================================
//
// Random closed-ish terms are typed from the builtin environment. Most of them
// fail to type, which is fine: the properties below must hold whatever the
// outcome, since a failed session keeps every bound recorded before the
// failure.

use lang_ast::{arbitrary::RecursiveParams, Term};
use lang_ty::PrimitiveTy;
use proptest::prelude::{
    any, any_with, prop, prop_assert, prop_assert_eq, prop_oneof, proptest, ProptestConfig, Strategy,
};

use crate::{SimpleType, Typer};

fn arb_term() -> impl Strategy<Value = Term> {
    any_with::<Term>(RecursiveParams {
        depth: 4,
        desired_size: 24,
        expected_branch_size: 3,
    })
}

/// A type skeleton that can be built more than once, so the two copies share
/// variables but no structural allocations.
#[derive(Debug, Clone)]
enum Shape {
    Prim(PrimitiveTy),
    Var(usize),
    Function(Box<Shape>, Box<Shape>),
    Tuple(Vec<Shape>),
    Record(Vec<(&'static str, Shape)>),
}

const VAR_POOL: usize = 3;
const FIELDS: &[&str] = &["a", "b", "u"];

fn arb_shape() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        any::<PrimitiveTy>().prop_map(Shape::Prim),
        (0..VAR_POOL).prop_map(Shape::Var),
    ];

    leaf.prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone())
                .prop_map(|(lhs, rhs)| Shape::Function(Box::new(lhs), Box::new(rhs))),
            prop::collection::vec(inner.clone(), 0..3).prop_map(Shape::Tuple),
            prop::collection::btree_map(prop::sample::select(FIELDS), inner, 0..3)
                .prop_map(|fields| Shape::Record(fields.into_iter().collect())),
        ]
    })
}

fn build(shape: &Shape, vars: &[SimpleType]) -> SimpleType {
    match shape {
        Shape::Prim(prim) => (*prim).into(),
        Shape::Var(idx) => vars[*idx].clone(),
        Shape::Function(lhs, rhs) => SimpleType::function(build(lhs, vars), build(rhs, vars)),
        Shape::Tuple(elems) => SimpleType::tuple(elems.iter().map(|elem| build(elem, vars)).collect()),
        Shape::Record(fields) => SimpleType::record(
            fields
                .iter()
                .map(|(name, field)| ((*name).into(), build(field, vars)))
                .collect(),
        ),
    }
}

fn bound_count(typer: &Typer) -> usize {
    typer
        .table
        .vars()
        .map(|(_, state)| state.lower_bounds.len() + state.upper_bounds.len())
        .sum()
}

/// No variable may ever be bounded by a type from a deeper level.
fn levels_are_sound(typer: &Typer) -> Result<(), String> {
    for (var, state) in typer.table.vars() {
        for bound in state.lower_bounds.iter().chain(&state.upper_bounds) {
            if bound.level() > var.level() {
                return Err(format!(
                    "{var} at level {} bounded by {} at level {}",
                    var.level(),
                    typer.show_raw(bound),
                    bound.level()
                ));
            }
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256, .. ProptestConfig::default()
    })]

    #[test]
    fn test_bounds_never_escape_their_level(term in arb_term()) {
        let mut typer = Typer::new();
        let env = typer.builtins();
        let _ = typer.infer_type(&term, &env);

        let res = levels_are_sound(&typer);
        prop_assert!(res.is_ok(), "`{}`: {}", term, res.unwrap_err());
    }

    #[test]
    fn test_display_is_stable(term in arb_term()) {
        let mut typer = Typer::new();
        let env = typer.builtins();
        if let Ok(ty) = typer.infer_type(&term, &env) {
            let first = typer.show(&ty);
            let second = typer.show(&ty);
            prop_assert_eq!(&first, &second, "`{}`", term);

            // displaying allocates but never constrains
            prop_assert!(levels_are_sound(&typer).is_ok());
        }
    }

    #[test]
    fn test_sessions_agree(term in arb_term()) {
        let typed = |term: &Term| {
            let mut typer = Typer::new();
            let env = typer.builtins();
            typer
                .infer_type(term, &env)
                .map(|ty| typer.show(&ty))
                .map_err(|err| err.to_string())
        };
        prop_assert_eq!(typed(&term), typed(&term));
    }

    #[test]
    fn test_copies_are_mutual_subtypes(shape in arb_shape(), level in 0u32..3) {
        let mut typer = Typer::new();
        let vars: Vec<SimpleType> = (0..VAR_POOL).map(|_| typer.fresh_var(level)).collect();
        let lhs = build(&shape, &vars);
        let rhs = build(&shape, &vars);

        prop_assert!(typer.constrain(&lhs, &rhs).is_ok());
        prop_assert!(typer.constrain(&rhs, &lhs).is_ok());
        prop_assert!(typer.constrain(&lhs, &lhs).is_ok());
        prop_assert_eq!(bound_count(&typer), 0);
    }

    #[test]
    fn test_constrained_shapes_keep_levels(
        pairs in prop::collection::vec((arb_shape(), arb_shape()), 1..6),
        levels in prop::collection::vec(0u32..3, VAR_POOL),
    ) {
        let mut typer = Typer::new();
        let vars: Vec<SimpleType> = levels.iter().map(|level| typer.fresh_var(*level)).collect();
        for (lhs, rhs) in &pairs {
            let _ = typer.constrain(&build(lhs, &vars), &build(rhs, &vars));
        }

        let res = levels_are_sound(&typer);
        prop_assert!(res.is_ok(), "{}", res.unwrap_err());
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64, .. ProptestConfig::default()
    })]

    /// A fresh variable constrained against a primitive keeps exactly that
    /// bound.
    #[test]
    fn test_primitive_bound_is_recorded(prim in any::<PrimitiveTy>(), lower in any::<bool>()) {
        let mut typer = Typer::new();
        let var = typer.fresh_var(0);
        let prim_ty: SimpleType = prim.into();
        let (lhs, rhs) = if lower { (&prim_ty, &var) } else { (&var, &prim_ty) };
        prop_assert!(typer.constrain(lhs, rhs).is_ok());

        let tv = var.as_var().unwrap();
        let bounds = if lower { typer.lower_bounds(tv) } else { typer.upper_bounds(tv) };
        prop_assert_eq!(bounds.len(), 1);
        prop_assert!(bounds[0].same_object(&prim_ty));
    }
}
