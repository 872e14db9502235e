use proptest::{
    prelude::{any, prop, prop_oneof, Arbitrary, BoxedStrategy, Just, Strategy},
    sample::select,
};

use crate::{build, Literal, Name, Term};

#[derive(Debug, Clone, Copy)]
pub struct RecursiveParams {
    pub depth: u32,
    pub desired_size: u32,
    pub expected_branch_size: u32,
}

impl Default for RecursiveParams {
    fn default() -> Self {
        Self {
            depth: 5,
            desired_size: 48,
            expected_branch_size: 3,
        }
    }
}

// Binders and builtins share one small pool so generated terms are closed
// often enough to get past name lookup.
const NAMES: &[&str] = &["x", "y", "f", "true", "false", "not", "succ", "add", "if"];
const BINDERS: &[&str] = &["x", "y", "f"];
const FIELDS: &[&str] = &["a", "b", "u"];

fn arb_name(pool: &'static [&'static str]) -> impl Strategy<Value = Name> {
    select(pool).prop_map(Name::from)
}

impl Arbitrary for Literal {
    type Parameters = ();
    type Strategy = BoxedStrategy<Literal>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            any::<bool>().prop_map(Literal::Bool),
            (-100i64..100).prop_map(Literal::Integer),
            (-100.0f64..100.0).prop_map(|x| Literal::Float(x.into())),
            Just(Literal::String("s".into())),
        ]
        .boxed()
    }
}

fn arb_term(args: RecursiveParams) -> impl Strategy<Value = Term> {
    let leaf = prop_oneof![
        any::<Literal>().prop_map(Term::Literal),
        arb_name(NAMES).prop_map(Term::Var),
    ];

    leaf.prop_recursive(
        args.depth,
        args.desired_size,
        args.expected_branch_size,
        |inner| {
            prop_oneof![
                (arb_name(BINDERS), inner.clone()).prop_map(|(param, body)| build::lam(param, body)),
                (inner.clone(), inner.clone()).prop_map(|(fun, arg)| build::app(fun, arg)),
                prop::collection::btree_map(arb_name(FIELDS), inner.clone(), 0..3)
                    .prop_map(build::rcd),
                (inner.clone(), arb_name(FIELDS)).prop_map(|(recv, field)| build::sel(recv, field)),
                prop::collection::vec(inner.clone(), 0..3).prop_map(build::tup),
                (any::<bool>(), arb_name(BINDERS), inner.clone(), inner.clone()).prop_map(
                    |(is_rec, name, rhs, body)| if is_rec {
                        build::let_rec(name, rhs, body)
                    } else {
                        build::let_in(name, rhs, body)
                    }
                ),
            ]
        },
    )
}

impl Arbitrary for Term {
    type Parameters = RecursiveParams;
    type Strategy = BoxedStrategy<Term>;

    fn arbitrary_with(args: Self::Parameters) -> Self::Strategy {
        arb_term(args).boxed()
    }
}
