use crate::{OutputTy, PrimitiveTy, TyRef};
use proptest::{
    prelude::{prop, prop_oneof, Arbitrary, BoxedStrategy, Just, Strategy},
    sample::select,
};
use smol_str::SmolStr;

#[derive(Debug, Clone, Copy)]
pub struct RecursiveParams {
    pub depth: u32,
    pub desired_size: u32,
    pub expected_branch_size: u32,
}

impl Default for RecursiveParams {
    fn default() -> Self {
        Self {
            depth: 4,                // levels deep
            desired_size: 48,        // total nodes
            expected_branch_size: 3, // items per collection
        }
    }
}

fn arb_output_ty(args: RecursiveParams) -> impl Strategy<Value = OutputTy> {
    let leaf = prop_oneof![
        Just(OutputTy::Top),
        Just(OutputTy::Bottom),
        arb_prim().prop_map(OutputTy::Primitive),
        // a handful of uids so variables repeat
        (0u32..6).prop_map(OutputTy::TyVar),
    ];

    leaf.prop_recursive(
        args.depth,
        args.desired_size,
        args.expected_branch_size,
        |inner| {
            let inner = inner.prop_map(TyRef::from);

            prop_oneof![
                (inner.clone(), inner.clone())
                    .prop_map(|(param, body)| OutputTy::Function { param, body }),
                prop::collection::vec(inner.clone(), 0..3).prop_map(OutputTy::Tuple),
                prop::collection::btree_map(arb_field_name(), inner.clone(), 0..3)
                    .prop_map(|fields| OutputTy::Record(fields.into_iter().collect())),
                prop::collection::vec(inner.clone(), 2..4).prop_map(OutputTy::Union),
                prop::collection::vec(inner.clone(), 2..4).prop_map(OutputTy::Intersection),
                (0u32..6, inner.clone())
                    .prop_map(|(binder, body)| OutputTy::Recursive { binder, body }),
            ]
        },
    )
}

fn arb_field_name() -> impl Strategy<Value = SmolStr> {
    select(&["a", "b", "self", "thing"][..]).prop_map(SmolStr::from)
}

pub fn arb_prim() -> impl Strategy<Value = PrimitiveTy> {
    prop_oneof![
        Just(PrimitiveTy::Bool),
        Just(PrimitiveTy::Int),
        Just(PrimitiveTy::Float),
        Just(PrimitiveTy::String),
    ]
    .boxed()
}

impl Arbitrary for PrimitiveTy {
    type Parameters = ();
    type Strategy = BoxedStrategy<PrimitiveTy>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        arb_prim().boxed()
    }
}

impl Arbitrary for OutputTy {
    type Parameters = RecursiveParams;
    type Strategy = BoxedStrategy<OutputTy>;

    fn arbitrary_with(args: Self::Parameters) -> Self::Strategy {
        arb_output_ty(args).boxed()
    }
}
