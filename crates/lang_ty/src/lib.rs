mod output_ty;
mod primitive;

#[cfg(any(test, feature = "proptest_support"))]
pub mod arbitrary;

pub use output_ty::{tyvar_name, OutputTy, Substitutions, TyRef};
pub use primitive::PrimitiveTy;
