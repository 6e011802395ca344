//! This module defines the core, strongly-typed data representations used
//! throughout the dzn-core codec and stream pipeline.
//!
//! Foreign data is converted into the closed `Value` enum exactly once, at the
//! boundary where it enters the system; everything downstream dispatches on
//! the variant tag instead of re-inspecting runtime shapes.

pub mod solution;
pub mod status;
pub mod value;
pub mod var_type;

// Re-export the main types for easier access.
pub use solution::Solution;
pub use status::Status;
pub use value::{
    classify, int_span, DimBound, EnumSymbol, EnumTable, EnumType, IndexSet, SetValue, Value,
    ValueClass, MAX_DIMENSIONS,
};
pub use var_type::{TypeKind, VariableType};
