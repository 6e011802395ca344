//! This file is the root of the `dzn_core` Rust crate.
//!
//! The crate is the data interchange and solution-stream engine for the
//! MiniZinc dzn notation:
//! 1.  A bidirectional codec between structured in-memory values (booleans,
//!     integers, floats, sets, multi-dimensional arrays, enumerations) and
//!     dzn text, with index-set inference and round-trip fidelity.
//! 2.  A streaming parser that incrementally decodes a solver's textual
//!     output into discrete solution records, tracking search status and
//!     exposing the solutions as a lazy, possibly-concurrently-populated
//!     collection.
//!
//! Process orchestration (invoking compilers/solvers, temp files, CLI flags)
//! is deliberately outside this crate: it consumes and produces text at the
//! boundary only.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod codec;
pub mod config;
pub mod error;
pub mod model;
pub mod stream;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use codec::{
    decode_value, encode_enum, encode_statement, encode_value, infer_index_set, parse_document,
    split_statements, Document,
};
pub use config::{EncodeOptions, ParseOptions};
pub use error::DznError;
pub use model::{
    classify, DimBound, EnumSymbol, EnumTable, EnumType, IndexSet, SetValue, Solution, Status,
    TypeKind, Value, ValueClass, VariableType, MAX_DIMENSIONS,
};
pub use stream::{
    expect_one, parse_lines, parse_output, parse_reader, SolutionStream, StreamOptions,
    StreamProducer, StreamState,
};
