// In: src/error.rs

//! This module defines the single, unified error type for the entire dzn-core
//! library. It uses the `thiserror` crate to provide ergonomic, context-aware
//! error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DznError {
    // =========================================================================
    // === Structural Errors (Raised by classification / index-set inference)
    // =========================================================================
    #[error("Unsupported value shape for dzn: {0}")]
    UnsupportedType(String),

    #[error("Array shape error: {0}")]
    Shape(String),

    #[error("Array has {0} dimensions, dzn supports at most 6")]
    Dimension(usize),

    // =========================================================================
    // === Grammar Errors (Raised by the decoder and statement splitter)
    // =========================================================================
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Type mismatch for '{name}': declared {expected}, but value parses as {found}")]
    TypeMismatch {
        name: String,
        expected: String,
        found: String,
    },

    #[error("Unknown enum type or symbol: {0}")]
    UnknownEnum(String),

    // =========================================================================
    // === Stream / Collection Errors
    // =========================================================================
    #[error("Unsupported operation on a drain-once stream: {0}")]
    UnsupportedOperation(String),

    /// Raised only by `expect_one`-style entry points; during normal stream
    /// consumption these conditions are carried as `Status`, not errors.
    #[error("The model instance is unsatisfiable")]
    Unsatisfiable,

    #[error("The objective of the model instance is unbounded")]
    Unbounded,

    #[error("The model instance is unsatisfiable or unbounded")]
    UnsatOrUnbounded,

    #[error("No solution was found within the search")]
    NoSolution,

    #[error("Solver error: {0}")]
    Solver(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the underlying I/O subsystem while reading
    /// solver output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically while deserializing a
    /// model-interface type descriptor.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}
