// In: src/model/var_type.rs

//! Caller-supplied type descriptors used to direct decoding.
//!
//! A `VariableType` is never inferred by this crate: it comes from outside,
//! typically deserialized straight from the model compiler's JSON interface
//! dump. When present it selects exactly one decode branch and turns a silent
//! misparse into an explicit `TypeMismatch` error; when absent, decoding
//! falls back to pure lexical-shape inference.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The base kind of a variable.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Bool,
    Int,
    Float,
    Enum,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TypeKind::Bool => "bool",
            TypeKind::Int => "int",
            TypeKind::Float => "float",
            TypeKind::Enum => "enum",
        };
        f.write_str(s)
    }
}

/// A type descriptor for one variable, as reported by the model compiler.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VariableType {
    /// Base kind of the variable (or of the array elements / set members).
    #[serde(rename = "type")]
    pub kind: TypeKind,

    /// Array dimension count; 0 for a plain scalar or set.
    #[serde(default, alias = "dims")]
    pub dim: usize,

    /// True when the value is a set (or an array of sets).
    #[serde(default, rename = "set")]
    pub is_set: bool,

    /// For `kind == Enum`: the name of the enum type the value draws its
    /// symbols from.
    #[serde(default)]
    pub enum_type: Option<String>,
}

impl VariableType {
    /// A plain scalar descriptor of the given kind.
    pub fn scalar(kind: TypeKind) -> Self {
        Self {
            kind,
            dim: 0,
            is_set: false,
            enum_type: None,
        }
    }

    /// An enum scalar descriptor bound to a named enum type.
    pub fn enum_scalar(enum_type: impl Into<String>) -> Self {
        Self {
            kind: TypeKind::Enum,
            dim: 0,
            is_set: false,
            enum_type: Some(enum_type.into()),
        }
    }

    /// Human-readable description used in `TypeMismatch` messages.
    pub fn describe(&self) -> String {
        let base = match (&self.enum_type, self.kind) {
            (Some(name), TypeKind::Enum) => name.clone(),
            (_, kind) => kind.to_string(),
        };
        let base = if self.is_set {
            format!("set of {}", base)
        } else {
            base
        };
        if self.dim > 0 {
            format!("array{}d of {}", self.dim, base)
        } else {
            base
        }
    }
}
