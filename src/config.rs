// In: src/config.rs

//! The single source of truth for codec configuration.
//!
//! This module defines the `EncodeOptions` and `ParseOptions` structs, which
//! are designed to be created once at the application boundary and then passed
//! down by reference. There is deliberately no module-level mutable state:
//! encoding and decoding are referentially transparent given their options.

use serde::{Deserialize, Serialize};

//==================================================================================
// I. Encoder Options
//==================================================================================

/// Options controlling how values are rendered as dzn text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct EncodeOptions {
    /// Soft column limit for statement output. Lines are broken after commas
    /// once they exceed this width. Wrapping is purely cosmetic: continuation
    /// lines are rejoined by whitespace-insensitive parsing, so it never
    /// affects round-trip semantics. `None` disables wrapping.
    #[serde(default = "default_line_width")]
    pub line_width: Option<usize>,

    /// If true, statements are prefixed with a dzn type declaration derived
    /// from the value (`int: x = 3;`, `array[1..2] of int: ...`).
    #[serde(default)]
    pub declarations: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            line_width: default_line_width(),
            declarations: false,
        }
    }
}

/// Helper for `serde` to provide the default wrap width.
fn default_line_width() -> Option<usize> {
    Some(80)
}

//==================================================================================
// II. Parser Options
//==================================================================================

/// Options controlling how dzn text is decoded back into values.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ParseOptions {
    /// If true (the default), any array dimension whose lower bound is 1 is
    /// decoded as a plain positional sequence instead of an index-keyed
    /// mapping. This is the canonical round-trip asymmetry of the notation:
    /// `array1d(1..3, [2, 4, 6])` decodes to `[2, 4, 6]`, not `{1:2, ...}`.
    #[serde(default = "default_true")]
    pub rebase: bool,

    /// If true (the default), brace lists of bare identifiers are collected
    /// as enum declarations and bare symbols in later statements resolve
    /// against them.
    #[serde(default = "default_true")]
    pub resolve_enums: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            rebase: true,
            resolve_enums: true,
        }
    }
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}
