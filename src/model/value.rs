// In: src/model/value.rs

//! The canonical in-memory representation of dzn values.
//!
//! `Value` is a closed tagged union: booleans, integers, floats, strings
//! (used for unresolved symbols), enum symbols, sets, and the two array-like
//! shapes (positional sequences and index-keyed mappings). The classifier at
//! the bottom of this module is the single place where a value's structural
//! category is decided; the encoder and index-set inferencer dispatch on its
//! result rather than re-inspecting variants.

use std::collections::BTreeMap;
use std::fmt;

/// The dzn language ceiling on array dimensionality.
pub const MAX_DIMENSIONS: usize = 6;

/// The table of enum types in scope for a document, keyed by type name.
pub type EnumTable = BTreeMap<String, EnumType>;

/// Inclusive span of `lo..hi` as an element count. Computed in `i128` so
/// bounds near the `i64` limits cannot overflow; `None` when the span does
/// not fit a `usize` (such a range could never be materialized anyway).
pub fn int_span(lo: i64, hi: i64) -> Option<usize> {
    if hi < lo {
        return Some(0);
    }
    usize::try_from(hi as i128 - lo as i128 + 1).ok()
}

//==================================================================================
// 1. Value
//==================================================================================

/// A single dzn value.
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    /// An opaque symbol that could not be (or was not asked to be) resolved
    /// against an enum table.
    Str(String),
    /// A symbol resolved against a known enum type, carrying its 1-based
    /// ordinal within that type's declaration order.
    Enum(EnumSymbol),
    Set(SetValue),
    /// A positional, 1-based array-like sequence.
    Seq(Vec<Value>),
    /// An index-keyed array-like mapping. Pairs preserve insertion order;
    /// keys must be all `Int` or all `Enum` of one type (enforced during
    /// index-set inference, not on construction).
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// A short human-readable name for the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Enum(_) => "enum",
            Value::Set(_) => "set",
            Value::Seq(_) => "array",
            Value::Map(_) => "array",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            // Ints and floats compare numerically, matching dzn coercion.
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                *a as f64 == *b
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

//==================================================================================
// 2. Sets
//==================================================================================

/// A dzn set. Contiguous integer ranges are carried symbolically so that a
/// range like `1..1000000` never has to be materialized, but equality and
/// membership behave exactly as if it were.
#[derive(Debug, Clone)]
pub enum SetValue {
    /// Inclusive integer range. Empty when `hi < lo`.
    IntRange(i64, i64),
    /// Inclusive real interval. Cannot be materialized; membership is by
    /// bound comparison.
    FloatRange(f64, f64),
    /// Explicit elements in the input container's iteration order.
    Elems(Vec<Value>),
}

impl SetValue {
    pub fn is_empty(&self) -> bool {
        match self {
            SetValue::IntRange(lo, hi) => hi < lo,
            SetValue::FloatRange(lo, hi) => hi < lo,
            SetValue::Elems(elems) => elems.is_empty(),
        }
    }

    /// Number of members, when finite and knowable without enumeration.
    pub fn len(&self) -> Option<usize> {
        match self {
            SetValue::IntRange(lo, hi) => int_span(*lo, *hi),
            SetValue::FloatRange(_, _) => None,
            SetValue::Elems(elems) => Some(elems.len()),
        }
    }

    /// Membership test, without materializing ranges.
    pub fn contains(&self, v: &Value) -> bool {
        match self {
            SetValue::IntRange(lo, hi) => match v {
                Value::Int(i) => lo <= i && i <= hi,
                Value::Float(f) => {
                    f.fract() == 0.0 && *lo as f64 <= *f && *f <= *hi as f64
                }
                _ => false,
            },
            SetValue::FloatRange(lo, hi) => match v {
                Value::Float(f) => lo <= f && f <= hi,
                Value::Int(i) => *lo <= *i as f64 && (*i as f64) <= *hi,
                _ => false,
            },
            SetValue::Elems(elems) => elems.iter().any(|e| e == v),
        }
    }

    /// If every member is an integer and the members form a contiguous run,
    /// returns the inclusive bounds. The members' order is irrelevant.
    pub fn as_contiguous_int_range(&self) -> Option<(i64, i64)> {
        match self {
            SetValue::IntRange(lo, hi) => {
                if hi < lo {
                    None
                } else {
                    Some((*lo, *hi))
                }
            }
            SetValue::FloatRange(_, _) => None,
            SetValue::Elems(elems) => {
                if elems.is_empty() {
                    return None;
                }
                let mut ints = Vec::with_capacity(elems.len());
                for e in elems {
                    match e {
                        Value::Int(i) => ints.push(*i),
                        _ => return None,
                    }
                }
                ints.sort_unstable();
                ints.dedup();
                let (lo, hi) = (ints[0], ints[ints.len() - 1]);
                if int_span(lo, hi) == Some(ints.len()) {
                    Some((lo, hi))
                } else {
                    None
                }
            }
        }
    }
}

impl PartialEq for SetValue {
    fn eq(&self, other: &Self) -> bool {
        // Integer sets compare by their materialized membership, so
        // IntRange(1, 3) == Elems([3, 1, 2]).
        if let (Some(a), Some(b)) = (
            self.as_contiguous_int_range(),
            other.as_contiguous_int_range(),
        ) {
            return a == b;
        }
        match (self, other) {
            (SetValue::IntRange(a, b), SetValue::IntRange(c, d)) => {
                // Both non-contiguous means both empty.
                (b < a && d < c) || (a, b) == (c, d)
            }
            (SetValue::FloatRange(a, b), SetValue::FloatRange(c, d)) => (a, b) == (c, d),
            (SetValue::Elems(a), SetValue::Elems(b)) => {
                a.len() == b.len()
                    && a.iter().all(|e| b.contains(e))
                    && b.iter().all(|e| a.contains(e))
            }
            (SetValue::IntRange(lo, hi), SetValue::Elems(elems))
            | (SetValue::Elems(elems), SetValue::IntRange(lo, hi)) => {
                // The range side was not contiguous-representable, i.e. empty.
                hi < lo && elems.is_empty()
            }
            _ => false,
        }
    }
}

//==================================================================================
// 3. Enums
//==================================================================================

/// A symbol resolved against a known enum type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSymbol {
    /// The enum type this symbol belongs to.
    pub enum_name: String,
    /// The symbol's literal name.
    pub symbol: String,
    /// 1-based position within the enum's declaration order.
    pub ordinal: u32,
}

impl fmt::Display for EnumSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

/// An enum type: a name bound to an ordered sequence of symbol names.
/// Constructed once per document from an `enum = {A, B, C};` statement and
/// immutable afterward; declaration order assigns ordinals 1..k.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    pub symbols: Vec<String>,
}

impl EnumType {
    pub fn new(name: impl Into<String>, symbols: Vec<String>) -> Self {
        Self {
            name: name.into(),
            symbols,
        }
    }

    /// 1-based ordinal of a symbol, if it belongs to this enum.
    pub fn ordinal_of(&self, symbol: &str) -> Option<u32> {
        self.symbols
            .iter()
            .position(|s| s == symbol)
            .map(|p| (p + 1) as u32)
    }

    /// Resolves a symbol name into an ordinal-bearing `EnumSymbol`.
    pub fn resolve(&self, symbol: &str) -> Option<EnumSymbol> {
        self.ordinal_of(symbol).map(|ordinal| EnumSymbol {
            enum_name: self.name.clone(),
            symbol: symbol.to_string(),
            ordinal,
        })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

//==================================================================================
// 4. Index Sets
//==================================================================================

/// The ordered per-dimension bounds of an array. Empty for the untyped empty
/// array, otherwise between one and `MAX_DIMENSIONS` entries.
pub type IndexSet = Vec<DimBound>;

/// The bound of a single array dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimBound {
    /// Inclusive integer bounds, `lo..hi` in dzn.
    IntRange(i64, i64),
    /// An enum-indexed dimension; the bound is the enum type itself.
    EnumIndex { enum_name: String, len: usize },
    /// A zero-length dimension, `{}` in dzn.
    Empty,
}

impl DimBound {
    /// Number of index positions along this dimension, `None` when the range
    /// spans more positions than a `usize` can count.
    pub fn len(&self) -> Option<usize> {
        match self {
            DimBound::IntRange(lo, hi) => int_span(*lo, *hi),
            DimBound::EnumIndex { len, .. } => Some(*len),
            DimBound::Empty => Some(0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }
}

impl fmt::Display for DimBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimBound::IntRange(lo, hi) => write!(f, "{}..{}", lo, hi),
            DimBound::EnumIndex { enum_name, .. } => f.write_str(enum_name),
            DimBound::Empty => f.write_str("{}"),
        }
    }
}

//==================================================================================
// 5. The Boundary Classifier
//==================================================================================

/// The structural category of a value, decided once at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueClass {
    Scalar,
    Set,
    ArrayLike,
    /// A shape the dzn notation cannot express (e.g. a set of sets).
    Unsupported,
}

/// Classifies a value as scalar, set, or array-like.
///
/// A set is only a valid dzn set when its elements are all scalar; a set
/// containing sets or arrays classifies as `Unsupported`, and operations
/// built on top fail with `DznError::UnsupportedType`.
pub fn classify(v: &Value) -> ValueClass {
    match v {
        Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Str(_) | Value::Enum(_) => {
            ValueClass::Scalar
        }
        Value::Set(SetValue::Elems(elems)) => {
            if elems.iter().all(|e| classify(e) == ValueClass::Scalar) {
                ValueClass::Set
            } else {
                ValueClass::Unsupported
            }
        }
        Value::Set(_) => ValueClass::Set,
        Value::Seq(_) | Value::Map(_) => ValueClass::ArrayLike,
    }
}

//==================================================================================
// 6. Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_equality_is_membership_based() {
        let range = SetValue::IntRange(1, 3);
        let elems = SetValue::Elems(vec![Value::Int(3), Value::Int(1), Value::Int(2)]);
        assert_eq!(range, elems);

        let gap = SetValue::Elems(vec![Value::Int(1), Value::Int(3)]);
        assert_ne!(range, gap);
    }

    #[test]
    fn test_empty_sets_are_equal_across_representations() {
        assert_eq!(
            SetValue::IntRange(5, 4),
            SetValue::Elems(Vec::new())
        );
    }

    #[test]
    fn test_range_membership_without_materialization() {
        let big = SetValue::IntRange(1, 1_000_000_000);
        assert!(big.contains(&Value::Int(999_999_999)));
        assert!(!big.contains(&Value::Int(0)));
        assert_eq!(big.len(), Some(1_000_000_000));
    }

    #[test]
    fn test_contiguity_detection_ignores_order_and_duplicates() {
        let s = SetValue::Elems(vec![Value::Int(3), Value::Int(1), Value::Int(2), Value::Int(2)]);
        assert_eq!(s.as_contiguous_int_range(), Some((1, 3)));

        let gap = SetValue::Elems(vec![Value::Int(1), Value::Int(3)]);
        assert_eq!(gap.as_contiguous_int_range(), None);
    }

    #[test]
    fn test_extreme_spans_do_not_overflow() {
        let full = SetValue::IntRange(i64::MIN, i64::MAX);
        assert_eq!(full.len(), None);
        assert!(full.contains(&Value::Int(0)));

        // The two i64 endpoints are not a representable contiguous run, so
        // no range compaction applies.
        let ends = SetValue::Elems(vec![Value::Int(i64::MIN), Value::Int(i64::MAX)]);
        assert_eq!(ends.as_contiguous_int_range(), None);

        assert_eq!(DimBound::IntRange(i64::MIN, i64::MAX).len(), None);
        assert_eq!(DimBound::IntRange(1, 3).len(), Some(3));
        assert_eq!(DimBound::IntRange(5, 4).len(), Some(0));
    }

    #[test]
    fn test_enum_ordinals_follow_declaration_order() {
        let e = EnumType::new("P", vec!["A".into(), "B".into(), "C".into()]);
        assert_eq!(e.ordinal_of("B"), Some(2));
        assert_eq!(e.ordinal_of("Z"), None);
        let sym = e.resolve("C").unwrap();
        assert_eq!(sym.ordinal, 3);
        assert_eq!(sym.enum_name, "P");
    }

    #[test]
    fn test_classify_rejects_set_of_sets() {
        let inner = Value::Set(SetValue::IntRange(1, 2));
        let outer = Value::Set(SetValue::Elems(vec![inner]));
        assert_eq!(classify(&outer), ValueClass::Unsupported);

        let flat = Value::Set(SetValue::Elems(vec![Value::Int(1), Value::Int(2)]));
        assert_eq!(classify(&flat), ValueClass::Set);
    }

    #[test]
    fn test_classify_array_likes() {
        assert_eq!(classify(&Value::Seq(vec![Value::Int(1)])), ValueClass::ArrayLike);
        assert_eq!(
            classify(&Value::Map(vec![(Value::Int(1), Value::Int(10))])),
            ValueClass::ArrayLike
        );
        assert_eq!(classify(&Value::Bool(true)), ValueClass::Scalar);
    }
}
