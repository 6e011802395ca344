// In: src/codec/encode.rs

//! The dzn encoder: classified values in, dzn text out.
//!
//! Arrays are flattened row-major over the index-set inferred in
//! `codec::infer` and rendered in the declaration-capable
//! `array<N>d(bounds..., [values...])` form. All output is a pure function of
//! the value and the supplied `EncodeOptions`; there is no global state.

use crate::config::EncodeOptions;
use crate::error::DznError;
use crate::model::{classify, EnumType, SetValue, Value, ValueClass};

//==================================================================================
// 1. Public API
//==================================================================================

/// Renders one value as dzn text. Wrapping applies at statement level only,
/// so the options do not affect the bare value form.
pub fn encode_value(v: &Value, _opts: &EncodeOptions) -> Result<String, DznError> {
    match classify(v) {
        ValueClass::Scalar => scalar_text(v),
        ValueClass::Set => match v {
            Value::Set(s) => set_text(s),
            _ => unreachable!("classified Set is always Value::Set"),
        },
        ValueClass::ArrayLike => array_text(v),
        ValueClass::Unsupported => Err(DznError::UnsupportedType(format!(
            "value of type {} cannot be expressed in dzn",
            v.kind_name()
        ))),
    }
}

/// Renders a full `name = value;` statement, optionally wrapped at the
/// configured column width and optionally prefixed with a type declaration.
pub fn encode_statement(name: &str, v: &Value, opts: &EncodeOptions) -> Result<String, DznError> {
    let value_text = encode_value(v, opts)?;
    let mut stmt = if opts.declarations {
        format!("{}: {} = {};", declaration_prefix(v)?, name, value_text)
    } else {
        format!("{} = {};", name, value_text)
    };
    if let Some(width) = opts.line_width {
        stmt = wrap_at_commas(&stmt, width);
    }
    Ok(stmt)
}

/// Renders an enum declaration statement. The brace list looks unordered but
/// is order-significant: position assigns the 1-based ordinals.
pub fn encode_enum(e: &EnumType) -> String {
    format!("{} = {{{}}};", e.name, e.symbols.join(", "))
}

//==================================================================================
// 2. Scalars and Sets
//==================================================================================

fn scalar_text(v: &Value) -> Result<String, DznError> {
    match v {
        Value::Bool(b) => Ok(if *b { "true" } else { "false" }.to_string()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(f) => float_text(*f),
        Value::Str(s) => symbol_text(s),
        Value::Enum(sym) => Ok(sym.symbol.clone()),
        _ => unreachable!("scalar_text called on non-scalar"),
    }
}

/// Canonical float rendering. Non-finite floats have no dzn literal form.
/// Rust's `{}` formatting drops the fractional part of whole floats
/// (`2.0` -> `"2"`), which would re-parse as an int, so a `.0` suffix is
/// forced when the text carries no float cue.
fn float_text(f: f64) -> Result<String, DznError> {
    if !f.is_finite() {
        return Err(DznError::UnsupportedType(format!(
            "non-finite float {} has no dzn representation",
            f
        )));
    }
    let s = format!("{}", f);
    if s.contains('.') || s.contains('e') || s.contains('E') {
        Ok(s)
    } else {
        Ok(format!("{}.0", s))
    }
}

/// Bare identifiers render raw; anything else takes the quoted-symbol form.
/// dzn has no escape inside a quoted symbol, so a symbol containing a quote
/// (or a line break) cannot be expressed.
fn symbol_text(s: &str) -> Result<String, DznError> {
    if is_identifier(s) {
        return Ok(s.to_string());
    }
    if s.is_empty() || s.contains('\'') || s.contains('\n') {
        return Err(DznError::UnsupportedType(format!(
            "string cannot be expressed as a dzn symbol: {:?}",
            s
        )));
    }
    Ok(format!("'{}'", s))
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn set_text(s: &SetValue) -> Result<String, DznError> {
    if s.is_empty() {
        return Ok("{}".to_string());
    }
    // Contiguous integer sets compact to the range form.
    if let Some((lo, hi)) = s.as_contiguous_int_range() {
        return Ok(format!("{}..{}", lo, hi));
    }
    match s {
        SetValue::FloatRange(lo, hi) => Ok(format!("{}..{}", float_text(*lo)?, float_text(*hi)?)),
        SetValue::Elems(elems) => {
            let mut parts = Vec::with_capacity(elems.len());
            for e in elems {
                if classify(e) != ValueClass::Scalar {
                    return Err(DznError::UnsupportedType(format!(
                        "set elements must be scalar, got {}",
                        e.kind_name()
                    )));
                }
                parts.push(scalar_text(e)?);
            }
            Ok(format!("{{{}}}", parts.join(", ")))
        }
        SetValue::IntRange(_, _) => unreachable!("non-empty int range is always contiguous"),
    }
}

//==================================================================================
// 3. Arrays
//==================================================================================

fn array_text(v: &Value) -> Result<String, DznError> {
    let index_set = super::infer::infer_index_set(v)?;

    // The untyped empty array: dimension reported as 1 with an explicit
    // empty-set bound.
    if index_set.is_empty() {
        return Ok("array1d({}, [])".to_string());
    }

    let mut leaves = Vec::new();
    flatten(v, index_set.len(), &mut leaves)?;

    let mut rendered = Vec::with_capacity(leaves.len());
    for leaf in leaves {
        rendered.push(leaf_text(leaf)?);
    }

    let bounds: Vec<String> = index_set.iter().map(|b| b.to_string()).collect();
    Ok(format!(
        "array{}d({}, [{}])",
        index_set.len(),
        bounds.join(", "),
        rendered.join(", ")
    ))
}

/// Row-major flatten over `depth` remaining dimensions. Shape errors cannot
/// occur here: inference has already validated the structure.
fn flatten<'a>(v: &'a Value, depth: usize, out: &mut Vec<&'a Value>) -> Result<(), DznError> {
    if depth == 0 {
        out.push(v);
        return Ok(());
    }
    match v {
        Value::Seq(items) => {
            for item in items {
                flatten(item, depth - 1, out)?;
            }
            Ok(())
        }
        Value::Map(pairs) => {
            for item in super::infer::map_in_index_order(pairs)? {
                flatten(item, depth - 1, out)?;
            }
            Ok(())
        }
        other => Err(DznError::Shape(format!(
            "expected {} more array dimensions, found {}",
            depth,
            other.kind_name()
        ))),
    }
}

fn leaf_text(v: &Value) -> Result<String, DznError> {
    match classify(v) {
        ValueClass::Scalar => scalar_text(v),
        ValueClass::Set => match v {
            Value::Set(s) => set_text(s),
            _ => unreachable!(),
        },
        _ => Err(DznError::UnsupportedType(format!(
            "array elements must be scalars or sets, got {}",
            v.kind_name()
        ))),
    }
}

//==================================================================================
// 4. Declarations
//==================================================================================

/// Derives the dzn type prefix (`int`, `set of int`, `array[1..3] of bool`,
/// ...) from the same classification and inference used for the value.
fn declaration_prefix(v: &Value) -> Result<String, DznError> {
    match classify(v) {
        ValueClass::Scalar => Ok(scalar_type_name(v).to_string()),
        ValueClass::Set => {
            let elem = match v {
                Value::Set(SetValue::FloatRange(_, _)) => "float",
                Value::Set(SetValue::Elems(elems)) => elems
                    .first()
                    .map(scalar_type_name)
                    .unwrap_or("int"),
                _ => "int",
            };
            Ok(format!("set of {}", elem))
        }
        ValueClass::ArrayLike => {
            let index_set = super::infer::infer_index_set(v)?;
            if index_set.is_empty() {
                return Ok("array[{}] of int".to_string());
            }
            let mut leaves = Vec::new();
            flatten(v, index_set.len(), &mut leaves)?;
            let elem = leaves.first().map(|l| element_type_name(l)).unwrap_or("int");
            let bounds: Vec<String> = index_set.iter().map(|b| b.to_string()).collect();
            Ok(format!("array[{}] of {}", bounds.join(", "), elem))
        }
        ValueClass::Unsupported => Err(DznError::UnsupportedType(format!(
            "value of type {} cannot be declared in dzn",
            v.kind_name()
        ))),
    }
}

fn scalar_type_name(v: &Value) -> &str {
    match v {
        Value::Bool(_) => "bool",
        Value::Int(_) => "int",
        Value::Float(_) => "float",
        Value::Enum(sym) => sym.enum_name.as_str(),
        _ => "int",
    }
}

fn element_type_name(v: &Value) -> &str {
    match v {
        Value::Set(_) => "set of int",
        other => scalar_type_name(other),
    }
}

//==================================================================================
// 5. Cosmetic Line Wrapping
//==================================================================================

/// Breaks a statement after commas once a line exceeds `width`. Continuation
/// lines are indented two spaces. The parser is whitespace-insensitive, so
/// this never changes round-trip semantics.
fn wrap_at_commas(stmt: &str, width: usize) -> String {
    if stmt.len() <= width {
        return stmt.to_string();
    }
    let mut out = String::with_capacity(stmt.len() + 16);
    let mut line_len = 0;
    let mut iter = stmt.char_indices().peekable();
    while let Some((_, c)) = iter.next() {
        out.push(c);
        line_len += 1;
        if c == ',' && line_len >= width {
            // Consume the following space, if any, and break here.
            if let Some(&(_, ' ')) = iter.peek() {
                iter.next();
            }
            out.push('\n');
            out.push_str("  ");
            line_len = 2;
        }
    }
    out
}

//==================================================================================
// 6. Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EnumType;

    fn opts() -> EncodeOptions {
        EncodeOptions::default()
    }

    fn ints(items: &[i64]) -> Value {
        Value::Seq(items.iter().map(|&i| Value::Int(i)).collect())
    }

    #[test]
    fn test_scalar_rendering() {
        assert_eq!(encode_value(&Value::Bool(true), &opts()).unwrap(), "true");
        assert_eq!(encode_value(&Value::Int(-7), &opts()).unwrap(), "-7");
        assert_eq!(encode_value(&Value::Float(2.5), &opts()).unwrap(), "2.5");
        // Whole floats must keep a float cue so they re-parse as floats.
        assert_eq!(encode_value(&Value::Float(2.0), &opts()).unwrap(), "2.0");
    }

    #[test]
    fn test_contiguity_compaction() {
        let contiguous = Value::Set(SetValue::Elems(vec![
            Value::Int(1),
            Value::Int(2),
            Value::Int(3),
        ]));
        assert_eq!(encode_value(&contiguous, &opts()).unwrap(), "1..3");

        let gap = Value::Set(SetValue::Elems(vec![Value::Int(1), Value::Int(3)]));
        assert_eq!(encode_value(&gap, &opts()).unwrap(), "{1, 3}");

        let empty = Value::Set(SetValue::Elems(Vec::new()));
        assert_eq!(encode_value(&empty, &opts()).unwrap(), "{}");
    }

    #[test]
    fn test_extreme_set_bounds_render_without_compaction() {
        // The two i64 endpoints span more than usize can count, so they must
        // stay an explicit element list rather than a range.
        let v = Value::Set(SetValue::Elems(vec![
            Value::Int(i64::MIN),
            Value::Int(i64::MAX),
        ]));
        assert_eq!(
            encode_value(&v, &opts()).unwrap(),
            "{-9223372036854775808, 9223372036854775807}"
        );
    }

    #[test]
    fn test_non_finite_floats_are_rejected() {
        for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                encode_value(&Value::Float(f), &opts()).unwrap_err(),
                DznError::UnsupportedType(_)
            ));
        }
        let open = Value::Set(SetValue::FloatRange(0.0, f64::INFINITY));
        assert!(encode_value(&open, &opts()).is_err());
        // Finite rendering is unaffected.
        assert_eq!(encode_value(&Value::Float(1e300), &opts()).unwrap(), "1e300");
    }

    #[test]
    fn test_symbol_strings_render_parseable() {
        assert_eq!(
            encode_value(&Value::Str("plain_sym".into()), &opts()).unwrap(),
            "plain_sym"
        );
        // Non-identifier content takes the quoted form.
        assert_eq!(
            encode_value(&Value::Str("two words".into()), &opts()).unwrap(),
            "'two words'"
        );
        assert!(matches!(
            encode_value(&Value::Str("don't".into()), &opts()).unwrap_err(),
            DznError::UnsupportedType(_)
        ));
    }

    #[test]
    fn test_two_dimensional_array() {
        let v = Value::Seq(vec![ints(&[1, 2]), ints(&[3, 4])]);
        assert_eq!(
            encode_value(&v, &opts()).unwrap(),
            "array2d(1..2, 1..2, [1, 2, 3, 4])"
        );
    }

    #[test]
    fn test_keyed_array_flattens_in_index_order() {
        let v = Value::Map(vec![
            (Value::Int(3), Value::Int(6)),
            (Value::Int(1), Value::Int(2)),
            (Value::Int(2), Value::Int(4)),
        ]);
        assert_eq!(
            encode_value(&v, &opts()).unwrap(),
            "array1d(1..3, [2, 4, 6])"
        );
    }

    #[test]
    fn test_empty_array_form() {
        assert_eq!(
            encode_value(&Value::Seq(Vec::new()), &opts()).unwrap(),
            "array1d({}, [])"
        );
    }

    #[test]
    fn test_ragged_array_fails() {
        let v = Value::Seq(vec![ints(&[1, 2]), ints(&[3, 4, 5])]);
        assert!(matches!(
            encode_value(&v, &opts()).unwrap_err(),
            DznError::Shape(_)
        ));
    }

    #[test]
    fn test_statement_and_declaration_forms() {
        let v = Value::Seq(vec![ints(&[1, 2]), ints(&[3, 4])]);
        assert_eq!(
            encode_statement("m", &v, &opts()).unwrap(),
            "m = array2d(1..2, 1..2, [1, 2, 3, 4]);"
        );

        let decl = EncodeOptions {
            declarations: true,
            ..EncodeOptions::default()
        };
        assert_eq!(
            encode_statement("m", &v, &decl).unwrap(),
            "array[1..2, 1..2] of int: m = array2d(1..2, 1..2, [1, 2, 3, 4]);"
        );
        assert_eq!(
            encode_statement("x", &Value::Int(3), &decl).unwrap(),
            "int: x = 3;"
        );
    }

    #[test]
    fn test_enum_declaration() {
        let e = EnumType::new("P", vec!["A".into(), "B".into(), "C".into()]);
        assert_eq!(encode_enum(&e), "P = {A, B, C};");
    }

    #[test]
    fn test_wrapping_is_cosmetic() {
        let v = ints(&[10, 20, 30, 40, 50, 60, 70, 80]);
        let narrow = EncodeOptions {
            line_width: Some(20),
            declarations: false,
        };
        let wrapped = encode_statement("xs", &v, &narrow).unwrap();
        assert!(wrapped.contains('\n'));
        // Stripping the cosmetic whitespace recovers the unwrapped statement.
        let rejoined: String = wrapped
            .split('\n')
            .map(|l| l.trim_start())
            .collect::<Vec<_>>()
            .join(" ");
        let unwrapped = encode_statement(
            "xs",
            &v,
            &EncodeOptions {
                line_width: None,
                declarations: false,
            },
        )
        .unwrap();
        assert_eq!(rejoined.replace(", ", ",").replace(" ", ""), unwrapped.replace(", ", ",").replace(" ", ""));
    }

    #[test]
    fn test_array_of_sets() {
        let v = Value::Seq(vec![
            Value::Set(SetValue::IntRange(1, 2)),
            Value::Set(SetValue::Elems(vec![Value::Int(4), Value::Int(6)])),
        ]);
        assert_eq!(
            encode_value(&v, &opts()).unwrap(),
            "array1d(1..2, [1..2, {4, 6}])"
        );
    }
}
