// In: src/codec/decode.rs

//! The dzn value parser: the inverse of `codec::encode`.
//!
//! Without a type descriptor, a value's lexical category is recognized by
//! trying the grammar branches in a fixed precedence order (bool, int, ratio,
//! float, range, set, array, symbol). The order is itself a contract: `1..3`
//! must become a set, never two integers. With a `VariableType` supplied,
//! decoding is directed: the descriptor selects exactly one branch and a
//! lexical mismatch is a hard `TypeMismatch` error.

use crate::config::ParseOptions;
use crate::error::DznError;
use crate::model::{
    DimBound, EnumTable, SetValue, TypeKind, Value, VariableType, MAX_DIMENSIONS,
};

//==================================================================================
// 1. Public API
//==================================================================================

/// Decodes one dzn value.
pub fn decode_value(
    text: &str,
    var_type: Option<&VariableType>,
    enums: Option<&EnumTable>,
    opts: &ParseOptions,
) -> Result<Value, DznError> {
    decode_named("<value>", text, var_type, enums, opts)
}

/// Decodes one dzn value, with a variable name for error context. This is the
/// entry point the statement parser uses.
pub(crate) fn decode_named(
    name: &str,
    text: &str,
    var_type: Option<&VariableType>,
    enums: Option<&EnumTable>,
    opts: &ParseOptions,
) -> Result<Value, DznError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DznError::Parse(format!("empty value for '{}'", name)));
    }
    match var_type {
        Some(vt) => decode_directed(name, text, vt, enums, opts),
        None => decode_undirected(name, text, enums, opts),
    }
}

//==================================================================================
// 2. Undirected Decoding (lexical precedence order)
//==================================================================================

fn decode_undirected(
    name: &str,
    text: &str,
    enums: Option<&EnumTable>,
    opts: &ParseOptions,
) -> Result<Value, DznError> {
    if let Some(b) = parse_bool(text) {
        return Ok(Value::Bool(b));
    }
    if let Some(i) = parse_int(text) {
        return Ok(Value::Int(i));
    }
    if let Some(f) = parse_ratio(text) {
        return Ok(Value::Float(f));
    }
    if let Some(f) = parse_float(text) {
        return Ok(Value::Float(f));
    }
    if let Some(set) = parse_range(text) {
        return Ok(Value::Set(set));
    }
    if text.starts_with('{') {
        return Ok(Value::Set(parse_brace_set(name, text, enums, opts)?));
    }
    if looks_like_array(text) {
        return decode_array(name, text, None, enums, opts);
    }
    if let Some(sym) = parse_symbol(text) {
        return Ok(resolve_symbol(sym, None, enums)?);
    }
    if let Some(s) = parse_string_literal(text) {
        return Ok(Value::Str(s));
    }
    Err(DznError::Parse(format!(
        "unrecognized value for '{}': {}",
        name, text
    )))
}

//==================================================================================
// 3. Directed Decoding
//==================================================================================

fn decode_directed(
    name: &str,
    text: &str,
    vt: &VariableType,
    enums: Option<&EnumTable>,
    opts: &ParseOptions,
) -> Result<Value, DznError> {
    let mismatch = || DznError::TypeMismatch {
        name: name.to_string(),
        expected: vt.describe(),
        found: lexical_category(text).to_string(),
    };

    if vt.dim > 0 {
        if !looks_like_array(text) {
            return Err(mismatch());
        }
        let elem_vt = VariableType {
            dim: 0,
            ..vt.clone()
        };
        return decode_array(name, text, Some(&elem_vt), enums, opts);
    }

    if vt.is_set {
        if let Some(set) = parse_range(text) {
            return Ok(Value::Set(set));
        }
        if text.starts_with('{') {
            let set = parse_brace_set(name, text, enums, opts)?;
            if vt.kind == TypeKind::Enum {
                return Ok(Value::Set(resolve_set_symbols(set, vt, enums)?));
            }
            return Ok(Value::Set(set));
        }
        return Err(mismatch());
    }

    match vt.kind {
        TypeKind::Bool => parse_bool(text).map(Value::Bool).ok_or_else(mismatch),
        TypeKind::Int => parse_int(text).map(Value::Int).ok_or_else(mismatch),
        TypeKind::Float => {
            // Solvers may emit floats as ratios or as bare integer literals.
            if let Some(f) = parse_ratio(text) {
                return Ok(Value::Float(f));
            }
            if let Some(f) = parse_float(text) {
                return Ok(Value::Float(f));
            }
            if let Some(i) = parse_int(text) {
                return Ok(Value::Float(i as f64));
            }
            Err(mismatch())
        }
        TypeKind::Enum => {
            let sym = parse_symbol(text).ok_or_else(mismatch)?;
            resolve_symbol(sym, vt.enum_type.as_deref(), enums)
        }
    }
}

/// Resolves every symbol member of a declared-enum set against the enum table.
fn resolve_set_symbols(
    set: SetValue,
    vt: &VariableType,
    enums: Option<&EnumTable>,
) -> Result<SetValue, DznError> {
    match set {
        SetValue::Elems(elems) => {
            let mut resolved = Vec::with_capacity(elems.len());
            for e in elems {
                match e {
                    Value::Str(s) => {
                        resolved.push(resolve_symbol(&s, vt.enum_type.as_deref(), enums)?)
                    }
                    other => resolved.push(other),
                }
            }
            Ok(SetValue::Elems(resolved))
        }
        other => Ok(other),
    }
}

//==================================================================================
// 4. Lexical Branches
//==================================================================================

fn parse_bool(t: &str) -> Option<bool> {
    match t {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_int(t: &str) -> Option<i64> {
    t.parse::<i64>().ok()
}

/// `numerator/denominator`, emitted by some solvers for exact rationals.
fn parse_ratio(t: &str) -> Option<f64> {
    let (num, den) = t.split_once('/')?;
    let num = parse_int(num.trim())?;
    let den = parse_int(den.trim())?;
    if den == 0 {
        return None;
    }
    Some(num as f64 / den as f64)
}

/// A float literal. The character-set guard keeps `f64::from_str`'s lenient
/// forms (`inf`, `NaN`) from shadowing bare symbols.
fn parse_float(t: &str) -> Option<f64> {
    let numeric_chars = t
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !numeric_chars || !t.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    t.parse::<f64>().ok()
}

/// `lo..hi`, inclusive. Integer bounds stay a symbolic range; real bounds
/// become an interval. Returns `None` whenever either side is not a numeric
/// literal, so array/set literals containing `..` fall through to their own
/// branches.
fn parse_range(t: &str) -> Option<SetValue> {
    let (lo, hi) = t.split_once("..")?;
    let (lo, hi) = (lo.trim(), hi.trim());
    if lo.is_empty() || hi.is_empty() || hi.contains("..") {
        return None;
    }
    if let (Some(a), Some(b)) = (parse_int(lo), parse_int(hi)) {
        return Some(SetValue::IntRange(a, b));
    }
    if let (Some(a), Some(b)) = (parse_float(lo), parse_float(hi)) {
        return Some(SetValue::FloatRange(a, b));
    }
    None
}

fn parse_brace_set(
    name: &str,
    text: &str,
    enums: Option<&EnumTable>,
    opts: &ParseOptions,
) -> Result<SetValue, DznError> {
    let inner = text
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
        .ok_or_else(|| DznError::Parse(format!("malformed set literal for '{}': {}", name, text)))?
        .trim();
    if inner.is_empty() {
        return Ok(SetValue::Elems(Vec::new()));
    }
    let mut elems = Vec::new();
    for part in split_top_level(inner, ',') {
        let elem = decode_undirected(name, part.trim(), enums, opts)?;
        match elem {
            Value::Set(_) | Value::Seq(_) | Value::Map(_) => {
                return Err(DznError::Parse(format!(
                    "set elements must be scalar in '{}': {}",
                    name, part
                )))
            }
            scalar => elems.push(scalar),
        }
    }
    Ok(SetValue::Elems(elems))
}

pub(crate) fn parse_symbol(t: &str) -> Option<&str> {
    // Quoted symbol form: 'a symbol with spaces'.
    if let Some(inner) = t.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        if !inner.is_empty() {
            return Some(inner);
        }
        return None;
    }
    let mut chars = t.chars();
    let first = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Some(t)
    } else {
        None
    }
}

fn parse_string_literal(t: &str) -> Option<String> {
    t.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .map(|s| s.to_string())
}

/// A bare symbol is an enum value when a table is in scope: directed decoding
/// names the enum type, otherwise the table is scanned. Without a table the
/// symbol stays an opaque string.
fn resolve_symbol(
    symbol: &str,
    enum_type: Option<&str>,
    enums: Option<&EnumTable>,
) -> Result<Value, DznError> {
    match (enum_type, enums) {
        (Some(type_name), Some(table)) => {
            let e = table
                .get(type_name)
                .ok_or_else(|| DznError::UnknownEnum(type_name.to_string()))?;
            e.resolve(symbol)
                .map(Value::Enum)
                .ok_or_else(|| DznError::UnknownEnum(format!("{}.{}", type_name, symbol)))
        }
        (Some(type_name), None) => Err(DznError::UnknownEnum(type_name.to_string())),
        (None, Some(table)) => Ok(table
            .values()
            .find_map(|e| e.resolve(symbol))
            .map(Value::Enum)
            .unwrap_or_else(|| Value::Str(symbol.to_string()))),
        (None, None) => Ok(Value::Str(symbol.to_string())),
    }
}

fn looks_like_array(t: &str) -> bool {
    t.starts_with('[') || (t.starts_with("array") && t.contains('(') && t.ends_with(')'))
}

/// The category a value lexically parses as, for `TypeMismatch` diagnostics.
fn lexical_category(t: &str) -> &'static str {
    if parse_bool(t).is_some() {
        "bool"
    } else if parse_int(t).is_some() {
        "int"
    } else if parse_ratio(t).is_some() || parse_float(t).is_some() {
        "float"
    } else if parse_range(t).is_some() || t.starts_with('{') {
        "set"
    } else if looks_like_array(t) {
        "array"
    } else if parse_symbol(t).is_some() {
        "symbol"
    } else {
        "unrecognized"
    }
}

//==================================================================================
// 5. Array Literals
//==================================================================================

fn decode_array(
    name: &str,
    text: &str,
    elem_vt: Option<&VariableType>,
    enums: Option<&EnumTable>,
    opts: &ParseOptions,
) -> Result<Value, DznError> {
    let (bounds, values_text) = if text.starts_with('[') {
        // Bare `[...]` is shorthand for 1-D, 1-based.
        (None, text)
    } else {
        let rest = text
            .strip_prefix("array")
            .ok_or_else(|| DznError::Parse(format!("malformed array literal: {}", text)))?;
        let d_pos = rest
            .find('d')
            .ok_or_else(|| DznError::Parse(format!("malformed array literal: {}", text)))?;
        let dims: usize = rest[..d_pos]
            .parse()
            .map_err(|_| DznError::Parse(format!("malformed array literal: {}", text)))?;
        if dims == 0 || dims > MAX_DIMENSIONS {
            return Err(DznError::Dimension(dims));
        }
        let inner = rest[d_pos + 1..]
            .trim()
            .strip_prefix('(')
            .and_then(|t| t.strip_suffix(')'))
            .ok_or_else(|| DznError::Parse(format!("malformed array literal: {}", text)))?;
        let parts = split_top_level(inner, ',');
        if parts.len() != dims + 1 {
            return Err(DznError::Parse(format!(
                "array{}d expects {} index bounds and one value list, got {} arguments",
                dims,
                dims,
                parts.len()
            )));
        }
        let mut bounds = Vec::with_capacity(dims);
        for part in &parts[..dims] {
            bounds.push(parse_bound(part.trim(), enums)?);
        }
        (Some(bounds), parts[dims].trim())
    };

    let inner = values_text
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .ok_or_else(|| DznError::Parse(format!("malformed array value list: {}", values_text)))?
        .trim();
    let mut flat = Vec::new();
    if !inner.is_empty() {
        for part in split_top_level(inner, ',') {
            flat.push(decode_named(name, part.trim(), elem_vt, enums, opts)?);
        }
    }

    let bounds = bounds.unwrap_or_else(|| vec![DimBound::IntRange(1, flat.len() as i64)]);
    let mut expected: usize = 1;
    for b in &bounds {
        expected = b
            .len()
            .and_then(|span| expected.checked_mul(span))
            .ok_or_else(|| {
                DznError::Parse(format!(
                    "index set of '{}' is too large to materialize: {}",
                    name, b
                ))
            })?;
    }
    if expected != flat.len() {
        return Err(DznError::Parse(format!(
            "array value count mismatch for '{}': index set holds {} positions, got {} values",
            name,
            expected,
            flat.len()
        )));
    }

    let mut pos = 0;
    nest(&flat, &mut pos, &bounds, enums, opts.rebase)
}

/// One comma-separated index token: a contiguous range, the empty-set marker,
/// or an enum type name expanding to that enum's full symbol list.
fn parse_bound(t: &str, enums: Option<&EnumTable>) -> Result<DimBound, DznError> {
    if t == "{}" {
        return Ok(DimBound::Empty);
    }
    if let Some((lo, hi)) = t.split_once("..") {
        let lo = parse_int(lo.trim())
            .ok_or_else(|| DznError::Parse(format!("malformed index bound: {}", t)))?;
        let hi = parse_int(hi.trim())
            .ok_or_else(|| DznError::Parse(format!("malformed index bound: {}", t)))?;
        return Ok(DimBound::IntRange(lo, hi));
    }
    if parse_symbol(t).is_some() {
        let table = enums.ok_or_else(|| DznError::UnknownEnum(t.to_string()))?;
        let e = table
            .get(t)
            .ok_or_else(|| DznError::UnknownEnum(t.to_string()))?;
        return Ok(DimBound::EnumIndex {
            enum_name: e.name.clone(),
            len: e.len(),
        });
    }
    Err(DznError::Parse(format!("malformed index bound: {}", t)))
}

/// Re-nests flattened row-major values according to the index bounds — the
/// inverse of the encoder's flatten. A 1-based integer dimension becomes a
/// plain sequence under `rebase`; everything else stays an index-keyed map.
fn nest(
    flat: &[Value],
    pos: &mut usize,
    bounds: &[DimBound],
    enums: Option<&EnumTable>,
    rebase: bool,
) -> Result<Value, DznError> {
    let (bound, rest) = match bounds.split_first() {
        Some(split) => split,
        // Zero dimensions only arises for the untyped empty array.
        None => return Ok(Value::Seq(Vec::new())),
    };

    let mut take_child = |pos: &mut usize| -> Result<Value, DznError> {
        if rest.is_empty() {
            let v = flat[*pos].clone();
            *pos += 1;
            Ok(v)
        } else {
            nest(flat, pos, rest, enums, rebase)
        }
    };

    match bound {
        DimBound::Empty => Ok(Value::Seq(Vec::new())),
        DimBound::IntRange(lo, hi) => {
            if *hi < *lo {
                return Ok(Value::Seq(Vec::new()));
            }
            // Spans were validated against the value count before nesting.
            if rebase && *lo == 1 {
                let mut items = Vec::with_capacity(bound.len().unwrap_or(0));
                for _ in *lo..=*hi {
                    items.push(take_child(pos)?);
                }
                Ok(Value::Seq(items))
            } else {
                let mut pairs = Vec::with_capacity(bound.len().unwrap_or(0));
                for key in *lo..=*hi {
                    pairs.push((Value::Int(key), take_child(pos)?));
                }
                Ok(Value::Map(pairs))
            }
        }
        DimBound::EnumIndex { enum_name, .. } => {
            let table =
                enums.ok_or_else(|| DznError::UnknownEnum(enum_name.clone()))?;
            let e = table
                .get(enum_name)
                .ok_or_else(|| DznError::UnknownEnum(enum_name.clone()))?;
            let mut pairs = Vec::with_capacity(e.len());
            for symbol in &e.symbols {
                let key = e
                    .resolve(symbol)
                    .map(Value::Enum)
                    .ok_or_else(|| DznError::UnknownEnum(symbol.clone()))?;
                pairs.push((key, take_child(pos)?));
            }
            Ok(Value::Map(pairs))
        }
    }
}

//==================================================================================
// 6. Shared Lexical Helpers
//==================================================================================

/// Splits on `sep` at nesting depth zero, respecting `{}`/`[]`/`()` and both
/// quote forms. Used for element lists here and statement bodies in
/// `codec::statements`.
pub(crate) fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_double = false;
    let mut in_single = false;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '"' if !in_single => in_double = !in_double,
            '\'' if !in_double => in_single = !in_single,
            '{' | '[' | '(' if !in_double && !in_single => depth += 1,
            '}' | ']' | ')' if !in_double && !in_single => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 && !in_double && !in_single => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}
