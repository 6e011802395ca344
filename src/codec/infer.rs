// In: src/codec/infer.rs

//! Index-set inference: deriving an array's dimensionality and per-dimension
//! bounds purely from nested-container shape, without an explicit schema.
//!
//! The core correctness property lives here: at every nesting depth, all
//! children must yield an *identical* index-set. This is what lets a ragged
//! or type-inconsistent nested structure be rejected instead of silently
//! truncated.

use log::trace;

use crate::error::DznError;
use crate::model::{classify, int_span, DimBound, IndexSet, Value, ValueClass, MAX_DIMENSIONS};

//==================================================================================
// 1. Public API
//==================================================================================

/// Infers the index-set of an array-like value.
///
/// Sequences index `1..len` (dzn convention); integer-keyed mappings must
/// form a contiguous key run; enum-keyed mappings must cover one enum's
/// symbols completely. An empty array carries the empty index-set and is
/// rendered with an explicit `{}` bound.
pub fn infer_index_set(v: &Value) -> Result<IndexSet, DznError> {
    match classify(v) {
        ValueClass::ArrayLike => infer_at_depth(v, 1),
        other => Err(DznError::UnsupportedType(format!(
            "index-set inference requires an array-like value, got {} ({:?})",
            v.kind_name(),
            other
        ))),
    }
}

/// The values of an index-keyed mapping, ordered by their index position.
/// This is the order the encoder flattens them in.
pub fn map_in_index_order(pairs: &[(Value, Value)]) -> Result<Vec<&Value>, DznError> {
    let keys: Vec<&Value> = pairs.iter().map(|(k, _)| k).collect();
    let order = index_order(&keys)?;
    Ok(order.into_iter().map(|i| &pairs[i].1).collect())
}

//==================================================================================
// 2. Recursive Inference
//==================================================================================

fn infer_at_depth(v: &Value, depth: usize) -> Result<IndexSet, DznError> {
    if depth > MAX_DIMENSIONS {
        return Err(DznError::Dimension(depth));
    }

    let (bound, children) = dimension_of(v)?;
    trace!("depth {}: bound {} over {} children", depth, bound, children.len());

    // The untyped empty array: no bound can be stated for it.
    if children.is_empty() {
        return Ok(Vec::new());
    }

    let array_children = children
        .iter()
        .filter(|c| classify(c) == ValueClass::ArrayLike)
        .count();
    if array_children == 0 {
        // Leaf dimension: children are scalars or sets.
        return Ok(vec![bound]);
    }
    if array_children != children.len() {
        return Err(DznError::Shape(
            "inconsistent nested index sets: array-like and scalar elements mixed at one depth"
                .to_string(),
        ));
    }

    // Recursive case: every child must agree on its own index-set.
    let first = infer_at_depth(children[0], depth + 1)?;
    for child in &children[1..] {
        let child_set = infer_at_depth(child, depth + 1)?;
        if child_set != first {
            return Err(DznError::Shape(format!(
                "inconsistent nested index sets: {:?} vs {:?}",
                first, child_set
            )));
        }
    }

    // All children are empty arrays: the inner dimension exists but is
    // zero-length, which dzn states with an explicit `{}` bound.
    if first.is_empty() {
        if depth + 1 > MAX_DIMENSIONS {
            return Err(DznError::Dimension(depth + 1));
        }
        return Ok(vec![bound, DimBound::Empty]);
    }

    let mut result = Vec::with_capacity(1 + first.len());
    result.push(bound);
    result.extend(first);
    if result.len() > MAX_DIMENSIONS {
        return Err(DznError::Dimension(result.len()));
    }
    Ok(result)
}

/// Resolves one array-like value into its own dimension bound plus its
/// elements in index order.
fn dimension_of(v: &Value) -> Result<(DimBound, Vec<&Value>), DznError> {
    match v {
        Value::Seq(items) => Ok((
            DimBound::IntRange(1, items.len() as i64),
            items.iter().collect(),
        )),
        Value::Map(pairs) => {
            if pairs.is_empty() {
                return Ok((DimBound::Empty, Vec::new()));
            }
            let keys: Vec<&Value> = pairs.iter().map(|(k, _)| k).collect();
            let bound = bound_of_keys(&keys)?;
            let order = index_order(&keys)?;
            Ok((bound, order.into_iter().map(|i| &pairs[i].1).collect()))
        }
        other => Err(DznError::UnsupportedType(format!(
            "expected an array-like value, got {}",
            other.kind_name()
        ))),
    }
}

//==================================================================================
// 3. Key Analysis
//==================================================================================

/// Derives the dimension bound of a keyed mapping: a contiguous integer run,
/// or the full symbol range of one enum type.
fn bound_of_keys(keys: &[&Value]) -> Result<DimBound, DznError> {
    match keys[0] {
        Value::Int(_) => {
            let mut ints = collect_int_keys(keys)?;
            ints.sort_unstable();
            for w in ints.windows(2) {
                if w[0] == w[1] {
                    return Err(DznError::Shape(format!("duplicate index {}", w[0])));
                }
            }
            let (lo, hi) = (ints[0], ints[ints.len() - 1]);
            if int_span(lo, hi) != Some(ints.len()) {
                return Err(DznError::Shape(format!(
                    "non-contiguous index set: keys span {}..{} but only {} keys present",
                    lo,
                    hi,
                    ints.len()
                )));
            }
            Ok(DimBound::IntRange(lo, hi))
        }
        Value::Enum(first) => {
            let mut ordinals = Vec::with_capacity(keys.len());
            for k in keys {
                match k {
                    Value::Enum(sym) if sym.enum_name == first.enum_name => {
                        ordinals.push(sym.ordinal)
                    }
                    Value::Enum(sym) => {
                        return Err(DznError::Shape(format!(
                            "mixed enum index types: {} vs {}",
                            first.enum_name, sym.enum_name
                        )))
                    }
                    other => {
                        return Err(DznError::Shape(format!(
                            "mixed index key types: enum {} vs {}",
                            first.enum_name,
                            other.kind_name()
                        )))
                    }
                }
            }
            ordinals.sort_unstable();
            let complete = ordinals.len() == keys.len()
                && ordinals.first() == Some(&1)
                && ordinals.windows(2).all(|w| w[1] == w[0] + 1);
            if !complete {
                return Err(DznError::Shape(format!(
                    "enum-indexed dimension must cover all symbols of {}",
                    first.enum_name
                )));
            }
            Ok(DimBound::EnumIndex {
                enum_name: first.enum_name.clone(),
                len: keys.len(),
            })
        }
        other => Err(DznError::Shape(format!(
            "array index keys must be integers or enum symbols, got {}",
            other.kind_name()
        ))),
    }
}

fn collect_int_keys(keys: &[&Value]) -> Result<Vec<i64>, DznError> {
    keys.iter()
        .map(|k| match k {
            Value::Int(i) => Ok(*i),
            other => Err(DznError::Shape(format!(
                "mixed index key types: int vs {}",
                other.kind_name()
            ))),
        })
        .collect()
}

/// Positions of the pairs sorted by index key (integer order, or enum
/// declaration order).
fn index_order(keys: &[&Value]) -> Result<Vec<usize>, DznError> {
    let mut order: Vec<usize> = (0..keys.len()).collect();
    match keys[0] {
        Value::Int(_) => {
            let ints = collect_int_keys(keys)?;
            order.sort_by_key(|&i| ints[i]);
        }
        Value::Enum(_) => {
            let ordinals: Vec<u32> = keys
                .iter()
                .map(|k| match k {
                    Value::Enum(sym) => sym.ordinal,
                    _ => 0,
                })
                .collect();
            order.sort_by_key(|&i| ordinals[i]);
        }
        _ => {}
    }
    Ok(order)
}

//==================================================================================
// 4. Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EnumType;

    fn seq(items: Vec<Value>) -> Value {
        Value::Seq(items)
    }

    fn ints(items: &[i64]) -> Value {
        Value::Seq(items.iter().map(|&i| Value::Int(i)).collect())
    }

    #[test]
    fn test_sequence_is_one_based() {
        let v = ints(&[10, 20, 30]);
        assert_eq!(infer_index_set(&v).unwrap(), vec![DimBound::IntRange(1, 3)]);
    }

    #[test]
    fn test_nested_rectangular() {
        let v = seq(vec![ints(&[1, 2]), ints(&[3, 4]), ints(&[5, 6])]);
        assert_eq!(
            infer_index_set(&v).unwrap(),
            vec![DimBound::IntRange(1, 3), DimBound::IntRange(1, 2)]
        );
    }

    #[test]
    fn test_ragged_nesting_is_rejected() {
        let v = seq(vec![ints(&[1, 2]), ints(&[3, 4, 5])]);
        let err = infer_index_set(&v).unwrap_err();
        assert!(matches!(err, DznError::Shape(_)));
        assert!(err.to_string().contains("inconsistent nested index sets"));
    }

    #[test]
    fn test_non_contiguous_keys_are_rejected() {
        let v = Value::Map(vec![
            (Value::Int(1), Value::Str("a".into())),
            (Value::Int(3), Value::Str("b".into())),
        ]);
        let err = infer_index_set(&v).unwrap_err();
        assert!(err.to_string().contains("non-contiguous index set"));
    }

    #[test]
    fn test_extreme_key_span_is_rejected() {
        // A span wider than usize must fail as non-contiguous, not wrap.
        let v = Value::Map(vec![
            (Value::Int(i64::MIN), Value::Int(1)),
            (Value::Int(i64::MAX), Value::Int(2)),
        ]);
        let err = infer_index_set(&v).unwrap_err();
        assert!(err.to_string().contains("non-contiguous index set"));
    }

    #[test]
    fn test_map_keys_form_offset_range() {
        let v = Value::Map(vec![
            (Value::Int(5), Value::Int(50)),
            (Value::Int(4), Value::Int(40)),
            (Value::Int(6), Value::Int(60)),
        ]);
        assert_eq!(infer_index_set(&v).unwrap(), vec![DimBound::IntRange(4, 6)]);
        // And the flatten order follows the index, not insertion order.
        let ordered = map_in_index_order(match &v {
            Value::Map(pairs) => pairs,
            _ => unreachable!(),
        })
        .unwrap();
        assert_eq!(ordered, vec![&Value::Int(40), &Value::Int(50), &Value::Int(60)]);
    }

    #[test]
    fn test_empty_array_has_empty_index_set() {
        assert_eq!(infer_index_set(&seq(Vec::new())).unwrap(), Vec::new());
    }

    #[test]
    fn test_dimension_ceiling() {
        // 7 levels of nesting, each of length 1.
        let mut v = Value::Int(0);
        for _ in 0..7 {
            v = seq(vec![v]);
        }
        assert!(matches!(
            infer_index_set(&v).unwrap_err(),
            DznError::Dimension(_)
        ));
    }

    #[test]
    fn test_mixed_scalar_and_array_children_rejected() {
        let v = seq(vec![ints(&[1, 2]), Value::Int(3)]);
        assert!(matches!(infer_index_set(&v).unwrap_err(), DznError::Shape(_)));
    }

    #[test]
    fn test_enum_indexed_dimension() {
        let e = EnumType::new("Day", vec!["Mon".into(), "Tue".into()]);
        let v = Value::Map(vec![
            (Value::Enum(e.resolve("Tue").unwrap()), Value::Int(2)),
            (Value::Enum(e.resolve("Mon").unwrap()), Value::Int(1)),
        ]);
        assert_eq!(
            infer_index_set(&v).unwrap(),
            vec![DimBound::EnumIndex {
                enum_name: "Day".into(),
                len: 2
            }]
        );
    }

    #[test]
    fn test_incomplete_enum_coverage_rejected() {
        let e = EnumType::new("Day", vec!["Mon".into(), "Tue".into(), "Wed".into()]);
        let v = Value::Map(vec![
            (Value::Enum(e.resolve("Mon").unwrap()), Value::Int(1)),
            (Value::Enum(e.resolve("Wed").unwrap()), Value::Int(3)),
        ]);
        assert!(matches!(infer_index_set(&v).unwrap_err(), DznError::Shape(_)));
    }
}
