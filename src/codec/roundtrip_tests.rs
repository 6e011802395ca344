// In: src/codec/roundtrip_tests.rs

//! Round-trip tests across the whole codec: value -> text -> value must
//! reproduce the original under the notation's equivalence rules, with the
//! rebase asymmetry as the one documented exception.

use crate::codec::{decode_value, encode_statement, encode_value, parse_document};
use crate::config::{EncodeOptions, ParseOptions};
use crate::model::{SetValue, Value};

fn roundtrip(v: &Value) -> Value {
    let text = encode_value(v, &EncodeOptions::default()).unwrap();
    decode_value(&text, None, None, &ParseOptions::default()).unwrap()
}

fn ints(items: &[i64]) -> Value {
    Value::Seq(items.iter().map(|&i| Value::Int(i)).collect())
}

#[test]
fn test_scalar_roundtrips() {
    for v in [
        Value::Bool(true),
        Value::Bool(false),
        Value::Int(0),
        Value::Int(-123456),
        Value::Float(3.25),
        Value::Float(-0.5),
        Value::Float(2.0),
        Value::Float(1e-9),
    ] {
        assert_eq!(roundtrip(&v), v);
    }
}

#[test]
fn test_set_roundtrips() {
    let contiguous = Value::Set(SetValue::Elems(vec![
        Value::Int(1),
        Value::Int(2),
        Value::Int(3),
    ]));
    // Comes back as a symbolic range, which compares equal by membership.
    assert_eq!(roundtrip(&contiguous), contiguous);

    let gap = Value::Set(SetValue::Elems(vec![Value::Int(1), Value::Int(3)]));
    assert_eq!(roundtrip(&gap), gap);

    let empty = Value::Set(SetValue::Elems(Vec::new()));
    assert_eq!(roundtrip(&empty), empty);
}

#[test]
fn test_quoted_symbol_roundtrips() {
    let v = Value::Str("two words".to_string());
    assert_eq!(
        encode_value(&v, &EncodeOptions::default()).unwrap(),
        "'two words'"
    );
    assert_eq!(roundtrip(&v), v);
}

#[test]
fn test_rectangular_array_roundtrips() {
    let one_d = ints(&[5, 6, 7]);
    assert_eq!(roundtrip(&one_d), one_d);

    let two_d = Value::Seq(vec![ints(&[1, 2]), ints(&[3, 4])]);
    assert_eq!(
        encode_value(&two_d, &EncodeOptions::default()).unwrap(),
        "array2d(1..2, 1..2, [1, 2, 3, 4])"
    );
    assert_eq!(roundtrip(&two_d), two_d);

    let three_d = Value::Seq(vec![
        Value::Seq(vec![ints(&[1, 2]), ints(&[3, 4])]),
        Value::Seq(vec![ints(&[5, 6]), ints(&[7, 8])]),
    ]);
    assert_eq!(roundtrip(&three_d), three_d);
}

#[test]
fn test_six_dimensional_limit_roundtrips() {
    let mut v = ints(&[1]);
    for _ in 0..5 {
        v = Value::Seq(vec![v]);
    }
    assert_eq!(roundtrip(&v), v);
}

#[test]
fn test_rebase_asymmetry_is_the_documented_exception() {
    let keyed = Value::Map(vec![
        (Value::Int(1), Value::Int(2)),
        (Value::Int(2), Value::Int(4)),
        (Value::Int(3), Value::Int(6)),
    ]);
    let text = encode_value(&keyed, &EncodeOptions::default()).unwrap();
    assert_eq!(text, "array1d(1..3, [2, 4, 6])");

    // Default rebase collapses the 1-based mapping to a plain sequence...
    let rebased = decode_value(&text, None, None, &ParseOptions::default()).unwrap();
    assert_eq!(rebased, ints(&[2, 4, 6]));

    // ...and rebase=false recovers the mapping form exactly.
    let no_rebase = ParseOptions {
        rebase: false,
        ..ParseOptions::default()
    };
    assert_eq!(decode_value(&text, None, None, &no_rebase).unwrap(), keyed);
}

#[test]
fn test_offset_based_array_roundtrips_exactly() {
    // A non-1-based index set is unaffected by rebase in either direction.
    let keyed = Value::Map(vec![
        (Value::Int(4), Value::Int(40)),
        (Value::Int(5), Value::Int(50)),
    ]);
    assert_eq!(roundtrip(&keyed), keyed);
}

#[test]
fn test_empty_array_roundtrips() {
    let empty = Value::Seq(Vec::new());
    assert_eq!(
        encode_value(&empty, &EncodeOptions::default()).unwrap(),
        "array1d({}, [])"
    );
    assert_eq!(roundtrip(&empty), empty);
}

#[test]
fn test_statement_document_roundtrip() {
    let opts = EncodeOptions::default();
    let mut doc = String::new();
    doc.push_str(&encode_statement("x", &Value::Int(3), &opts).unwrap());
    doc.push('\n');
    doc.push_str(&encode_statement("open", &Value::Set(SetValue::IntRange(2, 5)), &opts).unwrap());
    doc.push('\n');
    doc.push_str(
        &encode_statement("m", &Value::Seq(vec![ints(&[1, 2]), ints(&[3, 4])]), &opts).unwrap(),
    );

    let parsed = parse_document(&doc, None, &ParseOptions::default()).unwrap();
    assert_eq!(parsed.assignments["x"], Value::Int(3));
    assert_eq!(
        parsed.assignments["open"],
        Value::Set(SetValue::IntRange(2, 5))
    );
    assert_eq!(
        parsed.assignments["m"],
        Value::Seq(vec![ints(&[1, 2]), ints(&[3, 4])])
    );
}

#[test]
fn test_wrapped_encoding_still_parses() {
    let wide = ints(&(0..40).collect::<Vec<i64>>());
    let narrow = EncodeOptions {
        line_width: Some(24),
        declarations: false,
    };
    let stmt = encode_statement("xs", &wide, &narrow).unwrap();
    assert!(stmt.contains('\n'));
    let parsed = parse_document(&stmt, None, &ParseOptions::default()).unwrap();
    assert_eq!(parsed.assignments["xs"], wide);
}
