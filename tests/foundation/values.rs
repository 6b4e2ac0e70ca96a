//! Integration tests for values and attribute types
//!
//! Tests missing-value detection, id hashability, and coercion into declared types.

use scenetable_foundation::{AttrType, ErrorKind, LtVec, RecordId, Value};

// =============================================================================
// Missing values
// =============================================================================

#[test]
fn nil_and_nan_are_missing() {
    assert!(Value::Nil.is_missing());
    assert!(Value::Float(f64::NAN).is_missing());
    assert!(!Value::Float(0.0).is_missing());
    assert!(!Value::from("").is_missing());
}

#[test]
fn lists_cannot_be_ids() {
    let list = Value::List(LtVec::new().push_back(Value::Int(1)));
    assert!(!list.is_hashable());
    assert!(RecordId::new(list).is_err());
    assert!(RecordId::new(Value::Nil).is_err());
}

#[test]
fn ids_compare_by_value() {
    assert_eq!(RecordId::from(7), RecordId::new(7).unwrap());
    assert_ne!(RecordId::from(7), RecordId::from("7"));
}

// =============================================================================
// Coercion
// =============================================================================

#[test]
fn bounded_float_rejects_out_of_range() {
    let ty = AttrType::bounded(0.0, 1.0);
    assert_eq!(ty.coerce("transparency", &Value::Float(0.25)).unwrap(), Value::Float(0.25));

    let err = ty.coerce("transparency", &Value::Float(1.5)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Validation { ref attribute, .. } if attribute == "transparency"));
}

#[test]
fn non_negative_float_accepts_ints() {
    let ty = AttrType::non_negative();
    assert_eq!(ty.coerce("radius", &Value::Int(3)).unwrap(), Value::Float(3.0));
    assert!(ty.coerce("radius", &Value::Float(-0.5)).is_err());
}

#[test]
fn vec3_from_numeric_list() {
    let list = Value::from(vec![1.0, 2.0, 3.0]);
    assert_eq!(
        AttrType::Vec3.coerce("a", &list).unwrap(),
        Value::Vec3([1.0, 2.0, 3.0])
    );
    assert!(AttrType::Vec3.coerce("a", &Value::from(vec![1.0, 2.0])).is_err());
}

#[test]
fn bool_rejects_strings() {
    assert!(AttrType::Bool.coerce("visible", &Value::from("yes")).is_err());
}

#[test]
fn expected_type_is_readable() {
    assert_eq!(AttrType::bounded(0.0, 1.0).to_string(), "float in [0, 1]");
    assert_eq!(AttrType::non_negative().to_string(), "float >= 0");
    assert_eq!(AttrType::Vec3.to_string(), "3-vector");
}
