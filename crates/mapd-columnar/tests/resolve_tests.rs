use chrono::{NaiveDate, NaiveTime};
use mapd_columnar::{
    resolve_wire_type, wire_type_from_dtype, DType, LoadError, Series, Value, WireType,
};
use pretty_assertions::assert_eq;

#[test]
fn primitive_dtypes_map_by_kind_and_width() {
    let cases = [
        (DType::Bool, WireType::Bool),
        (DType::Int8, WireType::TinyInt),
        (DType::UInt8, WireType::TinyInt),
        (DType::Int16, WireType::SmallInt),
        (DType::UInt16, WireType::SmallInt),
        (DType::Int32, WireType::Int),
        (DType::UInt32, WireType::Int),
        (DType::Int64, WireType::BigInt),
        (DType::UInt64, WireType::BigInt),
        (DType::Float32, WireType::Float),
        (DType::Float64, WireType::Double),
        (DType::DateTime64, WireType::Timestamp),
    ];
    for (dtype, expected) in cases {
        assert_eq!(wire_type_from_dtype(dtype), Some(expected), "{dtype}");
    }
    assert_eq!(wire_type_from_dtype(DType::Object), None);
}

#[test]
fn typed_series_resolve_without_sampling() {
    let s = Series::from_i16("a", [Some(1), None, Some(-3)]);
    assert_eq!(resolve_wire_type(&s).unwrap(), WireType::SmallInt);

    // Nothing to sample, but the dtype alone decides.
    let empty = Series::from_f64("b", [None, None]);
    assert_eq!(resolve_wire_type(&empty).unwrap(), WireType::Double);
}

#[test]
fn object_columns_resolve_from_first_valid_value() {
    let strs = Series::from_strs("s", [None, Some("x"), Some("y")]);
    assert_eq!(resolve_wire_type(&strs).unwrap(), WireType::Str);

    let dates = Series::object(
        "d",
        [Value::Null, Value::Date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())],
    );
    assert_eq!(resolve_wire_type(&dates).unwrap(), WireType::Date);

    let times = Series::object("t", [Value::Time(NaiveTime::from_hms_opt(12, 0, 0).unwrap())]);
    assert_eq!(resolve_wire_type(&times).unwrap(), WireType::Time);

    let ints = Series::object("i", [Value::Float(f64::NAN), Value::Int(7)]);
    assert_eq!(resolve_wire_type(&ints).unwrap(), WireType::Int);
}

#[test]
fn datetimes_and_bools_in_object_columns_follow_their_supertypes() {
    let dt = NaiveDate::from_ymd_opt(2021, 5, 6)
        .unwrap()
        .and_hms_opt(7, 8, 9)
        .unwrap();
    let s = Series::object("dt", [Value::DateTime(dt)]);
    assert_eq!(resolve_wire_type(&s).unwrap(), WireType::Date);

    let b = Series::object("b", [Value::Bool(true)]);
    assert_eq!(resolve_wire_type(&b).unwrap(), WireType::Int);
}

#[test]
fn first_sample_wins_for_mixed_object_columns() {
    // Known limitation: later elements are not checked against the sample.
    let mixed = Series::object("m", [Value::from("a"), Value::Int(1), Value::Float(2.5)]);
    assert_eq!(resolve_wire_type(&mixed).unwrap(), WireType::Str);
}

#[test]
fn all_missing_object_column_cannot_be_inferred() {
    let s = Series::object("empty", [Value::Null, Value::Float(f64::NAN)]);
    let err = resolve_wire_type(&s).unwrap_err();
    assert!(matches!(err, LoadError::EmptyColumn { ref column } if column == "empty"));
    assert!(err.to_string().contains("Not any valid values"));

    let zero_rows = Series::object("none", Vec::new());
    assert!(matches!(
        resolve_wire_type(&zero_rows),
        Err(LoadError::EmptyColumn { .. })
    ));
}

#[test]
fn unhandled_object_sample_is_a_type_error() {
    let s = Series::object("f", [Value::Float(1.5)]);
    let err = resolve_wire_type(&s).unwrap_err();
    match err {
        LoadError::UnhandledType { column, found } => {
            assert_eq!(column, "f");
            assert_eq!(found, "object (float)");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
