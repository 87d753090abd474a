use super::*;
use chrono::TimeZone;
use flux_semantic::{DurationMagnitude, DurationUnit};
use pretty_assertions::assert_eq;

fn duration(components: &[(i64, DurationUnit)]) -> Duration {
    let components: Vec<DurationMagnitude> = components
        .iter()
        .map(|&(magnitude, unit)| DurationMagnitude { magnitude, unit })
        .collect();
    Duration::from_components(&components).unwrap()
}

// Types

#[test]
fn test_scalar_types() {
    assert_eq!(Value::int(1).typ(), MonoType::INT);
    assert_eq!(Value::uint(1).typ(), MonoType::UINT);
    assert_eq!(Value::float(1.0).typ(), MonoType::FLOAT);
    assert_eq!(Value::string("a").typ(), MonoType::STRING);
    assert_eq!(Value::bytes(b"a").typ(), MonoType::BYTES);
    assert_eq!(Value::null(MonoType::INT).typ(), MonoType::INT);
}

#[test]
fn test_record_type_from_fields() {
    let r = Value::record([("a", Value::int(1)), ("b", Value::null(MonoType::STRING))]);
    assert_eq!(
        r.typ(),
        MonoType::record([("a", MonoType::INT), ("b", MonoType::STRING)])
    );
}

#[test]
fn test_record_last_match() {
    let r = Value::record([("v", Value::string("foo")), ("v", Value::float(10.0))]);
    let record = r.as_record().unwrap();
    assert_eq!(record.get("v"), Some(&Value::float(10.0)));
    assert_eq!(record.len(), 2);
    assert_eq!(record.get("w"), None);
}

#[test]
fn test_array_get_signed_index() {
    let a = Value::array(MonoType::INT, vec![Value::int(5), Value::int(6)]);
    let array = a.as_array().unwrap();
    assert_eq!(array.get(1), Some(&Value::int(6)));
    assert_eq!(array.get(2), None);
    assert_eq!(array.get(-1), None);
}

// Equality

#[test]
fn test_dict_equality_ignores_order() {
    let a = Value::dict(
        MonoType::STRING,
        MonoType::INT,
        [
            (Value::string("a"), Value::int(1)),
            (Value::string("b"), Value::int(2)),
        ],
    );
    let b = Value::dict(
        MonoType::STRING,
        MonoType::INT,
        [
            (Value::string("b"), Value::int(2)),
            (Value::string("a"), Value::int(1)),
        ],
    );
    assert_eq!(a, b);
    assert_eq!(a.to_string(), r#"["a": 1, "b": 2]"#);
    assert_eq!(b.to_string(), r#"["b": 2, "a": 1]"#);
}

#[test]
fn test_null_equality_is_typed() {
    assert_eq!(Value::null(MonoType::INT), Value::null(MonoType::INT));
    assert_ne!(Value::null(MonoType::INT), Value::null(MonoType::STRING));
}

#[test]
fn test_regexp_equality_by_pattern() {
    let a = Regexp::new("^(c|g)pu$").unwrap();
    let b = Regexp::new("^(c|g)pu$").unwrap();
    assert_eq!(Value::regexp(a), Value::regexp(b));
    assert!(Regexp::new("(").is_err());
}

#[test]
fn test_int_and_float_differ_structurally() {
    assert_ne!(Value::int(1), Value::float(1.0));
}

// Retyping

#[test]
fn test_retyped_null() {
    let v = Value::null(MonoType::var(3)).retyped(&MonoType::INT);
    assert_eq!(v, Value::null(MonoType::INT));
}

#[test]
fn test_retyped_array() {
    let v = Value::array(MonoType::var(0), vec![Value::int(1)])
        .retyped(&MonoType::array(MonoType::INT));
    assert_eq!(v.typ(), MonoType::array(MonoType::INT));
    assert_eq!(v.as_array().unwrap().elements(), &[Value::int(1)]);
}

#[test]
fn test_retyped_record_relabels_nested_nulls() {
    let inner = Value::array(MonoType::var(2), vec![Value::null(MonoType::var(2))]);
    let v = Value::record([("m", Value::null(MonoType::var(1))), ("a", inner)]);
    assert!(v.is_generic());

    let typ = MonoType::record([
        ("m", MonoType::FLOAT),
        ("a", MonoType::array(MonoType::INT)),
    ]);
    let v = v.retyped(&typ);
    assert!(!v.is_generic());
    assert_eq!(v.typ(), typ);
}

#[test]
fn test_retyped_record_with_repeated_labels_is_positional() {
    let v = Value::record([
        ("v", Value::null(MonoType::var(1))),
        ("v", Value::null(MonoType::var(2))),
    ]);
    let typ = MonoType::record([("v", MonoType::STRING), ("v", MonoType::FLOAT)]);
    let fields = v.retyped(&typ);
    let fields = fields.as_record().unwrap().fields();
    assert_eq!(fields[0].1, Value::null(MonoType::STRING));
    assert_eq!(fields[1].1, Value::null(MonoType::FLOAT));
}

#[test]
fn test_concrete_values_are_not_generic() {
    assert!(!Value::record([("a", Value::int(1))]).is_generic());
    assert!(!Value::null(MonoType::INT).is_generic());
}

#[test]
fn test_retyped_leaves_scalars() {
    assert_eq!(Value::int(1).retyped(&MonoType::FLOAT), Value::int(1));
}

// Durations

#[test]
fn test_duration_display() {
    assert_eq!(duration(&[(1, DurationUnit::Minute)]).to_string(), "1m");
    assert_eq!(duration(&[(90, DurationUnit::Second)]).to_string(), "1m30s");
    assert_eq!(
        duration(&[(1, DurationUnit::Year), (14, DurationUnit::Month)]).to_string(),
        "2y2mo"
    );
    assert_eq!(
        duration(&[(8, DurationUnit::Day), (1_500, DurationUnit::Microsecond)]).to_string(),
        "1w1d1ms500us"
    );
    assert_eq!(duration(&[(-5, DurationUnit::Hour)]).to_string(), "-5h");
    assert_eq!(Duration::ZERO.to_string(), "0ns");
}

#[test]
fn test_duration_rejects_mixed_signs() {
    let components = [
        DurationMagnitude {
            magnitude: 1,
            unit: DurationUnit::Hour,
        },
        DurationMagnitude {
            magnitude: -1,
            unit: DurationUnit::Minute,
        },
    ];
    assert_eq!(Duration::from_components(&components), None);
}

#[test]
fn test_duration_ordering() {
    let hour = duration(&[(1, DurationUnit::Hour)]);
    let minute = duration(&[(1, DurationUnit::Minute)]);
    let month = duration(&[(1, DurationUnit::Month)]);
    assert!(minute < hour);
    assert!(hour.negate() < minute);
    assert_eq!(month.partial_cmp(&duration(&[(30, DurationUnit::Day)])), None);
}

// Display

#[test]
fn test_display() {
    let t = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
    assert_eq!(Value::time(t).to_string(), "2020-01-02T03:04:05Z");
    assert_eq!(Value::string("a").to_string(), r#""a""#);
    assert_eq!(Value::bytes(b"\x01\xff").to_string(), "0x01ff");
    assert_eq!(
        Value::record([("a", Value::int(1)), ("b", Value::bool(true))]).to_string(),
        "{a: 1, b: true}"
    );
    assert_eq!(
        Value::dict(MonoType::STRING, MonoType::INT, []).to_string(),
        "[:]"
    );
    assert_eq!(Value::null(MonoType::INT).to_string(), "null");
}
