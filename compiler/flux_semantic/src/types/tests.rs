use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_display_basic_and_containers() {
    assert_eq!(MonoType::INT.to_string(), "int");
    assert_eq!(MonoType::array(MonoType::FLOAT).to_string(), "[float]");
    assert_eq!(
        MonoType::dict(MonoType::STRING, MonoType::INT).to_string(),
        "[string: int]"
    );
    assert_eq!(MonoType::var(7).to_string(), "t7");
}

#[test]
fn test_display_record_sorts_stably() {
    let typ = MonoType::record([
        ("_value", MonoType::FLOAT),
        ("_time", MonoType::TIME),
        ("_value", MonoType::FLOAT),
    ]);
    assert_eq!(typ.to_string(), "{_time: time, _value: float, _value: float}");
}

#[test]
fn test_display_extensible_record() {
    let typ = MonoType::extensible_record(Tvar(3), [("a", MonoType::INT)]);
    assert_eq!(typ.to_string(), "{t3 with a: int}");

    let empty = MonoType::extensible_record::<&str>(Tvar(3), []);
    assert_eq!(empty.to_string(), "{t3}");
}

#[test]
fn test_display_function() {
    let typ = MonoType::function(
        vec![
            Parameter::new("a", MonoType::INT),
            Parameter::new("b", MonoType::INT).optional(),
            Parameter::new("c", MonoType::INT).pipe(),
        ],
        MonoType::INT,
    );
    assert_eq!(typ.to_string(), "(a: int, ?b: int, <-c: int) => int");
}

#[test]
fn test_record_field_last_match() {
    let typ = MonoType::record([("v", MonoType::INT), ("v", MonoType::STRING)]);
    let record = typ.as_record().unwrap();
    assert_eq!(record.field("v"), Some(&MonoType::STRING));
    assert_eq!(record.field("w"), None);
}

#[test]
fn test_free_vars_and_monomorphic() {
    let typ = MonoType::function(
        vec![Parameter::new("x", MonoType::var(1))],
        MonoType::extensible_record(Tvar(2), [("a", MonoType::var(1))]),
    );
    let vars = typ.free_vars();
    assert_eq!(vars.len(), 2);
    assert!(vars.contains(&Tvar(1)));
    assert!(vars.contains(&Tvar(2)));
    assert!(!typ.is_monomorphic());
    assert!(MonoType::array(MonoType::INT).is_monomorphic());
}

#[test]
fn test_unify_binds_variables() {
    let mut subst = Substitution::new();
    let expected = MonoType::record([("a", MonoType::var(0)), ("b", MonoType::var(1))]);
    let actual = MonoType::record([("a", MonoType::INT), ("b", MonoType::STRING)]);
    subst.unify(&expected, &actual).unwrap();

    assert_eq!(subst.apply(&MonoType::var(0)), MonoType::INT);
    assert_eq!(subst.apply(&MonoType::var(1)), MonoType::STRING);
    assert_eq!(subst.apply(&expected), actual);
}

#[test]
fn test_unify_ignores_missing_actual_fields() {
    let mut subst = Substitution::new();
    let expected = MonoType::record([("a", MonoType::INT), ("b", MonoType::var(4))]);
    let actual = MonoType::record([("a", MonoType::INT)]);
    subst.unify(&expected, &actual).unwrap();
    assert!(subst.get(Tvar(4)).is_none());
}

#[test]
fn test_unify_mismatch() {
    let mut subst = Substitution::new();
    let err = subst
        .unify(
            &MonoType::record([("a", MonoType::INT)]),
            &MonoType::record([("a", MonoType::STRING)]),
        )
        .unwrap_err();
    assert_eq!(
        err,
        UnifyError::Mismatch {
            expected: MonoType::INT,
            actual: MonoType::STRING,
        }
    );
}

#[test]
fn test_unify_occurs_check() {
    let mut subst = Substitution::new();
    let err = subst
        .unify(&MonoType::var(0), &MonoType::array(MonoType::var(0)))
        .unwrap_err();
    assert!(matches!(err, UnifyError::Occurs { var: Tvar(0), .. }));
}

#[test]
fn test_unify_rebinding_checks_consistency() {
    let mut subst = Substitution::new();
    subst.unify(&MonoType::var(0), &MonoType::INT).unwrap();
    subst.unify(&MonoType::var(0), &MonoType::INT).unwrap();
    assert!(subst.unify(&MonoType::var(0), &MonoType::FLOAT).is_err());
}

#[test]
fn test_tail_absorbs_leftover_fields() {
    let mut subst = Substitution::new();
    let expected = MonoType::extensible_record(Tvar(9), [("_value", MonoType::var(1))]);
    let actual = MonoType::record([("_time", MonoType::TIME), ("_value", MonoType::FLOAT)]);
    subst.unify(&expected, &actual).unwrap();

    assert_eq!(
        subst.apply(&MonoType::var(9)),
        MonoType::record([("_time", MonoType::TIME)])
    );
}

#[test]
fn test_apply_flattens_tail_first() {
    let subst: Substitution = [(
        Tvar(0),
        MonoType::record([("_time", MonoType::TIME), ("_value", MonoType::FLOAT)]),
    )]
    .into_iter()
    .collect();

    let extended = MonoType::extensible_record(Tvar(0), [("_value", MonoType::FLOAT)]);
    let resolved = subst.apply(&extended);
    let record = resolved.as_record().unwrap();

    let keys: Vec<&str> = record.fields.iter().map(|p| p.key.as_str()).collect();
    assert_eq!(keys, ["_time", "_value", "_value"]);
    assert!(record.is_closed());
    assert_eq!(
        resolved.to_string(),
        "{_time: time, _value: float, _value: float}"
    );
}

#[test]
fn test_apply_resolves_through_chains() {
    let subst: Substitution = [(Tvar(0), MonoType::var(1)), (Tvar(1), MonoType::UINT)]
        .into_iter()
        .collect();
    assert_eq!(
        subst.apply(&MonoType::array(MonoType::var(0))),
        MonoType::array(MonoType::UINT)
    );
}
