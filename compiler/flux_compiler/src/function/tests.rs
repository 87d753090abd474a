use super::*;
use flux_semantic::{Block, Expression, FunctionExpr, FunctionParameter, Name};
use pretty_assertions::assert_eq;

use crate::{compile, to_scope};

/// `(a, b = 2) => a`
fn defaulted(base: Option<Arc<Scope>>) -> CompiledFunction {
    let f = FunctionExpr::returning(
        vec![
            (FunctionParameter::new("a"), MonoType::INT),
            (
                FunctionParameter::new("b").with_default(Expression::int(2)),
                MonoType::INT,
            ),
        ],
        Block::returning(Expression::identifier("a", MonoType::INT)),
        MonoType::INT,
    );
    let input = MonoType::record([("a", MonoType::INT), ("b", MonoType::INT)]);
    compile(base, &f, &input).unwrap()
}

fn record(value: &Value) -> &Record {
    match value {
        Value::Record(record) => record,
        other => panic!("expected a record, got {other:?}"),
    }
}

#[test]
fn test_frame_without_base_scope_is_root() {
    let compiled = defaulted(None);
    let input = Value::record([("a", Value::int(1))]);
    let frame = compiled.bind(&EvalContext::new(), record(&input)).unwrap();

    assert!(frame.parent().is_none());
    assert_eq!(frame.lookup("a"), Some(&Value::int(1)));
    assert_eq!(frame.lookup("b"), Some(&Value::int(2)));
    assert_eq!(frame.len(), 2);
}

#[test]
fn test_frame_with_base_scope_is_its_child() {
    let base = to_scope(Some(&[(Name::new("k"), Value::int(7))])).unwrap();
    let compiled = defaulted(Some(Arc::clone(&base)));
    let input = Value::record([("a", Value::int(1)), ("b", Value::int(5))]);
    let frame = compiled.bind(&EvalContext::new(), record(&input)).unwrap();

    assert!(frame.parent().is_some_and(|parent| Arc::ptr_eq(parent, &base)));
    assert_eq!(frame.lookup("b"), Some(&Value::int(5)));
    assert_eq!(frame.lookup("k"), Some(&Value::int(7)));
}

#[test]
fn test_eval_without_base_scope() {
    let compiled = defaulted(None);
    let input = Value::record([("a", Value::int(3))]);
    assert_eq!(
        compiled.eval(&EvalContext::new(), &input).unwrap(),
        Value::int(3)
    );
}
