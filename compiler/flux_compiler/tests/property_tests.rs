//! Property-based tests for evaluation semantics.
//!
//! Each property compiles one function once and checks it over generated
//! inputs.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use flux_compiler::{compile, CompiledFunction};
use flux_semantic::{BinaryOperator, Block, Expression, FunctionExpr, FunctionParameter, MonoType};
use flux_values::{EvalContext, EvalError, Value};
use proptest::prelude::*;

fn ident(name: &str, typ: MonoType) -> Expression {
    Expression::identifier(name, typ)
}

fn param(name: &str, typ: MonoType) -> (FunctionParameter, MonoType) {
    (FunctionParameter::new(name), typ)
}

fn eval(compiled: &CompiledFunction, input: &Value) -> Result<Value, EvalError> {
    compiled.eval(&EvalContext::new(), input)
}

/// `(r) => r.a + r.b` over records that may lack `b`.
fn sum_fields() -> CompiledFunction {
    let r = MonoType::record([("a", MonoType::INT), ("b", MonoType::INT)]);
    let f = FunctionExpr::returning(
        vec![param("r", r.clone())],
        Block::returning(Expression::binary(
            BinaryOperator::Add,
            Expression::member(ident("r", r.clone()), "a", MonoType::INT),
            Expression::member(ident("r", r.clone()), "b", MonoType::INT),
            MonoType::INT,
        )),
        MonoType::INT,
    );
    compile(None, &f, &MonoType::record([("r", r)])).unwrap()
}

fn optional_field(record: &mut Vec<(&'static str, Value)>, key: &'static str, v: Option<i64>) {
    if let Some(v) = v {
        record.push((key, Value::int(v)));
    }
}

/// `(values, i) => values[i]`
fn index_at() -> CompiledFunction {
    let array = MonoType::array(MonoType::INT);
    let f = FunctionExpr::returning(
        vec![param("values", array.clone()), param("i", MonoType::INT)],
        Block::returning(Expression::index(
            ident("values", array.clone()),
            ident("i", MonoType::INT),
            MonoType::INT,
        )),
        MonoType::INT,
    );
    let input = MonoType::record([("values", array), ("i", MonoType::INT)]);
    compile(None, &f, &input).unwrap()
}

/// `(a) => exists a`
fn exists_a() -> CompiledFunction {
    let f = FunctionExpr::returning(
        vec![param("a", MonoType::INT)],
        Block::returning(Expression::exists(ident("a", MonoType::INT))),
        MonoType::BOOL,
    );
    compile(None, &f, &MonoType::record([("a", MonoType::INT)])).unwrap()
}

/// `(a, b) => a == b`
fn equals() -> CompiledFunction {
    let f = FunctionExpr::returning(
        vec![param("a", MonoType::INT), param("b", MonoType::INT)],
        Block::returning(Expression::binary(
            BinaryOperator::Eq,
            ident("a", MonoType::INT),
            ident("b", MonoType::INT),
            MonoType::BOOL,
        )),
        MonoType::BOOL,
    );
    let input = MonoType::record([("a", MonoType::INT), ("b", MonoType::INT)]);
    compile(None, &f, &input).unwrap()
}

/// `(c, values) => if c then 0 else values[100]`
fn guarded_index() -> CompiledFunction {
    let array = MonoType::array(MonoType::INT);
    let f = FunctionExpr::returning(
        vec![param("c", MonoType::BOOL), param("values", array.clone())],
        Block::returning(Expression::conditional(
            ident("c", MonoType::BOOL),
            Expression::int(0),
            Expression::index(
                ident("values", array.clone()),
                Expression::int(100),
                MonoType::INT,
            ),
            MonoType::INT,
        )),
        MonoType::INT,
    );
    let input = MonoType::record([("c", MonoType::BOOL), ("values", array)]);
    compile(None, &f, &input).unwrap()
}

fn int_array(values: &[i64]) -> Value {
    Value::array(
        MonoType::INT,
        values.iter().copied().map(Value::int).collect(),
    )
}

fn nullable_int(v: Option<i64>) -> Value {
    v.map_or(Value::Null(MonoType::INT), Value::int)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn missing_field_gives_typed_null(
        a in any::<i32>(),
        b in proptest::option::of(any::<i32>()),
    ) {
        let compiled = sum_fields();
        let mut fields = vec![("a", Value::int(i64::from(a)))];
        optional_field(&mut fields, "b", b.map(i64::from));
        let input = Value::record([("r", Value::record(fields))]);

        let got = eval(&compiled, &input).unwrap();
        let want = match b {
            Some(b) => Value::int(i64::from(a) + i64::from(b)),
            None => Value::null(MonoType::INT),
        };
        prop_assert_eq!(got, want);
    }

    #[test]
    fn index_fails_exactly_out_of_range(
        values in proptest::collection::vec(any::<i64>(), 0..8),
        i in -3_i64..12,
    ) {
        let compiled = index_at();
        let input = Value::record([("values", int_array(&values)), ("i", Value::int(i))]);
        let got = eval(&compiled, &input);

        match usize::try_from(i).ok().and_then(|i| values.get(i)) {
            Some(v) => prop_assert_eq!(got.unwrap(), Value::int(*v)),
            None => prop_assert_eq!(
                got,
                Err(EvalError::IndexOutOfBounds { index: i, len: values.len() })
            ),
        }
    }

    #[test]
    fn exists_is_never_null(a in proptest::option::of(any::<i64>())) {
        let compiled = exists_a();
        let got = eval(&compiled, &Value::record([("a", nullable_int(a))])).unwrap();
        prop_assert_eq!(got, Value::bool(a.is_some()));
    }

    #[test]
    fn equality_with_null_is_null(
        a in proptest::option::of(any::<i64>()),
        b in proptest::option::of(any::<i64>()),
    ) {
        let compiled = equals();
        let input = Value::record([("a", nullable_int(a)), ("b", nullable_int(b))]);
        let got = eval(&compiled, &input).unwrap();
        let want = match (a, b) {
            (Some(a), Some(b)) => Value::bool(a == b),
            _ => Value::null(MonoType::BOOL),
        };
        prop_assert_eq!(got, want);
    }

    #[test]
    fn evaluation_is_idempotent(
        values in proptest::collection::vec(any::<i64>(), 0..8),
        i in -3_i64..12,
    ) {
        let compiled = index_at();
        let input = Value::record([("values", int_array(&values)), ("i", Value::int(i))]);
        prop_assert_eq!(eval(&compiled, &input), eval(&compiled, &input));
    }

    #[test]
    fn untaken_branch_is_not_evaluated(
        c in any::<bool>(),
        values in proptest::collection::vec(any::<i64>(), 0..8),
    ) {
        let compiled = guarded_index();
        let input = Value::record([("c", Value::bool(c)), ("values", int_array(&values))]);
        let got = eval(&compiled, &input);
        if c {
            prop_assert_eq!(got.unwrap(), Value::int(0));
        } else {
            prop_assert_eq!(
                got,
                Err(EvalError::IndexOutOfBounds { index: 100, len: values.len() })
            );
        }
    }
}
