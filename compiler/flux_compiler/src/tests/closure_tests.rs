//! Tests for closure argument binding and call-boundary checks.

use std::sync::Arc;

use flux_semantic::{BinaryOperator, MonoType, Name, Parameter};
use flux_values::{Arguments, Callable, CancelToken, EvalContext, EvalError, Value};
use pretty_assertions::assert_eq;

use crate::eval::{Closure, CompiledBlock, CompiledParam, Evaluator, FunctionTemplate};
use crate::scope::Scope;

fn param(name: &str, default: Option<Evaluator>, pipe: bool) -> CompiledParam {
    CompiledParam {
        name: Name::new(name),
        default,
        pipe,
    }
}

fn ident(name: &str) -> Box<Evaluator> {
    Box::new(Evaluator::Identifier(Name::new(name)))
}

/// `(<-tables, n = x) => tables + n`, closed over `x = 10`.
fn add_closure() -> Closure {
    let typ = MonoType::function(
        vec![
            Parameter::new("tables", MonoType::INT).pipe(),
            Parameter::new("n", MonoType::INT).optional(),
        ],
        MonoType::INT,
    );
    let template = FunctionTemplate {
        params: vec![
            param("tables", None, true),
            param("n", Some(Evaluator::Identifier(Name::new("x"))), false),
        ],
        body: CompiledBlock {
            bindings: vec![],
            result: Box::new(Evaluator::Binary {
                operator: BinaryOperator::Add,
                left: ident("tables"),
                right: ident("n"),
                typ: MonoType::INT,
            }),
        },
        typ,
    };
    let scope = Arc::new(Scope::from_values([("x", Value::int(10))]));
    Closure::new(scope, Arc::new(template))
}

#[test]
fn test_named_arguments_bind() {
    let f = add_closure();
    let args = Arguments::new().arg("tables", Value::int(1)).arg("n", Value::int(2));
    assert_eq!(f.call(&EvalContext::new(), args).unwrap(), Value::int(3));
}

#[test]
fn test_pipe_binds_pipe_parameter() {
    let f = add_closure();
    let args = Arguments::new()
        .with_pipe(Value::int(5))
        .arg("n", Value::int(1));
    assert_eq!(f.call(&EvalContext::new(), args).unwrap(), Value::int(6));
}

#[test]
fn test_named_argument_beats_pipe() {
    let f = add_closure();
    let args = Arguments::new()
        .with_pipe(Value::int(100))
        .arg("tables", Value::int(1))
        .arg("n", Value::int(1));
    assert_eq!(f.call(&EvalContext::new(), args).unwrap(), Value::int(2));
}

#[test]
fn test_default_evaluated_in_captured_scope() {
    let f = add_closure();
    let args = Arguments::new().arg("tables", Value::int(1));
    assert_eq!(f.call(&EvalContext::new(), args).unwrap(), Value::int(11));
}

#[test]
fn test_repeated_argument_takes_last() {
    let f = add_closure();
    let args = Arguments::new()
        .arg("tables", Value::int(1))
        .arg("tables", Value::int(4));
    assert_eq!(f.call(&EvalContext::new(), args).unwrap(), Value::int(14));
}

#[test]
fn test_missing_argument_is_internal() {
    let f = add_closure();
    let err = f
        .call(&EvalContext::new(), Arguments::new().arg("n", Value::int(1)))
        .unwrap_err();
    assert_eq!(
        err,
        EvalError::MissingArgument {
            name: Name::new("tables")
        }
    );
    assert!(err.is_internal());
}

#[test]
fn test_unknown_argument_is_internal() {
    let f = add_closure();
    let args = Arguments::new()
        .arg("tables", Value::int(1))
        .arg("bogus", Value::int(1));
    assert_eq!(
        f.call(&EvalContext::new(), args),
        Err(EvalError::UnknownArgument {
            name: Name::new("bogus")
        })
    );
}

#[test]
fn test_pipe_without_pipe_parameter() {
    let template = FunctionTemplate {
        params: vec![],
        body: CompiledBlock {
            bindings: vec![],
            result: Box::new(Evaluator::Constant(Value::int(1))),
        },
        typ: MonoType::function(vec![], MonoType::INT),
    };
    let f = Closure::new(Arc::new(Scope::new()), Arc::new(template));
    let args = Arguments::new().with_pipe(Value::int(1));
    assert_eq!(
        f.call(&EvalContext::new(), args),
        Err(EvalError::UnexpectedPipe)
    );
}

#[test]
fn test_block_bindings_are_sequential() {
    // (a) => { b = a + 1  c = b * 2  return c }
    let template = FunctionTemplate {
        params: vec![param("a", None, false)],
        body: CompiledBlock {
            bindings: vec![
                (
                    Name::new("b"),
                    Evaluator::Binary {
                        operator: BinaryOperator::Add,
                        left: ident("a"),
                        right: Box::new(Evaluator::Constant(Value::int(1))),
                        typ: MonoType::INT,
                    },
                ),
                (
                    Name::new("c"),
                    Evaluator::Binary {
                        operator: BinaryOperator::Mul,
                        left: ident("b"),
                        right: Box::new(Evaluator::Constant(Value::int(2))),
                        typ: MonoType::INT,
                    },
                ),
            ],
            result: ident("c"),
        },
        typ: MonoType::function(vec![Parameter::new("a", MonoType::INT)], MonoType::INT),
    };
    let f = Closure::new(Arc::new(Scope::new()), Arc::new(template));
    let args = Arguments::new().arg("a", Value::int(3));
    assert_eq!(f.call(&EvalContext::new(), args).unwrap(), Value::int(8));
}

#[test]
fn test_cancelled_context_stops_call() {
    let token = CancelToken::new();
    token.cancel();
    let ctx = EvalContext::builder().cancel_token(token).build();
    let args = Arguments::new().arg("tables", Value::int(1));
    assert_eq!(add_closure().call(&ctx, args), Err(EvalError::Cancelled));
}

#[test]
fn test_depth_limit() {
    let ctx = EvalContext::builder().max_call_depth(0).build();
    let args = Arguments::new().arg("tables", Value::int(1));
    assert_eq!(
        add_closure().call(&ctx, args),
        Err(EvalError::RecursionLimit { limit: 0 })
    );
}

#[test]
fn test_function_type_is_template_type() {
    let f = add_closure();
    assert_eq!(
        f.function_type().to_string(),
        "(<-tables: int, ?n: int) => int"
    );
}
