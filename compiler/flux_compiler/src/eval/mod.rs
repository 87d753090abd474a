//! The evaluator tree.
//!
//! The compiler turns each semantic node into exactly one [`Evaluator`]
//! node with its types already resolved. Evaluation is a direct recursive
//! walk; the node set is fixed, so dispatch is a `match` rather than trait
//! objects.
//!
//! Nothing here mutates the tree or a shared scope, so one tree may be
//! evaluated from many threads at once.

mod access;
mod closure;
mod construct;
mod interpolate;
mod logical;
mod operators;
mod unary;

use std::sync::Arc;

use flux_semantic::{BinaryOperator, LogicalOperator, MonoType, Name, UnaryOperator};
use flux_values::{errors::not_callable, Arguments, EvalContext, EvalError, EvalResult, Value};

use crate::scope::Scope;
use crate::stack::ensure_sufficient_stack;

pub(crate) use closure::Closure;
pub(crate) use logical::evaluate_logical;
pub(crate) use operators::evaluate_binary;
pub(crate) use unary::evaluate_unary;

/// One node of a compiled expression.
#[derive(Debug)]
pub(crate) enum Evaluator {
    /// A literal, built once at compile time.
    Constant(Value),
    Identifier(Name),
    Member {
        object: Box<Evaluator>,
        property: Name,
        typ: MonoType,
    },
    Index {
        array: Box<Evaluator>,
        index: Box<Evaluator>,
        typ: MonoType,
    },
    Object {
        with: Option<Box<Evaluator>>,
        properties: Vec<(Name, Evaluator)>,
    },
    Array {
        element: MonoType,
        elements: Vec<Evaluator>,
    },
    Dict {
        key: MonoType,
        value: MonoType,
        elements: Vec<(Evaluator, Evaluator)>,
    },
    Logical {
        operator: LogicalOperator,
        left: Box<Evaluator>,
        right: Box<Evaluator>,
    },
    Unary {
        operator: UnaryOperator,
        argument: Box<Evaluator>,
        typ: MonoType,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Evaluator>,
        right: Box<Evaluator>,
        typ: MonoType,
    },
    Conditional {
        test: Box<Evaluator>,
        consequent: Box<Evaluator>,
        alternate: Box<Evaluator>,
    },
    StringExpr(Vec<StringPart>),
    Function(Arc<FunctionTemplate>),
    Call {
        callee: Box<Evaluator>,
        arguments: Vec<(Name, Evaluator)>,
        pipe: Option<Box<Evaluator>>,
        typ: MonoType,
    },
}

#[derive(Debug)]
pub(crate) enum StringPart {
    Text(String),
    Interpolated(Evaluator),
}

/// A compiled function literal: everything a closure needs except the
/// scope it captures.
#[derive(Debug)]
pub(crate) struct FunctionTemplate {
    pub params: Vec<CompiledParam>,
    pub body: CompiledBlock,
    /// The literal's resolved function type.
    pub typ: MonoType,
}

impl FunctionTemplate {
    pub fn param(&self, name: &str) -> Option<&CompiledParam> {
        self.params.iter().find(|p| p.name.as_str() == name)
    }

    pub fn has_pipe(&self) -> bool {
        self.params.iter().any(|p| p.pipe)
    }
}

#[derive(Debug)]
pub(crate) struct CompiledParam {
    pub name: Name,
    pub default: Option<Evaluator>,
    pub pipe: bool,
}

/// Bindings followed by the returned expression.
#[derive(Debug)]
pub(crate) struct CompiledBlock {
    pub bindings: Vec<(Name, Evaluator)>,
    pub result: Box<Evaluator>,
}

impl CompiledBlock {
    /// Run the bindings, each in a fresh child frame, then the result.
    pub fn eval(&self, scope: &Arc<Scope>, ctx: &EvalContext) -> EvalResult {
        if self.bindings.is_empty() {
            return self.result.eval(scope, ctx);
        }
        let mut current = Arc::clone(scope);
        for (name, init) in &self.bindings {
            let value = init.eval(&current, ctx)?;
            let mut frame = Scope::child(&current);
            frame.set(name.clone(), value);
            current = Arc::new(frame);
        }
        self.result.eval(&current, ctx)
    }
}

impl Evaluator {
    pub fn eval(&self, scope: &Arc<Scope>, ctx: &EvalContext) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(scope, ctx))
    }

    fn eval_inner(&self, scope: &Arc<Scope>, ctx: &EvalContext) -> EvalResult {
        match self {
            Evaluator::Constant(v) => Ok(v.clone()),
            Evaluator::Identifier(name) => scope.get(name).cloned(),
            Evaluator::Member {
                object,
                property,
                typ,
            } => {
                let object = object.eval(scope, ctx)?;
                access::member(&object, property, typ)
            }
            Evaluator::Index { array, index, typ } => {
                let base = array.eval(scope, ctx)?;
                access::index(&base, || index.eval(scope, ctx), typ)
            }
            Evaluator::Object { with, properties } => {
                let base = match with {
                    Some(base) => Some(base.eval(scope, ctx)?),
                    None => None,
                };
                construct::object(base, properties, |e| e.eval(scope, ctx))
            }
            Evaluator::Array { element, elements } => {
                let values = elements
                    .iter()
                    .map(|e| e.eval(scope, ctx))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::array(element.clone(), values))
            }
            Evaluator::Dict {
                key,
                value,
                elements,
            } => construct::dict(key, value, elements, |e| e.eval(scope, ctx)),
            Evaluator::Logical {
                operator,
                left,
                right,
            } => evaluate_logical(
                *operator,
                left.eval(scope, ctx)?,
                || right.eval(scope, ctx),
            ),
            Evaluator::Unary {
                operator,
                argument,
                typ,
            } => evaluate_unary(*operator, argument.eval(scope, ctx)?, typ),
            Evaluator::Binary {
                operator,
                left,
                right,
                typ,
            } => {
                let left = left.eval(scope, ctx)?;
                let right = right.eval(scope, ctx)?;
                evaluate_binary(*operator, &left, &right, typ)
            }
            Evaluator::Conditional {
                test,
                consequent,
                alternate,
            } => match test.eval(scope, ctx)? {
                Value::Bool(true) => consequent.eval(scope, ctx),
                // A null test is not true.
                Value::Bool(false) | Value::Null(_) => alternate.eval(scope, ctx),
                other => Err(EvalError::InvalidOperand {
                    operator: "if".to_string(),
                    operand: other.type_name().to_string(),
                }),
            },
            Evaluator::StringExpr(parts) => {
                interpolate::interpolate(parts, |e| e.eval(scope, ctx))
            }
            Evaluator::Function(template) => Ok(Value::Function(Arc::new(Closure::new(
                Arc::clone(scope),
                Arc::clone(template),
            )))),
            Evaluator::Call {
                callee,
                arguments,
                pipe,
                typ,
            } => eval_call(scope, ctx, callee, arguments, pipe.as_deref(), typ),
        }
    }
}

/// Pipe first, then the callee, then the named arguments in order.
fn eval_call(
    scope: &Arc<Scope>,
    ctx: &EvalContext,
    callee: &Evaluator,
    arguments: &[(Name, Evaluator)],
    pipe: Option<&Evaluator>,
    typ: &MonoType,
) -> EvalResult {
    let piped = match pipe {
        Some(p) => Some(p.eval(scope, ctx)?),
        None => None,
    };

    let function = match callee.eval(scope, ctx)? {
        Value::Function(f) => f,
        Value::Null(_) => return Err(EvalError::NullCall),
        other => return Err(not_callable(&other)),
    };

    let mut args = Arguments::with_capacity(arguments.len());
    for (name, arg) in arguments {
        args.push(name.clone(), arg.eval(scope, ctx)?);
    }
    if let Some(piped) = piped {
        args.set_pipe(piped);
    }

    let result = function.call(ctx, args)?;
    Ok(relabel_generic(result, typ))
}

/// Give a value produced by a polymorphic closure the concrete type known at
/// the call site, including nulls nested in its records and collections.
pub(crate) fn relabel_generic(value: Value, typ: &MonoType) -> Value {
    if value.is_generic() {
        value.retyped(typ)
    } else {
        value
    }
}
