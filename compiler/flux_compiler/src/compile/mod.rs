//! Semantic graph to evaluator tree.
//!
//! One pass over the graph. Each node's annotated type is resolved under
//! the substitution obtained by matching the root parameters against the
//! input record type; nothing is inferred here. Everything that can be
//! rejected statically is rejected here, so evaluation only fails on data.

use std::sync::Arc;

use flux_semantic::{
    Block, CallExpr, DictExpr, Expression, FunctionExpr, IndexExpr, Literal, MemberExpr, MonoType,
    Name, ObjectExpr, Statement, StringExprPart, Substitution, Tvar,
};
use flux_values::{Duration, Regexp, Value};
use rustc_hash::FxHashSet;

use crate::errors::{invalid_expression, CompileError};
use crate::eval::{CompiledBlock, CompiledParam, Evaluator, FunctionTemplate, StringPart};
use crate::function::CompiledFunction;
use crate::scope::Scope;
use crate::stack::ensure_sufficient_stack;

/// Compile `function` for inputs of type `input`.
///
/// `scope` supplies identifiers bound outside the function, such as
/// natively implemented functions. It is captured by the result and is the
/// parent of every invocation's scope.
#[tracing::instrument(level = "debug", skip_all, fields(params = function.params.len()))]
pub fn compile(
    scope: Option<Arc<Scope>>,
    function: &FunctionExpr,
    input: &MonoType,
) -> Result<CompiledFunction, CompileError> {
    let Some(input_record) = input.as_record() else {
        return Err(CompileError::InputNotRecord { typ: input.clone() });
    };
    let Some(declared) = function.typ.as_function() else {
        return Err(not_a_function(&function.typ));
    };

    let mut subst = Substitution::new();
    for param in &declared.parameters {
        if let Some(actual) = input_record.field(&param.name) {
            subst
                .unify(&param.typ, actual)
                .map_err(|source| CompileError::InputMismatch {
                    parameter: param.name.clone(),
                    source,
                })?;
        }
    }

    let typ = subst.apply(&function.typ);
    let retn = subst.apply(&declared.retn);
    if !retn.is_monomorphic() {
        return Err(CompileError::UnresolvedType {
            typ: retn,
            node: "function return",
        });
    }

    let param_types = function
        .params
        .iter()
        .map(|p| {
            declared
                .parameter(&p.key)
                .map(|t| subst.apply(&t.typ))
                .ok_or_else(|| missing_from_type(&p.key, &function.typ))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut compiler = Compiler::new(subst, scope.as_deref());
    let template = compiler.function(function)?;

    tracing::debug!(return_type = %retn, "compiled function");
    Ok(CompiledFunction::new(template, scope, typ, retn, param_types))
}

/// Per-compilation state.
struct Compiler<'a> {
    subst: Substitution,
    /// Type variables of each enclosing function literal, innermost last.
    generics: Vec<FxHashSet<Tvar>>,
    /// Statically visible parameters and block bindings, innermost last.
    names: Vec<Name>,
    base: Option<&'a Scope>,
}

impl<'a> Compiler<'a> {
    fn new(subst: Substitution, base: Option<&'a Scope>) -> Self {
        Compiler {
            subst,
            generics: Vec::new(),
            names: Vec::new(),
            base,
        }
    }

    /// Apply the substitution, failing if a variable is left that no
    /// enclosing function literal is generic over.
    fn resolve(&self, typ: &MonoType, node: &'static str) -> Result<MonoType, CompileError> {
        let typ = self.subst.apply(typ);
        let unresolved = typ
            .free_vars()
            .into_iter()
            .any(|v| !self.generics.iter().any(|g| g.contains(&v)));
        if unresolved {
            return Err(CompileError::UnresolvedType { typ, node });
        }
        Ok(typ)
    }

    fn is_bound(&self, name: &str) -> bool {
        self.names.iter().rev().any(|n| n.as_str() == name)
            || self.base.is_some_and(|base| base.contains(name))
    }

    // Functions and blocks

    fn function(
        &mut self,
        function: &FunctionExpr,
    ) -> Result<Arc<FunctionTemplate>, CompileError> {
        let typ = self.subst.apply(&function.typ);
        self.generics.push(typ.free_vars());
        let mark = self.names.len();
        let result = self.function_body(function, typ);
        self.names.truncate(mark);
        self.generics.pop();
        result.map(Arc::new)
    }

    fn function_body(
        &mut self,
        function: &FunctionExpr,
        typ: MonoType,
    ) -> Result<FunctionTemplate, CompileError> {
        let Some(fn_type) = typ.as_function() else {
            return Err(not_a_function(&typ));
        };

        let mut seen = FxHashSet::default();
        for param in &function.params {
            if !seen.insert(param.key.as_str()) {
                return Err(CompileError::DuplicateParameter {
                    name: param.key.clone(),
                });
            }
            let Some(declared) = fn_type.parameter(&param.key) else {
                return Err(missing_from_type(&param.key, &typ));
            };
            if declared.pipe != param.pipe {
                return Err(invalid_expression(
                    "function literal",
                    format!(
                        "pipe marker of parameter {:?} disagrees with its type",
                        param.key
                    ),
                ));
            }
        }
        if function.params.iter().filter(|p| p.pipe).count() > 1 {
            return Err(invalid_expression(
                "function literal",
                "more than one pipe parameter",
            ));
        }

        // Defaults see the defining scope, not the other parameters.
        let mut params = Vec::with_capacity(function.params.len());
        for param in &function.params {
            let default = match &param.default {
                Some(default) => Some(self.expr(default)?),
                None => None,
            };
            params.push(CompiledParam {
                name: param.key.clone(),
                default,
                pipe: param.pipe,
            });
        }

        self.names.extend(function.params.iter().map(|p| p.key.clone()));
        let body = self.block(&function.body)?;

        Ok(FunctionTemplate { params, body, typ })
    }

    fn block(&mut self, block: &Block) -> Result<CompiledBlock, CompileError> {
        let Some((last, leading)) = block.body.split_last() else {
            return Err(CompileError::InvalidBlock {
                reason: "function body is empty",
            });
        };
        let Statement::Return(result) = last else {
            return Err(CompileError::InvalidBlock {
                reason: "function body must end with a return statement",
            });
        };

        let mut bindings = Vec::with_capacity(leading.len());
        for statement in leading {
            match statement {
                Statement::Variable { id, init } => {
                    let init = self.expr(init)?;
                    self.names.push(id.clone());
                    bindings.push((id.clone(), init));
                }
                Statement::Return(_) => {
                    return Err(CompileError::InvalidBlock {
                        reason: "return statement before the end of the function body",
                    })
                }
            }
        }

        let result = Box::new(self.expr(result)?);
        Ok(CompiledBlock { bindings, result })
    }

    // Expressions

    fn expr(&mut self, expr: &Expression) -> Result<Evaluator, CompileError> {
        ensure_sufficient_stack(|| self.expr_inner(expr))
    }

    fn boxed(&mut self, expr: &Expression) -> Result<Box<Evaluator>, CompileError> {
        self.expr(expr).map(Box::new)
    }

    fn expr_inner(&mut self, expr: &Expression) -> Result<Evaluator, CompileError> {
        match expr {
            Expression::Identifier(id) => {
                if !self.is_bound(&id.name) {
                    return Err(CompileError::UndefinedIdentifier {
                        name: id.name.clone(),
                    });
                }
                Ok(Evaluator::Identifier(id.name.clone()))
            }
            Expression::Member(member) => self.member(member),
            Expression::Index(index) => self.index(index),
            Expression::Object(object) => self.object(object),
            Expression::Array(array) => {
                let typ = self.resolve(&array.typ, "array literal")?;
                let Some(element) = typ.element_type() else {
                    return Err(invalid_expression(
                        "array literal",
                        format!("type {typ} is not an array type"),
                    ));
                };
                let element = element.clone();
                let elements = array
                    .elements
                    .iter()
                    .map(|e| self.expr(e))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Evaluator::Array { element, elements })
            }
            Expression::Dict(dict) => self.dict(dict),
            Expression::Logical(logical) => Ok(Evaluator::Logical {
                operator: logical.operator,
                left: self.boxed(&logical.left)?,
                right: self.boxed(&logical.right)?,
            }),
            Expression::Unary(unary) => Ok(Evaluator::Unary {
                operator: unary.operator,
                argument: self.boxed(&unary.argument)?,
                typ: self.resolve(&unary.typ, "unary expression")?,
            }),
            Expression::Binary(binary) => Ok(Evaluator::Binary {
                operator: binary.operator,
                left: self.boxed(&binary.left)?,
                right: self.boxed(&binary.right)?,
                typ: self.resolve(&binary.typ, "binary expression")?,
            }),
            Expression::Conditional(cond) => {
                self.resolve(&cond.typ, "conditional expression")?;
                Ok(Evaluator::Conditional {
                    test: self.boxed(&cond.test)?,
                    consequent: self.boxed(&cond.consequent)?,
                    alternate: self.boxed(&cond.alternate)?,
                })
            }
            Expression::StringExpr(string) => {
                let mut parts = Vec::with_capacity(string.parts.len());
                for part in &string.parts {
                    parts.push(match part {
                        StringExprPart::Text(text) => StringPart::Text(text.clone()),
                        StringExprPart::Interpolated(e) => StringPart::Interpolated(self.expr(e)?),
                    });
                }
                Ok(Evaluator::StringExpr(parts))
            }
            Expression::Function(function) => self.function(function).map(Evaluator::Function),
            Expression::Call(call) => self.call(call),
            Expression::Literal(literal) => literal_value(literal).map(Evaluator::Constant),
        }
    }

    fn member(&mut self, member: &MemberExpr) -> Result<Evaluator, CompileError> {
        let object_type = self.subst.apply(&member.object.typ());
        if !matches!(object_type, MonoType::Record(_) | MonoType::Var(_)) {
            return Err(invalid_expression(
                "member expression",
                format!(
                    "cannot access property {:?} of type {object_type}",
                    member.property
                ),
            ));
        }
        Ok(Evaluator::Member {
            object: self.boxed(&member.object)?,
            property: member.property.clone(),
            typ: self.resolve(&member.typ, "member expression")?,
        })
    }

    fn index(&mut self, index: &IndexExpr) -> Result<Evaluator, CompileError> {
        if matches!(*index.index, Expression::Function(_)) {
            return Err(invalid_expression(
                "index expression",
                "a function literal cannot be used as an index",
            ));
        }
        let base_type = self.subst.apply(&index.array.typ());
        if !matches!(
            base_type,
            MonoType::Array(_) | MonoType::Dict(_) | MonoType::Var(_)
        ) {
            return Err(invalid_expression(
                "index expression",
                format!("cannot index a value of type {base_type}"),
            ));
        }
        Ok(Evaluator::Index {
            array: self.boxed(&index.array)?,
            index: self.boxed(&index.index)?,
            typ: self.resolve(&index.typ, "index expression")?,
        })
    }

    fn object(&mut self, object: &ObjectExpr) -> Result<Evaluator, CompileError> {
        self.resolve(&object.typ, "record literal")?;
        let with = match &object.with {
            Some(base) if matches!(**base, Expression::Function(_)) => {
                return Err(invalid_expression(
                    "record literal",
                    "a function literal cannot be extended",
                ))
            }
            Some(base) => Some(self.boxed(base)?),
            None => None,
        };
        let properties = object
            .properties
            .iter()
            .map(|p| Ok((p.key.clone(), self.expr(&p.value)?)))
            .collect::<Result<Vec<_>, CompileError>>()?;
        Ok(Evaluator::Object { with, properties })
    }

    fn dict(&mut self, dict: &DictExpr) -> Result<Evaluator, CompileError> {
        let typ = self.resolve(&dict.typ, "dictionary literal")?;
        let Some(dict_type) = typ.as_dict() else {
            return Err(invalid_expression(
                "dictionary literal",
                format!("type {typ} is not a dictionary type"),
            ));
        };
        let (key, value) = (dict_type.key.clone(), dict_type.value.clone());
        let elements = dict
            .elements
            .iter()
            .map(|(k, v)| Ok((self.expr(k)?, self.expr(v)?)))
            .collect::<Result<Vec<_>, CompileError>>()?;
        Ok(Evaluator::Dict {
            key,
            value,
            elements,
        })
    }

    fn call(&mut self, call: &CallExpr) -> Result<Evaluator, CompileError> {
        let callee_type = self.subst.apply(&call.callee.typ());
        match &callee_type {
            MonoType::Function(f) => {
                for arg in &call.arguments {
                    if f.parameter(&arg.key).is_none() {
                        return Err(invalid_expression(
                            "call expression",
                            format!(
                                "function of type {callee_type} has no parameter {:?}",
                                arg.key
                            ),
                        ));
                    }
                }
                if call.pipe.is_some() && f.pipe_parameter().is_none() {
                    return Err(invalid_expression(
                        "call expression",
                        format!("function of type {callee_type} has no pipe parameter"),
                    ));
                }
            }
            MonoType::Var(_) => {}
            other => {
                return Err(invalid_expression(
                    "call expression",
                    format!("cannot call a value of type {other}"),
                ))
            }
        }

        let pipe = match &call.pipe {
            Some(pipe) => Some(self.boxed(pipe)?),
            None => None,
        };
        let callee = self.boxed(&call.callee)?;
        let arguments = call
            .arguments
            .iter()
            .map(|a| Ok((a.key.clone(), self.expr(&a.value)?)))
            .collect::<Result<Vec<_>, CompileError>>()?;
        Ok(Evaluator::Call {
            callee,
            arguments,
            pipe,
            typ: self.resolve(&call.typ, "call expression")?,
        })
    }
}

/// Build the constant a literal stands for.
fn literal_value(literal: &Literal) -> Result<Value, CompileError> {
    Ok(match literal {
        Literal::Boolean(b) => Value::bool(*b),
        Literal::Integer(n) => Value::int(*n),
        Literal::UnsignedInteger(n) => Value::uint(*n),
        Literal::Float(f) => Value::float(*f),
        Literal::String(s) => Value::string(s),
        Literal::Duration(components) => {
            let duration = Duration::from_components(components).ok_or_else(|| {
                invalid_expression("duration literal", "mixed signs or magnitude overflow")
            })?;
            Value::duration(duration)
        }
        Literal::DateTime(t) => Value::time(*t),
        Literal::Regexp(pattern) => {
            let re = Regexp::new(pattern).map_err(|source| CompileError::InvalidRegex {
                pattern: pattern.clone(),
                source,
            })?;
            Value::regexp(re)
        }
    })
}

#[cold]
fn not_a_function(typ: &MonoType) -> CompileError {
    invalid_expression("function literal", format!("type {typ} is not a function type"))
}

#[cold]
fn missing_from_type(param: &Name, typ: &MonoType) -> CompileError {
    invalid_expression(
        "function literal",
        format!("parameter {param:?} is missing from type {typ}"),
    )
}
