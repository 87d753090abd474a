//! The compiled artifact.

use std::sync::Arc;

use flux_semantic::MonoType;
use flux_values::{EvalContext, EvalError, EvalResult, Record, Value};

use crate::eval::{relabel_generic, FunctionTemplate};
use crate::scope::Scope;

/// A compiled function, ready to be evaluated against input records.
///
/// Immutable and `Send + Sync`: one instance may be evaluated any number of
/// times, from any number of threads at once.
#[derive(Debug)]
pub struct CompiledFunction {
    template: Arc<FunctionTemplate>,
    scope: Option<Arc<Scope>>,
    /// Resolved function type.
    typ: MonoType,
    /// Resolved return type.
    retn: MonoType,
    /// Resolved type of each parameter, aligned with `template.params`.
    param_types: Vec<MonoType>,
}

impl CompiledFunction {
    pub(crate) fn new(
        template: Arc<FunctionTemplate>,
        scope: Option<Arc<Scope>>,
        typ: MonoType,
        retn: MonoType,
        param_types: Vec<MonoType>,
    ) -> Self {
        CompiledFunction {
            template,
            scope,
            typ,
            retn,
            param_types,
        }
    }

    /// The type of every value [`eval`](Self::eval) returns.
    pub fn typ(&self) -> &MonoType {
        &self.retn
    }

    /// The full resolved function type, parameters included.
    pub fn function_type(&self) -> &MonoType {
        &self.typ
    }

    /// Evaluate against one input record.
    ///
    /// Each parameter is bound to the input property of the same name. A
    /// parameter the input lacks takes its default, or else a null of its
    /// type.
    pub fn eval(&self, ctx: &EvalContext, input: &Value) -> EvalResult {
        ctx.check()?;
        let Value::Record(record) = input else {
            return Err(EvalError::InvalidOperand {
                operator: "input".to_string(),
                operand: input.type_name().to_string(),
            });
        };

        let frame = self.bind(ctx, record)?;
        let result = self.template.body.eval(&Arc::new(frame), ctx)?;
        Ok(relabel_generic(result, &self.retn))
    }

    /// Build the parameter frame for one input record.
    ///
    /// The frame's parent is the base scope; without one it is a root frame.
    /// Defaults evaluate in the base scope, or an empty one when there is none.
    fn bind(&self, ctx: &EvalContext, record: &Record) -> Result<Scope, EvalError> {
        let mut frame = match &self.scope {
            Some(scope) => Scope::child(scope),
            None => Scope::new(),
        };
        for (param, typ) in self.template.params.iter().zip(&self.param_types) {
            let value = match (record.get(&param.name), &param.default) {
                (Some(value), _) => value.clone(),
                (None, Some(default)) => {
                    let base = self
                        .scope
                        .clone()
                        .unwrap_or_else(|| Arc::new(Scope::new()));
                    default.eval(&base, ctx)?
                }
                (None, None) => Value::Null(typ.clone()),
            };
            frame.set(param.name.clone(), value);
        }
        Ok(frame)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
