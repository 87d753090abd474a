//! Closures: a compiled function literal plus the scope it was created in.

use std::sync::Arc;

use flux_semantic::MonoType;
use flux_values::{Arguments, Callable, EvalContext, EvalError, EvalResult};

use super::FunctionTemplate;
use crate::scope::Scope;

/// A function value built by evaluating a function literal.
#[derive(Debug)]
pub(crate) struct Closure {
    /// Captured by reference: later bindings in enclosing frames are not
    /// visible, since frames are never mutated once shared.
    scope: Arc<Scope>,
    template: Arc<FunctionTemplate>,
}

impl Closure {
    pub fn new(scope: Arc<Scope>, template: Arc<FunctionTemplate>) -> Self {
        Closure { scope, template }
    }

    /// Bind every parameter in a fresh frame over the captured scope.
    ///
    /// Each parameter takes, in order of preference: its named argument,
    /// the piped value if it is the pipe parameter, or its default.
    fn bind(&self, ctx: &EvalContext, args: Arguments) -> Result<Scope, EvalError> {
        let template = &*self.template;
        let (named, mut pipe) = args.into_parts();

        if let Some((name, _)) = named.iter().find(|(n, _)| template.param(n).is_none()) {
            return Err(EvalError::UnknownArgument { name: name.clone() });
        }
        if pipe.is_some() && !template.has_pipe() {
            return Err(EvalError::UnexpectedPipe);
        }

        let mut frame = Scope::child(&self.scope);
        for param in &template.params {
            let mut given = named
                .iter()
                .rev()
                .find(|(n, _)| *n == param.name)
                .map(|(_, v)| v.clone());
            if given.is_none() && param.pipe {
                given = pipe.take();
            }
            let value = match given {
                Some(v) => v,
                None => match &param.default {
                    Some(default) => default.eval(&self.scope, ctx)?,
                    None => {
                        return Err(EvalError::MissingArgument {
                            name: param.name.clone(),
                        })
                    }
                },
            };
            frame.set(param.name.clone(), value);
        }
        Ok(frame)
    }
}

impl Callable for Closure {
    fn function_type(&self) -> &MonoType {
        &self.template.typ
    }

    fn call(&self, ctx: &EvalContext, args: Arguments) -> EvalResult {
        let ctx = ctx.descend()?;
        tracing::trace!(depth = ctx.depth(), "closure call");
        let frame = self.bind(&ctx, args)?;
        self.template.body.eval(&Arc::new(frame), &ctx)
    }
}
