//! Function values.
//!
//! Anything callable from a Flux expression implements [`Callable`]:
//! closures built by the evaluator, and native functions that embedders
//! place in a base scope.

use std::fmt;
use std::sync::Arc;

use flux_semantic::{MonoType, Name};
use smallvec::SmallVec;

use crate::context::EvalContext;
use crate::errors::EvalResult;
use crate::value::Value;

/// A function value.
///
/// Implementations must be shareable across threads: one compiled function
/// is evaluated from many threads at once, and function values flow through
/// its scopes.
pub trait Callable: Send + Sync + fmt::Debug {
    /// The function's resolved type.
    fn function_type(&self) -> &MonoType;

    /// Apply the function to already-evaluated arguments.
    fn call(&self, ctx: &EvalContext, args: Arguments) -> EvalResult;
}

/// Evaluated arguments of one call: named arguments in source order and
/// the piped value, if any.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arguments {
    named: SmallVec<[(Name, Value); 4]>,
    pipe: Option<Value>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Arguments {
            named: SmallVec::with_capacity(n),
            pipe: None,
        }
    }

    pub fn push(&mut self, name: Name, value: Value) {
        self.named.push((name, value));
    }

    #[must_use]
    pub fn arg(mut self, name: impl Into<Name>, value: Value) -> Self {
        self.push(name.into(), value);
        self
    }

    pub fn set_pipe(&mut self, value: Value) {
        self.pipe = Some(value);
    }

    #[must_use]
    pub fn with_pipe(mut self, value: Value) -> Self {
        self.pipe = Some(value);
        self
    }

    /// Named argument lookup; a repeated name resolves to its last value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.named
            .iter()
            .rev()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, v)| v)
    }

    pub fn pipe(&self) -> Option<&Value> {
        self.pipe.as_ref()
    }

    /// Split into named arguments and the piped value.
    pub fn into_parts(self) -> (SmallVec<[(Name, Value); 4]>, Option<Value>) {
        (self.named, self.pipe)
    }
}

type NativeFn = dyn Fn(&EvalContext, &Arguments) -> EvalResult + Send + Sync;

/// A function implemented in Rust.
///
/// Native functions see the raw arguments. Defaults and pipe binding are
/// the implementation's business.
#[derive(Clone)]
pub struct NativeFunction {
    name: Name,
    typ: MonoType,
    func: Arc<NativeFn>,
}

impl NativeFunction {
    pub fn new(
        name: impl Into<Name>,
        typ: MonoType,
        func: impl Fn(&EvalContext, &Arguments) -> EvalResult + Send + Sync + 'static,
    ) -> Self {
        NativeFunction {
            name: name.into(),
            typ,
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }
}

impl Callable for NativeFunction {
    fn function_type(&self) -> &MonoType {
        &self.typ
    }

    fn call(&self, ctx: &EvalContext, args: Arguments) -> EvalResult {
        ctx.check()?;
        (self.func)(ctx, &args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native {}: {}>", self.name, self.typ)
    }
}
