//! Flux Values - runtime values and evaluation plumbing.
//!
//! Shared by the compiler and by embedders that hand values in and take
//! results out:
//! - `Value`: the closed set of runtime values, including typed nulls
//! - `Callable` / `Arguments`: the seam through which functions are applied
//! - `EvalContext`: cancellation, deadline and call-depth policy
//! - `EvalError`: per-invocation failures, classified by [`ErrorClass`]

mod context;
pub mod errors;
mod function;
mod value;

pub use context::{CancelToken, EvalContext, EvalContextBuilder};
pub use errors::{ErrorClass, EvalError, EvalResult};
pub use function::{Arguments, Callable, NativeFunction};
pub use value::{format_time, Array, Dictionary, Duration, Record, Regexp, Value};
