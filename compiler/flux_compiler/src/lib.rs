//! Flux Compiler - compiles typed Flux function expressions into evaluator
//! trees and evaluates them against input records.
//!
//! # Architecture
//!
//! - `compile`: resolves the graph's types against an input record type and
//!   builds one evaluator node per semantic node
//! - `CompiledFunction`: the immutable result, evaluated once per record
//! - `Scope`: chained, shareable variable frames; closures capture them
//! - `Evaluator`: the closed set of tree nodes, walked recursively with
//!   three-valued null semantics
//!
//! Runtime values, evaluation errors and the execution context come from
//! `flux_values`; the semantic graph and types come from `flux_semantic`.

mod compile;
pub mod errors;
mod eval;
mod function;
mod scope;
mod stack;

use std::sync::Once;

pub use compile::compile;
pub use errors::CompileError;
pub use function::CompiledFunction;
pub use scope::{to_scope, Scope};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset, and nothing after the first call.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

#[cfg(test)]
mod tests;
