//! Flux Semantic - typed semantic graph for the Flux expression compiler.
//!
//! This crate holds the data the compiler consumes but never produces:
//! - `Name`: cheap-to-clone identifiers and record labels
//! - `MonoType`: the resolved type language, including type variables that
//!   remain inside polymorphic function literals
//! - `Substitution`: one-way unification used to specialize a function's
//!   annotated types against a concrete input type
//! - `Expression` and friends: the semantic graph, as annotated by the type
//!   checker
//!
//! Parsing and type inference live elsewhere. Graphs can be built by hand
//! through the constructors on `Expression`, `FunctionExpr` and `Block`.

pub mod graph;
mod name;
mod operators;
pub mod types;

pub use graph::{
    ArrayExpr, BinaryExpr, Block, CallExpr, ConditionalExpr, DictExpr, DurationMagnitude,
    Expression, FunctionExpr, FunctionParameter, IdentifierExpr, IndexExpr, Literal, LogicalExpr,
    MemberExpr, ObjectExpr, PropertyExpr, Statement, StringExpr, StringExprPart, UnaryExpr,
};
pub use name::Name;
pub use operators::{BinaryOperator, DurationUnit, LogicalOperator, UnaryOperator};
pub use types::{
    BasicType, DictType, FunctionType, MonoType, Parameter, Property, RecordType, Substitution,
    Tvar, UnifyError,
};
