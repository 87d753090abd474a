//! The typed semantic graph.
//!
//! Produced by the type checker and consumed by the compiler. Every node
//! carries the `MonoType` the checker resolved for it; literal, logical and
//! string nodes have fixed types and carry none.
//!
//! Ergonomic constructors live in `build`.

mod build;

use chrono::{DateTime, Utc};

use crate::{BinaryOperator, DurationUnit, LogicalOperator, MonoType, Name, UnaryOperator};

/// A semantic expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Identifier(IdentifierExpr),
    Member(MemberExpr),
    Index(IndexExpr),
    Object(ObjectExpr),
    Array(ArrayExpr),
    Dict(DictExpr),
    Logical(LogicalExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Conditional(ConditionalExpr),
    StringExpr(StringExpr),
    Function(FunctionExpr),
    Call(CallExpr),
    Literal(Literal),
}

#[derive(Clone, Debug, PartialEq)]
pub struct IdentifierExpr {
    pub name: Name,
    pub typ: MonoType,
}

/// `object.property`
#[derive(Clone, Debug, PartialEq)]
pub struct MemberExpr {
    pub object: Box<Expression>,
    pub property: Name,
    pub typ: MonoType,
}

/// `array[index]`, also used for dictionaries.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexExpr {
    pub array: Box<Expression>,
    pub index: Box<Expression>,
    pub typ: MonoType,
}

/// A labelled expression: record property or named call argument.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyExpr {
    pub key: Name,
    pub value: Expression,
}

/// `{with? key: value, ...}`
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectExpr {
    pub with: Option<Box<Expression>>,
    pub properties: Vec<PropertyExpr>,
    pub typ: MonoType,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArrayExpr {
    pub elements: Vec<Expression>,
    pub typ: MonoType,
}

/// `[key: value, ...]`
#[derive(Clone, Debug, PartialEq)]
pub struct DictExpr {
    pub elements: Vec<(Expression, Expression)>,
    pub typ: MonoType,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogicalExpr {
    pub operator: LogicalOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnaryExpr {
    pub operator: UnaryOperator,
    pub argument: Box<Expression>,
    pub typ: MonoType,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BinaryExpr {
    pub operator: BinaryOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub typ: MonoType,
}

/// `if test then consequent else alternate`
#[derive(Clone, Debug, PartialEq)]
pub struct ConditionalExpr {
    pub test: Box<Expression>,
    pub consequent: Box<Expression>,
    pub alternate: Box<Expression>,
    pub typ: MonoType,
}

/// An interpolated string, `"n = ${n}"`.
#[derive(Clone, Debug, PartialEq)]
pub struct StringExpr {
    pub parts: Vec<StringExprPart>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StringExprPart {
    Text(String),
    Interpolated(Expression),
}

/// A function literal.
///
/// `typ` is the literal's full function type. Its parameter list names the
/// same parameters as `params`, and may mention type variables when the
/// literal is polymorphic.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionExpr {
    pub params: Vec<FunctionParameter>,
    pub body: Block,
    pub typ: MonoType,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionParameter {
    pub key: Name,
    pub default: Option<Expression>,
    /// Declared with `<-`, receiving the piped value.
    pub pipe: bool,
}

/// A function body: bindings followed by exactly one `return`.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub body: Vec<Statement>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Variable { id: Name, init: Expression },
    Return(Expression),
}

/// `callee(key: value, ...)`, or `pipe |> callee(...)` when `pipe` is set.
#[derive(Clone, Debug, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expression>,
    pub arguments: Vec<PropertyExpr>,
    pub pipe: Option<Box<Expression>>,
    pub typ: MonoType,
}

/// One `magnitude unit` component of a duration literal (`1h30m` has two).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DurationMagnitude {
    pub magnitude: i64,
    pub unit: DurationUnit,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Boolean(bool),
    Integer(i64),
    UnsignedInteger(u64),
    Float(f64),
    String(String),
    Duration(Vec<DurationMagnitude>),
    DateTime(DateTime<Utc>),
    /// Regular-expression source; compiled by the compiler.
    Regexp(String),
}

impl Literal {
    pub fn typ(&self) -> MonoType {
        match self {
            Literal::Boolean(_) => MonoType::BOOL,
            Literal::Integer(_) => MonoType::INT,
            Literal::UnsignedInteger(_) => MonoType::UINT,
            Literal::Float(_) => MonoType::FLOAT,
            Literal::String(_) => MonoType::STRING,
            Literal::Duration(_) => MonoType::DURATION,
            Literal::DateTime(_) => MonoType::TIME,
            Literal::Regexp(_) => MonoType::REGEXP,
        }
    }
}

impl Expression {
    /// The type the checker resolved for this node.
    pub fn typ(&self) -> MonoType {
        match self {
            Expression::Identifier(e) => e.typ.clone(),
            Expression::Member(e) => e.typ.clone(),
            Expression::Index(e) => e.typ.clone(),
            Expression::Object(e) => e.typ.clone(),
            Expression::Array(e) => e.typ.clone(),
            Expression::Dict(e) => e.typ.clone(),
            Expression::Logical(_) => MonoType::BOOL,
            Expression::Unary(e) => e.typ.clone(),
            Expression::Binary(e) => e.typ.clone(),
            Expression::Conditional(e) => e.typ.clone(),
            Expression::StringExpr(_) => MonoType::STRING,
            Expression::Function(e) => e.typ.clone(),
            Expression::Call(e) => e.typ.clone(),
            Expression::Literal(l) => l.typ(),
        }
    }

    /// Short node description for diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Expression::Identifier(_) => "identifier",
            Expression::Member(_) => "member expression",
            Expression::Index(_) => "index expression",
            Expression::Object(_) => "record literal",
            Expression::Array(_) => "array literal",
            Expression::Dict(_) => "dictionary literal",
            Expression::Logical(_) => "logical expression",
            Expression::Unary(_) => "unary expression",
            Expression::Binary(_) => "binary expression",
            Expression::Conditional(_) => "conditional expression",
            Expression::StringExpr(_) => "string expression",
            Expression::Function(_) => "function literal",
            Expression::Call(_) => "call expression",
            Expression::Literal(_) => "literal",
        }
    }
}
