//! Constructors for building semantic graphs without a parser.

use chrono::{DateTime, Utc};

use super::{
    ArrayExpr, BinaryExpr, Block, CallExpr, ConditionalExpr, DictExpr, DurationMagnitude,
    Expression, FunctionExpr, FunctionParameter, IdentifierExpr, IndexExpr, Literal, LogicalExpr,
    MemberExpr, ObjectExpr, PropertyExpr, Statement, StringExpr, StringExprPart, UnaryExpr,
};
use crate::{
    BinaryOperator, DurationUnit, LogicalOperator, MonoType, Name, Parameter, UnaryOperator,
};

fn properties<K: Into<Name>>(
    props: impl IntoIterator<Item = (K, Expression)>,
) -> Vec<PropertyExpr> {
    props
        .into_iter()
        .map(|(key, value)| PropertyExpr {
            key: key.into(),
            value,
        })
        .collect()
}

impl Expression {
    pub fn identifier(name: impl Into<Name>, typ: MonoType) -> Self {
        Expression::Identifier(IdentifierExpr {
            name: name.into(),
            typ,
        })
    }

    pub fn member(object: Expression, property: impl Into<Name>, typ: MonoType) -> Self {
        Expression::Member(MemberExpr {
            object: Box::new(object),
            property: property.into(),
            typ,
        })
    }

    pub fn index(array: Expression, index: Expression, typ: MonoType) -> Self {
        Expression::Index(IndexExpr {
            array: Box::new(array),
            index: Box::new(index),
            typ,
        })
    }

    /// Record literal.
    pub fn object<K: Into<Name>>(
        props: impl IntoIterator<Item = (K, Expression)>,
        typ: MonoType,
    ) -> Self {
        Expression::Object(ObjectExpr {
            with: None,
            properties: properties(props),
            typ,
        })
    }

    /// Record extension, `{base with props...}`.
    pub fn object_with<K: Into<Name>>(
        base: Expression,
        props: impl IntoIterator<Item = (K, Expression)>,
        typ: MonoType,
    ) -> Self {
        Expression::Object(ObjectExpr {
            with: Some(Box::new(base)),
            properties: properties(props),
            typ,
        })
    }

    /// Array literal. `typ` is the array type, not the element type.
    pub fn array(elements: Vec<Expression>, typ: MonoType) -> Self {
        Expression::Array(ArrayExpr { elements, typ })
    }

    /// Dictionary literal. `typ` is the dictionary type.
    pub fn dict(elements: Vec<(Expression, Expression)>, typ: MonoType) -> Self {
        Expression::Dict(DictExpr { elements, typ })
    }

    pub fn logical(operator: LogicalOperator, left: Expression, right: Expression) -> Self {
        Expression::Logical(LogicalExpr {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn and(left: Expression, right: Expression) -> Self {
        Self::logical(LogicalOperator::And, left, right)
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Self::logical(LogicalOperator::Or, left, right)
    }

    pub fn unary(operator: UnaryOperator, argument: Expression, typ: MonoType) -> Self {
        Expression::Unary(UnaryExpr {
            operator,
            argument: Box::new(argument),
            typ,
        })
    }

    pub fn not(argument: Expression) -> Self {
        Self::unary(UnaryOperator::Not, argument, MonoType::BOOL)
    }

    pub fn exists(argument: Expression) -> Self {
        Self::unary(UnaryOperator::Exists, argument, MonoType::BOOL)
    }

    pub fn binary(
        operator: BinaryOperator,
        left: Expression,
        right: Expression,
        typ: MonoType,
    ) -> Self {
        Expression::Binary(BinaryExpr {
            operator,
            left: Box::new(left),
            right: Box::new(right),
            typ,
        })
    }

    pub fn conditional(
        test: Expression,
        consequent: Expression,
        alternate: Expression,
        typ: MonoType,
    ) -> Self {
        Expression::Conditional(ConditionalExpr {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
            typ,
        })
    }

    pub fn string_expr(parts: Vec<StringExprPart>) -> Self {
        Expression::StringExpr(StringExpr { parts })
    }

    pub fn function(function: FunctionExpr) -> Self {
        Expression::Function(function)
    }

    pub fn call<K: Into<Name>>(
        callee: Expression,
        arguments: impl IntoIterator<Item = (K, Expression)>,
        typ: MonoType,
    ) -> Self {
        Expression::Call(CallExpr {
            callee: Box::new(callee),
            arguments: properties(arguments),
            pipe: None,
            typ,
        })
    }

    /// `pipe |> callee(arguments...)`
    pub fn pipe_call<K: Into<Name>>(
        pipe: Expression,
        callee: Expression,
        arguments: impl IntoIterator<Item = (K, Expression)>,
        typ: MonoType,
    ) -> Self {
        Expression::Call(CallExpr {
            callee: Box::new(callee),
            arguments: properties(arguments),
            pipe: Some(Box::new(pipe)),
            typ,
        })
    }

    // Literals

    pub fn bool(v: bool) -> Self {
        Expression::Literal(Literal::Boolean(v))
    }

    pub fn int(v: i64) -> Self {
        Expression::Literal(Literal::Integer(v))
    }

    pub fn uint(v: u64) -> Self {
        Expression::Literal(Literal::UnsignedInteger(v))
    }

    pub fn float(v: f64) -> Self {
        Expression::Literal(Literal::Float(v))
    }

    pub fn string(v: impl Into<String>) -> Self {
        Expression::Literal(Literal::String(v.into()))
    }

    /// Duration literal from `(magnitude, unit)` components, `1h30m` being
    /// `[(1, Hour), (30, Minute)]`.
    pub fn duration(components: impl IntoIterator<Item = (i64, DurationUnit)>) -> Self {
        Expression::Literal(Literal::Duration(
            components
                .into_iter()
                .map(|(magnitude, unit)| DurationMagnitude { magnitude, unit })
                .collect(),
        ))
    }

    pub fn date_time(v: DateTime<Utc>) -> Self {
        Expression::Literal(Literal::DateTime(v))
    }

    pub fn regexp(pattern: impl Into<String>) -> Self {
        Expression::Literal(Literal::Regexp(pattern.into()))
    }
}

impl StringExprPart {
    pub fn text(s: impl Into<String>) -> Self {
        StringExprPart::Text(s.into())
    }
}

impl FunctionParameter {
    pub fn new(key: impl Into<Name>) -> Self {
        FunctionParameter {
            key: key.into(),
            default: None,
            pipe: false,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: Expression) -> Self {
        self.default = Some(default);
        self
    }

    /// Mark as the `<-` parameter.
    #[must_use]
    pub fn pipe(mut self) -> Self {
        self.pipe = true;
        self
    }
}

impl FunctionExpr {
    pub fn new(params: Vec<FunctionParameter>, body: Block, typ: MonoType) -> Self {
        FunctionExpr { params, body, typ }
    }

    /// Build a literal whose function type is assembled from per-parameter
    /// types and a return type. Optional and pipe flags follow the params.
    pub fn returning(
        params: Vec<(FunctionParameter, MonoType)>,
        body: Block,
        retn: MonoType,
    ) -> Self {
        let parameters = params
            .iter()
            .map(|(p, typ)| Parameter {
                name: p.key.clone(),
                typ: typ.clone(),
                optional: p.default.is_some(),
                pipe: p.pipe,
            })
            .collect();
        FunctionExpr {
            params: params.into_iter().map(|(p, _)| p).collect(),
            body,
            typ: MonoType::function(parameters, retn),
        }
    }
}

impl Block {
    pub fn new(body: Vec<Statement>) -> Self {
        Block { body }
    }

    /// A block consisting of a single `return`.
    pub fn returning(expr: Expression) -> Self {
        Block {
            body: vec![Statement::Return(expr)],
        }
    }
}

impl Statement {
    pub fn assign(id: impl Into<Name>, init: Expression) -> Self {
        Statement::Variable {
            id: id.into(),
            init,
        }
    }

    pub fn ret(expr: Expression) -> Self {
        Statement::Return(expr)
    }
}
