//! The closed registry of filter operators.
//!
//! Operators are looked up by canonical name (underscores stripped) and fall
//! into one of three groups, tried in this order:
//!
//! 1. set membership (`in`, `notin`), applied to the query immediately;
//! 2. pattern matching (`like`, `ilike`, `match`, `notilike`), only for
//!    attributes backed by a concrete column;
//! 3. generic comparisons (`eq`, `ne`, `ge`, `gt`, `le`, `lt`, `is`, `is_not`).
//!
//! Groups 2 and 3 are deferred and combined with a single AND at the end.

use crate::attribute::AttributeHandle;
use model::core::value::Value;
use planner::query::ast::expr::{BinaryOperator, Expr};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOp {
    In,
    NotIn,
}

impl SetOp {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "in" => Some(SetOp::In),
            "notin" => Some(SetOp::NotIn),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SetOp::In => "in",
            SetOp::NotIn => "notin",
        }
    }

    /// A list operand supplies the set; any other operand is a set of one.
    pub fn build(self, attribute: Expr, val: Value) -> Expr {
        let list = match val {
            Value::List(items) => items.into_iter().map(Expr::Value).collect(),
            single => vec![Expr::Value(single)],
        };
        Expr::InList {
            expr: Box::new(attribute),
            list,
            negated: self == SetOp::NotIn,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternOp {
    Like,
    ILike,
    Match,
    NotILike,
}

impl PatternOp {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "like" => Some(PatternOp::Like),
            "ilike" => Some(PatternOp::ILike),
            "match" => Some(PatternOp::Match),
            "notilike" => Some(PatternOp::NotILike),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PatternOp::Like => "like",
            PatternOp::ILike => "ilike",
            PatternOp::Match => "match",
            PatternOp::NotILike => "notilike",
        }
    }

    pub fn build(self, attribute: Expr, val: Value) -> Expr {
        let (case_insensitive, negated) = match self {
            PatternOp::Match => {
                return Expr::Match {
                    expr: Box::new(attribute),
                    query: Box::new(Expr::Value(val)),
                };
            }
            PatternOp::Like => (false, false),
            PatternOp::ILike => (true, false),
            PatternOp::NotILike => (true, true),
        };

        Expr::Like {
            expr: Box::new(attribute),
            pattern: Box::new(Expr::Value(val)),
            case_insensitive,
            negated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Ge,
    Gt,
    Le,
    Lt,
    Is,
    IsNot,
}

impl ComparisonOp {
    /// `is_` arrives here as `is` once its trailing underscore is stripped.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "eq" => Some(ComparisonOp::Eq),
            "ne" => Some(ComparisonOp::Ne),
            "ge" => Some(ComparisonOp::Ge),
            "gt" => Some(ComparisonOp::Gt),
            "le" => Some(ComparisonOp::Le),
            "lt" => Some(ComparisonOp::Lt),
            "is" => Some(ComparisonOp::Is),
            "is_not" => Some(ComparisonOp::IsNot),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "eq",
            ComparisonOp::Ne => "ne",
            ComparisonOp::Ge => "ge",
            ComparisonOp::Gt => "gt",
            ComparisonOp::Le => "le",
            ComparisonOp::Lt => "lt",
            ComparisonOp::Is => "is",
            ComparisonOp::IsNot => "is_not",
        }
    }

    /// Equality against `null` becomes `IS NULL` / `IS NOT NULL`.
    pub fn build(self, attribute: Expr, val: Value) -> Expr {
        let op = match (self, val.is_null()) {
            (ComparisonOp::Eq, true) | (ComparisonOp::Is, _) => BinaryOperator::Is,
            (ComparisonOp::Ne, true) | (ComparisonOp::IsNot, _) => BinaryOperator::IsNot,
            (ComparisonOp::Eq, false) => BinaryOperator::Eq,
            (ComparisonOp::Ne, false) => BinaryOperator::NotEq,
            (ComparisonOp::Ge, _) => BinaryOperator::GtEq,
            (ComparisonOp::Gt, _) => BinaryOperator::Gt,
            (ComparisonOp::Le, _) => BinaryOperator::LtEq,
            (ComparisonOp::Lt, _) => BinaryOperator::Lt,
        };
        Expr::binary(attribute, op, Expr::Value(val))
    }
}

/// How a compiled predicate reaches the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Narrows the running query as soon as the clause is compiled.
    SetMembership,
    /// Collected and AND-ed into one final narrowing.
    Deferred,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Set(SetOp),
    Pattern(PatternOp),
    Comparison(ComparisonOp),
}

impl Operator {
    /// Resolves a canonical operator name for `attribute`; first group wins.
    /// Pattern operators on attributes without pattern support fall through
    /// to the comparison registry, which does not know them.
    pub fn classify(name: &str, attribute: &AttributeHandle) -> Option<Self> {
        if let Some(op) = SetOp::from_name(name) {
            return Some(Operator::Set(op));
        }
        if attribute.supports_pattern() {
            if let Some(op) = PatternOp::from_name(name) {
                return Some(Operator::Pattern(op));
            }
        }
        ComparisonOp::from_name(name).map(Operator::Comparison)
    }

    pub fn channel(self) -> Channel {
        match self {
            Operator::Set(_) => Channel::SetMembership,
            Operator::Pattern(_) | Operator::Comparison(_) => Channel::Deferred,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operator::Set(op) => op.name(),
            Operator::Pattern(op) => op.name(),
            Operator::Comparison(op) => op.name(),
        }
    }

    pub fn build(self, attribute: &AttributeHandle, val: Value) -> Expr {
        let target = attribute.expr();
        match self {
            Operator::Set(op) => op.build(target, val),
            Operator::Pattern(op) => op.build(target, val),
            Operator::Comparison(op) => op.build(target, val),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner::query::ident;

    fn column() -> AttributeHandle {
        AttributeHandle::column("name", "name")
    }

    fn computed() -> AttributeHandle {
        AttributeHandle::computed("name_lower", Expr::function("lower", vec![ident("name")]))
    }

    #[test]
    fn test_classification_order() {
        assert_eq!(
            Operator::classify("in", &computed()),
            Some(Operator::Set(SetOp::In))
        );
        assert_eq!(
            Operator::classify("ilike", &column()),
            Some(Operator::Pattern(PatternOp::ILike))
        );
        assert_eq!(
            Operator::classify("is_not", &computed()),
            Some(Operator::Comparison(ComparisonOp::IsNot))
        );
    }

    #[test]
    fn test_pattern_requires_column() {
        for name in ["like", "ilike", "match", "notilike"] {
            assert!(Operator::classify(name, &column()).is_some(), "{name}");
            assert_eq!(Operator::classify(name, &computed()), None, "{name}");
        }
    }

    #[test]
    fn test_unknown_names() {
        for name in ["bogus", "", "IN", "eq_", "is_", "contains"] {
            assert_eq!(Operator::classify(name, &column()), None, "{name}");
        }
    }

    #[test]
    fn test_channels() {
        assert_eq!(Operator::Set(SetOp::NotIn).channel(), Channel::SetMembership);
        assert_eq!(Operator::Pattern(PatternOp::Like).channel(), Channel::Deferred);
        assert_eq!(Operator::Comparison(ComparisonOp::Eq).channel(), Channel::Deferred);
    }

    #[test]
    fn test_set_operand_shapes() {
        let built = SetOp::In.build(ident("age"), Value::List(vec![Value::Int(1), Value::Int(2)]));
        assert_eq!(
            built,
            Expr::InList {
                expr: Box::new(ident("age")),
                list: vec![Expr::Value(Value::Int(1)), Expr::Value(Value::Int(2))],
                negated: false,
            }
        );

        let built = SetOp::NotIn.build(ident("age"), Value::Int(7));
        assert_eq!(
            built,
            Expr::InList {
                expr: Box::new(ident("age")),
                list: vec![Expr::Value(Value::Int(7))],
                negated: true,
            }
        );
    }

    #[test]
    fn test_equality_with_null_becomes_is() {
        assert_eq!(
            ComparisonOp::Eq.build(ident("age"), Value::Null),
            Expr::binary(ident("age"), BinaryOperator::Is, Expr::Value(Value::Null))
        );
        assert_eq!(
            ComparisonOp::Ne.build(ident("age"), Value::Null),
            Expr::binary(ident("age"), BinaryOperator::IsNot, Expr::Value(Value::Null))
        );
        assert_eq!(
            ComparisonOp::Ge.build(ident("age"), Value::Int(1)),
            Expr::binary(ident("age"), BinaryOperator::GtEq, Expr::Value(Value::Int(1)))
        );
    }

    #[test]
    fn test_pattern_build() {
        assert_eq!(
            PatternOp::NotILike.build(ident("name"), Value::from("a%")),
            Expr::Like {
                expr: Box::new(ident("name")),
                pattern: Box::new(Expr::Value(Value::from("a%"))),
                case_insensitive: true,
                negated: true,
            }
        );
        assert_eq!(
            PatternOp::Match.build(ident("name"), Value::from("ada")),
            Expr::Match {
                expr: Box::new(ident("name")),
                query: Box::new(Expr::Value(Value::from("ada"))),
            }
        );
        assert!(matches!(
            PatternOp::Like.build(ident("name"), Value::from("a%")),
            Expr::Like { case_insensitive: false, negated: false, .. }
        ));
    }
}
