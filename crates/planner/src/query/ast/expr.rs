//! Defines the AST for SQL expressions.

use model::core::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A column or table identifier, e.g., `users` or `users.id`.
    Identifier(Ident),

    /// A literal value, such as a string, number, boolean, or NULL.
    Value(Value),

    /// A binary operation, e.g., `column = 'value'` or `a AND b`.
    BinaryOp(Box<BinaryOp>),

    /// A function call, e.g., `lower(name)`.
    FunctionCall(FunctionCall),

    /// `expr [NOT] IN (list...)`
    InList {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },

    /// `expr [NOT] LIKE pattern`, or its case-insensitive form.
    Like {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        case_insensitive: bool,
        negated: bool,
    },

    /// Full-text match of `expr` against a search string.
    Match { expr: Box<Expr>, query: Box<Expr> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub qualifier: Option<String>, // e.g., the 'users' in 'users.id'
    pub name: String,              // e.g., the 'id' in 'users.id'
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp {
    pub left: Expr,
    pub op: BinaryOperator,
    pub right: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Comparison
    Eq,    // =
    NotEq, // <>
    Lt,    // <
    LtEq,  // <=
    Gt,    // >
    GtEq,  // >=
    Is,    // IS
    IsNot, // IS NOT

    // Logical
    And,
}

impl Expr {
    pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Self {
        Expr::BinaryOp(Box::new(BinaryOp { left, op, right }))
    }

    pub fn and(self, other: Expr) -> Self {
        Expr::binary(self, BinaryOperator::And, other)
    }

    /// Folds the predicates into a left-deep AND chain.
    /// Returns `None` for an empty input, the identity of AND.
    pub fn conjunction(predicates: impl IntoIterator<Item = Expr>) -> Option<Expr> {
        predicates.into_iter().reduce(Expr::and)
    }

    pub fn function(name: &str, args: Vec<Expr>) -> Self {
        Expr::FunctionCall(FunctionCall {
            name: name.to_string(),
            args,
        })
    }
}
