//! Defines the Abstract Syntax Tree (AST) for a SELECT query.

use crate::query::ast::{common::TableRef, expr::Expr};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Select {
    /// The list of columns or expressions to be returned.
    /// An empty list renders as `*`.
    pub columns: Vec<Expr>,

    /// The primary table for the query.
    /// e.g., `FROM users`
    pub from: Option<FromClause>,

    /// The WHERE clause condition. Successive narrowings are AND-ed together.
    pub where_clause: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FromClause {
    pub table: TableRef,
    pub alias: Option<String>,
}
