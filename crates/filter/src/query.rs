use planner::query::{
    ast::expr::Expr,
    builder::select::{FromState, SelectBuilder},
};

/// A query that can be restricted step by step.
///
/// Narrowing consumes the query and returns the restricted one, so a caller
/// holding a clone of the base query never observes the restriction.
pub trait Narrow: Sized {
    /// Restricts the query to rows satisfying `predicate`.
    fn narrow(self, predicate: Expr) -> Self;

    /// Restricts the query by the AND of `predicates`; no predicates is a no-op.
    fn narrow_all(self, predicates: Vec<Expr>) -> Self {
        match Expr::conjunction(predicates) {
            Some(conjunction) => self.narrow(conjunction),
            None => self,
        }
    }
}

impl Narrow for SelectBuilder<FromState> {
    fn narrow(self, predicate: Expr) -> Self {
        self.filter(predicate)
    }
}
