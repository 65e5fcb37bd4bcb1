use crate::query::{
    ast::expr::{BinaryOp, BinaryOperator, Expr, FunctionCall, Ident},
    dialect::{CaseInsensitiveLike, MatchSyntax, NullSafeEqual},
    renderer::{Render, Renderer},
};
use model::core::value::Value;

impl Render for Expr {
    fn render(&self, r: &mut Renderer) {
        match self {
            Expr::Identifier(ident) => ident.render(r),
            Expr::Value(val) => r.add_param(val.clone()),
            Expr::BinaryOp(op) => op.render(r),
            Expr::FunctionCall(func) => func.render(r),
            Expr::InList {
                expr,
                list,
                negated,
            } => render_in_list(r, expr, list, *negated),
            Expr::Like {
                expr,
                pattern,
                case_insensitive,
                negated,
            } => render_like(r, expr, pattern, *case_insensitive, *negated),
            Expr::Match { expr, query } => render_match(r, expr, query),
        }
    }
}

impl Render for Ident {
    fn render(&self, r: &mut Renderer) {
        if let Some(qualifier) = &self.qualifier {
            r.sql.push_str(&r.dialect.quote_identifier(qualifier));
            r.sql.push('.');
        }
        r.sql.push_str(&r.dialect.quote_identifier(&self.name));
    }
}

impl Render for BinaryOp {
    fn render(&self, r: &mut Renderer) {
        if matches!(self.op, BinaryOperator::Is | BinaryOperator::IsNot) {
            render_is(r, self);
            return;
        }

        r.sql.push('(');
        self.left.render(r);

        let op_str = match self.op {
            BinaryOperator::Eq => " = ",
            BinaryOperator::NotEq => " <> ",
            BinaryOperator::Lt => " < ",
            BinaryOperator::LtEq => " <= ",
            BinaryOperator::Gt => " > ",
            BinaryOperator::GtEq => " >= ",
            BinaryOperator::And => " AND ",
            BinaryOperator::Is | BinaryOperator::IsNot => unreachable!(),
        };
        r.sql.push_str(op_str);

        self.right.render(r);
        r.sql.push(')');
    }
}

impl Render for FunctionCall {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str(&self.name);
        r.sql.push('(');
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                r.sql.push_str(", ");
            }
            arg.render(r);
        }
        r.sql.push(')');
    }
}

/// `IS` only accepts keywords on the right in standard SQL, so NULL and
/// booleans are inlined and anything else goes through the null-safe equality.
fn render_is(r: &mut Renderer, op: &BinaryOp) {
    let negated = op.op == BinaryOperator::IsNot;
    let keyword = match &op.right {
        Expr::Value(Value::Null) => Some("NULL"),
        Expr::Value(Value::Boolean(true)) => Some("TRUE"),
        Expr::Value(Value::Boolean(false)) => Some("FALSE"),
        _ => None,
    };

    if let Some(keyword) = keyword {
        r.sql.push('(');
        op.left.render(r);
        r.sql.push_str(if negated { " IS NOT " } else { " IS " });
        r.sql.push_str(keyword);
        r.sql.push(')');
        return;
    }

    match r.dialect.null_safe_equal() {
        NullSafeEqual::DistinctFrom => {
            r.sql.push('(');
            op.left.render(r);
            r.sql.push_str(if negated {
                " IS DISTINCT FROM "
            } else {
                " IS NOT DISTINCT FROM "
            });
            op.right.render(r);
            r.sql.push(')');
        }
        NullSafeEqual::Spaceship => {
            if negated {
                r.sql.push_str("NOT ");
            }
            r.sql.push('(');
            op.left.render(r);
            r.sql.push_str(" <=> ");
            op.right.render(r);
            r.sql.push(')');
        }
    }
}

fn render_in_list(r: &mut Renderer, expr: &Expr, list: &[Expr], negated: bool) {
    // `IN ()` is not valid SQL; an empty set never contains anything.
    if list.is_empty() {
        r.sql.push_str(if negated { "TRUE" } else { "FALSE" });
        return;
    }

    r.sql.push('(');
    expr.render(r);
    r.sql.push_str(if negated { " NOT IN (" } else { " IN (" });
    for (i, item) in list.iter().enumerate() {
        if i > 0 {
            r.sql.push_str(", ");
        }
        item.render(r);
    }
    r.sql.push_str("))");
}

fn render_like(
    r: &mut Renderer,
    expr: &Expr,
    pattern: &Expr,
    case_insensitive: bool,
    negated: bool,
) {
    let not = if negated { "NOT " } else { "" };
    r.sql.push('(');

    if !case_insensitive {
        expr.render(r);
        r.sql.push_str(&format!(" {not}LIKE "));
        pattern.render(r);
    } else {
        match r.dialect.case_insensitive_like() {
            CaseInsensitiveLike::ILike => {
                expr.render(r);
                r.sql.push_str(&format!(" {not}ILIKE "));
                pattern.render(r);
            }
            CaseInsensitiveLike::LowerBoth => {
                r.sql.push_str("lower(");
                expr.render(r);
                r.sql.push_str(&format!(") {not}LIKE lower("));
                pattern.render(r);
                r.sql.push(')');
            }
        }
    }

    r.sql.push(')');
}

fn render_match(r: &mut Renderer, expr: &Expr, query: &Expr) {
    match r.dialect.match_syntax() {
        MatchSyntax::TsQuery => {
            r.sql.push_str("(to_tsvector(");
            expr.render(r);
            r.sql.push_str(") @@ plainto_tsquery(");
            query.render(r);
            r.sql.push_str("))");
        }
        MatchSyntax::MatchAgainst => {
            r.sql.push_str("MATCH (");
            expr.render(r);
            r.sql.push_str(") AGAINST (");
            query.render(r);
            r.sql.push_str(" IN BOOLEAN MODE)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{
        dialect::{MySql, Postgres},
        ident,
        renderer::render,
    };

    fn like(pattern: &str, case_insensitive: bool, negated: bool) -> Expr {
        Expr::Like {
            expr: Box::new(ident("name")),
            pattern: Box::new(Expr::Value(Value::from(pattern))),
            case_insensitive,
            negated,
        }
    }

    #[test]
    fn test_is_null_is_inlined() {
        let expr = Expr::binary(ident("deleted_at"), BinaryOperator::Is, Expr::Value(Value::Null));
        let (sql, params) = render(&expr, &Postgres);
        assert_eq!(sql, r#"("deleted_at" IS NULL)"#);
        assert!(params.is_empty());

        let expr = Expr::binary(
            ident("active"),
            BinaryOperator::IsNot,
            Expr::Value(Value::Boolean(false)),
        );
        let (sql, _) = render(&expr, &MySql);
        assert_eq!(sql, "(`active` IS NOT FALSE)");
    }

    #[test]
    fn test_is_with_bound_value_uses_null_safe_equality() {
        let is = Expr::binary(ident("age"), BinaryOperator::Is, Expr::Value(Value::Int(3)));
        let is_not = Expr::binary(ident("age"), BinaryOperator::IsNot, Expr::Value(Value::Int(3)));

        assert_eq!(
            render(&is, &Postgres).0,
            r#"("age" IS NOT DISTINCT FROM $1)"#
        );
        assert_eq!(render(&is_not, &Postgres).0, r#"("age" IS DISTINCT FROM $1)"#);
        assert_eq!(render(&is, &MySql).0, "(`age` <=> ?)");
        assert_eq!(render(&is_not, &MySql).0, "NOT (`age` <=> ?)");
    }

    #[test]
    fn test_in_list() {
        let expr = Expr::InList {
            expr: Box::new(ident("age")),
            list: vec![Expr::Value(Value::Int(1)), Expr::Value(Value::Int(2))],
            negated: true,
        };
        let (sql, params) = render(&expr, &MySql);
        assert_eq!(sql, "(`age` NOT IN (?, ?))");
        assert_eq!(params, vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn test_empty_in_list_is_constant() {
        let in_empty = Expr::InList {
            expr: Box::new(ident("age")),
            list: vec![],
            negated: false,
        };
        let not_in_empty = Expr::InList {
            expr: Box::new(ident("age")),
            list: vec![],
            negated: true,
        };
        assert_eq!(render(&in_empty, &Postgres).0, "FALSE");
        assert_eq!(render(&not_in_empty, &Postgres).0, "TRUE");
    }

    #[test]
    fn test_like_variants_postgres() {
        assert_eq!(render(&like("a%", false, false), &Postgres).0, r#"("name" LIKE $1)"#);
        assert_eq!(render(&like("a%", true, false), &Postgres).0, r#"("name" ILIKE $1)"#);
        assert_eq!(
            render(&like("a%", true, true), &Postgres).0,
            r#"("name" NOT ILIKE $1)"#
        );
    }

    #[test]
    fn test_case_insensitive_like_mysql_lowers_both_sides() {
        assert_eq!(
            render(&like("a%", true, true), &MySql).0,
            "(lower(`name`) NOT LIKE lower(?))"
        );
    }

    #[test]
    fn test_match() {
        let expr = Expr::Match {
            expr: Box::new(ident("bio")),
            query: Box::new(Expr::Value(Value::from("rust"))),
        };
        assert_eq!(
            render(&expr, &Postgres).0,
            r#"(to_tsvector("bio") @@ plainto_tsquery($1))"#
        );
        assert_eq!(
            render(&expr, &MySql).0,
            "MATCH (`bio`) AGAINST (? IN BOOLEAN MODE)"
        );
    }

    #[test]
    fn test_function_call() {
        let expr = Expr::function("lower", vec![ident("name")]);
        assert_eq!(render(&expr, &Postgres).0, r#"lower("name")"#);
    }
}
