use crate::query::{
    ast::select::{FromClause, Select},
    renderer::{Render, Renderer},
};

impl Render for Select {
    fn render(&self, r: &mut Renderer) {
        // 1. SELECT clause
        r.sql.push_str("SELECT ");
        if self.columns.is_empty() {
            r.sql.push('*');
        }
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                r.sql.push_str(", ");
            }
            col.render(r);
        }

        // 2. FROM
        if let Some(from) = &self.from {
            r.sql.push(' ');
            from.render(r);
        }

        // 3. WHERE
        if let Some(where_clause) = &self.where_clause {
            r.sql.push_str(" WHERE ");
            where_clause.render(r);
        }
    }
}

impl Render for FromClause {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str("FROM ");
        if let Some(schema) = &self.table.schema {
            r.sql.push_str(&r.dialect.quote_identifier(schema));
            r.sql.push('.');
        }
        r.sql
            .push_str(&r.dialect.quote_identifier(&self.table.name));
        if let Some(alias) = &self.alias {
            r.sql.push_str(" AS ");
            r.sql.push_str(&r.dialect.quote_identifier(alias));
        }
    }
}
