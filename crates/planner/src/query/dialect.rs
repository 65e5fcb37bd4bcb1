//! Defines the `Dialect` trait for database-specific SQL syntax.

/// How a dialect spells a case-insensitive `LIKE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseInsensitiveLike {
    /// `a ILIKE b`
    ILike,
    /// `lower(a) LIKE lower(b)`
    LowerBoth,
}

/// How a dialect spells a full-text match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSyntax {
    /// `to_tsvector(a) @@ plainto_tsquery(b)`
    TsQuery,
    /// `MATCH (a) AGAINST (b IN BOOLEAN MODE)`
    MatchAgainst,
}

/// How a dialect spells `IS` against a bound, non-NULL parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullSafeEqual {
    /// `a IS NOT DISTINCT FROM b`
    DistinctFrom,
    /// `a <=> b`
    Spaceship,
}

pub trait Dialect: Send + Sync {
    /// Wraps an identifier (like a table or column name) in the correct
    /// quotation marks for the dialect.
    ///
    /// - PostgreSQL uses double quotes: `"my_column"`
    /// - MySQL uses backticks: `` `my_column` ``
    fn quote_identifier(&self, ident: &str) -> String;

    /// Returns the placeholder for a parameterized query.
    ///
    /// - PostgreSQL uses `$1`, `$2`, etc.
    /// - MySQL uses `?`
    fn get_placeholder(&self, index: usize) -> String;

    /// Returns the name of the dialect (e.g., "PostgreSQL", "MySQL").
    fn name(&self) -> String;

    fn case_insensitive_like(&self) -> CaseInsensitiveLike;

    fn match_syntax(&self) -> MatchSyntax;

    fn null_safe_equal(&self) -> NullSafeEqual;
}

#[derive(Debug, Clone)]
pub struct Postgres;

impl Dialect for Postgres {
    fn quote_identifier(&self, ident: &str) -> String {
        format!(r#""{}""#, ident.replace('"', "\"\""))
    }

    fn get_placeholder(&self, index: usize) -> String {
        // PostgreSQL uses $1, $2, etc.
        format!("${}", index + 1)
    }

    fn name(&self) -> String {
        "PostgreSQL".into()
    }

    fn case_insensitive_like(&self) -> CaseInsensitiveLike {
        CaseInsensitiveLike::ILike
    }

    fn match_syntax(&self) -> MatchSyntax {
        MatchSyntax::TsQuery
    }

    fn null_safe_equal(&self) -> NullSafeEqual {
        NullSafeEqual::DistinctFrom
    }
}

#[derive(Debug, Clone)]
pub struct MySql;

impl Dialect for MySql {
    fn quote_identifier(&self, ident: &str) -> String {
        format!("`{}`", ident.replace('`', "``"))
    }

    fn get_placeholder(&self, _index: usize) -> String {
        // MySQL uses ?
        "?".into()
    }

    fn name(&self) -> String {
        "MySQL".into()
    }

    fn case_insensitive_like(&self) -> CaseInsensitiveLike {
        CaseInsensitiveLike::LowerBoth
    }

    fn match_syntax(&self) -> MatchSyntax {
        MatchSyntax::MatchAgainst
    }

    fn null_safe_equal(&self) -> NullSafeEqual {
        NullSafeEqual::Spaceship
    }
}

/// Looks a dialect up by its common short names.
pub fn from_name(name: &str) -> Option<Box<dyn Dialect>> {
    match name.to_ascii_lowercase().as_str() {
        "postgres" | "postgresql" | "pg" => Some(Box::new(Postgres)),
        "mysql" => Some(Box::new(MySql)),
        _ => None,
    }
}
