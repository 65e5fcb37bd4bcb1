//! Compiles untrusted, JSON-encoded filter requests into query narrowings.
//!
//! A request is a single `{name, op, val}` clause or a list of them. Each
//! clause is checked against an [`AttributeWhitelist`], its operator is
//! resolved through the closed operator registry in [`operator`], and the
//! resulting predicates are applied to any query implementing [`Narrow`].

pub mod attribute;
pub mod clause;
pub mod compiler;
pub mod error;
pub mod operator;
pub mod query;
pub mod schema;

pub use attribute::{AttributeHandle, AttributeKind, AttributeWhitelist};
pub use clause::{FilterClause, FilterRequest, IDENTITY_KEY};
pub use compiler::{CompiledFilter, FilterCompiler, SkippedClause};
pub use error::{ValidationError, ValidationErrorKind};
pub use query::Narrow;

/// Compiles `payload` against `whitelist` and applies it to `base`.
pub fn compile<Q: Narrow>(
    base: Q,
    whitelist: &AttributeWhitelist,
    payload: &str,
) -> Result<CompiledFilter<Q>, ValidationError> {
    FilterCompiler::new(whitelist).compile(base, payload)
}
