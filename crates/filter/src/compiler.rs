use crate::{
    attribute::AttributeWhitelist,
    clause::{FilterClause, FilterRequest},
    error::ValidationError,
    operator::{Channel, Operator},
    query::Narrow,
};
use model::core::value::Value;
use serde_json::Value as JsonValue;
use std::fmt;
use tracing::{debug, warn};

/// A request element that was not a clause and was left out of the filter.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedClause {
    /// Position of the element in the request.
    pub index: usize,
    pub clause: JsonValue,
    pub reason: String,
}

impl fmt::Display for SkippedClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid filter '{}' at position {}: {}",
            self.clause, self.index, self.reason
        )
    }
}

/// The result of a successful compilation.
#[derive(Debug, Clone)]
pub struct CompiledFilter<Q> {
    pub query: Q,
    pub skipped: Vec<SkippedClause>,
}

impl<Q> CompiledFilter<Q> {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Compiles filter payloads against one entity's whitelist.
///
/// The compiler keeps nothing between calls; one instance can serve any
/// number of requests, from any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct FilterCompiler<'a> {
    whitelist: &'a AttributeWhitelist,
}

impl<'a> FilterCompiler<'a> {
    pub fn new(whitelist: &'a AttributeWhitelist) -> Self {
        Self { whitelist }
    }

    /// Narrows `base` by every clause of `payload`.
    ///
    /// Set-membership clauses narrow the query as they are met. All other
    /// predicates are collected and applied as one conjunction at the end.
    /// Any error aborts the compilation and `base` is dropped unnarrowed.
    pub fn compile<Q: Narrow>(
        &self,
        base: Q,
        payload: &str,
    ) -> Result<CompiledFilter<Q>, ValidationError> {
        let request = FilterRequest::decode(payload)?;

        let mut query = base;
        let mut deferred = Vec::new();
        let mut skipped = Vec::new();

        for (index, element) in request.elements.into_iter().enumerate() {
            let clause = match FilterClause::try_from(element) {
                Ok(clause) => clause,
                Err(element) => {
                    warn!("Invalid filter '{}': not a JSON object, skipping", element);
                    skipped.push(SkippedClause {
                        index,
                        clause: element,
                        reason: "not a JSON object".to_string(),
                    });
                    continue;
                }
            };

            let attribute = clause
                .name
                .as_deref()
                .and_then(|name| self.whitelist.resolve(name))
                .ok_or_else(|| ValidationError::UnknownAttribute {
                    attribute: clause.display_name(),
                    clause: clause.source().to_string(),
                })?;

            let operator = Operator::classify(clause.canonical_op(), attribute).ok_or_else(
                || ValidationError::UnknownOperator {
                    operator: clause.canonical_op().to_string(),
                    clause: clause.source().to_string(),
                },
            )?;

            debug!(
                "Filter on '{}' with '{}' via {:?}",
                attribute.name,
                operator,
                operator.channel()
            );

            let predicate = operator.build(attribute, Value::from(clause.val));
            match operator.channel() {
                Channel::SetMembership => query = query.narrow(predicate),
                Channel::Deferred => deferred.push(predicate),
            }
        }

        Ok(CompiledFilter {
            query: query.narrow_all(deferred),
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{attribute::AttributeHandle, error::ValidationErrorKind};
    use planner::query::{
        ast::expr::{BinaryOperator, Expr},
        ident,
    };
    use serde_json::json;
    use tracing_test::traced_test;

    /// Records every narrowing so tests can see which channel was used.
    #[derive(Debug, Default, Clone)]
    struct Recorder {
        narrowings: Vec<Expr>,
    }

    impl Narrow for Recorder {
        fn narrow(mut self, predicate: Expr) -> Self {
            self.narrowings.push(predicate);
            self
        }
    }

    fn whitelist() -> AttributeWhitelist {
        AttributeWhitelist::new(AttributeHandle::column("id", "id"))
            .with_attribute(AttributeHandle::column("name", "name"))
            .with_attribute(AttributeHandle::column("age", "age"))
            .with_attribute(AttributeHandle::computed(
                "name_lower",
                Expr::function("lower", vec![ident("name")]),
            ))
    }

    fn compile(payload: &str) -> Result<CompiledFilter<Recorder>, ValidationError> {
        let whitelist = whitelist();
        FilterCompiler::new(&whitelist).compile(Recorder::default(), payload)
    }

    #[test]
    fn test_set_membership_narrows_immediately() {
        let compiled =
            compile(r#"[{"name":"age","op":"in","val":[1,2,3]},{"name":"id","op":"notin","val":[]}]"#)
                .unwrap();

        assert_eq!(compiled.query.narrowings.len(), 2);
        assert!(matches!(
            &compiled.query.narrowings[0],
            Expr::InList { negated: false, list, .. } if list.len() == 3
        ));
        assert!(matches!(
            &compiled.query.narrowings[1],
            Expr::InList { negated: true, list, .. } if list.is_empty()
        ));
    }

    #[test]
    fn test_deferred_clauses_narrow_once() {
        let compiled = compile(
            r#"[{"name":"age","op":"ge","val":18},{"name":"name","op":"like","val":"a%"},{"name":"age","op":"lt","val":65}]"#,
        )
        .unwrap();

        assert_eq!(compiled.query.narrowings.len(), 1);
        let Expr::BinaryOp(outer) = &compiled.query.narrowings[0] else {
            panic!("expected a conjunction");
        };
        assert_eq!(outer.op, BinaryOperator::And);
    }

    #[test]
    fn test_set_membership_precedes_deferred() {
        let compiled = compile(
            r#"[{"name":"age","op":"gt","val":1},{"name":"id","op":"in","val":[4]}]"#,
        )
        .unwrap();

        assert_eq!(compiled.query.narrowings.len(), 2);
        assert!(matches!(compiled.query.narrowings[0], Expr::InList { .. }));
        assert!(matches!(compiled.query.narrowings[1], Expr::BinaryOp(_)));
    }

    #[test]
    fn test_underscores_are_stripped() {
        let plain = compile(r#"{"name":"age","op":"eq","val":3}"#).unwrap();
        for op in ["_eq_", "__eq__", "eq_", "_eq"] {
            let payload = json!({"name": "age", "op": op, "val": 3}).to_string();
            assert_eq!(compile(&payload).unwrap().query.narrowings, plain.query.narrowings);
        }

        let is = compile(r#"{"name":"age","op":"is_","val":null}"#).unwrap();
        assert_eq!(
            is.query.narrowings,
            vec![Expr::binary(ident("age"), BinaryOperator::Is, Expr::Value(Value::Null))]
        );
    }

    #[test]
    fn test_empty_request_leaves_query_alone() {
        let compiled = compile("[]").unwrap();
        assert!(compiled.query.narrowings.is_empty());
        assert!(compiled.is_complete());
    }

    #[test]
    fn test_unknown_attribute_is_fatal() {
        let err = compile(r#"[{"name":"age","op":"eq","val":1},{"name":"password","op":"eq","val":"x"}]"#)
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownAttribute {
                attribute: "password".to_string(),
                clause: json!({"name":"password","op":"eq","val":"x"}).to_string(),
            }
        );

        let err = compile(r#"{"op":"eq","val":1}"#).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::UnknownAttribute);
        assert!(err.to_string().ends_with(r#"unknown attribute "null""#));
    }

    #[test]
    fn test_unknown_operator_is_fatal() {
        let err = compile(r#"{"name":"age","op":"_bogus_","val":1}"#).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownOperator {
                operator: "bogus".to_string(),
                clause: json!({"name":"age","op":"_bogus_","val":1}).to_string(),
            }
        );
    }

    #[test]
    fn test_pattern_on_computed_attribute_is_rejected() {
        let err = compile(r#"{"name":"name_lower","op":"ilike","val":"a%"}"#).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::UnknownOperator);

        let ok = compile(r#"{"name":"name_lower","op":"eq","val":"ada"}"#).unwrap();
        assert_eq!(ok.query.narrowings.len(), 1);
    }

    #[test]
    fn test_malformed_payload() {
        let err = compile("{not json").unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::MalformedPayload);
    }

    #[traced_test]
    #[test]
    fn test_non_object_elements_are_skipped() {
        let compiled = compile(r#"[{"name":"age","op":"eq","val":3}, "garbage"]"#).unwrap();

        assert_eq!(compiled.query.narrowings.len(), 1);
        assert_eq!(
            compiled.skipped,
            vec![SkippedClause {
                index: 1,
                clause: json!("garbage"),
                reason: "not a JSON object".to_string(),
            }]
        );
        assert!(!compiled.is_complete());
        assert!(logs_contain("Invalid filter '\"garbage\"'"));
    }

    #[test]
    fn test_compiler_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FilterCompiler<'static>>();
    }
}
