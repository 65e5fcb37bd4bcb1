//! In-memory evaluation of query ASTs against rows.
//!
//! Follows SQL three-valued logic: comparisons involving NULL are unknown
//! (`Value::Null`), and a row passes a `WHERE` clause only when it evaluates
//! to true.

use crate::query::ast::{
    expr::{BinaryOp, BinaryOperator, Expr},
    select::Select,
};
use model::{core::value::Value, records::row::RowData};
use std::cmp::Ordering;
use tracing::warn;

pub trait Evaluator {
    fn evaluate(&self, row: &RowData) -> Value;
}

impl Evaluator for Expr {
    fn evaluate(&self, row: &RowData) -> Value {
        match self {
            Expr::Identifier(ident) => row.get_value(&ident.name),

            Expr::Value(value) => value.clone(),

            Expr::BinaryOp(op) => eval_binary(op, row),

            Expr::FunctionCall(func) => {
                let args = func
                    .args
                    .iter()
                    .map(|arg| arg.evaluate(row))
                    .collect::<Vec<_>>();
                eval_function(&func.name, &args)
            }

            Expr::InList {
                expr,
                list,
                negated,
            } => {
                let needle = expr.evaluate(row);
                let items = list.iter().map(|item| item.evaluate(row)).collect::<Vec<_>>();
                eval_in_list(&needle, &items, *negated)
            }

            Expr::Like {
                expr,
                pattern,
                case_insensitive,
                negated,
            } => {
                let (Some(text), Some(pattern)) = (
                    expr.evaluate(row).as_string(),
                    pattern.evaluate(row).as_string(),
                ) else {
                    return Value::Null;
                };
                let matched = if *case_insensitive {
                    like_match(&text.to_lowercase(), &pattern.to_lowercase())
                } else {
                    like_match(&text, &pattern)
                };
                Value::Boolean(matched != *negated)
            }

            Expr::Match { expr, query } => {
                let (Some(text), Some(query)) =
                    (expr.evaluate(row).as_string(), query.evaluate(row).as_string())
                else {
                    return Value::Null;
                };
                Value::Boolean(text_match(&text, &query))
            }
        }
    }
}

impl Select {
    /// Whether `row` satisfies the `WHERE` clause. No clause matches everything.
    pub fn matches(&self, row: &RowData) -> bool {
        match &self.where_clause {
            Some(condition) => truth(&condition.evaluate(row)) == Some(true),
            None => true,
        }
    }

    /// Returns the rows that satisfy the `WHERE` clause, in input order.
    pub fn apply<'r>(&self, rows: &'r [RowData]) -> Vec<&'r RowData> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }
}

/// Maps a value onto SQL truth: `Some(bool)` or `None` for unknown.
fn truth(value: &Value) -> Option<bool> {
    match value {
        Value::Null => None,
        other => other.as_bool(),
    }
}

fn eval_binary(op: &BinaryOp, row: &RowData) -> Value {
    let left = op.left.evaluate(row);
    let right = op.right.evaluate(row);

    match op.op {
        BinaryOperator::And => match (truth(&left), truth(&right)) {
            (Some(false), _) | (_, Some(false)) => Value::Boolean(false),
            (Some(true), Some(true)) => Value::Boolean(true),
            _ => Value::Null,
        },
        BinaryOperator::Is => Value::Boolean(is_same(&left, &right)),
        BinaryOperator::IsNot => Value::Boolean(!is_same(&left, &right)),
        comparison => {
            if left.is_null() || right.is_null() {
                return Value::Null;
            }
            match left.compare(&right) {
                Some(ordering) => Value::Boolean(ordering_satisfies(comparison, ordering)),
                None => match comparison {
                    BinaryOperator::Eq => Value::Boolean(false),
                    BinaryOperator::NotEq => Value::Boolean(true),
                    _ => Value::Null,
                },
            }
        }
    }
}

fn ordering_satisfies(op: BinaryOperator, ordering: Ordering) -> bool {
    match op {
        BinaryOperator::Eq => ordering == Ordering::Equal,
        BinaryOperator::NotEq => ordering != Ordering::Equal,
        BinaryOperator::Lt => ordering == Ordering::Less,
        BinaryOperator::LtEq => ordering != Ordering::Greater,
        BinaryOperator::Gt => ordering == Ordering::Greater,
        BinaryOperator::GtEq => ordering != Ordering::Less,
        BinaryOperator::Is | BinaryOperator::IsNot | BinaryOperator::And => false,
    }
}

/// Null-safe identity used by `IS` / `IS NOT`.
fn is_same(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (l, r) => l.equal(r),
    }
}

fn eval_in_list(needle: &Value, items: &[Value], negated: bool) -> Value {
    if items.is_empty() {
        return Value::Boolean(negated);
    }
    if needle.is_null() {
        return Value::Null;
    }

    let mut saw_null = false;
    for item in items {
        if item.is_null() {
            saw_null = true;
        } else if needle.equal(item) {
            return Value::Boolean(!negated);
        }
    }

    if saw_null {
        Value::Null
    } else {
        Value::Boolean(negated)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LikeToken {
    AnyRun,
    AnyOne,
    Literal(char),
}

/// Splits a `LIKE` pattern into tokens. A backslash makes the next
/// character literal; a trailing backslash matches itself.
fn like_tokens(pattern: &str) -> Vec<LikeToken> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '\\' => LikeToken::Literal(chars.next().unwrap_or('\\')),
            '%' => LikeToken::AnyRun,
            '_' => LikeToken::AnyOne,
            other => LikeToken::Literal(other),
        });
    }
    tokens
}

/// SQL `LIKE` matching: `%` matches any run of characters, `_` exactly one,
/// and `\` escapes either.
fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern = like_tokens(pattern);

    let (mut t, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some(LikeToken::AnyRun) => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(LikeToken::AnyOne) => {
                t += 1;
                p += 1;
            }
            Some(LikeToken::Literal(c)) if *c == text[t] => {
                t += 1;
                p += 1;
            }
            _ => match backtrack {
                Some((run_p, run_t)) => {
                    p = run_p + 1;
                    t = run_t + 1;
                    backtrack = Some((run_p, run_t + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|token| *token == LikeToken::AnyRun)
}

/// Full-text match approximation: every search term appears as a word.
fn text_match(text: &str, query: &str) -> bool {
    let words = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>();

    let mut terms = query.split_whitespace().map(str::to_lowercase).peekable();
    if terms.peek().is_none() {
        return false;
    }
    terms.all(|term| words.contains(&term))
}

fn eval_function(name: &str, args: &[Value]) -> Value {
    match name.to_ascii_lowercase().as_str() {
        "lower" => match args.first() {
            Some(Value::String(s)) => Value::String(s.to_lowercase()),
            _ => Value::Null,
        },
        "upper" => match args.first() {
            Some(Value::String(s)) => Value::String(s.to_uppercase()),
            _ => Value::Null,
        },
        "length" => match args.first() {
            Some(Value::String(s)) => Value::Int(s.chars().count() as i64),
            _ => Value::Null,
        },
        "concat" => {
            let concatenated = args
                .iter()
                .filter_map(Value::as_string)
                .collect::<Vec<_>>()
                .join("");
            Value::String(concatenated)
        }
        _ => {
            warn!("Unsupported function: {}", name);
            Value::Null
        }
    }
}
