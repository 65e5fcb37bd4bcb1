use crate::clause::IDENTITY_KEY;
use planner::query::{ast::expr::Expr, ident};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeKind {
    /// A concrete column; supports pattern matching.
    Column(String),
    /// A derived attribute backed by an expression; comparisons only.
    Computed(Expr),
}

/// What a filterable attribute name resolves to.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeHandle {
    pub name: String,
    pub kind: AttributeKind,
}

impl AttributeHandle {
    pub fn column(name: &str, column: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: AttributeKind::Column(column.to_string()),
        }
    }

    pub fn computed(name: &str, expr: Expr) -> Self {
        Self {
            name: name.to_string(),
            kind: AttributeKind::Computed(expr),
        }
    }

    pub fn supports_pattern(&self) -> bool {
        matches!(self.kind, AttributeKind::Column(_))
    }

    /// The expression predicates on this attribute are built over.
    pub fn expr(&self) -> Expr {
        match &self.kind {
            AttributeKind::Column(column) => ident(column),
            AttributeKind::Computed(expr) => expr.clone(),
        }
    }
}

/// The attributes an entity type permits filtering on, plus its identity.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeWhitelist {
    identity: AttributeHandle,
    attributes: HashMap<String, AttributeHandle>,
}

impl AttributeWhitelist {
    pub fn new(identity: AttributeHandle) -> Self {
        Self {
            identity,
            attributes: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, handle: AttributeHandle) -> Self {
        self.insert(handle);
        self
    }

    pub fn insert(&mut self, handle: AttributeHandle) {
        self.attributes.insert(handle.name.clone(), handle);
    }

    pub fn identity(&self) -> &AttributeHandle {
        &self.identity
    }

    pub fn get(&self, name: &str) -> Option<&AttributeHandle> {
        self.attributes.get(name)
    }

    /// Resolves a clause's attribute name. The identity key always maps to the
    /// identity handle, whether or not the whitelist also lists it.
    pub fn resolve(&self, name: &str) -> Option<&AttributeHandle> {
        if name == IDENTITY_KEY {
            Some(&self.identity)
        } else {
            self.get(name)
        }
    }

    /// Whitelisted attribute names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names = self.attributes.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }
}
