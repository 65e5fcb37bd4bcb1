//! Entity schemas declared in JSON.
//!
//! A schema names the table an entity lives in, its identity attribute and
//! the attributes clients may filter on. Column attributes map to a table
//! column (by default one with the attribute's name); computed attributes
//! apply a function to columns.

use crate::attribute::{AttributeHandle, AttributeWhitelist};
use planner::{
    query::{
        ast::expr::Expr,
        builder::select::{FromState, SelectBuilder},
        ident,
    },
    table_ref,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to parse entity schema: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown entity: {0}")]
    UnknownEntity(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    pub entities: BTreeMap<String, EntitySchema>,
}

impl SchemaConfig {
    pub fn from_json(source: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn entity(&self, name: &str) -> Result<&EntitySchema, SchemaError> {
        self.entities
            .get(name)
            .ok_or_else(|| SchemaError::UnknownEntity(name.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySchema {
    pub table: String,
    #[serde(default)]
    pub schema: Option<String>,
    /// Column holding the entity's identity.
    #[serde(default = "default_identity")]
    pub identity: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeSpec>,
}

fn default_identity() -> String {
    "id".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AttributeSpec {
    Column {
        #[serde(default)]
        column: Option<String>,
    },
    Computed {
        function: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

impl AttributeSpec {
    fn handle(&self, name: &str) -> AttributeHandle {
        match self {
            AttributeSpec::Column { column } => {
                AttributeHandle::column(name, column.as_deref().unwrap_or(name))
            }
            AttributeSpec::Computed { function, args } => AttributeHandle::computed(
                name,
                Expr::function(function, args.iter().map(|arg| ident(arg)).collect()),
            ),
        }
    }
}

impl EntitySchema {
    pub fn whitelist(&self) -> AttributeWhitelist {
        let identity = AttributeHandle::column(&self.identity, &self.identity);
        self.attributes
            .iter()
            .fold(AttributeWhitelist::new(identity), |whitelist, (name, spec)| {
                whitelist.with_attribute(spec.handle(name))
            })
    }

    /// `SELECT * FROM <table>`, ready to be narrowed.
    pub fn base_query(&self) -> SelectBuilder<FromState> {
        let table = match &self.schema {
            Some(schema) => table_ref!(schema, &self.table),
            None => table_ref!(&self.table),
        };
        SelectBuilder::new().select(vec![]).from(table, None)
    }
}
