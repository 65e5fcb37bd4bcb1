use filter::{ValidationError, schema::SchemaError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read input file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to load the entity schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("Rejected filter: {0}")]
    Filter(#[from] ValidationError),

    #[error("Failed to deserialize rows: {0}")]
    RowsDeserialize(#[from] serde_json::Error),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(serde_json::Error),

    #[error("Rows file must hold a JSON array of objects, found: {0}")]
    InvalidRows(String),

    #[error("Unsupported SQL dialect: {0}")]
    UnsupportedDialect(String),
}
