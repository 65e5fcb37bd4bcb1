use crate::error::CliError;
use clap::Parser;
use commands::Commands;
use filter::schema::{EntitySchema, SchemaConfig};
use model::records::row::RowData;
use planner::query::{dialect, renderer::render};
use serde_json::Value as JsonValue;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

#[derive(Parser)]
#[command(
    name = "filterc",
    version = "0.0.1",
    about = "Compile JSON filter requests into queries"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<(), CliError> {
    // Initialize logger; stdout is reserved for results
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            schema,
            entity,
            filter: payload,
            dialect: dialect_name,
            json,
        } => {
            let dialect = dialect::from_name(&dialect_name)
                .ok_or(CliError::UnsupportedDialect(dialect_name))?;
            let config = load_schema(&schema)?;
            let entity = config.entity(&entity)?;

            let compiled = filter::compile(entity.base_query(), &entity.whitelist(), &payload)?;
            report_skipped(&compiled.skipped);

            info!("Rendering for {}", dialect.name());
            let (sql, params) = render(&compiled.query.build(), dialect.as_ref());
            output::print_compiled(&sql, &params, &compiled.skipped, json)?;
        }
        Commands::Apply {
            schema,
            entity,
            filter: payload,
            rows,
        } => {
            let config = load_schema(&schema)?;
            let entity_schema = config.entity(&entity)?;
            let rows = load_rows(&rows, &entity)?;

            let compiled =
                filter::compile(entity_schema.base_query(), &entity_schema.whitelist(), &payload)?;
            report_skipped(&compiled.skipped);

            let select = compiled.query.build();
            let matched = select.apply(&rows);
            info!("{} of {} rows matched", matched.len(), rows.len());
            output::print_rows(&matched)?;
        }
        Commands::Attributes { schema, entity } => {
            let config = load_schema(&schema)?;
            let whitelist = config.entity(&entity).map(EntitySchema::whitelist)?;
            output::print_attributes(&entity, &whitelist);
        }
    }

    Ok(())
}

fn load_schema(path: &str) -> Result<SchemaConfig, CliError> {
    let source = std::fs::read_to_string(path)?;
    let config = SchemaConfig::from_json(&source)?;
    info!("Loaded {} entity schema(s) from {}", config.entities.len(), path);
    Ok(config)
}

fn load_rows(path: &str, entity: &str) -> Result<Vec<RowData>, CliError> {
    let source = std::fs::read_to_string(path)?;
    parse_rows(&source, entity)
}

fn parse_rows(source: &str, entity: &str) -> Result<Vec<RowData>, CliError> {
    let JsonValue::Array(items) = serde_json::from_str(source)? else {
        return Err(CliError::InvalidRows("a non-array document".to_string()));
    };

    items
        .into_iter()
        .map(|item| match item {
            JsonValue::Object(object) => Ok(RowData::from_json(entity, object)),
            other => Err(CliError::InvalidRows(other.to_string())),
        })
        .collect()
}

fn report_skipped(skipped: &[filter::SkippedClause]) {
    if !skipped.is_empty() {
        info!("{} filter element(s) were skipped", skipped.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::core::value::Value;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_rows() {
        let rows = parse_rows(r#"[{"id": 1, "name": "ada"}, {"id": 2}]"#, "users").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].entity, "users");
        assert_eq!(rows[0].get_value("name"), Value::from("ada"));
        assert_eq!(rows[1].get_value("name"), Value::Null);
    }

    #[test]
    fn test_rows_must_be_an_array() {
        let err = parse_rows(r#"{"id": 1}"#, "users").unwrap_err();
        assert!(matches!(err, CliError::InvalidRows(found) if found == "a non-array document"));
    }

    #[test]
    fn test_rows_must_be_objects() {
        let err = parse_rows(r#"[{"id": 1}, 7]"#, "users").unwrap_err();
        assert!(matches!(err, CliError::InvalidRows(found) if found == "7"));
    }

    #[test]
    fn test_rows_must_be_json() {
        let err = parse_rows("[{", "users").unwrap_err();
        assert!(matches!(err, CliError::RowsDeserialize(_)));
    }

    #[test]
    fn test_load_rows_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": 3}}]"#).unwrap();

        let rows = load_rows(file.path().to_str().unwrap(), "users").unwrap();
        assert_eq!(rows[0].get_value("id"), Value::Int(3));

        let err = load_rows("/nonexistent/rows.json", "users").unwrap_err();
        assert!(matches!(err, CliError::FileRead(_)));
    }
}
