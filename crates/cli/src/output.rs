use crate::error::CliError;
use filter::{AttributeKind, AttributeWhitelist, SkippedClause};
use model::{core::value::Value, records::row::RowData};
use serde_json::json;

pub fn print_compiled(
    sql: &str,
    params: &[Value],
    skipped: &[SkippedClause],
    as_json: bool,
) -> Result<(), CliError> {
    if as_json {
        let report = json!({
            "sql": sql,
            "params": params.iter().map(Value::to_json).collect::<Vec<_>>(),
            "skipped": skipped
                .iter()
                .map(|s| json!({"index": s.index, "clause": s.clause, "reason": s.reason}))
                .collect::<Vec<_>>(),
        });
        let report = serde_json::to_string_pretty(&report).map_err(CliError::JsonSerialize)?;
        println!("{report}");
        return Ok(());
    }

    println!("{sql}");
    for line in param_lines(params) {
        println!("{line}");
    }
    Ok(())
}

/// One line per bound parameter, labelled by position so the listing reads
/// the same for `$n` and `?` placeholders.
fn param_lines(params: &[Value]) -> Vec<String> {
    params
        .iter()
        .enumerate()
        .map(|(i, param)| format!("  {:<4} {}", format!("{}:", i + 1), param))
        .collect()
}

pub fn print_rows(rows: &[&RowData]) -> Result<(), CliError> {
    let rows = rows.iter().map(|row| row.to_json()).collect::<Vec<_>>();
    let rows = serde_json::to_string_pretty(&rows).map_err(CliError::JsonSerialize)?;
    println!("{rows}");
    Ok(())
}

pub fn print_attributes(entity: &str, whitelist: &AttributeWhitelist) {
    let identity = whitelist.identity();
    println!("Attributes for entity '{entity}':");
    println!("-----------------------------");
    println!("{:<16} identity ({})", "id", describe(&identity.kind));
    for name in whitelist.names() {
        if let Some(handle) = whitelist.get(name) {
            println!("{:<16} {}", name, describe(&handle.kind));
        }
    }
}

fn describe(kind: &AttributeKind) -> String {
    match kind {
        AttributeKind::Column(column) => format!("column {column}"),
        AttributeKind::Computed(_) => "computed, comparisons only".to_string(),
    }
}
