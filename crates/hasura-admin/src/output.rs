use hasura_admin_sdk::Record;
use serde::Serialize;
use serde_json::Value;
use std::io::IsTerminal;
use tabled::builder::Builder;
use tabled::{Table, Tabled};

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Human,
    Json,
}

/// Determine the output format based on the user's choice and terminal detection.
pub fn resolve_format(format: Option<Format>) -> Format {
    match format {
        Some(f) => f,
        None => {
            if std::io::stdout().is_terminal() {
                Format::Human
            } else {
                Format::Json
            }
        }
    }
}

/// Print data in the resolved format.
/// `T` must implement both `Serialize` (for JSON) and `Tabled` (for human output).
pub fn print_table<T: Serialize + Tabled>(items: &[T], format: Format) -> anyhow::Result<()> {
    match format {
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(items)?);
        }
        Format::Human => {
            if items.is_empty() {
                println!("No results.");
                return Ok(());
            }
            println!("{}", Table::new(items));
        }
    }
    Ok(())
}

/// Print a single item. Human mode pretty-prints JSON too; it reads best
/// for detailed views.
pub fn print_one<T: Serialize>(item: &T, _format: Format) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(item)?);
    Ok(())
}

/// Print records. Columns are not known up front, so the human table is
/// built from the union of every record's param names, id first.
pub fn print_records(records: &[Record], format: Format) -> anyhow::Result<()> {
    if format == Format::Json {
        let rows: Vec<_> = records.iter().map(Record::to_json).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    if records.is_empty() {
        println!("No results.");
        return Ok(());
    }

    let mut columns: Vec<&str> = Vec::new();
    for record in records {
        for key in record.params().keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let mut builder = Builder::default();
    let mut header = vec!["id".to_string()];
    header.extend(columns.iter().map(|c| c.to_string()));
    builder.push_record(header);
    for record in records {
        let mut row = vec![record.id().unwrap_or_default()];
        row.extend(columns.iter().map(|c| cell(record.param(c))));
        builder.push_record(row);
    }
    println!("{}", builder.build());
    Ok(())
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
