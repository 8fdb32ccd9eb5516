use std::io::{self, Write};

use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(data: &Value, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(data)?
            } else {
                serde_json::to_string(data)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => write_table(&mut out, data)?,
    }

    out.flush()?;
    Ok(())
}

/// Writes one `path : value` line per leaf, with keys padded to a common width.
pub fn write_table(out: &mut impl Write, data: &Value) -> Result<(), CliError> {
    let mut rows = Vec::new();
    flatten(String::new(), data, &mut rows);

    let width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    for (key, value) in rows {
        writeln!(out, "{key:<width$} : {value}")?;
    }
    Ok(())
}

fn flatten(prefix: String, value: &Value, rows: &mut Vec<(String, String)>) {
    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_owned()
        } else {
            format!("{prefix}.{key}")
        }
    };

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten(join(key), child, rows);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, child) in items.iter().enumerate() {
                flatten(join(&index.to_string()), child, rows);
            }
        }
        Value::Array(_) => rows.push((prefix, String::from("-"))),
        Value::Null => rows.push((prefix, String::from("-"))),
        Value::String(text) => rows.push((prefix, text.clone())),
        other => rows.push((prefix, other.to_string())),
    }
}
