//! Output rendering for the CLI
//!
//! Rows arrive as JSON objects (whatever the backend sent) and are printed
//! as an aligned table, pretty JSON or CSV.

use serde_json::Value;
use std::fmt::Write as _;

/// Widest a table cell may get before it is cut
const MAX_CELL_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output was not UTF-8")]
    Utf8,
}

/// Column names, skipping nested objects and arrays.
///
/// Within a row keys come in serde_json's map order (sorted); keys that only
/// appear in later rows are appended after the ones already seen.
pub fn columns(rows: &[Value]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        if let Value::Object(map) = row {
            for (key, value) in map {
                if !matches!(value, Value::Object(_) | Value::Array(_))
                    && !columns.iter().any(|c| c == key)
                {
                    columns.push(key.clone());
                }
            }
        }
    }
    columns
}

/// Plain text for one cell; null and missing render empty
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub fn render_rows(rows: &[Value], format: OutputFormat) -> Result<String, OutputError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        OutputFormat::Csv => render_csv(rows),
        OutputFormat::Table => Ok(render_table(rows)),
    }
}

/// Render a single record; tables show one aligned `key  value` line per field
pub fn render_record(record: &Value, format: OutputFormat) -> Result<String, OutputError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => render_csv(std::slice::from_ref(record)),
        OutputFormat::Table => {
            let mut out = String::new();
            if let Value::Object(map) = record {
                let width = map.keys().map(String::len).max().unwrap_or(0);
                for (key, value) in map {
                    let text = match value {
                        Value::Object(_) | Value::Array(_) => value.to_string(),
                        other => cell_text(Some(other)),
                    };
                    let text = if text.is_empty() { "-".to_string() } else { text };
                    let _ = writeln!(out, "{:<width$}  {}", key, text, width = width);
                }
            }
            Ok(out)
        }
    }
}

fn render_csv(rows: &[Value]) -> Result<String, OutputError> {
    let columns = columns(rows);
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&columns)?;
    for row in rows {
        writer.write_record(columns.iter().map(|c| cell_text(row.get(c))))?;
    }
    let bytes = writer.into_inner().map_err(|e| OutputError::Csv(e.into_error().into()))?;
    String::from_utf8(bytes).map_err(|_| OutputError::Utf8)
}

fn render_table(rows: &[Value]) -> String {
    if rows.is_empty() {
        return "No rows\n".to_string();
    }

    let columns = columns(rows);
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| truncate(&cell_text(row.get(c))))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(c.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:<w$}", c, w = w))
        .collect();
    let _ = writeln!(out, "{}", header.join(" | ").trim_end());
    let _ = writeln!(out, "{}", "-".repeat(widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1)));

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", c, w = w))
            .collect();
        let _ = writeln!(out, "{}", line.join(" | ").trim_end());
    }
    out
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows() -> Vec<Value> {
        vec![
            json!({"id": 1, "companyName": "Acme, Inc.", "city": null, "locations": []}),
            json!({"id": 2, "companyName": "Corner Market", "zipCode": "02118"}),
        ]
    }

    #[test]
    fn test_columns_skip_nested_values() {
        let cols = columns(&rows());
        assert!(cols.contains(&"companyName".to_string()));
        assert!(cols.contains(&"zipCode".to_string()));
        assert!(!cols.contains(&"locations".to_string()));
        assert_eq!(cols.len(), 4);
    }

    #[test]
    fn test_columns_sorted_per_row_then_appended() {
        let rows = vec![json!({"zip": "1", "city": "Austin"}), json!({"id": 3, "city": "Boston"})];
        assert_eq!(columns(&rows), vec!["city", "zip", "id"]);
    }

    #[test]
    fn test_csv_quotes_and_blanks() {
        let out = render_rows(&rows(), OutputFormat::Csv).unwrap();
        let header = out.lines().next().unwrap();
        assert_eq!(header, "city,companyName,id,zipCode");
        assert!(out.contains("\"Acme, Inc.\""));
        assert_eq!(out.lines().count(), 3);
    }

    #[test]
    fn test_table_aligns_columns() {
        let out = render_rows(&rows(), OutputFormat::Table).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].chars().all(|c| c == '-'));
        assert!(lines[3].contains("Corner Market"));
        assert_eq!(render_rows(&[], OutputFormat::Table).unwrap(), "No rows\n");
    }

    #[test]
    fn test_record_table_uses_dash_for_blank() {
        let out = render_record(&json!({"id": 5, "notes": null}), OutputFormat::Table).unwrap();
        assert!(out.contains("notes  -"));
        assert!(out.contains("id     5"));
    }

    #[test]
    fn test_truncate_long_cells() {
        let long = "x".repeat(60);
        assert_eq!(truncate(&long).chars().count(), MAX_CELL_WIDTH);
        assert_eq!(truncate("short"), "short");
    }
}
