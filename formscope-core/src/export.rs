//! Response export.
//!
//! Builds tabular rows from a form schema plus its submissions, for CSV and
//! JSON downloads. Columns follow the schema's field order and values are
//! read through the same key resolution the analytics use, so legacy
//! submissions land in the right columns.

use crate::analytics::resolver;
use crate::config::ExportConfig;
use crate::types::{FieldValue, FormSchema, SubmissionRecord};

/// Column header for the submission timestamp.
const TIMESTAMP_COLUMN: &str = "Submitted At";

/// A rendered export: one header row plus one row per submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Build export rows for a form's submissions.
///
/// Every cell is already rendered to text: strings pass through, file
/// uploads become a `;`-separated list of file names, nested objects become
/// compact JSON, and absent values become empty cells.
pub fn export_rows(
    schema: &FormSchema,
    submissions: &[SubmissionRecord],
    config: &ExportConfig,
) -> ExportTable {
    let mut header = Vec::with_capacity(schema.fields.len() + 1);
    if config.include_timestamp {
        header.push(TIMESTAMP_COLUMN.to_string());
    }
    header.extend(schema.fields.iter().map(|f| f.label.clone()));

    let rows = submissions
        .iter()
        .map(|submission| {
            let mut row = Vec::with_capacity(header.len());
            if config.include_timestamp {
                row.push(
                    submission
                        .submitted_at
                        .format("%Y-%m-%d %H:%M:%S")
                        .to_string(),
                );
            }
            for field in &schema.fields {
                row.push(render_cell(resolver::resolve(field, submission)));
            }
            row
        })
        .collect();

    tracing::debug!(
        form_id = %schema.id,
        rows = submissions.len(),
        columns = header.len(),
        "Built export table"
    );

    ExportTable { header, rows }
}

/// Render one resolved value as cell text.
fn render_cell(value: FieldValue<'_>) -> String {
    match value {
        FieldValue::Absent => String::new(),
        FieldValue::Text(s) => s.to_string(),
        FieldValue::Files(items) => {
            let files = value.files();
            if files.is_empty() {
                // Array of non-descriptor values; fall back to raw JSON
                serde_json::Value::Array(items.to_vec()).to_string()
            } else {
                files
                    .iter()
                    .map(|f| f.display_name().to_string())
                    .collect::<Vec<_>>()
                    .join("; ")
            }
        }
        FieldValue::Nested(map) => serde_json::Value::Object(map.clone()).to_string(),
        FieldValue::Other(v) => v.to_string(),
    }
}

/// Render an export table as CSV.
///
/// Cells containing commas, quotes, or newlines are quoted, with embedded
/// quotes doubled.
pub fn to_csv(table: &ExportTable) -> String {
    let mut lines = Vec::with_capacity(table.rows.len() + 1);
    lines.push(csv_line(&table.header));
    for row in &table.rows {
        lines.push(csv_line(row));
    }
    lines.join("\n")
}

fn csv_line(cells: &[String]) -> String {
    cells
        .iter()
        .map(|cell| csv_escape(cell))
        .collect::<Vec<_>>()
        .join(",")
}

fn csv_escape(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// Render an export table as an array of JSON objects keyed by header.
pub fn to_json(table: &ExportTable) -> serde_json::Value {
    let rows: Vec<serde_json::Value> = table
        .rows
        .iter()
        .map(|row| {
            let mut object = serde_json::Map::new();
            for (key, cell) in table.header.iter().zip(row) {
                object.insert(key.clone(), serde_json::Value::String(cell.clone()));
            }
            serde_json::Value::Object(object)
        })
        .collect();
    serde_json::Value::Array(rows)
}
