//! Export of report tables to CSV, XLSX and PDF
//!
//! Every writer works on [`Table`], a named grid of cells built from any
//! serializable rows. Documents are assembled in memory and written once.

pub mod csv;
pub mod pdf;
pub mod report;
pub mod xlsx;

pub use csv::{to_csv_string, write_csv};
pub use pdf::{PdfReport, PdfSection};
pub use report::{prepare_analytics_export, AnalyticsExport};
pub use xlsx::write_xlsx;

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::error::ExportError;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Empty,
            Value::Bool(b) => Cell::Text(b.to_string()),
            Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Empty),
            Value::String(s) => Cell::Text(s.clone()),
            nested => Cell::Text(nested.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Empty => Ok(()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

/// A named grid: one sheet, one CSV file or one PDF table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from rows serializing to JSON objects
    ///
    /// Columns are the keys of the first row in field order. Later rows
    /// missing a column get an empty cell; extra keys are dropped.
    pub fn from_serialize<T: Serialize>(
        name: impl Into<String>,
        rows: &[T],
    ) -> Result<Self, ExportError> {
        let mut objects = Vec::with_capacity(rows.len());
        for row in rows {
            match serde_json::to_value(row)? {
                Value::Object(map) => objects.push(map),
                other => {
                    return Err(ExportError::NotAnObject {
                        found: value_kind(&other).to_string(),
                    })
                }
            }
        }

        let columns: Vec<String> = objects
            .first()
            .map(|first| first.keys().cloned().collect())
            .unwrap_or_default();

        let rows = objects
            .iter()
            .map(|object| {
                columns
                    .iter()
                    .map(|c| object.get(c).map(Cell::from_value).unwrap_or(Cell::Empty))
                    .collect()
            })
            .collect();

        Ok(Self {
            name: name.into(),
            columns,
            rows,
        })
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Row {
        product_title: String,
        total_quantity: f64,
        note: Option<String>,
    }

    #[test]
    fn test_columns_follow_field_order() {
        let rows = vec![
            Row {
                product_title: "Chair".into(),
                total_quantity: 3.0,
                note: None,
            },
            Row {
                product_title: "Desk".into(),
                total_quantity: 1.5,
                note: Some("new".into()),
            },
        ];

        let table = Table::from_serialize("Best sellers", &rows).unwrap();

        assert_eq!(table.columns, vec!["productTitle", "totalQuantity", "note"]);
        assert_eq!(table.rows[0], vec![Cell::from("Chair"), Cell::Number(3.0), Cell::Empty]);
        assert_eq!(table.rows[1][2], Cell::from("new"));
    }

    #[test]
    fn test_rows_must_be_objects() {
        let err = Table::from_serialize("numbers", &[1, 2]).unwrap_err();
        assert!(matches!(err, ExportError::NotAnObject { found } if found == "number"));
    }

    #[test]
    fn test_no_rows() {
        let table = Table::from_serialize::<Row>("empty", &[]).unwrap();
        assert!(table.is_empty());
        assert!(table.columns.is_empty());
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Number(300.0).to_string(), "300");
        assert_eq!(Cell::Number(12.5).to_string(), "12.5");
        assert_eq!(Cell::Empty.to_string(), "");
    }
}
