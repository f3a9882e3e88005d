//! CSV writer
//!
//! Header line, then one line per row, joined by `\n` without a trailing
//! newline. Text containing a comma, a double quote or a line break is
//! quoted with inner quotes doubled.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

use super::{Cell, Table};
use crate::error::ExportError;

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn line(fields: impl Iterator<Item = String>) -> String {
    fields.map(|f| escape(&f)).collect::<Vec<_>>().join(",")
}

pub fn to_csv_string(table: &Table) -> Result<String, ExportError> {
    if table.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut lines = Vec::with_capacity(table.rows.len() + 1);
    lines.push(line(table.columns.iter().cloned()));
    for row in &table.rows {
        lines.push(line(row.iter().map(Cell::to_string)));
    }
    Ok(lines.join("\n"))
}

/// Write `table` to `path`, creating parent directories as needed
pub fn write_csv(table: &Table, path: &Path) -> Result<(), ExportError> {
    let content = to_csv_string(table)?;
    let io_error = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }

    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(content.as_bytes()).map_err(io_error)?;
    writer.flush().map_err(io_error)?;

    debug!(path = %path.display(), rows = table.rows.len(), "CSV written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table() -> Table {
        let mut table = Table::new("clients", vec!["id".into(), "note".into(), "revenue".into()]);
        table.push_row(vec![Cell::from("c1"), Cell::from("plain"), Cell::Number(120.5)]);
        table.push_row(vec![
            Cell::from("c2"),
            Cell::from("says \"hi\", twice"),
            Cell::Empty,
        ]);
        table
    }

    #[test]
    fn test_quoting() {
        let csv = to_csv_string(&table()).unwrap();

        assert_eq!(
            csv,
            "id,note,revenue\nc1,plain,120.5\nc2,\"says \"\"hi\"\", twice\","
        );
    }

    #[test]
    fn test_empty_table_is_an_error() {
        let table = Table::new("empty", vec!["a".into()]);
        assert!(matches!(to_csv_string(&table), Err(ExportError::Empty)));
    }

    #[test]
    fn test_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("clients.csv");

        write_csv(&table(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("id,note,revenue\n"));
        assert_eq!(content.lines().count(), 3);
    }
}
