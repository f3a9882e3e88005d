//! Multi-sheet workbook writer

use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::debug;

use super::{Cell, Table};
use crate::error::ExportError;

/// Excel's limit on sheet name length
const MAX_SHEET_NAME: usize = 31;

/// Sheet names may not contain `[ ] : * ? / \`
fn sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .take(MAX_SHEET_NAME)
        .collect();
    if cleaned.trim().is_empty() {
        "Sheet".to_string()
    } else {
        cleaned
    }
}

/// Write one sheet per non-empty table. Fails with [`ExportError::Empty`]
/// when every table is empty.
pub fn write_xlsx(tables: &[Table], path: &Path) -> Result<(), ExportError> {
    let tables: Vec<&Table> = tables.iter().filter(|t| !t.is_empty()).collect();
    if tables.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    for table in &tables {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name(&table.name))?;

        for (col, column) in table.columns.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, column, &header_format)?;
        }

        for (index, row) in table.rows.iter().enumerate() {
            let row_num = index as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                match cell {
                    Cell::Text(text) => {
                        worksheet.write_string(row_num, col as u16, text)?;
                    }
                    Cell::Number(n) if n.is_finite() => {
                        worksheet.write_number(row_num, col as u16, *n)?;
                    }
                    Cell::Number(_) | Cell::Empty => {}
                }
            }
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    }
    workbook.save(path)?;

    debug!(path = %path.display(), sheets = tables.len(), "Workbook written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sheet_name_rules() {
        assert_eq!(sheet_name("KPI Summary"), "KPI Summary");
        assert_eq!(sheet_name("Sales 2024/05"), "Sales 2024_05");
        assert_eq!(sheet_name(&"x".repeat(40)).len(), 31);
        assert_eq!(sheet_name("  "), "Sheet");
    }

    #[test]
    fn test_writes_workbook() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.xlsx");

        let mut kpis = Table::new("KPI Summary", vec!["Metric".into(), "Value".into()]);
        kpis.push_row(vec![Cell::from("Total Revenue"), Cell::Number(300.0)]);
        let empty = Table::new("Products", vec!["id".into()]);

        write_xlsx(&[kpis, empty], &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_all_empty_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let empty = Table::new("Products", vec!["id".into()]);

        let result = write_xlsx(&[empty], &temp_dir.path().join("report.xlsx"));

        assert!(matches!(result, Err(ExportError::Empty)));
    }
}
