//! PDF reports rendered with genpdf
//!
//! Layout: title, generation time, then each section as a heading followed
//! by a paragraph, a framed table or a `label: value` list. genpdf needs
//! TTF files on disk, looked up as `<font_dir>/<family>-Regular.ttf` etc.

use chrono::Local;
use genpdf::{elements, fonts, style, Element};
use std::path::Path;
use tracing::debug;

use super::Table;
use crate::config::ExportConfig;
use crate::error::ExportError;

#[derive(Debug, Clone, PartialEq)]
pub enum PdfSection {
    Text { heading: String, body: String },
    Table { heading: String, table: Table },
    Kpis { heading: String, items: Vec<(String, String)> },
}

impl PdfSection {
    fn heading(&self) -> &str {
        match self {
            PdfSection::Text { heading, .. }
            | PdfSection::Table { heading, .. }
            | PdfSection::Kpis { heading, .. } => heading,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PdfReport {
    pub title: String,
    pub sections: Vec<PdfSection>,
}

impl PdfReport {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    pub fn text(mut self, heading: impl Into<String>, body: impl Into<String>) -> Self {
        self.sections.push(PdfSection::Text {
            heading: heading.into(),
            body: body.into(),
        });
        self
    }

    /// Empty tables are left out of the document
    pub fn table(mut self, table: Table) -> Self {
        if !table.is_empty() && !table.columns.is_empty() {
            self.sections.push(PdfSection::Table {
                heading: table.name.clone(),
                table,
            });
        }
        self
    }

    pub fn kpis(mut self, heading: impl Into<String>, items: Vec<(String, String)>) -> Self {
        self.sections.push(PdfSection::Kpis {
            heading: heading.into(),
            items,
        });
        self
    }

    pub fn render_to_file(&self, config: &ExportConfig, path: &Path) -> Result<(), ExportError> {
        let font_family = fonts::from_files(&config.font_dir, &config.font_family, None)?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(self.title.clone());
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        doc.push(
            elements::Paragraph::new(self.title.clone())
                .styled(style::Style::new().bold().with_font_size(18)),
        );
        doc.push(
            elements::Paragraph::new(format!(
                "Generated: {}",
                Local::now().format("%Y-%m-%d %H:%M")
            ))
            .styled(style::Style::new().with_font_size(10)),
        );
        doc.push(elements::Break::new(1.5));

        for section in &self.sections {
            doc.push(
                elements::Paragraph::new(section.heading().to_string())
                    .styled(style::Style::new().bold().with_font_size(14)),
            );

            match section {
                PdfSection::Text { body, .. } => {
                    doc.push(
                        elements::Paragraph::new(body.clone())
                            .styled(style::Style::new().with_font_size(10)),
                    );
                }
                PdfSection::Table { table, .. } if !table.columns.is_empty() => {
                    doc.push(table_layout(table)?);
                }
                PdfSection::Table { .. } => {}
                PdfSection::Kpis { items, .. } => {
                    for (label, value) in items {
                        doc.push(
                            elements::Paragraph::new(format!("{}: {}", label, value))
                                .styled(style::Style::new().with_font_size(10)),
                        );
                    }
                }
            }
            doc.push(elements::Break::new(1));
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ExportError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
        doc.render_to_file(path)?;

        debug!(path = %path.display(), sections = self.sections.len(), "PDF written");
        Ok(())
    }
}

fn table_layout(table: &Table) -> Result<elements::TableLayout, ExportError> {
    let mut layout = elements::TableLayout::new(vec![1; table.columns.len()]);
    layout.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    let bold = style::Style::new().bold().with_font_size(9);
    let mut header = layout.row();
    for column in &table.columns {
        header = header.element(elements::Paragraph::new(column.clone()).styled(bold));
    }
    header.push()?;

    let body = style::Style::new().with_font_size(9);
    for cells in &table.rows {
        let mut row = layout.row();
        for index in 0..table.columns.len() {
            let text = cells.get(index).map(|c| c.to_string()).unwrap_or_default();
            row = row.element(elements::Paragraph::new(text).styled(body));
        }
        row.push()?;
    }
    Ok(layout)
}
