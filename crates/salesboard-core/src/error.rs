//! Error types for salesboard-core
//!
//! Hard failures use thiserror enums. Non-fatal problems met while loading
//! raw entities are collected in a [`LoadReport`] so analytics can still
//! render with whatever data survived.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for salesboard operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // IO Errors
    // ===================
    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    // ===================
    // Parse Errors
    // ===================
    #[error("Failed to parse JSON in {path}: {message}")]
    JsonParse {
        path: PathBuf,
        message: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    // ===================
    // Remote API Errors
    // ===================
    #[error("Request to {endpoint} failed")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid API base URL: {url}")]
    InvalidBaseUrl { url: String },

    #[error("Invalid value for header {name}")]
    InvalidHeader { name: &'static str },
}

impl CoreError {
    /// Message including every underlying cause, e.g. for a fallback reason
    pub fn chain(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}

/// Error raised by the export writers
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No data to export")]
    Empty,

    #[error("Failed to write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Workbook error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("PDF error: {0}")]
    Pdf(#[from] genpdf::error::Error),

    #[error("Failed to serialize rows: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Rows must serialize to JSON objects, got {found}")]
    NotAnObject { found: String },
}

/// Severity level for errors during load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Record skipped, the rest of the data is usable
    Warning,
    /// A whole source failed and was replaced by an empty list
    Error,
}

/// Individual entry in a load report
#[derive(Debug, Clone)]
pub struct LoadError {
    pub source: String,
    pub message: String,
    pub severity: ErrorSeverity,
}

impl LoadError {
    pub fn warning(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
            severity: ErrorSeverity::Warning,
        }
    }

    pub fn error(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
            severity: ErrorSeverity::Error,
        }
    }
}

/// Report of problems encountered while loading raw entities
#[derive(Debug, Default, Clone)]
pub struct LoadReport {
    pub errors: Vec<LoadError>,
    pub sales_loaded: usize,
    pub products_loaded: usize,
    pub categories_loaded: usize,
    pub records_skipped: usize,
    /// Sales kept in totals but left out of every time bucket
    pub undated_sales: usize,
}

impl LoadReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, error: LoadError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, source: impl Into<String>, message: impl Into<String>) {
        self.errors.push(LoadError::warning(source, message));
    }

    /// Returns true if there are any errors (including warnings)
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns only warnings
    pub fn warnings(&self) -> impl Iterator<Item = &LoadError> {
        self.errors
            .iter()
            .filter(|e| e.severity == ErrorSeverity::Warning)
    }

    /// Returns (warnings, errors)
    pub fn error_count(&self) -> (usize, usize) {
        let warnings = self.warnings().count();
        (warnings, self.errors.len() - warnings)
    }
}

/// Where the numbers of a report came from
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DataOrigin {
    /// Pre-aggregated by the analytics API
    #[default]
    Remote,
    /// Computed from raw entities without asking the API
    Local,
    /// Recomputed locally because the analytics API failed
    Fallback { reason: String },
}

impl DataOrigin {
    pub fn is_fallback(&self) -> bool {
        matches!(self, DataOrigin::Fallback { .. })
    }
}
