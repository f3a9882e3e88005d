//! salesboard-core - Core library for salesboard
//!
//! Provides models, lenient parsers, the local analytics engine, the remote
//! analytics client with fallback, and exports for sales dashboards.

pub mod analytics;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod parsers;
pub mod view;

pub use client::{AnalyticsApi, Dashboard, EntitySource, HttpClient, JsonDirSource, Loaded};
pub use config::SalesboardConfig;
pub use error::{CoreError, DataOrigin, ExportError, LoadReport};
pub use export::{PdfReport, Table};
pub use models::Dataset;
