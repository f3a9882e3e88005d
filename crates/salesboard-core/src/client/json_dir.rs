//! Raw entities read from JSON dumps on disk

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::EntitySource;
use crate::error::CoreError;

pub const SALES_FILE: &str = "sales.json";
pub const PRODUCTS_FILE: &str = "products.json";
pub const CATEGORIES_FILE: &str = "categories.json";

/// Directory holding `sales.json`, `products.json` and `categories.json`
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn read(&self, file_name: &str) -> Result<Value, CoreError> {
        let path = self.dir.join(file_name);
        debug!(path = %path.display(), "Reading entity dump");

        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CoreError::FileNotFound { path: path.clone() }
            } else {
                CoreError::FileRead {
                    path: path.clone(),
                    source: e,
                }
            }
        })?;

        serde_json::from_str(&content).map_err(|e| CoreError::JsonParse {
            path,
            message: e.to_string(),
            source: e,
        })
    }
}

impl EntitySource for JsonDirSource {
    async fn sales(&self) -> Result<Value, CoreError> {
        self.read(SALES_FILE).await
    }

    async fn products(&self) -> Result<Value, CoreError> {
        self.read(PRODUCTS_FILE).await
    }

    async fn categories(&self) -> Result<Value, CoreError> {
        self.read(CATEGORIES_FILE).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_reads_each_file() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SALES_FILE), r#"[{"id": 1, "montant": 10}]"#).unwrap();
        std::fs::write(dir.path().join(CATEGORIES_FILE), "[]").unwrap();

        let source = JsonDirSource::new(dir.path());

        let sales = source.sales().await.unwrap();
        assert_eq!(sales[0]["montant"], 10);
        assert_eq!(source.categories().await.unwrap(), Value::Array(vec![]));
        assert!(matches!(
            source.products().await,
            Err(CoreError::FileNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(PRODUCTS_FILE), "[{").unwrap();

        let err = JsonDirSource::new(dir.path()).products().await.unwrap_err();
        assert!(matches!(err, CoreError::JsonParse { .. }));
    }
}
