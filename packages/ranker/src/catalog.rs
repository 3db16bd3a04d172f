//! Catalog loaders
//!
//! Supply the initial item population once. Validation (non-empty, unique
//! ids) happens when the population is built.

use std::fs;
use std::path::{Path, PathBuf};

use memorank_algo::CatalogEntry;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

pub trait CatalogLoader {
    fn load_catalog(&self) -> Result<Vec<CatalogEntry>, CatalogError>;
}

impl<T: CatalogLoader + ?Sized> CatalogLoader for &T {
    fn load_catalog(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        (**self).load_catalog()
    }
}

/// Catalog read from a JSON array of entries
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CatalogLoader for JsonCatalog {
    fn load_catalog(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| CatalogError::Io {
            path: self.path.clone(),
            source,
        })?;
        let entries: Vec<CatalogEntry> = serde_json::from_str(&raw)?;
        tracing::info!(path = %self.path.display(), entries = entries.len(), "catalog loaded");
        Ok(entries)
    }
}

/// Fixed in-memory catalog
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: Vec<CatalogEntry>,
}

impl StaticCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }
}

impl CatalogLoader for StaticCatalog {
    fn load_catalog(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        Ok(self.entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_catalog_reads_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(
            &path,
            r#"[
                {"id": 1, "displayName": "bulbasaur", "ordinal": 1, "imageRef": "art/1.png"},
                {"id": 4, "displayName": "charmander", "ordinal": 4}
            ]"#,
        )
        .unwrap();

        let entries = JsonCatalog::new(&path).load_catalog().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].image_ref.as_deref(), Some("art/1.png"));
        assert_eq!(entries[1].image_ref, None);
    }

    #[test]
    fn test_json_catalog_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonCatalog::new(dir.path().join("absent.json"))
            .load_catalog()
            .unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn test_json_catalog_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, r#"[{"id": "one"}]"#).unwrap();
        assert!(matches!(
            JsonCatalog::new(&path).load_catalog(),
            Err(CatalogError::Parse(_))
        ));
    }
}
