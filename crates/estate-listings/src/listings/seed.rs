use std::io::Read;
use std::path::Path;

use super::domain::Property;

const SAMPLE_CATALOG: &str = include_str!("../../data/sample_catalog.json");

#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io(err) => write!(f, "failed to read property catalog: {}", err),
            CatalogError::Json(err) => write!(f, "invalid property catalog JSON: {}", err),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io(err) => Some(err),
            CatalogError::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Load a JSON array of listings from disk.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<Property>, CatalogError> {
    let file = std::fs::File::open(path)?;
    load_catalog_from_reader(std::io::BufReader::new(file))
}

pub fn load_catalog_from_reader<R: Read>(reader: R) -> Result<Vec<Property>, CatalogError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Demo listings bundled with the crate for local runs.
pub fn sample_catalog() -> Result<Vec<Property>, CatalogError> {
    load_catalog_from_reader(SAMPLE_CATALOG.as_bytes())
}
