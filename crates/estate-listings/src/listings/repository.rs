use super::domain::{Property, PropertyId};

/// Storage abstraction so the listing service can be exercised in isolation.
///
/// `all` returns listings in ascending id order; the engine's stable sort relies on that
/// order to break ties.
pub trait PropertyRepository: Send + Sync {
    fn insert(&self, property: Property) -> Result<Property, RepositoryError>;
    fn update(&self, property: Property) -> Result<(), RepositoryError>;
    fn remove(&self, id: PropertyId) -> Result<Property, RepositoryError>;
    fn fetch(&self, id: PropertyId) -> Result<Option<Property>, RepositoryError>;
    fn all(&self) -> Result<Vec<Property>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
