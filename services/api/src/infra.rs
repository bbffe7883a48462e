use estate_listings::listings::{
    load_catalog, sample_catalog, CatalogError, Property, PropertyId, PropertyRepository,
    RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local catalog keyed by id, so `all` is naturally in id order.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPropertyRepository {
    records: Arc<Mutex<BTreeMap<PropertyId, Property>>>,
}

impl InMemoryPropertyRepository {
    pub(crate) fn with_catalog(catalog: Vec<Property>) -> Result<Self, RepositoryError> {
        let repository = Self::default();
        for property in catalog {
            repository.insert(property)?;
        }
        Ok(repository)
    }

    fn records(&self) -> Result<MutexGuard<'_, BTreeMap<PropertyId, Property>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl PropertyRepository for InMemoryPropertyRepository {
    fn insert(&self, property: Property) -> Result<Property, RepositoryError> {
        let mut guard = self.records()?;
        if guard.contains_key(&property.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(property.id, property.clone());
        Ok(property)
    }

    fn update(&self, property: Property) -> Result<(), RepositoryError> {
        let mut guard = self.records()?;
        if guard.contains_key(&property.id) {
            guard.insert(property.id, property);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn remove(&self, id: PropertyId) -> Result<Property, RepositoryError> {
        self.records()?.remove(&id).ok_or(RepositoryError::NotFound)
    }

    fn fetch(&self, id: PropertyId) -> Result<Option<Property>, RepositoryError> {
        Ok(self.records()?.get(&id).cloned())
    }

    fn all(&self) -> Result<Vec<Property>, RepositoryError> {
        Ok(self.records()?.values().cloned().collect())
    }
}

/// Read the catalog from `path` when given, otherwise fall back to the bundled sample.
pub(crate) fn load_catalog_source(path: Option<&Path>) -> Result<Vec<Property>, CatalogError> {
    let catalog = match path {
        Some(path) => {
            let catalog = load_catalog(path)?;
            info!(path = %path.display(), listings = catalog.len(), "catalog loaded");
            catalog
        }
        None => {
            let catalog = sample_catalog()?;
            info!(listings = catalog.len(), "using bundled sample catalog");
            catalog
        }
    };
    Ok(catalog)
}
