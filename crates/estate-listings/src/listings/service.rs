use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::domain::{Property, PropertyId};
use super::draft::{DraftError, PropertyDraft, PropertyPatch};
use super::engine::compute_visible_properties;
use super::filter::UnknownStatus;
use super::pagination::{paginate, Page};
use super::query::ListingQuery;
use super::repository::{PropertyRepository, RepositoryError};
use crate::analytics::MarketAnalytics;

/// Service composing the catalog repository with the filter/sort engine.
pub struct ListingService<R> {
    repository: Arc<R>,
    sequence: AtomicU64,
    default_per_page: u32,
}

impl<R> ListingService<R>
where
    R: PropertyRepository + 'static,
{
    /// The id sequence starts after the highest id already stored.
    pub fn new(repository: Arc<R>, default_per_page: u32) -> Result<Self, ListingServiceError> {
        let next_id = repository
            .all()?
            .iter()
            .map(|property| property.id.0)
            .max()
            .map_or(1, |max| max + 1);

        Ok(Self {
            repository,
            sequence: AtomicU64::new(next_id),
            default_per_page,
        })
    }

    fn next_id(&self) -> PropertyId {
        PropertyId(self.sequence.fetch_add(1, Ordering::Relaxed))
    }

    /// Filter, sort, and paginate the catalog for the public listing page.
    pub fn search(&self, query: &ListingQuery) -> Result<Page<Property>, ListingServiceError> {
        let resolved = query.resolve(self.default_per_page)?;
        let catalog = self.repository.all()?;
        let visible = compute_visible_properties(&catalog, &resolved.filter, resolved.sort);
        debug!(
            filter = %resolved.filter,
            sort = %resolved.sort,
            matched = visible.len(),
            "listing search"
        );
        Ok(paginate(visible, resolved.page))
    }

    pub fn get(&self, id: PropertyId) -> Result<Property, ListingServiceError> {
        let property = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(property)
    }

    pub fn catalog(&self) -> Result<Vec<Property>, ListingServiceError> {
        Ok(self.repository.all()?)
    }

    pub fn create(
        &self,
        draft: PropertyDraft,
        now: DateTime<Utc>,
    ) -> Result<Property, ListingServiceError> {
        draft.validate()?;
        let property = draft.into_property(self.next_id(), now)?;
        let stored = self.repository.insert(property)?;
        info!(id = %stored.id, title = %stored.title, "listing created");
        Ok(stored)
    }

    pub fn update(
        &self,
        id: PropertyId,
        patch: PropertyPatch,
        now: DateTime<Utc>,
    ) -> Result<Property, ListingServiceError> {
        let current = self.get(id)?;
        let updated = patch.apply_to(&current, now)?;
        self.repository.update(updated.clone())?;
        info!(id = %id, "listing updated");
        Ok(updated)
    }

    pub fn delete(&self, id: PropertyId) -> Result<Property, ListingServiceError> {
        let removed = self.repository.remove(id)?;
        info!(id = %id, "listing deleted");
        Ok(removed)
    }

    pub fn analytics(&self) -> Result<MarketAnalytics, ListingServiceError> {
        let catalog = self.repository.all()?;
        Ok(MarketAnalytics::from_properties(&catalog))
    }
}

/// Error raised by the listing service.
#[derive(Debug, thiserror::Error)]
pub enum ListingServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Query(#[from] UnknownStatus),
}
