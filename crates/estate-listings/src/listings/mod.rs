//! Property catalog browsing: listing data model, the filter/sort engine, the
//! filter builder fed by UI events, and the HTTP surface around them.
//!
//! `engine::compute_visible_properties` is the single source of truth for what a browsing
//! user sees; the view model, the JSON endpoints, and the CLI all go through it.

pub mod builder;
pub mod domain;
pub mod draft;
pub mod engine;
pub mod filter;
pub mod pagination;
pub mod query;
pub mod repository;
pub mod router;
pub mod seed;
pub mod service;
pub mod sort;
pub mod view_model;

#[cfg(test)]
mod tests;

pub use builder::{
    FilterChoice, FilterEvent, FilterOptions, PricePreset, BATHROOM_OPTIONS, BEDROOM_OPTIONS,
    PRICE_PRESETS, PROPERTY_TYPES, STATUS_OPTIONS,
};
pub use domain::{
    parse_timestamp, whole_price, AgentContact, Amenities, ListingStatus, Property, PropertyId,
};
pub use draft::{DraftError, PropertyDraft, PropertyPatch};
pub use engine::compute_visible_properties;
pub use filter::{FilterSpec, PriceRange, StatusFilter, TypeFilter, UnknownStatus};
pub use pagination::{paginate, Page, PageRequest};
pub use query::{ListingQuery, ResolvedQuery};
pub use repository::{PropertyRepository, RepositoryError};
pub use router::{listing_router, ListingApi};
pub use seed::{load_catalog, load_catalog_from_reader, sample_catalog, CatalogError};
pub use service::{ListingService, ListingServiceError};
pub use sort::{SortKey, UnknownSortKey};
pub use view_model::{ListingView, ListingViewModel};
