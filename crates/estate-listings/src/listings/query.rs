use serde::Deserialize;

use super::filter::{FilterSpec, PriceRange, StatusFilter, TypeFilter, UnknownStatus};
use super::pagination::PageRequest;
use super::sort::SortKey;

/// Query-string shape accepted by the public listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ListingQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default, rename = "type")]
    pub property_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<f32>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// Everything the listing service needs to answer one query.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedQuery {
    pub filter: FilterSpec,
    pub sort: SortKey,
    pub page: PageRequest,
}

impl ListingQuery {
    /// Translate query values into engine inputs. Missing values fall back to the
    /// unconstrained defaults; `max_price=0` means "no ceiling" and unknown `sort_by` values
    /// fall back to the default ordering.
    pub fn resolve(&self, default_per_page: u32) -> Result<ResolvedQuery, UnknownStatus> {
        let status = match self.status.as_deref() {
            None | Some("") => StatusFilter::All,
            Some(raw) => StatusFilter::parse(raw)?,
        };

        let property_type = match self.property_type.as_deref() {
            None | Some("") => TypeFilter::All,
            Some(raw) => TypeFilter::only(raw),
        };

        let filter = FilterSpec {
            search: self.search.clone().unwrap_or_default(),
            property_type,
            status,
            price_range: PriceRange::from_bounds(self.min_price, self.max_price),
            bedrooms: self.bedrooms.unwrap_or(0),
            bathrooms: self.bathrooms.unwrap_or(0.0),
        };

        let sort = self
            .sort_by
            .as_deref()
            .and_then(SortKey::parse)
            .unwrap_or_default();

        Ok(ResolvedQuery {
            filter,
            sort,
            page: PageRequest::new(self.page, self.per_page, default_per_page),
        })
    }
}
