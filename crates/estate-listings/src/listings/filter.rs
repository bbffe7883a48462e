use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::{ListingStatus, Property};

const ALL: &str = "All";

/// Property type constraint. Serialized as `"All"` or the literal type name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeFilter {
    #[default]
    All,
    Only(String),
}

impl TypeFilter {
    pub fn only(property_type: impl Into<String>) -> Self {
        Self::from(property_type.into())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn admits(&self, property_type: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == property_type,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL,
            Self::Only(value) => value,
        }
    }
}

impl From<String> for TypeFilter {
    fn from(value: String) -> Self {
        if value == ALL {
            Self::All
        } else {
            Self::Only(value)
        }
    }
}

impl From<TypeFilter> for String {
    fn from(value: TypeFilter) -> Self {
        match value {
            TypeFilter::All => ALL.to_string(),
            TypeFilter::Only(value) => value,
        }
    }
}

/// Listing status constraint. Serialized as `"All"` or a status label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Only(ListingStatus),
}

impl StatusFilter {
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn admits(&self, status: ListingStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => *expected == status,
        }
    }

    pub fn parse(raw: &str) -> Result<Self, UnknownStatus> {
        if raw == ALL {
            return Ok(Self::All);
        }
        ListingStatus::parse(raw)
            .map(Self::Only)
            .ok_or_else(|| UnknownStatus(raw.to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => ALL,
            Self::Only(status) => status.label(),
        }
    }
}

impl TryFrom<String> for StatusFilter {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StatusFilter> for String {
    fn from(value: StatusFilter) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown listing status '{0}' (expected \"All\", \"For Sale\" or \"For Rent\")")]
pub struct UnknownStatus(pub String);

/// Inclusive price window. `max = None` leaves the upper end open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceRange {
    #[serde(default)]
    pub min: u64,
    #[serde(default)]
    pub max: Option<u64>,
}

impl PriceRange {
    pub const UNBOUNDED: PriceRange = PriceRange { min: 0, max: None };

    pub const fn new(min: u64, max: Option<u64>) -> Self {
        Self { min, max }
    }

    pub const fn at_least(min: u64) -> Self {
        Self { min, max: None }
    }

    pub const fn between(min: u64, max: u64) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    /// Range from user-entered bounds. Prices are whole dollars, so a fractional floor rounds
    /// up and a fractional ceiling rounds down. A non-positive ceiling leaves the range open and
    /// non-finite bounds are ignored.
    pub fn from_bounds(min: Option<f64>, max: Option<f64>) -> Self {
        let min = min
            .filter(|min| min.is_finite())
            .map_or(0, |min| min.max(0.0).ceil() as u64);
        let max = max
            .filter(|max| max.is_finite() && *max > 0.0)
            .map(|max| max.floor() as u64);
        Self::new(min, max)
    }

    pub fn is_bounded(&self) -> bool {
        self.min > 0 || self.max.is_some()
    }

    pub fn contains(&self, price: u64) -> bool {
        price >= self.min && self.max.map_or(true, |max| price <= max)
    }
}

/// The complete set of browsing constraints. Always fully populated; `Default` is the
/// unconstrained state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterSpec {
    pub search: String,
    #[serde(rename = "type")]
    pub property_type: TypeFilter,
    pub status: StatusFilter,
    pub price_range: PriceRange,
    pub bedrooms: u32,
    pub bathrooms: f32,
}

impl FilterSpec {
    /// True when `property` passes every active constraint.
    pub fn matches(&self, property: &Property) -> bool {
        let needle = self.search_needle();
        needle
            .as_deref()
            .map_or(true, |needle| matches_search(property, needle))
            && self.property_type.admits(&property.property_type)
            && self.status.admits(property.status)
            && self.admits_price(property)
            && self.admits_bedrooms(property)
            && self.admits_bathrooms(property)
    }

    /// Lowercased search text, or `None` when search is inactive. Whitespace-only input
    /// still counts as a search.
    pub(crate) fn search_needle(&self) -> Option<String> {
        (!self.search.is_empty()).then(|| self.search.to_lowercase())
    }

    pub(crate) fn admits_price(&self, property: &Property) -> bool {
        !self.price_range.is_bounded() || self.price_range.contains(property.price)
    }

    pub(crate) fn admits_bedrooms(&self, property: &Property) -> bool {
        self.bedrooms == 0 || property.bedrooms >= self.bedrooms
    }

    pub(crate) fn admits_bathrooms(&self, property: &Property) -> bool {
        if self.bathrooms > 0.0 {
            property.bathrooms >= self.bathrooms
        } else {
            true
        }
    }

    /// Number of constraints currently narrowing results.
    pub fn active_count(&self) -> usize {
        [
            !self.search.is_empty(),
            !self.property_type.is_all(),
            !self.status.is_all(),
            self.price_range.is_bounded(),
            self.bedrooms > 0,
            self.bathrooms > 0.0,
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }
}

/// `needle` must already be lowercased.
pub(crate) fn matches_search(property: &Property, needle: &str) -> bool {
    [&property.title, &property.location, &property.property_type]
        .into_iter()
        .any(|field| field.to_lowercase().contains(needle))
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "search='{}' type={} status={} price={}..{} bedrooms>={} bathrooms>={}",
            self.search,
            self.property_type.as_str(),
            self.status.as_str(),
            self.price_range.min,
            self.price_range
                .max
                .map_or_else(|| "any".to_string(), |max| max.to_string()),
            self.bedrooms,
            self.bathrooms
        )
    }
}
