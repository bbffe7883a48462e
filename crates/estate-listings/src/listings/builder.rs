use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::domain::ListingStatus;
use super::filter::{FilterSpec, PriceRange, StatusFilter, TypeFilter};
use super::sort::SortKey;

/// Type choices offered by the filter panel, `All` first.
pub const PROPERTY_TYPES: [&str; 7] = [
    "All",
    "House",
    "Condo",
    "Villa",
    "Loft",
    "Penthouse",
    "Estate",
];

/// Status choices offered by the filter panel.
pub const STATUS_OPTIONS: [StatusFilter; 3] = [
    StatusFilter::All,
    StatusFilter::Only(ListingStatus::ForSale),
    StatusFilter::Only(ListingStatus::ForRent),
];

/// Minimum-count choices for bedrooms; `0` is "Any".
pub const BEDROOM_OPTIONS: [u32; 6] = [0, 1, 2, 3, 4, 5];

/// Minimum-count choices for bathrooms; `0` is "Any".
pub const BATHROOM_OPTIONS: [f32; 5] = [0.0, 1.0, 2.0, 3.0, 4.0];

/// Named price window shown in the price dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PricePreset {
    pub label: &'static str,
    pub range: PriceRange,
}

pub const PRICE_PRESETS: [PricePreset; 5] = [
    PricePreset {
        label: "All Prices",
        range: PriceRange::UNBOUNDED,
    },
    PricePreset {
        label: "Under $500K",
        range: PriceRange::between(0, 500_000),
    },
    PricePreset {
        label: "$500K - $1M",
        range: PriceRange::between(500_000, 1_000_000),
    },
    PricePreset {
        label: "$1M - $2M",
        range: PriceRange::between(1_000_000, 2_000_000),
    },
    PricePreset {
        label: "$2M+",
        range: PriceRange::at_least(2_000_000),
    },
];

impl PricePreset {
    /// Index of the preset whose bounds equal `range`, if any.
    pub fn find(range: &PriceRange) -> Option<usize> {
        PRICE_PRESETS
            .iter()
            .position(|preset| preset.range == *range)
    }

    pub fn at(index: usize) -> Option<&'static PricePreset> {
        PRICE_PRESETS.get(index)
    }
}

/// A dropdown entry whose label differs from its value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterChoice<T> {
    pub value: T,
    pub label: String,
}

/// Everything a client needs to draw the filter panel and the sort dropdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub property_types: Vec<TypeFilter>,
    pub statuses: Vec<StatusFilter>,
    pub price_presets: Vec<PricePreset>,
    pub bedrooms: Vec<FilterChoice<u32>>,
    pub bathrooms: Vec<FilterChoice<f32>>,
    pub sort_keys: Vec<FilterChoice<SortKey>>,
}

impl FilterOptions {
    pub fn panel() -> Self {
        Self {
            property_types: PROPERTY_TYPES
                .iter()
                .map(|name| TypeFilter::from(name.to_string()))
                .collect(),
            statuses: STATUS_OPTIONS.to_vec(),
            price_presets: PRICE_PRESETS.to_vec(),
            bedrooms: BEDROOM_OPTIONS.into_iter().map(minimum_choice).collect(),
            bathrooms: BATHROOM_OPTIONS.into_iter().map(minimum_choice).collect(),
            sort_keys: SortKey::ALL
                .into_iter()
                .map(|key| FilterChoice {
                    value: key,
                    label: key.label().to_string(),
                })
                .collect(),
        }
    }
}

/// `0` reads "Any", anything else "N+".
fn minimum_choice<T: Copy + Default + PartialEq + Display>(value: T) -> FilterChoice<T> {
    let label = if value == T::default() {
        "Any".to_string()
    } else {
        format!("{value}+")
    };
    FilterChoice { value, label }
}

/// A discrete change coming from the filter panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FilterEvent {
    SearchSubmitted(String),
    TypeSelected(TypeFilter),
    StatusSelected(StatusFilter),
    PriceRangeSelected(PriceRange),
    BedroomsSelected(u32),
    BathroomsSelected(f32),
    Cleared,
}

impl FilterSpec {
    /// Build the filter that results from `event`. The receiver is left as-is; callers
    /// always swap in the returned value whole.
    pub fn apply(&self, event: FilterEvent) -> FilterSpec {
        match event {
            FilterEvent::SearchSubmitted(search) => FilterSpec {
                search,
                ..self.clone()
            },
            FilterEvent::TypeSelected(property_type) => FilterSpec {
                property_type,
                ..self.clone()
            },
            FilterEvent::StatusSelected(status) => FilterSpec {
                status,
                ..self.clone()
            },
            FilterEvent::PriceRangeSelected(price_range) => FilterSpec {
                price_range,
                ..self.clone()
            },
            FilterEvent::BedroomsSelected(bedrooms) => FilterSpec {
                bedrooms,
                ..self.clone()
            },
            FilterEvent::BathroomsSelected(bathrooms) => FilterSpec {
                bathrooms,
                ..self.clone()
            },
            FilterEvent::Cleared => FilterSpec::default(),
        }
    }

    /// Whether any field differs from its default. Drives the "Clear" button only.
    pub fn has_active_filters(&self) -> bool {
        *self != FilterSpec::default()
    }

    /// Index into [`PRICE_PRESETS`] for the current price window.
    pub fn price_preset(&self) -> Option<usize> {
        PricePreset::find(&self.price_range)
    }
}
