//! Market analytics derived from the live catalog.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::listings::builder::PRICE_PRESETS;
use crate::listings::domain::{ListingStatus, Property};

pub const TOP_LOCATIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// Dashboard payload. Field names follow the dashboard client's camelCase convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalytics {
    pub total_listings: usize,
    pub average_price: u64,
    pub average_price_per_sqft: u64,
    pub for_sale: usize,
    pub for_rent: usize,
    pub property_types: Vec<CategoryCount>,
    pub location_popularity: Vec<CategoryCount>,
    pub price_bands: Vec<CategoryCount>,
}

impl MarketAnalytics {
    pub fn from_properties(properties: &[Property]) -> Self {
        let total_listings = properties.len();
        let total_price: u128 = properties.iter().map(|p| u128::from(p.price)).sum();
        let total_area: u128 = properties.iter().map(|p| u128::from(p.area)).sum();

        let count_status = |status: ListingStatus| {
            properties
                .iter()
                .filter(|property| property.status == status)
                .count()
        };

        let price_bands = PRICE_PRESETS
            .iter()
            .skip(1)
            .map(|preset| CategoryCount {
                label: preset.label.to_string(),
                count: properties
                    .iter()
                    .filter(|property| preset.range.contains(property.price))
                    .count(),
            })
            .collect();

        let mut location_popularity =
            ranked_counts(properties.iter().map(|p| p.location.as_str()));
        location_popularity.truncate(TOP_LOCATIONS);

        Self {
            total_listings,
            average_price: rounded_ratio(total_price, total_listings as u128),
            average_price_per_sqft: rounded_ratio(total_price, total_area),
            for_sale: count_status(ListingStatus::ForSale),
            for_rent: count_status(ListingStatus::ForRent),
            property_types: ranked_counts(properties.iter().map(|p| p.property_type.as_str())),
            location_popularity,
            price_bands,
        }
    }
}

/// Counts per label, most frequent first, ties broken alphabetically.
fn ranked_counts<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }

    let mut ranked: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(label, count)| CategoryCount {
            label: label.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

fn rounded_ratio(numerator: u128, denominator: u128) -> u64 {
    if denominator == 0 {
        return 0;
    }
    let rounded = (numerator + denominator / 2) / denominator;
    u64::try_from(rounded).unwrap_or(u64::MAX)
}
