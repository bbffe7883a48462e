//! Filter and sort pipeline behind the listing page.
//!
//! Stages run in a fixed order (search, type, status, price, bedrooms, bathrooms) and each
//! one is skipped entirely while its constraint sits at the default. The surviving
//! listings are then stably sorted and cloned into a fresh vector; the input slice is
//! never touched.

use super::domain::Property;
use super::filter::{matches_search, FilterSpec};
use super::sort::SortKey;

/// Produce the ordered, filtered view of `all` for the given constraints.
pub fn compute_visible_properties(
    all: &[Property],
    filter: &FilterSpec,
    sort: SortKey,
) -> Vec<Property> {
    let mut visible: Vec<&Property> = all.iter().collect();

    if let Some(needle) = filter.search_needle() {
        visible.retain(|property| matches_search(property, &needle));
    }

    if !filter.property_type.is_all() {
        visible.retain(|property| filter.property_type.admits(&property.property_type));
    }

    if !filter.status.is_all() {
        visible.retain(|property| filter.status.admits(property.status));
    }

    if filter.price_range.is_bounded() {
        visible.retain(|property| filter.price_range.contains(property.price));
    }

    if filter.bedrooms > 0 {
        visible.retain(|property| filter.admits_bedrooms(property));
    }

    if filter.bathrooms > 0.0 {
        visible.retain(|property| filter.admits_bathrooms(property));
    }

    sort.sort(&mut visible);
    visible.into_iter().cloned().collect()
}
