//! Listing page state with explicit recomputation.
//!
//! Every mutation that can change the visible set runs the engine once and publishes an
//! immutable [`ListingView`] snapshot on a `watch` channel. Mutations that leave the
//! inputs unchanged publish nothing. Toggling a favorite republishes the current result
//! list with the new favorites set and does not rerun the engine.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use super::builder::FilterEvent;
use super::domain::{Property, PropertyId};
use super::engine::compute_visible_properties;
use super::filter::FilterSpec;
use super::sort::SortKey;

/// One rendered state of the listing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingView {
    pub filter: FilterSpec,
    pub sort: SortKey,
    pub properties: Vec<Property>,
    pub total_available: usize,
    pub has_active_filters: bool,
    pub favorites: BTreeSet<PropertyId>,
}

impl ListingView {
    pub fn result_count(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn is_favorite(&self, id: PropertyId) -> bool {
        self.favorites.contains(&id)
    }

    /// Header line shown above the result list.
    pub fn summary(&self) -> String {
        match self.properties.len() {
            1 => "1 property found".to_string(),
            count => format!("{count} properties found"),
        }
    }
}

pub struct ListingViewModel {
    catalog: Vec<Property>,
    filter: FilterSpec,
    sort: SortKey,
    favorites: BTreeSet<PropertyId>,
    publisher: watch::Sender<Arc<ListingView>>,
}

impl ListingViewModel {
    pub fn new(catalog: Vec<Property>) -> Self {
        Self::with_state(catalog, FilterSpec::default(), SortKey::default())
    }

    pub fn with_state(catalog: Vec<Property>, filter: FilterSpec, sort: SortKey) -> Self {
        let favorites = BTreeSet::new();
        let view = render(&catalog, &filter, sort, &favorites);
        let (publisher, _) = watch::channel(Arc::new(view));
        Self {
            catalog,
            filter,
            sort,
            favorites,
            publisher,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<ListingView>> {
        self.publisher.subscribe()
    }

    pub fn current(&self) -> Arc<ListingView> {
        self.publisher.borrow().clone()
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort
    }

    pub fn catalog(&self) -> &[Property] {
        &self.catalog
    }

    pub fn favorites(&self) -> &BTreeSet<PropertyId> {
        &self.favorites
    }

    pub fn is_favorite(&self, id: PropertyId) -> bool {
        self.favorites.contains(&id)
    }

    /// Add or remove `id` from the session favorites and return whether it is now a
    /// favorite. Ids are kept even when the listing is filtered out or not in the catalog.
    pub fn toggle_favorite(&mut self, id: PropertyId) -> bool {
        let now_favorite = self.favorites.insert(id);
        if !now_favorite {
            self.favorites.remove(&id);
        }

        let mut view = ListingView::clone(&self.current());
        view.favorites = self.favorites.clone();
        self.publisher.send_replace(Arc::new(view));
        now_favorite
    }

    /// Replace the catalog, e.g. after the admin dashboard mutates it.
    pub fn set_properties(&mut self, catalog: Vec<Property>) {
        if catalog == self.catalog {
            return;
        }
        self.catalog = catalog;
        self.recompute();
    }

    pub fn set_filter(&mut self, filter: FilterSpec) {
        if filter == self.filter {
            return;
        }
        self.filter = filter;
        self.recompute();
    }

    pub fn apply_event(&mut self, event: FilterEvent) {
        let next = self.filter.apply(event);
        self.set_filter(next);
    }

    pub fn clear_filters(&mut self) {
        self.apply_event(FilterEvent::Cleared);
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        if sort == self.sort {
            return;
        }
        self.sort = sort;
        self.recompute();
    }

    fn recompute(&mut self) {
        let view = render(&self.catalog, &self.filter, self.sort, &self.favorites);
        self.publisher.send_replace(Arc::new(view));
    }
}

fn render(
    catalog: &[Property],
    filter: &FilterSpec,
    sort: SortKey,
    favorites: &BTreeSet<PropertyId>,
) -> ListingView {
    ListingView {
        filter: filter.clone(),
        sort,
        properties: compute_visible_properties(catalog, filter, sort),
        total_available: catalog.len(),
        has_active_filters: filter.has_active_filters(),
        favorites: favorites.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::filter::TypeFilter;
    use crate::listings::seed::sample_catalog;

    fn view_model() -> ListingViewModel {
        ListingViewModel::new(sample_catalog().expect("sample catalog parses"))
    }

    #[test]
    fn initial_view_shows_the_full_catalog_cheapest_first() {
        let model = view_model();
        let view = model.current();
        assert_eq!(view.result_count(), view.total_available);
        assert!(!view.has_active_filters);
        let prices: Vec<u64> = view.properties.iter().map(|p| p.price).collect();
        let mut sorted = prices.clone();
        sorted.sort_unstable();
        assert_eq!(prices, sorted);
    }

    #[test]
    fn filter_events_publish_new_snapshots() {
        let mut model = view_model();
        let mut receiver = model.subscribe();
        assert!(!receiver.has_changed().expect("sender alive"));

        model.apply_event(FilterEvent::TypeSelected(TypeFilter::only("Villa")));
        assert!(receiver.has_changed().expect("sender alive"));
        let view = receiver.borrow_and_update().clone();
        assert!(view.has_active_filters);
        assert!(view
            .properties
            .iter()
            .all(|property| property.property_type == "Villa"));
        assert_eq!(view.summary(), "1 property found");
    }

    #[test]
    fn unchanged_inputs_do_not_publish() {
        let mut model = view_model();
        let mut receiver = model.subscribe();

        model.set_filter(FilterSpec::default());
        model.set_sort(SortKey::PriceAsc);
        model.clear_filters();
        assert!(!receiver.has_changed().expect("sender alive"));

        model.set_sort(SortKey::AreaDesc);
        assert!(receiver.has_changed().expect("sender alive"));
        assert_eq!(receiver.borrow_and_update().sort, SortKey::AreaDesc);
    }

    #[test]
    fn earlier_snapshots_are_not_mutated() {
        let mut model = view_model();
        let before = model.current();
        model.apply_event(FilterEvent::SearchSubmitted("no such listing".to_string()));
        let after = model.current();

        assert!(after.is_empty());
        assert_eq!(after.summary(), "0 properties found");
        assert_eq!(before.result_count(), before.total_available);
    }

    #[test]
    fn toggling_a_favorite_publishes_a_snapshot() {
        let mut model = view_model();
        let mut receiver = model.subscribe();
        let before = model.current();

        assert!(model.toggle_favorite(PropertyId(3)));
        assert!(receiver.has_changed().expect("sender alive"));
        let view = receiver.borrow_and_update().clone();
        assert!(view.is_favorite(PropertyId(3)));
        assert_eq!(view.properties, before.properties);
        assert!(!before.is_favorite(PropertyId(3)));

        assert!(!model.toggle_favorite(PropertyId(3)));
        assert!(receiver.has_changed().expect("sender alive"));
        assert!(receiver.borrow_and_update().favorites.is_empty());
        assert!(!model.is_favorite(PropertyId(3)));
    }

    #[test]
    fn favorites_survive_filter_and_sort_changes() {
        let mut model = view_model();
        model.toggle_favorite(PropertyId(1));
        model.toggle_favorite(PropertyId(6));

        model.apply_event(FilterEvent::TypeSelected(TypeFilter::only("Villa")));
        model.set_sort(SortKey::Newest);
        let view = model.current();
        assert_eq!(view.result_count(), 1);
        assert!(view.is_favorite(PropertyId(1)));
        assert!(view.is_favorite(PropertyId(6)));

        model.clear_filters();
        let view = model.current();
        let favorite_ids: Vec<u64> = view
            .properties
            .iter()
            .filter(|property| view.is_favorite(property.id))
            .map(|property| property.id.0)
            .collect();
        assert_eq!(favorite_ids, vec![6, 1]);
        assert_eq!(model.favorites().len(), 2);
    }

    #[test]
    fn catalog_replacement_recomputes_under_current_filter() {
        let mut model = view_model();
        model.apply_event(FilterEvent::BedroomsSelected(5));
        let remaining: Vec<Property> = model
            .catalog()
            .iter()
            .filter(|property| property.bedrooms < 5)
            .cloned()
            .collect();

        model.set_properties(remaining);
        let view = model.current();
        assert!(view.is_empty());
        assert!(view.has_active_filters);
    }
}
