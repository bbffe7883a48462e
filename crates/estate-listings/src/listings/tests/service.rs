use std::sync::Arc;

use chrono::{TimeZone, Utc};

use super::common::*;
use crate::listings::domain::PropertyId;
use crate::listings::draft::{DraftError, PropertyDraft, PropertyPatch};
use crate::listings::query::ListingQuery;
use crate::listings::repository::{PropertyRepository, RepositoryError};
use crate::listings::service::{ListingService, ListingServiceError};

fn draft() -> PropertyDraft {
    serde_json::from_value(draft_payload()).expect("draft parses")
}

#[test]
fn new_listings_continue_the_id_sequence() {
    let (service, repository) = build_service();
    let now = Utc.with_ymd_and_hms(2025, 5, 1, 9, 30, 0).unwrap();

    let created = service.create(draft(), now).expect("listing created");
    assert_eq!(created.id, PropertyId(9));
    assert_eq!(created.created_at, Some(now));
    assert_eq!(
        repository.fetch(PropertyId(9)).expect("fetch").map(|p| p.title),
        Some("Harbor View Townhouse".to_string())
    );

    let next = service.create(draft(), now).expect("second listing");
    assert_eq!(next.id, PropertyId(10));
}

#[test]
fn search_filters_sorts_and_paginates() {
    let (service, _) = build_service();

    let houses = service
        .search(&ListingQuery {
            property_type: Some("House".to_string()),
            ..ListingQuery::default()
        })
        .expect("search succeeds");
    assert_eq!(houses.total, 2);
    let house_ids: Vec<_> = houses.items.iter().map(|p| p.id.0).collect();
    assert_eq!(house_ids, vec![3, 7]);

    let second_page = service
        .search(&ListingQuery {
            page: Some(2),
            per_page: Some(3),
            ..ListingQuery::default()
        })
        .expect("search succeeds");
    assert_eq!(second_page.total, 8);
    assert_eq!(second_page.pages, 3);
    assert_eq!(second_page.current_page, 2);
    let page_ids: Vec<_> = second_page.items.iter().map(|p| p.id.0).collect();
    assert_eq!(page_ids, vec![3, 2, 5]);
}

#[test]
fn unknown_status_is_a_query_error() {
    let (service, _) = build_service();
    let err = service
        .search(&ListingQuery {
            status: Some("Sold".to_string()),
            ..ListingQuery::default()
        })
        .expect_err("status rejected");
    assert!(matches!(err, ListingServiceError::Query(_)));
}

#[test]
fn update_and_delete_report_missing_listings() {
    let (service, _) = build_service();
    let now = Utc::now();

    let err = service
        .update(PropertyId(404), PropertyPatch::default(), now)
        .expect_err("missing listing");
    assert!(matches!(
        err,
        ListingServiceError::Repository(RepositoryError::NotFound)
    ));

    service.delete(PropertyId(4)).expect("listing deleted");
    assert!(matches!(
        service.get(PropertyId(4)),
        Err(ListingServiceError::Repository(RepositoryError::NotFound))
    ));
    assert_eq!(service.catalog().expect("catalog").len(), 7);
}

#[test]
fn invalid_drafts_never_reach_the_repository() {
    let (service, repository) = build_service();
    let mut blank = draft();
    blank.title = " ".to_string();

    let err = service.create(blank, Utc::now()).expect_err("blank title");
    assert!(matches!(
        err,
        ListingServiceError::Draft(DraftError::Blank("title"))
    ));
    assert_eq!(repository.all().expect("all").len(), 8);
}

#[test]
fn analytics_reflect_mutations() {
    let (service, _) = build_service();
    service.delete(PropertyId(7)).expect("listing deleted");
    let analytics = service.analytics().expect("analytics");
    assert_eq!(analytics.total_listings, 7);
    assert!(analytics
        .price_bands
        .iter()
        .any(|band| band.label == "$2M+" && band.count == 0));
}

#[test]
fn unavailable_repository_fails_construction() {
    let result = ListingService::new(Arc::new(UnavailableRepository), 12);
    assert!(matches!(
        result,
        Err(ListingServiceError::Repository(RepositoryError::Unavailable(_)))
    ));
}
