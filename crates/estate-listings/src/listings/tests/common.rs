use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use chrono::Duration;
use serde_json::{json, Value};

use crate::admin::{AdminCredentials, SessionStore};
use crate::listings::domain::{Property, PropertyId};
use crate::listings::repository::{PropertyRepository, RepositoryError};
use crate::listings::seed::sample_catalog;
use crate::listings::{listing_router, ListingApi, ListingService};

pub(super) const ADMIN_USER: &str = "admin";
pub(super) const ADMIN_PASSWORD: &str = "harbor-lights-42";

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<BTreeMap<PropertyId, Property>>>,
}

impl MemoryRepository {
    pub(super) fn seeded() -> Self {
        let repository = Self::default();
        {
            let mut guard = repository.records.lock().expect("repository mutex poisoned");
            for property in sample_catalog().expect("sample catalog parses") {
                guard.insert(property.id, property);
            }
        }
        repository
    }
}

impl PropertyRepository for MemoryRepository {
    fn insert(&self, property: Property) -> Result<Property, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&property.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(property.id, property.clone());
        Ok(property)
    }

    fn update(&self, property: Property) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.get_mut(&property.id) {
            Some(slot) => {
                *slot = property;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn remove(&self, id: PropertyId) -> Result<Property, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(&id).ok_or(RepositoryError::NotFound)
    }

    fn fetch(&self, id: PropertyId) -> Result<Option<Property>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn all(&self) -> Result<Vec<Property>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

pub(super) struct UnavailableRepository;

impl PropertyRepository for UnavailableRepository {
    fn insert(&self, _property: Property) -> Result<Property, RepositoryError> {
        Err(RepositoryError::Unavailable("catalog offline".to_string()))
    }

    fn update(&self, _property: Property) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("catalog offline".to_string()))
    }

    fn remove(&self, _id: PropertyId) -> Result<Property, RepositoryError> {
        Err(RepositoryError::Unavailable("catalog offline".to_string()))
    }

    fn fetch(&self, _id: PropertyId) -> Result<Option<Property>, RepositoryError> {
        Err(RepositoryError::Unavailable("catalog offline".to_string()))
    }

    fn all(&self) -> Result<Vec<Property>, RepositoryError> {
        Err(RepositoryError::Unavailable("catalog offline".to_string()))
    }
}

pub(super) fn build_service() -> (ListingService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::seeded());
    let service = ListingService::new(repository.clone(), 12).expect("service builds");
    (service, repository)
}

pub(super) fn build_api() -> ListingApi<MemoryRepository> {
    let (service, _) = build_service();
    let sessions = SessionStore::new(
        AdminCredentials::new(ADMIN_USER, ADMIN_PASSWORD),
        Duration::hours(1),
    );
    ListingApi::new(Arc::new(service), Arc::new(sessions))
}

pub(super) fn router(api: &ListingApi<MemoryRepository>) -> axum::Router {
    listing_router(api.clone())
}

pub(super) fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub(super) fn authorized(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"));
    match body {
        Some(payload) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&payload).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub(super) fn login_request(username: &str, password: &str) -> Request<Body> {
    Request::post("/api/admin/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_vec(&json!({ "username": username, "password": password })).unwrap(),
        ))
        .unwrap()
}

pub(super) fn draft_payload() -> Value {
    json!({
        "title": "Harbor View Townhouse",
        "location": "Seattle, WA",
        "type": "Townhouse",
        "status": "For Sale",
        "price": 780000,
        "bedrooms": 3,
        "bathrooms": 2.5,
        "area": 1900,
        "description": "End unit with a rooftop deck facing the sound.",
        "amenities": "Rooftop Deck, Garage",
    })
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn ids(payload: &Value) -> Vec<u64> {
    payload
        .as_array()
        .expect("array of properties")
        .iter()
        .map(|property| property["id"].as_u64().expect("numeric id"))
        .collect()
}
