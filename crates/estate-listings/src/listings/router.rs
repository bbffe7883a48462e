use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::builder::FilterOptions;
use super::domain::PropertyId;
use super::draft::{PropertyDraft, PropertyPatch};
use super::query::ListingQuery;
use super::repository::{PropertyRepository, RepositoryError};
use super::service::{ListingService, ListingServiceError};
use crate::admin::{parse_bearer, SessionContext, SessionError, SessionStore};
use crate::error::listing_status;

/// Shared handler state: the catalog service plus the admin session registry.
pub struct ListingApi<R> {
    pub service: Arc<ListingService<R>>,
    pub sessions: Arc<SessionStore>,
}

impl<R> Clone for ListingApi<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

impl<R> ListingApi<R> {
    pub fn new(service: Arc<ListingService<R>>, sessions: Arc<SessionStore>) -> Self {
        Self { service, sessions }
    }
}

/// Router builder exposing the public catalog and the token-guarded admin endpoints.
pub fn listing_router<R>(api: ListingApi<R>) -> Router
where
    R: PropertyRepository + 'static,
{
    Router::new()
        .route("/api/properties", get(list_handler::<R>))
        .route("/api/properties/:id", get(detail_handler::<R>))
        .route("/api/filters", get(filter_options_handler))
        .route("/api/analytics", get(analytics_handler::<R>))
        .route("/api/admin/login", post(login_handler::<R>))
        .route("/api/admin/logout", post(logout_handler::<R>))
        .route(
            "/api/admin/properties",
            get(admin_list_handler::<R>).post(create_handler::<R>),
        )
        .route(
            "/api/admin/properties/:id",
            put(update_handler::<R>).delete(delete_handler::<R>),
        )
        .with_state(api)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LoginRequest {
    #[serde(default)]
    pub(crate) username: String,
    #[serde(default)]
    pub(crate) password: String,
}

pub(crate) async fn list_handler<R>(
    State(api): State<ListingApi<R>>,
    Query(query): Query<ListingQuery>,
) -> Response
where
    R: PropertyRepository + 'static,
{
    match api.service.search(&query) {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(err) => service_error(err),
    }
}

pub(crate) async fn detail_handler<R>(
    State(api): State<ListingApi<R>>,
    Path(id): Path<u64>,
) -> Response
where
    R: PropertyRepository + 'static,
{
    match api.service.get(PropertyId(id)) {
        Ok(property) => (StatusCode::OK, axum::Json(property)).into_response(),
        Err(err) => service_error(err),
    }
}

pub(crate) async fn filter_options_handler() -> Response {
    (StatusCode::OK, axum::Json(FilterOptions::panel())).into_response()
}

pub(crate) async fn analytics_handler<R>(State(api): State<ListingApi<R>>) -> Response
where
    R: PropertyRepository + 'static,
{
    match api.service.analytics() {
        Ok(analytics) => (StatusCode::OK, axum::Json(analytics)).into_response(),
        Err(err) => service_error(err),
    }
}

pub(crate) async fn login_handler<R>(
    State(api): State<ListingApi<R>>,
    axum::Json(request): axum::Json<LoginRequest>,
) -> Response
where
    R: PropertyRepository + 'static,
{
    if request.username.is_empty() || request.password.is_empty() {
        let payload = json!({
            "success": false,
            "message": "Username and password are required",
        });
        return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
    }

    let now = Utc::now();
    api.sessions.purge_expired(now);
    match api.sessions.login(&request.username, &request.password, now) {
        Ok(session) => {
            info!(username = %session.username, expires_at = %session.expires_at, "admin login");
            let payload = json!({
                "success": true,
                "token": session.token,
                "expires_at": session.expires_at,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => {
            warn!(username = %request.username, "admin login rejected");
            unauthorized(err)
        }
    }
}

pub(crate) async fn logout_handler<R>(
    State(api): State<ListingApi<R>>,
    headers: HeaderMap,
) -> Response
where
    R: PropertyRepository + 'static,
{
    let context = match authorize(&api.sessions, &headers) {
        Ok(context) => context,
        Err(response) => return response,
    };

    api.sessions.revoke(bearer_token(&headers));
    info!(username = %context.username, "admin logout");
    let payload = json!({ "success": true, "message": "Logged out" });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn admin_list_handler<R>(
    State(api): State<ListingApi<R>>,
    headers: HeaderMap,
) -> Response
where
    R: PropertyRepository + 'static,
{
    if let Err(response) = authorize(&api.sessions, &headers) {
        return response;
    }

    match api.service.catalog() {
        Ok(properties) => (StatusCode::OK, axum::Json(properties)).into_response(),
        Err(err) => service_error(err),
    }
}

pub(crate) async fn create_handler<R>(
    State(api): State<ListingApi<R>>,
    headers: HeaderMap,
    axum::Json(draft): axum::Json<PropertyDraft>,
) -> Response
where
    R: PropertyRepository + 'static,
{
    if let Err(response) = authorize(&api.sessions, &headers) {
        return response;
    }

    match api.service.create(draft, Utc::now()) {
        Ok(property) => {
            let payload = json!({ "success": true, "property": property });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(err) => service_error(err),
    }
}

pub(crate) async fn update_handler<R>(
    State(api): State<ListingApi<R>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    axum::Json(patch): axum::Json<PropertyPatch>,
) -> Response
where
    R: PropertyRepository + 'static,
{
    if let Err(response) = authorize(&api.sessions, &headers) {
        return response;
    }

    match api.service.update(PropertyId(id), patch, Utc::now()) {
        Ok(property) => {
            let payload = json!({ "success": true, "property": property });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => service_error(err),
    }
}

pub(crate) async fn delete_handler<R>(
    State(api): State<ListingApi<R>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response
where
    R: PropertyRepository + 'static,
{
    if let Err(response) = authorize(&api.sessions, &headers) {
        return response;
    }

    match api.service.delete(PropertyId(id)) {
        Ok(_) => {
            let payload = json!({ "success": true, "message": "Property deleted" });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => service_error(err),
    }
}

fn bearer_token(headers: &HeaderMap) -> &str {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_bearer)
        .unwrap_or_default()
}

fn authorize(sessions: &SessionStore, headers: &HeaderMap) -> Result<SessionContext, Response> {
    sessions
        .authenticate(bearer_token(headers), Utc::now())
        .map_err(unauthorized)
}

fn unauthorized(err: SessionError) -> Response {
    let payload = json!({ "success": false, "message": err.to_string() });
    (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
}

fn service_error(err: ListingServiceError) -> Response {
    let status = listing_status(&err);
    let message = match &err {
        ListingServiceError::Repository(RepositoryError::NotFound) => {
            "Property not found".to_string()
        }
        other => other.to_string(),
    };
    if status.is_server_error() {
        warn!(error = %err, "listing request failed");
    }
    let payload = json!({ "success": false, "message": message });
    (status, axum::Json(payload)).into_response()
}
