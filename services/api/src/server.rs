use crate::cli::ServeArgs;
use crate::infra::{load_catalog_source, AppState, InMemoryPropertyRepository};
use crate::routes::with_listing_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use estate_listings::config::AppConfig;
use estate_listings::error::AppError;
use estate_listings::listings::{ListingApi, ListingService, ListingServiceError};
use estate_listings::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(catalog) = args.catalog.take() {
        config.listings.catalog_path = Some(catalog);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = load_catalog_source(config.listings.catalog_path.as_deref())?;
    let repository = Arc::new(
        InMemoryPropertyRepository::with_catalog(catalog).map_err(ListingServiceError::from)?,
    );
    let service = Arc::new(ListingService::new(repository, config.listings.per_page)?);
    let sessions = Arc::new(config.admin.session_store());

    let app = with_listing_routes(ListingApi::new(service, sessions))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        per_page = config.listings.per_page,
        session_ttl_minutes = config.admin.session_ttl_minutes,
        "estate listings service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
