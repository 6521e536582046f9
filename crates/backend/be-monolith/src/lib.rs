use std::{net::SocketAddr, sync::Arc};

use axum::{Router, http::HeaderValue, http::StatusCode, routing::get};
use be_ai_service::init_ai_service;
use be_remote_db::DatabaseManager;
use be_search_service::{init_flight_service, init_hotel_service};
use be_trip_service::init_trip_service;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000";

/// Configuration for running the monolith server.
pub struct ServerConfig {
    pub database_url: String,
    pub http_addr: SocketAddr,
    /// Services whose provider configuration is missing are skipped with a
    /// warning instead of aborting startup.
    pub local_mode: bool,
    /// When this receiver gets a value, the server shuts down gracefully.
    pub shutdown: tokio::sync::watch::Receiver<()>,
}

fn allowed_origins(raw: &str) -> Vec<HeaderValue> {
    raw.split(',')
        .filter_map(|s| {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<HeaderValue>().ok()
        })
        .collect()
}

fn build_cors() -> CorsLayer {
    let raw = std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.into());

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins(&raw)))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

fn health_router() -> Router {
    Router::new().route("/health", get(|| async { StatusCode::OK }))
}

/// Unwraps a service router, or in local mode replaces a failed one with an
/// empty router so the rest of the server can still start.
fn mount(
    name: &str,
    router: anyhow::Result<Router>,
    local_mode: bool,
) -> Result<Router, Box<dyn std::error::Error + Send + Sync>> {
    match router {
        Ok(router) => Ok(router),
        Err(e) if local_mode => {
            tracing::warn!("{} service disabled in local mode: {:#}", name, e);
            Ok(Router::new())
        }
        Err(e) => {
            tracing::error!("Failed to initialize {} service: {:#}", name, e);
            Err(e.into())
        }
    }
}

pub async fn run_server(
    config: ServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let db_manager = Arc::new(DatabaseManager::new(&config.database_url).await?);

    let ai_router = mount("AI", init_ai_service(), config.local_mode)?;
    let flight_router = mount("Flight search", init_flight_service(), config.local_mode)?;
    let hotel_router = mount("Hotel search", init_hotel_service(), config.local_mode)?;
    let trip_router = init_trip_service(db_manager.clone());

    let http_router = ai_router
        .merge(flight_router)
        .merge(hotel_router)
        .merge(trip_router)
        .merge(health_router())
        .layer(build_cors());

    tracing::info!("Starting HTTP server at {}", config.http_addr);

    let mut http_shutdown = config.shutdown.clone();
    let http_listener = tokio::net::TcpListener::bind(config.http_addr).await?;
    let result = axum::serve(
        http_listener,
        http_router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        let _ = http_shutdown.changed().await;
        tracing::info!("Shutting down HTTP server...");
    })
    .await;

    db_manager.close().await;

    if let Err(e) = result {
        tracing::error!("HTTP server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
