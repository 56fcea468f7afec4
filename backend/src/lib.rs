//! Supply Chain Management API
//!
//! Products, suppliers, warehouses, purchase orders and the stock ledger that
//! ties them together.

use std::sync::Arc;

use axum::{http::HeaderValue, routing::get, Router};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::{AppError, AppResult};

use services::LedgerService;
use store::PgLedgerStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub ledger: LedgerService<PgLedgerStore>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        let ledger = LedgerService::from_config(PgLedgerStore::new(db.clone()), &config.ledger);
        Self {
            db,
            config: Arc::new(config),
            ledger,
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(allowed))
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);
    let timeout = TimeoutLayer::new(state.config.server.request_timeout());

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(timeout),
        )
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Supply Chain Management API v1.0"
}
