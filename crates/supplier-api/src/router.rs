//! Route table and HTTP layers

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use supplier_shared::config::CorsSettings;

use crate::handlers::{auth, health, supplier};
use crate::state::AppState;

pub fn build_router(state: AppState, cors: &CorsSettings) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route(
            "/supplier",
            get(supplier::list_suppliers).post(supplier::create_supplier),
        )
        .route(
            "/supplier/{id}",
            get(supplier::get_supplier)
                .put(supplier::update_supplier)
                .delete(supplier::delete_supplier),
        )
        .with_state(state)
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(settings: &CorsSettings) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origins(settings))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// `*` anywhere in the list opens CORS to every origin.
fn allowed_origins(settings: &CorsSettings) -> AllowOrigin {
    if settings.allowed_origins.iter().any(|o| o == "*") {
        return Any.into();
    }

    let origins: Vec<HeaderValue> = settings
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    origins.into()
}
