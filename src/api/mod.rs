use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

mod admin;
pub mod auth;
mod error;
mod extract;
mod observability;
mod types;
mod validation;

pub use auth::{CurrentUser, authorize};
pub use error::ApiError;
pub use extract::ApiJson;
pub use types::*;

use crate::services::{AuthService, MatriculeService};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn matricule_service(&self) -> &Arc<dyn MatriculeService> {
        &self.shared.matricule_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let auth_routes = create_auth_router(state.clone());
    let admin_routes = create_admin_router(state.clone());

    let api_router = Router::new()
        .route("/health", get(observability::health))
        .nest("/v1/auth", auth_routes)
        .nest("/v1/admin", admin_routes)
        .with_state(state);

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(TraceLayer::new_for_http())
}

fn create_auth_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(auth::current_user))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
        .route("/register", post(auth::register))
        .route("/authenticate", post(auth::authenticate))
}

fn create_admin_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    // Static segments take priority over `/{id}`.
    Router::new()
        .route("/add-matricule", post(admin::add_matricule))
        .route("/matricules", get(admin::list_matricules))
        .route("/allusers", get(admin::list_users))
        .route("/update-user/{user_id}", put(admin::update_user))
        .route("/metrics", get(observability::get_metrics))
        .route("/{id}", get(admin::get_user).delete(admin::delete_user))
        .route_layer(middleware::from_fn(auth::require_admin))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
