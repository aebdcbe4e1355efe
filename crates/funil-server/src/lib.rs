#![forbid(unsafe_code)]
//! Funil HTTP service.
//!
//! The shell around `funil-calc` and `funil-model`: an axum router with the
//! capture and dashboard flows, a SQLite-backed lead store injected through
//! [`AppState`], env-driven configuration, and plaintext metrics.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::atomic::{AtomicBool, AtomicU64};
use std::sync::Arc;

mod config;
mod http;
mod store;
mod telemetry;

pub use config::{validate_startup_config, ApiConfig, StoreConfig, CONFIG_SCHEMA_VERSION};
pub use store::{FakeLeadStore, LeadStore, SqliteLeadStore, StoreError};
pub use telemetry::RequestMetrics;

pub const CRATE_NAME: &str = "funil-server";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LeadStore>,
    pub api: ApiConfig,
    pub ready: Arc<AtomicBool>,
    pub accepting_requests: Arc<AtomicBool>,
    pub metrics: Arc<RequestMetrics>,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn LeadStore>) -> Self {
        Self::with_config(store, ApiConfig::default())
    }

    #[must_use]
    pub fn with_config(store: Arc<dyn LeadStore>, api: ApiConfig) -> Self {
        Self {
            store,
            api,
            ready: Arc::new(AtomicBool::new(true)),
            accepting_requests: Arc::new(AtomicBool::new(true)),
            metrics: Arc::new(RequestMetrics::default()),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(http::handlers::healthz_handler))
        .route("/readyz", get(http::handlers::readyz_handler))
        .route("/metrics", get(http::handlers::metrics_handler))
        .route("/v1/version", get(http::handlers::version_handler))
        .route(
            "/",
            get(http::handlers::capture_form_handler).post(http::handlers::capture_submit_handler),
        )
        .route(
            "/dashboard",
            get(http::handlers::dashboard_view_handler)
                .post(http::handlers::dashboard_project_handler),
        )
        .route("/login", get(http::handlers::legacy_login_handler))
        .route("/logout", post(http::handlers::logout_handler))
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .with_state(state)
}
