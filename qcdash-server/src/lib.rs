//! qcdash-server library - Quality Compliance Dashboard service
//!
//! JSON API over the project record store plus the dashboard KPI endpoint.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use qcdash_common::KpiSettings;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod storage;

use storage::{DocumentStorage, MAX_UPLOAD_BYTES};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Uploaded document store
    pub storage: DocumentStorage,
    /// KPI aggregation constants
    pub kpi: KpiSettings,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, storage: DocumentStorage, kpi: KpiSettings) -> Self {
        Self { db, storage, kpi }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let compliance = Router::new()
        .route(
            "/metrics",
            get(api::metrics::list_metrics)
                .post(api::metrics::create_metric)
                .put(api::metrics::update_metric)
                .delete(api::metrics::delete_metric),
        )
        .route(
            "/capas",
            get(api::capas::list_capas)
                .post(api::capas::create_capa)
                .put(api::capas::update_capa)
                .delete(api::capas::delete_capa),
        )
        .route(
            "/training",
            get(api::training::list_training)
                .post(api::training::create_training)
                .put(api::training::update_training)
                .delete(api::training::delete_training),
        )
        .route(
            "/audits",
            get(api::audits::list_audits)
                .post(api::audits::create_audit)
                .put(api::audits::update_audit)
                .delete(api::audits::delete_audit),
        )
        .route("/audits/:id/severity", get(api::audits::audit_severity))
        .route(
            "/findings",
            get(api::findings::list_findings)
                .post(api::findings::create_finding)
                .put(api::findings::update_finding)
                .delete(api::findings::delete_finding),
        )
        .route(
            "/areas",
            get(api::areas::list_areas)
                .post(api::areas::create_area)
                .put(api::areas::update_area)
                .delete(api::areas::delete_area),
        )
        .route(
            "/documents",
            get(api::documents::list_documents).delete(api::documents::delete_document),
        )
        .route(
            "/documents/upload",
            post(api::documents::upload_document)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        );

    let files = ServeDir::new(state.storage.root());

    Router::new()
        .route(
            "/api/projects",
            get(api::projects::list_projects).post(api::projects::create_project),
        )
        .route("/api/projects/default", get(api::projects::default_project))
        .route("/api/dashboard", get(api::dashboard::get_dashboard))
        .route("/api/dashboard/kpis", post(api::dashboard::compute_kpis))
        .route("/api/buildinfo", get(api::get_build_info))
        .nest("/api/compliance", compliance)
        .nest_service("/files", files)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
