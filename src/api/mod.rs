//! REST surface over the collection store.
//!
//! Handlers are thin: they extract input, call into [`crate::core`] and wrap
//! the result. Error mapping lives in [`error`].

use crate::config::settings::AppConfig;
use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

mod billing;
/// Acting-user extraction from request headers
pub mod context;
/// Error to HTTP response mapping
pub mod error;
mod people;
mod reports;

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Connection pool
    pub db: Arc<DatabaseConnection>,
    /// Loaded settings
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Bundles a connection and settings for the router.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        Self {
            db: Arc::new(db),
            config: Arc::new(config),
        }
    }
}

/// Builds the full route table.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route(
            "/students",
            get(people::list_students).post(people::create_student),
        )
        .route(
            "/students/:id",
            get(people::get_student)
                .put(people::update_student)
                .delete(people::delete_student),
        )
        .route(
            "/parents",
            get(people::list_parents).post(people::create_parent),
        )
        .route(
            "/parents/:id",
            get(people::get_parent)
                .put(people::update_parent)
                .delete(people::delete_parent),
        )
        .route(
            "/coaches",
            get(people::list_coaches).post(people::create_coach),
        )
        .route(
            "/coaches/:id",
            get(people::get_coach)
                .put(people::update_coach)
                .delete(people::delete_coach),
        )
        .route(
            "/packages",
            get(billing::list_packages).post(billing::create_package),
        )
        .route(
            "/packages/:id",
            get(billing::get_package)
                .put(billing::update_package)
                .delete(billing::delete_package),
        )
        .route(
            "/contracts",
            get(billing::list_contracts).post(billing::create_contract),
        )
        .route(
            "/contracts/:id",
            get(billing::get_contract)
                .put(billing::update_contract)
                .delete(billing::delete_contract),
        )
        .route(
            "/invoices",
            get(billing::list_invoices).post(billing::create_invoice),
        )
        .route(
            "/invoices/:id",
            get(billing::get_invoice)
                .put(billing::update_invoice)
                .delete(billing::delete_invoice),
        )
        .route(
            "/payments",
            get(billing::list_payments).post(billing::create_payment),
        )
        .route(
            "/payments/:id",
            get(billing::get_payment).delete(billing::delete_payment),
        )
        .route(
            "/paymentSchedules",
            get(billing::list_schedules).post(billing::create_schedule),
        )
        .route(
            "/paymentSchedules/bulk",
            post(billing::create_bulk_schedules),
        )
        .route(
            "/paymentSchedules/:id",
            get(billing::get_schedule)
                .put(billing::update_schedule)
                .delete(billing::delete_schedule),
        )
        .route("/dashboard", get(reports::dashboard))
        .route("/reports/upcoming-dues", get(reports::upcoming_dues))
        .route("/reports/coach-revenue", get(reports::coach_revenue))
        .route("/health", get(reports::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
