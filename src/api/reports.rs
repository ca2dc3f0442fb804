//! Read-only aggregate endpoints.

use super::{AppState, error::ApiResult};
use crate::core::report::{self, CoachRevenue, DashboardStats, UpcomingDuesReport};
use axum::{Json, extract::State};
use chrono::Utc;
use serde_json::{Value, json};

/// GET /dashboard
pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    Ok(Json(report::get_dashboard(&state.db, Utc::now()).await?))
}

/// GET /reports/upcoming-dues
pub async fn upcoming_dues(
    State(state): State<AppState>,
) -> ApiResult<Json<UpcomingDuesReport>> {
    let window_days = state.config.ledger.upcoming_window_days;
    Ok(Json(
        report::get_upcoming_dues(&state.db, Utc::now(), window_days).await?,
    ))
}

/// GET /reports/coach-revenue
pub async fn coach_revenue(State(state): State<AppState>) -> ApiResult<Json<Vec<CoachRevenue>>> {
    Ok(Json(report::get_coach_revenue(&state.db).await?))
}

/// GET /health. Pings the database so a dead connection shows up as a 500.
pub async fn health(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    state.db.ping().await.map_err(crate::errors::Error::from)?;
    Ok(Json(json!({ "status": "ok" })))
}
