//! Handlers for `/students`, `/parents` and `/coaches`.

use super::{AppState, context::RequestContext, error::ApiResult};
use crate::{
    core::{
        coach::{self, CoachUpdate, CoachView, NewCoach},
        parent::{self, NewParent, ParentUpdate},
        student::{self, NewStudent, StudentFilter, StudentUpdate},
    },
    entities::{parent as parent_entity, student as student_entity},
    errors::Error,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

/// GET /students
pub async fn list_students(
    State(state): State<AppState>,
    Query(filter): Query<StudentFilter>,
) -> ApiResult<Json<Vec<student_entity::Model>>> {
    let students = student::get_all_students(&state.db).await?;
    Ok(Json(student::filter_students(students, &filter)))
}

/// GET /students/:id
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<student_entity::Model>> {
    let student = student::get_student_by_id(&state.db, id)
        .await?
        .ok_or_else(|| Error::not_found("students", id))?;
    Ok(Json(student))
}

/// POST /students
#[instrument(skip_all, fields(user = %ctx.user_id, role = %ctx.role))]
pub async fn create_student(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(input): Json<NewStudent>,
) -> ApiResult<(StatusCode, Json<student_entity::Model>)> {
    let created = student::create_student(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /students/:id
#[instrument(skip_all, fields(user = %ctx.user_id, role = %ctx.role, id = id))]
pub async fn update_student(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(changes): Json<StudentUpdate>,
) -> ApiResult<Json<student_entity::Model>> {
    Ok(Json(student::update_student(&state.db, id, changes).await?))
}

/// DELETE /students/:id
#[instrument(skip_all, fields(user = %ctx.user_id, role = %ctx.role, id = id))]
pub async fn delete_student(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    student::delete_student(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /parents
pub async fn list_parents(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<parent_entity::Model>>> {
    Ok(Json(parent::get_all_parents(&state.db).await?))
}

/// GET /parents/:id
pub async fn get_parent(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<parent_entity::Model>> {
    let parent = parent::get_parent_by_id(&state.db, id)
        .await?
        .ok_or_else(|| Error::not_found("parents", id))?;
    Ok(Json(parent))
}

/// POST /parents
#[instrument(skip_all, fields(user = %ctx.user_id, role = %ctx.role))]
pub async fn create_parent(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(input): Json<NewParent>,
) -> ApiResult<(StatusCode, Json<parent_entity::Model>)> {
    let created = parent::create_parent(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /parents/:id
#[instrument(skip_all, fields(user = %ctx.user_id, role = %ctx.role, id = id))]
pub async fn update_parent(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(changes): Json<ParentUpdate>,
) -> ApiResult<Json<parent_entity::Model>> {
    Ok(Json(parent::update_parent(&state.db, id, changes).await?))
}

/// DELETE /parents/:id
#[instrument(skip_all, fields(user = %ctx.user_id, role = %ctx.role, id = id))]
pub async fn delete_parent(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    parent::delete_parent(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /coaches
pub async fn list_coaches(State(state): State<AppState>) -> ApiResult<Json<Vec<CoachView>>> {
    Ok(Json(coach::get_coach_views(&state.db).await?))
}

/// GET /coaches/:id
pub async fn get_coach(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<CoachView>> {
    Ok(Json(coach::get_coach_view(&state.db, id).await?))
}

/// POST /coaches
#[instrument(skip_all, fields(user = %ctx.user_id, role = %ctx.role))]
pub async fn create_coach(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(input): Json<NewCoach>,
) -> ApiResult<(StatusCode, Json<CoachView>)> {
    let created = coach::create_coach(&state.db, input).await?;
    let view = coach::get_coach_view(&state.db, created.id).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// PUT /coaches/:id
#[instrument(skip_all, fields(user = %ctx.user_id, role = %ctx.role, id = id))]
pub async fn update_coach(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(changes): Json<CoachUpdate>,
) -> ApiResult<Json<CoachView>> {
    coach::update_coach(&state.db, id, changes).await?;
    Ok(Json(coach::get_coach_view(&state.db, id).await?))
}

/// DELETE /coaches/:id
#[instrument(skip_all, fields(user = %ctx.user_id, role = %ctx.role, id = id))]
pub async fn delete_coach(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    coach::delete_coach(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
