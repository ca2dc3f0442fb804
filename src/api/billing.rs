//! Handlers for packages, contracts, invoices, payments and payment schedules.

use super::{AppState, context::RequestContext, error::ApiResult};
use crate::{
    core::{
        contract::{self, ContractUpdate, NewContract},
        invoice::{self, InvoiceFilter, InvoiceUpdate, InvoiceView, NewInvoice},
        package::{self, NewPackage, PackageUpdate, PackageView},
        payment::{self, NewPayment, PaymentFilter},
        schedule::{
            self, BulkScheduleRequest, NewSchedule, ScheduleFilter, ScheduleUpdate, ScheduleView,
        },
    },
    entities::{contract as contract_entity, payment as payment_entity},
    errors::Error,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use tracing::instrument;

/// GET /packages
pub async fn list_packages(State(state): State<AppState>) -> ApiResult<Json<Vec<PackageView>>> {
    let packages = package::get_all_packages(&state.db).await?;
    Ok(Json(packages.into_iter().map(PackageView::from).collect()))
}

/// GET /packages/:id
pub async fn get_package(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<PackageView>> {
    let package = package::get_package_by_id(&state.db, id)
        .await?
        .ok_or_else(|| Error::not_found("packages", id))?;
    Ok(Json(package.into()))
}

/// POST /packages
#[instrument(skip_all, fields(user = %ctx.user_id, role = %ctx.role))]
pub async fn create_package(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(input): Json<NewPackage>,
) -> ApiResult<(StatusCode, Json<PackageView>)> {
    let created = package::create_package(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// PUT /packages/:id
#[instrument(skip_all, fields(user = %ctx.user_id, role = %ctx.role, id = id))]
pub async fn update_package(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(changes): Json<PackageUpdate>,
) -> ApiResult<Json<PackageView>> {
    let updated = package::update_package(&state.db, id, changes).await?;
    Ok(Json(updated.into()))
}

/// DELETE /packages/:id
#[instrument(skip_all, fields(user = %ctx.user_id, role = %ctx.role, id = id))]
pub async fn delete_package(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    package::delete_package(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /contracts
pub async fn list_contracts(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<contract_entity::Model>>> {
    Ok(Json(contract::get_all_contracts(&state.db).await?))
}

/// GET /contracts/:id
pub async fn get_contract(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<contract_entity::Model>> {
    let contract = contract::get_contract_by_id(&state.db, id)
        .await?
        .ok_or_else(|| Error::not_found("contracts", id))?;
    Ok(Json(contract))
}

/// POST /contracts
#[instrument(skip_all, fields(user = %ctx.user_id, role = %ctx.role))]
pub async fn create_contract(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(input): Json<NewContract>,
) -> ApiResult<(StatusCode, Json<contract_entity::Model>)> {
    let created = contract::create_contract(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /contracts/:id
#[instrument(skip_all, fields(user = %ctx.user_id, role = %ctx.role, id = id))]
pub async fn update_contract(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(changes): Json<ContractUpdate>,
) -> ApiResult<Json<contract_entity::Model>> {
    Ok(Json(contract::update_contract(&state.db, id, changes).await?))
}

/// DELETE /contracts/:id
#[instrument(skip_all, fields(user = %ctx.user_id, role = %ctx.role, id = id))]
pub async fn delete_contract(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    contract::delete_contract(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /invoices
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(filter): Query<InvoiceFilter>,
) -> ApiResult<Json<Vec<InvoiceView>>> {
    Ok(Json(
        invoice::get_invoice_views(&state.db, &filter, Utc::now()).await?,
    ))
}

/// GET /invoices/:id
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<InvoiceView>> {
    Ok(Json(invoice::get_invoice_view(&state.db, id, Utc::now()).await?))
}

/// POST /invoices
#[instrument(skip_all, fields(user = %ctx.user_id, role = %ctx.role))]
pub async fn create_invoice(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(input): Json<NewInvoice>,
) -> ApiResult<(StatusCode, Json<InvoiceView>)> {
    let created = invoice::create_invoice(&state.db, input).await?;
    let view = invoice::get_invoice_view(&state.db, created.id, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// PUT /invoices/:id
#[instrument(skip_all, fields(user = %ctx.user_id, role = %ctx.role, id = id))]
pub async fn update_invoice(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(changes): Json<InvoiceUpdate>,
) -> ApiResult<Json<InvoiceView>> {
    invoice::update_invoice(&state.db, id, changes).await?;
    Ok(Json(invoice::get_invoice_view(&state.db, id, Utc::now()).await?))
}

/// DELETE /invoices/:id
#[instrument(skip_all, fields(user = %ctx.user_id, role = %ctx.role, id = id))]
pub async fn delete_invoice(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    invoice::delete_invoice(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /payments
pub async fn list_payments(
    State(state): State<AppState>,
    Query(filter): Query<PaymentFilter>,
) -> ApiResult<Json<Vec<payment_entity::Model>>> {
    let payments = payment::get_all_payments(&state.db).await?;
    Ok(Json(payment::filter_payments(payments, &filter)))
}

/// GET /payments/:id
pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<payment_entity::Model>> {
    let payment = payment::get_payment_by_id(&state.db, id)
        .await?
        .ok_or_else(|| Error::not_found("payments", id))?;
    Ok(Json(payment))
}

/// POST /payments
#[instrument(skip_all, fields(user = %ctx.user_id, role = %ctx.role))]
pub async fn create_payment(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(input): Json<NewPayment>,
) -> ApiResult<(StatusCode, Json<payment_entity::Model>)> {
    let created = payment::create_payment(&state.db, &state.config.ledger, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /payments/:id
#[instrument(skip_all, fields(user = %ctx.user_id, role = %ctx.role, id = id))]
pub async fn delete_payment(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    payment::delete_payment(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /paymentSchedules
pub async fn list_schedules(
    State(state): State<AppState>,
    Query(filter): Query<ScheduleFilter>,
) -> ApiResult<Json<Vec<ScheduleView>>> {
    Ok(Json(
        schedule::get_schedule_views(&state.db, &filter, Utc::now()).await?,
    ))
}

/// GET /paymentSchedules/:id
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ScheduleView>> {
    Ok(Json(
        schedule::get_schedule_view(&state.db, id, Utc::now()).await?,
    ))
}

/// POST /paymentSchedules
#[instrument(skip_all, fields(user = %ctx.user_id, role = %ctx.role))]
pub async fn create_schedule(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(input): Json<NewSchedule>,
) -> ApiResult<(StatusCode, Json<ScheduleView>)> {
    let created = schedule::create_schedule(&state.db, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(schedule::schedule_view(created, Utc::now())),
    ))
}

/// POST /paymentSchedules/bulk
#[instrument(
    skip_all,
    fields(user = %ctx.user_id, role = %ctx.role, student_id = request.student_id)
)]
pub async fn create_bulk_schedules(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(request): Json<BulkScheduleRequest>,
) -> ApiResult<(StatusCode, Json<Vec<ScheduleView>>)> {
    let created = schedule::create_bulk_schedules(&state.db, request).await?;
    let now = Utc::now();
    Ok((
        StatusCode::CREATED,
        Json(
            created
                .into_iter()
                .map(|s| schedule::schedule_view(s, now))
                .collect(),
        ),
    ))
}

/// PUT /paymentSchedules/:id
#[instrument(skip_all, fields(user = %ctx.user_id, role = %ctx.role, id = id))]
pub async fn update_schedule(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(changes): Json<ScheduleUpdate>,
) -> ApiResult<Json<ScheduleView>> {
    let updated = schedule::update_schedule(&state.db, id, changes).await?;
    Ok(Json(schedule::schedule_view(updated, Utc::now())))
}

/// DELETE /paymentSchedules/:id
#[instrument(skip_all, fields(user = %ctx.user_id, role = %ctx.role, id = id))]
pub async fn delete_schedule(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    schedule::delete_schedule(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
