//! Payment schedule business logic - installment plans and their statuses.
//!
//! Installments store what is owed and what has been received. Their status
//! (upcoming, due, overdue, partial, paid) is derived at read time.
//!
//! Bulk generation splits a total evenly across N monthly installments. Each
//! installment is rounded down to kuruş and the last one absorbs the remainder,
//! so the plan always sums to the requested total.

use super::{
    money::{ensure_non_negative, ensure_positive, round2},
    patch::double_option,
    status::{ScheduleStatus, derive_schedule_status},
};
use crate::{
    entities::{PaymentSchedule, payment_schedule},
    errors::{Error, Result},
};
use chrono::{DateTime, Months, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};

const COLLECTION: &str = "paymentSchedules";
const DEFAULT_DESCRIPTION: &str = "Monthly payment";
/// Fifty years of monthly installments
pub const MAX_INSTALLMENTS: i32 = 600;

/// Payload for adding a single installment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSchedule {
    pub student_id: i64,
    pub contract_id: Option<i64>,
    pub installment_number: i32,
    pub total_installments: i32,
    pub due_date: DateTime<Utc>,
    pub amount: f64,
    #[serde(default)]
    pub paid_amount: f64,
    #[serde(default)]
    pub description: String,
}

/// Partial update for an installment; typically used to record `paidAmount`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleUpdate {
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    pub contract_id: Option<Option<i64>>,
    pub installment_number: Option<i32>,
    pub total_installments: Option<i32>,
    pub due_date: Option<DateTime<Utc>>,
    pub amount: Option<f64>,
    pub paid_amount: Option<f64>,
    pub description: Option<String>,
}

/// Request for generating a whole installment plan at once.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkScheduleRequest {
    pub student_id: i64,
    pub contract_id: Option<i64>,
    /// Amount to spread across the plan
    pub total_amount: f64,
    /// Number of monthly installments
    pub installments: i32,
    /// Due date of the first installment; defaults to now
    pub start_date: Option<DateTime<Utc>>,
    /// Suffix for each installment's description
    pub description: Option<String>,
}

/// One row of a generated plan, before it is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedInstallment {
    pub installment_number: i32,
    pub due_date: DateTime<Utc>,
    pub amount: f64,
    pub description: String,
}

/// An installment as served over REST.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleView {
    /// Stored installment record
    #[serde(flatten)]
    pub schedule: payment_schedule::Model,
    /// Amount still owed, never negative
    pub remaining_amount: f64,
    /// Derived lifecycle state
    pub status: ScheduleStatus,
}

/// Query filter for `GET /paymentSchedules`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleFilter {
    /// Only installments currently in this state
    pub status: Option<ScheduleStatus>,
    /// Only installments owed by this student
    pub student_id: Option<i64>,
}

/// Builds the read view of one installment.
#[must_use]
pub fn schedule_view(schedule: payment_schedule::Model, now: DateTime<Utc>) -> ScheduleView {
    let status = derive_schedule_status(schedule.paid_amount, schedule.amount, schedule.due_date, now);
    let remaining_amount = round2((schedule.amount - schedule.paid_amount).max(0.0));
    ScheduleView {
        schedule,
        remaining_amount,
        status,
    }
}

fn validate_position(installment_number: i32, total_installments: i32) -> Result<()> {
    if total_installments < 1 || !(1..=total_installments).contains(&installment_number) {
        return Err(Error::validation(format!(
            "installment {installment_number}/{total_installments} is out of range"
        )));
    }
    Ok(())
}

/// Lays out `installments` monthly rows starting at `start_date`.
///
/// Pure; nothing is written. The last row takes the rounding remainder.
pub fn plan_installments(
    total_amount: f64,
    installments: i32,
    start_date: DateTime<Utc>,
    description: &str,
) -> Result<Vec<PlannedInstallment>> {
    let total_amount = ensure_positive(total_amount)?;
    let count = u32::try_from(installments)
        .ok()
        .filter(|n| (1..=MAX_INSTALLMENTS.unsigned_abs()).contains(n))
        .ok_or_else(|| {
            Error::validation(format!(
                "installments must be within 1-{MAX_INSTALLMENTS}, got {installments}"
            ))
        })?;

    // Floor to kuruş so the remainder left for the last row is never negative
    let cents = (total_amount * 100.0).round();
    let base = (cents / f64::from(count)).floor() / 100.0;
    let mut planned = Vec::with_capacity(count as usize);
    for offset in 0..count {
        let number = offset + 1;
        let due_date = start_date
            .checked_add_months(Months::new(offset))
            .ok_or_else(|| Error::validation("installment due date out of range"))?;
        let amount = if number == count {
            round2(total_amount - base * f64::from(count - 1))
        } else {
            base
        };
        planned.push(PlannedInstallment {
            installment_number: i32::try_from(number)
                .map_err(|_| Error::validation("too many installments"))?,
            due_date,
            amount,
            description: format!("{number}/{count} - {description}"),
        });
    }
    Ok(planned)
}

/// Retrieves all installments ordered by due date.
pub async fn get_all_schedules(db: &DatabaseConnection) -> Result<Vec<payment_schedule::Model>> {
    PaymentSchedule::find()
        .order_by_asc(payment_schedule::Column::DueDate)
        .order_by_asc(payment_schedule::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an installment by id.
pub async fn get_schedule_by_id(
    db: &DatabaseConnection,
    schedule_id: i64,
) -> Result<Option<payment_schedule::Model>> {
    PaymentSchedule::find_by_id(schedule_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// All installments with statuses evaluated at `now`, filtered in memory.
pub async fn get_schedule_views(
    db: &DatabaseConnection,
    filter: &ScheduleFilter,
    now: DateTime<Utc>,
) -> Result<Vec<ScheduleView>> {
    let schedules = get_all_schedules(db).await?;
    Ok(schedules
        .into_iter()
        .filter(|s| filter.student_id.is_none_or(|id| s.student_id == id))
        .map(|s| schedule_view(s, now))
        .filter(|v| filter.status.is_none_or(|status| v.status == status))
        .collect())
}

/// One installment with its status evaluated at `now`.
pub async fn get_schedule_view(
    db: &DatabaseConnection,
    schedule_id: i64,
    now: DateTime<Utc>,
) -> Result<ScheduleView> {
    let schedule = get_schedule_by_id(db, schedule_id)
        .await?
        .ok_or_else(|| Error::not_found(COLLECTION, schedule_id))?;
    Ok(schedule_view(schedule, now))
}

/// Adds a single installment.
pub async fn create_schedule(
    db: &DatabaseConnection,
    input: NewSchedule,
) -> Result<payment_schedule::Model> {
    validate_position(input.installment_number, input.total_installments)?;
    let amount = ensure_non_negative(input.amount)?;
    let paid_amount = ensure_non_negative(input.paid_amount)?;

    let model = payment_schedule::ActiveModel {
        student_id: Set(input.student_id),
        contract_id: Set(input.contract_id),
        installment_number: Set(input.installment_number),
        total_installments: Set(input.total_installments),
        due_date: Set(input.due_date),
        amount: Set(amount),
        paid_amount: Set(paid_amount),
        description: Set(input.description),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    tracing::info!(schedule_id = created.id, "Payment schedule created");
    Ok(created)
}

/// Generates and stores a full installment plan in one transaction.
pub async fn create_bulk_schedules(
    db: &DatabaseConnection,
    request: BulkScheduleRequest,
) -> Result<Vec<payment_schedule::Model>> {
    let start_date = request.start_date.unwrap_or_else(Utc::now);
    let description = request
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(DEFAULT_DESCRIPTION);
    let planned = plan_installments(
        request.total_amount,
        request.installments,
        start_date,
        description,
    )?;

    let txn = db.begin().await?;
    let now = Utc::now();
    let mut created = Vec::with_capacity(planned.len());
    for row in planned {
        let model = payment_schedule::ActiveModel {
            student_id: Set(request.student_id),
            contract_id: Set(request.contract_id),
            installment_number: Set(row.installment_number),
            total_installments: Set(request.installments),
            due_date: Set(row.due_date),
            amount: Set(row.amount),
            paid_amount: Set(0.0),
            description: Set(row.description),
            created_at: Set(now),
            updated_at: Set(None),
            ..Default::default()
        };
        created.push(model.insert(&txn).await?);
    }
    txn.commit().await?;

    tracing::info!(
        student_id = request.student_id,
        installments = created.len(),
        total_amount = request.total_amount,
        "Installment plan generated"
    );
    Ok(created)
}

/// Applies a partial update and stamps `updated_at`.
pub async fn update_schedule(
    db: &DatabaseConnection,
    schedule_id: i64,
    changes: ScheduleUpdate,
) -> Result<payment_schedule::Model> {
    let existing = get_schedule_by_id(db, schedule_id)
        .await?
        .ok_or_else(|| Error::not_found(COLLECTION, schedule_id))?;

    validate_position(
        changes
            .installment_number
            .unwrap_or(existing.installment_number),
        changes
            .total_installments
            .unwrap_or(existing.total_installments),
    )?;

    let mut model: payment_schedule::ActiveModel = existing.into();
    if let Some(student_id) = changes.student_id {
        model.student_id = Set(student_id);
    }
    if let Some(contract_id) = changes.contract_id {
        model.contract_id = Set(contract_id);
    }
    if let Some(number) = changes.installment_number {
        model.installment_number = Set(number);
    }
    if let Some(total) = changes.total_installments {
        model.total_installments = Set(total);
    }
    if let Some(due_date) = changes.due_date {
        model.due_date = Set(due_date);
    }
    if let Some(amount) = changes.amount {
        model.amount = Set(ensure_non_negative(amount)?);
    }
    if let Some(paid_amount) = changes.paid_amount {
        model.paid_amount = Set(ensure_non_negative(paid_amount)?);
    }
    if let Some(description) = changes.description {
        model.description = Set(description);
    }
    model.updated_at = Set(Some(Utc::now()));

    let updated = model.update(db).await?;
    tracing::info!(schedule_id, "Payment schedule updated");
    Ok(updated)
}

/// Hard-deletes an installment.
pub async fn delete_schedule(db: &DatabaseConnection, schedule_id: i64) -> Result<()> {
    let result = PaymentSchedule::delete_by_id(schedule_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found(COLLECTION, schedule_id));
    }
    tracing::info!(schedule_id, "Payment schedule deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use chrono::{Datelike, Duration, TimeZone};

    fn jan_15() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_plan_twelve_even_installments() {
        let plan = plan_installments(1200.0, 12, jan_15(), "Aylık Ödeme").unwrap();
        assert_eq!(plan.len(), 12);
        for (i, row) in plan.iter().enumerate() {
            let expected_number = i32::try_from(i).unwrap() + 1;
            assert_eq!(row.installment_number, expected_number);
            assert_eq!(row.amount, 100.0);
            assert_eq!(row.due_date.day(), 15);
        }
        assert_eq!(plan[0].due_date, jan_15());
        assert_eq!(plan[1].due_date.month(), 2);
        assert_eq!(plan[11].due_date.month(), 12);
        assert_eq!(plan[2].description, "3/12 - Aylık Ödeme");
    }

    #[test]
    fn test_plan_last_installment_absorbs_remainder() {
        let plan = plan_installments(1000.0, 3, jan_15(), DEFAULT_DESCRIPTION).unwrap();
        let amounts: Vec<f64> = plan.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![333.33, 333.33, 333.34]);
        assert_eq!(round2(amounts.iter().sum()), 1000.0);
    }

    #[test]
    fn test_plan_clamps_to_month_end() {
        let jan_31 = Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).unwrap();
        let plan = plan_installments(300.0, 3, jan_31, DEFAULT_DESCRIPTION).unwrap();
        assert_eq!(plan[1].due_date.month(), 2);
        assert_eq!(plan[1].due_date.day(), 28);
        assert_eq!(plan[2].due_date.day(), 31);
    }

    #[test]
    fn test_plan_rejects_bad_input() {
        assert!(matches!(
            plan_installments(1200.0, 0, jan_15(), DEFAULT_DESCRIPTION),
            Err(Error::Validation { .. })
        ));
        assert!(matches!(
            plan_installments(0.0, 12, jan_15(), DEFAULT_DESCRIPTION),
            Err(Error::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_plan_caps_installment_count() {
        let plan =
            plan_installments(6000.0, MAX_INSTALLMENTS, jan_15(), DEFAULT_DESCRIPTION).unwrap();
        assert_eq!(plan.len(), 600);
        assert_eq!(plan[599].due_date.year(), 2074);

        for installments in [MAX_INSTALLMENTS + 1, i32::MAX, -1] {
            assert!(matches!(
                plan_installments(1200.0, installments, jan_15(), DEFAULT_DESCRIPTION),
                Err(Error::Validation { .. })
            ));
        }
    }

    #[test]
    fn test_plan_small_total_never_goes_negative() {
        let plan = plan_installments(0.05, 10, jan_15(), DEFAULT_DESCRIPTION).unwrap();
        assert!(plan.iter().all(|row| row.amount >= 0.0));
        assert_eq!(plan[0].amount, 0.0);
        assert_eq!(plan[9].amount, 0.05);
        assert_eq!(round2(plan.iter().map(|r| r.amount).sum()), 0.05);

        let plan = plan_installments(100.0, 7, jan_15(), DEFAULT_DESCRIPTION).unwrap();
        assert_eq!(plan[0].amount, 14.28);
        assert_eq!(plan[6].amount, 14.32);
    }

    #[tokio::test]
    async fn test_bulk_generation_persists_plan() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_test_student(&db, "Elif", "Kaya", None).await?;

        let created = create_bulk_schedules(
            &db,
            BulkScheduleRequest {
                student_id: student.id,
                contract_id: None,
                total_amount: 1200.0,
                installments: 12,
                start_date: Some(jan_15()),
                description: None,
            },
        )
        .await?;
        assert_eq!(created.len(), 12);
        assert!(created.iter().all(|s| s.amount == 100.0 && s.paid_amount == 0.0));
        assert_eq!(created[0].description, "1/12 - Monthly payment");

        let stored = get_all_schedules(&db).await?;
        assert_eq!(stored.len(), 12);
        Ok(())
    }

    #[tokio::test]
    async fn test_schedule_views_and_filters() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_test_student(&db, "Elif", "Kaya", None).await?;
        let other = create_test_student(&db, "Can", "Demir", None).await?;
        let now = Utc::now();

        create_test_schedule(&db, student.id, now - Duration::days(5), 100.0, 0.0).await?;
        create_test_schedule(&db, student.id, now + Duration::days(5), 100.0, 40.0).await?;
        create_test_schedule(&db, other.id, now + Duration::days(5), 100.0, 0.0).await?;

        let overdue = get_schedule_views(
            &db,
            &ScheduleFilter {
                status: Some(ScheduleStatus::Overdue),
                student_id: None,
            },
            now,
        )
        .await?;
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].remaining_amount, 100.0);

        let mine = get_schedule_views(
            &db,
            &ScheduleFilter {
                status: None,
                student_id: Some(student.id),
            },
            now,
        )
        .await?;
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[1].status, ScheduleStatus::Partial);
        assert_eq!(mine[1].remaining_amount, 60.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_recording_payment_on_schedule() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_test_student(&db, "Elif", "Kaya", None).await?;
        let now = Utc::now();
        let schedule =
            create_test_schedule(&db, student.id, now - Duration::days(2), 100.0, 0.0).await?;
        assert_eq!(
            get_schedule_view(&db, schedule.id, now).await?.status,
            ScheduleStatus::Overdue
        );

        update_schedule(
            &db,
            schedule.id,
            ScheduleUpdate {
                paid_amount: Some(100.0),
                ..Default::default()
            },
        )
        .await?;
        let view = get_schedule_view(&db, schedule.id, now).await?;
        assert_eq!(view.status, ScheduleStatus::Paid);
        assert_eq!(view.remaining_amount, 0.0);
        assert!(view.schedule.updated_at.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_schedule_validation_and_delete() -> Result<()> {
        let db = setup_test_db().await?;
        let out_of_range = create_schedule(
            &db,
            NewSchedule {
                student_id: 1,
                contract_id: None,
                installment_number: 13,
                total_installments: 12,
                due_date: Utc::now(),
                amount: 100.0,
                paid_amount: 0.0,
                description: String::new(),
            },
        )
        .await;
        assert!(matches!(out_of_range, Err(Error::Validation { .. })));

        let schedule = create_test_schedule(&db, 1, Utc::now(), 100.0, 0.0).await?;
        delete_schedule(&db, schedule.id).await?;
        assert!(matches!(
            get_schedule_view(&db, schedule.id, Utc::now()).await,
            Err(Error::NotFound { .. })
        ));
        Ok(())
    }
}
