//! Student business logic - enrolment, plan changes and in-memory filtering.
//!
//! Coach assignment lives only on the student (`coach_id`). Deleting a student
//! is a hard remove; nothing else is touched.

use super::{
    money::{ensure_day_of_month, ensure_non_negative},
    patch::double_option,
};
use crate::{
    entities::{ActivityStatus, Student, student},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;

const COLLECTION: &str = "students";

/// Payload for enrolling a student.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// School grade
    #[serde(default)]
    pub grade: String,
    /// School attended
    #[serde(default)]
    pub school: String,
    /// Guardian
    pub parent_id: Option<i64>,
    /// Defaults to `active`
    #[serde(default)]
    pub status: ActivityStatus,
    /// Free-form labels
    #[serde(default)]
    pub tags: Vec<String>,
    /// Assigned coach
    pub coach_id: Option<i64>,
    /// Monthly fee in TRY
    pub monthly_fee: Option<f64>,
    /// Day of month payments fall due
    pub payment_day: Option<i32>,
    /// Total plan amount in TRY
    pub total_amount: Option<f64>,
    /// Number of installments
    pub installments: Option<i32>,
    /// Plan start
    pub start_date: Option<DateTime<Utc>>,
    /// Plan end
    pub end_date: Option<DateTime<Utc>>,
}

/// Partial update for a student; absent fields are left unchanged and
/// nullable fields can be cleared with an explicit `null`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub grade: Option<String>,
    pub school: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<i64>>,
    pub status: Option<ActivityStatus>,
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub coach_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub monthly_fee: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub payment_day: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub total_amount: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub installments: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub start_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub end_date: Option<Option<DateTime<Utc>>>,
}

/// In-memory list filter (`GET /students?status=&search=`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentFilter {
    /// Only students with this status
    pub status: Option<ActivityStatus>,
    /// Case-insensitive match against name and school
    pub search: Option<String>,
}

fn required_name(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

fn validate_plan(
    monthly_fee: Option<f64>,
    payment_day: Option<i32>,
    total_amount: Option<f64>,
    installments: Option<i32>,
) -> Result<()> {
    if let Some(fee) = monthly_fee {
        ensure_non_negative(fee)?;
    }
    if let Some(day) = payment_day {
        ensure_day_of_month("paymentDay", day)?;
    }
    if let Some(total) = total_amount {
        ensure_non_negative(total)?;
    }
    if let Some(count) = installments {
        if count < 1 {
            return Err(Error::validation(format!(
                "installments must be at least 1, got {count}"
            )));
        }
    }
    Ok(())
}

/// Retrieves all students ordered by id (enrolment order).
pub async fn get_all_students(db: &DatabaseConnection) -> Result<Vec<student::Model>> {
    Student::find()
        .order_by_asc(student::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a student by id, `None` if it does not exist.
pub async fn get_student_by_id(
    db: &DatabaseConnection,
    student_id: i64,
) -> Result<Option<student::Model>> {
    Student::find_by_id(student_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Students currently assigned to a coach.
pub async fn get_students_for_coach(
    db: &DatabaseConnection,
    coach_id: i64,
) -> Result<Vec<student::Model>> {
    Student::find()
        .filter(student::Column::CoachId.eq(coach_id))
        .order_by_asc(student::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Enrols a student after validating names and plan fields.
pub async fn create_student(db: &DatabaseConnection, input: NewStudent) -> Result<student::Model> {
    let first_name = required_name("firstName", &input.first_name)?;
    let last_name = required_name("lastName", &input.last_name)?;
    validate_plan(
        input.monthly_fee,
        input.payment_day,
        input.total_amount,
        input.installments,
    )?;

    let model = student::ActiveModel {
        first_name: Set(first_name),
        last_name: Set(last_name),
        grade: Set(input.grade),
        school: Set(input.school),
        parent_id: Set(input.parent_id),
        status: Set(input.status),
        tags: Set(serde_json::json!(input.tags)),
        coach_id: Set(input.coach_id),
        monthly_fee: Set(input.monthly_fee),
        payment_day: Set(input.payment_day),
        total_amount: Set(input.total_amount),
        installments: Set(input.installments),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    tracing::info!(student_id = created.id, "Student created");
    Ok(created)
}

/// Applies a partial update and stamps `updated_at`.
pub async fn update_student(
    db: &DatabaseConnection,
    student_id: i64,
    changes: StudentUpdate,
) -> Result<student::Model> {
    let existing = get_student_by_id(db, student_id)
        .await?
        .ok_or_else(|| Error::not_found(COLLECTION, student_id))?;

    validate_plan(
        changes.monthly_fee.flatten(),
        changes.payment_day.flatten(),
        changes.total_amount.flatten(),
        changes.installments.flatten(),
    )?;

    let mut model: student::ActiveModel = existing.into();
    if let Some(first_name) = changes.first_name {
        model.first_name = Set(required_name("firstName", &first_name)?);
    }
    if let Some(last_name) = changes.last_name {
        model.last_name = Set(required_name("lastName", &last_name)?);
    }
    if let Some(grade) = changes.grade {
        model.grade = Set(grade);
    }
    if let Some(school) = changes.school {
        model.school = Set(school);
    }
    if let Some(parent_id) = changes.parent_id {
        model.parent_id = Set(parent_id);
    }
    if let Some(status) = changes.status {
        model.status = Set(status);
    }
    if let Some(tags) = changes.tags {
        model.tags = Set(serde_json::json!(tags));
    }
    if let Some(coach_id) = changes.coach_id {
        model.coach_id = Set(coach_id);
    }
    if let Some(monthly_fee) = changes.monthly_fee {
        model.monthly_fee = Set(monthly_fee);
    }
    if let Some(payment_day) = changes.payment_day {
        model.payment_day = Set(payment_day);
    }
    if let Some(total_amount) = changes.total_amount {
        model.total_amount = Set(total_amount);
    }
    if let Some(installments) = changes.installments {
        model.installments = Set(installments);
    }
    if let Some(start_date) = changes.start_date {
        model.start_date = Set(start_date);
    }
    if let Some(end_date) = changes.end_date {
        model.end_date = Set(end_date);
    }
    model.updated_at = Set(Some(Utc::now()));

    let updated = model.update(db).await?;
    tracing::info!(student_id, "Student updated");
    Ok(updated)
}

/// Hard-deletes a student. Payments and schedules referencing it are kept.
pub async fn delete_student(db: &DatabaseConnection, student_id: i64) -> Result<()> {
    let result = Student::delete_by_id(student_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found(COLLECTION, student_id));
    }
    tracing::info!(student_id, "Student deleted");
    Ok(())
}

/// Applies [`StudentFilter`] to an already-fetched list.
#[must_use]
pub fn filter_students(
    students: Vec<student::Model>,
    filter: &StudentFilter,
) -> Vec<student::Model> {
    let needle = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    students
        .into_iter()
        .filter(|s| filter.status.is_none_or(|status| s.status == status))
        .filter(|s| {
            needle.as_ref().is_none_or(|needle| {
                s.full_name().to_lowercase().contains(needle.as_str())
                    || s.school.to_lowercase().contains(needle.as_str())
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_student_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_student(
            &db,
            NewStudent {
                first_name: "  ".to_string(),
                last_name: "Demir".to_string(),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = create_student(
            &db,
            NewStudent {
                first_name: "Ali".to_string(),
                last_name: "Demir".to_string(),
                payment_day: Some(32),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = create_student(
            &db,
            NewStudent {
                first_name: "Ali".to_string(),
                last_name: "Demir".to_string(),
                monthly_fee: Some(-100.0),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_student_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let student = create_test_student(&db, "Elif", "Kaya", None).await?;
        assert_eq!(student.first_name, "Elif");
        assert_eq!(student.status, ActivityStatus::Active);
        assert_eq!(student.tags, serde_json::json!(["yks"]));
        assert!(student.updated_at.is_none());

        let found = get_student_by_id(&db, student.id).await?.unwrap();
        assert_eq!(found, student);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_student_partial_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let coach = create_test_coach(&db, "Mehmet Hoca", 60.0).await?;
        let student = create_test_student(&db, "Elif", "Kaya", Some(coach.id)).await?;

        let updated = update_student(
            &db,
            student.id,
            StudentUpdate {
                grade: Some("12".to_string()),
                monthly_fee: Some(Some(2500.0)),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.grade, "12");
        assert_eq!(updated.monthly_fee, Some(2500.0));
        assert_eq!(updated.first_name, "Elif");
        assert_eq!(updated.coach_id, Some(coach.id));
        assert!(updated.updated_at.is_some());

        // explicit null unassigns the coach
        let cleared = update_student(
            &db,
            student.id,
            StudentUpdate {
                coach_id: Some(None),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(cleared.coach_id, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_student() -> Result<()> {
        let db = setup_test_db().await?;
        let result = update_student(&db, 999, StudentUpdate::default()).await;
        assert!(matches!(
            result,
            Err(Error::NotFound {
                collection: "students",
                id: 999
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_student() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_test_student(&db, "Elif", "Kaya", None).await?;

        delete_student(&db, student.id).await?;
        assert!(get_student_by_id(&db, student.id).await?.is_none());

        let again = delete_student(&db, student.id).await;
        assert!(matches!(again, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_filter_students() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_student(&db, "Elif", "Kaya", None).await?;
        let can = create_test_student(&db, "Can", "Öztürk", None).await?;
        update_student(
            &db,
            can.id,
            StudentUpdate {
                status: Some(ActivityStatus::Inactive),
                ..Default::default()
            },
        )
        .await?;

        let all = get_all_students(&db).await?;
        assert_eq!(all.len(), 2);

        let active = filter_students(
            all.clone(),
            &StudentFilter {
                status: Some(ActivityStatus::Active),
                search: None,
            },
        );
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].first_name, "Elif");

        let searched = filter_students(
            all,
            &StudentFilter {
                status: None,
                search: Some("KAYA".to_string()),
            },
        );
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].last_name, "Kaya");
        Ok(())
    }
}
