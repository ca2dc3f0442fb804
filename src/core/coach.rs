//! Coach business logic - Handles coach records and their student assignments.
//!
//! A coach's assigned students are never stored on the coach. They are
//! computed from `student.coach_id` whenever a coach is read, so the two sides
//! of the assignment cannot drift apart. Deleting a coach is a hard remove and
//! leaves every student's `coach_id` as it was.

use super::money::{ensure_non_negative, ensure_percentage};
use crate::{
    entities::{ActivityStatus, Coach, coach, student},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};

const COLLECTION: &str = "coaches";

/// Payload for creating a coach.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCoach {
    /// Display name
    pub name: String,
    /// Subjects taught
    #[serde(default)]
    pub branches: Vec<String>,
    /// Hourly rate in TRY
    #[serde(default)]
    pub hourly_rate: f64,
    /// E-mail address
    #[serde(default)]
    pub email: String,
    /// Phone number
    #[serde(default)]
    pub phone: String,
    /// Free-text availability
    #[serde(default)]
    pub availability: String,
    /// Share of attributable payments kept by the coach (0-100)
    pub share_percentage: f64,
    /// Defaults to `active`
    #[serde(default)]
    pub status: ActivityStatus,
}

/// Partial update for a coach.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachUpdate {
    pub name: Option<String>,
    pub branches: Option<Vec<String>>,
    pub hourly_rate: Option<f64>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub availability: Option<String>,
    pub share_percentage: Option<f64>,
    pub status: Option<ActivityStatus>,
}

/// A coach as served over REST, with the computed student assignment list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachView {
    /// Stored coach record
    #[serde(flatten)]
    pub coach: coach::Model,
    /// Ids of students whose `coach_id` points at this coach
    pub assigned_students: Vec<i64>,
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("Coach name cannot be empty"));
    }
    Ok(trimmed.to_string())
}

/// Retrieves all coaches ordered by name.
pub async fn get_all_coaches(db: &DatabaseConnection) -> Result<Vec<coach::Model>> {
    Coach::find()
        .order_by_asc(coach::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a coach by id.
pub async fn get_coach_by_id(
    db: &DatabaseConnection,
    coach_id: i64,
) -> Result<Option<coach::Model>> {
    Coach::find_by_id(coach_id).one(db).await.map_err(Into::into)
}

/// Creates a coach after validating the rate and share percentage.
pub async fn create_coach(db: &DatabaseConnection, input: NewCoach) -> Result<coach::Model> {
    let name = validate_name(&input.name)?;
    let hourly_rate = ensure_non_negative(input.hourly_rate)?;
    let share_percentage = ensure_percentage(input.share_percentage)?;

    let model = coach::ActiveModel {
        name: Set(name),
        branches: Set(serde_json::json!(input.branches)),
        hourly_rate: Set(hourly_rate),
        email: Set(input.email),
        phone: Set(input.phone),
        availability: Set(input.availability),
        share_percentage: Set(share_percentage),
        status: Set(input.status),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    tracing::info!(coach_id = created.id, "Coach created");
    Ok(created)
}

/// Applies a partial update and stamps `updated_at`.
///
/// A new `share_percentage` only affects payments recorded afterwards.
pub async fn update_coach(
    db: &DatabaseConnection,
    coach_id: i64,
    changes: CoachUpdate,
) -> Result<coach::Model> {
    let existing = get_coach_by_id(db, coach_id)
        .await?
        .ok_or_else(|| Error::not_found(COLLECTION, coach_id))?;

    let mut model: coach::ActiveModel = existing.into();
    if let Some(name) = changes.name {
        model.name = Set(validate_name(&name)?);
    }
    if let Some(branches) = changes.branches {
        model.branches = Set(serde_json::json!(branches));
    }
    if let Some(rate) = changes.hourly_rate {
        model.hourly_rate = Set(ensure_non_negative(rate)?);
    }
    if let Some(email) = changes.email {
        model.email = Set(email);
    }
    if let Some(phone) = changes.phone {
        model.phone = Set(phone);
    }
    if let Some(availability) = changes.availability {
        model.availability = Set(availability);
    }
    if let Some(share) = changes.share_percentage {
        model.share_percentage = Set(ensure_percentage(share)?);
    }
    if let Some(status) = changes.status {
        model.status = Set(status);
    }
    model.updated_at = Set(Some(Utc::now()));

    let updated = model.update(db).await?;
    tracing::info!(coach_id, "Coach updated");
    Ok(updated)
}

/// Hard-deletes a coach. Students assigned to it are not reassigned.
pub async fn delete_coach(db: &DatabaseConnection, coach_id: i64) -> Result<()> {
    let result = Coach::delete_by_id(coach_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found(COLLECTION, coach_id));
    }
    tracing::info!(coach_id, "Coach deleted");
    Ok(())
}

/// Attaches the computed assignment list to each coach.
#[must_use]
pub fn with_assigned_students(
    coaches: Vec<coach::Model>,
    students: &[student::Model],
) -> Vec<CoachView> {
    coaches
        .into_iter()
        .map(|coach| {
            let assigned_students = students
                .iter()
                .filter(|s| s.coach_id == Some(coach.id))
                .map(|s| s.id)
                .collect();
            CoachView {
                coach,
                assigned_students,
            }
        })
        .collect()
}

/// All coaches with their computed assignment lists.
pub async fn get_coach_views(db: &DatabaseConnection) -> Result<Vec<CoachView>> {
    let coaches = get_all_coaches(db).await?;
    let students = super::student::get_all_students(db).await?;
    Ok(with_assigned_students(coaches, &students))
}

/// One coach with its computed assignment list.
pub async fn get_coach_view(db: &DatabaseConnection, coach_id: i64) -> Result<CoachView> {
    let coach = get_coach_by_id(db, coach_id)
        .await?
        .ok_or_else(|| Error::not_found(COLLECTION, coach_id))?;
    let students = super::student::get_students_for_coach(db, coach_id).await?;
    Ok(CoachView {
        coach,
        assigned_students: students.iter().map(|s| s.id).collect(),
    })
}
