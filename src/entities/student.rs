//! Student entity - An enrolled learner and their optional coaching plan.
//!
//! `coach_id` is the single source of truth for coach assignment; the list of
//! students per coach is computed from it rather than stored on the coach.

use super::sea_orm_active_enums::ActivityStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Student database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the student
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// School grade (free text, e.g. "11")
    pub grade: String,
    /// School the student attends
    pub school: String,
    /// Guardian reference; not enforced as a foreign key
    pub parent_id: Option<i64>,
    /// `active` or `inactive`
    pub status: ActivityStatus,
    /// Free-form labels, stored as a JSON array of strings
    pub tags: Json,
    /// Assigned coach; not enforced as a foreign key
    pub coach_id: Option<i64>,
    /// Monthly fee in TRY for monthly plans
    pub monthly_fee: Option<f64>,
    /// Day of month payments fall due (1-31)
    pub payment_day: Option<i32>,
    /// Total plan amount in TRY for installment plans
    pub total_amount: Option<f64>,
    /// Number of installments in the plan
    pub installments: Option<i32>,
    /// Plan start
    pub start_date: Option<DateTimeUtc>,
    /// Plan end
    pub end_date: Option<DateTimeUtc>,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// When the record was last modified
    pub updated_at: Option<DateTimeUtc>,
}

impl Model {
    /// "First Last", used wherever a student is shown by name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Students reference parents and coaches by id only; deletes never cascade.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
