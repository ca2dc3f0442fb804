//! Payment schedule entity - One planned installment of a payment plan.
//!
//! Status is not stored; see `core::status::derive_schedule_status`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment schedule database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_schedules")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the installment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Student who owes the installment
    pub student_id: i64,
    /// Contract the plan belongs to, if any
    pub contract_id: Option<i64>,
    /// 1-based position within the plan
    pub installment_number: i32,
    /// Number of installments in the plan
    pub total_installments: i32,
    /// When the installment falls due
    pub due_date: DateTimeUtc,
    /// Amount owed in TRY
    pub amount: f64,
    /// Amount received so far
    pub paid_amount: f64,
    /// e.g. "3/12 - Monthly payment"
    pub description: String,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// When the record was last modified
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
