//! Payment entity - A receipt of money, split between coach and management.
//!
//! `coach_share_percentage` is a snapshot taken from the coach when the payment
//! is recorded. Payments are immutable once written.

use super::sea_orm_active_enums::PaymentMethod;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Invoice this payment settles, if any
    pub invoice_id: Option<i64>,
    /// Student the payment was received for, if known
    pub student_id: Option<i64>,
    /// Coach the revenue is attributed to, if known
    pub coach_id: Option<i64>,
    /// When the money was received
    pub paid_at: DateTimeUtc,
    /// Amount received in TRY
    pub amount: f64,
    /// Cash, transfer or card
    pub method: PaymentMethod,
    /// Receipt / bank reference
    pub reference: String,
    /// Free-text note
    pub description: String,
    /// Coach share percentage at the time of payment
    pub coach_share_percentage: f64,
    /// Portion kept by the coach
    pub coach_share: f64,
    /// Portion kept by the institution
    pub management_share: f64,
    /// When the record was created
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
