//! Contract entity - Links a student to a package and fixes the payment cadence.

use super::sea_orm_active_enums::{ContractStatus, PaymentCycle, PaymentMethod};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Contract database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contracts")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the contract
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Student the contract is for
    pub student_id: i64,
    /// Package sold
    pub package_id: i64,
    /// First day of service
    pub start_date: DateTimeUtc,
    /// Last day of service
    pub end_date: DateTimeUtc,
    /// `monthly` or `installment`
    pub payment_cycle: PaymentCycle,
    /// Day of month invoices fall due (1-31)
    pub due_day: i32,
    /// Expected payment method
    pub payment_method: PaymentMethod,
    /// `active`, `completed` or `cancelled`
    pub status: ContractStatus,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// When the record was last modified
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
