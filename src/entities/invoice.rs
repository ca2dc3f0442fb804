//! Invoice entity - One bill issued against a contract.
//!
//! Only the issued amounts are stored. The outstanding balance and the status
//! are derived from payments each time an invoice is read.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Invoice database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the invoice
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Contract billed
    pub contract_id: i64,
    /// When the invoice was issued
    pub issue_date: DateTimeUtc,
    /// When payment is due
    pub due_date: DateTimeUtc,
    /// Amount before VAT, in TRY
    pub amount_net: f64,
    /// VAT rate in percent (e.g. 20)
    pub vat_rate: f64,
    /// `amount_net * (1 + vat_rate / 100)`, rounded to kuruş
    pub amount_gross: f64,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// When the record was last modified
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
