//! Package entity - A sellable bundle a contract is written against.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Package database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "packages")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the package
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g. "YKS Coaching 12 months")
    pub name: String,
    /// Length of the package in months
    pub duration_months: i32,
    /// Sessions / hours included
    pub included_units: i32,
    /// Price before discount, in TRY
    pub list_price: f64,
    /// Discount applied to the list price (0-100)
    pub discount_percent: f64,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// When the record was last modified
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
