//! Coach entity - An instructor and the revenue share they keep.
//!
//! `share_percentage` is read once when a payment is recorded and copied onto
//! the payment; changing it later never touches existing payments.

use super::sea_orm_active_enums::ActivityStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Coach database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coaches")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the coach
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Subjects taught, stored as a JSON array of strings
    pub branches: Json,
    /// Hourly rate in TRY
    pub hourly_rate: f64,
    /// E-mail address
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Free-text availability note
    pub availability: String,
    /// Percentage (0-100) of each attributable payment kept by the coach
    pub share_percentage: f64,
    /// `active` or `inactive`
    pub status: ActivityStatus,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// When the record was last modified
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
