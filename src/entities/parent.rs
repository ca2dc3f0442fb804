//! Parent entity - Guardian contact record. Many students may point at one parent.

use super::sea_orm_active_enums::ContactChannel;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Parent database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parents")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the parent
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name
    pub name: String,
    /// Phone number
    pub phone: String,
    /// E-mail address
    pub email: String,
    /// Preferred contact channel
    pub preferred_channel: ContactChannel,
    /// Whether personal-data processing consent (KVKK) was given
    pub kvkk_consent: bool,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// When the record was last modified
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
