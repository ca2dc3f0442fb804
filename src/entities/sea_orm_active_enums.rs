//! String-backed enums shared by several entities.
//!
//! Each enum is stored as its lowercase name in `SQLite` and serialized the same
//! way over REST, so the wire values match the stored ones.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle flag for students and coaches
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    /// Currently enrolled / working
    #[default]
    #[sea_orm(string_value = "active")]
    Active,
    /// Kept for history, no longer enrolled / working
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

/// How a parent prefers to be contacted
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum ContactChannel {
    /// Phone call
    #[default]
    #[sea_orm(string_value = "phone")]
    Phone,
    /// `WhatsApp` message
    #[sea_orm(string_value = "whatsapp")]
    Whatsapp,
    /// E-mail
    #[sea_orm(string_value = "email")]
    Email,
}

/// Means by which money was (or will be) received
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash at the desk
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Bank transfer (havale/EFT)
    #[default]
    #[sea_orm(string_value = "transfer")]
    Transfer,
    /// Credit or debit card
    #[sea_orm(string_value = "card")]
    Card,
}

/// Billing cadence of a contract
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum PaymentCycle {
    /// One invoice per month
    #[default]
    #[sea_orm(string_value = "monthly")]
    Monthly,
    /// Fixed number of installments
    #[sea_orm(string_value = "installment")]
    Installment,
}

/// Contract lifecycle
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    /// Running
    #[default]
    #[sea_orm(string_value = "active")]
    Active,
    /// Ran to its end date
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Terminated early
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}
