//! Shared test utilities for Academico.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test records with sensible defaults.

use crate::{
    config::settings::LedgerConfig,
    core::{coach, contract, invoice, package, schedule, student},
    entities::{self, ContractStatus, PaymentCycle, PaymentMethod},
    errors::Result,
};
use chrono::{DateTime, Duration, Utc};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Ledger settings as shipped: 60% default coach share, 7 day dues window.
#[must_use]
pub fn test_ledger_config() -> LedgerConfig {
    LedgerConfig::default()
}

/// Creates an active test student.
///
/// # Defaults
/// * `grade`: "11"
/// * `school`: "Atatürk Anadolu Lisesi"
/// * `tags`: `["yks"]`
pub async fn create_test_student(
    db: &DatabaseConnection,
    first_name: &str,
    last_name: &str,
    coach_id: Option<i64>,
) -> Result<entities::student::Model> {
    student::create_student(
        db,
        student::NewStudent {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            grade: "11".to_string(),
            school: "Atatürk Anadolu Lisesi".to_string(),
            tags: vec!["yks".to_string()],
            coach_id,
            ..Default::default()
        },
    )
    .await
}

/// Creates an active test coach with the given share percentage.
pub async fn create_test_coach(
    db: &DatabaseConnection,
    name: &str,
    share_percentage: f64,
) -> Result<entities::coach::Model> {
    coach::create_coach(
        db,
        coach::NewCoach {
            name: name.to_string(),
            branches: vec!["Matematik".to_string()],
            hourly_rate: 750.0,
            share_percentage,
            ..Default::default()
        },
    )
    .await
}

/// Creates a 12 month package listed at 24000 with no discount.
pub async fn create_test_package(db: &DatabaseConnection) -> Result<entities::package::Model> {
    package::create_package(
        db,
        package::NewPackage {
            name: "YKS Koçluk".to_string(),
            duration_months: 12,
            included_units: 48,
            list_price: 24_000.0,
            discount_percent: 0.0,
        },
    )
    .await
}

/// Creates a fresh package and an active monthly contract for `student_id`.
///
/// # Defaults
/// * runs from now for 365 days
/// * `due_day`: 5
/// * `payment_method`: transfer
pub async fn create_test_contract(
    db: &DatabaseConnection,
    student_id: i64,
) -> Result<entities::contract::Model> {
    let package = create_test_package(db).await?;
    let start_date = Utc::now();
    contract::create_contract(
        db,
        contract::NewContract {
            student_id,
            package_id: package.id,
            start_date,
            end_date: start_date + Duration::days(365),
            payment_cycle: PaymentCycle::Monthly,
            due_day: 5,
            payment_method: PaymentMethod::Transfer,
            status: ContractStatus::Active,
        },
    )
    .await
}

/// Issues an invoice against contract 1 with 20% VAT.
pub async fn create_test_invoice(
    db: &DatabaseConnection,
    amount_net: f64,
    due_date: DateTime<Utc>,
) -> Result<entities::invoice::Model> {
    invoice::create_invoice(
        db,
        invoice::NewInvoice {
            contract_id: 1,
            issue_date: None,
            due_date,
            amount_net,
            vat_rate: 20.0,
        },
    )
    .await
}

/// Adds a single-installment schedule row.
pub async fn create_test_schedule(
    db: &DatabaseConnection,
    student_id: i64,
    due_date: DateTime<Utc>,
    amount: f64,
    paid_amount: f64,
) -> Result<entities::payment_schedule::Model> {
    schedule::create_schedule(
        db,
        schedule::NewSchedule {
            student_id,
            contract_id: None,
            installment_number: 1,
            total_installments: 1,
            due_date,
            amount,
            paid_amount,
            description: "1/1 - Monthly payment".to_string(),
        },
    )
    .await
}
