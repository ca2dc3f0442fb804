//! Contract business logic - ties a student to a package and a billing cadence.

use super::money::ensure_day_of_month;
use crate::{
    entities::{Contract, ContractStatus, PaymentCycle, PaymentMethod, contract},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;

const COLLECTION: &str = "contracts";

/// Payload for signing a contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContract {
    pub student_id: i64,
    pub package_id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub payment_cycle: PaymentCycle,
    pub due_day: i32,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub status: ContractStatus,
}

/// Partial update for a contract.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractUpdate {
    pub student_id: Option<i64>,
    pub package_id: Option<i64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub payment_cycle: Option<PaymentCycle>,
    pub due_day: Option<i32>,
    pub payment_method: Option<PaymentMethod>,
    pub status: Option<ContractStatus>,
}

fn validate_dates(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
    if end < start {
        return Err(Error::validation(format!(
            "endDate {end} is before startDate {start}"
        )));
    }
    Ok(())
}

/// Retrieves all contracts ordered by id.
pub async fn get_all_contracts(db: &DatabaseConnection) -> Result<Vec<contract::Model>> {
    Contract::find()
        .order_by_asc(contract::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a contract by id.
pub async fn get_contract_by_id(
    db: &DatabaseConnection,
    contract_id: i64,
) -> Result<Option<contract::Model>> {
    Contract::find_by_id(contract_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a contract.
pub async fn create_contract(
    db: &DatabaseConnection,
    input: NewContract,
) -> Result<contract::Model> {
    validate_dates(input.start_date, input.end_date)?;
    let due_day = ensure_day_of_month("dueDay", input.due_day)?;

    let model = contract::ActiveModel {
        student_id: Set(input.student_id),
        package_id: Set(input.package_id),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        payment_cycle: Set(input.payment_cycle),
        due_day: Set(due_day),
        payment_method: Set(input.payment_method),
        status: Set(input.status),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    tracing::info!(
        contract_id = created.id,
        student_id = created.student_id,
        "Contract created"
    );
    Ok(created)
}

/// Applies a partial update and stamps `updated_at`.
pub async fn update_contract(
    db: &DatabaseConnection,
    contract_id: i64,
    changes: ContractUpdate,
) -> Result<contract::Model> {
    let existing = get_contract_by_id(db, contract_id)
        .await?
        .ok_or_else(|| Error::not_found(COLLECTION, contract_id))?;

    validate_dates(
        changes.start_date.unwrap_or(existing.start_date),
        changes.end_date.unwrap_or(existing.end_date),
    )?;

    let mut model: contract::ActiveModel = existing.into();
    if let Some(student_id) = changes.student_id {
        model.student_id = Set(student_id);
    }
    if let Some(package_id) = changes.package_id {
        model.package_id = Set(package_id);
    }
    if let Some(start_date) = changes.start_date {
        model.start_date = Set(start_date);
    }
    if let Some(end_date) = changes.end_date {
        model.end_date = Set(end_date);
    }
    if let Some(cycle) = changes.payment_cycle {
        model.payment_cycle = Set(cycle);
    }
    if let Some(due_day) = changes.due_day {
        model.due_day = Set(ensure_day_of_month("dueDay", due_day)?);
    }
    if let Some(method) = changes.payment_method {
        model.payment_method = Set(method);
    }
    if let Some(status) = changes.status {
        model.status = Set(status);
    }
    model.updated_at = Set(Some(Utc::now()));

    let updated = model.update(db).await?;
    tracing::info!(contract_id, "Contract updated");
    Ok(updated)
}

/// Hard-deletes a contract. Invoices and schedules keep their `contract_id`.
pub async fn delete_contract(db: &DatabaseConnection, contract_id: i64) -> Result<()> {
    let result = Contract::delete_by_id(contract_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found(COLLECTION, contract_id));
    }
    tracing::info!(contract_id, "Contract deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_contract_lifecycle() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_test_student(&db, "Elif", "Kaya", None).await?;
        let contract = create_test_contract(&db, student.id).await?;
        assert_eq!(contract.status, ContractStatus::Active);
        assert_eq!(contract.payment_cycle, PaymentCycle::Monthly);

        let updated = update_contract(
            &db,
            contract.id,
            ContractUpdate {
                status: Some(ContractStatus::Cancelled),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.status, ContractStatus::Cancelled);
        assert!(updated.updated_at.is_some());

        delete_contract(&db, contract.id).await?;
        assert!(get_contract_by_id(&db, contract.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_contract_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();

        let reversed = create_contract(
            &db,
            NewContract {
                student_id: 1,
                package_id: 1,
                start_date: now,
                end_date: now - Duration::days(1),
                payment_cycle: PaymentCycle::Monthly,
                due_day: 5,
                payment_method: PaymentMethod::Cash,
                status: ContractStatus::Active,
            },
        )
        .await;
        assert!(matches!(reversed, Err(Error::Validation { .. })));

        let bad_day = create_contract(
            &db,
            NewContract {
                student_id: 1,
                package_id: 1,
                start_date: now,
                end_date: now + Duration::days(30),
                payment_cycle: PaymentCycle::Installment,
                due_day: 0,
                payment_method: PaymentMethod::Card,
                status: ContractStatus::Active,
            },
        )
        .await;
        assert!(matches!(bad_day, Err(Error::Validation { .. })));
        Ok(())
    }
}
