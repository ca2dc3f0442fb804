//! Payment business logic - recording receipts and splitting the revenue.
//!
//! When a payment is recorded the coach's share percentage is resolved once
//! and copied onto the payment together with the computed shares. Payments
//! are never updated afterwards, so a coach's later rate change cannot rewrite
//! history.

use super::{
    money::ensure_positive,
    revenue::{ShareSource, resolve_share_percentage, split_revenue},
};
use crate::{
    config::settings::LedgerConfig,
    entities::{Payment, PaymentMethod, coach, payment},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;

const COLLECTION: &str = "payments";

/// Payload for recording a payment. Shares are always computed server-side.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    /// Invoice being settled, if any
    pub invoice_id: Option<i64>,
    /// Student the money was received for
    pub student_id: Option<i64>,
    /// Coach to attribute the revenue to; falls back to the student's coach
    pub coach_id: Option<i64>,
    /// Amount received, must be positive
    pub amount: f64,
    /// Defaults to `transfer`
    #[serde(default)]
    pub method: PaymentMethod,
    /// Defaults to a generated `REF<millis>` reference
    pub reference: Option<String>,
    /// Defaults to now
    pub paid_at: Option<DateTime<Utc>>,
    /// Free-text note
    #[serde(default)]
    pub description: String,
}

/// Query filter for `GET /payments`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentFilter {
    /// Only payments made with this method
    pub method: Option<PaymentMethod>,
}

/// Retrieves all payments, newest first.
pub async fn get_all_payments(db: &DatabaseConnection) -> Result<Vec<payment::Model>> {
    Payment::find()
        .order_by_desc(payment::Column::PaidAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a payment by id.
pub async fn get_payment_by_id(
    db: &DatabaseConnection,
    payment_id: i64,
) -> Result<Option<payment::Model>> {
    Payment::find_by_id(payment_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Applies [`PaymentFilter`] to an already-fetched list.
#[must_use]
pub fn filter_payments(
    payments: Vec<payment::Model>,
    filter: &PaymentFilter,
) -> Vec<payment::Model> {
    payments
        .into_iter()
        .filter(|p| filter.method.is_none_or(|method| p.method == method))
        .collect()
}

/// Finds the coach a payment should be attributed to: the explicit coach if
/// it exists, otherwise the coach currently assigned to the student.
async fn resolve_coach(
    db: &DatabaseConnection,
    coach_id: Option<i64>,
    student_id: Option<i64>,
) -> Result<Option<coach::Model>> {
    if let Some(coach_id) = coach_id {
        if let Some(coach) = super::coach::get_coach_by_id(db, coach_id).await? {
            return Ok(Some(coach));
        }
        tracing::warn!(coach_id, "Coach not found for payment");
    }

    let Some(student_id) = student_id else {
        return Ok(None);
    };
    let Some(student) = super::student::get_student_by_id(db, student_id).await? else {
        tracing::warn!(student_id, "Student not found for payment");
        return Ok(None);
    };
    match student.coach_id {
        Some(coach_id) => super::coach::get_coach_by_id(db, coach_id).await,
        None => Ok(None),
    }
}

/// Records a payment with its coach/management split.
///
/// # Errors
/// `InvalidAmount` for a non-positive amount, `Validation` when the referenced
/// invoice does not exist.
pub async fn create_payment(
    db: &DatabaseConnection,
    ledger: &LedgerConfig,
    input: NewPayment,
) -> Result<payment::Model> {
    let amount = ensure_positive(input.amount)?;

    if let Some(invoice_id) = input.invoice_id {
        if super::invoice::get_invoice_by_id(db, invoice_id)
            .await?
            .is_none()
        {
            return Err(Error::validation(format!(
                "invoice {invoice_id} does not exist"
            )));
        }
    }

    let coach = resolve_coach(db, input.coach_id, input.student_id).await?;
    let (share_percentage, source) =
        resolve_share_percentage(coach.as_ref(), ledger.default_share_percentage);
    if source == ShareSource::Default {
        tracing::warn!(
            share_percentage,
            "No coach resolved for payment, using default share"
        );
    }
    let split = split_revenue(amount, share_percentage)?;

    let now = Utc::now();
    let reference = input
        .reference
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| format!("REF{}", now.timestamp_millis()));

    let model = payment::ActiveModel {
        invoice_id: Set(input.invoice_id),
        student_id: Set(input.student_id),
        coach_id: Set(coach.as_ref().map(|c| c.id)),
        paid_at: Set(input.paid_at.unwrap_or(now)),
        amount: Set(amount),
        method: Set(input.method),
        reference: Set(reference),
        description: Set(input.description),
        coach_share_percentage: Set(share_percentage),
        coach_share: Set(split.coach_share),
        management_share: Set(split.management_share),
        created_at: Set(now),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    tracing::info!(
        payment_id = created.id,
        amount,
        coach_share = created.coach_share,
        management_share = created.management_share,
        "Payment recorded"
    );
    Ok(created)
}

/// Hard-deletes a payment; the invoice balance recovers on the next read.
pub async fn delete_payment(db: &DatabaseConnection, payment_id: i64) -> Result<()> {
    let result = Payment::delete_by_id(payment_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found(COLLECTION, payment_id));
    }
    tracing::info!(payment_id, "Payment deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::coach::{CoachUpdate, update_coach};
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_payment_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let config = test_ledger_config();

        for amount in [0.0, -10.0, f64::NAN] {
            let result = create_payment(
                &db,
                &config,
                NewPayment {
                    amount,
                    ..Default::default()
                },
            )
            .await;
            assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_payment_uses_explicit_coach_share() -> Result<()> {
        let db = setup_test_db().await?;
        let coach = create_test_coach(&db, "Mehmet Hoca", 60.0).await?;

        let payment = create_payment(
            &db,
            &test_ledger_config(),
            NewPayment {
                coach_id: Some(coach.id),
                amount: 1888.0,
                method: PaymentMethod::Cash,
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(payment.coach_share_percentage, 60.0);
        assert_eq!(payment.coach_share, 1132.8);
        assert_eq!(payment.management_share, 755.2);
        assert_eq!(payment.coach_id, Some(coach.id));
        assert!(payment.reference.starts_with("REF"));
        Ok(())
    }

    #[tokio::test]
    async fn test_payment_falls_back_to_student_coach() -> Result<()> {
        let db = setup_test_db().await?;
        let coach = create_test_coach(&db, "Ayşe Hoca", 70.0).await?;
        let student = create_test_student(&db, "Elif", "Kaya", Some(coach.id)).await?;

        let payment = create_payment(
            &db,
            &test_ledger_config(),
            NewPayment {
                student_id: Some(student.id),
                amount: 1000.0,
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(payment.coach_id, Some(coach.id));
        assert_eq!(payment.coach_share, 700.0);
        assert_eq!(payment.management_share, 300.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_payment_defaults_when_coach_missing() -> Result<()> {
        let db = setup_test_db().await?;

        let payment = create_payment(
            &db,
            &test_ledger_config(),
            NewPayment {
                coach_id: Some(404),
                amount: 1000.0,
                reference: Some("  DEK-1  ".to_string()),
                ..Default::default()
            },
        )
        .await?;

        assert_eq!(payment.coach_share_percentage, 60.0);
        assert_eq!(payment.coach_share, 600.0);
        assert_eq!(payment.management_share, 400.0);
        assert_eq!(payment.coach_id, None);
        assert_eq!(payment.reference, "DEK-1");
        Ok(())
    }

    #[tokio::test]
    async fn test_payment_share_is_a_snapshot() -> Result<()> {
        let db = setup_test_db().await?;
        let coach = create_test_coach(&db, "Mehmet Hoca", 60.0).await?;
        let payment = create_payment(
            &db,
            &test_ledger_config(),
            NewPayment {
                coach_id: Some(coach.id),
                amount: 1000.0,
                ..Default::default()
            },
        )
        .await?;

        update_coach(
            &db,
            coach.id,
            CoachUpdate {
                share_percentage: Some(40.0),
                ..Default::default()
            },
        )
        .await?;

        let reloaded = get_payment_by_id(&db, payment.id).await?.unwrap();
        assert_eq!(reloaded.coach_share_percentage, 60.0);
        assert_eq!(reloaded.coach_share, 600.0);
        assert_eq!(reloaded.management_share, 400.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_payment_for_unknown_invoice_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_payment(
            &db,
            &test_ledger_config(),
            NewPayment {
                invoice_id: Some(77),
                amount: 100.0,
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_filter_and_delete_payments() -> Result<()> {
        let db = setup_test_db().await?;
        let config = test_ledger_config();
        let cash = create_payment(
            &db,
            &config,
            NewPayment {
                amount: 100.0,
                method: PaymentMethod::Cash,
                ..Default::default()
            },
        )
        .await?;
        create_payment(
            &db,
            &config,
            NewPayment {
                amount: 200.0,
                method: PaymentMethod::Card,
                ..Default::default()
            },
        )
        .await?;

        let all = get_all_payments(&db).await?;
        let cash_only = filter_payments(
            all,
            &PaymentFilter {
                method: Some(PaymentMethod::Cash),
            },
        );
        assert_eq!(cash_only.len(), 1);
        assert_eq!(cash_only[0].id, cash.id);

        delete_payment(&db, cash.id).await?;
        assert_eq!(get_all_payments(&db).await?.len(), 1);
        assert!(matches!(
            delete_payment(&db, cash.id).await,
            Err(Error::NotFound { .. })
        ));
        Ok(())
    }
}
