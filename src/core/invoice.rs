//! Invoice business logic - issuing bills and reading them with live balances.
//!
//! An invoice stores only what was issued (net, VAT, gross). Its outstanding
//! balance is the gross amount minus every payment that references it, and
//! its status follows from that balance and the due date. Both are computed
//! at read time so they can never go stale.

use super::{
    money::{ensure_non_negative, ensure_percentage, gross_from_net, round2},
    status::{InvoiceStatus, derive_invoice_status},
};
use crate::{
    entities::{Invoice, Payment, invoice, payment},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};

const COLLECTION: &str = "invoices";

/// Payload for issuing an invoice.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvoice {
    pub contract_id: i64,
    /// Defaults to now
    pub issue_date: Option<DateTime<Utc>>,
    pub due_date: DateTime<Utc>,
    pub amount_net: f64,
    pub vat_rate: f64,
}

/// Partial update for an invoice. Gross is recomputed from net and VAT.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceUpdate {
    pub contract_id: Option<i64>,
    pub issue_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub amount_net: Option<f64>,
    pub vat_rate: Option<f64>,
}

/// An invoice as served over REST.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceView {
    /// Stored invoice record
    #[serde(flatten)]
    pub invoice: invoice::Model,
    /// Sum of payments applied to this invoice
    pub amount_paid: f64,
    /// `amount_gross - amount_paid`
    pub balance: f64,
    /// Derived lifecycle state
    pub status: InvoiceStatus,
}

/// Query filter for `GET /invoices`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceFilter {
    /// Only invoices currently in this state
    pub status: Option<InvoiceStatus>,
}

/// Builds the read view of one invoice from the full payment list.
#[must_use]
pub fn invoice_view(
    invoice: invoice::Model,
    payments: &[payment::Model],
    now: DateTime<Utc>,
) -> InvoiceView {
    let amount_paid = round2(
        payments
            .iter()
            .filter(|p| p.invoice_id == Some(invoice.id))
            .map(|p| p.amount)
            .sum::<f64>(),
    );
    let balance = round2(invoice.amount_gross - amount_paid);
    let status = derive_invoice_status(balance, invoice.amount_gross, invoice.due_date, now);

    InvoiceView {
        invoice,
        amount_paid,
        balance,
        status,
    }
}

/// Retrieves all invoices ordered by due date.
pub async fn get_all_invoices(db: &DatabaseConnection) -> Result<Vec<invoice::Model>> {
    Invoice::find()
        .order_by_asc(invoice::Column::DueDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an invoice by id.
pub async fn get_invoice_by_id(
    db: &DatabaseConnection,
    invoice_id: i64,
) -> Result<Option<invoice::Model>> {
    Invoice::find_by_id(invoice_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// All invoices with balances and statuses evaluated at `now`.
pub async fn get_invoice_views(
    db: &DatabaseConnection,
    filter: &InvoiceFilter,
    now: DateTime<Utc>,
) -> Result<Vec<InvoiceView>> {
    let invoices = get_all_invoices(db).await?;
    let payments = Payment::find().all(db).await?;

    Ok(invoices
        .into_iter()
        .map(|invoice| invoice_view(invoice, &payments, now))
        .filter(|view| filter.status.is_none_or(|status| view.status == status))
        .collect())
}

/// One invoice with balance and status evaluated at `now`.
pub async fn get_invoice_view(
    db: &DatabaseConnection,
    invoice_id: i64,
    now: DateTime<Utc>,
) -> Result<InvoiceView> {
    let invoice = get_invoice_by_id(db, invoice_id)
        .await?
        .ok_or_else(|| Error::not_found(COLLECTION, invoice_id))?;
    let payments = Payment::find()
        .filter(payment::Column::InvoiceId.eq(invoice_id))
        .all(db)
        .await?;
    Ok(invoice_view(invoice, &payments, now))
}

/// Issues an invoice; gross is computed from net and VAT.
pub async fn create_invoice(db: &DatabaseConnection, input: NewInvoice) -> Result<invoice::Model> {
    let amount_net = ensure_non_negative(input.amount_net)?;
    let vat_rate = ensure_percentage(input.vat_rate)?;
    let issue_date = input.issue_date.unwrap_or_else(Utc::now);

    let model = invoice::ActiveModel {
        contract_id: Set(input.contract_id),
        issue_date: Set(issue_date),
        due_date: Set(input.due_date),
        amount_net: Set(amount_net),
        vat_rate: Set(vat_rate),
        amount_gross: Set(gross_from_net(amount_net, vat_rate)),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    tracing::info!(
        invoice_id = created.id,
        amount_gross = created.amount_gross,
        "Invoice issued"
    );
    Ok(created)
}

/// Applies a partial update, recomputes gross and stamps `updated_at`.
pub async fn update_invoice(
    db: &DatabaseConnection,
    invoice_id: i64,
    changes: InvoiceUpdate,
) -> Result<invoice::Model> {
    let existing = get_invoice_by_id(db, invoice_id)
        .await?
        .ok_or_else(|| Error::not_found(COLLECTION, invoice_id))?;

    let amount_net = ensure_non_negative(changes.amount_net.unwrap_or(existing.amount_net))?;
    let vat_rate = ensure_percentage(changes.vat_rate.unwrap_or(existing.vat_rate))?;

    let mut model: invoice::ActiveModel = existing.into();
    if let Some(contract_id) = changes.contract_id {
        model.contract_id = Set(contract_id);
    }
    if let Some(issue_date) = changes.issue_date {
        model.issue_date = Set(issue_date);
    }
    if let Some(due_date) = changes.due_date {
        model.due_date = Set(due_date);
    }
    model.amount_net = Set(amount_net);
    model.vat_rate = Set(vat_rate);
    model.amount_gross = Set(gross_from_net(amount_net, vat_rate));
    model.updated_at = Set(Some(Utc::now()));

    let updated = model.update(db).await?;
    tracing::info!(invoice_id, "Invoice updated");
    Ok(updated)
}

/// Hard-deletes an invoice. Payments keep their `invoice_id`.
pub async fn delete_invoice(db: &DatabaseConnection, invoice_id: i64) -> Result<()> {
    let result = Invoice::delete_by_id(invoice_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found(COLLECTION, invoice_id));
    }
    tracing::info!(invoice_id, "Invoice deleted");
    Ok(())
}
