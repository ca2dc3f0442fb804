//! Lifecycle status derivation for invoices and payment schedules.
//!
//! Statuses are never persisted. They are recomputed from amounts and due
//! dates on every read, with the evaluation instant passed in explicitly so
//! the rules stay pure and testable.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Nothing paid yet, not yet due
    Pending,
    /// Fully settled
    Paid,
    /// Past due with money still outstanding
    Overdue,
    /// Partly settled, not yet due
    Partial,
}

/// Lifecycle state of a scheduled installment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    /// Due on a later day
    Upcoming,
    /// Due today and unpaid
    Due,
    /// Due before today and unpaid
    Overdue,
    /// Fully paid
    Paid,
    /// Some but not all of the amount received
    Partial,
}

/// Classifies an invoice. First matching rule wins:
///
/// 1. `balance <= 0` is `Paid`
/// 2. partly paid and `now <= due_date` is `Partial`
/// 3. outstanding and `due_date < now` is `Overdue`, even if partly paid
/// 4. otherwise `Pending`
#[must_use]
pub fn derive_invoice_status(
    balance: f64,
    amount_gross: f64,
    due_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> InvoiceStatus {
    if balance <= 0.0 {
        InvoiceStatus::Paid
    } else if balance < amount_gross && now <= due_date {
        InvoiceStatus::Partial
    } else if due_date < now {
        InvoiceStatus::Overdue
    } else {
        InvoiceStatus::Pending
    }
}

/// Classifies an installment. First matching rule wins:
///
/// 1. `paid_amount >= amount` is `Paid`
/// 2. `0 < paid_amount < amount` is `Partial`
/// 3. unpaid and due before the start of today is `Overdue`
/// 4. unpaid and due today is `Due`
/// 5. otherwise `Upcoming`
///
/// "Today" is the UTC calendar day containing `now`.
#[must_use]
pub fn derive_schedule_status(
    paid_amount: f64,
    amount: f64,
    due_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> ScheduleStatus {
    if paid_amount >= amount {
        ScheduleStatus::Paid
    } else if paid_amount > 0.0 {
        ScheduleStatus::Partial
    } else if due_date < start_of_day(now) {
        ScheduleStatus::Overdue
    } else if due_date.date_naive() == now.date_naive() {
        ScheduleStatus::Due
    } else {
        ScheduleStatus::Upcoming
    }
}

/// Midnight UTC of the day containing `instant`.
#[must_use]
pub fn start_of_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.date_naive().and_time(NaiveTime::MIN).and_utc()
}
