//! Report generation business logic.
//!
//! Every figure here is recomputed from the stored collections on each call.
//! The pure functions take already-fetched records plus the evaluation
//! instant; the `async` wrappers only do the fetching.

use super::{
    invoice::{InvoiceFilter, InvoiceView, get_invoice_views},
    money::round2,
    status::{InvoiceStatus, ScheduleStatus, derive_schedule_status},
};
use crate::{
    entities::{
        ActivityStatus, Coach, Contract, ContractStatus, Payment, PaymentSchedule, Student, coach,
        contract, payment, payment_schedule, student,
    },
    errors::Result,
};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Placeholder for a name whose record could not be found.
pub const UNKNOWN_NAME: &str = "Unknown";

const SECONDS_PER_DAY: i64 = 86_400;

/// Count and amount of the schedules in one status bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BucketTotals {
    pub count: usize,
    pub amount: f64,
}

/// Revenue and collection figures over payments and schedules.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerStats {
    /// Sum of all payment amounts
    pub total_revenue: f64,
    /// Sum of the coach shares stored on payments
    pub total_coach_share: f64,
    /// Sum of the management shares stored on payments
    pub total_management_share: f64,
    /// Installments due today or later with nothing paid
    pub upcoming: BucketTotals,
    /// Installments past due with nothing paid; amount is the unpaid remainder
    pub overdue: BucketTotals,
    /// Percentage of the scheduled amount already received
    pub collection_rate: f64,
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(flatten)]
    pub ledger: LedgerStats,
    pub total_students: usize,
    pub active_students: usize,
    pub total_coaches: usize,
    pub active_coaches: usize,
    pub active_contracts: usize,
    /// Coach share as a whole percentage of revenue
    pub coach_share_percent: f64,
    /// Management share as a whole percentage of revenue
    pub management_share_percent: f64,
    /// What the center keeps after coach shares
    pub net_profit: f64,
}

/// One unpaid invoice in the dues report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueEntry {
    pub invoice_id: i64,
    pub contract_id: i64,
    pub student_id: Option<i64>,
    pub student_name: String,
    pub due_date: DateTime<Utc>,
    pub amount_gross: f64,
    pub balance: f64,
    pub status: InvoiceStatus,
    /// Whole days until the due date, rounded up; zero or negative once overdue
    pub days_until_due: i64,
}

/// Unpaid invoices that need attention.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingDuesReport {
    pub overdue: Vec<DueEntry>,
    pub upcoming: Vec<DueEntry>,
    pub window_days: i64,
}

/// Revenue attributed to one coach. Payments without a resolvable coach are
/// grouped under `coach_id: None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachRevenue {
    pub coach_id: Option<i64>,
    pub coach_name: String,
    pub payment_count: usize,
    pub total_amount: f64,
    pub coach_share: f64,
    pub management_share: f64,
}

/// Calculates `part` as a percentage of `whole`, 0 when `whole` is zero.
#[must_use]
pub fn calculate_percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    (part / whole) * 100.0
}

/// Computes revenue and collection figures at `now`.
#[must_use]
pub fn compute_ledger_stats(
    payments: &[payment::Model],
    schedules: &[payment_schedule::Model],
    now: DateTime<Utc>,
) -> LedgerStats {
    let mut stats = LedgerStats::default();
    for payment in payments {
        stats.total_revenue += payment.amount;
        stats.total_coach_share += payment.coach_share;
        stats.total_management_share += payment.management_share;
    }

    let mut billable = 0.0;
    let mut collected = 0.0;
    for schedule in schedules {
        billable += schedule.amount;
        collected += schedule.paid_amount.min(schedule.amount);

        match derive_schedule_status(schedule.paid_amount, schedule.amount, schedule.due_date, now)
        {
            ScheduleStatus::Upcoming | ScheduleStatus::Due => {
                stats.upcoming.count += 1;
                stats.upcoming.amount += schedule.amount;
            }
            ScheduleStatus::Overdue => {
                stats.overdue.count += 1;
                stats.overdue.amount += schedule.amount - schedule.paid_amount;
            }
            ScheduleStatus::Paid | ScheduleStatus::Partial => {}
        }
    }

    stats.total_revenue = round2(stats.total_revenue);
    stats.total_coach_share = round2(stats.total_coach_share);
    stats.total_management_share = round2(stats.total_management_share);
    stats.upcoming.amount = round2(stats.upcoming.amount);
    stats.overdue.amount = round2(stats.overdue.amount);
    stats.collection_rate = round2(calculate_percentage(collected, billable));
    stats
}

/// Combines ledger figures with record counts.
#[must_use]
pub fn build_dashboard(
    ledger: LedgerStats,
    students: &[student::Model],
    coaches: &[coach::Model],
    contracts: &[contract::Model],
) -> DashboardStats {
    let coach_share_percent =
        calculate_percentage(ledger.total_coach_share, ledger.total_revenue).round();
    let management_share_percent =
        calculate_percentage(ledger.total_management_share, ledger.total_revenue).round();

    DashboardStats {
        total_students: students.len(),
        active_students: students
            .iter()
            .filter(|s| s.status == ActivityStatus::Active)
            .count(),
        total_coaches: coaches.len(),
        active_coaches: coaches
            .iter()
            .filter(|c| c.status == ActivityStatus::Active)
            .count(),
        active_contracts: contracts
            .iter()
            .filter(|c| c.status == ContractStatus::Active)
            .count(),
        coach_share_percent,
        management_share_percent,
        net_profit: ledger.total_management_share,
        ledger,
    }
}

/// Loads every collection the dashboard needs and builds it at `now`.
pub async fn get_dashboard(db: &DatabaseConnection, now: DateTime<Utc>) -> Result<DashboardStats> {
    let payments = Payment::find().all(db).await?;
    let schedules = PaymentSchedule::find().all(db).await?;
    let students = Student::find().all(db).await?;
    let coaches = Coach::find().all(db).await?;
    let contracts = Contract::find().all(db).await?;

    let ledger = compute_ledger_stats(&payments, &schedules, now);
    Ok(build_dashboard(ledger, &students, &coaches, &contracts))
}

/// Whole days from `now` until `due_date`, rounded up.
#[must_use]
pub fn days_until(due_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (due_date - now).num_seconds();
    seconds.div_euclid(SECONDS_PER_DAY) + i64::from(seconds.rem_euclid(SECONDS_PER_DAY) != 0)
}

/// Sorts unpaid invoices into overdue and due-within-`window_days`.
#[must_use]
pub fn upcoming_dues(
    invoices: Vec<InvoiceView>,
    contracts: &[contract::Model],
    students: &[student::Model],
    now: DateTime<Utc>,
    window_days: i64,
) -> UpcomingDuesReport {
    let contract_students: HashMap<i64, i64> =
        contracts.iter().map(|c| (c.id, c.student_id)).collect();
    let student_names: HashMap<i64, String> =
        students.iter().map(|s| (s.id, s.full_name())).collect();
    let horizon = Duration::try_days(window_days)
        .and_then(|window| now.checked_add_signed(window))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    let mut report = UpcomingDuesReport {
        window_days,
        ..Default::default()
    };
    for view in invoices {
        if view.balance <= 0.0 {
            continue;
        }
        let due_date = view.invoice.due_date;
        let is_overdue = view.status == InvoiceStatus::Overdue;
        if !is_overdue && due_date > horizon {
            continue;
        }

        let student_id = contract_students.get(&view.invoice.contract_id).copied();
        let student_name = student_id
            .and_then(|id| student_names.get(&id).cloned())
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());
        let entry = DueEntry {
            invoice_id: view.invoice.id,
            contract_id: view.invoice.contract_id,
            student_id,
            student_name,
            due_date,
            amount_gross: view.invoice.amount_gross,
            balance: view.balance,
            status: view.status,
            days_until_due: days_until(due_date, now),
        };
        if is_overdue {
            report.overdue.push(entry);
        } else {
            report.upcoming.push(entry);
        }
    }
    report
}

/// Builds the dues report from the database.
pub async fn get_upcoming_dues(
    db: &DatabaseConnection,
    now: DateTime<Utc>,
    window_days: i64,
) -> Result<UpcomingDuesReport> {
    let invoices = get_invoice_views(db, &InvoiceFilter::default(), now).await?;
    let contracts = Contract::find().all(db).await?;
    let students = Student::find().all(db).await?;
    Ok(upcoming_dues(invoices, &contracts, &students, now, window_days))
}

/// Totals payments per coach. Payments without a coach, or whose coach no
/// longer exists, are grouped under a `null` coach named "Unknown".
#[must_use]
pub fn coach_revenue(payments: &[payment::Model], coaches: &[coach::Model]) -> Vec<CoachRevenue> {
    let names: HashMap<i64, &str> = coaches.iter().map(|c| (c.id, c.name.as_str())).collect();
    let mut grouped: BTreeMap<Option<i64>, CoachRevenue> = BTreeMap::new();

    for payment in payments {
        let coach_id = payment.coach_id.filter(|id| names.contains_key(id));
        let entry = grouped.entry(coach_id).or_insert_with(|| CoachRevenue {
            coach_id,
            coach_name: coach_id
                .and_then(|id| names.get(&id).copied())
                .unwrap_or(UNKNOWN_NAME)
                .to_string(),
            payment_count: 0,
            total_amount: 0.0,
            coach_share: 0.0,
            management_share: 0.0,
        });
        entry.payment_count += 1;
        entry.total_amount += payment.amount;
        entry.coach_share += payment.coach_share;
        entry.management_share += payment.management_share;
    }

    grouped
        .into_values()
        .map(|mut row| {
            row.total_amount = round2(row.total_amount);
            row.coach_share = round2(row.coach_share);
            row.management_share = round2(row.management_share);
            row
        })
        .collect()
}

/// Builds the per-coach revenue table from the database.
pub async fn get_coach_revenue(db: &DatabaseConnection) -> Result<Vec<CoachRevenue>> {
    let payments = Payment::find().all(db).await?;
    let coaches = Coach::find().all(db).await?;
    Ok(coach_revenue(&payments, &coaches))
}
