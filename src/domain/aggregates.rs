//! Derived values over a member's payment records.
//!
//! Every function here is pure and recomputed from the slice it is given, so
//! the results can never drift from the underlying collection.

use super::payment::{Money, PaymentRecord, PaymentStatus};
use chrono::NaiveDate;

/// Number of records the dashboard lists as recent activity.
pub const RECENT_TRANSACTIONS: usize = 5;

fn count_status(records: &[PaymentRecord], status: PaymentStatus) -> usize {
    records.iter().filter(|r| r.status == status).count()
}

fn sum_where(records: &[PaymentRecord], pred: impl Fn(PaymentStatus) -> bool) -> Money {
    records
        .iter()
        .filter(|r| pred(r.status))
        .map(|r| Money::from(r.amount))
        .sum()
}

pub fn unpaid_count(records: &[PaymentRecord]) -> usize {
    count_status(records, PaymentStatus::Unpaid)
}

pub fn requested_count(records: &[PaymentRecord]) -> usize {
    count_status(records, PaymentStatus::Requested)
}

/// Amount still owed by the authority: unpaid plus requested months.
pub fn total_unpaid(records: &[PaymentRecord]) -> Money {
    sum_where(records, |s| s.is_outstanding())
}

/// Amount ever claimed: requested plus paid months.
pub fn total_ever_requested(records: &[PaymentRecord]) -> Money {
    sum_where(records, |s| s.is_settled())
}

/// Sum of every record regardless of status.
pub fn total_amount(records: &[PaymentRecord]) -> Money {
    sum_where(records, |_| true)
}

/// Sum of the records in exactly one status.
pub fn total_with_status(records: &[PaymentRecord], status: PaymentStatus) -> Money {
    sum_where(records, |s| s == status)
}

/// Earliest and latest outstanding records by due date.
///
/// On equal due dates the record that appears first wins on both ends.
pub fn unpaid_period(records: &[PaymentRecord]) -> Option<(&PaymentRecord, &PaymentRecord)> {
    let mut outstanding = records.iter().filter(|r| r.status.is_outstanding());
    let first = outstanding.next()?;
    let (earliest, latest) = outstanding.fold((first, first), |(lo, hi), r| {
        let lo = if r.due_date < lo.due_date { r } else { lo };
        let hi = if r.due_date > hi.due_date { r } else { hi };
        (lo, hi)
    });
    Some((earliest, latest))
}

/// `(min due date, max due date)` over outstanding records.
pub fn unpaid_date_range(records: &[PaymentRecord]) -> Option<(NaiveDate, NaiveDate)> {
    unpaid_period(records).map(|(lo, hi)| (lo.due_date, hi.due_date))
}

/// `"Nov, 2023 - Feb, 2024"`, or `"No unpaid months"`.
pub fn unpaid_period_text(records: &[PaymentRecord]) -> String {
    match unpaid_period(records) {
        Some((lo, hi)) => format!("{} - {}", lo.short_period(), hi.short_period()),
        None => "No unpaid months".to_string(),
    }
}

/// Every record ordered by due date, newest first. Stable on ties.
pub fn transaction_history(records: &[PaymentRecord]) -> Vec<PaymentRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.due_date.cmp(&a.due_date));
    sorted
}

/// The `n` most recent records by due date.
pub fn recent_transactions(records: &[PaymentRecord], n: usize) -> Vec<PaymentRecord> {
    let mut history = transaction_history(records);
    history.truncate(n);
    history
}

/// Records a member may still request early payment for.
pub fn unpaid_records(records: &[PaymentRecord]) -> Vec<PaymentRecord> {
    records
        .iter()
        .filter(|r| r.status == PaymentStatus::Unpaid)
        .cloned()
        .collect()
}

/// Dashboard snapshot built from the current records.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub unpaid_count: usize,
    pub requested_count: usize,
    pub total_unpaid: Money,
    pub total_ever_requested: Money,
    pub unpaid_range: Option<(NaiveDate, NaiveDate)>,
    pub period_text: String,
    pub recent: Vec<PaymentRecord>,
}

impl DashboardSummary {
    pub fn from_records(records: &[PaymentRecord]) -> Self {
        Self {
            unpaid_count: unpaid_count(records),
            requested_count: requested_count(records),
            total_unpaid: total_unpaid(records),
            total_ever_requested: total_ever_requested(records),
            unpaid_range: unpaid_date_range(records),
            period_text: unpaid_period_text(records),
            recent: recent_transactions(records, RECENT_TRANSACTIONS),
        }
    }
}
