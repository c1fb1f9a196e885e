//! # Fine Accrual
//!
//! Outstanding fines are derived locally from the borrowed-book list; they
//! are never stored. A record is overdue when it has not been returned and
//! today is strictly after its due date.
//!
//! All arithmetic is in whole days and whole currency units, so the total
//! always equals the sum of the per-item amounts.

use chrono::NaiveDate;

use crate::api::IssueRecord;

/// Default charge per overdue copy per day.
pub const DEFAULT_FINE_PER_DAY: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinePolicy {
    pub rate_per_day: u32,
}

impl Default for FinePolicy {
    fn default() -> Self {
        Self {
            rate_per_day: DEFAULT_FINE_PER_DAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverdueFine {
    pub record_id: i64,
    pub book_name: String,
    pub due_date: NaiveDate,
    pub days_overdue: u32,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FineSummary {
    pub rate_per_day: u32,
    /// Overdue records in input order.
    pub items: Vec<OverdueFine>,
    pub total: u64,
}

impl FineSummary {
    /// True only when nothing is overdue, whatever the rate.
    pub fn is_clear(&self) -> bool {
        self.items.is_empty()
    }
}

pub fn is_overdue(record: &IssueRecord, today: NaiveDate) -> bool {
    record.return_date.is_none() && today > record.due_date
}

/// Whole days past the due date; zero when not overdue.
pub fn days_overdue(record: &IssueRecord, today: NaiveDate) -> u32 {
    if !is_overdue(record, today) {
        return 0;
    }
    u32::try_from((today - record.due_date).num_days()).unwrap_or(u32::MAX)
}

impl FinePolicy {
    pub fn fine_for(&self, record: &IssueRecord, today: NaiveDate) -> Option<OverdueFine> {
        if !is_overdue(record, today) {
            return None;
        }
        let days = days_overdue(record, today);
        Some(OverdueFine {
            record_id: record.id,
            book_name: record.book_name.clone(),
            due_date: record.due_date,
            days_overdue: days,
            amount: u64::from(days) * u64::from(self.rate_per_day),
        })
    }

    pub fn assess(&self, records: &[IssueRecord], today: NaiveDate) -> FineSummary {
        let items: Vec<OverdueFine> = records
            .iter()
            .filter_map(|record| self.fine_for(record, today))
            .collect();
        let total = items.iter().map(|fine| fine.amount).sum();
        FineSummary {
            rate_per_day: self.rate_per_day,
            items,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{borrowed, date};

    #[test]
    fn test_due_today_accrues_nothing() {
        let today = date(2024, 6, 10);
        let summary = FinePolicy::default().assess(&[borrowed(1, today)], today);
        assert!(summary.items.is_empty());
        assert_eq!(summary.total, 0);
        assert!(summary.is_clear());
    }

    #[test]
    fn test_one_day_overdue_costs_five() {
        let today = date(2024, 6, 10);
        let summary = FinePolicy::default().assess(&[borrowed(1, date(2024, 6, 9))], today);
        assert_eq!(summary.items.len(), 1);
        assert_eq!(summary.items[0].days_overdue, 1);
        assert_eq!(summary.items[0].amount, 5);
        assert_eq!(summary.total, 5);
    }

    #[test]
    fn test_returned_records_never_fine() {
        let today = date(2024, 6, 10);
        let mut record = borrowed(1, date(2024, 5, 1));
        record.return_date = Some(date(2024, 5, 20));
        assert!(!is_overdue(&record, today));
        assert_eq!(days_overdue(&record, today), 0);
        assert_eq!(FinePolicy::default().assess(&[record], today).total, 0);
    }

    #[test]
    fn test_total_matches_per_item_sum() {
        let today = date(2024, 6, 10);
        let records = vec![
            borrowed(1, date(2024, 6, 1)),
            borrowed(2, date(2024, 6, 20)),
            borrowed(3, date(2024, 5, 10)),
            borrowed(4, today),
        ];
        let policy = FinePolicy::default();
        let summary = policy.assess(&records, today);
        let independent: u64 = records
            .iter()
            .filter_map(|r| policy.fine_for(r, today))
            .map(|f| f.amount)
            .sum();
        assert_eq!(summary.total, independent);
        assert_eq!(summary.total, (9 + 31) * 5);
        assert_eq!(
            summary.items.iter().map(|f| f.record_id).collect::<Vec<_>>(),
            vec![1, 3]
        );
    }

    #[test]
    fn test_total_monotonic_in_today() {
        let records = vec![
            borrowed(1, date(2024, 6, 5)),
            borrowed(2, date(2024, 6, 15)),
        ];
        let policy = FinePolicy::default();
        let mut today = date(2024, 5, 25);
        let mut previous = policy.assess(&records, today).total;
        for _ in 0..40 {
            today = today.succ_opt().unwrap();
            let total = policy.assess(&records, today).total;
            if today > date(2024, 6, 5) {
                assert!(total > previous, "expected growth on {today}");
            } else {
                assert_eq!(total, previous, "expected constant on {today}");
            }
            previous = total;
        }
    }

    #[test]
    fn test_custom_rate() {
        let today = date(2024, 6, 10);
        let policy = FinePolicy { rate_per_day: 2 };
        let summary = policy.assess(&[borrowed(1, date(2024, 6, 7))], today);
        assert_eq!(summary.total, 6);
        assert_eq!(summary.rate_per_day, 2);
    }

    #[test]
    fn test_overdue_item_is_never_clear() {
        let today = date(2024, 6, 10);
        let policy = FinePolicy { rate_per_day: 0 };
        let summary = policy.assess(&[borrowed(1, date(2024, 6, 1))], today);
        assert_eq!(summary.items.len(), 1);
        assert!(!summary.is_clear());
    }
}
