//! # Due-Date Standing
//!
//! Classifies a borrowed copy by how close its due date is.
//!
//! ```text
//!   days_remaining = ceil((due - today) / 1 day)
//!
//!   < 0      Danger   "Overdue by N days"
//!   0..=3    Warning  "Due Soon"
//!   > 3      Good     "Good Standing"
//! ```
//!
//! Evaluation is at calendar-day granularity: "now" is the member's local
//! date, so a copy due today is `Warning`, never `Danger`. Nothing here is
//! cached; callers re-classify whenever they render.

use chrono::NaiveDate;

use crate::api::IssueRecord;

/// Days before the due date at which a copy counts as "due soon".
pub const DUE_SOON_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    Good,
    Warning,
    Danger,
}

impl DueStatus {
    pub fn label(self) -> &'static str {
        match self {
            DueStatus::Good => "Good Standing",
            DueStatus::Warning => "Due Soon",
            DueStatus::Danger => "Overdue",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Standing {
    pub status: DueStatus,
    /// Negative once overdue.
    pub days_remaining: i64,
}

impl Standing {
    /// "5" while there is time left, "Overdue by 2 days" afterwards.
    pub fn remaining_text(&self) -> String {
        if self.days_remaining >= 0 {
            self.days_remaining.to_string()
        } else {
            let days = self.days_remaining.unsigned_abs();
            format!("Overdue by {days} day{}", if days == 1 { "" } else { "s" })
        }
    }
}

pub fn classify(due: NaiveDate, today: NaiveDate) -> Standing {
    let days_remaining = (due - today).num_days();
    let status = if days_remaining < 0 {
        DueStatus::Danger
    } else if days_remaining <= DUE_SOON_DAYS {
        DueStatus::Warning
    } else {
        DueStatus::Good
    };
    Standing {
        status,
        days_remaining,
    }
}

/// Classifies every record, keeping input order.
pub fn classify_all<'a>(
    records: &'a [IssueRecord],
    today: NaiveDate,
) -> Vec<(&'a IssueRecord, Standing)> {
    records
        .iter()
        .map(|record| (record, classify(record.due_date, today)))
        .collect()
}
