//! Plain-text rendering of server data for the terminal.
//!
//! Every function returns a `String`; printing is left to the caller.

use std::fmt::Write;

use chrono::NaiveDate;

use crate::api::{
    Book, BookCopy, CheckoutResponse, IssueRecord, MemberDashboard, MemberProfile, Payment,
};
use crate::core::cart::{Cart, CartPhase};
use crate::core::fines::FineSummary;
use crate::core::nav::NavGraph;
use crate::core::standing::Standing;
use crate::member::Alert;

const CURRENCY: &str = "₹";

fn date_or_dash(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn money(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{CURRENCY}{amount:.0}")
    } else {
        format!("{CURRENCY}{amount:.2}")
    }
}

pub fn alert(alert: &Alert) -> String {
    format!("{}\n  {}", alert.title, alert.message)
}

pub fn status(graph: NavGraph) -> String {
    let mut out = String::new();
    let _ = match graph {
        NavGraph::Main => writeln!(out, "Signed in."),
        NavGraph::Auth => writeln!(out, "Not signed in."),
    };
    let _ = writeln!(out, "Home: {}", graph.initial_screen().title());
    let titles: Vec<&str> = graph.screens().map(|s| s.title()).collect();
    let _ = writeln!(out, "Available: {}", titles.join(", "));
    out
}

pub fn dashboard(d: &MemberDashboard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Welcome back, {}", d.member_name);
    let membership = if d.membership_active { "Active" } else { "Inactive" };
    let _ = writeln!(
        out,
        "Membership: {membership} (valid until {})",
        date_or_dash(d.membership_due_date)
    );
    let _ = writeln!(out, "Borrowed:   {}", d.currently_borrowed_count);
    let _ = writeln!(out, "Books read: {}", d.total_books_read_count);
    let _ = writeln!(out, "Fines:      {}", money(d.outstanding_fines));
    if !d.recent_activity.is_empty() {
        let _ = writeln!(out, "\nRecent activity:");
        for record in &d.recent_activity {
            let _ = writeln!(
                out,
                "  {}  {}",
                record.issue_date.format("%Y-%m-%d"),
                record.book_name
            );
        }
    }
    out
}

pub fn books(books: &[Book]) -> String {
    if books.is_empty() {
        return "No books found.\n".to_string();
    }
    let mut out = String::new();
    for book in books {
        let stock = if book.has_copies() {
            format!("{} available", book.available_copies)
        } else {
            "Unavailable".to_string()
        };
        let _ = writeln!(
            out,
            "#{:<5} {} by {}  [{stock}]",
            book.id, book.name, book.author
        );
    }
    out
}

pub fn copies(copies: &[BookCopy]) -> String {
    if copies.is_empty() {
        return "No copies available.\n".to_string();
    }
    let mut out = String::new();
    for copy in copies {
        let _ = writeln!(
            out,
            "Copy #{:<5} rack {:<8} {}",
            copy.id,
            copy.rack.as_deref().unwrap_or("-"),
            copy.status.label()
        );
    }
    out
}

pub fn cart(cart: &Cart) -> String {
    if cart.phase() == CartPhase::Empty {
        return "Your cart is empty.\n".to_string();
    }
    let mut out = String::new();
    for item in cart.items() {
        let _ = writeln!(
            out,
            "[{}] {} (copy #{}, rack {})",
            item.cart_item_id,
            item.book_name,
            item.copy_id,
            item.rack.as_deref().unwrap_or("-")
        );
    }
    let _ = writeln!(out, "{} item(s)", cart.len());
    out
}

pub fn checkout(response: &CheckoutResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Checkout Successful: {}", response.status);
    for record in &response.borrowed_books {
        let _ = writeln!(
            out,
            "  {} due {}",
            record.book_name,
            record.due_date.format("%Y-%m-%d")
        );
    }
    if let Some(amount) = response.amount_paid {
        let _ = writeln!(out, "Paid: {}", money(amount));
    }
    out
}

pub fn standings(rows: &[(&IssueRecord, Standing)]) -> String {
    if rows.is_empty() {
        return "You have no borrowed books.\n".to_string();
    }
    let mut out = String::new();
    for (record, standing) in rows {
        let _ = writeln!(
            out,
            "{:<8} {}  due {}  ({})",
            standing.status.label(),
            record.book_name,
            record.due_date.format("%Y-%m-%d"),
            standing.remaining_text()
        );
    }
    out
}

pub fn fines(summary: &FineSummary) -> String {
    let mut out = String::new();
    if summary.is_clear() {
        let _ = writeln!(out, "No outstanding fines.");
    } else {
        for fine in &summary.items {
            let _ = writeln!(
                out,
                "{}  {} day(s) overdue  {CURRENCY}{}",
                fine.book_name, fine.days_overdue, fine.amount
            );
        }
        let _ = writeln!(out, "Total outstanding: {CURRENCY}{}", summary.total);
    }
    let _ = writeln!(
        out,
        "Fine rate: {CURRENCY}{} per book, per day after the due date.",
        summary.rate_per_day
    );
    out
}

pub fn history(records: &[IssueRecord]) -> String {
    if records.is_empty() {
        return "No borrowing history.\n".to_string();
    }
    let mut out = String::new();
    for record in records {
        let returned = match record.return_date {
            Some(date) => format!("returned {}", date.format("%Y-%m-%d")),
            None => "not returned".to_string(),
        };
        let _ = writeln!(
            out,
            "{}  issued {}  {returned}  fine paid {}",
            record.book_name,
            record.issue_date.format("%Y-%m-%d"),
            money(record.fine.unwrap_or(0.0))
        );
    }
    out
}

pub fn payments(payments: &[Payment]) -> String {
    if payments.is_empty() {
        return "No payments yet.\n".to_string();
    }
    let mut out = String::new();
    for payment in payments {
        let _ = writeln!(
            out,
            "{}  {:<15} {}",
            payment.transaction_time.format("%Y-%m-%d %H:%M"),
            payment.kind.label(),
            money(payment.amount)
        );
    }
    out
}

pub fn profile(p: &MemberProfile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}] {}", p.initials(), p.name);
    let _ = writeln!(out, "Member ID:  LIB-{}", p.id);
    let _ = writeln!(out, "Email:      {}", p.email);
    let _ = writeln!(out, "Phone:      {}", p.phone.as_deref().unwrap_or("-"));
    let status = if p.membership_active { "Active" } else { "Inactive" };
    let _ = writeln!(out, "Membership: {status}");
    let _ = writeln!(out, "Valid until {}", date_or_dash(p.membership_due_date));
    out
}
