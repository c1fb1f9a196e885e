//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::api::{
    ApiError, AuthResponse, Book, BookCopy, CartItem, ChangePasswordRequest, CheckoutResponse,
    IssueRecord, LibraryBackend, LoginRequest, MemberDashboard, MemberProfile, Payment,
    RegisterRequest,
};
use crate::core::store::{KeyValueStore, MemoryStore, StoreError};

/// A backend that answers every call with an empty success and counts calls.
#[derive(Default)]
pub struct NoopBackend {
    calls: AtomicUsize,
}

impl NoopBackend {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl LibraryBackend for NoopBackend {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.hit();
        Ok(AuthResponse {
            token: Some("noop-token".to_string()),
            email: Some(request.email.clone()),
            role: None,
        })
    }

    async fn register(&self, _request: &RegisterRequest) -> Result<(), ApiError> {
        self.hit();
        Ok(())
    }

    async fn dashboard(&self, _token: &str) -> Result<MemberDashboard, ApiError> {
        self.hit();
        Ok(MemberDashboard {
            member_name: "Noop".to_string(),
            membership_active: true,
            membership_due_date: None,
            currently_borrowed_count: 0,
            total_books_read_count: 0,
            outstanding_fines: 0.0,
            recent_activity: Vec::new(),
        })
    }

    async fn all_books(&self, _token: &str) -> Result<Vec<Book>, ApiError> {
        self.hit();
        Ok(Vec::new())
    }

    async fn search_books(&self, _token: &str, _query: &str) -> Result<Vec<Book>, ApiError> {
        self.hit();
        Ok(Vec::new())
    }

    async fn available_copies(&self, _token: &str, _book_id: i64) -> Result<Vec<BookCopy>, ApiError> {
        self.hit();
        Ok(Vec::new())
    }

    async fn add_to_cart(&self, _token: &str, _copy_id: i64) -> Result<(), ApiError> {
        self.hit();
        Ok(())
    }

    async fn cart(&self, _token: &str) -> Result<Vec<CartItem>, ApiError> {
        self.hit();
        Ok(Vec::new())
    }

    async fn remove_from_cart(&self, _token: &str, _cart_item_id: i64) -> Result<(), ApiError> {
        self.hit();
        Ok(())
    }

    async fn checkout(&self, _token: &str) -> Result<CheckoutResponse, ApiError> {
        self.hit();
        Ok(CheckoutResponse {
            status: "SUCCESS".to_string(),
            borrowed_books: Vec::new(),
            amount_paid: None,
            payment_details: None,
        })
    }

    async fn profile(&self, _token: &str) -> Result<MemberProfile, ApiError> {
        self.hit();
        Ok(MemberProfile {
            id: 1,
            name: "Noop".to_string(),
            email: "noop@example.com".to_string(),
            phone: None,
            membership_active: true,
            membership_due_date: None,
        })
    }

    async fn borrowed_books(&self, _token: &str) -> Result<Vec<IssueRecord>, ApiError> {
        self.hit();
        Ok(Vec::new())
    }

    async fn borrowing_history(&self, _token: &str) -> Result<Vec<IssueRecord>, ApiError> {
        self.hit();
        Ok(Vec::new())
    }

    async fn payment_history(&self, _token: &str) -> Result<Vec<Payment>, ApiError> {
        self.hit();
        Ok(Vec::new())
    }

    async fn change_password(
        &self,
        _token: &str,
        _request: &ChangePasswordRequest,
    ) -> Result<(), ApiError> {
        self.hit();
        Ok(())
    }
}

/// A store whose every operation fails, as a full or read-only disk would.
pub struct FailingStore;

fn denied() -> StoreError {
    StoreError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
}

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(denied())
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(denied())
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(denied())
    }
}

/// An in-memory store that can be switched to refuse writes mid-test.
#[derive(Default)]
pub struct ReadOnlySwitchStore {
    inner: MemoryStore,
    read_only: AtomicBool,
}

impl ReadOnlySwitchStore {
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.read_only.load(Ordering::SeqCst) {
            Err(denied())
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for ReadOnlySwitchStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        self.inner.remove(key)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// An unreturned borrowing record due on `due`.
pub fn borrowed(id: i64, due: NaiveDate) -> IssueRecord {
    IssueRecord {
        id,
        book_name: format!("Book {id}"),
        book_author: Some("Anon".to_string()),
        copy_id: id * 10,
        issue_date: due - chrono::Duration::days(14),
        due_date: due,
        return_date: None,
        fine: None,
    }
}

pub fn cart_item(id: i64) -> CartItem {
    CartItem {
        cart_item_id: id,
        copy_id: id * 100,
        book_name: format!("Title {id}"),
        book_author: None,
        rack: Some(format!("R-{id}")),
        added_at: None,
    }
}
