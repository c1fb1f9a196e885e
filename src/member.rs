//! # Member Session
//!
//! The object every user action goes through. It owns the session gate, the
//! backend handle and all session-scoped state (cart and lists), and turns
//! each action into: validate → request → update local state.
//!
//! ```text
//! Member
//! ├── backend: Arc<dyn LibraryBackend>   // REST calls
//! ├── session: SessionGate               // token + published state
//! ├── fine_policy: FinePolicy            // local fine computation
//! ├── cart: Cart                         // optimistic cart view
//! ├── borrowed: Listing<IssueRecord>     // currently held copies
//! ├── history: Listing<IssueRecord>      // all borrowing records
//! └── payments: Listing<Payment>         // fee and fine ledger
//! ```
//!
//! Nothing is retried automatically. Every failure leaves the state as it
//! was before the action, except a rejected cart removal, which reconciles
//! by re-fetching the cart.

mod alert;

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use log::{info, warn};

use crate::api::{
    ApiError, Book, BookCopy, CartItem, CheckoutResponse, IssueRecord, LibraryBackend,
    MemberDashboard, MemberProfile, Payment,
};
use crate::core::cart::{Cart, CartError, Removal};
use crate::core::fines::{FinePolicy, FineSummary};
use crate::core::listing::Listing;
use crate::core::nav::{NavGraph, Screen};
use crate::core::session::{SessionError, SessionGate, SessionState};
use crate::core::standing::{self, Standing};
use crate::core::store::KeyValueStore;
use crate::core::validate::{self, ChangePasswordForm, RegisterForm, ValidationError};

pub use alert::{Action, Alert};

#[derive(Debug)]
pub enum MemberError {
    /// Client-side check failed; nothing was sent.
    Validation(ValidationError),
    Api(ApiError),
    Session(SessionError),
    Cart(CartError),
    /// The action needs the main graph but no one is signed in.
    NotSignedIn,
    /// Login succeeded at HTTP level but carried no token.
    InvalidLoginResponse,
    /// The title reports no available copies.
    OutOfStock,
    /// The title claimed copies but none were left when asked.
    NoCopiesAvailable,
    /// The server refused a cart removal. `reconciled` tells whether the
    /// follow-up refetch brought the cart back in line with the server.
    RemovalNotSynced { source: ApiError, reconciled: bool },
}

impl fmt::Display for MemberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberError::Validation(e) => write!(f, "{e}"),
            MemberError::Api(e) => write!(f, "{e}"),
            MemberError::Session(e) => write!(f, "{e}"),
            MemberError::Cart(e) => write!(f, "{e}"),
            MemberError::NotSignedIn => write!(f, "not signed in"),
            MemberError::InvalidLoginResponse => {
                write!(f, "received an invalid response from the server")
            }
            MemberError::OutOfStock => write!(f, "no available copies of this book"),
            MemberError::NoCopiesAvailable => write!(f, "no copies were available at this moment"),
            MemberError::RemovalNotSynced { source, reconciled } => {
                write!(f, "could not sync removal with server ({source})")?;
                if !reconciled {
                    write!(f, "; cart may be out of date")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for MemberError {}

impl From<ValidationError> for MemberError {
    fn from(e: ValidationError) -> Self {
        MemberError::Validation(e)
    }
}

impl From<ApiError> for MemberError {
    fn from(e: ApiError) -> Self {
        MemberError::Api(e)
    }
}

impl From<SessionError> for MemberError {
    fn from(e: SessionError) -> Self {
        MemberError::Session(e)
    }
}

impl From<CartError> for MemberError {
    fn from(e: CartError) -> Self {
        MemberError::Cart(e)
    }
}

pub struct Member {
    backend: Arc<dyn LibraryBackend>,
    session: SessionGate,
    fine_policy: FinePolicy,
    cart: Cart,
    borrowed: Listing<IssueRecord>,
    history: Listing<IssueRecord>,
    payments: Listing<Payment>,
}

impl Member {
    pub fn new(
        backend: Arc<dyn LibraryBackend>,
        store: Arc<dyn KeyValueStore>,
        fine_policy: FinePolicy,
    ) -> Self {
        Self {
            backend,
            session: SessionGate::new(store),
            fine_policy,
            cart: Cart::new(),
            borrowed: Listing::new(),
            history: Listing::new(),
            payments: Listing::new(),
        }
    }

    // ========================================================================
    // Session
    // ========================================================================

    /// Reads the persisted session and returns the graph to show.
    pub fn restore(&mut self) -> NavGraph {
        NavGraph::for_token(self.session.restore().as_deref())
    }

    pub fn session(&self) -> &SessionGate {
        &self.session
    }

    /// The active graph; `Auth` until a session is restored or created.
    pub fn graph(&self) -> NavGraph {
        self.session.graph().unwrap_or(NavGraph::Auth)
    }

    fn token(&self) -> Result<String, MemberError> {
        self.session.token().ok_or(MemberError::NotSignedIn)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), MemberError> {
        let request = validate::login(email, password)?;
        let response = self.backend.login(&request).await?;
        let token = response
            .token
            .filter(|t| !t.is_empty())
            .ok_or(MemberError::InvalidLoginResponse)?;
        self.session.login(token)?;
        self.reset_session_state();
        info!("Signed in as {}", request.email);
        Ok(())
    }

    /// Creates the account, then signs in with the same credentials.
    pub async fn register(&mut self, form: &RegisterForm) -> Result<(), MemberError> {
        let request = validate::register(form)?;
        self.backend.register(&request).await?;
        info!("Registered {}; signing in", request.email);
        self.login(&request.email, &request.password).await
    }

    /// Ends the session and drops everything fetched under it.
    pub fn logout(&mut self) -> Result<(), MemberError> {
        self.reset_session_state();
        self.session.logout()?;
        Ok(())
    }

    fn reset_session_state(&mut self) {
        self.cart.clear();
        self.borrowed.clear();
        self.history.clear();
        self.payments.clear();
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    pub async fn dashboard(&self) -> Result<MemberDashboard, MemberError> {
        let token = self.token()?;
        Ok(self.backend.dashboard(&token).await?)
    }

    /// The whole catalog, or the matches for a non-blank `query`.
    pub async fn catalog(&self, query: Option<&str>) -> Result<Vec<Book>, MemberError> {
        let token = self.token()?;
        let books = match validate::search_query(query) {
            Some(query) => self.backend.search_books(&token, query).await?,
            None => self.backend.all_books(&token).await?,
        };
        Ok(books)
    }

    pub async fn copies(&self, book_id: i64) -> Result<Vec<BookCopy>, MemberError> {
        let token = self.token()?;
        Ok(self.backend.available_copies(&token, book_id).await?)
    }

    pub async fn profile(&self) -> Result<MemberProfile, MemberError> {
        let token = self.token()?;
        Ok(self.backend.profile(&token).await?)
    }

    pub async fn change_password(&self, form: &ChangePasswordForm) -> Result<(), MemberError> {
        let token = self.token()?;
        let request = validate::change_password(form)?;
        self.backend.change_password(&token, &request).await?;
        info!("Password changed");
        Ok(())
    }

    // ========================================================================
    // Cart
    // ========================================================================

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub async fn refresh_cart(&mut self) -> Result<&[CartItem], MemberError> {
        let token = self.token()?;
        let ticket = self.cart.begin_refresh();
        match self.backend.cart(&token).await {
            Ok(items) => {
                self.cart.apply(ticket, items);
                Ok(self.cart.items())
            }
            Err(e) => {
                self.cart.fail_refresh(ticket);
                Err(e.into())
            }
        }
    }

    /// Reserves a copy, then re-fetches the cart so the server-assigned
    /// cart item shows up.
    pub async fn add_to_cart(&mut self, copy_id: i64) -> Result<(), MemberError> {
        let token = self.token()?;
        self.backend.add_to_cart(&token, copy_id).await?;
        self.cart.mark_stale();
        if let Err(e) = self.refresh_cart().await {
            warn!("Copy #{copy_id} reserved but cart refresh failed: {e}");
        }
        Ok(())
    }

    /// Reserves the first available copy of `book`.
    pub async fn add_first_available(&mut self, book: &Book) -> Result<BookCopy, MemberError> {
        if !book.has_copies() {
            return Err(MemberError::OutOfStock);
        }
        let copy = self
            .copies(book.id)
            .await?
            .into_iter()
            .next()
            .ok_or(MemberError::NoCopiesAvailable)?;
        self.add_to_cart(copy.id).await?;
        Ok(copy)
    }

    /// First phase of a removal: the item leaves the visible cart at once.
    pub fn begin_remove(&mut self, cart_item_id: i64) -> Result<Removal, MemberError> {
        self.token()?;
        Ok(self.cart.begin_remove(cart_item_id)?)
    }

    /// Second phase: ask the server. A refusal re-fetches the cart.
    pub async fn settle_remove(&mut self, removal: Removal) -> Result<(), MemberError> {
        let token = self.token()?;
        let result = self
            .backend
            .remove_from_cart(&token, removal.cart_item_id())
            .await;
        match result {
            Ok(()) => {
                self.cart.confirm_remove(removal);
                Ok(())
            }
            Err(source) => {
                self.cart.reject_remove(removal);
                let reconciled = match self.refresh_cart().await {
                    Ok(_) => true,
                    Err(e) => {
                        warn!("Cart refetch after failed removal also failed: {e}");
                        false
                    }
                };
                Err(MemberError::RemovalNotSynced { source, reconciled })
            }
        }
    }

    pub async fn remove_from_cart(&mut self, cart_item_id: i64) -> Result<(), MemberError> {
        let removal = self.begin_remove(cart_item_id)?;
        self.settle_remove(removal).await
    }

    /// Borrows everything in the cart in one request. On failure the cart is
    /// left exactly as it was.
    pub async fn checkout(&mut self) -> Result<CheckoutResponse, MemberError> {
        let token = self.token()?;
        let ticket = self.cart.begin_checkout()?;
        match self.backend.checkout(&token).await {
            Ok(response) => {
                self.cart.checkout_succeeded(ticket);
                self.borrowed.mark_stale();
                self.history.mark_stale();
                self.payments.mark_stale();
                info!(
                    "Checkout complete: {} book(s) borrowed",
                    response.borrowed_books.len()
                );
                Ok(response)
            }
            Err(e) => {
                self.cart.checkout_failed(ticket);
                Err(e.into())
            }
        }
    }

    // ========================================================================
    // Borrowing, fines, history
    // ========================================================================

    /// The member navigated away from `screen`. Responses for its list that
    /// are still in flight are dropped when they land.
    pub fn leave(&mut self, screen: Screen) {
        match screen {
            Screen::Cart => self.cart.detach(),
            Screen::BorrowedBooks | Screen::Fines => self.borrowed.detach(),
            Screen::BorrowingHistory => self.history.detach(),
            Screen::PaymentHistory => self.payments.detach(),
            _ => {}
        }
    }

    pub fn borrowed(&self) -> &Listing<IssueRecord> {
        &self.borrowed
    }

    pub fn history(&self) -> &Listing<IssueRecord> {
        &self.history
    }

    pub fn payments(&self) -> &Listing<Payment> {
        &self.payments
    }

    pub async fn refresh_borrowed(&mut self) -> Result<&[IssueRecord], MemberError> {
        let token = self.token()?;
        let ticket = self.borrowed.begin_refresh();
        match self.backend.borrowed_books(&token).await {
            Ok(items) => {
                self.borrowed.apply(ticket, items);
                Ok(self.borrowed.items())
            }
            Err(e) => {
                self.borrowed.fail(ticket);
                Err(e.into())
            }
        }
    }

    pub async fn refresh_history(&mut self) -> Result<&[IssueRecord], MemberError> {
        let token = self.token()?;
        let ticket = self.history.begin_refresh();
        match self.backend.borrowing_history(&token).await {
            Ok(items) => {
                self.history.apply(ticket, items);
                Ok(self.history.items())
            }
            Err(e) => {
                self.history.fail(ticket);
                Err(e.into())
            }
        }
    }

    pub async fn refresh_payments(&mut self) -> Result<&[Payment], MemberError> {
        let token = self.token()?;
        let ticket = self.payments.begin_refresh();
        match self.backend.payment_history(&token).await {
            Ok(items) => {
                self.payments.apply(ticket, items);
                Ok(self.payments.items())
            }
            Err(e) => {
                self.payments.fail(ticket);
                Err(e.into())
            }
        }
    }

    /// Standing of each borrowed copy as of `today`.
    pub fn standings(&self, today: NaiveDate) -> Vec<(&IssueRecord, Standing)> {
        standing::classify_all(self.borrowed.items(), today)
    }

    /// Outstanding fines on the borrowed copies as of `today`.
    pub fn fines(&self, today: NaiveDate) -> FineSummary {
        self.fine_policy.assess(self.borrowed.items(), today)
    }

    pub fn fine_policy(&self) -> FinePolicy {
        self.fine_policy
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::MemoryStore;
    use crate::test_support::{FailingStore, NoopBackend, ReadOnlySwitchStore, borrowed, date};

    fn member() -> Member {
        let mut member = Member::new(
            Arc::new(NoopBackend::default()),
            Arc::new(MemoryStore::new()),
            FinePolicy::default(),
        );
        member.restore();
        member
    }

    #[tokio::test]
    async fn test_signed_out_actions_are_refused() {
        let mut member = member();
        assert_eq!(member.graph(), NavGraph::Auth);
        assert!(matches!(member.dashboard().await, Err(MemberError::NotSignedIn)));
        assert!(matches!(member.refresh_cart().await, Err(MemberError::NotSignedIn)));
        assert!(matches!(member.checkout().await, Err(MemberError::NotSignedIn)));
        assert!(matches!(member.begin_remove(1), Err(MemberError::NotSignedIn)));
    }

    #[tokio::test]
    async fn test_login_validation_blocks_request() {
        let backend = Arc::new(NoopBackend::default());
        let mut member = Member::new(
            backend.clone(),
            Arc::new(MemoryStore::new()),
            FinePolicy::default(),
        );
        let result = member.login("", "pw").await;
        assert!(matches!(
            result,
            Err(MemberError::Validation(ValidationError::MissingCredentials))
        ));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_login_switches_graph() {
        let mut member = member();
        member.login("ann@example.com", "pw").await.unwrap();
        assert_eq!(member.graph(), NavGraph::Main);
        assert_eq!(member.session().token().as_deref(), Some("noop-token"));
    }

    #[tokio::test]
    async fn test_login_storage_failure_is_login_failure() {
        let mut member = Member::new(
            Arc::new(NoopBackend::default()),
            Arc::new(FailingStore),
            FinePolicy::default(),
        );
        member.restore();
        let result = member.login("ann@example.com", "pw").await;
        assert!(matches!(result, Err(MemberError::Session(_))));
        assert_eq!(member.graph(), NavGraph::Auth);
    }

    #[tokio::test]
    async fn test_failed_relogin_keeps_current_session_state() {
        let store = Arc::new(ReadOnlySwitchStore::default());
        let mut member = Member::new(
            Arc::new(NoopBackend::default()),
            store.clone(),
            FinePolicy::default(),
        );
        member.restore();
        member.login("ann@example.com", "pw").await.unwrap();
        member.refresh_borrowed().await.unwrap();

        store.set_read_only(true);
        let result = member.login("bob@example.com", "pw").await;
        assert!(matches!(result, Err(MemberError::Session(_))));
        assert_eq!(member.graph(), NavGraph::Main);
        assert!(!member.borrowed().is_stale());
    }

    #[tokio::test]
    async fn test_leaving_screen_drops_late_refresh() {
        let mut member = member();
        member.login("ann@example.com", "pw").await.unwrap();

        let late = member.borrowed.begin_refresh();
        member.leave(Screen::BorrowedBooks);
        let today = date(2024, 6, 10);
        assert!(!member.borrowed.apply(late, vec![borrowed(1, date(2024, 6, 1))]));
        assert!(member.borrowed().items().is_empty());
        assert!(member.fines(today).is_clear());

        let late_cart = member.cart.begin_refresh();
        member.leave(Screen::Cart);
        assert!(!member.cart.apply(late_cart, vec![crate::test_support::cart_item(1)]));
        assert!(member.cart().is_empty());

        // A fresh refresh after returning is honored.
        member.refresh_borrowed().await.unwrap();
        assert!(!member.borrowed().is_stale());
    }

    #[tokio::test]
    async fn test_logout_discards_session_state() {
        let mut member = member();
        member.login("ann@example.com", "pw").await.unwrap();
        member.refresh_borrowed().await.unwrap();
        assert!(!member.borrowed().is_stale());

        member.logout().unwrap();
        assert_eq!(member.graph(), NavGraph::Auth);
        assert!(member.borrowed().is_stale());
        assert!(member.borrowed().items().is_empty());
        assert!(member.cart().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_stock_title_is_not_requested() {
        let backend = Arc::new(NoopBackend::default());
        let mut member = Member::new(
            backend.clone(),
            Arc::new(MemoryStore::new()),
            FinePolicy::default(),
        );
        member.login("ann@example.com", "pw").await.unwrap();
        let calls_after_login = backend.calls();

        let book = Book {
            id: 1,
            name: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            subject: None,
            isbn: None,
            price: None,
            total_copies: 2,
            available_copies: 0,
        };
        let result = member.add_first_available(&book).await;
        assert!(matches!(result, Err(MemberError::OutOfStock)));
        assert_eq!(backend.calls(), calls_after_login);
    }

    #[tokio::test]
    async fn test_no_copies_left_when_asked() {
        let mut member = member();
        member.login("ann@example.com", "pw").await.unwrap();
        let book = Book {
            id: 1,
            name: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            subject: None,
            isbn: None,
            price: None,
            total_copies: 2,
            available_copies: 1,
        };
        // The noop backend reports no copies.
        let result = member.add_first_available(&book).await;
        assert!(matches!(result, Err(MemberError::NoCopiesAvailable)));
    }

    #[tokio::test]
    async fn test_fines_use_policy_rate() {
        let mut member = Member::new(
            Arc::new(NoopBackend::default()),
            Arc::new(MemoryStore::new()),
            FinePolicy { rate_per_day: 3 },
        );
        member.login("ann@example.com", "pw").await.unwrap();
        member.refresh_borrowed().await.unwrap();
        let summary = member.fines(date(2024, 6, 10));
        assert!(summary.is_clear());
        assert_eq!(summary.rate_per_day, 3);
    }
}
