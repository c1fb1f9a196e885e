use std::fmt;

use async_trait::async_trait;

use super::types::{
    AuthResponse, Book, BookCopy, CartItem, ChangePasswordRequest, CheckoutResponse, IssueRecord,
    LoginRequest, MemberDashboard, MemberProfile, Payment, RegisterRequest,
};

/// Errors that can occur while talking to the library backend.
///
/// Expired or invalid tokens are not singled out: they arrive as `Api`
/// with a 401/403 status like any other rejection.
#[derive(Debug)]
pub enum ApiError {
    /// Transport failure (DNS, connection refused, timeout).
    Network(String),
    /// The server answered with a non-success status. `message` is the
    /// server-supplied error text when one was present.
    Api { status: u16, message: String },
    /// The response body did not match the expected shape.
    Parse(String),
}

impl ApiError {
    /// The message meant for the user, if the server supplied one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Api { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// The REST surface the member client consumes.
///
/// Authenticated calls take the bearer token explicitly; the backend keeps
/// no session state of its own.
#[async_trait]
pub trait LibraryBackend: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;

    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError>;

    async fn dashboard(&self, token: &str) -> Result<MemberDashboard, ApiError>;

    async fn all_books(&self, token: &str) -> Result<Vec<Book>, ApiError>;

    async fn search_books(&self, token: &str, query: &str) -> Result<Vec<Book>, ApiError>;

    async fn available_copies(&self, token: &str, book_id: i64) -> Result<Vec<BookCopy>, ApiError>;

    async fn add_to_cart(&self, token: &str, copy_id: i64) -> Result<(), ApiError>;

    async fn cart(&self, token: &str) -> Result<Vec<CartItem>, ApiError>;

    async fn remove_from_cart(&self, token: &str, cart_item_id: i64) -> Result<(), ApiError>;

    async fn checkout(&self, token: &str) -> Result<CheckoutResponse, ApiError>;

    async fn profile(&self, token: &str) -> Result<MemberProfile, ApiError>;

    async fn borrowed_books(&self, token: &str) -> Result<Vec<IssueRecord>, ApiError>;

    async fn borrowing_history(&self, token: &str) -> Result<Vec<IssueRecord>, ApiError>;

    async fn payment_history(&self, token: &str) -> Result<Vec<Payment>, ApiError>;

    async fn change_password(
        &self,
        token: &str,
        request: &ChangePasswordRequest,
    ) -> Result<(), ApiError>;
}
