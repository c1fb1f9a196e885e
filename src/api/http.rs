//! reqwest-backed implementation of [`LibraryBackend`].
//!
//! Every call is a single JSON request/response. Non-success statuses are
//! turned into [`ApiError::Api`] carrying the server's `error`/`message`
//! text so the presentation layer can show it verbatim.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::backend::{ApiError, LibraryBackend};
use super::types::{
    AuthResponse, Book, BookCopy, CartItem, ChangePasswordRequest, CheckoutResponse, ErrorBody,
    IssueRecord, LoginRequest, MemberDashboard, MemberProfile, Payment, RegisterRequest,
};

pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Creates a backend rooted at `base_url` (e.g. `http://host:5454/api`).
    ///
    /// `timeout` of `None` keeps reqwest's default (no overall timeout).
    pub fn new(base_url: String, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Network(format!("client setup failed: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .header("Content-Type", "application/json");
        match token {
            Some(token) => builder.header("Authorization", format!("Bearer {token}")),
            None => builder,
        }
    }

    /// Sends the request and maps transport failures and error statuses.
    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        debug!("{} -> {}", response.url().path(), response.status());

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "unknown error".to_string());
            warn!("Backend rejected request: {} - {}", status.as_u16(), message);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, path, Some(token))).await?;
        parse_json(response).await
    }
}

/// Pulls a user-facing message out of an error body.
///
/// Accepts `{"error": ..}` or `{"message": ..}`; a non-JSON body is used as-is.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<ErrorBody>(trimmed) {
        Ok(parsed) => parsed.error.or(parsed.message),
        Err(_) if !trimmed.starts_with('{') => Some(trimmed.to_string()),
        Err(_) => None,
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
}

#[async_trait]
impl LibraryBackend for HttpBackend {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        info!("Logging in as {}", request.email);
        let builder = self.request(Method::POST, "/auth/login", None).json(request);
        parse_json(self.send(builder).await?).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        info!("Registering {}", request.email);
        let builder = self.request(Method::POST, "/auth/register", None).json(request);
        self.send(builder).await?;
        Ok(())
    }

    async fn dashboard(&self, token: &str) -> Result<MemberDashboard, ApiError> {
        self.fetch("/member/dashboard", token).await
    }

    async fn all_books(&self, token: &str) -> Result<Vec<Book>, ApiError> {
        self.fetch("/member/books/all", token).await
    }

    async fn search_books(&self, token: &str, query: &str) -> Result<Vec<Book>, ApiError> {
        let builder = self
            .request(Method::GET, "/member/books/search", Some(token))
            .query(&[("query", query)]);
        parse_json(self.send(builder).await?).await
    }

    async fn available_copies(&self, token: &str, book_id: i64) -> Result<Vec<BookCopy>, ApiError> {
        self.fetch(&format!("/member/books/{book_id}/copies"), token)
            .await
    }

    async fn add_to_cart(&self, token: &str, copy_id: i64) -> Result<(), ApiError> {
        info!("Reserving copy #{copy_id}");
        let path = format!("/member/cart/add/{copy_id}");
        self.send(self.request(Method::POST, &path, Some(token)))
            .await?;
        Ok(())
    }

    async fn cart(&self, token: &str) -> Result<Vec<CartItem>, ApiError> {
        self.fetch("/member/cart", token).await
    }

    async fn remove_from_cart(&self, token: &str, cart_item_id: i64) -> Result<(), ApiError> {
        info!("Releasing cart item {cart_item_id}");
        let path = format!("/member/cart/remove/{cart_item_id}");
        self.send(self.request(Method::DELETE, &path, Some(token)))
            .await?;
        Ok(())
    }

    async fn checkout(&self, token: &str) -> Result<CheckoutResponse, ApiError> {
        info!("Checking out cart");
        let builder = self.request(Method::POST, "/member/cart/checkout", Some(token));
        parse_json(self.send(builder).await?).await
    }

    async fn profile(&self, token: &str) -> Result<MemberProfile, ApiError> {
        self.fetch("/member/me/profile", token).await
    }

    async fn borrowed_books(&self, token: &str) -> Result<Vec<IssueRecord>, ApiError> {
        self.fetch("/member/me/borrowed-books", token).await
    }

    async fn borrowing_history(&self, token: &str) -> Result<Vec<IssueRecord>, ApiError> {
        self.fetch("/member/me/borrowing-history", token).await
    }

    async fn payment_history(&self, token: &str) -> Result<Vec<Payment>, ApiError> {
        self.fetch("/member/me/payment-history", token).await
    }

    async fn change_password(
        &self,
        token: &str,
        request: &ChangePasswordRequest,
    ) -> Result<(), ApiError> {
        let builder = self
            .request(Method::POST, "/member/me/change-password", Some(token))
            .json(request);
        self.send(builder).await?;
        Ok(())
    }
}
